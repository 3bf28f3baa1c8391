use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[clap(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct EpubArgs {
    /// Only generate the book with this identifier
    #[clap(long)]
    pub book: Option<String>,
    /// Regenerate even if the EPUB is up to date
    #[clap(short, long)]
    pub force: bool,
    /// Upload the EPUB to its configured target afterwards
    #[clap(long)]
    pub upload: bool,
    /// Print the outcome as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PdfArgs {
    /// Fail if any section of the syllabus page is missing
    #[clap(long)]
    pub strict: bool,
    /// Regenerate even if the PDF is up to date
    #[clap(short, long)]
    pub force: bool,
    /// Upload the PDF to its configured target afterwards
    #[clap(long)]
    pub upload: bool,
    /// Print the outcome as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// The syllabus HTML page
    pub input: PathBuf,
    /// Fail if any section of the page is missing
    #[clap(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates an example inkpress.toml config file
    Init(InitArgs),
    /// Renders the configured books to EPUB
    Epub(EpubArgs),
    /// Renders the syllabus brochure to PDF
    Pdf(PdfArgs),
    /// Prints the record extracted from a syllabus page as JSON
    Extract(ExtractArgs),
    /// Reports whether each configured artifact is up to date and valid
    Check,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(
        short,
        long,
        global = true,
        env = "INKPRESS_CONFIG",
        default_value = crate::config::DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Show more detail (repeat for even more)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show warnings and errors
    #[clap(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[clap(subcommand)]
    pub command: Commands,
}
