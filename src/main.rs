use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::Configuration;
use std::process::ExitCode;

mod check;
mod cli;
mod config;
mod extract;
mod freshness;
mod generate;
mod init;
mod logger;
mod report;
mod sinks;
mod source;
mod upload;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    let env_level = std::env::var(logger::LOG_ENV).ok();
    logger::init(logger::filter(cli.verbose, cli.quiet, env_level.as_deref())?)?;

    match &cli.command {
        Commands::Init(args) => init::run(&cli.config, args),
        Commands::Epub(args) => {
            let config = Configuration::load(&cli.config)?;
            generate::epub(&config, args, !cli.quiet)
        }
        Commands::Pdf(args) => {
            let config = Configuration::load(&cli.config)?;
            generate::pdf(&config, args)
        }
        Commands::Extract(args) => {
            let extraction = extract::extract_file(&args.input)?;
            let record = if args.strict {
                extraction.into_strict()?
            } else {
                for section in extraction.missing.iter() {
                    log::warn!("Missing section {section}, using defaults");
                }
                extraction.record
            };
            let json = serde_json::to_string_pretty(&record)
                .with_context(|| "Failed to serialise extracted record")?;
            println!("{json}");
            Ok(())
        }
        Commands::Check => {
            let config = Configuration::load(&cli.config)?;
            check::run(&config)
        }
    }
}
