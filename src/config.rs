//! The `inkpress.toml` configuration file.
//!
//! Books and the brochure are declared here rather than in code: each book
//! carries its metadata and chapter table, the brochure its input page. Paths
//! are written relative to the file and resolved against its directory when
//! loaded.

use crate::sinks::{PDF, EPUB};
use crate::upload::UploadTarget;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "inkpress.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookConfig {
    #[serde(flatten)]
    pub epub: EPUB,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrochureConfig {
    /// The syllabus HTML page
    pub input: PathBuf,
    /// Refuse to render when a section of the page is missing
    #[serde(default)]
    pub strict: bool,
    #[serde(flatten)]
    pub pdf: PDF,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadTarget>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, rename = "book")]
    pub books: Vec<BookConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brochure: Option<BrochureConfig>,
}

fn resolve(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

impl Configuration {
    pub fn parse(contents: &str) -> Result<Configuration> {
        let config: Configuration =
            toml::from_str(contents).with_context(|| "Failed to parse TOML")?;
        for book in config.books.iter() {
            book.epub.check_chapter_ids().with_context(|| {
                format!("Invalid chapter table for book `{}`", book.epub.identifier)
            })?;
        }
        Ok(config)
    }

    /// Load the configuration at `path`, resolving relative paths against the
    /// directory it lives in.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let mut config = Configuration::parse(&contents)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.resolve_paths(&base);
        Ok(config)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        for book in self.books.iter_mut() {
            resolve(base, &mut book.epub.content_dir);
            resolve(base, &mut book.epub.outfile);
            if let Some(cover) = book.epub.cover_image.as_mut() {
                resolve(base, cover);
            }
        }
        if let Some(brochure) = self.brochure.as_mut() {
            resolve(base, &mut brochure.input);
            resolve(base, &mut brochure.pdf.outfile);
        }
    }

    /// Look a book up by its identifier.
    pub fn find(&self, identifier: &str) -> Result<&BookConfig> {
        BookConfig::find(&self.books, identifier)
    }

    /// The configuration written by `inkpress init`.
    pub fn example() -> &'static str {
        EXAMPLE_CONFIG
    }
}

impl BookConfig {
    pub fn find<'a>(books: &'a [BookConfig], identifier: &str) -> Result<&'a BookConfig> {
        books
            .iter()
            .find(|b| b.epub.identifier == identifier)
            .ok_or_else(|| {
                let known = books
                    .iter()
                    .map(|b| b.epub.identifier.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                anyhow!("No book with identifier `{identifier}` (configured: {known})")
            })
    }
}

const EXAMPLE_CONFIG: &str = r##"# inkpress configuration
#
# Paths are relative to this file.

[[book]]
identifier = "claude-code"
title = "Dominando Claude Code"
language = "es"
authors = ["Héctorbliss"]
description = "Guía práctica para programar con agentes desde la terminal."
publisher = "FixterGeek"
source_url = "fixtergeek.com"
content_dir = "content/claude-code"
outfile = "public/dominando-claude-code.epub"
chapter_headings = true
chapters = [
    { id = "prologo", title = "Prólogo", slug = "prologo" },
    { id = "01", title = "Primeros pasos", slug = "capitulo-01" },
    { id = "02", title = "Contexto y memoria", slug = "capitulo-02" },
    { id = "03", title = "Comandos personalizados", slug = "capitulo-03" },
]

[book.upload]
key = "books/dominando-claude-code.epub"

[[book]]
identifier = "ai-sdk"
title = "Introducción al AI-SDK con React Router v7"
authors = ["Héctorbliss"]
publisher = "FixterGeek"
source_url = "fixtergeek.com"
content_dir = "content/ai-sdk"
outfile = "public/ai-sdk-react-router.epub"
chapters = [
    { id = "prologo", title = "Prólogo", slug = "prologo" },
    { id = "intro", title = "Introducción", slug = "introduccion" },
    { id = "01", title = "Tu Primera Inferencia con IA", slug = "capitulo-01" },
]

[book.theme]
accent = "#3178C6"
code_background = "#1e1e1e"
code_foreground = "#d4d4d4"
code_border = "#333"
inline_code_background = "#f4f4f4"

[brochure]
input = "public/temario.html"
outfile = "public/temario-taller.pdf"
strict = false

[brochure.branding]
name = "FixterGeek"
website = "fixtergeek.com"
footer = [
    "© 2025 FixterGeek - Todos los derechos reservados",
    "fixtergeek.com",
]
"##;
