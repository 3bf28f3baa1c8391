//! EPUB output configuration: one book and its reading order.

use crate::source::{document_name, ChapterSpec};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Colours of the generated stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTheme {
    /// Headings, links, and quote rules
    pub accent: String,
    /// Background of fenced code blocks
    pub code_background: String,
    /// Text colour of fenced code blocks, inherited when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_foreground: Option<String>,
    pub code_border: String,
    /// Background of inline `code`
    pub inline_code_background: String,
}

impl Default for BookTheme {
    fn default() -> Self {
        BookTheme {
            accent: "#0066cc".to_string(),
            code_background: "#f4f4f4".to_string(),
            code_foreground: None,
            code_border: "#ddd".to_string(),
            inline_code_background: "#f4f4f4".to_string(),
        }
    }
}

#[cfg(test)]
impl BookTheme {
    /// Light text on a dark editor-like background for code blocks.
    pub fn dark_code<S: Into<String>>(accent: S) -> BookTheme {
        BookTheme {
            accent: accent.into(),
            code_background: "#1e1e1e".to_string(),
            code_foreground: Some("#d4d4d4".to_string()),
            code_border: "#333".to_string(),
            ..BookTheme::default()
        }
    }
}

/// EPUB output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub struct EPUB {
    /// Key used to pick the book on the command line
    pub identifier: String,
    pub title: String,
    /// BCP 47 language code
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub source_url: String,
    /// Directory holding `<slug>.md` for every chapter
    pub content_dir: PathBuf,
    /// Output EPUB file path
    pub outfile: PathBuf,
    /// Optional cover image, skipped when the file doesn't exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<PathBuf>,
    /// Start every chapter with an `<h1>` of its title
    #[serde(default = "default_chapter_headings")]
    pub chapter_headings: bool,
    #[serde(default)]
    pub theme: BookTheme,
    #[serde(default)]
    pub chapters: Vec<ChapterSpec>,
}

fn default_language() -> String {
    "es".to_string()
}

fn default_chapter_headings() -> bool {
    true
}

impl EPUB {
    /// Markdown file of every configured chapter, in reading order.
    pub fn source_files(&self) -> Vec<PathBuf> {
        self.chapters
            .iter()
            .map(|chapter| self.content_dir.join(chapter.file_name()))
            .collect()
    }

    /// Fail if two chapters would be written to the same document inside the
    /// e-book.
    pub fn check_chapter_ids(&self) -> Result<()> {
        let mut seen: HashMap<String, &ChapterSpec> = HashMap::new();
        for chapter in self.chapters.iter() {
            let name = document_name(&chapter.id);
            if let Some(first) = seen.insert(name.clone(), chapter) {
                bail!(
                    "Chapter ids `{}` and `{}` both map to {name}, give them distinct ids",
                    first.id,
                    chapter.id
                );
            }
        }
        Ok(())
    }

    /// Name of the generated table of contents, in the book's language.
    pub fn toc_name(&self) -> &'static str {
        if self.language.starts_with("es") {
            "Índice"
        } else {
            "Table of Contents"
        }
    }
}

/// Statistics from rendering an EPUB, used for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of XHTML documents in the EPUB, cover page included
    pub document_count: usize,
    /// Number of chapters that made it into the book
    pub chapter_count: usize,
    /// Whether a cover image was embedded
    pub cover: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_parse_minimal_book() {
        let epub: EPUB = toml::from_str(
            r#"
            identifier = "ai-sdk"
            title = "Introducción al AI-SDK"
            content_dir = "content/ai-sdk"
            outfile = "public/ai-sdk.epub"
            "#,
        )
        .expect("can parse book");
        assert_eq!(epub.language, "es");
        assert!(epub.chapter_headings);
        assert_eq!(epub.theme, BookTheme::default());
        assert!(epub.cover_image.is_none());
        assert_eq!(epub.toc_name(), "Índice");
    }

    #[test]
    fn can_roundtrip_epub() {
        let epub = EPUB {
            identifier: "llamaindex".to_string(),
            title: "Agent Workflows".to_string(),
            language: "en".to_string(),
            authors: vec!["Héctorbliss".to_string()],
            description: String::new(),
            publisher: "FixterGeek".to_string(),
            source_url: "fixtergeek.com".to_string(),
            content_dir: PathBuf::from("content/llamaindex"),
            outfile: PathBuf::from("public/llamaindex.epub"),
            cover_image: Some(PathBuf::from("cover.jpg")),
            chapter_headings: false,
            theme: BookTheme::dark_code("#3178C6"),
            chapters: vec![ChapterSpec::new("01", "Uno", "capitulo-01")],
        };
        let toml_str = toml::to_string(&epub).expect("can serialize");
        let deserialized: EPUB = toml::from_str(&toml_str).expect("can deserialize");
        assert_eq!(epub, deserialized);
    }

    #[test]
    fn can_list_source_files() {
        let epub: EPUB = toml::from_str(
            r#"
            identifier = "b"
            title = "B"
            content_dir = "content"
            outfile = "b.epub"
            chapters = [
                { id = "01", title = "Uno", slug = "capitulo-01" },
                { id = "02", title = "Dos", slug = "capitulo-02" },
            ]
            "#,
        )
        .expect("can parse book");
        assert_eq!(
            epub.source_files(),
            vec![
                PathBuf::from("content/capitulo-01.md"),
                PathBuf::from("content/capitulo-02.md")
            ]
        );
    }

    #[test]
    fn colliding_chapter_ids_are_rejected() {
        let mut epub: EPUB = toml::from_str(
            r#"
            identifier = "b"
            title = "B"
            content_dir = "content"
            outfile = "b.epub"
            chapters = [
                { id = "prólogo", title = "Prólogo", slug = "prologo" },
                { id = "prologo", title = "Prólogo bis", slug = "prologo-bis" },
            ]
            "#,
        )
        .expect("can parse book");
        let err = epub.check_chapter_ids().expect_err("ids collide");
        assert!(err.to_string().contains("chapter_prologo.xhtml"));

        epub.chapters[1].id = "prologo-2".to_string();
        epub.check_chapter_ids().expect("distinct ids are fine");
    }
}
