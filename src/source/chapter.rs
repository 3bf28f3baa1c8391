use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// One entry of a book's chapter table, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSpec {
    /// Stable identifier, used to key the chapter's document and navigation entry
    pub id: String,
    /// The title shown in the table of contents
    pub title: String,
    /// The markdown file name (without the `.md` extension) inside the content directory
    pub slug: String,
}

impl ChapterSpec {
    #[cfg(test)]
    pub fn new<I: ToString, T: ToString, S: ToString>(id: I, title: T, slug: S) -> ChapterSpec {
        ChapterSpec {
            id: id.to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.md", self.slug)
    }
}

/// A chapter that has been read from disk and rendered to XHTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Rendered XHTML body fragment (no `<html>` wrapper)
    pub body: String,
}

impl ContentUnit {
    /// Name of the document this unit becomes inside the e-book.
    pub fn file_name(&self) -> String {
        document_name(&self.id)
    }
}

/// A configured chapter whose source could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingChapter {
    pub slug: String,
    pub path: PathBuf,
    pub reason: MissingReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReason {
    NotFound,
    Unreadable(String),
}

impl fmt::Display for MissingChapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            MissingReason::NotFound => write!(f, "file not found: {}", self.path.display()),
            MissingReason::Unreadable(e) => {
                write!(f, "failed to process {}: {}", self.slug, e)
            }
        }
    }
}

/// Name of the e-book document for the chapter with identifier `id`.
pub fn document_name(id: &str) -> String {
    format!("chapter_{}.xhtml", sanitise_id(id))
}

/// Make an identifier safe to use in a file name / XML id.
///
/// Letters are decomposed and stripped of their accents. Whitespace becomes
/// `_`, other ASCII punctuation is dropped, and letters or digits with no ASCII
/// form are written as `u<hex>` so distinct scripts stay distinct.
pub fn sanitise_id(id: &str) -> String {
    let mut sanitised = String::with_capacity(id.len());
    for c in id.nfd().filter(|c| !is_combining_mark(*c)) {
        match c {
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => sanitised.push(c),
            c if c.is_whitespace() => sanitised.push('_'),
            c if !c.is_ascii() && c.is_alphanumeric() => {
                sanitised.push_str(&format!("u{:x}", c as u32))
            }
            _ => {}
        }
    }
    if sanitised.is_empty() {
        "untitled".to_string()
    } else {
        sanitised
    }
}
