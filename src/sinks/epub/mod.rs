//! EPUB generation for markdown books.
//!
//! This module converts a book's loaded chapters into an EPUB 3 e-book with:
//! - An optional cover page built from the configured image
//! - One document per chapter, in configured order
//! - Generated navigation (nav document and NCX) titled from the chapter table
//! - A single stylesheet generated from the book's theme

mod config;
mod rendering;
mod styles;

pub use config::EPUB;
#[cfg(test)]
pub use config::BookTheme;
