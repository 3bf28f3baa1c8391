//! EPUB rendering orchestration.
//!
//! Assembles the cover, one XHTML document per loaded chapter, and the shared
//! stylesheet with the `epub-builder` crate, which handles the packaging (OPF
//! manifest, NCX and nav documents, ZIP structure with the MIME type first).
//! Chapters keep their configured order; navigation entries are keyed by the
//! chapter identifier so a skipped chapter never shifts another's title.

mod chapter;
mod cover;

use super::config::{RenderStats, EPUB};
use super::styles;
use crate::source::LoadReport;
use anyhow::{anyhow, Context, Result};
use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, ZipLibrary};
use indicatif::ProgressBar;
use std::fmt::Display;
use std::fs::File;
use std::io::BufWriter;

/// `epub-builder` reports failures as `eyre` reports, which anyhow can't wrap
/// directly.
trait BuilderContext<T> {
    fn builder_context<C, F>(self, context: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> BuilderContext<T> for eyre::Result<T> {
    fn builder_context<C, F>(self, context: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| anyhow!("{e:#}")).with_context(context)
    }
}

impl EPUB {
    /// Render the loaded chapters of this book to its EPUB file.
    ///
    /// Returns statistics about the generated EPUB.
    pub fn render(&self, report: &LoadReport, progress: &ProgressBar) -> Result<RenderStats> {
        progress.set_message("Generating EPUB...");
        self.check_chapter_ids()?;

        let zip = ZipLibrary::new().builder_context(|| "Failed to create ZIP library for EPUB")?;
        let mut builder = EpubBuilder::new(zip).builder_context(|| "Failed to build builder")?;
        builder.epub_version(EpubVersion::V30);

        builder
            .metadata("title", &self.title)
            .builder_context(|| "Failed to set title metadata")?;
        builder
            .metadata("generator", "inkpress")
            .builder_context(|| "Failed to set generator metadata")?;
        builder
            .metadata("lang", &self.language)
            .builder_context(|| "Failed to set language metadata")?;
        builder
            .metadata("toc_name", self.toc_name())
            .builder_context(|| "Failed to set table of contents name")?;

        for author in &self.authors {
            builder
                .metadata("author", author)
                .builder_context(|| format!("Failed to add author metadata for author: {}", author))?;
        }

        if !self.description.is_empty() {
            builder
                .metadata("description", &self.description)
                .builder_context(|| "Failed to set description metadata")?;
        }
        for subject in [&self.publisher, &self.source_url] {
            if !subject.is_empty() {
                builder
                    .metadata("subject", subject)
                    .builder_context(|| "Failed to set subject metadata")?;
            }
        }

        let stylesheet = styles::generate_stylesheet(&self.theme);
        builder
            .stylesheet(stylesheet.as_bytes())
            .builder_context(|| "Failed to add stylesheet")?;

        let mut document_count = 0;

        // the cover is optional, a configured image that isn't there is only noted
        let mut cover = false;
        if let Some(cover_path) = &self.cover_image {
            if cover_path.is_file() {
                let image_data = std::fs::read(cover_path).with_context(|| {
                    format!("Failed to read cover image: {}", cover_path.display())
                })?;
                let href = cover::image_href(cover_path);
                builder
                    .add_cover_image(&href, image_data.as_slice(), cover::mime_from_path(cover_path))
                    .builder_context(|| {
                        format!("Failed to add cover image to EPUB: {}", cover_path.display())
                    })?;

                let cover_html = cover::render(self, &href);
                builder
                    .add_content(
                        EpubContent::new("cover.xhtml", cover_html.as_bytes())
                            .reftype(ReferenceType::Cover),
                    )
                    .builder_context(|| "Failed to add cover page")?;
                document_count += 1;
                cover = true;
            } else {
                log::warn!(
                    "Cover image {} not found, building without a cover",
                    cover_path.display()
                );
            }
        }

        for (i, unit) in report.units.iter().enumerate() {
            progress.set_message(unit.title.clone());
            let html = chapter::render(self, unit);
            let mut content = EpubContent::new(unit.file_name(), html.as_bytes()).title(&unit.title);
            if i == 0 {
                content = content.reftype(ReferenceType::Text);
            }
            builder
                .add_content(content)
                .builder_context(|| format!("Failed to add chapter to EPUB: {}", unit.slug))?;
            document_count += 1;
        }

        if let Some(parent) = self.outfile.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory {}", parent.display())
                })?;
            }
        }

        let output_file = File::create(&self.outfile)
            .with_context(|| format!("Failed to create EPUB file: {}", self.outfile.display()))?;
        let writer = BufWriter::new(output_file);
        builder
            .generate(writer)
            .builder_context(|| "Failed to generate EPUB file")?;

        progress.finish_with_message("EPUB generated");

        Ok(RenderStats {
            document_count,
            chapter_count: report.units.len(),
            cover,
        })
    }
}

#[cfg(test)]
mod test {
    use super::BuilderContext;
    use crate::sinks::epub::EPUB;
    use crate::source::{load_chapters, ChapterSpec};
    use indicatif::ProgressBar;
    use std::io::Read;
    use std::path::{Path, PathBuf};

    fn book(dir: &Path, chapters: Vec<ChapterSpec>, cover_image: Option<PathBuf>) -> EPUB {
        EPUB {
            identifier: "claude-code".to_string(),
            title: "Dominando Claude Code".to_string(),
            language: "es".to_string(),
            authors: vec!["Héctorbliss".to_string()],
            description: "Guía práctica".to_string(),
            publisher: "FixterGeek".to_string(),
            source_url: "fixtergeek.com".to_string(),
            content_dir: dir.join("content"),
            outfile: dir.join("public").join("claude-code.epub"),
            cover_image,
            chapter_headings: true,
            theme: Default::default(),
            chapters,
        }
    }

    fn read_entry(path: &Path, suffix: &str) -> String {
        let file = std::fs::File::open(path).expect("can open epub");
        let mut archive = zip::ZipArchive::new(file).expect("epub is a zip archive");
        let name = archive
            .file_names()
            .find(|n| n.ends_with(suffix))
            .map(ToString::to_string)
            .unwrap_or_else(|| panic!("epub has no {suffix}"));
        let mut contents = String::new();
        archive
            .by_name(&name)
            .expect("can open entry")
            .read_to_string(&mut contents)
            .expect("can read entry");
        contents
    }

    fn nav_sources(ncx: &str) -> Vec<String> {
        ncx.match_indices("src=\"chapter_")
            .map(|(i, _)| {
                let rest = &ncx[i + 5..];
                rest[..rest.find('"').expect("closing quote")].to_string()
            })
            .collect()
    }

    #[test]
    fn can_render_present_chapters_in_order() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let content = dir.path().join("content");
        std::fs::create_dir_all(&content).expect("can create content dir");

        let chapters: Vec<ChapterSpec> = (1..=9)
            .map(|i| {
                ChapterSpec::new(
                    format!("{i:02}"),
                    format!("Capítulo {i}"),
                    format!("capitulo-{i:02}"),
                )
            })
            .collect();
        for i in [1, 2, 4, 5, 6, 8, 9] {
            std::fs::write(
                content.join(format!("capitulo-{i:02}.md")),
                format!("# Parte {i}\n\nTexto del capítulo."),
            )
            .expect("can write chapter");
        }

        let epub = book(dir.path(), chapters, None);
        let report = load_chapters(&epub.content_dir, &epub.chapters, &ProgressBar::hidden());
        assert_eq!(report.missing.len(), 2);

        let stats = epub
            .render(&report, &ProgressBar::hidden())
            .expect("can render epub");
        assert_eq!(stats.chapter_count, 7);
        assert_eq!(stats.document_count, 7);
        assert!(!stats.cover);

        let ncx = read_entry(&epub.outfile, "toc.ncx");
        assert_eq!(
            nav_sources(&ncx),
            vec![
                "chapter_01.xhtml",
                "chapter_02.xhtml",
                "chapter_04.xhtml",
                "chapter_05.xhtml",
                "chapter_06.xhtml",
                "chapter_08.xhtml",
                "chapter_09.xhtml",
            ]
        );
        assert!(ncx.contains("Capítulo 4"));
        assert!(!ncx.contains("Capítulo 3"));

        let chapter = read_entry(&epub.outfile, "chapter_04.xhtml");
        assert!(chapter.contains("<h1>Capítulo 4</h1>"));
        assert!(chapter.contains("Texto del capítulo."));
    }

    #[test]
    fn missing_cover_image_is_skipped() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let content = dir.path().join("content");
        std::fs::create_dir_all(&content).expect("can create content dir");
        std::fs::write(content.join("prologo.md"), "Hola").expect("can write chapter");

        let epub = book(
            dir.path(),
            vec![ChapterSpec::new("prologo", "Prólogo", "prologo")],
            Some(dir.path().join("no-such-cover.jpg")),
        );
        let report = load_chapters(&epub.content_dir, &epub.chapters, &ProgressBar::hidden());
        let stats = epub
            .render(&report, &ProgressBar::hidden())
            .expect("can render without cover");
        assert!(!stats.cover);

        let bytes = std::fs::read(&epub.outfile).expect("can read epub");
        assert!(bytes.len() >= 1000);
        assert!(bytes.starts_with(b"PK\x03\x04"));

        let opf = read_entry(&epub.outfile, ".opf");
        assert!(!opf.contains("cover.xhtml"));
    }

    #[test]
    fn can_embed_cover_image() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let content = dir.path().join("content");
        std::fs::create_dir_all(&content).expect("can create content dir");
        std::fs::write(content.join("prologo.md"), "Hola").expect("can write chapter");
        let cover_path = dir.path().join("cover.png");
        std::fs::write(&cover_path, b"\x89PNG\r\n\x1a\nnot really").expect("can write cover");

        let epub = book(
            dir.path(),
            vec![ChapterSpec::new("prologo", "Prólogo", "prologo")],
            Some(cover_path),
        );
        let report = load_chapters(&epub.content_dir, &epub.chapters, &ProgressBar::hidden());
        let stats = epub
            .render(&report, &ProgressBar::hidden())
            .expect("can render with cover");
        assert!(stats.cover);
        assert_eq!(stats.document_count, 2);

        let opf = read_entry(&epub.outfile, ".opf");
        let cover_at = opf.find("idref=\"cover_xhtml\"");
        let chapter_at = opf.find("idref=\"chapter_prologo_xhtml\"");
        assert!(opf.contains("images/cover.png"));
        match (cover_at, chapter_at) {
            (Some(c), Some(p)) => assert!(c < p, "cover is not first in the spine"),
            _ => assert!(opf.find("cover.xhtml") < opf.find("chapter_prologo.xhtml")),
        }
    }

    #[test]
    fn builder_errors_keep_their_context() {
        let failed: eyre::Result<()> = Err(eyre::eyre!("zip went away"));
        let err = failed
            .builder_context(|| "Failed to generate EPUB file")
            .expect_err("still an error");
        assert_eq!(format!("{err:#}"), "Failed to generate EPUB file: zip went away");
    }

    #[test]
    fn colliding_chapter_documents_are_refused() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let content = dir.path().join("content");
        std::fs::create_dir_all(&content).expect("can create content dir");
        std::fs::write(content.join("prologo.md"), "Uno").expect("can write chapter");
        std::fs::write(content.join("prologo-bis.md"), "Dos").expect("can write chapter");

        let epub = book(
            dir.path(),
            vec![
                ChapterSpec::new("prólogo", "Prólogo", "prologo"),
                ChapterSpec::new("prologo", "Otro prólogo", "prologo-bis"),
            ],
            None,
        );
        let report = load_chapters(&epub.content_dir, &epub.chapters, &ProgressBar::hidden());
        assert_eq!(report.units.len(), 2);
        assert!(epub.render(&report, &ProgressBar::hidden()).is_err());
        assert!(!epub.outfile.exists());
    }
}
