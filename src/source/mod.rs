//! Chapter sources for e-books.
//!
//! A book is configured as an ordered table of chapters, each naming a markdown
//! file inside the book's content directory. Loading walks the table in order
//! and renders every chapter it can read; a chapter whose file is missing (or
//! can't be read) is reported and skipped so the rest of the book still builds.

mod chapter;
mod markdown;

pub use chapter::*;
pub use markdown::render_markdown;

use indicatif::ProgressBar;
use std::io::ErrorKind;
use std::path::Path;

/// The outcome of loading a book's chapters.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Rendered chapters, in configured order
    pub units: Vec<ContentUnit>,
    /// Configured chapters that were skipped, in configured order
    pub missing: Vec<MissingChapter>,
}

impl LoadReport {
    pub fn configured(&self) -> usize {
        self.units.len() + self.missing.len()
    }
}

/// Load and render every configured chapter from `content_dir`.
pub fn load_chapters(
    content_dir: &Path,
    chapters: &[ChapterSpec],
    progress: &ProgressBar,
) -> LoadReport {
    let mut report = LoadReport::default();

    for chapter in chapters {
        progress.set_message(chapter.title.clone());
        let path = content_dir.join(chapter.file_name());

        match std::fs::read_to_string(&path) {
            Ok(markdown) => {
                report.units.push(ContentUnit {
                    id: chapter.id.clone(),
                    title: chapter.title.clone(),
                    slug: chapter.slug.clone(),
                    body: render_markdown(&markdown),
                });
                log::info!("Processed: {}", chapter.title);
            }
            Err(e) => {
                let reason = if e.kind() == ErrorKind::NotFound {
                    MissingReason::NotFound
                } else {
                    MissingReason::Unreadable(e.to_string())
                };
                let missing = MissingChapter {
                    slug: chapter.slug.clone(),
                    path,
                    reason,
                };
                log::warn!("Skipping chapter, {missing}");
                report.missing.push(missing);
            }
        }

        progress.inc(1);
    }

    report
}

#[cfg(test)]
mod test {
    use super::*;

    fn nine_chapters() -> Vec<ChapterSpec> {
        (1..=9)
            .map(|i| {
                ChapterSpec::new(
                    format!("{i:02}"),
                    format!("Capítulo {i}"),
                    format!("capitulo-{i:02}"),
                )
            })
            .collect()
    }

    #[test]
    fn can_load_present_chapters_in_order() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let chapters = nine_chapters();
        for (i, chapter) in chapters.iter().enumerate() {
            // leave out chapters 3 and 7
            if i == 2 || i == 6 {
                continue;
            }
            std::fs::write(
                dir.path().join(chapter.file_name()),
                format!("# {}\n\nbody {}", chapter.title, i),
            )
            .expect("can write chapter");
        }

        let report = load_chapters(dir.path(), &chapters, &ProgressBar::hidden());

        assert_eq!(report.units.len(), 7);
        assert_eq!(report.missing.len(), 2);
        assert_eq!(report.configured(), 9);
        let ids: Vec<&str> = report.units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["01", "02", "04", "05", "06", "08", "09"]);
        assert_eq!(report.missing[0].slug, "capitulo-03");
        assert_eq!(report.missing[1].slug, "capitulo-07");
        assert_eq!(report.missing[0].reason, MissingReason::NotFound);
    }

    #[test]
    fn renders_markdown_bodies() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let chapters = vec![ChapterSpec::new("intro", "Introducción", "introduccion")];
        std::fs::write(dir.path().join("introduccion.md"), "Hola **mundo**")
            .expect("can write chapter");

        let report = load_chapters(dir.path(), &chapters, &ProgressBar::hidden());

        assert!(report.missing.is_empty());
        assert_eq!(report.units[0].body, "<p>Hola <strong>mundo</strong></p>\n");
    }

    #[test]
    fn invalid_utf8_is_skipped() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let chapters = vec![
            ChapterSpec::new("01", "Uno", "uno"),
            ChapterSpec::new("02", "Dos", "dos"),
        ];
        std::fs::write(dir.path().join("uno.md"), [0xff, 0xfe, 0x00]).expect("can write");
        std::fs::write(dir.path().join("dos.md"), "dos").expect("can write");

        let report = load_chapters(dir.path(), &chapters, &ProgressBar::hidden());

        assert_eq!(report.units.len(), 1);
        assert_eq!(report.units[0].id, "02");
        assert!(matches!(
            report.missing[0].reason,
            MissingReason::Unreadable(_)
        ));
    }
}
