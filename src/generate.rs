//! The `epub` and `pdf` commands: regenerate what changed, validate it, and
//! optionally publish it.

use crate::cli::{EpubArgs, PdfArgs};
use crate::config::{BookConfig, BrochureConfig, Configuration};
use crate::extract;
use crate::freshness::{check_modifications, validate_artifact, ArtifactKind, Freshness};
use crate::report::RunReport;
use crate::source::load_chapters;
use crate::upload::{self, Credentials, UploadTarget};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress
}

/// Credentials for every selected target, checked before any work starts.
fn upload_credentials<'a, I>(enabled: bool, targets: I) -> Result<Option<Credentials>>
where
    I: IntoIterator<Item = (&'a str, Option<&'a UploadTarget>)>,
{
    if !enabled {
        return Ok(None);
    }
    for (name, target) in targets {
        if target.is_none() {
            bail!("`{name}` has no upload target configured");
        }
    }
    Credentials::from_env().map(Some)
}

fn modified_at(path: &Path) -> DateTime<Utc> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

/// The report for an artifact that didn't need regenerating, or `None` if it
/// does.
fn up_to_date(
    path: &Path,
    kind: ArtifactKind,
    sources: &[std::path::PathBuf],
    force: bool,
) -> Option<RunReport> {
    if force {
        log::debug!("Forcing regeneration of {}", path.display());
        return None;
    }

    match check_modifications(path, sources) {
        Freshness::Stale(reasons) => {
            for reason in reasons {
                log::info!("Regenerating {}: {reason}", path.display());
            }
            None
        }
        Freshness::Fresh => match validate_artifact(path, kind) {
            Ok(file_size) => Some(RunReport {
                success: true,
                message: format!("{kind} is up to date, nothing to regenerate"),
                path: path.to_path_buf(),
                file_size,
                generated_at: modified_at(path),
                chapters_processed: None,
                uploaded_to: None,
            }),
            Err(e) => {
                log::warn!("Existing {kind} is not valid, regenerating: {e:#}");
                None
            }
        },
    }
}

fn publish(
    report: &mut RunReport,
    kind: ArtifactKind,
    target: Option<&UploadTarget>,
    credentials: Option<&Credentials>,
) -> Result<()> {
    let (Some(target), Some(credentials)) = (target, credentials) else {
        return Ok(());
    };
    let uploaded = upload::upload(&report.path, kind, target, credentials)?;
    log::info!("Uploaded to {uploaded}");
    report.uploaded_to = Some(uploaded.to_string());
    Ok(())
}

fn print_reports(reports: &[RunReport], json: bool) -> Result<()> {
    match reports {
        [report] => report.print(json),
        reports if json => {
            println!("{}", serde_json::to_string_pretty(reports)?);
            Ok(())
        }
        reports => reports.iter().try_for_each(|r| r.print(false)),
    }
}

pub fn epub(config: &Configuration, args: &EpubArgs, show_progress: bool) -> Result<()> {
    let books: Vec<&BookConfig> = match &args.book {
        Some(identifier) => vec![config.find(identifier)?],
        None => config.books.iter().collect(),
    };
    if books.is_empty() {
        bail!("No books are configured");
    }

    let credentials = upload_credentials(
        args.upload,
        books
            .iter()
            .map(|b| (b.epub.identifier.as_str(), b.upload.as_ref())),
    )?;

    let mut reports = Vec::with_capacity(books.len());
    for book in books {
        let mut report = render_book(book, args.force, show_progress && !args.json)
            .with_context(|| format!("Failed to generate book `{}`", book.epub.identifier))?;
        if args.upload {
            publish(
                &mut report,
                ArtifactKind::Epub,
                book.upload.as_ref(),
                credentials.as_ref(),
            )?;
        }
        reports.push(report);
    }

    print_reports(&reports, args.json)
}

fn render_book(book: &BookConfig, force: bool, show_progress: bool) -> Result<RunReport> {
    let epub = &book.epub;
    let sources = epub.source_files();

    if let Some(mut report) = up_to_date(&epub.outfile, ArtifactKind::Epub, &sources, force) {
        report.chapters_processed = Some(epub.chapters.len());
        return Ok(report);
    }

    log::info!("Generating {}", epub.title);
    let progress = progress_bar(epub.chapters.len(), show_progress);
    progress.set_message("Loading chapters...");
    let loaded = load_chapters(&epub.content_dir, &epub.chapters, &progress);
    if loaded.units.is_empty() {
        progress.abandon();
        bail!(
            "None of the {} configured chapters could be read from {}",
            loaded.configured(),
            epub.content_dir.display()
        );
    }

    let stats = epub
        .render(&loaded, &progress)
        .with_context(|| "Failed to render EPUB")?;
    log::debug!(
        "Wrote {} documents ({} chapters, cover: {})",
        stats.document_count,
        stats.chapter_count,
        stats.cover
    );

    let file_size = validate_artifact(&epub.outfile, ArtifactKind::Epub)
        .with_context(|| "EPUB was generated but is not valid")?;

    let message = if loaded.missing.is_empty() {
        "EPUB generated".to_string()
    } else {
        format!(
            "EPUB generated, {} of {} chapters skipped",
            loaded.missing.len(),
            loaded.configured()
        )
    };

    Ok(RunReport {
        success: true,
        message,
        path: epub.outfile.clone(),
        file_size,
        generated_at: Utc::now(),
        chapters_processed: Some(stats.chapter_count),
        uploaded_to: None,
    })
}

pub fn pdf(config: &Configuration, args: &PdfArgs) -> Result<()> {
    let brochure: &BrochureConfig = config
        .brochure
        .as_ref()
        .ok_or_else(|| anyhow!("No [brochure] is configured"))?;

    let credentials = upload_credentials(
        args.upload,
        [("brochure", brochure.upload.as_ref())],
    )?;

    let mut report = render_brochure(brochure, args.strict || brochure.strict, args.force)?;
    if args.upload {
        publish(
            &mut report,
            ArtifactKind::Pdf,
            brochure.upload.as_ref(),
            credentials.as_ref(),
        )?;
    }

    report.print(args.json)
}

fn render_brochure(brochure: &BrochureConfig, strict: bool, force: bool) -> Result<RunReport> {
    let outfile = &brochure.pdf.outfile;
    if let Some(report) = up_to_date(
        outfile,
        ArtifactKind::Pdf,
        std::slice::from_ref(&brochure.input),
        force,
    ) {
        return Ok(report);
    }

    let extraction = extract::extract_file(&brochure.input)?;
    let record = if strict {
        extraction.into_strict()?
    } else {
        if !extraction.missing.is_empty() {
            let missing = extraction
                .missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            log::warn!("Sections missing from the page, left empty: {missing}");
        }
        extraction.record
    };

    let stats = brochure
        .pdf
        .render(&record)
        .with_context(|| "Failed to render brochure")?;
    let file_size = validate_artifact(outfile, ArtifactKind::Pdf)
        .with_context(|| "PDF was generated but is not valid")?;

    Ok(RunReport {
        success: true,
        message: format!("PDF generated ({} pages)", stats.page_count),
        path: outfile.clone(),
        file_size,
        generated_at: Utc::now(),
        chapters_processed: None,
        uploaded_to: None,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::extract::test::SYLLABUS;

    fn configuration(dir: &Path, chapters: &[(&str, Option<&str>)]) -> Configuration {
        let content = dir.join("content");
        std::fs::create_dir_all(&content).expect("can create content dir");
        let mut table = String::new();
        for (slug, body) in chapters {
            table.push_str(&format!(
                "    {{ id = \"{slug}\", title = \"Capítulo {slug}\", slug = \"{slug}\" }},\n"
            ));
            if let Some(body) = body {
                std::fs::write(content.join(format!("{slug}.md")), body).expect("can write");
            }
        }
        std::fs::write(dir.join("temario.html"), SYLLABUS).expect("can write page");

        let toml = format!(
            r#"
[[book]]
identifier = "libro"
title = "Libro"
content_dir = "content"
outfile = "public/libro.epub"
chapters = [
{table}]

[brochure]
input = "temario.html"
outfile = "public/temario.pdf"
"#
        );
        let path = dir.join("inkpress.toml");
        std::fs::write(&path, toml).expect("can write config");
        Configuration::load(&path).expect("can load config")
    }

    #[test]
    fn can_render_then_skip_fresh_book() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = configuration(
            dir.path(),
            &[("uno", Some("# Uno")), ("dos", Some("# Dos"))],
        );
        let book = &config.books[0];

        let report = render_book(book, false, false).expect("can render book");
        assert_eq!(report.message, "EPUB generated");
        assert_eq!(report.chapters_processed, Some(2));
        assert!(report.file_size >= 1000);

        let again = render_book(book, false, false).expect("can check book");
        assert!(again.message.contains("up to date"));
        assert_eq!(again.file_size, report.file_size);

        let forced = render_book(book, true, false).expect("can force book");
        assert_eq!(forced.message, "EPUB generated");
    }

    #[test]
    fn missing_chapters_are_reported_not_fatal() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = configuration(dir.path(), &[("uno", Some("# Uno")), ("dos", None)]);

        let report = render_book(&config.books[0], false, false).expect("can render book");
        assert_eq!(report.chapters_processed, Some(1));
        assert!(report.message.contains("1 of 2 chapters skipped"));
    }

    #[test]
    fn book_without_any_chapter_fails() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = configuration(dir.path(), &[("uno", None)]);
        assert!(render_book(&config.books[0], false, false).is_err());
        assert!(!config.books[0].epub.outfile.exists());
    }

    #[test]
    fn can_render_brochure() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = configuration(dir.path(), &[]);
        let brochure = config.brochure.as_ref().expect("has brochure");

        let report = render_brochure(brochure, true, false).expect("can render brochure");
        assert!(report.message.starts_with("PDF generated"));
        assert!(report.chapters_processed.is_none());

        let again = render_brochure(brochure, true, false).expect("can check brochure");
        assert!(again.message.contains("up to date"));
    }

    #[test]
    fn strict_brochure_rejects_incomplete_page() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = configuration(dir.path(), &[]);
        let brochure = config.brochure.as_ref().expect("has brochure");
        std::fs::write(&brochure.input, "<html><body><h1 class=\"title\">T</h1></body></html>")
            .expect("can write page");

        assert!(render_brochure(brochure, true, true).is_err());
        let report = render_brochure(brochure, false, true).expect("best effort renders");
        assert!(report.file_size > 0);
    }

    #[test]
    fn upload_requires_targets() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = configuration(dir.path(), &[("uno", Some("# Uno"))]);
        let err = upload_credentials(
            true,
            config
                .books
                .iter()
                .map(|b| (b.epub.identifier.as_str(), b.upload.as_ref())),
        )
        .expect_err("no target configured");
        assert!(err.to_string().contains("`libro` has no upload target"));
        assert!(upload_credentials(
            false,
            std::iter::empty::<(&str, Option<&UploadTarget>)>()
        )
            .expect("disabled upload needs nothing")
            .is_none());
    }
}
