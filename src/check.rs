//! The `check` command: is every configured artifact current and valid?

use crate::config::Configuration;
use crate::freshness::{check_modifications, validate_artifact, ArtifactKind, Freshness};
use crate::report::human_size;
use anyhow::{bail, Result};
use console::style;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Current { size: u64 },
    Stale(Vec<String>),
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStatus {
    pub name: String,
    pub path: PathBuf,
    pub status: Status,
}

fn status(path: &Path, kind: ArtifactKind, sources: &[PathBuf]) -> Status {
    match check_modifications(path, sources) {
        Freshness::Stale(reasons) => Status::Stale(reasons.iter().map(ToString::to_string).collect()),
        Freshness::Fresh => match validate_artifact(path, kind) {
            Ok(size) => Status::Current { size },
            Err(e) => Status::Invalid(format!("{e:#}")),
        },
    }
}

/// The status of every book and the brochure, in configuration order.
pub fn statuses(config: &Configuration) -> Vec<ArtifactStatus> {
    let mut statuses: Vec<ArtifactStatus> = config
        .books
        .iter()
        .map(|book| ArtifactStatus {
            name: book.epub.identifier.clone(),
            path: book.epub.outfile.clone(),
            status: status(&book.epub.outfile, ArtifactKind::Epub, &book.epub.source_files()),
        })
        .collect();

    if let Some(brochure) = &config.brochure {
        statuses.push(ArtifactStatus {
            name: "brochure".to_string(),
            path: brochure.pdf.outfile.clone(),
            status: status(
                &brochure.pdf.outfile,
                ArtifactKind::Pdf,
                std::slice::from_ref(&brochure.input),
            ),
        });
    }

    statuses
}

pub fn run(config: &Configuration) -> Result<()> {
    let statuses = statuses(config);
    if statuses.is_empty() {
        println!("Nothing is configured.");
        return Ok(());
    }

    let mut outdated = 0;
    for artifact in statuses.iter() {
        match &artifact.status {
            Status::Current { size } => println!(
                "{} {} up to date ({}, {})",
                style("✓").green().bright(),
                style(&artifact.name).bold(),
                artifact.path.display(),
                human_size(*size)
            ),
            Status::Stale(reasons) => {
                outdated += 1;
                println!(
                    "{} {} needs regenerating",
                    style("•").yellow().bright(),
                    style(&artifact.name).bold()
                );
                for reason in reasons {
                    println!("    {reason}");
                }
            }
            Status::Invalid(reason) => {
                outdated += 1;
                println!(
                    "{} {} is not valid: {reason}",
                    style("✗").red().bright(),
                    style(&artifact.name).bold()
                );
            }
        }
    }

    if outdated > 0 {
        bail!("{outdated} of {} artifacts need regenerating", statuses.len());
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unbuilt_artifacts_are_stale() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("inkpress.toml");
        std::fs::write(&path, Configuration::example()).expect("can write config");
        let config = Configuration::load(&path).expect("can load config");

        let statuses = statuses(&config);
        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses[0].name, "claude-code");
        assert_eq!(statuses[2].name, "brochure");
        for s in statuses.iter() {
            assert_eq!(s.status, Status::Stale(vec!["artifact does not exist".to_string()]));
        }
        assert!(run(&config).is_err());
    }

    #[test]
    fn corrupt_artifact_is_invalid() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let input = dir.path().join("temario.html");
        std::fs::write(&input, "<html></html>").expect("can write page");
        std::fs::write(
            dir.path().join("inkpress.toml"),
            "[brochure]\ninput = \"temario.html\"\noutfile = \"temario.pdf\"\n",
        )
        .expect("can write config");
        std::fs::write(dir.path().join("temario.pdf"), "not a pdf").expect("can write pdf");

        let config =
            Configuration::load(dir.path().join("inkpress.toml")).expect("can load config");
        let statuses = statuses(&config);
        assert!(matches!(statuses[0].status, Status::Invalid(_)));
    }
}
