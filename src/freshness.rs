//! Deciding whether an artifact needs to be regenerated, and checking that a
//! generated artifact is plausibly what it claims to be.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Smallest EPUB considered plausible; the container alone is bigger.
const MIN_EPUB_SIZE: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Epub,
    Pdf,
}

impl ArtifactKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Epub => "application/epub+zip",
            ArtifactKind::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Epub => write!(f, "EPUB"),
            ArtifactKind::Pdf => write!(f, "PDF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    ArtifactMissing,
    Modified(PathBuf),
    SourceMissing(PathBuf),
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::ArtifactMissing => write!(f, "artifact does not exist"),
            StaleReason::Modified(path) => write!(f, "{} was modified", path.display()),
            StaleReason::SourceMissing(path) => write!(f, "{} not found", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale(Vec<StaleReason>),
}

impl Freshness {
    #[cfg(test)]
    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Compare `artifact` against the files it is built from. The artifact is
/// stale when it doesn't exist, or when any source is newer or missing.
pub fn check_modifications<P: AsRef<Path>>(artifact: &Path, sources: &[P]) -> Freshness {
    let Some(built) = modified(artifact) else {
        return Freshness::Stale(vec![StaleReason::ArtifactMissing]);
    };

    let reasons: Vec<StaleReason> = sources
        .iter()
        .filter_map(|source| {
            let source = source.as_ref();
            match modified(source) {
                None => Some(StaleReason::SourceMissing(source.to_path_buf())),
                Some(time) if time > built => Some(StaleReason::Modified(source.to_path_buf())),
                Some(_) => None,
            }
        })
        .collect();

    if reasons.is_empty() {
        Freshness::Fresh
    } else {
        Freshness::Stale(reasons)
    }
}

/// Check that `path` looks like a valid artifact of `kind`, returning its
/// size in bytes.
pub fn validate_artifact(path: &Path, kind: ArtifactKind) -> Result<u64> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata of {}", path.display()))?
        .len();

    let mut magic = [0u8; 5];
    let read = std::fs::File::open(path)
        .and_then(|mut f| f.read(&mut magic))
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let magic = &magic[..read];

    match kind {
        ArtifactKind::Epub => {
            if size < MIN_EPUB_SIZE {
                bail!("{kind} is too small ({size} bytes), it is probably corrupt");
            }
            let is_zip = matches!(
                magic,
                [b'P', b'K', 0x03, 0x04, ..] | [b'P', b'K', 0x05, 0x06, ..] | [b'P', b'K', 0x07, 0x08, ..]
            );
            if !is_zip {
                bail!("{kind} is not a ZIP container");
            }
        }
        ArtifactKind::Pdf => {
            if magic != b"%PDF-" {
                bail!("{kind} does not start with a PDF header");
            }
        }
    }

    Ok(size)
}
