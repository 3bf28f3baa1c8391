//! The outcome of a generation run, for humans or as JSON.

use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub success: bool,
    pub message: String,
    pub path: PathBuf,
    /// Size of the artifact in bytes
    pub file_size: u64,
    pub generated_at: DateTime<Utc>,
    /// Chapters that made it into the book, absent for brochures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters_processed: Option<usize>,
    /// Where the artifact was uploaded to, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_to: Option<String>,
}

impl RunReport {
    pub fn human_size(&self) -> String {
        human_size(self.file_size)
    }

    /// Print the report: pretty JSON when `json`, otherwise a short summary.
    pub fn print(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }

        println!("{} {}", console::style("✓").green().bright(), self.message);
        println!("  Output: {}", self.path.display());
        println!("  Size:   {}", self.human_size());
        if let Some(chapters) = self.chapters_processed {
            println!("  Chapters: {chapters}");
        }
        if let Some(location) = &self.uploaded_to {
            println!("  Uploaded: {location}");
        }
        Ok(())
    }
}

pub fn human_size(bytes: u64) -> String {
    let size = Byte::from_u64(bytes).get_appropriate_unit(UnitType::Binary);
    format!("{size:.2}")
}
