use crate::extract::ExtractedRecord;
use anyhow::{Context, Result};

mod brochure;
mod config;
mod document;
mod flowable;
mod fonts;
mod layout;
mod styles;
mod units;

pub use config::*;
use document::{Document, Info};

/// Summary of a rendered brochure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub page_count: usize,
}

impl PDF {
    /// Lay out the brochure for `record` in memory.
    pub fn build(&self, record: &ExtractedRecord) -> Document {
        let story = brochure::story(record, &self.branding);
        let pages = layout::layout(&story, self.page_size(), self.margins());
        log::debug!("Laid out {} flowables on {} pages", story.len(), pages.len());

        Document {
            pages,
            info: Info {
                title: Some(record.title.clone()),
                author: Some(self.branding.name.clone()).filter(|n| !n.is_empty()),
                subject: Some(record.subtitle.clone()).filter(|s| !s.is_empty()),
                creator: Some(format!("inkpress {}", env!("CARGO_PKG_VERSION"))),
            },
        }
    }

    pub fn render(&self, record: &ExtractedRecord) -> Result<RenderStats> {
        let doc = self.build(record);

        if let Some(parent) = self.outfile.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory {}", parent.display())
                })?;
            }
        }

        let file = std::fs::File::create(&self.outfile).with_context(|| {
            format!("Failed to create output file {}", self.outfile.display())
        })?;
        let mut file = std::io::BufWriter::new(file);
        doc.write(&mut file)
            .with_context(|| "Failed to render PDF")?;

        Ok(RenderStats {
            page_count: doc.pages.len(),
        })
    }
}
