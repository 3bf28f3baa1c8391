use super::units::{In, Margins, Pt};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Branding printed above the title and at the end of the brochure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    /// Bold part of the header line
    pub name: String,
    /// Follows the name in the header, separated by a bar
    pub website: String,
    /// Centered lines closing the document
    #[serde(default)]
    pub footer: Vec<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Branding {
            name: "FixterGeek".to_string(),
            website: "fixtergeek.com".to_string(),
            footer: vec![
                "© 2025 FixterGeek - Todos los derechos reservados".to_string(),
                "fixtergeek.com".to_string(),
            ],
        }
    }
}

/// PDF output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PDF {
    /// Output PDF file path
    pub outfile: PathBuf,
    /// Page width in inches
    #[serde(default = "default_page_width")]
    pub page_width_in: f32,
    /// Page height in inches
    #[serde(default = "default_page_height")]
    pub page_height_in: f32,
    /// Margin on every side in inches
    #[serde(default = "default_margin")]
    pub margin_in: f32,
    #[serde(default)]
    pub branding: Branding,
}

fn default_page_width() -> f32 {
    8.5
}
fn default_page_height() -> f32 {
    11.0
}
fn default_margin() -> f32 {
    1.0
}

impl Default for PDF {
    fn default() -> Self {
        PDF {
            outfile: PathBuf::from("public/temario.pdf"),
            page_width_in: default_page_width(),
            page_height_in: default_page_height(),
            margin_in: default_margin(),
            branding: Branding::default(),
        }
    }
}

impl PDF {
    pub fn page_size(&self) -> (Pt, Pt) {
        (In(self.page_width_in).into(), In(self.page_height_in).into())
    }

    pub fn margins(&self) -> Margins {
        Margins::all(In(self.margin_in))
    }
}
