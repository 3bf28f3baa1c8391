//! Structured extraction from the workshop syllabus page.
//!
//! The syllabus is an HTML page with a fixed (but unwritten) template: a title
//! and subtitle, a row of badges, a webinar box, one `section.session` per
//! workshop session, a pricing section and a contact section. [`extract()`]
//! walks that template by tag name and class and copies each part into an
//! [`ExtractedRecord`] that the PDF brochure is laid out from.
//!
//! Extraction is best-effort: an element that isn't there leaves its field
//! empty and is noted in [`Extraction::missing`]. Callers that want a hard
//! failure instead can use [`Extraction::into_strict()`].

mod text;

pub use text::strip_symbols;

use anyhow::{bail, Context, Result};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use text::{strip_label, text_of};

/// Title used when the page has no `h1.title`.
pub const DEFAULT_TITLE: &str = "De Junior a Senior con Claude Code";

/// Everything the brochure needs, pulled out of the syllabus page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub title: String,
    pub subtitle: String,
    pub badges: Vec<String>,
    pub webinar: Webinar,
    pub sessions: Vec<SessionRecord>,
    pub pricing: Pricing,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webinar {
    pub date: String,
    pub details: Vec<String>,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub title: String,
    /// Schedule line, e.g. `Martes 19 Agosto • 2 horas • $999 MXN`
    pub meta: String,
    pub topics: Vec<String>,
    pub is_bonus: bool,
    /// Set on bonus sessions only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub options: Vec<PriceOption>,
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOption {
    pub price: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub website: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub process: Vec<String>,
}

/// A part of the page template that extraction looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    Title,
    Subtitle,
    Badges,
    Webinar,
    Sessions,
    Pricing,
    PricingIncludes,
    Contact,
}

impl Section {
    /// The selector that locates this section in the page.
    pub fn marker(&self) -> &'static str {
        match self {
            Section::Title => "h1.title",
            Section::Subtitle => "div.subtitle",
            Section::Badges => "span.badge",
            Section::Webinar => "section.webinar-box",
            Section::Sessions => "section.session",
            Section::Pricing => "section.pricing",
            Section::PricingIncludes => "section.pricing h4:contains(incluyen) ~ ul",
            Section::Contact => "section.contact-info",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (`{}`)", self, self.marker())
    }
}

/// The extracted record plus the template sections that were absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub record: ExtractedRecord,
    pub missing: Vec<Section>,
}

impl Extraction {
    /// Fail on the first missing section instead of defaulting it.
    pub fn into_strict(self) -> Result<ExtractedRecord> {
        if let Some(section) = self.missing.first() {
            bail!("Missing section {section} in syllabus page");
        }
        Ok(self.record)
    }
}

/// Read and extract the syllabus page at `path`.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    let path = path.as_ref();
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read HTML file {}", path.display()))?;
    Ok(extract(&html))
}

/// Extract the syllabus record from an HTML document.
pub fn extract(html: &str) -> Extraction {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut missing = Vec::new();

    let title = match first(root, Section::Title.marker()) {
        Some(h1) => text_of(h1),
        None => {
            missing.push(Section::Title);
            DEFAULT_TITLE.to_string()
        }
    };

    let subtitle = match first(root, Section::Subtitle.marker()) {
        Some(div) => text_of(div),
        None => {
            missing.push(Section::Subtitle);
            String::new()
        }
    };

    let badges = texts(root, Section::Badges.marker());
    if badges.is_empty() {
        missing.push(Section::Badges);
    }

    let webinar = match first(root, Section::Webinar.marker()) {
        Some(section) => extract_webinar(section),
        None => {
            missing.push(Section::Webinar);
            Webinar::default()
        }
    };

    let sessions: Vec<SessionRecord> = all(root, Section::Sessions.marker())
        .into_iter()
        .map(extract_session)
        .collect();
    if sessions.is_empty() {
        missing.push(Section::Sessions);
    }

    let pricing = match first(root, Section::Pricing.marker()) {
        Some(section) => {
            let (pricing, has_includes) = extract_pricing(section);
            if !has_includes {
                missing.push(Section::PricingIncludes);
            }
            pricing
        }
        None => {
            missing.push(Section::Pricing);
            Pricing::default()
        }
    };

    let contact = match first(root, Section::Contact.marker()) {
        Some(section) => extract_contact(section),
        None => {
            missing.push(Section::Contact);
            Contact::default()
        }
    };

    for section in &missing {
        log::debug!("Syllabus page has no {section}");
    }

    Extraction {
        record: ExtractedRecord {
            title,
            subtitle,
            badges,
            webinar,
            sessions,
            pricing,
            contact,
        },
        missing,
    }
}

fn extract_webinar(section: ElementRef<'_>) -> Webinar {
    let date = first(section, "h3").map(text_of).unwrap_or_default();
    let details = all(section, "p")
        .into_iter()
        .map(text_of)
        .filter(|text| !text.is_empty() && !text.starts_with('🎯'))
        .collect();
    let topics = first(section, "ul")
        .map(|ul| texts(ul, "li"))
        .unwrap_or_default();

    Webinar {
        date,
        details,
        topics,
    }
}

fn extract_session(section: ElementRef<'_>) -> SessionRecord {
    let is_bonus = section.value().classes().any(|class| class == "bonus");

    let title = first(section, "h3").map(text_of).unwrap_or_default();
    let meta = first(section, "div.session-meta")
        .map(text_of)
        .unwrap_or_default();
    let topics = first(section, "ul")
        .map(|ul| texts(ul, "li"))
        .unwrap_or_default();

    // the last ⚡ paragraph wins, bonus sessions without one get an empty note
    let bonus_note = is_bonus.then(|| {
        all(section, "p")
            .into_iter()
            .map(text_of)
            .filter(|text| text.contains('⚡'))
            .last()
            .unwrap_or_default()
    });

    SessionRecord {
        title,
        meta,
        topics,
        is_bonus,
        bonus_note,
    }
}

/// Returns the pricing plus whether the "included" list was found.
fn extract_pricing(section: ElementRef<'_>) -> (Pricing, bool) {
    let options = all(section, "div.price-option")
        .into_iter()
        .filter_map(|option| {
            let price = first(option, "div.price")?;
            let description = all(option, "p")
                .into_iter()
                .map(text_of)
                .collect::<Vec<_>>()
                .join(" ");
            Some(PriceOption {
                price: text_of(price),
                description,
            })
        })
        .collect();

    let includes_list = all(section, "h4")
        .into_iter()
        .find(|h4| text_of(*h4).contains("incluyen"))
        .and_then(|h4| {
            h4.next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|sibling| sibling.value().name() == "ul")
        });

    let has_includes = includes_list.is_some();
    let includes = includes_list
        .map(|ul| texts(ul, "li"))
        .unwrap_or_default();

    (Pricing { options, includes }, has_includes)
}

fn extract_contact(section: ElementRef<'_>) -> Contact {
    let mut contact = Contact::default();

    for text in all(section, "p").into_iter().map(text_of) {
        if text.contains("Website:") {
            contact.website = Some(strip_label(&text, "Website:"));
        } else if text.contains("Email:") {
            contact.email = Some(strip_label(&text, "Email:"));
        } else if text.contains("WhatsApp:") {
            contact.whatsapp = Some(strip_label(&text, "WhatsApp:"));
        }
    }

    contact.process = first(section, "ol")
        .map(|ol| texts(ol, "li"))
        .unwrap_or_default();

    contact
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("extraction selectors are valid CSS")
}

fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    scope.select(&selector(css)).next()
}

fn all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    scope.select(&selector(css)).collect()
}

fn texts(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    scope.select(&selector(css)).map(text_of).collect()
}
