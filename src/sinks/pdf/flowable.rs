//! The building blocks of a flowed document.

use super::fonts::Face;
use super::units::{colours, Colour, Pt};

/// A piece of paragraph content.
#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    Text { text: String, face: Face },
    /// Forced line break
    Break,
}

impl Run {
    pub fn regular<S: Into<String>>(text: S) -> Run {
        Run::Text {
            text: text.into(),
            face: Face::Regular,
        }
    }

    pub fn bold<S: Into<String>>(text: S) -> Run {
        Run::Text {
            text: text.into(),
            face: Face::Bold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// A background and/or border drawn around a paragraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStyle {
    pub background: Option<Colour>,
    pub border: Option<(Colour, Pt)>,
    pub padding: Pt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub size: Pt,
    pub leading: Pt,
    pub space_before: Pt,
    pub space_after: Pt,
    pub colour: Colour,
    pub alignment: Alignment,
    /// Face used by [`Flowable::paragraph`]
    pub face: Face,
    /// Extra indent on both sides, applied outside any box
    pub indent: Pt,
    pub boxed: Option<BoxStyle>,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        ParagraphStyle {
            size: Pt(10.0),
            leading: Pt(12.0),
            space_before: Pt(0.0),
            space_after: Pt(0.0),
            colour: colours::BLACK,
            alignment: Alignment::Left,
            face: Face::Regular,
            indent: Pt(0.0),
            boxed: None,
        }
    }
}

impl ParagraphStyle {
    /// Horizontal space the box and indent take from the frame on one side.
    pub(super) fn inset(&self) -> Pt {
        self.indent + self.boxed.map(|b| b.padding).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    Paragraph {
        runs: Vec<Run>,
        style: ParagraphStyle,
    },
    Spacer(Pt),
    /// Kept on a single page whenever it fits on one.
    KeepTogether(Vec<Flowable>),
}

impl Flowable {
    /// A paragraph of a single run in the style's own face.
    pub fn paragraph<S: Into<String>>(text: S, style: &ParagraphStyle) -> Flowable {
        Flowable::Paragraph {
            runs: vec![Run::Text {
                text: text.into(),
                face: style.face,
            }],
            style: style.clone(),
        }
    }

    pub fn runs(runs: Vec<Run>, style: &ParagraphStyle) -> Flowable {
        Flowable::Paragraph {
            runs,
            style: style.clone(),
        }
    }

    #[cfg(test)]
    /// All text carried by this flowable, runs joined without separators.
    pub fn text(&self) -> String {
        match self {
            Flowable::Paragraph { runs, .. } => runs
                .iter()
                .map(|run| match run {
                    Run::Text { text, .. } => text.as_str(),
                    Run::Break => "\n",
                })
                .collect(),
            Flowable::Spacer(_) => String::new(),
            Flowable::KeepTogether(items) => items
                .iter()
                .map(Flowable::text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
