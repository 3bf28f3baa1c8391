//! Paragraph styles of the syllabus brochure.

use super::flowable::{Alignment, BoxStyle, ParagraphStyle};
use super::fonts::Face;
use super::units::{Colour, Pt};

pub const ACCENT: &str = "#667eea";
pub const MINT: &str = "#83F3D3";
pub const INK: &str = "#2D3748";
pub const BODY: &str = "#4A5568";
pub const META: &str = "#559B8B";
pub const BONUS: &str = "#F59E0B";
pub const FOOTER: &str = "#94A3B8";
pub const WEBINAR_BACKGROUND: &str = "#F0FDF4";

fn hex(colour: &str) -> Colour {
    // the palette above is all valid hex
    Colour::from_hex(colour).unwrap_or(Colour::new_grey(0.0))
}

/// A style sized `size` with the usual 1.2 leading.
fn sized(size: f32) -> ParagraphStyle {
    ParagraphStyle {
        size: Pt(size),
        leading: Pt(size * 1.2),
        ..ParagraphStyle::default()
    }
}

#[derive(Debug, Clone)]
pub struct Styles {
    pub header: ParagraphStyle,
    pub title: ParagraphStyle,
    pub subtitle: ParagraphStyle,
    pub section: ParagraphStyle,
    pub session_title: ParagraphStyle,
    pub bonus_title: ParagraphStyle,
    pub webinar: ParagraphStyle,
    pub normal: ParagraphStyle,
    pub meta: ParagraphStyle,
    pub price: ParagraphStyle,
    pub footer: ParagraphStyle,
}

impl Default for Styles {
    fn default() -> Self {
        let session_title = ParagraphStyle {
            space_before: Pt(10.0),
            space_after: Pt(8.0),
            colour: hex(INK),
            face: Face::Bold,
            ..sized(13.0)
        };

        Styles {
            header: ParagraphStyle {
                space_after: Pt(20.0),
                colour: hex(ACCENT),
                alignment: Alignment::Center,
                ..sized(12.0)
            },
            title: ParagraphStyle {
                space_after: Pt(10.0),
                colour: hex(ACCENT),
                alignment: Alignment::Center,
                face: Face::Bold,
                ..sized(24.0)
            },
            subtitle: ParagraphStyle {
                space_after: Pt(20.0),
                colour: hex(MINT),
                alignment: Alignment::Center,
                ..sized(16.0)
            },
            section: ParagraphStyle {
                space_before: Pt(15.0),
                space_after: Pt(12.0),
                colour: hex(ACCENT),
                face: Face::Bold,
                ..sized(16.0)
            },
            bonus_title: ParagraphStyle {
                colour: hex(BONUS),
                ..session_title.clone()
            },
            session_title,
            webinar: ParagraphStyle {
                size: Pt(10.0),
                leading: Pt(14.0),
                space_after: Pt(10.0),
                colour: hex(INK),
                indent: Pt(8.0),
                boxed: Some(BoxStyle {
                    background: Some(hex(WEBINAR_BACKGROUND)),
                    border: Some((hex(MINT), Pt(1.0))),
                    padding: Pt(10.0),
                }),
                ..ParagraphStyle::default()
            },
            normal: ParagraphStyle {
                size: Pt(10.0),
                leading: Pt(12.0),
                colour: hex(BODY),
                ..ParagraphStyle::default()
            },
            meta: ParagraphStyle {
                space_after: Pt(6.0),
                colour: hex(META),
                face: Face::Oblique,
                ..sized(9.0)
            },
            price: ParagraphStyle {
                space_after: Pt(5.0),
                colour: hex(ACCENT),
                face: Face::Bold,
                ..sized(12.0)
            },
            footer: ParagraphStyle {
                colour: hex(FOOTER),
                alignment: Alignment::Center,
                ..sized(8.0)
            },
        }
    }
}
