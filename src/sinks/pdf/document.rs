//! Pages of positioned marks and their serialisation with `pdf-writer`.
//!
//! Layout places text spans and boxes at absolute coordinates on a [`Page`];
//! a [`Document`] is the ordered list of pages plus the info dictionary.
//! Coordinates follow PDF convention: origin at the bottom left, y upwards,
//! span coordinates are the start of the text baseline.

use super::fonts::{self, Face};
use super::units::{Colour, Margins, Pt};
use anyhow::{Context, Result};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use std::collections::HashMap;
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct SpanLayout {
    pub text: String,
    pub face: Face,
    pub size: Pt,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    /// Bottom left corner
    pub origin: (Pt, Pt),
    pub width: Pt,
    pub height: Pt,
    pub fill: Option<Colour>,
    pub stroke: Option<(Colour, Pt)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Span(SpanLayout),
    Box(BoxLayout),
}

/// The printable area of a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBox {
    pub x1: Pt,
    pub y1: Pt,
    pub x2: Pt,
    pub y2: Pt,
}

impl ContentBox {
    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub size: (Pt, Pt),
    pub content_box: ContentBox,
    pub marks: Vec<Mark>,
}

impl Page {
    pub fn new(size: (Pt, Pt), margins: Option<Margins>) -> Page {
        let margins = margins.unwrap_or_else(|| Margins::all(Pt(0.0)));
        Page {
            size,
            content_box: ContentBox {
                x1: margins.left,
                y1: margins.bottom,
                x2: size.0 - margins.right,
                y2: size.1 - margins.top,
            },
            marks: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.marks.push(Mark::Span(span));
    }

    pub fn add_box(&mut self, layout: BoxLayout) {
        self.marks.push(Mark::Box(layout));
    }

    #[cfg(test)]
    /// All text placed on the page, in placement order.
    pub fn text(&self) -> impl Iterator<Item = &str> {
        self.marks.iter().filter_map(|mark| match mark {
            Mark::Span(span) => Some(span.text.as_str()),
            Mark::Box(_) => None,
        })
    }

    fn render_content(&self) -> Vec<u8> {
        let mut content = Content::new();

        for mark in self.marks.iter() {
            match mark {
                Mark::Box(layout) => {
                    content.save_state();
                    if let Some(fill) = layout.fill {
                        content.set_fill_rgb(fill.r, fill.g, fill.b);
                    }
                    if let Some((stroke, width)) = layout.stroke {
                        content.set_stroke_rgb(stroke.r, stroke.g, stroke.b);
                        content.set_line_width(width.0);
                    }
                    content.rect(
                        layout.origin.0 .0,
                        layout.origin.1 .0,
                        layout.width.0,
                        layout.height.0,
                    );
                    match (layout.fill.is_some(), layout.stroke.is_some()) {
                        (true, true) => content.fill_nonzero_and_stroke(),
                        (true, false) => content.fill_nonzero(),
                        (false, true) => content.stroke(),
                        (false, false) => content.end_path(),
                    };
                    content.restore_state();
                }
                Mark::Span(span) => {
                    let encoded = fonts::encode(&span.text);
                    if encoded.is_empty() {
                        continue;
                    }
                    content
                        .begin_text()
                        .set_font(Name(span.face.resource_name().as_bytes()), span.size.0)
                        .set_fill_rgb(span.colour.r, span.colour.g, span.colour.b)
                        .next_line(span.coords.0 .0, span.coords.1 .0)
                        .show(Str(&encoded))
                        .end_text();
                }
            }
        }

        content.finish()
    }
}

/// Document information dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct Info {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

#[derive(Debug, Default)]
pub struct Document {
    pub pages: Vec<Page>,
    pub info: Info,
}

impl Document {
    /// Serialise the document as PDF bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let page_tree_id = alloc.bump();
        let info_id = alloc.bump();

        let font_ids: HashMap<Face, Ref> = Face::all()
            .iter()
            .map(|face| (*face, alloc.bump()))
            .collect();
        let page_ids: Vec<(Ref, Ref)> = self
            .pages
            .iter()
            .map(|_| (alloc.bump(), alloc.bump()))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);

        for (face, id) in font_ids.iter() {
            pdf.type1_font(*id)
                .base_font(Name(face.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (page, (page_id, content_id)) in self.pages.iter().zip(page_ids.iter()) {
            {
                let mut writer = pdf.page(*page_id);
                writer.media_box(Rect::new(0.0, 0.0, page.size.0 .0, page.size.1 .0));
                writer.parent(page_tree_id);
                writer.contents(*content_id);
                let mut resources = writer.resources();
                let mut fonts = resources.fonts();
                for face in Face::all() {
                    fonts.pair(Name(face.resource_name().as_bytes()), font_ids[face]);
                }
            }
            pdf.stream(*content_id, &page.render_content());
        }

        {
            let mut info = pdf.document_info(info_id);
            if let Some(title) = &self.info.title {
                info.title(TextStr(title));
            }
            if let Some(author) = &self.info.author {
                info.author(TextStr(author));
            }
            if let Some(subject) = &self.info.subject {
                info.subject(TextStr(subject));
            }
            if let Some(creator) = &self.info.creator {
                info.creator(TextStr(creator));
            }
        }

        pdf.finish()
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer
            .write_all(&self.to_bytes())
            .with_context(|| "Failed to write PDF bytes")?;
        writer.flush().with_context(|| "Failed to flush PDF output")
    }
}
