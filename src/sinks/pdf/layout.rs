//! Flow layout: turns a story of [`Flowable`]s into positioned [`Page`]s.

use super::document::{BoxLayout, ContentBox, Page, SpanLayout};
use super::flowable::{Alignment, Flowable, ParagraphStyle, Run};
use super::fonts::{width_of_text, Face};
use super::units::{Margins, Pt};

/// A word, possibly made of fragments in different faces ("**Fecha:**x").
type Word = Vec<(String, Face)>;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(Word),
    Break,
}

/// One laid out line: the fragments to draw left to right and their width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub fragments: Vec<(String, Face)>,
    pub width: Pt,
}

impl Line {
    fn push(&mut self, text: &str, face: Face, size: Pt) {
        self.width += width_of_text(text, face, size);
        match self.fragments.last_mut() {
            Some((last, last_face)) if *last_face == face => last.push_str(text),
            _ => self.fragments.push((text.to_string(), face)),
        }
    }

    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        self.fragments.iter().map(|(t, _)| t.as_str()).collect()
    }
}

fn tokenise(runs: &[Run]) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::default();
    let mut in_word = false;

    for run in runs {
        match run {
            Run::Break => {
                tokens.push(Token::Break);
                in_word = false;
            }
            Run::Text { text, face } => {
                for c in text.chars() {
                    if c.is_whitespace() {
                        in_word = false;
                        continue;
                    }
                    if !in_word {
                        tokens.push(Token::Word(Vec::default()));
                        in_word = true;
                    }
                    if let Some(Token::Word(word)) = tokens.last_mut() {
                        match word.last_mut() {
                            Some((fragment, fragment_face)) if fragment_face == face => {
                                fragment.push(c)
                            }
                            _ => word.push((c.to_string(), *face)),
                        }
                    }
                }
            }
        }
    }

    tokens
}

fn word_width(word: &Word, size: Pt) -> Pt {
    word.iter()
        .fold(Pt(0.0), |w, (text, face)| w + width_of_text(text, *face, size))
}

/// Greedy word wrap of `runs` into lines no wider than `width`. Words wider
/// than a whole line are broken between characters.
pub fn wrap(runs: &[Run], size: Pt, width: Pt) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::default();
    let mut line = Line::default();

    for token in tokenise(runs) {
        let word = match token {
            Token::Break => {
                lines.push(std::mem::take(&mut line));
                continue;
            }
            Token::Word(word) => word,
        };

        let face = word.first().map(|(_, f)| *f).unwrap_or(Face::Regular);
        let space = width_of_text(" ", face, size);
        let needed = word_width(&word, size);

        if !line.is_empty() && line.width + space + needed <= width {
            line.push(" ", face, size);
            for (text, face) in word.iter() {
                line.push(text, *face, size);
            }
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }

        if needed <= width {
            for (text, face) in word.iter() {
                line.push(text, *face, size);
            }
            continue;
        }

        // too wide for any line, break it wherever it overflows
        for (text, face) in word.iter() {
            for c in text.chars() {
                let mut buf = [0u8; 4];
                let c = c.encode_utf8(&mut buf);
                let w = width_of_text(c, *face, size);
                if !line.is_empty() && line.width + w > width {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(c, *face, size);
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

struct Frame {
    page_size: (Pt, Pt),
    margins: Margins,
    content_box: ContentBox,
    pages: Vec<Page>,
    /// Top of the free space on the current page
    y: Pt,
    at_top: bool,
}

impl Frame {
    fn new(page_size: (Pt, Pt), margins: Margins) -> Frame {
        let first = Page::new(page_size, Some(margins));
        let content_box = first.content_box;
        Frame {
            page_size,
            margins,
            content_box,
            pages: vec![first],
            y: content_box.y2,
            at_top: true,
        }
    }

    fn new_page(&mut self) {
        let page = Page::new(self.page_size, Some(self.margins));
        self.y = page.content_box.y2;
        self.pages.push(page);
        self.at_top = true;
    }

    fn page(&mut self) -> &mut Page {
        // a frame always holds at least one page
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn bottom(&self) -> Pt {
        self.content_box.y1
    }

    fn full_height(&self) -> Pt {
        self.content_box.height()
    }

    fn left(&self) -> Pt {
        self.content_box.x1
    }

    fn width(&self) -> Pt {
        self.content_box.width()
    }

    fn add(&mut self, flowable: &Flowable) {
        match flowable {
            Flowable::Spacer(height) => {
                self.y -= *height;
                if self.y < self.bottom() {
                    self.new_page();
                }
            }
            Flowable::Paragraph { runs, style } => self.add_paragraph(runs, style),
            Flowable::KeepTogether(items) => {
                let height = items
                    .iter()
                    .fold(Pt(0.0), |h, item| h + self.measure(item));
                if !self.at_top
                    && height > self.y - self.bottom()
                    && height <= self.full_height()
                {
                    self.new_page();
                }
                for item in items {
                    self.add(item);
                }
            }
        }
    }

    /// Height a flowable takes when placed below other content.
    fn measure(&self, flowable: &Flowable) -> Pt {
        match flowable {
            Flowable::Spacer(height) => *height,
            Flowable::Paragraph { runs, style } => {
                let lines = wrap(runs, style.size, self.width() - style.inset() * 2.0);
                if lines.is_empty() {
                    return Pt(0.0);
                }
                let padding = style.boxed.map(|b| b.padding).unwrap_or_default();
                style.space_before
                    + style.leading * lines.len() as f32
                    + padding * 2.0
                    + style.space_after
            }
            Flowable::KeepTogether(items) => items
                .iter()
                .fold(Pt(0.0), |h, item| h + self.measure(item)),
        }
    }

    fn add_paragraph(&mut self, runs: &[Run], style: &ParagraphStyle) {
        let text_width = self.width() - style.inset() * 2.0;
        let lines = wrap(runs, style.size, text_width);
        if lines.is_empty() {
            return;
        }

        if !self.at_top {
            self.y -= style.space_before;
        }

        let padding = style.boxed.map(|b| b.padding).unwrap_or_default();
        let mut remaining: &[Line] = &lines;
        while !remaining.is_empty() {
            let available = self.y - self.bottom() - padding * 2.0;
            let mut fit = (available.0 / style.leading.0).floor().max(0.0) as usize;
            if fit == 0 {
                if self.at_top {
                    // taller than a page, overflow rather than loop forever
                    fit = 1;
                } else {
                    self.new_page();
                    continue;
                }
            }

            let take = fit.min(remaining.len());
            let (segment, rest) = remaining.split_at(take);
            self.place_lines(segment, style, padding, text_width);
            remaining = rest;
            if !remaining.is_empty() {
                self.new_page();
            }
        }

        self.y -= style.space_after;
    }

    fn place_lines(&mut self, lines: &[Line], style: &ParagraphStyle, padding: Pt, text_width: Pt) {
        let top = self.y;
        let height = style.leading * lines.len() as f32 + padding * 2.0;

        if let Some(boxed) = style.boxed {
            let x = self.left() + style.indent;
            let width = self.width() - style.indent * 2.0;
            self.page().add_box(BoxLayout {
                origin: (x, top - height),
                width,
                height,
                fill: boxed.background,
                stroke: boxed.border,
            });
        }

        let descent = Face::Regular.descent(style.size);
        let x_left = self.left() + style.inset();
        let mut line_top = top - padding;
        for line in lines {
            let baseline = line_top - style.leading + descent;
            let mut x = match style.alignment {
                Alignment::Left => x_left,
                Alignment::Center => x_left + (text_width - line.width).max(Pt(0.0)) / 2.0,
            };
            for (text, face) in line.fragments.iter() {
                let width = width_of_text(text, *face, style.size);
                self.page().add_span(SpanLayout {
                    text: text.clone(),
                    face: *face,
                    size: style.size,
                    colour: style.colour,
                    coords: (x, baseline),
                });
                x += width;
            }
            line_top -= style.leading;
        }

        self.y = top - height;
        self.at_top = false;
    }
}

/// Lay out `story` on pages of `page_size` with `margins`. There is always at
/// least one page.
pub fn layout(story: &[Flowable], page_size: (Pt, Pt), margins: Margins) -> Vec<Page> {
    let mut frame = Frame::new(page_size, margins);
    for flowable in story {
        frame.add(flowable);
    }
    frame.pages
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sinks::pdf::document::Mark;
    use crate::sinks::pdf::flowable::BoxStyle;
    use crate::sinks::pdf::units::{colours, pagesize, Colour};

    fn margins() -> Margins {
        Margins::all(Pt(72.0))
    }

    #[test]
    fn can_wrap_words() {
        let runs = vec![Run::regular("uno dos tres cuatro cinco seis siete ocho")];
        let lines = wrap(&runs, Pt(10.0), Pt(60.0));
        assert!(lines.len() > 1);
        for line in lines.iter() {
            assert!(line.width <= Pt(60.0));
        }
        let joined: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(joined.join(" "), "uno dos tres cuatro cinco seis siete ocho");
    }

    #[test]
    fn can_break_lines() {
        let runs = vec![
            Run::bold("Fecha:"),
            Run::regular(" lunes"),
            Run::Break,
            Run::regular("19:00"),
        ];
        let lines = wrap(&runs, Pt(10.0), Pt(400.0));
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].fragments,
            vec![
                ("Fecha:".to_string(), Face::Bold),
                (" lunes".to_string(), Face::Regular)
            ]
        );
        assert_eq!(lines[1].text(), "19:00");
    }

    #[test]
    fn can_split_overlong_words() {
        let runs = vec![Run::regular("a".repeat(200))];
        let lines = wrap(&runs, Pt(10.0), Pt(100.0));
        assert!(lines.len() > 1);
        let total: usize = lines.iter().map(|l| l.text().len()).sum();
        assert_eq!(total, 200);
    }

    #[test]
    fn can_flow_onto_new_pages() {
        let style = ParagraphStyle::default();
        let story: Vec<Flowable> = (0..200)
            .map(|i| Flowable::paragraph(format!("Parrafo {i}"), &style))
            .collect();
        let pages = layout(&story, pagesize::LETTER, margins());
        // 648pt of content at 12pt per line is 54 lines a page
        assert_eq!(pages.len(), 4);
        for page in pages.iter() {
            for mark in page.marks.iter() {
                if let Mark::Span(span) = mark {
                    assert!(span.coords.1 >= Pt(72.0));
                    assert!(span.coords.1 <= Pt(720.0));
                }
            }
        }
    }

    #[test]
    fn keep_together_moves_to_next_page() {
        let style = ParagraphStyle::default();
        let mut story: Vec<Flowable> = (0..50)
            .map(|i| Flowable::paragraph(format!("Linea {i}"), &style))
            .collect();
        story.push(Flowable::KeepTogether(
            (0..10)
                .map(|i| Flowable::paragraph(format!("Sesion {i}"), &style))
                .collect(),
        ));
        let pages = layout(&story, pagesize::LETTER, margins());
        assert_eq!(pages.len(), 2);
        let second: Vec<&str> = pages[1].text().collect();
        assert_eq!(second.first(), Some(&"Sesion 0"));
        assert_eq!(second.len(), 10);
    }

    #[test]
    fn oversized_keep_together_flows_normally() {
        let style = ParagraphStyle::default();
        let mut story = vec![Flowable::paragraph("Antes", &style)];
        story.push(Flowable::KeepTogether(
            (0..100)
                .map(|i| Flowable::paragraph(format!("Linea {i}"), &style))
                .collect(),
        ));
        let pages = layout(&story, pagesize::LETTER, margins());
        let first: Vec<&str> = pages[0].text().collect();
        assert_eq!(first[0], "Antes");
        assert_eq!(first[1], "Linea 0");
    }

    #[test]
    fn can_center_lines() {
        let style = ParagraphStyle {
            alignment: Alignment::Center,
            ..ParagraphStyle::default()
        };
        let pages = layout(
            &[Flowable::paragraph("Hi", &style)],
            pagesize::LETTER,
            margins(),
        );
        let Mark::Span(span) = &pages[0].marks[0] else {
            panic!("expected a span");
        };
        let expected = 72.0 + (468.0 - width_of_text("Hi", Face::Regular, Pt(10.0)).0) / 2.0;
        assert!((span.coords.0 .0 - expected).abs() < 1e-3);
    }

    #[test]
    fn boxes_are_drawn_behind_text() {
        let style = ParagraphStyle {
            boxed: Some(BoxStyle {
                background: Some(Colour::new_grey(1.0)),
                border: Some((colours::BLACK, Pt(1.0))),
                padding: Pt(10.0),
            }),
            ..ParagraphStyle::default()
        };
        let pages = layout(
            &[Flowable::paragraph("En caja", &style)],
            pagesize::LETTER,
            margins(),
        );
        let Mark::Box(layout) = &pages[0].marks[0] else {
            panic!("expected the box first");
        };
        assert_eq!(layout.height, Pt(32.0));
        assert!(matches!(pages[0].marks[1], Mark::Span(_)));
    }

    #[test]
    fn empty_story_has_one_page() {
        let pages = layout(&[], pagesize::LETTER, margins());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].marks.is_empty());
    }
}
