//! The standard Helvetica faces and their metrics.
//!
//! Brochures use the PDF base-14 Helvetica family so no font files have to be
//! shipped or embedded. Viewers supply the glyphs; layout needs only the
//! advance widths, which come from the Adobe AFM files (units of 1/1000 em).
//! Text is written in WinAnsiEncoding, which covers Latin-1 plus a handful of
//! typographic characters (bullet, dashes, curly quotes). Anything else, emoji
//! included, is dropped.

use super::units::Pt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Regular,
    Bold,
    Oblique,
}

/// Descender of Helvetica, in 1/1000 em.
const DESCENT: f32 = -207.0;

/// Widths of the printable ASCII range `0x20..=0x7e`.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl Face {
    pub fn all() -> &'static [Face] {
        &[Face::Regular, Face::Bold, Face::Oblique]
    }

    /// The PostScript name of the base-14 font.
    pub fn base_font(&self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
            Face::Oblique => "Helvetica-Oblique",
        }
    }

    /// The resource name the face is registered under on each page.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
            Face::Oblique => "F3",
        }
    }

    fn ascii_widths(&self) -> &'static [u16; 95] {
        match self {
            Face::Regular | Face::Oblique => &HELVETICA_WIDTHS,
            Face::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of a single character in 1/1000 em, `None` if the
    /// character can't be encoded.
    fn char_width(&self, c: char) -> Option<u16> {
        let widths = self.ascii_widths();
        let ascii = |c: char| widths[c as usize - 0x20];
        match c {
            ' '..='~' => Some(ascii(c)),
            // non-breaking space
            '\u{a0}' => Some(ascii(' ')),
            '•' => Some(350),
            '–' | 'ƒ' | '†' | '‡' => Some(556),
            '—' | '…' | '‰' | '™' | 'Œ' => Some(1000),
            'œ' => Some(944),
            'ˆ' | '˜' | '‹' | '›' => Some(333),
            '‘' | '’' | '‚' => Some(if *self == Face::Bold { 278 } else { 222 }),
            '“' | '”' | '„' => Some(if *self == Face::Bold { 500 } else { 333 }),
            '€' => Some(556),
            '¡' | '´' | '¨' | '¯' | '¸' => Some(333),
            '¿' => Some(611),
            '©' | '®' => Some(737),
            '°' => Some(400),
            '·' => Some(278),
            '«' | '»' => Some(556),
            '×' => Some(584),
            '÷' => Some(584),
            c => {
                let folded = fold_latin1(c)?;
                Some(ascii(folded))
            }
        }
    }

    pub fn width_of_char(&self, c: char, size: Pt) -> Option<Pt> {
        self.char_width(c)
            .map(|units| Pt(units as f32 * size.0 / 1000.0))
    }

    pub fn descent(&self, size: Pt) -> Pt {
        Pt(-DESCENT * size.0 / 1000.0)
    }
}

/// Width of `text` set in `face` at `size`. Characters that can't be encoded
/// don't contribute.
pub fn width_of_text(text: &str, face: Face, size: Pt) -> Pt {
    text.chars()
        .filter_map(|c| face.width_of_char(c, size))
        .fold(Pt(0.0), |total, w| total + w)
}

/// Encode `text` as WinAnsiEncoding bytes, dropping unsupported characters.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars().filter_map(encode_char).collect()
}

fn encode_char(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '€' => Some(0x80),
        '‚' => Some(0x82),
        'ƒ' => Some(0x83),
        '„' => Some(0x84),
        '…' => Some(0x85),
        '†' => Some(0x86),
        '‡' => Some(0x87),
        'ˆ' => Some(0x88),
        '‰' => Some(0x89),
        'Š' => Some(0x8a),
        '‹' => Some(0x8b),
        'Œ' => Some(0x8c),
        'Ž' => Some(0x8e),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        '˜' => Some(0x98),
        '™' => Some(0x99),
        'š' => Some(0x9a),
        '›' => Some(0x9b),
        'œ' => Some(0x9c),
        'ž' => Some(0x9e),
        'Ÿ' => Some(0x9f),
        '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        _ => None,
    }
}

/// Whether a character survives encoding.
pub fn is_encodable(c: char) -> bool {
    encode_char(c).is_some()
}

/// Map a Latin-1 letter onto the ASCII letter whose width it shares.
fn fold_latin1(c: char) -> Option<char> {
    Some(match c {
        'À'..='Å' => 'A',
        'Æ' => 'W',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'Š' => 'S',
        'Ž' => 'Z',
        'Þ' => 'P',
        'ß' => 'b',
        'à'..='å' => 'a',
        'æ' => 'm',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ð' => 'o',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        'þ' => 'p',
        c if is_encodable(c) => 'n',
        _ => return None,
    })
}
