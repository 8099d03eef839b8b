//! Standard-14 font metrics and WinAnsi text encoding.
//!
//! Only the standard PDF fonts are used, so nothing is embedded and no font
//! file can go missing at render time. Widths are in 1/1000 em, taken from
//! the Adobe core font metrics.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A standard PDF font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Helvetica / Helvetica-Bold
    #[default]
    Helvetica,
    /// Courier / Courier-Bold (monospaced)
    Courier,
}

/// Weight of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    /// Values and regular text
    Regular,
    /// Labels and the title
    Bold,
}

impl FontStyle {
    /// Resource name of the font in the page dictionary.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
        }
    }
}

impl FontFamily {
    /// PostScript name of the font.
    pub fn base_font(self, style: FontStyle) -> &'static str {
        match (self, style) {
            (FontFamily::Helvetica, FontStyle::Regular) => "Helvetica",
            (FontFamily::Helvetica, FontStyle::Bold) => "Helvetica-Bold",
            (FontFamily::Courier, FontStyle::Regular) => "Courier",
            (FontFamily::Courier, FontStyle::Bold) => "Courier-Bold",
        }
    }

    /// Advance width of one WinAnsi-encodable character, in 1/1000 em.
    pub fn char_width(self, style: FontStyle, c: char) -> u16 {
        if self == FontFamily::Courier {
            return 600;
        }
        let table = match style {
            FontStyle::Regular => &HELVETICA,
            FontStyle::Bold => &HELVETICA_BOLD,
        };
        if (' '..='~').contains(&c) {
            return table[c as usize - 32];
        }
        if let Some(width) = punctuation_width(style, c) {
            return width;
        }
        // Accented Latin letters are measured by their base letter.
        match c.nfd().next() {
            Some(base) if base != c && (' '..='~').contains(&base) => table[base as usize - 32],
            _ => 556,
        }
    }

    /// Width of `text` in points at `size` points.
    pub fn text_width(self, style: FontStyle, size: f32, text: &str) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| u32::from(self.char_width(style, c)))
            .sum();
        units as f32 * size / 1000.0
    }
}

fn punctuation_width(style: FontStyle, c: char) -> Option<u16> {
    let bold = style == FontStyle::Bold;
    let width = match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' => {
            if bold {
                278
            } else {
                222
            }
        }
        '\u{201C}' | '\u{201D}' | '\u{201E}' => {
            if bold {
                500
            } else {
                333
            }
        }
        '\u{2013}' | '\u{20AC}' | '\u{2020}' | '\u{2021}' => 556,
        '\u{2014}' | '\u{2026}' | '\u{2030}' | '\u{2122}' => 1000,
        '\u{2022}' => 350,
        '\u{00A0}' => 278,
        _ => return None,
    };
    Some(width)
}

/// Helvetica widths for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// WinAnsi code points 0x80..=0x9F. `None` marks unassigned slots.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

/// Map a character to its WinAnsi byte.
pub fn win_ansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => Some(c as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .position(|slot| *slot == Some(c))
            .map(|i| 0x80 + i as u8),
    }
}

/// Map a WinAnsi byte back to a character.
pub fn win_ansi_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WIN_ANSI_HIGH[usize::from(byte - 0x80)].unwrap_or('?'),
        _ => char::from(byte),
    }
}

/// Prepare caller text for drawing.
///
/// Composes decomposed accents (NFC), turns tabs into spaces, drops carriage
/// returns and replaces anything WinAnsi cannot express with `?`. Newlines
/// are kept for the wrapper to act on.
pub fn sanitize(text: &str) -> String {
    let mut replaced = 0usize;
    let out: String = text
        .nfc()
        .filter(|c| *c != '\r')
        .map(|c| match c {
            '\n' => '\n',
            '\t' => ' ',
            c if win_ansi_byte(c).is_some() => c,
            _ => {
                replaced += 1;
                '?'
            }
        })
        .collect();
    if replaced > 0 {
        log::warn!(
            "Replaced {} character(s) outside WinAnsi with '?' in {:?}",
            replaced,
            out
        );
    }
    out
}

/// Encode sanitized text as WinAnsi bytes.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}

/// Decode WinAnsi bytes to a string.
pub fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes.iter().map(|b| win_ansi_char(*b)).collect()
}
