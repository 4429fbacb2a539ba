//! Font metrics for the standard PDF Type1 fonts used by the exporter.
//!
//! Text is measured with the Adobe Helvetica AFM advance widths, expressed in
//! 1/1000 em, over the WinAnsi code page. The renderer emits the same fonts
//! with `WinAnsiEncoding`, so what the layout measures is what the viewer draws.

use folio_types::{MM_TO_PT, RunStyle};

/// One of the three font faces the exporter draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontVariant {
    Regular,
    Bold,
    Oblique,
}

impl FontVariant {
    pub const ALL: [FontVariant; 3] = [FontVariant::Regular, FontVariant::Bold, FontVariant::Oblique];

    pub fn for_style(style: RunStyle) -> Self {
        match style {
            RunStyle::Normal => FontVariant::Regular,
            RunStyle::Bold => FontVariant::Bold,
            RunStyle::Italic => FontVariant::Oblique,
        }
    }

    /// The PostScript name of the standard font backing this variant.
    pub fn postscript_name(self) -> &'static str {
        match self {
            FontVariant::Regular => "Helvetica",
            FontVariant::Bold => "Helvetica-Bold",
            FontVariant::Oblique => "Helvetica-Oblique",
        }
    }

    /// The resource name used inside page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontVariant::Regular => "F1",
            FontVariant::Bold => "F2",
            FontVariant::Oblique => "F3",
        }
    }
}

/// A source of glyph advance widths.
pub trait FontMetrics: Send + Sync {
    /// Advance width of a WinAnsi-encoded byte, in 1/1000 em.
    fn advance(&self, variant: FontVariant, code: u8) -> u16;

    /// Width of `text` at `size_pt`, in millimetres.
    fn text_width(&self, text: &str, variant: FontVariant, size_pt: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|code| u32::from(self.advance(variant, code)))
            .sum();
        units as f32 / 1000.0 * size_pt / MM_TO_PT
    }
}

/// Metrics of the built-in Helvetica family.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFontMetrics;

const DEFAULT_ADVANCE: u16 = 556;

// Code points 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' .. '9'
    278, 278, 584, 584, 584, 556, 1015, // ':' .. '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' .. 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' .. 'Z'
    278, 278, 278, 469, 556, 333, // '[' .. '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' .. 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' .. 'z'
    334, 260, 334, 584, // '{' .. '~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

impl FontMetrics for StandardFontMetrics {
    fn advance(&self, variant: FontVariant, code: u8) -> u16 {
        let bold = variant == FontVariant::Bold;
        match code {
            0x20..=0x7E => {
                let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
                table[usize::from(code - 0x20)]
            }
            0x95 => 350,
            0xA0 => 278,
            0x85 | 0x97 | 0x89 => 1000,
            0x91 | 0x92 => {
                if bold {
                    278
                } else {
                    222
                }
            }
            0x93 | 0x94 => {
                if bold {
                    500
                } else {
                    333
                }
            }
            _ => DEFAULT_ADVANCE,
        }
    }
}

/// Encodes `text` into the WinAnsi code page. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_code).collect()
}

fn win_ansi_code(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flowchart_heading_width_matches_afm() {
        // F-l-o-w-c-h-a-r-t in Helvetica-Bold: 611+278+611+778+556+611+556+389+333
        let width = StandardFontMetrics.text_width("Flowchart", FontVariant::Bold, 16.0);
        let expected = 4723.0 / 1000.0 * 16.0 / MM_TO_PT;
        assert!((width - expected).abs() < 1e-4, "{width} vs {expected}");
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let text = "The quick brown fox";
        let regular = StandardFontMetrics.text_width(text, FontVariant::Regular, 12.0);
        let bold = StandardFontMetrics.text_width(text, FontVariant::Bold, 12.0);
        let oblique = StandardFontMetrics.text_width(text, FontVariant::Oblique, 12.0);
        assert!(bold > regular);
        assert_eq!(regular, oblique);
    }

    #[test]
    fn bullet_and_unmappable_characters_are_encoded() {
        assert_eq!(encode_win_ansi("• a"), vec![0x95, b' ', b'a']);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
    }
}
