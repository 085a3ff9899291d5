//! Standard Type-1 font metrics and WinAnsi text encoding.
//!
//! Résumés are drawn with the PDF base-14 fonts, which every viewer ships, so
//! nothing is embedded. Line breaking still needs glyph advances; the tables
//! below are the Adobe AFM widths (1/1000 em) for ASCII 0x20..=0x7E.
//!
//! Index = `(char as usize) - 32`. Characters outside ASCII use a small
//! override list (bullet, dashes, curly quotes) and otherwise the family's
//! average width.

use serde::{Deserialize, Serialize};

// ── Font family ──────────────────────────────────────────────────────────────

/// One of the three standard font families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

/// Weight and slant of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Face {
    pub bold: bool,
    pub italic: bool,
}

impl Face {
    pub const REGULAR: Face = Face {
        bold: false,
        italic: false,
    };
    pub const BOLD: Face = Face {
        bold: true,
        italic: false,
    };
    pub const ITALIC: Face = Face {
        bold: false,
        italic: true,
    };
    pub const BOLD_ITALIC: Face = Face {
        bold: true,
        italic: true,
    };

    /// Every face, in resource-name order (`F1`..`F4`).
    pub const ALL: [Face; 4] = [Face::REGULAR, Face::BOLD, Face::ITALIC, Face::BOLD_ITALIC];

    /// Page resource name used in content streams.
    pub fn resource_name(self) -> &'static [u8] {
        match (self.bold, self.italic) {
            (false, false) => b"F1",
            (true, false) => b"F2",
            (false, true) => b"F3",
            (true, true) => b"F4",
        }
    }
}

impl FontFamily {
    /// PostScript name of the base-14 font for `face`.
    pub fn base_font(self, face: Face) -> &'static str {
        match (self, face.bold, face.italic) {
            (FontFamily::Helvetica, false, false) => "Helvetica",
            (FontFamily::Helvetica, true, false) => "Helvetica-Bold",
            (FontFamily::Helvetica, false, true) => "Helvetica-Oblique",
            (FontFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
            (FontFamily::Times, false, false) => "Times-Roman",
            (FontFamily::Times, true, false) => "Times-Bold",
            (FontFamily::Times, false, true) => "Times-Italic",
            (FontFamily::Times, true, true) => "Times-BoldItalic",
            (FontFamily::Courier, false, false) => "Courier",
            (FontFamily::Courier, true, false) => "Courier-Bold",
            (FontFamily::Courier, false, true) => "Courier-Oblique",
            (FontFamily::Courier, true, true) => "Courier-BoldOblique",
        }
    }

    /// Width table for `face`.
    ///
    /// Obliques share the upright advances. Times italics are narrower than
    /// the roman cut by a few percent; the roman table is used for them,
    /// which errs towards wrapping early.
    pub fn metrics(self, face: Face) -> &'static FontMetricTable {
        match (self, face.bold) {
            (FontFamily::Helvetica, false) => &HELVETICA,
            (FontFamily::Helvetica, true) => &HELVETICA_BOLD,
            (FontFamily::Times, false) => &TIMES_ROMAN,
            (FontFamily::Times, true) => &TIMES_BOLD,
            (FontFamily::Courier, _) => &COURIER,
        }
    }
}

// ── Metric table ─────────────────────────────────────────────────────────────

/// Glyph advances for one font, in 1/1000 em.
pub struct FontMetricTable {
    widths: [u16; 95],
    bullet: u16,
    en_dash: u16,
    quote: u16,
    average: u16,
}

impl FontMetricTable {
    pub fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '•' => self.bullet,
            '–' => self.en_dash,
            '—' | '…' | '™' => 1000,
            '‘' | '’' | '‚' => self.quote,
            '“' | '”' | '„' => self.quote + self.quote / 2,
            '\u{a0}' => self.widths[0],
            _ => self.average,
        }
    }

    /// Width of `text` in points at `size`.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size / 1000.0
    }
}

// ── Static width tables ──────────────────────────────────────────────────────

static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A-M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a-m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n-z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    bullet: 350,
    en_dash: 556,
    quote: 222,
    average: 556,
};

static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        333, 333, 584, 584, 584, 611, 975,
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        333, 278, 333, 584, 556, 333,
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        389, 280, 389, 584,
    ],
    bullet: 350,
    en_dash: 556,
    quote: 278,
    average: 611,
};

static TIMES_ROMAN: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        278, 278, 564, 564, 564, 444, 921,
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        333, 278, 333, 469, 500, 333,
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        480, 200, 480, 541,
    ],
    bullet: 350,
    en_dash: 500,
    quote: 333,
    average: 500,
};

static TIMES_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        333, 333, 570, 570, 570, 500, 930,
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
        333, 278, 333, 581, 500, 333,
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
        394, 220, 394, 520,
    ],
    bullet: 350,
    en_dash: 500,
    quote: 333,
    average: 540,
};

/// Courier is monospaced: every glyph advances 600 units.
static COURIER: FontMetricTable = FontMetricTable {
    widths: [600; 95],
    bullet: 600,
    en_dash: 600,
    quote: 600,
    average: 600,
};

// ── WinAnsi encoding ─────────────────────────────────────────────────────────

/// Encode text for a simple font with `/WinAnsiEncoding`.
///
/// ASCII and Latin-1 map to themselves; typographic punctuation maps to the
/// 0x80..=0x9F block. Anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
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
    fn test_helvetica_widths() {
        let m = FontFamily::Helvetica.metrics(Face::REGULAR);
        assert_eq!(m.char_width(' '), 278);
        assert_eq!(m.char_width('W'), 944);
        assert_eq!(m.char_width('i'), 222);
        assert_eq!(m.char_width('•'), 350);
        // "Hi" at 10pt = (722 + 222) / 100
        assert!((m.measure("Hi", 10.0) - 9.44).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = FontFamily::Helvetica.metrics(Face::REGULAR);
        let bold = FontFamily::Helvetica.metrics(Face::BOLD);
        let text = "Senior Software Engineer";
        assert!(bold.measure(text, 11.0) > regular.measure(text, 11.0));
    }

    #[test]
    fn test_courier_is_monospaced() {
        let m = FontFamily::Courier.metrics(Face::BOLD_ITALIC);
        assert_eq!(m.measure("iiii", 10.0), m.measure("WWWW", 10.0));
        assert_eq!(m.measure("é", 10.0), 6.0);
    }

    #[test]
    fn test_base_font_names() {
        assert_eq!(FontFamily::Helvetica.base_font(Face::ITALIC), "Helvetica-Oblique");
        assert_eq!(FontFamily::Times.base_font(Face::REGULAR), "Times-Roman");
        assert_eq!(FontFamily::Times.base_font(Face::BOLD_ITALIC), "Times-BoldItalic");
        assert_eq!(FontFamily::Courier.base_font(Face::BOLD), "Courier-Bold");
    }

    #[test]
    fn test_resource_names_are_distinct() {
        assert_eq!(Face::REGULAR.resource_name(), b"F1");
        assert_eq!(Face::BOLD.resource_name(), b"F2");
        assert_eq!(Face::ITALIC.resource_name(), b"F3");
        assert_eq!(Face::BOLD_ITALIC.resource_name(), b"F4");
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("A–B"), vec![b'A', 0x96, b'B']);
        assert_eq!(encode_win_ansi("• café"), vec![0x95, b' ', b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("“hi”"), vec![0x93, b'h', b'i', 0x94]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }
}
