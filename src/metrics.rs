//! WinAnsi text encoding and advance widths for the built-in Helvetica pair.

/// First and last character codes covered by width tables.
pub const FIRST_CHAR: u8 = 32;
pub const LAST_CHAR: u8 = 255;

const FALLBACK_WIDTH: u16 = 556;

// WinAnsiEncoding codes 0x80..=0x9F that differ from Latin-1.
const WIN_ANSI_HIGH: &[(u8, char)] = &[
    (0x80, '€'),
    (0x82, '‚'),
    (0x83, 'ƒ'),
    (0x84, '„'),
    (0x85, '…'),
    (0x86, '†'),
    (0x87, '‡'),
    (0x88, 'ˆ'),
    (0x89, '‰'),
    (0x8A, 'Š'),
    (0x8B, '‹'),
    (0x8C, 'Œ'),
    (0x8E, 'Ž'),
    (0x91, '‘'),
    (0x92, '’'),
    (0x93, '“'),
    (0x94, '”'),
    (0x95, '•'),
    (0x96, '–'),
    (0x97, '—'),
    (0x98, '˜'),
    (0x99, '™'),
    (0x9A, 'š'),
    (0x9B, '›'),
    (0x9C, 'œ'),
    (0x9E, 'ž'),
    (0x9F, 'Ÿ'),
];

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48-63
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80-95
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96-111
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 112-126
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48-63
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80-95
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96-111
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 112-126
];

/// Maps a WinAnsi code to the character it draws.
pub fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as char),
        0x80..=0x9F => WIN_ANSI_HIGH
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, ch)| *ch),
        _ => None,
    }
}

fn win_ansi_code(ch: char) -> Option<u8> {
    match ch as u32 {
        0x20..=0x7E | 0xA0..=0xFF => Some(ch as u32 as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(_, c)| *c == ch)
            .map(|(code, _)| *code),
    }
}

/// Encodes text for a simple font using WinAnsiEncoding. Characters the
/// encoding cannot represent become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| win_ansi_code(ch).unwrap_or(b'?'))
        .collect()
}

/// Advance widths for codes `FIRST_CHAR..=LAST_CHAR`.
#[derive(Debug, Clone, PartialEq)]
pub struct WidthTable(Vec<u16>);

impl WidthTable {
    pub fn from_fn(mut width_of: impl FnMut(u8) -> u16) -> Self {
        WidthTable((FIRST_CHAR..=LAST_CHAR).map(&mut width_of).collect())
    }

    pub fn helvetica(bold: bool) -> Self {
        let ascii = if bold { &HELVETICA_BOLD } else { &HELVETICA };
        Self::from_fn(|code| match code {
            0x20..=0x7E => ascii[(code - FIRST_CHAR) as usize],
            0xA0 => ascii[0],
            _ => FALLBACK_WIDTH,
        })
    }

    pub fn width(&self, code: u8) -> u16 {
        if code < FIRST_CHAR {
            return 0;
        }
        self.0
            .get((code - FIRST_CHAR) as usize)
            .copied()
            .unwrap_or(FALLBACK_WIDTH)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    /// Width of already encoded text at `size` points.
    pub fn measure(&self, encoded: &[u8], size: f32) -> f32 {
        let units: u32 = encoded.iter().map(|c| self.width(*c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_latin1_and_typographic_punctuation() {
        assert_eq!(encode_win_ansi("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("a—b"), vec![b'a', 0x97, b'b']);
        assert_eq!(encode_win_ansi("“x”"), vec![0x93, b'x', 0x94]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn maps_codes_back_to_chars() {
        assert_eq!(win_ansi_char(b'A'), Some('A'));
        assert_eq!(win_ansi_char(0x80), Some('€'));
        assert_eq!(win_ansi_char(0x81), None);
        assert_eq!(win_ansi_char(0x10), None);
    }

    #[test]
    fn measures_helvetica_text() {
        let table = WidthTable::helvetica(false);
        // H=722 e=556 l=222 l=222 o=556
        let width = table.measure(&encode_win_ansi("Hello"), 10.0);
        assert!((width - 22.78).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let text = encode_win_ansi("Board Resolution");
        let regular = WidthTable::helvetica(false).measure(&text, 18.0);
        let bold = WidthTable::helvetica(true).measure(&text, 18.0);
        assert!(bold > regular);
    }

    #[test]
    fn table_covers_full_code_range() {
        let table = WidthTable::helvetica(true);
        assert_eq!(table.as_slice().len(), 224);
        assert_eq!(table.width(b' '), 278);
        assert_eq!(table.width(0xE9), FALLBACK_WIDTH);
        assert_eq!(table.width(0x0A), 0);
    }
}
