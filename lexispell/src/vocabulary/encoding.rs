//! Text encodings tried, in order, when decoding a dictionary source.
use serde::{Deserialize, Serialize};

/// A single-byte or UTF-8 text encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
    #[serde(rename = "iso-8859-1")]
    Iso8859_1,
    #[serde(rename = "windows-1252")]
    Windows1252,
    #[serde(rename = "iso-8859-15")]
    Iso8859_15,
}

/// UTF-8 first, then the Latin family.
pub const DEFAULT_ENCODINGS: [Encoding; 5] = [
    Encoding::Utf8,
    Encoding::Latin1,
    Encoding::Iso8859_1,
    Encoding::Windows1252,
    Encoding::Iso8859_15,
];

// 0x80..=0x9F; zero marks the five bytes Windows-1252 leaves undefined.
const WINDOWS_1252_HIGH: [u16; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

impl Encoding {
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
            Encoding::Iso8859_1 => "iso-8859-1",
            Encoding::Windows1252 => "windows-1252",
            Encoding::Iso8859_15 => "iso-8859-15",
        }
    }

    /// Decodes `bytes`, or returns `None` if they are not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Encoding::Latin1 | Encoding::Iso8859_1 => {
                Some(bytes.iter().map(|&b| char::from(b)).collect())
            }
            Encoding::Windows1252 => bytes.iter().map(|&b| windows_1252(b)).collect(),
            Encoding::Iso8859_15 => Some(bytes.iter().map(|&b| iso_8859_15(b)).collect()),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[inline(always)]
fn windows_1252(b: u8) -> Option<char> {
    match b {
        0x80..=0x9F => match WINDOWS_1252_HIGH[(b - 0x80) as usize] {
            0 => None,
            cp => char::from_u32(cp as u32),
        },
        _ => Some(char::from(b)),
    }
}

#[inline(always)]
fn iso_8859_15(b: u8) -> char {
    match b {
        0xA4 => '\u{20AC}',
        0xA6 => '\u{0160}',
        0xA8 => '\u{0161}',
        0xB4 => '\u{017D}',
        0xB8 => '\u{017E}',
        0xBC => '\u{0152}',
        0xBD => '\u{0153}',
        0xBE => '\u{0178}',
        _ => char::from(b),
    }
}

/// Decodes with the first encoding in `chain` that accepts the bytes.
pub fn decode_with_fallback(bytes: &[u8], chain: &[Encoding]) -> Option<(Encoding, String)> {
    chain.iter().find_map(|encoding| {
        let text = encoding.decode(bytes)?;
        log::trace!("decoded {} bytes as {}", bytes.len(), encoding);
        Some((*encoding, text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_wins_when_valid() {
        let (encoding, text) =
            decode_with_fallback("café".as_bytes(), &DEFAULT_ENCODINGS).unwrap();
        assert_eq!(encoding, Encoding::Utf8);
        assert_eq!(text, "café");
    }

    #[test]
    fn falls_back_to_latin1() {
        let bytes = b"caf\xe9,noun";
        let (encoding, text) = decode_with_fallback(bytes, &DEFAULT_ENCODINGS).unwrap();
        assert_eq!(encoding, Encoding::Latin1);
        assert_eq!(text, "café,noun");
    }

    #[test]
    fn windows_1252_rejects_undefined_bytes() {
        assert_eq!(
            Encoding::Windows1252.decode(b"\x93quoted\x94"),
            Some("\u{201C}quoted\u{201D}".to_string())
        );
        assert_eq!(Encoding::Windows1252.decode(b"bad\x81"), None);
    }

    #[test]
    fn iso_8859_15_euro() {
        assert_eq!(Encoding::Iso8859_15.decode(b"\xa4"), Some("€".to_string()));
    }

    #[test]
    fn exhausted_chain() {
        assert_eq!(decode_with_fallback(b"\xff", &[Encoding::Utf8]), None);
        assert_eq!(
            decode_with_fallback(b"bad\x81", &[Encoding::Utf8, Encoding::Windows1252]),
            None
        );
    }
}
