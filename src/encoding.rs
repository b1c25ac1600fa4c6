/// A character encoding for interpreting entry bytes as text
///
/// Resource content is always decoded through an explicitly configured
/// encoding. Relying on a platform-ambient default would make generated
/// sites differ between machines, so no such default exists here -- sources
/// assume UTF-8 unless told otherwise.
///
/// Encoding implementations should be `Copy` unit structs so they are as
/// cheap to pass around as possible.
pub trait Encoding {
    /// A short label for the encoding, used in diagnostics
    fn name(&self) -> &'static str;

    /// Decodes bytes into an owned string, or reports the byte offset at
    /// which the data stopped being valid for this encoding
    fn decode(&self, data: &[u8]) -> Result<String, DecodeError>;
}

impl<T: Encoding + ?Sized> Encoding for &'_ T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode(&self, data: &[u8]) -> Result<String, DecodeError> {
        (**self).decode(data)
    }
}

impl<T: Encoding + ?Sized> Encoding for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode(&self, data: &[u8]) -> Result<String, DecodeError> {
        (**self).decode(data)
    }
}

/// Strict UTF-8 decoding
///
/// Invalid sequences are an error rather than being replaced, so a
/// mis-encoded entry is surfaced instead of silently corrupting output.
///
/// ```
/// use quarry::{Encoding, Utf8Encoding};
///
/// let encoding = Utf8Encoding::new();
/// assert_eq!(encoding.decode(b"# Hello").unwrap(), "# Hello");
/// assert_eq!(encoding.decode(b"J\xc3\xa5hk\xc3\xa5m\xc3\xa5hkke").unwrap(), "Jåhkåmåhkke");
/// assert_eq!(encoding.decode(b"\xff").unwrap_err().offset(), 0);
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct Utf8Encoding;

impl Utf8Encoding {
    /// Creates a new utf-8 decoder
    pub fn new() -> Self {
        Utf8Encoding
    }
}

impl Encoding for Utf8Encoding {
    fn name(&self) -> &'static str {
        "utf-8"
    }

    fn decode(&self, data: &[u8]) -> Result<String, DecodeError> {
        String::from_utf8(data.to_vec()).map_err(|e| DecodeError {
            encoding: self.name(),
            offset: e.utf8_error().valid_up_to(),
        })
    }
}

/// Decodes bytes according to the windows-1252 code page
///
/// Every byte maps to a character, so this decoding is total. Legacy site
/// content written on Windows tooling commonly carries this encoding.
///
/// ```
/// use quarry::{Encoding, Windows1252Encoding};
///
/// let encoding = Windows1252Encoding::new();
/// assert_eq!(encoding.decode(b"plain ascii").unwrap(), "plain ascii");
/// assert_eq!(encoding.decode(b"\x80").unwrap(), "\u{20ac}");
/// assert_eq!(encoding.decode(b"\x93quoted\x94").unwrap(), "\u{201c}quoted\u{201d}");
/// assert_eq!(encoding.decode(b"\xff").unwrap(), "ÿ");
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct Windows1252Encoding;

impl Windows1252Encoding {
    /// Creates a new windows-1252 decoder
    pub fn new() -> Self {
        Windows1252Encoding
    }
}

// Characters for bytes 0x80..=0x9f, where windows-1252 departs from
// latin-1. Bytes undefined by the code page keep their C1 code point.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}', '\u{8f}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}', '\u{178}',
];

impl Encoding for Windows1252Encoding {
    fn name(&self) -> &'static str {
        "windows-1252"
    }

    fn decode(&self, data: &[u8]) -> Result<String, DecodeError> {
        let mut result = String::with_capacity(data.len());
        for &byte in data {
            match byte {
                0x00..=0x7f | 0xa0..=0xff => result.push(byte as char),
                _ => result.push(WINDOWS_1252_HIGH[usize::from(byte - 0x80)]),
            }
        }

        Ok(result)
    }
}

/// An error decoding entry bytes as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub(crate) encoding: &'static str,
    pub(crate) offset: usize,
}

impl DecodeError {
    /// The label of the encoding that rejected the data
    pub fn encoding(&self) -> &'static str {
        self.encoding
    }

    /// Byte offset of the first invalid sequence
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl std::error::Error for DecodeError {}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} data (offset: {})",
            self.encoding, self.offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_reports_failure_offset() {
        let err = Utf8Encoding::new().decode(b"ok\xe2\x28").unwrap_err();
        assert_eq!(err.offset(), 2);
        assert_eq!(err.encoding(), "utf-8");
    }

    #[test]
    fn windows1252_is_total() {
        let all: Vec<u8> = (0u8..=255).collect();
        let decoded = Windows1252Encoding::new().decode(&all).unwrap();
        assert_eq!(decoded.chars().count(), 256);
    }
}
