//! Format descriptors and the prefix views their predicates inspect.

use std::{fmt, sync::Arc};

use crate::error::{Result, SniffError};

/// Largest prefix any descriptor may declare, in bytes or characters.
pub const MAX_PREFIX_LENGTH: usize = 4096;

/// Encoding used to turn raw prefix bytes into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8; a sequence cut off by the read limit is dropped, other invalid
    /// bytes become U+FFFD.
    Utf8,
    /// ISO-8859-1, one byte per character.
    Latin1,
}

impl TextEncoding {
    /// Worst-case number of bytes needed to decode one character.
    ///
    /// A `\r\n` pair decodes to a single `\n`, so Latin-1 needs two bytes per
    /// character in the worst case.
    pub fn max_bytes_per_char(self) -> usize {
        match self {
            TextEncoding::Utf8 => 4,
            TextEncoding::Latin1 => 2,
        }
    }

    /// Decodes at most `max_chars` characters from `bytes`.
    ///
    /// Line endings are normalized first: `\r\n` and a lone `\r` both become
    /// `\n`, and each counts as one character.
    pub fn decode(self, bytes: &[u8], max_chars: usize) -> String {
        match self {
            TextEncoding::Latin1 => {
                normalize_newlines(bytes.iter().map(|&b| b as char), max_chars)
            }
            TextEncoding::Utf8 => {
                let complete = match std::str::from_utf8(bytes) {
                    Err(err) if err.error_len().is_none() => &bytes[..err.valid_up_to()],
                    _ => bytes,
                };
                normalize_newlines(String::from_utf8_lossy(complete).chars(), max_chars)
            }
        }
    }
}

fn normalize_newlines(chars: impl Iterator<Item = char>, max_chars: usize) -> String {
    let mut chars = chars.peekable();
    let mut text = String::new();
    let mut count = 0;

    while count < max_chars {
        let Some(c) = chars.next() else {
            break;
        };
        if c == '\r' {
            chars.next_if_eq(&'\n');
            text.push('\n');
        } else {
            text.push(c);
        }
        count += 1;
    }

    text
}

/// What a descriptor's predicate needs to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Bytes,
    Text(TextEncoding),
}

impl Access {
    /// Number of raw bytes needed to present a prefix of `prefix_length` units.
    pub fn byte_budget(self, prefix_length: usize) -> usize {
        match self {
            Access::Bytes => prefix_length,
            Access::Text(encoding) => prefix_length * encoding.max_bytes_per_char(),
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Bytes => write!(f, "bytes"),
            Access::Text(TextEncoding::Utf8) => write!(f, "text/utf-8"),
            Access::Text(TextEncoding::Latin1) => write!(f, "text/latin-1"),
        }
    }
}

/// The bounded view of a file handed to a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
}

impl<'a> Prefix<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Prefix::Bytes(bytes) => bytes,
            Prefix::Text(text) => text.as_bytes(),
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            Prefix::Bytes(_) => None,
            Prefix::Text(text) => Some(text),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Prefix::Bytes(bytes) => bytes.len(),
            Prefix::Text(text) => text.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        match self {
            Prefix::Text(text) => text.contains(needle),
            Prefix::Bytes(bytes) => {
                let needle = needle.as_bytes();
                needle.is_empty() || bytes.windows(needle.len()).any(|w| w == needle)
            }
        }
    }

    pub fn starts_with(&self, needle: &str) -> bool {
        self.as_bytes().starts_with(needle.as_bytes())
    }

    /// Compares the raw bytes at `offset`; a prefix too short to hold them never matches.
    pub fn bytes_at(&self, offset: usize, expected: &[u8]) -> bool {
        self.as_bytes()
            .get(offset..)
            .is_some_and(|tail| tail.starts_with(expected))
    }
}

/// A pure function over a descriptor's prefix.
pub type Predicate = Arc<dyn Fn(&Prefix<'_>) -> bool + Send + Sync>;

/// Metadata plus predicate bundle defining one recognised format.
#[derive(Clone)]
pub struct FormatDescriptor {
    extension: String,
    description: String,
    access: Access,
    prefix_length: usize,
    predicate: Option<Predicate>,
}

impl FormatDescriptor {
    /// Creates a descriptor that takes part in sniffing.
    pub fn new<F>(
        extension: impl Into<String>,
        description: impl Into<String>,
        access: Access,
        prefix_length: usize,
        predicate: F,
    ) -> Self
    where
        F: Fn(&Prefix<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            extension: extension.into(),
            description: description.into(),
            access,
            prefix_length,
            predicate: Some(Arc::new(predicate)),
        }
    }

    /// Creates a descriptor registered for metadata and explicit assignment only.
    pub fn sniffing_disabled(
        extension: impl Into<String>,
        description: impl Into<String>,
        access: Access,
        prefix_length: usize,
    ) -> Self {
        Self {
            extension: extension.into(),
            description: description.into(),
            access,
            prefix_length,
            predicate: None,
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn prefix_length(&self) -> usize {
        self.prefix_length
    }

    pub fn is_sniffable(&self) -> bool {
        self.predicate.is_some()
    }

    /// Raw bytes this descriptor needs; zero when sniffing is disabled.
    pub fn byte_budget(&self) -> usize {
        if self.is_sniffable() {
            self.access.byte_budget(self.prefix_length)
        } else {
            0
        }
    }

    pub(crate) fn disable(&mut self) {
        self.predicate = None;
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.extension.is_empty() {
            return Err(SniffError::invalid("", "extension must not be empty"));
        }
        if let Some(bad) = self
            .extension
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(SniffError::invalid(
                &self.extension,
                format!("extension contains invalid character {bad:?}"),
            ));
        }
        if self.prefix_length == 0 || self.prefix_length > MAX_PREFIX_LENGTH {
            return Err(SniffError::invalid(
                &self.extension,
                format!("prefix length must be within 1..={MAX_PREFIX_LENGTH}"),
            ));
        }
        Ok(())
    }

    /// Applies the predicate to the start of `head`.
    ///
    /// `head` may be longer than this descriptor's prefix; only the declared prefix
    /// is presented to the predicate.
    pub fn matches(&self, head: &[u8]) -> bool {
        let Some(predicate) = &self.predicate else {
            return false;
        };

        match self.access {
            Access::Bytes => {
                let end = head.len().min(self.prefix_length);
                predicate(&Prefix::Bytes(&head[..end]))
            }
            Access::Text(encoding) => {
                let end = head.len().min(self.byte_budget());
                let text = encoding.decode(&head[..end], self.prefix_length);
                predicate(&Prefix::Text(&text))
            }
        }
    }
}

impl fmt::Debug for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatDescriptor")
            .field("extension", &self.extension)
            .field("description", &self.description)
            .field("access", &self.access)
            .field("prefix_length", &self.prefix_length)
            .field("sniffable", &self.is_sniffable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_decode_limits_characters() {
        let text = TextEncoding::Utf8.decode("Å2θ scan".as_bytes(), 3);
        assert_eq!(text, "Å2θ");
    }

    #[test]
    fn test_utf8_decode_drops_truncated_sequence() {
        let bytes = "ab\u{3b8}".as_bytes();
        let text = TextEncoding::Utf8.decode(&bytes[..3], 10);
        assert_eq!(text, "ab");
    }

    #[test]
    fn test_utf8_decode_replaces_invalid_bytes() {
        let text = TextEncoding::Utf8.decode(b"a\xffb", 10);
        assert_eq!(text, "a\u{fffd}b");
    }

    #[test]
    fn test_latin1_decode() {
        let text = TextEncoding::Latin1.decode(b"\x80\x02}q\x00", 3);
        assert_eq!(text, "\u{80}\u{2}}");
    }

    #[test]
    fn test_decode_normalizes_line_endings() {
        for encoding in [TextEncoding::Utf8, TextEncoding::Latin1] {
            assert_eq!(encoding.decode(b"a\r\nb\rc\nd", 10), "a\nb\nc\nd");
            // a CRLF pair counts as one character
            assert_eq!(encoding.decode(b"a\r\n\r\nbcd", 4), "a\n\nb");
            assert_eq!(encoding.decode(b"ab\r", 3), "ab\n");
        }
    }

    #[test]
    fn test_matches_counts_crlf_as_one_character() {
        for encoding in [TextEncoding::Utf8, TextEncoding::Latin1] {
            let descriptor =
                FormatDescriptor::new("end", "", Access::Text(encoding), 6, |p| p.contains("END"));
            assert!(descriptor.matches(b"\r\n\r\n\r\nEND"));
            assert!(!descriptor.matches(b"\r\n\r\n\r\n\r\nEND"));
        }
    }

    #[test]
    fn test_byte_budget() {
        assert_eq!(Access::Bytes.byte_budget(8), 8);
        assert_eq!(Access::Text(TextEncoding::Utf8).byte_budget(22), 88);
        assert_eq!(Access::Text(TextEncoding::Latin1).byte_budget(22), 44);

        let disabled =
            FormatDescriptor::sniffing_disabled("raw", "raw", Access::Text(TextEncoding::Utf8), 64);
        assert_eq!(disabled.byte_budget(), 0);
    }

    #[test]
    fn test_prefix_helpers() {
        let bytes = Prefix::Bytes(b"\x89HDF\r\n");
        assert!(bytes.bytes_at(1, b"HDF"));
        assert!(!bytes.bytes_at(4, b"HDF"));
        assert!(!bytes.bytes_at(10, b"H"));
        assert!(bytes.contains("HDF"));
        assert_eq!(bytes.as_text(), None);

        let text = Prefix::Text("θ=12.5");
        assert_eq!(text.len(), 6);
        assert!(text.starts_with("θ="));
        assert!(!text.is_empty());
    }

    #[test]
    fn test_matches_only_sees_declared_prefix() {
        let descriptor = FormatDescriptor::new(
            "abc",
            "test",
            Access::Text(TextEncoding::Utf8),
            3,
            |prefix| prefix.as_text() == Some("abc"),
        );
        assert!(descriptor.matches(b"abcdef"));
        assert!(!descriptor.matches(b"ab"));

        let descriptor = FormatDescriptor::new("tail", "test", Access::Bytes, 4, |prefix| {
            prefix.contains("ef")
        });
        assert!(!descriptor.matches(b"abcdef"));
    }

    #[test]
    fn test_disabled_never_matches() {
        let descriptor = FormatDescriptor::sniffing_disabled("gpx", "project", Access::Bytes, 8);
        assert!(!descriptor.matches(b"anything at all"));
        assert!(!descriptor.is_sniffable());
    }

    #[test]
    fn test_validate() {
        let ok = FormatDescriptor::new("prm", "", Access::Bytes, 22, |_| true);
        assert!(ok.validate().is_ok());

        let empty = FormatDescriptor::new("", "", Access::Bytes, 22, |_| true);
        assert!(matches!(
            empty.validate(),
            Err(SniffError::InvalidDescriptor { .. })
        ));

        let spaced = FormatDescriptor::new("a b", "", Access::Bytes, 22, |_| true);
        assert!(spaced.validate().is_err());

        let zero = FormatDescriptor::new("prm", "", Access::Bytes, 0, |_| true);
        assert!(zero.validate().is_err());

        let huge = FormatDescriptor::new("prm", "", Access::Bytes, MAX_PREFIX_LENGTH + 1, |_| true);
        assert!(huge.validate().is_err());
    }
}
