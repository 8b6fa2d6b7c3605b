use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};

/// A user-defined format recognised by a signature rule.
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields, PartialEq, Eq)]
pub struct CustomFormat {
    /// Canonical extension identifying the format (e.g. "xye").
    pub extension: String,

    /// Human-readable description shown by `datasniff formats`.
    pub description: Option<String>,

    /// Number of leading bytes (for `magic`) or characters (for text rules)
    /// the rule may inspect.
    pub prefix_length: usize,

    /// Text encoding used to decode the prefix for text rules: "utf8" or "latin1".
    /// Default: "utf8"
    pub encoding: Option<Encoding>,

    /// Extension of an already registered format this one must be checked before.
    /// Default: appended after every built-in format
    pub before: Option<String>,

    /// Signature rule, e.g. { kind = "contains", value = "Sample Run:" }.
    /// Kinds: equals, starts_with, contains, contains_all, regex, magic, disabled.
    pub rule: SignatureRule,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
}

/// How a configured format decides whether a prefix matches.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignatureRule {
    /// The whole prefix equals `value`.
    Equals { value: String },
    StartsWith { value: String },
    Contains { value: String },
    /// Every entry of `values` occurs somewhere in the prefix.
    ContainsAll { values: Vec<String> },
    Regex { pattern: String },
    /// Raw bytes at `offset` equal the hex-encoded `hex`.
    Magic { offset: usize, hex: String },
    /// Registered for metadata and explicit assignment only.
    Disabled,
}

impl CustomFormat {
    pub fn encoding(&self) -> Encoding {
        self.encoding.unwrap_or_default()
    }
}
