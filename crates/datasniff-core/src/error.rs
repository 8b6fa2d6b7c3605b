//! Error types for the sniffing registry.

use datasniff_utils::error::FileSystemError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while registering formats or classifying files.
///
/// An input that matches no descriptor is not an error; see
/// [`SniffResult`](crate::registry::SniffResult).
#[derive(Error, Diagnostic, Debug)]
pub enum SniffError {
    #[error(transparent)]
    #[diagnostic(code(datasniff_core::io))]
    Io(#[from] FileSystemError),

    #[error("Unknown format `{0}`")]
    #[diagnostic(
        code(datasniff_core::unknown_format),
        help("Run `datasniff formats` to list registered extensions")
    )]
    UnknownFormat(String),

    #[error("Format `{0}` is already registered")]
    #[diagnostic(
        code(datasniff_core::duplicate_format),
        help("Extensions are the identity of a format and must be unique")
    )]
    DuplicateFormat(String),

    #[error("Invalid descriptor `{extension}`: {reason}")]
    #[diagnostic(code(datasniff_core::invalid_descriptor))]
    InvalidDescriptor { extension: String, reason: String },

    #[error("Invalid pattern for `{extension}`: {source}")]
    #[diagnostic(
        code(datasniff_core::invalid_pattern),
        help("Check the regex syntax of the signature rule")
    )]
    InvalidPattern {
        extension: String,
        source: regex::Error,
    },
}

/// A specialized Result type for sniffing operations.
pub type Result<T> = std::result::Result<T, SniffError>;

impl SniffError {
    pub(crate) fn invalid<E: Into<String>, R: Into<String>>(extension: E, reason: R) -> Self {
        SniffError::InvalidDescriptor {
            extension: extension.into(),
            reason: reason.into(),
        }
    }
}
