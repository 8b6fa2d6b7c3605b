//! Content sniffing for uploaded scientific data files.
//!
//! A [`FormatRegistry`] holds an ordered list of [`FormatDescriptor`]s. Each
//! descriptor declares how many leading bytes or characters it needs and a pure
//! predicate over that prefix. Classification reads one bounded prefix and
//! returns the extension of the first descriptor that matches, or `None` when
//! the file has to be classified by hand.
//!
//! # Built-in formats
//!
//! - **gpx**: GSAS-II project (sniffing disabled)
//! - **instprm**: GSAS-II instrument parameters
//! - **gsa**: GSAS-II powder diffraction data
//! - **prm**: GSAS instrument parameters
//! - **raw**: GSAS-II raw powder data (sniffing disabled)
//!
//! # Example
//!
//! ```no_run
//! use datasniff_core::{FormatRegistry, SniffError};
//!
//! fn detect(path: &str) -> Result<Option<String>, SniffError> {
//!     let registry = FormatRegistry::builtin()?;
//!     Ok(registry.classify_path(path)?.matched_extension)
//! }
//! ```

pub mod custom;
pub mod descriptor;
pub mod error;
pub mod formats;
pub mod registry;

pub use descriptor::{Access, FormatDescriptor, Predicate, Prefix, TextEncoding, MAX_PREFIX_LENGTH};
pub use error::{Result, SniffError};
pub use registry::{FormatRegistry, RegistryBuilder, Resolution, SniffResult};
