//! Descriptors built from `[[formats]]` entries of the configuration file.

use datasniff_config::{
    config::Config,
    format::{CustomFormat, Encoding, SignatureRule},
};
use regex::Regex;
use tracing::debug;

use crate::{
    descriptor::{Access, FormatDescriptor, TextEncoding},
    error::{Result, SniffError},
    formats::register_builtin,
    registry::FormatRegistry,
};

impl From<Encoding> for TextEncoding {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Utf8 => TextEncoding::Utf8,
            Encoding::Latin1 => TextEncoding::Latin1,
        }
    }
}

/// Compiles a configured format into a descriptor.
///
/// # Errors
///
/// * [`SniffError::InvalidPattern`] if a `regex` rule does not compile.
/// * [`SniffError::InvalidDescriptor`] if a rule cannot fit in the declared prefix.
pub fn compile(format: &CustomFormat) -> Result<FormatDescriptor> {
    let ext = format.extension.as_str();
    let description = format
        .description
        .clone()
        .unwrap_or_else(|| format!("{ext} (configured)"));
    let text = Access::Text(format.encoding().into());
    let len = format.prefix_length;

    let descriptor = match &format.rule {
        SignatureRule::Disabled => FormatDescriptor::sniffing_disabled(ext, description, text, len),
        SignatureRule::Equals { value } => {
            if value.chars().count() != len {
                return Err(SniffError::invalid(
                    ext,
                    "an `equals` rule needs prefix_length equal to the value length",
                ));
            }
            let value = value.clone();
            FormatDescriptor::new(ext, description, text, len, move |p| {
                p.as_text() == Some(value.as_str())
            })
        }
        SignatureRule::StartsWith { value } => {
            fits(ext, value.chars().count(), len)?;
            let value = value.clone();
            FormatDescriptor::new(ext, description, text, len, move |p| p.starts_with(&value))
        }
        SignatureRule::Contains { value } => {
            fits(ext, value.chars().count(), len)?;
            let value = value.clone();
            FormatDescriptor::new(ext, description, text, len, move |p| p.contains(&value))
        }
        SignatureRule::ContainsAll { values } => {
            if values.is_empty() {
                return Err(SniffError::invalid(ext, "`contains_all` needs at least one value"));
            }
            for value in values {
                fits(ext, value.chars().count(), len)?;
            }
            let values = values.clone();
            FormatDescriptor::new(ext, description, text, len, move |p| {
                values.iter().all(|value| p.contains(value))
            })
        }
        SignatureRule::Regex { pattern } => {
            let regex = Regex::new(pattern).map_err(|source| {
                SniffError::InvalidPattern {
                    extension: ext.to_string(),
                    source,
                }
            })?;
            FormatDescriptor::new(ext, description, text, len, move |p| {
                p.as_text().is_some_and(|t| regex.is_match(t))
            })
        }
        SignatureRule::Magic { offset, hex: encoded } => {
            let magic = hex::decode(encoded).map_err(|err| {
                SniffError::invalid(ext, format!("invalid hex `{encoded}`: {err}"))
            })?;
            if magic.is_empty() {
                return Err(SniffError::invalid(ext, "`magic` needs at least one byte"));
            }
            fits(ext, offset + magic.len(), len)?;
            let offset = *offset;
            FormatDescriptor::new(ext, description, Access::Bytes, len, move |p| {
                p.bytes_at(offset, &magic)
            })
        }
    };

    Ok(descriptor)
}

fn fits(ext: &str, needed: usize, prefix_length: usize) -> Result<()> {
    if needed > prefix_length {
        return Err(SniffError::invalid(
            ext,
            format!("rule inspects {needed} units but prefix_length is {prefix_length}"),
        ));
    }
    Ok(())
}

impl FormatRegistry {
    /// Built-in formats, then configured formats, then `disabled` applied.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = FormatRegistry::builder();
        register_builtin(&mut builder)?;

        for format in &config.formats {
            let descriptor = compile(format)?;
            match &format.before {
                Some(anchor) => builder.register_before(anchor, descriptor)?,
                None => builder.register(descriptor)?,
            };
        }

        for extension in config.disabled() {
            builder.disable(extension)?;
        }

        debug!(
            custom = config.formats.len(),
            disabled = config.disabled().len(),
            "registry built from configuration"
        );

        Ok(builder.build())
    }
}
