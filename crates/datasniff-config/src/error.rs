use datasniff_utils::error::PathError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(datasniff_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(datasniff_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(datasniff_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Duplicate format extension: {0}")]
    #[diagnostic(
        code(datasniff_config::duplicate_format),
        help("Each [[formats]] entry must have a unique extension")
    )]
    DuplicateFormat(String),

    #[error("Format `{extension}` declares an empty prefix")]
    #[diagnostic(
        code(datasniff_config::empty_prefix),
        help("Set prefix_length to the number of leading bytes or characters the rule inspects")
    )]
    EmptyPrefix { extension: String },

    #[error("Format `{extension}` cannot be placed before itself")]
    #[diagnostic(code(datasniff_config::self_anchor))]
    SelfAnchor { extension: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(datasniff_config::io))]
    IoError(#[from] std::io::Error),

    #[error("Invalid config path: {0}")]
    #[diagnostic(
        code(datasniff_config::path),
        help("Check DATASNIFF_CONFIG and the variables it references")
    )]
    Path(#[from] PathError),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(datasniff_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(datasniff_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),

    #[error("Failed to annotate first table in array: {0}")]
    #[diagnostic(code(datasniff_config::annotate_first_table))]
    AnnotateFirstTable(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
