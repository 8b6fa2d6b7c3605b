use datasniff_config::error::ConfigError;
use datasniff_core::SniffError;
use datasniff_utils::error::PathError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sniff(#[from] SniffError),

    #[error("Invalid path: {0}")]
    #[diagnostic(code(datasniff::path))]
    Path(#[from] PathError),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(datasniff::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render configuration: {0}")]
    #[diagnostic(code(datasniff::toml))]
    Toml(#[from] toml::ser::Error),

    #[error("{failed} of {total} files could not be read")]
    #[diagnostic(
        code(datasniff::classify_failed),
        help("Check that the files exist and are readable")
    )]
    ClassifyFailed { failed: usize, total: usize },
}

pub type CliResult<T> = std::result::Result<T, CliError>;
