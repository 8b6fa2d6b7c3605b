use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::{LazyLock, RwLock},
};

use datasniff_utils::path::{resolve_path, xdg_config_home};
use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info, warn};

use crate::{
    annotations::{annotate_first_table, annotate_table},
    error::{ConfigError, Result},
    format::CustomFormat,
};

/// datasniff configuration
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Extensions excluded from automatic sniffing. They stay registered
    /// and can still be assigned explicitly with `classify --as`.
    /// Default: []
    pub disabled: Option<Vec<String>>,

    /// Classify multiple files in parallel.
    /// Default: true
    pub parallel: Option<bool>,

    /// Additional formats recognised by signature rules, checked after the
    /// built-in formats unless `before` names an anchor. Example:
    ///
    /// [[formats]]
    /// extension = "xye"
    /// prefix_length = 40
    /// rule = { kind = "starts_with", value = "/*XYE" }
    #[serde(default)]
    pub formats: Vec<CustomFormat>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(env_config_path().unwrap_or_else(|err| {
        warn!("ignoring DATASNIFF_CONFIG: {err}");
        default_config_path()
    }))
});

fn default_config_path() -> PathBuf {
    xdg_config_home().join("datasniff").join("config.toml")
}

/// Returns `$DATASNIFF_CONFIG` with `~` and environment variables expanded, or
/// `$XDG_CONFIG_HOME/datasniff/config.toml` when it is unset.
///
/// # Errors
///
/// Returns [`ConfigError::Path`] if the variable cannot be resolved to a path.
pub fn env_config_path() -> Result<PathBuf> {
    match std::env::var("DATASNIFF_CONFIG") {
        Ok(path_str) => Ok(resolve_path(&path_str)?),
        Err(_) => Ok(default_config_path()),
    }
}

/// Returns the configuration file path currently in effect.
pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .map(|path| path.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
}

/// Overrides the configuration file path, e.g. from `--config`.
pub fn set_config_path(path: PathBuf) {
    let mut guard = CONFIG_PATH
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = path;
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            disabled: Some(Vec::new()),
            parallel: Some(true),
            formats: Vec::new(),
        }
    }

    /// Loads the configuration from [`config_path`].
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        Self::load(config_path())
    }

    /// Loads and validates the configuration stored at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("config {} not found, using defaults", path.display());
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    /// Fills unset options with their defaults and validates custom formats.
    pub fn resolve(&mut self) -> Result<()> {
        self.disabled.get_or_insert_with(Vec::new);
        self.parallel.get_or_insert(true);

        let mut seen = HashSet::new();
        for format in &self.formats {
            if !seen.insert(format.extension.as_str()) {
                return Err(ConfigError::DuplicateFormat(format.extension.clone()));
            }
            if format.prefix_length == 0 {
                return Err(ConfigError::EmptyPrefix {
                    extension: format.extension.clone(),
                });
            }
            if format.before.as_deref() == Some(format.extension.as_str()) {
                return Err(ConfigError::SelfAnchor {
                    extension: format.extension.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn disabled(&self) -> &[String] {
        self.disabled.as_deref().unwrap_or_default()
    }

    pub fn parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_table::<Config>(doc.as_table_mut(), false)?;

        if let Some(formats) = doc
            .get_mut("formats")
            .and_then(|item| item.as_array_of_tables_mut())
        {
            annotate_first_table::<CustomFormat>(formats)?;
        }

        Ok(doc)
    }
}

/// Writes an annotated default configuration to [`config_path`].
///
/// # Errors
///
/// Returns [`ConfigError::ConfigAlreadyExists`] if a file is already present.
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = config_path();
    write_default_config(&config_path)?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(config_path)
}

fn write_default_config(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(config_path, annotated_doc.to_string())?;
    Ok(())
}
