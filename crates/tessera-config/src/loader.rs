use crate::config::TesseraConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "TESSERA_CONFIG";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`TesseraConfig`]
    #[error("invalid config file {}: {message}", path.display())]
    Invalid {
        /// File that failed
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Values supplied on the command line; highest precedence
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Overrides `export.prefix`
    pub prefix: Option<String>,
    /// Overrides `export.base_iri`
    pub base_iri: Option<String>,
    /// Overrides `integrate.unified_namespace`
    pub unified_namespace: Option<String>,
    /// Overrides `logging.level`
    pub log_level: Option<String>,
}

impl TesseraConfig {
    /// Load configuration with precedence: defaults < file < env < args
    ///
    /// The file is `config_file` when given, else `$TESSERA_CONFIG`, else
    /// the default location if it exists.
    pub fn load(config_file: Option<PathBuf>, overrides: ConfigOverrides) -> ConfigResult<Self> {
        let path = config_file
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| Self::default_config_path().filter(|p| p.exists()));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse config text
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.message().to_string())
    }

    /// Apply `TESSERA_*` environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("TESSERA_PREFIX") {
            self.export.prefix = Some(prefix);
        }
        if let Some(base) = lookup("TESSERA_BASE_IRI") {
            self.export.base_iri = Some(base);
        }
        if let Some(ns) = lookup("TESSERA_UNIFIED_NAMESPACE") {
            self.integrate.unified_namespace = ns;
        }
        if let Some(level) = lookup("TESSERA_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if overrides.prefix.is_some() {
            self.export.prefix = overrides.prefix;
        }
        if overrides.base_iri.is_some() {
            self.export.base_iri = overrides.base_iri;
        }
        if let Some(ns) = overrides.unified_namespace {
            self.integrate.unified_namespace = ns;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// `<config dir>/tessera/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tessera").join("config.toml"))
    }
}
