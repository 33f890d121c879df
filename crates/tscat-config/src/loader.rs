//! Settings loading and persistence with atomic file operations.

use crate::schema::{DuplicatePolicy, Settings};
use crate::validator::SettingsValidator;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use tscat_common::{Result as TsCatResult, TsCatError};

/// Environment variable naming the settings file.
pub const CONFIG_PATH_VAR: &str = "TSCAT_CONFIG_PATH";

/// Settings file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tscat.toml";

/// Settings loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading or writing the settings file
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        /// Settings file path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("Failed to parse TOML settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParse {
        /// Variable name
        var: String,
        /// Why the value was rejected
        message: String,
    },

    /// Settings validation error
    #[error("Settings validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl From<ConfigError> for TsCatError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(problems) => TsCatError::invalid_settings(problems),
            other => TsCatError::settings_with_source("cannot load settings", other),
        }
    }
}

/// Settings loader for the catalog runtime
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
        let path = path.as_ref();
        debug!("Loading settings from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut settings = Self::parse(&content)?;
        Self::apply_env_overrides(&mut settings)?;
        SettingsValidator::validate(&settings)?;

        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Parse settings from TOML text without applying overrides
    pub fn parse(content: &str) -> Result<Settings, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from `TSCAT_CONFIG_PATH`, then `tscat.toml`, then defaults
    pub fn load() -> TsCatResult<Settings> {
        let settings = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::load_config(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::load_config(DEFAULT_CONFIG_FILE)?
        } else {
            debug!("No settings file found, using defaults");
            let mut settings = Settings::default();
            Self::apply_env_overrides(&mut settings)?;
            SettingsValidator::validate(&settings)?;
            settings
        };

        Ok(settings)
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TsCatResult<Settings> {
        Ok(Self::load_config(path)?)
    }

    /// Write settings to `path` atomically.
    ///
    /// The TOML is written to a temporary file in the same directory and
    /// renamed over the target, so readers never observe a partial file.
    pub fn save<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let content = toml::to_string_pretty(settings)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;

        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Apply `TSCAT_*` environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Settings) -> Result<(), ConfigError> {
        Self::apply_overrides_from(settings, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`, which maps a variable name to
    /// its value.
    pub fn apply_overrides_from<F>(settings: &mut Settings, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("TSCAT_LOCALES_DIR") {
            settings.catalog.locales_dir = PathBuf::from(dir);
        }

        if let Some(pattern) = lookup("TSCAT_FILE_PATTERN") {
            settings.catalog.file_pattern = pattern;
        }

        if let Some(context) = lookup("TSCAT_DEFAULT_CONTEXT") {
            settings.catalog.default_context = context;
        }

        if let Some(policy) = lookup("TSCAT_DUPLICATE_POLICY") {
            settings.catalog.duplicate_policy =
                policy
                    .parse::<DuplicatePolicy>()
                    .map_err(|message| ConfigError::EnvParse {
                        var: "TSCAT_DUPLICATE_POLICY".to_string(),
                        message,
                    })?;
        }

        if let Some(preload) = lookup("TSCAT_PRELOAD") {
            settings.catalog.preload = preload
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(watch) = lookup("TSCAT_WATCH") {
            settings.catalog.watch = watch.trim().parse().map_err(|e: std::str::ParseBoolError| {
                ConfigError::EnvParse {
                    var: "TSCAT_WATCH".to_string(),
                    message: e.to_string(),
                }
            })?;
        }

        if let Some(level) = lookup("TSCAT_LOG_LEVEL") {
            settings.logging.level = level;
        }

        Ok(())
    }
}
