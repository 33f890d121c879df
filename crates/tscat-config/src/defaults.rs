//! Default values for settings.

use crate::schema::{CatalogSettings, DuplicatePolicy, Settings};
use std::path::PathBuf;
use tscat_common::LoggingConfig;

/// Token in [`CatalogSettings::file_pattern`] replaced by the locale code.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";

/// Default catalog directory, relative to the working directory.
pub const DEFAULT_LOCALES_DIR: &str = "i18n";

/// Default catalog file name pattern.
pub const DEFAULT_FILE_PATTERN: &str = "inasafe_{locale}.ts";

/// Context holding strings not tied to a UI component.
pub const DEFAULT_CONTEXT: &str = "@default";

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            locales_dir: PathBuf::from(DEFAULT_LOCALES_DIR),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            default_context: DEFAULT_CONTEXT.to_string(),
            preload: Vec::new(),
            duplicate_policy: DuplicatePolicy::LastWins,
            watch: false,
        }
    }
}
