//! Runtime validation of settings.

use crate::defaults::LOCALE_PLACEHOLDER;
use crate::loader::ConfigError;
use crate::schema::Settings;
use unic_langid::LanguageIdentifier;

/// Settings validator.
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validates settings, collecting every problem instead of stopping at
    /// the first one.
    pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
        let problems = Self::problems(settings);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems))
        }
    }

    /// Human readable descriptions of everything wrong with `settings`.
    pub fn problems(settings: &Settings) -> Vec<String> {
        let mut problems = Vec::new();
        let catalog = &settings.catalog;

        if catalog.locales_dir.as_os_str().is_empty() {
            problems.push("catalog.locales_dir must not be empty".to_string());
        }

        if !catalog.file_pattern.contains(LOCALE_PLACEHOLDER) {
            problems.push(format!(
                "catalog.file_pattern '{}' must contain {LOCALE_PLACEHOLDER}",
                catalog.file_pattern
            ));
        } else if catalog.file_pattern.contains('/') || catalog.file_pattern.contains('\\') {
            problems.push(format!(
                "catalog.file_pattern '{}' must be a file name, not a path",
                catalog.file_pattern
            ));
        }

        for code in &catalog.preload {
            if code.replace('_', "-").parse::<LanguageIdentifier>().is_err() {
                problems.push(format!("catalog.preload entry '{code}' is not a language identifier"));
            }
        }

        if settings.logging.level.trim().is_empty() {
            problems.push("logging.level must not be empty".to_string());
        }

        problems
    }
}
