//! Settings schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tscat_common::LoggingConfig;

/// Top-level settings for the catalog runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog discovery and indexing settings.
    pub catalog: CatalogSettings,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Where catalogs live and how they are indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory holding one catalog file per locale.
    pub locales_dir: PathBuf,
    /// File name pattern; `{locale}` is replaced by the Qt locale code.
    pub file_pattern: String,
    /// Context searched by default-context lookups.
    pub default_context: String,
    /// Locales loaded when the manager starts.
    pub preload: Vec<String>,
    /// How entries sharing a `(context, source)` key are treated.
    pub duplicate_policy: DuplicatePolicy,
    /// Reload catalogs when their files change on disk.
    pub watch: bool,
}

/// Treatment of entries that share a `(context, source)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The entry appearing last in document order answers lookups.
    #[default]
    LastWins,
    /// Building a store fails on the first duplicate.
    Strict,
}

impl DuplicatePolicy {
    /// Settings-file spelling of the policy.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastWins => "last_wins",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_wins" => Ok(Self::LastWins),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown duplicate policy '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_policy_parsing() {
        assert_eq!("strict".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Strict));
        assert_eq!("Last-Wins".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::LastWins));
        assert!("first_wins".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn test_settings_from_toml() {
        let settings: Settings = toml::from_str(
            r#"
[catalog]
locales_dir = "safe_qgis/i18n"
preload = ["id", "vi"]
duplicate_policy = "strict"

[logging]
level = "debug"
"#,
        )
        .unwrap();

        assert_eq!(settings.catalog.locales_dir, PathBuf::from("safe_qgis/i18n"));
        assert_eq!(settings.catalog.preload, vec!["id", "vi"]);
        assert_eq!(settings.catalog.duplicate_policy, DuplicatePolicy::Strict);
        assert_eq!(settings.catalog.default_context, "@default");
        assert_eq!(settings.logging.level, "debug");
    }
}
