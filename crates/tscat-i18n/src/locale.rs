//! Locale identifiers

use crate::error::{I18nError, I18nResult};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A catalog locale.
///
/// Parsed from BCP-47 tags or the underscore form Qt uses in catalog
/// headers and file names (`pt_BR`). Two spellings of the same tag compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(LanguageIdentifier);

impl Locale {
    /// Parse a locale from a language code
    pub fn parse(code: &str) -> I18nResult<Self> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(I18nError::InvalidLanguageId(code.to_string()));
        }

        trimmed
            .replace('_', "-")
            .parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|_| I18nError::InvalidLanguageId(code.to_string()))
    }

    /// Canonical BCP-47 spelling, e.g. `pt-BR`
    pub fn code(&self) -> String {
        self.0.to_string()
    }

    /// Qt spelling used in catalog file names, e.g. `pt_BR`
    pub fn qt_code(&self) -> String {
        self.code().replace('-', "_")
    }

    /// Primary language subtag, e.g. `pt`
    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }

    /// Underlying language identifier
    pub const fn language_identifier(&self) -> &LanguageIdentifier {
        &self.0
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
