//! Workspace-wide error type

use thiserror::Error;

/// Boxed cause carried by [`TsCatError`] variants
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for tscat operations
pub type Result<T> = std::result::Result<T, TsCatError>;

/// Error returned across crate boundaries.
///
/// Each crate keeps a precise error enum of its own (`ConfigError`,
/// `I18nError`) and converts into this one at its public edges.
#[derive(Error, Debug)]
pub enum TsCatError {
    /// Settings could not be read, parsed or written
    #[error("Settings error: {message}")]
    Settings {
        /// What failed
        message: String,
        /// Underlying cause
        #[source]
        source: Option<BoxError>,
    },

    /// Settings were read but are not usable
    #[error("Invalid settings: {}", .problems.join("; "))]
    InvalidSettings {
        /// Each problem found
        problems: Vec<String>,
    },

    /// A catalog could not be loaded, indexed or applied
    #[error("Catalog error{}: {message}", locale_suffix(.locale))]
    Catalog {
        /// What failed
        message: String,
        /// Locale concerned, when known
        locale: Option<String>,
        /// Underlying cause
        #[source]
        source: Option<BoxError>,
    },

    /// File system failure outside catalog and settings loading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tracing subscriber could not be installed
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Why installation failed
        message: String,
    },
}

impl TsCatError {
    /// Settings failure with no underlying cause
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
            source: None,
        }
    }

    /// Settings failure caused by `source`
    pub fn settings_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Settings {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Settings rejected for the listed problems
    pub fn invalid_settings(problems: Vec<String>) -> Self {
        Self::InvalidSettings { problems }
    }

    /// Catalog failure caused by `source`
    pub fn catalog(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Catalog {
            message: message.into(),
            locale: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach the locale a catalog failure concerns
    #[must_use]
    pub fn for_locale(self, locale: impl Into<String>) -> Self {
        match self {
            Self::Catalog {
                message, source, ..
            } => Self::Catalog {
                message,
                locale: Some(locale.into()),
                source,
            },
            other => other,
        }
    }

    /// Logging bootstrap failure
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Locale a catalog failure concerns, when known
    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::Catalog { locale, .. } => locale.as_deref(),
            _ => None,
        }
    }
}

fn locale_suffix(locale: &Option<String>) -> String {
    locale
        .as_deref()
        .map(|locale| format!(" ({locale})"))
        .unwrap_or_default()
}

impl From<toml::de::Error> for TsCatError {
    fn from(err: toml::de::Error) -> Self {
        Self::settings_with_source("cannot parse TOML", err)
    }
}

impl From<toml::ser::Error> for TsCatError {
    fn from(err: toml::ser::Error) -> Self {
        Self::settings_with_source("cannot serialize TOML", err)
    }
}
