//! Error types for catalog operations

use std::path::PathBuf;
use thiserror::Error;
use tscat_common::TsCatError;

/// Why a catalog document could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The XML reader rejected the document
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The document contains no element at all
    #[error("document has no root element")]
    MissingRoot,

    /// The root element is not `<TS>`
    #[error("unexpected root element <{0}>, expected <TS>")]
    UnexpectedRoot(String),

    /// The document ended while elements were still open
    #[error("document ended inside <{0}>")]
    UnexpectedEof(String),

    /// A `<message>` has no `<source>` child
    #[error("message in context '{context}' has no <source>")]
    MissingSource {
        /// Context holding the message
        context: String,
    },

    /// Neither the document nor the caller named the catalog language
    #[error("catalog declares no language")]
    MissingLanguage,

    /// The `language` attribute is not a valid language identifier
    #[error("invalid language identifier '{0}'")]
    InvalidLanguage(String),
}

/// Errors that can occur during catalog operations
#[derive(Error, Debug)]
pub enum I18nError {
    /// A catalog document could not be parsed
    #[error("Failed to parse catalog at byte {position}: {kind}")]
    Parse {
        /// What went wrong
        kind: ParseErrorKind,
        /// Byte offset into the document
        position: usize,
    },

    /// Two live entries share a key while the strict duplicate policy is on
    #[error("Duplicate entry for source '{source_text}' in context '{context}'")]
    DuplicateKey {
        /// Context of the repeated key
        context: String,
        /// Source text of the repeated key
        source_text: String,
    },

    /// A format call consumed more placeholders than arguments supplied
    #[error("Placeholders need {required} argument(s) but {supplied} were supplied")]
    ArgumentCountMismatch {
        /// Arguments the placeholders consume
        required: usize,
        /// Arguments passed by the caller
        supplied: usize,
    },

    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// Failed to read a catalog file
    #[error("Failed to load catalog file {path}: {source}")]
    ResourceLoad {
        /// File or directory that could not be read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The catalog file watcher could not be set up
    #[error("Failed to watch catalog directory: {0}")]
    Watch(#[from] notify::Error),
}

impl I18nError {
    /// Create a parse error at `position`
    pub fn parse(kind: ParseErrorKind, position: usize) -> Self {
        Self::Parse { kind, position }
    }

    /// The parse failure kind, if this is a parse error
    pub fn parse_kind(&self) -> Option<&ParseErrorKind> {
        match self {
            Self::Parse { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

impl From<I18nError> for TsCatError {
    fn from(err: I18nError) -> Self {
        let message = match &err {
            I18nError::Parse { .. } => "cannot parse catalog",
            I18nError::ResourceLoad { .. } => "cannot read catalog",
            _ => "catalog operation failed",
        };
        TsCatError::catalog(message, err)
    }
}

/// Result type for catalog operations
pub type I18nResult<T> = Result<T, I18nError>;
