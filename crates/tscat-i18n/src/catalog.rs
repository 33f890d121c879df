//! In-memory catalogs

use crate::entry::{CatalogEntry, MessageStatus};
use crate::locale::Locale;
use std::collections::BTreeSet;

/// All entries of one locale, in document order.
///
/// A catalog is immutable once loaded; reloading produces a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    locale: Locale,
    source_language: Option<String>,
    version: Option<String>,
    entries: Vec<CatalogEntry>,
}

/// Entry counts of a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// All entries, obsolete ones included.
    pub total: usize,
    /// Entries with a usable finished translation.
    pub finished: usize,
    /// Live entries without a usable translation.
    pub unfinished: usize,
    /// Obsolete entries.
    pub obsolete: usize,
    /// Distinct context names.
    pub contexts: usize,
}

impl CatalogStats {
    /// Share of live entries that are translated, from 0.0 to 1.0.
    #[allow(clippy::cast_precision_loss)]
    pub fn completion(&self) -> f64 {
        let live = self.finished + self.unfinished;
        if live == 0 {
            1.0
        } else {
            self.finished as f64 / live as f64
        }
    }
}

impl Catalog {
    /// Create a catalog from entries in document order.
    pub fn new(locale: Locale, entries: Vec<CatalogEntry>) -> Self {
        Self {
            locale,
            source_language: None,
            version: None,
            entries,
        }
    }

    /// Attach the header attributes of the source document.
    #[must_use]
    pub fn with_header(mut self, source_language: Option<String>, version: Option<String>) -> Self {
        self.source_language = source_language.filter(|s| !s.is_empty());
        self.version = version.filter(|s| !s.is_empty());
        self
    }

    /// Target locale.
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Language of the source texts, when the document names one.
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// Format version of the source document.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Entries in document order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry counts.
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total: self.entries.len(),
            ..CatalogStats::default()
        };
        let mut contexts = BTreeSet::new();

        for entry in &self.entries {
            contexts.insert(entry.context.as_str());
            if entry.status == MessageStatus::Obsolete {
                stats.obsolete += 1;
            } else if entry.finished_translation().is_some() {
                stats.finished += 1;
            } else {
                stats.unfinished += 1;
            }
        }

        stats.contexts = contexts.len();
        stats
    }
}
