//! Record of lookups that fell back to the source text

use crate::locale::Locale;
use crate::store::MissingReason;
use dashmap::DashMap;
use tracing::{trace, warn};

/// A key that resolved to its source text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissingKey {
    /// Locale the lookup was made in
    pub locale: Locale,
    /// Context of the lookup
    pub context: String,
    /// Source text of the lookup
    pub source_text: String,
}

/// One recorded fallback with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslation {
    /// The key that fell back
    pub key: MissingKey,
    /// Why the most recent lookup fell back
    pub reason: MissingReason,
    /// How many lookups fell back for this key
    pub count: u64,
}

/// Concurrent fallback counters, keyed by locale, context and source text
#[derive(Debug, Default)]
pub struct MissingTranslations {
    entries: DashMap<MissingKey, (MissingReason, u64)>,
}

impl MissingTranslations {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a fallback, returning the occurrences so far for its key.
    ///
    /// The first occurrence of a key is logged at warn level.
    pub fn record(
        &self,
        locale: &Locale,
        context: &str,
        source_text: &str,
        reason: MissingReason,
    ) -> u64 {
        let key = MissingKey {
            locale: locale.clone(),
            context: context.to_string(),
            source_text: source_text.to_string(),
        };

        let mut slot = self.entries.entry(key).or_insert((reason, 0));
        slot.0 = reason;
        slot.1 += 1;
        let count = slot.1;
        drop(slot);

        if count == 1 {
            warn!(
                "Missing translation for '{}' in context '{}' ({}): {:?}",
                source_text, context, locale, reason
            );
        } else {
            trace!(
                "Missing translation for '{}' in context '{}' ({}) seen {} times",
                source_text,
                context,
                locale,
                count
            );
        }
        count
    }

    /// All recorded fallbacks, sorted by locale, context and source text
    pub fn snapshot(&self) -> Vec<MissingTranslation> {
        let mut records: Vec<MissingTranslation> = self
            .entries
            .iter()
            .map(|item| MissingTranslation {
                key: item.key().clone(),
                reason: item.value().0,
                count: item.value().1,
            })
            .collect();

        records.sort_by(|a, b| {
            (a.key.locale.code(), &a.key.context, &a.key.source_text).cmp(&(
                b.key.locale.code(),
                &b.key.context,
                &b.key.source_text,
            ))
        });
        records
    }

    /// Fallbacks recorded for one locale
    pub fn for_locale(&self, locale: &Locale) -> Vec<MissingTranslation> {
        self.snapshot()
            .into_iter()
            .filter(|record| &record.key.locale == locale)
            .collect()
    }

    /// Total number of fallback lookups
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|item| item.value().1).sum()
    }

    /// Number of distinct keys that fell back
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every record
    pub fn clear(&self) {
        self.entries.clear();
    }
}
