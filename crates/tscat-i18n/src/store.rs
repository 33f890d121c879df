//! Keyed lookup over a loaded catalog
//!
//! A [`CatalogStore`] indexes the live entries of a [`Catalog`] by
//! `(context, source_text)` once, at construction. Lookups never fail: a
//! key without a usable translation resolves to its source text, and the
//! returned [`Resolution`] says why.

use crate::catalog::Catalog;
use crate::entry::{CatalogEntry, MessageStatus};
use crate::error::{I18nError, I18nResult};
use crate::locale::Locale;
use crate::pluralization::PluralRule;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};
use tscat_config::DuplicatePolicy;

/// Context searched by [`CatalogStore::lookup_with_default_context`] unless
/// the store was built with another one.
pub const DEFAULT_CONTEXT: &str = tscat_config::DEFAULT_CONTEXT;

/// Why a lookup fell back to the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingReason {
    /// No live entry has the key
    NoEntry,
    /// The entry is not marked finished
    Unfinished,
    /// The entry is finished but its translation is empty or absent
    EmptyTranslation,
    /// The entry lacks the plural form selected for the count
    MissingPluralForm,
}

/// How a lookup produced its text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// The catalog's translation was used
    Translated,
    /// The source text was returned instead
    Fallback(MissingReason),
}

/// Result of a lookup; borrows from the store and the caller's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMessage<'a> {
    /// Text to display
    pub text: &'a str,
    /// Where the text came from
    pub resolution: Resolution,
}

impl<'a> ResolvedMessage<'a> {
    const fn translated(text: &'a str) -> Self {
        Self {
            text,
            resolution: Resolution::Translated,
        }
    }

    const fn fallback(source_text: &'a str, reason: MissingReason) -> Self {
        Self {
            text: source_text,
            resolution: Resolution::Fallback(reason),
        }
    }

    /// Whether the text is a translation
    pub const fn is_translated(&self) -> bool {
        matches!(self.resolution, Resolution::Translated)
    }

    /// The reason for a fallback, if one happened
    pub const fn missing_reason(&self) -> Option<MissingReason> {
        match self.resolution {
            Resolution::Translated => None,
            Resolution::Fallback(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Default)]
struct ContextIndex {
    /// Source text to the winning entry
    sources: HashMap<String, usize>,
    /// Source text and disambiguation comment to the winning entry
    commented: HashMap<(String, String), usize>,
}

/// Immutable lookup index over one catalog
#[derive(Debug)]
pub struct CatalogStore {
    catalog: Catalog,
    contexts: HashMap<String, ContextIndex>,
    default_context: String,
    plural_rule: PluralRule,
    indexed: usize,
}

impl CatalogStore {
    /// Index `catalog` under `policy`.
    ///
    /// Obsolete entries stay in the catalog but are not indexed. With
    /// [`DuplicatePolicy::LastWins`] a later entry replaces an earlier one
    /// with the same key; with [`DuplicatePolicy::Strict`] that is an error
    /// unless the two carry different disambiguation comments. An entry
    /// without a comment differs from every commented one.
    pub fn build(catalog: Catalog, policy: DuplicatePolicy) -> I18nResult<Self> {
        let mut contexts: HashMap<String, ContextIndex> = HashMap::new();
        let mut seen: HashSet<(&str, &str, Option<&str>)> = HashSet::new();
        let mut indexed = 0;
        let mut replaced = 0;

        for (position, entry) in catalog.entries().iter().enumerate() {
            if !entry.is_live() {
                continue;
            }

            let repeated = !seen.insert((
                entry.context.as_str(),
                entry.source_text.as_str(),
                entry.comment.as_deref(),
            ));
            if policy == DuplicatePolicy::Strict && repeated {
                return Err(I18nError::DuplicateKey {
                    context: entry.context.clone(),
                    source_text: entry.source_text.clone(),
                });
            }

            let index = contexts.entry(entry.context.clone()).or_default();

            if index.sources.contains_key(&entry.source_text) {
                trace!(
                    "Entry '{}' in context '{}' replaces an earlier one",
                    entry.source_text,
                    entry.context
                );
                replaced += 1;
            } else {
                indexed += 1;
            }

            index.sources.insert(entry.source_text.clone(), position);
            if let Some(comment) = &entry.comment {
                index
                    .commented
                    .insert((entry.source_text.clone(), comment.clone()), position);
            }
        }

        debug!(
            "Indexed {} key(s) for locale {} ({} duplicate(s) resolved)",
            indexed,
            catalog.locale(),
            replaced
        );

        let plural_rule = PluralRule::for_locale(catalog.locale());
        Ok(Self {
            catalog,
            contexts,
            default_context: DEFAULT_CONTEXT.to_string(),
            plural_rule,
            indexed,
        })
    }

    /// Use `context` for [`Self::lookup_with_default_context`].
    #[must_use]
    pub fn with_default_context(mut self, context: impl Into<String>) -> Self {
        self.default_context = context.into();
        self
    }

    /// Resolve `source_text` in `context`, falling back to `source_text`.
    pub fn lookup<'a>(&'a self, context: &str, source_text: &'a str) -> ResolvedMessage<'a> {
        match self.entry(context, source_text) {
            Some(entry) => resolve(entry, source_text),
            None => ResolvedMessage::fallback(source_text, MissingReason::NoEntry),
        }
    }

    /// Resolve `source_text` in the default context.
    pub fn lookup_with_default_context<'a>(&'a self, source_text: &'a str) -> ResolvedMessage<'a> {
        self.lookup(&self.default_context, source_text)
    }

    /// Resolve an entry distinguished by its disambiguation comment.
    ///
    /// Falls back to the plain `(context, source_text)` entry when no entry
    /// carries `comment`.
    pub fn lookup_disambiguated<'a>(
        &'a self,
        context: &str,
        source_text: &'a str,
        comment: &str,
    ) -> ResolvedMessage<'a> {
        let position = self.contexts.get(context).and_then(|index| {
            index
                .commented
                .get(&(source_text.to_string(), comment.to_string()))
        });

        match position {
            Some(&position) => resolve(&self.catalog.entries()[position], source_text),
            None => self.lookup(context, source_text),
        }
    }

    /// Resolve the plural form of `source_text` for `count`.
    ///
    /// Non-numerus entries answer with their single translation.
    pub fn lookup_plural<'a>(
        &'a self,
        context: &str,
        source_text: &'a str,
        count: i64,
    ) -> ResolvedMessage<'a> {
        let Some(entry) = self.entry(context, source_text) else {
            return ResolvedMessage::fallback(source_text, MissingReason::NoEntry);
        };
        if !entry.numerus {
            return resolve(entry, source_text);
        }
        if entry.status != MessageStatus::Finished {
            return ResolvedMessage::fallback(source_text, MissingReason::Unfinished);
        }

        let form = self.plural_rule.form_index(count);
        match entry.numerus_forms.get(form) {
            Some(text) if !text.is_empty() => ResolvedMessage::translated(text),
            _ => ResolvedMessage::fallback(source_text, MissingReason::MissingPluralForm),
        }
    }

    /// Whether a live entry has the key, translated or not.
    pub fn contains(&self, context: &str, source_text: &str) -> bool {
        self.entry(context, source_text).is_some()
    }

    /// The live entry for a key.
    pub fn entry(&self, context: &str, source_text: &str) -> Option<&CatalogEntry> {
        self.contexts
            .get(context)
            .and_then(|index| index.sources.get(source_text))
            .map(|&position| &self.catalog.entries()[position])
    }

    /// Number of distinct indexed keys.
    pub const fn len(&self) -> usize {
        self.indexed
    }

    /// Whether no key is indexed.
    pub const fn is_empty(&self) -> bool {
        self.indexed == 0
    }

    /// Names of contexts with at least one live entry, sorted.
    pub fn contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The indexed catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Locale of the indexed catalog.
    pub const fn locale(&self) -> &Locale {
        self.catalog.locale()
    }

    /// Context used by [`Self::lookup_with_default_context`].
    pub fn default_context(&self) -> &str {
        &self.default_context
    }

    /// Plural rule of the catalog locale.
    pub const fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }
}

fn resolve<'a>(entry: &'a CatalogEntry, source_text: &'a str) -> ResolvedMessage<'a> {
    if let Some(text) = entry.finished_translation() {
        return ResolvedMessage::translated(text);
    }
    let reason = match entry.status {
        MessageStatus::Finished => MissingReason::EmptyTranslation,
        MessageStatus::Unfinished | MessageStatus::Obsolete => MissingReason::Unfinished,
    };
    ResolvedMessage::fallback(source_text, reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(entries: Vec<CatalogEntry>) -> Catalog {
        Catalog::new(Locale::parse("id").unwrap(), entries)
    }

    fn last_wins(catalog: Catalog) -> CatalogStore {
        CatalogStore::build(catalog, DuplicatePolicy::LastWins).unwrap()
    }

    #[test]
    fn test_finished_translation_is_returned() {
        let store = CatalogStore::build(
            catalog(vec![CatalogEntry::finished(
                "Aggregator",
                "Use default",
                "Pergunakan default",
            )]),
            DuplicatePolicy::LastWins,
        )
        .unwrap();

        let resolved = store.lookup("Aggregator", "Use default");
        assert_eq!(resolved.text, "Pergunakan default");
        assert!(resolved.is_translated());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fallback_reasons() {
        let store = last_wins(catalog(vec![
            CatalogEntry::unfinished("Dock", "Run"),
            CatalogEntry::finished("Dock", "Cancel", ""),
        ]));

        let run = store.lookup("Dock", "Run");
        assert_eq!(run.text, "Run");
        assert_eq!(run.missing_reason(), Some(MissingReason::Unfinished));

        let cancel = store.lookup("Dock", "Cancel");
        assert_eq!(cancel.text, "Cancel");
        assert_eq!(cancel.missing_reason(), Some(MissingReason::EmptyTranslation));

        let absent = store.lookup("Dock", "Help");
        assert_eq!(absent.text, "Help");
        assert_eq!(absent.missing_reason(), Some(MissingReason::NoEntry));

        let other_context = store.lookup("Map", "Run");
        assert_eq!(other_context.missing_reason(), Some(MissingReason::NoEntry));
    }

    #[test]
    fn test_duplicates_last_wins() {
        let store = CatalogStore::build(
            catalog(vec![
                CatalogEntry::finished("Aggregator", "Use default", "Gunakan default"),
                CatalogEntry::finished("Aggregator", "Use default", "Pergunakan default"),
            ]),
            DuplicatePolicy::LastWins,
        )
        .unwrap();

        assert_eq!(
            store.lookup("Aggregator", "Use default").text,
            "Pergunakan default"
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_later_unfinished_duplicate_shadows_translation() {
        let store = last_wins(catalog(vec![
            CatalogEntry::finished("Dock", "Run", "Jalankan"),
            CatalogEntry::unfinished("Dock", "Run"),
        ]));
        assert_eq!(store.lookup("Dock", "Run").text, "Run");
    }

    #[test]
    fn test_strict_policy_rejects_duplicates() {
        let err = CatalogStore::build(
            catalog(vec![
                CatalogEntry::finished("Aggregator", "Use default", "A"),
                CatalogEntry::finished("Aggregator", "Use default", "B"),
            ]),
            DuplicatePolicy::Strict,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            I18nError::DuplicateKey { ref context, ref source_text }
                if context == "Aggregator" && source_text == "Use default"
        ));
    }

    #[test]
    fn test_strict_policy_allows_distinct_comments() {
        let store = CatalogStore::build(
            catalog(vec![
                CatalogEntry::finished("Dock", "Open", "Buka").with_comment("verb"),
                CatalogEntry::finished("Dock", "Open", "Terbuka").with_comment("state"),
            ]),
            DuplicatePolicy::Strict,
        )
        .unwrap();

        assert_eq!(store.lookup_disambiguated("Dock", "Open", "verb").text, "Buka");
        assert_eq!(
            store.lookup_disambiguated("Dock", "Open", "state").text,
            "Terbuka"
        );
        assert_eq!(
            store.lookup_disambiguated("Dock", "Open", "noun").text,
            "Terbuka"
        );
    }

    #[test]
    fn test_strict_policy_allows_comment_beside_plain_entry() {
        let store = CatalogStore::build(
            catalog(vec![
                CatalogEntry::finished("Dock", "Open", "Buka"),
                CatalogEntry::finished("Dock", "Open", "Terbuka").with_comment("state"),
            ]),
            DuplicatePolicy::Strict,
        )
        .unwrap();

        assert_eq!(store.lookup_disambiguated("Dock", "Open", "state").text, "Terbuka");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_strict_policy_rejects_repeated_plain_entry_among_comments() {
        let result = CatalogStore::build(
            catalog(vec![
                CatalogEntry::finished("Dock", "Open", "Buka"),
                CatalogEntry::finished("Dock", "Open", "Terbuka").with_comment("state"),
                CatalogEntry::finished("Dock", "Open", "Membuka"),
            ]),
            DuplicatePolicy::Strict,
        );
        assert!(matches!(result, Err(I18nError::DuplicateKey { .. })));
    }

    #[test]
    fn test_strict_policy_rejects_repeated_comment() {
        let result = CatalogStore::build(
            catalog(vec![
                CatalogEntry::finished("Dock", "Open", "Buka").with_comment("verb"),
                CatalogEntry::finished("Dock", "Open", "Terbuka").with_comment("state"),
                CatalogEntry::finished("Dock", "Open", "Membuka").with_comment("verb"),
            ]),
            DuplicatePolicy::Strict,
        );
        assert!(matches!(result, Err(I18nError::DuplicateKey { .. })));
    }

    #[test]
    fn test_obsolete_entries_are_not_indexed() {
        let store = CatalogStore::build(
            catalog(vec![
                CatalogEntry::finished("Dock", "Run", "Jalankan"),
                CatalogEntry::finished("Dock", "Run", "Lari").with_status(MessageStatus::Obsolete),
                CatalogEntry::finished("Old", "Gone", "Hilang").with_status(MessageStatus::Obsolete),
            ]),
            DuplicatePolicy::Strict,
        )
        .unwrap();

        assert_eq!(store.lookup("Dock", "Run").text, "Jalankan");
        assert!(!store.contains("Old", "Gone"));
        assert_eq!(store.contexts(), vec!["Dock"]);
        assert_eq!(store.catalog().len(), 3);
    }

    #[test]
    fn test_default_context() {
        let store = last_wins(catalog(vec![
            CatalogEntry::finished("@default", "Cancel", "Batal"),
            CatalogEntry::finished("Global", "Cancel", "Batalkan"),
        ]));
        assert_eq!(store.lookup_with_default_context("Cancel").text, "Batal");

        let store = store.with_default_context("Global");
        assert_eq!(store.default_context(), "Global");
        assert_eq!(store.lookup_with_default_context("Cancel").text, "Batalkan");
    }

    #[test]
    fn test_plural_lookup() {
        let mut entry = CatalogEntry::finished("Report", "%n building(s)", "%n bangunan");
        entry.numerus = true;
        entry.numerus_forms = vec!["%n bangunan".to_string()];

        let mut russian = CatalogEntry::finished("Report", "%n file(s)", "%n файл");
        russian.numerus = true;
        russian.numerus_forms = vec!["%n файл".to_string(), "%n файла".to_string()];

        let id_store = last_wins(catalog(vec![entry]));
        assert_eq!(id_store.lookup_plural("Report", "%n building(s)", 7).text, "%n bangunan");

        let ru_store =
            last_wins(Catalog::new(Locale::parse("ru").unwrap(), vec![russian]));
        assert_eq!(ru_store.lookup_plural("Report", "%n file(s)", 3).text, "%n файла");

        let many = ru_store.lookup_plural("Report", "%n file(s)", 5);
        assert_eq!(many.text, "%n file(s)");
        assert_eq!(many.missing_reason(), Some(MissingReason::MissingPluralForm));
    }
}
