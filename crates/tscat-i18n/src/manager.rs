//! Internationalization manager

use crate::audit::audit_placeholders;
use crate::catalog::Catalog;
use crate::diagnostics::MissingTranslations;
use crate::error::I18nResult;
use crate::formatter::PlaceholderFormatter;
use crate::resource::ResourceManager;
use crate::store::{CatalogStore, ResolvedMessage};
use crate::watcher::CatalogWatcher;
use crate::Locale;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use tscat_config::{CatalogSettings, DuplicatePolicy};

type StoreMap = HashMap<Locale, Arc<CatalogStore>>;

/// Loads catalogs per locale and answers translation requests
///
/// Every published store is an immutable snapshot. Loading or reloading a
/// locale swaps in a new map, so a caller holding a snapshot keeps seeing
/// the data it started with.
#[derive(Debug)]
pub struct I18nManager {
    /// Resource manager for locating catalog files
    resources: ResourceManager,
    /// How duplicate keys are treated when indexing
    duplicate_policy: DuplicatePolicy,
    /// Context for default-context lookups
    default_context: String,
    /// Locales to load at startup
    preload: Vec<String>,
    /// Published stores by locale
    stores: ArcSwap<StoreMap>,
    /// Lookups that fell back to the source text
    missing: MissingTranslations,
}

impl I18nManager {
    /// Create a manager without loading any catalog
    pub fn new(settings: &CatalogSettings) -> Self {
        Self {
            resources: ResourceManager::from_settings(settings),
            duplicate_policy: settings.duplicate_policy,
            default_context: settings.default_context.clone(),
            preload: settings.preload.clone(),
            stores: ArcSwap::from_pointee(HashMap::new()),
            missing: MissingTranslations::new(),
        }
    }

    /// Create a manager and load the configured preload locales
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let manager = Self::new(settings);
        let loaded = manager.load_preloaded();
        info!(
            "I18nManager initialized with {} of {} preload locale(s)",
            loaded,
            manager.preload.len()
        );
        manager
    }

    /// Create a shared manager, load the preload locales and start the file
    /// watcher when `settings.watch` is set
    ///
    /// Dropping the returned watcher stops hot reload.
    pub fn start(settings: &CatalogSettings) -> I18nResult<(Arc<Self>, Option<CatalogWatcher>)> {
        let manager = Arc::new(Self::from_settings(settings));
        let watcher = if settings.watch {
            Some(CatalogWatcher::spawn(Arc::clone(&manager))?)
        } else {
            debug!("Catalog hot reload disabled");
            None
        };
        Ok((manager, watcher))
    }

    /// Load every preload locale, returning how many succeeded
    pub fn load_preloaded(&self) -> usize {
        let mut loaded = 0;
        for code in &self.preload {
            let result = Locale::parse(code).and_then(|locale| self.load_locale(&locale));
            match result {
                Ok(_) => loaded += 1,
                Err(e) => warn!("Failed to preload locale '{}': {}", code, e),
            }
        }
        loaded
    }

    /// Read, parse, index and publish the catalog for `locale`
    pub fn load_locale(&self, locale: &Locale) -> I18nResult<Arc<CatalogStore>> {
        debug!("Loading locale: {}", locale);

        let catalog = self.resources.load(locale)?;
        let store = self.build(catalog)?;
        self.publish(locale, Arc::clone(&store));

        info!("Successfully loaded locale: {}", locale);
        Ok(store)
    }

    /// Replace the catalog for `locale` with the current file contents
    ///
    /// On failure the previously published snapshot stays in place.
    pub fn reload_locale(&self, locale: &Locale) -> I18nResult<Arc<CatalogStore>> {
        debug!("Reloading locale: {}", locale);

        match self.load_locale(locale) {
            Ok(store) => {
                info!("Successfully reloaded locale: {}", locale);
                Ok(store)
            }
            Err(e) => {
                if self.is_loaded(locale) {
                    warn!(
                        "Reload of locale {} failed, keeping previous catalog: {}",
                        locale, e
                    );
                } else {
                    warn!("Reload of locale {} failed: {}", locale, e);
                }
                Err(e)
            }
        }
    }

    /// Index and publish an already parsed catalog under its own locale
    pub fn insert_catalog(&self, catalog: Catalog) -> I18nResult<Arc<CatalogStore>> {
        let locale = catalog.locale().clone();
        let store = self.build(catalog)?;
        self.publish(&locale, Arc::clone(&store));

        info!("Published catalog for locale: {}", locale);
        Ok(store)
    }

    /// Stop serving `locale`; returns whether it was loaded
    pub fn unload_locale(&self, locale: &Locale) -> bool {
        let mut removed = false;
        self.stores.rcu(|current| {
            let mut next = StoreMap::clone(current);
            removed = next.remove(locale).is_some();
            next
        });
        if removed {
            info!("Unloaded locale: {}", locale);
        }
        removed
    }

    /// The current store for `locale`
    pub fn snapshot(&self, locale: &Locale) -> Option<Arc<CatalogStore>> {
        self.stores.load().get(locale).cloned()
    }

    /// Whether a catalog is published for `locale`
    pub fn is_loaded(&self, locale: &Locale) -> bool {
        self.stores.load().contains_key(locale)
    }

    /// All published locales, sorted by code
    pub fn loaded_locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = self.stores.load().keys().cloned().collect();
        locales.sort_by_key(Locale::code);
        locales
    }

    /// Translate `source_text` in `context`, falling back to `source_text`
    pub fn translate(&self, locale: &Locale, context: &str, source_text: &str) -> String {
        match self.store_for(locale, source_text) {
            Some(store) => self.finish(locale, context, store.lookup(context, source_text)),
            None => source_text.to_string(),
        }
    }

    /// Translate `source_text` in the default context
    pub fn translate_default(&self, locale: &Locale, source_text: &str) -> String {
        match self.store_for(locale, source_text) {
            Some(store) => self.finish(
                locale,
                store.default_context(),
                store.lookup_with_default_context(source_text),
            ),
            None => source_text.to_string(),
        }
    }

    /// Translate an entry distinguished by its disambiguation comment
    pub fn translate_disambiguated(
        &self,
        locale: &Locale,
        context: &str,
        source_text: &str,
        comment: &str,
    ) -> String {
        match self.store_for(locale, source_text) {
            Some(store) => self.finish(
                locale,
                context,
                store.lookup_disambiguated(context, source_text, comment),
            ),
            None => source_text.to_string(),
        }
    }

    /// Translate and substitute `args` into the result
    ///
    /// If the placeholders need more arguments than supplied, the missing
    /// ones are left in the text and a warning is logged.
    pub fn translate_format<S: AsRef<str>>(
        &self,
        locale: &Locale,
        context: &str,
        source_text: &str,
        args: &[S],
    ) -> String {
        let text = self.translate(locale, context, source_text);
        PlaceholderFormatter::format(&text, args).unwrap_or_else(|e| {
            warn!(
                "Formatting '{}' in context '{}' ({}) failed: {}",
                text, context, locale, e
            );
            PlaceholderFormatter::format_lossy(&text, args)
        })
    }

    /// Translate the plural form for `count` and substitute `%n` and `args`
    pub fn translate_plural<S: AsRef<str>>(
        &self,
        locale: &Locale,
        context: &str,
        source_text: &str,
        count: i64,
        args: &[S],
    ) -> String {
        let text = match self.store_for(locale, source_text) {
            Some(store) => self.finish(
                locale,
                context,
                store.lookup_plural(context, source_text, count),
            ),
            None => source_text.to_string(),
        };
        PlaceholderFormatter::format_with_count(&text, count, args).unwrap_or_else(|e| {
            warn!(
                "Formatting '{}' in context '{}' ({}) failed: {}",
                text, context, locale, e
            );
            PlaceholderFormatter::format_lossy_with_count(&text, count, args)
        })
    }

    /// Record of lookups that fell back to the source text
    pub const fn missing_translations(&self) -> &MissingTranslations {
        &self.missing
    }

    /// Get the resource manager
    pub const fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// Duplicate policy applied when indexing catalogs
    pub const fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    /// Context searched by default-context lookups
    pub fn default_context(&self) -> &str {
        &self.default_context
    }

    fn build(&self, catalog: Catalog) -> I18nResult<Arc<CatalogStore>> {
        let mismatches = audit_placeholders(&catalog);
        if !mismatches.is_empty() {
            warn!(
                "Catalog for {} has {} translation(s) with mismatched placeholders",
                catalog.locale(),
                mismatches.len()
            );
            for mismatch in &mismatches {
                debug!(
                    "Placeholder mismatch in context '{}': '{}' -> '{}'",
                    mismatch.context, mismatch.source_text, mismatch.translation
                );
            }
        }

        let stats = catalog.stats();
        debug!(
            "Catalog for {}: {} finished, {} unfinished, {} obsolete in {} context(s)",
            catalog.locale(),
            stats.finished,
            stats.unfinished,
            stats.obsolete,
            stats.contexts
        );

        let store = CatalogStore::build(catalog, self.duplicate_policy)?
            .with_default_context(self.default_context.clone());
        Ok(Arc::new(store))
    }

    fn publish(&self, locale: &Locale, store: Arc<CatalogStore>) {
        self.stores.rcu(|current| {
            let mut next = StoreMap::clone(current);
            next.insert(locale.clone(), Arc::clone(&store));
            next
        });
        debug!("catalog published for locale {}", locale);
    }

    fn store_for(&self, locale: &Locale, source_text: &str) -> Option<Arc<CatalogStore>> {
        let store = self.snapshot(locale);
        if store.is_none() {
            trace!("Locale {} is not loaded, passing '{}' through", locale, source_text);
        }
        store
    }

    fn finish(&self, locale: &Locale, context: &str, resolved: ResolvedMessage<'_>) -> String {
        if let Some(reason) = resolved.missing_reason() {
            self.missing.record(locale, context, resolved.text, reason);
        }
        resolved.text.to_string()
    }
}
