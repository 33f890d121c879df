//! Reload catalogs when their files change

use crate::error::I18nResult;
use crate::manager::I18nManager;
use crate::Locale;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Watches the locales directory of an [`I18nManager`]
///
/// Only locales that are already loaded are reloaded; new files are
/// ignored until a caller loads them. Dropping the watcher stops it.
pub struct CatalogWatcher {
    _watcher: RecommendedWatcher,
}

impl CatalogWatcher {
    /// Start watching the manager's locales directory
    pub fn spawn(manager: Arc<I18nManager>) -> I18nResult<Self> {
        let dir = manager.resources().base_dir().to_path_buf();
        let handler = Arc::clone(&manager);

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    handle_event(&handler, &event);
                }
                Err(e) => error!("Catalog watcher error: {}", e),
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        info!("Watching {:?} for catalog changes", dir);
        Ok(Self { _watcher: watcher })
    }
}

impl std::fmt::Debug for CatalogWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogWatcher").finish_non_exhaustive()
    }
}

/// Reload the loaded locales touched by `event`, returning them
pub fn handle_event(manager: &I18nManager, event: &Event) -> Vec<Locale> {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return Vec::new();
    }

    let mut reloaded = Vec::new();
    for path in &event.paths {
        let Some(locale) = manager.resources().locale_for_path(path) else {
            continue;
        };
        if !manager.is_loaded(&locale) || reloaded.contains(&locale) {
            debug!("Ignoring change to {:?}", path);
            continue;
        }

        // A failed reload keeps the previous snapshot and logs the cause.
        if manager.reload_locale(&locale).is_ok() {
            reloaded.push(locale);
        }
    }
    reloaded
}
