//! Thread-safe settings caching with arc-swap for lock-free reads.

use crate::loader::{ConfigError, ConfigLoader};
use crate::schema::Settings;
use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Thread-safe settings cache using arc-swap for lock-free reads.
///
/// Readers holding an `Arc<Settings>` from [`SettingsCache::get`] keep
/// seeing that snapshot even after a newer one is published.
pub struct SettingsCache {
    settings: ArcSwap<Settings>,
}

impl SettingsCache {
    /// Creates a new settings cache with the given initial settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
        }
    }

    /// Gets the current settings.
    pub fn get(&self) -> Arc<Settings> {
        self.settings.load_full()
    }

    /// Replaces the settings atomically.
    pub fn update(&self, settings: Settings) {
        self.settings.store(Arc::new(settings));
    }

    /// Reloads settings from `path`.
    ///
    /// On failure the current settings stay published and the error is
    /// returned to the caller.
    pub fn reload_from<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Settings>, ConfigError> {
        match ConfigLoader::load_config(path.as_ref()) {
            Ok(settings) => {
                let settings = Arc::new(settings);
                self.settings.store(Arc::clone(&settings));
                info!("Reloaded settings from {:?}", path.as_ref());
                Ok(settings)
            }
            Err(e) => {
                warn!("Keeping previous settings, reload failed: {}", e);
                Err(e)
            }
        }
    }
}

impl Default for SettingsCache {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
