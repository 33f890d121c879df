//! Resource management for catalog files

use crate::catalog::Catalog;
use crate::error::{I18nError, I18nResult};
use crate::loader::CatalogLoader;
use crate::Locale;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tscat_config::{CatalogSettings, LOCALE_PLACEHOLDER};

/// Maps locales to catalog files and loads them
#[derive(Debug, Clone)]
pub struct ResourceManager {
    /// Directory holding one catalog per locale
    base_dir: PathBuf,
    /// File name pattern containing `{locale}`
    file_pattern: String,
}

impl ResourceManager {
    /// Create a new `ResourceManager`
    pub fn new<P: AsRef<Path>>(base_dir: P, file_pattern: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            file_pattern: file_pattern.into(),
        }
    }

    /// Create a `ResourceManager` from catalog settings
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        Self::new(&settings.locales_dir, settings.file_pattern.clone())
    }

    /// Path of the catalog file for `locale`
    pub fn path_for(&self, locale: &Locale) -> PathBuf {
        self.base_dir.join(
            self.file_pattern
                .replace(LOCALE_PLACEHOLDER, &locale.qt_code()),
        )
    }

    /// Locale whose catalog lives at `path`, if the file name fits the pattern
    pub fn locale_for_path(&self, path: &Path) -> Option<Locale> {
        let file_name = path.file_name()?.to_str()?;
        let (prefix, suffix) = self.file_pattern.split_once(LOCALE_PLACEHOLDER)?;

        let code = file_name.strip_prefix(prefix)?.strip_suffix(suffix)?;
        Locale::parse(code).ok()
    }

    /// Load and parse the catalog for `locale`
    pub fn load(&self, locale: &Locale) -> I18nResult<Catalog> {
        let path = self.path_for(locale);
        debug!("Loading catalog for {} from {:?}", locale, path);

        if !path.exists() {
            warn!("Catalog file does not exist: {:?}", path);
        }

        let catalog = CatalogLoader::new()
            .with_locale_hint(locale.clone())
            .load_path(&path)
            .map_err(|e| {
                error!("Failed to load catalog {:?}: {}", path, e);
                e
            })?;

        info!(
            "Loaded catalog for {} ({} entries)",
            locale,
            catalog.len()
        );
        Ok(catalog)
    }

    /// Locales with a catalog file in the base directory, sorted by code
    pub fn available_locales(&self) -> I18nResult<Vec<Locale>> {
        let entries = fs::read_dir(&self.base_dir).map_err(|source| I18nError::ResourceLoad {
            path: self.base_dir.clone(),
            source,
        })?;

        let mut locales: Vec<Locale> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| self.locale_for_path(&entry.path()))
            .collect();
        locales.sort_by_key(Locale::code);
        locales.dedup();

        debug!("Found {} catalog file(s) in {:?}", locales.len(), self.base_dir);
        Ok(locales)
    }

    /// Get the base directory for catalogs
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the file name pattern
    pub fn file_pattern(&self) -> &str {
        &self.file_pattern
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::from_settings(&CatalogSettings::default())
    }
}
