//! Qt Linguist catalog runtime
//!
//! This crate turns `.ts` translation catalogs into lookups with a
//! fallback to the source text. It includes:
//!
//! - Catalog parsing with a streaming XML reader
//! - Keyed lookup by context and source text, with duplicate handling
//! - `%s`/`%1`-style placeholder substitution
//! - Plural form selection per language
//! - A manager publishing per-locale snapshots, with optional hot reload
//!
//! # Example
//!
//! ```rust
//! use tscat_config::DuplicatePolicy;
//! use tscat_i18n::{CatalogLoader, CatalogStore, PlaceholderFormatter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = CatalogLoader::new().load(
//!     r#"<TS language="id"><context><name>Aggregator</name>
//!        <message><source>%1 is %2</source><translation>%1 merupakan %2</translation></message>
//!     </context></TS>"#,
//! )?;
//! let store = CatalogStore::build(catalog, DuplicatePolicy::LastWins)?;
//!
//! let resolved = store.lookup("Aggregator", "%1 is %2");
//! let text = PlaceholderFormatter::format(resolved.text, &["X", "Y"])?;
//! assert_eq!(text, "X merupakan Y");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod audit;
pub mod catalog;
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod formatter;
pub mod loader;
pub mod locale;
pub mod manager;
pub mod pluralization;
pub mod resource;
pub mod store;
pub mod watcher;

pub use audit::{audit_placeholders, PlaceholderMismatch};
pub use catalog::{Catalog, CatalogStats};
pub use diagnostics::{MissingKey, MissingTranslation, MissingTranslations};
pub use entry::{CatalogEntry, Location, MessageStatus};
pub use error::{I18nError, I18nResult, ParseErrorKind};
pub use formatter::{PlaceholderFormatter, PlaceholderSignature};
pub use loader::CatalogLoader;
pub use locale::Locale;
pub use manager::I18nManager;
pub use pluralization::PluralRule;
pub use resource::ResourceManager;
pub use store::{CatalogStore, MissingReason, Resolution, ResolvedMessage};
pub use watcher::CatalogWatcher;
