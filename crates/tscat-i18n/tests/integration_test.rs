//! Integration tests for catalog loading, lookup and formatting

use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tscat_common::test_utils::{catalog_fixtures, create_temp_dir, init_test_logging, write_fixture};
use tscat_config::{CatalogSettings, ConfigLoader, DuplicatePolicy};
use tscat_i18n::{
    CatalogLoader, CatalogStore, I18nError, I18nManager, Locale, MissingReason,
    PlaceholderFormatter,
};

fn indonesian_store() -> CatalogStore {
    let catalog = CatalogLoader::new()
        .load(catalog_fixtures::indonesian_catalog())
        .unwrap();
    CatalogStore::build(catalog, DuplicatePolicy::LastWins).unwrap()
}

fn settings_for(dir: &std::path::Path) -> CatalogSettings {
    CatalogSettings {
        locales_dir: dir.to_path_buf(),
        ..CatalogSettings::default()
    }
}

#[test]
fn test_end_to_end_lookup() {
    init_test_logging();
    let store = indonesian_store();

    assert_eq!(
        store.lookup("Aggregator", "Use default").text,
        "Pergunakan default"
    );
    assert_eq!(
        store.lookup("KeywordsDialog", "Use default").text,
        "Pergunakan default"
    );
    assert_eq!(
        store
            .lookup_with_default_context("Argument \"%s\" was not a valid layer instance")
            .text,
        "Argumen :%s: bukanlah objek lapisan yang valid"
    );
}

#[test]
fn test_every_finished_entry_resolves_to_its_translation() {
    let store = indonesian_store();

    for entry in store.catalog().entries() {
        let resolved = store.lookup(&entry.context, &entry.source_text);
        match entry.finished_translation() {
            Some(translation) => assert_eq!(resolved.text, translation),
            None => {
                assert_eq!(resolved.text, entry.source_text);
                assert!(!resolved.is_translated());
            }
        }
    }
}

#[test]
fn test_unfinished_catalog_falls_back_to_source() {
    let catalog = CatalogLoader::new()
        .load(catalog_fixtures::vietnamese_catalog())
        .unwrap();
    let store = CatalogStore::build(catalog, DuplicatePolicy::Strict).unwrap();

    let resolved = store.lookup("Aggregator", "Use default");
    assert_eq!(resolved.text, "Use default");
    assert_eq!(resolved.missing_reason(), Some(MissingReason::Unfinished));
    assert_eq!(store.catalog().stats().finished, 0);
}

#[test]
fn test_loading_twice_gives_identical_lookups() {
    let first = indonesian_store();
    let second = indonesian_store();

    for entry in first.catalog().entries() {
        assert_eq!(
            first.lookup(&entry.context, &entry.source_text),
            second.lookup(&entry.context, &entry.source_text)
        );
    }
    assert_eq!(first.catalog(), second.catalog());
}

#[test]
fn test_duplicate_keys_last_wins_and_strict() {
    let document = catalog_fixtures::single_context_catalog(
        "id",
        "Aggregator",
        &[
            ("Use default", "Gunakan default"),
            ("Use default", "Pergunakan default"),
        ],
    );
    let catalog = CatalogLoader::new().load(&document).unwrap();

    let store = CatalogStore::build(catalog.clone(), DuplicatePolicy::LastWins).unwrap();
    assert_eq!(
        store.lookup("Aggregator", "Use default").text,
        "Pergunakan default"
    );

    let err = CatalogStore::build(catalog, DuplicatePolicy::Strict).unwrap_err();
    assert!(matches!(err, I18nError::DuplicateKey { .. }));
}

#[test]
fn test_formatting_resolved_messages() {
    let store = indonesian_store();

    let unfinished = store.lookup("Aggregator", "%s aggregated to %s");
    assert_eq!(
        PlaceholderFormatter::format(unfinished.text, &["A", "B"]).unwrap(),
        "A aggregated to B"
    );

    let translated = store.lookup(
        "Aggregator",
        "%1 is %2 but it should be either vector or raster",
    );
    assert_eq!(
        PlaceholderFormatter::format(translated.text, &["X", "Y"]).unwrap(),
        "X merupakan Y tetapi itu seharusnya berupa layer vektor ataupun raster"
    );

    assert!(matches!(
        PlaceholderFormatter::format("%s is %s but...", &["X"]),
        Err(I18nError::ArgumentCountMismatch { .. })
    ));
}

#[test]
fn test_reload_keeps_old_snapshot_valid() {
    init_test_logging();
    let dir = create_temp_dir();
    write_fixture(
        dir.path(),
        "inasafe_id.ts",
        catalog_fixtures::indonesian_catalog(),
    );

    let manager = I18nManager::new(&settings_for(dir.path()));
    let id = Locale::parse("id").unwrap();
    manager.load_locale(&id).unwrap();
    let old = manager.snapshot(&id).unwrap();

    write_fixture(
        dir.path(),
        "inasafe_id.ts",
        &catalog_fixtures::single_context_catalog("id", "Aggregator", &[("Use default", "Pakai bawaan")]),
    );
    manager.reload_locale(&id).unwrap();

    assert_eq!(old.lookup("Aggregator", "Use default").text, "Pergunakan default");
    assert!(old.contains("KeywordsDialog", "Use default"));
    assert_eq!(manager.translate(&id, "Aggregator", "Use default"), "Pakai bawaan");
    assert_eq!(
        manager.translate(&id, "KeywordsDialog", "Use default"),
        "Use default"
    );
}

#[test]
fn test_failed_reload_keeps_published_catalog() {
    let dir = create_temp_dir();
    write_fixture(
        dir.path(),
        "inasafe_id.ts",
        catalog_fixtures::indonesian_catalog(),
    );
    let manager = I18nManager::new(&settings_for(dir.path()));
    let id = Locale::parse("id").unwrap();
    manager.load_locale(&id).unwrap();

    write_fixture(dir.path(), "inasafe_id.ts", "<TS language=\"id\"><context><name>");
    let err = manager.reload_locale(&id).unwrap_err();
    assert!(err.parse_kind().is_some());

    assert_eq!(
        manager.translate(&id, "Aggregator", "Use default"),
        "Pergunakan default"
    );
}

#[test]
fn test_concurrent_readers_during_reloads() {
    let dir = create_temp_dir();
    write_fixture(
        dir.path(),
        "inasafe_id.ts",
        catalog_fixtures::indonesian_catalog(),
    );
    let manager = Arc::new(I18nManager::new(&settings_for(dir.path())));
    let id = Locale::parse("id").unwrap();
    manager.load_locale(&id).unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            let id = id.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let store = manager.snapshot(&id).unwrap();
                    let aggregator = store.lookup("Aggregator", "Use default").text;
                    let keywords = store.lookup("KeywordsDialog", "Use default").text;
                    assert_eq!(aggregator, keywords);
                }
            })
        })
        .collect();

    for _ in 0..20 {
        manager.reload_locale(&id).unwrap();
    }
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_manager_from_config() {
    let dir = create_temp_dir();
    write_fixture(
        dir.path(),
        "inasafe_id.ts",
        catalog_fixtures::indonesian_catalog(),
    );
    write_fixture(
        dir.path(),
        "inasafe_vi.ts",
        catalog_fixtures::vietnamese_catalog(),
    );

    let toml = format!(
        "[catalog]\nlocales_dir = {:?}\npreload = [\"id\", \"vi\", \"fr\"]\n",
        dir.path().display().to_string()
    );
    let settings = ConfigLoader::parse(&toml).unwrap();
    let manager = I18nManager::from_settings(&settings.catalog);

    let codes: Vec<String> = manager.loaded_locales().iter().map(Locale::code).collect();
    assert_eq!(codes, vec!["id", "vi"]);

    let vi = Locale::parse("vi").unwrap();
    assert_eq!(
        manager.translate_default(&vi, "No keywords file found for %s"),
        "No keywords file found for %s"
    );
    assert_eq!(
        manager.translate_format(&vi, "@default", "No keywords file found for %s", &["roads"]),
        "No keywords file found for roads"
    );

    let missing = manager.missing_translations().for_locale(&vi);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].count, 2);
}

#[test]
fn test_watched_catalog_reloads_on_change() {
    init_test_logging();
    let dir = create_temp_dir();
    write_fixture(
        dir.path(),
        "inasafe_id.ts",
        catalog_fixtures::indonesian_catalog(),
    );
    let settings = CatalogSettings {
        preload: vec!["id".to_string()],
        watch: true,
        ..settings_for(dir.path())
    };

    let (manager, watcher) = I18nManager::start(&settings).unwrap();
    assert!(watcher.is_some());
    let id = Locale::parse("id").unwrap();
    assert_eq!(
        manager.translate(&id, "Aggregator", "Use default"),
        "Pergunakan default"
    );

    write_fixture(
        dir.path(),
        "inasafe_id.ts",
        &catalog_fixtures::single_context_catalog("id", "Aggregator", &[("Use default", "Pakai bawaan")]),
    );

    let deadline = Instant::now() + Duration::from_secs(10);
    while manager.translate(&id, "Aggregator", "Use default") != "Pakai bawaan" {
        assert!(Instant::now() < deadline, "watched catalog was not reloaded");
        thread::sleep(Duration::from_millis(50));
    }
    drop(watcher);
}

#[test]
fn test_start_without_watch() {
    let dir = create_temp_dir();
    write_fixture(
        dir.path(),
        "inasafe_id.ts",
        catalog_fixtures::indonesian_catalog(),
    );
    let settings = CatalogSettings {
        preload: vec!["id".to_string()],
        ..settings_for(dir.path())
    };
    assert!(!settings.watch);

    let (manager, watcher) = I18nManager::start(&settings).unwrap();
    assert!(watcher.is_none());
    assert!(manager.is_loaded(&Locale::parse("id").unwrap()));
}

proptest! {
    #[test]
    fn prop_lookup_returns_translation_or_source(
        entries in proptest::collection::vec(
            ("[A-Z][a-z]{0,6}", "[a-z ]{1,12}", proptest::option::of("[a-z]{1,8}")),
            0..12,
        ),
    ) {
        let messages: Vec<(String, String, Option<String>)> = entries;
        let catalog = tscat_i18n::Catalog::new(
            Locale::parse("id").unwrap(),
            messages
                .iter()
                .map(|(context, source, translation)| match translation {
                    Some(text) => tscat_i18n::CatalogEntry::finished(context.as_str(), source.as_str(), text.as_str()),
                    None => tscat_i18n::CatalogEntry::unfinished(context.as_str(), source.as_str()),
                })
                .collect(),
        );
        let store = CatalogStore::build(catalog, DuplicatePolicy::LastWins).unwrap();

        for (context, source, _) in &messages {
            let last = messages
                .iter()
                .rev()
                .find(|(c, s, _)| c == context && s == source)
                .and_then(|(_, _, translation)| translation.as_deref());
            let expected = last.unwrap_or(source.as_str());
            prop_assert_eq!(store.lookup(context, source).text, expected);
        }
    }
}
