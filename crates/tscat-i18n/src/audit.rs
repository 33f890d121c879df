//! Placeholder consistency checks between source texts and translations

use crate::catalog::Catalog;
use crate::entry::CatalogEntry;
use crate::formatter::{PlaceholderFormatter, PlaceholderSignature};

/// A finished translation whose placeholders differ from its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMismatch {
    /// Context of the entry
    pub context: String,
    /// Source text of the entry
    pub source_text: String,
    /// The offending translation (or plural form)
    pub translation: String,
    /// Placeholders of the source text
    pub expected: PlaceholderSignature,
    /// Placeholders of the translation
    pub found: PlaceholderSignature,
}

/// Check every finished live entry of `catalog`.
///
/// Plural forms are checked one by one; `%n` may be dropped from a form,
/// since languages commonly spell out the singular.
pub fn audit_placeholders(catalog: &Catalog) -> Vec<PlaceholderMismatch> {
    catalog
        .entries()
        .iter()
        .filter(|entry| entry.is_live())
        .flat_map(audit_entry)
        .collect()
}

fn audit_entry(entry: &CatalogEntry) -> Vec<PlaceholderMismatch> {
    let expected = PlaceholderFormatter::signature(&entry.source_text);

    if entry.numerus {
        if entry.finished_translation().is_none() {
            return Vec::new();
        }
        return entry
            .numerus_forms
            .iter()
            .filter(|form| !form.is_empty())
            .filter_map(|form| {
                let found = PlaceholderFormatter::signature(form);
                let matches = found.sequential == expected.sequential
                    && found.indexed == expected.indexed
                    && (expected.count || !found.count);
                (!matches).then(|| mismatch(entry, form, &expected, found))
            })
            .collect();
    }

    entry
        .finished_translation()
        .and_then(|translation| {
            let found = PlaceholderFormatter::signature(translation);
            (found != expected).then(|| mismatch(entry, translation, &expected, found))
        })
        .into_iter()
        .collect()
}

fn mismatch(
    entry: &CatalogEntry,
    translation: &str,
    expected: &PlaceholderSignature,
    found: PlaceholderSignature,
) -> PlaceholderMismatch {
    PlaceholderMismatch {
        context: entry.context.clone(),
        source_text: entry.source_text.clone(),
        translation: translation.to_string(),
        expected: expected.clone(),
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::MessageStatus;
    use crate::locale::Locale;

    #[test]
    fn test_matching_placeholders_pass() {
        let catalog = Catalog::new(
            Locale::parse("id").unwrap(),
            vec![
                CatalogEntry::finished(
                    "Aggregator",
                    "%1 is %2 but should be %1",
                    "%1 merupakan %2 tetapi seharusnya %1",
                ),
                CatalogEntry::finished("ImpactCalculator", "%d%% done", "%d%% selesai"),
            ],
        );
        assert!(audit_placeholders(&catalog).is_empty());
    }

    #[test]
    fn test_mismatches_are_reported() {
        let catalog = Catalog::new(
            Locale::parse("id").unwrap(),
            vec![
                CatalogEntry::finished("Aggregator", "%s aggregated to %s", "%s diagregasi"),
                CatalogEntry::finished("Dock", "Layer %1", "Lapisan %2"),
                CatalogEntry::unfinished("Dock", "%s only"),
                CatalogEntry::finished("Old", "%s", "").with_status(MessageStatus::Obsolete),
            ],
        );

        let report = audit_placeholders(&catalog);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].source_text, "%s aggregated to %s");
        assert_eq!(report[0].expected.sequential, 2);
        assert_eq!(report[0].found.sequential, 1);
        assert_eq!(report[1].translation, "Lapisan %2");
    }

    #[test]
    fn test_plural_forms_may_drop_count() {
        let mut entry = CatalogEntry::finished("Report", "%n file(s) in %1", "один файл в %1");
        entry.numerus = true;
        entry.numerus_forms = vec![
            "один файл в %1".to_string(),
            "%n файла в %1".to_string(),
            "%n файлов".to_string(),
        ];
        let catalog = Catalog::new(Locale::parse("ru").unwrap(), vec![entry]);

        let report = audit_placeholders(&catalog);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].translation, "%n файлов");
    }
}
