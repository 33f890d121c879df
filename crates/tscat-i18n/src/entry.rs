//! Catalog entries

/// Translation state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    /// Translated and approved; answers lookups.
    Finished,
    /// Untranslated or awaiting review; lookups fall back to the source.
    Unfinished,
    /// No longer present in the sources; never indexed.
    Obsolete,
}

impl MessageStatus {
    /// Status for the `type` attribute of a `<translation>` element.
    ///
    /// Returns `None` for values this crate does not know.
    pub fn from_type_attribute(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Finished),
            Some("unfinished") => Some(Self::Unfinished),
            Some("obsolete" | "vanished") => Some(Self::Obsolete),
            Some(_) => None,
        }
    }
}

/// Where a message appears in the application sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Source file name.
    pub filename: String,
    /// 1-based line number, when known.
    pub line: Option<u32>,
}

/// One message of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Context (usually a UI component) the message belongs to.
    pub context: String,
    /// Original-language text; the lookup key together with `context`.
    pub source_text: String,
    /// Translated text; `None` when the catalog holds none.
    pub translation: Option<String>,
    /// Translation state.
    pub status: MessageStatus,
    /// Source locations, in document order.
    pub locations: Vec<Location>,
    /// Disambiguation comment.
    pub comment: Option<String>,
    /// Comment extracted from the sources for translators.
    pub extra_comment: Option<String>,
    /// Comment left by a translator.
    pub translator_comment: Option<String>,
    /// Whether the message has plural forms.
    pub numerus: bool,
    /// Plural translations, in the order of the locale's plural rule.
    pub numerus_forms: Vec<String>,
}

impl CatalogEntry {
    /// A finished entry with a single translation.
    pub fn finished(
        context: impl Into<String>,
        source_text: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            translation: Some(translation.into()),
            ..Self::unfinished(context, source_text)
        }
        .with_status(MessageStatus::Finished)
    }

    /// An unfinished entry with no translation.
    pub fn unfinished(context: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source_text: source_text.into(),
            translation: None,
            status: MessageStatus::Unfinished,
            locations: Vec::new(),
            comment: None,
            extra_comment: None,
            translator_comment: None,
            numerus: false,
            numerus_forms: Vec::new(),
        }
    }

    /// Replace the status.
    #[must_use]
    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the disambiguation comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The translation, if this entry may answer lookups with it.
    pub fn finished_translation(&self) -> Option<&str> {
        match (&self.status, self.translation.as_deref()) {
            (MessageStatus::Finished, Some(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Whether the entry takes part in lookups.
    pub fn is_live(&self) -> bool {
        self.status != MessageStatus::Obsolete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_type_attribute() {
        assert_eq!(
            MessageStatus::from_type_attribute(None),
            Some(MessageStatus::Finished)
        );
        assert_eq!(
            MessageStatus::from_type_attribute(Some("unfinished")),
            Some(MessageStatus::Unfinished)
        );
        assert_eq!(
            MessageStatus::from_type_attribute(Some("vanished")),
            Some(MessageStatus::Obsolete)
        );
        assert_eq!(MessageStatus::from_type_attribute(Some("draft")), None);
    }

    #[test]
    fn test_finished_translation_requires_text() {
        let entry = CatalogEntry::finished("Dock", "Run", "Jalankan");
        assert_eq!(entry.finished_translation(), Some("Jalankan"));

        let empty = CatalogEntry::finished("Dock", "Run", "");
        assert_eq!(empty.finished_translation(), None);

        let unfinished = CatalogEntry {
            translation: Some("Jalankan".to_string()),
            ..CatalogEntry::unfinished("Dock", "Run")
        };
        assert_eq!(unfinished.finished_translation(), None);
    }
}
