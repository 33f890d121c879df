//! Qt Linguist (`.ts`) catalog parsing
//!
//! The parser walks the document with a streaming XML reader and keeps only
//! the elements the catalog model needs:
//!
//! ```text
//! TS[language, sourcelanguage, version]
//! └── context
//!     ├── name
//!     └── message[numerus]
//!         ├── location[filename, line]
//!         ├── source
//!         ├── comment / extracomment / translatorcomment
//!         └── translation[type]
//!             └── numerusform
//! ```
//!
//! Anything else, at any depth, is skipped. Unfinished and empty
//! translations are kept as entries so the store can fall back to the
//! source text.

use crate::catalog::Catalog;
use crate::entry::{CatalogEntry, Location, MessageStatus};
use crate::error::{I18nError, I18nResult, ParseErrorKind};
use crate::locale::Locale;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Parses catalog documents into [`Catalog`]s.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    locale_hint: Option<Locale>,
}

impl CatalogLoader {
    /// Create a loader that takes the locale from the document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locale to use when the document has no `language` attribute.
    #[must_use]
    pub fn with_locale_hint(mut self, locale: Locale) -> Self {
        self.locale_hint = Some(locale);
        self
    }

    /// Parse a catalog document.
    pub fn load(&self, document: &str) -> I18nResult<Catalog> {
        let parsed = DocumentParser::new(document).parse()?;

        let locale = match parsed.language.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Locale::parse(code).map_err(|_| {
                I18nError::parse(ParseErrorKind::InvalidLanguage(code.to_string()), parsed.root_position)
            })?,
            _ => self.locale_hint.clone().ok_or_else(|| {
                I18nError::parse(ParseErrorKind::MissingLanguage, parsed.root_position)
            })?,
        };

        if let Some(hint) = &self.locale_hint {
            if hint != &locale {
                debug!("Catalog declares locale {} but was requested as {}", locale, hint);
            }
        }

        debug!(
            "Parsed catalog for {} with {} entries",
            locale,
            parsed.entries.len()
        );

        Ok(Catalog::new(locale, parsed.entries).with_header(parsed.source_language, parsed.version))
    }

    /// Read and parse a catalog file.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> I18nResult<Catalog> {
        let path = path.as_ref();
        debug!("Loading catalog file: {:?}", path);

        let document = std::fs::read_to_string(path).map_err(|source| I18nError::ResourceLoad {
            path: path.to_path_buf(),
            source,
        })?;

        self.load(&document)
    }
}

/// Elements whose text content is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    ContextName,
    Source,
    Translation,
    NumerusForm,
    Comment,
    ExtraComment,
    TranslatorComment,
}

#[derive(Debug, Default)]
struct MessageBuilder {
    start: usize,
    numerus: bool,
    source: Option<String>,
    has_translation: bool,
    translation_type: Option<String>,
    translation: String,
    numerus_forms: Vec<String>,
    comment: Option<String>,
    extra_comment: Option<String>,
    translator_comment: Option<String>,
    locations: Vec<Location>,
}

struct ParsedDocument {
    root_position: usize,
    language: Option<String>,
    source_language: Option<String>,
    version: Option<String>,
    entries: Vec<CatalogEntry>,
}

struct DocumentParser<'a> {
    reader: Reader<&'a [u8]>,
    stack: Vec<String>,
    root_closed: bool,
    root_position: usize,
    language: Option<String>,
    source_language: Option<String>,
    version: Option<String>,
    context_name: String,
    message: Option<MessageBuilder>,
    field: Option<(TextField, usize)>,
    text: String,
    current_file: String,
    current_lines: HashMap<String, u32>,
    entries: Vec<CatalogEntry>,
}

impl<'a> DocumentParser<'a> {
    fn new(document: &'a str) -> Self {
        Self {
            reader: Reader::from_str(document),
            stack: Vec::new(),
            root_closed: false,
            root_position: 0,
            language: None,
            source_language: None,
            version: None,
            context_name: String::new(),
            message: None,
            field: None,
            text: String::new(),
            current_file: String::new(),
            current_lines: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn position(&self) -> usize {
        usize::try_from(self.reader.buffer_position()).unwrap_or(usize::MAX)
    }

    fn malformed(&self, err: impl std::fmt::Display) -> I18nError {
        I18nError::parse(ParseErrorKind::Malformed(err.to_string()), self.position())
    }

    fn parse(mut self) -> I18nResult<ParsedDocument> {
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => return Err(self.malformed(e)),
            };

            match event {
                Event::Start(e) => {
                    let name = self.element_name(&e)?;
                    self.open(&name, &e, false)?;
                    self.stack.push(name);
                }
                Event::Empty(e) => {
                    let name = self.element_name(&e)?;
                    self.open(&name, &e, true)?;
                    self.close(&name)?;
                }
                Event::End(_) => {
                    let name = self
                        .stack
                        .pop()
                        .ok_or_else(|| self.malformed("unbalanced end tag"))?;
                    self.close(&name)?;
                }
                Event::Text(t) => {
                    if self.capturing() {
                        let text = t.unescape().map_err(|e| self.malformed(e))?;
                        self.text.push_str(&text);
                    }
                }
                Event::CData(c) => {
                    if self.capturing() {
                        self.text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(I18nError::parse(
                ParseErrorKind::UnexpectedEof(open.clone()),
                self.position(),
            ));
        }
        if !self.root_closed {
            return Err(I18nError::parse(ParseErrorKind::MissingRoot, self.position()));
        }

        Ok(ParsedDocument {
            root_position: self.root_position,
            language: self.language,
            source_language: self.source_language,
            version: self.version,
            entries: self.entries,
        })
    }

    fn element_name(&self, e: &BytesStart<'_>) -> I18nResult<String> {
        std::str::from_utf8(e.name().as_ref())
            .map(str::to_string)
            .map_err(|err| self.malformed(err))
    }

    fn attribute(&self, e: &BytesStart<'_>, key: &str) -> I18nResult<Option<String>> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.malformed(err))?;
            if attr.key.as_ref() == key.as_bytes() {
                let value = attr.unescape_value().map_err(|err| self.malformed(err))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn capturing(&self) -> bool {
        matches!(self.field, Some((_, depth)) if depth == self.stack.len())
    }

    fn parent(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    /// Handle an opening tag. `empty` marks a self-closing element, which
    /// is not on the stack while this runs.
    fn open(&mut self, name: &str, e: &BytesStart<'_>, empty: bool) -> I18nResult<()> {
        if self.stack.is_empty() {
            return self.open_root(name, e);
        }

        let depth = self.stack.len() + 1;
        let parent = self.stack.last().cloned();
        match (parent.as_deref(), name) {
            (Some("TS"), "context") => self.context_name.clear(),
            (Some("context"), "name") => self.begin_field(TextField::ContextName, depth),
            (Some("context"), "message") => {
                let numerus = self.attribute(e, "numerus")?.as_deref() == Some("yes");
                self.message = Some(MessageBuilder {
                    start: self.position(),
                    numerus,
                    ..MessageBuilder::default()
                });
            }
            (Some("message"), "location") => {
                let filename = self.attribute(e, "filename")?;
                let line = self.attribute(e, "line")?;
                let location = self.resolve_location(filename, line.as_deref());
                if let Some(message) = self.message.as_mut() {
                    message.locations.push(location);
                }
            }
            (Some("message"), "source") => self.begin_field(TextField::Source, depth),
            (Some("message"), "comment") => self.begin_field(TextField::Comment, depth),
            (Some("message"), "extracomment") => self.begin_field(TextField::ExtraComment, depth),
            (Some("message"), "translatorcomment") => {
                self.begin_field(TextField::TranslatorComment, depth);
            }
            (Some("message"), "translation") => {
                let kind = self.attribute(e, "type")?;
                if let Some(message) = self.message.as_mut() {
                    message.has_translation = true;
                    message.translation_type = kind;
                }
                self.begin_field(TextField::Translation, depth);
            }
            (Some("translation"), "numerusform") => self.begin_field(TextField::NumerusForm, depth),
            (_, "byte") if self.capturing() && empty => {
                if let Some(ch) = self.attribute(e, "value")?.as_deref().and_then(byte_value) {
                    self.text.push(ch);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn open_root(&mut self, name: &str, e: &BytesStart<'_>) -> I18nResult<()> {
        if self.root_closed {
            return Err(self.malformed("content after the root element"));
        }
        self.root_position = self.position();
        if name != "TS" {
            return Err(I18nError::parse(
                ParseErrorKind::UnexpectedRoot(name.to_string()),
                self.root_position,
            ));
        }

        self.language = self.attribute(e, "language")?;
        self.source_language = self.attribute(e, "sourcelanguage")?;
        self.version = self.attribute(e, "version")?;
        Ok(())
    }

    fn begin_field(&mut self, field: TextField, depth: usize) {
        self.field = Some((field, depth));
        self.text.clear();
    }

    /// Handle a closing tag; `name` has already been popped.
    fn close(&mut self, name: &str) -> I18nResult<()> {
        if self.stack.is_empty() {
            self.root_closed = true;
            return Ok(());
        }

        let depth = self.stack.len() + 1;
        if let Some((field, field_depth)) = self.field {
            if field_depth == depth {
                self.field = None;
                let text = std::mem::take(&mut self.text);
                self.store_field(field, text);
                return Ok(());
            }
        }

        if name == "message" && self.parent() == Some("context") {
            if let Some(builder) = self.message.take() {
                let entry = self.finish_message(builder)?;
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    fn store_field(&mut self, field: TextField, text: String) {
        if field == TextField::ContextName {
            self.context_name = text;
            return;
        }

        let Some(message) = self.message.as_mut() else {
            return;
        };
        match field {
            TextField::ContextName => {}
            TextField::Source => message.source = Some(text),
            TextField::Translation => message.translation = text,
            TextField::NumerusForm => {
                message.numerus_forms.push(text);
                // The enclosing <translation> is still open.
                self.field = Some((TextField::Translation, self.stack.len()));
            }
            TextField::Comment => message.comment = Some(text).filter(|t| !t.is_empty()),
            TextField::ExtraComment => message.extra_comment = Some(text),
            TextField::TranslatorComment => message.translator_comment = Some(text),
        }
    }

    fn finish_message(&self, builder: MessageBuilder) -> I18nResult<CatalogEntry> {
        let Some(source_text) = builder.source else {
            return Err(I18nError::parse(
                ParseErrorKind::MissingSource {
                    context: self.context_name.clone(),
                },
                builder.start,
            ));
        };

        let status = if builder.has_translation {
            MessageStatus::from_type_attribute(builder.translation_type.as_deref()).unwrap_or_else(|| {
                warn!(
                    "Unknown translation type {:?} for '{}' in context '{}', treating as unfinished",
                    builder.translation_type, source_text, self.context_name
                );
                MessageStatus::Unfinished
            })
        } else {
            MessageStatus::Unfinished
        };

        let translation = if builder.numerus {
            builder.numerus_forms.first().cloned()
        } else {
            Some(builder.translation)
        }
        .filter(|t| !t.is_empty());

        Ok(CatalogEntry {
            context: self.context_name.clone(),
            source_text,
            translation,
            status,
            locations: builder.locations,
            comment: builder.comment,
            extra_comment: builder.extra_comment,
            translator_comment: builder.translator_comment,
            numerus: builder.numerus,
            numerus_forms: builder.numerus_forms,
        })
    }

    /// Resolve a possibly relative location against the previous one.
    fn resolve_location(&mut self, filename: Option<String>, line: Option<&str>) -> Location {
        if let Some(name) = filename.filter(|f| !f.is_empty()) {
            self.current_file = name;
        }
        let file = self.current_file.clone();
        let previous = self.current_lines.get(&file).copied().unwrap_or(0);

        let line = match line.map(str::trim) {
            Some(rel) if rel.starts_with('+') || rel.starts_with('-') => rel
                .parse::<i64>()
                .ok()
                .and_then(|delta| u32::try_from(i64::from(previous) + delta).ok()),
            Some(abs) => abs.parse::<u32>().ok(),
            None => None,
        };

        if let Some(line) = line {
            self.current_lines.insert(file.clone(), line);
        }

        Location {
            filename: file,
            line,
        }
    }
}

/// Character for a `<byte value="..."/>` escape: `x1b` is hex, `27` decimal.
fn byte_value(value: &str) -> Option<char> {
    let code = match value.strip_prefix('x').or_else(|| value.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => value.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}
