//! Plural form selection for numerus messages
//!
//! Qt stores one translation per plural form, in an order fixed by the
//! target language. A rule maps a count to the index of the form to use.

use crate::Locale;

/// Plural rule of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRule {
    /// One form for every count (Indonesian, Vietnamese, Japanese, ...).
    Single,
    /// Singular for exactly one, plural otherwise (English, German, ...).
    OneOther,
    /// Singular for zero and one (French).
    ZeroOneOther,
    /// Three forms keyed on the last digits (Russian, Ukrainian, Belarusian).
    EastSlavic,
    /// Three forms; only exactly one is singular (Polish).
    Polish,
    /// Three forms: one, two to four, many (Czech, Slovak).
    Czech,
}

impl PluralRule {
    /// Rule for the primary language of `locale`; `OneOther` when unknown.
    pub fn for_locale(locale: &Locale) -> Self {
        Self::for_language(locale.language())
    }

    /// Rule for a primary language subtag.
    pub fn for_language(language: &str) -> Self {
        match language {
            "id" | "ms" | "vi" | "ja" | "ko" | "zh" | "th" | "lo" | "km" | "my" => Self::Single,
            "fr" => Self::ZeroOneOther,
            "ru" | "uk" | "be" => Self::EastSlavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            _ => Self::OneOther,
        }
    }

    /// Number of plural forms a catalog of this language carries.
    pub const fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::ZeroOneOther => 2,
            Self::EastSlavic | Self::Polish | Self::Czech => 3,
        }
    }

    /// Index of the plural form to use for `count`.
    pub const fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let (n10, n100) = (n % 10, n % 100);
        let few = n10 >= 2 && n10 <= 4 && (n100 < 10 || n100 >= 20);

        match self {
            Self::Single => 0,
            Self::OneOther => (n != 1) as usize,
            Self::ZeroOneOther => (n > 1) as usize,
            Self::EastSlavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if few {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if few {
                    1
                } else {
                    2
                }
            }
            Self::Czech => {
                if n == 1 {
                    0
                } else if n >= 2 && n <= 4 {
                    1
                } else {
                    2
                }
            }
        }
    }
}
