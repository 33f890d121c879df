//! Placeholder substitution for resolved messages
//!
//! Two placeholder styles appear in catalogs:
//!
//! - printf-style `%s`, `%d` and `%i`, consumed left to right;
//! - Qt-style `%1` to `%99`, addressing arguments by index (a placeholder
//!   may repeat).
//!
//! `%%` is a literal percent sign and `%n` is the count of a numerus
//! message. Anything else after `%` is copied through as text.

use crate::error::{I18nError, I18nResult};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Percent,
    Sequential(&'a str),
    Indexed { index: usize, raw: &'a str },
    Count,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        let (token, width) = match bytes.get(i + 1).copied() {
            Some(b'%') => (Some(Token::Percent), 2),
            Some(b's' | b'd' | b'i') => (Some(Token::Sequential(&text[i..i + 2])), 2),
            Some(b'n') => (Some(Token::Count), 2),
            Some(first @ b'1'..=b'9') => {
                let first = usize::from(first - b'0');
                match bytes.get(i + 2).copied() {
                    Some(second @ b'0'..=b'9') => {
                        let index = first * 10 + usize::from(second - b'0');
                        let raw = &text[i..i + 3];
                        (Some(Token::Indexed { index, raw }), 3)
                    }
                    _ => {
                        let raw = &text[i..i + 2];
                        (Some(Token::Indexed { index: first, raw }), 2)
                    }
                }
            }
            _ => (None, 1),
        };

        match token {
            Some(token) => {
                if literal_start < i {
                    tokens.push(Token::Text(&text[literal_start..i]));
                }
                tokens.push(token);
                i += width;
                literal_start = i;
            }
            None => i += width,
        }
    }

    if literal_start < bytes.len() {
        tokens.push(Token::Text(&text[literal_start..]));
    }
    tokens
}

/// Placeholders used by a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderSignature {
    /// Number of `%s`/`%d`/`%i` placeholders
    pub sequential: usize,
    /// Distinct indexes of `%1`-style placeholders
    pub indexed: BTreeSet<usize>,
    /// Whether `%n` appears
    pub count: bool,
}

impl PlaceholderSignature {
    /// Arguments needed to satisfy every placeholder
    pub fn required_arguments(&self) -> usize {
        let highest = self.indexed.iter().next_back().copied().unwrap_or(0);
        self.sequential.max(highest)
    }

    /// Whether the message has no placeholders apart from `%%`
    pub fn is_empty(&self) -> bool {
        self.sequential == 0 && self.indexed.is_empty() && !self.count
    }
}

/// Substitutes arguments into resolved message text
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderFormatter;

impl PlaceholderFormatter {
    /// Substitute `args` into `text`.
    ///
    /// Fails with [`I18nError::ArgumentCountMismatch`] when a placeholder
    /// has no argument; extra arguments are ignored. `%n` is left as is.
    pub fn format<S: AsRef<str>>(text: &str, args: &[S]) -> I18nResult<String> {
        Self::checked(text, args, None)
    }

    /// Like [`Self::format`], also replacing `%n` with `count`.
    pub fn format_with_count<S: AsRef<str>>(
        text: &str,
        count: i64,
        args: &[S],
    ) -> I18nResult<String> {
        Self::checked(text, args, Some(count))
    }

    /// Substitute what can be substituted; never fails.
    ///
    /// Placeholders without an argument are kept verbatim.
    pub fn format_lossy<S: AsRef<str>>(text: &str, args: &[S]) -> String {
        render(&tokenize(text), args, None)
    }

    /// Like [`Self::format_lossy`], also replacing `%n` with `count`.
    pub fn format_lossy_with_count<S: AsRef<str>>(text: &str, count: i64, args: &[S]) -> String {
        render(&tokenize(text), args, Some(count))
    }

    /// Placeholders used by `text`
    pub fn signature(text: &str) -> PlaceholderSignature {
        signature_of(&tokenize(text))
    }

    fn checked<S: AsRef<str>>(text: &str, args: &[S], count: Option<i64>) -> I18nResult<String> {
        let tokens = tokenize(text);
        let required = signature_of(&tokens).required_arguments();
        if args.len() < required {
            return Err(I18nError::ArgumentCountMismatch {
                required,
                supplied: args.len(),
            });
        }
        Ok(render(&tokens, args, count))
    }
}

fn signature_of(tokens: &[Token<'_>]) -> PlaceholderSignature {
    let mut signature = PlaceholderSignature::default();
    for token in tokens {
        match token {
            Token::Sequential(_) => signature.sequential += 1,
            Token::Indexed { index, .. } => {
                signature.indexed.insert(*index);
            }
            Token::Count => signature.count = true,
            Token::Text(_) | Token::Percent => {}
        }
    }
    signature
}

fn render<S: AsRef<str>>(tokens: &[Token<'_>], args: &[S], count: Option<i64>) -> String {
    let mut out = String::new();
    let mut next = 0;

    for token in tokens {
        match *token {
            Token::Text(text) => out.push_str(text),
            Token::Percent => out.push('%'),
            Token::Sequential(raw) => {
                match args.get(next) {
                    Some(arg) => out.push_str(arg.as_ref()),
                    None => out.push_str(raw),
                }
                next += 1;
            }
            Token::Indexed { index, raw } => match args.get(index - 1) {
                Some(arg) => out.push_str(arg.as_ref()),
                None => out.push_str(raw),
            },
            Token::Count => match count {
                Some(n) => out.push_str(&n.to_string()),
                None => out.push_str("%n"),
            },
        }
    }
    out
}
