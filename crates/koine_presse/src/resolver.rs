//! Server-side translation resolution.
//!
//! The Rust twin of the emitted browser script: the same mapping, the same
//! lookup chain, the same substitution rules. Hosts that render HTML on the
//! server use this to translate strings before they ever reach the page.

use std::fmt;

use once_cell::sync::OnceCell;

use crate::bundle::TranslationMapping;
use crate::error::PresseError;

/// A placeholder value passed to [`Resolver::resolve`].
///
/// Coerced to text exactly like `String(value)` in the browser: integers
/// verbatim, floats in their shortest form (`2.0` becomes `2`).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

/// Resolves messages against a compiled [`TranslationMapping`].
#[derive(Debug, Clone)]
pub struct Resolver {
    mapping: TranslationMapping,
    language: String,
    source_language: String,
}

impl Resolver {
    /// Create a resolver for `language`.
    ///
    /// An empty `language` is refused: resolution without a declared language
    /// would silently serve untranslated text, the same situation the browser
    /// script treats as fatal when `<html>` carries no `lang` attribute.
    pub fn new(
        mapping: TranslationMapping,
        language: impl Into<String>,
        source_language: impl Into<String>,
    ) -> Result<Self, PresseError> {
        let language = language.into();
        if language.is_empty() {
            return Err(PresseError::LanguageMissing);
        }
        Ok(Self {
            mapping,
            language,
            source_language: source_language.into(),
        })
    }

    /// The active language.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The language catalogs are authored in.
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Translate `message` in `category` and substitute `params`.
    ///
    /// When the active language is the source language (compared ASCII
    /// case-insensitively) the message is already in the right language and
    /// the mapping is not consulted. Otherwise the mapping is walked level by
    /// level; any absence falls back to the literal message. An empty
    /// translation counts as missing, matching the emitted script's falsy
    /// check. Substitution applies to whichever text that produced.
    pub fn resolve(&self, category: &str, message: &str, params: &[(&str, ParamValue)]) -> String {
        let text = if self.language.eq_ignore_ascii_case(&self.source_language) {
            message
        } else {
            match self.mapping.lookup(&self.language, category, message) {
                Some(text) if !text.is_empty() => text,
                _ => message,
            }
        };
        substitute(text, params)
    }
}

/// Replace `{name}` placeholders in one pass over `text`.
///
/// A placeholder is the text between `{` and the next `}`. A name with no
/// matching param stays verbatim, brace included. Substituted values are
/// plain text: they are never rescanned for placeholders, so a value
/// containing `{other}` or `$1` comes through untouched.
pub fn substitute(text: &str, params: &[(&str, ParamValue)]) -> String {
    if params.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let token = &after[..close];
            params
                .iter()
                .find(|(name, _)| *name == token)
                .map(|(_, value)| (close, value))
        });
        match replaced {
            Some((close, value)) => {
                out.push_str(&value.to_string());
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// One-time home for the process-wide [`Resolver`].
///
/// Mirrors the browser script's `if ('t' in ns) return;` guard: the first
/// install wins and later installs are no-ops, so initialization code can run
/// twice without clobbering live state. Hosts embed one of these (or keep a
/// `static`) instead of reaching for an ambient global.
#[derive(Debug, Default)]
pub struct ResolverHost {
    slot: OnceCell<Resolver>,
}

impl ResolverHost {
    /// An empty host, usable in `static` position.
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// Install a resolver. Returns `false` when one is already installed;
    /// the existing resolver stays.
    pub fn install(&self, resolver: Resolver) -> bool {
        self.slot.set(resolver).is_ok()
    }

    /// Whether a resolver has been installed.
    pub fn installed(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The installed resolver, if any.
    pub fn resolver(&self) -> Option<&Resolver> {
        self.slot.get()
    }

    /// Translate through the installed resolver.
    ///
    /// With no resolver installed the message is served untranslated;
    /// placeholder substitution still applies.
    pub fn t(&self, category: &str, message: &str, params: &[(&str, ParamValue)]) -> String {
        match self.slot.get() {
            Some(resolver) => resolver.resolve(category, message, params),
            None => {
                tracing::debug!(category, "no resolver installed, serving the literal message");
                substitute(message, params)
            }
        }
    }
}
