//! Message catalogs for rendering templated messages.
//!
//! Templated messages carry a key and positional arguments; the text is only
//! produced when a [`Catalog`] is asked to resolve the key. This keeps the
//! validation core independent of any particular locale or bundle format.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};

/// A source of message patterns keyed by template key.
///
/// Patterns use positional placeholders `{0}`, `{1}`, ... which are replaced by
/// the rendered template arguments.
pub trait Catalog {
    /// Returns the pattern registered for `key`, if any.
    fn pattern(&self, key: &str) -> Option<&str>;
}

/// English patterns for every key produced by the built-in validators.
const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    ("string.min_length", "length must be at least {0}, got {1}"),
    ("string.max_length", "length must be at most {0}, got {1}"),
    ("string.exact_length", "length must be exactly {0}, got {1}"),
    ("string.not_blank", "must not be blank"),
    ("string.pattern", "must match pattern '{0}'"),
    ("integer.min", "must be at least {0}, got {1}"),
    ("integer.max", "must be at most {0}, got {1}"),
    ("integer.positive", "must be positive, got {0}"),
    ("integer.non_negative", "must be non-negative, got {0}"),
    ("integer.negative", "must be negative, got {0}"),
    ("parse.integer", "'{0}' is not a valid integer"),
    ("array.min_length", "must have at least {0} items, got {1}"),
    ("array.max_length", "must have at most {0} items, got {1}"),
    ("temporal.past", "must be in the past"),
    ("temporal.future", "must be in the future"),
    ("temporal.past_or_present", "must not be in the future"),
    ("temporal.future_or_present", "must not be in the past"),
    ("composite.or", "either ({0}) or ({1})"),
    ("factory.construction_failed", "could not construct {0}: {1}"),
];

/// The built-in English catalog.
///
/// This is what `Display` implementations use, so messages are readable even
/// when no catalog has been configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

impl Catalog for DefaultCatalog {
    fn pattern(&self, key: &str) -> Option<&str> {
        DEFAULT_PATTERNS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, pattern)| *pattern)
    }
}

/// An in-memory catalog of message patterns.
///
/// Keys missing from the catalog fall back to [`DefaultCatalog`], so a partial
/// translation still renders every built-in message.
///
/// # Example
///
/// ```rust
/// use inquest::{Catalog, MessageCatalog};
///
/// let catalog = MessageCatalog::new()
///     .with("string.min_length", "au moins {0} caractères (reçu {1})");
///
/// assert_eq!(
///     catalog.pattern("string.min_length"),
///     Some("au moins {0} caractères (reçu {1})")
/// );
/// // falls back to the English default
/// assert_eq!(catalog.pattern("string.not_blank"), Some("must not be blank"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    patterns: IndexMap<String, String>,
}

impl MessageCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern and returns self for chaining.
    pub fn with(mut self, key: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.insert(key, pattern);
        self
    }

    /// Adds or replaces a pattern.
    pub fn insert(&mut self, key: impl Into<String>, pattern: impl Into<String>) {
        self.patterns.insert(key.into(), pattern.into());
    }

    /// Returns the number of patterns registered directly in this catalog.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if no patterns were registered.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Catalog for MessageCatalog {
    fn pattern(&self, key: &str) -> Option<&str> {
        self.patterns
            .get(key)
            .map(String::as_str)
            .or_else(|| DefaultCatalog.pattern(key))
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("placeholder regex is valid"))
}

/// Replaces `{n}` placeholders in `pattern` with `args[n]`.
///
/// Placeholders without a matching argument are left untouched.
pub(crate) fn substitute(pattern: &str, args: &[String]) -> String {
    placeholder()
        .replace_all(pattern, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_positional() {
        let rendered = substitute("{0} and {1}", &["a".to_string(), "b".to_string()]);
        assert_eq!(rendered, "a and b");
    }

    #[test]
    fn test_substitute_repeated_and_missing() {
        let rendered = substitute("{0}{0} {2}", &["x".to_string()]);
        assert_eq!(rendered, "xx {2}");
    }

    #[test]
    fn test_default_catalog_has_builtin_keys() {
        assert!(DefaultCatalog.pattern("string.min_length").is_some());
        assert!(DefaultCatalog.pattern("composite.or").is_some());
        assert!(DefaultCatalog.pattern("nope").is_none());
    }

    #[test]
    fn test_catalog_override_wins() {
        let catalog = MessageCatalog::new().with("temporal.past", "muss in der Vergangenheit liegen");
        assert_eq!(
            catalog.pattern("temporal.past"),
            Some("muss in der Vergangenheit liegen")
        );
        assert_eq!(catalog.len(), 1);
    }
}
