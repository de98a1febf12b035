//! Price resolution against a catalog snapshot.
//!
//! A [`PriceBook`] is handed to every calculator invocation. Resolution is a
//! pure in-memory lookup: no I/O, no failure path. Absence of a match is not
//! an error - the calculator's default price wins.

use super::catalog::{parse_unit_value, MaterialEntry, PricingContext};

/// Immutable pricing snapshot for one calculation pass.
///
/// A book is built from whatever override catalog is current for the
/// account's trade (see [`CatalogCache`](crate::pricing::CatalogCache)). A
/// book whose underlying fetch failed behaves exactly like a default-context
/// book, with the fetch error carried out-of-band for UI display.
#[derive(Debug, Clone)]
pub struct PriceBook {
    context: PricingContext,
    overrides: Vec<MaterialEntry>,
    fetch_error: Option<String>,
}

impl PriceBook {
    /// Default-context book: every lookup returns its default.
    pub fn defaults() -> Self {
        PriceBook {
            context: PricingContext::Default,
            overrides: Vec::new(),
            fetch_error: None,
        }
    }

    /// Custom-context book over an override snapshot.
    pub fn custom(overrides: Vec<MaterialEntry>) -> Self {
        PriceBook {
            context: PricingContext::Custom,
            overrides,
            fetch_error: None,
        }
    }

    /// A book for a custom context whose catalog fetch failed. Resolves like
    /// [`PriceBook::defaults`]; the error is reported, not thrown.
    pub fn degraded(error: impl Into<String>) -> Self {
        PriceBook {
            context: PricingContext::Custom,
            overrides: Vec::new(),
            fetch_error: Some(error.into()),
        }
    }

    /// The effective context: a failed fetch degrades `Custom` to `Default`.
    pub fn context(&self) -> PricingContext {
        if self.fetch_error.is_some() {
            PricingContext::Default
        } else {
            self.context
        }
    }

    /// The out-of-band fetch error, if the underlying catalog load failed.
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// Find the live override for `name` (+ optional `category`), picking the
    /// most recently created row when duplicates exist.
    fn find(&self, name: &str, category: Option<&str>) -> Option<&MaterialEntry> {
        if self.context() != PricingContext::Custom {
            return None;
        }
        self.overrides
            .iter()
            .filter(|e| e.matches(name, category))
            .max_by_key(|e| e.created)
    }

    /// Resolve a unit price: the override's price when a live match exists in
    /// custom context, else `default_price`.
    pub fn resolve_price(&self, name: &str, default_price: f64, category: Option<&str>) -> f64 {
        self.find(name, category)
            .map(|e| e.price)
            .unwrap_or(default_price)
    }

    /// Resolve a unit-conversion value (coverage per box, feet per roll, ...)
    /// from the override's `unit_spec`, else `default_value`. An unparseable
    /// spec falls back silently.
    pub fn resolve_unit_value(&self, name: &str, default_value: f64, category: Option<&str>) -> f64 {
        self.find(name, category)
            .and_then(|e| e.unit_spec.as_deref())
            .and_then(parse_unit_value)
            .unwrap_or(default_value)
    }
}

impl Default for PriceBook {
    fn default() -> Self {
        PriceBook::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn wood_post_override() -> MaterialEntry {
        MaterialEntry::new("Wood Post", "posts", 19.99)
    }

    #[test]
    fn test_override_precedence_in_custom_context() {
        let book = PriceBook::custom(vec![wood_post_override()]);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 19.99);
        // Name match is case-insensitive
        assert_eq!(book.resolve_price("wood post", 24.98, Some("posts")), 19.99);
    }

    #[test]
    fn test_default_context_ignores_overrides() {
        let book = PriceBook::defaults();
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 24.98);
    }

    #[test]
    fn test_archived_override_is_ignored() {
        let book = PriceBook::custom(vec![wood_post_override().archived()]);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 24.98);
    }

    #[test]
    fn test_category_filter() {
        let book = PriceBook::custom(vec![wood_post_override()]);
        // Wrong category: no match
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("concrete")), 24.98);
        // No category given: name alone matches
        assert_eq!(book.resolve_price("Wood Post", 24.98, None), 19.99);
    }

    #[test]
    fn test_duplicate_resolution_prefers_most_recent() {
        let mut older = wood_post_override();
        older.price = 15.00;
        older.created = Utc::now() - Duration::days(30);
        let newer = wood_post_override();

        // Order in the snapshot must not matter
        let book = PriceBook::custom(vec![newer.clone(), older.clone()]);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 19.99);
        let book = PriceBook::custom(vec![older, newer]);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 19.99);
    }

    #[test]
    fn test_unit_value_resolution() {
        let entry = MaterialEntry::new("Laminate Flooring", "flooring", 44.98)
            .with_unit_spec("24 sq ft");
        let book = PriceBook::custom(vec![entry]);
        assert_eq!(
            book.resolve_unit_value("Laminate Flooring", 20.0, Some("flooring")),
            24.0
        );
    }

    #[test]
    fn test_unparseable_unit_spec_falls_back() {
        let entry =
            MaterialEntry::new("Laminate Flooring", "flooring", 44.98).with_unit_spec("per box");
        let book = PriceBook::custom(vec![entry]);
        assert_eq!(
            book.resolve_unit_value("Laminate Flooring", 20.0, Some("flooring")),
            20.0
        );
    }

    #[test]
    fn test_degraded_book_resolves_defaults() {
        let book = PriceBook::degraded("network unreachable");
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 24.98);
        assert_eq!(book.context(), PricingContext::Default);
        assert_eq!(book.fetch_error(), Some("network unreachable"));
    }
}
