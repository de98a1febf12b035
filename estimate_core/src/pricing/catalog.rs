//! Material catalog model.
//!
//! An account's override catalog is a flat list of [`MaterialEntry`] rows
//! fetched from storage. Defaults are embedded in each calculator; the
//! [`default_catalog`] registry enumerates them so callers can present the
//! full priceable surface (e.g., for an override-editing UI).

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Which pricing tier the resolver prefers.
///
/// The context is chosen outside the engine (an account-level toggle) and
/// passed explicitly into [`PriceBook`](crate::pricing::PriceBook)
/// construction; calculators never read ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingContext {
    /// Embedded default prices only
    #[default]
    Default,
    /// Prefer the account's override catalog, falling back entry-by-entry
    Custom,
}

/// One row of an account's override catalog.
///
/// Uniqueness among non-archived rows is by `(name.lowercase(), category)`.
/// When duplicates exist anyway, resolution picks the most recently created
/// row - `created` is the documented tie-break.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Wood Post",
///   "category": "posts",
///   "price": 19.99,
///   "unit_spec": "8 ft",
///   "archived": false,
///   "created": "2026-03-14T09:30:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    /// Material name, matched case-insensitively
    pub name: String,

    /// Trade category (e.g., "concrete", "posts", "flooring")
    pub category: String,

    /// Unit price in dollars, >= 0
    pub price: f64,

    /// Free-text unit specification (e.g., "100 sq ft", "500 ft roll")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_spec: Option<String>,

    /// Archived rows never resolve
    #[serde(default)]
    pub archived: bool,

    /// Creation stamp, used as the duplicate tie-break
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

impl MaterialEntry {
    /// Create a live entry with no unit spec.
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        MaterialEntry {
            name: name.into(),
            category: category.into(),
            price,
            unit_spec: None,
            archived: false,
            created: Utc::now(),
        }
    }

    /// Attach a unit specification.
    pub fn with_unit_spec(mut self, spec: impl Into<String>) -> Self {
        self.unit_spec = Some(spec.into());
        self
    }

    /// Mark the entry archived.
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Case-insensitive name + optional category match for live entries.
    pub fn matches(&self, name: &str, category: Option<&str>) -> bool {
        if self.archived {
            return false;
        }
        if !self.name.eq_ignore_ascii_case(name) {
            return false;
        }
        match category {
            Some(cat) => self.category == cat,
            None => true,
        }
    }
}

/// Parse the numeric value out of a free-text unit specification.
///
/// The micro-format is "number, then whatever": `"100 sq ft"` -> `100.0`,
/// `"500ft"` -> `500.0`, `"1,000 sqft"` -> `1000.0`. Leading text before the
/// first digit is skipped, so `"covers 24 sq ft"` also parses. Returns `None`
/// when no number is present - callers fall back to their default.
pub fn parse_unit_value(spec: &str) -> Option<f64> {
    let cleaned: String = spec.chars().filter(|c| *c != ',').collect();

    let start = cleaned.find(|c: char| c.is_ascii_digit())?;
    let rest = &cleaned[start..];
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(rest.len());

    rest[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The full embedded default catalog: every material the twelve trade
/// calculators price, with its default price and (where meaningful) the
/// default unit spec. Built once, on first access.
pub static DEFAULT_CATALOG: Lazy<Vec<MaterialEntry>> =
    Lazy::new(crate::calculators::default_catalog_entries);

/// Enumerate the embedded default catalog.
pub fn default_catalog() -> &'static [MaterialEntry] {
    &DEFAULT_CATALOG
}
