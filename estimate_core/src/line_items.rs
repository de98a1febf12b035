//! # Line Items
//!
//! The output vocabulary of every trade calculator: an ordered list of
//! [`LineItem`] records. Order follows a declare-as-you-compute convention:
//! primary material first, then fasteners/fittings/consumables, then optional
//! add-ons, then (for calculators that emit one) a final aggregate total.
//!
//! ## Total Invariant
//!
//! Contractors cross-check estimates by hand, so a total line's `value` must
//! equal the sum of all preceding items' `cost`. The [`ItemList`] builder
//! owns the running sum, making the invariant hold by construction.
//!
//! ## JSON Example
//!
//! ```json
//! [
//!   { "label": "Ready-Mix Concrete", "value": 1.23, "unit": "cu yd", "cost": 228.39 },
//!   { "label": "Loads under 3 cu yd may incur a small-load fee", "value": 0.0, "unit": "", "is_warning": true },
//!   { "label": "Estimated Total", "value": 228.39, "unit": "", "cost": 228.39, "is_total": true }
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::units::round2;

/// One row of a computed bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display label (e.g., "Ready-Mix Concrete", "Wood Posts")
    pub label: String,

    /// Quantity, rounded to 2 decimals for display
    pub value: f64,

    /// Unit of the quantity (e.g., "cu yd", "bags", "ea"); empty for totals
    pub unit: String,

    /// Extended cost for this row, when the row is costed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,

    /// Marks the final aggregate row
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_total: bool,

    /// Marks a non-costed advisory row
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_warning: bool,
}

impl LineItem {
    /// A quantity-only row with no cost (e.g., an informational measurement).
    pub fn quantity(label: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        LineItem {
            label: label.into(),
            value: round2(value),
            unit: unit.into(),
            cost: None,
            is_total: false,
            is_warning: false,
        }
    }

    /// A costed material row.
    pub fn priced(
        label: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        cost: f64,
    ) -> Self {
        LineItem {
            label: label.into(),
            value: round2(value),
            unit: unit.into(),
            cost: Some(round2(cost)),
            is_total: false,
            is_warning: false,
        }
    }

    /// A non-costed advisory row.
    pub fn warning(label: impl Into<String>) -> Self {
        LineItem {
            label: label.into(),
            value: 0.0,
            unit: String::new(),
            cost: None,
            is_total: false,
            is_warning: true,
        }
    }
}

/// Ordered line-item accumulator with a running cost total.
///
/// Calculators push rows as they compute them and close with
/// [`ItemList::finish_with_total`] (or [`ItemList::finish`] for the few
/// calculators that emit no aggregate row).
///
/// ## Example
///
/// ```rust
/// use estimate_core::line_items::ItemList;
///
/// let mut items = ItemList::new();
/// items.push_priced("Wood Posts", 14.0, "ea", 14.0 * 24.98);
/// items.push_priced("Concrete Bags 60lb", 21.0, "bags", 21.0 * 4.48);
/// let results = items.finish_with_total("Estimated Total");
///
/// let total = results.last().unwrap();
/// assert!(total.is_total);
/// assert!((total.value - (14.0 * 24.98 + 21.0 * 4.48)).abs() < 1e-6);
/// ```
#[derive(Debug, Default)]
pub struct ItemList {
    items: Vec<LineItem>,
    running_cost: f64,
}

impl ItemList {
    pub fn new() -> Self {
        ItemList::default()
    }

    /// Push a costed row and add its cost to the running total.
    pub fn push_priced(
        &mut self,
        label: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        cost: f64,
    ) {
        let item = LineItem::priced(label, value, unit, cost);
        // Accumulate the rounded cost so the total matches what is displayed
        self.running_cost += item.cost.unwrap_or(0.0);
        self.items.push(item);
    }

    /// Push a quantity-only row (no cost contribution).
    pub fn push_quantity(&mut self, label: impl Into<String>, value: f64, unit: impl Into<String>) {
        self.items.push(LineItem::quantity(label, value, unit));
    }

    /// Push an advisory row (no cost contribution).
    pub fn push_warning(&mut self, label: impl Into<String>) {
        self.items.push(LineItem::warning(label));
    }

    /// Sum of all costed rows pushed so far.
    pub fn running_cost(&self) -> f64 {
        self.running_cost
    }

    /// Close the list with an aggregate total row.
    pub fn finish_with_total(mut self, label: impl Into<String>) -> Vec<LineItem> {
        let total = round2(self.running_cost);
        self.items.push(LineItem {
            label: label.into(),
            value: total,
            unit: String::new(),
            cost: Some(total),
            is_total: true,
            is_warning: false,
        });
        self.items
    }

    /// Close the list without a total row.
    pub fn finish(self) -> Vec<LineItem> {
        self.items
    }
}

/// Check the total invariant on a computed list: every total row's value
/// equals the sum of the costs of the rows before it (1e-6 relative
/// tolerance). Exposed for tests and for persistence-layer sanity checks.
pub fn verify_total_invariant(items: &[LineItem]) -> bool {
    let mut sum: f64 = 0.0;
    for item in items {
        if item.is_total {
            let tolerance = 1e-6 * sum.abs().max(1.0);
            if (item.value - sum).abs() > tolerance {
                return false;
            }
        }
        if !item.is_total {
            sum += item.cost.unwrap_or(0.0);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_matches_sum() {
        let mut items = ItemList::new();
        items.push_priced("Material A", 3.0, "ea", 30.0);
        items.push_priced("Material B", 2.0, "boxes", 45.50);
        items.push_warning("Check local disposal rules");
        let results = items.finish_with_total("Estimated Total");

        assert_eq!(results.len(), 4);
        let total = results.last().unwrap();
        assert!(total.is_total);
        assert!((total.value - 75.50).abs() < 1e-9);
        assert!(verify_total_invariant(&results));
    }

    #[test]
    fn test_warnings_do_not_contribute() {
        let mut items = ItemList::new();
        items.push_warning("advisory only");
        items.push_priced("Material", 1.0, "ea", 10.0);
        let results = items.finish_with_total("Total");
        assert!((results.last().unwrap().value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_invariant_detects_violation() {
        let items = vec![
            LineItem::priced("A", 1.0, "ea", 10.0),
            LineItem {
                label: "Total".to_string(),
                value: 99.0,
                unit: String::new(),
                cost: Some(99.0),
                is_total: true,
                is_warning: false,
            },
        ];
        assert!(!verify_total_invariant(&items));
    }

    #[test]
    fn test_serialization_skips_default_flags() {
        let item = LineItem::quantity("Area", 120.0, "sq ft");
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("is_total"));
        assert!(!json.contains("is_warning"));
        assert!(!json.contains("cost"));

        let roundtrip: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, roundtrip);
    }

    #[test]
    fn test_display_rounding() {
        let item = LineItem::priced("Concrete", 1.23456, "cu yd", 228.3894);
        assert_eq!(item.value, 1.23);
        assert_eq!(item.cost, Some(228.39));
    }
}
