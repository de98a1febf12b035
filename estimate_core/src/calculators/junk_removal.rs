//! # Junk Removal Calculator
//!
//! Hauling cost from an itemized load. The base charge is a cost floor, not
//! a sum: max(total volume x volume rate, total weight x weight rate). The
//! access-difficulty and floor multipliers apply to the entire accumulated
//! subtotal (base plus mileage), never per line; the markup lands in its own
//! costed surcharge row so the trailing total still equals the sum of costs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};
use crate::units::round2;

/// Catalog category for this trade
pub const CATEGORY: &str = "junk_removal";

const VOLUME_RATE: (&str, f64) = ("Hauling Volume Rate", 1.50); // per cu ft
const WEIGHT_RATE: (&str, f64) = ("Hauling Weight Rate", 0.50); // per lb
const MILEAGE_RATE: (&str, f64) = ("Mileage Rate", 2.50); // per mile

/// Extra 15% per floor above ground level
const PER_FLOOR_SURCHARGE: f64 = 0.15;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Site access difficulty, applied to the whole job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDifficulty {
    #[default]
    Easy,
    Moderate,
    Difficult,
}

impl AccessDifficulty {
    pub fn multiplier(&self) -> f64 {
        match self {
            AccessDifficulty::Easy => 1.0,
            AccessDifficulty::Moderate => 1.25,
            AccessDifficulty::Difficult => 1.5,
        }
    }
}

/// One item (or stack of identical items) in the load. The id is an opaque
/// UI reconciliation handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JunkItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub volume_ft3: Option<f64>,
    pub weight_lb: Option<f64>,
    pub quantity: u32,
}

impl Default for JunkItem {
    fn default() -> Self {
        JunkItem {
            id: Uuid::new_v4(),
            name: String::new(),
            volume_ft3: None,
            weight_lb: None,
            quantity: 1,
        }
    }
}

/// Input parameters for a junk removal estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JunkRemovalInput {
    pub label: String,
    pub items: Vec<JunkItem>,
    pub distance_miles: Option<f64>,
    pub access: AccessDifficulty,
    /// Ground floor is 1
    pub floors: u32,
}

impl Default for JunkRemovalInput {
    fn default() -> Self {
        JunkRemovalInput {
            label: String::new(),
            items: Vec::new(),
            distance_miles: None,
            access: AccessDifficulty::default(),
            floors: 1,
        }
    }
}

impl JunkRemovalInput {
    /// At least one item contributing volume or weight.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.items.is_empty() {
            return Err(EstimateError::missing_field("items"));
        }
        let contributes = self.items.iter().any(|item| {
            item.quantity > 0
                && (item.volume_ft3.unwrap_or(0.0) > 0.0 || item.weight_lb.unwrap_or(0.0) > 0.0)
        });
        if !contributes {
            return Err(EstimateError::invalid_input(
                "items",
                "0",
                "At least one item needs a positive volume or weight",
            ));
        }
        Ok(())
    }

    fn totals(&self) -> (f64, f64) {
        let mut volume = 0.0;
        let mut weight = 0.0;
        for item in &self.items {
            let qty = f64::from(item.quantity);
            volume += item.volume_ft3.unwrap_or(0.0) * qty;
            weight += item.weight_lb.unwrap_or(0.0) * qty;
        }
        (volume, weight)
    }
}

/// Compute the junk removal estimate.
///
/// Order matters: base and mileage accumulate first, then the combined
/// access/floor multiplier is applied to that subtotal as one surcharge row.
pub fn calculate(input: &JunkRemovalInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    input.validate()?;

    let (volume, weight) = input.totals();
    let volume_cost = volume * price(book, VOLUME_RATE);
    let weight_cost = weight * price(book, WEIGHT_RATE);

    let mut items = ItemList::new();

    items.push_quantity("Load Volume", volume, "cu ft");
    items.push_quantity("Load Weight", weight, "lb");

    // Cost floor: the greater basis charges, never both
    let basis = if volume_cost >= weight_cost {
        "volume basis"
    } else {
        "weight basis"
    };
    let base = volume_cost.max(weight_cost);
    items.push_priced(format!("Hauling ({basis})"), 1.0, "load", base);

    if let Some(miles) = input.distance_miles {
        if miles > 0.0 {
            items.push_priced("Mileage", miles, "mi", miles * price(book, MILEAGE_RATE));
        }
    }

    // Multipliers scale the whole subtotal, not individual lines
    let floor_multiplier = 1.0 + PER_FLOOR_SURCHARGE * (f64::from(input.floors.max(1)) - 1.0);
    let combined = input.access.multiplier() * floor_multiplier;
    if combined > 1.0 {
        let surcharge = items.running_cost() * (combined - 1.0);
        items.push_priced(
            "Access & Floor Surcharge",
            round2(combined),
            "x",
            surcharge,
        );
    }

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(VOLUME_RATE.0, CATEGORY, VOLUME_RATE.1),
        MaterialEntry::new(WEIGHT_RATE.0, CATEGORY, WEIGHT_RATE.1),
        MaterialEntry::new(MILEAGE_RATE.0, CATEGORY, MILEAGE_RATE.1),
    ]
}
