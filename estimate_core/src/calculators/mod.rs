//! # Trade Calculators
//!
//! One module per trade. Each calculator follows the pattern:
//!
//! - `*Input` - measurement inputs (JSON-serializable, every field defaulted
//!   so old snapshots load as partial input)
//! - `validate()` - the trade's required-field gate; an `Err` here is the
//!   "calculate disabled" state, never a panic
//! - `calculate(input, book) -> Result<Vec<LineItem>, EstimateError>` - pure
//!   function from inputs and a [`PriceBook`] to the ordered bill of
//!   materials
//!
//! ## Available Trades
//!
//! - [`concrete`] - flatwork and wall pours, delivery, additives, steel
//! - [`foundation`] - footings, walls, slab, and envelope from one footprint
//! - [`fencing`] - post-and-section styles plus a custom-quote mode
//! - [`framing`] - rough opening lumber packages
//! - [`flooring`] - boxed goods and carpet with pattern waste
//! - [`tile`] - tile, setting materials, substrate
//! - [`siding`] - cladding over wall sections
//! - [`plumbing`] - supply runs, fixtures, sewer lateral
//! - [`electrical`] - circuits, breakers, devices
//! - [`paint`] - gallons and sundries
//! - [`junk_removal`] - hauling with access/floor multipliers
//! - [`veneer`] - stone and thin-brick

pub mod concrete;
pub mod electrical;
pub mod fencing;
pub mod flooring;
pub mod foundation;
pub mod framing;
pub mod junk_removal;
pub mod paint;
pub mod plumbing;
pub mod siding;
pub mod tile;
pub mod veneer;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::LineItem;
use crate::pricing::{MaterialEntry, PriceBook};

// Re-export the input types for convenience
pub use concrete::ConcreteInput;
pub use electrical::ElectricalInput;
pub use fencing::FencingInput;
pub use flooring::FlooringInput;
pub use foundation::FoundationInput;
pub use framing::FramingInput;
pub use junk_removal::JunkRemovalInput;
pub use paint::PaintInput;
pub use plumbing::PlumbingInput;
pub use siding::SidingInput;
pub use tile::TileInput;
pub use veneer::VeneerInput;

/// One wall section, shared by the trades that measure wall-by-wall
/// (siding, paint). The id is an opaque UI reconciliation handle; order in
/// the list is display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSection {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub length_ft: Option<f64>,
    pub height_ft: Option<f64>,
}

impl Default for WallSection {
    fn default() -> Self {
        WallSection {
            id: Uuid::new_v4(),
            length_ft: None,
            height_ft: None,
        }
    }
}

/// Enum wrapper for all trade inputs.
///
/// This allows storing heterogeneous estimates in a single collection and in
/// snapshots while maintaining type safety and clean serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeInput {
    Concrete(ConcreteInput),
    Foundation(FoundationInput),
    Fencing(FencingInput),
    Framing(FramingInput),
    Flooring(FlooringInput),
    Tile(TileInput),
    Siding(SidingInput),
    Plumbing(PlumbingInput),
    Electrical(ElectricalInput),
    Paint(PaintInput),
    JunkRemoval(JunkRemovalInput),
    Veneer(VeneerInput),
}

impl TradeInput {
    /// The calculator type tag used in snapshots and catalog scoping.
    pub fn calculator_type(&self) -> &'static str {
        match self {
            TradeInput::Concrete(_) => "concrete",
            TradeInput::Foundation(_) => "foundation",
            TradeInput::Fencing(_) => "fencing",
            TradeInput::Framing(_) => "framing",
            TradeInput::Flooring(_) => "flooring",
            TradeInput::Tile(_) => "tile",
            TradeInput::Siding(_) => "siding",
            TradeInput::Plumbing(_) => "plumbing",
            TradeInput::Electrical(_) => "electrical",
            TradeInput::Paint(_) => "paint",
            TradeInput::JunkRemoval(_) => "junk_removal",
            TradeInput::Veneer(_) => "veneer",
        }
    }

    /// Get the user-provided label for this estimate
    pub fn label(&self) -> &str {
        match self {
            TradeInput::Concrete(i) => &i.label,
            TradeInput::Foundation(i) => &i.label,
            TradeInput::Fencing(i) => &i.label,
            TradeInput::Framing(i) => &i.label,
            TradeInput::Flooring(i) => &i.label,
            TradeInput::Tile(i) => &i.label,
            TradeInput::Siding(i) => &i.label,
            TradeInput::Plumbing(i) => &i.label,
            TradeInput::Electrical(i) => &i.label,
            TradeInput::Paint(i) => &i.label,
            TradeInput::JunkRemoval(i) => &i.label,
            TradeInput::Veneer(i) => &i.label,
        }
    }

    /// Run the trade's validity gate without computing line items.
    pub fn validate(&self) -> EstimateResult<()> {
        match self {
            TradeInput::Concrete(i) => i.validate(),
            TradeInput::Foundation(i) => i.validate(),
            TradeInput::Fencing(i) => i.validate(),
            TradeInput::Framing(i) => i.validate(),
            TradeInput::Flooring(i) => i.validate(),
            TradeInput::Tile(i) => i.validate(),
            TradeInput::Siding(i) => i.validate(),
            TradeInput::Plumbing(i) => i.validate(),
            TradeInput::Electrical(i) => i.validate(),
            TradeInput::Paint(i) => i.validate(),
            TradeInput::JunkRemoval(i) => i.validate(),
            TradeInput::Veneer(i) => i.validate(),
        }
    }

    /// Dispatch to the trade's calculator.
    pub fn calculate(&self, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
        match self {
            TradeInput::Concrete(i) => concrete::calculate(i, book),
            TradeInput::Foundation(i) => foundation::calculate(i, book),
            TradeInput::Fencing(i) => fencing::calculate(i, book),
            TradeInput::Framing(i) => framing::calculate(i, book),
            TradeInput::Flooring(i) => flooring::calculate(i, book),
            TradeInput::Tile(i) => tile::calculate(i, book),
            TradeInput::Siding(i) => siding::calculate(i, book),
            TradeInput::Plumbing(i) => plumbing::calculate(i, book),
            TradeInput::Electrical(i) => electrical::calculate(i, book),
            TradeInput::Paint(i) => paint::calculate(i, book),
            TradeInput::JunkRemoval(i) => junk_removal::calculate(i, book),
            TradeInput::Veneer(i) => veneer::calculate(i, book),
        }
    }

    /// Revive a trade input from a snapshot's opaque `estimate_data`.
    ///
    /// Every field is defaulted on load: snapshots predating a schema change
    /// parse as partial input rather than failing, and a payload the current
    /// shape cannot read at all degrades to the trade's default input.
    pub fn from_snapshot(
        calculator_type: &str,
        estimate_data: serde_json::Value,
    ) -> EstimateResult<TradeInput> {
        fn revive<T: Default + for<'de> Deserialize<'de>>(value: serde_json::Value) -> T {
            serde_json::from_value(value).unwrap_or_default()
        }

        match calculator_type {
            "concrete" => Ok(TradeInput::Concrete(revive(estimate_data))),
            "foundation" => Ok(TradeInput::Foundation(revive(estimate_data))),
            "fencing" => Ok(TradeInput::Fencing(revive(estimate_data))),
            "framing" => Ok(TradeInput::Framing(revive(estimate_data))),
            "flooring" => Ok(TradeInput::Flooring(revive(estimate_data))),
            "tile" => Ok(TradeInput::Tile(revive(estimate_data))),
            "siding" => Ok(TradeInput::Siding(revive(estimate_data))),
            "plumbing" => Ok(TradeInput::Plumbing(revive(estimate_data))),
            "electrical" => Ok(TradeInput::Electrical(revive(estimate_data))),
            "paint" => Ok(TradeInput::Paint(revive(estimate_data))),
            "junk_removal" => Ok(TradeInput::JunkRemoval(revive(estimate_data))),
            "veneer" => Ok(TradeInput::Veneer(revive(estimate_data))),
            other => Err(EstimateError::invalid_input(
                "calculator_type",
                other,
                "Unknown calculator type",
            )),
        }
    }
}

/// Every embedded default across all twelve trades, for the catalog
/// registry.
pub(crate) fn default_catalog_entries() -> Vec<MaterialEntry> {
    let mut entries = Vec::new();
    entries.extend(concrete::default_entries());
    entries.extend(foundation::default_entries());
    entries.extend(fencing::default_entries());
    entries.extend(framing::default_entries());
    entries.extend(flooring::default_entries());
    entries.extend(tile::default_entries());
    entries.extend(siding::default_entries());
    entries.extend(plumbing::default_entries());
    entries.extend(electrical::default_entries());
    entries.extend(paint::default_entries());
    entries.extend(junk_removal::default_entries());
    entries.extend(veneer::default_entries());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_calculator_type_tags() {
        let input = TradeInput::Concrete(ConcreteInput::default());
        assert_eq!(input.calculator_type(), "concrete");
        let input = TradeInput::JunkRemoval(JunkRemovalInput::default());
        assert_eq!(input.calculator_type(), "junk_removal");
    }

    #[test]
    fn test_dispatch_matches_direct_call() {
        let concrete = ConcreteInput {
            geometry: concrete::ConcreteGeometry::Flatwork {
                length_ft: Some(10.0),
                width_ft: Some(10.0),
                depth_in: Some(4.0),
            },
            ..ConcreteInput::default()
        };
        let book = PriceBook::defaults();
        let direct = concrete::calculate(&concrete, &book).unwrap();
        let dispatched = TradeInput::Concrete(concrete).calculate(&book).unwrap();
        assert_eq!(direct, dispatched);
    }

    #[test]
    fn test_from_snapshot_defaults_missing_fields() {
        let input = TradeInput::from_snapshot(
            "concrete",
            json!({
                "geometry": {
                    "concrete_type": "flatwork",
                    "length_ft": 10.0, "width_ft": 10.0, "depth_in": 4.0
                }
            }),
        )
        .unwrap();
        assert!(input.validate().is_ok());
        match input {
            TradeInput::Concrete(c) => assert!(!c.add_color),
            other => panic!("wrong variant: {}", other.calculator_type()),
        }
    }

    #[test]
    fn test_from_snapshot_unreadable_payload_degrades_to_default() {
        let input = TradeInput::from_snapshot("tile", json!("not an object")).unwrap();
        match input {
            TradeInput::Tile(t) => assert_eq!(t, TileInput::default()),
            other => panic!("wrong variant: {}", other.calculator_type()),
        }
    }

    #[test]
    fn test_from_snapshot_unknown_type() {
        let err = TradeInput::from_snapshot("roofing", json!({})).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_tagged_serialization_roundtrip() {
        let input = TradeInput::Fencing(FencingInput::default());
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"type\":\"fencing\""));
        let roundtrip: TradeInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }

    #[test]
    fn test_default_catalog_covers_every_trade() {
        let entries = default_catalog_entries();
        for category in [
            "concrete",
            "foundation",
            "fencing",
            "posts",
            "framing",
            "flooring",
            "tile",
            "siding",
            "plumbing",
            "electrical",
            "paint",
            "junk_removal",
            "veneer",
        ] {
            assert!(
                entries.iter().any(|e| e.category == category),
                "no default entries for {category}"
            );
        }
    }
}
