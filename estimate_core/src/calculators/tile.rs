//! # Tile Calculator
//!
//! Tile, setting materials, and substrate takeoff. Tile boxes follow the
//! area-with-waste scheme; thinset, grout, backer board, and uncoupling
//! membrane each round up independently by their own coverage constants,
//! with thinset/grout coverage keyed to the tile format.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};

/// Catalog category for this trade
pub const CATEGORY: &str = "tile";

const TILE: (&str, f64) = ("Ceramic Tile", 32.98); // per box
const THINSET: (&str, f64) = ("Thinset Mortar 50lb", 18.48);
const GROUT: (&str, f64) = ("Grout 25lb", 16.98);
const BACKER_BOARD: (&str, f64) = ("Backer Board (3x5)", 12.98);
const MEMBRANE: (&str, f64) = ("Uncoupling Membrane Roll", 104.98);

const TILE_BOX_COVERAGE_SF: f64 = 15.0;
const BACKER_SHEET_SF: f64 = 15.0;
const MEMBRANE_ROLL_SF: f64 = 54.0;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Tile format; drives thinset and grout coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileFormat {
    #[default]
    #[serde(rename = "12x12")]
    Square12,
    #[serde(rename = "18x18")]
    Square18,
    #[serde(rename = "6x24")]
    Plank6x24,
    #[serde(rename = "mosaic")]
    Mosaic,
}

impl TileFormat {
    /// Thinset coverage per 50 lb bag, square feet
    fn thinset_coverage_sf(&self) -> f64 {
        match self {
            TileFormat::Square12 => 95.0,
            TileFormat::Square18 => 75.0,
            TileFormat::Plank6x24 => 85.0,
            TileFormat::Mosaic => 60.0,
        }
    }

    /// Grout coverage per 25 lb bag, square feet
    fn grout_coverage_sf(&self) -> f64 {
        match self {
            TileFormat::Square12 => 105.0,
            TileFormat::Square18 => 140.0,
            TileFormat::Plank6x24 => 120.0,
            TileFormat::Mosaic => 60.0,
        }
    }
}

/// Lay pattern; herringbone runs the heaviest cut waste of any trade here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilePattern {
    #[default]
    Grid,
    Diagonal,
    Herringbone,
}

impl TilePattern {
    pub fn multiplier(&self) -> f64 {
        match self {
            TilePattern::Grid => 1.0,
            TilePattern::Diagonal => 1.10,
            TilePattern::Herringbone => 1.20,
        }
    }
}

/// Input parameters for a tile estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileInput {
    pub label: String,
    pub format: TileFormat,
    pub pattern: TilePattern,
    pub length_ft: Option<f64>,
    pub width_ft: Option<f64>,
    pub waste_pct: f64,
    pub include_backer_board: bool,
    pub include_membrane: bool,
}

impl Default for TileInput {
    fn default() -> Self {
        TileInput {
            label: String::new(),
            format: TileFormat::default(),
            pattern: TilePattern::default(),
            length_ft: None,
            width_ft: None,
            waste_pct: 10.0,
            include_backer_board: false,
            include_membrane: false,
        }
    }
}

impl TileInput {
    pub fn validate(&self) -> EstimateResult<()> {
        require_positive("length_ft", self.length_ft)?;
        require_positive("width_ft", self.width_ft)?;
        if !(0.0..=100.0).contains(&self.waste_pct) {
            return Err(EstimateError::invalid_input(
                "waste_pct",
                self.waste_pct.to_string(),
                "Waste must be between 0 and 100 percent",
            ));
        }
        Ok(())
    }
}

fn require_positive(field: &str, value: Option<f64>) -> EstimateResult<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(EstimateError::invalid_input(
            field,
            v.to_string(),
            "Must be a positive number",
        )),
        None => Err(EstimateError::missing_field(field)),
    }
}

/// Compute the tile bill of materials.
pub fn calculate(input: &TileInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    input.validate()?;
    let area = input.length_ft.unwrap_or(0.0) * input.width_ft.unwrap_or(0.0);
    let area_with_waste = area * (1.0 + input.waste_pct / 100.0) * input.pattern.multiplier();

    let mut items = ItemList::new();

    let coverage = book.resolve_unit_value(TILE.0, TILE_BOX_COVERAGE_SF, Some(CATEGORY));
    let boxes = (area_with_waste / coverage).ceil();
    items.push_priced(TILE.0, boxes, "boxes", boxes * price(book, TILE));

    // Setting materials cover the laid area, not the waste-padded area
    let thinset_bags = (area / input.format.thinset_coverage_sf()).ceil();
    items.push_priced(THINSET.0, thinset_bags, "bags", thinset_bags * price(book, THINSET));

    let grout_bags = (area / input.format.grout_coverage_sf()).ceil();
    items.push_priced(GROUT.0, grout_bags, "bags", grout_bags * price(book, GROUT));

    if input.include_backer_board {
        let sheets = (area / BACKER_SHEET_SF).ceil();
        items.push_priced(BACKER_BOARD.0, sheets, "sheets", sheets * price(book, BACKER_BOARD));
    }

    if input.include_membrane {
        let coverage = book.resolve_unit_value(MEMBRANE.0, MEMBRANE_ROLL_SF, Some(CATEGORY));
        let rolls = (area / coverage).ceil();
        items.push_priced(MEMBRANE.0, rolls, "rolls", rolls * price(book, MEMBRANE));
    }

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(TILE.0, CATEGORY, TILE.1).with_unit_spec("15 sq ft"),
        MaterialEntry::new(THINSET.0, CATEGORY, THINSET.1),
        MaterialEntry::new(GROUT.0, CATEGORY, GROUT.1),
        MaterialEntry::new(BACKER_BOARD.0, CATEGORY, BACKER_BOARD.1).with_unit_spec("15 sq ft"),
        MaterialEntry::new(MEMBRANE.0, CATEGORY, MEMBRANE.1).with_unit_spec("54 sq ft"),
    ]
}
