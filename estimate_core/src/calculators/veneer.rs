//! # Veneer Calculator
//!
//! Stone and thin-brick veneer takeoff. Outside corners are figured first by
//! linear foot; the corner pieces consume wall area (about 0.75 sq ft per
//! linear foot), so the flats cover only the remainder. Mortar, lath, and
//! fasteners each round up by their own coverage.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};

/// Catalog category for this trade
pub const CATEGORY: &str = "veneer";

const STONE_FLATS: (&str, f64) = ("Stone Veneer Flats Box", 89.98);
const STONE_CORNERS: (&str, f64) = ("Stone Veneer Corners Box", 94.98);
const BRICK_FLATS: (&str, f64) = ("Thin Brick Flats Box", 64.98);
const BRICK_CORNERS: (&str, f64) = ("Thin Brick Corners Box", 69.98);
const MORTAR: (&str, f64) = ("Veneer Mortar 50lb", 14.98);
const LATH: (&str, f64) = ("Metal Lath Sheet", 11.48);
const LATH_FASTENERS: (&str, f64) = ("Lath Fasteners Box", 18.98);

/// Flats box coverage, square feet
const FLATS_BOX_SF: f64 = 10.0;
/// Corners box coverage, linear feet
const CORNERS_BOX_LF: f64 = 6.0;
/// Wall area consumed per linear foot of corner pieces
const CORNER_AREA_SF_PER_LF: f64 = 0.75;
/// Mortar coverage per 50 lb bag
const MORTAR_COVERAGE_SF: f64 = 35.0;
/// 27 in x 96 in lath sheet
const LATH_SHEET_SF: f64 = 18.0;
/// One fastener box per this much lathed area
const FASTENERS_SF_PER_BOX: f64 = 200.0;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Veneer product families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VeneerKind {
    #[default]
    Stone,
    ThinBrick,
}

impl VeneerKind {
    fn flats_key(&self) -> (&'static str, f64) {
        match self {
            VeneerKind::Stone => STONE_FLATS,
            VeneerKind::ThinBrick => BRICK_FLATS,
        }
    }

    fn corners_key(&self) -> (&'static str, f64) {
        match self {
            VeneerKind::Stone => STONE_CORNERS,
            VeneerKind::ThinBrick => BRICK_CORNERS,
        }
    }
}

/// Input parameters for a veneer estimate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VeneerInput {
    pub label: String,
    pub kind: VeneerKind,
    pub length_ft: Option<f64>,
    pub height_ft: Option<f64>,
    /// Area of openings to deduct, square feet
    pub opening_sf: Option<f64>,
    /// Outside corner run, linear feet
    pub corner_lf: Option<f64>,
}

impl VeneerInput {
    pub fn validate(&self) -> EstimateResult<()> {
        require_positive("length_ft", self.length_ft)?;
        require_positive("height_ft", self.height_ft)?;
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

/// Compute the veneer bill of materials.
pub fn calculate(input: &VeneerInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    input.validate()?;

    let gross = input.length_ft.unwrap_or(0.0) * input.height_ft.unwrap_or(0.0);
    let net = (gross - input.opening_sf.unwrap_or(0.0)).max(0.0);
    let corner_lf = input.corner_lf.unwrap_or(0.0).max(0.0);
    let flats_area = (net - corner_lf * CORNER_AREA_SF_PER_LF).max(0.0);

    let mut items = ItemList::new();

    let flats = input.kind.flats_key();
    let flats_coverage = book.resolve_unit_value(flats.0, FLATS_BOX_SF, Some(CATEGORY));
    let flats_boxes = (flats_area / flats_coverage).ceil();
    items.push_priced(flats.0, flats_boxes, "boxes", flats_boxes * price(book, flats));

    if corner_lf > 0.0 {
        let corners = input.kind.corners_key();
        let corners_coverage = book.resolve_unit_value(corners.0, CORNERS_BOX_LF, Some(CATEGORY));
        let corner_boxes = (corner_lf / corners_coverage).ceil();
        items.push_priced(corners.0, corner_boxes, "boxes", corner_boxes * price(book, corners));
    }

    // Mortar, lath, and fasteners cover the full veneered area
    let mortar_bags = (net / MORTAR_COVERAGE_SF).ceil();
    items.push_priced(MORTAR.0, mortar_bags, "bags", mortar_bags * price(book, MORTAR));

    let lath_sheets = (net / LATH_SHEET_SF).ceil();
    items.push_priced(LATH.0, lath_sheets, "sheets", lath_sheets * price(book, LATH));

    let fastener_boxes = (net / FASTENERS_SF_PER_BOX).ceil().max(1.0);
    items.push_priced(
        LATH_FASTENERS.0,
        fastener_boxes,
        "boxes",
        fastener_boxes * price(book, LATH_FASTENERS),
    );

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(STONE_FLATS.0, CATEGORY, STONE_FLATS.1).with_unit_spec("10 sq ft"),
        MaterialEntry::new(STONE_CORNERS.0, CATEGORY, STONE_CORNERS.1).with_unit_spec("6 ft"),
        MaterialEntry::new(BRICK_FLATS.0, CATEGORY, BRICK_FLATS.1).with_unit_spec("10 sq ft"),
        MaterialEntry::new(BRICK_CORNERS.0, CATEGORY, BRICK_CORNERS.1).with_unit_spec("6 ft"),
        MaterialEntry::new(MORTAR.0, CATEGORY, MORTAR.1),
        MaterialEntry::new(LATH.0, CATEGORY, LATH.1).with_unit_spec("18 sq ft"),
        MaterialEntry::new(LATH_FASTENERS.0, CATEGORY, LATH_FASTENERS.1),
    ]
}
