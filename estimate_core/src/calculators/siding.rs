//! # Siding Calculator
//!
//! Exterior cladding takeoff over a list of wall sections. Net area deducts
//! standard opening allowances (21 sq ft per door, 15 sq ft per window);
//! squares are 100 sq ft. The cladding branch varies by product; wrap,
//! starter, J-channel, and fasteners ride along on every job.

use serde::{Deserialize, Serialize};

use crate::calculators::WallSection;
use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};

/// Catalog category for this trade
pub const CATEGORY: &str = "siding";

const VINYL_SQUARE: (&str, f64) = ("Vinyl Siding Square", 189.0);
const FIBER_CEMENT_PLANK: (&str, f64) = ("Fiber Cement Plank", 11.98);
const LAP_BOARD: (&str, f64) = ("Lap Siding Board", 16.48);
const HOUSE_WRAP: (&str, f64) = ("House Wrap Roll", 165.0);
const STARTER_STRIP: (&str, f64) = ("Starter Strip (12 ft)", 8.98);
const J_CHANNEL: (&str, f64) = ("J-Channel (12 ft)", 9.48);
const SIDING_NAILS: (&str, f64) = ("Siding Nails Box", 42.98);

/// Standard opening allowances, square feet
const DOOR_ALLOWANCE_SF: f64 = 21.0;
const WINDOW_ALLOWANCE_SF: f64 = 15.0;
const SQUARE_SF: f64 = 100.0;
/// 9 ft x 150 ft house wrap roll
const WRAP_ROLL_SF: f64 = 1350.0;
/// Fiber cement: 8-1/4 in plank at 7 in exposure over 12 ft
const FIBER_CEMENT_PLANK_SF: f64 = 7.0;
/// Wood lap board coverage
const LAP_BOARD_SF: f64 = 5.33;
const TRIM_STICK_FT: f64 = 12.0;
/// One nail box sides roughly ten squares
const NAILS_SF_PER_BOX: f64 = 1000.0;
/// J-channel sticks per opening
const J_CHANNEL_PER_OPENING: f64 = 3.0;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Cladding product families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidingKind {
    #[default]
    Vinyl,
    FiberCement,
    LapWood,
}

/// Input parameters for a siding estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidingInput {
    pub label: String,
    pub kind: SidingKind,
    pub walls: Vec<WallSection>,
    pub door_count: u32,
    pub window_count: u32,
    pub waste_pct: f64,
}

impl Default for SidingInput {
    fn default() -> Self {
        SidingInput {
            label: String::new(),
            kind: SidingKind::default(),
            walls: Vec::new(),
            door_count: 0,
            window_count: 0,
            waste_pct: 10.0,
        }
    }
}

impl SidingInput {
    /// At least one wall, each with positive length and height.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.walls.is_empty() {
            return Err(EstimateError::missing_field("walls"));
        }
        for wall in &self.walls {
            require_positive("length_ft", wall.length_ft)?;
            require_positive("height_ft", wall.height_ft)?;
        }
        Ok(())
    }

    fn gross_area(&self) -> f64 {
        self.walls
            .iter()
            .map(|w| w.length_ft.unwrap_or(0.0) * w.height_ft.unwrap_or(0.0))
            .sum()
    }

    fn perimeter_lf(&self) -> f64 {
        self.walls.iter().map(|w| w.length_ft.unwrap_or(0.0)).sum()
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

/// Compute the siding bill of materials.
pub fn calculate(input: &SidingInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    input.validate()?;

    let gross = input.gross_area();
    let allowances = f64::from(input.door_count) * DOOR_ALLOWANCE_SF
        + f64::from(input.window_count) * WINDOW_ALLOWANCE_SF;
    let net = (gross - allowances).max(0.0);
    let area_with_waste = net * (1.0 + input.waste_pct / 100.0);

    let mut items = ItemList::new();

    match input.kind {
        SidingKind::Vinyl => {
            let squares = (area_with_waste / SQUARE_SF).ceil();
            items.push_priced(VINYL_SQUARE.0, squares, "squares", squares * price(book, VINYL_SQUARE));
        }
        SidingKind::FiberCement => {
            let coverage =
                book.resolve_unit_value(FIBER_CEMENT_PLANK.0, FIBER_CEMENT_PLANK_SF, Some(CATEGORY));
            let planks = (area_with_waste / coverage).ceil();
            items.push_priced(
                FIBER_CEMENT_PLANK.0,
                planks,
                "pcs",
                planks * price(book, FIBER_CEMENT_PLANK),
            );
        }
        SidingKind::LapWood => {
            let coverage = book.resolve_unit_value(LAP_BOARD.0, LAP_BOARD_SF, Some(CATEGORY));
            let boards = (area_with_waste / coverage).ceil();
            items.push_priced(LAP_BOARD.0, boards, "pcs", boards * price(book, LAP_BOARD));
        }
    }

    // Wrap goes up behind everything, figured on gross area
    let wrap_coverage = book.resolve_unit_value(HOUSE_WRAP.0, WRAP_ROLL_SF, Some(CATEGORY));
    let wrap_rolls = (gross / wrap_coverage).ceil();
    items.push_priced(HOUSE_WRAP.0, wrap_rolls, "rolls", wrap_rolls * price(book, HOUSE_WRAP));

    let starter_sticks = (input.perimeter_lf() / TRIM_STICK_FT).ceil();
    items.push_priced(
        STARTER_STRIP.0,
        starter_sticks,
        "pcs",
        starter_sticks * price(book, STARTER_STRIP),
    );

    let openings = f64::from(input.door_count + input.window_count);
    if openings > 0.0 {
        let sticks = openings * J_CHANNEL_PER_OPENING;
        items.push_priced(J_CHANNEL.0, sticks, "pcs", sticks * price(book, J_CHANNEL));
    }

    let nail_boxes = (area_with_waste / NAILS_SF_PER_BOX).ceil().max(1.0);
    items.push_priced(SIDING_NAILS.0, nail_boxes, "boxes", nail_boxes * price(book, SIDING_NAILS));

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(VINYL_SQUARE.0, CATEGORY, VINYL_SQUARE.1).with_unit_spec("100 sq ft"),
        MaterialEntry::new(FIBER_CEMENT_PLANK.0, CATEGORY, FIBER_CEMENT_PLANK.1)
            .with_unit_spec("7 sq ft"),
        MaterialEntry::new(LAP_BOARD.0, CATEGORY, LAP_BOARD.1).with_unit_spec("5.33 sq ft"),
        MaterialEntry::new(HOUSE_WRAP.0, CATEGORY, HOUSE_WRAP.1).with_unit_spec("1350 sq ft"),
        MaterialEntry::new(STARTER_STRIP.0, CATEGORY, STARTER_STRIP.1).with_unit_spec("12 ft"),
        MaterialEntry::new(J_CHANNEL.0, CATEGORY, J_CHANNEL.1).with_unit_spec("12 ft"),
        MaterialEntry::new(SIDING_NAILS.0, CATEGORY, SIDING_NAILS.1),
    ]
}
