//! # Paint Calculator
//!
//! Gallons-and-sundries takeoff over a list of wall sections. Paintable area
//! deducts standard opening allowances; gallons multiply by coat count and
//! divide by coverage (overridable via the catalog unit spec).

use serde::{Deserialize, Serialize};

use crate::calculators::WallSection;
use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};

/// Catalog category for this trade
pub const CATEGORY: &str = "paint";

const PAINT: (&str, f64) = ("Interior Paint (gal)", 38.98);
const PRIMER: (&str, f64) = ("Primer (gal)", 26.98);
const TAPE: (&str, f64) = ("Painter's Tape", 8.48);
const SUPPLIES_KIT: (&str, f64) = ("Painter's Kit", 24.98);

const PAINT_COVERAGE_SF: f64 = 350.0;
const PRIMER_COVERAGE_SF: f64 = 300.0;
const TAPE_ROLL_FT: f64 = 60.0;
const DOOR_ALLOWANCE_SF: f64 = 21.0;
const WINDOW_ALLOWANCE_SF: f64 = 15.0;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Input parameters for a paint estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintInput {
    pub label: String,
    pub walls: Vec<WallSection>,
    pub coats: u32,
    pub door_count: u32,
    pub window_count: u32,
    pub include_primer: bool,
    pub include_supplies: bool,
}

impl Default for PaintInput {
    fn default() -> Self {
        PaintInput {
            label: String::new(),
            walls: Vec::new(),
            coats: 2,
            door_count: 0,
            window_count: 0,
            include_primer: false,
            include_supplies: true,
        }
    }
}

impl PaintInput {
    /// At least one wall, each with positive length and height; at least one coat.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.walls.is_empty() {
            return Err(EstimateError::missing_field("walls"));
        }
        for wall in &self.walls {
            require_positive("length_ft", wall.length_ft)?;
            require_positive("height_ft", wall.height_ft)?;
        }
        if self.coats == 0 {
            return Err(EstimateError::invalid_input(
                "coats",
                "0",
                "At least one coat is required",
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

/// Compute the paint bill of materials.
pub fn calculate(input: &PaintInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    input.validate()?;

    let gross: f64 = input
        .walls
        .iter()
        .map(|w| w.length_ft.unwrap_or(0.0) * w.height_ft.unwrap_or(0.0))
        .sum();
    let allowances = f64::from(input.door_count) * DOOR_ALLOWANCE_SF
        + f64::from(input.window_count) * WINDOW_ALLOWANCE_SF;
    let paintable = (gross - allowances).max(0.0);

    let mut items = ItemList::new();

    let coverage = book.resolve_unit_value(PAINT.0, PAINT_COVERAGE_SF, Some(CATEGORY));
    let gallons = (paintable * f64::from(input.coats) / coverage).ceil();
    items.push_priced(PAINT.0, gallons, "gal", gallons * price(book, PAINT));

    if input.include_primer {
        let coverage = book.resolve_unit_value(PRIMER.0, PRIMER_COVERAGE_SF, Some(CATEGORY));
        let gallons = (paintable / coverage).ceil();
        items.push_priced(PRIMER.0, gallons, "gal", gallons * price(book, PRIMER));
    }

    let trim_lf: f64 = input.walls.iter().map(|w| w.length_ft.unwrap_or(0.0)).sum();
    let tape_rolls = (trim_lf / TAPE_ROLL_FT).ceil().max(1.0);
    items.push_priced(TAPE.0, tape_rolls, "rolls", tape_rolls * price(book, TAPE));

    if input.include_supplies {
        items.push_priced(SUPPLIES_KIT.0, 1.0, "ea", price(book, SUPPLIES_KIT));
    }

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(PAINT.0, CATEGORY, PAINT.1).with_unit_spec("350 sq ft"),
        MaterialEntry::new(PRIMER.0, CATEGORY, PRIMER.1).with_unit_spec("300 sq ft"),
        MaterialEntry::new(TAPE.0, CATEGORY, TAPE.1).with_unit_spec("60 ft"),
        MaterialEntry::new(SUPPLIES_KIT.0, CATEGORY, SUPPLIES_KIT.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::verify_total_invariant;

    fn room() -> PaintInput {
        let wall = |l: f64, h: f64| WallSection {
            length_ft: Some(l),
            height_ft: Some(h),
            ..WallSection::default()
        };
        PaintInput {
            label: "Living Room".to_string(),
            walls: vec![wall(12.0, 8.0), wall(12.0, 8.0), wall(10.0, 8.0), wall(10.0, 8.0)],
            door_count: 1,
            window_count: 2,
            ..PaintInput::default()
        }
    }

    #[test]
    fn test_gallons_two_coats() {
        let items = calculate(&room(), &PriceBook::defaults()).unwrap();
        // Gross 352 - 21 - 30 = 301 paintable; x2 coats / 350 = 1.72 -> 2 gal
        let paint = items.iter().find(|i| i.label == PAINT.0).unwrap();
        assert_eq!(paint.value, 2.0);
    }

    #[test]
    fn test_primer_single_coat_coverage() {
        let mut input = room();
        input.include_primer = true;
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        // ceil(301/300) = 2 gal of primer
        let primer = items.iter().find(|i| i.label == PRIMER.0).unwrap();
        assert_eq!(primer.value, 2.0);
    }

    #[test]
    fn test_tape_and_kit() {
        let items = calculate(&room(), &PriceBook::defaults()).unwrap();
        // 44 lf of walls -> 1 roll
        assert_eq!(items.iter().find(|i| i.label == TAPE.0).unwrap().value, 1.0);
        assert!(items.iter().any(|i| i.label == SUPPLIES_KIT.0));
    }

    #[test]
    fn test_coverage_override() {
        let overrides =
            vec![MaterialEntry::new(PAINT.0, CATEGORY, 52.98).with_unit_spec("250 sq ft")];
        let items = calculate(&room(), &PriceBook::custom(overrides)).unwrap();
        // 602 / 250 = 2.41 -> 3 gal at override price
        let paint = items.iter().find(|i| i.label == PAINT.0).unwrap();
        assert_eq!(paint.value, 3.0);
        assert!((paint.cost.unwrap() - 3.0 * 52.98).abs() < 1e-9);
    }

    #[test]
    fn test_validity_gate() {
        assert_eq!(
            calculate(&PaintInput::default(), &PriceBook::defaults()).unwrap_err(),
            EstimateError::missing_field("walls")
        );

        let mut input = room();
        input.coats = 0;
        assert!(calculate(&input, &PriceBook::defaults()).is_err());
    }

    #[test]
    fn test_total_invariant() {
        let items = calculate(&room(), &PriceBook::defaults()).unwrap();
        assert!(verify_total_invariant(&items));
    }
}
