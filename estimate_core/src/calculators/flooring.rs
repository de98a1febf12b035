//! # Flooring Calculator
//!
//! Box-count takeoff for hardwood, laminate, vinyl plank, and carpet.
//!
//! Area with waste = raw area x (1 + waste%) x pattern multiplier. Boxed
//! goods round up by per-box coverage (overridable via catalog unit specs);
//! carpet and pad are figured by the square yard.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};

/// Catalog category for this trade
pub const CATEGORY: &str = "flooring";

const HARDWOOD: (&str, f64) = ("Hardwood Flooring", 64.98); // per box
const LAMINATE: (&str, f64) = ("Laminate Flooring", 44.98); // per box
const VINYL_PLANK: (&str, f64) = ("Vinyl Plank Flooring", 54.98); // per box
const CARPET: (&str, f64) = ("Carpet", 28.98); // per sq yd
const CARPET_PAD: (&str, f64) = ("Carpet Pad", 4.48); // per sq yd
const UNDERLAYMENT: (&str, f64) = ("Underlayment Roll", 49.98);
const TRANSITION_STRIP: (&str, f64) = ("Transition Strip", 24.98);
const BASEBOARD: (&str, f64) = ("Baseboard (12 ft)", 12.98);

// Default coverage per box, square feet
const HARDWOOD_COVERAGE_SF: f64 = 20.0;
const LAMINATE_COVERAGE_SF: f64 = 24.0;
const VINYL_COVERAGE_SF: f64 = 28.0;
const UNDERLAYMENT_ROLL_SF: f64 = 100.0;
const BASEBOARD_STICK_FT: f64 = 12.0;
const SF_PER_SY: f64 = 9.0;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Flooring product families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlooringKind {
    Hardwood,
    #[default]
    Laminate,
    VinylPlank,
    Carpet,
}

impl FlooringKind {
    fn catalog_key(&self) -> (&'static str, f64) {
        match self {
            FlooringKind::Hardwood => HARDWOOD,
            FlooringKind::Laminate => LAMINATE,
            FlooringKind::VinylPlank => VINYL_PLANK,
            FlooringKind::Carpet => CARPET,
        }
    }

    fn default_coverage_sf(&self) -> f64 {
        match self {
            FlooringKind::Hardwood => HARDWOOD_COVERAGE_SF,
            FlooringKind::Laminate => LAMINATE_COVERAGE_SF,
            FlooringKind::VinylPlank => VINYL_COVERAGE_SF,
            FlooringKind::Carpet => SF_PER_SY,
        }
    }
}

/// Lay pattern; angled installs cut more waste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayPattern {
    #[default]
    Straight,
    Diagonal,
    Herringbone,
}

impl LayPattern {
    pub fn multiplier(&self) -> f64 {
        match self {
            LayPattern::Straight => 1.0,
            LayPattern::Diagonal => 1.10,
            LayPattern::Herringbone => 1.18,
        }
    }
}

/// Input parameters for a flooring estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlooringInput {
    pub label: String,
    pub kind: FlooringKind,
    pub pattern: LayPattern,
    pub length_ft: Option<f64>,
    pub width_ft: Option<f64>,
    /// Cut-waste percentage on top of the pattern multiplier
    pub waste_pct: f64,
    pub include_underlayment: bool,
    /// Doorway transition strips
    pub transition_count: u32,
    /// Baseboard run to replace, if any
    pub baseboard_lf: Option<f64>,
}

impl Default for FlooringInput {
    fn default() -> Self {
        FlooringInput {
            label: String::new(),
            kind: FlooringKind::default(),
            pattern: LayPattern::default(),
            length_ft: None,
            width_ft: None,
            waste_pct: 10.0,
            include_underlayment: true,
            transition_count: 0,
            baseboard_lf: None,
        }
    }
}

impl FlooringInput {
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

/// Compute the flooring bill of materials.
pub fn calculate(input: &FlooringInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    input.validate()?;
    let length = input.length_ft.unwrap_or(0.0);
    let width = input.width_ft.unwrap_or(0.0);

    let area = length * width;
    let area_with_waste = area * (1.0 + input.waste_pct / 100.0) * input.pattern.multiplier();

    let mut items = ItemList::new();

    let product = input.kind.catalog_key();
    match input.kind {
        FlooringKind::Carpet => {
            let sq_yd = (area_with_waste / SF_PER_SY).ceil();
            items.push_priced(product.0, sq_yd, "sq yd", sq_yd * price(book, product));
            if input.include_underlayment {
                let pad_yd = (area / SF_PER_SY).ceil();
                items.push_priced(CARPET_PAD.0, pad_yd, "sq yd", pad_yd * price(book, CARPET_PAD));
            }
        }
        _ => {
            let coverage =
                book.resolve_unit_value(product.0, input.kind.default_coverage_sf(), Some(CATEGORY));
            let boxes = (area_with_waste / coverage).ceil();
            items.push_priced(product.0, boxes, "boxes", boxes * price(book, product));
            if input.include_underlayment {
                let rolls = (area / UNDERLAYMENT_ROLL_SF).ceil();
                items.push_priced(
                    UNDERLAYMENT.0,
                    rolls,
                    "rolls",
                    rolls * price(book, UNDERLAYMENT),
                );
            }
        }
    }

    if input.transition_count > 0 {
        let count = f64::from(input.transition_count);
        items.push_priced(
            TRANSITION_STRIP.0,
            count,
            "pcs",
            count * price(book, TRANSITION_STRIP),
        );
    }

    if let Some(lf) = input.baseboard_lf {
        if lf > 0.0 {
            let sticks = (lf / BASEBOARD_STICK_FT).ceil();
            items.push_priced(BASEBOARD.0, sticks, "pcs", sticks * price(book, BASEBOARD));
        }
    }

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(HARDWOOD.0, CATEGORY, HARDWOOD.1).with_unit_spec("20 sq ft"),
        MaterialEntry::new(LAMINATE.0, CATEGORY, LAMINATE.1).with_unit_spec("24 sq ft"),
        MaterialEntry::new(VINYL_PLANK.0, CATEGORY, VINYL_PLANK.1).with_unit_spec("28 sq ft"),
        MaterialEntry::new(CARPET.0, CATEGORY, CARPET.1),
        MaterialEntry::new(CARPET_PAD.0, CATEGORY, CARPET_PAD.1),
        MaterialEntry::new(UNDERLAYMENT.0, CATEGORY, UNDERLAYMENT.1).with_unit_spec("100 sq ft"),
        MaterialEntry::new(TRANSITION_STRIP.0, CATEGORY, TRANSITION_STRIP.1),
        MaterialEntry::new(BASEBOARD.0, CATEGORY, BASEBOARD.1).with_unit_spec("12 ft"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::verify_total_invariant;

    fn bedroom() -> FlooringInput {
        FlooringInput {
            label: "Bedroom".to_string(),
            kind: FlooringKind::Laminate,
            length_ft: Some(12.0),
            width_ft: Some(10.0),
            ..FlooringInput::default()
        }
    }

    #[test]
    fn test_laminate_boxes() {
        let items = calculate(&bedroom(), &PriceBook::defaults()).unwrap();
        // 120 sq ft x 1.10 waste = 132 -> ceil(132/24) = 6 boxes
        let boxes = items.iter().find(|i| i.label == LAMINATE.0).unwrap();
        assert_eq!(boxes.value, 6.0);

        let underlayment = items.iter().find(|i| i.label == UNDERLAYMENT.0).unwrap();
        assert_eq!(underlayment.value, 2.0); // ceil(120/100)
    }

    #[test]
    fn test_herringbone_multiplier() {
        let mut input = bedroom();
        input.pattern = LayPattern::Herringbone;
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        // 120 x 1.10 x 1.18 = 155.76 -> 7 boxes
        let boxes = items.iter().find(|i| i.label == LAMINATE.0).unwrap();
        assert_eq!(boxes.value, 7.0);
    }

    #[test]
    fn test_carpet_by_square_yard() {
        let mut input = bedroom();
        input.kind = FlooringKind::Carpet;
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        // 132 sq ft / 9 = 14.67 -> 15 sq yd
        let carpet = items.iter().find(|i| i.label == CARPET.0).unwrap();
        assert_eq!(carpet.value, 15.0);
        assert_eq!(carpet.unit, "sq yd");
        // Pad covers the raw area: ceil(120/9) = 14
        let pad = items.iter().find(|i| i.label == CARPET_PAD.0).unwrap();
        assert_eq!(pad.value, 14.0);
    }

    #[test]
    fn test_coverage_override() {
        let overrides = vec![MaterialEntry::new(LAMINATE.0, CATEGORY, 39.98)
            .with_unit_spec("33 sq ft")];
        let items = calculate(&bedroom(), &PriceBook::custom(overrides)).unwrap();
        // ceil(132/33) = 4 boxes at the override price
        let boxes = items.iter().find(|i| i.label == LAMINATE.0).unwrap();
        assert_eq!(boxes.value, 4.0);
        assert!((boxes.cost.unwrap() - 4.0 * 39.98).abs() < 1e-9);
    }

    #[test]
    fn test_trim_items() {
        let mut input = bedroom();
        input.transition_count = 2;
        input.baseboard_lf = Some(44.0);
        let items = calculate(&input, &PriceBook::defaults()).unwrap();

        let transitions = items.iter().find(|i| i.label == TRANSITION_STRIP.0).unwrap();
        assert_eq!(transitions.value, 2.0);
        let baseboard = items.iter().find(|i| i.label == BASEBOARD.0).unwrap();
        assert_eq!(baseboard.value, 4.0); // ceil(44/12)
    }

    #[test]
    fn test_validity_gate() {
        let mut input = bedroom();
        input.width_ft = None;
        let err = calculate(&input, &PriceBook::defaults()).unwrap_err();
        assert_eq!(err, EstimateError::missing_field("width_ft"));

        input = bedroom();
        input.waste_pct = 150.0;
        assert!(calculate(&input, &PriceBook::defaults()).is_err());
    }

    #[test]
    fn test_monotonic_in_area() {
        let mut bigger = bedroom();
        bigger.length_ft = Some(18.0);
        let small = calculate(&bedroom(), &PriceBook::defaults()).unwrap();
        let large = calculate(&bigger, &PriceBook::defaults()).unwrap();
        assert!(large[0].value >= small[0].value);
    }

    #[test]
    fn test_total_invariant() {
        let items = calculate(&bedroom(), &PriceBook::defaults()).unwrap();
        assert!(verify_total_invariant(&items));
    }
}
