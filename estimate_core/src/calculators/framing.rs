//! # Framing Openings Calculator
//!
//! Lumber takeoff for framed wall openings (doors and windows). Each opening
//! gets its full rough-framing package; quantities aggregate across the
//! opening list into per-material lines.
//!
//! Per opening: 2 king studs, 2 trimmers, a doubled header cut from
//! even-foot stock sized at rough width + 6 in, and cripples at 16 in o.c.
//! Windows add a sill board and a matching row of sill cripples.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};

/// Catalog category for this trade
pub const CATEGORY: &str = "framing";

const STUD_2X4: (&str, f64) = ("Stud 2x4x8", 3.98);
const STUD_2X6: (&str, f64) = ("Stud 2x6x8", 5.98);
const HEADER_LUMBER: (&str, f64) = ("Header Lumber 2x8", 1.85); // per lin ft
const FRAMING_NAILS: (&str, f64) = ("Framing Nails", 4.98); // per lb

/// Cripple spacing, inches on center
const CRIPPLE_SPACING_IN: f64 = 16.0;
/// Header bearing allowance beyond rough width
const HEADER_BEARING_IN: f64 = 6.0;
/// Header stock comes in even-foot lengths
const HEADER_STOCK_INCREMENT_IN: f64 = 24.0;
/// Nail allowance per opening
const NAILS_LB_PER_OPENING: f64 = 1.0;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Wall stud dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StudSize {
    #[default]
    #[serde(rename = "2x4")]
    TwoByFour,
    #[serde(rename = "2x6")]
    TwoBySix,
}

impl StudSize {
    fn catalog_key(&self) -> (&'static str, f64) {
        match self {
            StudSize::TwoByFour => STUD_2X4,
            StudSize::TwoBySix => STUD_2X6,
        }
    }
}

/// Opening kind. Windows add a sill package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningKind {
    #[default]
    Door,
    Window,
}

/// One rough opening. The id is an opaque UI reconciliation handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opening {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub kind: OpeningKind,
    pub width_in: Option<f64>,
    pub height_in: Option<f64>,
}

impl Default for Opening {
    fn default() -> Self {
        Opening {
            id: Uuid::new_v4(),
            kind: OpeningKind::Door,
            width_in: None,
            height_in: None,
        }
    }
}

impl Opening {
    /// Header stock length in feet: rough width + bearing, rounded up to the
    /// next even-foot increment.
    fn header_stock_ft(&self, width_in: f64) -> f64 {
        ((width_in + HEADER_BEARING_IN) / HEADER_STOCK_INCREMENT_IN).ceil()
            * (HEADER_STOCK_INCREMENT_IN / 12.0)
    }

    fn cripples(&self, width_in: f64) -> f64 {
        (width_in / CRIPPLE_SPACING_IN).ceil()
    }
}

/// Input parameters for a framed-openings estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "First Floor",
///   "stud_size": "2x4",
///   "openings": [
///     { "kind": "door", "width_in": 36.0, "height_in": 80.0 },
///     { "kind": "window", "width_in": 36.0, "height_in": 24.0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingInput {
    pub label: String,
    pub stud_size: StudSize,
    pub openings: Vec<Opening>,
}

impl FramingInput {
    /// At least one opening, each with positive width and height.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.openings.is_empty() {
            return Err(EstimateError::missing_field("openings"));
        }
        for opening in &self.openings {
            require_positive("width_in", opening.width_in)?;
            require_positive("height_in", opening.height_in)?;
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

/// Compute the framing bill of materials.
pub fn calculate(input: &FramingInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    input.validate()?;

    let mut studs = 0.0;
    let mut header_lf = 0.0;

    for opening in &input.openings {
        let width_in = opening.width_in.unwrap_or(0.0);
        let stock_ft = opening.header_stock_ft(width_in);

        // Kings + trimmers + cripples above the header
        studs += 2.0 + 2.0 + opening.cripples(width_in);
        // Doubled header
        header_lf += 2.0 * stock_ft;

        if opening.kind == OpeningKind::Window {
            // Sill board plus its cripple row
            header_lf += stock_ft;
            studs += opening.cripples(width_in);
        }
    }

    let nails_lb = (input.openings.len() as f64 * NAILS_LB_PER_OPENING).ceil();

    let mut items = ItemList::new();

    let stud = input.stud_size.catalog_key();
    items.push_priced(stud.0, studs, "pcs", studs * price(book, stud));
    items.push_priced(
        HEADER_LUMBER.0,
        header_lf,
        "lin ft",
        header_lf * price(book, HEADER_LUMBER),
    );
    items.push_priced(FRAMING_NAILS.0, nails_lb, "lb", nails_lb * price(book, FRAMING_NAILS));

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(STUD_2X4.0, CATEGORY, STUD_2X4.1),
        MaterialEntry::new(STUD_2X6.0, CATEGORY, STUD_2X6.1),
        MaterialEntry::new(HEADER_LUMBER.0, CATEGORY, HEADER_LUMBER.1),
        MaterialEntry::new(FRAMING_NAILS.0, CATEGORY, FRAMING_NAILS.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::verify_total_invariant;

    fn door(width_in: f64, height_in: f64) -> Opening {
        Opening {
            kind: OpeningKind::Door,
            width_in: Some(width_in),
            height_in: Some(height_in),
            ..Opening::default()
        }
    }

    fn window(width_in: f64, height_in: f64) -> Opening {
        Opening {
            kind: OpeningKind::Window,
            width_in: Some(width_in),
            height_in: Some(height_in),
            ..Opening::default()
        }
    }

    fn floor_plan() -> FramingInput {
        FramingInput {
            label: "First Floor".to_string(),
            stud_size: StudSize::TwoByFour,
            openings: vec![door(36.0, 80.0), window(36.0, 24.0)],
        }
    }

    #[test]
    fn test_stud_count() {
        let items = calculate(&floor_plan(), &PriceBook::defaults()).unwrap();
        // Door: 2 kings + 2 trimmers + 3 cripples = 7
        // Window: same 7 plus 3 sill cripples = 10
        let studs = items.iter().find(|i| i.label == STUD_2X4.0).unwrap();
        assert_eq!(studs.value, 17.0);
    }

    #[test]
    fn test_header_footage() {
        let items = calculate(&floor_plan(), &PriceBook::defaults()).unwrap();
        // 36 + 6 = 42 in -> 4 ft stock; door 2x4 = 8 lf, window 2x4 + 4 ft sill = 12 lf
        let header = items.iter().find(|i| i.label == HEADER_LUMBER.0).unwrap();
        assert_eq!(header.value, 20.0);
    }

    #[test]
    fn test_wide_opening_header_stock() {
        let input = FramingInput {
            openings: vec![door(72.0, 80.0)],
            ..FramingInput::default()
        };
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        // 72 + 6 = 78 in -> ceil to 96 in = 8 ft stock, doubled = 16 lf
        let header = items.iter().find(|i| i.label == HEADER_LUMBER.0).unwrap();
        assert_eq!(header.value, 16.0);
    }

    #[test]
    fn test_two_by_six_walls() {
        let mut input = floor_plan();
        input.stud_size = StudSize::TwoBySix;
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        assert!(items.iter().any(|i| i.label == STUD_2X6.0));
        assert!(!items.iter().any(|i| i.label == STUD_2X4.0));
    }

    #[test]
    fn test_requires_openings() {
        let input = FramingInput::default();
        let err = calculate(&input, &PriceBook::defaults()).unwrap_err();
        assert_eq!(err, EstimateError::missing_field("openings"));
    }

    #[test]
    fn test_requires_opening_dimensions() {
        let input = FramingInput {
            openings: vec![Opening {
                width_in: Some(36.0),
                height_in: None,
                ..Opening::default()
            }],
            ..FramingInput::default()
        };
        let err = calculate(&input, &PriceBook::defaults()).unwrap_err();
        assert_eq!(err, EstimateError::missing_field("height_in"));
    }

    #[test]
    fn test_total_invariant() {
        let items = calculate(&floor_plan(), &PriceBook::defaults()).unwrap();
        assert!(verify_total_invariant(&items));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let input = floor_plan();
        let json = serde_json::to_string(&input).unwrap();
        let roundtrip: FramingInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
