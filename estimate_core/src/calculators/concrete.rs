//! # Concrete Calculator
//!
//! Estimates ready-mix or bagged concrete for flatwork (slabs, driveways,
//! patios) and poured walls, with delivery handling, additives, and
//! reinforcement.
//!
//! ## Formulas
//!
//! - Flatwork volume: length x width x (depth_in / 12), in cubic feet
//! - Wall volume: length x height x (thickness_in / 12), in cubic feet
//! - Cubic yards = cubic feet / 27
//! - Bag counts use yield constants: 60 lb -> 60 bags/cu yd, 80 lb -> 45 bags/cu yd
//! - Truck delivery enforces a 1 cu yd minimum load; a flat short-load fee is
//!   added only when the poured volume is below that minimum
//! - Additives (color, fiber) are priced per cubic yard of the *delivered*
//!   (minimum-clamped) volume
//! - Rebar grids count bars per axis as ceil(dimension / spacing) + 1; mesh
//!   sheets as ceil(area / sheet coverage)
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculators::concrete::{
//!     calculate, ConcreteGeometry, ConcreteInput, Delivery,
//! };
//! use estimate_core::pricing::PriceBook;
//!
//! let input = ConcreteInput {
//!     label: "Patio Slab".to_string(),
//!     geometry: ConcreteGeometry::Flatwork {
//!         length_ft: Some(10.0),
//!         width_ft: Some(10.0),
//!         depth_in: Some(4.0),
//!     },
//!     delivery: Delivery::Truck,
//!     ..ConcreteInput::default()
//! };
//!
//! let items = calculate(&input, &PriceBook::defaults()).unwrap();
//! assert!(items.iter().any(|i| i.is_warning)); // under 3 cu yd
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};
use crate::units::{CubicFeet, CubicYards};

/// Catalog category for this trade
pub const CATEGORY: &str = "concrete";

// Default unit prices (dollars)
const READY_MIX: (&str, f64) = ("Ready-Mix Concrete", 185.0); // per cu yd
const SHORT_LOAD_FEE: (&str, f64) = ("Short Load Fee", 125.0); // flat
const BAG_60: (&str, f64) = ("Concrete Bag 60lb", 4.48);
const BAG_80: (&str, f64) = ("Concrete Bag 80lb", 5.89);
const COLOR_ADDITIVE: (&str, f64) = ("Concrete Color Additive", 38.0); // per cu yd
const FIBER_ADDITIVE: (&str, f64) = ("Fiber Mesh Additive", 17.5); // per cu yd
const REBAR_STICK: (&str, f64) = ("Rebar #4 (20 ft)", 10.98);
const MESH_SHEET: (&str, f64) = ("Remesh Sheet", 11.97);

/// Default remesh sheet coverage (5 ft x 10 ft), overridable via unit spec
const MESH_SHEET_COVERAGE_SF: f64 = 50.0;
/// Rebar stock length in feet
const REBAR_STICK_FT: f64 = 20.0;
/// Minimum truck load in cubic yards
const MIN_TRUCK_LOAD_YD3: f64 = 1.0;
/// Below this volume, suppliers typically charge small-load fees
const SMALL_LOAD_WARNING_YD3: f64 = 3.0;
/// Bag yields per cubic yard
const BAGS_PER_YD3_60LB: f64 = 60.0;
const BAGS_PER_YD3_80LB: f64 = 45.0;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Pour geometry. The two branches require different field sets, so each
/// variant carries exactly the dimensions its volume formula needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "concrete_type", rename_all = "snake_case")]
pub enum ConcreteGeometry {
    /// Horizontal pour: slab, driveway, patio
    Flatwork {
        length_ft: Option<f64>,
        width_ft: Option<f64>,
        depth_in: Option<f64>,
    },
    /// Vertical pour between forms
    Wall {
        length_ft: Option<f64>,
        height_ft: Option<f64>,
        thickness_in: Option<f64>,
    },
}

impl Default for ConcreteGeometry {
    fn default() -> Self {
        ConcreteGeometry::Flatwork {
            length_ft: None,
            width_ft: None,
            depth_in: None,
        }
    }
}

impl ConcreteGeometry {
    /// Validate the branch-specific required fields and return
    /// (volume, plan dimensions for reinforcement layout).
    fn resolve(&self) -> EstimateResult<(CubicYards, f64, f64)> {
        match self {
            ConcreteGeometry::Flatwork {
                length_ft,
                width_ft,
                depth_in,
            } => {
                let l = require_positive("length_ft", *length_ft)?;
                let w = require_positive("width_ft", *width_ft)?;
                let d = require_positive("depth_in", *depth_in)?;
                let volume: CubicYards = CubicFeet(l * w * (d / 12.0)).into();
                Ok((volume, l, w))
            }
            ConcreteGeometry::Wall {
                length_ft,
                height_ft,
                thickness_in,
            } => {
                let l = require_positive("length_ft", *length_ft)?;
                let h = require_positive("height_ft", *height_ft)?;
                let t = require_positive("thickness_in", *thickness_in)?;
                let volume: CubicYards = CubicFeet(l * h * (t / 12.0)).into();
                Ok((volume, l, h))
            }
        }
    }
}

/// How the concrete arrives on site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Delivery {
    /// Ready-mix truck, priced per cubic yard with a 1 cu yd minimum load
    #[default]
    Truck,
    /// Bagged mix, hand-poured
    Bags { bag_size: BagSize },
}

/// Bag weight options with their per-cubic-yard yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BagSize {
    #[serde(rename = "60")]
    Sixty,
    #[serde(rename = "80")]
    Eighty,
}

impl BagSize {
    fn bags_per_yd3(&self) -> f64 {
        match self {
            BagSize::Sixty => BAGS_PER_YD3_60LB,
            BagSize::Eighty => BAGS_PER_YD3_80LB,
        }
    }

    fn catalog_key(&self) -> (&'static str, f64) {
        match self {
            BagSize::Sixty => BAG_60,
            BagSize::Eighty => BAG_80,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BagSize::Sixty => "Concrete Bags (60 lb)",
            BagSize::Eighty => "Concrete Bags (80 lb)",
        }
    }
}

/// Optional steel reinforcement for the pour.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reinforcement {
    #[default]
    None,
    /// Grid of #4 bars at the given on-center spacing
    Rebar { spacing_in: f64 },
    /// Welded wire remesh sheets
    Mesh,
}

/// Input parameters for a concrete estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Patio Slab",
///   "geometry": { "concrete_type": "flatwork", "length_ft": 10.0, "width_ft": 10.0, "depth_in": 4.0 },
///   "delivery": { "method": "truck" },
///   "add_color": false,
///   "add_fiber": false,
///   "reinforcement": { "kind": "rebar", "spacing_in": 18.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcreteInput {
    /// User label for this estimate (e.g., "Back Patio")
    pub label: String,

    pub geometry: ConcreteGeometry,

    pub delivery: Delivery,

    /// Integral color additive, priced per delivered cubic yard
    pub add_color: bool,

    /// Fiber reinforcement additive, priced per delivered cubic yard
    pub add_fiber: bool,

    pub reinforcement: Reinforcement,
}

impl ConcreteInput {
    /// Check the validity gate without computing anything.
    pub fn validate(&self) -> EstimateResult<()> {
        self.geometry.resolve().map(|_| ())
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

/// Compute the concrete bill of materials.
///
/// Line order: concrete (with delivery handling), additives, reinforcement,
/// total. Small truck pours emit a non-costed warning about short-load fees.
pub fn calculate(input: &ConcreteInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    let (volume, dim_a, dim_b) = input.geometry.resolve()?;
    let volume_yd3 = volume.0;
    let area_sf = dim_a * dim_b;

    let mut items = ItemList::new();

    // Delivered volume: trucks clamp to the minimum load, bags pour exactly
    // what the geometry needs
    let delivered_yd3 = match input.delivery {
        Delivery::Truck => volume_yd3.max(MIN_TRUCK_LOAD_YD3),
        Delivery::Bags { .. } => volume_yd3,
    };

    match input.delivery {
        Delivery::Truck => {
            let per_yd3 = price(book, READY_MIX);
            items.push_priced(READY_MIX.0, volume_yd3, "cu yd", delivered_yd3 * per_yd3);
            if volume_yd3 < MIN_TRUCK_LOAD_YD3 {
                items.push_priced(SHORT_LOAD_FEE.0, 1.0, "ea", price(book, SHORT_LOAD_FEE));
            }
            if volume_yd3 < SMALL_LOAD_WARNING_YD3 {
                items.push_warning(
                    "Loads under 3 cu yd often incur supplier small-load fees - confirm with your plant",
                );
            }
        }
        Delivery::Bags { bag_size } => {
            let bags = (volume_yd3 * bag_size.bags_per_yd3()).ceil();
            let per_bag = price(book, bag_size.catalog_key());
            items.push_priced(bag_size.label(), bags, "bags", bags * per_bag);
        }
    }

    if input.add_color {
        let per_yd3 = price(book, COLOR_ADDITIVE);
        items.push_priced(COLOR_ADDITIVE.0, delivered_yd3, "cu yd", delivered_yd3 * per_yd3);
    }
    if input.add_fiber {
        let per_yd3 = price(book, FIBER_ADDITIVE);
        items.push_priced(FIBER_ADDITIVE.0, delivered_yd3, "cu yd", delivered_yd3 * per_yd3);
    }

    match input.reinforcement {
        Reinforcement::None => {}
        Reinforcement::Rebar { spacing_in } => {
            if !(spacing_in.is_finite() && spacing_in > 0.0) {
                return Err(EstimateError::invalid_input(
                    "spacing_in",
                    spacing_in.to_string(),
                    "Rebar spacing must be a positive number",
                ));
            }
            let spacing_ft = spacing_in / 12.0;
            // Bars in each axis span the perpendicular dimension
            let bars_a = (dim_a / spacing_ft).ceil() + 1.0;
            let bars_b = (dim_b / spacing_ft).ceil() + 1.0;
            let linear_ft = bars_a * dim_b + bars_b * dim_a;
            let sticks = (linear_ft / REBAR_STICK_FT).ceil();
            items.push_priced(REBAR_STICK.0, sticks, "pcs", sticks * price(book, REBAR_STICK));
        }
        Reinforcement::Mesh => {
            let coverage =
                book.resolve_unit_value(MESH_SHEET.0, MESH_SHEET_COVERAGE_SF, Some(CATEGORY));
            let sheets = (area_sf / coverage).ceil();
            items.push_priced(MESH_SHEET.0, sheets, "sheets", sheets * price(book, MESH_SHEET));
        }
    }

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(READY_MIX.0, CATEGORY, READY_MIX.1),
        MaterialEntry::new(SHORT_LOAD_FEE.0, CATEGORY, SHORT_LOAD_FEE.1),
        MaterialEntry::new(BAG_60.0, CATEGORY, BAG_60.1),
        MaterialEntry::new(BAG_80.0, CATEGORY, BAG_80.1),
        MaterialEntry::new(COLOR_ADDITIVE.0, CATEGORY, COLOR_ADDITIVE.1),
        MaterialEntry::new(FIBER_ADDITIVE.0, CATEGORY, FIBER_ADDITIVE.1),
        MaterialEntry::new(REBAR_STICK.0, CATEGORY, REBAR_STICK.1).with_unit_spec("20 ft"),
        MaterialEntry::new(MESH_SHEET.0, CATEGORY, MESH_SHEET.1).with_unit_spec("50 sq ft"),
    ]
}
