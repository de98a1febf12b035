//! # Foundation Calculator
//!
//! Full-foundation takeoff: one shared footprint (length x width) feeds ten
//! independent material groups, each of which accumulates into a single
//! running total. Group order follows the build sequence - excavation support
//! first, concrete next, then steel and envelope items - but each group is
//! computed independently from the shared perimeter/area.
//!
//! Groups: footing concrete, wall concrete (poured or ICF core), backfill
//! (skipped for basements), gravel base, slab concrete, footing/wall/slab
//! steel (independently sized), vapor barrier, damp-proofing, perimeter
//! drainage, and ICF blocks when selected.
//!
//! All concrete groups share one strength-indexed price table.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};
use crate::units::{CubicFeet, CubicYards};

/// Catalog category for this trade
pub const CATEGORY: &str = "foundation";

// Strength-indexed ready-mix table (per cu yd)
const CONCRETE_2500: (&str, f64) = ("Concrete 2500 psi", 172.0);
const CONCRETE_3000: (&str, f64) = ("Concrete 3000 psi", 185.0);
const CONCRETE_3500: (&str, f64) = ("Concrete 3500 psi", 197.0);
const CONCRETE_4000: (&str, f64) = ("Concrete 4000 psi", 212.0);

const BACKFILL: (&str, f64) = ("Backfill Fill", 28.0); // per cu yd
const GRAVEL_BASE: (&str, f64) = ("Gravel Base", 45.0); // per ton
const REBAR_STICK: (&str, f64) = ("Rebar #4 (20 ft)", 10.98);
const VAPOR_BARRIER: (&str, f64) = ("Vapor Barrier Roll", 64.98);
const DAMP_PROOFING: (&str, f64) = ("Foundation Damp-proofing", 42.98); // per gal
const DRAIN_PIPE: (&str, f64) = ("Perforated Drain Pipe (100 ft)", 88.0);
const ICF_BLOCK: (&str, f64) = ("ICF Block", 24.50);

const REBAR_STICK_FT: f64 = 20.0;
/// Vertical wall bars at 24 in o.c., horizontal rows at 16 in o.c.
const WALL_VERTICAL_SPACING_FT: f64 = 2.0;
const WALL_HORIZONTAL_SPACING_IN: f64 = 16.0;
/// Slab grid at 18 in o.c. both ways
const SLAB_GRID_SPACING_FT: f64 = 1.5;
/// Assumed trench width for perimeter backfill
const BACKFILL_TRENCH_FT: f64 = 2.0;
/// Gravel conversion, tons per cubic yard
const GRAVEL_TONS_PER_YD3: f64 = 1.4;
/// Vapor barrier laps 10%; default roll covers 1000 sq ft
const VAPOR_WASTE_FACTOR: f64 = 1.1;
const VAPOR_ROLL_COVERAGE_SF: f64 = 1000.0;
/// Damp-proofing coverage per gallon
const DAMP_PROOF_COVERAGE_SF: f64 = 100.0;
const DRAIN_PIPE_ROLL_FT: f64 = 100.0;
/// Standard ICF form: 16 in x 48 in face
const ICF_BLOCK_COVERAGE_SF: f64 = 5.33;
/// ICF core pour thickness
const ICF_CORE_THICKNESS_IN: f64 = 6.0;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Foundation configuration: full-height basement or stem wall on footings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoundationType {
    /// Stem wall / crawlspace; perimeter is backfilled after the pour
    #[default]
    StemWall,
    /// Full basement; excavation spoils are hauled off, no backfill group
    Basement,
}

/// Wall construction system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallSystem {
    /// Conventional formed-and-poured wall at the input thickness
    #[default]
    PouredConcrete,
    /// Insulated concrete forms; blocks plus a 6 in core pour
    Icf,
}

/// Ready-mix strength classes. One price table serves every concrete group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcreteStrength {
    #[serde(rename = "2500")]
    Psi2500,
    #[default]
    #[serde(rename = "3000")]
    Psi3000,
    #[serde(rename = "3500")]
    Psi3500,
    #[serde(rename = "4000")]
    Psi4000,
}

impl ConcreteStrength {
    fn catalog_key(&self) -> (&'static str, f64) {
        match self {
            ConcreteStrength::Psi2500 => CONCRETE_2500,
            ConcreteStrength::Psi3000 => CONCRETE_3000,
            ConcreteStrength::Psi3500 => CONCRETE_3500,
            ConcreteStrength::Psi4000 => CONCRETE_4000,
        }
    }
}

/// Input parameters for a foundation estimate.
///
/// All eight numeric fields must be set before calculation proceeds.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Main House",
///   "foundation_type": "stem_wall",
///   "wall_system": "poured_concrete",
///   "strength": "3000",
///   "length_ft": 40.0,
///   "width_ft": 30.0,
///   "footing_width_in": 16.0,
///   "footing_depth_in": 8.0,
///   "wall_height_ft": 8.0,
///   "wall_thickness_in": 8.0,
///   "slab_thickness_in": 4.0,
///   "gravel_depth_in": 4.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundationInput {
    pub label: String,
    pub foundation_type: FoundationType,
    pub wall_system: WallSystem,
    pub strength: ConcreteStrength,

    pub length_ft: Option<f64>,
    pub width_ft: Option<f64>,
    pub footing_width_in: Option<f64>,
    pub footing_depth_in: Option<f64>,
    pub wall_height_ft: Option<f64>,
    pub wall_thickness_in: Option<f64>,
    pub slab_thickness_in: Option<f64>,
    pub gravel_depth_in: Option<f64>,
}

/// The eight resolved dimensions, in declaration order.
struct Dimensions {
    length: f64,
    width: f64,
    footing_width_in: f64,
    footing_depth_in: f64,
    wall_height: f64,
    wall_thickness_in: f64,
    slab_thickness_in: f64,
    gravel_depth_in: f64,
}

impl Dimensions {
    fn perimeter(&self) -> f64 {
        2.0 * (self.length + self.width)
    }

    fn area(&self) -> f64 {
        self.length * self.width
    }
}

impl FoundationInput {
    /// Check the validity gate: all eight numeric fields set and positive.
    pub fn validate(&self) -> EstimateResult<()> {
        self.dimensions().map(|_| ())
    }

    fn dimensions(&self) -> EstimateResult<Dimensions> {
        Ok(Dimensions {
            length: require_positive("length_ft", self.length_ft)?,
            width: require_positive("width_ft", self.width_ft)?,
            footing_width_in: require_positive("footing_width_in", self.footing_width_in)?,
            footing_depth_in: require_positive("footing_depth_in", self.footing_depth_in)?,
            wall_height: require_positive("wall_height_ft", self.wall_height_ft)?,
            wall_thickness_in: require_positive("wall_thickness_in", self.wall_thickness_in)?,
            slab_thickness_in: require_positive("slab_thickness_in", self.slab_thickness_in)?,
            gravel_depth_in: require_positive("gravel_depth_in", self.gravel_depth_in)?,
        })
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

fn yd3(cubic_feet: f64) -> f64 {
    CubicYards::from(CubicFeet(cubic_feet)).0
}

fn sticks_for(linear_ft: f64) -> f64 {
    (linear_ft / REBAR_STICK_FT).ceil()
}

/// Compute the foundation bill of materials.
pub fn calculate(input: &FoundationInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    let dims = input.dimensions()?;
    let perimeter = dims.perimeter();
    let area = dims.area();
    let wall_area = perimeter * dims.wall_height;
    let concrete = input.strength.catalog_key();
    let concrete_price = price(book, concrete);

    let mut items = ItemList::new();

    // Footing concrete
    let footing_yd3 = yd3(perimeter * (dims.footing_width_in / 12.0) * (dims.footing_depth_in / 12.0));
    items.push_priced(
        format!("Footing - {}", concrete.0),
        footing_yd3,
        "cu yd",
        footing_yd3 * concrete_price,
    );

    // Wall concrete: full thickness for poured walls, fixed core for ICF
    let wall_thickness_in = match input.wall_system {
        WallSystem::PouredConcrete => dims.wall_thickness_in,
        WallSystem::Icf => ICF_CORE_THICKNESS_IN,
    };
    let wall_yd3 = yd3(perimeter * dims.wall_height * (wall_thickness_in / 12.0));
    let wall_label = match input.wall_system {
        WallSystem::PouredConcrete => format!("Wall - {}", concrete.0),
        WallSystem::Icf => format!("ICF Core - {}", concrete.0),
    };
    items.push_priced(wall_label, wall_yd3, "cu yd", wall_yd3 * concrete_price);

    if input.wall_system == WallSystem::Icf {
        let coverage = book.resolve_unit_value(ICF_BLOCK.0, ICF_BLOCK_COVERAGE_SF, Some(CATEGORY));
        let blocks = (wall_area / coverage).ceil();
        items.push_priced(ICF_BLOCK.0, blocks, "ea", blocks * price(book, ICF_BLOCK));
    }

    // Backfill: basements haul spoils off instead
    if input.foundation_type != FoundationType::Basement {
        let backfill_yd3 = yd3(perimeter * dims.wall_height * BACKFILL_TRENCH_FT);
        items.push_priced(
            BACKFILL.0,
            backfill_yd3,
            "cu yd",
            backfill_yd3 * price(book, BACKFILL),
        );
    }

    // Gravel base under the slab, ordered by the ton
    let gravel_tons = (yd3(area * (dims.gravel_depth_in / 12.0)) * GRAVEL_TONS_PER_YD3).ceil();
    items.push_priced(GRAVEL_BASE.0, gravel_tons, "tons", gravel_tons * price(book, GRAVEL_BASE));

    // Slab concrete
    let slab_yd3 = yd3(area * (dims.slab_thickness_in / 12.0));
    items.push_priced(
        format!("Slab - {}", concrete.0),
        slab_yd3,
        "cu yd",
        slab_yd3 * concrete_price,
    );

    // Steel: footing, wall, and slab sized independently
    let rebar_price = price(book, REBAR_STICK);

    // Two continuous runs around the footing
    let footing_sticks = sticks_for(perimeter * 2.0);
    items.push_priced(
        "Footing Rebar #4 (20 ft)",
        footing_sticks,
        "pcs",
        footing_sticks * rebar_price,
    );

    // Verticals at 24 in o.c. plus horizontal rows at 16 in o.c.
    let vertical_lf = (perimeter / WALL_VERTICAL_SPACING_FT).ceil() * dims.wall_height;
    let horizontal_lf =
        (dims.wall_height * 12.0 / WALL_HORIZONTAL_SPACING_IN).ceil() * perimeter;
    let wall_sticks = sticks_for(vertical_lf + horizontal_lf);
    items.push_priced(
        "Wall Rebar #4 (20 ft)",
        wall_sticks,
        "pcs",
        wall_sticks * rebar_price,
    );

    // Slab grid at 18 in o.c. both ways
    let bars_long = (dims.length / SLAB_GRID_SPACING_FT).ceil() + 1.0;
    let bars_wide = (dims.width / SLAB_GRID_SPACING_FT).ceil() + 1.0;
    let slab_sticks = sticks_for(bars_long * dims.width + bars_wide * dims.length);
    items.push_priced(
        "Slab Rebar #4 (20 ft)",
        slab_sticks,
        "pcs",
        slab_sticks * rebar_price,
    );

    // Envelope items
    let vapor_coverage =
        book.resolve_unit_value(VAPOR_BARRIER.0, VAPOR_ROLL_COVERAGE_SF, Some(CATEGORY));
    let vapor_rolls = (area * VAPOR_WASTE_FACTOR / vapor_coverage).ceil();
    items.push_priced(
        VAPOR_BARRIER.0,
        vapor_rolls,
        "rolls",
        vapor_rolls * price(book, VAPOR_BARRIER),
    );

    let damp_coverage =
        book.resolve_unit_value(DAMP_PROOFING.0, DAMP_PROOF_COVERAGE_SF, Some(CATEGORY));
    let damp_gallons = (wall_area / damp_coverage).ceil();
    items.push_priced(
        DAMP_PROOFING.0,
        damp_gallons,
        "gal",
        damp_gallons * price(book, DAMP_PROOFING),
    );

    let drain_rolls = (perimeter / DRAIN_PIPE_ROLL_FT).ceil();
    items.push_priced(DRAIN_PIPE.0, drain_rolls, "rolls", drain_rolls * price(book, DRAIN_PIPE));

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(CONCRETE_2500.0, CATEGORY, CONCRETE_2500.1),
        MaterialEntry::new(CONCRETE_3000.0, CATEGORY, CONCRETE_3000.1),
        MaterialEntry::new(CONCRETE_3500.0, CATEGORY, CONCRETE_3500.1),
        MaterialEntry::new(CONCRETE_4000.0, CATEGORY, CONCRETE_4000.1),
        MaterialEntry::new(BACKFILL.0, CATEGORY, BACKFILL.1),
        MaterialEntry::new(GRAVEL_BASE.0, CATEGORY, GRAVEL_BASE.1),
        MaterialEntry::new(REBAR_STICK.0, CATEGORY, REBAR_STICK.1).with_unit_spec("20 ft"),
        MaterialEntry::new(VAPOR_BARRIER.0, CATEGORY, VAPOR_BARRIER.1).with_unit_spec("1000 sq ft"),
        MaterialEntry::new(DAMP_PROOFING.0, CATEGORY, DAMP_PROOFING.1).with_unit_spec("100 sq ft"),
        MaterialEntry::new(DRAIN_PIPE.0, CATEGORY, DRAIN_PIPE.1).with_unit_spec("100 ft"),
        MaterialEntry::new(ICF_BLOCK.0, CATEGORY, ICF_BLOCK.1).with_unit_spec("5.33 sq ft"),
    ]
}
