//! # Fencing Calculator
//!
//! Post-and-section takeoff for the common residential fence styles, plus a
//! custom linear-footage mode that bypasses geometry entirely and multiplies
//! footage by a manually quoted price.
//!
//! ## Formulas
//!
//! - Posts = ceil(length / post spacing) + 1 + corner count
//! - Post concrete assumes a 12 in diameter hole: depth x 0.33 cu ft per
//!   post, aggregated into 60 lb bags (0.45 cu ft yield each)
//! - Per-style material quantities round up to whole purchasable units
//! - Gates add a leaf plus a hardware kit each

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};

/// Catalog category for fence materials; posts live in their own category
pub const CATEGORY: &str = "fencing";
pub const POST_CATEGORY: &str = "posts";

const WOOD_POST: (&str, f64) = ("Wood Post", 24.98);
const STEEL_POST: (&str, f64) = ("Steel Post", 21.48);
const CONCRETE_BAG_60: (&str, f64) = ("Concrete Bag 60lb", 4.48);
const FENCE_RAIL: (&str, f64) = ("Fence Rail (8 ft)", 3.98);
const PRIVACY_PICKET: (&str, f64) = ("Privacy Picket", 3.98);
const SPACED_PICKET: (&str, f64) = ("Spaced Picket", 2.48);
const CHAIN_LINK_FABRIC: (&str, f64) = ("Chain-Link Fabric (50 ft)", 89.0);
const TOP_RAIL: (&str, f64) = ("Top Rail (21 ft)", 23.48);
const TENSION_BAR: (&str, f64) = ("Tension Bar", 4.98);
const RANCH_RAIL: (&str, f64) = ("Ranch Rail (16 ft)", 12.98);
const FENCE_PANEL: (&str, f64) = ("Fence Panel (8 ft)", 64.98);
const WALK_GATE: (&str, f64) = ("Walk Gate", 129.0);
const DRIVE_GATE: (&str, f64) = ("Drive Gate", 329.0);
const GATE_HARDWARE: (&str, f64) = ("Gate Hardware Kit", 32.98);

/// Post hole volume per foot of embedment (12 in diameter hole)
const HOLE_CUFT_PER_FT: f64 = 0.33;
/// 60 lb bag yield
const BAG_YIELD_CUFT: f64 = 0.45;
/// Privacy picket face width (5-1/2 in dog-ear, butted)
const PRIVACY_PICKET_WIDTH_IN: f64 = 5.5;
/// Spaced picket pitch: 3-1/2 in board plus 2-1/2 in gap
const SPACED_PICKET_PITCH_IN: f64 = 6.0;
const FABRIC_ROLL_FT: f64 = 50.0;
const TOP_RAIL_STICK_FT: f64 = 21.0;
const RANCH_RAIL_STICK_FT: f64 = 16.0;
const PANEL_WIDTH_FT: f64 = 8.0;

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Fence style, which drives the infill material branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceType {
    #[default]
    Privacy,
    Picket,
    ChainLink,
    Ranch,
    Panel,
}

/// Gate leaf style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    #[default]
    Walk,
    Drive,
}

/// One gate in the run. The id is an opaque UI reconciliation handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gate {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub width_ft: f64,
    pub kind: GateKind,
}

impl Default for Gate {
    fn default() -> Self {
        Gate {
            id: Uuid::new_v4(),
            width_ft: 4.0,
            kind: GateKind::Walk,
        }
    }
}

/// Job description: a measured run or a manually priced custom quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FenceJob {
    /// Computed from geometry and fence style
    Geometry {
        fence_type: FenceType,
        length_ft: Option<f64>,
        #[serde(default = "default_height")]
        height_ft: f64,
        #[serde(default = "default_spacing")]
        post_spacing_ft: f64,
        #[serde(default = "default_post_depth")]
        post_depth_ft: f64,
        #[serde(default)]
        corner_count: u32,
        #[serde(default)]
        gates: Vec<Gate>,
    },
    /// Bypasses all geometry: linear feet x a manual price
    Custom {
        linear_ft: Option<f64>,
        price_per_ft: Option<f64>,
    },
}

fn default_height() -> f64 {
    6.0
}
fn default_spacing() -> f64 {
    8.0
}
fn default_post_depth() -> f64 {
    2.0
}

impl Default for FenceJob {
    fn default() -> Self {
        FenceJob::Geometry {
            fence_type: FenceType::default(),
            length_ft: None,
            height_ft: default_height(),
            post_spacing_ft: default_spacing(),
            post_depth_ft: default_post_depth(),
            corner_count: 0,
            gates: Vec::new(),
        }
    }
}

/// Input parameters for a fencing estimate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FencingInput {
    pub label: String,
    pub job: FenceJob,
}

impl FencingInput {
    pub fn validate(&self) -> EstimateResult<()> {
        match &self.job {
            FenceJob::Geometry { length_ft, .. } => {
                require_positive("length_ft", *length_ft).map(|_| ())
            }
            FenceJob::Custom {
                linear_ft,
                price_per_ft,
            } => {
                require_positive("linear_ft", *linear_ft)?;
                require_positive("price_per_ft", *price_per_ft).map(|_| ())
            }
        }
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

/// Compute the fencing bill of materials.
pub fn calculate(input: &FencingInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    match &input.job {
        FenceJob::Custom {
            linear_ft,
            price_per_ft,
        } => {
            let lf = require_positive("linear_ft", *linear_ft)?;
            let per_ft = require_positive("price_per_ft", *price_per_ft)?;
            let mut items = ItemList::new();
            items.push_priced("Custom Fence", lf, "lin ft", lf * per_ft);
            Ok(items.finish_with_total("Estimated Total"))
        }
        FenceJob::Geometry {
            fence_type,
            length_ft,
            height_ft,
            post_spacing_ft,
            post_depth_ft,
            corner_count,
            gates,
        } => {
            let length = require_positive("length_ft", *length_ft)?;
            if *post_spacing_ft <= 0.0 {
                return Err(EstimateError::invalid_input(
                    "post_spacing_ft",
                    post_spacing_ft.to_string(),
                    "Post spacing must be a positive number",
                ));
            }

            let sections = (length / post_spacing_ft).ceil();
            let posts = sections + 1.0 + f64::from(*corner_count);

            let mut items = ItemList::new();

            // Posts and their concrete
            let post = match fence_type {
                FenceType::ChainLink => STEEL_POST,
                _ => WOOD_POST,
            };
            let post_price = book.resolve_price(post.0, post.1, Some(POST_CATEGORY));
            items.push_priced(post.0, posts, "ea", posts * post_price);

            let hole_cuft = posts * post_depth_ft * HOLE_CUFT_PER_FT;
            let bags = (hole_cuft / BAG_YIELD_CUFT).ceil();
            let bag_price = book.resolve_price(CONCRETE_BAG_60.0, CONCRETE_BAG_60.1, Some("concrete"));
            items.push_priced("Post Concrete (60 lb bags)", bags, "bags", bags * bag_price);

            // Infill by style
            match fence_type {
                FenceType::Privacy => {
                    let rail_rows = if *height_ft >= 6.0 { 3.0 } else { 2.0 };
                    let rails = sections * rail_rows;
                    items.push_priced(FENCE_RAIL.0, rails, "pcs", rails * price(book, FENCE_RAIL));

                    let pickets = (length * 12.0 / PRIVACY_PICKET_WIDTH_IN).ceil();
                    items.push_priced(
                        PRIVACY_PICKET.0,
                        pickets,
                        "pcs",
                        pickets * price(book, PRIVACY_PICKET),
                    );
                }
                FenceType::Picket => {
                    let rails = sections * 2.0;
                    items.push_priced(FENCE_RAIL.0, rails, "pcs", rails * price(book, FENCE_RAIL));

                    let pickets = (length * 12.0 / SPACED_PICKET_PITCH_IN).ceil();
                    items.push_priced(
                        SPACED_PICKET.0,
                        pickets,
                        "pcs",
                        pickets * price(book, SPACED_PICKET),
                    );
                }
                FenceType::ChainLink => {
                    let rolls = (length / FABRIC_ROLL_FT).ceil();
                    items.push_priced(
                        CHAIN_LINK_FABRIC.0,
                        rolls,
                        "rolls",
                        rolls * price(book, CHAIN_LINK_FABRIC),
                    );

                    let top_rails = (length / TOP_RAIL_STICK_FT).ceil();
                    items.push_priced(TOP_RAIL.0, top_rails, "pcs", top_rails * price(book, TOP_RAIL));

                    // One bar per corner plus both ends
                    let bars = f64::from(*corner_count) + 2.0;
                    items.push_priced(TENSION_BAR.0, bars, "pcs", bars * price(book, TENSION_BAR));
                }
                FenceType::Ranch => {
                    let rails = (length / RANCH_RAIL_STICK_FT).ceil() * 3.0;
                    items.push_priced(RANCH_RAIL.0, rails, "pcs", rails * price(book, RANCH_RAIL));
                }
                FenceType::Panel => {
                    let panels = (length / PANEL_WIDTH_FT).ceil();
                    items.push_priced(FENCE_PANEL.0, panels, "panels", panels * price(book, FENCE_PANEL));
                }
            }

            // Gates
            for gate in gates {
                let leaf = match gate.kind {
                    GateKind::Walk => WALK_GATE,
                    GateKind::Drive => DRIVE_GATE,
                };
                items.push_priced(leaf.0, 1.0, "ea", price(book, leaf));
                items.push_priced(GATE_HARDWARE.0, 1.0, "ea", price(book, GATE_HARDWARE));
            }

            Ok(items.finish_with_total("Estimated Total"))
        }
    }
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    vec![
        MaterialEntry::new(WOOD_POST.0, POST_CATEGORY, WOOD_POST.1),
        MaterialEntry::new(STEEL_POST.0, POST_CATEGORY, STEEL_POST.1),
        MaterialEntry::new(FENCE_RAIL.0, CATEGORY, FENCE_RAIL.1),
        MaterialEntry::new(PRIVACY_PICKET.0, CATEGORY, PRIVACY_PICKET.1),
        MaterialEntry::new(SPACED_PICKET.0, CATEGORY, SPACED_PICKET.1),
        MaterialEntry::new(CHAIN_LINK_FABRIC.0, CATEGORY, CHAIN_LINK_FABRIC.1)
            .with_unit_spec("50 ft"),
        MaterialEntry::new(TOP_RAIL.0, CATEGORY, TOP_RAIL.1).with_unit_spec("21 ft"),
        MaterialEntry::new(TENSION_BAR.0, CATEGORY, TENSION_BAR.1),
        MaterialEntry::new(RANCH_RAIL.0, CATEGORY, RANCH_RAIL.1).with_unit_spec("16 ft"),
        MaterialEntry::new(FENCE_PANEL.0, CATEGORY, FENCE_PANEL.1).with_unit_spec("8 ft"),
        MaterialEntry::new(WALK_GATE.0, CATEGORY, WALK_GATE.1),
        MaterialEntry::new(DRIVE_GATE.0, CATEGORY, DRIVE_GATE.1),
        MaterialEntry::new(GATE_HARDWARE.0, CATEGORY, GATE_HARDWARE.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::verify_total_invariant;

    fn privacy_run() -> FencingInput {
        FencingInput {
            label: "Backyard".to_string(),
            job: FenceJob::Geometry {
                fence_type: FenceType::Privacy,
                length_ft: Some(100.0),
                height_ft: 6.0,
                post_spacing_ft: 8.0,
                post_depth_ft: 2.0,
                corner_count: 2,
                gates: vec![Gate {
                    kind: GateKind::Walk,
                    ..Gate::default()
                }],
            },
        }
    }

    #[test]
    fn test_post_count() {
        let items = calculate(&privacy_run(), &PriceBook::defaults()).unwrap();
        // ceil(100/8) + 1 + 2 corners = 16
        let posts = items.iter().find(|i| i.label == WOOD_POST.0).unwrap();
        assert_eq!(posts.value, 16.0);
    }

    #[test]
    fn test_post_concrete_bags() {
        let items = calculate(&privacy_run(), &PriceBook::defaults()).unwrap();
        // 16 posts x 2 ft x 0.33 = 10.56 cu ft -> ceil(10.56/0.45) = 24 bags
        let bags = items.iter().find(|i| i.label.contains("60 lb bags")).unwrap();
        assert_eq!(bags.value, 24.0);
    }

    #[test]
    fn test_privacy_infill() {
        let items = calculate(&privacy_run(), &PriceBook::defaults()).unwrap();
        // 13 sections x 3 rail rows (6 ft tall) = 39 rails
        let rails = items.iter().find(|i| i.label == FENCE_RAIL.0).unwrap();
        assert_eq!(rails.value, 39.0);
        // ceil(1200 in / 5.5) = 219 pickets
        let pickets = items.iter().find(|i| i.label == PRIVACY_PICKET.0).unwrap();
        assert_eq!(pickets.value, 219.0);
    }

    #[test]
    fn test_chain_link_branch() {
        let input = FencingInput {
            label: String::new(),
            job: FenceJob::Geometry {
                fence_type: FenceType::ChainLink,
                length_ft: Some(120.0),
                height_ft: 4.0,
                post_spacing_ft: 10.0,
                post_depth_ft: 2.0,
                corner_count: 3,
                gates: vec![],
            },
        };
        let items = calculate(&input, &PriceBook::defaults()).unwrap();

        assert!(items.iter().any(|i| i.label == STEEL_POST.0));
        let fabric = items.iter().find(|i| i.label == CHAIN_LINK_FABRIC.0).unwrap();
        assert_eq!(fabric.value, 3.0); // ceil(120/50)
        let top_rail = items.iter().find(|i| i.label == TOP_RAIL.0).unwrap();
        assert_eq!(top_rail.value, 6.0); // ceil(120/21)
        let bars = items.iter().find(|i| i.label == TENSION_BAR.0).unwrap();
        assert_eq!(bars.value, 5.0); // 3 corners + 2 ends
    }

    #[test]
    fn test_panel_and_ranch_round_up() {
        let mut input = privacy_run();
        input.job = FenceJob::Geometry {
            fence_type: FenceType::Panel,
            length_ft: Some(97.0),
            height_ft: 6.0,
            post_spacing_ft: 8.0,
            post_depth_ft: 2.0,
            corner_count: 0,
            gates: vec![],
        };
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        let panels = items.iter().find(|i| i.label == FENCE_PANEL.0).unwrap();
        assert_eq!(panels.value, 13.0); // ceil(97/8)

        input.job = FenceJob::Geometry {
            fence_type: FenceType::Ranch,
            length_ft: Some(97.0),
            height_ft: 5.0,
            post_spacing_ft: 8.0,
            post_depth_ft: 2.0,
            corner_count: 0,
            gates: vec![],
        };
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        let rails = items.iter().find(|i| i.label == RANCH_RAIL.0).unwrap();
        assert_eq!(rails.value, 21.0); // ceil(97/16) x 3
    }

    #[test]
    fn test_gates_add_leaf_and_hardware() {
        let items = calculate(&privacy_run(), &PriceBook::defaults()).unwrap();
        let gate = items.iter().find(|i| i.label == WALK_GATE.0).unwrap();
        assert!((gate.cost.unwrap() - 129.0).abs() < 1e-9);
        assert!(items.iter().any(|i| i.label == GATE_HARDWARE.0));
    }

    #[test]
    fn test_custom_mode_scenario() {
        let input = FencingInput {
            label: "Quoted Job".to_string(),
            job: FenceJob::Custom {
                linear_ft: Some(120.0),
                price_per_ft: Some(22.50),
            },
        };
        let items = calculate(&input, &PriceBook::defaults()).unwrap();

        // Exactly one material line plus the total, both at 2700
        assert_eq!(items.len(), 2);
        assert!((items[0].cost.unwrap() - 2700.0).abs() < 1e-9);
        let total = items.last().unwrap();
        assert!(total.is_total);
        assert!((total.value - 2700.0).abs() < 1e-9);
    }

    #[test]
    fn test_wood_post_override_precedence() {
        let overrides = vec![MaterialEntry::new("Wood Post", POST_CATEGORY, 19.99)];

        // Custom context: override wins
        let book = PriceBook::custom(overrides.clone());
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some(POST_CATEGORY)), 19.99);
        let items = calculate(&privacy_run(), &book).unwrap();
        let posts = items.iter().find(|i| i.label == WOOD_POST.0).unwrap();
        assert!((posts.cost.unwrap() - 16.0 * 19.99).abs() < 1e-9);

        // Default context: override present but ignored
        let book = PriceBook::defaults();
        let items = calculate(&privacy_run(), &book).unwrap();
        let posts = items.iter().find(|i| i.label == WOOD_POST.0).unwrap();
        assert!((posts.cost.unwrap() - 16.0 * 24.98).abs() < 1e-9);
    }

    #[test]
    fn test_validity_gates() {
        let input = FencingInput {
            label: String::new(),
            job: FenceJob::Custom {
                linear_ft: Some(120.0),
                price_per_ft: None,
            },
        };
        let err = calculate(&input, &PriceBook::defaults()).unwrap_err();
        assert_eq!(err, EstimateError::missing_field("price_per_ft"));

        let input = FencingInput::default();
        assert!(calculate(&input, &PriceBook::defaults()).is_err());
    }

    #[test]
    fn test_total_invariant() {
        let items = calculate(&privacy_run(), &PriceBook::defaults()).unwrap();
        assert!(verify_total_invariant(&items));
    }

    #[test]
    fn test_gate_ids_are_reconciliation_only() {
        let input = privacy_run();
        let json = serde_json::to_string(&input).unwrap();
        let roundtrip: FencingInput = serde_json::from_str(&json).unwrap();
        // Same geometry produces the same estimate regardless of gate ids
        assert_eq!(
            calculate(&input, &PriceBook::defaults()).unwrap(),
            calculate(&roundtrip, &PriceBook::defaults()).unwrap()
        );
    }
}
