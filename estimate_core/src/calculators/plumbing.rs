//! # Plumbing Calculator
//!
//! Rough-in takeoff: supply piping runs, fittings, fixture rough-in kits,
//! and an optional sewer lateral.
//!
//! Pipe is priced per foot by material and diameter, with a fixed 1.2x
//! overage multiplier for bends and routing. Fittings are figured per run at
//! one per ten feet of adjusted length. Runs sharing a material and diameter
//! aggregate into one line.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};

/// Catalog category for this trade
pub const CATEGORY: &str = "plumbing";

/// Routing overage for bends
const PIPE_OVERAGE: f64 = 1.2;
/// One fitting per this many feet of adjusted run
const FITTING_INTERVAL_FT: f64 = 10.0;

const SEWER_PIPE: (&str, f64) = ("Sewer Pipe", 12.48); // per lin ft

const TOILET_KIT: (&str, f64) = ("Toilet Rough-In Kit", 64.98);
const SINK_KIT: (&str, f64) = ("Sink Rough-In Kit", 48.98);
const SHOWER_KIT: (&str, f64) = ("Shower Rough-In Kit", 89.98);
const TUB_KIT: (&str, f64) = ("Tub Rough-In Kit", 94.98);
const WATER_HEATER_KIT: (&str, f64) = ("Water Heater Hookup Kit", 129.98);
const WASHER_BOX_KIT: (&str, f64) = ("Washer Box Kit", 54.98);

const PEX_FITTING: (&str, f64) = ("PEX Fitting", 2.98);
const COPPER_FITTING: (&str, f64) = ("Copper Fitting", 3.48);
const PVC_FITTING: (&str, f64) = ("PVC Fitting", 1.28);

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Supply pipe material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeMaterial {
    #[default]
    Pex,
    Copper,
    Pvc,
}

impl PipeMaterial {
    fn fitting_key(&self) -> (&'static str, f64) {
        match self {
            PipeMaterial::Pex => PEX_FITTING,
            PipeMaterial::Copper => COPPER_FITTING,
            PipeMaterial::Pvc => PVC_FITTING,
        }
    }
}

/// Nominal pipe diameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PipeDiameter {
    #[default]
    #[serde(rename = "1/2")]
    Half,
    #[serde(rename = "3/4")]
    ThreeQuarter,
    #[serde(rename = "1")]
    One,
}

/// Per-foot pipe pricing, keyed by material and diameter.
fn pipe_key(material: PipeMaterial, diameter: PipeDiameter) -> (&'static str, f64) {
    match (material, diameter) {
        (PipeMaterial::Pex, PipeDiameter::Half) => ("PEX 1/2 in", 0.42),
        (PipeMaterial::Pex, PipeDiameter::ThreeQuarter) => ("PEX 3/4 in", 0.68),
        (PipeMaterial::Pex, PipeDiameter::One) => ("PEX 1 in", 1.05),
        (PipeMaterial::Copper, PipeDiameter::Half) => ("Copper 1/2 in", 2.10),
        (PipeMaterial::Copper, PipeDiameter::ThreeQuarter) => ("Copper 3/4 in", 3.25),
        (PipeMaterial::Copper, PipeDiameter::One) => ("Copper 1 in", 4.60),
        (PipeMaterial::Pvc, PipeDiameter::Half) => ("PVC 1/2 in", 0.38),
        (PipeMaterial::Pvc, PipeDiameter::ThreeQuarter) => ("PVC 3/4 in", 0.52),
        (PipeMaterial::Pvc, PipeDiameter::One) => ("PVC 1 in", 0.78),
    }
}

/// One supply run. The id is an opaque UI reconciliation handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipingRun {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub material: PipeMaterial,
    pub diameter: PipeDiameter,
    pub length_ft: Option<f64>,
}

impl Default for PipingRun {
    fn default() -> Self {
        PipingRun {
            id: Uuid::new_v4(),
            material: PipeMaterial::default(),
            diameter: PipeDiameter::default(),
            length_ft: None,
        }
    }
}

/// Fixture types with rough-in kits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
    #[default]
    Toilet,
    Sink,
    Shower,
    Tub,
    WaterHeater,
    WasherBox,
}

impl FixtureKind {
    fn catalog_key(&self) -> (&'static str, f64) {
        match self {
            FixtureKind::Toilet => TOILET_KIT,
            FixtureKind::Sink => SINK_KIT,
            FixtureKind::Shower => SHOWER_KIT,
            FixtureKind::Tub => TUB_KIT,
            FixtureKind::WaterHeater => WATER_HEATER_KIT,
            FixtureKind::WasherBox => WASHER_BOX_KIT,
        }
    }
}

/// One fixture entry. The id is an opaque UI reconciliation handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub kind: FixtureKind,
    pub count: u32,
}

impl Default for Fixture {
    fn default() -> Self {
        Fixture {
            id: Uuid::new_v4(),
            kind: FixtureKind::default(),
            count: 1,
        }
    }
}

/// Input parameters for a plumbing estimate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumbingInput {
    pub label: String,
    pub runs: Vec<PipingRun>,
    pub fixtures: Vec<Fixture>,
    pub sewer_connection: bool,
    /// Required only when `sewer_connection` is set
    pub sewer_length_ft: Option<f64>,
}

impl PlumbingInput {
    /// At least one run with positive length; sewer length only when the
    /// sewer connection is enabled.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.runs.is_empty() {
            return Err(EstimateError::missing_field("runs"));
        }
        for run in &self.runs {
            require_positive("length_ft", run.length_ft)?;
        }
        if self.sewer_connection {
            require_positive("sewer_length_ft", self.sewer_length_ft)?;
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

/// Compute the plumbing bill of materials.
pub fn calculate(input: &PlumbingInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    input.validate()?;

    let mut items = ItemList::new();

    // Aggregate pipe footage per (material, diameter) and fittings per
    // material, preserving first-seen order
    let mut pipe_totals: Vec<((PipeMaterial, PipeDiameter), f64)> = Vec::new();
    let mut fitting_totals: Vec<(PipeMaterial, f64)> = Vec::new();

    for run in &input.runs {
        let adjusted = run.length_ft.unwrap_or(0.0) * PIPE_OVERAGE;

        let pipe = (run.material, run.diameter);
        match pipe_totals.iter_mut().find(|(k, _)| *k == pipe) {
            Some((_, total)) => *total += adjusted,
            None => pipe_totals.push((pipe, adjusted)),
        }

        let fittings = (adjusted / FITTING_INTERVAL_FT).ceil();
        match fitting_totals.iter_mut().find(|(m, _)| *m == run.material) {
            Some((_, total)) => *total += fittings,
            None => fitting_totals.push((run.material, fittings)),
        }
    }

    for ((material, diameter), footage) in &pipe_totals {
        let key = pipe_key(*material, *diameter);
        items.push_priced(key.0, *footage, "lin ft", footage * price(book, key));
    }

    for (material, count) in &fitting_totals {
        let key = material.fitting_key();
        items.push_priced(key.0, *count, "pcs", count * price(book, key));
    }

    for fixture in &input.fixtures {
        if fixture.count == 0 {
            continue;
        }
        let key = fixture.kind.catalog_key();
        let count = f64::from(fixture.count);
        items.push_priced(key.0, count, "ea", count * price(book, key));
    }

    if input.sewer_connection {
        let length = input.sewer_length_ft.unwrap_or(0.0);
        items.push_priced(SEWER_PIPE.0, length, "lin ft", length * price(book, SEWER_PIPE));
    }

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    let mut entries = Vec::new();
    for material in [PipeMaterial::Pex, PipeMaterial::Copper, PipeMaterial::Pvc] {
        for diameter in [PipeDiameter::Half, PipeDiameter::ThreeQuarter, PipeDiameter::One] {
            let (name, default) = pipe_key(material, diameter);
            entries.push(MaterialEntry::new(name, CATEGORY, default));
        }
        let (name, default) = material.fitting_key();
        entries.push(MaterialEntry::new(name, CATEGORY, default));
    }
    for kit in [
        TOILET_KIT,
        SINK_KIT,
        SHOWER_KIT,
        TUB_KIT,
        WATER_HEATER_KIT,
        WASHER_BOX_KIT,
        SEWER_PIPE,
    ] {
        entries.push(MaterialEntry::new(kit.0, CATEGORY, kit.1));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::verify_total_invariant;

    fn run(material: PipeMaterial, diameter: PipeDiameter, length: f64) -> PipingRun {
        PipingRun {
            material,
            diameter,
            length_ft: Some(length),
            ..PipingRun::default()
        }
    }

    fn bath_rough_in() -> PlumbingInput {
        PlumbingInput {
            label: "Hall Bath".to_string(),
            runs: vec![
                run(PipeMaterial::Pex, PipeDiameter::Half, 60.0),
                run(PipeMaterial::Pex, PipeDiameter::ThreeQuarter, 25.0),
            ],
            fixtures: vec![
                Fixture {
                    kind: FixtureKind::Toilet,
                    count: 1,
                    ..Fixture::default()
                },
                Fixture {
                    kind: FixtureKind::Sink,
                    count: 2,
                    ..Fixture::default()
                },
            ],
            ..PlumbingInput::default()
        }
    }

    #[test]
    fn test_pipe_overage() {
        let items = calculate(&bath_rough_in(), &PriceBook::defaults()).unwrap();
        // 60 ft x 1.2 = 72 lin ft of 1/2 in PEX at 0.42
        let pex_half = items.iter().find(|i| i.label == "PEX 1/2 in").unwrap();
        assert_eq!(pex_half.value, 72.0);
        assert!((pex_half.cost.unwrap() - 30.24).abs() < 1e-9);
    }

    #[test]
    fn test_fittings_per_run() {
        let items = calculate(&bath_rough_in(), &PriceBook::defaults()).unwrap();
        // Run 1: ceil(72/10) = 8, run 2: ceil(30/10) = 3 -> 11 PEX fittings
        let fittings = items.iter().find(|i| i.label == PEX_FITTING.0).unwrap();
        assert_eq!(fittings.value, 11.0);
    }

    #[test]
    fn test_same_size_runs_aggregate() {
        let input = PlumbingInput {
            runs: vec![
                run(PipeMaterial::Copper, PipeDiameter::Half, 10.0),
                run(PipeMaterial::Copper, PipeDiameter::Half, 14.0),
            ],
            ..PlumbingInput::default()
        };
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        let copper: Vec<_> = items.iter().filter(|i| i.label == "Copper 1/2 in").collect();
        assert_eq!(copper.len(), 1);
        assert!((copper[0].value - 28.8).abs() < 1e-9);
    }

    #[test]
    fn test_fixture_kits() {
        let items = calculate(&bath_rough_in(), &PriceBook::defaults()).unwrap();
        let sinks = items.iter().find(|i| i.label == SINK_KIT.0).unwrap();
        assert_eq!(sinks.value, 2.0);
        assert!((sinks.cost.unwrap() - 2.0 * 48.98).abs() < 1e-9);
    }

    #[test]
    fn test_sewer_only_when_enabled() {
        let items = calculate(&bath_rough_in(), &PriceBook::defaults()).unwrap();
        assert!(!items.iter().any(|i| i.label == SEWER_PIPE.0));

        let mut with_sewer = bath_rough_in();
        with_sewer.sewer_connection = true;
        with_sewer.sewer_length_ft = Some(40.0);
        let items = calculate(&with_sewer, &PriceBook::defaults()).unwrap();
        let sewer = items.iter().find(|i| i.label == SEWER_PIPE.0).unwrap();
        assert!((sewer.cost.unwrap() - 40.0 * 12.48).abs() < 1e-9);
    }

    #[test]
    fn test_sewer_length_required_only_when_enabled() {
        // Disabled: missing sewer length is fine
        let input = bath_rough_in();
        assert!(input.validate().is_ok());

        // Enabled without a length: gated
        let mut enabled = bath_rough_in();
        enabled.sewer_connection = true;
        let err = calculate(&enabled, &PriceBook::defaults()).unwrap_err();
        assert_eq!(err, EstimateError::missing_field("sewer_length_ft"));
    }

    #[test]
    fn test_requires_a_positive_run() {
        let input = PlumbingInput::default();
        assert_eq!(
            calculate(&input, &PriceBook::defaults()).unwrap_err(),
            EstimateError::missing_field("runs")
        );

        let zero_run = PlumbingInput {
            runs: vec![run(PipeMaterial::Pex, PipeDiameter::Half, 0.0)],
            ..PlumbingInput::default()
        };
        assert!(calculate(&zero_run, &PriceBook::defaults()).is_err());
    }

    #[test]
    fn test_total_invariant() {
        let items = calculate(&bath_rough_in(), &PriceBook::defaults()).unwrap();
        assert!(verify_total_invariant(&items));
    }
}
