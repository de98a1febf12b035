//! # Electrical Calculator
//!
//! Branch-circuit takeoff: wire by gauge, breakers, and device packages.
//!
//! Wire gauge derives from circuit amperage; per-circuit length carries a
//! fixed 1.2x overage for routing. Breaker price branches on amperage tier
//! and the AFCI flag. Circuits sharing a gauge aggregate into one wire line.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::{ItemList, LineItem};
use crate::pricing::{MaterialEntry, PriceBook};

/// Catalog category for this trade
pub const CATEGORY: &str = "electrical";

/// Routing overage for wire pulls
const WIRE_OVERAGE: f64 = 1.2;

const BREAKER_SINGLE: (&str, f64) = ("Single-Pole Breaker", 12.98);
const BREAKER_DOUBLE: (&str, f64) = ("Double-Pole Breaker", 24.98);
const BREAKER_AFCI: (&str, f64) = ("AFCI Breaker", 45.98);
const DEVICE_BOX: (&str, f64) = ("Device Box", 1.58);
const DUPLEX_OUTLET: (&str, f64) = ("Duplex Outlet", 3.48);
const TOGGLE_SWITCH: (&str, f64) = ("Toggle Switch", 2.98);
const WALL_PLATE: (&str, f64) = ("Wall Plate", 0.98);
const PANEL_200A: (&str, f64) = ("200A Load Center", 289.0);

fn price(book: &PriceBook, (name, default): (&str, f64)) -> f64 {
    book.resolve_price(name, default, Some(CATEGORY))
}

/// Circuit amperage tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Amperage {
    #[default]
    #[serde(rename = "15")]
    A15,
    #[serde(rename = "20")]
    A20,
    #[serde(rename = "30")]
    A30,
    #[serde(rename = "40")]
    A40,
    #[serde(rename = "50")]
    A50,
}

impl Amperage {
    /// NM-B cable for this amperage, with its default per-foot price.
    fn wire_key(&self) -> (&'static str, f64) {
        match self {
            Amperage::A15 => ("NM-B 14/2", 0.62),
            Amperage::A20 => ("NM-B 12/2", 0.89),
            Amperage::A30 => ("NM-B 10/2", 1.52),
            Amperage::A40 => ("NM-B 8/2", 2.35),
            Amperage::A50 => ("NM-B 6/2", 3.65),
        }
    }

    /// 30 A and up run double-pole breakers.
    fn is_double_pole(&self) -> bool {
        matches!(self, Amperage::A30 | Amperage::A40 | Amperage::A50)
    }
}

/// One branch circuit. The id is an opaque UI reconciliation handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Circuit {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub amperage: Amperage,
    pub afci: bool,
    pub length_ft: Option<f64>,
}

impl Default for Circuit {
    fn default() -> Self {
        Circuit {
            id: Uuid::new_v4(),
            amperage: Amperage::default(),
            afci: false,
            length_ft: None,
        }
    }
}

impl Circuit {
    /// Breaker catalog key: AFCI wins over the tier split.
    fn breaker_key(&self) -> (&'static str, f64) {
        if self.afci {
            BREAKER_AFCI
        } else if self.amperage.is_double_pole() {
            BREAKER_DOUBLE
        } else {
            BREAKER_SINGLE
        }
    }
}

/// Input parameters for an electrical estimate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectricalInput {
    pub label: String,
    pub circuits: Vec<Circuit>,
    pub outlet_count: u32,
    pub switch_count: u32,
    pub include_panel_upgrade: bool,
}

impl ElectricalInput {
    /// At least one circuit with positive length.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.circuits.is_empty() {
            return Err(EstimateError::missing_field("circuits"));
        }
        for circuit in &self.circuits {
            require_positive("length_ft", circuit.length_ft)?;
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

/// Compute the electrical bill of materials.
pub fn calculate(input: &ElectricalInput, book: &PriceBook) -> EstimateResult<Vec<LineItem>> {
    input.validate()?;

    let mut items = ItemList::new();

    // Wire footage per gauge and breaker counts per kind, first-seen order
    let mut wire_totals: Vec<(Amperage, f64)> = Vec::new();
    let mut breaker_totals: Vec<((&'static str, f64), f64)> = Vec::new();

    for circuit in &input.circuits {
        let adjusted = circuit.length_ft.unwrap_or(0.0) * WIRE_OVERAGE;
        match wire_totals
            .iter_mut()
            .find(|(a, _)| a.wire_key().0 == circuit.amperage.wire_key().0)
        {
            Some((_, total)) => *total += adjusted,
            None => wire_totals.push((circuit.amperage, adjusted)),
        }

        let breaker = circuit.breaker_key();
        match breaker_totals.iter_mut().find(|(k, _)| k.0 == breaker.0) {
            Some((_, count)) => *count += 1.0,
            None => breaker_totals.push((breaker, 1.0)),
        }
    }

    for (amperage, footage) in &wire_totals {
        let key = amperage.wire_key();
        items.push_priced(key.0, *footage, "lin ft", footage * price(book, key));
    }

    for (key, count) in &breaker_totals {
        items.push_priced(key.0, *count, "ea", count * price(book, *key));
    }

    let devices = input.outlet_count + input.switch_count;
    if devices > 0 {
        let boxes = f64::from(devices);
        items.push_priced(DEVICE_BOX.0, boxes, "ea", boxes * price(book, DEVICE_BOX));
    }
    if input.outlet_count > 0 {
        let count = f64::from(input.outlet_count);
        items.push_priced(DUPLEX_OUTLET.0, count, "ea", count * price(book, DUPLEX_OUTLET));
    }
    if input.switch_count > 0 {
        let count = f64::from(input.switch_count);
        items.push_priced(TOGGLE_SWITCH.0, count, "ea", count * price(book, TOGGLE_SWITCH));
    }
    if devices > 0 {
        let plates = f64::from(devices);
        items.push_priced(WALL_PLATE.0, plates, "ea", plates * price(book, WALL_PLATE));
    }

    if input.include_panel_upgrade {
        items.push_priced(PANEL_200A.0, 1.0, "ea", price(book, PANEL_200A));
    }

    Ok(items.finish_with_total("Estimated Total"))
}

/// Embedded defaults for the catalog registry.
pub(crate) fn default_entries() -> Vec<MaterialEntry> {
    let mut entries = Vec::new();
    for amperage in [
        Amperage::A15,
        Amperage::A20,
        Amperage::A30,
        Amperage::A40,
        Amperage::A50,
    ] {
        let (name, default) = amperage.wire_key();
        entries.push(MaterialEntry::new(name, CATEGORY, default));
    }
    for item in [
        BREAKER_SINGLE,
        BREAKER_DOUBLE,
        BREAKER_AFCI,
        DEVICE_BOX,
        DUPLEX_OUTLET,
        TOGGLE_SWITCH,
        WALL_PLATE,
        PANEL_200A,
    ] {
        entries.push(MaterialEntry::new(item.0, CATEGORY, item.1));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::verify_total_invariant;

    fn circuit(amperage: Amperage, afci: bool, length: f64) -> Circuit {
        Circuit {
            amperage,
            afci,
            length_ft: Some(length),
            ..Circuit::default()
        }
    }

    fn bedroom_panel() -> ElectricalInput {
        ElectricalInput {
            label: "Bedroom Circuits".to_string(),
            circuits: vec![
                circuit(Amperage::A15, true, 50.0),
                circuit(Amperage::A20, false, 40.0),
                circuit(Amperage::A30, false, 25.0),
            ],
            outlet_count: 8,
            switch_count: 3,
            ..ElectricalInput::default()
        }
    }

    #[test]
    fn test_wire_by_gauge_with_overage() {
        let items = calculate(&bedroom_panel(), &PriceBook::defaults()).unwrap();
        // 50 x 1.2 = 60 ft of 14/2
        let w14 = items.iter().find(|i| i.label == "NM-B 14/2").unwrap();
        assert_eq!(w14.value, 60.0);
        assert!((w14.cost.unwrap() - 60.0 * 0.62).abs() < 1e-9);
        // 25 x 1.2 = 30 ft of 10/2
        let w10 = items.iter().find(|i| i.label == "NM-B 10/2").unwrap();
        assert_eq!(w10.value, 30.0);
    }

    #[test]
    fn test_breaker_branching() {
        let items = calculate(&bedroom_panel(), &PriceBook::defaults()).unwrap();

        let afci = items.iter().find(|i| i.label == BREAKER_AFCI.0).unwrap();
        assert_eq!(afci.value, 1.0);
        assert!((afci.cost.unwrap() - 45.98).abs() < 1e-9);

        let single = items.iter().find(|i| i.label == BREAKER_SINGLE.0).unwrap();
        assert_eq!(single.value, 1.0);

        let double = items.iter().find(|i| i.label == BREAKER_DOUBLE.0).unwrap();
        assert_eq!(double.value, 1.0);
    }

    #[test]
    fn test_same_gauge_circuits_aggregate() {
        let input = ElectricalInput {
            circuits: vec![
                circuit(Amperage::A20, false, 30.0),
                circuit(Amperage::A20, false, 20.0),
            ],
            ..ElectricalInput::default()
        };
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        let wires: Vec<_> = items.iter().filter(|i| i.label == "NM-B 12/2").collect();
        assert_eq!(wires.len(), 1);
        assert_eq!(wires[0].value, 60.0);
        // One breaker line with two breakers
        let breakers = items.iter().find(|i| i.label == BREAKER_SINGLE.0).unwrap();
        assert_eq!(breakers.value, 2.0);
    }

    #[test]
    fn test_device_package() {
        let items = calculate(&bedroom_panel(), &PriceBook::defaults()).unwrap();
        assert_eq!(items.iter().find(|i| i.label == DEVICE_BOX.0).unwrap().value, 11.0);
        assert_eq!(items.iter().find(|i| i.label == DUPLEX_OUTLET.0).unwrap().value, 8.0);
        assert_eq!(items.iter().find(|i| i.label == TOGGLE_SWITCH.0).unwrap().value, 3.0);
        assert_eq!(items.iter().find(|i| i.label == WALL_PLATE.0).unwrap().value, 11.0);
    }

    #[test]
    fn test_panel_upgrade_flat_item() {
        let mut input = bedroom_panel();
        input.include_panel_upgrade = true;
        let items = calculate(&input, &PriceBook::defaults()).unwrap();
        let panel = items.iter().find(|i| i.label == PANEL_200A.0).unwrap();
        assert!((panel.cost.unwrap() - 289.0).abs() < 1e-9);
    }

    #[test]
    fn test_requires_circuit_with_length() {
        assert_eq!(
            calculate(&ElectricalInput::default(), &PriceBook::defaults()).unwrap_err(),
            EstimateError::missing_field("circuits")
        );

        let missing = ElectricalInput {
            circuits: vec![Circuit::default()],
            ..ElectricalInput::default()
        };
        assert_eq!(
            calculate(&missing, &PriceBook::defaults()).unwrap_err(),
            EstimateError::missing_field("length_ft")
        );
    }

    #[test]
    fn test_total_invariant() {
        let items = calculate(&bedroom_panel(), &PriceBook::defaults()).unwrap();
        assert!(verify_total_invariant(&items));
    }
}
