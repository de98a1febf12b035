//! # Unit Types
//!
//! Type-safe wrappers for the measurement units the calculators pass around.
//! These provide compile-time safety against unit confusion while remaining
//! lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Estimating uses a small, consistent set of US customary units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## US Customary Units
//!
//! - Length: feet (ft), inches (in)
//! - Area: square feet (sq ft)
//! - Volume: cubic feet (cu ft), cubic yards (cu yd)
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::units::{Feet, Inches, CubicFeet, CubicYards};
//!
//! let depth: Feet = Inches(4.0).into();
//! assert!((depth.0 - 0.3333).abs() < 0.001);
//!
//! let volume: CubicYards = CubicFeet(33.33).into();
//! assert!((volume.0 - 1.2345).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareFeet(pub f64);

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicFeet(pub f64);

/// Volume in cubic yards (ready-mix concrete is ordered in these)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicYards(pub f64);

impl From<CubicFeet> for CubicYards {
    fn from(cf: CubicFeet) -> Self {
        CubicYards(cf.0 / 27.0)
    }
}

impl From<CubicYards> for CubicFeet {
    fn from(cy: CubicYards) -> Self {
        CubicFeet(cy.0 * 27.0)
    }
}

/// Round a display-only measurement to 2 decimal places.
///
/// Purchasable unit counts never use this; they round up with `ceil`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
