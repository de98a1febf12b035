//! # estimate_core - Contractor Material Estimation Engine
//!
//! `estimate_core` is the computational heart of Tally: per-trade
//! calculators that turn structured measurement inputs into itemized bills
//! of material, priced through a two-tier catalog (embedded defaults vs.
//! per-account overrides).
//!
//! ## Design Philosophy
//!
//! - **Stateless**: calculators are pure functions of (input, price book)
//! - **JSON-First**: all inputs, results, and snapshots Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings; incomplete
//!   input is an `Err` from the validity gate, never a panic
//! - **Defensive Loads**: every input field defaults, so old snapshots
//!   revive as partial input instead of failing
//!
//! ## Quick Start
//!
//! ```rust
//! use estimate_core::calculators::concrete::{calculate, ConcreteGeometry, ConcreteInput};
//! use estimate_core::pricing::PriceBook;
//!
//! let input = ConcreteInput {
//!     label: "Back Patio".to_string(),
//!     geometry: ConcreteGeometry::Flatwork {
//!         length_ft: Some(10.0),
//!         width_ft: Some(10.0),
//!         depth_in: Some(4.0),
//!     },
//!     ..ConcreteInput::default()
//! };
//!
//! let items = calculate(&input, &PriceBook::defaults()).unwrap();
//! let total = items.last().unwrap();
//! assert!(total.is_total);
//! ```
//!
//! ## Modules
//!
//! - [`calculators`] - all twelve trade calculators and the dispatch enum
//! - [`pricing`] - catalog model, price resolver, per-trade load cache
//! - [`line_items`] - the output vocabulary and total-invariant builder
//! - [`estimates`] - snapshot save/load with atomic writes and locking
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types

pub mod calculators;
pub mod errors;
pub mod estimates;
pub mod line_items;
pub mod pricing;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculators::TradeInput;
pub use errors::{EstimateError, EstimateResult};
pub use estimates::{load_estimate, save_estimate, EstimateSnapshot};
pub use line_items::{ItemList, LineItem};
pub use pricing::{CatalogCache, MaterialEntry, PriceBook, PricingContext};
