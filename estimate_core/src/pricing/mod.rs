//! # Pricing
//!
//! Two-tier pricing resolution for the trade calculators. Every material a
//! calculator prices has a hard-coded default; an account may carry an
//! override catalog that takes precedence entry-by-entry when the pricing
//! context is [`PricingContext::Custom`].
//!
//! ## Components
//!
//! - [`MaterialEntry`] - one override row: name, category, price, optional
//!   unit spec, archived flag
//! - [`PriceBook`] - immutable snapshot the calculators resolve against
//! - [`CatalogCache`] - per-trade snapshot store with last-write-wins load
//!   supersede semantics
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::pricing::{MaterialEntry, PriceBook};
//!
//! let overrides = vec![MaterialEntry::new("Wood Post", "posts", 19.99)];
//! let book = PriceBook::custom(overrides);
//!
//! // Override wins in custom context
//! assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 19.99);
//! // Unknown materials fall back to the default
//! assert_eq!(book.resolve_price("Gate Kit", 32.98, None), 32.98);
//! ```

pub mod cache;
pub mod catalog;
pub mod resolver;

pub use cache::{CatalogCache, LoadOutcome, LoadTicket};
pub use catalog::{default_catalog, parse_unit_value, MaterialEntry, PricingContext};
pub use resolver::PriceBook;
