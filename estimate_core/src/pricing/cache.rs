//! Per-trade catalog snapshots with supersede-safe loading.
//!
//! Catalog fetches are asynchronous and cancelable from the engine's point of
//! view: the UI may switch pricing context (triggering a reload) while an
//! earlier fetch is still in flight. The cache hands out numbered tickets and
//! applies only the newest one per trade - last-write-wins, never
//! first-write-wins - so a slow stale response can never clobber a fresh
//! catalog.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::pricing::{CatalogCache, LoadOutcome, MaterialEntry, PricingContext};
//!
//! let mut cache = CatalogCache::new();
//! let stale = cache.begin_load("fencing");
//! let fresh = cache.begin_load("fencing");
//!
//! // Fresh request completes first
//! let entries = vec![MaterialEntry::new("Wood Post", "posts", 19.99)];
//! assert_eq!(cache.complete_load(fresh, Ok(entries)), LoadOutcome::Applied);
//!
//! // Stale response arrives late and is discarded
//! assert_eq!(cache.complete_load(stale, Ok(vec![])), LoadOutcome::Superseded);
//!
//! let book = cache.book("fencing", PricingContext::Custom);
//! assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 19.99);
//! ```

use std::collections::HashMap;

use super::catalog::{MaterialEntry, PricingContext};
use super::resolver::PriceBook;

/// Handle for one in-flight catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    trade: String,
    seq: u64,
}

/// Whether a completed load was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Superseded,
}

#[derive(Debug, Default)]
struct TradeCatalog {
    /// Newest ticket issued for this trade; only it may apply
    latest_seq: u64,
    snapshot: Option<Vec<MaterialEntry>>,
    fetch_error: Option<String>,
}

/// Session-scoped store of per-trade override catalogs.
///
/// One snapshot per trade, loaded once per pricing-context activation and
/// reused for every subsequent calculation. Single-threaded by design (the
/// calculation model is synchronous); completion of background fetches is
/// funneled back through [`CatalogCache::complete_load`].
#[derive(Debug, Default)]
pub struct CatalogCache {
    trades: HashMap<String, TradeCatalog>,
    next_seq: u64,
}

impl CatalogCache {
    pub fn new() -> Self {
        CatalogCache::default()
    }

    /// Register a new fetch for `trade` and get its ticket. Any ticket issued
    /// earlier for the same trade is superseded from this point on.
    pub fn begin_load(&mut self, trade: &str) -> LoadTicket {
        self.next_seq += 1;
        let state = self.trades.entry(trade.to_string()).or_default();
        state.latest_seq = self.next_seq;
        LoadTicket {
            trade: trade.to_string(),
            seq: self.next_seq,
        }
    }

    /// Deliver a fetch result. Applies only if `ticket` is still the newest
    /// for its trade; stale completions are discarded untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<MaterialEntry>, String>,
    ) -> LoadOutcome {
        let state = self.trades.entry(ticket.trade.clone()).or_default();
        if ticket.seq != state.latest_seq {
            return LoadOutcome::Superseded;
        }
        match result {
            Ok(entries) => {
                state.snapshot = Some(entries);
                state.fetch_error = None;
            }
            Err(reason) => {
                // Keep any previous snapshot; record the failure for
                // out-of-band surfacing
                state.fetch_error = Some(reason);
            }
        }
        LoadOutcome::Applied
    }

    /// Drop the cached snapshot for a trade (e.g., after the account edits
    /// its overrides). The next activation must reload.
    pub fn invalidate(&mut self, trade: &str) {
        self.trades.remove(trade);
    }

    /// Build a [`PriceBook`] for one calculation pass.
    ///
    /// `Default` context never consults the cache. `Custom` context uses the
    /// current snapshot; a recorded fetch failure with no usable snapshot
    /// degrades to default pricing with the error attached.
    pub fn book(&self, trade: &str, context: PricingContext) -> PriceBook {
        if context == PricingContext::Default {
            return PriceBook::defaults();
        }
        match self.trades.get(trade) {
            Some(state) => match (&state.snapshot, &state.fetch_error) {
                (Some(entries), _) => PriceBook::custom(entries.clone()),
                (None, Some(error)) => PriceBook::degraded(error.clone()),
                (None, None) => PriceBook::defaults(),
            },
            // Never loaded: nothing to prefer yet
            None => PriceBook::defaults(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<MaterialEntry> {
        vec![MaterialEntry::new("Wood Post", "posts", 19.99)]
    }

    #[test]
    fn test_load_and_book() {
        let mut cache = CatalogCache::new();
        let ticket = cache.begin_load("fencing");
        assert_eq!(cache.complete_load(ticket, Ok(entries())), LoadOutcome::Applied);

        let book = cache.book("fencing", PricingContext::Custom);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 19.99);
        assert!(book.fetch_error().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut cache = CatalogCache::new();
        let first = cache.begin_load("fencing");
        let second = cache.begin_load("fencing");

        assert_eq!(cache.complete_load(second, Ok(entries())), LoadOutcome::Applied);
        // First request resolves late with different data; must be discarded
        assert_eq!(
            cache.complete_load(first, Ok(vec![])),
            LoadOutcome::Superseded
        );

        let book = cache.book("fencing", PricingContext::Custom);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 19.99);
    }

    #[test]
    fn test_fetch_failure_degrades_to_defaults() {
        let mut cache = CatalogCache::new();
        let ticket = cache.begin_load("fencing");
        cache.complete_load(ticket, Err("503 from pricing service".to_string()));

        let book = cache.book("fencing", PricingContext::Custom);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 24.98);
        assert_eq!(book.fetch_error(), Some("503 from pricing service"));
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let mut cache = CatalogCache::new();
        let ticket = cache.begin_load("fencing");
        cache.complete_load(ticket, Ok(entries()));

        let reload = cache.begin_load("fencing");
        cache.complete_load(reload, Err("timeout".to_string()));

        // Previous good snapshot still serves
        let book = cache.book("fencing", PricingContext::Custom);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 19.99);
    }

    #[test]
    fn test_default_context_bypasses_cache() {
        let mut cache = CatalogCache::new();
        let ticket = cache.begin_load("fencing");
        cache.complete_load(ticket, Ok(entries()));

        let book = cache.book("fencing", PricingContext::Default);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 24.98);
    }

    #[test]
    fn test_unloaded_trade_resolves_defaults() {
        let cache = CatalogCache::new();
        let book = cache.book("tile", PricingContext::Custom);
        assert_eq!(book.resolve_price("Thinset", 18.48, None), 18.48);
    }

    #[test]
    fn test_invalidate() {
        let mut cache = CatalogCache::new();
        let ticket = cache.begin_load("fencing");
        cache.complete_load(ticket, Ok(entries()));
        cache.invalidate("fencing");

        let book = cache.book("fencing", PricingContext::Custom);
        assert_eq!(book.resolve_price("Wood Post", 24.98, Some("posts")), 24.98);
    }
}
