use crate::core::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Price-level order book for one product
///
/// Mirrors the harness layout: `bids` map price to a positive quantity and
/// `asks` map price to a *negative* quantity. Accessors below always hand out
/// positive sizes so callers never juggle the sign convention.
///
/// The book is a plain value. Placement steps take it by value or clone it and
/// return the residual, so one step's fills are visible to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(rename = "buy_orders", default)]
    pub bids: BTreeMap<Price, Quantity>,
    #[serde(rename = "sell_orders", default)]
    pub asks: BTreeMap<Price, Quantity>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from `(price, size)` pairs with positive sizes on both sides
    ///
    /// Zero and negative sizes are ignored.
    pub fn from_sizes(bids: &[(Price, Quantity)], asks: &[(Price, Quantity)]) -> Self {
        let mut book = Self::new();
        for &(price, size) in bids {
            if size > 0 {
                *book.bids.entry(price).or_insert(0) += size;
            }
        }
        for &(price, size) in asks {
            if size > 0 {
                *book.asks.entry(price).or_insert(0) -= size;
            }
        }
        book
    }

    /// Highest bid as `(price, size)`
    #[inline]
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bid_levels().next()
    }

    /// Lowest ask as `(price, size)` with a positive size
    #[inline]
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.ask_levels().next()
    }

    #[inline]
    pub fn best_bid_price(&self) -> Option<Price> {
        self.best_bid().map(|(p, _)| p)
    }

    #[inline]
    pub fn best_ask_price(&self) -> Option<Price> {
        self.best_ask().map(|(p, _)| p)
    }

    /// Bid levels from best (highest) to worst, sizes positive
    pub fn bid_levels(&self) -> impl Iterator<Item = (Price, Quantity)> + '_ {
        self.bids
            .iter()
            .rev()
            .filter(|(_, &q)| q > 0)
            .map(|(&p, &q)| (p, q))
    }

    /// Ask levels from best (lowest) to worst, sizes positive
    pub fn ask_levels(&self) -> impl Iterator<Item = (Price, Quantity)> + '_ {
        self.asks
            .iter()
            .filter(|(_, &q)| q < 0)
            .map(|(&p, &q)| (p, -q))
    }

    /// Sum of all resting bid sizes
    pub fn total_bid_size(&self) -> Quantity {
        self.bid_levels().map(|(_, q)| q).sum()
    }

    /// Sum of all resting ask sizes (positive)
    pub fn total_ask_size(&self) -> Quantity {
        self.ask_levels().map(|(_, q)| q).sum()
    }

    #[inline]
    pub fn has_both_sides(&self) -> bool {
        self.best_bid().is_some() && self.best_ask().is_some()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.best_bid().is_none() && self.best_ask().is_none()
    }

    /// Best bid at or above best ask
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    /// Plain mid of best bid and best ask
    pub fn mid(&self) -> Option<f64> {
        let bid = self.best_bid_price()?;
        let ask = self.best_ask_price()?;
        Some((bid + ask) as f64 / 2.0)
    }

    /// Remove up to `size` from the bid level at `price`
    ///
    /// Returns the quantity actually removed. Emptied levels are dropped so
    /// later steps never see a zero-size best level.
    pub fn consume_bid(&mut self, price: Price, size: Quantity) -> Quantity {
        let Some(level) = self.bids.get_mut(&price) else {
            return 0;
        };
        let taken = size.clamp(0, *level);
        *level -= taken;
        if *level <= 0 {
            self.bids.remove(&price);
        }
        taken
    }

    /// Remove up to `size` (positive) from the ask level at `price`
    pub fn consume_ask(&mut self, price: Price, size: Quantity) -> Quantity {
        let Some(level) = self.asks.get_mut(&price) else {
            return 0;
        };
        let taken = size.clamp(0, -*level);
        *level += taken;
        if *level >= 0 {
            self.asks.remove(&price);
        }
        taken
    }
}
