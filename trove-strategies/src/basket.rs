//! Synthetic basket built from component books
//!
//! A basket of `wᵢ` units of each component can be replicated by trading the
//! components directly. The synthetic book prices that replication at the
//! components' best levels.

use trove_core::config::BasketComponent;
use trove_core::{OrderBook, Price, Product, Quantity};

/// Best synthetic bid and ask
///
/// Bid = Σ wᵢ·best_bidᵢ with depth minᵢ(bid_sizeᵢ / wᵢ); ask likewise. A side
/// exists only when every component has that side and the depth is non-zero.
pub fn synthetic_book<'b>(
    components: &[BasketComponent],
    lookup: impl Fn(Product) -> Option<&'b OrderBook>,
) -> OrderBook {
    let mut bid_price: Price = 0;
    let mut ask_price: Price = 0;
    let mut bid_depth: Option<Quantity> = None;
    let mut ask_depth: Option<Quantity> = None;
    let mut has_bid = !components.is_empty();
    let mut has_ask = !components.is_empty();

    for component in components {
        let book = lookup(component.product);
        let weight = component.weight;

        match book.and_then(OrderBook::best_bid) {
            Some((price, size)) if has_bid => {
                bid_price += price * weight;
                let depth = size / weight;
                bid_depth = Some(bid_depth.map_or(depth, |d| d.min(depth)));
            }
            _ => has_bid = false,
        }
        match book.and_then(OrderBook::best_ask) {
            Some((price, size)) if has_ask => {
                ask_price += price * weight;
                let depth = size / weight;
                ask_depth = Some(ask_depth.map_or(depth, |d| d.min(depth)));
            }
            _ => has_ask = false,
        }
    }

    let mut synthetic = OrderBook::new();
    if let (true, Some(depth)) = (has_bid, bid_depth) {
        if depth > 0 {
            synthetic.bids.insert(bid_price, depth);
        }
    }
    if let (true, Some(depth)) = (has_ask, ask_depth) {
        if depth > 0 {
            synthetic.asks.insert(ask_price, -depth);
        }
    }
    synthetic
}

/// Units of synthetic that fit in every component's remaining capacity
pub fn synthetic_capacity(components: &[BasketComponent], capacity: impl Fn(Product) -> Quantity) -> Quantity {
    components
        .iter()
        .map(|c| capacity(c.product) / c.weight)
        .min()
        .unwrap_or(0)
}
