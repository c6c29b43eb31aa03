//! Test helpers for building books and tick contexts
//!
//! Books are built with positive sizes on both sides; the ledger uses the
//! round-four limits so capacities match the live configuration.

use std::collections::HashMap;
use trove_core::config::ConfigProfile;
use trove_core::{OrderBook, PersistedState, PositionLedger, Price, Product, Quantity};

/// Owned pieces a `TickContext` borrows
pub struct ContextFixture {
    pub books: HashMap<Product, OrderBook>,
    pub ledger: PositionLedger,
    pub state: PersistedState,
}

/// Fixture with flat positions
pub fn context_fixture(books: &[(Product, OrderBook)]) -> ContextFixture {
    context_with_positions(books, &[])
}

/// Fixture with the given starting positions
pub fn context_with_positions(
    books: &[(Product, OrderBook)],
    positions: &[(Product, Quantity)],
) -> ContextFixture {
    let limits = ConfigProfile::round_four().limits;
    let positions: HashMap<Product, Quantity> = positions.iter().copied().collect();
    ContextFixture {
        books: books.iter().cloned().collect(),
        ledger: PositionLedger::new(&limits, &positions),
        state: PersistedState::default(),
    }
}

/// Book with `depth_levels` evenly spaced levels of `size_per_level` per side
///
/// # Example
/// ```ignore
/// // 9998/10002 touch, 3 levels 1 tick apart, 10 lots each
/// let book = create_depth_book(9_998, 10_002, 3, 1, 10);
/// ```
pub fn create_depth_book(
    best_bid: Price,
    best_ask: Price,
    depth_levels: usize,
    tick_size: Price,
    size_per_level: Quantity,
) -> OrderBook {
    assert!(depth_levels >= 1, "need at least one level");
    assert!(best_bid < best_ask, "bid must be < ask");

    let bids: Vec<_> = (0..depth_levels as Price)
        .map(|level| (best_bid - level * tick_size, size_per_level))
        .collect();
    let asks: Vec<_> = (0..depth_levels as Price)
        .map(|level| (best_ask + level * tick_size, size_per_level))
        .collect();
    OrderBook::from_sizes(&bids, &asks)
}

/// Book with a single level each side
pub fn create_basic_book(
    bid: Price,
    bid_size: Quantity,
    ask: Price,
    ask_size: Quantity,
) -> OrderBook {
    OrderBook::from_sizes(&[(bid, bid_size)], &[(ask, ask_size)])
}

#[test]
fn test_create_depth_book() {
    let book = create_depth_book(9_998, 10_002, 3, 2, 10);
    assert_eq!(book.bid_levels().count(), 3);
    assert_eq!(book.ask_levels().last(), Some((10_006, 10)));
    assert_eq!(book.total_bid_size(), 30);
}

#[test]
fn test_fixture_positions() {
    let fixture = context_with_positions(&[], &[(Product::Kelp, 50)]);
    assert_eq!(fixture.ledger.buy_capacity(Product::Kelp), 0);
    assert_eq!(fixture.ledger.sell_capacity(Product::Kelp), 100);
}
