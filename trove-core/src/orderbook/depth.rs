/// Depth analysis over a full price-level book
///
/// Pure functions: nothing here touches persisted state, so fallbacks to a
/// previous tick's value belong to the caller.
use super::book::OrderBook;
use crate::core::{Price, Quantity};

/// Size-weighted mid of the best levels
///
/// Formula: `(bid * ask_size + ask * bid_size) / (bid_size + ask_size)`.
/// Leans toward the side with *less* size, which is where the next trade is
/// more likely to print.
///
/// # Returns
/// * `Some(price)` - both sides present
/// * `None` - either side missing
#[inline]
pub fn micro_price(book: &OrderBook) -> Option<f64> {
    let (bid, bid_size) = book.best_bid()?;
    let (ask, ask_size) = book.best_ask()?;
    Some(micro_price_from_levels(bid, bid_size, ask, ask_size))
}

/// Micro-price from raw best levels; zero total size falls back to the plain mid
#[inline]
pub fn micro_price_from_levels(
    bid: Price,
    bid_size: Quantity,
    ask: Price,
    ask_size: Quantity,
) -> f64 {
    let bid_size = bid_size.abs();
    let ask_size = ask_size.abs();
    let total = bid_size + ask_size;
    if total == 0 {
        return (bid + ask) as f64 / 2.0;
    }
    (bid as f64 * ask_size as f64 + ask as f64 * bid_size as f64) / total as f64
}

/// Mid of the best levels that carry at least `min_size`
///
/// Small levels are often quotes placed to bait takers; filtering them out
/// gives a steadier fair. Returns `None` when either side has no level at or
/// above the floor.
pub fn filtered_mid(book: &OrderBook, min_size: Quantity) -> Option<f64> {
    let bid = book
        .bid_levels()
        .find(|&(_, q)| q >= min_size)
        .map(|(p, _)| p)?;
    let ask = book
        .ask_levels()
        .find(|&(_, q)| q >= min_size)
        .map(|(p, _)| p)?;
    Some((bid + ask) as f64 / 2.0)
}

/// Bid level with the largest resting size
///
/// Ties go to the better (higher) price.
pub fn bid_wall(book: &OrderBook) -> Option<(Price, Quantity)> {
    book.bid_levels()
        .fold(None, |best: Option<(Price, Quantity)>, (p, q)| match best {
            Some((_, bq)) if bq >= q => best,
            _ => Some((p, q)),
        })
}

/// Ask level with the largest resting size
///
/// Ties go to the better (lower) price.
pub fn ask_wall(book: &OrderBook) -> Option<(Price, Quantity)> {
    book.ask_levels()
        .fold(None, |best: Option<(Price, Quantity)>, (p, q)| match best {
            Some((_, bq)) if bq >= q => best,
            _ => Some((p, q)),
        })
}

/// Mid of the bid wall and the ask wall
///
/// # Returns
/// * both walls - their mid
/// * one wall - that wall's price
/// * empty book - `None`
pub fn wall_mid(book: &OrderBook) -> Option<f64> {
    match (bid_wall(book), ask_wall(book)) {
        (Some((bid, _)), Some((ask, _))) => Some((bid + ask) as f64 / 2.0),
        (Some((bid, _)), None) => Some(bid as f64),
        (None, Some((ask, _))) => Some(ask as f64),
        (None, None) => None,
    }
}
