//! Order book snapshots and depth analytics
//!
//! - [`OrderBook`]: price-level book in the harness layout (asks negative)
//! - [`depth`]: micro-price, adverse-volume filtered mid, wall mid

pub mod book;
pub mod depth;

pub use book::OrderBook;
pub use depth::{ask_wall, bid_wall, filtered_mid, micro_price, micro_price_from_levels, wall_mid};
