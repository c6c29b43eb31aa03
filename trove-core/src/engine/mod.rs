//! Tick plumbing
//!
//! - `tick`: harness input (`TradingState`) and output (`TickResult`)
//! - `context`: per-tick working set (books, ledger, state, orders)
//! - `traits`: the `Strategy` trait every engine implements

pub mod context;
pub mod tick;
pub mod traits;

pub use context::TickContext;
pub use tick::{TickResult, TradingState};
pub use traits::Strategy;
