//! Trove Core - per-tick decision plumbing for a simulated trading competition
//!
//! Once per tick the harness hands over order books, positions, a timestamp
//! and the blob returned last tick. Trove turns that into orders per product.
//! This crate holds everything the decision engines share; the engines live
//! in `trove-strategies`.
//!
//! ## Architecture
//! - **Single-threaded, synchronous**: one tick is one computation
//! - **Typed state**: the persisted blob is JSON of a typed record
//! - **Structural limits**: every order is sized from a per-tick ledger
//! - **Immutable config**: built once, passed by reference
//!
//! ## Core Modules
//! - `core`: Product, Order, Side, error types
//! - `orderbook`: price-level book and depth analytics
//! - `risk`: position ledger
//! - `state`: persisted state and rolling windows
//! - `config`: trader configuration, profiles, loading
//! - `engine`: tick input/output, context, `Strategy` trait
//! - `utils`: logging

pub mod config;
pub mod core;
pub mod engine;
pub mod orderbook;
pub mod risk;
pub mod state;
pub mod utils;

pub use crate::core::{ConfigError, Order, Price, Product, Quantity, Side, StateError};
pub use config::{ConfigProfile, ProfileName, TraderConfig};
pub use engine::{Strategy, TickContext, TickResult, TradingState};
pub use orderbook::OrderBook;
pub use risk::PositionLedger;
pub use state::{PersistedState, RollingWindow};

// Re-export error types
pub use anyhow::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{
        ConfigProfile, FairValueParams, MarketMakingParams, SpreadParams, TakeStyleParams,
        TraderConfig, VolatilityParams,
    };
    pub use crate::core::{Order, Price, Product, Quantity, Side};
    pub use crate::engine::{Strategy, TickContext, TickResult, TradingState};
    pub use crate::orderbook::OrderBook;
    pub use crate::risk::PositionLedger;
    pub use crate::state::PersistedState;
    pub use crate::{Error, Result};
}
