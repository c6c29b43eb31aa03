//! Trove Strategies - decision engines run once per tick
//!
//! Every engine implements [`trove_core::Strategy`] and works over a shared
//! [`trove_core::TickContext`], so capacity committed by one engine is gone
//! for the next. [`Trader`] wires them together from a [`TraderConfig`].
//!
//! ## Engines
//!
//! ### [`MarketMaker`] - single-product quoting
//!
//! Fair value from a [`FairValueModel`], then take → clear → make over a
//! residual copy of the book. Products configured spike-aware sweep the book
//! toward a recovery level while a price spike is on.
//!
//! ### [`SpreadEngine`] - basket vs synthetic
//!
//! Z-score of `basket micro - synthetic micro` against a long-run mean over a
//! rolling window. Past the threshold the basket is traded against its
//! components toward a target position.
//!
//! ### [`VolatilityEngine`] - voucher implied vol
//!
//! Black-Scholes implied vol against a quadratic smile in moneyness; the
//! de-meaned gap sells or buys the voucher.
//!
//! ## Usage Example
//!
//! ```rust
//! use trove_core::prelude::*;
//! use trove_strategies::Trader;
//!
//! let mut trader = Trader::new(ConfigProfile::round_four());
//! let input = TradingState::new(0).with_book(
//!     Product::RainforestResin,
//!     OrderBook::from_sizes(&[(9_998, 5)], &[(10_002, 5)]),
//! );
//! let result = trader.run(&input);
//! assert_eq!(result.conversions, 1);
//! assert!(!result.orders_for(Product::RainforestResin).is_empty());
//! ```
//!
//! [`TraderConfig`]: trove_core::TraderConfig

pub mod basket;
pub mod fair_value;
pub mod market_maker;
pub mod placement;
pub mod pricing;
pub mod spike;
pub mod spread;
pub mod trader;
pub mod volatility;

#[cfg(test)]
mod test_helpers;

pub use fair_value::FairValueModel;
pub use market_maker::MarketMaker;
pub use spike::TakeStyle;
pub use spread::SpreadEngine;
pub use trader::{Trader, TraderStats};
pub use volatility::VolatilityEngine;
