//! Per-tick entry point
//!
//! [`Trader::run`] is the whole decision core: decode the carried state, run
//! every engine over one shared context, check the merged orders against the
//! position limits and encode the state for the next tick. It never fails;
//! bad inputs degrade to fewer orders.

use crate::market_maker::MarketMaker;
use crate::spread::SpreadEngine;
use crate::volatility::VolatilityEngine;
use tracing::{debug, error, info, warn};
use trove_core::{
    Order, PersistedState, PositionLedger, Product, Strategy, TickContext, TickResult, TraderConfig, TradingState,
};

/// Counters across ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraderStats {
    pub ticks_processed: u64,
    pub orders_emitted: u64,
    /// Products whose orders were dropped by the final limit check
    pub dropped_violations: u64,
    /// Ticks that started from an empty state because the blob was unusable
    pub state_resets: u64,
}

pub struct Trader {
    config: TraderConfig,
    market_makers: Vec<MarketMaker>,
    spreads: Vec<SpreadEngine>,
    volatility: Vec<VolatilityEngine>,
    stats: TraderStats,
}

impl Trader {
    pub fn new(config: TraderConfig) -> Self {
        let market_makers = config.market_making.iter().map(MarketMaker::new).collect();
        let spreads = config.spreads.iter().map(SpreadEngine::new).collect();
        let volatility = config
            .volatility
            .iter()
            .filter_map(|params| {
                let engine = VolatilityEngine::new(params);
                if engine.is_none() {
                    warn!("{} has no strike, skipping volatility engine", params.voucher);
                }
                engine
            })
            .collect();

        let trader = Self {
            config,
            market_makers,
            spreads,
            volatility,
            stats: TraderStats::default(),
        };
        for (name, product) in trader.engines() {
            info!("Engine {} on {}", name, product);
        }
        trader
    }

    /// Every engine in run order, with the product it is keyed on
    pub fn engines(&self) -> Vec<(&'static str, Product)> {
        let market_makers = self.market_makers.iter().map(|e| (e.name(), e.product()));
        let spreads = self.spreads.iter().map(|e| (e.name(), e.basket()));
        let volatility = self.volatility.iter().map(|e| (e.name(), e.voucher()));
        market_makers.chain(spreads).chain(volatility).collect()
    }

    pub fn config(&self) -> &TraderConfig {
        &self.config
    }

    pub fn stats(&self) -> TraderStats {
        self.stats
    }

    /// Decide one tick
    pub fn run(&mut self, input: &TradingState) -> TickResult {
        let mut state = match PersistedState::decode(&input.trader_data) {
            Ok(state) => state,
            Err(e) => {
                warn!("Discarding trader data: {}", e);
                self.stats.state_resets += 1;
                PersistedState::default()
            }
        };

        let ledger = PositionLedger::new(&self.config.limits, &input.position);
        let mut ctx = TickContext::new(input.timestamp, &input.order_depths, ledger, &mut state);

        for engine in &mut self.market_makers {
            engine.on_tick(&mut ctx);
        }
        for engine in &mut self.spreads {
            engine.on_tick(&mut ctx);
        }
        for engine in &mut self.volatility {
            engine.on_tick(&mut ctx);
        }

        let (ledger, orders) = ctx.finish();
        let orders = self.enforce_limits(&ledger, orders);

        let trader_data = match state.encode() {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Failed to encode trader data: {}", e);
                String::new()
            }
        };

        self.stats.ticks_processed += 1;
        self.stats.orders_emitted += orders.len() as u64;
        debug!(
            "Tick {}: {} orders, state {} bytes",
            input.timestamp,
            orders.len(),
            trader_data.len()
        );

        TickResult::from_orders(orders, self.config.conversions, trader_data)
    }

    /// Drop every order of a product whose merged orders breach its limit
    fn enforce_limits(&mut self, ledger: &PositionLedger, mut orders: Vec<Order>) -> Vec<Order> {
        while let Err(violation) = ledger.verify(&orders) {
            error!("Dropping orders: {}", violation);
            let product = violation.product();
            orders.retain(|o| o.product != product);
            self.stats.dropped_violations += 1;
        }
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trove_core::config::ConfigProfile;
    use trove_core::OrderBook;

    #[test]
    fn test_empty_tick() {
        let mut trader = Trader::new(ConfigProfile::round_four());
        let result = trader.run(&TradingState::new(0));

        assert_eq!(result.order_count(), 0);
        assert_eq!(result.conversions, 1);
        assert!(PersistedState::decode(&result.trader_data).is_ok());
        assert_eq!(trader.stats().ticks_processed, 1);
    }

    #[test]
    fn test_engines_in_run_order() {
        let trader = Trader::new(ConfigProfile::round_four());
        let engines = trader.engines();

        assert_eq!(engines.first(), Some(&("MarketMaker", Product::RainforestResin)));
        assert!(engines.contains(&("SpreadEngine", Product::PicnicBasket2)));
        assert_eq!(engines.last(), Some(&("VolatilityEngine", Product::VolcanicRockVoucher9750)));
        assert_eq!(
            engines.len(),
            trader.config().market_making.len() + trader.config().spreads.len() + trader.config().volatility.len()
        );
    }

    #[test]
    fn test_corrupt_state_is_reset() {
        let mut trader = Trader::new(ConfigProfile::market_making());
        let input = TradingState::new(100).with_trader_data("{not json");
        let result = trader.run(&input);

        assert_eq!(trader.stats().state_resets, 1);
        assert!(PersistedState::decode(&result.trader_data).is_ok());
    }

    #[test]
    fn test_enforce_limits_drops_breaching_product() {
        let mut trader = Trader::new(ConfigProfile::market_making());
        let limits = trader.config().limits.clone();
        let ledger = PositionLedger::new(&limits, &Default::default());
        let orders = vec![
            Order::buy(Product::Kelp, 2_000, 40),
            Order::buy(Product::Kelp, 1_999, 20),
            Order::sell(Product::RainforestResin, 10_002, 10),
        ];

        let kept = trader.enforce_limits(&ledger, orders);
        assert_eq!(kept, vec![Order::sell(Product::RainforestResin, 10_002, 10)]);
        assert_eq!(trader.stats().dropped_violations, 1);
    }

    #[test]
    fn test_state_carries_last_price() {
        let mut trader = Trader::new(ConfigProfile::market_making());
        let input = TradingState::new(0).with_book(
            Product::Kelp,
            OrderBook::from_sizes(&[(2_000, 20)], &[(2_003, 20)]),
        );
        let result = trader.run(&input);
        let state = PersistedState::decode(&result.trader_data).unwrap();
        assert_eq!(state.last_price(Product::Kelp), Some(2_001.5));
    }
}
