//! Basket-vs-synthetic spread engine
//!
//! Tracks `basket micro - synthetic micro` over a rolling window and trades
//! the basket against its components when the spread's z-score (against a
//! configured long-run mean) crosses a threshold.
//!
//! ```text
//! z >=  threshold  ->  short basket, long components   (target -N)
//! z <= -threshold  ->  long basket, short components   (target +N)
//! ```

use crate::basket::{synthetic_book, synthetic_capacity};
use tracing::{debug, info};
use trove_core::config::{BasketComponent, SpreadParams};
use trove_core::orderbook::micro_price;
use trove_core::{OrderBook, Product, Quantity, Strategy, TickContext};

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadEngine {
    params: SpreadParams,
}

impl SpreadEngine {
    pub fn new(params: &SpreadParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn basket(&self) -> Product {
        self.params.basket
    }

    pub fn components(&self) -> &[BasketComponent] {
        &self.params.components
    }

    /// Observe this tick's spread and return its z-score once the window is full
    fn observe(&self, ctx: &mut TickContext<'_>, basket_book: &OrderBook, synthetic: &OrderBook) -> Option<f64> {
        let basket_micro = micro_price(basket_book)?;
        let synthetic_micro = micro_price(synthetic)?;
        let spread = basket_micro - synthetic_micro;

        let record = ctx.state.spread_mut(self.params.basket);
        if record.history.capacity() != self.params.spread_window {
            record.history.resize(self.params.spread_window);
        }
        record.history.push(spread);

        if !record.history.is_full() {
            debug!(
                "{}: spread {:.2}, window {}/{}",
                self.params.basket,
                spread,
                record.history.len(),
                self.params.spread_window
            );
            return None;
        }

        let std = record.history.std_dev()?;
        if std == 0.0 {
            debug!("{}: flat spread history, no signal", self.params.basket);
            record.prev_zscore = None;
            return None;
        }

        let zscore = (spread - self.params.spread_mean) / std;
        record.prev_zscore = Some(zscore);
        debug!(
            "{}: spread {:.2}, std {:.3}, z {:.3}",
            self.params.basket, spread, std, zscore
        );
        Some(zscore)
    }

    /// Move the basket position toward `target` against the synthetic
    fn execute(&self, ctx: &mut TickContext<'_>, target: Quantity, basket_book: &OrderBook, synthetic: &OrderBook) {
        let basket = self.params.basket;
        let components = &self.params.components;
        let wanted = target - ctx.ledger.projected(basket);
        if wanted == 0 {
            return;
        }

        // Buying the basket sells the synthetic, and the other way round
        let buying = wanted > 0;
        let (basket_level, synthetic_level) = if buying {
            (basket_book.best_ask(), synthetic.best_bid())
        } else {
            (basket_book.best_bid(), synthetic.best_ask())
        };
        let (Some((basket_price, basket_size)), Some((_, synthetic_size))) = (basket_level, synthetic_level) else {
            debug!("{}: no crossing liquidity toward {}", basket, target);
            return;
        };

        let ledger = &ctx.ledger;
        let (basket_capacity, component_capacity) = if buying {
            (
                ledger.buy_capacity(basket),
                synthetic_capacity(components, |p| ledger.sell_capacity(p)),
            )
        } else {
            (
                ledger.sell_capacity(basket),
                synthetic_capacity(components, |p| ledger.buy_capacity(p)),
            )
        };
        let volume = basket_size
            .min(synthetic_size)
            .min(wanted.abs())
            .min(basket_capacity)
            .min(component_capacity);
        if volume <= 0 {
            return;
        }

        let mut legs = Vec::with_capacity(components.len());
        for component in components {
            let book = ctx.book(component.product);
            let level = if buying {
                book.and_then(OrderBook::best_bid_price)
            } else {
                book.and_then(OrderBook::best_ask_price)
            };
            // synthetic side exists, so every component has the level
            let Some(price) = level else { return };
            legs.push((component.product, price, volume * component.weight));
        }

        info!(
            "{}: {} {} @ {} against synthetic, target {}",
            basket,
            if buying { "buy" } else { "sell" },
            volume,
            basket_price,
            target
        );
        if buying {
            ctx.buy(basket, basket_price, volume);
            for (product, price, size) in legs {
                ctx.sell(product, price, size);
            }
        } else {
            ctx.sell(basket, basket_price, volume);
            for (product, price, size) in legs {
                ctx.buy(product, price, size);
            }
        }
    }
}

impl Strategy for SpreadEngine {
    fn on_tick(&mut self, ctx: &mut TickContext<'_>) {
        let basket = self.params.basket;
        let Some(basket_book) = ctx.book(basket) else {
            debug!("{}: no basket book", basket);
            return;
        };
        let synthetic = synthetic_book(&self.params.components, |p| ctx.book(p));

        let Some(zscore) = self.observe(ctx, basket_book, &synthetic) else {
            return;
        };

        let target = self.params.target_position;
        let position = ctx.ledger.position(basket);
        if zscore >= self.params.zscore_threshold && position != -target {
            self.execute(ctx, -target, basket_book, &synthetic);
        } else if zscore <= -self.params.zscore_threshold && position != target {
            self.execute(ctx, target, basket_book, &synthetic);
        }
    }

    fn name(&self) -> &'static str {
        "SpreadEngine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{context_fixture, context_with_positions, create_basic_book, ContextFixture};
    use trove_core::config::ConfigProfile;
    use trove_core::{Order, PersistedState};

    fn basket_two_params(window: usize) -> SpreadParams {
        SpreadParams {
            spread_window: window,
            ..ConfigProfile::round_four().spreads[1].clone()
        }
    }

    fn basket_books(basket_bid: i64, basket_ask: i64) -> Vec<(Product, OrderBook)> {
        vec![
            (Product::PicnicBasket2, create_basic_book(basket_bid, 10, basket_ask, 10)),
            (Product::Croissants, create_basic_book(4_300, 80, 4_302, 80)),
            (Product::Jams, create_basic_book(6_500, 40, 6_502, 40)),
        ]
    }

    #[test]
    fn test_window_not_full_no_orders() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_fixture(&basket_books(30_300, 30_310));
        let mut engine = SpreadEngine::new(&basket_two_params(3));
        let mut ctx = TickContext::new(0, &books, ledger, &mut state);
        engine.on_tick(&mut ctx);

        assert!(ctx.orders().is_empty());
        drop(ctx);
        assert_eq!(state.spreads[&Product::PicnicBasket2].history.len(), 1);
    }

    #[test]
    fn test_constant_spread_has_no_signal() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_fixture(&basket_books(30_300, 30_310));
        let mut engine = SpreadEngine::new(&basket_two_params(3));
        for _ in 0..5 {
            let mut ctx = TickContext::new(0, &books, ledger.clone(), &mut state);
            engine.on_tick(&mut ctx);
            assert!(ctx.orders().is_empty());
        }
        assert_eq!(state.spreads[&Product::PicnicBasket2].prev_zscore, None);
    }

    #[test]
    fn test_rich_basket_is_sold_against_components() {
        let mut state = PersistedState::default();
        let mut engine = SpreadEngine::new(&basket_two_params(3));

        // Synthetic mid: 4*4301 + 2*6501 = 30206
        // Spreads 194, 195, 200 sit far above the long-run mean
        for (bid, ask) in [(30_395, 30_405), (30_396, 30_406), (30_400, 30_412)] {
            let fixture = context_fixture(&basket_books(bid, ask));
            let mut ctx = TickContext::new(0, &fixture.books, fixture.ledger, &mut state);
            engine.on_tick(&mut ctx);
            let (_, orders) = ctx.finish();
            if bid == 30_400 {
                // Basket bid depth 10, synthetic ask depth min(80/4, 40/2) = 20
                assert_eq!(
                    orders,
                    vec![
                        Order::sell(Product::PicnicBasket2, 30_400, 10),
                        Order::buy(Product::Croissants, 4_302, 40),
                        Order::buy(Product::Jams, 6_502, 20),
                    ]
                );
            } else {
                assert!(orders.is_empty());
            }
        }
        assert!(state.spreads[&Product::PicnicBasket2].prev_zscore.unwrap() > 6.0);
    }

    #[test]
    fn test_at_target_does_nothing() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_with_positions(&basket_books(30_400, 30_412), &[(Product::PicnicBasket2, -100)]);
        {
            let record = state.spread_mut(Product::PicnicBasket2);
            record.history.resize(3);
            record.history.push(194.0);
            record.history.push(195.0);
        }
        let mut engine = SpreadEngine::new(&basket_two_params(3));
        let mut ctx = TickContext::new(0, &books, ledger, &mut state);
        engine.on_tick(&mut ctx);
        assert!(ctx.orders().is_empty());
    }

    #[test]
    fn test_volume_bounded_by_component_capacity() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_with_positions(&basket_books(30_400, 30_412), &[(Product::Jams, 344)]);
        {
            let record = state.spread_mut(Product::PicnicBasket2);
            record.history.resize(3);
            record.history.push(194.0);
            record.history.push(195.0);
        }
        let mut engine = SpreadEngine::new(&basket_two_params(3));
        let mut ctx = TickContext::new(0, &books, ledger, &mut state);
        engine.on_tick(&mut ctx);

        // Jams buy capacity 6 allows 3 baskets
        let (ledger, orders) = ctx.finish();
        assert_eq!(orders[0], Order::sell(Product::PicnicBasket2, 30_400, 3));
        assert_eq!(ledger.buy_capacity(Product::Jams), 0);
    }
}
