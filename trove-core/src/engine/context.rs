//! Per-tick working context shared by every engine

use crate::core::{Order, Price, Product, Quantity};
use crate::orderbook::OrderBook;
use crate::risk::PositionLedger;
use crate::state::PersistedState;
use std::collections::{BTreeMap, HashMap};

/// Mutable view of one tick
///
/// Owns the position ledger and the growing order list; borrows the snapshot
/// books and the decoded state. Engines run in sequence over the same
/// context, so later engines see capacity already committed by earlier ones.
pub struct TickContext<'a> {
    pub timestamp: i64,
    books: &'a HashMap<Product, OrderBook>,
    pub ledger: PositionLedger,
    pub state: &'a mut PersistedState,
    prior_prices: BTreeMap<Product, f64>,
    orders: Vec<Order>,
}

impl<'a> TickContext<'a> {
    /// Context for one tick; last prices are captured before any engine runs
    pub fn new(
        timestamp: i64,
        books: &'a HashMap<Product, OrderBook>,
        ledger: PositionLedger,
        state: &'a mut PersistedState,
    ) -> Self {
        let prior_prices = state.last_prices();
        Self {
            timestamp,
            books,
            ledger,
            state,
            prior_prices,
            orders: Vec::new(),
        }
    }

    /// Snapshot book for `product`
    #[inline]
    pub fn book(&self, product: Product) -> Option<&'a OrderBook> {
        self.books.get(&product)
    }

    /// Last price of `product` as of the end of the previous tick
    ///
    /// Unaffected by updates engines make to the state during this tick.
    #[inline]
    pub fn prior_price(&self, product: Product) -> Option<f64> {
        self.prior_prices.get(&product).copied()
    }

    /// Buy up to `size` at `price`, bounded by remaining capacity
    ///
    /// Returns the quantity actually ordered.
    pub fn buy(&mut self, product: Product, price: Price, size: Quantity) -> Quantity {
        let committed = self.ledger.record_buy(product, size);
        if committed > 0 {
            self.orders.push(Order::buy(product, price, committed));
        }
        committed
    }

    /// Sell up to `size` (positive) at `price`, bounded by remaining capacity
    pub fn sell(&mut self, product: Product, price: Price, size: Quantity) -> Quantity {
        let committed = self.ledger.record_sell(product, size);
        if committed > 0 {
            self.orders.push(Order::sell(product, price, committed));
        }
        committed
    }

    /// Append orders already sized against [`Self::ledger`]
    pub fn extend_orders(&mut self, orders: impl IntoIterator<Item = Order>) {
        self.orders.extend(orders.into_iter().filter(|o| o.quantity != 0));
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Finish the tick, handing back the ledger and the orders
    pub fn finish(self) -> (PositionLedger, Vec<Order>) {
        (self.ledger, self.orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (HashMap<Product, OrderBook>, PositionLedger) {
        let books = HashMap::from([(
            Product::Kelp,
            OrderBook::from_sizes(&[(2_000, 10)], &[(2_002, 10)]),
        )]);
        let limits = BTreeMap::from([(Product::Kelp, 50)]);
        let positions = HashMap::from([(Product::Kelp, 45)]);
        (books, PositionLedger::new(&limits, &positions))
    }

    #[test]
    fn test_buy_is_capacity_bounded() {
        let (books, ledger) = fixture();
        let mut state = PersistedState::default();
        let mut ctx = TickContext::new(0, &books, ledger, &mut state);

        assert_eq!(ctx.buy(Product::Kelp, 2_002, 10), 5);
        assert_eq!(ctx.buy(Product::Kelp, 2_001, 10), 0);
        assert_eq!(ctx.sell(Product::Kelp, 2_000, 3), 3);

        let (ledger, orders) = ctx.finish();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0], Order::buy(Product::Kelp, 2_002, 5));
        assert_eq!(ledger.projected(Product::Kelp), 47);
    }

    #[test]
    fn test_prior_prices_frozen_at_start() {
        let (books, ledger) = fixture();
        let mut state = PersistedState::default();
        state.product_mut(Product::SquidInk).last_price = Some(1_900.0);

        let mut ctx = TickContext::new(100, &books, ledger, &mut state);
        ctx.state.product_mut(Product::SquidInk).last_price = Some(1_950.0);

        assert_eq!(ctx.prior_price(Product::SquidInk), Some(1_900.0));
        assert_eq!(ctx.state.last_price(Product::SquidInk), Some(1_950.0));
        assert!(ctx.book(Product::Kelp).is_some());
        assert!(ctx.book(Product::Jams).is_none());
    }

    #[test]
    fn test_extend_skips_zero_orders() {
        let (books, ledger) = fixture();
        let mut state = PersistedState::default();
        let mut ctx = TickContext::new(0, &books, ledger, &mut state);
        ctx.extend_orders([
            Order::buy(Product::Kelp, 2_000, 0),
            Order::sell(Product::Kelp, 2_003, 4),
        ]);
        assert_eq!(ctx.orders().len(), 1);
    }
}
