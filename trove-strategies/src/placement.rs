//! Order-placement primitives: take, clear, make
//!
//! Each step takes the book by value and hands back the residual after its
//! own fills, so the next step never sizes against liquidity that is already
//! spoken for. Every size is drawn from the shared [`PositionLedger`].
//!
//! ```text
//! book ──take──> residual ──clear──> residual ──make──> quotes
//! ```

use trove_core::{Order, OrderBook, PositionLedger, Price, Product, Quantity};

/// Orders from one placement step plus the book they leave behind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    pub orders: Vec<Order>,
    pub book: OrderBook,
}

impl Placement {
    pub fn untouched(book: OrderBook) -> Self {
        Self {
            orders: Vec::new(),
            book,
        }
    }
}

/// Parameters for taking mispriced resting orders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TakeParams {
    pub take_width: f64,
    pub prevent_adverse: bool,
    pub adverse_volume: Quantity,
}

/// Parameters for passive quoting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MakeParams {
    pub disregard_edge: f64,
    pub join_edge: f64,
    pub default_edge: f64,
    pub soft_position_limit: Option<Quantity>,
}

/// Round a fractional price to a tick, ties to even
#[inline]
pub fn round_price(price: f64) -> Price {
    price.round_ties_even() as Price
}

/// Hit the best level on each side that is at least `take_width` through fair
///
/// With `prevent_adverse`, levels larger than `adverse_volume` are left alone:
/// size that big usually belongs to someone who knows more.
pub fn take(
    product: Product,
    fair: f64,
    mut book: OrderBook,
    ledger: &mut PositionLedger,
    params: &TakeParams,
) -> Placement {
    let mut orders = Vec::new();
    let size_ok = |size: Quantity| !params.prevent_adverse || size <= params.adverse_volume;

    if let Some((ask, size)) = book.best_ask() {
        if size_ok(size) && (ask as f64) <= fair - params.take_width {
            let qty = ledger.record_buy(product, size);
            if qty > 0 {
                orders.push(Order::buy(product, ask, qty));
                book.consume_ask(ask, qty);
            }
        }
    }

    if let Some((bid, size)) = book.best_bid() {
        if size_ok(size) && (bid as f64) >= fair + params.take_width {
            let qty = ledger.record_sell(product, size);
            if qty > 0 {
                orders.push(Order::sell(product, bid, qty));
                book.consume_bid(bid, qty);
            }
        }
    }

    Placement { orders, book }
}

/// Work inventory back toward flat against levels at fair ± `clear_width`
///
/// Long after the takes: sell at `round(fair + width)` as much as the bids at
/// or above that price can absorb. Short: the mirror image. No crossing
/// volume, no order.
pub fn clear(
    product: Product,
    fair: f64,
    clear_width: f64,
    mut book: OrderBook,
    ledger: &mut PositionLedger,
) -> Placement {
    let mut orders = Vec::new();
    let net = ledger.projected(product);

    if net > 0 {
        let price = round_price(fair + clear_width);
        let crossing: Quantity = book
            .bid_levels()
            .filter(|&(p, _)| p >= price)
            .map(|(_, q)| q)
            .sum();
        let qty = ledger.record_sell(product, crossing.min(net));
        if qty > 0 {
            orders.push(Order::sell(product, price, qty));
            consume_bids_down_to(&mut book, price, qty);
        }
    } else if net < 0 {
        let price = round_price(fair - clear_width);
        let crossing: Quantity = book
            .ask_levels()
            .filter(|&(p, _)| p <= price)
            .map(|(_, q)| q)
            .sum();
        let qty = ledger.record_buy(product, crossing.min(-net));
        if qty > 0 {
            orders.push(Order::buy(product, price, qty));
            consume_asks_up_to(&mut book, price, qty);
        }
    }

    Placement { orders, book }
}

/// Bid and ask quote prices around fair
///
/// Looks for the nearest resting ask above `fair + disregard_edge` (bid below
/// `fair - disregard_edge`). Within `join_edge` of fair it is joined,
/// otherwise pennied by one tick. With no such level the quote sits at
/// `round(fair ± default_edge)`. Past the soft limit the reducing side is
/// improved by a tick.
pub fn quote_prices(fair: f64, book: &OrderBook, params: &MakeParams, position: Quantity) -> (Price, Price) {
    let ask_above = book
        .ask_levels()
        .map(|(p, _)| p)
        .find(|&p| (p as f64) > fair + params.disregard_edge);
    let bid_below = book
        .bid_levels()
        .map(|(p, _)| p)
        .find(|&p| (p as f64) < fair - params.disregard_edge);

    let mut ask = match ask_above {
        Some(level) if (level as f64 - fair).abs() <= params.join_edge => level,
        Some(level) => level - 1,
        None => round_price(fair + params.default_edge),
    };
    let mut bid = match bid_below {
        Some(level) if (fair - level as f64).abs() <= params.join_edge => level,
        Some(level) => level + 1,
        None => round_price(fair - params.default_edge),
    };

    if let Some(soft) = params.soft_position_limit {
        if position > soft {
            ask -= 1;
        } else if position < -soft {
            bid += 1;
        }
    }

    (bid, ask)
}

/// Quote both sides with all remaining capacity
pub fn make(
    product: Product,
    fair: f64,
    book: OrderBook,
    ledger: &mut PositionLedger,
    params: &MakeParams,
) -> Placement {
    let (bid, ask) = quote_prices(fair, &book, params, ledger.position(product));
    let mut orders = Vec::with_capacity(2);

    let buy = ledger.record_buy(product, ledger.buy_capacity(product));
    if buy > 0 {
        orders.push(Order::buy(product, bid, buy));
    }
    let sell = ledger.record_sell(product, ledger.sell_capacity(product));
    if sell > 0 {
        orders.push(Order::sell(product, ask, sell));
    }

    Placement { orders, book }
}

fn consume_bids_down_to(book: &mut OrderBook, min_price: Price, mut qty: Quantity) {
    let levels: Vec<_> = book.bid_levels().filter(|&(p, _)| p >= min_price).collect();
    for (price, _) in levels {
        if qty <= 0 {
            break;
        }
        qty -= book.consume_bid(price, qty);
    }
}

fn consume_asks_up_to(book: &mut OrderBook, max_price: Price, mut qty: Quantity) {
    let levels: Vec<_> = book.ask_levels().filter(|&(p, _)| p <= max_price).collect();
    for (price, _) in levels {
        if qty <= 0 {
            break;
        }
        qty -= book.consume_ask(price, qty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::context_with_positions;

    const KELP: Product = Product::Kelp;

    fn ledger(position: Quantity) -> PositionLedger {
        context_with_positions(&[], &[(KELP, position)]).ledger
    }

    fn take_params(take_width: f64) -> TakeParams {
        TakeParams {
            take_width,
            prevent_adverse: false,
            adverse_volume: 0,
        }
    }

    #[test]
    fn test_take_only_through_width() {
        let book = OrderBook::from_sizes(&[(1_998, 5)], &[(1_999, 4)]);

        // Ask 1999 > 2000 - 2: nothing
        let mut l = ledger(0);
        let p = take(KELP, 2_000.0, book.clone(), &mut l, &take_params(2.0));
        assert!(p.orders.is_empty());
        assert_eq!(p.book, book);

        // Ask 1999 <= 2000 - 1: buy it all
        let mut l = ledger(0);
        let p = take(KELP, 2_000.0, book, &mut l, &take_params(1.0));
        assert_eq!(p.orders, vec![Order::buy(KELP, 1_999, 4)]);
        assert!(p.book.best_ask().is_none());
        assert_eq!(l.projected(KELP), 4);
    }

    #[test]
    fn test_take_sells_rich_bid_within_capacity() {
        let book = OrderBook::from_sizes(&[(2_003, 30)], &[(2_010, 5)]);
        let mut l = ledger(-40);
        let p = take(KELP, 2_000.0, book, &mut l, &take_params(2.0));
        assert_eq!(p.orders, vec![Order::sell(KELP, 2_003, 10)]);
        assert_eq!(p.book.best_bid(), Some((2_003, 20)));
    }

    #[test]
    fn test_take_skips_adverse_size() {
        let book = OrderBook::from_sizes(&[], &[(1_990, 20)]);
        let params = TakeParams {
            take_width: 2.0,
            prevent_adverse: true,
            adverse_volume: 15,
        };
        let mut l = ledger(0);
        assert!(take(KELP, 2_000.0, book, &mut l, &params).orders.is_empty());
    }

    #[test]
    fn test_clear_long_inventory() {
        let book = OrderBook::from_sizes(&[(2_001, 3), (2_000, 4), (1_999, 50)], &[(2_003, 5)]);
        let mut l = ledger(10);
        let p = clear(KELP, 2_000.0, 0.0, book, &mut l);

        assert_eq!(p.orders, vec![Order::sell(KELP, 2_000, 7)]);
        assert_eq!(p.book.best_bid(), Some((1_999, 50)));
        assert_eq!(l.projected(KELP), 3);
    }

    #[test]
    fn test_clear_short_inventory_capped_by_net() {
        let book = OrderBook::from_sizes(&[(1_995, 5)], &[(1_999, 8), (2_000, 8)]);
        let mut l = ledger(-5);
        let p = clear(KELP, 2_000.0, 0.0, book, &mut l);

        assert_eq!(p.orders, vec![Order::buy(KELP, 2_000, 5)]);
        assert_eq!(p.book.best_ask(), Some((1_999, 3)));
    }

    #[test]
    fn test_clear_without_crossing_volume() {
        let book = OrderBook::from_sizes(&[(1_998, 10)], &[(2_002, 10)]);
        let mut l = ledger(10);
        let p = clear(KELP, 2_000.0, 0.0, book.clone(), &mut l);
        assert!(p.orders.is_empty());
        assert_eq!(p.book, book);

        let mut flat = ledger(0);
        assert!(clear(KELP, 2_000.0, 0.0, book, &mut flat).orders.is_empty());
    }

    fn make_params(disregard: f64, join: f64, default: f64) -> MakeParams {
        MakeParams {
            disregard_edge: disregard,
            join_edge: join,
            default_edge: default,
            soft_position_limit: None,
        }
    }

    #[test]
    fn test_quote_prices_penny_and_join() {
        let book = OrderBook::from_sizes(&[(9_996, 10)], &[(10_004, 10)]);

        // Far levels get pennied
        assert_eq!(
            quote_prices(10_000.0, &book, &make_params(1.0, 2.0, 1.0), 0),
            (9_997, 10_003)
        );
        // Within join edge: join
        assert_eq!(
            quote_prices(10_000.0, &book, &make_params(1.0, 4.0, 1.0), 0),
            (9_996, 10_004)
        );
    }

    #[test]
    fn test_quote_prices_default_edge_when_levels_too_close() {
        let book = OrderBook::from_sizes(&[(9_998, 5)], &[(10_002, 5)]);
        assert_eq!(
            quote_prices(10_000.0, &book, &make_params(2.0, 2.0, 1.0), 0),
            (9_999, 10_001)
        );
    }

    #[test]
    fn test_quote_prices_soft_limit() {
        let book = OrderBook::new();
        let params = MakeParams {
            soft_position_limit: Some(10),
            ..make_params(1.0, 2.0, 2.0)
        };
        assert_eq!(quote_prices(100.0, &book, &params, 11), (98, 101));
        assert_eq!(quote_prices(100.0, &book, &params, -11), (99, 102));
        assert_eq!(quote_prices(100.0, &book, &params, 10), (98, 102));
    }

    #[test]
    fn test_make_uses_remaining_capacity() {
        let book = OrderBook::from_sizes(&[(1_990, 5)], &[(2_010, 5)]);
        let mut l = ledger(20);
        l.record_buy(KELP, 5);

        let p = make(KELP, 2_000.0, book, &mut l, &make_params(1.0, 0.0, 1.0));
        assert_eq!(
            p.orders,
            vec![Order::buy(KELP, 1_991, 25), Order::sell(KELP, 2_009, 70)]
        );
        assert_eq!(l.buy_capacity(KELP), 0);
        assert_eq!(l.sell_capacity(KELP), 0);
    }

    #[test]
    fn test_make_at_limit_quotes_one_side() {
        let mut l = ledger(50);
        let p = make(KELP, 2_000.0, OrderBook::new(), &mut l, &make_params(1.0, 0.0, 1.0));
        assert_eq!(p.orders, vec![Order::sell(KELP, 2_001, 100)]);
    }

    #[test]
    fn test_round_price_ties_even() {
        assert_eq!(round_price(2_001.5), 2_002);
        assert_eq!(round_price(2_002.5), 2_002);
        assert_eq!(round_price(1_999.4), 1_999);
    }
}
