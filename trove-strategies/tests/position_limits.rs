//! Position limits hold for every product after every tick
//!
//! Random books and starting positions for every traded product, fed through
//! the full round-four configuration. Whatever the engines decide, the merged
//! orders must keep `|position + buys| <= limit` and `|position - sells| <= limit`.

use proptest::prelude::*;
use std::collections::BTreeMap;
use trove_core::config::ConfigProfile;
use trove_core::{OrderBook, Product, Quantity, TradingState};
use trove_strategies::Trader;

fn reference_price(product: Product) -> i64 {
    match product {
        Product::RainforestResin => 10_000,
        Product::Kelp => 2_000,
        Product::SquidInk => 1_850,
        Product::Croissants => 4_300,
        Product::Jams => 6_500,
        Product::Djembes => 13_400,
        Product::PicnicBasket1 => 58_750,
        Product::PicnicBasket2 => 30_240,
        Product::VolcanicRock => 10_000,
        Product::VolcanicRockVoucher9500 => 510,
        Product::VolcanicRockVoucher9750 => 270,
        Product::VolcanicRockVoucher10000 => 80,
        Product::VolcanicRockVoucher10250 => 15,
        Product::VolcanicRockVoucher10500 => 3,
    }
}

fn book_strategy(reference: i64) -> impl Strategy<Value = OrderBook> {
    let levels = prop::collection::vec((1i64..8, 1i64..60), 0..4);
    (-6i64..6, levels.clone(), levels).prop_map(move |(shift, bids, asks)| {
        let mid = (reference + shift).max(10);
        let bids: Vec<_> = bids.iter().map(|&(off, q)| (mid - off, q)).collect();
        let asks: Vec<_> = asks.iter().map(|&(off, q)| (mid + off, q)).collect();
        OrderBook::from_sizes(&bids, &asks)
    })
}

fn tick_strategy() -> impl Strategy<Value = TradingState> {
    let limits = ConfigProfile::round_four().limits;
    let per_product: Vec<_> = Product::ALL
        .iter()
        .map(|&product| {
            let limit = limits[&product];
            (Just(product), book_strategy(reference_price(product)), -limit..=limit)
        })
        .collect();
    (per_product, 0i64..1_000_000).prop_map(|(products, timestamp)| {
        let mut state = TradingState::new(timestamp);
        for (product, book, position) in products {
            state = state.with_book(product, book).with_position(product, position);
        }
        state
    })
}

fn net_flows(orders: impl Iterator<Item = (Product, Quantity)>) -> BTreeMap<Product, (Quantity, Quantity)> {
    let mut flows: BTreeMap<Product, (Quantity, Quantity)> = BTreeMap::new();
    for (product, quantity) in orders {
        let entry = flows.entry(product).or_default();
        if quantity > 0 {
            entry.0 += quantity;
        } else {
            entry.1 += -quantity;
        }
    }
    flows
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_limits_hold_over_consecutive_ticks(ticks in prop::collection::vec(tick_strategy(), 1..4)) {
        let config = ConfigProfile::round_four();
        let limits = config.limits.clone();
        let mut trader = Trader::new(config);
        let mut trader_data = String::new();

        for tick in ticks {
            let input = tick.with_trader_data(trader_data.clone());
            let result = trader.run(&input);

            let flows = net_flows(result.all_orders().map(|o| (o.product, o.quantity)));
            for (product, (buys, sells)) in flows {
                let limit = limits[&product];
                let position = input.position.get(&product).copied().unwrap_or(0);
                prop_assert!(position + buys <= limit, "{} long breach: {} + {}", product, position, buys);
                prop_assert!(position - sells >= -limit, "{} short breach: {} - {}", product, position, sells);
            }
            prop_assert!(result.all_orders().all(|o| o.quantity != 0));
            prop_assert_eq!(result.conversions, 1);

            trader_data = result.trader_data;
        }
        prop_assert_eq!(trader.stats().dropped_violations, 0);
    }
}
