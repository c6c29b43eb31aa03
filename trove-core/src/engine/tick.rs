//! Harness-facing tick input and output

use crate::core::{Order, Product, Quantity};
use crate::orderbook::OrderBook;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Snapshot handed to the trader once per tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingState {
    pub timestamp: i64,

    /// Book per product; symbols the trader does not know are dropped
    #[serde(default, deserialize_with = "known_products")]
    pub order_depths: HashMap<Product, OrderBook>,

    /// Reported inventory per product; absent means flat
    #[serde(default, deserialize_with = "known_products")]
    pub position: HashMap<Product, Quantity>,

    /// Blob returned by the previous tick
    #[serde(default, alias = "traderData")]
    pub trader_data: String,
}

impl TradingState {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    pub fn with_book(mut self, product: Product, book: OrderBook) -> Self {
        self.order_depths.insert(product, book);
        self
    }

    pub fn with_position(mut self, product: Product, position: Quantity) -> Self {
        self.position.insert(product, position);
        self
    }

    pub fn with_trader_data(mut self, trader_data: impl Into<String>) -> Self {
        self.trader_data = trader_data.into();
        self
    }
}

/// Everything the trader returns for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    /// Orders grouped by product
    pub orders: BTreeMap<Product, Vec<Order>>,
    pub conversions: i64,
    pub trader_data: String,
}

impl TickResult {
    /// Group a flat order list by product, preserving emission order
    pub fn from_orders(orders: Vec<Order>, conversions: i64, trader_data: String) -> Self {
        let mut grouped: BTreeMap<Product, Vec<Order>> = BTreeMap::new();
        for order in orders {
            grouped.entry(order.product).or_default().push(order);
        }
        Self {
            orders: grouped,
            conversions,
            trader_data,
        }
    }

    /// Orders for one product
    pub fn orders_for(&self, product: Product) -> &[Order] {
        self.orders.get(&product).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.values().flatten()
    }

    pub fn order_count(&self) -> usize {
        self.orders.values().map(Vec::len).sum()
    }
}

/// Deserialize a symbol-keyed map, skipping symbols that are not a [`Product`]
fn known_products<'de, D, V>(deserializer: D) -> Result<HashMap<Product, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw: HashMap<String, V> = HashMap::deserialize(deserializer)?;
    let mut known = HashMap::with_capacity(raw.len());
    for (symbol, value) in raw {
        match symbol.parse::<Product>() {
            Ok(product) => {
                known.insert(product, value);
            }
            Err(e) => debug!("Ignoring {}", e),
        }
    }
    Ok(known)
}
