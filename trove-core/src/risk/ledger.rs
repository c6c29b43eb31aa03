//! Per-tick position ledger
//!
//! Every order the trader emits is sized from this ledger. A product's buy
//! capacity is what can still be bought this tick without the position plus
//! all committed buys exceeding the limit; sell capacity is the mirror image.
//! Recording an order can never overdraw capacity, so the limit holds by
//! construction no matter how many components size against the same product.

use crate::core::{Order, Product, Quantity};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Inventory for one product over one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Position reported at the start of the tick
    pub position: Quantity,
    /// Symmetric hard limit
    pub limit: Quantity,
    /// Buy volume already committed this tick
    pub bought: Quantity,
    /// Sell volume already committed this tick (positive)
    pub sold: Quantity,
}

impl Inventory {
    pub fn new(position: Quantity, limit: Quantity) -> Self {
        Self {
            position,
            limit,
            bought: 0,
            sold: 0,
        }
    }

    #[inline]
    pub fn buy_capacity(&self) -> Quantity {
        (self.limit - self.position - self.bought).max(0)
    }

    #[inline]
    pub fn sell_capacity(&self) -> Quantity {
        (self.limit + self.position - self.sold).max(0)
    }

    /// Position if every committed order filled
    #[inline]
    pub fn projected(&self) -> Quantity {
        self.position + self.bought - self.sold
    }
}

/// Order set would breach a position limit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitViolation {
    #[error("{product}: position {position} + buys {buys} exceeds limit {limit}")]
    Long {
        product: Product,
        position: Quantity,
        buys: Quantity,
        limit: Quantity,
    },

    #[error("{product}: position {position} - sells {sells} exceeds limit -{limit}")]
    Short {
        product: Product,
        position: Quantity,
        sells: Quantity,
        limit: Quantity,
    },
}

impl LimitViolation {
    pub fn product(&self) -> Product {
        match self {
            LimitViolation::Long { product, .. } | LimitViolation::Short { product, .. } => {
                *product
            }
        }
    }
}

/// Committed volume for every product in one tick
///
/// Products with no configured limit have zero capacity both ways.
#[derive(Debug, Clone, Default)]
pub struct PositionLedger {
    inventories: BTreeMap<Product, Inventory>,
}

impl PositionLedger {
    /// Ledger seeded from configured limits and reported positions
    pub fn new(limits: &BTreeMap<Product, Quantity>, positions: &HashMap<Product, Quantity>) -> Self {
        let inventories = limits
            .iter()
            .map(|(&product, &limit)| {
                let position = positions.get(&product).copied().unwrap_or(0);
                (product, Inventory::new(position, limit))
            })
            .collect();
        Self { inventories }
    }

    pub fn inventory(&self, product: Product) -> Inventory {
        self.inventories.get(&product).copied().unwrap_or_default()
    }

    #[inline]
    pub fn position(&self, product: Product) -> Quantity {
        self.inventory(product).position
    }

    #[inline]
    pub fn limit(&self, product: Product) -> Quantity {
        self.inventory(product).limit
    }

    #[inline]
    pub fn buy_capacity(&self, product: Product) -> Quantity {
        self.inventory(product).buy_capacity()
    }

    #[inline]
    pub fn sell_capacity(&self, product: Product) -> Quantity {
        self.inventory(product).sell_capacity()
    }

    #[inline]
    pub fn projected(&self, product: Product) -> Quantity {
        self.inventory(product).projected()
    }

    /// Commit up to `size` of buy volume, returning what was committed
    pub fn record_buy(&mut self, product: Product, size: Quantity) -> Quantity {
        let Some(inv) = self.inventories.get_mut(&product) else {
            return 0;
        };
        let committed = size.clamp(0, inv.buy_capacity());
        inv.bought += committed;
        committed
    }

    /// Commit up to `size` (positive) of sell volume, returning what was committed
    pub fn record_sell(&mut self, product: Product, size: Quantity) -> Quantity {
        let Some(inv) = self.inventories.get_mut(&product) else {
            return 0;
        };
        let committed = size.clamp(0, inv.sell_capacity());
        inv.sold += committed;
        committed
    }

    /// Check a merged order set against the starting positions
    ///
    /// Independent of anything recorded in the ledger: sums buys and sells per
    /// product straight from the orders.
    pub fn verify(&self, orders: &[Order]) -> Result<(), LimitViolation> {
        let mut buys: BTreeMap<Product, Quantity> = BTreeMap::new();
        let mut sells: BTreeMap<Product, Quantity> = BTreeMap::new();
        for order in orders {
            if order.quantity > 0 {
                *buys.entry(order.product).or_insert(0) += order.quantity;
            } else {
                *sells.entry(order.product).or_insert(0) += -order.quantity;
            }
        }

        for (&product, &buy) in &buys {
            let inv = self.inventory(product);
            if buy > 0 && inv.position + buy > inv.limit {
                return Err(LimitViolation::Long {
                    product,
                    position: inv.position,
                    buys: buy,
                    limit: inv.limit,
                });
            }
        }
        for (&product, &sell) in &sells {
            let inv = self.inventory(product);
            if sell > 0 && inv.position - sell < -inv.limit {
                return Err(LimitViolation::Short {
                    product,
                    position: inv.position,
                    sells: sell,
                    limit: inv.limit,
                });
            }
        }
        Ok(())
    }
}
