//! Typed state carried between ticks
//!
//! The harness hands back whatever string the previous tick returned. That
//! string is the JSON encoding of [`PersistedState`]. An empty string or any
//! missing field decodes to defaults, so the first tick and schema additions
//! both start from a clean slate.

pub mod rolling;

pub use rolling::RollingWindow;

use crate::core::{Product, StateError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-product estimator memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductState {
    /// Last mid the fair-value estimator observed
    pub last_price: Option<f64>,
    /// Recent mids for the adaptive reversion estimator
    pub price_history: RollingWindow,
    /// A price spike is being traded
    pub spike_active: bool,
    /// Price the spiking product is expected to revert to
    pub recovery_value: Option<f64>,
}

/// Per-basket spread memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadState {
    pub history: RollingWindow,
    pub prev_zscore: Option<f64>,
}

/// Per-voucher implied-vol deviation memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolState {
    pub deviations: RollingWindow,
    pub last_delta_exposure: f64,
}

/// Everything the trader remembers between ticks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub products: BTreeMap<Product, ProductState>,
    pub spreads: BTreeMap<Product, SpreadState>,
    pub vol: BTreeMap<Product, VolState>,
}

impl PersistedState {
    /// Decode a blob, `""` meaning a fresh start
    pub fn decode(blob: &str) -> Result<Self, StateError> {
        if blob.trim().is_empty() {
            return Ok(Self::default());
        }
        let state: Self = serde_json::from_str(blob)?;
        state.check()?;
        Ok(state)
    }

    pub fn encode(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Mutable record for `product`, created on first use
    pub fn product_mut(&mut self, product: Product) -> &mut ProductState {
        self.products.entry(product).or_default()
    }

    pub fn product(&self, product: Product) -> Option<&ProductState> {
        self.products.get(&product)
    }

    /// Last observed mid for `product`
    pub fn last_price(&self, product: Product) -> Option<f64> {
        self.products.get(&product).and_then(|s| s.last_price)
    }

    /// Snapshot of every product's last mid
    pub fn last_prices(&self) -> BTreeMap<Product, f64> {
        self.products
            .iter()
            .filter_map(|(&p, s)| s.last_price.map(|v| (p, v)))
            .collect()
    }

    pub fn spread_mut(&mut self, basket: Product) -> &mut SpreadState {
        self.spreads.entry(basket).or_default()
    }

    pub fn vol_mut(&mut self, voucher: Product) -> &mut VolState {
        self.vol.entry(voucher).or_default()
    }

    fn check(&self) -> Result<(), StateError> {
        for s in self.products.values() {
            s.price_history.check()?;
        }
        for s in self.spreads.values() {
            s.history.check()?;
        }
        for s in self.vol.values() {
            s.deviations.check()?;
        }
        Ok(())
    }
}
