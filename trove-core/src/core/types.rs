//! Core value types shared by every component
//!
//! - `Product`: closed set of tradable instruments, serialized as harness symbols
//! - `Side`: buy or sell
//! - `Order`: (product, price, signed quantity), immutable once emitted
//!
//! Prices are integer ticks and quantities are signed integers:
//! positive = buy, negative = sell.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Price in integer ticks
pub type Price = i64;

/// Signed quantity (positive = buy, negative = sell)
pub type Quantity = i64;

/// Tradable instrument
///
/// Serialized as the symbol string the harness uses, e.g. `"SQUID_INK"`.
/// Lowercase aliases let config files and env overrides name products too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Product {
    #[serde(rename = "RAINFOREST_RESIN", alias = "rainforest_resin")]
    RainforestResin,
    #[serde(rename = "KELP", alias = "kelp")]
    Kelp,
    #[serde(rename = "SQUID_INK", alias = "squid_ink")]
    SquidInk,
    #[serde(rename = "CROISSANTS", alias = "croissants")]
    Croissants,
    #[serde(rename = "JAMS", alias = "jams")]
    Jams,
    #[serde(rename = "DJEMBES", alias = "djembes")]
    Djembes,
    #[serde(rename = "PICNIC_BASKET1", alias = "picnic_basket1")]
    PicnicBasket1,
    #[serde(rename = "PICNIC_BASKET2", alias = "picnic_basket2")]
    PicnicBasket2,
    #[serde(rename = "VOLCANIC_ROCK", alias = "volcanic_rock")]
    VolcanicRock,
    #[serde(rename = "VOLCANIC_ROCK_VOUCHER_9500", alias = "volcanic_rock_voucher_9500")]
    VolcanicRockVoucher9500,
    #[serde(rename = "VOLCANIC_ROCK_VOUCHER_9750", alias = "volcanic_rock_voucher_9750")]
    VolcanicRockVoucher9750,
    #[serde(rename = "VOLCANIC_ROCK_VOUCHER_10000", alias = "volcanic_rock_voucher_10000")]
    VolcanicRockVoucher10000,
    #[serde(rename = "VOLCANIC_ROCK_VOUCHER_10250", alias = "volcanic_rock_voucher_10250")]
    VolcanicRockVoucher10250,
    #[serde(rename = "VOLCANIC_ROCK_VOUCHER_10500", alias = "volcanic_rock_voucher_10500")]
    VolcanicRockVoucher10500,
}

impl Product {
    /// Every product, in a stable order
    pub const ALL: [Product; 14] = [
        Product::RainforestResin,
        Product::Kelp,
        Product::SquidInk,
        Product::Croissants,
        Product::Jams,
        Product::Djembes,
        Product::PicnicBasket1,
        Product::PicnicBasket2,
        Product::VolcanicRock,
        Product::VolcanicRockVoucher9500,
        Product::VolcanicRockVoucher9750,
        Product::VolcanicRockVoucher10000,
        Product::VolcanicRockVoucher10250,
        Product::VolcanicRockVoucher10500,
    ];

    /// Harness symbol for this product
    pub const fn symbol(&self) -> &'static str {
        match self {
            Product::RainforestResin => "RAINFOREST_RESIN",
            Product::Kelp => "KELP",
            Product::SquidInk => "SQUID_INK",
            Product::Croissants => "CROISSANTS",
            Product::Jams => "JAMS",
            Product::Djembes => "DJEMBES",
            Product::PicnicBasket1 => "PICNIC_BASKET1",
            Product::PicnicBasket2 => "PICNIC_BASKET2",
            Product::VolcanicRock => "VOLCANIC_ROCK",
            Product::VolcanicRockVoucher9500 => "VOLCANIC_ROCK_VOUCHER_9500",
            Product::VolcanicRockVoucher9750 => "VOLCANIC_ROCK_VOUCHER_9750",
            Product::VolcanicRockVoucher10000 => "VOLCANIC_ROCK_VOUCHER_10000",
            Product::VolcanicRockVoucher10250 => "VOLCANIC_ROCK_VOUCHER_10250",
            Product::VolcanicRockVoucher10500 => "VOLCANIC_ROCK_VOUCHER_10500",
        }
    }

    /// Strike of a voucher, `None` for every other product
    pub const fn strike(&self) -> Option<Price> {
        match self {
            Product::VolcanicRockVoucher9500 => Some(9_500),
            Product::VolcanicRockVoucher9750 => Some(9_750),
            Product::VolcanicRockVoucher10000 => Some(10_000),
            Product::VolcanicRockVoucher10250 => Some(10_250),
            Product::VolcanicRockVoucher10500 => Some(10_500),
            _ => None,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when a symbol does not name a known product
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product symbol '{0}'")]
pub struct UnknownProduct(pub String);

impl FromStr for Product {
    type Err = UnknownProduct;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Product::ALL
            .iter()
            .copied()
            .find(|p| p.symbol() == s)
            .ok_or_else(|| UnknownProduct(s.to_string()))
    }
}

/// Order side (Buy or Sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// +1 for buys, -1 for sells
    #[inline]
    pub const fn sign(&self) -> Quantity {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    #[inline]
    pub const fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A limit order for one product
///
/// `quantity` is signed: positive buys, negative sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "symbol")]
    pub product: Product,
    pub price: Price,
    pub quantity: Quantity,
}

impl Order {
    #[inline]
    pub const fn new(product: Product, price: Price, quantity: Quantity) -> Self {
        Self {
            product,
            price,
            quantity,
        }
    }

    /// Buy `size` (must be positive) at `price`
    #[inline]
    pub const fn buy(product: Product, price: Price, size: Quantity) -> Self {
        Self::new(product, price, size)
    }

    /// Sell `size` (must be positive) at `price`
    #[inline]
    pub const fn sell(product: Product, price: Price, size: Quantity) -> Self {
        Self::new(product, price, -size)
    }

    #[inline]
    pub const fn side(&self) -> Side {
        if self.quantity >= 0 {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    /// Unsigned size
    #[inline]
    pub const fn size(&self) -> Quantity {
        self.quantity.abs()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ {}",
            self.side(),
            self.size(),
            self.product,
            self.price
        )
    }
}
