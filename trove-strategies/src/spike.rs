//! Spike-aware taking
//!
//! A jump larger than `spike_ub` away from last tick's price flags a spike and
//! sets a recovery level `offset` back toward where the price came from. While
//! flagged the instrument sweeps the book toward that level instead of running
//! take/clear/make. The flag clears once the move shrinks below `spike_lb`.

use crate::placement::Placement;
use tracing::{debug, info};
use trove_core::config::TakeStyleParams;
use trove_core::state::ProductState;
use trove_core::{Order, OrderBook, PositionLedger, Product};

/// Spike thresholds for one product
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeParams {
    pub spike_lb: f64,
    pub spike_ub: f64,
    pub offset: f64,
}

/// How a market-made product takes liquidity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TakeStyle {
    #[default]
    Standard,
    SpikeAware(SpikeParams),
}

impl From<&TakeStyleParams> for TakeStyle {
    fn from(params: &TakeStyleParams) -> Self {
        match *params {
            TakeStyleParams::Standard => TakeStyle::Standard,
            TakeStyleParams::SpikeAware {
                spike_lb,
                spike_ub,
                offset,
            } => TakeStyle::SpikeAware(SpikeParams {
                spike_lb,
                spike_ub,
                offset,
            }),
        }
    }
}

impl SpikeParams {
    /// Orders that replace take/clear/make this tick, if a spike is on
    ///
    /// `reference` is the product's price from the previous tick; without one
    /// there is nothing to measure a jump against.
    pub fn check(
        &self,
        product: Product,
        fair: f64,
        reference: Option<f64>,
        record: &mut ProductState,
        book: OrderBook,
        ledger: &mut PositionLedger,
    ) -> Option<Placement> {
        let reference = reference?;
        let jump = (fair - reference).abs();

        if record.spike_active {
            if jump < self.spike_lb {
                info!(
                    "{} spike over: fair {:.2} within {} of {:.2}",
                    product, fair, self.spike_lb, reference
                );
                record.spike_active = false;
                record.recovery_value = None;
                return None;
            }

            let recovery = record.recovery_value.unwrap_or(reference);
            debug!(
                "{} riding spike: fair {:.2}, recovery {:.2}",
                product, fair, recovery
            );
            return Some(if fair < recovery {
                sweep_asks(product, book, ledger)
            } else {
                sweep_bids(product, book, ledger)
            });
        }

        if jump > self.spike_ub {
            let spike_up = fair > reference;
            let recovery = if spike_up {
                reference + self.offset
            } else {
                reference - self.offset
            };
            info!(
                "{} spike {}: fair {:.2} vs {:.2}, recovery {:.2}",
                product,
                if spike_up { "up" } else { "down" },
                fair,
                reference,
                recovery
            );
            record.spike_active = true;
            record.recovery_value = Some(recovery);
            return Some(if spike_up {
                sweep_bids(product, book, ledger)
            } else {
                sweep_asks(product, book, ledger)
            });
        }

        None
    }
}

/// Buy every ask level, best first, until capacity runs out
pub fn sweep_asks(product: Product, mut book: OrderBook, ledger: &mut PositionLedger) -> Placement {
    let mut orders = Vec::new();
    let levels: Vec<_> = book.ask_levels().collect();
    for (price, size) in levels {
        let qty = ledger.record_buy(product, size);
        if qty == 0 {
            break;
        }
        orders.push(Order::buy(product, price, qty));
        book.consume_ask(price, qty);
    }
    Placement { orders, book }
}

/// Sell into every bid level, best first, until capacity runs out
pub fn sweep_bids(product: Product, mut book: OrderBook, ledger: &mut PositionLedger) -> Placement {
    let mut orders = Vec::new();
    let levels: Vec<_> = book.bid_levels().collect();
    for (price, size) in levels {
        let qty = ledger.record_sell(product, size);
        if qty == 0 {
            break;
        }
        orders.push(Order::sell(product, price, qty));
        book.consume_bid(price, qty);
    }
    Placement { orders, book }
}
