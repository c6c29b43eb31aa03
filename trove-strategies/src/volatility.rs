//! Implied-volatility mean reversion on vouchers
//!
//! Each tick the voucher's implied vol is compared with a quadratic smile
//! fitted in moneyness `m = ln(K/S)/sqrt(T)`. The gap is de-meaned against
//! its own recent history; a gap above `threshold` sells vol (sell the
//! voucher into bids), below `-threshold` buys it.
//!
//! Option and underlying prices are wall mids. Expiry counts down in days:
//! `dte = starting_days - timestamp / timestamps_per_day`.

use crate::fair_value::FairValueModel;
use crate::pricing::{call_delta, ImpliedVolSolver};
use tracing::{debug, info};
use trove_core::config::constants::DAYS_PER_YEAR;
use trove_core::config::VolatilityParams;
use trove_core::{OrderBook, Product, Quantity, Strategy, TickContext};

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityEngine {
    params: VolatilityParams,
    solver: ImpliedVolSolver,
    strike: f64,
}

impl VolatilityEngine {
    /// `None` when the configured voucher has no strike
    pub fn new(params: &VolatilityParams) -> Option<Self> {
        let strike = params.voucher.strike()? as f64;
        Some(Self {
            params: params.clone(),
            solver: ImpliedVolSolver {
                lower: params.iv_lower,
                upper: params.iv_upper,
                tolerance: params.iv_tolerance,
                max_iterations: params.iv_max_iterations,
            },
            strike,
        })
    }

    pub fn voucher(&self) -> Product {
        self.params.voucher
    }

    pub fn days_to_expiry(&self, timestamp: i64) -> f64 {
        self.params.starting_days - timestamp as f64 / self.params.timestamps_per_day
    }

    /// Smile-implied vol at moneyness `m` with `dte` days left
    pub fn fitted_iv(&self, moneyness: f64, dte: f64) -> f64 {
        let smile = &self.params.smile;
        smile.base.at(dte) + smile.linear.at(dte) * moneyness + smile.squared.at(dte) * moneyness * moneyness
    }

    /// Record `deviation` and return it de-meaned once enough history exists
    fn demeaned(&self, ctx: &mut TickContext<'_>, deviation: f64) -> Option<f64> {
        let floor = self.params.history_floor;
        let record = ctx.state.vol_mut(self.params.voucher);
        if record.deviations.capacity() != floor + 1 {
            record.deviations.resize(floor + 1);
        }
        record.deviations.push(deviation);

        if record.deviations.len() <= floor {
            return None;
        }
        let mean = record.deviations.tail_mean(self.params.mean_window)?;
        record.deviations.pop_oldest();
        Some(deviation - mean)
    }

    /// Sell vol: voucher into bids, sized against the underlying's ask side
    fn sell_vol(&self, ctx: &mut TickContext<'_>, voucher_book: &OrderBook, underlying_book: &OrderBook, delta: f64) -> f64 {
        let (voucher, underlying) = (self.params.voucher, self.params.underlying);
        let mut remaining = ctx
            .ledger
            .buy_capacity(underlying)
            .min(ctx.ledger.sell_capacity(voucher))
            .min(underlying_book.total_ask_size())
            .min(voucher_book.total_bid_size());

        let mut exposure = 0.0;
        for (price, size) in voucher_book.bid_levels() {
            if remaining <= 0 {
                break;
            }
            let fill = ctx.sell(voucher, price, size.min(remaining));
            exposure -= delta * fill as f64;
            remaining -= fill;
        }
        exposure
    }

    /// Buy vol: voucher from asks, sized against the underlying's bid side
    fn buy_vol(&self, ctx: &mut TickContext<'_>, voucher_book: &OrderBook, underlying_book: &OrderBook, delta: f64) -> f64 {
        let (voucher, underlying) = (self.params.voucher, self.params.underlying);
        let mut remaining = ctx
            .ledger
            .buy_capacity(voucher)
            .min(ctx.ledger.sell_capacity(underlying))
            .min(voucher_book.total_ask_size())
            .min(underlying_book.total_bid_size());

        let mut exposure = 0.0;
        for (price, size) in voucher_book.ask_levels() {
            if remaining <= 0 {
                break;
            }
            let fill = ctx.buy(voucher, price, size.min(remaining));
            exposure += delta * fill as f64;
            remaining -= fill;
        }
        exposure
    }

    /// Offset `exposure` with underlying orders at its best levels
    fn hedge(&self, ctx: &mut TickContext<'_>, underlying_book: &OrderBook, exposure: f64) {
        let underlying = self.params.underlying;
        let mut remaining = (-exposure).round() as Quantity;
        if remaining > 0 {
            for (price, size) in underlying_book.ask_levels() {
                if remaining <= 0 {
                    break;
                }
                let fill = ctx.buy(underlying, price, size.min(remaining));
                if fill == 0 {
                    break;
                }
                remaining -= fill;
            }
        } else if remaining < 0 {
            for (price, size) in underlying_book.bid_levels() {
                if remaining >= 0 {
                    break;
                }
                let fill = ctx.sell(underlying, price, size.min(-remaining));
                if fill == 0 {
                    break;
                }
                remaining += fill;
            }
        }
    }
}

impl Strategy for VolatilityEngine {
    fn on_tick(&mut self, ctx: &mut TickContext<'_>) {
        let (voucher, underlying) = (self.params.voucher, self.params.underlying);
        let dte = self.days_to_expiry(ctx.timestamp);
        let t = dte / DAYS_PER_YEAR;
        if !(t > 0.0) {
            debug!("{}: expired (dte {:.4})", voucher, dte);
            return;
        }

        let Some(spot) = FairValueModel::WallMid.estimate(underlying, ctx) else {
            debug!("{}: no underlying price", voucher);
            return;
        };
        let Some(option_price) = FairValueModel::WallMid.estimate(voucher, ctx) else {
            debug!("{}: no voucher price", voucher);
            return;
        };
        let Some(iv) = self.solver.solve(option_price, spot, self.strike, t) else {
            debug!("{}: no implied vol for price {:.2}", voucher, option_price);
            return;
        };

        let moneyness = (self.strike / spot).ln() / t.sqrt();
        let fitted = self.fitted_iv(moneyness, dte);
        let Some(deviation) = self.demeaned(ctx, iv - fitted) else {
            debug!("{}: iv {:.5} vs smile {:.5}, building history", voucher, iv, fitted);
            return;
        };
        debug!(
            "{}: iv {:.5}, smile {:.5}, de-meaned deviation {:.5}",
            voucher, iv, fitted, deviation
        );

        let threshold = self.params.threshold;
        if deviation.abs() <= threshold {
            return;
        }

        let empty = OrderBook::default();
        let voucher_book = ctx.book(voucher).unwrap_or(&empty);
        let underlying_book = ctx.book(underlying).unwrap_or(&empty);
        let delta = call_delta(spot, self.strike, t, iv);

        let exposure = if deviation > threshold {
            self.sell_vol(ctx, voucher_book, underlying_book, delta)
        } else {
            self.buy_vol(ctx, voucher_book, underlying_book, delta)
        };
        info!(
            "{}: {} vol, deviation {:.5}, delta exposure {:.3}",
            voucher,
            if deviation > threshold { "short" } else { "long" },
            deviation,
            exposure
        );
        ctx.state.vol_mut(voucher).last_delta_exposure = exposure;

        if self.params.hedge_delta && exposure != 0.0 {
            self.hedge(ctx, underlying_book, exposure);
        }
    }

    fn name(&self) -> &'static str {
        "VolatilityEngine"
    }
}
