//! Fair-value estimators
//!
//! Each estimator turns a noisy, partial book plus last tick's memory into a
//! fair price, or `None` when there is nothing to go on. Estimators that
//! remember prices write this tick's mid back into the product's state.
//!
//! - `Static`: a known constant
//! - `Reversion`: one-tick mean-reversion forecast off the filtered mid,
//!   optionally adjusted for a correlated product's last return
//! - `AdaptiveReversion`: same forecast with beta re-fit over a rolling window
//! - `WallMid`: mid of the largest resting levels

use trove_core::config::{FairValueParams, MarketMakingParams};
use trove_core::orderbook::{filtered_mid, wall_mid};
use trove_core::{OrderBook, Product, Quantity, RollingWindow, TickContext};
use tracing::debug;

/// Adjust fair by another product's return since last tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossAsset {
    pub product: Product,
    pub factor: f64,
    /// Floor for the other product's filtered mid
    pub adverse_volume: Quantity,
}

/// Fair-value model for one product
#[derive(Debug, Clone, PartialEq)]
pub enum FairValueModel {
    Static(f64),
    Reversion {
        beta: f64,
        adverse_volume: Quantity,
        cross: Option<CrossAsset>,
    },
    AdaptiveReversion {
        beta: f64,
        adverse_volume: Quantity,
        window: usize,
        weight: f64,
    },
    WallMid,
}

impl FairValueModel {
    pub fn from_params(params: &MarketMakingParams) -> Self {
        match &params.fair_value {
            FairValueParams::Static { value } => FairValueModel::Static(*value),
            FairValueParams::Reversion { beta, cross } => FairValueModel::Reversion {
                beta: *beta,
                adverse_volume: params.adverse_volume,
                cross: cross.as_ref().map(|c| CrossAsset {
                    product: c.product,
                    factor: c.factor,
                    adverse_volume: c.adverse_volume,
                }),
            },
            FairValueParams::AdaptiveReversion {
                beta,
                window,
                weight,
            } => FairValueModel::AdaptiveReversion {
                beta: *beta,
                adverse_volume: params.adverse_volume,
                window: *window,
                weight: *weight,
            },
        }
    }

    /// Fair price of `product` this tick
    ///
    /// Updates the product's stored mid (and price history for the adaptive
    /// model) whenever a mid could be determined.
    pub fn estimate(&self, product: Product, ctx: &mut TickContext<'_>) -> Option<f64> {
        let empty = OrderBook::default();
        let book = ctx.book(product).unwrap_or(&empty);
        let previous = ctx.prior_price(product);

        match *self {
            FairValueModel::Static(value) => Some(value),

            FairValueModel::WallMid => {
                let mid = wall_mid(book).or(previous)?;
                ctx.state.product_mut(product).last_price = Some(mid);
                Some(mid)
            }

            FairValueModel::Reversion {
                beta,
                adverse_volume,
                cross,
            } => {
                let mid = anchored_mid(book, adverse_volume, previous)?;
                let mut fair = reversion_forecast(mid, previous, beta);

                if let Some(cross) = cross {
                    let other_prev = ctx.prior_price(cross.product);
                    let other_now = ctx
                        .book(cross.product)
                        .filter(|b| b.has_both_sides())
                        .and_then(|b| filtered_mid(b, cross.adverse_volume).or_else(|| b.mid()));
                    if let (Some(prev), Some(now)) = (other_prev, other_now) {
                        let adjustment = cross_adjustment(mid, prev, now, cross.factor);
                        debug!(
                            "{} cross-asset adjustment from {}: {:.4}",
                            product, cross.product, adjustment
                        );
                        fair -= adjustment;
                    }
                }

                ctx.state.product_mut(product).last_price = Some(mid);
                Some(fair)
            }

            FairValueModel::AdaptiveReversion {
                beta,
                adverse_volume,
                window,
                weight,
            } => {
                let mid = anchored_mid(book, adverse_volume, previous)?;

                let record = ctx.state.product_mut(product);
                if record.price_history.capacity() != window {
                    record.price_history.resize(window);
                }
                record.price_history.push(mid);

                let beta = adaptive_beta(&record.price_history, beta, weight);
                record.last_price = Some(mid);

                Some(reversion_forecast(mid, previous, beta))
            }
        }
    }
}

/// Mid that resists small bait quotes
///
/// Uses the best levels of at least `adverse_volume` when both sides have
/// one, the raw best-bid/best-ask mid otherwise, and `previous` when the book
/// is one-sided or empty.
pub fn anchored_mid(book: &OrderBook, adverse_volume: Quantity, previous: Option<f64>) -> Option<f64> {
    if !book.has_both_sides() {
        return previous;
    }
    filtered_mid(book, adverse_volume).or_else(|| book.mid())
}

/// `mid + mid * (r * beta)` with `r` the return since `last`
///
/// No (or zero) previous mid means no forecast: fair is the mid itself.
pub fn reversion_forecast(mid: f64, last: Option<f64>, beta: f64) -> f64 {
    match last {
        Some(last) if last != 0.0 => {
            let last_return = (mid - last) / last;
            mid + mid * (last_return * beta)
        }
        _ => mid,
    }
}

/// Lag-one reversion coefficient `-(X.Y)/(X.X)` over the window's returns
///
/// `None` when the window is not full or the returns are flat.
pub fn estimate_beta(history: &RollingWindow) -> Option<f64> {
    if !history.is_full() {
        return None;
    }
    let returns = history.returns();
    if returns.len() < 2 {
        return None;
    }
    let x = &returns[..returns.len() - 1];
    let y = &returns[1..];
    let xx: f64 = x.iter().map(|v| v * v).sum();
    if xx == 0.0 {
        return None;
    }
    let xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    Some(-xy / xx)
}

/// Blend the estimated beta with the configured one
///
/// Falls back to `configured` until the window is full.
pub fn adaptive_beta(history: &RollingWindow, configured: f64, weight: f64) -> f64 {
    match estimate_beta(history) {
        Some(estimated) => weight * estimated + (1.0 - weight) * configured,
        None => configured,
    }
}

/// `factor * other_return * mid`, subtracted from fair
pub fn cross_adjustment(mid: f64, other_prev: f64, other_now: f64, factor: f64) -> f64 {
    if other_prev == 0.0 {
        return 0.0;
    }
    let other_return = (other_now - other_prev) / other_prev;
    factor * other_return * mid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{context_fixture, ContextFixture};
    use approx::assert_relative_eq;

    #[test]
    fn test_anchored_mid_cases() {
        let layered = OrderBook::from_sizes(&[(1_999, 3), (1_998, 20)], &[(2_001, 2), (2_004, 20)]);
        assert_eq!(anchored_mid(&layered, 15, None), Some(2_001.0));

        // Nothing qualifies: raw mid
        assert_eq!(anchored_mid(&layered, 50, None), Some(2_000.0));

        // One-sided: previous, or nothing
        let bids_only = OrderBook::from_sizes(&[(1_999, 30)], &[]);
        assert_eq!(anchored_mid(&bids_only, 15, Some(2_002.5)), Some(2_002.5));
        assert_eq!(anchored_mid(&bids_only, 15, None), None);
        assert_eq!(anchored_mid(&OrderBook::new(), 15, None), None);
    }

    #[test]
    fn test_reversion_forecast() {
        // 1% up move with beta -0.2 forecasts a 0.2% pullback
        assert_relative_eq!(
            reversion_forecast(2_020.0, Some(2_000.0), -0.2),
            2_020.0 - 4.04,
            epsilon = 1e-9
        );
        assert_eq!(reversion_forecast(2_020.0, None, -0.2), 2_020.0);
    }

    #[test]
    fn test_estimate_beta_needs_full_window() {
        let mut w = RollingWindow::new(5);
        for p in [100.0, 101.0, 100.0] {
            w.push(p);
        }
        assert!(estimate_beta(&w).is_none());
        assert_eq!(adaptive_beta(&w, -0.228, 0.12), -0.228);
    }

    #[test]
    fn test_estimate_beta_alternating_series() {
        // Perfectly alternating returns revert fully: beta ~ 1
        let mut w = RollingWindow::new(6);
        for p in [100.0, 101.0, 100.0, 101.0, 100.0, 101.0] {
            w.push(p);
        }
        let beta = estimate_beta(&w).unwrap();
        assert!(beta > 0.9 && beta < 1.1, "beta = {}", beta);

        let blended = adaptive_beta(&w, -0.2, 0.5);
        assert_relative_eq!(blended, 0.5 * beta - 0.1);
    }

    #[test]
    fn test_flat_history_uses_configured_beta() {
        let mut w = RollingWindow::new(4);
        for _ in 0..4 {
            w.push(1_850.0);
        }
        assert!(estimate_beta(&w).is_none());
        assert_eq!(adaptive_beta(&w, -0.228, 0.12), -0.228);
    }

    #[test]
    fn test_cross_adjustment_sign() {
        // Other product up 1% lowers fair
        assert_relative_eq!(cross_adjustment(2_000.0, 1_900.0, 1_919.0, 0.05), 1.0, epsilon = 1e-9);
        assert_eq!(cross_adjustment(2_000.0, 0.0, 1_919.0, 0.05), 0.0);
    }

    #[test]
    fn test_estimate_updates_state() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_fixture(&[(
            Product::Kelp,
            OrderBook::from_sizes(&[(1_998, 20)], &[(2_002, 20)]),
        )]);
        state.product_mut(Product::Kelp).last_price = Some(1_990.0);

        let model = FairValueModel::Reversion {
            beta: -0.18,
            adverse_volume: 15,
            cross: None,
        };
        let mut ctx = TickContext::new(100, &books, ledger, &mut state);
        let fair = model.estimate(Product::Kelp, &mut ctx).unwrap();

        let expected = reversion_forecast(2_000.0, Some(1_990.0), -0.18);
        assert_relative_eq!(fair, expected);
        assert_eq!(state.last_price(Product::Kelp), Some(2_000.0));
    }

    #[test]
    fn test_estimate_with_cross_asset() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_fixture(&[
            (Product::Kelp, OrderBook::from_sizes(&[(1_998, 20)], &[(2_002, 20)])),
            (Product::SquidInk, OrderBook::from_sizes(&[(1_918, 20)], &[(1_920, 20)])),
        ]);
        state.product_mut(Product::SquidInk).last_price = Some(1_900.0);

        let model = FairValueModel::Reversion {
            beta: -0.18,
            adverse_volume: 15,
            cross: Some(CrossAsset {
                product: Product::SquidInk,
                factor: 0.05,
                adverse_volume: 15,
            }),
        };
        let mut ctx = TickContext::new(100, &books, ledger, &mut state);
        let fair = model.estimate(Product::Kelp, &mut ctx).unwrap();

        // No kelp history: fair = mid - 0.05 * (1919/1900 - 1) * 2000
        assert_relative_eq!(fair, 2_000.0 - 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cross_asset_uses_other_products_floor() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_fixture(&[
            (Product::Kelp, OrderBook::from_sizes(&[(1_998, 20)], &[(2_002, 20)])),
            (
                Product::SquidInk,
                OrderBook::from_sizes(&[(1_918, 5), (1_914, 20)], &[(1_920, 5), (1_922, 20)]),
            ),
        ]);
        state.product_mut(Product::SquidInk).last_price = Some(1_900.0);

        // Kelp filters at 15, ink at 5: the ink mid is 1919, not 1918
        let model = FairValueModel::Reversion {
            beta: -0.18,
            adverse_volume: 15,
            cross: Some(CrossAsset {
                product: Product::SquidInk,
                factor: 0.05,
                adverse_volume: 5,
            }),
        };
        let mut ctx = TickContext::new(100, &books, ledger, &mut state);
        let fair = model.estimate(Product::Kelp, &mut ctx).unwrap();

        assert_relative_eq!(fair, 2_000.0 - 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_adaptive_estimate_fills_history() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_fixture(&[(
            Product::SquidInk,
            OrderBook::from_sizes(&[(1_849, 20)], &[(1_851, 20)]),
        )]);

        let model = FairValueModel::AdaptiveReversion {
            beta: -0.228,
            adverse_volume: 15,
            window: 55,
            weight: 0.12,
        };
        let mut ctx = TickContext::new(0, &books, ledger, &mut state);
        assert_eq!(model.estimate(Product::SquidInk, &mut ctx), Some(1_850.0));

        let record = state.product(Product::SquidInk).unwrap();
        assert_eq!(record.price_history.capacity(), 55);
        assert_eq!(record.price_history.len(), 1);
    }

    #[test]
    fn test_wall_mid_falls_back_to_previous() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_fixture(&[]);
        state.product_mut(Product::VolcanicRock).last_price = Some(10_050.0);

        let mut ctx = TickContext::new(0, &books, ledger, &mut state);
        assert_eq!(
            FairValueModel::WallMid.estimate(Product::VolcanicRock, &mut ctx),
            Some(10_050.0)
        );
        assert_eq!(
            FairValueModel::WallMid.estimate(Product::VolcanicRockVoucher10000, &mut ctx),
            None
        );
    }

    #[test]
    fn test_static_ignores_book() {
        let ContextFixture {
            books,
            ledger,
            mut state,
        } = context_fixture(&[]);
        let mut ctx = TickContext::new(0, &books, ledger, &mut state);
        assert_eq!(
            FairValueModel::Static(10_000.0).estimate(Product::RainforestResin, &mut ctx),
            Some(10_000.0)
        );
        assert!(state.products.is_empty());
    }
}
