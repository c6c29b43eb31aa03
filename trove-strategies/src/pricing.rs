//! Black-Scholes pricing primitives (zero interest rate)
//!
//! Time to expiry is always in years. Every function short-circuits on
//! degenerate inputs (`T <= 0` or `sigma <= 0`) to the intrinsic limit
//! instead of dividing by zero.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use trove_core::config::constants::{
    IV_LOWER_BOUND, IV_MAX_ITERATIONS, IV_TOLERANCE, IV_UPPER_BOUND,
};

#[inline]
fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

#[inline]
fn norm_pdf(x: f64) -> f64 {
    Normal::standard().pdf(x)
}

#[inline]
fn is_degenerate(time_to_expiry: f64, volatility: f64) -> bool {
    !(time_to_expiry > 0.0) || !(volatility > 0.0)
}

fn d1(spot: f64, strike: f64, time_to_expiry: f64, volatility: f64) -> f64 {
    ((spot / strike).ln() + 0.5 * volatility * volatility * time_to_expiry)
        / (volatility * time_to_expiry.sqrt())
}

/// European call price
pub fn call_price(spot: f64, strike: f64, time_to_expiry: f64, volatility: f64) -> f64 {
    if is_degenerate(time_to_expiry, volatility) {
        return (spot - strike).max(0.0);
    }
    let d1 = d1(spot, strike, time_to_expiry, volatility);
    let d2 = d1 - volatility * time_to_expiry.sqrt();
    spot * norm_cdf(d1) - strike * norm_cdf(d2)
}

/// European put price
pub fn put_price(spot: f64, strike: f64, time_to_expiry: f64, volatility: f64) -> f64 {
    if is_degenerate(time_to_expiry, volatility) {
        return (strike - spot).max(0.0);
    }
    let d1 = d1(spot, strike, time_to_expiry, volatility);
    let d2 = d1 - volatility * time_to_expiry.sqrt();
    strike * norm_cdf(-d2) - spot * norm_cdf(-d1)
}

/// Call delta; a step function at the strike in the degenerate limit
pub fn call_delta(spot: f64, strike: f64, time_to_expiry: f64, volatility: f64) -> f64 {
    if is_degenerate(time_to_expiry, volatility) {
        return if spot > strike { 1.0 } else { 0.0 };
    }
    norm_cdf(d1(spot, strike, time_to_expiry, volatility))
}

/// Gamma (same for calls and puts)
pub fn gamma(spot: f64, strike: f64, time_to_expiry: f64, volatility: f64) -> f64 {
    if is_degenerate(time_to_expiry, volatility) || !(spot > 0.0) {
        return 0.0;
    }
    let d1 = d1(spot, strike, time_to_expiry, volatility);
    norm_pdf(d1) / (spot * volatility * time_to_expiry.sqrt())
}

/// Vega per one volatility point (0.01)
pub fn vega(spot: f64, strike: f64, time_to_expiry: f64, volatility: f64) -> f64 {
    if is_degenerate(time_to_expiry, volatility) {
        return 0.0;
    }
    let d1 = d1(spot, strike, time_to_expiry, volatility);
    norm_pdf(d1) * spot * time_to_expiry.sqrt() / 100.0
}

/// Bisection solver for call implied volatility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolSolver {
    pub lower: f64,
    pub upper: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for ImpliedVolSolver {
    fn default() -> Self {
        Self {
            lower: IV_LOWER_BOUND,
            upper: IV_UPPER_BOUND,
            tolerance: IV_TOLERANCE,
            max_iterations: IV_MAX_ITERATIONS,
        }
    }
}

impl ImpliedVolSolver {
    /// Volatility in `[lower, upper]` whose call price matches `market_price`
    ///
    /// Call prices rise monotonically with volatility, so the bracket halves
    /// toward the target each step. A price outside the bracket's range
    /// converges to the nearer bound. `None` for non-positive or non-finite
    /// inputs.
    pub fn solve(&self, market_price: f64, spot: f64, strike: f64, time_to_expiry: f64) -> Option<f64> {
        let inputs = [market_price, spot, strike, time_to_expiry];
        if inputs.iter().any(|v| !v.is_finite()) || !(spot > 0.0) || !(strike > 0.0) {
            return None;
        }
        if !(market_price > 0.0) || !(time_to_expiry > 0.0) {
            return None;
        }

        let mut low = self.lower;
        let mut high = self.upper;
        for _ in 0..self.max_iterations {
            let mid = (low + high) / 2.0;
            let price = call_price(spot, strike, time_to_expiry, mid);

            if (price - market_price).abs() < self.tolerance {
                return Some(mid);
            }
            if price > market_price {
                high = mid;
            } else {
                low = mid;
            }
        }
        Some((low + high) / 2.0)
    }
}

/// Call implied volatility with the default solver bounds
pub fn implied_vol_call(market_price: f64, spot: f64, strike: f64, time_to_expiry: f64) -> Option<f64> {
    ImpliedVolSolver::default().solve(market_price, spot, strike, time_to_expiry)
}
