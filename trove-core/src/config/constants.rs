//! Fixed values of the competition environment and estimator defaults
//!
//! Everything here is a default or an environment fact. Tunable parameters
//! live in [`TraderConfig`](super::TraderConfig).

// ===== HARNESS =====

/// Conversion requests returned with every tick
pub const CONVERSIONS_PER_TICK: i64 = 1;

/// Harness timestamp units in one trading day
pub const TIMESTAMPS_PER_DAY: f64 = 1_000_000.0;

/// Calendar days used to annualize time to expiry
pub const DAYS_PER_YEAR: f64 = 365.0;

// ===== IMPLIED VOLATILITY SOLVER =====

/// Lower bisection bound for implied volatility
pub const IV_LOWER_BOUND: f64 = 0.01;

/// Upper bisection bound for implied volatility
pub const IV_UPPER_BOUND: f64 = 0.35;

/// Stop once the model price is within this of the market price
pub const IV_TOLERANCE: f64 = 1e-14;

/// Bisection iteration cap
pub const IV_MAX_ITERATIONS: u32 = 250;

// ===== DEVIATION HISTORY =====

/// Deviations needed (exclusive) before the volatility engine trades
pub const VOL_HISTORY_FLOOR: usize = 25;

/// Recent deviations averaged to de-mean the current one
pub const VOL_MEAN_WINDOW: usize = 20;

// ===== LOADING =====

/// Prefix for environment overrides, e.g. `TROVE__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "TROVE";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";
