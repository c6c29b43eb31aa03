use super::constants::*;
use crate::core::{Product, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete trader configuration
///
/// Built once at startup and shared by reference; nothing mutates it while
/// ticks run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Symmetric hard position limit per product
    pub limits: BTreeMap<Product, Quantity>,

    /// Products quoted through take/clear/make
    #[serde(default)]
    pub market_making: Vec<MarketMakingParams>,

    /// Basket-vs-synthetic spread engines
    #[serde(default)]
    pub spreads: Vec<SpreadParams>,

    /// Voucher volatility engines
    #[serde(default)]
    pub volatility: Vec<VolatilityParams>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Conversion requests returned with every tick
    #[serde(default = "default_conversions")]
    pub conversions: i64,
}

/// Take/clear/make parameters for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMakingParams {
    pub product: Product,

    /// How the fair price is estimated
    pub fair_value: FairValueParams,

    /// Take resting orders at least this far through fair
    pub take_width: f64,

    /// Flatten against levels at `fair ± clear_width`
    #[serde(default)]
    pub clear_width: f64,

    /// Skip levels larger than `adverse_volume` when taking
    #[serde(default)]
    pub prevent_adverse: bool,

    /// Size floor for the filtered mid and the adverse-take filter
    #[serde(default)]
    pub adverse_volume: Quantity,

    /// Ignore resting levels within this distance of fair when quoting
    pub disregard_edge: f64,

    /// Join (instead of penny) a level within this distance of fair
    pub join_edge: f64,

    /// Quote distance from fair when no level is worth pennying
    pub default_edge: f64,

    /// Skew quotes toward flat beyond this position
    #[serde(default)]
    pub soft_position_limit: Option<Quantity>,

    #[serde(default)]
    pub take_style: TakeStyleParams,
}

/// Fair-value model selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FairValueParams {
    /// Fixed, known fair value
    Static { value: f64 },

    /// One-tick reversion forecast off the filtered mid
    Reversion {
        beta: f64,
        /// Adjust for the previous-tick return of another product
        #[serde(default)]
        cross: Option<CrossAssetParams>,
    },

    /// Reversion forecast with beta re-estimated over a rolling window
    AdaptiveReversion {
        beta: f64,
        /// Mids kept for the estimate
        window: usize,
        /// Weight of the estimated beta against `beta`
        weight: f64,
    },
}

/// Cross-asset adjustment: `fair -= factor * other_return * mid`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossAssetParams {
    pub product: Product,
    pub factor: f64,
    /// Level-size floor for the other product's filtered mid
    pub adverse_volume: Quantity,
}

/// How a market-made product takes liquidity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum TakeStyleParams {
    #[default]
    Standard,

    /// Sweep the book on a price spike and ride it back to a recovery level
    SpikeAware {
        /// Jump below which an active spike is considered over
        spike_lb: f64,
        /// Jump above which a spike starts
        spike_ub: f64,
        /// Distance from the pre-spike price the move is expected to revert to
        offset: f64,
    },
}

/// One basket leg of a spread engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketComponent {
    pub product: Product,
    pub weight: Quantity,
}

/// Basket-vs-synthetic statistical arbitrage parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadParams {
    pub basket: Product,
    pub components: Vec<BasketComponent>,

    /// Long-run mean of `basket micro - synthetic micro`
    pub spread_mean: f64,

    /// Spread observations kept for the standard deviation
    pub spread_window: usize,

    /// |z| at which a position is entered
    pub zscore_threshold: f64,

    /// Basket position held while the signal is on
    pub target_position: Quantity,
}

/// `coef = intercept + slope * days_to_expiry`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmileCoefficient {
    pub intercept: f64,
    #[serde(default)]
    pub slope: f64,
}

impl SmileCoefficient {
    #[inline]
    pub fn at(&self, days_to_expiry: f64) -> f64 {
        self.intercept + self.slope * days_to_expiry
    }
}

/// Quadratic smile: `iv = base + linear * m + squared * m^2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmileParams {
    pub base: SmileCoefficient,
    pub linear: SmileCoefficient,
    pub squared: SmileCoefficient,
}

/// Volatility mean-reversion parameters for one voucher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityParams {
    pub voucher: Product,
    pub underlying: Product,

    /// Days to expiry at timestamp zero
    pub starting_days: f64,

    #[serde(default = "default_timestamps_per_day")]
    pub timestamps_per_day: f64,

    pub smile: SmileParams,

    /// De-meaned deviation that triggers a trade
    pub threshold: f64,

    /// Deviations required (exclusive) before trading
    #[serde(default = "default_history_floor")]
    pub history_floor: usize,

    /// Recent deviations averaged to de-mean the current one
    #[serde(default = "default_mean_window")]
    pub mean_window: usize,

    #[serde(default = "default_iv_lower")]
    pub iv_lower: f64,

    #[serde(default = "default_iv_upper")]
    pub iv_upper: f64,

    #[serde(default = "default_iv_tolerance")]
    pub iv_tolerance: f64,

    #[serde(default = "default_iv_max_iterations")]
    pub iv_max_iterations: u32,

    /// Offset net option delta with underlying orders
    #[serde(default)]
    pub hedge_delta: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_conversions() -> i64 {
    CONVERSIONS_PER_TICK
}

fn default_timestamps_per_day() -> f64 {
    TIMESTAMPS_PER_DAY
}

fn default_history_floor() -> usize {
    VOL_HISTORY_FLOOR
}

fn default_mean_window() -> usize {
    VOL_MEAN_WINDOW
}

fn default_iv_lower() -> f64 {
    IV_LOWER_BOUND
}

fn default_iv_upper() -> f64 {
    IV_UPPER_BOUND
}

fn default_iv_tolerance() -> f64 {
    IV_TOLERANCE
}

fn default_iv_max_iterations() -> u32 {
    IV_MAX_ITERATIONS
}

fn default_log_level() -> String {
    "info".to_string()
}
