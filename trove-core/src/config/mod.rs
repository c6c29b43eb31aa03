pub mod constants;
pub mod profiles;
pub mod types;

pub use profiles::{ConfigProfile, ProfileName};
pub use types::*;

use crate::core::{ConfigError, Product};
use anyhow::{Context, Result};
use config::{Config as ConfigLoader, Environment, File};
use constants::{CONVERSIONS_PER_TICK, ENV_PREFIX, ENV_SEPARATOR};
use std::collections::BTreeSet;
use std::path::Path;

impl TraderConfig {
    /// Load configuration from a TOML file with `TROVE__` environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();

        let config = ConfigLoader::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("conversions", CONVERSIONS_PER_TICK)?
            .add_source(File::from(config_path))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_path.display()))?;

        let cfg: TraderConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        cfg.validate()
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

        Ok(cfg)
    }

    /// Load `path` if given, otherwise the named built-in profile
    pub fn load_or_profile<P: AsRef<Path>>(path: Option<P>, profile: ProfileName) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let cfg = ConfigProfile::from_name(profile);
                cfg.validate()?;
                Ok(cfg)
            }
        }
    }

    /// Position limit for `product`, zero when unconfigured
    pub fn limit(&self, product: Product) -> i64 {
        self.limits.get(&product).copied().unwrap_or(0)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&product, &limit) in &self.limits {
            if limit <= 0 {
                return Err(ConfigError::NonPositiveLimit { product, limit });
            }
        }

        let mut seen = BTreeSet::new();
        for mm in &self.market_making {
            if !seen.insert(mm.product) {
                return Err(ConfigError::Duplicate {
                    product: mm.product,
                    section: "market_making",
                });
            }
            self.validate_market_making(mm)?;
        }

        let mut seen = BTreeSet::new();
        for spread in &self.spreads {
            if !seen.insert(spread.basket) {
                return Err(ConfigError::Duplicate {
                    product: spread.basket,
                    section: "spreads",
                });
            }
            self.validate_spread(spread)?;
        }

        let mut seen = BTreeSet::new();
        for vol in &self.volatility {
            if !seen.insert(vol.voucher) {
                return Err(ConfigError::Duplicate {
                    product: vol.voucher,
                    section: "volatility",
                });
            }
            self.validate_volatility(vol)?;
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::LogLevel(self.logging.level.clone()));
        }

        Ok(())
    }

    fn require_limit(&self, product: Product) -> Result<(), ConfigError> {
        if self.limits.contains_key(&product) {
            Ok(())
        } else {
            Err(ConfigError::MissingLimit { product })
        }
    }

    fn validate_market_making(&self, mm: &MarketMakingParams) -> Result<(), ConfigError> {
        let product = mm.product;
        self.require_limit(product)?;

        let non_negative = [
            ("take_width", mm.take_width),
            ("clear_width", mm.clear_width),
            ("disregard_edge", mm.disregard_edge),
            ("join_edge", mm.join_edge),
            ("default_edge", mm.default_edge),
            ("adverse_volume", mm.adverse_volume as f64),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(out_of_range(product, field, value, "must be >= 0"));
            }
        }

        if let Some(soft) = mm.soft_position_limit {
            if soft <= 0 {
                return Err(out_of_range(
                    product,
                    "soft_position_limit",
                    soft as f64,
                    "must be positive",
                ));
            }
        }

        match &mm.fair_value {
            FairValueParams::Static { value } => {
                if !(*value > 0.0) {
                    return Err(out_of_range(product, "value", *value, "must be positive"));
                }
            }
            FairValueParams::Reversion { cross, .. } => {
                if let Some(cross) = cross {
                    if cross.product == product {
                        return Err(out_of_range(
                            product,
                            "cross.product",
                            0.0,
                            "cannot adjust against itself",
                        ));
                    }
                }
            }
            FairValueParams::AdaptiveReversion { window, weight, .. } => {
                // Need at least two returns for a lag-one regression
                if *window < 3 {
                    return Err(out_of_range(product, "window", *window as f64, "must be >= 3"));
                }
                if !(0.0..=1.0).contains(weight) {
                    return Err(out_of_range(product, "weight", *weight, "must be in [0, 1]"));
                }
            }
        }

        if let TakeStyleParams::SpikeAware {
            spike_lb,
            spike_ub,
            offset,
        } = mm.take_style
        {
            if !(spike_lb >= 0.0 && spike_lb <= spike_ub) {
                return Err(out_of_range(
                    product,
                    "spike_lb",
                    spike_lb,
                    "must be in [0, spike_ub]",
                ));
            }
            if !(offset >= 0.0) {
                return Err(out_of_range(product, "offset", offset, "must be >= 0"));
            }
        }

        Ok(())
    }

    fn validate_spread(&self, spread: &SpreadParams) -> Result<(), ConfigError> {
        let basket = spread.basket;
        self.require_limit(basket)?;

        if spread.components.is_empty() {
            return Err(out_of_range(basket, "components", 0.0, "basket needs components"));
        }
        for component in &spread.components {
            if component.weight <= 0 {
                return Err(ConfigError::BadWeight {
                    basket,
                    component: component.product,
                    weight: component.weight,
                });
            }
            self.require_limit(component.product)?;
        }

        if spread.spread_window < 2 {
            return Err(out_of_range(
                basket,
                "spread_window",
                spread.spread_window as f64,
                "must be >= 2",
            ));
        }
        if !(spread.zscore_threshold > 0.0) {
            return Err(out_of_range(
                basket,
                "zscore_threshold",
                spread.zscore_threshold,
                "must be positive",
            ));
        }
        if spread.target_position <= 0 {
            return Err(out_of_range(
                basket,
                "target_position",
                spread.target_position as f64,
                "must be positive",
            ));
        }

        Ok(())
    }

    fn validate_volatility(&self, vol: &VolatilityParams) -> Result<(), ConfigError> {
        let voucher = vol.voucher;
        if voucher.strike().is_none() {
            return Err(ConfigError::NotAVoucher { product: voucher });
        }
        self.require_limit(voucher)?;
        self.require_limit(vol.underlying)?;

        if !(vol.timestamps_per_day > 0.0) {
            return Err(out_of_range(
                voucher,
                "timestamps_per_day",
                vol.timestamps_per_day,
                "must be positive",
            ));
        }
        if !(vol.iv_lower > 0.0 && vol.iv_lower < vol.iv_upper) {
            return Err(out_of_range(
                voucher,
                "iv_lower",
                vol.iv_lower,
                "must be in (0, iv_upper)",
            ));
        }
        if !(vol.iv_tolerance > 0.0) {
            return Err(out_of_range(
                voucher,
                "iv_tolerance",
                vol.iv_tolerance,
                "must be positive",
            ));
        }
        if !(vol.threshold > 0.0) {
            return Err(out_of_range(voucher, "threshold", vol.threshold, "must be positive"));
        }
        if vol.mean_window == 0 || vol.mean_window > vol.history_floor + 1 {
            return Err(out_of_range(
                voucher,
                "mean_window",
                vol.mean_window as f64,
                "must be in [1, history_floor + 1]",
            ));
        }

        Ok(())
    }
}

fn out_of_range(product: Product, field: &'static str, value: f64, reason: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        product,
        field,
        value,
        reason,
    }
}
