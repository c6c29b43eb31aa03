//! Built-in configuration profiles
//!
//! - RoundFour: every hand-tuned engine (market making, both baskets, two vouchers)
//! - MarketMaking: resin, kelp and squid ink quoting only

use super::types::*;
use crate::core::Product;
use std::collections::BTreeMap;

/// Configuration profile name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileName {
    RoundFour,
    MarketMaking,
}

impl ProfileName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoundFour => "round-four",
            Self::MarketMaking => "market-making",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "round-four" | "round_four" | "r4" => Some(Self::RoundFour),
            "market-making" | "market_making" | "mm" => Some(Self::MarketMaking),
            _ => None,
        }
    }
}

/// Pre-built configurations
pub struct ConfigProfile;

impl ConfigProfile {
    pub fn from_name(name: ProfileName) -> TraderConfig {
        match name {
            ProfileName::RoundFour => Self::round_four(),
            ProfileName::MarketMaking => Self::market_making(),
        }
    }

    /// Full hand-tuned configuration
    pub fn round_four() -> TraderConfig {
        TraderConfig {
            limits: Self::limits(),
            market_making: vec![Self::resin(), Self::kelp(), Self::squid_ink()],
            spreads: vec![Self::picnic_basket1(), Self::picnic_basket2()],
            volatility: vec![Self::voucher_10000(), Self::voucher_9750()],
            logging: LoggingConfig::default(),
            conversions: 1,
        }
    }

    /// Quoting engines only
    pub fn market_making() -> TraderConfig {
        TraderConfig {
            spreads: Vec::new(),
            volatility: Vec::new(),
            ..Self::round_four()
        }
    }

    fn limits() -> BTreeMap<Product, i64> {
        BTreeMap::from([
            (Product::RainforestResin, 50),
            (Product::Kelp, 50),
            (Product::SquidInk, 50),
            (Product::Croissants, 250),
            (Product::Jams, 350),
            (Product::Djembes, 60),
            (Product::PicnicBasket1, 60),
            (Product::PicnicBasket2, 100),
            (Product::VolcanicRock, 400),
            (Product::VolcanicRockVoucher9500, 200),
            (Product::VolcanicRockVoucher9750, 200),
            (Product::VolcanicRockVoucher10000, 200),
            (Product::VolcanicRockVoucher10250, 200),
            (Product::VolcanicRockVoucher10500, 200),
        ])
    }

    fn resin() -> MarketMakingParams {
        MarketMakingParams {
            product: Product::RainforestResin,
            fair_value: FairValueParams::Static { value: 10_000.0 },
            take_width: 1.0,
            clear_width: 0.0,
            prevent_adverse: false,
            adverse_volume: 0,
            disregard_edge: 1.0,
            join_edge: 2.0,
            default_edge: 1.0,
            soft_position_limit: Some(50),
            take_style: TakeStyleParams::Standard,
        }
    }

    fn kelp() -> MarketMakingParams {
        MarketMakingParams {
            product: Product::Kelp,
            fair_value: FairValueParams::Reversion {
                beta: -0.18,
                cross: Some(CrossAssetParams {
                    product: Product::SquidInk,
                    factor: 0.05,
                    adverse_volume: 15,
                }),
            },
            take_width: 2.0,
            clear_width: 0.0,
            prevent_adverse: false,
            adverse_volume: 15,
            disregard_edge: 2.0,
            join_edge: 0.0,
            default_edge: 1.0,
            soft_position_limit: None,
            take_style: TakeStyleParams::Standard,
        }
    }

    fn squid_ink() -> MarketMakingParams {
        MarketMakingParams {
            product: Product::SquidInk,
            fair_value: FairValueParams::AdaptiveReversion {
                beta: -0.228,
                window: 55,
                weight: 0.12,
            },
            take_width: 2.0,
            clear_width: 1.0,
            prevent_adverse: false,
            adverse_volume: 15,
            disregard_edge: 2.0,
            join_edge: 0.0,
            default_edge: 1.0,
            soft_position_limit: None,
            take_style: TakeStyleParams::SpikeAware {
                spike_lb: 3.0,
                spike_ub: 5.6,
                offset: 2.0,
            },
        }
    }

    fn picnic_basket1() -> SpreadParams {
        SpreadParams {
            basket: Product::PicnicBasket1,
            components: vec![
                BasketComponent {
                    product: Product::Djembes,
                    weight: 1,
                },
                BasketComponent {
                    product: Product::Croissants,
                    weight: 6,
                },
                BasketComponent {
                    product: Product::Jams,
                    weight: 3,
                },
            ],
            spread_mean: 48.777856,
            spread_window: 55,
            zscore_threshold: 4.0,
            target_position: 100,
        }
    }

    fn picnic_basket2() -> SpreadParams {
        SpreadParams {
            basket: Product::PicnicBasket2,
            components: vec![
                BasketComponent {
                    product: Product::Croissants,
                    weight: 4,
                },
                BasketComponent {
                    product: Product::Jams,
                    weight: 2,
                },
            ],
            spread_mean: 30.2336,
            spread_window: 59,
            zscore_threshold: 6.0,
            target_position: 100,
        }
    }

    fn voucher_10000() -> VolatilityParams {
        VolatilityParams {
            voucher: Product::VolcanicRockVoucher10000,
            underlying: Product::VolcanicRock,
            starting_days: 4.0,
            timestamps_per_day: 1_000_000.0,
            smile: SmileParams {
                base: SmileCoefficient {
                    intercept: 0.14786181,
                    slope: 0.0,
                },
                linear: SmileCoefficient {
                    intercept: 0.00099561,
                    slope: 0.0,
                },
                squared: SmileCoefficient {
                    intercept: 0.23544086,
                    slope: 0.0,
                },
            },
            threshold: 0.0035,
            history_floor: 25,
            mean_window: 20,
            iv_lower: 0.01,
            iv_upper: 0.35,
            iv_tolerance: 1e-14,
            iv_max_iterations: 250,
            hedge_delta: false,
        }
    }

    fn voucher_9750() -> VolatilityParams {
        VolatilityParams {
            voucher: Product::VolcanicRockVoucher9750,
            starting_days: 5.0,
            smile: SmileParams {
                base: SmileCoefficient {
                    intercept: 0.13571776890273662,
                    slope: 0.00229274,
                },
                linear: SmileCoefficient {
                    intercept: -0.03685812200491957,
                    slope: 0.0072571,
                },
                squared: SmileCoefficient {
                    intercept: 0.16277746617792221,
                    slope: 0.01096456,
                },
            },
            threshold: 0.012,
            ..Self::voucher_10000()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_four_is_valid() {
        let config = ConfigProfile::round_four();
        assert!(config.validate().is_ok());
        assert_eq!(config.limits.len(), Product::ALL.len());
    }

    #[test]
    fn test_market_making_is_valid() {
        let config = ConfigProfile::market_making();
        assert!(config.validate().is_ok());
        assert!(config.spreads.is_empty());
        assert_eq!(config.market_making.len(), 3);
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(ProfileName::from_str("R4"), Some(ProfileName::RoundFour));
        assert_eq!(
            ProfileName::from_str("market_making"),
            Some(ProfileName::MarketMaking)
        );
        assert_eq!(ProfileName::from_str("prod"), None);
        assert_eq!(ProfileName::RoundFour.as_str(), "round-four");
    }

    #[test]
    fn test_voucher_9750_smile_moves_with_expiry() {
        let params = ConfigProfile::voucher_9750();
        assert_eq!(params.starting_days, 5.0);
        assert!(params.smile.base.at(5.0) > params.smile.base.at(1.0));
        assert_eq!(params.underlying, Product::VolcanicRock);
    }
}
