//! Domain-specific error types
//!
//! None of these escape a tick: the trader recovers locally (empty state,
//! skipped signal) and logs. They exist so the recovery sites can say exactly
//! what went wrong.

use super::types::Product;
use thiserror::Error;

/// Errors decoding or encoding the persisted state blob
#[derive(Debug, Error)]
pub enum StateError {
    /// Blob is not valid JSON for the state schema
    #[error("persisted state is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A rolling window was restored with more entries than its capacity
    #[error("rolling window holds {len} entries but capacity is {capacity}")]
    WindowOverflow {
        /// Entries found in the blob
        len: usize,
        /// Capacity recorded in the blob
        capacity: usize,
    },
}

/// Errors found while validating a trader configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Product is traded but has no position limit
    #[error("{product} is traded but has no position limit")]
    MissingLimit { product: Product },

    /// Position limit must be strictly positive
    #[error("{product} has non-positive position limit {limit}")]
    NonPositiveLimit { product: Product, limit: i64 },

    /// Product configured twice in the same section
    #[error("{product} is configured more than once in {section}")]
    Duplicate {
        product: Product,
        section: &'static str,
    },

    /// A numeric parameter is outside its allowed range
    #[error("{product}: {field} = {value} is out of range ({reason})")]
    OutOfRange {
        product: Product,
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A basket component weight must be positive
    #[error("basket {basket}: component {component} has weight {weight}")]
    BadWeight {
        basket: Product,
        component: Product,
        weight: i64,
    },

    /// Volatility engine configured for a product with no strike
    #[error("{product} is not an option voucher")]
    NotAVoucher { product: Product },

    /// Log level is not one tracing understands
    #[error("invalid log level '{0}', must be one of trace, debug, info, warn, error")]
    LogLevel(String),
}
