//! Core value types for the per-tick decision core
//!
//! This module provides the fundamental building blocks:
//! - `Product`: typed instrument identifier (no string-keyed dispatch)
//! - `Order`: signed limit order
//! - `Side`: buy or sell
//! - Domain error types for state and configuration

pub mod errors;
pub mod types;

// Re-export commonly used types
pub use errors::{ConfigError, StateError};
pub use types::{Order, Price, Product, Quantity, Side, UnknownProduct};
