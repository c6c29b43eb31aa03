//! Position-limit enforcement
//!
//! ```text
//! positions + limits → PositionLedger → (every sizing step draws capacity) → verify(merged orders)
//! ```
//!
//! The ledger is the only risk layer: limits are the sole hard constraint the
//! harness enforces, and it cancels *all* of a product's orders when they
//! could breach one.

pub mod ledger;

pub use ledger::{Inventory, LimitViolation, PositionLedger};
