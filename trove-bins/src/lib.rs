//! Shared setup for the Trove binaries

pub mod common;
