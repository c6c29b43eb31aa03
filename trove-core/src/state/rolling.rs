//! Bounded rolling window of observations
//!
//! Backs every history the trader persists between ticks: mids for the
//! adaptive reversion estimator, basket spreads, implied-vol deviations.

use crate::core::StateError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Rolling window with explicit capacity
///
/// Pushing onto a full window drops the oldest entry. The capacity travels
/// with the data so a restored window can be checked against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Add an observation, evicting the oldest when full
    #[inline]
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        while self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Remove and return the oldest observation
    #[inline]
    pub fn pop_oldest(&mut self) -> Option<f64> {
        self.values.pop_front()
    }

    /// Change capacity, keeping the most recent observations
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.values.len() > capacity {
            self.values.pop_front();
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Window holds `capacity` observations
    #[inline]
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.values.len() >= self.capacity
    }

    #[inline]
    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Mean of all observations, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Mean of the `n` most recent observations (fewer if the window is shorter)
    pub fn tail_mean(&self, n: usize) -> Option<f64> {
        let n = n.min(self.values.len());
        if n == 0 {
            return None;
        }
        let sum: f64 = self.values.iter().rev().take(n).sum();
        Some(sum / n as f64)
    }

    /// Population standard deviation, `None` when empty
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance = self
            .values
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / self.values.len() as f64;
        Some(variance.sqrt())
    }

    /// Simple returns between consecutive observations
    ///
    /// Pairs whose earlier value is zero are skipped.
    pub fn returns(&self) -> Vec<f64> {
        self.values
            .iter()
            .zip(self.values.iter().skip(1))
            .filter(|(prev, _)| **prev != 0.0)
            .map(|(prev, next)| (next - prev) / prev)
            .collect()
    }

    /// Reject a restored window that holds more than its capacity
    pub fn check(&self) -> Result<(), StateError> {
        if self.values.len() > self.capacity {
            return Err(StateError::WindowOverflow {
                len: self.values.len(),
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
