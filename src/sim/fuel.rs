//! Movement fuel meter

use serde::{Deserialize, Serialize};

/// Depletable resource gating horizontal movement.
///
/// `0 <= current <= max` always holds. There is no refill path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceGate {
    current: f32,
    max: f32,
}

impl ResourceGate {
    /// Create a full gate. Negative or NaN capacities collapse to empty.
    pub fn new(max: f32) -> Self {
        let max = if max.is_nan() { 0.0 } else { max.max(0.0) };
        Self { current: max, max }
    }

    /// Burn `amount` (negative amounts are ignored)
    pub fn reduce(&mut self, amount: f32) {
        if amount.is_nan() || amount <= 0.0 {
            return;
        }
        self.current = (self.current - amount).clamp(0.0, self.max);
    }

    pub fn remaining(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Fill level in [0, 1] for gauges
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Movement input is honored only while fuel remains
    pub fn can_move(&self) -> bool {
        self.current > 0.0
    }
}
