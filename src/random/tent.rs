//! Tent map: `x ← r·x` below one half, `x ← r·(1 − x)` otherwise.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ChaoticMap;

/// Tent recurrence with slope `r`.
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct TentMap {
    x: f64,
    r: f64,
}

impl TentMap {
    /// Creates a tent map at initial condition `x0` with slope `r`.
    pub fn new(x0: f64, r: f64) -> Self {
        TentMap { x: x0, r }
    }

    /// Returns the slope.
    pub fn r(&self) -> f64 {
        self.r
    }
}

impl ChaoticMap for TentMap {
    fn set_state(&mut self, x: f64) {
        self.x = x;
    }

    fn state(&self) -> f64 {
        self.x
    }

    fn next_value(&mut self) -> f64 {
        self.x = if self.x < 0.5 {
            self.r * self.x
        } else {
            self.r * (1.0 - self.x)
        };
        self.x
    }
}
