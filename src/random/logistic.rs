//! Logistic map: `x ← mu · x · (1 − x)`.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ChaoticMap;

/// Logistic recurrence with growth rate `mu`.
///
/// For `mu` in (0, 4] and a state in (0, 1) the orbit stays inside [0, 1].
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct LogisticMap {
    x: f64,
    mu: f64,
}

impl LogisticMap {
    /// Creates a logistic map at initial condition `x0`.
    ///
    /// # Parameters
    /// - `x0`: Initial condition (not emitted).
    /// - `mu`: Growth rate.
    pub fn new(x0: f64, mu: f64) -> Self {
        LogisticMap { x: x0, mu }
    }

    /// Returns the growth rate.
    pub fn mu(&self) -> f64 {
        self.mu
    }
}

impl ChaoticMap for LogisticMap {
    fn set_state(&mut self, x: f64) {
        self.x = x;
    }

    fn state(&self) -> f64 {
        self.x
    }

    fn next_value(&mut self) -> f64 {
        // Left-to-right: (mu * x) * (1 - x)
        self.x = self.mu * self.x * (1.0 - self.x);
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_value_is_computed_not_seed() {
        let mut map = LogisticMap::new(0.1, 3.99);
        let seq = map.sequence(3);
        assert_relative_eq!(seq[0], 0.3591, epsilon = 1e-12);
        assert_relative_eq!(seq[1], 3.99 * 0.3591 * (1.0 - 0.3591), epsilon = 1e-12);
        assert_eq!(map.state(), seq[2]);
    }

    #[test]
    fn test_orbit_stays_in_unit_interval() {
        let mut map = LogisticMap::new(0.123, 4.0);
        for v in map.sequence(10_000) {
            assert!((0.0..=1.0).contains(&v), "logistic escaped: {}", v);
        }
    }

    #[test]
    fn test_fixed_point_zero() {
        let mut map = LogisticMap::new(0.0, 3.99);
        assert!(map.sequence(16).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_deterministic() {
        let a = LogisticMap::new(0.37, 3.91).sequence(500);
        let b = LogisticMap::new(0.37, 3.91).sequence(500);
        assert_eq!(a, b);
    }
}
