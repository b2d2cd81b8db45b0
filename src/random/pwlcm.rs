//! Piecewise-linear chaotic map (PWLCM).
//!
//! ```text
//!          | x / p                 0   <= x < p
//! F(x) =   | (x - p) / (0.5 - p)   p   <= x < 0.5
//!          | F(1 - x)              0.5 <= x < 1
//! ```
//!
//! A state matching none of the branches is carried forward unchanged. That
//! happens for `x == 0.5` (its reflection is 0.5 again) and for states
//! outside [0, 1).

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ChaoticMap;

/// PWLCM recurrence with breakpoint `p` in (0, 0.5).
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct PwlcmMap {
    x: f64,
    p: f64,
}

impl PwlcmMap {
    /// Creates a PWLCM at initial condition `x0` with breakpoint `p`.
    pub fn new(x0: f64, p: f64) -> Self {
        PwlcmMap { x: x0, p }
    }

    /// Returns the breakpoint.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Applies the two lower branches; `None` if `x` is outside [0, 0.5).
    fn lower_half(&self, x: f64) -> Option<f64> {
        if (0.0..self.p).contains(&x) {
            Some(x / self.p)
        } else if (self.p..0.5).contains(&x) {
            Some((x - self.p) / (0.5 - self.p))
        } else {
            None
        }
    }
}

impl ChaoticMap for PwlcmMap {
    fn set_state(&mut self, x: f64) {
        self.x = x;
    }

    fn state(&self) -> f64 {
        self.x
    }

    fn next_value(&mut self) -> f64 {
        let x = self.x;
        let next = match self.lower_half(x) {
            Some(v) => Some(v),
            None if (0.5..1.0).contains(&x) => self.lower_half(1.0 - x),
            None => None,
        };
        if let Some(v) = next {
            self.x = v;
        }
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lower_branch() {
        let mut map = PwlcmMap::new(0.1, 0.254);
        assert_relative_eq!(map.next_value(), 0.1 / 0.254, epsilon = 1e-15);
    }

    #[test]
    fn test_middle_branch() {
        let mut map = PwlcmMap::new(0.3, 0.254);
        assert_relative_eq!(map.next_value(), (0.3 - 0.254) / (0.5 - 0.254), epsilon = 1e-15);
    }

    #[test]
    fn test_symmetric_about_half() {
        let mut low = PwlcmMap::new(0.3, 0.254);
        let mut high = PwlcmMap::new(0.7, 0.254);
        assert_relative_eq!(low.next_value(), high.next_value(), epsilon = 1e-12);

        let mut low = PwlcmMap::new(0.05, 0.254);
        let mut high = PwlcmMap::new(0.95, 0.254);
        assert_relative_eq!(low.next_value(), high.next_value(), epsilon = 1e-12);
    }

    #[test]
    fn test_half_is_carried_forward() {
        let mut map = PwlcmMap::new(0.5, 0.254);
        assert_eq!(map.next_value(), 0.5);
        assert_eq!(map.next_value(), 0.5);
    }

    #[test]
    fn test_out_of_range_is_carried_forward() {
        let mut map = PwlcmMap::new(1.0, 0.254);
        assert_eq!(map.next_value(), 1.0);
    }

    #[test]
    fn test_orbit_in_unit_interval() {
        let mut map = PwlcmMap::new(0.3, 0.254);
        for v in map.sequence(10_000) {
            assert!((0.0..=1.0).contains(&v), "pwlcm escaped: {}", v);
        }
    }
}
