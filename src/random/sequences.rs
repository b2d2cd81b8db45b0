//! The three chaotic trajectories (u, v, w) that feed the key schedule.
//!
//! `u` comes from the logistic map, `v` from the tent map and `w` from the
//! PWLCM. Each trajectory is inherently sequential; with the `parallel`
//! feature the three maps run on separate rayon workers, which leaves every
//! individual recurrence and therefore every emitted value unchanged.

use tracing::trace;
use zeroize::Zeroize;

use super::{ChaoticMap, LogisticMap, PwlcmMap, TentMap};
use crate::params::ChaosParams;

/// Trajectories of the logistic (`u`), tent (`v`) and PWLCM (`w`) maps.
///
/// Returned to callers of [`encrypt`](crate::encrypt) so that external tools
/// can plot the orbits; the cipher itself never reads them back.
#[derive(Debug, Clone, PartialEq, Zeroize)]
pub struct ChaoticSequences {
    /// Logistic map trajectory.
    pub u: Vec<f64>,
    /// Tent map trajectory.
    pub v: Vec<f64>,
    /// PWLCM trajectory.
    pub w: Vec<f64>,
}

impl ChaoticSequences {
    /// Runs all three maps for `len` steps from the given parameters.
    ///
    /// The parameters are assumed to be validated already.
    ///
    /// # Parameters
    /// - `params`: Initial conditions and coefficients.
    /// - `len`: Number of values per trajectory.
    pub fn generate(params: &ChaosParams, len: usize) -> Self {
        trace!(len, "generating chaotic trajectories");
        let (u, (v, w)) = Self::run_maps(params, len);
        ChaoticSequences { u, v, w }
    }

    #[cfg(not(feature = "parallel"))]
    fn run_maps(params: &ChaosParams, len: usize) -> (Vec<f64>, (Vec<f64>, Vec<f64>)) {
        let u = LogisticMap::new(params.x0_log, params.mu_log).sequence(len);
        let v = TentMap::new(params.x0_tent, params.r_tent).sequence(len);
        let w = PwlcmMap::new(params.x0_pwlcm, params.p_pwlcm).sequence(len);
        (u, (v, w))
    }

    #[cfg(feature = "parallel")]
    fn run_maps(params: &ChaosParams, len: usize) -> (Vec<f64>, (Vec<f64>, Vec<f64>)) {
        let mut logistic = LogisticMap::new(params.x0_log, params.mu_log);
        let mut tent = TentMap::new(params.x0_tent, params.r_tent);
        let mut pwlcm = PwlcmMap::new(params.x0_pwlcm, params.p_pwlcm);
        rayon::join(
            || logistic.sequence(len),
            || rayon::join(|| tent.sequence(len), || pwlcm.sequence(len)),
        )
    }

    /// Number of values in each trajectory.
    pub fn len(&self) -> usize {
        self.u.len()
    }

    /// Returns `true` if the trajectories are empty.
    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// Shortens all three trajectories to `len` values.
    pub fn truncate(&mut self, len: usize) {
        self.u.truncate(len);
        self.v.truncate(len);
        self.w.truncate(len);
    }
}
