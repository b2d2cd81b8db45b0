//! Chaotic sequence generation subsystem.
//!
//! Provides the three one-dimensional recurrences (logistic, tent, PWLCM)
//! whose trajectories drive the key schedule, and [`ChaoticSequences`] which
//! runs all three from a [`ChaosParams`](crate::ChaosParams).

pub mod logistic;
pub mod pwlcm;
pub mod sequences;
pub mod tent;

pub use logistic::LogisticMap;
pub use pwlcm::PwlcmMap;
pub use sequences::ChaoticSequences;
pub use tent::TentMap;

/// Trait for one-dimensional chaotic recurrences.
///
/// Implementations must be pure functions of the previous state evaluated in
/// binary64 with a fixed operation order: encryption and decryption replay
/// the same trajectory and any rounding difference corrupts decryption
/// silently.
pub trait ChaoticMap {
    /// Sets the current state of the recurrence.
    fn set_state(&mut self, x: f64);

    /// Returns the current state.
    fn state(&self) -> f64;

    /// Advances the recurrence by one step and returns the new state.
    fn next_value(&mut self) -> f64;

    /// Emits `len` successive states.
    ///
    /// The state held before the call is not emitted; the first element is
    /// the first computed value.
    fn sequence(&mut self, len: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.next_value());
        }
        out
    }
}
