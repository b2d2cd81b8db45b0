//! Key schedule: control vectors, substitution table and IV.
//!
//! The three chaotic trajectories are quantized position by position:
//!
//! ```text
//! AL[i] = floor((u[i] + v[i]) · 10^14 mod 256)
//! BL[i] = floor((v[i] + w[i]) · 10^14 mod 256) | 1
//! CL[i] = floor((u[i] + w[i]) · 10^14 mod 256)
//! C[i]  = (AL[i] + BL[i] + CL[i]) mod 2        (BL before the odd coercion)
//! IV    = (ΣAL + ΣBL + ΣCL) mod 256            (BL after the odd coercion)
//! ```
//!
//! The substitution table needs 256 AL values, so trajectories are always
//! generated for at least 256 positions; everything the cipher consumes is
//! then cut to the buffer length.

use tracing::debug;
use zeroize::Zeroize;

use crate::error::{KaosImgError, Result};
use crate::params::ChaosParams;
use crate::random::ChaoticSequences;
use crate::substitution::{SubstitutionBox, TABLE_SIZE};
use crate::utils::modular::{inverse_mod_256, quantize};

/// Per-position selector: substitution row lookup.
pub const MODE_SUBSTITUTION: u8 = 0;
/// Per-position selector: affine transform over Z/256.
pub const MODE_AFFINE: u8 = 1;

/// All key material derived from a parameter set for one buffer length.
///
/// Encryption hands this to the caller for inspection; decryption rebuilds
/// it bit for bit from the same parameters.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct KeySchedule {
    al: Vec<u8>,
    bl: Vec<u8>,
    cl: Vec<u8>,
    modes: Vec<u8>,
    sbox: SubstitutionBox,
    iv: u8,
}

impl KeySchedule {
    /// Derives the key schedule for a buffer of `len` bytes.
    ///
    /// # Parameters
    /// - `params`: The six chaotic parameters (validated here).
    /// - `len`: Buffer length L.
    ///
    /// # Returns
    /// The schedule and the trajectories it was quantized from, both cut to
    /// `len` positions.
    ///
    /// # Errors
    /// - [`KaosImgError::InvalidParameter`] if `params` is out of domain.
    /// - [`KaosImgError::InvalidRaster`] if `len == 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kaosimg::{ChaosParams, KeySchedule};
    ///
    /// let (schedule, trajectories) = KeySchedule::derive(&ChaosParams::default(), 12).unwrap();
    /// assert_eq!(schedule.len(), 12);
    /// assert_eq!(trajectories.len(), 12);
    /// assert!(schedule.bl().iter().all(|b| b & 1 == 1));
    /// ```
    pub fn derive(params: &ChaosParams, len: usize) -> Result<(Self, ChaoticSequences)> {
        params.validate()?;
        if len == 0 {
            return Err(KaosImgError::raster("cannot derive a key schedule for an empty buffer"));
        }
        let schedule_len = len.max(TABLE_SIZE);
        let mut trajectories = ChaoticSequences::generate(params, schedule_len);
        let schedule = Self::from_sequences(&trajectories, len)?;
        trajectories.truncate(len);
        Ok((schedule, trajectories))
    }

    /// Quantizes existing trajectories into a schedule of `len` positions.
    ///
    /// The trajectories must hold at least `max(len, 256)` values.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidRaster`] if the trajectories are too
    /// short.
    pub fn from_sequences(seq: &ChaoticSequences, len: usize) -> Result<Self> {
        let needed = len.max(TABLE_SIZE);
        if seq.u.len() < needed || seq.v.len() < needed || seq.w.len() < needed {
            return Err(KaosImgError::raster(format!(
                "key schedule for {len} positions needs {needed} trajectory values, got {}",
                seq.u.len().min(seq.v.len()).min(seq.w.len())
            )));
        }

        let mut control = quantize_all(&seq.u[..needed], &seq.v[..needed], &seq.w[..needed]);
        let sbox = SubstitutionBox::from_control(&control.al)?;
        control.truncate(len);

        let ControlVectors { al, bl, cl, modes } = control;
        let iv = al
            .iter()
            .chain(bl.iter())
            .chain(cl.iter())
            .fold(0u8, |acc, &x| acc.wrapping_add(x));
        debug!(len, "derived key schedule");

        Ok(KeySchedule {
            al,
            bl,
            cl,
            modes,
            sbox,
            iv,
        })
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.al.len()
    }

    /// Returns `true` if the schedule covers no positions.
    pub fn is_empty(&self) -> bool {
        self.al.is_empty()
    }

    /// Pre-diffusion mask and substitution row selector.
    pub fn al(&self) -> &[u8] {
        &self.al
    }

    /// Affine multipliers, all odd.
    pub fn bl(&self) -> &[u8] {
        &self.bl
    }

    /// Affine offsets.
    pub fn cl(&self) -> &[u8] {
        &self.cl
    }

    /// Mode bits: [`MODE_SUBSTITUTION`] or [`MODE_AFFINE`].
    pub fn modes(&self) -> &[u8] {
        &self.modes
    }

    /// Row 0 of the substitution table.
    pub fn permutation(&self) -> &[u8; TABLE_SIZE] {
        self.sbox.permutation()
    }

    /// The substitution table and its inverse.
    pub fn substitution(&self) -> &SubstitutionBox {
        &self.sbox
    }

    /// Initialization value injected at position 0.
    pub fn iv(&self) -> u8 {
        self.iv
    }

    /// Inverts every affine multiplier modulo 256.
    ///
    /// # Errors
    /// Returns [`KaosImgError::NonInvertibleState`] at the first even
    /// multiplier. This is checked before any ciphertext byte is touched.
    pub fn bl_inverse(&self) -> Result<Vec<u8>> {
        self.bl
            .iter()
            .enumerate()
            .map(|(i, &b)| inverse_mod_256(b, i))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn bl_mut(&mut self) -> &mut [u8] {
        &mut self.bl
    }
}

struct ControlVectors {
    al: Vec<u8>,
    bl: Vec<u8>,
    cl: Vec<u8>,
    modes: Vec<u8>,
}

impl ControlVectors {
    fn with_capacity(n: usize) -> Self {
        ControlVectors {
            al: Vec::with_capacity(n),
            bl: Vec::with_capacity(n),
            cl: Vec::with_capacity(n),
            modes: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, [a, b, c, m]: [u8; 4]) {
        self.al.push(a);
        self.bl.push(b);
        self.cl.push(c);
        self.modes.push(m);
    }

    fn truncate(&mut self, len: usize) {
        self.al.truncate(len);
        self.bl.truncate(len);
        self.cl.truncate(len);
        self.modes.truncate(len);
    }
}

/// Control bytes for a single position: `[AL, BL, CL, C]`.
#[inline]
fn control_at(u: f64, v: f64, w: f64) -> [u8; 4] {
    let a = quantize(u + v);
    let b = quantize(v + w);
    let c = quantize(u + w);
    let mode = ((a as u16 + b as u16 + c as u16) & 1) as u8;
    [a, b | 1, c, mode]
}

#[cfg(not(feature = "parallel"))]
fn quantize_all(u: &[f64], v: &[f64], w: &[f64]) -> ControlVectors {
    let mut control = ControlVectors::with_capacity(u.len());
    for ((&ui, &vi), &wi) in u.iter().zip(v).zip(w) {
        control.push(control_at(ui, vi, wi));
    }
    control
}

#[cfg(feature = "parallel")]
fn quantize_all(u: &[f64], v: &[f64], w: &[f64]) -> ControlVectors {
    use rayon::prelude::*;

    let packed: Vec<[u8; 4]> = u
        .par_iter()
        .zip(v.par_iter())
        .zip(w.par_iter())
        .map(|((&ui, &vi), &wi)| control_at(ui, vi, wi))
        .collect();
    let mut control = ControlVectors::with_capacity(packed.len());
    for bytes in packed {
        control.push(bytes);
    }
    control
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::modular::MOD_INVERSE;

    #[test]
    fn test_lengths_match_request() {
        for len in [1, 12, 255, 256, 257, 3000] {
            let (schedule, seq) = KeySchedule::derive(&ChaosParams::default(), len).unwrap();
            assert_eq!(schedule.len(), len);
            assert_eq!(schedule.bl().len(), len);
            assert_eq!(schedule.cl().len(), len);
            assert_eq!(schedule.modes().len(), len);
            assert_eq!(seq.len(), len);
        }
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let err = KeySchedule::derive(&ChaosParams::default(), 0).unwrap_err();
        assert!(matches!(err, KaosImgError::InvalidRaster { .. }));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = ChaosParams::default();
        params.p_pwlcm = 0.6;
        let err = KeySchedule::derive(&params, 64).unwrap_err();
        assert!(matches!(
            err,
            KaosImgError::InvalidParameter {
                field: "p_pwlcm",
                ..
            }
        ));
    }

    #[test]
    fn test_formulas_against_trajectories() {
        let (schedule, seq) = KeySchedule::derive(&ChaosParams::default(), 1024).unwrap();
        for i in 0..1024 {
            let a = quantize(seq.u[i] + seq.v[i]);
            let b_raw = quantize(seq.v[i] + seq.w[i]);
            let c = quantize(seq.u[i] + seq.w[i]);
            assert_eq!(schedule.al()[i], a);
            assert_eq!(schedule.bl()[i], b_raw | 1);
            assert_eq!(schedule.cl()[i], c);
            assert_eq!(
                schedule.modes()[i] as u32,
                (a as u32 + b_raw as u32 + c as u32) % 2
            );
        }
    }

    #[test]
    fn test_bl_always_odd_and_invertible() {
        let (schedule, _) = KeySchedule::derive(&ChaosParams::default(), 5000).unwrap();
        let inverse = schedule.bl_inverse().unwrap();
        for (&b, &b_inv) in schedule.bl().iter().zip(&inverse) {
            assert_eq!(b & 1, 1);
            assert_eq!(b.wrapping_mul(b_inv), 1);
            assert_eq!(MOD_INVERSE[b as usize], b_inv);
        }
    }

    #[test]
    fn test_both_modes_occur() {
        let (schedule, _) = KeySchedule::derive(&ChaosParams::default(), 4096).unwrap();
        let affine = schedule.modes().iter().filter(|&&m| m == MODE_AFFINE).count();
        assert!(affine > 0 && affine < 4096);
        assert!(schedule.modes().iter().all(|&m| m <= 1));
    }

    #[test]
    fn test_iv_is_sum_of_vectors() {
        let (schedule, _) = KeySchedule::derive(&ChaosParams::default(), 777).unwrap();
        let total: u64 = schedule
            .al()
            .iter()
            .chain(schedule.bl())
            .chain(schedule.cl())
            .map(|&x| x as u64)
            .sum();
        assert_eq!(schedule.iv() as u64, total % 256);
    }

    #[test]
    fn test_short_schedule_is_prefix_of_long() {
        let params = ChaosParams::default();
        let (short, _) = KeySchedule::derive(&params, 12).unwrap();
        let (long, _) = KeySchedule::derive(&params, 256).unwrap();
        assert_eq!(short.al(), &long.al()[..12]);
        assert_eq!(short.bl(), &long.bl()[..12]);
        assert_eq!(short.cl(), &long.cl()[..12]);
        assert_eq!(short.permutation(), long.permutation());
    }

    #[test]
    fn test_from_sequences_requires_256_values() {
        let seq = ChaoticSequences::generate(&ChaosParams::default(), 100);
        let err = KeySchedule::from_sequences(&seq, 100).unwrap_err();
        assert!(matches!(err, KaosImgError::InvalidRaster { .. }));
    }

    #[test]
    fn test_even_multiplier_is_reported() {
        let (mut schedule, _) = KeySchedule::derive(&ChaosParams::default(), 300).unwrap();
        schedule.bl_mut()[17] = 40;
        assert_eq!(
            schedule.bl_inverse(),
            Err(KaosImgError::NonInvertibleState {
                position: 17,
                value: 40
            })
        );
    }

    #[test]
    fn test_deterministic() {
        let params = ChaosParams::default();
        let (a, sa) = KeySchedule::derive(&params, 2048).unwrap();
        let (b, sb) = KeySchedule::derive(&params, 2048).unwrap();
        assert_eq!(a, b);
        assert_eq!(sa, sb);
    }
}
