//! ChaosCipher: the forward and inverse diffusion/substitution passes.
//!
//! The forward pass over a channel-major buffer X of length L:
//!
//! ```text
//! X[i]  ^= AL[i]                      pre-diffusion
//! X[0]  ^= IV                         IV injection
//! curr   = X[0]            (i = 0)
//!        = X[i] ^ X'[i-1]  (i > 0)    ciphertext feedback
//! X'[i]  = S[AL[i]][curr]             if C[i] == 0
//!        = BL[i]·curr + CL[i] mod 256 if C[i] == 1
//! ```
//!
//! The feedback makes every output byte depend on all earlier ones, so the
//! loop is strictly sequential. The inverse walks from the end: position
//! `i` only needs ciphertext bytes `i` and `i − 1`, so it runs in place.

use tracing::{debug, debug_span};
use zeroize::Zeroize;

use crate::error::Result;
use crate::key_schedule::{KeySchedule, MODE_SUBSTITUTION};
use crate::params::ChaosParams;
use crate::random::ChaoticSequences;
use crate::raster::Raster;

/// Output of a forward pass over a raster.
///
/// Besides the ciphertext it carries the full key schedule and the chaotic
/// trajectories so that external tools can visualize them. The cipher does
/// not depend on anything reading these.
#[derive(Debug, Clone, PartialEq)]
pub struct Encryption {
    /// Encrypted raster, same shape as the input.
    pub ciphertext: Raster,
    /// AL, BL, CL, C, P, S and IV used for this raster.
    pub key_schedule: KeySchedule,
    /// Logistic, tent and PWLCM trajectories (u, v, w).
    pub trajectories: ChaoticSequences,
}

impl Encryption {
    /// Splits the result into `(ciphertext, key_schedule, trajectories)`.
    pub fn into_parts(self) -> (Raster, KeySchedule, ChaoticSequences) {
        (self.ciphertext, self.key_schedule, self.trajectories)
    }
}

/// Chaos-driven image cipher bound to one validated parameter set.
///
/// The cipher holds no per-call state: every call regenerates its key
/// schedule, so one instance can serve many rasters, including from
/// multiple threads.
///
/// # Examples
///
/// ```
/// use kaosimg::{ChaosCipher, ChaosParams, Raster};
///
/// let cipher = ChaosCipher::new(ChaosParams::default()).unwrap();
/// let plain = Raster::from_fn(4, 4, |r, c| [r as u8, c as u8, 7]).unwrap();
///
/// let encrypted = cipher.encrypt(&plain).unwrap();
/// assert_ne!(encrypted.ciphertext, plain);
///
/// let decrypted = cipher.decrypt(&encrypted.ciphertext).unwrap();
/// assert_eq!(decrypted, plain);
/// ```
#[derive(Debug, Clone)]
pub struct ChaosCipher {
    params: ChaosParams,
}

impl ChaosCipher {
    /// Creates a cipher from a parameter set.
    ///
    /// # Errors
    /// Returns [`InvalidParameter`](crate::KaosImgError::InvalidParameter)
    /// if any parameter is out of its domain.
    pub fn new(params: ChaosParams) -> Result<Self> {
        params.validate()?;
        Ok(ChaosCipher { params })
    }

    /// The parameter set this cipher was built with.
    pub fn params(&self) -> &ChaosParams {
        &self.params
    }

    /// Encrypts a raster.
    ///
    /// # Errors
    /// Fails before touching any byte if the key schedule cannot be derived.
    pub fn encrypt(&self, raster: &Raster) -> Result<Encryption> {
        let span = debug_span!("encrypt", height = raster.height(), width = raster.width());
        let _enter = span.enter();

        let mut buffer = raster.to_channel_major();
        let (key_schedule, trajectories) = self.codec(&mut buffer)?;
        let ciphertext = Raster::from_channel_major(raster.height(), raster.width(), &buffer)?;
        debug!(len = buffer.len(), "raster encrypted");

        Ok(Encryption {
            ciphertext,
            key_schedule,
            trajectories,
        })
    }

    /// Decrypts a raster produced by [`encrypt`](Self::encrypt).
    ///
    /// A wrong parameter set does not produce an error; it produces a
    /// different raster.
    ///
    /// # Errors
    /// Fails before touching any byte if the key schedule cannot be derived
    /// or inverted.
    pub fn decrypt(&self, raster: &Raster) -> Result<Raster> {
        let span = debug_span!("decrypt", height = raster.height(), width = raster.width());
        let _enter = span.enter();

        let mut buffer = raster.to_channel_major();
        self.decodec(&mut buffer)?;
        let plain = Raster::from_channel_major(raster.height(), raster.width(), &buffer);
        buffer.zeroize();
        let plain = plain?;
        debug!(len = plain.len(), "raster decrypted");
        Ok(plain)
    }

    /// Encrypts a channel-major buffer in place.
    ///
    /// # Parameters
    /// - `buffer`: Plaintext bytes, replaced by ciphertext.
    ///
    /// # Returns
    /// The key schedule and trajectories used for this buffer.
    ///
    /// # Errors
    /// Returns [`InvalidRaster`](crate::KaosImgError::InvalidRaster) for an
    /// empty buffer. The buffer is untouched on error.
    pub fn codec(&self, buffer: &mut [u8]) -> Result<(KeySchedule, ChaoticSequences)> {
        let (schedule, trajectories) = KeySchedule::derive(&self.params, buffer.len())?;
        Self::forward_pass(&schedule, buffer);
        Ok((schedule, trajectories))
    }

    /// Decrypts a channel-major buffer in place.
    ///
    /// # Errors
    /// - [`InvalidRaster`](crate::KaosImgError::InvalidRaster) for an empty
    ///   buffer.
    /// - [`NonInvertibleState`](crate::KaosImgError::NonInvertibleState) if an
    ///   affine multiplier has no inverse.
    ///
    /// The buffer is untouched on error.
    pub fn decodec(&self, buffer: &mut [u8]) -> Result<()> {
        let (mut schedule, mut trajectories) = KeySchedule::derive(&self.params, buffer.len())?;
        trajectories.zeroize();
        let result = Self::decodec_with(&schedule, buffer);
        schedule.zeroize();
        result
    }

    /// Inverse pass under an already derived schedule; `buffer` is left
    /// untouched unless every multiplier inverts.
    fn decodec_with(schedule: &KeySchedule, buffer: &mut [u8]) -> Result<()> {
        let mut bl_inv = schedule.bl_inverse()?;
        Self::inverse_pass(schedule, &bl_inv, buffer);
        bl_inv.zeroize();
        Ok(())
    }

    // ──────── Sequential passes ────────

    fn forward_pass(schedule: &KeySchedule, x: &mut [u8]) {
        let al = schedule.al();
        let bl = schedule.bl();
        let cl = schedule.cl();
        let modes = schedule.modes();
        let sbox = schedule.substitution();

        for (xi, &a) in x.iter_mut().zip(al) {
            *xi ^= a;
        }
        x[0] ^= schedule.iv();

        // feedback starts at zero, so position 0 passes through unchanged
        let mut prev = 0u8;
        for (i, xi) in x.iter_mut().enumerate() {
            let curr = *xi ^ prev;
            let out = if modes[i] == MODE_SUBSTITUTION {
                sbox.substitute(al[i], curr)
            } else {
                bl[i].wrapping_mul(curr).wrapping_add(cl[i])
            };
            *xi = out;
            prev = out;
        }
    }

    fn inverse_pass(schedule: &KeySchedule, bl_inv: &[u8], x: &mut [u8]) {
        let al = schedule.al();
        let cl = schedule.cl();
        let modes = schedule.modes();
        let sbox = schedule.substitution();

        // u8 wrapping subtraction is already the residue mod 256
        let undo = |i: usize, y: u8| -> u8 {
            if modes[i] == MODE_SUBSTITUTION {
                sbox.invert(al[i], y)
            } else {
                y.wrapping_sub(cl[i]).wrapping_mul(bl_inv[i])
            }
        };

        // x[i - 1] is still ciphertext while position i is being undone
        for i in (1..x.len()).rev() {
            x[i] = undo(i, x[i]) ^ x[i - 1];
        }
        x[0] = undo(0, x[0]) ^ schedule.iv();

        for (xi, &a) in x.iter_mut().zip(al) {
            *xi ^= a;
        }
    }
}

/// Encrypts `raster` under `params`.
///
/// # Errors
/// - [`InvalidParameter`](crate::KaosImgError::InvalidParameter) if
///   `params` is out of domain.
///
/// # Examples
///
/// ```
/// use kaosimg::{decrypt, encrypt, ChaosParams, Raster};
///
/// let params = ChaosParams::default();
/// let plain = Raster::zeroed(2, 2).unwrap();
/// let (ciphertext, schedule, _) = encrypt(&plain, &params).unwrap().into_parts();
/// assert_eq!(schedule.len(), 12);
/// assert_eq!(decrypt(&ciphertext, &params).unwrap(), plain);
/// ```
pub fn encrypt(raster: &Raster, params: &ChaosParams) -> Result<Encryption> {
    ChaosCipher::new(params.clone())?.encrypt(raster)
}

/// Decrypts `raster` under `params`.
///
/// # Errors
/// - [`InvalidParameter`](crate::KaosImgError::InvalidParameter) if
///   `params` is out of domain.
pub fn decrypt(raster: &Raster, params: &ChaosParams) -> Result<Raster> {
    ChaosCipher::new(params.clone())?.decrypt(raster)
}
