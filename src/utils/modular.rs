//! Arithmetic over the ring Z/256.
//!
//! Only odd residues are units modulo 2^8, so the inverse table leaves every
//! even slot at zero. Callers must never look those up; the affine
//! multiplier is forced odd during key derivation.

use crate::error::{KaosImgError, Result};

/// Multiplicative inverses modulo 256, indexed by the odd residue.
///
/// `MOD_INVERSE[b]` is the unique odd `b⁻¹` with `b · b⁻¹ ≡ 1 (mod 256)`
/// for odd `b`, and `0` for even `b`.
pub const MOD_INVERSE: [u8; 256] = build_inverse_table();

/// Newton iteration `x ← x · (2 − b·x)` doubles the number of correct low
/// bits; `x = b` is already correct modulo 8 for odd `b`, so two rounds
/// reach modulo 256.
const fn build_inverse_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut b = 1usize;
    while b < 256 {
        let bb = b as u8;
        let mut x = bb;
        x = x.wrapping_mul(2u8.wrapping_sub(bb.wrapping_mul(x)));
        x = x.wrapping_mul(2u8.wrapping_sub(bb.wrapping_mul(x)));
        table[b] = x;
        b += 2;
    }
    table
}

/// Returns the inverse of `b` modulo 256.
///
/// # Errors
/// Returns [`KaosImgError::NonInvertibleState`] if `b` is even; `position`
/// is reported back so the caller can locate the offending multiplier.
pub fn inverse_mod_256(b: u8, position: usize) -> Result<u8> {
    if b & 1 == 0 {
        return Err(KaosImgError::NonInvertibleState { position, value: b });
    }
    Ok(MOD_INVERSE[b as usize])
}

/// Quantizes a non-negative real into a byte: `floor(x · 10^14 mod 256)`.
///
/// The multiplication by 10^14 pushes low-order mantissa bits of the
/// trajectory sum into the modulo-256 reduction.
#[inline]
pub fn quantize(x: f64) -> u8 {
    ((x * 1e14).rem_euclid(256.0)).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_odd_residue_is_inverted() {
        for b in (1u16..256).step_by(2) {
            let inv = MOD_INVERSE[b as usize];
            assert_eq!(
                (b * inv as u16) % 256,
                1,
                "inverse of {} is wrong: {}",
                b,
                inv
            );
            assert_eq!(inv & 1, 1);
        }
    }

    #[test]
    fn test_known_inverses() {
        assert_eq!(MOD_INVERSE[1], 1);
        assert_eq!(MOD_INVERSE[3], 171);
        assert_eq!(MOD_INVERSE[255], 255);
    }

    #[test]
    fn test_even_slots_empty() {
        for b in (0..256).step_by(2) {
            assert_eq!(MOD_INVERSE[b], 0);
        }
    }

    #[test]
    fn test_inverse_mod_256_rejects_even() {
        assert_eq!(inverse_mod_256(7, 0).unwrap(), 183);
        assert_eq!(
            inverse_mod_256(12, 5),
            Err(KaosImgError::NonInvertibleState {
                position: 5,
                value: 12
            })
        );
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(0.0), 0);
        // 10^14 / 2^40 = 90.949...
        assert_eq!(quantize(2f64.powi(-40)), 90);
        // 3 * 90.949... = 272.848... -> 16.848...
        assert_eq!(quantize(3.0 * 2f64.powi(-40)), 16);
        // 10^14 is a multiple of 256
        assert_eq!(quantize(1.0), 0);
    }
}
