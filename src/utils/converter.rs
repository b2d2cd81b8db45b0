//! Interleaved-to-planar byte layout conversion.
//!
//! Rasters are stored pixel-interleaved (`R G B R G B ...`, row-major). The
//! cipher works on a channel-major buffer: every red value in row-major
//! pixel order, then every green value, then every blue value. Encryption
//! and decryption must use exactly this ordering.

use crate::error::{KaosImgError, Result};

/// Number of colour channels handled by the cipher.
pub const CHANNELS: usize = 3;

fn expected_len(height: usize, width: usize) -> Result<usize> {
    height
        .checked_mul(width)
        .and_then(|p| p.checked_mul(CHANNELS))
        .ok_or_else(|| KaosImgError::raster(format!("{height}x{width} raster overflows usize")))
}

fn check_len(actual: usize, height: usize, width: usize) -> Result<usize> {
    let expected = expected_len(height, width)?;
    if actual != expected {
        return Err(KaosImgError::raster(format!(
            "buffer holds {actual} bytes, a {height}x{width} RGB raster needs {expected}"
        )));
    }
    Ok(expected / CHANNELS)
}

/// Converts pixel-interleaved RGB bytes to a channel-major buffer.
///
/// # Parameters
/// - `interleaved`: `height * width * 3` bytes, row-major, RGB per pixel.
/// - `height`, `width`: Raster dimensions.
///
/// # Returns
/// A `Vec<u8>` of the same length laid out `R..R G..G B..B`.
///
/// # Errors
/// Returns [`KaosImgError::InvalidRaster`] if the length does not match the
/// dimensions.
pub fn vectorize(interleaved: &[u8], height: usize, width: usize) -> Result<Vec<u8>> {
    let pixels = check_len(interleaved.len(), height, width)?;
    Ok(interleaved_to_planar(interleaved, pixels))
}

/// Unchecked core of [`vectorize`]; `interleaved.len()` must equal `3 * pixels`.
pub(crate) fn interleaved_to_planar(interleaved: &[u8], pixels: usize) -> Vec<u8> {
    let mut output = vec![0u8; interleaved.len()];
    for (p, rgb) in interleaved.chunks_exact(CHANNELS).enumerate() {
        for (c, &value) in rgb.iter().enumerate() {
            output[c * pixels + p] = value;
        }
    }
    output
}

/// Converts a channel-major buffer back to pixel-interleaved RGB bytes.
///
/// Exact inverse of [`vectorize`].
///
/// # Errors
/// Returns [`KaosImgError::InvalidRaster`] if the length does not match the
/// dimensions.
pub fn reshape(planar: &[u8], height: usize, width: usize) -> Result<Vec<u8>> {
    let pixels = check_len(planar.len(), height, width)?;
    let mut output = vec![0u8; planar.len()];
    for (c, plane) in planar.chunks_exact(pixels.max(1)).enumerate() {
        for (p, &value) in plane.iter().enumerate() {
            output[p * CHANNELS + c] = value;
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectorize_basic() {
        // 1x2 raster: pixel0 = (1,2,3), pixel1 = (4,5,6)
        let interleaved = [1u8, 2, 3, 4, 5, 6];
        let planar = vectorize(&interleaved, 1, 2).unwrap();
        assert_eq!(planar, vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_reshape_basic() {
        let planar = [1u8, 4, 2, 5, 3, 6];
        let interleaved = reshape(&planar, 2, 1).unwrap();
        assert_eq!(interleaved, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_roundtrip() {
        for (h, w) in [(1, 1), (2, 3), (5, 7), (16, 16)] {
            let original: Vec<u8> = (0..h * w * 3).map(|i| (i * 37 % 251) as u8).collect();
            let planar = vectorize(&original, h, w).unwrap();
            assert_eq!(reshape(&planar, h, w).unwrap(), original);
        }
    }

    #[test]
    fn test_channel_major_order() {
        // 2x2 raster with R = 10+p, G = 20+p, B = 30+p
        let mut interleaved = Vec::new();
        for p in 0..4u8 {
            interleaved.extend_from_slice(&[10 + p, 20 + p, 30 + p]);
        }
        let planar = vectorize(&interleaved, 2, 2).unwrap();
        assert_eq!(planar, vec![10, 11, 12, 13, 20, 21, 22, 23, 30, 31, 32, 33]);
    }

    #[test]
    fn test_invalid_length() {
        assert!(matches!(
            vectorize(&[0u8; 7], 1, 2),
            Err(KaosImgError::InvalidRaster { .. })
        ));
        assert!(matches!(
            reshape(&[0u8; 5], 1, 2),
            Err(KaosImgError::InvalidRaster { .. })
        ));
    }

    #[test]
    fn test_empty() {
        assert!(vectorize(&[], 0, 4).unwrap().is_empty());
        assert!(reshape(&[], 3, 0).unwrap().is_empty());
    }
}
