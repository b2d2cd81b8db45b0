//! RGB raster container and the vectorization adapter.
//!
//! A [`Raster`] owns `height * width * 3` bytes in pixel-interleaved,
//! row-major order (the layout image decoders produce). The cipher consumes
//! the channel-major view from [`Raster::to_channel_major`] and rebuilds a
//! raster with [`Raster::from_channel_major`].

use crate::error::{KaosImgError, Result};
use crate::utils::converter::{self, CHANNELS};

/// An (N, M, 3) raster of 8-bit RGB samples.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Raster {
    height: usize,
    width: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Wraps interleaved RGB bytes.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidRaster`] if either dimension is zero or
    /// `data.len() != height * width * 3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kaosimg::Raster;
    ///
    /// let raster = Raster::new(1, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(raster.pixel(0, 1), [4, 5, 6]);
    ///
    /// assert!(Raster::new(1, 2, vec![0; 5]).is_err());
    /// ```
    pub fn new(height: usize, width: usize, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(height, width, CHANNELS, data)
    }

    /// Wraps interleaved bytes with an explicit channel count.
    ///
    /// Only three-channel input is accepted; this is the entry point for
    /// decoders that may hand over grayscale or RGBA buffers.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidRaster`] if `channels != 3`, a
    /// dimension is zero, or the length does not match.
    pub fn from_raw(height: usize, width: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if channels != CHANNELS {
            return Err(KaosImgError::raster(format!(
                "raster must have exactly 3 channels, got {channels}"
            )));
        }
        if height == 0 || width == 0 {
            return Err(KaosImgError::raster(format!(
                "raster dimensions must be non-zero, got {height}x{width}"
            )));
        }
        let expected = height
            .checked_mul(width)
            .and_then(|p| p.checked_mul(CHANNELS))
            .ok_or_else(|| KaosImgError::raster("raster dimensions overflow usize"))?;
        if data.len() != expected {
            return Err(KaosImgError::raster(format!(
                "buffer holds {} bytes, a {height}x{width} RGB raster needs {expected}",
                data.len()
            )));
        }
        Ok(Raster {
            height,
            width,
            data,
        })
    }

    /// Creates an all-black raster.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidRaster`] if either dimension is zero.
    pub fn zeroed(height: usize, width: usize) -> Result<Self> {
        let len = height
            .checked_mul(width)
            .and_then(|p| p.checked_mul(CHANNELS))
            .ok_or_else(|| KaosImgError::raster("raster dimensions overflow usize"))?;
        Self::new(height, width, vec![0u8; len])
    }

    /// Creates a raster by evaluating `f(row, col)` for every pixel.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidRaster`] if either dimension is zero.
    pub fn from_fn<F>(height: usize, width: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> [u8; 3],
    {
        let mut data = Vec::with_capacity(height.saturating_mul(width).saturating_mul(CHANNELS));
        for row in 0..height {
            for col in 0..width {
                data.extend_from_slice(&f(row, col));
            }
        }
        Self::new(height, width, data)
    }

    /// Rebuilds a raster from a channel-major buffer.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidRaster`] on a dimension or length
    /// mismatch.
    pub fn from_channel_major(height: usize, width: usize, planar: &[u8]) -> Result<Self> {
        let data = converter::reshape(planar, height, width)?;
        Self::new(height, width, data)
    }

    /// Returns the channel-major buffer (`R..R G..G B..B`).
    pub fn to_channel_major(&self) -> Vec<u8> {
        converter::interleaved_to_planar(&self.data, self.height * self.width)
    }

    /// Number of rows (N).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns (M).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of samples, `3 · N · M`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a constructed raster has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Interleaved RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the raster, returning its interleaved bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the RGB triple at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        let i = self.offset(row, col);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Overwrites the RGB triple at `(row, col)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, row: usize, col: usize, rgb: [u8; 3]) {
        let i = self.offset(row, col);
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "pixel ({row}, {col}) outside {}x{} raster",
            self.height,
            self.width
        );
        (row * self.width + col) * CHANNELS
    }
}

#[cfg(feature = "image")]
mod image_bridge {
    use image::RgbImage;

    use super::Raster;
    use crate::error::{KaosImgError, Result};

    impl TryFrom<RgbImage> for Raster {
        type Error = KaosImgError;

        fn try_from(img: RgbImage) -> Result<Self> {
            let (width, height) = img.dimensions();
            Raster::new(height as usize, width as usize, img.into_raw())
        }
    }

    impl Raster {
        /// Converts into an `image` crate buffer for encoding.
        ///
        /// # Errors
        /// Returns [`KaosImgError::InvalidRaster`] if a dimension exceeds
        /// `u32::MAX`.
        pub fn into_rgb_image(self) -> Result<RgbImage> {
            let width = u32::try_from(self.width)
                .map_err(|_| KaosImgError::raster("raster width exceeds u32"))?;
            let height = u32::try_from(self.height)
                .map_err(|_| KaosImgError::raster("raster height exceeds u32"))?;
            RgbImage::from_raw(width, height, self.data)
                .ok_or_else(|| KaosImgError::raster("buffer does not fit image dimensions"))
        }
    }
}
