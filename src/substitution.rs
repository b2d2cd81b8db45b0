//! Dynamic substitution table keyed by the AL control vector.
//!
//! Row 0 of the table is `P = argsort(AL[0..256])`; row `i` is row `i − 1`
//! rotated left by `i`. Composing the rotations gives a closed form
//!
//! ```text
//! S[i][j]     = P[(j + T(i)) mod 256]          T(i) = i(i+1)/2
//! S_inv[i][y] = (P⁻¹[y] − T(i)) mod 256
//! ```
//!
//! so only `P`, `P⁻¹` and the 256 row offsets are stored. Full matrices are
//! materialized on demand for visualization.

use zeroize::Zeroize;

use crate::error::{KaosImgError, Result};

/// Number of rows and columns of the table.
pub const TABLE_SIZE: usize = 256;

/// Keyed 256×256 substitution table with its row-wise inverse.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct SubstitutionBox {
    perm: [u8; TABLE_SIZE],
    inv_perm: [u8; TABLE_SIZE],
    offsets: [u8; TABLE_SIZE],
}

impl SubstitutionBox {
    /// Builds the table from the first 256 AL values.
    ///
    /// `P` is a stable argsort: equal AL values keep their index order.
    ///
    /// # Parameters
    /// - `al`: AL control vector; only the first 256 entries are read.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidRaster`] if `al` has fewer than 256
    /// values.
    ///
    /// # Examples
    ///
    /// ```
    /// use kaosimg::substitution::SubstitutionBox;
    ///
    /// let al: Vec<u8> = (0..=255).rev().collect();
    /// let sbox = SubstitutionBox::from_control(&al).unwrap();
    /// assert_eq!(sbox.permutation()[0], 255);
    /// assert_eq!(sbox.invert(7, sbox.substitute(7, 42)), 42);
    ///
    /// assert!(SubstitutionBox::from_control(&al[..100]).is_err());
    /// ```
    pub fn from_control(al: &[u8]) -> Result<Self> {
        if al.len() < TABLE_SIZE {
            return Err(KaosImgError::raster(format!(
                "substitution table needs {TABLE_SIZE} key bytes, got {}",
                al.len()
            )));
        }
        let mut indices: Vec<u8> = (0..=u8::MAX).collect();
        indices.sort_by_key(|&i| al[i as usize]);

        let mut perm = [0u8; TABLE_SIZE];
        perm.copy_from_slice(&indices);
        Ok(Self::from_permutation(perm))
    }

    /// Builds the table from an explicit row-0 permutation.
    ///
    /// `perm` must be a permutation of 0..=255.
    pub(crate) fn from_permutation(perm: [u8; TABLE_SIZE]) -> Self {
        let mut inv_perm = [0u8; TABLE_SIZE];
        for (x, &y) in perm.iter().enumerate() {
            inv_perm[y as usize] = x as u8;
        }

        // offsets[i] = T(i) mod 256, accumulated as T(i) = T(i-1) + i
        let mut offsets = [0u8; TABLE_SIZE];
        for i in 1..TABLE_SIZE {
            offsets[i] = offsets[i - 1].wrapping_add(i as u8);
        }

        SubstitutionBox {
            perm,
            inv_perm,
            offsets,
        }
    }

    /// Row 0 of the table, `P`.
    pub fn permutation(&self) -> &[u8; TABLE_SIZE] {
        &self.perm
    }

    /// Looks up `S[row][x]`.
    #[inline]
    pub fn substitute(&self, row: u8, x: u8) -> u8 {
        self.perm[x.wrapping_add(self.offsets[row as usize]) as usize]
    }

    /// Looks up `S_inv[row][y]`.
    #[inline]
    pub fn invert(&self, row: u8, y: u8) -> u8 {
        self.inv_perm[y as usize].wrapping_sub(self.offsets[row as usize])
    }

    /// Materializes row `r` of `S`.
    pub fn row(&self, r: u8) -> [u8; TABLE_SIZE] {
        let mut out = [0u8; TABLE_SIZE];
        for (j, slot) in out.iter_mut().enumerate() {
            *slot = self.substitute(r, j as u8);
        }
        out
    }

    /// Materializes row `r` of `S_inv`.
    pub fn inverse_row(&self, r: u8) -> [u8; TABLE_SIZE] {
        let mut out = [0u8; TABLE_SIZE];
        for (y, slot) in out.iter_mut().enumerate() {
            *slot = self.invert(r, y as u8);
        }
        out
    }

    /// Materializes the full 256×256 table `S`, row by row.
    pub fn to_matrix(&self) -> Vec<[u8; TABLE_SIZE]> {
        self.collect_rows(|r| self.row(r))
    }

    /// Materializes the full 256×256 inverse table `S_inv`.
    pub fn to_inverse_matrix(&self) -> Vec<[u8; TABLE_SIZE]> {
        self.collect_rows(|r| self.inverse_row(r))
    }

    #[cfg(not(feature = "parallel"))]
    fn collect_rows<F>(&self, f: F) -> Vec<[u8; TABLE_SIZE]>
    where
        F: Fn(u8) -> [u8; TABLE_SIZE],
    {
        (0..=u8::MAX).map(f).collect()
    }

    #[cfg(feature = "parallel")]
    fn collect_rows<F>(&self, f: F) -> Vec<[u8; TABLE_SIZE]>
    where
        F: Fn(u8) -> [u8; TABLE_SIZE] + Sync + Send,
    {
        use rayon::prelude::*;
        (0..=u8::MAX).into_par_iter().map(f).collect()
    }
}
