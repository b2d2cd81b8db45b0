//! Error types for the kaosimg library.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, KaosImgError>;

/// Errors produced by the kaosimg library.
///
/// Every variant is detected before the sequential cipher pass starts, so a
/// failing call never leaves a partially transformed buffer behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KaosImgError {
    /// Raster shape or buffer length cannot be processed.
    #[error("invalid raster: {reason}")]
    InvalidRaster {
        /// Which shape constraint was violated.
        reason: String,
    },
    /// One of the six chaotic parameters is outside its domain.
    #[error("invalid parameter `{field}` = {value}: must be {constraint}")]
    InvalidParameter {
        /// Parameter name, e.g. `p_pwlcm`.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human readable domain, e.g. `in (0, 0.5)`.
        constraint: &'static str,
    },
    /// An even multiplier reached the affine inverse.
    ///
    /// BL is forced odd during derivation, so this signals a construction
    /// bug rather than bad input.
    #[error("affine multiplier {value} at position {position} has no inverse modulo 256")]
    NonInvertibleState {
        /// Buffer position of the offending multiplier.
        position: usize,
        /// The even multiplier value.
        value: u8,
    },
    /// Parameter configuration text could not be parsed.
    #[error("invalid parameter configuration: {message}")]
    Config {
        /// Parser diagnostic.
        message: String,
    },
}

impl KaosImgError {
    pub(crate) fn raster(reason: impl Into<String>) -> Self {
        KaosImgError::InvalidRaster {
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for KaosImgError {
    fn from(err: toml::de::Error) -> Self {
        KaosImgError::Config {
            message: err.to_string(),
        }
    }
}
