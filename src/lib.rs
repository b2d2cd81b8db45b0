//! kaosimg: chaos-driven RGB image cipher.
//!
//! Three one-dimensional chaotic maps (logistic, tent and piecewise linear)
//! are seeded from six real-valued parameters. Their trajectories are
//! quantized into per-position control vectors that drive a keyed 256×256
//! substitution table, an affine transform over Z/256, and a
//! ciphertext-feedback diffusion chain across the whole image. The same
//! parameters regenerate every vector on decryption, so nothing but the
//! parameter set needs to be kept secret.
//!
//! # Architecture
//!
//! ```text
//! ChaosParams ──► ChaoticSequences (u, v, w)
//!                       │ quantize
//!                       ▼
//!                 KeySchedule (AL, BL, CL, C, S, IV)
//!                       │
//! Raster ──vectorize──► ChaosCipher::codec / decodec ──reshape──► Raster
//! ```
//!
//! # Examples
//!
//! Encrypt and decrypt a small raster:
//!
//! ```
//! use kaosimg::{decrypt, encrypt, ChaosParams, Raster};
//!
//! let params = ChaosParams::new(0.1, 3.99, 0.2, 1.99, 0.3, 0.254).unwrap();
//! let plain = Raster::new(2, 2, vec![
//!     255, 0, 0,   0, 255, 0,
//!     0, 0, 255,   255, 255, 255,
//! ]).unwrap();
//!
//! let encrypted = encrypt(&plain, &params).unwrap();
//! assert_ne!(encrypted.ciphertext, plain);
//! assert_eq!(encrypted.key_schedule.len(), 12);
//!
//! let decrypted = decrypt(&encrypted.ciphertext, &params).unwrap();
//! assert_eq!(decrypted, plain);
//! ```
//!
//! Load the key from a TOML fragment, falling back to defaults:
//!
//! ```
//! use kaosimg::ParamOverrides;
//!
//! let params = ParamOverrides::from_toml_str("mu_log = 3.97\np_pwlcm = 0.31")
//!     .unwrap()
//!     .resolve()
//!     .unwrap();
//! assert_eq!(params.mu_log, 3.97);
//! assert_eq!(params.x0_log, 0.1);
//! ```

#![deny(clippy::all)]

pub mod cipher;
pub mod error;
pub mod key_schedule;
pub mod params;
pub mod random;
pub mod raster;
pub mod substitution;
pub mod utils;

pub use cipher::{decrypt, encrypt, ChaosCipher, Encryption};
pub use error::{KaosImgError, Result};
pub use key_schedule::KeySchedule;
pub use params::{ChaosParams, ParamOverrides};
pub use random::ChaoticSequences;
pub use raster::Raster;
