//! Byte layout and modular arithmetic helpers shared by the cipher stages.

pub mod converter;
pub mod modular;
