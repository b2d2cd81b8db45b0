//! Chaotic parameter set: the secret key of the cipher.
//!
//! The six scalars seed and shape the logistic, tent and PWLCM recurrences.
//! They are validated once, up front, and never persisted by the crate.
//! Callers that collect parameters from forms or config files use
//! [`ParamOverrides`] so that absent fields fall back to documented defaults.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KaosImgError, Result};

/// Default logistic initial condition.
pub const DEFAULT_X0_LOG: f64 = 0.1;
/// Default logistic growth rate.
pub const DEFAULT_MU_LOG: f64 = 3.99;
/// Default tent initial condition.
pub const DEFAULT_X0_TENT: f64 = 0.2;
/// Default tent slope.
pub const DEFAULT_R_TENT: f64 = 1.99;
/// Default PWLCM initial condition.
pub const DEFAULT_X0_PWLCM: f64 = 0.3;
/// Default PWLCM breakpoint.
pub const DEFAULT_P_PWLCM: f64 = 0.254;

/// The six real numbers that make up the cipher key.
///
/// # Domains
/// - `x0_log`, `x0_tent`, `x0_pwlcm`: in (0, 1)
/// - `mu_log`: in (0, 4]
/// - `r_tent`: in (0, 2]
/// - `p_pwlcm`: in (0, 0.5)
///
/// All values must be finite. The struct is wiped when dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ChaosParams {
    /// Logistic map initial condition.
    pub x0_log: f64,
    /// Logistic map growth rate.
    pub mu_log: f64,
    /// Tent map initial condition.
    pub x0_tent: f64,
    /// Tent map slope.
    pub r_tent: f64,
    /// PWLCM initial condition.
    pub x0_pwlcm: f64,
    /// PWLCM breakpoint.
    pub p_pwlcm: f64,
}

impl Default for ChaosParams {
    fn default() -> Self {
        ChaosParams {
            x0_log: DEFAULT_X0_LOG,
            mu_log: DEFAULT_MU_LOG,
            x0_tent: DEFAULT_X0_TENT,
            r_tent: DEFAULT_R_TENT,
            x0_pwlcm: DEFAULT_X0_PWLCM,
            p_pwlcm: DEFAULT_P_PWLCM,
        }
    }
}

impl ChaosParams {
    /// Creates and validates a parameter set.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidParameter`] naming the first field that
    /// violates its domain.
    ///
    /// # Examples
    ///
    /// ```
    /// use kaosimg::ChaosParams;
    ///
    /// let params = ChaosParams::new(0.1, 3.99, 0.2, 1.99, 0.3, 0.254).unwrap();
    /// assert_eq!(params, ChaosParams::default());
    ///
    /// assert!(ChaosParams::new(0.1, 3.99, 0.2, 1.99, 0.3, 0.5).is_err());
    /// ```
    pub fn new(
        x0_log: f64,
        mu_log: f64,
        x0_tent: f64,
        r_tent: f64,
        x0_pwlcm: f64,
        p_pwlcm: f64,
    ) -> Result<Self> {
        let params = ChaosParams {
            x0_log,
            mu_log,
            x0_tent,
            r_tent,
            x0_pwlcm,
            p_pwlcm,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks every field against its domain.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidParameter`] for the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_open_unit("x0_log", self.x0_log)?;
        check_half_open("mu_log", self.mu_log, 4.0, "in (0, 4]")?;
        check_open_unit("x0_tent", self.x0_tent)?;
        check_half_open("r_tent", self.r_tent, 2.0, "in (0, 2]")?;
        check_open_unit("x0_pwlcm", self.x0_pwlcm)?;
        check_finite("p_pwlcm", self.p_pwlcm)?;
        if !(self.p_pwlcm > 0.0 && self.p_pwlcm < 0.5) {
            return Err(KaosImgError::InvalidParameter {
                field: "p_pwlcm",
                value: self.p_pwlcm,
                constraint: "in (0, 0.5)",
            });
        }
        Ok(())
    }

    /// Parses a TOML document, filling absent fields with defaults.
    ///
    /// # Errors
    /// Returns [`KaosImgError::Config`] on malformed TOML and
    /// [`KaosImgError::InvalidParameter`] on out-of-domain values.
    ///
    /// # Examples
    ///
    /// ```
    /// use kaosimg::ChaosParams;
    ///
    /// let params = ChaosParams::from_toml_str("pwlcm_p = 0.3").unwrap();
    /// assert_eq!(params.p_pwlcm, 0.3);
    /// assert_eq!(params.mu_log, 3.99);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        ParamOverrides::from_toml_str(text)?.resolve()
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(KaosImgError::InvalidParameter {
            field,
            value,
            constraint: "finite",
        })
    }
}

fn check_open_unit(field: &'static str, value: f64) -> Result<()> {
    check_finite(field, value)?;
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(KaosImgError::InvalidParameter {
            field,
            value,
            constraint: "in (0, 1)",
        })
    }
}

fn check_half_open(
    field: &'static str,
    value: f64,
    upper: f64,
    constraint: &'static str,
) -> Result<()> {
    check_finite(field, value)?;
    if value > 0.0 && value <= upper {
        Ok(())
    } else {
        Err(KaosImgError::InvalidParameter {
            field,
            value,
            constraint,
        })
    }
}

/// Partially specified parameters as collected at a caller boundary.
///
/// Field names follow [`ChaosParams`]; the short form names used by upload
/// forms (`log_x0`, `log_mu`, `tent_x0`, `tent_r`, `pwlcm_x0`, `pwlcm_p`) are
/// accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamOverrides {
    /// Logistic map initial condition.
    #[serde(alias = "log_x0")]
    pub x0_log: Option<f64>,
    /// Logistic map growth rate.
    #[serde(alias = "log_mu")]
    pub mu_log: Option<f64>,
    /// Tent map initial condition.
    #[serde(alias = "tent_x0")]
    pub x0_tent: Option<f64>,
    /// Tent map slope.
    #[serde(alias = "tent_r")]
    pub r_tent: Option<f64>,
    /// PWLCM initial condition.
    #[serde(alias = "pwlcm_x0")]
    pub x0_pwlcm: Option<f64>,
    /// PWLCM breakpoint.
    #[serde(alias = "pwlcm_p")]
    pub p_pwlcm: Option<f64>,
}

impl ParamOverrides {
    /// Parses overrides from TOML text.
    ///
    /// # Errors
    /// Returns [`KaosImgError::Config`] if the text is not valid TOML or
    /// names an unknown field.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Fills absent fields from [`ChaosParams::default`] and validates.
    ///
    /// # Errors
    /// Returns [`KaosImgError::InvalidParameter`] if a supplied value is out
    /// of domain.
    pub fn resolve(&self) -> Result<ChaosParams> {
        let defaults = ChaosParams::default();
        ChaosParams::new(
            self.x0_log.unwrap_or(defaults.x0_log),
            self.mu_log.unwrap_or(defaults.mu_log),
            self.x0_tent.unwrap_or(defaults.x0_tent),
            self.r_tent.unwrap_or(defaults.r_tent),
            self.x0_pwlcm.unwrap_or(defaults.x0_pwlcm),
            self.p_pwlcm.unwrap_or(defaults.p_pwlcm),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: KaosImgError) -> &'static str {
        match err {
            KaosImgError::InvalidParameter { field, .. } => field,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        assert!(ChaosParams::default().validate().is_ok());
    }

    #[test]
    fn test_initial_conditions_must_be_inside_unit_interval() {
        for bad in [0.0, 1.0, -0.2, 1.5] {
            let err = ChaosParams::new(bad, 3.99, 0.2, 1.99, 0.3, 0.254).unwrap_err();
            assert_eq!(field_of(err), "x0_log");
            let err = ChaosParams::new(0.1, 3.99, bad, 1.99, 0.3, 0.254).unwrap_err();
            assert_eq!(field_of(err), "x0_tent");
            let err = ChaosParams::new(0.1, 3.99, 0.2, 1.99, bad, 0.254).unwrap_err();
            assert_eq!(field_of(err), "x0_pwlcm");
        }
    }

    #[test]
    fn test_mu_upper_bound_inclusive() {
        assert!(ChaosParams::new(0.1, 4.0, 0.2, 1.99, 0.3, 0.254).is_ok());
        let err = ChaosParams::new(0.1, 4.0001, 0.2, 1.99, 0.3, 0.254).unwrap_err();
        assert_eq!(field_of(err), "mu_log");
        let err = ChaosParams::new(0.1, 0.0, 0.2, 1.99, 0.3, 0.254).unwrap_err();
        assert_eq!(field_of(err), "mu_log");
    }

    #[test]
    fn test_tent_slope_domain() {
        assert!(ChaosParams::new(0.1, 3.99, 0.2, 2.0, 0.3, 0.254).is_ok());
        let err = ChaosParams::new(0.1, 3.99, 0.2, 2.5, 0.3, 0.254).unwrap_err();
        assert_eq!(field_of(err), "r_tent");
    }

    #[test]
    fn test_breakpoint_open_interval() {
        for bad in [0.0, 0.5, 0.75, -0.1] {
            let err = ChaosParams::new(0.1, 3.99, 0.2, 1.99, 0.3, bad).unwrap_err();
            assert_eq!(field_of(err), "p_pwlcm");
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = ChaosParams::new(f64::NAN, 3.99, 0.2, 1.99, 0.3, 0.254).unwrap_err();
        assert!(matches!(
            err,
            KaosImgError::InvalidParameter {
                field: "x0_log",
                constraint: "finite",
                ..
            }
        ));
        let err = ChaosParams::new(0.1, f64::INFINITY, 0.2, 1.99, 0.3, 0.254).unwrap_err();
        assert_eq!(field_of(err), "mu_log");
    }

    #[test]
    fn test_overrides_fill_defaults() {
        let overrides = ParamOverrides {
            mu_log: Some(3.7),
            ..ParamOverrides::default()
        };
        let params = overrides.resolve().unwrap();
        assert_eq!(params.mu_log, 3.7);
        assert_eq!(params.x0_log, DEFAULT_X0_LOG);
        assert_eq!(params.p_pwlcm, DEFAULT_P_PWLCM);
    }

    #[test]
    fn test_overrides_accept_form_aliases() {
        let overrides = ParamOverrides::from_toml_str(
            "log_x0 = 0.11\ntent_r = 1.8\nx0_pwlcm = 0.42\n",
        )
        .unwrap();
        assert_eq!(overrides.x0_log, Some(0.11));
        assert_eq!(overrides.r_tent, Some(1.8));
        assert_eq!(overrides.x0_pwlcm, Some(0.42));
        assert_eq!(overrides.mu_log, None);
    }

    #[test]
    fn test_overrides_reject_unknown_field() {
        let err = ParamOverrides::from_toml_str("lorenz_sigma = 10.0").unwrap_err();
        assert!(matches!(err, KaosImgError::Config { .. }));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ChaosParams::from_toml_str("").unwrap(), ChaosParams::default());
    }

    #[test]
    fn test_resolve_validates() {
        let err = ChaosParams::from_toml_str("p_pwlcm = 0.9").unwrap_err();
        assert_eq!(field_of(err), "p_pwlcm");
    }

    #[test]
    fn test_zeroize_clears_fields() {
        let mut params = ChaosParams::default();
        params.zeroize();
        assert_eq!(params.x0_log, 0.0);
        assert_eq!(params.p_pwlcm, 0.0);
    }
}
