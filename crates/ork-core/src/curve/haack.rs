//! Haack series nose cones
//!
//! `constant == 0` gives the LD-Haack (Von Kármán) profile, minimum drag for a
//! given length and diameter. `constant == 1/3` gives the LV-Haack profile,
//! minimum drag for a given length and volume.

use std::f64::consts::PI;

use crate::constants::PROFILE_EPSILON;

use super::{CurveError, CurveResult};

/// Von Kármán constant
pub const VON_KARMAN: f64 = 0.0;

/// LV-Haack constant
pub const LV_HAACK: f64 = 1.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Haack {
    radius_base: f64,
    length: f64,
    constant: f64,
}

impl Haack {
    pub fn new(radius_base: f64, length: f64, constant: f64) -> Self {
        Self {
            radius_base,
            length,
            constant,
        }
    }

    pub fn von_karman(radius_base: f64, length: f64) -> Self {
        Self::new(radius_base, length, VON_KARMAN)
    }

    pub fn lv_haack(radius_base: f64, length: f64) -> Self {
        Self::new(radius_base, length, LV_HAACK)
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Profile radius at `x`, measured from the tip.
    ///
    /// `x` must lie within `[0, length]`, otherwise the angular parameter is
    /// undefined and a domain error is returned.
    pub fn evaluate(&self, x: f64) -> CurveResult<f64> {
        let arg = 1.0 - 2.0 * x / self.length;
        if !(-1.0..=1.0).contains(&arg) {
            return Err(self.domain_error(x));
        }
        let theta = arg.acos();

        let tmp = theta - (2.0 * theta).sin() / 2.0 + self.constant * theta.sin().powi(3);
        if tmp < -PROFILE_EPSILON {
            return Err(self.domain_error(x));
        }

        Ok(self.radius_base / PI.sqrt() * tmp.max(0.0).sqrt())
    }

    fn domain_error(&self, x: f64) -> CurveError {
        CurveError::Domain {
            curve: "haack",
            x,
            length: self.length,
        }
    }
}
