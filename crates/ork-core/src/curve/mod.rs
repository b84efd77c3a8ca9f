//! Nose-cone profile curves
//!
//! Closed-form radius-versus-axial-position functions for every supported
//! nose-cone family:
//! - Ogive (with optional spherical-cap tip blunting)
//! - Haack series (Von Kármán, LV-Haack)
//! - Elliptic and circular arc
//! - Conical and parabolic series

mod conical;
mod elliptic;
mod haack;
mod ogive;

use glam::DVec2;
use serde::{Deserialize, Serialize};

pub use conical::{Conical, Parabolic};
pub use elliptic::{Circular, Elliptic};
pub use haack::{Haack, LV_HAACK, VON_KARMAN};
pub use ogive::{Ogive, SphericalCap};

/// Curve evaluation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("{curve} curve is undefined at x = {x} (length {length})")]
    Domain {
        curve: &'static str,
        x: f64,
        length: f64,
    },
}

/// Result type for curve evaluation
pub type CurveResult<T> = Result<T, CurveError>;

/// Nose-cone shape family as declared in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoseShape {
    #[default]
    Ogive,
    Haack,
    Conical,
    Parabolic,
    Elliptic,
    Circular,
}

impl NoseShape {
    /// Parse a shape token, ignoring case
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "ogive" => Some(Self::Ogive),
            "haack" => Some(Self::Haack),
            "cone" | "conical" => Some(Self::Conical),
            "parabola" | "parabolic" => Some(Self::Parabolic),
            "elliptic" | "ellipsoid" => Some(Self::Elliptic),
            "circular" => Some(Self::Circular),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ogive => "ogive",
            Self::Haack => "haack",
            Self::Conical => "conical",
            Self::Parabolic => "parabolic",
            Self::Elliptic => "elliptic",
            Self::Circular => "circular",
        }
    }
}

/// A nose-cone curve with its parameters bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoseCurve {
    Ogive(Ogive),
    Haack(Haack),
    Conical(Conical),
    Parabolic(Parabolic),
    Elliptic(Elliptic),
    Circular(Circular),
}

impl NoseCurve {
    /// Bind a shape family to a base radius, length and shape parameter.
    ///
    /// The shape parameter is the Haack constant or the parabolic `k`; the
    /// other families ignore it.
    pub fn new(shape: NoseShape, radius_base: f64, length: f64, shape_parameter: f64) -> Self {
        match shape {
            NoseShape::Ogive => Self::Ogive(Ogive::new(radius_base, length)),
            NoseShape::Haack => Self::Haack(Haack::new(radius_base, length, shape_parameter)),
            NoseShape::Conical => Self::Conical(Conical::new(radius_base, length)),
            NoseShape::Parabolic => {
                Self::Parabolic(Parabolic::new(radius_base, length, shape_parameter))
            }
            NoseShape::Elliptic => Self::Elliptic(Elliptic::new(radius_base, length)),
            NoseShape::Circular => Self::Circular(Circular::new(radius_base, length)),
        }
    }

    pub fn shape(&self) -> NoseShape {
        match self {
            Self::Ogive(_) => NoseShape::Ogive,
            Self::Haack(_) => NoseShape::Haack,
            Self::Conical(_) => NoseShape::Conical,
            Self::Parabolic(_) => NoseShape::Parabolic,
            Self::Elliptic(_) => NoseShape::Elliptic,
            Self::Circular(_) => NoseShape::Circular,
        }
    }

    /// Profile radius at `x` with the tip at 0 and the base at `length`
    pub fn radius_at(&self, x: f64, length: f64) -> CurveResult<f64> {
        let y = match self {
            Self::Ogive(c) => c.evaluate(x),
            Self::Haack(c) => c.evaluate(x)?,
            Self::Conical(c) => c.evaluate(x),
            Self::Parabolic(c) => c.evaluate(x),
            // The ellipse is centred on the base, mirror it so the tip is at 0
            Self::Elliptic(c) => c.evaluate(length - x),
            Self::Circular(c) => c.evaluate(x),
        };

        if y.is_finite() {
            Ok(y)
        } else {
            Err(CurveError::Domain {
                curve: self.shape().name(),
                x,
                length,
            })
        }
    }

    /// Sample the outer profile from the tip to the base.
    ///
    /// `tip_radius` blunts an ogive with a spherical cap; the profile then
    /// starts at the cap apex. The last sample is placed exactly at `length`.
    pub fn profile(
        &self,
        length: f64,
        divisions: usize,
        tip_radius: f64,
    ) -> CurveResult<Vec<DVec2>> {
        let divisions = divisions.max(2);

        let (start, cap) = match self {
            Self::Ogive(ogive) if tip_radius > 0.0 => {
                let cap = ogive.spherical_cap(tip_radius);
                if !cap.apex_x.is_finite() || !cap.tangency_x.is_finite() {
                    return Err(CurveError::Domain {
                        curve: "spherical cap",
                        x: tip_radius,
                        length,
                    });
                }
                (cap.apex_x, Some(*ogive))
            }
            _ => (0.0, None),
        };

        let delta = (length - start) / (divisions - 1) as f64;
        let mut points = Vec::with_capacity(divisions);

        for i in 0..divisions {
            let x = if i + 1 == divisions {
                length
            } else {
                start + delta * i as f64
            };

            let y = match cap {
                Some(ogive) => {
                    let y = ogive.evaluate_spherical_cap(x, tip_radius);
                    if !y.is_finite() {
                        return Err(CurveError::Domain {
                            curve: "spherical cap",
                            x,
                            length,
                        });
                    }
                    y
                }
                None => self.radius_at(x, length)?,
            };

            points.push(DVec2::new(x, y));
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL_SHAPES: [NoseShape; 6] = [
        NoseShape::Ogive,
        NoseShape::Haack,
        NoseShape::Conical,
        NoseShape::Parabolic,
        NoseShape::Elliptic,
        NoseShape::Circular,
    ];

    #[test]
    fn test_shape_tokens() {
        assert_eq!(NoseShape::from_token("OGIVE"), Some(NoseShape::Ogive));
        assert_eq!(NoseShape::from_token("Haack"), Some(NoseShape::Haack));
        assert_eq!(NoseShape::from_token("cone"), Some(NoseShape::Conical));
        assert_eq!(NoseShape::from_token("ellipsoid"), Some(NoseShape::Elliptic));
        assert_eq!(NoseShape::from_token("power"), None);
    }

    #[test]
    fn test_ogive_endpoints() {
        for (r, l) in [(25.0, 50.0), (0.0125, 0.1), (3.0, 300.0)] {
            let ogive = Ogive::new(r, l);
            assert_relative_eq!(ogive.evaluate(l), r, max_relative = 1e-9);
            assert_relative_eq!(ogive.evaluate(0.0), 0.0, epsilon = 1e-9 * r);
        }
    }

    #[test]
    fn test_every_family_spans_tip_to_base() {
        for shape in ALL_SHAPES {
            let curve = NoseCurve::new(shape, 25.0, 50.0, 0.5);
            assert_eq!(curve.shape(), shape);
            assert_relative_eq!(curve.radius_at(0.0, 50.0).unwrap(), 0.0, epsilon = 1e-9);
            assert_relative_eq!(
                curve.radius_at(50.0, 50.0).unwrap(),
                25.0,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_profile_sampling() {
        let curve = NoseCurve::new(NoseShape::Ogive, 25.0, 50.0, 0.0);
        let points = curve.profile(50.0, 100, 0.0).unwrap();

        assert_eq!(points.len(), 100);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[99].x, 50.0);
        assert_relative_eq!(points[99].y, 25.0, max_relative = 1e-9);
        assert!(points.windows(2).all(|w| w[1].x > w[0].x));
    }

    #[test]
    fn test_blunted_profile_starts_at_apex() {
        let curve = NoseCurve::new(NoseShape::Ogive, 25.0, 50.0, 0.0);
        let points = curve.profile(50.0, 50, 5.0).unwrap();
        let apex = Ogive::new(25.0, 50.0).spherical_cap_apex(5.0);

        assert_relative_eq!(points[0].x, apex);
        assert_relative_eq!(points[0].y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(points[49].y, 25.0, max_relative = 1e-9);
    }

    #[test]
    fn test_oversized_tip_radius() {
        let curve = NoseCurve::new(NoseShape::Ogive, 25.0, 50.0, 0.0);
        // rho - R = 37.5, anything beyond cannot be tangent
        assert!(curve.profile(50.0, 10, 60.0).is_err());
    }

    #[test]
    fn test_zero_radius_ogive_is_domain_error() {
        let curve = NoseCurve::new(NoseShape::Ogive, 0.0, 50.0, 0.0);
        assert!(matches!(
            curve.radius_at(10.0, 50.0),
            Err(CurveError::Domain { curve: "ogive", .. })
        ));
    }

    #[test]
    fn test_haack_profile_reaches_base_exactly() {
        let curve = NoseCurve::new(NoseShape::Haack, 10.0, 0.3, 0.0);
        let points = curve.profile(0.3, 100, 0.0).unwrap();
        assert_relative_eq!(points[99].y, 10.0, max_relative = 1e-9);
    }
}
