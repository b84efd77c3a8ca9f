//! Elliptic and circular-arc nose cones

/// Half ellipse with semi-axes `length` (axial) and `radius_base` (radial).
///
/// The curve is centred on the base: `evaluate(0)` is the full base radius and
/// `evaluate(length)` is the tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elliptic {
    radius_base: f64,
    length: f64,
}

impl Elliptic {
    pub fn new(radius_base: f64, length: f64) -> Self {
        Self {
            radius_base,
            length,
        }
    }

    /// Radius at `x`, defined for `x` in `[-length, length]`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.radius_base * (1.0 - x.powi(2) / self.length.powi(2)).sqrt()
    }
}

/// Circular arc through the tip and the base shoulder, centred on the axis.
///
/// With `length == radius_base` this is a hemisphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circular {
    center: f64,
}

impl Circular {
    pub fn new(radius_base: f64, length: f64) -> Self {
        Self {
            center: (length.powi(2) + radius_base.powi(2)) / (2.0 * length),
        }
    }

    /// Radius of the arc (equal to the centre's distance from the tip)
    pub fn arc_radius(&self) -> f64 {
        self.center
    }

    /// Profile radius at `x`, measured from the tip
    pub fn evaluate(&self, x: f64) -> f64 {
        (self.center.powi(2) - (x - self.center).powi(2)).sqrt()
    }
}
