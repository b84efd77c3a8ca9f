//! Straight cone and parabolic series nose cones

/// Straight cone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conical {
    radius_base: f64,
    length: f64,
}

impl Conical {
    pub fn new(radius_base: f64, length: f64) -> Self {
        Self {
            radius_base,
            length,
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.radius_base * x / self.length
    }
}

/// Parabolic series, `k` in `[0, 1]`: 0 is a cone, 1 a full parabola
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabolic {
    radius_base: f64,
    length: f64,
    k: f64,
}

impl Parabolic {
    pub fn new(radius_base: f64, length: f64, k: f64) -> Self {
        Self {
            radius_base,
            length,
            k,
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let t = x / self.length;
        self.radius_base * (2.0 * t - self.k * t.powi(2)) / (2.0 - self.k)
    }
}
