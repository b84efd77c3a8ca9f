//! Tangent ogive and spherical-cap tip blunting

/// Tangent ogive: a circular arc of radius `rho` meeting the body tube
/// tangentially at the base
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ogive {
    radius_base: f64,
    length: f64,
    rho: f64,
}

/// Geometry of a blunted ogive tip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCap {
    /// Blunting radius
    pub radius: f64,
    /// Axial position of the cap centre
    pub center_x: f64,
    /// Axial position where the cap meets the ogive
    pub tangency_x: f64,
    /// Radius of the profile at the tangency point
    pub tangency_y: f64,
    /// Axial position of the blunted tip
    pub apex_x: f64,
}

impl SphericalCap {
    /// Radius of the cap's circular arc at `x`
    pub fn arc(&self, x: f64) -> f64 {
        (self.radius.powi(2) - (x - self.center_x).powi(2))
            .max(0.0)
            .sqrt()
    }
}

impl Ogive {
    pub fn new(radius_base: f64, length: f64) -> Self {
        let rho = (radius_base.powi(2) + length.powi(2)) / (2.0 * radius_base);
        Self {
            radius_base,
            length,
            rho,
        }
    }

    pub fn radius_base(&self) -> f64 {
        self.radius_base
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Radius of the generating circle
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Profile radius at `x`, measured from the tip
    pub fn evaluate(&self, x: f64) -> f64 {
        let tmp = self.rho.powi(2) - (self.length - x).powi(2);
        tmp.sqrt() + self.radius_base - self.rho
    }

    /// Cap geometry for blunting radius `rn`.
    ///
    /// Only meaningful for `rn < rho - radius_base`; larger radii yield NaN
    /// coordinates.
    pub fn spherical_cap(&self, rn: f64) -> SphericalCap {
        let x0 = self.length
            - ((self.rho - rn).powi(2) - (self.rho - self.radius_base).powi(2)).sqrt();
        let yt = rn * (self.rho - self.radius_base) / (self.rho - rn);
        let xt = x0 - (rn.powi(2) - yt.powi(2)).sqrt();
        let xa = x0 - rn;

        SphericalCap {
            radius: rn,
            center_x: x0,
            tangency_x: xt,
            tangency_y: yt,
            apex_x: xa,
        }
    }

    /// Axial position of the blunted tip
    pub fn spherical_cap_apex(&self, rn: f64) -> f64 {
        self.spherical_cap(rn).apex_x
    }

    /// Profile radius at `x` with the tip replaced by a spherical cap.
    ///
    /// Behind the tangency point the ogive applies, between apex and tangency
    /// the cap's arc, and ahead of the apex the profile is empty (0).
    pub fn evaluate_spherical_cap(&self, x: f64, rn: f64) -> f64 {
        let cap = self.spherical_cap(rn);

        if x >= cap.tangency_x {
            self.evaluate(x)
        } else if x >= cap.apex_x {
            cap.arc(x)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rho() {
        let ogive = Ogive::new(25.0, 50.0);
        assert_relative_eq!(ogive.rho(), 62.5);
    }

    #[test]
    fn test_zero_cap_is_sharp_tip() {
        let ogive = Ogive::new(25.0, 50.0);
        let cap = ogive.spherical_cap(0.0);
        assert_relative_eq!(cap.apex_x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(cap.tangency_x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(ogive.evaluate_spherical_cap(10.0, 0.0), ogive.evaluate(10.0));
    }

    #[test]
    fn test_cap_tangency_matches_ogive() {
        let ogive = Ogive::new(25.0, 50.0);
        for rn in [0.5, 2.0, 5.0, 20.0] {
            assert!(rn < ogive.rho() - ogive.radius_base());
            let cap = ogive.spherical_cap(rn);
            let xt = cap.tangency_x;

            assert_relative_eq!(cap.arc(xt), ogive.evaluate(xt), max_relative = 1e-9);
            assert_relative_eq!(cap.tangency_y, ogive.evaluate(xt), max_relative = 1e-9);
            assert_relative_eq!(
                ogive.evaluate_spherical_cap(xt, rn),
                ogive.evaluate(xt),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_cap_regions() {
        let ogive = Ogive::new(25.0, 50.0);
        let rn = 5.0;
        let cap = ogive.spherical_cap(rn);

        assert!(cap.apex_x < cap.tangency_x);
        assert_eq!(ogive.evaluate_spherical_cap(cap.apex_x - 0.1, rn), 0.0);
        assert_relative_eq!(ogive.evaluate_spherical_cap(cap.apex_x, rn), 0.0, epsilon = 1e-5);

        // Tangency lies ahead of the cap centre
        assert!(cap.tangency_x < cap.center_x);
        let between = (cap.apex_x + cap.tangency_x) / 2.0;
        assert_relative_eq!(ogive.evaluate_spherical_cap(between, rn), cap.arc(between));
    }
}
