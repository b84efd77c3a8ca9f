//! Free-form fin sets
//!
//! A fin is drawn on the XY plane with its root along the X axis and the span
//! towards +Y. An optional through-the-wall tab hangs below the root (−Y).
//! Each fin of the set gets its own placement transform that moves the
//! outline onto the parent tube's surface and spreads the fins evenly around
//! the rocket axis.

use glam::{DAffine3, DVec2, DVec3};

use crate::import::ImportError;
use crate::position::{TabPositionMode, TabPositionSpec};
use crate::shape::ResolvedTab;

/// Closed fin outline with its root measurements
#[derive(Debug, Clone, PartialEq)]
pub struct FinProfile {
    /// Outline vertices, implicitly closed
    pub points: Vec<DVec2>,
    /// X of the first declared point (leading edge of the root)
    pub root_start: f64,
    pub root_length: f64,
    pub tab: Option<ResolvedTab>,
}

/// Validate a declared fin count
pub fn fin_count(declared: i64) -> Result<usize, ImportError> {
    if declared < 1 {
        return Err(ImportError::InvalidFinSet(format!(
            "fin count must be at least 1, got {}",
            declared
        )));
    }
    usize::try_from(declared).map_err(|e| ImportError::InvalidFinSet(e.to_string()))
}

/// Build the fin outline, appending the tab rectangle when one is declared.
///
/// A tab longer than the root is clamped to the root length.
pub fn build_profile(
    points: &[DVec2],
    tab_height: f64,
    tab_length: f64,
    tab_position: TabPositionSpec,
) -> Result<FinProfile, ImportError> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(ImportError::InvalidFinSet("fin has no points".to_string()));
    };

    let root_start = first.x;
    let root_length = last.x - first.x;
    let mut outline = points.to_vec();
    let mut tab = None;

    if tab_height * tab_length > 0.0 {
        let (length, remaining) = if tab_length > root_length {
            (root_length, 0.0)
        } else {
            (tab_length, root_length - tab_length)
        };

        let lead = match tab_position.mode {
            TabPositionMode::Front => 0.0,
            TabPositionMode::Center => remaining / 2.0,
            TabPositionMode::End => remaining,
        };
        let start = root_start + lead + tab_position.offset;
        let end = start + length;

        outline.extend([
            DVec2::new(end, 0.0),
            DVec2::new(end, -tab_height),
            DVec2::new(start, -tab_height),
            DVec2::new(start, 0.0),
        ]);

        tab = Some(ResolvedTab {
            mode: tab_position.mode,
            start,
            length,
            height: tab_height,
            remaining,
        });
    }

    outline.dedup();
    if outline.len() > 1 && outline.first() == outline.last() {
        outline.pop();
    }

    Ok(FinProfile {
        points: outline,
        root_start,
        root_length,
        tab,
    })
}

/// Where a fin set sits on its parent tube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinPlacement {
    /// Radius of the tube surface the root is attached to
    pub parent_radius: f64,
    pub thickness: f64,
    pub cant_deg: f64,
    pub rotation_deg: f64,
    /// Resolved axial position of the fin set
    pub x_location: f64,
}

impl FinPlacement {
    /// Placement transform of every fin in the set.
    ///
    /// Each fin is lifted onto the tube surface and centred on its thickness,
    /// canted about the Y axis through the middle of the root, moved to its
    /// axial position, then rotated about the rocket axis by the set rotation
    /// plus its share of the full turn.
    pub fn instances(&self, profile: &FinProfile, fin_count: usize) -> Vec<DAffine3> {
        let lift = DAffine3::from_translation(DVec3::new(
            0.0,
            self.parent_radius,
            -self.thickness / 2.0,
        ));

        let pivot = DVec3::new(profile.root_start + profile.root_length / 2.0, 0.0, 0.0);
        let cant = DAffine3::from_translation(pivot)
            * DAffine3::from_rotation_y(self.cant_deg.to_radians())
            * DAffine3::from_translation(-pivot);

        let axial = DAffine3::from_translation(DVec3::new(self.x_location, 0.0, 0.0));
        let base = axial * cant * lift;

        let spacing = 360.0 / fin_count as f64;
        (0..fin_count)
            .map(|i| {
                let angle = self.rotation_deg + i as f64 * spacing;
                DAffine3::from_rotation_x(angle.to_radians()) * base
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Root chord of 50
    fn triangle() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(30.0, 30.0),
            DVec2::new(50.0, 0.0),
        ]
    }

    fn tab(mode: TabPositionMode, offset: f64) -> TabPositionSpec {
        TabPositionSpec::new(mode, offset)
    }

    fn assert_vec3(actual: DVec3, expected: DVec3) {
        assert_relative_eq!(actual.x, expected.x, epsilon = 1e-9);
        assert_relative_eq!(actual.y, expected.y, epsilon = 1e-9);
        assert_relative_eq!(actual.z, expected.z, epsilon = 1e-9);
    }

    #[test]
    fn test_profile_without_tab() {
        let profile = build_profile(&triangle(), 0.0, 20.0, tab(TabPositionMode::Front, 0.0))
            .unwrap();
        assert_eq!(profile.points, triangle());
        assert_relative_eq!(profile.root_length, 50.0);
        assert!(profile.tab.is_none());
    }

    #[test]
    fn test_tab_clamp() {
        let profile = build_profile(&triangle(), 10.0, 80.0, tab(TabPositionMode::Center, 0.0))
            .unwrap();
        let tab = profile.tab.unwrap();
        assert_relative_eq!(tab.length, 50.0);
        assert_relative_eq!(tab.remaining, 0.0);
        assert_relative_eq!(tab.start, 0.0);
    }

    #[test]
    fn test_front_tab_outline() {
        let profile = build_profile(&triangle(), 5.0, 20.0, tab(TabPositionMode::Front, 0.0))
            .unwrap();

        // The closing point coincides with the first point and is dropped
        assert_eq!(
            profile.points,
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(30.0, 30.0),
                DVec2::new(50.0, 0.0),
                DVec2::new(20.0, 0.0),
                DVec2::new(20.0, -5.0),
                DVec2::new(0.0, -5.0),
            ]
        );
    }

    #[test]
    fn test_tab_modes() {
        let start = |mode, offset| {
            build_profile(&triangle(), 5.0, 20.0, tab(mode, offset))
                .unwrap()
                .tab
                .unwrap()
                .start
        };

        assert_relative_eq!(start(TabPositionMode::Front, 0.0), 0.0);
        assert_relative_eq!(start(TabPositionMode::Center, 0.0), 15.0);
        assert_relative_eq!(start(TabPositionMode::End, 0.0), 30.0);
        assert_relative_eq!(start(TabPositionMode::End, -2.0), 28.0);
    }

    #[test]
    fn test_end_tab_reaches_trailing_edge() {
        let profile = build_profile(&triangle(), 5.0, 20.0, tab(TabPositionMode::End, 0.0))
            .unwrap();
        assert_relative_eq!(profile.tab.unwrap().end(), 50.0);
        // (50, 0) is both the last root point and the tab's first corner
        assert_eq!(profile.points.len(), 6);
    }

    #[test]
    fn test_empty_fin() {
        let result = build_profile(&[], 0.0, 0.0, TabPositionSpec::default());
        assert!(matches!(result, Err(ImportError::InvalidFinSet(_))));
    }

    #[test]
    fn test_fin_count() {
        assert_eq!(fin_count(3).unwrap(), 3);
        assert!(matches!(fin_count(0), Err(ImportError::InvalidFinSet(_))));
        assert!(matches!(fin_count(-2), Err(ImportError::InvalidFinSet(_))));
    }

    #[test]
    fn test_instances_spread_around_axis() {
        let profile = build_profile(&triangle(), 0.0, 0.0, TabPositionSpec::default()).unwrap();
        let placement = FinPlacement {
            parent_radius: 25.0,
            thickness: 0.0,
            cant_deg: 0.0,
            rotation_deg: 0.0,
            x_location: 100.0,
        };
        let instances = placement.instances(&profile, 4);
        assert_eq!(instances.len(), 4);

        let root = DVec3::ZERO;
        assert_vec3(instances[0].transform_point3(root), DVec3::new(100.0, 25.0, 0.0));
        assert_vec3(instances[1].transform_point3(root), DVec3::new(100.0, 0.0, 25.0));
        assert_vec3(instances[2].transform_point3(root), DVec3::new(100.0, -25.0, 0.0));
    }

    #[test]
    fn test_thickness_is_centred() {
        let profile = build_profile(&triangle(), 0.0, 0.0, TabPositionSpec::default()).unwrap();
        let placement = FinPlacement {
            parent_radius: 25.0,
            thickness: 4.0,
            cant_deg: 0.0,
            rotation_deg: 0.0,
            x_location: 0.0,
        };
        let first = placement.instances(&profile, 1)[0];
        assert_vec3(first.transform_point3(DVec3::ZERO), DVec3::new(0.0, 25.0, -2.0));
        assert_vec3(first.transform_point3(DVec3::new(0.0, 0.0, 4.0)), DVec3::new(0.0, 25.0, 2.0));
    }

    #[test]
    fn test_cant_pivots_on_mid_root() {
        let profile = build_profile(
            &[DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0), DVec2::new(2.0, 0.0)],
            0.0,
            0.0,
            TabPositionSpec::default(),
        )
        .unwrap();
        let placement = FinPlacement {
            parent_radius: 10.0,
            thickness: 0.0,
            cant_deg: 90.0,
            rotation_deg: 0.0,
            x_location: 5.0,
        };
        let fin = placement.instances(&profile, 1)[0];

        // The pivot stays put, the trailing edge swings towards -Z
        assert_vec3(fin.transform_point3(DVec3::new(1.0, 0.0, 0.0)), DVec3::new(6.0, 10.0, 0.0));
        assert_vec3(fin.transform_point3(DVec3::new(2.0, 0.0, 0.0)), DVec3::new(6.0, 10.0, -1.0));
    }

    #[test]
    fn test_set_rotation() {
        let profile = build_profile(&triangle(), 0.0, 0.0, TabPositionSpec::default()).unwrap();
        let placement = FinPlacement {
            parent_radius: 25.0,
            thickness: 0.0,
            cant_deg: 0.0,
            rotation_deg: 90.0,
            x_location: 0.0,
        };
        let fin = placement.instances(&profile, 3)[0];
        assert_vec3(fin.transform_point3(DVec3::ZERO), DVec3::new(0.0, 0.0, 25.0));
    }
}
