//! Consumers of resolved records
//!
//! The walker hands every [`ResolvedShape`] to a [`ShapeSink`]. A sink either
//! accepts the record or reports a per-body failure; failures are collected
//! in the import report and never stop the traversal.

use crate::shape::ResolvedShape;

#[cfg(feature = "cad")]
pub use kernel_sink::{BuiltBody, KernelSink};

/// Per-body failure reported by a sink
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SinkError {
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Kernel error: {0}")]
    Kernel(String),
}

/// Receiver of resolved records, in traversal order
pub trait ShapeSink {
    fn emit(&mut self, shape: &ResolvedShape) -> Result<(), SinkError>;
}

impl ShapeSink for Vec<ResolvedShape> {
    fn emit(&mut self, shape: &ResolvedShape) -> Result<(), SinkError> {
        self.push(shape.clone());
        Ok(())
    }
}

#[cfg(feature = "cad")]
mod kernel_sink {
    use std::f64::consts::TAU;

    use glam::{DAffine3, DVec2};
    use ork_cad::{Axis3D, CadError, CadKernel, CadResult, ProfilePlane, Solid, Wire2D};

    use super::{ShapeSink, SinkError};
    use crate::shape::{ComponentKind, ResolvedShape, ShapeGeometry, Shoulder};

    impl From<CadError> for SinkError {
        fn from(e: CadError) -> Self {
            SinkError::Kernel(e.to_string())
        }
    }

    /// Solids built for one resolved record
    #[derive(Debug, Clone)]
    pub struct BuiltBody {
        pub label: String,
        pub kind: ComponentKind,
        pub solids: Vec<Solid>,
    }

    /// Builds kernel solids for every record it receives
    pub struct KernelSink<'k> {
        kernel: &'k dyn CadKernel,
        bodies: Vec<BuiltBody>,
    }

    impl<'k> KernelSink<'k> {
        pub fn new(kernel: &'k dyn CadKernel) -> Self {
            Self {
                kernel,
                bodies: Vec::new(),
            }
        }

        pub fn bodies(&self) -> &[BuiltBody] {
            &self.bodies
        }

        /// Total number of solids built so far
        pub fn solid_count(&self) -> usize {
            self.bodies.iter().map(|b| b.solids.len()).sum()
        }

        fn build(&self, shape: &ResolvedShape) -> CadResult<Vec<Solid>> {
            let solids = match &shape.geometry {
                ShapeGeometry::Tube => vec![self.revolve_section(
                    shape.x_start,
                    shape.x_end,
                    shape.inner_radius,
                    shape.outer_radius,
                )?],
                ShapeGeometry::Disc => {
                    vec![self.revolve_section(shape.x_start, shape.x_end, 0.0, shape.outer_radius)?]
                }
                ShapeGeometry::NoseCone {
                    thickness,
                    profile,
                    shoulder,
                    ..
                } => self.build_nose_cone(shape, profile, *thickness, shoulder.as_ref())?,
                ShapeGeometry::FinSet {
                    thickness,
                    profile,
                    instances,
                    ..
                } => self.build_fins(profile, *thickness, instances)?,
            };

            if shape.radial.is_zero() {
                return Ok(solids);
            }

            let offset = DAffine3::from_translation(shape.radial.to_vector());
            solids
                .iter()
                .map(|solid| self.kernel.transform(solid, &offset))
                .collect()
        }

        fn revolve_section(
            &self,
            x_start: f64,
            x_end: f64,
            inner_radius: f64,
            outer_radius: f64,
        ) -> CadResult<Solid> {
            let wire = Wire2D::axial_section(x_start, x_end, inner_radius, outer_radius);
            self.revolve(&wire)
        }

        fn revolve(&self, wire: &Wire2D) -> CadResult<Solid> {
            self.kernel
                .revolve(wire, &ProfilePlane::xy(), &Axis3D::x(), TAU)
        }

        fn build_nose_cone(
            &self,
            shape: &ResolvedShape,
            profile: &[DVec2],
            thickness: f64,
            shoulder: Option<&Shoulder>,
        ) -> CadResult<Vec<Solid>> {
            let wire = Wire2D::closed(nose_section(profile, thickness));
            let cone = self.revolve(&wire)?;

            let Some(shoulder) = shoulder else {
                return Ok(vec![cone]);
            };

            let mut tube = self.revolve_section(
                shoulder.x_start,
                shoulder.x_end(),
                shoulder.inner_radius,
                shoulder.outer_radius,
            )?;

            if shoulder.capped {
                let cap_start = shoulder.x_end() - (shoulder.outer_radius - shoulder.inner_radius);
                let cap = self.revolve_section(cap_start, shoulder.x_end(), 0.0, shoulder.outer_radius)?;
                tube = match self.kernel.union(&tube, &cap) {
                    Ok(capped) => capped,
                    Err(e) => {
                        tracing::warn!("Could not cap shoulder of {}: {}", shape.label(), e);
                        return Ok(vec![cone, tube, cap]);
                    }
                };
            }

            match self.kernel.union(&cone, &tube) {
                Ok(joined) => Ok(vec![joined]),
                Err(e) => {
                    tracing::warn!(
                        "Could not join shoulder to {}, keeping separate bodies: {}",
                        shape.label(),
                        e
                    );
                    Ok(vec![cone, tube])
                }
            }
        }

        fn build_fins(
            &self,
            profile: &[DVec2],
            thickness: f64,
            instances: &[DAffine3],
        ) -> CadResult<Vec<Solid>> {
            let wire = Wire2D::closed(profile.to_vec());
            let fin = self.kernel.extrude(&wire, &ProfilePlane::xy(), thickness)?;

            instances
                .iter()
                .map(|placement| self.kernel.transform(&fin, placement))
                .collect()
        }
    }

    impl ShapeSink for KernelSink<'_> {
        fn emit(&mut self, shape: &ResolvedShape) -> Result<(), SinkError> {
            let solids = self.build(shape)?;
            tracing::debug!(
                "Built {} solid(s) for {} with {}",
                solids.len(),
                shape.label(),
                self.kernel.name()
            );

            self.bodies.push(BuiltBody {
                label: shape.label(),
                kind: shape.kind,
                solids,
            });
            Ok(())
        }
    }

    /// Closed half-section of a nose cone wall.
    ///
    /// The outer profile runs tip to base; a positive thickness adds the
    /// inner surface back from base to tip, otherwise the section is solid
    /// down to the axis.
    pub(crate) fn nose_section(profile: &[DVec2], thickness: f64) -> Vec<DVec2> {
        let mut points: Vec<DVec2> = profile.to_vec();

        if thickness > 0.0 {
            points.extend(
                profile
                    .iter()
                    .rev()
                    .map(|p| DVec2::new(p.x, (p.y - thickness).max(0.0))),
            );
        } else if let (Some(first), Some(last)) = (profile.first(), profile.last()) {
            points.push(DVec2::new(last.x, 0.0));
            points.push(DVec2::new(first.x, 0.0));
        }

        points.dedup();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::curve::NoseShape;
        use crate::shape::RadialOffset;
        use glam::DVec3;
        use ork_cad::NullKernel;
        use std::sync::Mutex;

        /// Records every call and returns empty solids
        #[derive(Default)]
        struct RecordingKernel {
            calls: Mutex<Vec<String>>,
            fail_union: bool,
        }

        impl RecordingKernel {
            fn record(&self, call: &str) {
                self.calls.lock().unwrap().push(call.to_string());
            }

            fn calls(&self) -> Vec<String> {
                self.calls.lock().unwrap().clone()
            }
        }

        impl CadKernel for RecordingKernel {
            fn name(&self) -> &str {
                "recording"
            }

            fn is_available(&self) -> bool {
                true
            }

            fn extrude(&self, _: &Wire2D, _: &ProfilePlane, _: f64) -> CadResult<Solid> {
                self.record("extrude");
                Ok(Solid::default())
            }

            fn revolve(&self, _: &Wire2D, _: &ProfilePlane, _: &Axis3D, _: f64) -> CadResult<Solid> {
                self.record("revolve");
                Ok(Solid::default())
            }

            fn union(&self, _: &Solid, _: &Solid) -> CadResult<Solid> {
                self.record("union");
                if self.fail_union {
                    Err(CadError::BooleanFailed("not supported".into()))
                } else {
                    Ok(Solid::default())
                }
            }

            fn transform(&self, _: &Solid, _: &DAffine3) -> CadResult<Solid> {
                self.record("transform");
                Ok(Solid::default())
            }
        }

        fn tube(radial: RadialOffset) -> ResolvedShape {
            ResolvedShape {
                kind: ComponentKind::InnerTube,
                name: None,
                x_start: 10.0,
                x_end: 60.0,
                outer_radius: 9.0,
                inner_radius: 8.0,
                radial,
                geometry: ShapeGeometry::Tube,
            }
        }

        fn nose(shoulder: Option<Shoulder>) -> ResolvedShape {
            ResolvedShape {
                kind: ComponentKind::NoseCone,
                name: Some("Nose".into()),
                x_start: 0.0,
                x_end: 50.0,
                outer_radius: 25.0,
                inner_radius: 23.0,
                radial: RadialOffset::default(),
                geometry: ShapeGeometry::NoseCone {
                    shape: NoseShape::Conical,
                    thickness: 2.0,
                    profile: vec![DVec2::ZERO, DVec2::new(25.0, 12.5), DVec2::new(50.0, 25.0)],
                    shoulder,
                },
            }
        }

        fn shoulder() -> Shoulder {
            Shoulder {
                x_start: 48.0,
                length: 22.0,
                outer_radius: 23.0,
                inner_radius: 21.0,
                capped: false,
            }
        }

        #[test]
        fn test_tube_is_one_revolve() {
            let kernel = RecordingKernel::default();
            let mut sink = KernelSink::new(&kernel);
            sink.emit(&tube(RadialOffset::default())).unwrap();

            assert_eq!(kernel.calls(), vec!["revolve"]);
            assert_eq!(sink.solid_count(), 1);
        }

        #[test]
        fn test_radial_offset_is_applied() {
            let kernel = RecordingKernel::default();
            let mut sink = KernelSink::new(&kernel);
            let radial = RadialOffset {
                distance: 5.0,
                direction_deg: 0.0,
            };
            sink.emit(&tube(radial)).unwrap();

            assert_eq!(kernel.calls(), vec!["revolve", "transform"]);
        }

        #[test]
        fn test_fin_instances() {
            let kernel = RecordingKernel::default();
            let mut sink = KernelSink::new(&kernel);
            let fins = ResolvedShape {
                kind: ComponentKind::FinSet,
                name: None,
                x_start: 100.0,
                x_end: 150.0,
                outer_radius: 25.0,
                inner_radius: 25.0,
                radial: RadialOffset::default(),
                geometry: ShapeGeometry::FinSet {
                    thickness: 3.0,
                    fin_count: 3,
                    cant_deg: 0.0,
                    rotation_deg: 0.0,
                    root_length: 50.0,
                    tab: None,
                    profile: vec![DVec2::ZERO, DVec2::new(30.0, 40.0), DVec2::new(50.0, 0.0)],
                    instances: vec![DAffine3::from_translation(DVec3::X); 3],
                },
            };
            sink.emit(&fins).unwrap();

            assert_eq!(
                kernel.calls(),
                vec!["extrude", "transform", "transform", "transform"]
            );
            assert_eq!(sink.bodies()[0].solids.len(), 3);
        }

        #[test]
        fn test_shoulder_union() {
            let kernel = RecordingKernel::default();
            let mut sink = KernelSink::new(&kernel);
            sink.emit(&nose(Some(shoulder()))).unwrap();

            assert_eq!(kernel.calls(), vec!["revolve", "revolve", "union"]);
            assert_eq!(sink.solid_count(), 1);
        }

        #[test]
        fn test_failed_union_keeps_separate_bodies() {
            let kernel = RecordingKernel {
                fail_union: true,
                ..Default::default()
            };
            let mut sink = KernelSink::new(&kernel);
            sink.emit(&nose(Some(shoulder()))).unwrap();

            assert_eq!(sink.solid_count(), 2);
            assert_eq!(sink.bodies()[0].label, "nosecone 'Nose'");
        }

        #[test]
        fn test_null_kernel_reports_failure() {
            let kernel = NullKernel;
            let mut sink = KernelSink::new(&kernel);
            let result = sink.emit(&tube(RadialOffset::default()));

            assert!(matches!(result, Err(SinkError::Kernel(_))));
            assert!(sink.bodies().is_empty());
        }

        #[test]
        fn test_hollow_nose_section() {
            let profile = [DVec2::ZERO, DVec2::new(25.0, 12.5), DVec2::new(50.0, 25.0)];
            let points = nose_section(&profile, 2.0);

            // Tip is shared by the outer and inner surface
            assert_eq!(
                points,
                vec![
                    DVec2::ZERO,
                    DVec2::new(25.0, 12.5),
                    DVec2::new(50.0, 25.0),
                    DVec2::new(50.0, 23.0),
                    DVec2::new(25.0, 10.5),
                ]
            );
        }

        #[test]
        fn test_solid_nose_section() {
            let profile = [DVec2::ZERO, DVec2::new(50.0, 25.0)];
            let points = nose_section(&profile, 0.0);
            assert_eq!(
                points,
                vec![DVec2::ZERO, DVec2::new(50.0, 25.0), DVec2::new(50.0, 0.0)]
            );
        }
    }
}
