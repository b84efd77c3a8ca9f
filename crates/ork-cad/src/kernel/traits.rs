//! CAD kernel trait definitions
//!
//! These traits define the interface that all geometry backends must implement.
//! Every resolved rocket component is built from three primitives: a profile
//! revolved about the rocket axis, a profile extruded through its plane, and
//! rigid transforms and unions of the resulting solids.

use glam::{DAffine3, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),

    #[error("Unknown kernel: {0}")]
    UnknownKernel(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// A 2D wire (closed loop of edges) used as an extrusion or revolution profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire2D {
    /// Unique identifier
    pub id: Uuid,
    /// Points defining the wire (in order)
    pub points: Vec<DVec2>,
    /// Whether the wire is closed
    pub closed: bool,
}

impl Wire2D {
    /// Create a new wire from points
    pub fn new(points: Vec<DVec2>, closed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            closed,
        }
    }

    /// Closed wire from polygon vertices
    pub fn closed(points: Vec<DVec2>) -> Self {
        Self::new(points, true)
    }

    /// Rectangular half-section of an axisymmetric part.
    ///
    /// X runs along the rocket axis, Y is the radial distance. Revolving this
    /// wire about the X axis produces a tube, or a solid cylinder when
    /// `inner_radius` is zero.
    pub fn axial_section(x_start: f64, x_end: f64, inner_radius: f64, outer_radius: f64) -> Self {
        let inner = inner_radius.max(0.0);
        Self::closed(vec![
            DVec2::new(x_start, inner),
            DVec2::new(x_end, inner),
            DVec2::new(x_end, outer_radius),
            DVec2::new(x_start, outer_radius),
        ])
    }

    /// Signed area of the polygon (positive for counter-clockwise winding)
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.perp_dot(b)
            })
            .sum::<f64>()
            * 0.5
    }

    /// A wire is degenerate when it cannot bound a face
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3 || self.signed_area().abs() <= f64::EPSILON
    }
}

/// Plane a 2D profile is drawn in
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProfilePlane {
    /// Origin of the plane in 3D
    pub origin: DVec3,
    /// Direction of the profile's X coordinate
    pub x_axis: DVec3,
    /// Direction of the profile's Y coordinate
    pub y_axis: DVec3,
}

impl ProfilePlane {
    /// The world XY plane: profile X along the rocket axis, profile Y radial
    pub fn xy() -> Self {
        Self {
            origin: DVec3::ZERO,
            x_axis: DVec3::X,
            y_axis: DVec3::Y,
        }
    }

    /// Plane normal (right-handed)
    pub fn normal(&self) -> DVec3 {
        self.x_axis.cross(self.y_axis).normalize()
    }

    /// Map a profile point into 3D
    pub fn to_world(&self, p: DVec2) -> DVec3 {
        self.origin + self.x_axis * p.x + self.y_axis * p.y
    }
}

impl Default for ProfilePlane {
    fn default() -> Self {
        Self::xy()
    }
}

/// A 3D solid body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solid {
    /// Unique identifier
    pub id: Uuid,
    /// Internal marker for kernel data (actual data stored in kernel)
    #[serde(skip)]
    has_kernel_data: bool,
}

impl Solid {
    /// Create a new solid with the given ID
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            has_kernel_data: false,
        }
    }

    /// Mark that this solid has kernel data
    pub fn with_kernel_data(mut self) -> Self {
        self.has_kernel_data = true;
        self
    }

    /// Check if this solid has kernel data
    pub fn has_kernel_data(&self) -> bool {
        self.has_kernel_data
    }
}

/// Axis definition for revolve operations
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Axis3D {
    /// Origin point of the axis
    pub origin: DVec3,
    /// Direction of the axis (normalized)
    pub direction: DVec3,
}

impl Axis3D {
    /// Create an axis from origin and direction
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// X axis at origin (the rocket axis)
    pub fn x() -> Self {
        Self::new(DVec3::ZERO, DVec3::X)
    }
}

/// The main CAD kernel trait
///
/// Implementations of this trait provide the actual geometry operations
/// using different backends.
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Extrude a 2D profile along its plane normal
    ///
    /// # Arguments
    /// * `profile` - The closed 2D wire to extrude
    /// * `plane` - The plane the profile is drawn in
    /// * `distance` - The extrusion distance
    fn extrude(&self, profile: &Wire2D, plane: &ProfilePlane, distance: f64) -> CadResult<Solid>;

    /// Revolve a 2D profile around an axis
    ///
    /// # Arguments
    /// * `profile` - The closed 2D wire to revolve
    /// * `plane` - The plane the profile is drawn in
    /// * `axis` - The rotation axis
    /// * `angle` - The rotation angle in radians
    fn revolve(
        &self,
        profile: &Wire2D,
        plane: &ProfilePlane,
        axis: &Axis3D,
        angle: f64,
    ) -> CadResult<Solid>;

    /// Fuse two solids into one
    fn union(&self, a: &Solid, b: &Solid) -> CadResult<Solid>;

    /// Produce a transformed copy of a solid
    fn transform(&self, solid: &Solid, transform: &DAffine3) -> CadResult<Solid>;
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

fn unavailable<T>() -> CadResult<T> {
    Err(CadError::KernelNotAvailable(
        "No CAD kernel available".into(),
    ))
}

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn extrude(
        &self,
        _profile: &Wire2D,
        _plane: &ProfilePlane,
        _distance: f64,
    ) -> CadResult<Solid> {
        unavailable()
    }

    fn revolve(
        &self,
        _profile: &Wire2D,
        _plane: &ProfilePlane,
        _axis: &Axis3D,
        _angle: f64,
    ) -> CadResult<Solid> {
        unavailable()
    }

    fn union(&self, _a: &Solid, _b: &Solid) -> CadResult<Solid> {
        unavailable()
    }

    fn transform(&self, _solid: &Solid, _transform: &DAffine3) -> CadResult<Solid> {
        unavailable()
    }
}

/// Get the default CAD kernel based on available features
pub fn default_kernel() -> Box<dyn CadKernel> {
    #[cfg(feature = "truck")]
    {
        Box::new(super::TruckKernel::new())
    }

    #[cfg(not(feature = "truck"))]
    {
        Box::new(NullKernel)
    }
}

/// Look up a kernel by its name
pub fn kernel_by_name(name: &str) -> CadResult<Box<dyn CadKernel>> {
    match name {
        "null" => Ok(Box::new(NullKernel)),
        #[cfg(feature = "truck")]
        "truck" => Ok(Box::new(super::TruckKernel::new())),
        other => Err(CadError::UnknownKernel(other.to_string())),
    }
}
