//! Truck CAD Kernel Backend
//!
//! Pure Rust B-Rep kernel using the Truck library.
//!
//! Note: unions are not wired up yet; callers that need a union
//! must be prepared to keep the operands as separate bodies.

use std::collections::HashMap;
use std::sync::Mutex;

use glam::{DAffine3, DMat4, DVec3};
use uuid::Uuid;

use truck_modeling::{Matrix4, Point3, Solid as TruckSolid, Vector3, Vertex, Wire, builder};

use super::{Axis3D, CadError, CadKernel, CadResult, ProfilePlane, Solid, Wire2D};

/// Truck-based CAD kernel
pub struct TruckKernel {
    /// Storage for solid data (keyed by UUID)
    solids: Mutex<HashMap<Uuid, TruckSolid>>,
}

impl TruckKernel {
    /// Create a new Truck kernel
    pub fn new() -> Self {
        Self {
            solids: Mutex::new(HashMap::new()),
        }
    }

    /// Number of solids currently held by the kernel
    pub fn solid_count(&self) -> usize {
        self.solids.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Store a solid and return a Solid reference
    fn store_solid(&self, solid: TruckSolid) -> CadResult<Solid> {
        let id = Uuid::new_v4();
        let mut solids = self
            .solids
            .lock()
            .map_err(|_| CadError::OperationFailed("Solid store poisoned".into()))?;
        solids.insert(id, solid);
        tracing::trace!("Stored solid {} ({} held)", id, solids.len());
        Ok(Solid::new(id).with_kernel_data())
    }

    /// Get a stored solid by ID
    fn get_solid(&self, id: Uuid) -> CadResult<TruckSolid> {
        let solids = self
            .solids
            .lock()
            .map_err(|_| CadError::OperationFailed("Solid store poisoned".into()))?;
        solids
            .get(&id)
            .cloned()
            .ok_or_else(|| CadError::OperationFailed(format!("Solid {} not found", id)))
    }

    /// Create a wire from 2D points mapped onto the profile plane
    fn create_wire(&self, profile: &Wire2D, plane: &ProfilePlane) -> Wire {
        let vertices: Vec<Vertex> = profile
            .points
            .iter()
            .map(|p| builder::vertex(to_point(plane.to_world(*p))))
            .collect();

        // Create edges between consecutive vertices
        let n = vertices.len();
        let edges: Vec<_> = (0..n)
            .map(|i| {
                let v0 = &vertices[i];
                let v1 = &vertices[(i + 1) % n];
                builder::line(v0, v1)
            })
            .collect();

        edges.into()
    }

    fn check_profile(profile: &Wire2D) -> CadResult<()> {
        if profile.points.len() < 3 {
            return Err(CadError::InvalidProfile(
                "Profile must have at least 3 points".into(),
            ));
        }
        if profile.is_degenerate() {
            return Err(CadError::InvalidProfile("Profile has zero area".into()));
        }
        Ok(())
    }
}

fn to_point(v: DVec3) -> Point3 {
    Point3::new(v.x, v.y, v.z)
}

fn to_vector(v: DVec3) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for TruckKernel {
    fn name(&self) -> &str {
        "truck"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extrude(&self, profile: &Wire2D, plane: &ProfilePlane, distance: f64) -> CadResult<Solid> {
        Self::check_profile(profile)?;

        let wire = self.create_wire(profile, plane);
        let dir = to_vector(plane.normal() * distance);

        let face = builder::try_attach_plane(&[wire])
            .map_err(|e| CadError::OperationFailed(format!("Failed to create face: {:?}", e)))?;

        let solid = builder::tsweep(&face, dir);

        self.store_solid(solid)
    }

    fn revolve(
        &self,
        profile: &Wire2D,
        plane: &ProfilePlane,
        axis: &Axis3D,
        angle: f64,
    ) -> CadResult<Solid> {
        Self::check_profile(profile)?;

        let wire = self.create_wire(profile, plane);

        let face = builder::try_attach_plane(&[wire])
            .map_err(|e| CadError::OperationFailed(format!("Failed to create face: {:?}", e)))?;

        let solid = builder::rsweep(
            &face,
            to_point(axis.origin),
            to_vector(axis.direction),
            truck_modeling::Rad(angle),
        );

        self.store_solid(solid)
    }

    fn union(&self, _a: &Solid, _b: &Solid) -> CadResult<Solid> {
        Err(CadError::BooleanFailed(
            "Union is not implemented for the Truck kernel".into(),
        ))
    }

    fn transform(&self, solid: &Solid, transform: &DAffine3) -> CadResult<Solid> {
        let source = self.get_solid(solid.id)?;
        let m = DMat4::from(*transform).to_cols_array();
        let matrix = Matrix4::new(
            m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8], m[9], m[10], m[11], m[12],
            m[13], m[14], m[15],
        );
        let moved = builder::transformed(&source, matrix);
        self.store_solid(moved)
    }
}
