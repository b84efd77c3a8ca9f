//! Geometry Kernel Abstraction
//!
//! This crate provides:
//! - An abstract CAD kernel trait (extrude, revolve, union, transform)
//! - A null kernel used when no backend is compiled in
//! - A pure-Rust B-Rep backend built on Truck (feature `truck`)

pub mod kernel;

// Re-exports for convenience
pub use kernel::{
    Axis3D, CadError, CadKernel, CadResult, NullKernel, ProfilePlane, Solid, Wire2D,
    default_kernel, kernel_by_name,
};
#[cfg(feature = "truck")]
pub use kernel::TruckKernel;
