//! Geometry kernel abstraction and backends

mod traits;
#[cfg(feature = "truck")]
mod truck;

pub use traits::{
    Axis3D, CadError, CadKernel, CadResult, NullKernel, ProfilePlane, Solid, Wire2D,
    default_kernel, kernel_by_name,
};
#[cfg(feature = "truck")]
pub use truck::TruckKernel;
