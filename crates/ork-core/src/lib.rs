//! OpenRocket design resolution
//!
//! This crate turns an OpenRocket component tree into positioned geometric
//! parameters ready for a solid modeller:
//! - Document: `.ork` loading into a labeled tree
//! - Curves: nose-cone profile families
//! - Position: axial placement rules per component category
//! - Auto references: inherited dimensions
//! - Walker: stage traversal and the axial stack cursor
//! - Sinks: consumers of the resolved records (kernel bodies with `cad`)

pub mod auto_ref;
pub mod component;
pub mod constants;
pub mod curve;
pub mod document;
pub mod fin;
pub mod import;
pub mod position;
pub mod shape;
pub mod sink;
pub mod walker;

pub use component::*;
pub use constants::*;
pub use curve::*;
pub use document::*;
pub use import::*;
pub use position::*;
pub use shape::*;
pub use sink::*;
pub use walker::*;
