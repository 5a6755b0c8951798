#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Affine compose and decompose.
pub mod affine;

/// Euler angle conventions.
pub mod euler;

/// Axis patterns and the coordinate frame transform.
pub mod frame;

/// I/O utilities for reading and writing 3D data.
pub mod io;

/// Triangle mesh container.
pub mod mesh;

/// Point cloud container.
pub mod pointcloud;

pub use glam::{DMat3, DMat4, DQuat, DVec3, DVec4};
