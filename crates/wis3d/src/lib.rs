#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! A [`Wis3d`] session writes geometric primitives into a directory tree
//! that the wis3d web viewer reads:
//!
//! ```text
//! <out_folder>/<sequence_name>/<scene_id:05>/<type_folder>/<name|index:05>.<ext>
//! ```
//!
//! Every spatial quantity is first mapped through the session's coordinate
//! transform, which is derived from the declared axis pattern.
//!
//! ```no_run
//! use wis3d::{SessionConfig, Wis3d};
//!
//! let config = SessionConfig::new("/tmp/wis3d", "demo").with_xyz_pattern(["x", "-y", "-z"]);
//! let mut vis = Wis3d::new(config)?;
//! vis.add_point_cloud(vec![[0.0, 0.0, 1.0], [1.0, 0.0, 1.0]].into(), None)?;
//! vis.increase_scene_id();
//! # Ok::<(), wis3d::Wis3dError>(())
//! ```

/// Session configuration.
pub mod config;

/// Geometry encoders: polymorphic inputs to transformed records.
pub mod encoders;

/// Error types for the exporter.
pub mod error;

/// Object kinds and export path allocation.
pub mod paths;

/// Serializable records written as JSON.
pub mod records;

/// The process-wide scene addressing table.
pub mod registry;

/// The session façade.
pub mod session;

pub use config::SessionConfig;
pub use encoders::{
    BoxOptions, BoxesInput, CorrespondenceOptions, ImageInput, LineOptions, MeshInput,
    PointCloudInput, Radius, RayOptions, SphereOptions, TrajectoryOptions, VoxelInput,
    VoxelOptions,
};
pub use error::Wis3dError;
pub use paths::{ExportPaths, ObjectKind};
pub use registry::SceneRegistry;
pub use session::Wis3d;

#[doc(inline)]
pub use wis3d_geometry as geometry;

#[doc(inline)]
pub use wis3d_io as io;

#[doc(inline)]
pub use wis3d_tensor as tensor;
