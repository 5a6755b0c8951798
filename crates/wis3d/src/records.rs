use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One oriented box, in the viewer frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    /// The box center.
    pub position: [f64; 3],
    /// The orientation as Euler angles, in radians.
    pub euler: [f64; 3],
    /// The side lengths along the box axes.
    pub extent: [f64; 3],
    /// An optional text label.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
}

/// One line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Where the segment starts.
    pub start_point: [f64; 3],
    /// Where the segment ends.
    pub end_point: [f64; 3],
    /// An optional RGB color.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<[f64; 3]>,
}

/// A sphere radius: a plain number, or a one element array per sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SphereRadius {
    /// The same radius for every sphere.
    Scalar(f64),
    /// A radius given per sphere.
    PerSphere([f64; 1]),
}

/// One sphere, optionally scaled into an ellipsoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereRecord {
    /// The sphere center.
    pub center: [f64; 3],
    /// The sphere radius.
    pub radius: SphereRadius,
    /// Scale factors along the local axes.
    pub scales: [f64; 3],
    /// The orientation as an `[x, y, z, w]` quaternion.
    pub quaternion: [f64; 4],
    /// An optional RGB color.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<[f64; 3]>,
}

/// One voxel of a [`VoxelRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelCenter {
    /// The voxel center.
    pub voxel_center: [f64; 3],
    /// An optional RGB color.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<[f64; 3]>,
}

/// The voxel size entry of a [`VoxelRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoxelSize {
    /// The side length of every voxel.
    pub voxel_size: f64,
}

/// The voxel list entry of a [`VoxelRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelList {
    /// The voxels.
    pub voxels: Vec<VoxelCenter>,
}

/// Voxels given by their centers, serialized as `[{voxel_size}, {voxels}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelRecord(pub VoxelSize, pub VoxelList);

/// Camera poses as parallel arrays of Euler angles and positions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraTrajectoryRecord {
    /// The orientation of each camera.
    pub eulers: Vec<[f64; 3]>,
    /// The position of each camera.
    pub positions: Vec<[f64; 3]>,
}

/// Matched keypoints between two embedded images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrespondenceRecord {
    /// The first image as a PNG data URL.
    pub img0: String,
    /// The second image as a PNG data URL.
    pub img1: String,
    /// Keypoints in the first image.
    pub kpts0: Vec<[f64; 2]>,
    /// The matching keypoints in the second image.
    pub kpts1: Vec<[f64; 2]>,
    /// Keypoints of the first image without a match.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unmatched_kpts0: Option<Vec<[f64; 2]>>,
    /// Keypoints of the second image without a match.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unmatched_kpts1: Option<Vec<[f64; 2]>>,
    /// Named per-match scalar values.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metrics: Option<BTreeMap<String, Vec<f64>>>,
    /// Named per-match flags.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub booleans: Option<BTreeMap<String, Vec<bool>>>,
    /// Free-form metadata.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meta: Option<serde_json::Value>,
}
