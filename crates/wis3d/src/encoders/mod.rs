//! Each encoder turns one polymorphic input into a transformed, validated
//! record. Encoders never touch the filesystem for writing; the session
//! serializes their output and allocates the path only once they succeed.

use glam::{DMat4, DVec3};
use wis3d_tensor::{normalize, ArrayInput, Tensor, TensorError};

use crate::error::{ensure_len, TensorResultExt, Wis3dError};
use crate::paths::ObjectKind;

mod boxes;
mod camera;
mod correspondences;
mod image;
mod lines;
mod mesh;
mod pointcloud;
mod rays;
mod spheres;
mod voxels;

pub use boxes::{encode_boxes, BoxOptions, BoxesInput, DEFAULT_CORNER_ORDER};
pub use camera::{encode_camera_trajectory, poses_from_tensor, TrajectoryOptions};
pub use correspondences::{encode_correspondences, CorrespondenceOptions};
pub use image::{build_image, ImageInput};
pub use lines::{encode_lines, LineOptions};
pub use mesh::{build_mesh, MeshInput};
pub use pointcloud::{build_point_cloud, PointCloudInput};
pub use rays::{sample_rays, RayOptions};
pub use spheres::{encode_spheres, Radius, SphereOptions};
pub use voxels::{encode_voxels, VoxelInput, VoxelOptions};

/// Normalize `input` and view it as rows of `N` values.
pub(crate) fn rows<const N: usize>(
    input: impl Into<ArrayInput>,
    kind: ObjectKind,
    field: &'static str,
) -> Result<Vec<[f64; N]>, Wis3dError> {
    normalize(input).field(kind, field)?.rows::<N>().field(kind, field)
}

/// Like [`rows`], additionally requiring exactly `expected` rows.
pub(crate) fn rows_exact<const N: usize>(
    input: impl Into<ArrayInput>,
    kind: ObjectKind,
    field: &'static str,
    expected: usize,
) -> Result<Vec<[f64; N]>, Wis3dError> {
    let rows = rows::<N>(input, kind, field)?;
    ensure_len(kind, field, expected, rows.len())?;
    Ok(rows)
}

/// Normalize an optional companion array of `expected` rows.
pub(crate) fn optional_rows<const N: usize>(
    input: Option<ArrayInput>,
    kind: ObjectKind,
    field: &'static str,
    expected: usize,
) -> Result<Option<Vec<[f64; N]>>, Wis3dError> {
    input
        .map(|input| rows_exact::<N>(input, kind, field, expected))
        .transpose()
}

/// Rows of 8-bit RGB colors; a trailing alpha channel is dropped.
pub(crate) fn rgb8_rows(
    tensor: &Tensor,
    kind: ObjectKind,
    field: &'static str,
    expected: usize,
) -> Result<Vec<[u8; 3]>, Wis3dError> {
    let channels = if tensor.shape().last() == Some(&4) { 4 } else { 3 };
    if tensor.numel() % channels != 0 {
        return Err(Wis3dError::Tensor {
            kind,
            field,
            source: TensorError::InvalidRowWidth {
                numel: tensor.numel(),
                width: channels,
            },
        });
    }
    let values = tensor.to_u8_vec();
    ensure_len(kind, field, expected, values.len() / channels)?;
    Ok(values
        .chunks_exact(channels)
        .map(|c| [c[0], c[1], c[2]])
        .collect())
}

/// Rotate directions (homogeneous `w = 0`) into the viewer frame.
pub(crate) fn transform_directions(rows: &mut [[f64; 3]], transform: &DMat4) {
    for row in rows.iter_mut() {
        *row = transform.transform_vector3(DVec3::from_array(*row)).to_array();
    }
}
