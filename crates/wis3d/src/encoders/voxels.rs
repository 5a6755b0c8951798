use std::path::{Path, PathBuf};

use glam::DMat4;
use wis3d_tensor::ArrayInput;

use super::{optional_rows, rows, transform_directions};
use crate::error::Wis3dError;
use crate::paths::ObjectKind;
use crate::records::{VoxelCenter, VoxelList, VoxelRecord, VoxelSize};

const KIND: ObjectKind = ObjectKind::BoxVoxel;

/// The accepted forms of voxels.
#[derive(Debug)]
pub enum VoxelInput {
    /// A `.binvox` or `.vox` file, copied without changes.
    FromPath(PathBuf),
    /// Voxel centers, `(n, 3)` or `(3,)`, with a common size.
    FromCenters {
        /// The voxel centers.
        centers: ArrayInput,
        /// The side length of every voxel.
        voxel_size: f64,
    },
}

impl VoxelInput {
    /// Voxels given by their centers.
    pub fn from_centers(centers: impl Into<ArrayInput>, voxel_size: f64) -> Self {
        Self::FromCenters {
            centers: centers.into(),
            voxel_size,
        }
    }

    /// The object kind a voxel file is exported as.
    pub(crate) fn file_kind(path: &Path) -> Result<ObjectKind, Wis3dError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("binvox") => Ok(ObjectKind::BinVoxel),
            Some("vox") => Ok(ObjectKind::VoxVoxel),
            _ => Err(Wis3dError::UnsupportedInputType {
                kind: KIND,
                detail: format!("{} is not a .binvox or .vox file", path.display()),
            }),
        }
    }
}

impl From<PathBuf> for VoxelInput {
    fn from(path: PathBuf) -> Self {
        Self::FromPath(path)
    }
}

impl From<&Path> for VoxelInput {
    fn from(path: &Path) -> Self {
        Self::FromPath(path.to_path_buf())
    }
}

/// Options for [`crate::Wis3d::add_voxel`].
#[derive(Debug, Default)]
pub struct VoxelOptions {
    /// One RGB color per voxel; only valid for voxels given by centers.
    pub colors: Option<ArrayInput>,
    /// The output file name, without extension.
    pub name: Option<String>,
}

/// Encode voxels given by their centers.
pub fn encode_voxels(
    centers: impl Into<ArrayInput>,
    voxel_size: f64,
    colors: Option<ArrayInput>,
    transform: &DMat4,
) -> Result<VoxelRecord, Wis3dError> {
    if !voxel_size.is_finite() || voxel_size <= 0.0 {
        return Err(Wis3dError::invalid_argument(
            KIND,
            format!("voxel size must be positive, got {voxel_size}"),
        ));
    }
    let mut centers = rows::<3>(centers, KIND, "centers")?;
    let colors = optional_rows::<3>(colors, KIND, "colors", centers.len())?;
    transform_directions(&mut centers, transform);

    let voxels = centers
        .into_iter()
        .enumerate()
        .map(|(i, voxel_center)| VoxelCenter {
            voxel_center,
            color: colors.as_ref().map(|colors| colors[i]),
        })
        .collect();
    Ok(VoxelRecord(VoxelSize { voxel_size }, VoxelList { voxels }))
}
