use glam::{DMat3, DMat4};
use wis3d_geometry::euler::EulerConvention;
use wis3d_tensor::Tensor;

use crate::error::{TensorResultExt, Wis3dError};
use crate::paths::ObjectKind;
use crate::records::CameraTrajectoryRecord;

const KIND: ObjectKind = ObjectKind::CameraTrajectory;

/// Options for [`crate::Wis3d::add_camera_trajectory`].
#[derive(Debug, Clone)]
pub struct TrajectoryOptions {
    /// The poses use the OpenCV camera convention (y down, z forward).
    ///
    /// Their y and z axes are flipped before the Euler angles are extracted
    /// with `rxyz`; otherwise the angles use `sxyz`.
    pub is_opencv: bool,
    /// The output file name, without extension.
    pub name: Option<String>,
}

impl Default for TrajectoryOptions {
    fn default() -> Self {
        Self {
            is_opencv: true,
            name: None,
        }
    }
}

/// Read camera-to-world poses from a row-major `(n, 4, 4)` tensor.
///
/// With `allow_single` a lone `(4, 4)` matrix is accepted as well.
pub fn poses_from_tensor(tensor: &Tensor, allow_single: bool) -> Result<Vec<DMat4>, Wis3dError> {
    match *tensor.shape() {
        [_, 4, 4] => {}
        [4, 4] if allow_single => {}
        [4, 4] => {
            return Err(Wis3dError::invalid_argument(
                KIND,
                "poses should be of shape (n, 4, 4); add a single pose with add_camera_pose",
            ))
        }
        ref shape => {
            return Err(Wis3dError::invalid_argument(
                KIND,
                format!("poses should be of shape (n, 4, 4), got {shape:?}"),
            ))
        }
    }
    Ok(tensor
        .rows::<16>()
        .field(KIND, "poses")?
        .iter()
        .map(|row| DMat4::from_cols_array(row).transpose())
        .collect())
}

/// Map poses into the viewer frame and split them into Euler angles and positions.
pub fn encode_camera_trajectory(
    poses: &[DMat4],
    is_opencv: bool,
    transform: &DMat4,
) -> CameraTrajectoryRecord {
    let convention = if is_opencv {
        EulerConvention::RXYZ
    } else {
        EulerConvention::SXYZ
    };

    let mut record = CameraTrajectoryRecord::default();
    for pose in poses {
        let mut pose = *transform * *pose;
        if is_opencv {
            pose.y_axis = -pose.y_axis;
            pose.z_axis = -pose.z_axis;
        }
        record
            .eulers
            .push(convention.from_matrix(&DMat3::from_mat4(pose)));
        record.positions.push(pose.w_axis.truncate().to_array());
    }
    record
}
