use std::path::{Path, PathBuf};

use glam::DMat4;
use wis3d_geometry::io::load_geometry;
use wis3d_geometry::pointcloud::{PointCloud, PointCloudError};
use wis3d_tensor::{normalize, ArrayInput, DeviceTensor, Tensor};

use super::{rgb8_rows, rows};
use crate::error::{TensorResultExt, Wis3dError};
use crate::paths::ObjectKind;

const KIND: ObjectKind = ObjectKind::PointCloud;

/// The accepted forms of a point cloud.
#[derive(Debug)]
pub enum PointCloudInput {
    /// A `.ply` or `.obj` file; only its vertices, colors and normals are kept.
    FromPath(PathBuf),
    /// Vertex positions with optional per-vertex colors.
    FromArray {
        /// Positions, reshaped to rows of three.
        vertices: ArrayInput,
        /// Colors, one row per vertex.
        colors: Option<ArrayInput>,
    },
    /// An already loaded point cloud.
    FromLoaded(PointCloud),
}

impl PointCloudInput {
    /// Vertex positions with per-vertex colors.
    pub fn with_colors(vertices: impl Into<ArrayInput>, colors: impl Into<ArrayInput>) -> Self {
        Self::FromArray {
            vertices: vertices.into(),
            colors: Some(colors.into()),
        }
    }
}

impl From<PathBuf> for PointCloudInput {
    fn from(path: PathBuf) -> Self {
        Self::FromPath(path)
    }
}

impl From<&Path> for PointCloudInput {
    fn from(path: &Path) -> Self {
        Self::FromPath(path.to_path_buf())
    }
}

impl From<PointCloud> for PointCloudInput {
    fn from(pointcloud: PointCloud) -> Self {
        Self::FromLoaded(pointcloud)
    }
}

impl From<ArrayInput> for PointCloudInput {
    fn from(vertices: ArrayInput) -> Self {
        Self::FromArray {
            vertices,
            colors: None,
        }
    }
}

impl From<Vec<[f64; 3]>> for PointCloudInput {
    fn from(vertices: Vec<[f64; 3]>) -> Self {
        ArrayInput::from(vertices).into()
    }
}

impl From<Tensor> for PointCloudInput {
    fn from(vertices: Tensor) -> Self {
        ArrayInput::from(vertices).into()
    }
}

impl From<DeviceTensor> for PointCloudInput {
    fn from(vertices: DeviceTensor) -> Self {
        ArrayInput::from(vertices).into()
    }
}

/// Resolve the input into a point cloud expressed in the viewer frame.
pub fn build_point_cloud(
    input: PointCloudInput,
    transform: &DMat4,
) -> Result<PointCloud, Wis3dError> {
    let mut pointcloud = match input {
        PointCloudInput::FromPath(path) => {
            load_geometry(&path)?.into_point_cloud().map_err(pointcloud_error)?
        }
        PointCloudInput::FromArray { vertices, colors } => {
            let points = rows::<3>(vertices, KIND, "vertices")?;
            let colors = match colors {
                Some(colors) => {
                    let colors = normalize(colors).field(KIND, "colors")?;
                    Some(rgb8_rows(&colors, KIND, "colors", points.len())?)
                }
                None => None,
            };
            PointCloud::new(points, colors, None).map_err(pointcloud_error)?
        }
        PointCloudInput::FromLoaded(pointcloud) => pointcloud,
    };
    pointcloud.transform(transform);
    Ok(pointcloud)
}

fn pointcloud_error(err: PointCloudError) -> Wis3dError {
    match err {
        PointCloudError::AttributeCountMismatch {
            attribute,
            num_points,
            count,
        } => Wis3dError::shape_mismatch(KIND, attribute, num_points, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wis3d_geometry::frame::AxisPattern;

    #[test]
    fn test_opencv_pattern() -> Result<(), Box<dyn std::error::Error>> {
        let transform = AxisPattern::parse(&["x", "-y", "-z"])?.transform();
        let pointcloud = build_point_cloud(vec![[1.0, 2.0, 3.0]].into(), &transform)?;
        assert_eq!(pointcloud.points(), &vec![[1.0, -2.0, -3.0]]);
        assert!(pointcloud.colors().is_none());
        Ok(())
    }

    #[test]
    fn test_float_colors() -> Result<(), Box<dyn std::error::Error>> {
        let input = PointCloudInput::with_colors(
            vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
            vec![[1.0, 0.0, 0.0], [0.0, 0.5, 1.0]],
        );
        let pointcloud = build_point_cloud(input, &DMat4::IDENTITY)?;
        assert_eq!(pointcloud.colors(), Some(&vec![[255, 0, 0], [0, 128, 255]]));
        Ok(())
    }

    #[test]
    fn test_color_count_mismatch() {
        let input = PointCloudInput::with_colors(
            vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
            vec![[255u8, 0, 0]],
        );
        let res = build_point_cloud(input, &DMat4::IDENTITY);
        assert!(matches!(
            res,
            Err(Wis3dError::ShapeMismatch {
                kind: ObjectKind::PointCloud,
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_loaded_attribute_mismatch() {
        let res = PointCloud::new(vec![[0.0; 3]; 3], Some(vec![[255, 0, 0]]), None)
            .map_err(pointcloud_error);
        assert!(matches!(
            res,
            Err(Wis3dError::ShapeMismatch {
                kind: ObjectKind::PointCloud,
                ref field,
                expected: 3,
                actual: 1,
            }) if field == "colors"
        ));
    }

    #[test]
    fn test_flat_vertices_reshape() -> Result<(), Box<dyn std::error::Error>> {
        let input = PointCloudInput::from(ArrayInput::from(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]));
        let pointcloud = build_point_cloud(input, &DMat4::IDENTITY)?;
        assert_eq!(pointcloud.len(), 2);

        let bad = PointCloudInput::from(ArrayInput::from(vec![0.0, 1.0]));
        assert!(matches!(
            build_point_cloud(bad, &DMat4::IDENTITY),
            Err(Wis3dError::Tensor { field: "vertices", .. })
        ));
        Ok(())
    }
}
