use glam::{DMat3, DMat4, DVec3};

/// An error type for point cloud construction.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PointCloudError {
    /// A per-point attribute does not have one entry per point.
    #[error("Point cloud has {num_points} points but {count} {attribute}")]
    AttributeCountMismatch {
        /// The attribute name, `colors` or `normals`
        attribute: &'static str,
        /// The number of points
        num_points: usize,
        /// The number of attribute entries
        count: usize,
    },
}

/// Points with optional per-point colors and normals.
///
/// Colors are 8-bit RGB; normals are unit vectors in the same frame as the points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    points: Vec<[f64; 3]>,
    colors: Option<Vec<[u8; 3]>>,
    normals: Option<Vec<[f64; 3]>>,
}

impl PointCloud {
    /// Wrap points with their optional colors and normals.
    ///
    /// # Errors
    ///
    /// Returns [`PointCloudError::AttributeCountMismatch`] unless colors and
    /// normals have exactly one entry per point.
    pub fn new(
        points: Vec<[f64; 3]>,
        colors: Option<Vec<[u8; 3]>>,
        normals: Option<Vec<[f64; 3]>>,
    ) -> Result<Self, PointCloudError> {
        let num_points = points.len();
        check_count("colors", num_points, colors.as_ref().map(Vec::len))?;
        check_count("normals", num_points, normals.as_ref().map(Vec::len))?;
        Ok(Self {
            points,
            colors,
            normals,
        })
    }

    /// The number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the cloud has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point positions.
    pub fn points(&self) -> &Vec<[f64; 3]> {
        &self.points
    }

    /// The per-point colors, if any.
    pub fn colors(&self) -> Option<&Vec<[u8; 3]>> {
        self.colors.as_ref()
    }

    /// The per-point normals, if any.
    pub fn normals(&self) -> Option<&Vec<[f64; 3]>> {
        self.normals.as_ref()
    }

    /// Apply a homogeneous transform to the points and rotate the normals.
    pub fn transform(&mut self, transform: &DMat4) {
        transform_points(&mut self.points, transform);
        if let Some(normals) = self.normals.as_mut() {
            transform_normals(normals, transform);
        }
    }
}

fn check_count(
    attribute: &'static str,
    num_points: usize,
    count: Option<usize>,
) -> Result<(), PointCloudError> {
    match count {
        Some(count) if count != num_points => Err(PointCloudError::AttributeCountMismatch {
            attribute,
            num_points,
            count,
        }),
        _ => Ok(()),
    }
}

/// Apply a homogeneous transform to a list of points in place.
pub fn transform_points(points: &mut [[f64; 3]], transform: &DMat4) {
    for p in points.iter_mut() {
        *p = transform.transform_point3(DVec3::from_array(*p)).to_array();
    }
}

/// Rotate a list of normals in place and renormalize them.
pub fn transform_normals(normals: &mut [[f64; 3]], transform: &DMat4) {
    let linear = DMat3::from_mat4(*transform).inverse().transpose();
    for n in normals.iter_mut() {
        *n = (linear * DVec3::from_array(*n)).normalize_or_zero().to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() -> Result<(), PointCloudError> {
        let pointcloud = PointCloud::new(
            vec![[0.5, 0.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 4.0]],
            Some(vec![[255, 0, 0]; 3]),
            None,
        )?;
        assert_eq!(pointcloud.len(), 3);
        assert!(!pointcloud.is_empty());
        assert_eq!(pointcloud.points()[1], [1.0, 2.0, 0.0]);
        assert_eq!(pointcloud.colors().map(|c| c.len()), Some(3));
        assert!(pointcloud.normals().is_none());
        assert!(PointCloud::new(vec![], None, None)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_attribute_count_mismatch() {
        let points = vec![[0.0; 3]; 3];
        assert_eq!(
            PointCloud::new(points.clone(), Some(vec![[255, 0, 0]]), None),
            Err(PointCloudError::AttributeCountMismatch {
                attribute: "colors",
                num_points: 3,
                count: 1,
            })
        );
        assert_eq!(
            PointCloud::new(points, None, Some(vec![[0.0, 0.0, 1.0]; 4])),
            Err(PointCloudError::AttributeCountMismatch {
                attribute: "normals",
                num_points: 3,
                count: 4,
            })
        );
    }

    #[test]
    fn test_translation_keeps_normals() -> Result<(), PointCloudError> {
        let mut pointcloud = PointCloud::new(vec![[0.0; 3]], None, Some(vec![[0.0, 0.0, 1.0]]))?;
        pointcloud.transform(&DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0)));
        assert_eq!(pointcloud.points()[0], [1.0, 2.0, 3.0]);
        assert_eq!(pointcloud.normals().map(|n| n[0]), Some([0.0, 0.0, 1.0]));
        Ok(())
    }

    #[test]
    fn test_pointcloud_transform() -> Result<(), PointCloudError> {
        let mut pointcloud =
            PointCloud::new(vec![[1.0, 2.0, 3.0]], None, Some(vec![[0.0, 1.0, 0.0]]))?;
        let flip = DMat4::from_mat3(DMat3::from_diagonal(DVec3::new(1.0, -1.0, -1.0)));
        pointcloud.transform(&flip);
        assert_eq!(pointcloud.points()[0], [1.0, -2.0, -3.0]);
        assert_eq!(pointcloud.normals().map(|n| n[0]), Some([0.0, -1.0, 0.0]));
        Ok(())
    }
}
