use glam::{DMat3, DMat4, DQuat, DVec3};
use wis3d_geometry::affine::decompose;
use wis3d_tensor::{normalize, ArrayInput};

use super::{optional_rows, rows, transform_directions};
use crate::error::{ensure_len, TensorResultExt, Wis3dError};
use crate::paths::ObjectKind;
use crate::records::{SphereRadius, SphereRecord};

const KIND: ObjectKind = ObjectKind::Spheres;

/// The radius of a set of spheres.
#[derive(Debug)]
pub enum Radius {
    /// One radius for all spheres, written as a number.
    Uniform(f64),
    /// One radius per sphere, each written as a one element array.
    PerSphere(ArrayInput),
}

impl From<f64> for Radius {
    fn from(radius: f64) -> Self {
        Self::Uniform(radius)
    }
}

impl From<Vec<f64>> for Radius {
    fn from(radii: Vec<f64>) -> Self {
        Self::PerSphere(radii.into())
    }
}

impl From<ArrayInput> for Radius {
    fn from(radii: ArrayInput) -> Self {
        Self::PerSphere(radii)
    }
}

/// Options for [`crate::Wis3d::add_spheres`].
#[derive(Debug, Default)]
pub struct SphereOptions {
    /// One RGB color per sphere.
    pub colors: Option<ArrayInput>,
    /// Scale factors per sphere, `[1, 1, 1]` when absent. A single row is broadcast.
    pub scales: Option<ArrayInput>,
    /// Orientations as `[w, x, y, z]` quaternions, identity when absent.
    /// A single row is broadcast.
    pub quaternions: Option<ArrayInput>,
    /// The output file name, without extension.
    pub name: Option<String>,
}

/// Encode spheres given by their centers, `(n, 3)` or `(3,)`.
///
/// Each sphere is the ellipsoid `R(q) * diag(scales)` placed at its center.
/// That linear part is mapped into the viewer frame and decomposed again,
/// so the written scales and `xyzw` quaternions describe the same shape in
/// the target axes.
///
/// # Errors
///
/// Returns [`Wis3dError::DegenerateInput`] for a zero scale or a zero length
/// quaternion.
pub fn encode_spheres(
    centers: impl Into<ArrayInput>,
    radius: Radius,
    options: SphereOptions,
    transform: &DMat4,
) -> Result<Vec<SphereRecord>, Wis3dError> {
    let mut centers = rows::<3>(centers, KIND, "centers")?;
    let n = centers.len();
    transform_directions(&mut centers, transform);

    let scales = match options.scales {
        Some(scales) => broadcast(rows::<3>(scales, KIND, "scales")?, n, "scales")?,
        None => vec![[1.0; 3]; n],
    };
    let quaternions = match options.quaternions {
        Some(quaternions) => {
            broadcast(rows::<4>(quaternions, KIND, "quaternions")?, n, "quaternions")?
        }
        None => vec![[1.0, 0.0, 0.0, 0.0]; n],
    };
    let colors = optional_rows::<3>(options.colors, KIND, "colors", n)?;

    let radii = match radius {
        Radius::Uniform(radius) => vec![SphereRadius::Scalar(radius); n],
        Radius::PerSphere(radii) => {
            let radii = normalize(radii).field(KIND, "radius")?.into_vec();
            ensure_len(KIND, "radius", n, radii.len())?;
            radii
                .into_iter()
                .map(|r| SphereRadius::PerSphere([r]))
                .collect()
        }
    };

    let frame = DMat3::from_mat4(*transform);
    let mut spheres = Vec::with_capacity(n);
    for (i, ((center, radius), (scales, quaternion))) in centers
        .into_iter()
        .zip(radii)
        .zip(scales.into_iter().zip(quaternions))
        .enumerate()
    {
        let (scales, quaternion) = orient(&frame, scales, quaternion)?;
        spheres.push(SphereRecord {
            center,
            radius,
            scales,
            quaternion,
            color: colors.as_ref().map(|colors| colors[i]),
        });
    }
    Ok(spheres)
}

// takes a `wxyz` quaternion and returns the scales and the `xyzw` quaternion
// in the viewer frame
fn orient(
    frame: &DMat3,
    scales: [f64; 3],
    [w, x, y, z]: [f64; 4],
) -> Result<([f64; 3], [f64; 4]), Wis3dError> {
    let q = DQuat::from_xyzw(x, y, z, w);
    if q.length() < f64::EPSILON {
        return Err(Wis3dError::degenerate(KIND, "zero length quaternion"));
    }
    let linear =
        *frame * DMat3::from_quat(q.normalize()) * DMat3::from_diagonal(DVec3::from_array(scales));
    let affine =
        decompose(&DMat4::from_mat3(linear)).map_err(|e| Wis3dError::from_affine(KIND, e))?;
    // an ellipsoid is symmetric, a reflected frame only flips a zoom sign
    Ok((affine.zoom.abs().to_array(), DQuat::from_mat3(&affine.rotation).to_array()))
}

fn broadcast<const N: usize>(
    rows: Vec<[f64; N]>,
    n: usize,
    field: &'static str,
) -> Result<Vec<[f64; N]>, Wis3dError> {
    match rows.as_slice() {
        [row] => Ok(vec![*row; n]),
        _ => {
            ensure_len(KIND, field, n, rows.len())?;
            Ok(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_radius() -> Result<(), Box<dyn std::error::Error>> {
        let spheres = encode_spheres(
            [0.0, 0.0, 0.0],
            Radius::Uniform(0.5),
            SphereOptions::default(),
            &DMat4::IDENTITY,
        )?;
        assert_eq!(spheres.len(), 1);
        assert_eq!(spheres[0].radius, SphereRadius::Scalar(0.5));
        assert_eq!(spheres[0].scales, [1.0, 1.0, 1.0]);
        assert_eq!(spheres[0].quaternion, [0.0, 0.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_per_sphere_radius_and_colors() -> Result<(), Box<dyn std::error::Error>> {
        let options = SphereOptions {
            colors: Some(vec![[0u8, 255, 0], [0, 0, 255]].into()),
            quaternions: Some(vec![[0.5, 0.1, 0.2, 0.3]].into()),
            ..Default::default()
        };
        let spheres = encode_spheres(
            vec![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            Radius::from(vec![0.25, 0.75]),
            options,
            &DMat4::IDENTITY,
        )?;
        assert_eq!(spheres[1].radius, SphereRadius::PerSphere([0.75]));
        assert_eq!(spheres[1].color, Some([0.0, 0.0, 255.0]));

        let expected = DQuat::from_xyzw(0.1, 0.2, 0.3, 0.5).normalize();
        for sphere in &spheres {
            let [x, y, z, w] = sphere.quaternion;
            let q = DQuat::from_xyzw(x, y, z, w);
            assert_relative_eq!(q.dot(expected).abs(), 1.0, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_orientation_follows_frame() -> Result<(), Box<dyn std::error::Error>> {
        // source x becomes target y, source y becomes target x, z flips
        let frame = DMat4::from_mat3(DMat3::from_cols(DVec3::Y, DVec3::X, DVec3::NEG_Z));
        let options = SphereOptions {
            scales: Some(vec![[3.0, 1.0, 1.0]].into()),
            ..Default::default()
        };
        let spheres = encode_spheres([0.0, 0.0, 0.0], Radius::Uniform(1.0), options, &frame)?;

        let [x, y, z, w] = spheres[0].quaternion;
        let long_axis = DQuat::from_xyzw(x, y, z, w) * (DVec3::X * spheres[0].scales[0]);
        assert_relative_eq!(long_axis.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(long_axis.y.abs(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(long_axis.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(spheres[0].scales[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(spheres[0].scales[2], 1.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_mirrored_frame_keeps_positive_scales() -> Result<(), Box<dyn std::error::Error>> {
        let frame = DMat4::from_diagonal(glam::DVec4::new(1.0, 1.0, -1.0, 1.0));
        let options = SphereOptions {
            scales: Some(vec![[1.0, 2.0, 3.0]].into()),
            ..Default::default()
        };
        let spheres = encode_spheres([0.0, 0.0, 1.0], Radius::Uniform(1.0), options, &frame)?;
        assert_eq!(spheres[0].center, [0.0, 0.0, -1.0]);
        for (scale, expected) in spheres[0].scales.iter().zip([1.0, 2.0, 3.0]) {
            assert_relative_eq!(*scale, expected, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_zero_quaternion() {
        let options = SphereOptions {
            quaternions: Some(vec![[0.0, 0.0, 0.0, 0.0]].into()),
            ..Default::default()
        };
        let res = encode_spheres([0.0; 3], Radius::Uniform(1.0), options, &DMat4::IDENTITY);
        assert!(matches!(res, Err(Wis3dError::DegenerateInput { .. })));
    }

    #[test]
    fn test_radius_count_mismatch() {
        let res = encode_spheres(
            vec![[0.0; 3]; 2],
            Radius::from(vec![0.25, 0.5, 0.75]),
            SphereOptions::default(),
            &DMat4::IDENTITY,
        );
        assert!(matches!(
            res,
            Err(Wis3dError::ShapeMismatch {
                kind: ObjectKind::Spheres,
                expected: 2,
                actual: 3,
                ..
            })
        ));
    }
}
