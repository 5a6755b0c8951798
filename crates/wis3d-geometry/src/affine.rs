use glam::{DMat3, DMat4, DVec3};

/// An error type for affine decomposition.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AffineError {
    /// The linear part has a (near) zero column and cannot be decomposed.
    #[error("Cannot decompose a singular affine transform")]
    Singular,
}

/// An affine transform split into translation, rotation, zoom and shear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    /// The translation vector.
    pub translation: DVec3,
    /// A proper rotation matrix.
    pub rotation: DMat3,
    /// Per-axis scale; the first entry is negative for reflections.
    pub zoom: DVec3,
    /// Shear factors `(xy, xz, yz)`.
    pub shear: [f64; 3],
}

/// Compose translation, rotation and zoom into a 4x4 affine transform.
///
/// The result is `T * R * Z`, i.e. scale first, then rotate, then translate.
pub fn compose(translation: DVec3, rotation: DMat3, zoom: DVec3) -> DMat4 {
    let mut m = DMat4::from_mat3(rotation * DMat3::from_diagonal(zoom));
    m.w_axis = translation.extend(1.0);
    m
}

/// Decompose a 4x4 affine transform into translation, rotation, zoom and shear.
///
/// The linear part is factored as `R * ZS` with `R` orthonormal and `ZS`
/// upper triangular. When `R` would be a reflection the sign is moved to the
/// first zoom entry so that `R` is always a proper rotation.
///
/// # Errors
///
/// Returns [`AffineError::Singular`] if any column of the linear part is
/// linearly dependent on the previous ones.
pub fn decompose(transform: &DMat4) -> Result<Affine, AffineError> {
    let translation = transform.w_axis.truncate();
    let rzs = DMat3::from_mat4(*transform);
    let (c0, c1, c2) = (rzs.x_axis, rzs.y_axis, rzs.z_axis);

    // gram-schmidt on the columns
    let z0 = c0.length();
    if z0 < f64::EPSILON {
        return Err(AffineError::Singular);
    }
    let mut r0 = c0 / z0;

    let s01 = r0.dot(c1);
    let u1 = c1 - s01 * r0;
    let z1 = u1.length();
    if z1 < f64::EPSILON {
        return Err(AffineError::Singular);
    }
    let r1 = u1 / z1;

    let s02 = r0.dot(c2);
    let s12 = r1.dot(c2);
    let u2 = c2 - s02 * r0 - s12 * r1;
    let z2 = u2.length();
    if z2 < f64::EPSILON {
        return Err(AffineError::Singular);
    }
    let r2 = u2 / z2;

    let shear = [s01 / z0, s02 / z0, s12 / z1];
    let mut zoom = DVec3::new(z0, z1, z2);

    if DMat3::from_cols(r0, r1, r2).determinant() < 0.0 {
        zoom.x = -zoom.x;
        r0 = -r0;
    }

    Ok(Affine {
        translation,
        rotation: DMat3::from_cols(r0, r1, r2),
        zoom,
        shear,
    })
}
