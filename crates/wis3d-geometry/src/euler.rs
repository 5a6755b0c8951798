//! Euler angle conventions.
//!
//! A convention is named by four characters: `s` (static, extrinsic axes) or
//! `r` (rotating, intrinsic axes) followed by the three rotation axes, e.g.
//! `sxyz` or `rxyz`. All 24 conventions are supported and the same
//! convention must be used to build and to extract the angles.

use std::str::FromStr;

use glam::DMat3;

/// An error type for Euler conventions.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Unknown Euler convention {0:?}")]
pub struct EulerError(pub String);

// name, (first axis, parity, repetition, frame)
const CONVENTIONS: [(&str, [usize; 4]); 24] = [
    ("sxyz", [0, 0, 0, 0]),
    ("sxyx", [0, 0, 1, 0]),
    ("sxzy", [0, 1, 0, 0]),
    ("sxzx", [0, 1, 1, 0]),
    ("syzx", [1, 0, 0, 0]),
    ("syzy", [1, 0, 1, 0]),
    ("syxz", [1, 1, 0, 0]),
    ("syxy", [1, 1, 1, 0]),
    ("szxy", [2, 0, 0, 0]),
    ("szxz", [2, 0, 1, 0]),
    ("szyx", [2, 1, 0, 0]),
    ("szyz", [2, 1, 1, 0]),
    ("rzyx", [0, 0, 0, 1]),
    ("rxyx", [0, 0, 1, 1]),
    ("ryzx", [0, 1, 0, 1]),
    ("rxzx", [0, 1, 1, 1]),
    ("rxzy", [1, 0, 0, 1]),
    ("ryzy", [1, 0, 1, 1]),
    ("rzxy", [1, 1, 0, 1]),
    ("ryxy", [1, 1, 1, 1]),
    ("ryxz", [2, 0, 0, 1]),
    ("rzxz", [2, 0, 1, 1]),
    ("rxyz", [2, 1, 0, 1]),
    ("rzyz", [2, 1, 1, 1]),
];

const NEXT_AXIS: [usize; 4] = [1, 2, 0, 1];

// below this the decomposition is in gimbal lock
const EPS4: f64 = f64::EPSILON * 4.0;

/// One of the 24 Euler angle conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EulerConvention {
    name: &'static str,
    first_axis: usize,
    parity: bool,
    repetition: bool,
    rotating: bool,
}

impl EulerConvention {
    /// Static (extrinsic) x, then y, then z.
    pub const SXYZ: EulerConvention = Self::from_table(0);

    /// Rotating (intrinsic) x, then y, then z.
    pub const RXYZ: EulerConvention = Self::from_table(22);

    const fn from_table(index: usize) -> Self {
        let (name, [first_axis, parity, repetition, frame]) = CONVENTIONS[index];
        Self {
            name,
            first_axis,
            parity: parity == 1,
            repetition: repetition == 1,
            rotating: frame == 1,
        }
    }

    /// The four-character name of the convention.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the axes rotate with the body (intrinsic rotations).
    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    fn axes(&self) -> (usize, usize, usize) {
        let i = self.first_axis;
        let j = NEXT_AXIS[i + self.parity as usize];
        let k = NEXT_AXIS[i + 1 - self.parity as usize];
        (i, j, k)
    }

    /// Builds the rotation matrix for three angles in radians.
    pub fn to_matrix(&self, angles: [f64; 3]) -> DMat3 {
        let [mut ai, mut aj, mut ak] = angles;
        let (i, j, k) = self.axes();
        if self.rotating {
            std::mem::swap(&mut ai, &mut ak);
        }
        if self.parity {
            (ai, aj, ak) = (-ai, -aj, -ak);
        }

        let (si, sj, sk) = (ai.sin(), aj.sin(), ak.sin());
        let (ci, cj, ck) = (ai.cos(), aj.cos(), ak.cos());
        let (cc, cs) = (ci * ck, ci * sk);
        let (sc, ss) = (si * ck, si * sk);

        let mut m = [[0.0; 3]; 3];
        if self.repetition {
            m[i][i] = cj;
            m[i][j] = sj * si;
            m[i][k] = sj * ci;
            m[j][i] = sj * sk;
            m[j][j] = -cj * ss + cc;
            m[j][k] = -cj * cs - sc;
            m[k][i] = -sj * ck;
            m[k][j] = cj * sc + cs;
            m[k][k] = cj * cc - ss;
        } else {
            m[i][i] = cj * ck;
            m[i][j] = sj * sc - cs;
            m[i][k] = sj * cc + ss;
            m[j][i] = cj * sk;
            m[j][j] = sj * ss + cc;
            m[j][k] = sj * cs - sc;
            m[k][i] = -sj;
            m[k][j] = cj * si;
            m[k][k] = cj * ci;
        }
        // `m` is row-major, glam is column-major
        DMat3::from_cols_array_2d(&m).transpose()
    }

    /// Extracts the three angles in radians from a rotation matrix.
    ///
    /// PRECONDITION: `rotation` is a proper rotation matrix.
    pub fn from_matrix(&self, rotation: &DMat3) -> [f64; 3] {
        let m = rotation.transpose().to_cols_array_2d();
        let (i, j, k) = self.axes();

        let (mut ax, mut ay, mut az);
        if self.repetition {
            let sy = (m[i][j] * m[i][j] + m[i][k] * m[i][k]).sqrt();
            if sy > EPS4 {
                ax = m[i][j].atan2(m[i][k]);
                ay = sy.atan2(m[i][i]);
                az = m[j][i].atan2(-m[k][i]);
            } else {
                ax = (-m[j][k]).atan2(m[j][j]);
                ay = sy.atan2(m[i][i]);
                az = 0.0;
            }
        } else {
            let cy = (m[i][i] * m[i][i] + m[j][i] * m[j][i]).sqrt();
            if cy > EPS4 {
                ax = m[k][j].atan2(m[k][k]);
                ay = (-m[k][i]).atan2(cy);
                az = m[j][i].atan2(m[i][i]);
            } else {
                ax = (-m[j][k]).atan2(m[j][j]);
                ay = (-m[k][i]).atan2(cy);
                az = 0.0;
            }
        }

        if self.parity {
            (ax, ay, az) = (-ax, -ay, -az);
        }
        if self.rotating {
            std::mem::swap(&mut ax, &mut az);
        }
        [ax, ay, az]
    }
}

impl Default for EulerConvention {
    fn default() -> Self {
        Self::RXYZ
    }
}

impl FromStr for EulerConvention {
    type Err = EulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CONVENTIONS
            .iter()
            .position(|(name, _)| *name == s)
            .map(Self::from_table)
            .ok_or_else(|| EulerError(s.to_string()))
    }
}

impl std::fmt::Display for EulerConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn assert_mat_eq(a: &DMat3, b: &DMat3) {
        for (ca, cb) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert_relative_eq!(*ca, *cb, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_sxyz_single_axis() {
        let angle = std::f64::consts::FRAC_PI_2;
        let r = EulerConvention::SXYZ.to_matrix([angle, 0.0, 0.0]);
        assert_mat_eq(&r, &DMat3::from_rotation_x(angle));
        let r = EulerConvention::SXYZ.to_matrix([0.0, 0.0, angle]);
        assert_mat_eq(&r, &DMat3::from_rotation_z(angle));
    }

    #[test]
    fn test_static_vs_rotating_order() {
        let (a, b, c) = (0.1, -0.4, 0.7);
        // extrinsic xyz: Rz * Ry * Rx
        let expected =
            DMat3::from_rotation_z(c) * DMat3::from_rotation_y(b) * DMat3::from_rotation_x(a);
        assert_mat_eq(&EulerConvention::SXYZ.to_matrix([a, b, c]), &expected);
        // intrinsic xyz: Rx * Ry * Rz
        let expected =
            DMat3::from_rotation_x(a) * DMat3::from_rotation_y(b) * DMat3::from_rotation_z(c);
        assert_mat_eq(&EulerConvention::RXYZ.to_matrix([a, b, c]), &expected);
    }

    #[test]
    fn test_round_trip_all_conventions() -> Result<(), EulerError> {
        let angles = [0.3, -0.5, 1.1];
        for (name, _) in CONVENTIONS {
            let convention: EulerConvention = name.parse()?;
            let r = convention.to_matrix(angles);
            let back = convention.from_matrix(&r);
            assert_mat_eq(&convention.to_matrix(back), &r);
            assert_eq!(convention.name(), name);
        }
        Ok(())
    }

    #[test]
    fn test_rxyz_recovers_angles() {
        let angles = [0.2, 0.4, -0.9];
        let r = EulerConvention::RXYZ.to_matrix(angles);
        let back = EulerConvention::RXYZ.from_matrix(&r);
        for (a, b) in angles.iter().zip(back.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        let v = r * DVec3::X;
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_convention() {
        assert!("xyz".parse::<EulerConvention>().is_err());
        assert_eq!(EulerConvention::default(), EulerConvention::RXYZ);
    }
}
