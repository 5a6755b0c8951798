//! Resolution of a declared axis convention into a 4x4 transform.
//!
//! An [`AxisPattern`] lists, for each source basis vector `x`, `y` and `z`,
//! the signed target axis it maps to. Taking the OpenCV camera frame as an
//! example, the viewer's `(right: x, up: y, backward: z)` frame maps to
//! `(x, -y, -z)`.

use std::str::FromStr;

use glam::{DMat3, DMat4, DVec3};

/// An error type for axis pattern resolution.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameError {
    /// The label is not one of `x`, `-x`, `y`, `-y`, `z`, `-z`.
    #[error("Invalid axis label {0:?}, expected one of x, -x, y, -y, z, -z")]
    InvalidAxis(String),

    /// The same target axis appears twice in the pattern.
    #[error("Axis {0} is used more than once in the pattern")]
    RepeatedAxis(String),
}

/// A signed coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// `+x`
    X,
    /// `-x`
    NegX,
    /// `+y`
    Y,
    /// `-y`
    NegY,
    /// `+z`
    Z,
    /// `-z`
    NegZ,
}

impl Axis {
    /// All six signed axes.
    pub const ALL: [Axis; 6] = [Axis::X, Axis::NegX, Axis::Y, Axis::NegY, Axis::Z, Axis::NegZ];

    /// The unit vector of the axis.
    pub fn unit(&self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::NegX => DVec3::NEG_X,
            Axis::Y => DVec3::Y,
            Axis::NegY => DVec3::NEG_Y,
            Axis::Z => DVec3::Z,
            Axis::NegZ => DVec3::NEG_Z,
        }
    }

    /// The textual label of the axis.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::NegX => "-x",
            Axis::Y => "y",
            Axis::NegY => "-y",
            Axis::Z => "z",
            Axis::NegZ => "-z",
        }
    }

    // unsigned axis index
    fn index(&self) -> usize {
        match self {
            Axis::X | Axis::NegX => 0,
            Axis::Y | Axis::NegY => 1,
            Axis::Z | Axis::NegZ => 2,
        }
    }
}

impl FromStr for Axis {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" => Ok(Axis::X),
            "-x" => Ok(Axis::NegX),
            "y" => Ok(Axis::Y),
            "-y" => Ok(Axis::NegY),
            "z" => Ok(Axis::Z),
            "-z" => Ok(Axis::NegZ),
            other => Err(FrameError::InvalidAxis(other.to_string())),
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where each source basis vector lands in the target frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisPattern([Axis; 3]);

impl AxisPattern {
    /// The identity pattern `(x, y, z)`.
    pub const IDENTITY: AxisPattern = AxisPattern([Axis::X, Axis::Y, Axis::Z]);

    /// Creates a pattern from three signed axes.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::RepeatedAxis`] if two entries share an axis,
    /// regardless of sign.
    pub fn new(axes: [Axis; 3]) -> Result<Self, FrameError> {
        let mut seen = [false; 3];
        for axis in axes {
            if std::mem::replace(&mut seen[axis.index()], true) {
                return Err(FrameError::RepeatedAxis(axis.label().trim_start_matches('-').into()));
            }
        }
        Ok(Self(axes))
    }

    /// Parses a pattern from three labels such as `["x", "-y", "-z"]`.
    pub fn parse<S: AsRef<str>>(labels: &[S; 3]) -> Result<Self, FrameError> {
        let axes = [
            labels[0].as_ref().parse()?,
            labels[1].as_ref().parse()?,
            labels[2].as_ref().parse()?,
        ];
        Self::new(axes)
    }

    /// The three signed axes.
    pub fn axes(&self) -> [Axis; 3] {
        self.0
    }

    /// The 3x3 basis change whose i-th row is the unit vector of the i-th label.
    pub fn rotation(&self) -> DMat3 {
        DMat3::from_cols(self.0[0].unit(), self.0[1].unit(), self.0[2].unit()).transpose()
    }

    /// The homogeneous transform with zero translation.
    pub fn transform(&self) -> DMat4 {
        DMat4::from_mat3(self.rotation())
    }
}

impl Default for AxisPattern {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::fmt::Display for AxisPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}
