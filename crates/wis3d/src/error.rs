use wis3d_geometry::affine::AffineError;
use wis3d_geometry::io::ply::PlyError;
use wis3d_geometry::io::LoadError;
use wis3d_tensor::TensorError;

use crate::paths::ObjectKind;

/// An error type for the exporter.
#[derive(thiserror::Error, Debug)]
pub enum Wis3dError {
    /// The session configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An operation received an input it cannot normalize.
    #[error("Unsupported input for {kind}: {detail}")]
    UnsupportedInputType {
        /// The object being exported.
        kind: ObjectKind,
        /// What was wrong with the input.
        detail: String,
    },

    /// A companion array disagrees with the primary element count.
    #[error("Shape mismatch for {kind}: `{field}` has {actual} entries, expected {expected}")]
    ShapeMismatch {
        /// The object being exported.
        kind: ObjectKind,
        /// The offending field.
        field: String,
        /// The primary element count.
        expected: usize,
        /// The length of the companion array.
        actual: usize,
    },

    /// The input describes a geometry that cannot be decomposed.
    #[error("Degenerate input for {kind}: {detail}")]
    DegenerateInput {
        /// The object being exported.
        kind: ObjectKind,
        /// Why the geometry is degenerate.
        detail: String,
    },

    /// An argument is outside of its accepted range.
    #[error("Invalid argument for {kind}: {detail}")]
    InvalidArgument {
        /// The object being exported.
        kind: ObjectKind,
        /// What was wrong with the argument.
        detail: String,
    },

    /// An array could not be normalized or reshaped.
    #[error("Invalid `{field}` for {kind}: {source}")]
    Tensor {
        /// The object being exported.
        kind: ObjectKind,
        /// The offending field.
        field: &'static str,
        /// The underlying tensor error.
        #[source]
        source: TensorError,
    },

    /// Directory or file creation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A geometry file could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A PLY file could not be written.
    #[error(transparent)]
    Ply(#[from] PlyError),

    /// An image could not be read or encoded.
    #[error(transparent)]
    Image(#[from] wis3d_io::IoError),

    /// A record or a config file could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Wis3dError {
    pub(crate) fn shape_mismatch(
        kind: ObjectKind,
        field: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::ShapeMismatch {
            kind,
            field: field.into(),
            expected,
            actual,
        }
    }

    pub(crate) fn invalid_argument(kind: ObjectKind, detail: impl Into<String>) -> Self {
        Self::InvalidArgument {
            kind,
            detail: detail.into(),
        }
    }

    pub(crate) fn degenerate(kind: ObjectKind, detail: impl Into<String>) -> Self {
        Self::DegenerateInput {
            kind,
            detail: detail.into(),
        }
    }

    pub(crate) fn from_affine(kind: ObjectKind, err: AffineError) -> Self {
        Self::degenerate(kind, err.to_string())
    }
}

/// Attaches the object kind and field name to tensor errors.
pub(crate) trait TensorResultExt<T> {
    fn field(self, kind: ObjectKind, field: &'static str) -> Result<T, Wis3dError>;
}

impl<T> TensorResultExt<T> for Result<T, TensorError> {
    fn field(self, kind: ObjectKind, field: &'static str) -> Result<T, Wis3dError> {
        self.map_err(|source| match source {
            TensorError::UnsupportedInputType(detail) => Wis3dError::UnsupportedInputType {
                kind,
                detail: format!("`{field}`: {detail}"),
            },
            source => Wis3dError::Tensor {
                kind,
                field,
                source,
            },
        })
    }
}

/// Fails with [`Wis3dError::ShapeMismatch`] unless `actual == expected`.
pub(crate) fn ensure_len(
    kind: ObjectKind,
    field: &str,
    expected: usize,
    actual: usize,
) -> Result<(), Wis3dError> {
    if expected != actual {
        return Err(Wis3dError::shape_mismatch(kind, field, expected, actual));
    }
    Ok(())
}
