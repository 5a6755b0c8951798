use thiserror::Error;

/// An error type for tensor normalization.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Tensor shape does not match the provided data.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// The tensor cannot be viewed as rows of the requested width.
    #[error("Cannot reshape {numel} elements into rows of {width}")]
    InvalidRowWidth {
        /// Number of elements in the tensor
        numel: usize,
        /// Requested row width
        width: usize,
    },

    /// The input is of a kind the normalizer does not understand.
    #[error("Unsupported input type: {0}")]
    UnsupportedInputType(String),

    /// A nested sequence whose siblings have different shapes.
    #[error("Ragged nested sequence: expected shape {expected:?}, got {actual:?}")]
    RaggedSequence {
        /// Shape of the first sibling
        expected: Vec<usize>,
        /// Shape of the offending sibling
        actual: Vec<usize>,
    },

    /// Copying a device buffer to host memory failed.
    #[error("Failed to copy tensor from {device} to host: {message}")]
    DeviceTransfer {
        /// Device the buffer lives on
        device: String,
        /// Backend error message
        message: String,
    },
}

/// Element type of the data a tensor was built from.
///
/// Elements are always held as `f64` on the host; the dtype remembers the
/// source precision so integer data (e.g. 8-bit colors) keeps its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DType {
    /// Unsigned 8-bit integers.
    UInt8,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    #[default]
    Float64,
}

impl DType {
    /// Returns true for floating point element types.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DType::UInt8 => write!(f, "uint8"),
            DType::Float32 => write!(f, "float32"),
            DType::Float64 => write!(f, "float64"),
        }
    }
}

/// A dense, row-major, host-resident numeric array.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f64>,
    dtype: DType,
}

impl Tensor {
    /// Creates a new tensor from a shape and a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidShape`] if the product of the shape does
    /// not equal the length of the buffer.
    pub fn from_shape_vec(
        shape: impl Into<Vec<usize>>,
        data: Vec<f64>,
    ) -> Result<Self, TensorError> {
        let shape = shape.into();
        let expected = shape.iter().product::<usize>();
        if expected != data.len() {
            return Err(TensorError::InvalidShape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape,
            data,
            dtype: DType::Float64,
        })
    }

    /// Creates a new tensor from single precision data.
    pub fn from_shape_vec_f32(
        shape: impl Into<Vec<usize>>,
        data: Vec<f32>,
    ) -> Result<Self, TensorError> {
        let data = data.into_iter().map(f64::from).collect();
        Ok(Self::from_shape_vec(shape, data)?.with_dtype(DType::Float32))
    }

    /// Builds a tensor whose shape is known to cover the data.
    pub(crate) fn from_parts(shape: Vec<usize>, data: Vec<f64>, dtype: DType) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data, dtype }
    }

    /// Creates a zero-dimensional tensor holding one value.
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
            dtype: DType::Float64,
        }
    }

    /// Overrides the recorded element type.
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    /// The shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// The total number of elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Check if the tensor holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The element type the tensor was created from.
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// The flat row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the tensor and returns the flat row-major data.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// The data converted to single precision.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.data.iter().map(|&v| v as f32).collect()
    }

    /// The data as 8-bit values, e.g. for colors and pixels.
    ///
    /// Integer data is clamped to `[0, 255]`. Floating point data whose values
    /// all lie within `[0, 1]` is treated as normalized and scaled by 255;
    /// other floating point data is rounded and clamped.
    pub fn to_u8_vec(&self) -> Vec<u8> {
        let normalized = self.dtype.is_float() && self.data.iter().all(|v| (0.0..=1.0).contains(v));
        let scale = if normalized { 255.0 } else { 1.0 };
        self.data
            .iter()
            .map(|&v| (v * scale).round().clamp(0.0, 255.0) as u8)
            .collect()
    }

    /// Returns a tensor with the same data and a new shape.
    pub fn reshape(self, shape: impl Into<Vec<usize>>) -> Result<Self, TensorError> {
        let dtype = self.dtype;
        Ok(Self::from_shape_vec(shape, self.data)?.with_dtype(dtype))
    }

    /// Views the data as rows of `N` elements, i.e. a reshape to `(-1, N)`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidRowWidth`] if the number of elements is
    /// not a multiple of `N`.
    pub fn rows<const N: usize>(&self) -> Result<Vec<[f64; N]>, TensorError> {
        if N == 0 || self.data.len() % N != 0 {
            return Err(TensorError::InvalidRowWidth {
                numel: self.data.len(),
                width: N,
            });
        }
        Ok(self
            .data
            .chunks_exact(N)
            .map(|chunk| {
                let mut row = [0.0; N];
                row.copy_from_slice(chunk);
                row
            })
            .collect())
    }
}
