use crate::device::DeviceTensor;
use crate::tensor::{DType, Tensor, TensorError};

/// A plain nested numeric sequence, e.g. `[[1, 2, 3], [4, 5, 6]]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    /// A single number.
    Scalar(f64),
    /// A sequence of nested values; siblings must share a shape.
    List(Vec<Nested>),
}

impl From<f64> for Nested {
    fn from(value: f64) -> Self {
        Nested::Scalar(value)
    }
}

impl<T: Into<Nested>> From<Vec<T>> for Nested {
    fn from(items: Vec<T>) -> Self {
        Nested::List(items.into_iter().map(Into::into).collect())
    }
}

impl Nested {
    fn flatten_into(&self, data: &mut Vec<f64>) -> Result<Vec<usize>, TensorError> {
        match self {
            Nested::Scalar(v) => {
                data.push(*v);
                Ok(Vec::new())
            }
            Nested::List(items) => {
                let mut child_shape: Option<Vec<usize>> = None;
                for item in items {
                    let shape = item.flatten_into(data)?;
                    match &child_shape {
                        None => child_shape = Some(shape),
                        Some(expected) if *expected != shape => {
                            return Err(TensorError::RaggedSequence {
                                expected: expected.clone(),
                                actual: shape,
                            })
                        }
                        Some(_) => {}
                    }
                }
                let mut shape = vec![items.len()];
                shape.extend(child_shape.unwrap_or_default());
                Ok(shape)
            }
        }
    }

    fn try_from_json(value: &serde_json::Value) -> Result<Self, TensorError> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Nested::Scalar).ok_or_else(|| {
                TensorError::UnsupportedInputType(format!(
                    "json number {n} is not representable as f64"
                ))
            }),
            serde_json::Value::Array(items) => Ok(Nested::List(
                items.iter().map(Self::try_from_json).collect::<Result<_, _>>()?,
            )),
            serde_json::Value::Null => Err(TensorError::UnsupportedInputType("json null".into())),
            serde_json::Value::Bool(_) => {
                Err(TensorError::UnsupportedInputType("json bool".into()))
            }
            serde_json::Value::String(_) => {
                Err(TensorError::UnsupportedInputType("json string".into()))
            }
            serde_json::Value::Object(_) => {
                Err(TensorError::UnsupportedInputType("json object".into()))
            }
        }
    }
}

/// Any numeric array the exporter accepts.
#[derive(Debug)]
pub enum ArrayInput {
    /// A plain nested numeric sequence.
    Nested(Nested),
    /// A host tensor.
    Host(Tensor),
    /// A tensor living on a compute device; it is copied to host memory.
    Device(DeviceTensor),
    /// A JSON value, e.g. decoded from a configuration or a message.
    Json(serde_json::Value),
}

/// Converts any supported array input into a host tensor.
///
/// This is the only place where device buffers are copied to host memory.
///
/// # Errors
///
/// Returns [`TensorError::UnsupportedInputType`] for JSON values that are not
/// numbers or arrays of numbers and [`TensorError::RaggedSequence`] for nested
/// sequences without a rectangular shape.
pub fn normalize(input: impl Into<ArrayInput>) -> Result<Tensor, TensorError> {
    match input.into() {
        ArrayInput::Host(tensor) => Ok(tensor),
        ArrayInput::Device(tensor) => tensor.to_host(),
        ArrayInput::Nested(nested) => nested_to_tensor(&nested),
        ArrayInput::Json(value) => nested_to_tensor(&Nested::try_from_json(&value)?),
    }
}

/// Normalizes an optional input, keeping absence as `None`.
pub fn normalize_optional(input: Option<ArrayInput>) -> Result<Option<Tensor>, TensorError> {
    input.map(normalize).transpose()
}

fn nested_to_tensor(nested: &Nested) -> Result<Tensor, TensorError> {
    let mut data = Vec::new();
    let shape = nested.flatten_into(&mut data)?;
    Tensor::from_shape_vec(shape, data)
}

impl From<Tensor> for ArrayInput {
    fn from(tensor: Tensor) -> Self {
        ArrayInput::Host(tensor)
    }
}

impl From<DeviceTensor> for ArrayInput {
    fn from(tensor: DeviceTensor) -> Self {
        ArrayInput::Device(tensor)
    }
}

impl From<Nested> for ArrayInput {
    fn from(nested: Nested) -> Self {
        ArrayInput::Nested(nested)
    }
}

impl From<serde_json::Value> for ArrayInput {
    fn from(value: serde_json::Value) -> Self {
        ArrayInput::Json(value)
    }
}

impl From<f64> for ArrayInput {
    fn from(value: f64) -> Self {
        ArrayInput::Host(Tensor::scalar(value))
    }
}

impl From<Vec<f64>> for ArrayInput {
    fn from(data: Vec<f64>) -> Self {
        ArrayInput::Host(Tensor::from_parts(vec![data.len()], data, DType::Float64))
    }
}

impl From<&[f64]> for ArrayInput {
    fn from(data: &[f64]) -> Self {
        data.to_vec().into()
    }
}

impl From<Vec<f32>> for ArrayInput {
    fn from(data: Vec<f32>) -> Self {
        let n = data.len();
        let data = data.into_iter().map(f64::from).collect();
        ArrayInput::Host(Tensor::from_parts(vec![n], data, DType::Float32))
    }
}

impl From<Vec<Vec<f64>>> for ArrayInput {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        ArrayInput::Nested(rows.into())
    }
}

impl<const N: usize> From<[f64; N]> for ArrayInput {
    fn from(row: [f64; N]) -> Self {
        row.to_vec().into()
    }
}

impl<const N: usize> From<Vec<[f64; N]>> for ArrayInput {
    fn from(rows: Vec<[f64; N]>) -> Self {
        rows_to_input(rows.len(), N, rows.into_iter().flatten().collect(), DType::Float64)
    }
}

impl<const N: usize> From<&[[f64; N]]> for ArrayInput {
    fn from(rows: &[[f64; N]]) -> Self {
        rows.to_vec().into()
    }
}

impl<const N: usize> From<Vec<[f32; N]>> for ArrayInput {
    fn from(rows: Vec<[f32; N]>) -> Self {
        let data = rows.iter().flatten().map(|&v| f64::from(v)).collect();
        rows_to_input(rows.len(), N, data, DType::Float32)
    }
}

impl<const N: usize> From<Vec<[u8; N]>> for ArrayInput {
    fn from(rows: Vec<[u8; N]>) -> Self {
        let data = rows.iter().flatten().map(|&v| f64::from(v)).collect();
        rows_to_input(rows.len(), N, data, DType::UInt8)
    }
}

impl From<[[f64; 4]; 4]> for ArrayInput {
    fn from(matrix: [[f64; 4]; 4]) -> Self {
        let data = matrix.iter().flatten().copied().collect();
        ArrayInput::Host(Tensor::from_parts(vec![4, 4], data, DType::Float64))
    }
}

impl From<Vec<[[f64; 4]; 4]>> for ArrayInput {
    fn from(matrices: Vec<[[f64; 4]; 4]>) -> Self {
        let n = matrices.len();
        let data = matrices.iter().flatten().flatten().copied().collect();
        ArrayInput::Host(Tensor::from_parts(vec![n, 4, 4], data, DType::Float64))
    }
}

fn rows_to_input(n: usize, width: usize, data: Vec<f64>, dtype: DType) -> ArrayInput {
    ArrayInput::Host(Tensor::from_parts(vec![n, width], data, dtype))
}
