use crate::tensor::{DType, Tensor, TensorError};

/// Device type enumeration for tensor storage.
///
/// Represents the compute devices a caller's buffer may live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    /// CPU device
    #[default]
    Cpu,
    /// CUDA device with device ID
    Cuda {
        /// The CUDA device ID
        device_id: usize,
    },
    /// Metal device with device ID
    Metal {
        /// The Metal device ID
        device_id: usize,
    },
}

impl Device {
    /// Returns the device type as a string.
    pub fn device_type(&self) -> &str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda { .. } => "cuda",
            Device::Metal { .. } => "metal",
        }
    }

    /// Returns the device ID if applicable.
    pub fn device_id(&self) -> Option<usize> {
        match self {
            Device::Cpu => None,
            Device::Cuda { device_id } | Device::Metal { device_id } => Some(*device_id),
        }
    }

    /// Returns true if the device is CPU.
    pub fn is_cpu(&self) -> bool {
        matches!(self, Device::Cpu)
    }

    /// Returns true if the device is a GPU.
    pub fn is_gpu(&self) -> bool {
        !self.is_cpu()
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda { device_id } => write!(f, "cuda:{}", device_id),
            Device::Metal { device_id } => write!(f, "metal:{}", device_id),
        }
    }
}

/// A buffer owned by a compute backend.
///
/// Backends (CUDA, Metal, ...) implement this trait for their buffer types so
/// the normalizer can pull the data to host memory without knowing anything
/// else about the backend.
pub trait DeviceStorage: std::fmt::Debug {
    /// The device holding the buffer.
    fn device(&self) -> Device;

    /// The element type of the buffer.
    fn dtype(&self) -> DType;

    /// The number of elements in the buffer.
    fn len(&self) -> usize;

    /// Check if the buffer is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocking copy of the whole buffer into host memory.
    fn copy_to_host(&self) -> Result<Vec<f64>, TensorError>;
}

/// A tensor whose data lives on a compute device.
#[derive(Debug)]
pub struct DeviceTensor {
    shape: Vec<usize>,
    storage: Box<dyn DeviceStorage>,
}

impl DeviceTensor {
    /// Wraps a device buffer with a shape.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidShape`] if the shape does not cover the
    /// buffer exactly.
    pub fn new(
        shape: impl Into<Vec<usize>>,
        storage: Box<dyn DeviceStorage>,
    ) -> Result<Self, TensorError> {
        let shape = shape.into();
        let expected = shape.iter().product::<usize>();
        if expected != storage.len() {
            return Err(TensorError::InvalidShape {
                expected,
                actual: storage.len(),
            });
        }
        Ok(Self { shape, storage })
    }

    /// The shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The device holding the data.
    pub fn device(&self) -> Device {
        self.storage.device()
    }

    /// Copies the tensor to host memory.
    pub fn to_host(&self) -> Result<Tensor, TensorError> {
        let device = self.storage.device();
        let data = self.storage.copy_to_host()?;
        log::debug!("copied {} elements from {} to host", data.len(), device);
        Ok(Tensor::from_shape_vec(self.shape.clone(), data)?.with_dtype(self.storage.dtype()))
    }
}
