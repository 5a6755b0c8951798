#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! Callers hand numeric data to the exporter in many shapes: plain nested
//! sequences, host arrays, JSON arrays or buffers that still live on an
//! accelerator. This crate turns all of them into a single host-resident
//! [`Tensor`] so the geometry encoders never deal with device memory or
//! container types.
//!
//! ```rust
//! use wis3d_tensor::{normalize, DType};
//!
//! let tensor = normalize(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
//! assert_eq!(tensor.shape(), &[2, 3]);
//! assert_eq!(tensor.dtype(), DType::Float64);
//! assert_eq!(tensor.rows::<3>().unwrap()[1], [4.0, 5.0, 6.0]);
//! ```

/// Compute devices and device-resident buffers.
pub mod device;

/// Polymorphic array inputs and the normalizer.
pub mod input;

/// Host tensor and its error type.
pub mod tensor;

pub use device::{Device, DeviceStorage, DeviceTensor};
pub use input::{normalize, normalize_optional, ArrayInput, Nested};
pub use tensor::{DType, Tensor, TensorError};
