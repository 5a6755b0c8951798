#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// Reading images of any format supported by the `image` crate.
pub mod functional;

/// The 8-bit image container.
pub mod image;

/// PNG encoding and data URLs.
pub mod png;

pub use error::IoError;
pub use image::{Image, ImageSize};
