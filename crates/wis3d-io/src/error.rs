/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] ::image::ImageError),

    /// Error to encode the PNG image.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),

    /// The pixel buffer does not match the image size.
    #[error("Image buffer has {actual} bytes but {expected} are required")]
    InvalidBufferSize {
        /// Bytes required by size and channels
        expected: usize,
        /// Bytes provided
        actual: usize,
    },

    /// Only 1, 3 and 4 channel images are supported.
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannels(usize),

    /// An array that cannot be interpreted as an image.
    #[error("Array of shape {0:?} is not an image, expected (H, W) or (H, W, C)")]
    InvalidImageShape(Vec<usize>),
}
