use wis3d_tensor::Tensor;

use crate::error::IoError;

/// The size of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels.
    pub width: usize,
    /// Height of the image in pixels.
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An interleaved 8-bit image with 1 (gray), 3 (rgb) or 4 (rgba) channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    size: ImageSize,
    channels: usize,
    data: Vec<u8>,
}

impl Image {
    /// Create a new image from a row-major interleaved buffer.
    pub fn new(size: ImageSize, channels: usize, data: Vec<u8>) -> Result<Self, IoError> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(IoError::UnsupportedChannels(channels));
        }
        let expected = size.width * size.height * channels;
        if data.len() != expected {
            return Err(IoError::InvalidBufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Interpret an `(H, W)` or `(H, W, C)` array as an image.
    ///
    /// Values are converted with [`Tensor::to_u8_vec`].
    pub fn from_tensor(tensor: &Tensor) -> Result<Self, IoError> {
        let (height, width, channels) = match *tensor.shape() {
            [h, w] => (h, w, 1),
            [h, w, c] => (h, w, c),
            _ => return Err(IoError::InvalidImageShape(tensor.shape().to_vec())),
        };
        Self::new(ImageSize { width, height }, channels, tensor.to_u8_vec())
    }

    /// The image size.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The image width in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The image height in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// The raw interleaved pixels.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
