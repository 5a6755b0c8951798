use std::path::Path;

use crate::error::IoError;
use crate::image::{Image, ImageSize};

/// Reads an image of any format the `image` crate can decode.
///
/// Grayscale images keep one channel, images with alpha become rgba8 and
/// everything else becomes rgb8.
///
/// # Arguments
///
/// * `file_path` - The path to the image.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<Image, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = ::image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let color = img.color();
    let (channels, data) = match (color.has_color(), color.has_alpha()) {
        (_, true) => (4, img.into_rgba8().into_raw()),
        (true, false) => (3, img.into_rgb8().into_raw()),
        (false, false) => (1, img.into_luma8().into_raw()),
    };

    Image::new(size, channels, data)
}
