use std::{fs::File, io::Write, path::Path};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ::png::{BitDepth, ColorType, Encoder};

use crate::error::IoError;
use crate::image::Image;

fn color_type(channels: usize) -> Result<ColorType, IoError> {
    match channels {
        1 => Ok(ColorType::Grayscale),
        3 => Ok(ColorType::Rgb),
        4 => Ok(ColorType::Rgba),
        other => Err(IoError::UnsupportedChannels(other)),
    }
}

fn write_png_impl<W: Write>(sink: W, image: &Image) -> Result<(), IoError> {
    let mut encoder = Encoder::new(sink, image.width() as u32, image.height() as u32);
    encoder.set_color(color_type(image.num_channels())?);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image.as_slice())
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}

/// Encodes an image as PNG bytes.
pub fn encode_image_png(image: &Image) -> Result<Vec<u8>, IoError> {
    let mut bytes = Vec::new();
    write_png_impl(&mut bytes, image)?;
    Ok(bytes)
}

/// Writes the given image as a PNG file.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to write.
pub fn write_image_png(file_path: impl AsRef<Path>, image: &Image) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    log::debug!("encoding {}x{} image to {}", image.width(), image.height(), file_path.display());
    let file = File::create(file_path)?;
    write_png_impl(std::io::BufWriter::new(file), image)
}

/// Encodes an image as a self-contained `data:image/png;base64,...` URL.
pub fn image_to_data_url(image: &Image) -> Result<String, IoError> {
    let bytes = encode_image_png(image)?;
    log::debug!("embedding {} png bytes as a data url", bytes.len());
    Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}
