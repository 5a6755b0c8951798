use std::path::{Path, PathBuf};

use wis3d_io::functional::read_image_any;
use wis3d_io::Image;
use wis3d_tensor::{normalize, ArrayInput, Tensor};

use crate::error::{TensorResultExt, Wis3dError};
use crate::paths::ObjectKind;

/// The accepted forms of an image.
#[derive(Debug)]
pub enum ImageInput {
    /// Any file format the `image` crate can decode.
    FromPath(PathBuf),
    /// An `(H, W)` or `(H, W, C)` array with 1, 3 or 4 channels.
    FromArray(ArrayInput),
    /// A decoded image.
    FromImage(Image),
}

impl From<PathBuf> for ImageInput {
    fn from(path: PathBuf) -> Self {
        Self::FromPath(path)
    }
}

impl From<&Path> for ImageInput {
    fn from(path: &Path) -> Self {
        Self::FromPath(path.to_path_buf())
    }
}

impl From<Image> for ImageInput {
    fn from(image: Image) -> Self {
        Self::FromImage(image)
    }
}

impl From<Tensor> for ImageInput {
    fn from(tensor: Tensor) -> Self {
        Self::FromArray(tensor.into())
    }
}

impl From<ArrayInput> for ImageInput {
    fn from(array: ArrayInput) -> Self {
        Self::FromArray(array)
    }
}

/// Resolve the input into an 8-bit image.
///
/// `kind` names the object the image belongs to in error messages.
pub fn build_image(input: ImageInput, kind: ObjectKind) -> Result<Image, Wis3dError> {
    match input {
        ImageInput::FromPath(path) => Ok(read_image_any(path)?),
        ImageInput::FromArray(array) => {
            let tensor = normalize(array).field(kind, "image")?;
            Ok(Image::from_tensor(&tensor)?)
        }
        ImageInput::FromImage(image) => Ok(image),
    }
}
