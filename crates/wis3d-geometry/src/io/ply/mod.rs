mod parser;
mod properties;
mod writer;

pub use parser::*;
pub use properties::*;
pub use writer::*;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to read or write the PLY file
    #[error("Failed to read or write PLY file")]
    Io(#[from] std::io::Error),

    /// The header is not a valid PLY header
    #[error("Invalid PLY header: {0}")]
    InvalidHeader(String),

    /// Unsupported PLY format or property
    #[error("Unsupported PLY property: {0}")]
    UnsupportedProperty(String),

    /// The body does not match the header
    #[error("Malformed PLY body: {0}")]
    MalformedBody(String),

    /// A vertex index does not fit the face index type
    #[error("Vertex index {0} does not fit a PLY int")]
    IndexOverflow(usize),
}
