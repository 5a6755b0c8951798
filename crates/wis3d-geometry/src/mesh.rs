use glam::DMat4;

use crate::pointcloud::transform_points;

/// An error type for mesh construction.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MeshError {
    /// A face references a vertex that does not exist.
    #[error("Face {face} references vertex {index} but the mesh has {num_vertices} vertices")]
    FaceIndexOutOfBounds {
        /// The offending face
        face: usize,
        /// The offending vertex index
        index: usize,
        /// The number of vertices
        num_vertices: usize,
    },

    /// Vertex colors do not match the vertices.
    #[error("Mesh has {num_vertices} vertices but {num_colors} vertex colors")]
    ColorCountMismatch {
        /// The number of vertices
        num_vertices: usize,
        /// The number of colors
        num_colors: usize,
    },
}

/// A triangle mesh with optional per-vertex colors.
#[derive(Debug, Clone, PartialEq)]
pub struct TriMesh {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[usize; 3]>,
    vertex_colors: Option<Vec<[u8; 3]>>,
}

impl TriMesh {
    /// Create a new mesh, checking that faces and colors match the vertices.
    pub fn new(
        vertices: Vec<[f64; 3]>,
        faces: Vec<[usize; 3]>,
        vertex_colors: Option<Vec<[u8; 3]>>,
    ) -> Result<Self, MeshError> {
        let num_vertices = vertices.len();
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= num_vertices) {
                return Err(MeshError::FaceIndexOutOfBounds {
                    face,
                    index,
                    num_vertices,
                });
            }
        }
        if let Some(colors) = vertex_colors.as_ref() {
            if colors.len() != num_vertices {
                return Err(MeshError::ColorCountMismatch {
                    num_vertices,
                    num_colors: colors.len(),
                });
            }
        }
        Ok(Self {
            vertices,
            faces,
            vertex_colors,
        })
    }

    /// The vertex positions.
    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    /// The triangle vertex indices.
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// The per-vertex colors.
    pub fn vertex_colors(&self) -> Option<&[[u8; 3]]> {
        self.vertex_colors.as_deref()
    }

    /// Apply a homogeneous transform to the vertices.
    pub fn transform(&mut self, transform: &DMat4) {
        transform_points(&mut self.vertices, transform);
    }
}
