use std::path::{Path, PathBuf};

use glam::DMat4;
use wis3d_geometry::io::load_geometry;
use wis3d_geometry::mesh::{MeshError, TriMesh};
use wis3d_tensor::{normalize, ArrayInput};

use super::{rgb8_rows, rows};
use crate::error::{TensorResultExt, Wis3dError};
use crate::paths::ObjectKind;

const KIND: ObjectKind = ObjectKind::Mesh;

/// The accepted forms of a triangle mesh.
#[derive(Debug)]
pub enum MeshInput {
    /// A `.ply` or `.obj` file.
    FromPath(PathBuf),
    /// Vertices and triangle indices, with optional per-vertex colors.
    FromArray {
        /// Positions, reshaped to rows of three.
        vertices: ArrayInput,
        /// Vertex indices, reshaped to rows of three.
        faces: ArrayInput,
        /// Colors, one row per vertex.
        vertex_colors: Option<ArrayInput>,
    },
    /// An already loaded mesh.
    FromLoaded(TriMesh),
}

impl MeshInput {
    /// A mesh from vertices and faces.
    pub fn from_arrays(vertices: impl Into<ArrayInput>, faces: impl Into<ArrayInput>) -> Self {
        Self::FromArray {
            vertices: vertices.into(),
            faces: faces.into(),
            vertex_colors: None,
        }
    }

    /// Attach per-vertex colors to an array input; other inputs are returned unchanged.
    pub fn with_vertex_colors(self, colors: impl Into<ArrayInput>) -> Self {
        match self {
            Self::FromArray {
                vertices, faces, ..
            } => Self::FromArray {
                vertices,
                faces,
                vertex_colors: Some(colors.into()),
            },
            other => other,
        }
    }
}

impl From<PathBuf> for MeshInput {
    fn from(path: PathBuf) -> Self {
        Self::FromPath(path)
    }
}

impl From<&Path> for MeshInput {
    fn from(path: &Path) -> Self {
        Self::FromPath(path.to_path_buf())
    }
}

impl From<TriMesh> for MeshInput {
    fn from(mesh: TriMesh) -> Self {
        Self::FromLoaded(mesh)
    }
}

/// Resolve the input into a mesh expressed in the viewer frame.
pub fn build_mesh(input: MeshInput, transform: &DMat4) -> Result<TriMesh, Wis3dError> {
    let mut mesh = match input {
        MeshInput::FromPath(path) => load_geometry(&path)?
            .into_mesh()
            .map_err(mesh_error)?,
        MeshInput::FromArray {
            vertices,
            faces,
            vertex_colors,
        } => {
            let vertices = rows::<3>(vertices, KIND, "vertices")?;
            let faces = face_rows(rows::<3>(faces, KIND, "faces")?)?;
            let vertex_colors = match vertex_colors {
                Some(colors) => {
                    let colors = normalize(colors).field(KIND, "vertex_colors")?;
                    Some(rgb8_rows(&colors, KIND, "vertex_colors", vertices.len())?)
                }
                None => None,
            };
            TriMesh::new(vertices, faces, vertex_colors).map_err(mesh_error)?
        }
        MeshInput::FromLoaded(mesh) => mesh,
    };
    mesh.transform(transform);
    Ok(mesh)
}

fn face_rows(rows: Vec<[f64; 3]>) -> Result<Vec<[usize; 3]>, Wis3dError> {
    rows.into_iter()
        .map(|row| {
            let mut face = [0usize; 3];
            for (index, &value) in face.iter_mut().zip(row.iter()) {
                if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
                    return Err(Wis3dError::invalid_argument(
                        KIND,
                        format!("face index {value} is not a non-negative integer"),
                    ));
                }
                *index = value as usize;
            }
            Ok(face)
        })
        .collect()
}

fn mesh_error(err: MeshError) -> Wis3dError {
    match err {
        MeshError::ColorCountMismatch {
            num_vertices,
            num_colors,
        } => Wis3dError::shape_mismatch(KIND, "vertex_colors", num_vertices, num_colors),
        err @ MeshError::FaceIndexOutOfBounds { .. } => {
            Wis3dError::invalid_argument(KIND, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshInput {
        MeshInput::from_arrays(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.0, 1.0, 2.0], [0.0, 2.0, 3.0]],
        )
    }

    #[test]
    fn test_build_mesh() -> Result<(), Box<dyn std::error::Error>> {
        let mesh = build_mesh(quad().with_vertex_colors(vec![[0u8, 0, 255]; 4]), &DMat4::IDENTITY)?;
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.faces(), &[[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.vertex_colors().map(|c| c.len()), Some(4));
        Ok(())
    }

    #[test]
    fn test_face_out_of_bounds() {
        let input = MeshInput::from_arrays(vec![[0.0, 0.0, 0.0]; 3], vec![[0.0, 1.0, 3.0]]);
        assert!(matches!(
            build_mesh(input, &DMat4::IDENTITY),
            Err(Wis3dError::InvalidArgument {
                kind: ObjectKind::Mesh,
                ..
            })
        ));
    }

    #[test]
    fn test_fractional_face_index() {
        let input = MeshInput::from_arrays(vec![[0.0, 0.0, 0.0]; 3], vec![[0.0, 1.5, 2.0]]);
        assert!(build_mesh(input, &DMat4::IDENTITY).is_err());
    }

    #[test]
    fn test_vertex_color_mismatch() {
        let input = quad().with_vertex_colors(vec![[0u8, 0, 255]; 3]);
        assert!(matches!(
            build_mesh(input, &DMat4::IDENTITY),
            Err(Wis3dError::ShapeMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }
}
