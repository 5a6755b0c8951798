use std::path::{Path, PathBuf};

use crate::mesh::{MeshError, TriMesh};
use crate::pointcloud::{PointCloud, PointCloudError};

/// Wavefront OBJ reader module.
pub mod obj;

/// PLY reader and writer module.
pub mod ply;

/// Error types for loading geometry files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(PathBuf),

    /// The file extension is not a supported geometry format.
    #[error("Unsupported geometry file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Failed to read a PLY file.
    #[error(transparent)]
    Ply(#[from] ply::PlyError),

    /// Failed to read an OBJ file.
    #[error(transparent)]
    Obj(#[from] obj::ObjError),

    /// The loaded faces do not match the vertices.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// The loaded colors or normals do not match the vertices.
    #[error(transparent)]
    PointCloud(#[from] PointCloudError),
}

/// Geometry as read from a file: vertices plus whatever else the file carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedGeometry {
    /// The vertex positions.
    pub vertices: Vec<[f64; 3]>,
    /// Triangles, if the file defines faces.
    pub faces: Option<Vec<[usize; 3]>>,
    /// Per-vertex colors.
    pub colors: Option<Vec<[u8; 3]>>,
    /// Per-vertex normals.
    pub normals: Option<Vec<[f64; 3]>>,
}

impl LoadedGeometry {
    /// Keep the vertices, colors and normals as a point cloud.
    pub fn into_point_cloud(self) -> Result<PointCloud, PointCloudError> {
        PointCloud::new(self.vertices, self.colors, self.normals)
    }

    /// Build a triangle mesh; a file without faces yields a mesh without triangles.
    pub fn into_mesh(self) -> Result<TriMesh, MeshError> {
        TriMesh::new(self.vertices, self.faces.unwrap_or_default(), self.colors)
    }
}

/// Load a geometry file, choosing the codec from the file extension.
///
/// Supported extensions are `ply` and `obj` (case insensitive).
pub fn load_geometry(path: impl AsRef<Path>) -> Result<LoadedGeometry, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::FileDoesNotExist(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let geometry = match extension.as_deref() {
        Some("ply") => ply::read_ply(path)?,
        Some("obj") => obj::read_obj(path)?,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };
    log::debug!(
        "loaded {} vertices from {}",
        geometry.vertices.len(),
        path.display()
    );
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_geometry_missing() {
        let res = load_geometry("/definitely/not/here.ply");
        assert!(matches!(res, Err(LoadError::FileDoesNotExist(_))));
    }

    #[test]
    fn test_load_geometry_unsupported() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("model.stl");
        std::fs::write(&path, b"solid")?;
        assert!(matches!(load_geometry(&path), Err(LoadError::UnsupportedFormat(_))));
        Ok(())
    }

    #[test]
    fn test_load_geometry_dispatch() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("tri.OBJ");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")?;
        let mesh = load_geometry(&path)?.into_mesh()?;
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);
        Ok(())
    }
}
