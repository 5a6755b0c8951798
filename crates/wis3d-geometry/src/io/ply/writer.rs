use std::io::Write;
use std::path::Path;

use super::PlyError;
use crate::mesh::TriMesh;
use crate::pointcloud::PointCloud;

fn write_ply_impl(
    path: impl AsRef<Path>,
    vertices: &[[f64; 3]],
    colors: Option<&[[u8; 3]]>,
    faces: Option<&[[usize; 3]]>,
) -> Result<(), PlyError> {
    if let Some(colors) = colors.filter(|c| c.len() != vertices.len()) {
        return Err(PlyError::MalformedBody(format!(
            "{} vertices but {} colors",
            vertices.len(),
            colors.len()
        )));
    }

    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);

    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment exported by wis3d")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    if colors.is_some() {
        writeln!(writer, "property uchar red")?;
        writeln!(writer, "property uchar green")?;
        writeln!(writer, "property uchar blue")?;
    }
    if let Some(faces) = faces {
        writeln!(writer, "element face {}", faces.len())?;
        writeln!(writer, "property list uchar int vertex_indices")?;
    }
    writeln!(writer, "end_header")?;

    for (i, vertex) in vertices.iter().enumerate() {
        for v in vertex {
            writer.write_all(&v.to_le_bytes())?;
        }
        if let Some(colors) = colors {
            writer.write_all(&colors[i])?;
        }
    }

    if let Some(faces) = faces {
        for face in faces {
            writer.write_all(&[3u8])?;
            for &index in face {
                let index = i32::try_from(index).map_err(|_| PlyError::IndexOverflow(index))?;
                writer.write_all(&index.to_le_bytes())?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write a point cloud as a binary little endian PLY file.
pub fn write_ply_point_cloud(
    path: impl AsRef<Path>,
    pointcloud: &PointCloud,
) -> Result<(), PlyError> {
    write_ply_impl(
        path,
        pointcloud.points(),
        pointcloud.colors().map(|c| c.as_slice()),
        None,
    )
}

/// Write a triangle mesh as a binary little endian PLY file.
pub fn write_ply_mesh(path: impl AsRef<Path>, mesh: &TriMesh) -> Result<(), PlyError> {
    write_ply_impl(path, mesh.vertices(), mesh.vertex_colors(), Some(mesh.faces()))
}
