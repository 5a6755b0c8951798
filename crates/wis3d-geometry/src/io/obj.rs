use std::io::BufRead;
use std::path::Path;

use super::LoadedGeometry;

/// Error types for the OBJ module.
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    /// Failed to read the OBJ file
    #[error("Failed to read OBJ file")]
    Io(#[from] std::io::Error),

    /// A statement could not be parsed
    #[error("Invalid OBJ statement at line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
}

/// Read the vertices, optional vertex colors and faces of a Wavefront OBJ file.
///
/// Vertex colors use the common `v x y z r g b` extension with components in
/// `[0, 1]`. Polygons are triangulated as fans; texture coordinates, normals,
/// groups and materials are ignored.
pub fn read_obj(path: impl AsRef<Path>) -> Result<LoadedGeometry, ObjError> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);

    let mut vertices = Vec::new();
    let mut colors = Vec::new();
    let mut faces = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let values = parts
                    .map(|p| p.parse::<f64>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| ObjError::Parse {
                        line: line_no,
                        message: e.to_string(),
                    })?;
                if values.len() < 3 {
                    return Err(ObjError::Parse {
                        line: line_no,
                        message: "vertex needs three coordinates".into(),
                    });
                }
                vertices.push([values[0], values[1], values[2]]);
                if values.len() >= 6 {
                    let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
                    colors.push([to_u8(values[3]), to_u8(values[4]), to_u8(values[5])]);
                }
            }
            Some("f") => {
                let indices = parts
                    .map(|p| resolve_index(p, vertices.len(), line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                for k in 1..indices.len().saturating_sub(1) {
                    faces.push([indices[0], indices[k], indices[k + 1]]);
                }
            }
            _ => {}
        }
    }

    let colors = (!colors.is_empty() && colors.len() == vertices.len()).then_some(colors);
    Ok(LoadedGeometry {
        vertices,
        faces: (!faces.is_empty()).then_some(faces),
        colors,
        normals: None,
    })
}

// `f` entries look like `7`, `7/1`, `7//3` or `-1`; indices are 1-based and
// negative values count back from the last vertex.
fn resolve_index(token: &str, num_vertices: usize, line: usize) -> Result<usize, ObjError> {
    let raw = token.split('/').next().unwrap_or_default();
    let index: i64 = raw.parse().map_err(|_| ObjError::Parse {
        line,
        message: format!("invalid face index {token:?}"),
    })?;
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => num_vertices as i64 + i,
        _ => -1,
    };
    if resolved < 0 {
        return Err(ObjError::Parse {
            line,
            message: format!("face index {token:?} out of range"),
        });
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_obj_quad() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("quad.obj");
        let content = "# quad\nv 0 0 0 1 0 0\nv 1 0 0 0 1 0\nv 1 1 0 0 0 1\nv 0 1 0 1 1 1\nvn 0 0 1\nf 1//1 2//1 3//1 -1//1\n";
        std::fs::write(&path, content)?;

        let geometry = read_obj(&path)?;
        assert_eq!(geometry.vertices.len(), 4);
        assert_eq!(geometry.faces, Some(vec![[0, 1, 2], [0, 2, 3]]));
        assert_eq!(geometry.colors.as_ref().map(|c| c[0]), Some([255, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_read_obj_bad_vertex() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("bad.obj");
        std::fs::write(&path, "v 0 0\n")?;
        assert!(matches!(read_obj(&path), Err(ObjError::Parse { line: 1, .. })));
        Ok(())
    }

    #[test]
    fn test_resolve_index() -> Result<(), ObjError> {
        assert_eq!(resolve_index("3/4/5", 10, 1)?, 2);
        assert_eq!(resolve_index("-1", 10, 1)?, 9);
        assert!(resolve_index("0", 10, 1).is_err());
        Ok(())
    }
}
