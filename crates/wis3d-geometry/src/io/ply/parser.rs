use std::io::{BufRead, Read};
use std::path::Path;

use super::{
    properties::{
        PlyDataType, PlyElementDefinition, PlyFormat, PlyPropertyDefinition, PlyPropertyKind,
    },
    PlyError, PlyRow, PlyValue,
};
use crate::io::LoadedGeometry;

/// The parsed header of a PLY file.
#[derive(Debug, PartialEq, Eq)]
pub struct PlyHeader {
    /// The body encoding.
    pub format: PlyFormat,
    /// The declared elements, in body order.
    pub elements: Vec<PlyElementDefinition>,
}

fn parse_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, PlyError> {
    let mut line = String::new();
    let mut format = None;
    let mut is_ply = false;
    let mut elements: Vec<PlyElementDefinition> = Vec::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::InvalidHeader("missing end_header".into()));
        }
        let trimmed = line.trim();
        let parts: Vec<&str> = trimmed.split_whitespace().collect();

        match parts.as_slice() {
            ["ply"] => is_ply = true,
            ["end_header"] => break,
            ["format", "ascii", ..] => format = Some(PlyFormat::Ascii),
            ["format", "binary_little_endian", ..] => format = Some(PlyFormat::BinaryLittleEndian),
            ["format", other, ..] => {
                return Err(PlyError::UnsupportedProperty(format!("format {other}")))
            }
            ["element", name, count] => {
                let count = count.parse().map_err(|_| {
                    PlyError::InvalidHeader(format!("bad element count in {trimmed:?}"))
                })?;
                elements.push(PlyElementDefinition {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            ["property", "list", count, item, name] => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| PlyError::InvalidHeader("property before element".into()))?;
                element.properties.push(PlyPropertyDefinition {
                    name: name.to_string(),
                    kind: PlyPropertyKind::List {
                        count: PlyDataType::parse(count)?,
                        item: PlyDataType::parse(item)?,
                    },
                });
            }
            ["property", data_type, name] => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| PlyError::InvalidHeader("property before element".into()))?;
                element.properties.push(PlyPropertyDefinition {
                    name: name.to_string(),
                    kind: PlyPropertyKind::Scalar(PlyDataType::parse(data_type)?),
                });
            }
            // comments, obj_info and blank lines
            _ => {}
        }
    }

    if !is_ply {
        return Err(PlyError::InvalidHeader("missing ply magic".into()));
    }
    let format = format.ok_or_else(|| PlyError::InvalidHeader("missing format line".into()))?;

    Ok(PlyHeader { format, elements })
}

fn read_rows<F>(element: &PlyElementDefinition, mut next: F) -> Result<Vec<PlyRow>, PlyError>
where
    F: FnMut(PlyDataType) -> Result<f64, PlyError>,
{
    let mut rows = Vec::with_capacity(element.count);
    for _ in 0..element.count {
        let mut row = PlyRow::default();
        for property in &element.properties {
            let value = match property.kind {
                PlyPropertyKind::Scalar(dtype) => PlyValue::Scalar(next(dtype)?, dtype),
                PlyPropertyKind::List { count, item } => {
                    let n = next(count)? as usize;
                    PlyValue::List((0..n).map(|_| next(item)).collect::<Result<_, _>>()?)
                }
            };
            row.values.push((property.name.clone(), value));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn rows_to_geometry(
    vertex_rows: &[PlyRow],
    face_rows: Option<&[PlyRow]>,
) -> Result<LoadedGeometry, PlyError> {
    let vertices = vertex_rows
        .iter()
        .map(|row| {
            row.to_point()
                .ok_or_else(|| PlyError::MalformedBody("vertex without x, y, z".into()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // colors and normals are kept only when every vertex carries them
    let colors = vertex_rows.iter().map(PlyRow::to_color).collect::<Option<Vec<_>>>();
    let normals = vertex_rows.iter().map(PlyRow::to_normal).collect::<Option<Vec<_>>>();

    let faces = face_rows
        .map(|rows| {
            let mut triangles = Vec::with_capacity(rows.len());
            for row in rows {
                let indices = row
                    .to_indices()
                    .ok_or_else(|| PlyError::MalformedBody("face without vertex_indices".into()))?;
                for k in 1..indices.len().saturating_sub(1) {
                    triangles.push([indices[0], indices[k], indices[k + 1]]);
                }
            }
            Ok::<_, PlyError>(triangles)
        })
        .transpose()?;

    Ok(LoadedGeometry {
        vertices,
        faces,
        colors: colors.filter(|c| !c.is_empty()),
        normals: normals.filter(|n| !n.is_empty()),
    })
}

/// Read an ascii or binary little endian PLY file.
///
/// Vertex positions, colors and normals are read from the `vertex` element
/// and polygons from the `face` element (triangulated as fans). Other
/// elements are skipped.
pub fn read_ply(path: impl AsRef<Path>) -> Result<LoadedGeometry, PlyError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let header = parse_header(&mut reader)?;

    let mut vertex_rows = Vec::new();
    let mut face_rows = None;

    match header.format {
        PlyFormat::Ascii => {
            let mut body = String::new();
            reader.read_to_string(&mut body)?;
            let mut tokens = body.split_whitespace();
            for element in &header.elements {
                let rows = read_rows(element, |_| {
                    let token = tokens
                        .next()
                        .ok_or_else(|| PlyError::MalformedBody("unexpected end of file".into()))?;
                    token
                        .parse::<f64>()
                        .map_err(|_| PlyError::MalformedBody(format!("invalid number {token:?}")))
                })?;
                collect_element(element, rows, &mut vertex_rows, &mut face_rows);
            }
        }
        PlyFormat::BinaryLittleEndian => {
            let mut buffer = [0u8; 8];
            for element in &header.elements {
                let rows = read_rows(element, |dtype| {
                    let bytes = &mut buffer[..dtype.size()];
                    reader.read_exact(bytes)?;
                    dtype.decode_le(bytes)
                })?;
                collect_element(element, rows, &mut vertex_rows, &mut face_rows);
            }
        }
    }

    rows_to_geometry(&vertex_rows, face_rows.as_deref())
}

fn collect_element(
    element: &PlyElementDefinition,
    rows: Vec<PlyRow>,
    vertex_rows: &mut Vec<PlyRow>,
    face_rows: &mut Option<Vec<PlyRow>>,
) {
    match element.name.as_str() {
        "vertex" => *vertex_rows = rows,
        "face" => *face_rows = Some(rows),
        other => log::debug!("skipping ply element {other} with {} rows", rows.len()),
    }
}
