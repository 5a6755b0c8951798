use glam::DMat4;
use wis3d_tensor::ArrayInput;

use super::{optional_rows, rows, rows_exact, transform_directions};
use crate::error::Wis3dError;
use crate::paths::ObjectKind;
use crate::records::LineRecord;

const KIND: ObjectKind = ObjectKind::Lines;

/// Options for [`crate::Wis3d::add_lines`].
#[derive(Debug, Default)]
pub struct LineOptions {
    /// One RGB color per line.
    pub colors: Option<ArrayInput>,
    /// The output file name, without extension.
    pub name: Option<String>,
}

/// Encode line segments, `(n, 3)` or `(3,)` start and end points.
pub fn encode_lines(
    start_points: impl Into<ArrayInput>,
    end_points: impl Into<ArrayInput>,
    colors: Option<ArrayInput>,
    transform: &DMat4,
) -> Result<Vec<LineRecord>, Wis3dError> {
    let mut start_points = rows::<3>(start_points, KIND, "start_points")?;
    let mut end_points = rows_exact::<3>(end_points, KIND, "end_points", start_points.len())?;
    let colors = optional_rows::<3>(colors, KIND, "colors", start_points.len())?;

    transform_directions(&mut start_points, transform);
    transform_directions(&mut end_points, transform);

    Ok(start_points
        .into_iter()
        .zip(end_points)
        .enumerate()
        .map(|(i, (start_point, end_point))| LineRecord {
            start_point,
            end_point,
            color: colors.as_ref().map(|colors| colors[i]),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lines() -> Result<(), Box<dyn std::error::Error>> {
        let lines = encode_lines(
            vec![[0.0, 1.0, 0.0], [0.0, -1.0, 0.0]],
            vec![[1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            Some(vec![[255u8, 255, 255], [0, 0, 0]].into()),
            &DMat4::IDENTITY,
        )?;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start_point, [0.0, -1.0, 0.0]);
        assert_eq!(lines[0].color, Some([255.0, 255.0, 255.0]));
        Ok(())
    }

    #[test]
    fn test_single_line() -> Result<(), Box<dyn std::error::Error>> {
        let lines = encode_lines([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], None, &DMat4::IDENTITY)?;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].color.is_none());
        Ok(())
    }

    #[test]
    fn test_mismatched_end_points() {
        let res = encode_lines(
            vec![[0.0; 3]; 3],
            vec![[1.0; 3]; 2],
            None,
            &DMat4::IDENTITY,
        );
        assert!(matches!(
            res,
            Err(Wis3dError::ShapeMismatch {
                kind: ObjectKind::Lines,
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }
}
