use glam::{DMat3, DMat4, DVec3};
use wis3d_geometry::affine::{compose, decompose};
use wis3d_geometry::euler::EulerConvention;
use wis3d_tensor::{normalize, ArrayInput, Tensor};

use super::rows;
use crate::error::{ensure_len, TensorResultExt, Wis3dError};
use crate::paths::ObjectKind;
use crate::records::BoxRecord;

const KIND: ObjectKind = ObjectKind::Boxes;

// tolerance on the cosine between two unit edges
const ORTHOGONALITY_TOLERANCE: f64 = 1e-6;

/// The canonical corner layout.
///
/// ```text
///      4 --- 5        y
///     /|    /|        |
///   7 --- 6  |        o -- x
///   |  0 -|- 1       /
///   | /   | /       z
///   3 --- 2
/// ```
///
/// Corner 0 is the origin, corners 1, 4 and 3 are its neighbours along the
/// box x, y and z axes, and corner 6 is diagonally opposite to it.
pub const DEFAULT_CORNER_ORDER: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// The two ways of describing boxes.
#[derive(Debug)]
pub enum BoxesInput {
    /// Eight corners per box, `(n, 8, 3)` or `(8, 3)`.
    Corners {
        /// The corner positions.
        corners: ArrayInput,
        /// `order[i] = o` means the i-th given corner is canonical corner `o`.
        order: [usize; 8],
    },
    /// Center, Euler angles and extents, each `(n, 3)` or `(3,)`.
    ///
    /// A single row is broadcast to the number of boxes.
    Definition {
        /// The box centers.
        positions: ArrayInput,
        /// The orientations, in the convention of [`BoxOptions::euler`].
        eulers: ArrayInput,
        /// The side lengths.
        extents: ArrayInput,
    },
}

impl BoxesInput {
    /// Boxes from corners in the canonical order.
    pub fn corners(corners: impl Into<ArrayInput>) -> Self {
        Self::corners_with_order(corners, DEFAULT_CORNER_ORDER)
    }

    /// Boxes from corners in a custom order.
    pub fn corners_with_order(corners: impl Into<ArrayInput>, order: [usize; 8]) -> Self {
        Self::Corners {
            corners: corners.into(),
            order,
        }
    }

    /// Boxes from centers, Euler angles and extents.
    pub fn definition(
        positions: impl Into<ArrayInput>,
        eulers: impl Into<ArrayInput>,
        extents: impl Into<ArrayInput>,
    ) -> Self {
        Self::Definition {
            positions: positions.into(),
            eulers: eulers.into(),
            extents: extents.into(),
        }
    }
}

/// Options for [`crate::Wis3d::add_boxes`].
#[derive(Debug, Clone, Default)]
pub struct BoxOptions {
    /// One label per box.
    pub labels: Option<Vec<String>>,
    /// The Euler convention of the input and of the written record.
    pub euler: EulerConvention,
    /// The output file name, without extension.
    pub name: Option<String>,
}

struct BoxDefinition {
    position: DVec3,
    euler: [f64; 3],
    extent: DVec3,
}

/// Encode boxes into records expressed in the viewer frame.
///
/// Each box is composed into an affine transform in the source frame,
/// pre-multiplied by `transform` and decomposed again, so extents stay
/// aligned with the box axes under any basis change.
pub fn encode_boxes(
    input: BoxesInput,
    options: &BoxOptions,
    transform: &DMat4,
) -> Result<Vec<BoxRecord>, Wis3dError> {
    let convention = options.euler;
    let boxes = match input {
        BoxesInput::Corners { corners, order } => {
            let corners = normalize(corners).field(KIND, "corners")?;
            boxes_from_corners(&corners, &order, &convention)?
        }
        BoxesInput::Definition {
            positions,
            eulers,
            extents,
        } => boxes_from_definition(positions, eulers, extents)?,
    };

    if let Some(labels) = options.labels.as_ref() {
        ensure_len(KIND, "labels", boxes.len(), labels.len())?;
    }

    boxes
        .into_iter()
        .enumerate()
        .map(|(i, b)| {
            let local = compose(b.position, convention.to_matrix(b.euler), b.extent);
            let affine =
                decompose(&(*transform * local)).map_err(|e| Wis3dError::from_affine(KIND, e))?;
            Ok(BoxRecord {
                position: affine.translation.to_array(),
                euler: convention.from_matrix(&affine.rotation),
                extent: affine.zoom.to_array(),
                label: options.labels.as_ref().map(|labels| labels[i].clone()),
            })
        })
        .collect()
}

fn boxes_from_corners(
    corners: &Tensor,
    order: &[usize; 8],
    convention: &EulerConvention,
) -> Result<Vec<BoxDefinition>, Wis3dError> {
    let mut seen = [false; 8];
    for &o in order {
        if o >= 8 || std::mem::replace(&mut seen[o], true) {
            return Err(Wis3dError::invalid_argument(
                KIND,
                format!("corner order {order:?} is not a permutation of 0..8"),
            ));
        }
    }

    corners
        .rows::<24>()
        .field(KIND, "corners")?
        .iter()
        .enumerate()
        .map(|(index, flat)| {
            let mut canonical = [DVec3::ZERO; 8];
            for (i, &o) in order.iter().enumerate() {
                canonical[o] = DVec3::new(flat[3 * i], flat[3 * i + 1], flat[3 * i + 2]);
            }
            box_from_canonical_corners(index, &canonical, convention)
        })
        .collect()
}

fn box_from_canonical_corners(
    index: usize,
    c: &[DVec3; 8],
    convention: &EulerConvention,
) -> Result<BoxDefinition, Wis3dError> {
    let edges = [c[1] - c[0], c[4] - c[0], c[3] - c[0]];
    let extent = DVec3::new(edges[0].length(), edges[1].length(), edges[2].length());
    if extent.min_element() <= f64::EPSILON {
        return Err(Wis3dError::degenerate(
            KIND,
            format!("box {index} has a zero length edge"),
        ));
    }

    let [ux, uy, uz] = [edges[0] / extent.x, edges[1] / extent.y, edges[2] / extent.z];
    if ux.dot(uy).abs() > ORTHOGONALITY_TOLERANCE
        || ux.dot(uz).abs() > ORTHOGONALITY_TOLERANCE
        || uy.dot(uz).abs() > ORTHOGONALITY_TOLERANCE
    {
        return Err(Wis3dError::degenerate(
            KIND,
            format!("box {index} has non-orthogonal edges"),
        ));
    }

    let rotation = DMat3::from_cols(ux, uy, uz);
    if rotation.determinant() < 0.0 {
        return Err(Wis3dError::degenerate(
            KIND,
            format!("box {index} has left-handed edges"),
        ));
    }

    Ok(BoxDefinition {
        position: (c[0] + c[6]) / 2.0,
        euler: convention.from_matrix(&rotation),
        extent,
    })
}

fn boxes_from_definition(
    positions: ArrayInput,
    eulers: ArrayInput,
    extents: ArrayInput,
) -> Result<Vec<BoxDefinition>, Wis3dError> {
    let positions = rows::<3>(positions, KIND, "positions")?;
    let eulers = rows::<3>(eulers, KIND, "eulers")?;
    let extents = rows::<3>(extents, KIND, "extents")?;

    let n = positions.len().max(eulers.len()).max(extents.len());
    let positions = broadcast(positions, n, "positions")?;
    let eulers = broadcast(eulers, n, "eulers")?;
    let extents = broadcast(extents, n, "extents")?;

    Ok(positions
        .into_iter()
        .zip(eulers)
        .zip(extents)
        .map(|((position, euler), extent)| BoxDefinition {
            position: DVec3::from_array(position),
            euler,
            extent: DVec3::from_array(extent),
        })
        .collect())
}

fn broadcast(
    rows: Vec<[f64; 3]>,
    n: usize,
    field: &'static str,
) -> Result<Vec<[f64; 3]>, Wis3dError> {
    match rows.as_slice() {
        [row] => Ok(vec![*row; n]),
        _ => {
            ensure_len(KIND, field, n, rows.len())?;
            Ok(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wis3d_geometry::frame::AxisPattern;

    fn unit_cube(offset: [f64; 3], size: [f64; 3]) -> Vec<[f64; 3]> {
        let [ox, oy, oz] = offset;
        let [sx, sy, sz] = size;
        vec![
            [ox, oy, oz],
            [ox + sx, oy, oz],
            [ox + sx, oy, oz + sz],
            [ox, oy, oz + sz],
            [ox, oy + sy, oz],
            [ox + sx, oy + sy, oz],
            [ox + sx, oy + sy, oz + sz],
            [ox, oy + sy, oz + sz],
        ]
    }

    #[test]
    fn test_corners_axis_aligned() -> Result<(), Box<dyn std::error::Error>> {
        let input = BoxesInput::corners(unit_cube([1.0, 2.0, 3.0], [2.0, 4.0, 6.0]));
        let boxes = encode_boxes(input, &BoxOptions::default(), &DMat4::IDENTITY)?;
        assert_eq!(boxes.len(), 1);
        let b = &boxes[0];
        for (a, e) in b.position.iter().zip([2.0, 4.0, 6.0]) {
            assert_relative_eq!(*a, e, epsilon = 1e-9);
        }
        for (a, e) in b.extent.iter().zip([2.0, 4.0, 6.0]) {
            assert_relative_eq!(*a, e, epsilon = 1e-9);
        }
        for a in b.euler {
            assert_relative_eq!(a, 0.0, epsilon = 1e-9);
        }
        assert!(b.label.is_none());
        Ok(())
    }

    #[test]
    fn test_definition_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let input = BoxesInput::definition(
            vec![[1.0, -2.0, 0.5]],
            vec![[0.3, -0.2, 1.1]],
            vec![[1.0, 2.0, 3.0]],
        );
        let boxes = encode_boxes(input, &BoxOptions::default(), &DMat4::IDENTITY)?;
        let b = &boxes[0];
        for (a, e) in b.position.iter().zip([1.0, -2.0, 0.5]) {
            assert_relative_eq!(*a, e, epsilon = 1e-9);
        }
        for (a, e) in b.euler.iter().zip([0.3, -0.2, 1.1]) {
            assert_relative_eq!(*a, e, epsilon = 1e-9);
        }
        for (a, e) in b.extent.iter().zip([1.0, 2.0, 3.0]) {
            assert_relative_eq!(*a, e, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_definition_broadcast() -> Result<(), Box<dyn std::error::Error>> {
        let input = BoxesInput::definition(
            vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]],
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
        );
        let options = BoxOptions {
            labels: Some(vec!["a".into(), "b".into(), "c".into()]),
            ..Default::default()
        };
        let boxes = encode_boxes(input, &options, &DMat4::IDENTITY)?;
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[2].label.as_deref(), Some("c"));

        let input = BoxesInput::definition(
            vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
            vec![[0.0, 0.0, 0.0]; 3],
            [1.0, 1.0, 1.0],
        );
        assert!(matches!(
            encode_boxes(input, &BoxOptions::default(), &DMat4::IDENTITY),
            Err(Wis3dError::ShapeMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_label_count_mismatch() {
        let input = BoxesInput::corners(unit_cube([0.0; 3], [1.0; 3]));
        let options = BoxOptions {
            labels: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        };
        assert!(matches!(
            encode_boxes(input, &options, &DMat4::IDENTITY),
            Err(Wis3dError::ShapeMismatch {
                expected: 1,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_permuted_corners_match() -> Result<(), Box<dyn std::error::Error>> {
        // a rotated box so that euler angles are non trivial
        let rotation = EulerConvention::RXYZ.to_matrix([0.4, -0.1, 0.7]);
        let corners: Vec<[f64; 3]> = unit_cube([0.0; 3], [1.0, 2.0, 0.5])
            .into_iter()
            .map(|c| (rotation * DVec3::from_array(c) + DVec3::new(3.0, 1.0, -2.0)).to_array())
            .collect();

        let order = [6, 2, 0, 7, 4, 1, 3, 5];
        let mut shuffled = vec![[0.0; 3]; 8];
        for (i, &o) in order.iter().enumerate() {
            shuffled[i] = corners[o];
        }

        let direct = encode_boxes(
            BoxesInput::corners(corners),
            &BoxOptions::default(),
            &DMat4::IDENTITY,
        )?;
        let permuted = encode_boxes(
            BoxesInput::corners_with_order(shuffled, order),
            &BoxOptions::default(),
            &DMat4::IDENTITY,
        )?;
        for (a, b) in direct.iter().zip(&permuted) {
            for i in 0..3 {
                assert_relative_eq!(a.position[i], b.position[i], epsilon = 1e-9);
                assert_relative_eq!(a.euler[i], b.euler[i], epsilon = 1e-9);
                assert_relative_eq!(a.extent[i], b.extent[i], epsilon = 1e-9);
            }
        }
        for (a, e) in direct[0].euler.iter().zip([0.4, -0.1, 0.7]) {
            assert_relative_eq!(*a, e, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_invalid_order() {
        let input = BoxesInput::corners_with_order(
            unit_cube([0.0; 3], [1.0; 3]),
            [0, 1, 2, 3, 4, 5, 6, 6],
        );
        assert!(matches!(
            encode_boxes(input, &BoxOptions::default(), &DMat4::IDENTITY),
            Err(Wis3dError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_degenerate_corners() {
        let mut skewed = unit_cube([0.0; 3], [1.0; 3]);
        skewed[4] = [0.5, 1.0, 0.0];
        assert!(matches!(
            encode_boxes(BoxesInput::corners(skewed), &BoxOptions::default(), &DMat4::IDENTITY),
            Err(Wis3dError::DegenerateInput { .. })
        ));

        let flat = unit_cube([0.0; 3], [1.0, 0.0, 1.0]);
        assert!(matches!(
            encode_boxes(BoxesInput::corners(flat), &BoxOptions::default(), &DMat4::IDENTITY),
            Err(Wis3dError::DegenerateInput { .. })
        ));

        // swapping the y and z neighbours mirrors the box
        let mut mirrored = unit_cube([0.0; 3], [1.0; 3]);
        mirrored.swap(3, 4);
        assert!(matches!(
            encode_boxes(BoxesInput::corners(mirrored), &BoxOptions::default(), &DMat4::IDENTITY),
            Err(Wis3dError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_opencv_frame() -> Result<(), Box<dyn std::error::Error>> {
        let transform = AxisPattern::parse(&["x", "-y", "-z"])?.transform();
        let input = BoxesInput::definition([1.0, 2.0, 3.0], [0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
        let boxes = encode_boxes(input, &BoxOptions::default(), &transform)?;
        for (a, e) in boxes[0].position.iter().zip([1.0, -2.0, -3.0]) {
            assert_relative_eq!(*a, e, epsilon = 1e-9);
        }
        // a rotation of pi about x, extents keep their axes
        for (a, e) in boxes[0].extent.iter().zip([1.0, 2.0, 3.0]) {
            assert_relative_eq!(*a, e, epsilon = 1e-9);
        }
        Ok(())
    }
}
