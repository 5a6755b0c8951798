use std::collections::BTreeMap;

use wis3d_io::png::image_to_data_url;
use wis3d_tensor::{normalize, ArrayInput};

use super::{build_image, rows, rows_exact, ImageInput};
use crate::error::{ensure_len, TensorResultExt, Wis3dError};
use crate::paths::ObjectKind;
use crate::records::CorrespondenceRecord;

const KIND: ObjectKind = ObjectKind::Correspondences;

/// Options for [`crate::Wis3d::add_keypoint_correspondences`].
#[derive(Debug, Default)]
pub struct CorrespondenceOptions {
    /// Keypoints of the first image without a match, any count.
    pub unmatched_kpts0: Option<ArrayInput>,
    /// Keypoints of the second image without a match, any count.
    pub unmatched_kpts1: Option<ArrayInput>,
    /// Named scalar values, one per match after flattening.
    pub metrics: BTreeMap<String, ArrayInput>,
    /// Named flags, one per match.
    pub booleans: BTreeMap<String, Vec<bool>>,
    /// Free-form metadata stored as is.
    pub meta: Option<serde_json::Value>,
    /// The output file name, without extension.
    pub name: Option<String>,
}

/// Encode matches between two images; both images are embedded as PNG data URLs.
///
/// Every array is validated before the images are decoded and encoded.
pub fn encode_correspondences(
    img0: ImageInput,
    img1: ImageInput,
    kpts0: impl Into<ArrayInput>,
    kpts1: impl Into<ArrayInput>,
    options: CorrespondenceOptions,
) -> Result<CorrespondenceRecord, Wis3dError> {
    let kpts0 = rows::<2>(kpts0, KIND, "kpts0")?;
    let kpts1 = rows_exact::<2>(kpts1, KIND, "kpts1", kpts0.len())?;
    let n = kpts0.len();

    let unmatched_kpts0 = options
        .unmatched_kpts0
        .map(|kpts| rows::<2>(kpts, KIND, "unmatched_kpts0"))
        .transpose()?;
    let unmatched_kpts1 = options
        .unmatched_kpts1
        .map(|kpts| rows::<2>(kpts, KIND, "unmatched_kpts1"))
        .transpose()?;

    let mut metrics = BTreeMap::new();
    for (key, values) in options.metrics {
        let values = normalize(values).field(KIND, "metrics")?.into_vec();
        ensure_len(KIND, &format!("metrics.{key}"), n, values.len())?;
        metrics.insert(key, values);
    }
    for (key, values) in options.booleans.iter() {
        ensure_len(KIND, &format!("booleans.{key}"), n, values.len())?;
    }

    Ok(CorrespondenceRecord {
        img0: image_to_data_url(&build_image(img0, KIND)?)?,
        img1: image_to_data_url(&build_image(img1, KIND)?)?,
        kpts0,
        kpts1,
        unmatched_kpts0,
        unmatched_kpts1,
        metrics: (!metrics.is_empty()).then_some(metrics),
        booleans: (!options.booleans.is_empty()).then_some(options.booleans),
        meta: options.meta,
    })
}
