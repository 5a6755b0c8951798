use rand::{rngs::StdRng, Rng, SeedableRng};
use wis3d_tensor::ArrayInput;

use super::{rows, rows_exact};
use crate::error::Wis3dError;
use crate::paths::ObjectKind;

const KIND: ObjectKind = ObjectKind::Lines;

/// Options for [`crate::Wis3d::add_rays`].
#[derive(Debug, Clone)]
pub struct RayOptions {
    /// Where each segment starts, as a multiple of the direction.
    pub min: f64,
    /// Where each segment ends, as a multiple of the direction.
    pub max: f64,
    /// Below 1, the fraction of rays to keep. Above 1, the number of rays to keep.
    ///
    /// Rays are drawn uniformly with replacement.
    pub sample: f64,
    /// Seed for the sampler; a random seed is used when absent.
    pub seed: Option<u64>,
    /// The output file name, without extension.
    pub name: Option<String>,
}

impl Default for RayOptions {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10.0,
            sample: 1.0,
            seed: None,
            name: None,
        }
    }
}

/// Turn rays into `(start_points, end_points)` segments, `o + d * min` to `o + d * max`.
pub fn sample_rays(
    rays_o: impl Into<ArrayInput>,
    rays_d: impl Into<ArrayInput>,
    options: &RayOptions,
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), Wis3dError> {
    let origins = rows::<3>(rays_o, KIND, "rays_o")?;
    let directions = rows_exact::<3>(rays_d, KIND, "rays_d", origins.len())?;
    if !options.sample.is_finite() || options.sample <= 0.0 {
        return Err(Wis3dError::invalid_argument(
            KIND,
            format!("ray sample must be positive and finite, got {}", options.sample),
        ));
    }

    let n = origins.len();
    let indices: Vec<usize> = if options.sample == 1.0 || n == 0 {
        (0..n).collect()
    } else {
        let size = if options.sample < 1.0 {
            (options.sample * n as f64) as usize
        } else {
            options.sample as usize
        };
        let mut rng: StdRng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        (0..size).map(|_| rng.random_range(0..n)).collect()
    };
    log::debug!("sampled {} of {} rays", indices.len(), n);

    let segment = |i: usize, t: f64| {
        let (o, d) = (origins[i], directions[i]);
        [o[0] + d[0] * t, o[1] + d[1] * t, o[2] + d[2] * t]
    };
    Ok(indices
        .iter()
        .map(|&i| (segment(i, options.min), segment(i, options.max)))
        .unzip())
}
