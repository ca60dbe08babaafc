use std::collections::HashMap;

use derive_new::new;
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    error::{MedratError, Result},
    math::median,
    ratio::Ratio,
};

/// Per-sample divisor correcting for sample-specific scaling
#[derive(new, Debug, Clone, PartialEq, Serialize)]
pub struct SizeFactor {
    pub sample: String,
    pub factor: f64,
}

/// Reduces each sample's ratios to their median
///
/// Factors are returned in the order of `samples`. Every listed sample must have
/// at least one ratio.
pub fn estimate_size_factors(ratios: &[Ratio], samples: &[String]) -> Result<Vec<SizeFactor>> {
    let mut by_sample: HashMap<&str, Vec<f64>> = ratios
        .iter()
        .map(|r| (r.sample.as_str(), r.ratio))
        .into_group_map();

    let groups = samples
        .iter()
        .map(|sample| (sample, by_sample.remove(sample.as_str()).unwrap_or_default()))
        .collect::<Vec<_>>();

    groups
        .into_par_iter()
        .map(|(sample, mut values)| {
            let factor = median(&mut values).ok_or_else(|| MedratError::EmptySample {
                sample: sample.clone(),
            })?;
            Ok(SizeFactor::new(sample.clone(), factor))
        })
        .collect()
}
