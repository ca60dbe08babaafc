use std::collections::HashMap;

use derive_new::new;
use serde::Serialize;

use crate::{
    error::{MedratError, Result},
    reference::ReferenceValue,
    table::{LongRecord, Observation},
};

/// An observed count relative to its gene's reference value
#[derive(new, Debug, Clone, PartialEq, Serialize)]
pub struct Ratio {
    pub gene: String,
    pub sample: String,
    pub ratio: f64,
}

impl LongRecord for Ratio {
    fn gene(&self) -> &str {
        &self.gene
    }
    fn sample(&self) -> &str {
        &self.sample
    }
    fn value(&self) -> f64 {
        self.ratio
    }
}

/// Inner-joins observations to the reference on gene and computes `count / average_count`
///
/// Observations of genes without a reference value are dropped.
pub fn compute_ratios(
    observations: &[Observation],
    reference: &[ReferenceValue],
) -> Result<Vec<Ratio>> {
    if reference.is_empty() {
        return Err(MedratError::NoCompleteCases);
    }
    let lookup = reference
        .iter()
        .map(|r| (r.gene.as_str(), r.average_count))
        .collect::<HashMap<_, _>>();

    Ok(observations
        .iter()
        .filter_map(|o| {
            lookup
                .get(o.gene.as_str())
                .map(|average| Ratio::new(o.gene.clone(), o.sample.clone(), o.count / average))
        })
        .collect())
}
