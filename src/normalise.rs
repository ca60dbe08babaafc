//! Applying size factors to counts.
//!
//! [`normalise`] divides every observation by its sample's median-of-ratios
//! size factor. [`normalise_global`] is the per-million total-sum baseline,
//! which is biased when most genes shift in the same direction between samples.

use std::collections::HashMap;

use derive_new::new;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    error::{MedratError, Result},
    size_factor::SizeFactor,
    table::{LongRecord, Observation, WideTable},
};

/// Scale used by global normalisation (counts per million)
pub const PER_MILLION: f64 = 1e6;

/// An observation divided by its sample's size factor
#[derive(new, Debug, Clone, PartialEq, Serialize)]
pub struct NormalisedObservation {
    pub gene: String,
    pub sample: String,
    pub value: f64,
}

impl LongRecord for NormalisedObservation {
    fn gene(&self) -> &str {
        &self.gene
    }
    fn sample(&self) -> &str {
        &self.sample
    }
    fn value(&self) -> f64 {
        self.value
    }
}

/// Left-joins every observation to its sample's size factor and divides
///
/// Genes excluded from the reference are normalised like any other. An
/// observation whose sample has no factor fails the whole call.
pub fn normalise(
    observations: &[Observation],
    factors: &[SizeFactor],
) -> Result<Vec<NormalisedObservation>> {
    let lookup = factors
        .iter()
        .map(|f| (f.sample.as_str(), f.factor))
        .collect::<HashMap<_, _>>();

    observations
        .par_iter()
        .map(|o| match lookup.get(o.sample.as_str()) {
            Some(factor) => Ok(NormalisedObservation::new(
                o.gene.clone(),
                o.sample.clone(),
                o.count / factor,
            )),
            None => Err(MedratError::MissingFactor {
                gene: o.gene.clone(),
                sample: o.sample.clone(),
            }),
        })
        .collect()
}

/// Global-sum normalisation: each count divided by its sample total in millions
pub fn normalise_global(table: &WideTable) -> Result<WideTable> {
    let divisors = (0..table.n_samples())
        .map(|j| {
            let millions = table.column(j).iter().map(|v| v / PER_MILLION).sum::<f64>();
            if millions > 0.0 && millions.is_finite() {
                Ok(millions)
            } else {
                Err(MedratError::EmptySample {
                    sample: table.samples()[j].clone(),
                })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let rows = (0..table.n_genes())
        .map(|i| {
            table
                .row(i)
                .iter()
                .zip(divisors.iter())
                .map(|(count, divisor)| count / divisor)
                .collect::<Vec<f64>>()
        })
        .collect::<Vec<_>>();

    WideTable::new(
        table.id_column(),
        table.genes().to_vec(),
        table.samples().to_vec(),
        rows,
    )
}
