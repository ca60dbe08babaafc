use bon::Builder;
use log::{debug, info};

use crate::{
    config::ReferenceMean,
    error::Result,
    normalise::normalise,
    ratio::compute_ratios,
    reference::build_reference,
    results::MedianRatioResults,
    size_factor::estimate_size_factors,
    table::{to_long, to_wide, WideTable},
};

/// Median-of-ratios size factor normalisation of a count table
///
/// ```ignore
/// let results = MedianRatio::builder().table(&table).build().run()?;
/// ```
#[derive(Builder)]
pub struct MedianRatio<'a> {
    table: &'a WideTable,
    #[builder(default)]
    reference_mean: ReferenceMean,
}

impl<'a> MedianRatio<'a> {
    /// Run the normalisation
    ///
    /// The algorithm is a four-step process:
    /// 1. Build a reference sample from genes counted in every sample
    /// 2. Compute each count's ratio to its gene's reference value
    /// 3. Take each sample's median ratio as its size factor
    /// 4. Divide every count by its sample's size factor
    ///
    /// Any failing step aborts the run and nothing is returned.
    pub fn run(&self) -> Result<MedianRatioResults> {
        info!(
            "Normalising {} genes across {} samples",
            self.table.n_genes(),
            self.table.n_samples()
        );
        let observations = to_long(self.table);

        // Build the reference
        let reference = build_reference(&observations, self.reference_mean);
        info!(
            "{} of {} genes have nonzero counts in every sample",
            reference.len(),
            self.table.n_genes()
        );

        // Ratios to the reference
        let ratios = compute_ratios(&observations, &reference)?;
        debug!("Computed {} ratios", ratios.len());

        // Median ratio per sample
        let size_factors = estimate_size_factors(&ratios, self.table.samples())?;
        for size_factor in &size_factors {
            debug!(
                "Size factor for {}: {}",
                size_factor.sample, size_factor.factor
            );
        }

        // Apply the factors to every observation
        let normalised = normalise(&observations, &size_factors)?;
        let normalised_table = to_wide(&normalised, self.table.id_column())?;
        info!("Normalisation complete");

        Ok(MedianRatioResults {
            observations,
            reference,
            ratios,
            size_factors,
            normalised,
            normalised_table,
        })
    }
}
