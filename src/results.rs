use crate::{
    error::Result,
    normalise::NormalisedObservation,
    ratio::Ratio,
    reference::ReferenceValue,
    size_factor::SizeFactor,
    table::{to_wide, Observation, WideTable},
};

/// Every table produced by a normalisation run
///
/// The long tables are kept so that an external plotting layer can render
/// sample-vs-sample scatterplots and per-sample ratio distributions.
#[derive(Debug, Clone)]
pub struct MedianRatioResults {
    pub observations: Vec<Observation>,
    pub reference: Vec<ReferenceValue>,
    pub ratios: Vec<Ratio>,
    pub size_factors: Vec<SizeFactor>,
    pub normalised: Vec<NormalisedObservation>,
    pub normalised_table: WideTable,
}

impl MedianRatioResults {
    pub fn size_factor(&self, sample: &str) -> Option<f64> {
        self.size_factors
            .iter()
            .find(|f| f.sample == sample)
            .map(|f| f.factor)
    }

    /// Ratios pivoted to one row per complete-case gene
    pub fn ratio_table(&self) -> Result<WideTable> {
        to_wide(&self.ratios, self.normalised_table.id_column())
    }

    pub fn pprint(&self) {
        println!("Sample\tSizeFactor");
        for size_factor in &self.size_factors {
            println!("{}\t{}", size_factor.sample, size_factor.factor);
        }
    }
}
