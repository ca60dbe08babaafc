use std::collections::HashMap;

use derive_new::new;
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;

use crate::{config::ReferenceMean, table::Observation};

/// The synthetic reference count of a complete-case gene
#[derive(new, Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceValue {
    pub gene: String,
    pub average_count: f64,
}

/// Builds the reference sample from complete-case genes
///
/// A gene contributes only if every sample seen anywhere in `observations` has a
/// strictly positive count for it. Genes are emitted in first-seen order; the
/// result is empty when no gene qualifies.
pub fn build_reference(
    observations: &[Observation],
    reference_mean: ReferenceMean,
) -> Vec<ReferenceValue> {
    let samples = observations
        .iter()
        .map(|o| o.sample.as_str())
        .unique()
        .collect::<Vec<_>>();
    let genes = observations
        .iter()
        .map(|o| o.gene.as_str())
        .unique()
        .collect::<Vec<_>>();
    let by_gene: HashMap<&str, Vec<&Observation>> = observations
        .iter()
        .map(|o| (o.gene.as_str(), o))
        .into_group_map();

    genes
        .par_iter()
        .filter_map(|gene| {
            let group = &by_gene[gene];
            let counts = samples
                .iter()
                .map(|sample| {
                    group
                        .iter()
                        .find(|o| o.sample == *sample)
                        .map(|o| o.count)
                        .filter(|count| *count > 0.0)
                })
                .collect::<Option<Vec<f64>>>()?;
            Some(ReferenceValue::new(
                gene.to_string(),
                reference_mean.average(&counts),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn obs(gene: &str, sample: &str, count: f64) -> Observation {
        Observation::new(gene.to_string(), sample.to_string(), count)
    }

    #[test]
    fn test_complete_case_mean() {
        let observations = vec![
            obs("g1", "A", 10.0),
            obs("g1", "B", 20.0),
            obs("g1", "C", 30.0),
        ];
        let reference = build_reference(&observations, ReferenceMean::Arithmetic);
        assert_eq!(reference.len(), 1);
        assert_eq!(reference[0].gene, "g1");
        assert_relative_eq!(reference[0].average_count, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_count_excludes_gene() {
        let observations = vec![
            obs("g1", "A", 10.0),
            obs("g1", "B", 20.0),
            obs("g2", "A", 0.0),
            obs("g2", "B", 5.0),
        ];
        let reference = build_reference(&observations, ReferenceMean::Arithmetic);
        assert_eq!(reference, vec![ReferenceValue::new("g1".into(), 15.0)]);
    }

    #[test]
    fn test_absent_sample_excludes_gene() {
        let observations = vec![
            obs("g1", "A", 10.0),
            obs("g1", "B", 20.0),
            obs("g2", "A", 7.0),
        ];
        let reference = build_reference(&observations, ReferenceMean::Arithmetic);
        assert_eq!(reference.len(), 1);
        assert_eq!(reference[0].gene, "g1");
    }

    #[test]
    fn test_no_complete_cases() {
        let observations = vec![obs("g1", "A", 0.0), obs("g1", "B", 3.0)];
        assert!(build_reference(&observations, ReferenceMean::Arithmetic).is_empty());
    }

    #[test]
    fn test_geometric_reference() {
        let observations = vec![obs("g1", "A", 2.0), obs("g1", "B", 8.0)];
        let reference = build_reference(&observations, ReferenceMean::Geometric);
        assert_relative_eq!(reference[0].average_count, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gene_order_preserved() {
        let observations = (0..50)
            .flat_map(|i| {
                let gene = format!("g{}", i);
                vec![obs(&gene, "A", 1.0 + i as f64), obs(&gene, "B", 2.0)]
            })
            .collect::<Vec<_>>();
        let reference = build_reference(&observations, ReferenceMean::Arithmetic);
        let genes = reference.iter().map(|r| r.gene.clone()).collect::<Vec<_>>();
        let expected = (0..50).map(|i| format!("g{}", i)).collect::<Vec<_>>();
        assert_eq!(genes, expected);
    }
}
