//! Wide and long representations of a gene × sample count table.

use std::collections::HashMap;

use derive_new::new;
use itertools::Itertools;
use serde::Serialize;

use crate::error::{MedratError, Result};

/// A single (gene, sample, count) cell of the input table
#[derive(new, Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub gene: String,
    pub sample: String,
    pub count: f64,
}

/// A long-form record keyed by (gene, sample) carrying one value column
///
/// Implemented by every long table the pipeline produces so that any of them
/// can be pivoted back to wide form.
pub trait LongRecord {
    fn gene(&self) -> &str;
    fn sample(&self) -> &str;
    fn value(&self) -> f64;
}

impl LongRecord for Observation {
    fn gene(&self) -> &str {
        &self.gene
    }
    fn sample(&self) -> &str {
        &self.sample
    }
    fn value(&self) -> f64 {
        self.count
    }
}

/// One row per gene, one column per sample
///
/// Values are stored row-major (`genes × samples`).
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    id_column: String,
    genes: Vec<String>,
    samples: Vec<String>,
    values: Vec<f64>,
    gene_index: HashMap<String, usize>,
    sample_index: HashMap<String, usize>,
}

impl WideTable {
    /// Creates a table from per-gene rows, validating shape, values and label uniqueness
    pub fn new(
        id_column: impl Into<String>,
        genes: Vec<String>,
        samples: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let id_column = id_column.into();
        if samples.is_empty() {
            return Err(MedratError::MalformedInput(
                "table has no sample columns".to_string(),
            ));
        }
        if rows.len() != genes.len() {
            return Err(MedratError::MalformedInput(format!(
                "{} gene labels but {} rows",
                genes.len(),
                rows.len()
            )));
        }

        let mut sample_index = HashMap::with_capacity(samples.len());
        for (j, sample) in samples.iter().enumerate() {
            if sample == &id_column {
                return Err(MedratError::MalformedInput(format!(
                    "sample column '{}' shadows the identifier column",
                    sample
                )));
            }
            if sample_index.insert(sample.clone(), j).is_some() {
                return Err(MedratError::DuplicateKey {
                    gene: genes.first().cloned().unwrap_or_default(),
                    sample: sample.clone(),
                });
            }
        }
        let mut gene_index = HashMap::with_capacity(genes.len());
        for (i, gene) in genes.iter().enumerate() {
            if gene_index.insert(gene.clone(), i).is_some() {
                return Err(MedratError::DuplicateKey {
                    gene: gene.clone(),
                    sample: samples[0].clone(),
                });
            }
        }

        let mut values = Vec::with_capacity(genes.len() * samples.len());
        for (gene, row) in genes.iter().zip(rows) {
            if row.len() != samples.len() {
                return Err(MedratError::MalformedInput(format!(
                    "row '{}' has {} values, expected {}",
                    gene,
                    row.len(),
                    samples.len()
                )));
            }
            if let Some((j, v)) = row
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(MedratError::MalformedInput(format!(
                    "value {} for gene '{}' in sample '{}' is not a non-negative number",
                    v, gene, samples[j]
                )));
            }
            values.extend(row);
        }

        Ok(Self {
            id_column,
            genes,
            samples,
            values,
            gene_index,
            sample_index,
        })
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn get(&self, gene: usize, sample: usize) -> f64 {
        self.values[gene * self.samples.len() + sample]
    }

    pub fn row(&self, gene: usize) -> &[f64] {
        let n = self.samples.len();
        &self.values[gene * n..(gene + 1) * n]
    }

    pub fn column(&self, sample: usize) -> Vec<f64> {
        (0..self.genes.len()).map(|i| self.get(i, sample)).collect()
    }

    /// Looks up a cell by its labels
    pub fn value(&self, gene: &str, sample: &str) -> Option<f64> {
        let i = self.gene_index.get(gene)?;
        let j = self.sample_index.get(sample)?;
        Some(self.get(*i, *j))
    }

    /// True when both tables hold the same labelled cells, ignoring row and column order
    pub fn same_cells(&self, other: &WideTable) -> bool {
        if self.n_genes() != other.n_genes()
            || self.n_samples() != other.n_samples()
            || self.id_column != other.id_column
        {
            return false;
        }
        self.genes.iter().enumerate().all(|(i, gene)| {
            self.samples
                .iter()
                .enumerate()
                .all(|(j, sample)| other.value(gene, sample) == Some(self.get(i, j)))
        })
    }
}

/// Melts a wide table into one observation per (gene, sample) cell
pub fn to_long(table: &WideTable) -> Vec<Observation> {
    table
        .genes
        .iter()
        .enumerate()
        .flat_map(|(i, gene)| {
            table
                .samples
                .iter()
                .enumerate()
                .map(move |(j, sample)| {
                    Observation::new(gene.clone(), sample.clone(), table.get(i, j))
                })
        })
        .collect()
}

/// Pivots a long table back to wide form
///
/// Genes become rows and samples become columns, both in first-seen order.
/// Each (gene, sample) pair must occur exactly once.
pub fn to_wide<R: LongRecord>(records: &[R], id_column: &str) -> Result<WideTable> {
    let genes = records.iter().map(|r| r.gene()).unique().collect::<Vec<_>>();
    let samples = records.iter().map(|r| r.sample()).unique().collect::<Vec<_>>();

    let mut cells = HashMap::with_capacity(records.len());
    for record in records {
        if cells
            .insert((record.gene(), record.sample()), record.value())
            .is_some()
        {
            return Err(MedratError::DuplicateKey {
                gene: record.gene().to_string(),
                sample: record.sample().to_string(),
            });
        }
    }

    let mut rows = Vec::with_capacity(genes.len());
    for gene in &genes {
        let mut row = Vec::with_capacity(samples.len());
        for sample in &samples {
            match cells.get(&(*gene, *sample)) {
                Some(value) => row.push(*value),
                None => {
                    return Err(MedratError::MalformedInput(format!(
                        "no value for gene '{}' in sample '{}'",
                        gene, sample
                    )))
                }
            }
        }
        rows.push(row);
    }

    WideTable::new(
        id_column,
        genes.into_iter().map(String::from).collect(),
        samples.into_iter().map(String::from).collect(),
        rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_table() -> WideTable {
        WideTable::new(
            "gene",
            vec!["g1".into(), "g2".into(), "g3".into()],
            vec!["A".into(), "B".into()],
            vec![vec![10.0, 20.0], vec![0.0, 5.0], vec![3.5, 1.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_to_long_covers_every_cell() {
        let table = example_table();
        let long = to_long(&table);
        assert_eq!(long.len(), 6);
        assert_eq!(long[0], Observation::new("g1".into(), "A".into(), 10.0));
        assert_eq!(long[3], Observation::new("g2".into(), "B".into(), 5.0));
        assert!(long.iter().all(|o| o.sample != "gene"));
    }

    #[test]
    fn test_round_trip() {
        let table = example_table();
        let wide = to_wide(&to_long(&table), "gene").unwrap();
        assert!(wide.same_cells(&table));
        assert_eq!(wide, table);
    }

    #[test]
    fn test_round_trip_reordered() {
        let table = example_table();
        let mut long = to_long(&table);
        long.reverse();
        let wide = to_wide(&long, "gene").unwrap();
        assert_ne!(wide.genes(), table.genes());
        assert!(wide.same_cells(&table));
    }

    #[test]
    fn test_to_wide_duplicate_key() {
        let long = vec![
            Observation::new("g1".into(), "A".into(), 1.0),
            Observation::new("g1".into(), "A".into(), 2.0),
        ];
        match to_wide(&long, "gene") {
            Err(MedratError::DuplicateKey { gene, sample }) => {
                assert_eq!(gene, "g1");
                assert_eq!(sample, "A");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_to_wide_missing_cell() {
        let long = vec![
            Observation::new("g1".into(), "A".into(), 1.0),
            Observation::new("g1".into(), "B".into(), 2.0),
            Observation::new("g2".into(), "A".into(), 3.0),
        ];
        assert!(matches!(
            to_wide(&long, "gene"),
            Err(MedratError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = WideTable::new(
            "gene",
            vec!["g1".into()],
            vec!["A".into(), "B".into()],
            vec![vec![1.0]],
        );
        assert!(matches!(result, Err(MedratError::MalformedInput(_))));
    }

    #[test]
    fn test_new_rejects_negative_counts() {
        let result = WideTable::new("gene", vec!["g1".into()], vec!["A".into()], vec![vec![-1.0]]);
        assert!(matches!(result, Err(MedratError::MalformedInput(_))));
    }

    #[test]
    fn test_new_rejects_duplicate_genes() {
        let result = WideTable::new(
            "gene",
            vec!["g1".into(), "g1".into()],
            vec!["A".into()],
            vec![vec![1.0], vec![2.0]],
        );
        assert!(matches!(result, Err(MedratError::DuplicateKey { .. })));
    }

    #[test]
    fn test_accessors() {
        let table = example_table();
        assert_eq!(table.n_genes(), 3);
        assert_eq!(table.n_samples(), 2);
        assert_eq!(table.row(2), &[3.5, 1.0]);
        assert_eq!(table.column(1), vec![20.0, 5.0, 1.0]);
        assert_eq!(table.value("g2", "B"), Some(5.0));
        assert_eq!(table.value("g9", "B"), None);
    }

    #[test]
    fn test_value_lookup_on_large_table() {
        let n = 20_000;
        let genes = (0..n).map(|i| format!("g{}", i)).collect::<Vec<_>>();
        let rows = (0..n).map(|i| vec![i as f64, 2.0 * i as f64]).collect();
        let table = WideTable::new("gene", genes, vec!["A".into(), "B".into()], rows).unwrap();

        assert_eq!(table.value("g19999", "B"), Some(39_998.0));
        let mut long = to_long(&table);
        long.reverse();
        assert!(to_wide(&long, "gene").unwrap().same_cells(&table));
    }

    #[test]
    fn test_same_cells_detects_relabelled_gene() {
        let table = example_table();
        let relabelled = WideTable::new(
            "gene",
            vec!["g1".into(), "g2".into(), "g9".into()],
            vec!["A".into(), "B".into()],
            vec![vec![10.0, 20.0], vec![0.0, 5.0], vec![3.5, 1.0]],
        )
        .unwrap();
        assert!(!table.same_cells(&relabelled));
        assert!(!relabelled.same_cells(&table));
    }
}
