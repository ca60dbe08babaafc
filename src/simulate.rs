//! Synthetic control/knockout count tables.
//!
//! In the knockout a fraction of genes is up-regulated on top of a difference
//! in sequencing depth. Global normalisation attributes the extra counts to
//! depth; the median of ratios does not, as long as fewer than half the genes
//! move.

use bon::Builder;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{error::Result, table::WideTable};

pub const CONTROL: &str = "control";
pub const KNOCKOUT: &str = "knockout";

/// Generator for a two-sample table with skewed, directional differences
#[derive(Builder, Debug, Clone)]
pub struct SkewedDataset {
    #[builder(default = 1000)]
    n_genes: usize,
    /// Knockout sequencing depth relative to the control
    #[builder(default = 2.0)]
    depth_ratio: f64,
    /// Share of genes up-regulated in the knockout
    #[builder(default = 0.3)]
    fraction_up: f64,
    #[builder(default = 4.0)]
    fold_change: f64,
    /// Maximum relative per-count noise
    #[builder(default = 0.05)]
    noise: f64,
    #[builder(default)]
    seed: u64,
}

/// A simulated table and which of its genes were up-regulated
#[derive(Debug, Clone)]
pub struct SimulatedCounts {
    pub table: WideTable,
    pub up_regulated: Vec<bool>,
}

impl SkewedDataset {
    pub fn generate(&self) -> Result<SimulatedCounts> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let fraction_up = self.fraction_up.clamp(0.0, 1.0);
        let noise = self.noise.abs();

        let mut genes = Vec::with_capacity(self.n_genes);
        let mut rows = Vec::with_capacity(self.n_genes);
        let mut up_regulated = Vec::with_capacity(self.n_genes);
        for i in 0..self.n_genes {
            // log-uniform baseline expression between 10 and 1000
            let base = rng.gen_range(10f64.ln()..1000f64.ln()).exp();
            let up = rng.gen_bool(fraction_up);
            let effect = if up { self.fold_change } else { 1.0 };

            let control = base * (1.0 + rng.gen_range(-noise..=noise));
            let knockout =
                base * self.depth_ratio * effect * (1.0 + rng.gen_range(-noise..=noise));

            genes.push(format!("gene_{}", i));
            rows.push(vec![control.round(), knockout.round()]);
            up_regulated.push(up);
        }

        let table = WideTable::new(
            "gene",
            genes,
            vec![CONTROL.to_string(), KNOCKOUT.to_string()],
            rows,
        )?;
        Ok(SimulatedCounts {
            table,
            up_regulated,
        })
    }
}
