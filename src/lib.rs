//! medrat: median-of-ratios size factor normalisation
//!
//! This library normalises multi-sample count tables (genes × samples) by
//! per-sample size factors. Unlike global (total-sum) normalisation, the size
//! factor is the median ratio of a sample's counts to a synthetic reference
//! sample, which keeps it robust when many genes shift in one direction.
//!
//! The main components of this library are:
//! - `MedianRatio`: The normalisation pipeline
//! - `WideTable`: Gene × sample count tables and their long form
//! - `ReferenceMean`: How the per-gene reference is averaged
//! - `MedianRatioResults`: Every intermediate table of a run
//! - `SkewedDataset`: Synthetic control/knockout data

mod config;
mod error;
pub mod io;
mod math;
mod medrat;
pub mod normalise;
pub mod ratio;
pub mod reference;
mod results;
pub mod simulate;
pub mod size_factor;
pub mod table;

pub use config::{Delimiter, ReferenceMean};
pub use error::{MedratError, Result};
pub use medrat::MedianRatio;
pub use normalise::{normalise, normalise_global, NormalisedObservation};
pub use ratio::{compute_ratios, Ratio};
pub use reference::{build_reference, ReferenceValue};
pub use results::MedianRatioResults;
pub use simulate::SkewedDataset;
pub use size_factor::{estimate_size_factors, SizeFactor};
pub use table::{to_long, to_wide, LongRecord, Observation, WideTable};
