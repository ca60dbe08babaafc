//! Error types for the medrat library.

use thiserror::Error;

/// Every failure is fatal to a normalisation run.
#[derive(Error, Debug)]
pub enum MedratError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Duplicate entry for gene '{gene}' in sample '{sample}'")]
    DuplicateKey { gene: String, sample: String },

    #[error("No gene has a nonzero count in every sample; cannot build a reference")]
    NoCompleteCases,

    #[error("Sample '{sample}' produced no ratios")]
    EmptySample { sample: String },

    #[error("No size factor for sample '{sample}' (gene '{gene}')")]
    MissingFactor { gene: String, sample: String },
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, MedratError>;
