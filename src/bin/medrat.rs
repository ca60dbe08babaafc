//! medrat - median-of-ratios normalisation CLI
//!
//! Reads one count table and writes it normalised by per-sample size factors.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use medrat::{
    io::{read_table, write_long, write_table},
    normalise_global, Delimiter, MedianRatio, ReferenceMean,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDelimiter {
    /// Detect from the header line
    Auto,
    Tab,
    Comma,
    /// Runs of spaces or tabs
    Whitespace,
}

impl From<CliDelimiter> for Delimiter {
    fn from(delimiter: CliDelimiter) -> Self {
        match delimiter {
            CliDelimiter::Auto => Delimiter::Auto,
            CliDelimiter::Tab => Delimiter::Tab,
            CliDelimiter::Comma => Delimiter::Comma,
            CliDelimiter::Whitespace => Delimiter::Whitespace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReferenceMean {
    Arithmetic,
    Geometric,
}

impl From<CliReferenceMean> for ReferenceMean {
    fn from(mean: CliReferenceMean) -> Self {
        match mean {
            CliReferenceMean::Arithmetic => ReferenceMean::Arithmetic,
            CliReferenceMean::Geometric => ReferenceMean::Geometric,
        }
    }
}

/// Median-of-ratios size factor normalisation
#[derive(Parser)]
#[command(name = "medrat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input count table (gene column followed by one column per sample)
    #[arg(short, long)]
    input: PathBuf,

    /// Output path for the normalised table
    #[arg(short, long)]
    output: PathBuf,

    /// Input field separator
    #[arg(short, long, value_enum, default_value = "auto")]
    delimiter: CliDelimiter,

    /// Averaging used for the per-gene reference
    #[arg(short, long, value_enum, default_value = "arithmetic")]
    reference_mean: CliReferenceMean,

    /// Also write the size factors to this path
    #[arg(long)]
    factors: Option<PathBuf>,

    /// Also write the long-form ratio table to this path
    #[arg(long)]
    ratios: Option<PathBuf>,

    /// Use global per-million normalisation instead of size factors
    #[arg(long, conflicts_with_all = ["factors", "ratios"])]
    global: bool,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let cli = Cli::parse();

    let table = read_table(&cli.input, cli.delimiter.into())
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    if cli.global {
        info!("Applying global per-million normalisation");
        let normalised = normalise_global(&table)?;
        let mut buffer = Vec::new();
        write_table(&mut buffer, &normalised, Delimiter::Tab)?;
        return emit(&[(cli.output.as_path(), buffer)]);
    }

    // The whole run completes before anything is written
    let results = MedianRatio::builder()
        .table(&table)
        .reference_mean(cli.reference_mean.into())
        .build()
        .run()
        .with_context(|| format!("failed to normalise {}", cli.input.display()))?;

    let mut outputs = Vec::new();
    let mut buffer = Vec::new();
    write_table(&mut buffer, &results.normalised_table, Delimiter::Tab)?;
    outputs.push((cli.output.as_path(), buffer));
    if let Some(path) = &cli.factors {
        let mut buffer = Vec::new();
        write_long(&mut buffer, &results.size_factors)?;
        outputs.push((path.as_path(), buffer));
    }
    if let Some(path) = &cli.ratios {
        let mut buffer = Vec::new();
        write_long(&mut buffer, &results.ratios)?;
        outputs.push((path.as_path(), buffer));
    }
    emit(&outputs)?;
    results.pprint();

    Ok(())
}

/// Writes every rendered output, or none of them
///
/// All files are created before any is written. On failure the files created
/// so far are removed.
fn emit(outputs: &[(&Path, Vec<u8>)]) -> Result<()> {
    let mut files = Vec::with_capacity(outputs.len());
    for (path, _) in outputs {
        match File::create(path) {
            Ok(file) => files.push(file),
            Err(err) => {
                discard(&outputs[..files.len()]);
                return Err(err).with_context(|| format!("failed to create {}", path.display()));
            }
        }
    }
    for (file, (path, contents)) in files.iter_mut().zip(outputs) {
        if let Err(err) = file.write_all(contents).and_then(|_| file.sync_all()) {
            discard(outputs);
            return Err(err).with_context(|| format!("failed to write {}", path.display()));
        }
        debug!("Wrote {}", path.display());
    }
    Ok(())
}

fn discard(outputs: &[(&Path, Vec<u8>)]) {
    for (path, _) in outputs {
        if let Err(err) = fs::remove_file(path) {
            warn!("failed to remove partial output {}: {}", path.display(), err);
        }
    }
}
