use crate::math::{arithmetic_mean, geometric_mean};

/// How the per-gene reference value is averaged across samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceMean {
    #[default]
    Arithmetic,
    Geometric,
}

impl ReferenceMean {
    /// Averages strictly positive counts
    pub fn average(&self, counts: &[f64]) -> f64 {
        match self {
            ReferenceMean::Arithmetic => arithmetic_mean(counts),
            ReferenceMean::Geometric => geometric_mean(counts),
        }
    }
}

/// Field separator of a delimited count table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// Sniffed from the header line
    #[default]
    Auto,
    Tab,
    Comma,
    /// Runs of spaces or tabs
    Whitespace,
}

impl Delimiter {
    /// Resolves `Auto` against a header line: tab, then comma, else whitespace.
    pub fn resolve(&self, header: &str) -> Delimiter {
        match self {
            Delimiter::Auto if header.contains('\t') => Delimiter::Tab,
            Delimiter::Auto if header.contains(',') => Delimiter::Comma,
            Delimiter::Auto => Delimiter::Whitespace,
            other => *other,
        }
    }

    /// Single-byte separator for the `csv` reader and writer
    pub fn byte(&self) -> Option<u8> {
        match self {
            Delimiter::Tab => Some(b'\t'),
            Delimiter::Comma => Some(b','),
            Delimiter::Auto | Delimiter::Whitespace => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_mean_arithmetic() {
        assert_relative_eq!(ReferenceMean::Arithmetic.average(&[10.0, 20.0]), 15.0);
    }

    #[test]
    fn test_reference_mean_geometric() {
        assert_relative_eq!(
            ReferenceMean::Geometric.average(&[2.0, 8.0]),
            4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_delimiter_resolve() {
        assert_eq!(Delimiter::Auto.resolve("gene\tA\tB"), Delimiter::Tab);
        assert_eq!(Delimiter::Auto.resolve("gene,A,B"), Delimiter::Comma);
        assert_eq!(Delimiter::Auto.resolve("gene  A B"), Delimiter::Whitespace);
        assert_eq!(Delimiter::Comma.resolve("gene\tA"), Delimiter::Comma);
    }
}
