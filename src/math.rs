/// Mean with each term scaled before summing, so large finite inputs stay finite
pub fn arithmetic_mean(x: &[f64]) -> f64 {
    let n = x.len() as f64;
    x.iter().map(|v| v / n).sum::<f64>()
}

pub fn geometric_mean(x: &[f64]) -> f64 {
    let sum = x.iter().map(|x| x.ln()).sum::<f64>();
    (sum / x.len() as f64).exp()
}

/// Median of the values, averaging the two central order statistics for even lengths
///
/// Sorts the slice in place. Returns `None` for an empty slice.
pub fn median(x: &mut [f64]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    x.sort_unstable_by(|a, b| a.total_cmp(b));
    let mid = x.len() / 2;
    if x.len() % 2 == 0 {
        Some(x[mid - 1] + (x[mid] - x[mid - 1]) / 2.0)
    } else {
        Some(x[mid])
    }
}
