//! Sample standard deviation helpers (divide by n-1).
//!
//! STDDEV(n)[i] = sqrt(sum((X[i-j] - mean)^2 for j in 0..n) / (n-1))
//! Rolling warmup: first (n-1) positions have no value. Periods below 2 never
//! produce a value.

pub(crate) fn rolling_sample_stddev(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period < 2 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                sample_stddev(&values[i + 1 - period..=i])
            }
        })
        .collect()
}

/// Sample standard deviation; `None` for fewer than two values.
pub(crate) fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    Some(variance.sqrt())
}
