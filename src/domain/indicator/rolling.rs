//! Shared rolling-window statistics and exponential smoothing.
//!
//! Every windowed indicator goes through [`rolling_apply`], so warm-up handling
//! is identical everywhere: position `i` is `None` until `window` observations
//! ending at `i` exist. A window of 0 yields an all-`None` result.
//!
//! Standard deviation is the sample estimate (divides by n-1).

/// Applies `f` to every full trailing window of `values`.
pub fn rolling_apply<F>(values: &[f64], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if window == 0 || i + 1 < window {
            out.push(None);
        } else {
            out.push(f(&values[i + 1 - window..=i]));
        }
    }
    out
}

pub fn mean(window: &[f64]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// Sample standard deviation. Undefined for fewer than two observations.
pub fn sample_std(window: &[f64]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let m = mean(window)?;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / (window.len() - 1) as f64;
    Some(variance.sqrt())
}

pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, mean)
}

pub fn rolling_sample_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, sample_std)
}

/// alpha = 2/(span+1)
pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Recursive smoothing seeded with the first value, no bias adjustment:
/// s[0] = x[0], s[i] = alpha*x[i] + (1-alpha)*s[i-1].
pub fn exponential_smoothing(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}
