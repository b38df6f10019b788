//! Vector and distribution helpers shared by agents and the scorer

use crate::error::{PunchlineError, Result};

/// Dot product accumulated in `f64`.
///
/// For L2-normalized embeddings this is the cosine similarity.
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}

/// Index of the largest value; ties resolve to the first occurrence.
///
/// Returns `None` for an empty slice. NaN entries never win.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some(b) if values[b] >= v => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Turn log-scores into a probability distribution.
///
/// The maximum is subtracted before exponentiating, so the largest entry
/// maps to `exp(0)`; the distribution is unchanged by the shift.
///
/// # Errors
///
/// Fails on empty input, or when the scores are non-finite and the
/// normalizing sum cannot be formed.
pub fn normalize_log_scores(log_scores: &[f64]) -> Result<Vec<f64>> {
    if log_scores.is_empty() {
        return Err(PunchlineError::EmptyInput("scores"));
    }

    let max = log_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(PunchlineError::DegenerateDistribution(format!(
            "maximum log-score is {}",
            max
        )));
    }

    let exps: Vec<f64> = log_scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(PunchlineError::DegenerateDistribution(format!(
            "normalizing sum is {}",
            sum
        )));
    }

    Ok(exps.into_iter().map(|e| e / sum).collect())
}
