//! Cross-entropy loss over raw logits, plus the softmax and argmax helpers
//! the training and evaluation loops share.

use anyhow::{Result, anyhow};
use matrix::Matrix;

/// Mean cross-entropy between a batch of raw logits and integer class labels.
///
/// Computed per row as `log_sum_exp(logits) - logits[label]`, which is
/// numerically stable and never produces a negative value, then averaged
/// over the batch.
///
/// # Errors
/// Returns an error if the batch is empty, if the number of logit rows does
/// not match the number of labels, or if a label is outside the class range.
pub fn cross_entropy(logits: &Matrix, labels: &[u8]) -> Result<f64> {
    if labels.is_empty() {
        return Err(anyhow!("Cannot compute a loss over an empty batch"));
    }
    if logits.rows() != labels.len() {
        return Err(anyhow!(
            "Logit rows ({}) must match label count ({})",
            logits.rows(),
            labels.len()
        ));
    }
    let classes = logits.cols();
    if let Some(&label) = labels.iter().find(|&&label| label as usize >= classes) {
        return Err(anyhow!(
            "Label {} is out of range for {} classes",
            label,
            classes
        ));
    }

    let mut total = 0.0;
    for (row, &label) in logits.data().chunks_exact(classes).zip(labels) {
        let max = row.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let log_sum_exp = row.iter().map(|&v| (v - max).exp()).sum::<f64>().ln() + max;
        total += log_sum_exp - row[label as usize];
    }
    Ok(total / labels.len() as f64)
}

/// Row-wise softmax of a logit matrix, shifted by the row maximum for
/// numerical stability.
#[must_use]
pub fn softmax(logits: &Matrix) -> Matrix {
    let classes = logits.cols();
    let mut data = Vec::with_capacity(logits.rows() * classes);
    for row in logits.data().chunks_exact(classes) {
        let max = row.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let exps: Vec<f64> = row.iter().map(|&v| (v - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        data.extend(exps.iter().map(|&e| e / sum));
    }
    Matrix::new(logits.rows(), classes, data)
}

/// Predicted class per row: the index of the maximum logit.
#[must_use]
pub fn predictions(logits: &Matrix) -> Vec<usize> {
    logits
        .data()
        .chunks_exact(logits.cols())
        .map(|row| {
            row.iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
                .map(|(idx, _)| idx)
                .unwrap()
        })
        .collect()
}
