/// Numerically stable log-softmax. The max-shift keeps `exp` away from
/// overflow; masked entries (large negative logits) come out as large
/// negative log-probabilities instead of NaN.
///
/// Every returned value is <= 0, which is what keeps cumulative beam scores
/// bounded, descending, and comparable across beams. Raw logits must never
/// be accumulated directly.
pub fn log_softmax(logits: &[f32]) -> Vec<f32> {
    let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    debug_assert!(max_logit.is_finite(), "log_softmax over fully masked logits");

    let sum_exp: f32 = logits.iter().map(|&l| (l - max_logit).exp()).sum();
    let log_sum_exp = max_logit + sum_exp.ln();

    logits.iter().map(|&l| l - log_sum_exp).collect()
}

/// Indices of the `k` largest values, descending. Non-finite entries are
/// never selected.
pub fn top_k(values: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len())
        .filter(|&i| values[i].is_finite())
        .collect();
    indices.sort_unstable_by(|&a, &b| values[b].total_cmp(&values[a]));
    indices.truncate(k);
    indices
}
