//! Weighted Euclidean distance.

/// Euclidean distance with per-channel weights.
#[allow(clippy::too_many_arguments)]
pub(crate) fn distance(
    kr: f64,
    kg: f64,
    kb: f64,
    ka: f64,
    r1: f64,
    g1: f64,
    b1: f64,
    a1: f64,
    r2: f64,
    g2: f64,
    b2: f64,
    a2: f64,
) -> f64 {
    let dr = r2 - r1;
    let dg = g2 - g1;
    let db = b2 - b1;
    let da = a2 - a1;
    (kr * dr * dr + kg * dg * dg + kb * db * db + ka * da * da).sqrt()
}
