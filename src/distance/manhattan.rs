//! Weighted Manhattan distance.

/// Nommyde channel weights, an empirically tuned set for Manhattan
/// distance.
pub(crate) const NOMMYDE_RED: f64 = 0.4984;
pub(crate) const NOMMYDE_GREEN: f64 = 0.8625;
pub(crate) const NOMMYDE_BLUE: f64 = 0.2979;

/// Manhattan distance with per-channel weights.
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
    kr * (r2 - r1).abs() + kg * (g2 - g1).abs() + kb * (b2 - b1).abs() + ka * (a2 - a1).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sums_absolute_channel_differences() {
        let d = distance(
            1.0, 1.0, 1.0, 1.0, 10.0, 20.0, 30.0, 40.0, 5.0, 25.0, 30.0, 38.0,
        );
        assert!((d - (5.0 + 5.0 + 0.0 + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_nommyde_weights_apply() {
        let d = distance(
            NOMMYDE_RED,
            NOMMYDE_GREEN,
            NOMMYDE_BLUE,
            1.0,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
            1.0,
            1.0,
            0.0,
        );
        assert!((d - (NOMMYDE_RED + NOMMYDE_GREEN + NOMMYDE_BLUE)).abs() < 1e-12);
    }
}
