//! "Redmean" approximate perceptual distance.
//!
//! A cheap metric that weights the red/blue axes by the mean red level,
//! approximating perceptual non-uniformity without a Lab conversion. The
//! integer shifts of the original formulation are kept; both shifted terms
//! are non-negative so the truncation is exact.

use crate::distance::WhitePoint;

#[allow(clippy::too_many_arguments)]
pub(crate) fn distance(
    white: &WhitePoint,
    r1: f64,
    g1: f64,
    b1: f64,
    a1: f64,
    r2: f64,
    g2: f64,
    b2: f64,
    a2: f64,
) -> f64 {
    let rmean = (r1 + r2) / 2.0 * white.r;
    let r = (r1 - r2) * white.r;
    let g = (g1 - g2) * white.g;
    let b = (b1 - b2) * white.b;
    let de = ((((512.0 + rmean) * r * r) as i64 >> 8)
        + (((767.0 - rmean) * b * b) as i64 >> 8)) as f64
        + 4.0 * g * g;
    let da = (a2 - a1) * white.a;
    (de + da * da).sqrt()
}
