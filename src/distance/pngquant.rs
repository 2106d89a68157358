//! Alpha-aware channel distance from the pngquant tool.
//!
//! Each channel difference is evaluated twice: as seen over a black
//! background and over a white background (where the alpha difference
//! shifts the apparent channel value). The result is the sum of both
//! squared differences across the color channels. Unlike the other
//! metrics this one returns a squared quantity, not a length.

use crate::distance::WhitePoint;

fn channel(x: f64, y: f64, alphas: f64) -> f64 {
    let black = x - y;
    let white = black + alphas;
    black * black + white * white
}

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
    let alphas = (a2 - a1) * white.a;
    channel(r1 * white.r, r2 * white.r, alphas)
        + channel(g1 * white.g, g2 * white.g, alphas)
        + channel(b1 * white.b, b2 * white.b, alphas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_white() -> WhitePoint {
        WhitePoint {
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
        }
    }

    #[test]
    fn test_opaque_colors_reduce_to_double_squared_distance() {
        // With equal alpha the white-background term equals the black one.
        let d = distance(
            &identity_white(),
            10.0,
            0.0,
            0.0,
            255.0,
            13.0,
            0.0,
            0.0,
            255.0,
        );
        assert!((d - 2.0 * 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_difference_alone_is_visible() {
        let d = distance(
            &identity_white(),
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            255.0,
        );
        // Three channels, each contributing alphas^2 on the white background.
        assert!((d - 3.0 * 255.0 * 255.0).abs() < 1e-12);
    }
}
