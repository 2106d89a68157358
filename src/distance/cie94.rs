//! CIE94 delta-E in Lab space.

use crate::color::point::clamp_channel;
use crate::color::{rgb2lab, Lab};
use crate::distance::WhitePoint;

/// Application-specific CIE94 weighting parameters.
pub(crate) struct Cie94Params {
    pub kl: f64,
    pub k1: f64,
    pub k2: f64,
    /// Weight applied to the alpha difference before it is added in
    /// quadrature.
    pub ka: f64,
}

pub(crate) const TEXTILES: Cie94Params = Cie94Params {
    kl: 2.0,
    k1: 0.048,
    k2: 0.014,
    ka: 0.25 * 50.0 / 255.0,
};

pub(crate) const GRAPHIC_ARTS: Cie94Params = Cie94Params {
    kl: 1.0,
    k1: 0.045,
    k2: 0.015,
    ka: 0.25 * 100.0 / 255.0,
};

/// Squared CIE94 difference between two Lab colors. The chroma scaling
/// is derived from the first color, so the metric is asymmetric.
pub(crate) fn delta_e_squared_lab(params: &Cie94Params, lab1: Lab, lab2: Lab) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;

    let c1 = (lab1.a * lab1.a + lab1.b * lab1.b).sqrt();
    let c2 = (lab2.a * lab2.a + lab2.b * lab2.b).sqrt();
    let dc = c1 - c2;

    // Hue difference recovered from the chroma decomposition; tiny negative
    // values from rounding are treated as zero.
    let dh2 = da * da + db * db - dc * dc;
    let dh = if dh2 < 0.0 { 0.0 } else { dh2.sqrt() };

    (dl / params.kl).powi(2)
        + (dc / (1.0 + params.k1 * c1)).powi(2)
        + (dh / (1.0 + params.k2 * c1)).powi(2)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn distance(
    params: &Cie94Params,
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
    let lab1 = rgb2lab(
        clamp_channel(r1 * white.r),
        clamp_channel(g1 * white.g),
        clamp_channel(b1 * white.b),
    );
    let lab2 = rgb2lab(
        clamp_channel(r2 * white.r),
        clamp_channel(g2 * white.g),
        clamp_channel(b2 * white.b),
    );
    let dalpha = (a2 - a1) * white.a * params.ka;
    (delta_e_squared_lab(params, lab1, lab2) + dalpha.powi(2)).sqrt()
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
    fn test_zero_for_identical_colors() {
        for params in [&TEXTILES, &GRAPHIC_ARTS] {
            let d = distance(
                params,
                &identity_white(),
                120.0,
                64.0,
                200.0,
                255.0,
                120.0,
                64.0,
                200.0,
                255.0,
            );
            assert!(d.abs() < 1e-9);
        }
    }

    // Published graphic-arts delta-E94 values for Lab pairs from the
    // Sharma, Wu and Dalal test set ("The CIEDE2000 color-difference
    // formula: Implementation notes, supplementary test data, and
    // mathematical observations").
    #[test]
    fn test_graphic_arts_reference_pairs() {
        let cases = [
            (
                Lab {
                    l: 50.0,
                    a: 2.6772,
                    b: -79.7751,
                },
                Lab {
                    l: 50.0,
                    a: 0.0,
                    b: -82.7485,
                },
                1.3950,
            ),
            (
                Lab {
                    l: 50.0,
                    a: 3.1571,
                    b: -77.2803,
                },
                Lab {
                    l: 50.0,
                    a: 0.0,
                    b: -82.7485,
                },
                1.9341,
            ),
            (
                Lab {
                    l: 50.0,
                    a: 2.5,
                    b: 0.0,
                },
                Lab {
                    l: 50.0,
                    a: 0.0,
                    b: -2.5,
                },
                3.4077,
            ),
        ];
        for (lab1, lab2, expected) in cases {
            let de = delta_e_squared_lab(&GRAPHIC_ARTS, lab1, lab2).sqrt();
            assert!(
                (de - expected).abs() < 1e-4,
                "expected {expected}, got {de}"
            );
        }
    }

    #[test]
    fn test_textiles_reference_values() {
        // Same chroma/hue pair as above under the textiles constants.
        let de = delta_e_squared_lab(
            &TEXTILES,
            Lab {
                l: 50.0,
                a: 2.5,
                b: 0.0,
            },
            Lab {
                l: 50.0,
                a: 0.0,
                b: -2.5,
            },
        )
        .sqrt();
        assert!((de - 3.4160).abs() < 1e-4, "got {de}");

        // A pure lightness step of 10 halves under Kl = 2.
        let de = delta_e_squared_lab(
            &TEXTILES,
            Lab {
                l: 50.0,
                a: 0.0,
                b: 0.0,
            },
            Lab {
                l: 60.0,
                a: 0.0,
                b: 0.0,
            },
        )
        .sqrt();
        assert!((de - 5.0).abs() < 1e-9, "got {de}");
    }

    #[test]
    fn test_textiles_downweights_lightness() {
        let white = identity_white();
        // A pure lightness change counts half as much under the textiles
        // parameter set (Kl = 2 vs 1).
        let textiles = distance(
            &TEXTILES,
            &white,
            40.0,
            40.0,
            40.0,
            255.0,
            90.0,
            90.0,
            90.0,
            255.0,
        );
        let graphic = distance(
            &GRAPHIC_ARTS,
            &white,
            40.0,
            40.0,
            40.0,
            255.0,
            90.0,
            90.0,
            90.0,
            255.0,
        );
        assert!((graphic - 2.0 * textiles).abs() < 1e-6);
    }
}
