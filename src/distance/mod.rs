//! Perceptual color distance metrics.
//!
//! All metrics compare two RGBA colors and return a non-negative scalar.
//! The [`DistanceCalculator`] wraps a formula selection together with a
//! *white point*: the reference value per channel that maps to 255. Inputs
//! outside 8-bit range (fixed-point quantizers feed channel values up to
//! `255 << 3`) are rescaled through the white point by the formulas that
//! convert into Lab or otherwise assume 8-bit channels.
//!
//! `normalized` divides the raw distance by the distance between the white
//! point and transparent black, giving values in roughly `0.0..=1.0`.

mod cie94;
mod ciede2000;
mod cmetric;
mod euclidean;
mod manhattan;
mod pngquant;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::bt709;
use crate::color::Point;
use crate::error::Error;

/// Color distance formula selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceFormula {
    /// Unweighted Euclidean distance over RGBA.
    Euclidean,
    /// Euclidean distance with BT.709 luma channel weights.
    EuclideanBt709,
    /// BT.709-weighted Euclidean distance that ignores alpha.
    #[serde(rename = "euclidean-bt709-noalpha")]
    EuclideanBt709NoAlpha,
    /// Unweighted Manhattan distance over RGBA.
    Manhattan,
    /// Manhattan distance with BT.709 luma channel weights.
    ManhattanBt709,
    /// Manhattan distance with Nommyde channel weights.
    ManhattanNommyde,
    /// "Redmean" low-cost approximation to perceptual distance.
    #[serde(rename = "color-metric")]
    CMetric,
    /// Alpha-aware metric blending each channel against black and white,
    /// as used by the pngquant tool.
    Pngquant,
    /// CIE94 delta-E with the textiles parameter set.
    Cie94Textiles,
    /// CIE94 delta-E with the graphic-arts parameter set.
    Cie94GraphicArts,
    /// Full CIEDE2000 delta-E.
    Ciede2000,
}

impl DistanceFormula {
    /// The canonical configuration string for this formula.
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceFormula::Euclidean => "euclidean",
            DistanceFormula::EuclideanBt709 => "euclidean-bt709",
            DistanceFormula::EuclideanBt709NoAlpha => "euclidean-bt709-noalpha",
            DistanceFormula::Manhattan => "manhattan",
            DistanceFormula::ManhattanBt709 => "manhattan-bt709",
            DistanceFormula::ManhattanNommyde => "manhattan-nommyde",
            DistanceFormula::CMetric => "color-metric",
            DistanceFormula::Pngquant => "pngquant",
            DistanceFormula::Cie94Textiles => "cie94-textiles",
            DistanceFormula::Cie94GraphicArts => "cie94-graphic-arts",
            DistanceFormula::Ciede2000 => "ciede2000",
        }
    }

    /// Every supported formula, in documentation order.
    pub const ALL: [DistanceFormula; 11] = [
        DistanceFormula::Euclidean,
        DistanceFormula::EuclideanBt709,
        DistanceFormula::EuclideanBt709NoAlpha,
        DistanceFormula::Manhattan,
        DistanceFormula::ManhattanBt709,
        DistanceFormula::ManhattanNommyde,
        DistanceFormula::CMetric,
        DistanceFormula::Pngquant,
        DistanceFormula::Cie94Textiles,
        DistanceFormula::Cie94GraphicArts,
        DistanceFormula::Ciede2000,
    ];
}

impl Default for DistanceFormula {
    fn default() -> Self {
        DistanceFormula::EuclideanBt709
    }
}

impl fmt::Display for DistanceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceFormula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistanceFormula::ALL
            .into_iter()
            .find(|formula| formula.as_str() == s)
            .ok_or_else(|| Error::UnknownDistanceFormula(s.to_string()))
    }
}

/// Per-channel white point scale factors (`255 / reference`, or zero when
/// the reference channel is zero).
#[derive(Debug, Clone, Copy)]
pub(crate) struct WhitePoint {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// A color distance formula bound to a white point.
#[derive(Debug, Clone)]
pub struct DistanceCalculator {
    formula: DistanceFormula,
    white: WhitePoint,
    max_distance: f64,
}

impl DistanceCalculator {
    /// Creates a calculator for `formula` with the default 8-bit white point
    /// `(255, 255, 255, 255)`.
    pub fn new(formula: DistanceFormula) -> Self {
        let mut calculator = Self {
            formula,
            white: WhitePoint {
                r: 1.0,
                g: 1.0,
                b: 1.0,
                a: 1.0,
            },
            max_distance: 1.0,
        };
        calculator.set_white_point(255.0, 255.0, 255.0, 255.0);
        calculator
    }

    /// Rebinds the white point and recomputes the normalization constant
    /// (the distance between the white point and transparent black).
    pub fn set_white_point(&mut self, r: f64, g: f64, b: f64, a: f64) {
        let scale = |n: f64| if n > 0.0 { 255.0 / n } else { 0.0 };
        self.white = WhitePoint {
            r: scale(r),
            g: scale(g),
            b: scale(b),
            a: scale(a),
        };
        self.max_distance = self.raw(r, g, b, a, 0.0, 0.0, 0.0, 0.0);
    }

    pub fn formula(&self) -> DistanceFormula {
        self.formula
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Raw distance between two colors given as channel values.
    #[allow(clippy::too_many_arguments)]
    pub fn raw(
        &self,
        r1: f64,
        g1: f64,
        b1: f64,
        a1: f64,
        r2: f64,
        g2: f64,
        b2: f64,
        a2: f64,
    ) -> f64 {
        match self.formula {
            DistanceFormula::Euclidean => {
                euclidean::distance(1.0, 1.0, 1.0, 1.0, r1, g1, b1, a1, r2, g2, b2, a2)
            }
            DistanceFormula::EuclideanBt709 => euclidean::distance(
                bt709::RED,
                bt709::GREEN,
                bt709::BLUE,
                1.0,
                r1,
                g1,
                b1,
                a1,
                r2,
                g2,
                b2,
                a2,
            ),
            DistanceFormula::EuclideanBt709NoAlpha => euclidean::distance(
                bt709::RED,
                bt709::GREEN,
                bt709::BLUE,
                0.0,
                r1,
                g1,
                b1,
                a1,
                r2,
                g2,
                b2,
                a2,
            ),
            DistanceFormula::Manhattan => {
                manhattan::distance(1.0, 1.0, 1.0, 1.0, r1, g1, b1, a1, r2, g2, b2, a2)
            }
            DistanceFormula::ManhattanBt709 => manhattan::distance(
                bt709::RED,
                bt709::GREEN,
                bt709::BLUE,
                1.0,
                r1,
                g1,
                b1,
                a1,
                r2,
                g2,
                b2,
                a2,
            ),
            DistanceFormula::ManhattanNommyde => manhattan::distance(
                manhattan::NOMMYDE_RED,
                manhattan::NOMMYDE_GREEN,
                manhattan::NOMMYDE_BLUE,
                1.0,
                r1,
                g1,
                b1,
                a1,
                r2,
                g2,
                b2,
                a2,
            ),
            DistanceFormula::CMetric => {
                cmetric::distance(&self.white, r1, g1, b1, a1, r2, g2, b2, a2)
            }
            DistanceFormula::Pngquant => {
                pngquant::distance(&self.white, r1, g1, b1, a1, r2, g2, b2, a2)
            }
            DistanceFormula::Cie94Textiles => {
                cie94::distance(&cie94::TEXTILES, &self.white, r1, g1, b1, a1, r2, g2, b2, a2)
            }
            DistanceFormula::Cie94GraphicArts => cie94::distance(
                &cie94::GRAPHIC_ARTS,
                &self.white,
                r1,
                g1,
                b1,
                a1,
                r2,
                g2,
                b2,
                a2,
            ),
            DistanceFormula::Ciede2000 => {
                ciede2000::distance(&self.white, r1, g1, b1, a1, r2, g2, b2, a2)
            }
        }
    }

    /// Raw distance between two 8-bit points.
    pub fn raw_points(&self, a: Point, b: Point) -> f64 {
        self.raw(
            a.r as f64, a.g as f64, a.b as f64, a.a as f64, b.r as f64, b.g as f64, b.b as f64,
            b.a as f64,
        )
    }

    /// Distance scaled into `0.0..=1.0` relative to the white point.
    #[allow(clippy::too_many_arguments)]
    pub fn normalized(
        &self,
        r1: f64,
        g1: f64,
        b1: f64,
        a1: f64,
        r2: f64,
        g2: f64,
        b2: f64,
        a2: f64,
    ) -> f64 {
        self.raw(r1, g1, b1, a1, r2, g2, b2, a2) / self.max_distance
    }

    /// Normalized distance between two 8-bit points.
    pub fn normalized_points(&self, a: Point, b: Point) -> f64 {
        self.raw_points(a, b) / self.max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identical_colors_have_zero_distance() {
        let point = Point::from_rgba(12, 200, 97, 255);
        for formula in DistanceFormula::ALL {
            let calculator = DistanceCalculator::new(formula);
            let d = calculator.raw_points(point, point);
            assert!(d.abs() < 1e-9, "{formula} gave {d}");
        }
    }

    #[test]
    fn test_weighted_metrics_are_symmetric() {
        let a = Point::from_rgba(10, 20, 30, 255);
        let b = Point::from_rgba(200, 100, 50, 128);
        for formula in [
            DistanceFormula::Euclidean,
            DistanceFormula::EuclideanBt709,
            DistanceFormula::EuclideanBt709NoAlpha,
            DistanceFormula::Manhattan,
            DistanceFormula::ManhattanBt709,
            DistanceFormula::ManhattanNommyde,
            DistanceFormula::CMetric,
            DistanceFormula::Pngquant,
        ] {
            let calculator = DistanceCalculator::new(formula);
            let forward = calculator.raw_points(a, b);
            let reverse = calculator.raw_points(b, a);
            assert!(
                (forward - reverse).abs() < 1e-9,
                "{formula}: {forward} vs {reverse}"
            );
        }
    }

    #[test]
    fn test_normalized_white_to_black_is_one() {
        for formula in DistanceFormula::ALL {
            let calculator = DistanceCalculator::new(formula);
            let d = calculator.normalized_points(
                Point::from_rgba(255, 255, 255, 255),
                Point::from_rgba(0, 0, 0, 0),
            );
            assert!((d - 1.0).abs() < 1e-9, "{formula} gave {d}");
        }
    }

    #[test]
    fn test_no_alpha_variant_ignores_alpha() {
        let calculator = DistanceCalculator::new(DistanceFormula::EuclideanBt709NoAlpha);
        let opaque = Point::from_rgba(40, 80, 120, 255);
        let transparent = Point::from_rgba(40, 80, 120, 0);
        assert!(calculator.raw_points(opaque, transparent).abs() < 1e-9);
    }

    #[test]
    fn test_formula_parse_round_trip() {
        for formula in DistanceFormula::ALL {
            assert_eq!(formula.as_str().parse::<DistanceFormula>(), Ok(formula));
        }
    }

    #[test]
    fn test_unknown_formula_name_is_rejected() {
        assert_eq!(
            "chebyshev".parse::<DistanceFormula>(),
            Err(Error::UnknownDistanceFormula("chebyshev".into()))
        );
    }

    #[test]
    fn test_formula_serde_uses_canonical_strings() {
        for formula in DistanceFormula::ALL {
            let json = serde_json::to_string(&formula).unwrap();
            assert_eq!(json, format!("\"{}\"", formula.as_str()));
            let parsed: DistanceFormula = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, formula);
        }
    }

    #[test]
    fn test_custom_white_point_rescales_normalization() {
        let mut calculator = DistanceCalculator::new(DistanceFormula::Euclidean);
        calculator.set_white_point(2040.0, 2040.0, 2040.0, 2040.0);
        let d = calculator.normalized(2040.0, 2040.0, 2040.0, 2040.0, 0.0, 0.0, 0.0, 0.0);
        assert!((d - 1.0).abs() < 1e-9);
    }
}
