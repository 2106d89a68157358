//! Image quantizers: remap an image to a fixed palette, with or without
//! dithering.
//!
//! Three families are available behind [`DitherMode`]: plain nearest-color
//! remapping, kernel-based error diffusion (nine kernels), and Riemersma
//! dithering along a Hilbert curve.

mod diffusion;
mod hilbert;
mod kernel;
mod nearest;
mod riemersma;

pub use diffusion::{ErrorDiffusion, ErrorDiffusionStepper};
pub use kernel::*;
pub use nearest::{NearestColor, NearestColorStepper};
pub use riemersma::{RiemersmaDither, RiemersmaStepper};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::PointContainer;
use crate::distance::DistanceCalculator;
use crate::error::Error;
use crate::palette::Palette;
use crate::progress::QuantizeStep;

/// Image quantization algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMode {
    /// Nearest palette color, no dithering.
    Nearest,
    /// Error diffusion along a Hilbert curve.
    Riemersma,
    FloydSteinberg,
    FalseFloydSteinberg,
    Stucki,
    Atkinson,
    Jarvis,
    Burkes,
    Sierra,
    TwoSierra,
    SierraLite,
}

impl DitherMode {
    /// The canonical configuration string for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            DitherMode::Nearest => "nearest",
            DitherMode::Riemersma => "riemersma",
            DitherMode::FloydSteinberg => "floyd-steinberg",
            DitherMode::FalseFloydSteinberg => "false-floyd-steinberg",
            DitherMode::Stucki => "stucki",
            DitherMode::Atkinson => "atkinson",
            DitherMode::Jarvis => "jarvis",
            DitherMode::Burkes => "burkes",
            DitherMode::Sierra => "sierra",
            DitherMode::TwoSierra => "two-sierra",
            DitherMode::SierraLite => "sierra-lite",
        }
    }

    /// Every supported mode, in documentation order.
    pub const ALL: [DitherMode; 11] = [
        DitherMode::Nearest,
        DitherMode::Riemersma,
        DitherMode::FloydSteinberg,
        DitherMode::FalseFloydSteinberg,
        DitherMode::Stucki,
        DitherMode::Atkinson,
        DitherMode::Jarvis,
        DitherMode::Burkes,
        DitherMode::Sierra,
        DitherMode::TwoSierra,
        DitherMode::SierraLite,
    ];

    /// The diffusion kernel for this mode, if it is a kernel mode.
    fn kernel(self) -> Option<&'static Kernel> {
        match self {
            DitherMode::Nearest | DitherMode::Riemersma => None,
            DitherMode::FloydSteinberg => Some(&FLOYD_STEINBERG),
            DitherMode::FalseFloydSteinberg => Some(&FALSE_FLOYD_STEINBERG),
            DitherMode::Stucki => Some(&STUCKI),
            DitherMode::Atkinson => Some(&ATKINSON),
            DitherMode::Jarvis => Some(&JARVIS),
            DitherMode::Burkes => Some(&BURKES),
            DitherMode::Sierra => Some(&SIERRA),
            DitherMode::TwoSierra => Some(&TWO_SIERRA),
            DitherMode::SierraLite => Some(&SIERRA_LITE),
        }
    }
}

impl Default for DitherMode {
    fn default() -> Self {
        DitherMode::FloydSteinberg
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DitherMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DitherMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::UnknownDitherMode(s.to_string()))
    }
}

/// An image quantizer of any supported algorithm.
pub enum ImageQuantizer {
    Nearest(NearestColor),
    Diffusion(ErrorDiffusion),
    Riemersma(RiemersmaDither),
}

impl ImageQuantizer {
    pub fn new(mode: DitherMode, calculator: DistanceCalculator) -> Self {
        debug!(mode = %mode, "creating image quantizer");
        match mode.kernel() {
            Some(kernel) => ImageQuantizer::Diffusion(ErrorDiffusion::new(calculator, kernel)),
            None => match mode {
                DitherMode::Riemersma => ImageQuantizer::Riemersma(RiemersmaDither::new(calculator)),
                _ => ImageQuantizer::Nearest(NearestColor::new(calculator)),
            },
        }
    }

    /// Consumes the quantizer and returns a stepper remapping `image` to
    /// the colors of `palette`.
    pub fn quantize(self, image: &PointContainer, palette: &Palette) -> ImageStepper {
        match self {
            ImageQuantizer::Nearest(q) => ImageStepper::Nearest(q.quantize(image, palette)),
            ImageQuantizer::Diffusion(q) => ImageStepper::Diffusion(q.quantize(image, palette)),
            ImageQuantizer::Riemersma(q) => ImageStepper::Riemersma(q.quantize(image, palette)),
        }
    }
}

/// Stepper over a running image quantization.
pub enum ImageStepper {
    Nearest(NearestColorStepper),
    Diffusion(ErrorDiffusionStepper),
    Riemersma(RiemersmaStepper),
}

impl Iterator for ImageStepper {
    type Item = QuantizeStep<PointContainer>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ImageStepper::Nearest(s) => s.next(),
            ImageStepper::Diffusion(s) => s.next(),
            ImageStepper::Riemersma(s) => s.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Point;
    use crate::distance::DistanceFormula;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mode_parse_round_trip() {
        for mode in DitherMode::ALL {
            assert_eq!(mode.as_str().parse::<DitherMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_unknown_mode_name_is_rejected() {
        assert_eq!(
            "bayer".parse::<DitherMode>(),
            Err(Error::UnknownDitherMode("bayer".into()))
        );
    }

    #[test]
    fn test_mode_serde_uses_canonical_strings() {
        for mode in DitherMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
            let parsed: DitherMode = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn test_every_mode_remaps_to_palette_colors() {
        let mut palette = Palette::new();
        palette.add(Point::from_rgba(0, 0, 0, 255));
        palette.add(Point::from_rgba(255, 255, 255, 255));
        let pixels: Vec<u32> = (0..64).map(|i| 0xff000000u32 | i * 4 << 8 | i * 4).collect();
        let image = PointContainer::from_u32_slice(&pixels, 8, 8);
        for mode in DitherMode::ALL {
            let calculator = DistanceCalculator::new(DistanceFormula::EuclideanBt709);
            let quantized = ImageQuantizer::new(mode, calculator)
                .quantize(&image, &palette)
                .find_map(QuantizeStep::into_done)
                .expect("stepper must finish with Done");
            assert_eq!(quantized.points().len(), 64, "{mode}");
            for point in quantized.points() {
                assert!(point.r == 0 || point.r == 255, "{mode}: {point:?}");
            }
        }
    }
}
