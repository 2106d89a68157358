//! Palette-building quantizers.
//!
//! Every quantizer follows the same protocol: construct, feed one or more
//! images through `sample`, then consume it with `quantize` to obtain a
//! stepper yielding [`QuantizeStep`] values. [`PaletteQuantizer`] erases
//! the concrete algorithm behind [`PaletteMode`].

mod histogram;
mod neuquant;
mod neuquant_float;
mod rgbquant;
mod wu;

pub use histogram::{ColorHistogram, HistogramMethod};
pub use neuquant::{NeuQuant, NeuQuantStepper};
pub use neuquant_float::{NeuQuantFloat, NeuQuantFloatStepper};
pub use rgbquant::{RgbQuant, RgbQuantStepper};
pub use wu::{WuQuant, WuQuantStepper};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::PointContainer;
use crate::distance::DistanceCalculator;
use crate::error::Error;
use crate::palette::Palette;
use crate::progress::QuantizeStep;

/// Palette quantization algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteMode {
    /// Self-organizing map, integer arithmetic. Always emits exactly the
    /// requested number of colors.
    Neuquant,
    /// Self-organizing map, floating-point arithmetic.
    NeuquantFloat,
    /// Histogram sampling with threshold pruning. May emit fewer colors
    /// than requested.
    Rgbquant,
    /// Wu variance-minimizing subdivision. May emit fewer colors than
    /// requested.
    Wuquant,
}

impl PaletteMode {
    /// The canonical configuration string for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteMode::Neuquant => "neuquant",
            PaletteMode::NeuquantFloat => "neuquant-float",
            PaletteMode::Rgbquant => "rgbquant",
            PaletteMode::Wuquant => "wuquant",
        }
    }

    /// Every supported mode, in documentation order.
    pub const ALL: [PaletteMode; 4] = [
        PaletteMode::Neuquant,
        PaletteMode::NeuquantFloat,
        PaletteMode::Rgbquant,
        PaletteMode::Wuquant,
    ];
}

impl Default for PaletteMode {
    fn default() -> Self {
        PaletteMode::Wuquant
    }
}

impl fmt::Display for PaletteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaletteMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::UnknownPaletteMode(s.to_string()))
    }
}

/// A palette quantizer of any supported algorithm.
pub enum PaletteQuantizer {
    NeuQuant(NeuQuant),
    NeuQuantFloat(NeuQuantFloat),
    RgbQuant(RgbQuant),
    WuQuant(WuQuant),
}

impl PaletteQuantizer {
    pub fn new(mode: PaletteMode, calculator: DistanceCalculator, colors: usize) -> Self {
        debug!(mode = %mode, colors, "creating palette quantizer");
        match mode {
            PaletteMode::Neuquant => PaletteQuantizer::NeuQuant(NeuQuant::new(calculator, colors)),
            PaletteMode::NeuquantFloat => {
                PaletteQuantizer::NeuQuantFloat(NeuQuantFloat::new(calculator, colors))
            }
            PaletteMode::Rgbquant => PaletteQuantizer::RgbQuant(RgbQuant::new(calculator, colors)),
            PaletteMode::Wuquant => PaletteQuantizer::WuQuant(WuQuant::new(calculator, colors)),
        }
    }

    /// Feeds an image's pixels into the quantizer. May be called several
    /// times; the palette is then built over all sampled images.
    pub fn sample(&mut self, image: &PointContainer) {
        match self {
            PaletteQuantizer::NeuQuant(q) => q.sample(image),
            PaletteQuantizer::NeuQuantFloat(q) => q.sample(image),
            PaletteQuantizer::RgbQuant(q) => q.sample(image),
            PaletteQuantizer::WuQuant(q) => q.sample(image),
        }
    }

    /// Consumes the quantizer and returns the palette-building stepper.
    pub fn quantize(self) -> Result<PaletteStepper, Error> {
        match self {
            PaletteQuantizer::NeuQuant(q) => Ok(PaletteStepper::NeuQuant(q.quantize())),
            PaletteQuantizer::NeuQuantFloat(q) => Ok(PaletteStepper::NeuQuantFloat(q.quantize())),
            PaletteQuantizer::RgbQuant(q) => Ok(PaletteStepper::RgbQuant(q.quantize()?)),
            PaletteQuantizer::WuQuant(q) => Ok(PaletteStepper::WuQuant(q.quantize())),
        }
    }
}

/// Stepper over a running palette quantization.
pub enum PaletteStepper {
    NeuQuant(NeuQuantStepper),
    NeuQuantFloat(NeuQuantFloatStepper),
    RgbQuant(RgbQuantStepper),
    WuQuant(WuQuantStepper),
}

impl Iterator for PaletteStepper {
    type Item = QuantizeStep<Palette>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            PaletteStepper::NeuQuant(s) => s.next(),
            PaletteStepper::NeuQuantFloat(s) => s.next(),
            PaletteStepper::RgbQuant(s) => s.next(),
            PaletteStepper::WuQuant(s) => s.next(),
        }
    }
}
