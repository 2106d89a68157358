//! Error types for palette and image quantization.

use thiserror::Error;

/// Errors produced by palette construction, remapping, and quality
/// measurement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A color distance formula name did not match any known formula.
    #[error("unknown color distance formula: {0}")]
    UnknownDistanceFormula(String),

    /// A palette quantization algorithm name did not match any known
    /// algorithm.
    #[error("unknown palette quantization algorithm: {0}")]
    UnknownPaletteMode(String),

    /// An image quantization (dithering) algorithm name did not match any
    /// known algorithm.
    #[error("unknown image quantization algorithm: {0}")]
    UnknownDitherMode(String),

    /// Palette construction was asked to run over images that contained no
    /// samples at all.
    #[error("no colors sampled, cannot build a palette")]
    NoColors,

    /// Two images that must share dimensions did not.
    #[error(
        "image dimensions differ: {left_width}x{left_height} vs {right_width}x{right_height}"
    )]
    SizeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
}
