//! palquant: color palette quantization and dithering
//!
//! This library reduces full-color raster images to small fixed palettes and
//! re-renders them with minimal perceived color error. It is aimed at
//! producers of palette-limited formats: indexed PNG/GIF encoders, low-color
//! terminal output, retro hardware renderers.
//!
//! # Quick Start
//!
//! ```
//! use palquant::{build_palette_sync, apply_palette_sync, PointContainer};
//! use palquant::{ApplyOptions, PaletteOptions};
//!
//! let pixels = vec![0xff0000ffu32, 0xff00ff00, 0xffff0000, 0xffffffff];
//! let image = PointContainer::from_u32_slice(&pixels, 2, 2);
//!
//! let options = PaletteOptions { colors: 2, ..PaletteOptions::default() };
//! let palette = build_palette_sync(&[image.clone()], &options).unwrap();
//!
//! let remapped = apply_palette_sync(&image, &palette, &ApplyOptions::default()).unwrap();
//! assert_eq!(remapped.width(), 2);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! PointContainer (RGBA samples)
//!     |
//!     v
//! PaletteQuantizer::sample()        (Wu / NeuQuant / RGBQuant)
//!     |
//!     v  quantize() -> Progress(..) .. Done(Palette)
//! Palette (hue-sorted entries + nearest-color cache)
//!     |
//!     v
//! ImageQuantizer                    (nearest / error diffusion / Riemersma)
//!     |
//!     v  quantize() -> Progress(..) .. Done(PointContainer)
//! PointContainer (palette colors only)
//! ```
//!
//! # Progress Protocol
//!
//! Long-running computations are exposed as forward-only steppers yielding
//! [`QuantizeStep::Progress`] at a bounded rate (at most ~100 notifications
//! regardless of input size) and finally [`QuantizeStep::Done`] with the
//! result. The `*_sync` entry points drive a stepper to completion and
//! discard intermediate notifications. Steppers own all their state; there
//! is no shared mutation and no internal synchronization.
//!
//! # Color Distance
//!
//! Palette matching is pluggable over eleven perceptual metrics, from plain
//! weighted Euclidean/Manhattan up to CIE94 and CIEDE2000 in Lab space. See
//! [`DistanceFormula`] for the full list.

pub mod api;
pub mod color;
pub mod distance;
pub mod dither;
pub mod error;
pub mod palette;
pub mod progress;
pub mod quality;
pub mod quantize;

#[cfg(test)]
mod domain_tests;

pub use api::{
    apply_palette, apply_palette_sync, build_palette, build_palette_sync, ApplyOptions,
    PaletteOptions,
};
pub use color::{Point, PointContainer};
pub use distance::{DistanceCalculator, DistanceFormula};
pub use dither::DitherMode;
pub use error::Error;
pub use palette::Palette;
pub use progress::QuantizeStep;
pub use quantize::PaletteMode;
