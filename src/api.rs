//! High-level entry points: build a palette from images, then remap an
//! image against it.
//!
//! The `*_sync` variants drive the underlying stepper to completion and
//! discard progress notifications. The plain variants take an
//! `on_progress` callback that receives percentages in `0..=100`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::PointContainer;
use crate::distance::{DistanceCalculator, DistanceFormula};
use crate::dither::{DitherMode, ImageQuantizer};
use crate::error::Error;
use crate::palette::Palette;
use crate::progress::QuantizeStep;
use crate::quantize::{PaletteMode, PaletteQuantizer};

/// Options for [`build_palette`] and [`build_palette_sync`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteOptions {
    /// Target palette size.
    #[serde(default = "default_colors")]
    pub colors: usize,

    /// Color distance metric used while clustering.
    #[serde(default)]
    pub distance_formula: DistanceFormula,

    /// Palette quantization algorithm.
    #[serde(default)]
    pub palette_mode: PaletteMode,
}

fn default_colors() -> usize {
    256
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            distance_formula: DistanceFormula::default(),
            palette_mode: PaletteMode::default(),
        }
    }
}

/// Options for [`apply_palette`] and [`apply_palette_sync`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyOptions {
    /// Color distance metric used for palette matching.
    #[serde(default)]
    pub distance_formula: DistanceFormula,

    /// Image quantization algorithm.
    #[serde(default)]
    pub dither_mode: DitherMode,
}

/// Builds a palette over all sampled images, reporting progress.
pub fn build_palette(
    images: &[PointContainer],
    options: &PaletteOptions,
    mut on_progress: impl FnMut(u8),
) -> Result<Palette, Error> {
    debug!(
        images = images.len(),
        colors = options.colors,
        mode = %options.palette_mode,
        "building palette"
    );
    let calculator = DistanceCalculator::new(options.distance_formula);
    let mut quantizer = PaletteQuantizer::new(options.palette_mode, calculator, options.colors);
    for image in images {
        quantizer.sample(image);
    }
    let mut palette = None;
    for step in quantizer.quantize()? {
        match step {
            QuantizeStep::Progress(value) => on_progress(value),
            QuantizeStep::Done(result) => palette = Some(result),
        }
    }
    on_progress(100);
    palette.ok_or(Error::NoColors)
}

/// Builds a palette over all sampled images.
pub fn build_palette_sync(
    images: &[PointContainer],
    options: &PaletteOptions,
) -> Result<Palette, Error> {
    build_palette(images, options, |_| {})
}

/// Remaps an image to the colors of `palette`, reporting progress.
pub fn apply_palette(
    image: &PointContainer,
    palette: &Palette,
    options: &ApplyOptions,
    mut on_progress: impl FnMut(u8),
) -> Result<PointContainer, Error> {
    debug!(
        width = image.width(),
        height = image.height(),
        colors = palette.len(),
        mode = %options.dither_mode,
        "applying palette"
    );
    let calculator = DistanceCalculator::new(options.distance_formula);
    let quantizer = ImageQuantizer::new(options.dither_mode, calculator);
    let mut quantized = None;
    for step in quantizer.quantize(image, palette) {
        match step {
            QuantizeStep::Progress(value) => on_progress(value),
            QuantizeStep::Done(result) => quantized = Some(result),
        }
    }
    on_progress(100);
    quantized.ok_or(Error::NoColors)
}

/// Remaps an image to the colors of `palette`.
pub fn apply_palette_sync(
    image: &PointContainer,
    palette: &Palette,
    options: &ApplyOptions,
) -> Result<PointContainer, Error> {
    apply_palette(image, palette, options, |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Point;
    use pretty_assertions::assert_eq;

    fn two_color_image() -> PointContainer {
        let mut pixels = vec![0xff000000u32; 8];
        pixels.extend(vec![0xffffffffu32; 8]);
        PointContainer::from_u32_slice(&pixels, 4, 4)
    }

    #[test]
    fn test_build_palette_finds_image_colors() {
        let image = two_color_image();
        let options = PaletteOptions {
            colors: 2,
            ..PaletteOptions::default()
        };
        let palette = build_palette_sync(&[image], &options).unwrap();
        assert_eq!(palette.len(), 2);
        assert!(palette.has(Point::from_rgba(0, 0, 0, 255)));
        assert!(palette.has(Point::from_rgba(255, 255, 255, 255)));
    }

    #[test]
    fn test_apply_palette_round_trips_exact_colors() {
        let image = two_color_image();
        let options = PaletteOptions {
            colors: 2,
            ..PaletteOptions::default()
        };
        let palette = build_palette_sync(&[image.clone()], &options).unwrap();
        let remapped = apply_palette_sync(&image, &palette, &ApplyOptions::default()).unwrap();
        assert_eq!(remapped, image);
    }

    #[test]
    fn test_progress_reaches_one_hundred() {
        let image = two_color_image();
        let options = PaletteOptions {
            colors: 2,
            ..PaletteOptions::default()
        };
        let mut reports = Vec::new();
        let palette = build_palette(&[image.clone()], &options, |p| reports.push(p)).unwrap();
        assert_eq!(reports.last(), Some(&100));
        assert!(reports.iter().all(|&p| p <= 100));

        reports.clear();
        apply_palette(&image, &palette, &ApplyOptions::default(), |p| {
            reports.push(p)
        })
        .unwrap();
        assert_eq!(reports.last(), Some(&100));
    }

    #[test]
    fn test_rgbquant_without_samples_fails() {
        let options = PaletteOptions {
            colors: 4,
            palette_mode: PaletteMode::Rgbquant,
            ..PaletteOptions::default()
        };
        assert!(matches!(
            build_palette_sync(&[], &options),
            Err(Error::NoColors)
        ));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: PaletteOptions = serde_json::from_str(r#"{"colors": 16}"#).unwrap();
        assert_eq!(options.colors, 16);
        assert_eq!(options.distance_formula, DistanceFormula::EuclideanBt709);
        assert_eq!(options.palette_mode, PaletteMode::Wuquant);

        let options: ApplyOptions =
            serde_json::from_str(r#"{"dither_mode": "atkinson"}"#).unwrap();
        assert_eq!(options.dither_mode, DitherMode::Atkinson);
        assert_eq!(options.distance_formula, DistanceFormula::EuclideanBt709);
    }
}
