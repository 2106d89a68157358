//! End-to-end tests across the public API: palette building, image
//! remapping, and quality measurement working together.

use crate::api::{apply_palette_sync, build_palette_sync, ApplyOptions, PaletteOptions};
use crate::color::{Point, PointContainer};
use crate::dither::DitherMode;
use crate::quality::ssim;
use crate::quantize::PaletteMode;

/// Installs a log subscriber so `RUST_LOG=palquant=debug cargo test`
/// shows the quantizer trace. Safe to call from every test.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Horizontal 16-step gray gradient, 16x16.
fn gradient_image() -> PointContainer {
    let mut pixels = Vec::with_capacity(256);
    for _ in 0..16 {
        for x in 0..16u32 {
            let v = x * 16;
            pixels.push(0xff000000 | v << 16 | v << 8 | v);
        }
    }
    PointContainer::from_u32_slice(&pixels, 16, 16)
}

#[test]
fn test_every_mode_combination_stays_within_palette() {
    init_tracing();
    let image = gradient_image();
    for palette_mode in PaletteMode::ALL {
        let palette = build_palette_sync(
            &[image.clone()],
            &PaletteOptions {
                colors: 4,
                palette_mode,
                ..PaletteOptions::default()
            },
        )
        .unwrap();
        assert!(!palette.is_empty(), "{palette_mode}");
        for dither_mode in [
            DitherMode::Nearest,
            DitherMode::FloydSteinberg,
            DitherMode::Riemersma,
        ] {
            let remapped = apply_palette_sync(
                &image,
                &palette,
                &ApplyOptions {
                    dither_mode,
                    ..ApplyOptions::default()
                },
            )
            .unwrap();
            assert_eq!(remapped.width(), 16);
            assert_eq!(remapped.height(), 16);
            for point in remapped.points() {
                assert!(
                    palette.has(*point),
                    "{palette_mode}/{dither_mode}: {point:?} not in palette"
                );
            }
        }
    }
}

#[test]
fn test_larger_palette_improves_ssim() {
    init_tracing();
    let image = gradient_image();
    let mut scores = Vec::new();
    for colors in [2, 16] {
        let palette = build_palette_sync(
            &[image.clone()],
            &PaletteOptions {
                colors,
                ..PaletteOptions::default()
            },
        )
        .unwrap();
        let remapped = apply_palette_sync(
            &image,
            &palette,
            &ApplyOptions {
                dither_mode: DitherMode::Nearest,
                ..ApplyOptions::default()
            },
        )
        .unwrap();
        scores.push(ssim(&image, &remapped).unwrap());
    }
    assert!(
        scores[1] > scores[0],
        "16 colors ({}) should beat 2 colors ({})",
        scores[1],
        scores[0]
    );
}

#[test]
fn test_image_of_palette_colors_is_unchanged() {
    init_tracing();
    let mut pixels = vec![0xff0000ffu32; 4];
    pixels.extend(vec![0xffff0000u32; 4]);
    pixels.extend(vec![0xff00ff00u32; 4]);
    pixels.extend(vec![0xffffffffu32; 4]);
    let image = PointContainer::from_u32_slice(&pixels, 4, 4);
    let palette = build_palette_sync(
        &[image.clone()],
        &PaletteOptions {
            colors: 4,
            ..PaletteOptions::default()
        },
    )
    .unwrap();
    for dither_mode in [DitherMode::Nearest, DitherMode::FloydSteinberg] {
        let remapped = apply_palette_sync(
            &image,
            &palette,
            &ApplyOptions {
                dither_mode,
                ..ApplyOptions::default()
            },
        )
        .unwrap();
        assert_eq!(remapped, image, "{dither_mode}");
    }
}

#[test]
fn test_palette_spans_multiple_sampled_images() {
    init_tracing();
    let red = PointContainer::from_u32_slice(&vec![0xff0000ffu32; 16], 4, 4);
    let blue = PointContainer::from_u32_slice(&vec![0xffff0000u32; 16], 4, 4);
    let palette = build_palette_sync(
        &[red, blue],
        &PaletteOptions {
            colors: 2,
            ..PaletteOptions::default()
        },
    )
    .unwrap();
    assert_eq!(palette.len(), 2);
    assert!(palette.has(Point::from_rgba(255, 0, 0, 255)));
    assert!(palette.has(Point::from_rgba(0, 0, 255, 255)));
}
