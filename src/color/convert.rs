//! Color space conversions: sRGB, CIE XYZ, CIE Lab, and HSL.
//!
//! All conversions assume the D65 reference white and 8-bit sRGB input in
//! `0.0..=255.0`.

use crate::color::point::clamp_channel_rounded;

const REF_X: f64 = 0.95047;
const REF_Y: f64 = 1.0;
const REF_Z: f64 = 1.08883;

/// A color in CIE XYZ space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A color in CIE Lab space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// A color in HSL space. Hue is in degrees, saturation and lightness in
/// `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

fn expand_gamma(n: f64) -> f64 {
    if n > 0.04045 {
        ((n + 0.055) / 1.055).powf(2.4)
    } else {
        n / 12.92
    }
}

fn compress_gamma(n: f64) -> f64 {
    if n > 31308e-7 {
        1.055 * n.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * n
    }
}

/// sRGB (0..=255 per channel) to CIE XYZ.
pub fn rgb2xyz(r: f64, g: f64, b: f64) -> Xyz {
    let r = expand_gamma(r / 255.0);
    let g = expand_gamma(g / 255.0);
    let b = expand_gamma(b / 255.0);
    Xyz {
        x: r * 0.4124 + g * 0.3576 + b * 0.1805,
        y: r * 0.2126 + g * 0.7152 + b * 0.0722,
        z: r * 0.0193 + g * 0.1192 + b * 0.9505,
    }
}

/// CIE XYZ to sRGB with rounded, clamped 8-bit channels.
pub fn xyz2rgb(x: f64, y: f64, z: f64) -> (u8, u8, u8) {
    let r = compress_gamma(x * 3.2406 + y * -1.5372 + z * -0.4986);
    let g = compress_gamma(x * -0.9689 + y * 1.8758 + z * 0.0415);
    let b = compress_gamma(x * 0.0557 + y * -0.204 + z * 1.057);
    (
        clamp_channel_rounded(r * 255.0),
        clamp_channel_rounded(g * 255.0),
        clamp_channel_rounded(b * 255.0),
    )
}

/// CIE XYZ to CIE Lab.
///
/// Lightness is clamped at zero; the pivot function's floor keeps
/// `116*y - 16` non-negative for any non-negative XYZ input, so the clamp
/// only absorbs floating-point dust.
pub fn xyz2lab(x: f64, y: f64, z: f64) -> Lab {
    fn pivot(n: f64) -> f64 {
        if n > 8856e-6 {
            n.cbrt()
        } else {
            7.787 * n + 16.0 / 116.0
        }
    }
    let x = pivot(x / REF_X);
    let y = pivot(y / REF_Y);
    let z = pivot(z / REF_Z);
    Lab {
        l: (116.0 * y - 16.0).max(0.0),
        a: 500.0 * (x - y),
        b: 200.0 * (y - z),
    }
}

/// CIE Lab to CIE XYZ.
pub fn lab2xyz(l: f64, a: f64, b: f64) -> Xyz {
    fn pivot(n: f64) -> f64 {
        if n > 0.206893034 {
            n.powi(3)
        } else {
            (n - 16.0 / 116.0) / 7.787
        }
    }
    let y = (l + 16.0) / 116.0;
    let x = a / 500.0 + y;
    let z = y - b / 200.0;
    Xyz {
        x: REF_X * pivot(x),
        y: REF_Y * pivot(y),
        z: REF_Z * pivot(z),
    }
}

/// sRGB (0..=255 per channel) to CIE Lab.
pub fn rgb2lab(r: f64, g: f64, b: f64) -> Lab {
    let xyz = rgb2xyz(r, g, b);
    xyz2lab(xyz.x, xyz.y, xyz.z)
}

/// CIE Lab back to 8-bit sRGB.
pub fn lab2rgb(l: f64, a: f64, b: f64) -> (u8, u8, u8) {
    let xyz = lab2xyz(l, a, b);
    xyz2rgb(xyz.x, xyz.y, xyz.z)
}

/// sRGB (0..=255 per channel) to HSL.
pub fn rgb2hsl(r: f64, g: f64, b: f64) -> Hsl {
    let min = r.min(g).min(b);
    let max = r.max(g).max(b);
    let delta = max - min;
    let l = (min + max) / 510.0;

    let mut s = 0.0;
    if l > 0.0 && l < 1.0 {
        s = delta / if l < 0.5 { max + min } else { 510.0 - max - min };
    }

    let mut h = 0.0;
    if delta > 0.0 {
        if max == r {
            h = (g - b) / delta;
        } else if max == g {
            h = 2.0 + (b - r) / delta;
        } else {
            h = 4.0 + (r - g) / delta;
        }
        h *= 60.0;
        if h < 0.0 {
            h += 360.0;
        }
    }
    Hsl { h, s, l }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_maps_to_reference_white() {
        let xyz = rgb2xyz(255.0, 255.0, 255.0);
        assert!((xyz.x - 0.9505).abs() < 1e-4);
        assert!((xyz.y - 1.0).abs() < 1e-4);
        assert!((xyz.z - 1.089).abs() < 1e-3);
        let lab = xyz2lab(xyz.x, xyz.y, xyz.z);
        assert!((lab.l - 100.0).abs() < 0.1);
        assert!(lab.a.abs() < 0.5);
        assert!(lab.b.abs() < 0.5);
    }

    #[test]
    fn test_black_has_zero_lightness() {
        let lab = rgb2lab(0.0, 0.0, 0.0);
        assert!(lab.l.abs() < 1e-9);
    }

    #[test]
    fn test_lab_round_trip() {
        for &(r, g, b) in &[
            (0.0, 0.0, 0.0),
            (255.0, 255.0, 255.0),
            (255.0, 0.0, 0.0),
            (12.0, 200.0, 97.0),
            (128.0, 128.0, 128.0),
        ] {
            let lab = rgb2lab(r, g, b);
            let (rr, gg, bb) = lab2rgb(lab.l, lab.a, lab.b);
            assert!((rr as f64 - r).abs() <= 1.0, "red {r} -> {rr}");
            assert!((gg as f64 - g).abs() <= 1.0, "green {g} -> {gg}");
            assert!((bb as f64 - b).abs() <= 1.0, "blue {b} -> {bb}");
        }
    }

    #[test]
    fn test_hsl_primaries() {
        let red = rgb2hsl(255.0, 0.0, 0.0);
        assert!((red.h - 0.0).abs() < 1e-9);
        assert!((red.s - 1.0).abs() < 1e-9);
        assert!((red.l - 0.5).abs() < 1e-9);

        let green = rgb2hsl(0.0, 255.0, 0.0);
        assert!((green.h - 120.0).abs() < 1e-9);

        let blue = rgb2hsl(0.0, 0.0, 255.0);
        assert!((blue.h - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_hsl_gray_has_no_hue_or_saturation() {
        let gray = rgb2hsl(64.0, 64.0, 64.0);
        assert!(gray.h.abs() < 1e-9);
        assert!(gray.s.abs() < 1e-9);
    }
}
