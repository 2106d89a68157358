use crate::color::bt709;

/// A single RGBA sample with 8 bits per channel.
///
/// The packed form is little-endian RGBA: `(a << 24) | (b << 16) | (g << 8) | r`.
/// It is derived on demand by [`Point::as_u32`], so the channel fields and the
/// packed form cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Point {
    /// Creates a point from individual channel values.
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpacks a point from its `0xAABBGGRR` form.
    pub fn from_u32(packed: u32) -> Self {
        Self {
            r: (packed & 0xff) as u8,
            g: (packed >> 8 & 0xff) as u8,
            b: (packed >> 16 & 0xff) as u8,
            a: (packed >> 24 & 0xff) as u8,
        }
    }

    /// Packs the point into its `0xAABBGGRR` form.
    pub fn as_u32(self) -> u32 {
        (self.a as u32) << 24 | (self.b as u32) << 16 | (self.g as u32) << 8 | self.r as u32
    }

    /// BT.709 luminosity of the point.
    ///
    /// With `use_alpha` the color is first composited against a white
    /// background, so translucent samples read as lighter.
    pub fn luminosity(self, use_alpha: bool) -> f64 {
        let (mut r, mut g, mut b) = (self.r as f64, self.g as f64, self.b as f64);
        if use_alpha {
            let a = self.a as f64;
            r = (255.0 - a + a * r / 255.0).min(255.0);
            g = (255.0 - a + a * g / 255.0).min(255.0);
            b = (255.0 - a + a * b / 255.0).min(255.0);
        }
        r * bt709::RED + g * bt709::GREEN + b * bt709::BLUE
    }
}

/// Round and clamp a channel value into `0..=255`.
pub(crate) fn clamp_channel_rounded(n: f64) -> u8 {
    n.round().clamp(0.0, 255.0) as u8
}

/// Clamp a channel value into `0.0..=255.0` without rounding.
pub(crate) fn clamp_channel(n: f64) -> f64 {
    n.clamp(0.0, 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pack_unpack_round_trip() {
        let point = Point::from_rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(point.as_u32(), 0x78563412);
        assert_eq!(Point::from_u32(0x78563412), point);
    }

    #[test]
    fn test_opaque_white_packs_to_all_ones() {
        assert_eq!(Point::from_rgba(255, 255, 255, 255).as_u32(), u32::MAX);
    }

    #[test]
    fn test_luminosity_of_gray_matches_channel() {
        let gray = Point::from_rgba(128, 128, 128, 255);
        assert!((gray.luminosity(false) - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_luminosity_with_alpha_composites_on_white() {
        let transparent_black = Point::from_rgba(0, 0, 0, 0);
        assert!((transparent_black.luminosity(true) - 255.0).abs() < 1e-9);
        assert!(transparent_black.luminosity(false).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_channel_rounded() {
        assert_eq!(clamp_channel_rounded(-4.0), 0);
        assert_eq!(clamp_channel_rounded(12.5), 13);
        assert_eq!(clamp_channel_rounded(300.0), 255);
    }
}
