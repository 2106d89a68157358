//! ITU-R BT.709 luma coefficients.
//!
//! Used for perceptually weighted color distances and for luminosity
//! computations in palette ordering and SSIM.

/// Red channel contribution to luma.
pub const RED: f64 = 0.2126;
/// Green channel contribution to luma.
pub const GREEN: f64 = 0.7152;
/// Blue channel contribution to luma.
pub const BLUE: f64 = 0.0722;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        assert!((RED + GREEN + BLUE - 1.0).abs() < 1e-12);
    }
}
