//! Structural similarity (SSIM) between two images.

use crate::color::{bt709, PointContainer};
use crate::error::Error;

const K1: f64 = 0.01;
const K2: f64 = 0.03;
const WINDOW_SIZE: usize = 8;

/// Mean SSIM over 8x8 windows of BT.709 luma.
///
/// Returns 1.0 for identical images and decays toward 0.0 as the images
/// diverge. Fails with [`Error::SizeMismatch`] when the dimensions differ.
pub fn ssim(left: &PointContainer, right: &PointContainer) -> Result<f64, Error> {
    if left.width() != right.width() || left.height() != right.height() {
        return Err(Error::SizeMismatch {
            left_width: left.width(),
            left_height: left.height(),
            right_width: right.width(),
            right_height: right.height(),
        });
    }

    let bits_per_component = 8;
    let dynamic_range = ((1u32 << bits_per_component) - 1) as f64;
    let c1 = (K1 * dynamic_range).powi(2);
    let c2 = (K2 * dynamic_range).powi(2);

    let width = left.width();
    let height = left.height();
    let mut window_count = 0usize;
    let mut total = 0.0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let window_width = WINDOW_SIZE.min(width - x);
            let window_height = WINDOW_SIZE.min(height - y);
            let luma_left = window_luma(left, x, y, window_width, window_height);
            let luma_right = window_luma(right, x, y, window_width, window_height);
            let mean_left = mean(&luma_left);
            let mean_right = mean(&luma_right);

            let mut covariance = 0.0;
            let mut variance_left = 0.0;
            let mut variance_right = 0.0;
            for i in 0..luma_left.len() {
                let dl = luma_left[i] - mean_left;
                let dr = luma_right[i] - mean_right;
                variance_left += dl * dl;
                variance_right += dr * dr;
                covariance += dl * dr;
            }
            // Sample (n - 1) divisor.
            let samples = (luma_left.len() - 1) as f64;
            variance_left /= samples;
            variance_right /= samples;
            covariance /= samples;

            let numerator = (2.0 * mean_left * mean_right + c1) * (2.0 * covariance + c2);
            let denominator = (mean_left * mean_left + mean_right * mean_right + c1)
                * (variance_left + variance_right + c2);
            total += numerator / denominator;
            window_count += 1;

            x += WINDOW_SIZE;
        }
        y += WINDOW_SIZE;
    }

    Ok(total / window_count as f64)
}

fn window_luma(
    image: &PointContainer,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Vec<f64> {
    let points = image.points();
    let mut luma = Vec::with_capacity(width * height);
    for j in y..y + height {
        let offset = j * image.width();
        for i in x..x + width {
            let point = points[offset + i];
            luma.push(
                point.r as f64 * bt709::RED
                    + point.g as f64 * bt709::GREEN
                    + point.b as f64 * bt709::BLUE,
            );
        }
    }
    luma
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
