//! Image quality metrics.

mod ssim;

pub use ssim::ssim;
