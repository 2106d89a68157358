//! Color types, packed-pixel containers, and color space conversions.

pub mod bt709;
mod container;
mod convert;
pub(crate) mod point;

pub use container::PointContainer;
pub use convert::{lab2rgb, lab2xyz, rgb2hsl, rgb2lab, rgb2xyz, xyz2lab, xyz2rgb, Hsl, Lab, Xyz};
pub use point::Point;
