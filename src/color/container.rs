use crate::color::Point;

/// A row-major RGBA image buffer.
///
/// Width and height are metadata over a flat `Vec<Point>`; palette output
/// reuses the same type with height 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointContainer {
    width: usize,
    height: usize,
    points: Vec<Point>,
}

impl PointContainer {
    /// Creates an empty container with the given dimensions and a zeroed
    /// pixel buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            points: vec![Point::default(); width * height],
        }
    }

    /// Builds a container from packed `0xAABBGGRR` pixels.
    pub fn from_u32_slice(pixels: &[u32], width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            points: pixels.iter().map(|&p| Point::from_u32(p)).collect(),
        }
    }

    /// Builds a container from interleaved RGBA bytes.
    ///
    /// Trailing bytes that do not form a complete RGBA quadruplet are
    /// ignored.
    pub fn from_u8_slice(bytes: &[u8], width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            points: bytes
                .chunks_exact(4)
                .map(|q| Point::from_rgba(q[0], q[1], q[2], q[3]))
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Updates the dimensions without touching the pixel buffer.
    pub fn set_dimensions(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// The pixels in packed `0xAABBGGRR` form.
    pub fn to_u32_vec(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.as_u32()).collect()
    }

    /// The pixels as interleaved RGBA bytes.
    pub fn to_u8_vec(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.points.len() * 4);
        for p in &self.points {
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_u32_round_trip() {
        let pixels = vec![0xff0000ffu32, 0x80ff00ff, 0x00000000, 0xffffffff];
        let container = PointContainer::from_u32_slice(&pixels, 2, 2);
        assert_eq!(container.width(), 2);
        assert_eq!(container.height(), 2);
        assert_eq!(container.to_u32_vec(), pixels);
    }

    #[test]
    fn test_u8_round_trip() {
        let bytes = vec![1, 2, 3, 4, 250, 251, 252, 253];
        let container = PointContainer::from_u8_slice(&bytes, 2, 1);
        assert_eq!(container.points().len(), 2);
        assert_eq!(container.points()[0], Point::from_rgba(1, 2, 3, 4));
        assert_eq!(container.to_u8_vec(), bytes);
    }

    #[test]
    fn test_byte_and_packed_views_agree() {
        let bytes = vec![0x11, 0x22, 0x33, 0x44];
        let container = PointContainer::from_u8_slice(&bytes, 1, 1);
        assert_eq!(container.to_u32_vec(), vec![0x44332211]);
    }

    #[test]
    fn test_clone_preserves_dimensions() {
        let container = PointContainer::from_u32_slice(&[0, 0, 0], 3, 1);
        let cloned = container.clone();
        assert_eq!(cloned, container);
    }
}
