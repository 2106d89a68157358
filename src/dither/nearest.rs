//! Plain nearest-color remapping, no error diffusion.

use crate::color::PointContainer;
use crate::distance::DistanceCalculator;
use crate::palette::Palette;
use crate::progress::{ProgressTracker, QuantizeStep};

/// Maps every pixel to its nearest palette color.
pub struct NearestColor {
    calculator: DistanceCalculator,
}

impl NearestColor {
    pub fn new(calculator: DistanceCalculator) -> Self {
        Self { calculator }
    }

    pub fn quantize(self, image: &PointContainer, palette: &Palette) -> NearestColorStepper {
        let height = image.height();
        NearestColorStepper {
            calculator: self.calculator,
            image: image.clone(),
            palette: palette.clone(),
            y: 0,
            tracker: ProgressTracker::new(height, 99),
            checked: false,
            finished: false,
        }
    }
}

/// Stepper remapping the image one row at a time.
pub struct NearestColorStepper {
    calculator: DistanceCalculator,
    image: PointContainer,
    palette: Palette,
    y: usize,
    tracker: ProgressTracker,
    checked: bool,
    finished: bool,
}

impl Iterator for NearestColorStepper {
    type Item = QuantizeStep<PointContainer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let width = self.image.width();
        while self.y < self.image.height() {
            if !self.checked {
                self.checked = true;
                if self.tracker.should_notify(self.y) {
                    return Some(QuantizeStep::Progress(self.tracker.progress()));
                }
            }
            self.checked = false;
            for x in 0..width {
                let idx = self.y * width + x;
                let point = self.image.points()[idx];
                let nearest = self.palette.nearest(&self.calculator, point);
                self.image.points_mut()[idx] = nearest;
            }
            self.y += 1;
        }
        self.finished = true;
        Some(QuantizeStep::Done(std::mem::take(&mut self.image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Point;
    use crate::distance::DistanceFormula;
    use pretty_assertions::assert_eq;

    fn calculator() -> DistanceCalculator {
        DistanceCalculator::new(DistanceFormula::EuclideanBt709)
    }

    fn run(mut stepper: NearestColorStepper) -> PointContainer {
        stepper
            .find_map(QuantizeStep::into_done)
            .expect("stepper must finish with Done")
    }

    #[test]
    fn test_pixels_snap_to_nearest_color() {
        let mut palette = Palette::new();
        palette.add(Point::from_rgba(0, 0, 0, 255));
        palette.add(Point::from_rgba(255, 255, 255, 255));
        let pixels = vec![0xff202020u32, 0xffe0e0e0, 0xff000000, 0xffffffff];
        let image = PointContainer::from_u32_slice(&pixels, 2, 2);
        let quantized = run(NearestColor::new(calculator()).quantize(&image, &palette));
        assert_eq!(
            quantized.to_u32_vec(),
            vec![0xff000000, 0xffffffff, 0xff000000, 0xffffffff]
        );
    }

    #[test]
    fn test_remapping_is_idempotent() {
        let mut palette = Palette::new();
        palette.add(Point::from_rgba(10, 20, 30, 255));
        palette.add(Point::from_rgba(200, 100, 50, 255));
        let pixels = vec![0xff552211u32, 0xff997755, 0xff030201, 0xffc8c8c8];
        let image = PointContainer::from_u32_slice(&pixels, 4, 1);
        let once = run(NearestColor::new(calculator()).quantize(&image, &palette));
        let twice = run(NearestColor::new(calculator()).quantize(&once, &palette));
        assert_eq!(once, twice);
    }
}
