//! RGBQuant palette quantizer: histogram sampling plus iterative pruning.
//!
//! Candidate colors come from the tiled population histogram (rare hues
//! protected). Pruning repeatedly removes colors closer than a growing
//! distance threshold to an earlier survivor, until the candidate set
//! fits the requested palette size. If a pass overshoots, the removals
//! with the largest recorded distances are restored.

use crate::color::{Point, PointContainer};
use crate::distance::DistanceCalculator;
use crate::error::Error;
use crate::palette::Palette;
use crate::progress::{ProgressTracker, QuantizeStep};
use crate::quantize::histogram::{ColorHistogram, HistogramMethod};

const INITIAL_DISTANCE: f64 = 0.01;
const DISTANCE_INCREMENT: f64 = 0.005;

/// RGBQuant palette quantizer.
pub struct RgbQuant {
    calculator: DistanceCalculator,
    colors: usize,
    histogram: ColorHistogram,
}

impl RgbQuant {
    pub fn new(calculator: DistanceCalculator, colors: usize) -> Self {
        Self {
            calculator,
            colors,
            histogram: ColorHistogram::new(HistogramMethod::Tiled, colors),
        }
    }

    pub fn sample(&mut self, image: &PointContainer) {
        self.histogram.sample(image);
    }

    /// Fails with [`Error::NoColors`] when nothing has been sampled.
    pub fn quantize(self) -> Result<RgbQuantStepper, Error> {
        let colors = self.histogram.importance_sorted_colors();
        if colors.is_empty() {
            return Err(Error::NoColors);
        }
        Ok(RgbQuantStepper::new(self.calculator, self.colors, colors))
    }
}

/// Stepper driving the RGBQuant pruning passes.
pub struct RgbQuantStepper {
    calculator: DistanceCalculator,
    colors: usize,
    color_array: Vec<Point>,
    usage: Vec<bool>,
    removed: Vec<(usize, f64)>,
    tracker: ProgressTracker,
    palette_len: usize,
    threshold: f64,
    cursor: usize,
    in_pass: bool,
    checked: bool,
    finished: bool,
}

impl RgbQuantStepper {
    fn new(calculator: DistanceCalculator, colors: usize, candidates: Vec<u32>) -> Self {
        let color_array: Vec<Point> = candidates.iter().map(|&c| Point::from_u32(c)).collect();
        let palette_len = color_array.len();
        let usage = vec![true; palette_len];
        Self {
            calculator,
            colors,
            color_array,
            usage,
            removed: Vec::new(),
            tracker: ProgressTracker::new(palette_len.saturating_sub(colors), 99),
            palette_len,
            threshold: INITIAL_DISTANCE,
            cursor: 0,
            in_pass: false,
            checked: false,
            finished: false,
        }
    }

    /// Drops every unused candidate, filling holes from the tail so the
    /// surviving colors stay contiguous.
    fn compact(&mut self) {
        let mut index = self.color_array.len();
        while index > 0 {
            index -= 1;
            if !self.usage[index] {
                self.color_array.swap_remove(index);
            }
        }
    }

    fn build_palette(&mut self) -> Palette {
        if self.palette_len < self.colors {
            // Overshot: restore the removals that were furthest apart.
            self.removed.sort_by(|a, b| b.1.total_cmp(&a.1));
            let mut restore = 0;
            while self.palette_len < self.colors && restore < self.removed.len() {
                self.usage[self.removed[restore].0] = true;
                self.palette_len += 1;
                restore += 1;
            }
        }
        self.compact();

        let mut palette = Palette::new();
        for point in &self.color_array {
            palette.add(*point);
        }
        palette.sort();
        palette
    }
}

impl Iterator for RgbQuantStepper {
    type Item = QuantizeStep<Palette>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let len = self.color_array.len();
        loop {
            if !self.in_pass {
                if self.palette_len <= self.colors {
                    break;
                }
                self.removed.clear();
                self.cursor = 0;
                self.in_pass = true;
            }
            while self.cursor < len {
                if !self.checked {
                    self.checked = true;
                    if self.tracker.should_notify(len - self.palette_len) {
                        return Some(QuantizeStep::Progress(self.tracker.progress()));
                    }
                }
                self.checked = false;
                let i = self.cursor;
                if self.usage[i] {
                    for j in i + 1..len {
                        if !self.usage[j] {
                            continue;
                        }
                        let distance = self
                            .calculator
                            .normalized_points(self.color_array[i], self.color_array[j]);
                        if distance < self.threshold {
                            self.removed.push((j, distance));
                            self.usage[j] = false;
                            self.palette_len -= 1;
                        }
                    }
                }
                self.cursor += 1;
            }
            self.in_pass = false;
            // Coarse threshold steps while far above the target, fine
            // steps once within 3x of it.
            self.threshold += if self.palette_len > self.colors * 3 {
                INITIAL_DISTANCE
            } else {
                DISTANCE_INCREMENT
            };
        }
        self.finished = true;
        Some(QuantizeStep::Done(self.build_palette()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceFormula;
    use pretty_assertions::assert_eq;

    fn calculator() -> DistanceCalculator {
        DistanceCalculator::new(DistanceFormula::EuclideanBt709)
    }

    fn run(quantizer: RgbQuant) -> Palette {
        let mut palette = None;
        for step in quantizer.quantize().expect("sampled colors") {
            match step {
                QuantizeStep::Progress(value) => assert!(value <= 99),
                QuantizeStep::Done(result) => palette = Some(result),
            }
        }
        palette.expect("stepper must finish with Done")
    }

    #[test]
    fn test_empty_sample_is_rejected() {
        let quantizer = RgbQuant::new(calculator(), 16);
        assert!(matches!(quantizer.quantize(), Err(Error::NoColors)));
    }

    #[test]
    fn test_distinct_colors_below_target_all_survive() {
        let pixels = [0xff000000u32, 0xffffffff, 0xff0000ff, 0xffff0000];
        let mut expanded = Vec::new();
        for &p in &pixels {
            expanded.extend(std::iter::repeat(p).take(4));
        }
        let image = PointContainer::from_u32_slice(&expanded, 4, 4);
        let mut quantizer = RgbQuant::new(calculator(), 16);
        quantizer.sample(&image);
        let palette = run(quantizer);
        assert_eq!(palette.len(), 4);
        for &p in &pixels {
            assert!(palette.has(Point::from_u32(p)), "missing {p:#010x}");
        }
    }

    #[test]
    fn test_pruning_reduces_to_requested_size() {
        // A horizontal gradient of 64 distinct colors, pruned down to 8.
        let mut pixels = Vec::new();
        for _ in 0..8 {
            for x in 0..64u32 {
                let value = x * 4;
                pixels.push(0xff000000 | value << 8 | value);
            }
        }
        let image = PointContainer::from_u32_slice(&pixels, 64, 8);
        let mut quantizer = RgbQuant::new(calculator(), 8);
        quantizer.sample(&image);
        let palette = run(quantizer);
        assert!(palette.len() <= 8, "got {} colors", palette.len());
        assert!(!palette.is_empty());
    }
}
