//! Riemersma dithering: error diffusion along a Hilbert curve.
//!
//! Instead of spreading error over a 2-D neighborhood, the image is walked
//! along a space-filling curve and the last few quantization errors are
//! carried in a ring buffer with exponentially decaying weights.

use crate::color::point::clamp_channel_rounded;
use crate::color::{Point, PointContainer};
use crate::distance::DistanceCalculator;
use crate::dither::hilbert::{CurveEvent, HilbertWalker};
use crate::palette::Palette;
use crate::progress::{ProgressTracker, QuantizeStep};

const ERROR_QUEUE_SIZE: usize = 16;
const ERROR_PROPAGATION: f64 = 1.0;

/// Exponentially decaying weights, oldest error first. The newest error
/// always gets the full propagation factor.
fn create_weights(propagation: f64, queue_size: usize) -> Vec<f64> {
    let multiplier = ((queue_size as f64).ln() / (queue_size as f64 - 1.0)).exp();
    let mut weights = Vec::with_capacity(queue_size);
    let mut next = 1.0f64;
    for _ in 0..queue_size {
        weights.push((next + 0.5).trunc() / queue_size as f64 * propagation);
        next *= multiplier;
    }
    weights
}

/// Riemersma image quantizer.
pub struct RiemersmaDither {
    calculator: DistanceCalculator,
    error_queue_size: usize,
    error_propagation: f64,
}

impl RiemersmaDither {
    pub fn new(calculator: DistanceCalculator) -> Self {
        Self {
            calculator,
            error_queue_size: ERROR_QUEUE_SIZE,
            error_propagation: ERROR_PROPAGATION,
        }
    }

    /// Number of past quantization errors carried along the curve.
    pub fn error_queue_size(mut self, size: usize) -> Self {
        self.error_queue_size = size;
        self
    }

    /// Weight applied to the newest carried error; older errors decay
    /// from there.
    pub fn error_propagation(mut self, propagation: f64) -> Self {
        self.error_propagation = propagation;
        self
    }

    pub fn quantize(self, image: &PointContainer, palette: &Palette) -> RiemersmaStepper {
        let width = image.width();
        let height = image.height();
        RiemersmaStepper {
            calculator: self.calculator,
            image: image.clone(),
            palette: palette.clone(),
            walker: HilbertWalker::new(width, height),
            queue: vec![[0.0; 4]; self.error_queue_size],
            head: 0,
            weights: create_weights(self.error_propagation, self.error_queue_size),
            tracker: ProgressTracker::new(width * height, 99),
            finished: false,
        }
    }
}

/// Stepper following the Hilbert curve across the image.
pub struct RiemersmaStepper {
    calculator: DistanceCalculator,
    image: PointContainer,
    palette: Palette,
    walker: HilbertWalker,
    queue: Vec<[f64; 4]>,
    head: usize,
    weights: Vec<f64>,
    tracker: ProgressTracker,
    finished: bool,
}

impl RiemersmaStepper {
    fn process_cell(&mut self, x: usize, y: usize) {
        let idx = y * self.image.width() + x;
        let point = self.image.points()[idx];
        let mut acc = [
            point.r as f64,
            point.g as f64,
            point.b as f64,
            point.a as f64,
        ];
        let len = self.queue.len();
        for i in 0..len {
            let error = self.queue[(i + self.head) % len];
            for channel in 0..4 {
                acc[channel] += error[channel] * self.weights[i];
            }
        }
        let corrected = Point::from_rgba(
            clamp_channel_rounded(acc[0]),
            clamp_channel_rounded(acc[1]),
            clamp_channel_rounded(acc[2]),
            clamp_channel_rounded(acc[3]),
        );
        let quantized = self.palette.nearest(&self.calculator, corrected);
        if len > 0 {
            self.head = (self.head + 1) % len;
            let tail = (self.head + len - 1) % len;
            self.queue[tail] = [
                point.r as f64 - quantized.r as f64,
                point.g as f64 - quantized.g as f64,
                point.b as f64 - quantized.b as f64,
                point.a as f64 - quantized.a as f64,
            ];
        }
        self.image.points_mut()[idx] = quantized;
    }
}

impl Iterator for RiemersmaStepper {
    type Item = QuantizeStep<PointContainer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while let Some(event) = self.walker.next() {
            match event {
                CurveEvent::Enter { index } => {
                    if self.tracker.should_notify(index) {
                        return Some(QuantizeStep::Progress(self.tracker.progress()));
                    }
                }
                CurveEvent::Cell { x, y } => self.process_cell(x, y),
            }
        }
        self.finished = true;
        Some(QuantizeStep::Done(std::mem::take(&mut self.image)))
    }
}
