//! Kernel-based error diffusion over the image rows.
//!
//! The scan is serpentine by default: row direction alternates, and the
//! kernel's horizontal offsets flip with it. Quantization error is tracked
//! in a sliding window of rows sized by the kernel's reach.

use crate::color::point::clamp_channel_rounded;
use crate::color::{Point, PointContainer};
use crate::distance::DistanceCalculator;
use crate::dither::kernel::Kernel;
use crate::palette::Palette;
use crate::progress::{ProgressTracker, QuantizeStep};

/// Per-channel RGBA error for one pixel.
type ChannelError = [f64; 4];

/// Sliding window of error rows.
///
/// `rows[0]` is the row currently being scanned; `rows[dy]` collects error
/// diffused `dy` rows ahead.
#[derive(Debug)]
struct ErrorBuffer {
    rows: Vec<Vec<ChannelError>>,
    width: usize,
}

impl ErrorBuffer {
    fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 4]; width]).collect(),
            width,
        }
    }

    fn get(&self, x: usize) -> ChannelError {
        self.rows[0][x]
    }

    fn add(&mut self, x: usize, row_offset: usize, error: ChannelError) {
        if x < self.width && row_offset < self.rows.len() {
            for channel in 0..4 {
                self.rows[row_offset][x][channel] += error[channel];
            }
        }
    }

    /// Discards the finished row and brings the next one to the front.
    fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 4]);
        }
    }
}

/// Error diffusion image quantizer.
pub struct ErrorDiffusion {
    calculator: DistanceCalculator,
    kernel: &'static Kernel,
    serpentine: bool,
    minimum_dither_distance: f64,
    error_from_corrected: bool,
}

impl ErrorDiffusion {
    pub fn new(calculator: DistanceCalculator, kernel: &'static Kernel) -> Self {
        Self {
            calculator,
            kernel,
            serpentine: true,
            minimum_dither_distance: 0.0,
            error_from_corrected: false,
        }
    }

    /// Toggles the alternating scan direction. Off means every row is
    /// scanned left to right.
    pub fn serpentine(mut self, serpentine: bool) -> Self {
        self.serpentine = serpentine;
        self
    }

    /// Pixels whose normalized distance to their palette match stays below
    /// this threshold are replaced without diffusing any error. Zero
    /// disables the check.
    pub fn minimum_dither_distance(mut self, distance: f64) -> Self {
        self.minimum_dither_distance = distance;
        self
    }

    /// Computes the diffused error against the error-corrected pixel
    /// instead of the original one (GIMP behavior).
    pub fn error_from_corrected(mut self, enabled: bool) -> Self {
        self.error_from_corrected = enabled;
        self
    }

    pub fn quantize(self, image: &PointContainer, palette: &Palette) -> ErrorDiffusionStepper {
        let width = image.width();
        let height = image.height();
        ErrorDiffusionStepper {
            calculator: self.calculator,
            kernel: self.kernel,
            serpentine: self.serpentine,
            minimum_dither_distance: self.minimum_dither_distance,
            error_from_corrected: self.error_from_corrected,
            image: image.clone(),
            palette: palette.clone(),
            error: ErrorBuffer::new(width, self.kernel.max_dy + 1),
            direction: 1,
            y: 0,
            tracker: ProgressTracker::new(height, 99),
            checked: false,
            finished: false,
        }
    }
}

/// Stepper driving an error diffusion run row by row.
pub struct ErrorDiffusionStepper {
    calculator: DistanceCalculator,
    kernel: &'static Kernel,
    serpentine: bool,
    minimum_dither_distance: f64,
    error_from_corrected: bool,
    image: PointContainer,
    palette: Palette,
    error: ErrorBuffer,
    direction: i32,
    y: usize,
    tracker: ProgressTracker,
    checked: bool,
    finished: bool,
}

impl ErrorDiffusionStepper {
    fn process_row(&mut self, y: usize) {
        let width = self.image.width() as i32;
        let height = self.image.height();
        if self.serpentine {
            self.direction = -self.direction;
        }
        self.error.advance_row();

        let mut x = if self.direction == 1 { 0 } else { width - 1 };
        while x >= 0 && x < width {
            let idx = y * width as usize + x as usize;
            let original = self.image.points()[idx];
            let error = self.error.get(x as usize);
            let corrected = Point::from_rgba(
                clamp_channel_rounded(original.r as f64 + error[0]),
                clamp_channel_rounded(original.g as f64 + error[1]),
                clamp_channel_rounded(original.b as f64 + error[2]),
                clamp_channel_rounded(original.a as f64 + error[3]),
            );
            let chosen = self.palette.nearest(&self.calculator, corrected);
            self.image.points_mut()[idx] = chosen;

            let skip_diffusion = self.minimum_dither_distance > 0.0
                && self.calculator.normalized_points(original, chosen)
                    < self.minimum_dither_distance;
            if !skip_diffusion {
                let base = if self.error_from_corrected {
                    corrected
                } else {
                    original
                };
                let pixel_error = [
                    base.r as f64 - chosen.r as f64,
                    base.g as f64 - chosen.g as f64,
                    base.b as f64 - chosen.b as f64,
                    base.a as f64 - chosen.a as f64,
                ];
                let divisor = self.kernel.divisor as f64;
                for &(dx, dy, weight) in self.kernel.entries {
                    let x1 = x + dx * self.direction;
                    if x1 >= 0 && x1 < width && y + dy < height {
                        let scale = weight as f64 / divisor;
                        self.error.add(
                            x1 as usize,
                            dy,
                            [
                                pixel_error[0] * scale,
                                pixel_error[1] * scale,
                                pixel_error[2] * scale,
                                pixel_error[3] * scale,
                            ],
                        );
                    }
                }
            }
            x += self.direction;
        }
    }
}

impl Iterator for ErrorDiffusionStepper {
    type Item = QuantizeStep<PointContainer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while self.y < self.image.height() {
            if !self.checked {
                self.checked = true;
                if self.tracker.should_notify(self.y) {
                    return Some(QuantizeStep::Progress(self.tracker.progress()));
                }
            }
            self.checked = false;
            self.process_row(self.y);
            self.y += 1;
        }
        self.finished = true;
        Some(QuantizeStep::Done(std::mem::take(&mut self.image)))
    }
}
