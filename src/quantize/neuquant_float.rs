//! NeuQuant palette quantizer, floating-point variant.
//!
//! Same self-organizing map as the integer variant, but neuron channels
//! and the learning rates stay in floating point, so small corrections
//! are not lost to truncation. Slightly slower, slightly smoother
//! palettes on low-contrast images. The bias/frequency ledger still
//! truncates to integers before shifting, matching the integer variant's
//! selection behavior.

use crate::color::{Point, PointContainer};
use crate::distance::DistanceCalculator;
use crate::palette::Palette;
use crate::progress::{ProgressTracker, QuantizeStep};

const NETWORK_BIAS_SHIFT: u32 = 3;
const PRIMES: [usize; 4] = [499, 491, 487, 503];
const MIN_PICTURE_POINTS: usize = 503;
const N_CYCLES: usize = 100;
const INITIAL_BIAS_SHIFT: u32 = 16;
const INITIAL_BIAS: i64 = 1 << INITIAL_BIAS_SHIFT;
const GAMMA_SHIFT: u32 = 10;
const BETA_SHIFT: u32 = 10;
const BETA: f64 = (INITIAL_BIAS >> BETA_SHIFT) as f64;
const BETA_GAMMA: f64 = (INITIAL_BIAS << (GAMMA_SHIFT - BETA_SHIFT)) as f64;
const RADIUS_BIAS_SHIFT: u32 = 6;
const RADIUS_BIAS: f64 = (1 << RADIUS_BIAS_SHIFT) as f64;
const RADIUS_DECREASE: f64 = 30.0;
const ALPHA_DECREASE: f64 = 30.0;
const ALPHA_BIAS_SHIFT: u32 = 10;
const INIT_ALPHA: f64 = (1 << ALPHA_BIAS_SHIFT) as f64;
const RAD_BIAS: f64 = (1 << 8) as f64;
const ALPHA_RAD_BIAS: f64 = (1u32 << (ALPHA_BIAS_SHIFT + 8)) as f64;

fn clamp_component(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

#[derive(Debug, Clone, Copy)]
struct NeuronFloat {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl NeuronFloat {
    fn new(value: f64) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
            a: value,
        }
    }

    fn to_point(self) -> Point {
        Point::from_rgba(
            clamp_component(self.r as i64 >> NETWORK_BIAS_SHIFT),
            clamp_component(self.g as i64 >> NETWORK_BIAS_SHIFT),
            clamp_component(self.b as i64 >> NETWORK_BIAS_SHIFT),
            clamp_component(self.a as i64 >> NETWORK_BIAS_SHIFT),
        )
    }

    fn subtract(&mut self, dr: f64, dg: f64, db: f64, da: f64) {
        self.r -= dr;
        self.g -= dg;
        self.b -= db;
        self.a -= da;
    }
}

/// NeuQuant palette quantizer (floating-point network).
pub struct NeuQuantFloat {
    calculator: DistanceCalculator,
    network_size: usize,
    points: Vec<Point>,
}

impl NeuQuantFloat {
    pub fn new(mut calculator: DistanceCalculator, colors: usize) -> Self {
        let white = (255u32 << NETWORK_BIAS_SHIFT) as f64;
        calculator.set_white_point(white, white, white, white);
        Self {
            calculator,
            network_size: colors,
            points: Vec::new(),
        }
    }

    pub fn sample(&mut self, image: &PointContainer) {
        self.points.extend_from_slice(image.points());
    }

    pub fn quantize(self) -> NeuQuantFloatStepper {
        NeuQuantFloatStepper::new(self)
    }
}

fn compute_rad_power(alpha: f64, rad: i64, rad_power: &mut Vec<f64>) {
    rad_power.clear();
    for i in 0..rad {
        rad_power.push(alpha * ((rad * rad - i * i) as f64 * RAD_BIAS / (rad * rad) as f64));
    }
}

fn prime_stride(points_number: usize) -> usize {
    if points_number < MIN_PICTURE_POINTS {
        1
    } else if points_number % PRIMES[0] != 0 {
        PRIMES[0]
    } else if points_number % PRIMES[1] != 0 {
        PRIMES[1]
    } else if points_number % PRIMES[2] != 0 {
        PRIMES[2]
    } else {
        PRIMES[3]
    }
}

/// Stepper driving floating-point NeuQuant training.
pub struct NeuQuantFloatStepper {
    calculator: DistanceCalculator,
    points: Vec<Point>,
    network: Vec<NeuronFloat>,
    freq: Vec<f64>,
    bias: Vec<f64>,
    rad_power: Vec<f64>,
    tracker: ProgressTracker,
    points_to_sample: usize,
    delta: usize,
    step: usize,
    alpha: f64,
    radius: f64,
    rad: i64,
    iteration: usize,
    point_index: usize,
    checked: bool,
    finished: bool,
}

impl NeuQuantFloatStepper {
    fn new(quantizer: NeuQuantFloat) -> Self {
        let size = quantizer.network_size;
        let network = (0..size)
            .map(|i| NeuronFloat::new(((i as i64) << (NETWORK_BIAS_SHIFT + 8)) as f64 / size as f64))
            .collect();
        let freq = vec![INITIAL_BIAS as f64 / size.max(1) as f64; size];
        let bias = vec![0.0f64; size];

        let points_number = quantizer.points.len();
        let points_to_sample = if size == 0 { 0 } else { points_number };
        let delta = (points_to_sample / N_CYCLES).max(1);
        let alpha = INIT_ALPHA;
        let radius = ((size >> 3) as f64) * RADIUS_BIAS;
        let mut rad = (radius as i64) >> RADIUS_BIAS_SHIFT;
        if rad <= 1 {
            rad = 0;
        }
        let mut rad_power = Vec::new();
        compute_rad_power(alpha, rad, &mut rad_power);

        Self {
            calculator: quantizer.calculator,
            points: quantizer.points,
            network,
            freq,
            bias,
            rad_power,
            tracker: ProgressTracker::new(points_to_sample, 99),
            points_to_sample,
            delta,
            step: prime_stride(points_number),
            alpha,
            radius,
            rad,
            iteration: 0,
            point_index: 0,
            checked: false,
            finished: false,
        }
    }

    fn learn_one(&mut self) {
        let point = self.points[self.point_index];
        let r = ((point.r as i64) << NETWORK_BIAS_SHIFT) as f64;
        let g = ((point.g as i64) << NETWORK_BIAS_SHIFT) as f64;
        let b = ((point.b as i64) << NETWORK_BIAS_SHIFT) as f64;
        let a = ((point.a as i64) << NETWORK_BIAS_SHIFT) as f64;

        let winner = self.contest(r, g, b, a);
        self.alter_single(winner, r, g, b, a);
        if self.rad != 0 {
            self.alter_neighbours(winner, r, g, b, a);
        }

        self.point_index += self.step;
        if self.point_index >= self.points.len() {
            self.point_index -= self.points.len();
        }
        self.iteration += 1;
        if self.iteration % self.delta == 0 {
            self.alpha -= self.alpha / ALPHA_DECREASE;
            self.radius -= self.radius / RADIUS_DECREASE;
            self.rad = (self.radius as i64) >> RADIUS_BIAS_SHIFT;
            if self.rad <= 1 {
                self.rad = 0;
            }
            compute_rad_power(self.alpha, self.rad, &mut self.rad_power);
        }
    }

    fn contest(&mut self, r: f64, g: f64, b: f64, a: f64) -> usize {
        const MULTIPLIER: f64 = ((255 * 4) << NETWORK_BIAS_SHIFT) as f64;
        let mut best_distance = i32::MAX as f64;
        let mut best_bias_distance = best_distance;
        let mut best_pos = 0;
        let mut best_bias_pos = 0;

        for i in 0..self.network.len() {
            let neuron = self.network[i];
            let distance = self
                .calculator
                .normalized(neuron.r, neuron.g, neuron.b, neuron.a, r, g, b, a)
                * MULTIPLIER;
            if distance < best_distance {
                best_distance = distance;
                best_pos = i;
            }
            let bias_distance =
                distance - ((self.bias[i] as i64) >> (INITIAL_BIAS_SHIFT - NETWORK_BIAS_SHIFT)) as f64;
            if bias_distance < best_bias_distance {
                best_bias_distance = bias_distance;
                best_bias_pos = i;
            }
            let beta_freq = (self.freq[i] as i64) >> BETA_SHIFT;
            self.freq[i] -= beta_freq as f64;
            self.bias[i] += (beta_freq << GAMMA_SHIFT) as f64;
        }
        self.freq[best_pos] += BETA;
        self.bias[best_pos] -= BETA_GAMMA;
        best_bias_pos
    }

    fn alter_single(&mut self, index: usize, r: f64, g: f64, b: f64, a: f64) {
        let alpha = self.alpha / INIT_ALPHA;
        let neuron = &mut self.network[index];
        neuron.subtract(
            alpha * (neuron.r - r),
            alpha * (neuron.g - g),
            alpha * (neuron.b - b),
            alpha * (neuron.a - a),
        );
    }

    fn alter_neighbours(&mut self, index: usize, r: f64, g: f64, b: f64, a: f64) {
        let center = index as i64;
        let lo = (center - self.rad).max(-1);
        let hi = (center + self.rad).min(self.network.len() as i64);
        let mut up = center + 1;
        let mut down = center - 1;
        let mut m = 0;
        while up < hi || down > lo {
            m += 1;
            let alpha = self.rad_power[m] / ALPHA_RAD_BIAS;
            if up < hi {
                let neuron = &mut self.network[up as usize];
                neuron.subtract(
                    alpha * (neuron.r - r),
                    alpha * (neuron.g - g),
                    alpha * (neuron.b - b),
                    alpha * (neuron.a - a),
                );
                up += 1;
            }
            if down > lo {
                let neuron = &mut self.network[down as usize];
                neuron.subtract(
                    alpha * (neuron.r - r),
                    alpha * (neuron.g - g),
                    alpha * (neuron.b - b),
                    alpha * (neuron.a - a),
                );
                down -= 1;
            }
        }
    }

    fn build_palette(&self) -> Palette {
        let mut palette = Palette::new();
        for neuron in &self.network {
            palette.add(neuron.to_point());
        }
        palette.sort();
        palette
    }
}

impl Iterator for NeuQuantFloatStepper {
    type Item = QuantizeStep<Palette>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while self.iteration < self.points_to_sample {
            if !self.checked {
                self.checked = true;
                if self.tracker.should_notify(self.iteration) {
                    return Some(QuantizeStep::Progress(self.tracker.progress()));
                }
            }
            self.checked = false;
            self.learn_one();
        }
        self.finished = true;
        Some(QuantizeStep::Done(self.build_palette()))
    }
}
