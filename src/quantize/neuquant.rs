//! NeuQuant neural-network palette quantizer, fixed-point variant.
//!
//! A 1-D self-organizing map with one neuron per palette entry. Neuron
//! channels carry 3 extra fraction bits (values `0..=255 << 3`), so the
//! distance calculator is rebound to a `255 << 3` white point. Training
//! walks the sampled pixels with a prime stride and pulls the winning
//! neuron (and a shrinking neighbourhood) toward each pixel. A bias/
//! frequency ledger penalizes neurons that win too often, spreading the
//! network over the color space.

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
const BETA: i64 = INITIAL_BIAS >> BETA_SHIFT;
const BETA_GAMMA: i64 = INITIAL_BIAS << (GAMMA_SHIFT - BETA_SHIFT);
const RADIUS_BIAS_SHIFT: u32 = 6;
const RADIUS_BIAS: i64 = 1 << RADIUS_BIAS_SHIFT;
const RADIUS_DECREASE: i64 = 30;
const ALPHA_DECREASE: i64 = 30;
const ALPHA_BIAS_SHIFT: u32 = 10;
const INIT_ALPHA: i64 = 1 << ALPHA_BIAS_SHIFT;
const RAD_BIAS: i64 = 1 << 8;
const ALPHA_RAD_BIAS: i64 = 1 << (ALPHA_BIAS_SHIFT + 8);

fn clamp_component(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

#[derive(Debug, Clone, Copy)]
struct Neuron {
    r: i64,
    g: i64,
    b: i64,
    a: i64,
}

impl Neuron {
    fn new(value: i64) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
            a: value,
        }
    }

    fn to_point(self) -> Point {
        Point::from_rgba(
            clamp_component(self.r >> NETWORK_BIAS_SHIFT),
            clamp_component(self.g >> NETWORK_BIAS_SHIFT),
            clamp_component(self.b >> NETWORK_BIAS_SHIFT),
            clamp_component(self.a >> NETWORK_BIAS_SHIFT),
        )
    }

    /// Channel deltas are truncated toward zero before subtraction,
    /// keeping the network in integer arithmetic.
    fn subtract(&mut self, dr: f64, dg: f64, db: f64, da: f64) {
        self.r -= dr as i64;
        self.g -= dg as i64;
        self.b -= db as i64;
        self.a -= da as i64;
    }
}

/// NeuQuant palette quantizer (integer network).
pub struct NeuQuant {
    calculator: DistanceCalculator,
    network_size: usize,
    points: Vec<Point>,
}

impl NeuQuant {
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

    pub fn quantize(self) -> NeuQuantStepper {
        NeuQuantStepper::new(self)
    }
}

fn compute_rad_power(alpha: i64, rad: i64, rad_power: &mut Vec<i64>) {
    rad_power.clear();
    for i in 0..rad {
        let value =
            alpha as f64 * ((rad * rad - i * i) as f64 * RAD_BIAS as f64 / (rad * rad) as f64);
        rad_power.push(value as i64);
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

/// Stepper driving NeuQuant training; yields progress during the learning
/// pass and the final sorted palette when the network has been trained.
pub struct NeuQuantStepper {
    calculator: DistanceCalculator,
    points: Vec<Point>,
    network: Vec<Neuron>,
    freq: Vec<i64>,
    bias: Vec<i64>,
    rad_power: Vec<i64>,
    tracker: ProgressTracker,
    points_to_sample: usize,
    delta: usize,
    step: usize,
    alpha: i64,
    radius: i64,
    rad: i64,
    iteration: usize,
    point_index: usize,
    checked: bool,
    finished: bool,
}

impl NeuQuantStepper {
    fn new(quantizer: NeuQuant) -> Self {
        let size = quantizer.network_size;
        let network = (0..size)
            .map(|i| Neuron::new(((i as i64) << (NETWORK_BIAS_SHIFT + 8)) / size as i64))
            .collect();
        let freq = vec![INITIAL_BIAS / size.max(1) as i64; size];
        let bias = vec![0i64; size];

        let points_number = quantizer.points.len();
        // A network of zero neurons has nothing to train.
        let points_to_sample = if size == 0 { 0 } else { points_number };
        let delta = (points_to_sample / N_CYCLES).max(1);
        let alpha = INIT_ALPHA;
        let radius = ((size >> 3) as i64) * RADIUS_BIAS;
        let mut rad = radius >> RADIUS_BIAS_SHIFT;
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
        let r = (point.r as i64) << NETWORK_BIAS_SHIFT;
        let g = (point.g as i64) << NETWORK_BIAS_SHIFT;
        let b = (point.b as i64) << NETWORK_BIAS_SHIFT;
        let a = (point.a as i64) << NETWORK_BIAS_SHIFT;

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
            self.rad = self.radius >> RADIUS_BIAS_SHIFT;
            if self.rad <= 1 {
                self.rad = 0;
            }
            compute_rad_power(self.alpha, self.rad, &mut self.rad_power);
        }
    }

    /// Picks the winning neuron for a pixel, biased against neurons that
    /// win too frequently. Returns the bias-adjusted winner while the
    /// frequency ledger rewards the raw winner.
    fn contest(&mut self, r: i64, g: i64, b: i64, a: i64) -> usize {
        const MULTIPLIER: i64 = (255 * 4) << NETWORK_BIAS_SHIFT;
        let mut best_distance = i32::MAX as i64;
        let mut best_bias_distance = best_distance;
        let mut best_pos = 0;
        let mut best_bias_pos = 0;

        for i in 0..self.network.len() {
            let neuron = self.network[i];
            let distance = (self.calculator.normalized(
                neuron.r as f64,
                neuron.g as f64,
                neuron.b as f64,
                neuron.a as f64,
                r as f64,
                g as f64,
                b as f64,
                a as f64,
            ) * MULTIPLIER as f64) as i64;
            if distance < best_distance {
                best_distance = distance;
                best_pos = i;
            }
            let bias_distance =
                distance - (self.bias[i] >> (INITIAL_BIAS_SHIFT - NETWORK_BIAS_SHIFT));
            if bias_distance < best_bias_distance {
                best_bias_distance = bias_distance;
                best_bias_pos = i;
            }
            let beta_freq = self.freq[i] >> BETA_SHIFT;
            self.freq[i] -= beta_freq;
            self.bias[i] += beta_freq << GAMMA_SHIFT;
        }
        self.freq[best_pos] += BETA;
        self.bias[best_pos] -= BETA_GAMMA;
        best_bias_pos
    }

    fn alter_single(&mut self, index: usize, r: i64, g: i64, b: i64, a: i64) {
        let alpha = self.alpha as f64 / INIT_ALPHA as f64;
        let neuron = &mut self.network[index];
        neuron.subtract(
            alpha * (neuron.r - r) as f64,
            alpha * (neuron.g - g) as f64,
            alpha * (neuron.b - b) as f64,
            alpha * (neuron.a - a) as f64,
        );
    }

    fn alter_neighbours(&mut self, index: usize, r: i64, g: i64, b: i64, a: i64) {
        let center = index as i64;
        let lo = (center - self.rad).max(-1);
        let hi = (center + self.rad).min(self.network.len() as i64);
        let mut up = center + 1;
        let mut down = center - 1;
        let mut m = 0;
        while up < hi || down > lo {
            m += 1;
            let alpha = self.rad_power[m] as f64 / ALPHA_RAD_BIAS as f64;
            if up < hi {
                let neuron = &mut self.network[up as usize];
                neuron.subtract(
                    alpha * (neuron.r - r) as f64,
                    alpha * (neuron.g - g) as f64,
                    alpha * (neuron.b - b) as f64,
                    alpha * (neuron.a - a) as f64,
                );
                up += 1;
            }
            if down > lo {
                let neuron = &mut self.network[down as usize];
                neuron.subtract(
                    alpha * (neuron.r - r) as f64,
                    alpha * (neuron.g - g) as f64,
                    alpha * (neuron.b - b) as f64,
                    alpha * (neuron.a - a) as f64,
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

impl Iterator for NeuQuantStepper {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceFormula;
    use pretty_assertions::assert_eq;

    fn calculator() -> DistanceCalculator {
        DistanceCalculator::new(DistanceFormula::EuclideanBt709)
    }

    fn run(quantizer: NeuQuant) -> Palette {
        let mut palette = None;
        for step in quantizer.quantize() {
            match step {
                QuantizeStep::Progress(value) => assert!(value <= 99),
                QuantizeStep::Done(result) => palette = Some(result),
            }
        }
        palette.expect("stepper must finish with Done")
    }

    #[test]
    fn test_palette_size_always_equals_network_size() {
        let pixels = vec![0xff0000ffu32; 64];
        let image = PointContainer::from_u32_slice(&pixels, 8, 8);
        let mut quantizer = NeuQuant::new(calculator(), 16);
        quantizer.sample(&image);
        assert_eq!(run(quantizer).len(), 16);
    }

    #[test]
    fn test_untrained_network_is_a_uniform_ramp() {
        // Without samples the initial neuron values survive: neuron i is
        // the gray (i << 11) / size >> 3 across all four channels.
        let quantizer = NeuQuant::new(calculator(), 4);
        let palette = run(quantizer);
        assert_eq!(palette.len(), 4);
        assert!(palette.has(Point::from_rgba(0, 0, 0, 0)));
        assert!(palette.has(Point::from_rgba(64, 64, 64, 64)));
        assert!(palette.has(Point::from_rgba(128, 128, 128, 128)));
        assert!(palette.has(Point::from_rgba(192, 192, 192, 192)));
    }

    #[test]
    fn test_network_converges_toward_a_solid_color() {
        let image = PointContainer::from_u32_slice(&vec![0xffc86432u32; 256], 16, 16);
        let mut quantizer = NeuQuant::new(calculator(), 8);
        quantizer.sample(&image);
        let mut palette = run(quantizer);
        let target = Point::from_u32(0xffc86432);
        let calc = DistanceCalculator::new(DistanceFormula::Euclidean);
        let nearest = palette.nearest(&calc, target);
        assert!(calc.raw_points(nearest, target) < 16.0);
    }
}
