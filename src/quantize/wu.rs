//! Wu color quantizer over a 4-D (alpha, red, green, blue) histogram.
//!
//! Channels are reduced to 5 significant bits, giving a 33^4 moment arena
//! (index 0 is a zero border so cumulative sums need no bounds checks).
//! After the cumulative moment pass the color space is split greedily
//! along the axis of highest variance, then every sampled pixel is
//! re-assigned to its closest box and each box emits its mean color.

use crate::color::{Point, PointContainer};
use crate::distance::DistanceCalculator;
use crate::palette::Palette;
use crate::progress::{ProgressTracker, QuantizeStep};

const SIGNIFICANT_BITS: u32 = 5;
const MAX_SIDE_INDEX: usize = 1 << SIGNIFICANT_BITS;
const SIDE: usize = MAX_SIDE_INDEX + 1;

/// Accumulated statistics for one histogram cell, later reused in place
/// for the cumulative sums.
#[derive(Debug, Clone, Copy, Default)]
struct Moment {
    weight: i64,
    red: i64,
    green: i64,
    blue: i64,
    alpha: i64,
    m2: f64,
}

impl std::ops::Add for Moment {
    type Output = Moment;

    fn add(self, other: Moment) -> Moment {
        Moment {
            weight: self.weight + other.weight,
            red: self.red + other.red,
            green: self.green + other.green,
            blue: self.blue + other.blue,
            alpha: self.alpha + other.alpha,
            m2: self.m2 + other.m2,
        }
    }
}

impl std::ops::AddAssign for Moment {
    fn add_assign(&mut self, other: Moment) {
        *self = *self + other;
    }
}

fn index(alpha: usize, red: usize, green: usize, blue: usize) -> usize {
    ((alpha * SIDE + red) * SIDE + green) * SIDE + blue
}

fn index3(red: usize, green: usize, blue: usize) -> usize {
    (red * SIDE + green) * SIDE + blue
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Red,
    Green,
    Blue,
    Alpha,
}

/// An axis-aligned box in the reduced color space. Minimum bounds are
/// exclusive (cumulative-sum convention), maximums inclusive.
#[derive(Debug, Clone, Copy, Default)]
struct Cube {
    r_min: usize,
    r_max: usize,
    g_min: usize,
    g_max: usize,
    b_min: usize,
    b_max: usize,
    a_min: usize,
    a_max: usize,
    volume: i64,
}

struct CutCandidate {
    max: f64,
    position: Option<usize>,
}

/// Wu palette quantizer.
pub struct WuQuant {
    calculator: DistanceCalculator,
    colors: usize,
    moments: Vec<Moment>,
    pixels: Vec<Point>,
}

impl WuQuant {
    pub fn new(calculator: DistanceCalculator, colors: usize) -> Self {
        Self {
            calculator,
            colors,
            moments: vec![Moment::default(); SIDE * SIDE * SIDE * SIDE],
            pixels: Vec::new(),
        }
    }

    pub fn sample(&mut self, image: &PointContainer) {
        for point in image.points() {
            self.add_color(*point);
        }
        self.pixels.extend_from_slice(image.points());
    }

    pub fn quantize(self) -> WuQuantStepper {
        WuQuantStepper::new(self)
    }

    fn add_color(&mut self, point: Point) {
        let bits_to_remove = 8 - SIGNIFICANT_BITS;
        let r = (point.r >> bits_to_remove) as usize + 1;
        let g = (point.g >> bits_to_remove) as usize + 1;
        let b = (point.b >> bits_to_remove) as usize + 1;
        let a = (point.a >> bits_to_remove) as usize + 1;
        let cell = &mut self.moments[index(a, r, g, b)];
        cell.weight += 1;
        cell.red += point.r as i64;
        cell.green += point.g as i64;
        cell.blue += point.b as i64;
        cell.alpha += point.a as i64;
        cell.m2 += (point.r as f64).powi(2)
            + (point.g as f64).powi(2)
            + (point.b as f64).powi(2)
            + (point.a as f64).powi(2);
    }
}

/// Stepper driving the Wu quantizer: yields progress during the moment
/// accumulation pass, then splits and emits the palette in one final step.
pub struct WuQuantStepper {
    calculator: DistanceCalculator,
    colors: usize,
    moments: Vec<Moment>,
    pixels: Vec<Point>,
    tracker: ProgressTracker,
    xarea: Vec<Moment>,
    area: Vec<Moment>,
    alpha_index: usize,
    red_index: usize,
    tracker_progress: usize,
    checked: bool,
    finished: bool,
}

impl WuQuantStepper {
    fn new(quantizer: WuQuant) -> Self {
        Self {
            calculator: quantizer.calculator,
            colors: quantizer.colors,
            moments: quantizer.moments,
            pixels: quantizer.pixels,
            tracker: ProgressTracker::new(MAX_SIDE_INDEX * MAX_SIDE_INDEX, 99),
            xarea: vec![Moment::default(); SIDE * SIDE * SIDE],
            area: vec![Moment::default(); SIDE],
            alpha_index: 1,
            red_index: 0,
            tracker_progress: 0,
            checked: false,
            finished: false,
        }
    }

    /// One red-slice of the cumulative moment computation. Converts the
    /// raw histogram cells of this (alpha, red) plane into 4-D cumulative
    /// sums, in place.
    fn accumulate_red_slice(&mut self) {
        let alpha = self.alpha_index;
        let red = self.red_index;
        self.area.fill(Moment::default());
        for green in 1..=MAX_SIDE_INDEX {
            let mut line = Moment::default();
            for blue in 1..=MAX_SIDE_INDEX {
                let cell = index(alpha, red, green, blue);
                line += self.moments[cell];
                self.area[blue] += line;
                let x = index3(red, green, blue);
                self.xarea[x] = self.xarea[index3(red - 1, green, blue)] + self.area[blue];
                self.moments[cell] =
                    self.moments[index(alpha - 1, red, green, blue)] + self.xarea[x];
            }
        }
    }

    fn volume<T, F>(&self, cube: &Cube, f: F) -> T
    where
        T: Copy + std::ops::Add<Output = T> + std::ops::Sub<Output = T>,
        F: Fn(&Moment) -> T,
    {
        let m = |a: usize, r: usize, g: usize, b: usize| f(&self.moments[index(a, r, g, b)]);
        m(cube.a_max, cube.r_max, cube.g_max, cube.b_max)
            - m(cube.a_max, cube.r_max, cube.g_min, cube.b_max)
            - m(cube.a_max, cube.r_min, cube.g_max, cube.b_max)
            + m(cube.a_max, cube.r_min, cube.g_min, cube.b_max)
            - m(cube.a_min, cube.r_max, cube.g_max, cube.b_max)
            + m(cube.a_min, cube.r_max, cube.g_min, cube.b_max)
            + m(cube.a_min, cube.r_min, cube.g_max, cube.b_max)
            - m(cube.a_min, cube.r_min, cube.g_min, cube.b_max)
            - (m(cube.a_max, cube.r_max, cube.g_max, cube.b_min)
                - m(cube.a_min, cube.r_max, cube.g_max, cube.b_min)
                - m(cube.a_max, cube.r_max, cube.g_min, cube.b_min)
                + m(cube.a_min, cube.r_max, cube.g_min, cube.b_min)
                - m(cube.a_max, cube.r_min, cube.g_max, cube.b_min)
                + m(cube.a_min, cube.r_min, cube.g_max, cube.b_min)
                + m(cube.a_max, cube.r_min, cube.g_min, cube.b_min)
                - m(cube.a_min, cube.r_min, cube.g_min, cube.b_min))
    }

    fn top<F: Fn(&Moment) -> i64>(
        &self,
        cube: &Cube,
        direction: Direction,
        position: usize,
        f: F,
    ) -> i64 {
        let m = |a: usize, r: usize, g: usize, b: usize| f(&self.moments[index(a, r, g, b)]);
        match direction {
            Direction::Alpha => {
                m(position, cube.r_max, cube.g_max, cube.b_max)
                    - m(position, cube.r_max, cube.g_min, cube.b_max)
                    - m(position, cube.r_min, cube.g_max, cube.b_max)
                    + m(position, cube.r_min, cube.g_min, cube.b_max)
                    - (m(position, cube.r_max, cube.g_max, cube.b_min)
                        - m(position, cube.r_max, cube.g_min, cube.b_min)
                        - m(position, cube.r_min, cube.g_max, cube.b_min)
                        + m(position, cube.r_min, cube.g_min, cube.b_min))
            }
            Direction::Red => {
                m(cube.a_max, position, cube.g_max, cube.b_max)
                    - m(cube.a_max, position, cube.g_min, cube.b_max)
                    - m(cube.a_min, position, cube.g_max, cube.b_max)
                    + m(cube.a_min, position, cube.g_min, cube.b_max)
                    - (m(cube.a_max, position, cube.g_max, cube.b_min)
                        - m(cube.a_max, position, cube.g_min, cube.b_min)
                        - m(cube.a_min, position, cube.g_max, cube.b_min)
                        + m(cube.a_min, position, cube.g_min, cube.b_min))
            }
            Direction::Green => {
                m(cube.a_max, cube.r_max, position, cube.b_max)
                    - m(cube.a_max, cube.r_min, position, cube.b_max)
                    - m(cube.a_min, cube.r_max, position, cube.b_max)
                    + m(cube.a_min, cube.r_min, position, cube.b_max)
                    - (m(cube.a_max, cube.r_max, position, cube.b_min)
                        - m(cube.a_max, cube.r_min, position, cube.b_min)
                        - m(cube.a_min, cube.r_max, position, cube.b_min)
                        + m(cube.a_min, cube.r_min, position, cube.b_min))
            }
            Direction::Blue => {
                m(cube.a_max, cube.r_max, cube.g_max, position)
                    - m(cube.a_max, cube.r_max, cube.g_min, position)
                    - m(cube.a_max, cube.r_min, cube.g_max, position)
                    + m(cube.a_max, cube.r_min, cube.g_min, position)
                    - (m(cube.a_min, cube.r_max, cube.g_max, position)
                        - m(cube.a_min, cube.r_max, cube.g_min, position)
                        - m(cube.a_min, cube.r_min, cube.g_max, position)
                        + m(cube.a_min, cube.r_min, cube.g_min, position))
            }
        }
    }

    fn bottom<F: Fn(&Moment) -> i64>(&self, cube: &Cube, direction: Direction, f: F) -> i64 {
        let m = |a: usize, r: usize, g: usize, b: usize| f(&self.moments[index(a, r, g, b)]);
        match direction {
            Direction::Alpha => {
                -m(cube.a_min, cube.r_max, cube.g_max, cube.b_max)
                    + m(cube.a_min, cube.r_max, cube.g_min, cube.b_max)
                    + m(cube.a_min, cube.r_min, cube.g_max, cube.b_max)
                    - m(cube.a_min, cube.r_min, cube.g_min, cube.b_max)
                    - (-m(cube.a_min, cube.r_max, cube.g_max, cube.b_min)
                        + m(cube.a_min, cube.r_max, cube.g_min, cube.b_min)
                        + m(cube.a_min, cube.r_min, cube.g_max, cube.b_min)
                        - m(cube.a_min, cube.r_min, cube.g_min, cube.b_min))
            }
            Direction::Red => {
                -m(cube.a_max, cube.r_min, cube.g_max, cube.b_max)
                    + m(cube.a_max, cube.r_min, cube.g_min, cube.b_max)
                    + m(cube.a_min, cube.r_min, cube.g_max, cube.b_max)
                    - m(cube.a_min, cube.r_min, cube.g_min, cube.b_max)
                    - (-m(cube.a_max, cube.r_min, cube.g_max, cube.b_min)
                        + m(cube.a_max, cube.r_min, cube.g_min, cube.b_min)
                        + m(cube.a_min, cube.r_min, cube.g_max, cube.b_min)
                        - m(cube.a_min, cube.r_min, cube.g_min, cube.b_min))
            }
            Direction::Green => {
                -m(cube.a_max, cube.r_max, cube.g_min, cube.b_max)
                    + m(cube.a_max, cube.r_min, cube.g_min, cube.b_max)
                    + m(cube.a_min, cube.r_max, cube.g_min, cube.b_max)
                    - m(cube.a_min, cube.r_min, cube.g_min, cube.b_max)
                    - (-m(cube.a_max, cube.r_max, cube.g_min, cube.b_min)
                        + m(cube.a_max, cube.r_min, cube.g_min, cube.b_min)
                        + m(cube.a_min, cube.r_max, cube.g_min, cube.b_min)
                        - m(cube.a_min, cube.r_min, cube.g_min, cube.b_min))
            }
            Direction::Blue => {
                -m(cube.a_max, cube.r_max, cube.g_max, cube.b_min)
                    + m(cube.a_max, cube.r_max, cube.g_min, cube.b_min)
                    + m(cube.a_max, cube.r_min, cube.g_max, cube.b_min)
                    - m(cube.a_max, cube.r_min, cube.g_min, cube.b_min)
                    - (-m(cube.a_min, cube.r_max, cube.g_max, cube.b_min)
                        + m(cube.a_min, cube.r_max, cube.g_min, cube.b_min)
                        + m(cube.a_min, cube.r_min, cube.g_max, cube.b_min)
                        - m(cube.a_min, cube.r_min, cube.g_min, cube.b_min))
            }
        }
    }

    fn variance(&self, cube: &Cube) -> f64 {
        let red = self.volume(cube, |m| m.red) as f64;
        let green = self.volume(cube, |m| m.green) as f64;
        let blue = self.volume(cube, |m| m.blue) as f64;
        let alpha = self.volume(cube, |m| m.alpha) as f64;
        let m2: f64 = self.volume(cube, |m| m.m2);
        let weight = self.volume(cube, |m| m.weight) as f64;
        m2 - (red * red + green * green + blue * blue + alpha * alpha) / weight
    }

    #[allow(clippy::too_many_arguments)]
    fn maximize(
        &self,
        cube: &Cube,
        direction: Direction,
        first: usize,
        last: usize,
        whole_red: i64,
        whole_green: i64,
        whole_blue: i64,
        whole_alpha: i64,
        whole_weight: i64,
    ) -> CutCandidate {
        let bottom_red = self.bottom(cube, direction, |m| m.red);
        let bottom_green = self.bottom(cube, direction, |m| m.green);
        let bottom_blue = self.bottom(cube, direction, |m| m.blue);
        let bottom_alpha = self.bottom(cube, direction, |m| m.alpha);
        let bottom_weight = self.bottom(cube, direction, |m| m.weight);

        let mut result = 0.0;
        let mut cut_position = None;
        for position in first..last {
            let mut half_red = bottom_red + self.top(cube, direction, position, |m| m.red);
            let mut half_green = bottom_green + self.top(cube, direction, position, |m| m.green);
            let mut half_blue = bottom_blue + self.top(cube, direction, position, |m| m.blue);
            let mut half_alpha = bottom_alpha + self.top(cube, direction, position, |m| m.alpha);
            let mut half_weight = bottom_weight + self.top(cube, direction, position, |m| m.weight);
            if half_weight == 0 {
                continue;
            }
            let mut half_distance = (half_red as f64).powi(2)
                + (half_green as f64).powi(2)
                + (half_blue as f64).powi(2)
                + (half_alpha as f64).powi(2);
            let mut temp = half_distance / half_weight as f64;

            half_red = whole_red - half_red;
            half_green = whole_green - half_green;
            half_blue = whole_blue - half_blue;
            half_alpha = whole_alpha - half_alpha;
            half_weight = whole_weight - half_weight;
            if half_weight == 0 {
                continue;
            }
            half_distance = (half_red as f64).powi(2)
                + (half_green as f64).powi(2)
                + (half_blue as f64).powi(2)
                + (half_alpha as f64).powi(2);
            temp += half_distance / half_weight as f64;

            if temp > result {
                result = temp;
                cut_position = Some(position);
            }
        }
        CutCandidate {
            max: result,
            position: cut_position,
        }
    }

    fn cut(&self, first: &mut Cube, second: &mut Cube) -> bool {
        let whole_red = self.volume(first, |m| m.red);
        let whole_green = self.volume(first, |m| m.green);
        let whole_blue = self.volume(first, |m| m.blue);
        let whole_alpha = self.volume(first, |m| m.alpha);
        let whole_weight = self.volume(first, |m| m.weight);

        let red = self.maximize(
            first,
            Direction::Red,
            first.r_min + 1,
            first.r_max,
            whole_red,
            whole_green,
            whole_blue,
            whole_alpha,
            whole_weight,
        );
        let green = self.maximize(
            first,
            Direction::Green,
            first.g_min + 1,
            first.g_max,
            whole_red,
            whole_green,
            whole_blue,
            whole_alpha,
            whole_weight,
        );
        let blue = self.maximize(
            first,
            Direction::Blue,
            first.b_min + 1,
            first.b_max,
            whole_red,
            whole_green,
            whole_blue,
            whole_alpha,
            whole_weight,
        );
        let alpha = self.maximize(
            first,
            Direction::Alpha,
            first.a_min + 1,
            first.a_max,
            whole_red,
            whole_green,
            whole_blue,
            whole_alpha,
            whole_weight,
        );

        let (direction, position) =
            if alpha.max >= red.max && alpha.max >= green.max && alpha.max >= blue.max {
                match alpha.position {
                    Some(position) => (Direction::Alpha, position),
                    None => return false,
                }
            } else if red.max >= alpha.max && red.max >= green.max && red.max >= blue.max {
                match red.position {
                    Some(position) => (Direction::Red, position),
                    None => return false,
                }
            } else if green.max >= alpha.max && green.max >= red.max && green.max >= blue.max {
                match green.position {
                    Some(position) => (Direction::Green, position),
                    None => return false,
                }
            } else {
                match blue.position {
                    Some(position) => (Direction::Blue, position),
                    None => return false,
                }
            };

        second.r_max = first.r_max;
        second.g_max = first.g_max;
        second.b_max = first.b_max;
        second.a_max = first.a_max;
        second.r_min = first.r_min;
        second.g_min = first.g_min;
        second.b_min = first.b_min;
        second.a_min = first.a_min;
        match direction {
            Direction::Red => {
                second.r_min = position;
                first.r_max = position;
            }
            Direction::Green => {
                second.g_min = position;
                first.g_max = position;
            }
            Direction::Blue => {
                second.b_min = position;
                first.b_max = position;
            }
            Direction::Alpha => {
                second.a_min = position;
                first.a_max = position;
            }
        }
        first.volume = ((first.r_max - first.r_min)
            * (first.g_max - first.g_min)
            * (first.b_max - first.b_min)
            * (first.a_max - first.a_min)) as i64;
        second.volume = ((second.r_max - second.r_min)
            * (second.g_max - second.g_min)
            * (second.b_max - second.b_min)
            * (second.a_max - second.a_min)) as i64;
        true
    }

    fn build_palette(&mut self) -> Palette {
        let mut palette = Palette::new();
        if self.colors == 0 {
            return palette;
        }

        let mut cubes = vec![Cube::default(); self.colors];
        cubes[0].r_max = MAX_SIDE_INDEX;
        cubes[0].g_max = MAX_SIDE_INDEX;
        cubes[0].b_max = MAX_SIDE_INDEX;
        cubes[0].a_max = MAX_SIDE_INDEX;

        let mut colors = self.colors;
        let mut volume_variance = vec![0.0f64; colors];
        let mut next = 0;
        let mut cube_index = 1;
        while cube_index < colors {
            let (head, tail) = cubes.split_at_mut(cube_index);
            let success = self.cut(&mut head[next], &mut tail[0]);
            let argmax_end = if success {
                volume_variance[next] = if cubes[next].volume > 1 {
                    self.variance(&cubes[next])
                } else {
                    0.0
                };
                volume_variance[cube_index] = if cubes[cube_index].volume > 1 {
                    self.variance(&cubes[cube_index])
                } else {
                    0.0
                };
                cube_index
            } else {
                volume_variance[next] = 0.0;
                cube_index - 1
            };

            next = 0;
            let mut best = volume_variance[0];
            for candidate in 1..=argmax_end {
                if volume_variance[candidate] > best {
                    best = volume_variance[candidate];
                    next = candidate;
                }
            }
            if best <= 0.0 {
                colors = argmax_end + 1;
                break;
            }
            if success {
                cube_index += 1;
            }
        }

        // Mean color of each box, used for the nearest-box refinement.
        let mut lookup = vec![[0i64; 4]; colors];
        for (k, entry) in lookup.iter_mut().enumerate() {
            let weight = self.volume(&cubes[k], |m| m.weight);
            if weight > 0 {
                *entry = [
                    self.volume(&cubes[k], |m| m.red) / weight,
                    self.volume(&cubes[k], |m| m.green) / weight,
                    self.volume(&cubes[k], |m| m.blue) / weight,
                    self.volume(&cubes[k], |m| m.alpha) / weight,
                ];
            }
        }

        let mut reds = vec![0u64; colors];
        let mut greens = vec![0u64; colors];
        let mut blues = vec![0u64; colors];
        let mut alphas = vec![0u64; colors];
        let mut sums = vec![0u64; colors];
        for point in &self.pixels {
            let mut best_match = 0;
            let mut best_distance = f64::MAX;
            for (k, entry) in lookup.iter().enumerate() {
                let distance = self.calculator.raw(
                    entry[0] as f64,
                    entry[1] as f64,
                    entry[2] as f64,
                    entry[3] as f64,
                    point.r as f64,
                    point.g as f64,
                    point.b as f64,
                    point.a as f64,
                );
                if distance < best_distance {
                    best_distance = distance;
                    best_match = k;
                }
            }
            reds[best_match] += point.r as u64;
            greens[best_match] += point.g as u64;
            blues[best_match] += point.b as u64;
            alphas[best_match] += point.a as u64;
            sums[best_match] += 1;
        }

        for k in 0..colors {
            if sums[k] > 0 {
                let sum = sums[k];
                palette.add(Point::from_rgba(
                    (reds[k] / sum) as u8,
                    (greens[k] / sum) as u8,
                    (blues[k] / sum) as u8,
                    (alphas[k] / sum) as u8,
                ));
            }
        }
        palette.sort();
        palette
    }
}

impl Iterator for WuQuantStepper {
    type Item = QuantizeStep<Palette>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while self.alpha_index <= MAX_SIDE_INDEX {
            if self.red_index == 0 {
                self.xarea.fill(Moment::default());
                self.red_index = 1;
            }
            while self.red_index <= MAX_SIDE_INDEX {
                if !self.checked {
                    self.checked = true;
                    if self.tracker.should_notify(self.tracker_progress) {
                        return Some(QuantizeStep::Progress(self.tracker.progress()));
                    }
                }
                self.checked = false;
                self.accumulate_red_slice();
                self.red_index += 1;
                self.tracker_progress += 1;
            }
            self.red_index = 0;
            self.alpha_index += 1;
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

    fn run(quantizer: WuQuant) -> Palette {
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
    fn test_two_color_image_yields_two_colors() {
        let pixels = vec![0xff000000u32, 0xffffffff, 0xff000000, 0xffffffff];
        let image = PointContainer::from_u32_slice(&pixels, 2, 2);
        let mut quantizer = WuQuant::new(calculator(), 16);
        quantizer.sample(&image);
        let palette = run(quantizer);
        assert_eq!(palette.len(), 2);
        assert!(palette.has(Point::from_rgba(0, 0, 0, 255)));
        assert!(palette.has(Point::from_rgba(255, 255, 255, 255)));
    }

    #[test]
    fn test_pairs_collapse_to_their_averages() {
        // Two dark and two light grays reduced to two entries; each entry
        // is the mean of its disjoint pair.
        let pixels = [0xff000000u32, 0xff080808, 0xfff0f0f0, 0xfff8f8f8];
        let image = PointContainer::from_u32_slice(&pixels, 2, 2);
        let mut quantizer = WuQuant::new(calculator(), 2);
        quantizer.sample(&image);
        let palette = run(quantizer);
        assert_eq!(palette.len(), 2);
        assert!(palette.has(Point::from_rgba(4, 4, 4, 255)));
        assert!(palette.has(Point::from_rgba(244, 244, 244, 255)));
    }

    #[test]
    fn test_same_input_yields_identical_palettes() {
        let pixels: Vec<u32> = (0..256u32)
            .map(|i| 0xff000000 | (i * 997 % 256) << 16 | (i * 31 % 256) << 8 | i)
            .collect();
        let image = PointContainer::from_u32_slice(&pixels, 16, 16);
        let mut first = WuQuant::new(calculator(), 16);
        first.sample(&image);
        let mut second = WuQuant::new(calculator(), 16);
        second.sample(&image);
        let left = run(first);
        let right = run(second);
        assert_eq!(left.points(), right.points());
    }

    #[test]
    fn test_solid_image_yields_exact_color() {
        let image = PointContainer::from_u32_slice(&vec![0xff326496u32; 16], 4, 4);
        let mut quantizer = WuQuant::new(calculator(), 8);
        quantizer.sample(&image);
        let palette = run(quantizer);
        assert_eq!(palette.len(), 1);
        assert!(palette.has(Point::from_u32(0xff326496)));
    }

    #[test]
    fn test_stepper_is_exhausted_after_done() {
        let image = PointContainer::from_u32_slice(&[0xff000000u32], 1, 1);
        let mut quantizer = WuQuant::new(calculator(), 2);
        quantizer.sample(&image);
        let mut stepper = quantizer.quantize();
        let mut saw_done = false;
        for step in stepper.by_ref() {
            if step.into_done().is_some() {
                saw_done = true;
            }
        }
        assert!(saw_done);
        assert!(stepper.next().is_none());
    }
}
