//! Palette storage and hue-aware color bookkeeping.

pub(crate) mod hue_stats;

use std::collections::HashMap;

use crate::color::{rgb2hsl, Point};
use crate::distance::DistanceCalculator;
use crate::palette::hue_stats::hue_group;

const HUE_GROUPS: u32 = 10;

/// A fixed set of colors plus a memoized nearest-color lookup.
///
/// The lookup cache is keyed by the packed 32-bit color, so repeated
/// queries for the same pixel value cost one hash probe. The cache is
/// invalidated whenever the color set changes.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    points: Vec<Point>,
    nearest_cache: HashMap<u32, usize>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a color to the palette.
    pub fn add(&mut self, point: Point) {
        self.points.push(point);
        self.nearest_cache.clear();
    }

    /// Whether the exact color is already present.
    pub fn has(&self, point: Point) -> bool {
        let packed = point.as_u32();
        self.points.iter().any(|p| p.as_u32() == packed)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The palette color closest to `point` under `calculator`.
    pub fn nearest(&mut self, calculator: &DistanceCalculator, point: Point) -> Point {
        let index = self.nearest_index(calculator, point);
        self.points[index]
    }

    /// Index of the palette color closest to `point` under `calculator`.
    ///
    /// Results are cached per packed color value; mixing calculators on
    /// one palette instance would return stale answers.
    pub fn nearest_index(&mut self, calculator: &DistanceCalculator, point: Point) -> usize {
        let key = point.as_u32();
        if let Some(&index) = self.nearest_cache.get(&key) {
            return index;
        }

        let mut best_index = 0;
        let mut best_distance = f64::MAX;
        for (index, candidate) in self.points.iter().enumerate() {
            let distance = calculator.raw_points(point, *candidate);
            if distance < best_distance {
                best_distance = distance;
                best_index = index;
            }
        }
        self.nearest_cache.insert(key, best_index);
        best_index
    }

    /// Orders the palette by hue bucket, then luminosity (brightest
    /// first), then saturation. Grays sort before all hues.
    pub fn sort(&mut self) {
        self.nearest_cache.clear();
        self.points.sort_by(|a, b| {
            let hsl_a = rgb2hsl(a.r as f64, a.g as f64, a.b as f64);
            let hsl_b = rgb2hsl(b.r as f64, b.g as f64, b.b as f64);
            let group_a = if a.r == a.g && a.g == a.b {
                0
            } else {
                1 + hue_group(hsl_a.h, HUE_GROUPS)
            };
            let group_b = if b.r == b.g && b.g == b.b {
                0
            } else {
                1 + hue_group(hsl_b.h, HUE_GROUPS)
            };
            group_a
                .cmp(&group_b)
                .then_with(|| b.luminosity(true).total_cmp(&a.luminosity(true)))
                .then_with(|| {
                    let sat_a = (hsl_a.s * 100.0) as i64;
                    let sat_b = (hsl_b.s * 100.0) as i64;
                    sat_a.cmp(&sat_b)
                })
        });
    }
}
