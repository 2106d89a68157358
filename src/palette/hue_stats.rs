//! Hue bucketing used to protect rare hues during color sampling.
//!
//! Population-based sampling drowns out colors that cover few pixels but
//! carry a distinct hue (a small red logo on a large blue image). The
//! statistics here keep up to `min_cols` colors per hue bucket so they can
//! be re-injected into the sampled set afterwards.

use std::collections::HashMap;

use crate::color::rgb2hsl;

/// Assigns a hue in degrees to one of `segments` buckets. Bucket 0 spans
/// the wrap-around range on both sides of 0 degrees.
pub(crate) fn hue_group(hue: f64, segments: u32) -> u32 {
    let seg = 360.0 / segments as f64;
    let half = seg / 2.0;
    let mut mid = seg - half;
    for i in 1..segments {
        if hue >= mid && hue < mid + seg {
            return i;
        }
        mid += seg;
    }
    0
}

struct HueGroup {
    num: usize,
    cols: Vec<u32>,
}

pub(crate) struct HueStatistics {
    groups: Vec<HueGroup>,
    min_cols: usize,
    groups_full: usize,
}

impl HueStatistics {
    /// `num_groups` hue buckets plus one extra bucket for grays.
    pub(crate) fn new(num_groups: u32, min_cols: usize) -> Self {
        let groups = (0..=num_groups)
            .map(|_| HueGroup {
                num: 0,
                cols: Vec::new(),
            })
            .collect();
        Self {
            groups,
            min_cols,
            groups_full: 0,
        }
    }

    /// Records one occurrence of a packed color.
    pub(crate) fn check(&mut self, color: u32) {
        if self.groups_full == self.groups.len() {
            return;
        }

        let r = color & 0xff;
        let g = (color >> 8) & 0xff;
        let b = (color >> 16) & 0xff;
        let index = if r == g && g == b {
            0
        } else {
            let segments = self.groups.len() as u32 - 1;
            let hsl = rgb2hsl(r as f64, g as f64, b as f64);
            1 + hue_group(hsl.h, segments) as usize
        };

        let group = &mut self.groups[index];
        group.num += 1;
        if group.num > self.min_cols {
            return;
        }
        if group.num == self.min_cols {
            self.groups_full += 1;
        }
        group.cols.push(color);
    }

    /// Bumps the histogram count of every color held for an
    /// under-populated hue bucket.
    pub(crate) fn inject_into_dictionary(&self, histogram: &mut HashMap<u32, u64>) {
        for group in &self.groups {
            if group.num <= self.min_cols {
                for &col in &group.cols {
                    *histogram.entry(col).or_insert(0) += 1;
                }
            }
        }
    }

    /// Appends the colors held for under-populated hue buckets, skipping
    /// colors already present.
    pub(crate) fn inject_into_array(&self, colors: &mut Vec<u32>) {
        for group in &self.groups {
            if group.num <= self.min_cols {
                for &col in &group.cols {
                    if !colors.contains(&col) {
                        colors.push(col);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hue_group_buckets_cover_the_circle() {
        assert_eq!(hue_group(0.0, 10), 0);
        assert_eq!(hue_group(359.0, 10), 0);
        assert_eq!(hue_group(36.0, 10), 1);
        assert_eq!(hue_group(180.0, 10), 5);
        assert_eq!(hue_group(340.0, 10), 9);
    }

    #[test]
    fn test_rare_hue_survives_injection() {
        let mut stats = HueStatistics::new(10, 4);
        // One rare saturated red (packed 0xAABBGGRR) among many grays.
        let red = 0xff0000ffu32;
        stats.check(red);
        for _ in 0..100 {
            stats.check(0xff808080);
        }

        let mut histogram = HashMap::new();
        histogram.insert(0xff808080u32, 100u64);
        stats.inject_into_dictionary(&mut histogram);
        assert_eq!(histogram.get(&red), Some(&1));

        let mut colors = vec![0xff808080u32];
        stats.inject_into_array(&mut colors);
        assert!(colors.contains(&red));
        assert_eq!(colors.iter().filter(|&&c| c == 0xff808080).count(), 1);
    }

    #[test]
    fn test_full_bucket_stops_collecting() {
        let mut stats = HueStatistics::new(10, 2);
        stats.check(0xff000010);
        stats.check(0xff000020);
        stats.check(0xff000030);
        let mut colors = Vec::new();
        stats.inject_into_array(&mut colors);
        // Bucket num exceeded min_cols, so nothing is injected from it.
        assert_eq!(colors, Vec::<u32>::new());
    }
}
