//! Color population counting for the RGBQuant method.

use std::collections::HashMap;

use crate::color::PointContainer;
use crate::palette::hue_stats::HueStatistics;

const HUE_GROUPS: u32 = 10;
const TILE_WIDTH: usize = 64;
const TILE_HEIGHT: usize = 64;
const TILE_PIXELS: u64 = 2;

/// How pixel populations are gathered before palette pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramMethod {
    /// Count every pixel globally, then keep the most frequent colors.
    FullImage,
    /// Count per 64x64 tile; a color enters the global histogram only
    /// once its local population clears a per-tile threshold. Keeps
    /// locally dominant colors that a global count would drown out.
    Tiled,
}

struct TileBox {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

/// Accumulates color frequencies over one or more sampled images.
pub struct ColorHistogram {
    method: HistogramMethod,
    init_colors: usize,
    hue_stats: HueStatistics,
    histogram: HashMap<u32, u64>,
}

impl ColorHistogram {
    pub fn new(method: HistogramMethod, colors: usize) -> Self {
        let min_hue_cols = colors << 2;
        Self {
            method,
            init_colors: colors << 2,
            hue_stats: HueStatistics::new(HUE_GROUPS, min_hue_cols),
            histogram: HashMap::new(),
        }
    }

    pub fn sample(&mut self, image: &PointContainer) {
        match self.method {
            HistogramMethod::FullImage => self.sample_full(image),
            HistogramMethod::Tiled => self.sample_tiled(image),
        }
    }

    /// Distinct sampled colors, most frequent first. Frequency ties are
    /// broken by the packed color value so the order is deterministic.
    pub fn importance_sorted_colors(&self) -> Vec<u32> {
        let mut entries: Vec<(u32, u64)> =
            self.histogram.iter().map(|(&col, &n)| (col, n)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        if entries.is_empty() {
            return Vec::new();
        }

        match self.method {
            HistogramMethod::FullImage => {
                let limit = entries.len().min(self.init_colors);
                let boundary_freq = entries[limit - 1].1;
                let mut colors: Vec<u32> =
                    entries[..limit].iter().map(|&(col, _)| col).collect();
                // Keep every color tied with the last one over the limit.
                let mut pos = limit;
                while pos < entries.len() && entries[pos].1 == boundary_freq {
                    colors.push(entries[pos].0);
                    pos += 1;
                }
                self.hue_stats.inject_into_array(&mut colors);
                colors
            }
            HistogramMethod::Tiled => entries.iter().map(|&(col, _)| col).collect(),
        }
    }

    fn sample_full(&mut self, image: &PointContainer) {
        for point in image.points() {
            let col = point.as_u32();
            self.hue_stats.check(col);
            *self.histogram.entry(col).or_insert(0) += 1;
        }
    }

    fn sample_tiled(&mut self, image: &PointContainer) {
        let width = image.width();
        let points = image.points();
        let tile_area = (TILE_WIDTH * TILE_HEIGHT) as f64;

        for tile in make_boxes(width, image.height(), TILE_WIDTH, TILE_HEIGHT) {
            let threshold =
                (((tile.w * tile.h) as f64 / tile_area).round() as u64 * TILE_PIXELS).max(2);
            let mut local: HashMap<u32, u64> = HashMap::new();
            for row in tile.y..tile.y + tile.h {
                for column in tile.x..tile.x + tile.w {
                    let col = points[row * width + column].as_u32();
                    self.hue_stats.check(col);
                    if let Some(global) = self.histogram.get_mut(&col) {
                        *global += 1;
                    } else {
                        let count = local.entry(col).or_insert(0);
                        *count += 1;
                        if *count >= threshold {
                            self.histogram.insert(col, *count);
                        }
                    }
                }
            }
        }
        self.hue_stats.inject_into_dictionary(&mut self.histogram);
    }
}

fn make_boxes(width: usize, height: usize, step_x: usize, step_y: usize) -> Vec<TileBox> {
    let wrem = width % step_x;
    let hrem = height % step_y;
    let xend = width - wrem;
    let yend = height - hrem;
    let mut boxes = Vec::new();
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            boxes.push(TileBox {
                x,
                y,
                w: if x == xend { wrem } else { step_x },
                h: if y == yend { hrem } else { step_y },
            });
            x += step_x;
        }
        y += step_y;
    }
    boxes
}
