// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use rand::Rng;

use crate::canvas::{CELL_H, CELL_W};
use crate::cell::Cell;
use crate::color::{terminal_color, ColorMode};
use crate::entity::SimRng;
use crate::frame::Frame;

pub const TILE: f32 = 2000.0;

#[derive(Clone, Copy, Debug)]
struct LayerSpec {
    count: usize,
    size_px: u8,
    period: Duration,
    glyph: char,
}

const LAYERS: [LayerSpec; 3] = [
    LayerSpec {
        count: 700,
        size_px: 1,
        period: Duration::from_secs(50),
        glyph: '·',
    },
    LayerSpec {
        count: 200,
        size_px: 2,
        period: Duration::from_secs(100),
        glyph: '•',
    },
    LayerSpec {
        count: 100,
        size_px: 3,
        period: Duration::from_secs(150),
        glyph: '*',
    },
];

struct Layer {
    spec: LayerSpec,
    stars: Vec<(f32, f32)>,
}

impl Layer {
    fn offset_at(&self, elapsed: Duration) -> f32 {
        let period = self.spec.period.as_secs_f32();
        (elapsed.as_secs_f32() % period) / period * TILE
    }
}

pub struct Starfield {
    layers: Vec<Layer>,
}

impl Starfield {
    pub fn new(rng: &mut SimRng) -> Self {
        let layers = LAYERS
            .iter()
            .map(|&spec| Layer {
                spec,
                stars: (0..spec.count)
                    .map(|_| (rng.random::<f32>() * TILE, rng.random::<f32>() * TILE))
                    .collect(),
            })
            .collect();
        Self { layers }
    }

    pub fn star_count(&self) -> usize {
        self.layers.iter().map(|l| l.stars.len()).sum()
    }

    pub fn paint(&self, frame: &mut Frame, elapsed: Duration, mode: ColorMode) {
        let w = frame.width as f32 * CELL_W;
        let h = frame.height as f32 * CELL_H;
        let white = terminal_color(mode, [1.0, 1.0, 1.0]);

        for layer in &self.layers {
            let off = layer.offset_at(elapsed);
            let size = layer.spec.size_px as f32;
            for &(x, y) in &layer.stars {
                if x + size <= 0.0 || x >= w {
                    continue;
                }
                for tile_y in [y - off, y + TILE - off] {
                    if tile_y + size <= 0.0 || tile_y >= h {
                        continue;
                    }
                    let (col, row) = ((x / CELL_W) as u16, (tile_y.max(0.0) / CELL_H) as u16);
                    let under = frame.get(col, row).unwrap_or(Cell::BLANK);
                    frame.set(
                        col,
                        row,
                        Cell {
                            ch: layer.spec.glyph,
                            fg: white,
                            bg: under.bg,
                        },
                    );
                }
            }
        }
    }
}
