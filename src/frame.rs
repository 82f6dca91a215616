// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::background::Background;
use crate::canvas::{Canvas, Glyph, CELL_H, CELL_W, SAMPLE};
use crate::cell::Cell;
use crate::color::{luminance, over, terminal_color, unit, ColorMode, Premul};

// Glyphs fainter than this are treated as already faded out.
const GLYPH_VISIBLE: f32 = 0.08;
// Below this alpha a composed pixel counts as empty.
const EMPTY_ALPHA: f32 = 1.0 / 255.0;
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

fn rgb(p: Premul) -> [f32; 3] {
    [p[0], p[1], p[2]]
}

fn flatten(top: Premul, bottom: Premul, glyph: Option<Glyph>, mode: ColorMode) -> Cell {
    let empty = |p: Premul| p[3] < EMPTY_ALPHA;
    let color = |p: Premul| -> Option<Color> {
        if empty(p) {
            None
        } else {
            terminal_color(mode, rgb(p))
        }
    };
    let avg = [
        (top[0] + bottom[0]) / 2.0,
        (top[1] + bottom[1]) / 2.0,
        (top[2] + bottom[2]) / 2.0,
        (top[3] + bottom[3]) / 2.0,
    ];

    if let Some(Glyph { ch, color: ink }) = glyph {
        let a = ink.a;
        let fg = [
            avg[0] + (ink.r - avg[0]) * a,
            avg[1] + (ink.g - avg[1]) * a,
            avg[2] + (ink.b - avg[2]) * a,
        ];
        return Cell {
            ch,
            fg: terminal_color(mode, fg),
            bg: color(avg),
        };
    }

    if mode == ColorMode::Mono {
        if empty(top) && empty(bottom) {
            return Cell::BLANK;
        }
        return Cell {
            ch: shade(luminance(rgb(avg))),
            fg: None,
            bg: None,
        };
    }

    Cell::halves(color(top), color(bottom))
}

fn shade(lum: f32) -> char {
    let i = (unit(lum) * (SHADES.len() - 1) as f32).round() as usize;
    SHADES[i.min(SHADES.len() - 1)]
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    gen: u32,
    cell_gen: Vec<u32>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        let gen = 1u32;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
            gen,
            cell_gen: vec![gen; len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.gen = self.gen.wrapping_add(1);
        if self.gen == 0 {
            self.cell_gen.fill(0);
            self.gen = 1;
        }
        self.dirty_all = true;
        self.dirty.clear();
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }
        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cell_at_index(i))
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        if self.cell_gen.get(i).copied() == Some(self.gen) {
            self.cells[i]
        } else {
            Cell::BLANK
        }
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cell_at_index(i) == cell {
            return;
        }
        self.cells[i] = cell;
        self.cell_gen[i] = self.gen;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    pub fn compose(&mut self, canvas: Option<&Canvas>, background: &Background, mode: ColorMode) {
        let w = self.width as f32 * CELL_W;
        let h = self.height as f32 * CELL_H;
        let half = SAMPLE / 2.0;

        for row in 0..self.height {
            for col in 0..self.width {
                let px = col as usize;
                let py = row as usize * 2;
                let x = col as f32 * CELL_W + half;
                let y = row as f32 * CELL_H;

                let layer = |dy: usize| {
                    canvas.map(|c| c.pixel(px, py + dy)).unwrap_or_default()
                };
                let top = over(layer(0), background.sample(x, y + half, w, h));
                let bottom = over(layer(1), background.sample(x, y + SAMPLE + half, w, h));
                let glyph = canvas
                    .and_then(|c| c.glyph(col, row))
                    .filter(|g| g.color.a > GLYPH_VISIBLE);

                self.set(col, row, flatten(top, bottom, glyph, mode));
            }
        }
    }
}
