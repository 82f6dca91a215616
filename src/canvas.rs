// Copyright (c) 2026 rezky_nightky

use std::f32::consts::{PI, TAU};
use std::ops::Range;

use crate::color::{over, unit, Premul, Rgba, TRANSPARENT_PREMUL};
use crate::surface::{CompositeOp, Paint, Point, Stroke, Surface, TextAlign};

pub const CELL_W: f32 = 8.0;
pub const CELL_H: f32 = 16.0;
pub const SAMPLE: f32 = 8.0;

// Hairlines are widened to this many raster pixels (at reduced strength)
// so they survive downsampling.
const MIN_STROKE: f32 = 0.35;
const MIN_DOT: f32 = 0.12;
const GLYPH_FLOOR: f32 = 0.02;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub color: Rgba,
}

#[derive(Clone, Copy, Debug)]
struct DrawState {
    alpha: f32,
    op: CompositeOp,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            op: CompositeOp::SourceOver,
        }
    }
}

pub struct Canvas {
    cols: u16,
    rows: u16,
    px_w: usize,
    px_h: usize,
    pixels: Vec<Premul>,
    glyphs: Vec<Option<Glyph>>,
    state: DrawState,
    stack: Vec<DrawState>,
}

fn raster_range(min: f32, max: f32, len: usize) -> Range<usize> {
    if !min.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0..0;
    }
    let lo = min.floor().max(0.0) as usize;
    let hi = (max.ceil().max(0.0) as usize).min(len);
    lo.min(hi)..hi
}

fn segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> (f32, f32) {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > f32::EPSILON {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (qx, qy) = (a.0 + dx * t - p.0, a.1 + dy * t - p.1);
    ((qx * qx + qy * qy).sqrt(), t)
}

fn in_dash_gap(dash: Option<(f32, f32)>, s: f32) -> bool {
    match dash {
        Some((on, off)) if on + off > 0.0 => s.rem_euclid(on + off) >= on,
        _ => false,
    }
}

fn stroke_coverage(width_px: f32, d: f32) -> f32 {
    if width_px < 1.0 {
        unit(1.0 - d) * width_px.max(MIN_STROKE)
    } else {
        unit(width_px / 2.0 - d + 0.5)
    }
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut c = Self {
            cols: 0,
            rows: 0,
            px_w: 0,
            px_h: 0,
            pixels: Vec::new(),
            glyphs: Vec::new(),
            state: DrawState::default(),
            stack: Vec::new(),
        };
        c.resize(cols, rows);
        c
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.px_w = cols as usize;
        self.px_h = rows as usize * 2;
        self.pixels = vec![TRANSPARENT_PREMUL; self.px_w * self.px_h];
        self.glyphs = vec![None; cols as usize * rows as usize];
        self.state = DrawState::default();
        self.stack.clear();
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn pixel(&self, x: usize, y: usize) -> Premul {
        if x >= self.px_w || y >= self.px_h {
            return TRANSPARENT_PREMUL;
        }
        self.pixels[y * self.px_w + x]
    }

    pub fn glyph(&self, col: u16, row: u16) -> Option<Glyph> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.glyphs[row as usize * self.cols as usize + col as usize]
    }

    fn blend(&mut self, i: usize, src: Premul, coverage: f32) {
        let k = unit(coverage * self.state.alpha);
        if k <= 0.0 {
            return;
        }
        let s = [src[0] * k, src[1] * k, src[2] * k, src[3] * k];
        let d = self.pixels[i];
        self.pixels[i] = match self.state.op {
            CompositeOp::SourceOver => over(s, d),
            CompositeOp::Screen => [
                s[0] + d[0] - s[0] * d[0],
                s[1] + d[1] - s[1] * d[1],
                s[2] + d[2] - s[2] * d[2],
                s[3] + d[3] - s[3] * d[3],
            ],
            CompositeOp::Multiply => {
                let (sa, da) = (s[3], d[3]);
                let ch = |sc: f32, dc: f32| sc * dc + sc * (1.0 - da) + dc * (1.0 - sa);
                [
                    ch(s[0], d[0]),
                    ch(s[1], d[1]),
                    ch(s[2], d[2]),
                    sa + da - sa * da,
                ]
            }
        };
    }

    fn center_of(ix: usize, iy: usize) -> (f32, f32) {
        (ix as f32 + 0.5, iy as f32 + 0.5)
    }

    fn logical(p: (f32, f32)) -> Point {
        Point::new(p.0 * SAMPLE, p.1 * SAMPLE)
    }

    fn fade_glyphs(&mut self, x: f32, y: f32, w: f32, h: f32, strength: f32) {
        let keep = 1.0 - unit(strength);
        for row in 0..self.rows {
            let cy = (row as f32 + 0.5) * CELL_H;
            if cy < y || cy > y + h {
                continue;
            }
            for col in 0..self.cols {
                let cx = (col as f32 + 0.5) * CELL_W;
                if cx < x || cx > x + w {
                    continue;
                }
                let slot = &mut self.glyphs[row as usize * self.cols as usize + col as usize];
                if let Some(g) = slot {
                    g.color.a *= keep;
                    if g.color.a < GLYPH_FLOOR {
                        *slot = None;
                    }
                }
            }
        }
    }

    fn blend_coverage(&mut self, xs: Range<usize>, ys: Range<usize>, cov: &[f32], paint: &Paint) {
        let w = xs.len();
        for (j, iy) in ys.enumerate() {
            for (i, ix) in xs.clone().enumerate() {
                let c = cov[j * w + i];
                if c <= 0.0 {
                    continue;
                }
                let src = paint.sample(Self::logical(Self::center_of(ix, iy)));
                self.blend(iy * self.px_w + ix, src, c);
            }
        }
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f32, f32) {
        (self.cols as f32 * CELL_W, self.rows as f32 * CELL_H)
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.state = s;
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = unit(alpha);
    }

    fn set_composite(&mut self, op: CompositeOp) {
        self.state.op = op;
    }

    fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT_PREMUL);
        self.glyphs.fill(None);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (x0, y0) = (x / SAMPLE, y / SAMPLE);
        let (x1, y1) = ((x + w) / SAMPLE, (y + h) / SAMPLE);
        let src = color.premultiplied();
        for iy in raster_range(y0, y1, self.px_h) {
            let oy = y1.min(iy as f32 + 1.0) - y0.max(iy as f32);
            for ix in raster_range(x0, x1, self.px_w) {
                let ox = x1.min(ix as f32 + 1.0) - x0.max(ix as f32);
                self.blend(iy * self.px_w + ix, src, unit(ox) * unit(oy));
            }
        }
        if self.state.op == CompositeOp::SourceOver {
            self.fade_glyphs(x, y, w, h, color.a * self.state.alpha);
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        if !(radius > 0.0) || !center.x.is_finite() || !center.y.is_finite() {
            return;
        }
        let (cx, cy, rr) = (center.x / SAMPLE, center.y / SAMPLE, radius / SAMPLE);

        if rr < 0.5 {
            if cx < 0.0 || cy < 0.0 {
                return;
            }
            let (ix, iy) = (cx as usize, cy as usize);
            if ix < self.px_w && iy < self.px_h {
                let cov = (PI * rr * rr).clamp(MIN_DOT, 1.0);
                self.blend(iy * self.px_w + ix, paint.sample(center), cov);
            }
            return;
        }

        for iy in raster_range(cy - rr - 1.0, cy + rr + 1.0, self.px_h) {
            for ix in raster_range(cx - rr - 1.0, cx + rr + 1.0, self.px_w) {
                let (px, py) = Self::center_of(ix, iy);
                let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
                let cov = unit(rr - d + 0.5);
                if cov <= 0.0 {
                    continue;
                }
                let src = paint.sample(Self::logical((px, py)));
                self.blend(iy * self.px_w + ix, src, cov);
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let pts: Vec<(f32, f32)> = points.iter().map(|p| (p.x / SAMPLE, p.y / SAMPLE)).collect();
        let (mut x0, mut y0, mut x1, mut y1) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for &(x, y) in &pts {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        for iy in raster_range(y0, y1, self.px_h) {
            for ix in raster_range(x0, x1, self.px_w) {
                let (px, py) = Self::center_of(ix, iy);
                let mut inside = false;
                let mut j = pts.len() - 1;
                for i in 0..pts.len() {
                    let (xi, yi) = pts[i];
                    let (xj, yj) = pts[j];
                    if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                        inside = !inside;
                    }
                    j = i;
                }
                if inside {
                    let src = paint.sample(Self::logical((px, py)));
                    self.blend(iy * self.px_w + ix, src, 1.0);
                }
            }
        }
    }

    fn stroke_arc(&mut self, center: Point, radius: f32, start: f32, end: f32, stroke: &Stroke) {
        if !(radius > 0.0) || !(stroke.width > 0.0) {
            return;
        }
        let (cx, cy, rr) = (center.x / SAMPLE, center.y / SAMPLE, radius / SAMPLE);
        let width_px = stroke.width / SAMPLE;
        let reach = rr + width_px.max(1.0) + 1.0;
        let sweep = (end - start).clamp(0.0, TAU);
        let full = sweep >= TAU - 1e-4;

        for iy in raster_range(cy - reach, cy + reach, self.px_h) {
            for ix in raster_range(cx - reach, cx + reach, self.px_w) {
                let (px, py) = Self::center_of(ix, iy);
                let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
                let cov = stroke_coverage(width_px, (d - rr).abs());
                if cov <= 0.0 {
                    continue;
                }
                let rel = ((py - cy).atan2(px - cx) - start).rem_euclid(TAU);
                if !full && rel > sweep {
                    continue;
                }
                if in_dash_gap(stroke.dash, rel * radius) {
                    continue;
                }
                let src = stroke.paint.sample(Self::logical((px, py)));
                self.blend(iy * self.px_w + ix, src, cov);
            }
        }
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        if points.len() < 2 || !(stroke.width > 0.0) {
            return;
        }
        let width_px = stroke.width / SAMPLE;
        let reach = (width_px / 2.0).max(1.0) + 0.5;
        let pts: Vec<(f32, f32)> = points.iter().map(|p| (p.x / SAMPLE, p.y / SAMPLE)).collect();
        if pts.iter().any(|p| !p.0.is_finite() || !p.1.is_finite()) {
            return;
        }

        let (mut x0, mut y0, mut x1, mut y1) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for &(x, y) in &pts {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        let xs = raster_range(x0 - reach, x1 + reach, self.px_w);
        let ys = raster_range(y0 - reach, y1 + reach, self.px_h);
        if xs.is_empty() || ys.is_empty() {
            return;
        }
        let w = xs.len();
        let mut cov = vec![0.0f32; w * ys.len()];

        let mut travelled = 0.0f32;
        for seg in points.windows(2) {
            let (a, b) = ((seg[0].x / SAMPLE, seg[0].y / SAMPLE), (seg[1].x / SAMPLE, seg[1].y / SAMPLE));
            let seg_len = seg[0].distance(seg[1]);
            let sx = raster_range(a.0.min(b.0) - reach, a.0.max(b.0) + reach, self.px_w);
            let sy = raster_range(a.1.min(b.1) - reach, a.1.max(b.1) + reach, self.px_h);
            for iy in sy {
                for ix in sx.clone() {
                    let (d, t) = segment_distance(Self::center_of(ix, iy), a, b);
                    let c = stroke_coverage(width_px, d);
                    if c <= 0.0 || in_dash_gap(stroke.dash, travelled + t * seg_len) {
                        continue;
                    }
                    let slot = &mut cov[(iy - ys.start) * w + (ix - xs.start)];
                    *slot = slot.max(c);
                }
            }
            travelled += seg_len;
        }

        self.blend_coverage(xs, ys, &cov, &stroke.paint);
    }

    fn fill_text(&mut self, text: &str, pos: Point, color: Rgba, align: TextAlign) {
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return;
        }
        let alpha = unit(color.a * self.state.alpha);
        if alpha < GLYPH_FLOOR {
            return;
        }
        let row = ((pos.y - 1.0) / CELL_H).floor() as i64;
        if row < 0 || row >= self.rows as i64 {
            return;
        }
        let mut col = (pos.x / CELL_W).floor() as i64;
        if align == TextAlign::Center {
            col -= text.chars().count() as i64 / 2;
        }
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as i64;
            if c < 0 || c >= self.cols as i64 || ch.is_whitespace() {
                continue;
            }
            self.glyphs[row as usize * self.cols as usize + c as usize] = Some(Glyph {
                ch,
                color: color.with_alpha(alpha),
            });
        }
    }
}
