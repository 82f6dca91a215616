// Copyright (c) 2026 rezky_nightky

use std::f32::consts::{PI, TAU};

use rand::Rng;

use super::{span, SimRng, Simulate};
use crate::color::Rgba;
use crate::surface::{Paint, Point, Stroke, Surface};
use crate::viewport::Viewport;

const NEON_PINK: Rgba = Rgba::rgb8(0xff, 0x00, 0x6e);
const SCAN_CYAN: Rgba = Rgba::rgb8(0x00, 0xff, 0xff);
const STAR_TINTS: [Rgba; 4] = [
    Rgba::rgb8(0xff, 0xff, 0xff),
    Rgba::rgb8(0xff, 0xcc, 0xff),
    Rgba::rgb8(0xcc, 0xff, 0xff),
    Rgba::rgb8(0xff, 0xff, 0xcc),
];

const RIDGE_BASE: f32 = 0.6;

#[derive(Clone, Copy, Debug)]
struct Peak {
    x: f32,
    height: f32,
    phase: f32,
}

fn pick2(mobile: bool, desktop: f32, small: f32) -> f32 {
    if mobile {
        small
    } else {
        desktop
    }
}

#[derive(Clone, Debug)]
pub struct SynthwaveGrid {
    time: f32,
    peaks: Vec<Peak>,
}

impl SynthwaveGrid {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        let mobile = viewport.is_mobile();
        let count = if mobile { 40 } else { 80 };
        let peaks = (0..count)
            .map(|i| Peak {
                x: i as f32 / (count - 1) as f32 * viewport.width,
                height: span(rng, pick2(mobile, 50.0, 30.0), pick2(mobile, 150.0, 100.0)),
                phase: rng.random::<f32>() * TAU,
            })
            .collect();
        Self { time: 0.0, peaks }
    }

    fn grid(&self, surface: &mut dyn Surface, w: f32, h: f32, mobile: bool) {
        let horizon = h * pick2(mobile, 0.65, 0.7);
        let vanish = w / 2.0;
        let depth = (h - horizon).max(f32::EPSILON);

        let rows = if mobile { 12 } else { 20 };
        for i in 0..rows {
            let progress = (i as f32 / (rows - 1) as f32).powf(pick2(mobile, 1.5, 1.3));
            let y = horizon + progress * (h - horizon);
            let scale = 0.05 + (y - horizon) / depth * pick2(mobile, 1.2, 1.0);
            let half = w * scale * pick2(mobile, 1.5, 1.2) / 2.0;

            surface.set_global_alpha(0.4 + scale * pick2(mobile, 0.4, 0.3));
            let width = pick2(mobile, 1.0, 0.8) + scale * pick2(mobile, 1.5, 1.0);
            surface.stroke_line(
                Point::new(vanish - half, y),
                Point::new(vanish + half, y),
                &Stroke::new(NEON_PINK, width),
            );
        }

        let spacing = pick2(mobile, 80.0, 60.0);
        let columns = (w / spacing).ceil() * pick2(mobile, 2.0, 1.5) + pick2(mobile, 10.0, 6.0);
        let center = (columns / 2.0).floor();
        let stroke = Stroke::new(NEON_PINK, pick2(mobile, 1.2, 1.0));
        let mut i = 0.0;
        while i < columns {
            let offset = (i - center) * spacing;
            let start = vanish + offset * pick2(mobile, 0.15, 0.2);
            let end = vanish + offset * pick2(mobile, 2.0, 1.8);
            if end >= -w * 0.5 && end <= w * 1.5 {
                let fade = if center > 0.0 {
                    (1.0 - (i - center).abs() / center * 0.6).max(0.15)
                } else {
                    1.0
                };
                surface.set_global_alpha(fade * pick2(mobile, 0.7, 0.6));
                surface.stroke_line(Point::new(start, horizon), Point::new(end, h), &stroke);
            }
            i += 1.0;
        }

        if !mobile || w > 480.0 {
            let y = horizon + (self.time * 2.0).sin() * pick2(mobile, 20.0, 15.0);
            surface.set_global_alpha(0.2 + (self.time * 3.0).sin() * 0.15);
            let scan = Stroke::new(SCAN_CYAN, pick2(mobile, 2.0, 1.5));
            surface.stroke_line(Point::new(0.0, y), Point::new(w, y), &scan);
        }
    }

    fn ridge(&self, h: f32) -> Vec<Point> {
        let base = h * RIDGE_BASE;
        std::iter::once(Point::new(0.0, base))
            .chain(self.peaks.iter().map(|p| {
                let sway = (self.time * 2.0 + p.phase).sin() * 10.0;
                Point::new(p.x, base - p.height + sway)
            }))
            .collect()
    }

    fn mountains(&self, surface: &mut dyn Surface, w: f32, h: f32) {
        let ridge = self.ridge(h);

        let mut silhouette = ridge.clone();
        silhouette.extend([
            Point::new(w, h * RIDGE_BASE),
            Point::new(w, h),
            Point::new(0.0, h),
        ]);
        surface.set_global_alpha(0.8);
        surface.fill_polygon(&silhouette, &Rgba::BLACK.into());
        surface.stroke_polyline(&ridge, &Stroke::new(NEON_PINK, 2.0));
    }

    fn sun(&self, surface: &mut dyn Surface, w: f32, h: f32, mobile: bool) {
        let c = Point::new(w / 2.0, h * pick2(mobile, 0.25, 0.3));
        let radius = pick2(mobile, 100.0, 60.0);
        let pulse = (self.time * 1.5).sin() * 0.1 + 1.0;
        let r = radius * pulse;

        let halo = Paint::radial(
            c,
            radius * 3.0,
            [
                (0.0, Rgba::rgba8(255, 255, 0, 0.1)),
                (0.3, Rgba::rgba8(255, 140, 0, 0.05)),
                (0.6, Rgba::rgba8(255, 0, 110, 0.02)),
                (1.0, Rgba::TRANSPARENT),
            ],
        );
        surface.set_global_alpha(0.8 * pulse);
        surface.fill_circle(c, radius * 3.0, &halo);

        let disc = Paint::radial(
            c,
            r,
            [
                (0.0, Rgba::rgb8(0xff, 0xff, 0x88)),
                (0.2, Rgba::rgb8(0xff, 0xdd, 0x00)),
                (0.5, Rgba::rgb8(0xff, 0x8c, 0x00)),
                (0.8, NEON_PINK),
                (1.0, Rgba::rgb8(0x8b, 0x00, 0x40)),
            ],
        );
        surface.set_global_alpha(0.9);
        surface.fill_circle(c, r, &disc);

        const STRIPES: usize = 12;
        let band = Stroke::new(Rgba::rgba8(0, 0, 0, 0.4), 3.0);
        surface.set_global_alpha(0.7);
        for i in 0..STRIPES {
            let y = c.y - r
                + i as f32 * r * 2.0 / STRIPES as f32
                + (self.time * 2.0 + i as f32 * 0.5).sin() * 5.0;
            surface.stroke_line(Point::new(c.x - r, y), Point::new(c.x + r, y), &band);
        }

        surface.set_global_alpha(0.2);
        surface.stroke_arc(
            Point::new(c.x, h * 0.65 + 10.0),
            radius * 0.3,
            PI,
            TAU,
            &Stroke::new(NEON_PINK, 1.0),
        );
    }

    fn stars(&self, surface: &mut dyn Surface, w: f32, h: f32, mobile: bool) {
        let t = self.time;
        let count = if mobile { 80 } else { 150 };
        for i in 0..count {
            let fi = i as f32;
            let at = Point::new((fi * 137.5) % w, (fi * 73.7) % (h * 0.6));
            let twinkle = (t * 3.0 + fi).sin() * 0.5 + 0.5;
            let size = pick2(mobile, 0.5, 0.4) + fi.sin() * pick2(mobile, 0.5, 0.3);
            surface.set_global_alpha(twinkle * pick2(mobile, 0.6, 0.5));
            surface.fill_circle(at, size, &STAR_TINTS[i % STAR_TINTS.len()].into());
        }

        let accents = if mobile { 10 } else { 20 };
        let cross = Stroke::new(Rgba::WHITE, pick2(mobile, 1.0, 0.8));
        for i in 0..accents {
            let fi = i as f32;
            let at = Point::new((fi * 234.7) % w, (fi * 156.3) % (h * 0.5));
            let twinkle = (t * 2.0 + fi * 0.5).sin() * 0.3 + 0.7;
            let arm = pick2(mobile, 3.0, 2.0) + (t + fi).sin() * pick2(mobile, 1.0, 0.5);

            surface.set_global_alpha(twinkle * pick2(mobile, 0.8, 0.6));
            let (x, y) = (at.x, at.y);
            surface.stroke_line(Point::new(x - arm, y), Point::new(x + arm, y), &cross);
            surface.stroke_line(Point::new(x, y - arm), Point::new(x, y + arm), &cross);
            surface.fill_circle(at, pick2(mobile, 1.0, 0.8), &Rgba::WHITE.into());
        }
    }
}

impl Simulate for SynthwaveGrid {
    fn update(&mut self, _viewport: Viewport, _rng: &mut SimRng) {
        self.time += 0.01;
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let (w, h) = surface.size();
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let mobile = Viewport::new(w, h).is_mobile();

        surface.save();
        self.grid(surface, w, h, mobile);
        self.mountains(surface, w, h);
        self.sun(surface, w, h, mobile);
        self.stars(surface, w, h, mobile);
        surface.restore();
    }
}
