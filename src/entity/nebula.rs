// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::Rng;

use super::{Hsl, SimRng, Simulate};
use crate::surface::{CompositeOp, Paint, Point, Surface};
use crate::viewport::Viewport;

struct Scheme {
    primary: Hsl,
    secondary: Hsl,
    accent: Hsl,
}

const SCHEMES: [Scheme; 3] = [
    Scheme {
        primary: Hsl::new(300.0, 90.0, 70.0),
        secondary: Hsl::new(260.0, 85.0, 65.0),
        accent: Hsl::new(340.0, 80.0, 75.0),
    },
    Scheme {
        primary: Hsl::new(220.0, 80.0, 65.0),
        secondary: Hsl::new(200.0, 75.0, 70.0),
        accent: Hsl::new(180.0, 70.0, 75.0),
    },
    Scheme {
        primary: Hsl::new(280.0, 70.0, 50.0),
        secondary: Hsl::new(260.0, 65.0, 55.0),
        accent: Hsl::new(240.0, 60.0, 60.0),
    },
];

const LOBES: usize = 8;
const BRIGHT_SPOTS: usize = 3;

#[derive(Clone, Debug)]
pub struct NebulaLayer {
    index: usize,
    time: f32,
    noise: f32,
    opacity: f32,
    scale: f32,
}

impl NebulaLayer {
    pub fn new(index: usize, rng: &mut SimRng) -> Self {
        let depth = (index % SCHEMES.len()) as f32;
        Self {
            index,
            time: 0.0,
            noise: rng.random::<f32>() * 1000.0,
            opacity: 0.4 - depth * 0.1,
            scale: 1.0 + depth * 0.3,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    fn scheme(&self) -> &'static Scheme {
        &SCHEMES[self.index % SCHEMES.len()]
    }

    fn composite(&self) -> CompositeOp {
        if self.index == 0 {
            CompositeOp::Screen
        } else {
            CompositeOp::Multiply
        }
    }

    fn region(&self, surface: &mut dyn Surface, center: Point, base: f32, col: Hsl) {
        let size = base * self.scale;
        let t = self.time;
        let o = self.opacity * (0.6 + (t + self.noise).sin() * 0.4);

        for i in 0..LOBES {
            let angle = i as f32 / LOBES as f32 * TAU;
            let dist = size * 0.3 * (0.5 + (t * 0.5 + angle).sin() * 0.5);
            let c = Point::new(
                center.x + (angle + t * 0.2).cos() * dist,
                center.y + (angle + t * 0.15).sin() * dist,
            );
            let r = size * (0.4 + (t + angle).sin() * 0.2);
            let paint = Paint::radial(
                c,
                r,
                [
                    (
                        0.0,
                        Hsl::new(col.h + (t + i as f32).sin() * 20.0, col.s, col.l + 10.0)
                            .rgba(o * 0.8),
                    ),
                    (0.2, col.shift(10.0, -5.0, 0.0).rgba(o * 0.6)),
                    (0.4, col.shift(-10.0, -10.0, -5.0).rgba(o * 0.4)),
                    (0.6, col.shift(-20.0, -15.0, -10.0).rgba(o * 0.25)),
                    (0.8, col.shift(-30.0, -20.0, -15.0).rgba(o * 0.1)),
                    (1.0, col.shift(-40.0, -25.0, -20.0).rgba(0.0)),
                ],
            );
            surface.fill_circle(c, r, &paint);
        }

        if self.index != 0 {
            return;
        }
        for i in 0..BRIGHT_SPOTS {
            let angle = i as f32 / BRIGHT_SPOTS as f32 * TAU + t * 0.1;
            let dist = size * 0.2;
            let c = Point::new(center.x + angle.cos() * dist, center.y + angle.sin() * dist);
            let r = size * 0.15;
            let paint = Paint::radial(
                c,
                r,
                [
                    (0.0, Hsl::new(col.h + 30.0, 100.0, 85.0).rgba(o * 0.9)),
                    (0.3, Hsl::new(col.h + 20.0, 95.0, 75.0).rgba(o * 0.6)),
                    (0.6, Hsl::new(col.h + 10.0, 90.0, 65.0).rgba(o * 0.3)),
                    (1.0, Hsl::new(col.h, 85.0, 55.0).rgba(0.0)),
                ],
            );
            surface.fill_circle(c, r, &paint);
        }
    }
}

impl Simulate for NebulaLayer {
    fn update(&mut self, _viewport: Viewport, _rng: &mut SimRng) {
        self.time += 0.008;
        self.noise += 0.003;
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let (w, h) = surface.size();
        let scheme = self.scheme();

        surface.save();
        surface.set_composite(self.composite());
        self.region(surface, Point::new(w * 0.3, h * 0.4), 400.0, scheme.primary);
        self.region(surface, Point::new(w * 0.7, h * 0.6), 350.0, scheme.secondary);
        self.region(surface, Point::new(w * 0.5, h * 0.2), 300.0, scheme.accent);
        if self.index == 0 {
            self.region(surface, Point::new(w * 0.2, h * 0.8), 200.0, scheme.primary);
            self.region(surface, Point::new(w * 0.8, h * 0.3), 180.0, scheme.secondary);
        }
        surface.restore();
    }
}
