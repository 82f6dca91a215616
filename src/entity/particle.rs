// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::Rng;

use super::{pick, reflect, signed, span, Hsl, SimRng, Simulate};
use crate::color::Rgba;
use crate::surface::{Paint, Point, Surface};
use crate::viewport::Viewport;

const SOLAR: [Hsl; 5] = [
    Hsl::new(45.0, 100.0, 70.0),
    Hsl::new(35.0, 95.0, 65.0),
    Hsl::new(55.0, 90.0, 75.0),
    Hsl::new(25.0, 85.0, 60.0),
    Hsl::new(60.0, 100.0, 80.0),
];

#[derive(Clone, Debug)]
pub struct AIParticle {
    x: f32,
    y: f32,
    size: f32,
    vx: f32,
    vy: f32,
    hue: f32,
    life: f32,
    decay: f32,
    pulse: f32,
}

impl AIParticle {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        Self {
            x: rng.random::<f32>() * viewport.width,
            y: rng.random::<f32>() * viewport.height,
            size: span(rng, 2.0, 4.0),
            vx: signed(rng, 1.2),
            vy: signed(rng, 1.2),
            hue: span(rng, 180.0, 80.0),
            life: 1.0,
            decay: span(rng, 0.003, 0.015),
            pulse: 0.0,
        }
    }
}

impl Simulate for AIParticle {
    fn update(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= self.decay;
        self.pulse += 0.08;

        reflect(self.x, &mut self.vx, viewport.width);
        reflect(self.y, &mut self.vy, viewport.height);

        if self.life <= 0.0 {
            self.x = rng.random::<f32>() * viewport.width;
            self.y = rng.random::<f32>() * viewport.height;
            self.life = 1.0;
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let c = Point::new(self.x, self.y);
        let r = self.size + self.pulse.sin() * 1.5;
        let alpha = self.life * 0.9;
        let h = self.hue;

        surface.save();
        let glow = Paint::radial(
            c,
            r * 5.0,
            [
                (0.0, Rgba::hsla(h, 90.0, 80.0, alpha * 0.4)),
                (0.5, Rgba::hsla(h + 20.0, 85.0, 75.0, alpha * 0.2)),
                (1.0, Rgba::hsla(h + 40.0, 80.0, 70.0, 0.0)),
            ],
        );
        surface.fill_circle(c, r * 5.0, &glow);

        let body = Paint::radial(
            c,
            r * 2.0,
            [
                (0.0, Rgba::hsla(h, 100.0, 85.0, alpha)),
                (0.6, Rgba::hsla(h + 15.0, 95.0, 75.0, alpha * 0.7)),
                (1.0, Rgba::hsla(h + 30.0, 90.0, 65.0, 0.0)),
            ],
        );
        surface.fill_circle(c, r * 2.0, &body);

        surface.set_global_alpha(alpha * 1.2);
        surface.fill_circle(c, r * 0.5, &Rgba::hsl(h + 10.0, 100.0, 90.0).into());
        surface.restore();
    }
}

#[derive(Clone, Debug)]
pub struct SolarParticle {
    x: f32,
    y: f32,
    size: f32,
    vx: f32,
    vy: f32,
    life: f32,
    decay: f32,
    pulse: f32,
    pulse_speed: f32,
    color: Hsl,
}

impl SolarParticle {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        Self {
            x: rng.random::<f32>() * viewport.width,
            y: rng.random::<f32>() * viewport.height,
            size: span(rng, 3.0, 6.0),
            vx: signed(rng, 2.0),
            vy: signed(rng, 2.0),
            life: 1.0,
            decay: span(rng, 0.002, 0.008),
            pulse: rng.random::<f32>() * TAU,
            pulse_speed: span(rng, 0.05, 0.1),
            color: pick(rng, &SOLAR),
        }
    }
}

impl Simulate for SolarParticle {
    fn update(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= self.decay;
        self.pulse += self.pulse_speed;

        reflect(self.x, &mut self.vx, viewport.width);
        reflect(self.y, &mut self.vy, viewport.height);

        if self.life <= 0.0 {
            self.x = rng.random::<f32>() * viewport.width;
            self.y = rng.random::<f32>() * viewport.height;
            self.life = 1.0;
            self.vx = signed(rng, 2.0);
            self.vy = signed(rng, 2.0);
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let c = Point::new(self.x, self.y);
        let r = self.size + self.pulse.sin() * 2.0;
        let alpha = self.life * 0.9;
        let col = self.color;

        surface.save();
        let glow = Paint::radial(
            c,
            r * 6.0,
            [
                (0.0, col.shift(0.0, 0.0, 15.0).rgba(alpha * 0.4)),
                (0.3, col.shift(10.0, -10.0, 0.0).rgba(alpha * 0.2)),
                (1.0, col.shift(20.0, -20.0, -10.0).rgba(0.0)),
            ],
        );
        surface.fill_circle(c, r * 6.0, &glow);

        let lit = Point::new(c.x - r * 0.3, c.y - r * 0.3);
        let body = Paint::radial_from(
            lit,
            c,
            r * 2.0,
            [
                (0.0, Rgba::WHITE.with_alpha(alpha * 0.8)),
                (
                    0.2,
                    Hsl::new(col.h + 5.0, col.s, (col.l + 25.0).min(95.0)).rgba(alpha * 0.7),
                ),
                (0.6, col.rgba(alpha * 0.5)),
                (
                    1.0,
                    Hsl::new(col.h - 10.0, col.s, (col.l - 20.0).max(30.0)).rgba(alpha * 0.2),
                ),
            ],
        );
        surface.fill_circle(c, r * 2.0, &body);

        let core_r = r * 0.4;
        let core = Paint::radial_from(
            Point::new(c.x - core_r * 0.4, c.y - core_r * 0.4),
            c,
            core_r,
            [
                (0.0, Rgba::WHITE.with_alpha(alpha)),
                (0.5, Rgba::hsla(col.h + 15.0, 90.0, 85.0, alpha * 0.8)),
                (1.0, Rgba::hsla(col.h, 80.0, 70.0, alpha * 0.3)),
            ],
        );
        surface.fill_circle(c, core_r, &core);
        surface.restore();
    }
}
