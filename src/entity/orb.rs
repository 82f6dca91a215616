// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::Rng;

use super::{pick, reflect, signed, span, wrap, Hsl, SimRng, Simulate};
use crate::color::Rgba;
use crate::surface::{Paint, Point, Stroke, Surface};
use crate::viewport::Viewport;

const WARM: [Hsl; 5] = [
    Hsl::new(45.0, 100.0, 70.0),
    Hsl::new(350.0, 80.0, 75.0),
    Hsl::new(55.0, 95.0, 75.0),
    Hsl::new(200.0, 70.0, 80.0),
    Hsl::new(120.0, 60.0, 80.0),
];

const NEON: [Hsl; 6] = [
    Hsl::new(300.0, 100.0, 60.0),
    Hsl::new(180.0, 100.0, 50.0),
    Hsl::new(60.0, 100.0, 50.0),
    Hsl::new(120.0, 100.0, 40.0),
    Hsl::new(270.0, 100.0, 65.0),
    Hsl::new(15.0, 100.0, 55.0),
];

#[derive(Clone, Debug)]
pub struct FloatingOrb {
    x: f32,
    y: f32,
    size: f32,
    vx: f32,
    vy: f32,
    hue: f32,
    opacity: f32,
}

impl FloatingOrb {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        Self {
            x: rng.random::<f32>() * viewport.width,
            y: rng.random::<f32>() * viewport.height,
            size: span(rng, 20.0, 60.0),
            vx: signed(rng, 0.5),
            vy: signed(rng, 0.5),
            hue: rng.random::<f32>() * 360.0,
            opacity: span(rng, 0.1, 0.3),
        }
    }
}

impl Simulate for FloatingOrb {
    fn update(&mut self, viewport: Viewport, _rng: &mut SimRng) {
        self.x += self.vx;
        self.y += self.vy;
        reflect(self.x, &mut self.vx, viewport.width);
        reflect(self.y, &mut self.vy, viewport.height);
        self.hue = (self.hue + 0.5) % 360.0;
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let c = Point::new(self.x, self.y);
        surface.save();
        surface.set_global_alpha(self.opacity);
        let paint = Paint::radial(
            c,
            self.size,
            [
                (0.0, Rgba::hsla(self.hue, 70.0, 60.0, 0.8)),
                (1.0, Rgba::hsla(self.hue, 70.0, 60.0, 0.0)),
            ],
        );
        surface.fill_circle(c, self.size, &paint);
        surface.restore();
    }
}

#[derive(Clone, Debug)]
pub struct FloatingLightOrb {
    x: f32,
    y: f32,
    size: f32,
    vx: f32,
    vy: f32,
    time: f32,
    float_speed: f32,
    opacity: f32,
    color: Hsl,
}

impl FloatingLightOrb {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        Self {
            x: rng.random::<f32>() * viewport.width,
            y: rng.random::<f32>() * viewport.height,
            size: span(rng, 15.0, 25.0),
            vx: signed(rng, 0.3),
            vy: signed(rng, 0.3),
            time: rng.random::<f32>() * TAU,
            float_speed: span(rng, 0.01, 0.02),
            opacity: span(rng, 0.3, 0.4),
            color: pick(rng, &WARM),
        }
    }
}

impl Simulate for FloatingLightOrb {
    fn update(&mut self, viewport: Viewport, _rng: &mut SimRng) {
        self.x += (self.time * self.float_speed).sin() * 0.5;
        self.y += (self.time * self.float_speed * 0.7).cos() * 0.3;
        self.time += 0.02;

        self.x += self.vx;
        self.y += self.vy;

        wrap(&mut self.x, self.size, viewport.width);
        wrap(&mut self.y, self.size, viewport.height);
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let c = Point::new(self.x, self.y);
        let col = self.color;
        let o = self.opacity * (0.7 + (self.time * 2.0).sin() * 0.3);

        surface.save();
        let glow_r = self.size * 4.0;
        let glow = Paint::radial(
            c,
            glow_r,
            [
                (0.0, col.rgba(o * 0.3)),
                (0.4, col.rgba(o * 0.15)),
                (1.0, col.rgba(0.0)),
            ],
        );
        surface.fill_circle(c, glow_r, &glow);

        let lit = Point::new(c.x - self.size * 0.3, c.y - self.size * 0.3);
        let body = Paint::radial_from(
            lit,
            c,
            self.size,
            [
                (0.0, Rgba::WHITE.with_alpha(o * 0.8)),
                (0.3, Hsl::new(col.h, col.s, (col.l + 20.0).min(95.0)).rgba(o * 0.6)),
                (0.7, col.rgba(o * 0.4)),
                (1.0, Hsl::new(col.h, col.s, (col.l - 20.0).max(50.0)).rgba(o * 0.2)),
            ],
        );
        surface.fill_circle(c, self.size, &body);

        let core_r = self.size * 0.3;
        let core = Paint::radial_from(
            Point::new(c.x - core_r * 0.5, c.y - core_r * 0.5),
            c,
            core_r,
            [
                (0.0, Rgba::WHITE.with_alpha(o * 0.9)),
                (0.6, Rgba::hsla(col.h, 80.0, 90.0, o * 0.5)),
                (1.0, Rgba::hsla(col.h, 60.0, 80.0, 0.0)),
            ],
        );
        surface.fill_circle(c, core_r, &core);
        surface.restore();
    }
}

#[derive(Clone, Debug)]
pub struct NeonCyberOrb {
    x: f32,
    y: f32,
    size: f32,
    vx: f32,
    vy: f32,
    time: f32,
    pulse_speed: f32,
    opacity: f32,
    glitch_time: f32,
    glitch: f32,
    flicker_time: f32,
    flickering: bool,
    color: Hsl,
}

impl NeonCyberOrb {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        Self {
            x: rng.random::<f32>() * viewport.width,
            y: rng.random::<f32>() * viewport.height,
            size: span(rng, 20.0, 40.0),
            vx: signed(rng, 1.5),
            vy: signed(rng, 1.5),
            time: rng.random::<f32>() * TAU,
            pulse_speed: span(rng, 0.03, 0.05),
            opacity: span(rng, 0.3, 0.4),
            glitch_time: 0.0,
            glitch: 0.0,
            flicker_time: rng.random::<f32>() * 100.0,
            flickering: false,
            color: pick(rng, &NEON),
        }
    }
}

impl Simulate for NeonCyberOrb {
    fn update(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.x += self.vx;
        self.y += self.vy;
        self.time += self.pulse_speed;
        self.glitch_time += 0.1;
        self.flicker_time += 0.2;

        if reflect(self.x, &mut self.vx, viewport.width) {
            self.vx *= 0.8;
            self.glitch = 1.0;
        }
        if reflect(self.y, &mut self.vy, viewport.height) {
            self.vy *= 0.8;
            self.glitch = 1.0;
        }
        self.glitch *= 0.95;

        self.flickering = self.flicker_time.sin() > 0.7 && rng.random::<f32>() > 0.98;

        self.x = self.x.clamp(0.0, viewport.width.max(0.0));
        self.y = self.y.clamp(0.0, viewport.height.max(0.0));
    }

    fn draw(&self, surface: &mut dyn Surface, rng: &mut SimRng) {
        let h = self.color.h;
        surface.save();
        if self.flickering {
            surface.set_global_alpha(span(rng, 0.5, 0.5));
        }

        let size = self.size * (self.time.sin() * 0.2 + 1.0);
        let o = self.opacity * ((self.time * 2.0).sin() * 0.3 + 1.0);
        let c = Point::new(
            self.x + signed(rng, self.glitch * 10.0),
            self.y + signed(rng, self.glitch * 10.0),
        );

        let outer_r = self.size * 8.0;
        let outer = Paint::radial(
            c,
            outer_r,
            [
                (0.0, Rgba::hsla(h, 100.0, 70.0, o * 0.5)),
                (0.2, Rgba::hsla(h, 100.0, 60.0, o * 0.25)),
                (0.5, Rgba::hsla(h, 90.0, 50.0, o * 0.12)),
                (1.0, Rgba::hsla(h, 80.0, 40.0, 0.0)),
            ],
        );
        surface.fill_circle(c, outer_r, &outer);

        let mid_r = size * 3.0;
        let mid = Paint::radial(
            c,
            mid_r,
            [
                (0.0, Rgba::hsla(h, 100.0, 80.0, o * 0.7)),
                (0.4, Rgba::hsla(h, 100.0, 70.0, o * 0.45)),
                (0.8, Rgba::hsla(h, 90.0, 60.0, o * 0.2)),
                (1.0, Rgba::hsla(h, 80.0, 50.0, 0.0)),
            ],
        );
        surface.fill_circle(c, mid_r, &mid);

        let body = Paint::radial_from(
            Point::new(c.x - size * 0.3, c.y - size * 0.3),
            c,
            size,
            [
                (0.0, Rgba::WHITE.with_alpha(o * 0.6)),
                (0.2, Rgba::hsla(h, 100.0, 90.0, o * 0.5)),
                (0.6, Rgba::hsla(h, 100.0, 70.0, o * 0.4)),
                (1.0, Rgba::hsla(h, 90.0, 50.0, o * 0.2)),
            ],
        );
        surface.fill_circle(c, size, &body);

        let core_r = size * 0.4;
        let core = Paint::radial_from(
            Point::new(c.x - core_r * 0.4, c.y - core_r * 0.4),
            c,
            core_r,
            [
                (0.0, Rgba::WHITE.with_alpha(o * 0.8)),
                (0.3, Rgba::hsla(h, 100.0, 95.0, o * 0.6)),
                (0.7, Rgba::hsla(h, 100.0, 80.0, o * 0.4)),
                (1.0, Rgba::hsla(h, 90.0, 70.0, 0.0)),
            ],
        );
        surface.fill_circle(c, core_r, &core);

        if rng.random::<f32>() > 0.95 {
            let ring = Stroke::new(Rgba::hsla(h, 100.0, 80.0, o * 0.5), 1.5);
            surface.stroke_circle(c, size * 1.5, &ring);
        }
        surface.restore();
    }
}
