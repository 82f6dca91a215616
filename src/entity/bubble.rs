// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::Rng;

use super::{pick, signed, span, wrap, Hsl, SimRng, Simulate};
use crate::color::Rgba;
use crate::surface::{Paint, Point, Surface};
use crate::viewport::Viewport;

const SUNLIT: [Hsl; 5] = [
    Hsl::new(45.0, 80.0, 75.0),
    Hsl::new(35.0, 85.0, 70.0),
    Hsl::new(55.0, 90.0, 80.0),
    Hsl::new(25.0, 75.0, 65.0),
    Hsl::new(60.0, 95.0, 85.0),
];

const SPAWN_DEPTH: f32 = 200.0;
const MIN_LIFE: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct FloatingBubble {
    x: f32,
    y: f32,
    size: f32,
    vx: f32,
    vy: f32,
    time: f32,
    float_speed: f32,
    opacity: f32,
    life: f32,
    color: Hsl,
}

impl FloatingBubble {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        let mut b = Self {
            x: 0.0,
            y: 0.0,
            size: 0.0,
            vx: 0.0,
            vy: 0.0,
            time: rng.random::<f32>() * TAU,
            float_speed: span(rng, 0.01, 0.02),
            opacity: span(rng, 0.2, 0.6),
            life: 1.0,
            color: pick(rng, &SUNLIT),
        };
        b.respawn(viewport, rng);
        b
    }

    fn respawn(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.x = rng.random::<f32>() * viewport.width;
        self.y = viewport.height + rng.random::<f32>() * SPAWN_DEPTH;
        self.size = span(rng, 20.0, 60.0);
        self.life = 1.0;
        self.vy = -span(rng, 0.3, 0.8);
        self.vx = signed(rng, 0.4);
    }
}

impl Simulate for FloatingBubble {
    fn update(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.x += (self.time * self.float_speed).sin() * 0.8;
        self.y += self.vy;
        self.x += self.vx;
        self.time += 0.02;

        self.size *= 0.9995;
        self.life *= 0.998;

        if self.y < -self.size || self.life < MIN_LIFE {
            self.respawn(viewport, rng);
        }
        wrap(&mut self.x, self.size, viewport.width);
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let c = Point::new(self.x, self.y);
        let col = self.color;
        let s = self.size;
        let o = self.opacity * self.life * (0.8 + (self.time * 3.0).sin() * 0.2);

        surface.save();
        let glow = Paint::radial(
            c,
            s * 2.0,
            [
                (0.0, col.shift(0.0, 0.0, 10.0).rgba(o * 0.3)),
                (0.7, col.shift(10.0, -10.0, 0.0).rgba(o * 0.1)),
                (1.0, col.shift(20.0, -20.0, -10.0).rgba(0.0)),
            ],
        );
        surface.fill_circle(c, s * 2.0, &glow);

        let shell = Paint::radial_from(
            Point::new(c.x - s * 0.3, c.y - s * 0.3),
            c,
            s,
            [
                (0.0, Rgba::WHITE.with_alpha(o * 0.4)),
                (0.3, col.shift(0.0, 0.0, 15.0).rgba(o * 0.3)),
                (0.7, col.rgba(o * 0.2)),
                (1.0, col.shift(-10.0, 0.0, -15.0).rgba(o * 0.1)),
            ],
        );
        surface.fill_circle(c, s, &shell);

        let shine = Paint::radial_from(
            Point::new(c.x - s * 0.4, c.y - s * 0.4),
            Point::new(c.x - s * 0.2, c.y - s * 0.2),
            s * 0.5,
            [
                (0.0, Rgba::WHITE.with_alpha(o * 0.8)),
                (0.5, Rgba::WHITE.with_alpha(o * 0.3)),
                (1.0, Rgba::WHITE.with_alpha(0.0)),
            ],
        );
        surface.fill_circle(Point::new(c.x - s * 0.3, c.y - s * 0.3), s * 0.4, &shine);
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn bubbles_start_below_the_bottom_edge() {
        let mut rng = SimRng::seed_from_u64(51);
        let vp = Viewport::new(640.0, 384.0);
        for _ in 0..100 {
            let b = FloatingBubble::new(vp, &mut rng);
            assert!(b.y >= vp.height && b.y < vp.height + SPAWN_DEPTH);
            assert!((20.0..80.0).contains(&b.size));
            assert!(b.vy <= -0.3 && b.vy > -1.1);
        }
    }

    #[test]
    fn bubbles_rise_shrink_and_respawn() {
        let mut rng = SimRng::seed_from_u64(52);
        let vp = Viewport::new(640.0, 384.0);
        let mut b = FloatingBubble::new(vp, &mut rng);
        let mut respawned = false;
        for _ in 0..5000 {
            let (y, size) = (b.y, b.size);
            b.update(vp, &mut rng);
            assert!(b.life >= MIN_LIFE && b.life <= 1.0);
            if b.y > y {
                respawned = true;
                assert_eq!(b.life, 1.0);
                assert!(b.y >= vp.height);
            } else {
                assert!(b.size < size);
            }
        }
        assert!(respawned);
    }

    #[test]
    fn faded_bubble_respawns_even_mid_screen() {
        let mut rng = SimRng::seed_from_u64(53);
        let vp = Viewport::new(640.0, 384.0);
        let mut b = FloatingBubble::new(vp, &mut rng);
        b.y = 200.0;
        b.life = MIN_LIFE;
        b.update(vp, &mut rng);
        assert_eq!(b.life, 1.0);
        assert!(b.y >= vp.height);
    }
}
