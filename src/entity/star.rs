// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::Rng;

use super::{span, SimRng, Simulate};
use crate::color::Rgba;
use crate::surface::{Paint, Point, Stroke, Surface};
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Spectral {
    BlueWhite,
    White,
    YellowWhite,
    Orange,
    Red,
    Blue,
}

impl Spectral {
    const ALL: [Spectral; 6] = [
        Spectral::BlueWhite,
        Spectral::White,
        Spectral::YellowWhite,
        Spectral::Orange,
        Spectral::Red,
        Spectral::Blue,
    ];

    // (halo, core)
    fn colors(self) -> (Rgba, Rgba) {
        match self {
            Spectral::BlueWhite => (Rgba::rgb8(155, 176, 255), Rgba::rgb8(200, 210, 255)),
            Spectral::White => (Rgba::rgb8(255, 255, 255), Rgba::rgb8(255, 255, 255)),
            Spectral::YellowWhite => (Rgba::rgb8(255, 244, 234), Rgba::rgb8(255, 250, 240)),
            Spectral::Orange => (Rgba::rgb8(255, 209, 148), Rgba::rgb8(255, 230, 180)),
            Spectral::Red => (Rgba::rgb8(255, 181, 108), Rgba::rgb8(255, 200, 140)),
            Spectral::Blue => (Rgba::rgb8(162, 192, 255), Rgba::rgb8(180, 200, 255)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TwinklingStar {
    x: f32,
    y: f32,
    size: f32,
    twinkle_speed: f32,
    time: f32,
    brightness: f32,
    spectral: Spectral,
    main_sequence: bool,
}

impl TwinklingStar {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        let mut star = Self {
            x: rng.random::<f32>() * viewport.width,
            y: rng.random::<f32>() * viewport.height,
            size: span(rng, 0.5, 2.5),
            twinkle_speed: span(rng, 0.02, 0.08),
            time: rng.random::<f32>() * TAU,
            brightness: span(rng, 0.1, 0.9),
            spectral: Spectral::ALL[rng.random_range(0..Spectral::ALL.len())],
            main_sequence: rng.random::<f32>() > 0.8,
        };
        if star.main_sequence {
            star.size *= 1.5;
            star.brightness *= 1.3;
        }
        star
    }

    fn twinkle(&self) -> f32 {
        self.time.sin() * 0.4 + 0.6
    }
}

impl Simulate for TwinklingStar {
    fn update(&mut self, _viewport: Viewport, _rng: &mut SimRng) {
        self.time += self.twinkle_speed;
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let c = Point::new(self.x, self.y);
        let twinkle = self.twinkle();
        let alpha = self.brightness * twinkle;
        let (halo, core) = self.spectral.colors();

        surface.save();
        let glow_r = if self.main_sequence {
            self.size * 6.0
        } else {
            self.size * 4.0
        };
        let glow = Paint::radial(
            c,
            glow_r,
            [
                (0.0, core.with_alpha(alpha)),
                (0.3, halo.with_alpha(alpha)),
                (0.6, halo.with_alpha(alpha * 0.4)),
                (1.0, halo.with_alpha(0.0)),
            ],
        );
        surface.fill_circle(c, glow_r, &glow);
        surface.fill_circle(c, self.size * 0.8, &core.with_alpha(alpha).into());

        if self.main_sequence && twinkle > 0.6 {
            let ray = self.size * 8.0;
            let spike = Stroke::new(halo.with_alpha(alpha), 0.8);
            surface.set_global_alpha(alpha * 0.7);
            surface.stroke_line(Point::new(c.x - ray, c.y), Point::new(c.x + ray, c.y), &spike);
            surface.stroke_line(Point::new(c.x, c.y - ray), Point::new(c.x, c.y + ray), &spike);

            let d = ray * 0.7;
            let faint = Stroke::new(halo.with_alpha(alpha), 0.5);
            surface.set_global_alpha(alpha * 0.4);
            surface.stroke_line(Point::new(c.x - d, c.y - d), Point::new(c.x + d, c.y + d), &faint);
            surface.stroke_line(Point::new(c.x - d, c.y + d), Point::new(c.x + d, c.y - d), &faint);
        }
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;
    use rand::SeedableRng;

    #[test]
    fn main_sequence_stars_are_boosted() {
        let mut rng = SimRng::seed_from_u64(61);
        let vp = Viewport::new(800.0, 600.0);
        let stars: Vec<_> = (0..500).map(|_| TwinklingStar::new(vp, &mut rng)).collect();
        let bright = stars.iter().filter(|s| s.main_sequence).count();
        assert!((50..150).contains(&bright), "{bright} of 500");
        for s in &stars {
            if s.main_sequence {
                assert!(s.size >= 0.75 && s.size < 4.5);
            } else {
                assert!((0.5..3.0).contains(&s.size));
                assert!((0.1..1.0).contains(&s.brightness));
            }
        }
    }

    #[test]
    fn spikes_only_near_peak_twinkle() {
        let mut rng = SimRng::seed_from_u64(62);
        let vp = Viewport::new(800.0, 600.0);
        let mut star = TwinklingStar::new(vp, &mut rng);
        star.main_sequence = true;

        star.time = std::f32::consts::FRAC_PI_2;
        let mut s = RecordingSurface::new(vp.width, vp.height);
        star.draw(&mut s, &mut rng);
        assert_eq!(s.lines().len(), 4);

        star.time = -std::f32::consts::FRAC_PI_2;
        let mut s = RecordingSurface::new(vp.width, vp.height);
        star.draw(&mut s, &mut rng);
        assert!(s.lines().is_empty());
    }

    #[test]
    fn stars_never_move() {
        let mut rng = SimRng::seed_from_u64(63);
        let vp = Viewport::new(800.0, 600.0);
        let mut star = TwinklingStar::new(vp, &mut rng);
        let (x, y) = (star.x, star.y);
        for _ in 0..100 {
            star.update(vp, &mut rng);
        }
        assert_eq!((star.x, star.y), (x, y));
    }
}
