// Copyright (c) 2026 rezky_nightky

use rand::distr::{Distribution, Uniform};
use rand::Rng;

use super::{span, SimRng, Simulate};
use crate::color::Rgba;
use crate::surface::{Point, Surface, TextAlign};
use crate::viewport::Viewport;

// Half-width katakana, one terminal column each.
const KATAKANA: std::ops::RangeInclusive<u32> = 0xFF66..=0xFF9D;
const RAIN_GREEN: Rgba = Rgba::rgb8(0x00, 0xff, 0x41);
const CHANGE_EVERY: u32 = 10;

fn random_glyph(rng: &mut SimRng) -> char {
    let kana = KATAKANA.end() - KATAKANA.start() + 1;
    let Ok(pool) = Uniform::new(0, kana + 2) else {
        return '0';
    };
    match pool.sample(rng) {
        0 => '0',
        1 => '1',
        i => char::from_u32(KATAKANA.start() + i - 2).unwrap_or('1'),
    }
}

#[derive(Clone, Debug)]
pub struct MatrixChar {
    x: f32,
    y: f32,
    speed: f32,
    ch: char,
    opacity: f32,
    change_time: u32,
}

impl MatrixChar {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        Self {
            x: rng.random::<f32>() * viewport.width,
            y: rng.random::<f32>() * viewport.height,
            speed: span(rng, 1.0, 3.0),
            ch: random_glyph(rng),
            opacity: rng.random::<f32>(),
            change_time: 0,
        }
    }
}

impl Simulate for MatrixChar {
    fn update(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.y += self.speed;
        self.change_time += 1;

        if self.change_time > CHANGE_EVERY {
            self.ch = random_glyph(rng);
            self.change_time = 0;
        }

        if self.y > viewport.height {
            self.y = -20.0;
            self.x = rng.random::<f32>() * viewport.width;
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        surface.save();
        surface.set_global_alpha(self.opacity);
        let mut buf = [0u8; 4];
        surface.fill_text(
            self.ch.encode_utf8(&mut buf),
            Point::new(self.x, self.y),
            RAIN_GREEN,
            TextAlign::Left,
        );
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn glyphs_come_from_the_rain_pool() {
        let mut rng = SimRng::seed_from_u64(9);
        for _ in 0..2000 {
            let c = random_glyph(&mut rng);
            assert!(c == '0' || c == '1' || KATAKANA.contains(&(c as u32)));
        }
    }

    #[test]
    fn glyph_changes_on_the_eleventh_frame() {
        let mut rng = SimRng::seed_from_u64(10);
        let vp = Viewport::new(640.0, 100_000.0);
        let mut m = MatrixChar::new(vp, &mut rng);
        for _ in 0..10 {
            m.update(vp, &mut rng);
        }
        assert_eq!(m.change_time, 10);
        m.update(vp, &mut rng);
        assert_eq!(m.change_time, 0);
    }

    #[test]
    fn every_char_wraps_within_a_hundred_frames() {
        let mut rng = SimRng::seed_from_u64(12);
        let vp = Viewport::new(640.0, 90.0);
        let mut rain: Vec<MatrixChar> = (0..50).map(|_| MatrixChar::new(vp, &mut rng)).collect();
        let mut wrapped = vec![false; rain.len()];
        for _ in 0..100 {
            for (m, w) in rain.iter_mut().zip(wrapped.iter_mut()) {
                let before = m.y;
                m.update(vp, &mut rng);
                if m.y < before {
                    *w = true;
                    assert_eq!(m.y, -20.0);
                    assert!((0.0..=vp.width).contains(&m.x));
                }
            }
        }
        assert!(wrapped.iter().all(|w| *w));
    }

    #[test]
    fn fast_chars_wrap_within_a_hundred_frames_at_full_size() {
        let mut rng = SimRng::seed_from_u64(13);
        let vp = Viewport::from_cells(80, 24);
        let mut rain: Vec<MatrixChar> = (0..50).map(|_| MatrixChar::new(vp, &mut rng)).collect();
        let reach: Vec<f32> = rain.iter().map(|m| m.y + m.speed * 100.0).collect();
        let mut wraps = vec![0; rain.len()];
        for _ in 0..100 {
            for (m, n) in rain.iter_mut().zip(wraps.iter_mut()) {
                let before = m.y;
                m.update(vp, &mut rng);
                if m.y < before {
                    *n += 1;
                }
            }
        }
        assert_eq!(rain.len(), 50);
        let mut fast = 0;
        for (r, n) in reach.iter().zip(&wraps) {
            assert!(*n <= 1);
            if (r - vp.height).abs() < 0.5 {
                continue;
            }
            if *r > vp.height {
                fast += 1;
                assert_eq!(*n, 1, "reach {r}");
            } else {
                assert_eq!(*n, 0, "reach {r}");
            }
        }
        assert!(fast > 0);
    }
}
