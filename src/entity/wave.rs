// Copyright (c) 2026 rezky_nightky

use std::f32::consts::PI;

use super::{SimRng, Simulate};
use crate::color::Rgba;
use crate::surface::{Paint, Point, Stroke, Surface};
use crate::viewport::Viewport;

const STEP: f32 = 2.0;
const EDGE_ALPHA: f32 = 0x40 as f32 / 255.0;
const MID_ALPHA: f32 = 0xAA as f32 / 255.0;

// (amplitude, frequency, phase, color, y offset, gradient)
const PRESETS: [(f32, f32, f32, Rgba, f32, bool); 6] = [
    (80.0, 0.006, 0.0, Rgba::rgb8(0xff, 0x6b, 0x35), -60.0, true),
    (60.0, 0.008, PI / 3.0, Rgba::rgb8(0xff, 0x8e, 0x53), -20.0, true),
    (70.0, 0.005, PI / 2.0, Rgba::rgb8(0xff, 0xa7, 0x26), 20.0, true),
    (50.0, 0.009, PI, Rgba::rgb8(0xff, 0xb7, 0x4d), 60.0, true),
    (40.0, 0.007, PI * 1.2, Rgba::rgb8(0xff, 0xcc, 0x80), 100.0, false),
    (35.0, 0.011, PI * 1.8, Rgba::rgb8(0xff, 0x8a, 0x65), -100.0, false),
];

#[derive(Clone, Debug)]
pub struct Wave {
    amplitude: f32,
    frequency: f32,
    phase: f32,
    color: Rgba,
    y_offset: f32,
    gradient: bool,
    time: f32,
    pulse_time: f32,
}

impl Wave {
    pub fn new(
        amplitude: f32,
        frequency: f32,
        phase: f32,
        color: Rgba,
        y_offset: f32,
        gradient: bool,
    ) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
            color,
            y_offset,
            gradient,
            time: 0.0,
            pulse_time: 0.0,
        }
    }

    pub fn preset(index: usize) -> Self {
        let (a, f, p, c, y, g) = PRESETS[index % PRESETS.len()];
        Self::new(a, f, p, c, y, g)
    }

    fn breathing_amplitude(&self) -> f32 {
        self.amplitude + self.pulse_time.sin() * self.amplitude * 0.3
    }

    fn curve(&self, width: f32, height: f32) -> Vec<Point> {
        let amp = self.breathing_amplitude();
        let (f, t, ph) = (self.frequency, self.time, self.phase);
        let base = height / 2.0 + self.y_offset;
        let steps = (width.max(0.0) / STEP) as usize;

        (0..=steps)
            .map(|i| {
                let x = i as f32 * STEP;
                let y = base
                    + (x * f + t + ph).sin() * amp
                    + (x * f * 2.1 + t * 1.3 + ph).sin() * amp * 0.3
                    + (x * f * 0.7 + t * 0.8 + ph).sin() * amp * 0.5;
                Point::new(x, y)
            })
            .collect()
    }
}

impl Simulate for Wave {
    fn update(&mut self, _viewport: Viewport, _rng: &mut SimRng) {
        self.time += 0.008;
        self.pulse_time += 0.005;
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let (w, h) = surface.size();
        let points = self.curve(w, h);
        let paint = if self.gradient {
            Paint::linear(
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                [
                    (0.0, self.color.with_alpha(EDGE_ALPHA)),
                    (0.5, self.color.with_alpha(MID_ALPHA)),
                    (1.0, self.color.with_alpha(EDGE_ALPHA)),
                ],
            )
        } else {
            Paint::Solid(self.color)
        };

        surface.save();
        surface.set_global_alpha(0.6);
        surface.stroke_polyline(&points, &Stroke::new(paint.clone(), 3.0));
        surface.set_global_alpha(0.2);
        surface.stroke_polyline(&points, &Stroke::new(paint, 8.0));
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{Op, RecordingSurface};
    use rand::SeedableRng;

    #[test]
    fn presets_wrap_around() {
        let a = Wave::preset(1);
        let b = Wave::preset(7);
        assert_eq!(a.amplitude, b.amplitude);
        assert_eq!(a.color, b.color);
        assert!(!Wave::preset(4).gradient);
    }

    #[test]
    fn curve_spans_the_width_in_two_pixel_steps() {
        let w = Wave::preset(0);
        let pts = w.curve(640.0, 384.0);
        assert_eq!(pts.len(), 321);
        assert_eq!(pts[0].x, 0.0);
        assert_eq!(pts[320].x, 640.0);
    }

    #[test]
    fn curve_stays_within_the_harmonic_envelope() {
        let mut w = Wave::preset(0);
        let mut rng = SimRng::seed_from_u64(5);
        let vp = Viewport::new(640.0, 384.0);
        for _ in 0..1000 {
            w.update(vp, &mut rng);
        }
        let amp = w.breathing_amplitude();
        assert!(amp <= w.amplitude * 1.3 + 1e-3);
        let base = 384.0 / 2.0 + w.y_offset;
        for p in w.curve(640.0, 384.0) {
            assert!((p.y - base).abs() <= amp * 1.8 + 1e-3);
        }
    }

    #[test]
    fn draws_a_line_and_a_wide_glow() {
        let w = Wave::preset(2);
        let mut s = RecordingSurface::new(640.0, 384.0);
        w.draw(&mut s, &mut SimRng::seed_from_u64(1));
        assert_eq!(
            s.ops,
            vec![
                Op::Save,
                Op::Alpha(0.6),
                Op::StrokePolyline(321),
                Op::Alpha(0.2),
                Op::StrokePolyline(321),
                Op::Restore,
            ]
        );
    }
}
