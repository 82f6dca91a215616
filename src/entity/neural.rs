// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::Rng;

use super::{reflect, signed, span, SimRng, Simulate};
use crate::color::Rgba;
use crate::surface::{Paint, Point, Stroke, Surface, TextAlign};
use crate::viewport::Viewport;

pub const LINK_RANGE: f32 = 200.0;
const PULSE_CHANCE: f32 = 0.03;
const STREAM_REACH: f32 = 50.0;
const STREAMS: usize = 8;

#[derive(Clone, Copy, Debug)]
struct DataStream {
    angle: f32,
    distance: f32,
    opacity: f32,
    ch: char,
}

fn bit(rng: &mut SimRng) -> char {
    if rng.random::<f32>() > 0.5 {
        '1'
    } else {
        '0'
    }
}

#[derive(Clone, Debug)]
pub struct NeuralNode {
    x: f32,
    y: f32,
    size: f32,
    vx: f32,
    vy: f32,
    activity: f32,
    pulse: f32,
    ring_rotation: f32,
    ring_value: Option<u8>,
    streams: [DataStream; STREAMS],
}

impl NeuralNode {
    pub fn new(viewport: Viewport, rng: &mut SimRng) -> Self {
        let x = rng.random::<f32>() * viewport.width;
        let y = rng.random::<f32>() * viewport.height;
        let size = span(rng, 2.0, 4.0);
        let vx = signed(rng, 0.5);
        let vy = signed(rng, 0.5);
        let activity = rng.random::<f32>().clamp(0.3, 0.8);
        let ring_value = (rng.random::<f32>() > 0.7).then(|| rng.random_range(0..100u8));
        let streams = std::array::from_fn(|i| DataStream {
            angle: i as f32 / STREAMS as f32 * TAU,
            distance: 0.0,
            opacity: 1.0,
            ch: bit(rng),
        });
        Self {
            x,
            y,
            size,
            vx,
            vy,
            activity,
            pulse: 0.0,
            ring_rotation: 0.0,
            ring_value,
            streams,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn activity(&self) -> f32 {
        self.activity
    }

    fn link_color(&self, opacity: f32) -> Rgba {
        Rgba::hsla(280.0 + self.activity * 60.0, 85.0, 75.0, opacity * self.activity)
    }
}

impl Simulate for NeuralNode {
    fn update(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.x += self.vx;
        self.y += self.vy;
        reflect(self.x, &mut self.vx, viewport.width);
        reflect(self.y, &mut self.vy, viewport.height);

        self.activity = (self.activity + signed(rng, 0.02)).clamp(0.3, 0.8);
        self.pulse += 0.00625;
        self.ring_rotation += 0.00125;

        for s in &mut self.streams {
            s.distance += 0.0625;
            s.opacity = (1.0 - s.distance / STREAM_REACH).max(0.0);
            if s.distance > STREAM_REACH {
                s.distance = 0.0;
                s.opacity = 1.0;
                s.ch = bit(rng);
            }
        }

        if self.ring_value.is_some() && rng.random::<f32>() < 0.01 {
            self.ring_value = Some(rng.random_range(0..100u8));
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _rng: &mut SimRng) {
        let a = self.activity;
        let c = self.position();
        let pulse_size = self.size + self.pulse.sin() * 1.2;
        let alpha = 0.6 + a * 0.4;

        surface.save();

        let glow_r = pulse_size * 4.0;
        let glow = Paint::radial(
            c,
            glow_r,
            [
                (0.0, Rgba::hsla(280.0 + a * 30.0, 80.0, 70.0, alpha * 0.4)),
                (0.3, Rgba::hsla(240.0 + a * 40.0, 70.0, 60.0, alpha * 0.25)),
                (1.0, Rgba::hsla(200.0 + a * 50.0, 60.0, 50.0, 0.0)),
            ],
        );
        surface.fill_circle(c, glow_r, &glow);

        let body_r = pulse_size * 2.0;
        let body = Paint::radial(
            c,
            body_r,
            [
                (0.0, Rgba::hsla(280.0 + a * 60.0, 90.0, 85.0, alpha)),
                (0.4, Rgba::hsla(240.0 + a * 80.0, 80.0, 75.0, alpha * 0.8)),
                (0.8, Rgba::hsla(200.0 + a * 100.0, 70.0, 65.0, alpha * 0.4)),
                (1.0, Rgba::hsla(160.0 + a * 120.0, 60.0, 55.0, 0.0)),
            ],
        );
        surface.fill_circle(c, body_r, &body);

        surface.set_global_alpha(alpha);
        surface.fill_circle(c, pulse_size * 0.6, &Rgba::hsl(300.0 + a * 60.0, 95.0, 90.0).into());
        surface.set_global_alpha(alpha * 1.2);
        surface.fill_circle(c, pulse_size * 0.2, &Rgba::hsl(320.0 + a * 40.0, 100.0, 95.0).into());

        if let Some(value) = self.ring_value {
            let ring_r = pulse_size * 6.0;
            let (start, end) = (self.ring_rotation, self.ring_rotation + TAU);
            let inner = Stroke::new(Rgba::hsla(280.0 + a * 60.0, 90.0, 80.0, alpha * 0.6), 1.5)
                .dashed(3.0, 3.0);
            surface.stroke_arc(c, ring_r, start, end, &inner);
            let outer = Stroke::new(Rgba::hsla(260.0 + a * 40.0, 85.0, 75.0, alpha * 0.3), 0.8)
                .dashed(2.0, 4.0);
            surface.stroke_arc(c, ring_r + 8.0, start, end, &outer);
            surface.fill_text(
                &value.to_string(),
                Point::new(c.x, c.y + 4.0),
                Rgba::hsla(300.0 + a * 40.0, 95.0, 85.0, alpha),
                TextAlign::Center,
            );
        }

        let digit_color = Rgba::hsl(200.0 + a * 80.0, 90.0, 80.0);
        for s in self.streams.iter().filter(|s| s.opacity > 0.1) {
            let p = Point::new(
                c.x + s.angle.cos() * s.distance,
                c.y + s.angle.sin() * s.distance,
            );
            surface.save();
            surface.set_global_alpha(s.opacity * alpha * 1.2);
            surface.fill_text(&s.ch.to_string(), p, digit_color, TextAlign::Center);
            surface.restore();
        }

        if a > 0.7 {
            let r = pulse_size * 8.0 + (self.pulse * 2.0).sin() * 3.0;
            let contour = Stroke::new(Rgba::hsla(320.0 + a * 40.0, 95.0, 85.0, alpha * 0.6), 2.0)
                .dashed(1.0, 2.0);
            surface.stroke_circle(c, r, &contour);
        }

        surface.restore();
    }
}

/// Visual weight of the link between two nodes, or `None` when they are out
/// of range. Symmetric in its arguments.
pub fn link_weight(p: &NeuralNode, q: &NeuralNode) -> Option<f32> {
    let d = p.position().distance(q.position());
    if d >= LINK_RANGE {
        return None;
    }
    let mean = (p.activity + q.activity) / 2.0;
    Some((LINK_RANGE - d) / LINK_RANGE * 0.7 * mean)
}

pub fn draw_connections(nodes: &[&NeuralNode], surface: &mut dyn Surface, rng: &mut SimRng) {
    surface.save();
    for (i, p) in nodes.iter().enumerate() {
        for q in &nodes[i + 1..] {
            let (a, b) = (p.position(), q.position());
            let d = a.distance(b);
            if d >= LINK_RANGE {
                continue;
            }
            let opacity = (LINK_RANGE - d) / LINK_RANGE * 0.7;
            let mean = (p.activity + q.activity) / 2.0;

            let paint = Paint::linear(
                a,
                b,
                [
                    (0.0, p.link_color(opacity)),
                    (0.5, Rgba::hsla(240.0 + mean * 80.0, 80.0, 70.0, opacity * mean * 1.2)),
                    (1.0, q.link_color(opacity)),
                ],
            );
            surface.stroke_line(a, b, &Stroke::new(paint, 0.8 + mean * 0.4));

            if rng.random::<f32>() < PULSE_CHANCE {
                let t = rng.random::<f32>();
                let at = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
                surface.set_global_alpha(0.8);
                let signal = Paint::radial(
                    at,
                    3.0,
                    [
                        (0.0, Rgba::WHITE),
                        (0.4, Rgba::rgb8(0xa7, 0x8b, 0xfa)),
                        (1.0, Rgba::rgba8(167, 139, 250, 0.0)),
                    ],
                );
                surface.fill_circle(at, 3.0, &signal);
                surface.set_global_alpha(1.0);
            }
        }
    }
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;
    use rand::SeedableRng;

    fn node_at(rng: &mut SimRng, x: f32, y: f32, activity: f32) -> NeuralNode {
        let mut n = NeuralNode::new(Viewport::new(1000.0, 1000.0), rng);
        n.x = x;
        n.y = y;
        n.activity = activity;
        n
    }

    #[test]
    fn activity_stays_clamped() {
        let mut rng = SimRng::seed_from_u64(1);
        let vp = Viewport::new(800.0, 600.0);
        let mut n = NeuralNode::new(vp, &mut rng);
        for _ in 0..5000 {
            n.update(vp, &mut rng);
            assert!((0.3..=0.8).contains(&n.activity));
        }
    }

    #[test]
    fn streams_fly_out_and_reset() {
        let mut rng = SimRng::seed_from_u64(2);
        let vp = Viewport::new(800.0, 600.0);
        let mut n = NeuralNode::new(vp, &mut rng);
        let mut max_seen = 0.0f32;
        for _ in 0..2000 {
            n.update(vp, &mut rng);
            for s in &n.streams {
                assert!(s.distance <= STREAM_REACH);
                assert!((0.0..=1.0).contains(&s.opacity));
                max_seen = max_seen.max(s.distance);
            }
        }
        assert!(max_seen > 49.0);
    }

    #[test]
    fn link_weight_is_symmetric_and_bounded() {
        let mut rng = SimRng::seed_from_u64(3);
        let p = node_at(&mut rng, 100.0, 100.0, 0.4);
        let q = node_at(&mut rng, 180.0, 160.0, 0.75);
        let far = node_at(&mut rng, 400.0, 100.0, 0.5);

        let w = link_weight(&p, &q).unwrap();
        assert_eq!(Some(w), link_weight(&q, &p));
        assert!(w > 0.0 && w < 0.7);
        assert!(link_weight(&p, &far).is_none());
        assert!(link_weight(&far, &p).is_none());
    }

    #[test]
    fn each_pair_in_range_is_linked_once() {
        let mut rng = SimRng::seed_from_u64(4);
        let a = node_at(&mut rng, 100.0, 100.0, 0.5);
        let b = node_at(&mut rng, 150.0, 100.0, 0.5);
        let c = node_at(&mut rng, 100.0, 150.0, 0.5);
        let lonely = node_at(&mut rng, 900.0, 900.0, 0.5);
        let nodes = [&a, &b, &c, &lonely];

        let mut s = RecordingSurface::new(1000.0, 1000.0);
        draw_connections(&nodes, &mut s, &mut rng);
        let lines = s.lines();
        assert_eq!(lines.len(), 3);

        let touches = |n: &NeuralNode| {
            lines
                .iter()
                .filter(|(f, t, _)| *f == n.position() || *t == n.position())
                .count()
        };
        assert_eq!(touches(&a), 2);
        assert_eq!(touches(&lonely), 0);
    }

    #[test]
    fn swapped_pair_draws_the_same_line_width() {
        let mut rng = SimRng::seed_from_u64(5);
        let p = node_at(&mut rng, 10.0, 10.0, 0.3);
        let q = node_at(&mut rng, 60.0, 70.0, 0.8);

        let mut s1 = RecordingSurface::new(200.0, 200.0);
        draw_connections(&[&p, &q], &mut s1, &mut rng);
        let mut s2 = RecordingSurface::new(200.0, 200.0);
        draw_connections(&[&q, &p], &mut s2, &mut rng);

        let (w1, w2) = (s1.lines()[0].2, s2.lines()[0].2);
        assert_eq!(w1, w2);
    }

    #[test]
    fn drifts_back_after_the_viewport_shrinks() {
        let mut rng = SimRng::seed_from_u64(6);
        let mut n = node_at(&mut rng, 900.0, 300.0, 0.5);
        n.vx = 0.2;
        let small = Viewport::new(400.0, 400.0);
        for _ in 0..5000 {
            n.update(small, &mut rng);
        }
        assert!(n.x >= -n.size && n.x <= small.width + n.size);
    }
}
