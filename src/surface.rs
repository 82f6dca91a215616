// Copyright (c) 2026 rezky_nightky

use crate::color::{lerp_premul, Premul, Rgba, TRANSPARENT_PREMUL};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

fn collect_stops(stops: impl IntoIterator<Item = (f32, Rgba)>) -> Vec<ColorStop> {
    stops
        .into_iter()
        .map(|(offset, color)| ColorStop { offset, color })
        .collect()
}

pub fn sample_stops(stops: &[ColorStop], t: f32) -> Premul {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return TRANSPARENT_PREMUL;
    };
    if t <= first.offset {
        return first.color.premultiplied();
    }
    if t >= last.offset {
        return last.color.premultiplied();
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > f32::EPSILON {
                (t - a.offset) / span
            } else {
                1.0
            };
            return lerp_premul(a.color.premultiplied(), b.color.premultiplied(), local);
        }
    }
    last.color.premultiplied()
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub focus: Point,
    pub center: Point,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    fn t_at(&self, p: Point) -> Option<f32> {
        if self.radius <= 0.0 || !self.radius.is_finite() {
            return None;
        }
        let (qx, qy) = (p.x - self.focus.x, p.y - self.focus.y);
        let (dx, dy) = (self.center.x - self.focus.x, self.center.y - self.focus.y);
        let a = dx * dx + dy * dy - self.radius * self.radius;
        let b = qx * dx + qy * dy;
        let c = qx * qx + qy * qy;

        if a.abs() < 1e-6 {
            if b <= 0.0 {
                return None;
            }
            return Some(c / (2.0 * b));
        }
        let disc = b * b - a * c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t = ((b + sq) / a).max((b - sq) / a);
        (t >= 0.0).then_some(t)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub from: Point,
    pub to: Point,
    pub stops: Vec<ColorStop>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
    Linear(LinearGradient),
}

impl Paint {
    pub fn radial(
        center: Point,
        radius: f32,
        stops: impl IntoIterator<Item = (f32, Rgba)>,
    ) -> Self {
        Self::radial_from(center, center, radius, stops)
    }

    pub fn radial_from(
        focus: Point,
        center: Point,
        radius: f32,
        stops: impl IntoIterator<Item = (f32, Rgba)>,
    ) -> Self {
        Paint::Radial(RadialGradient {
            focus,
            center,
            radius,
            stops: collect_stops(stops),
        })
    }

    pub fn linear(from: Point, to: Point, stops: impl IntoIterator<Item = (f32, Rgba)>) -> Self {
        Paint::Linear(LinearGradient {
            from,
            to,
            stops: collect_stops(stops),
        })
    }

    pub fn sample(&self, p: Point) -> Premul {
        match self {
            Paint::Solid(c) => c.premultiplied(),
            Paint::Radial(g) => match g.t_at(p) {
                Some(t) => sample_stops(&g.stops, t.min(1.0)),
                None => TRANSPARENT_PREMUL,
            },
            Paint::Linear(g) => {
                let (dx, dy) = (g.to.x - g.from.x, g.to.y - g.from.y);
                let len2 = dx * dx + dy * dy;
                if len2 <= f32::EPSILON {
                    return TRANSPARENT_PREMUL;
                }
                let t = ((p.x - g.from.x) * dx + (p.y - g.from.y) * dy) / len2;
                sample_stops(&g.stops, t.clamp(0.0, 1.0))
            }
        }
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
    pub dash: Option<(f32, f32)>,
}

impl Stroke {
    pub fn new(paint: impl Into<Paint>, width: f32) -> Self {
        Self {
            paint: paint.into(),
            width,
            dash: None,
        }
    }

    pub fn dashed(mut self, on: f32, off: f32) -> Self {
        self.dash = Some((on, off));
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOp {
    SourceOver,
    Screen,
    Multiply,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

pub trait Surface {
    fn size(&self) -> (f32, f32);

    fn save(&mut self);
    fn restore(&mut self);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_composite(&mut self, op: CompositeOp);

    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);
    fn fill_polygon(&mut self, points: &[Point], paint: &Paint);
    fn stroke_arc(&mut self, center: Point, radius: f32, start: f32, end: f32, stroke: &Stroke);
    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke);
    fn fill_text(&mut self, text: &str, pos: Point, color: Rgba, align: TextAlign);

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke) {
        self.stroke_arc(center, radius, 0.0, std::f32::consts::TAU, stroke);
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.stroke_polyline(&[from, to], stroke);
    }
}

#[cfg(test)]
pub mod testing {

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Op {
        Save,
        Restore,
        Alpha(f32),
        Composite(CompositeOp),
        Clear,
        FillRect(Rgba),
        FillCircle { center: Point, radius: f32 },
        FillPolygon(usize),
        StrokeArc { center: Point, radius: f32 },
        StrokeLine { from: Point, to: Point, width: f32 },
        StrokePolyline(usize),
        Text(String),
    }

    pub struct RecordingSurface {
        pub width: f32,
        pub height: f32,
        pub ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                width,
                height,
                ops: Vec::new(),
            }
        }

        pub fn lines(&self) -> Vec<(Point, Point, f32)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::StrokeLine { from, to, width } => Some((*from, *to, *width)),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (f32, f32) {
            (self.width, self.height)
        }
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
        fn set_global_alpha(&mut self, alpha: f32) {
            self.ops.push(Op::Alpha(alpha));
        }
        fn set_composite(&mut self, op: CompositeOp) {
            self.ops.push(Op::Composite(op));
        }
        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }
        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, color: Rgba) {
            self.ops.push(Op::FillRect(color));
        }
        fn fill_circle(&mut self, center: Point, radius: f32, _paint: &Paint) {
            self.ops.push(Op::FillCircle { center, radius });
        }
        fn fill_polygon(&mut self, points: &[Point], _paint: &Paint) {
            self.ops.push(Op::FillPolygon(points.len()));
        }
        fn stroke_arc(&mut self, center: Point, radius: f32, _s: f32, _e: f32, _st: &Stroke) {
            self.ops.push(Op::StrokeArc { center, radius });
        }
        fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
            if let [from, to] = points {
                self.ops.push(Op::StrokeLine {
                    from: *from,
                    to: *to,
                    width: stroke.width,
                });
            } else {
                self.ops.push(Op::StrokePolyline(points.len()));
            }
        }
        fn fill_text(&mut self, text: &str, _pos: Point, _color: Rgba, _align: TextAlign) {
            self.ops.push(Op::Text(text.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radial_gradient_runs_from_center_to_edge() {
        let p = Paint::radial(
            Point::new(0.0, 0.0),
            10.0,
            [(0.0, Rgba::WHITE), (1.0, Rgba::WHITE.with_alpha(0.0))],
        );
        assert_eq!(p.sample(Point::new(0.0, 0.0))[3], 1.0);
        assert!((p.sample(Point::new(5.0, 0.0))[3] - 0.5).abs() < 1e-4);
        assert_eq!(p.sample(Point::new(0.0, 20.0))[3], 0.0);
    }

    #[test]
    fn offset_focus_is_brightest_at_focus() {
        let p = Paint::radial_from(
            Point::new(-3.0, -3.0),
            Point::new(0.0, 0.0),
            10.0,
            [(0.0, Rgba::WHITE), (1.0, Rgba::BLACK.with_alpha(0.0))],
        );
        let at_focus = p.sample(Point::new(-3.0, -3.0))[3];
        let at_center = p.sample(Point::new(0.0, 0.0))[3];
        assert_eq!(at_focus, 1.0);
        assert!(at_center < at_focus && at_center > 0.0);
    }

    #[test]
    fn linear_gradient_pads_beyond_its_ends() {
        let p = Paint::linear(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            [(0.0, Rgba::BLACK), (1.0, Rgba::WHITE)],
        );
        assert_eq!(p.sample(Point::new(-5.0, 3.0))[0], 0.0);
        assert_eq!(p.sample(Point::new(50.0, 3.0))[0], 1.0);
        assert!((p.sample(Point::new(5.0, 0.0))[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn degenerate_gradients_paint_nothing() {
        let r = Paint::radial(Point::new(0.0, 0.0), 0.0, [(0.0, Rgba::WHITE)]);
        assert_eq!(r.sample(Point::new(0.0, 0.0)), TRANSPARENT_PREMUL);
        let l = Paint::linear(Point::new(1.0, 1.0), Point::new(1.0, 1.0), [(0.0, Rgba::WHITE)]);
        assert_eq!(l.sample(Point::new(1.0, 1.0)), TRANSPARENT_PREMUL);
    }
}
