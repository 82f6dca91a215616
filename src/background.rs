// Copyright (c) 2026 rezky_nightky

use std::f32::consts::SQRT_2;

use crate::color::{Premul, Rgba, TRANSPARENT_PREMUL};
use crate::error::{GlowError, Result};
use crate::surface::{sample_stops, ColorStop};

#[derive(Clone, Debug, PartialEq)]
pub enum Background {
    Transparent,
    Linear {
        angle_deg: f32,
        stops: Vec<ColorStop>,
    },
    Radial {
        cx: f32,
        cy: f32,
        stops: Vec<ColorStop>,
    },
}

fn split_args(body: &str) -> Vec<&str> {
    body.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn parse_stops(input: &str, parts: &[&str]) -> Result<Vec<ColorStop>> {
    if parts.is_empty() {
        return Err(GlowError::background(input, "no color stops"));
    }
    let n = parts.len();
    let mut stops = Vec::with_capacity(n);
    for (i, part) in parts.iter().enumerate() {
        let mut words = part.split_whitespace();
        let color_str = words.next().unwrap_or_default();
        let color = Rgba::hex(color_str)
            .ok_or_else(|| GlowError::background(input, format!("bad color `{color_str}`")))?;
        let offset = match words.next() {
            Some(pos) => {
                let pct = pos
                    .strip_suffix('%')
                    .and_then(|v| v.parse::<f32>().ok())
                    .ok_or_else(|| GlowError::background(input, format!("bad stop `{pos}`")))?;
                pct / 100.0
            }
            None if n > 1 => i as f32 / (n - 1) as f32,
            None => 0.0,
        };
        stops.push(ColorStop { offset, color });
    }
    Ok(stops)
}

impl Background {
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if s.eq_ignore_ascii_case("transparent") || s.is_empty() {
            return Ok(Background::Transparent);
        }

        let (kind, rest) = s
            .split_once('(')
            .ok_or_else(|| GlowError::background(input, "expected a gradient function"))?;
        let body = rest
            .strip_suffix(')')
            .ok_or_else(|| GlowError::background(input, "unterminated gradient"))?;
        let args = split_args(body);
        let Some((&head, tail)) = args.split_first() else {
            return Err(GlowError::background(input, "empty gradient"));
        };

        match kind.trim() {
            "linear-gradient" => {
                let (angle_deg, stop_args) = match head.strip_suffix("deg") {
                    Some(num) => {
                        let a = num
                            .trim()
                            .parse::<f32>()
                            .map_err(|_| GlowError::background(input, "bad angle"))?;
                        (a, tail)
                    }
                    None => (180.0, &args[..]),
                };
                Ok(Background::Linear {
                    angle_deg,
                    stops: parse_stops(input, stop_args)?,
                })
            }
            "radial-gradient" => {
                let (cx, cy, stop_args) = match head.strip_prefix("ellipse at ") {
                    Some(pos) => {
                        let (cx, cy) = match pos.trim() {
                            "center" => (0.5, 0.5),
                            "top" => (0.5, 0.0),
                            "bottom" => (0.5, 1.0),
                            "left" => (0.0, 0.5),
                            "right" => (1.0, 0.5),
                            other => {
                                return Err(GlowError::background(
                                    input,
                                    format!("unsupported position `{other}`"),
                                ))
                            }
                        };
                        (cx, cy, tail)
                    }
                    None if head.starts_with('#') => (0.5, 0.5, &args[..]),
                    None => return Err(GlowError::background(input, "unsupported shape")),
                };
                Ok(Background::Radial {
                    cx,
                    cy,
                    stops: parse_stops(input, stop_args)?,
                })
            }
            other => Err(GlowError::background(
                input,
                format!("unsupported function `{other}`"),
            )),
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, Background::Transparent)
    }

    pub fn sample(&self, x: f32, y: f32, w: f32, h: f32) -> Premul {
        if w <= 0.0 || h <= 0.0 {
            return TRANSPARENT_PREMUL;
        }
        match self {
            Background::Transparent => TRANSPARENT_PREMUL,
            Background::Linear { angle_deg, stops } => {
                let a = angle_deg.to_radians();
                // Axis-aligned angles must not leak the other axis.
                let snap = |v: f32| if v.abs() < 1e-6 { 0.0 } else { v };
                let (dx, dy) = (snap(a.sin()), snap(-a.cos()));
                let len = (w * dx).abs() + (h * dy).abs();
                if len <= f32::EPSILON {
                    return TRANSPARENT_PREMUL;
                }
                let t = ((x - w / 2.0) * dx + (y - h / 2.0) * dy) / len + 0.5;
                sample_stops(stops, t)
            }
            Background::Radial { cx, cy, stops } => {
                let (px, py) = (cx * w, cy * h);
                let rx = px.max(w - px) * SQRT_2;
                let ry = py.max(h - py) * SQRT_2;
                let t = (((x - px) / rx).powi(2) + ((y - py) / ry).powi(2)).sqrt();
                sample_stops(stops, t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(p: Premul) -> (u8, u8, u8) {
        let q = |v: f32| (v * 255.0).round() as u8;
        (q(p[0]), q(p[1]), q(p[2]))
    }

    #[test]
    fn parses_every_shipped_form() {
        let neural = Background::parse(
            "linear-gradient(135deg, #1e293b 0%, #312e81 25%, #4c1d95 50%, #334155 75%, #64748b 100%)",
        )
        .unwrap();
        match neural {
            Background::Linear { angle_deg, ref stops } => {
                assert_eq!(angle_deg, 135.0);
                assert_eq!(stops.len(), 5);
                assert_eq!(stops[2].offset, 0.5);
            }
            other => panic!("unexpected {other:?}"),
        }

        let css = Background::parse("radial-gradient(ellipse at bottom, #1b2735 0%, #090a0f 100%)")
            .unwrap();
        assert!(matches!(css, Background::Radial { cy, .. } if cy == 1.0));

        assert!(Background::parse("transparent").unwrap().is_transparent());
    }

    #[test]
    fn rejects_garbage_with_a_background_error() {
        for bad in [
            "conic-gradient(#fff, #000)",
            "linear-gradient(90deg, red 0%)",
            "linear-gradient(90deg, #fff 0%",
            "radial-gradient(circle at 10px, #fff 0%)",
        ] {
            assert!(matches!(
                Background::parse(bad),
                Err(GlowError::Background { .. })
            ));
        }
    }

    #[test]
    fn linear_135deg_runs_from_top_left_to_bottom_right() {
        let bg = Background::parse("linear-gradient(135deg, #000000 0%, #ffffff 100%)").unwrap();
        assert_eq!(rgb(bg.sample(0.0, 0.0, 200.0, 100.0)), (0, 0, 0));
        assert_eq!(rgb(bg.sample(200.0, 100.0, 200.0, 100.0)), (255, 255, 255));
        let mid = bg.sample(100.0, 50.0, 200.0, 100.0)[0];
        assert!((mid - 0.5).abs() < 0.01);
    }

    #[test]
    fn vertical_gradient_ignores_x() {
        let bg = Background::parse(
            "linear-gradient(180deg, #0a0a0a 0%, #1a0a2e 30%, #2d1b69 60%, #ff006e 100%)",
        )
        .unwrap();
        assert_eq!(
            rgb(bg.sample(0.0, 40.0, 640.0, 384.0)),
            rgb(bg.sample(600.0, 40.0, 640.0, 384.0))
        );
        assert_eq!(rgb(bg.sample(10.0, 384.0, 640.0, 384.0)), (255, 0, 110));
    }

    #[test]
    fn axis_aligned_gradients_depend_on_one_axis_only() {
        let (w, h) = (640.0, 384.0);
        for deg in [0, 90, 180, 270, 360] {
            let bg = Background::parse(&format!(
                "linear-gradient({deg}deg, #0a0a0a 0%, #2d1b69 50%, #ff006e 100%)"
            ))
            .unwrap();
            let vertical = deg % 180 == 0;
            for i in 0..16 {
                let k = i as f32 * 37.0;
                let (a, b) = if vertical {
                    (bg.sample(0.0, k, w, h), bg.sample(w - 1.0, k, w, h))
                } else {
                    (bg.sample(k, 0.0, w, h), bg.sample(k, h - 1.0, w, h))
                };
                assert_eq!(a, b, "{deg}deg at {k}");
            }
        }
    }

    #[test]
    fn radial_center_takes_first_stop() {
        let bg = Background::parse(
            "radial-gradient(ellipse at center, #0b1026 0%, #05060f 60%, #000000 100%)",
        )
        .unwrap();
        assert_eq!(rgb(bg.sample(320.0, 192.0, 640.0, 384.0)), (11, 16, 38));
        assert_eq!(rgb(bg.sample(0.0, 0.0, 640.0, 384.0)), (0, 0, 0));
    }
}
