// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

// Premultiplied RGBA, each channel in [0,1].
pub type Premul = [f32; 4];

pub const TRANSPARENT_PREMUL: Premul = [0.0, 0.0, 0.0, 0.0];

pub fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 1.0)
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Self::new(r, g, b, unit(a))
    }

    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::hsla(h, s, l, 1.0)
    }

    pub fn hex(s: &str) -> Option<Self> {
        let digits = s.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 => {
                let mut v = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let n = c.to_digit(16)? as u8;
                    v[i] = n * 17;
                }
                Some(Self::rgb8(v[0], v[1], v[2]))
            }
            6 => Some(Self::rgb8(byte(0)?, byte(2)?, byte(4)?)),
            8 => {
                let a = byte(6)? as f32 / 255.0;
                Some(Self::rgba8(byte(0)?, byte(2)?, byte(4)?, a))
            }
            _ => None,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: unit(a), ..self }
    }

    pub fn premultiplied(self) -> Premul {
        let a = unit(self.a);
        [unit(self.r) * a, unit(self.g) * a, unit(self.b) * a, a]
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |v: f32| (unit(v) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = if h.is_finite() { h.rem_euclid(360.0) } else { 0.0 };
    let s = unit(s / 100.0);
    let l = unit(l / 100.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    (unit(r1 + m), unit(g1 + m), unit(b1 + m))
}

pub fn lerp_premul(a: Premul, b: Premul, t: f32) -> Premul {
    let t = unit(t);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

pub fn over(src: Premul, dst: Premul) -> Premul {
    let k = 1.0 - src[3];
    [
        src[0] + dst[0] * k,
        src[1] + dst[1] * k,
        src[2] + dst[2] * k,
        src[3] + dst[3] * k,
    ]
}

pub fn luminance(rgb: [f32; 3]) -> f32 {
    0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2]
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| (((v as u16 * 5) + 127) / 255) as u8;
    let (r6, g6, b6) = (level(r), level(g), level(b));
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;
    let cube_dist = dist2(
        r,
        g,
        b,
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, v) = match avg {
        0..=7 => (16, 0),
        239..=255 => (231, 255),
        _ => {
            let step = (avg - 8) / 10;
            (232 + step, 8 + 10 * step)
        }
    };
    if dist2(r, g, b, v, v, v) < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, (cr, cg, cb))| dist2(r, g, b, *cr, *cg, *cb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

pub fn terminal_color(mode: ColorMode, rgb: [f32; 3]) -> Option<Color> {
    let (r, g, b) = Rgba::new(rgb[0], rgb[1], rgb[2], 1.0).to_rgb8();
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb { r, g, b }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
        ColorMode::Color16 => Some(rgb_to_color16(r, g, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn hsl_primaries_match_css() {
        let green = Rgba::hsl(120.0, 100.0, 50.0);
        assert!(close(green.r, 0.0) && close(green.g, 1.0) && close(green.b, 0.0));

        let wrapped = Rgba::hsl(480.0, 100.0, 50.0);
        assert_eq!(wrapped.to_rgb8(), green.to_rgb8());

        let white = Rgba::hsl(300.0, 100.0, 100.0);
        assert_eq!(white.to_rgb8(), (255, 255, 255));
    }

    #[test]
    fn hsla_alpha_is_clamped_and_nan_safe() {
        assert_eq!(Rgba::hsla(200.0, 50.0, 50.0, 1.7).a, 1.0);
        assert_eq!(Rgba::hsla(200.0, 50.0, 50.0, -0.3).a, 0.0);
        assert_eq!(Rgba::hsla(200.0, 50.0, 50.0, f32::NAN).a, 0.0);
        let c = Rgba::hsla(f32::NAN, 50.0, 50.0, 1.0);
        assert!(c.r.is_finite() && c.g.is_finite() && c.b.is_finite());
    }

    #[test]
    fn hex_parses_short_long_and_alpha_forms() {
        assert_eq!(Rgba::hex("#00ff41").unwrap().to_rgb8(), (0, 255, 65));
        assert_eq!(Rgba::hex("#fff").unwrap().to_rgb8(), (255, 255, 255));
        let a = Rgba::hex("#ff6b3540").unwrap();
        assert!(close(a.a, 64.0 / 255.0));
        assert!(Rgba::hex("ff6b35").is_none());
        assert!(Rgba::hex("#ff6b3").is_none());
        assert!(Rgba::hex("#gg0000").is_none());
    }

    #[test]
    fn over_with_opaque_source_replaces_destination() {
        let src = Rgba::rgb8(255, 0, 0).premultiplied();
        let dst = Rgba::rgb8(0, 0, 255).premultiplied();
        assert_eq!(over(src, dst), src);
    }

    #[test]
    fn terminal_color_quantizes_per_mode() {
        assert_eq!(terminal_color(ColorMode::Mono, [1.0, 0.0, 0.0]), None);
        assert_eq!(
            terminal_color(ColorMode::Color256, [1.0, 0.0, 0.0]),
            Some(Color::AnsiValue(196))
        );
        assert_eq!(
            terminal_color(ColorMode::Color16, [0.0, 1.0, 1.0]),
            Some(Color::Cyan)
        );
        assert_eq!(
            terminal_color(ColorMode::TrueColor, [0.0, 0.0, 0.0]),
            Some(Color::Rgb { r: 0, g: 0, b: 0 })
        );
    }
}
