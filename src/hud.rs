// Copyright (c) 2026 rezky_nightky

use crate::color::Rgba;
use crate::surface::{Point, Stroke, Surface, TextAlign};

const GRID_SPACING: f32 = 50.0;
const SLATE_LINE: Rgba = Rgba::rgba8(100, 116, 139, 0.1);
const SLATE_TEXT: Rgba = Rgba::rgba8(100, 116, 139, 0.3);
const VIOLET_RING: Rgba = Rgba::rgba8(139, 92, 246, 0.15);
const VIOLET_CROSS: Rgba = Rgba::rgba8(139, 92, 246, 0.08);
const BLUE_RING: Rgba = Rgba::rgba8(59, 130, 246, 0.2);
const BLUE_TEXT: Rgba = Rgba::rgba8(59, 130, 246, 0.4);

pub fn draw(surface: &mut dyn Surface, nodes: usize) {
    let (w, h) = surface.size();
    surface.save();

    let grid = Stroke::new(SLATE_LINE, 0.5);
    let mut x = 0.0;
    while x < w {
        surface.stroke_line(Point::new(x, 0.0), Point::new(x, h), &grid);
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < h {
        surface.stroke_line(Point::new(0.0, y), Point::new(w, y), &grid);
        y += GRID_SPACING;
    }

    let left = [
        "NEURAL_NET_v2.1".to_string(),
        "STATUS: ACTIVE".to_string(),
        format!("NODES: {nodes}"),
    ];
    let right = [
        format!("RES: {}x{}", w as u32, h as u32),
        "AI_CORE: ONLINE".to_string(),
        "SYNC: 99.7%".to_string(),
    ];
    for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
        let y = 20.0 + i as f32 * 15.0;
        surface.fill_text(l, Point::new(10.0, y), SLATE_TEXT, TextAlign::Left);
        surface.fill_text(r, Point::new(w - 120.0, y), SLATE_TEXT, TextAlign::Left);
    }

    let c = Point::new(w / 2.0, h / 2.0);
    let ring = Stroke::new(VIOLET_RING, 1.0).dashed(5.0, 5.0);
    surface.stroke_circle(c, 200.0, &ring);
    surface.stroke_circle(c, 120.0, &ring);

    let cross = Stroke::new(VIOLET_CROSS, 1.0);
    surface.stroke_line(Point::new(c.x - 250.0, c.y), Point::new(c.x + 250.0, c.y), &cross);
    surface.stroke_line(Point::new(c.x, c.y - 250.0), Point::new(c.x, c.y + 250.0), &cross);

    let marker = Stroke::new(BLUE_RING, 1.0);
    for (x, y, label) in [
        (50.0, 50.0, "NW_SECTOR"),
        (w - 50.0, 50.0, "NE_SECTOR"),
        (50.0, h - 50.0, "SW_SECTOR"),
        (w - 50.0, h - 50.0, "SE_SECTOR"),
    ] {
        surface.stroke_circle(Point::new(x, y), 15.0, &marker);
        surface.fill_text(label, Point::new(x, y + 25.0), BLUE_TEXT, TextAlign::Center);
    }

    surface.restore();
}
