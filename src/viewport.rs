// Copyright (c) 2026 rezky_nightky

use tracing::{debug, warn};

use crate::canvas::{Canvas, CELL_H, CELL_W};
use crate::error::{GlowError, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self::new(cols as f32 * CELL_W, rows as f32 * CELL_H)
    }

    pub fn is_mobile(self) -> bool {
        self.width < 768.0
    }
}

pub struct SurfaceManager {
    canvas: Option<Canvas>,
    cols: u16,
    rows: u16,
    attached: bool,
}

impl Default for SurfaceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceManager {
    pub fn new() -> Self {
        Self {
            canvas: None,
            cols: 0,
            rows: 0,
            attached: false,
        }
    }

    pub fn attach(&mut self, cols: u16, rows: u16, with_canvas: bool) -> Result<()> {
        if cols == 0 || rows == 0 {
            warn!(cols, rows, "terminal has no drawable area");
            return Err(GlowError::SurfaceUnavailable { cols, rows });
        }
        self.cols = cols;
        self.rows = rows;
        self.canvas = with_canvas.then(|| Canvas::new(cols, rows));
        self.attached = true;
        Ok(())
    }

    /// Resizes (and so clears) the canvas. Entities are left where they are.
    /// Returns false when the event was ignored.
    pub fn on_resize(&mut self, cols: u16, rows: u16) -> bool {
        if !self.attached {
            debug!(cols, rows, "resize before attach ignored");
            return false;
        }
        if cols == 0 || rows == 0 {
            debug!(cols, rows, "zero-sized resize ignored");
            return false;
        }
        self.cols = cols;
        self.rows = rows;
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.resize(cols, rows);
        }
        true
    }

    pub fn detach(&mut self) {
        self.attached = false;
        self.canvas = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn cells(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::from_cells(self.cols, self.rows)
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn canvas_mut(&mut self) -> Option<&mut Canvas> {
        self.canvas.as_mut()
    }
}
