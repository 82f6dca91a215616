// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlowError>;

#[derive(Error, Debug)]
pub enum GlowError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("drawing surface unavailable ({cols}x{rows})")]
    SurfaceUnavailable { cols: u16, rows: u16 },

    #[error("invalid background descriptor `{input}`: {reason}")]
    Background { input: String, reason: String },

    #[error("invalid size `{0}` (expected COLSxROWS, e.g. 80x24)")]
    InvalidSize(String),
}

impl GlowError {
    pub fn background(input: &str, reason: impl Into<String>) -> Self {
        GlowError::Background {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
