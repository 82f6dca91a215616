// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: None,
        bg: None,
    };

    pub fn halves(top: Option<Color>, bottom: Option<Color>) -> Self {
        if top.is_none() && bottom.is_none() {
            return Self::BLANK;
        }
        Self {
            ch: '▀',
            fg: top,
            bg: bottom,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && self.bg.is_none()
    }
}
