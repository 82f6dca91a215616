// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

struct Shown {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Shown {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    fn matches(&self, frame: &Frame) -> bool {
        self.width == frame.width && self.height == frame.height
    }
}

#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    pos: Option<(u16, u16)>,
}

impl Pen {
    fn paint(&mut self, out: &mut Stdout, fg: Option<Color>, bg: Option<Color>) -> Result<()> {
        if fg != self.fg {
            out.queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
            self.fg = fg;
        }
        if bg != self.bg {
            out.queue(SetBackgroundColor(bg.unwrap_or(Color::Reset)))?;
            self.bg = bg;
        }
        Ok(())
    }
}

pub struct Terminal {
    stdout: Stdout,
    shown: Option<Shown>,
    run: String,
    row_dirty: Vec<Vec<usize>>,
    touched_rows: Vec<u16>,
}

fn leave(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let entered: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = entered {
            leave(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            shown: None,
            run: String::with_capacity(64),
            row_dirty: Vec::new(),
            touched_rows: Vec::new(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let reshaped = !self.shown.as_ref().is_some_and(|s| s.matches(frame));
        if reshaped {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
        }

        let total = frame.width as usize * frame.height as usize;
        let large = total > 0 && frame.dirty_indices().len() >= total / 3;

        let incremental = !reshaped && !frame.is_dirty_all() && !large;
        if incremental {
            if let Some(shown) = self.shown.as_mut() {
                Self::draw_dirty(
                    &mut self.stdout,
                    shown,
                    frame,
                    &mut self.run,
                    &mut self.row_dirty,
                    &mut self.touched_rows,
                )?;
            }
        } else {
            let shown = self
                .shown
                .insert(Shown::new(frame.width, frame.height));
            Self::draw_all(&mut self.stdout, shown, frame)?;
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    fn draw_all(out: &mut Stdout, shown: &mut Shown, frame: &Frame) -> Result<()> {
        let mut pen = Pen::default();
        for y in 0..frame.height {
            out.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let idx = y as usize * frame.width as usize + x as usize;
                let cell = frame.cell_at_index(idx);
                pen.paint(out, cell.fg, cell.bg)?;
                out.queue(Print(cell.ch))?;
                shown.cells[idx] = cell;
            }
        }
        Ok(())
    }

    fn draw_dirty(
        out: &mut Stdout,
        shown: &mut Shown,
        frame: &Frame,
        run: &mut String,
        row_dirty: &mut Vec<Vec<usize>>,
        touched_rows: &mut Vec<u16>,
    ) -> Result<()> {
        let width = frame.width as usize;
        let mut pen = Pen::default();

        if row_dirty.len() != frame.height as usize {
            *row_dirty = vec![Vec::new(); frame.height as usize];
        }
        row_dirty.iter_mut().for_each(Vec::clear);
        touched_rows.clear();

        for &idx in frame.dirty_indices() {
            let y = (idx / width) as u16;
            if y >= frame.height {
                continue;
            }
            let bucket = &mut row_dirty[y as usize];
            if bucket.is_empty() {
                touched_rows.push(y);
            }
            bucket.push(idx);
        }
        touched_rows.sort_unstable();

        for &y in touched_rows.iter() {
            let bucket = &mut row_dirty[y as usize];
            bucket.sort_unstable();
            let mut i = 0;
            while i < bucket.len() {
                let start = bucket[i];
                let head = frame.cell_at_index(start);
                if shown.cells[start] == head {
                    i += 1;
                    continue;
                }
                shown.cells[start] = head;

                run.clear();
                run.push(head.ch);
                let mut end = start;
                let mut j = i + 1;
                while j < bucket.len() && bucket[j] == end + 1 {
                    let next = frame.cell_at_index(bucket[j]);
                    if shown.cells[bucket[j]] == next || next.fg != head.fg || next.bg != head.bg {
                        break;
                    }
                    run.push(next.ch);
                    shown.cells[bucket[j]] = next;
                    end = bucket[j];
                    j += 1;
                }

                let x = (start % width) as u16;
                if pen.pos != Some((x, y)) {
                    out.queue(cursor::MoveTo(x, y))?;
                }
                pen.paint(out, head.fg, head.bg)?;
                out.queue(Print(run.as_str()))?;

                let next_x = x.saturating_add((end - start + 1) as u16);
                pen.pos = (next_x < frame.width).then_some((next_x, y));
                i = j;
            }
            bucket.clear();
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        leave(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    leave(&mut stdout());
}
