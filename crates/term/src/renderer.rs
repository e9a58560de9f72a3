//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are encoded into a byte buffer first and written in one go. When the
//! previous frame has the same size only changed runs are redrawn.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{FrameBuffer, Glyph, Rgb, Style};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    prev: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            prev: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Switch to the alternate screen. Line input keeps working (no raw mode).
    pub fn enter(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.flush()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush()
    }

    /// Forget the previous frame so the next draw repaints everything.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        encode_frame(self.prev.as_ref(), fb, &mut self.buf)?;
        self.flush()?;
        self.prev = Some(fb.clone());
        Ok(())
    }

    /// Print `text` on the line below the last frame and show the cursor there.
    ///
    /// Whatever the user types afterwards lands on screen, so the next frame is
    /// a full repaint.
    pub fn prompt(&mut self, text: &str) -> Result<()> {
        let row = self.prev.as_ref().map_or(0, FrameBuffer::height);
        self.buf.clear();
        self.buf.queue(cursor::MoveTo(0, row))?;
        self.buf
            .queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        self.buf.queue(Print(text))?;
        self.buf.queue(cursor::Show)?;
        self.flush()?;
        self.invalidate();
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode `next` into terminal commands, diffing against `prev` when the sizes match.
pub fn encode_frame(prev: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let prev = prev.filter(|p| p.width() == next.width() && p.height() == next.height());
    if prev.is_none() {
        out.queue(cursor::Hide)?;
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    let mut style: Option<Style> = None;
    for y in 0..next.height() {
        let row = next.row(y);
        let runs = match prev {
            Some(p) => changed_runs(p.row(y), row),
            None => vec![(0, row.len())],
        };
        for (start, end) in runs {
            out.queue(cursor::MoveTo(start as u16, y))?;
            for glyph in &row[start..end] {
                put_glyph(out, glyph, &mut style)?;
            }
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn put_glyph(out: &mut Vec<u8>, glyph: &Glyph, current: &mut Option<Style>) -> Result<()> {
    if *current != Some(glyph.style) {
        let s = glyph.style;
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(SetForegroundColor(color(s.fg)))?;
        out.queue(SetBackgroundColor(color(s.bg)))?;
        if s.bold {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        *current = Some(s);
    }
    out.queue(Print(glyph.ch))?;
    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Half-open ranges where `a` and `b` differ. Rows must have equal length.
fn changed_runs(a: &[Glyph], b: &[Glyph]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (x, (ga, gb)) in a.iter().zip(b).enumerate() {
        match (ga != gb, start) {
            (true, None) => start = Some(x),
            (false, Some(s)) => {
                runs.push((s, x));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, b.len()));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_coalesce_adjacent_changes() {
        let a = FrameBuffer::new(6, 1);
        let mut b = FrameBuffer::new(6, 1);
        for x in [1, 2, 3, 5] {
            b.put(x, 0, 'X', Style::default());
        }
        assert_eq!(changed_runs(a.row(0), b.row(0)), vec![(1, 4), (5, 6)]);
    }

    #[test]
    fn identical_frames_encode_no_glyphs() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.put_str(0, 0, "abc", Style::default());

        let mut full = Vec::new();
        encode_frame(None, &fb, &mut full).unwrap();
        let mut diff = Vec::new();
        encode_frame(Some(&fb), &fb, &mut diff).unwrap();

        assert!(String::from_utf8_lossy(&full).contains("abc"));
        assert!(!String::from_utf8_lossy(&diff).contains('a'));
        assert!(diff.len() < full.len());
    }

    #[test]
    fn resized_frame_is_repainted_in_full() {
        let small = FrameBuffer::new(2, 1);
        let mut big = FrameBuffer::new(3, 1);
        big.put_str(0, 0, "xyz", Style::default());
        let mut out = Vec::new();
        encode_frame(Some(&small), &big, &mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("xyz"));
    }
}
