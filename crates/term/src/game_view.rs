//! GameView: maps a [`Board`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, for an N x N board:
//!
//! ```text
//!     a b c d e
//!    ┌──────────┐
//!  1 │● · · · ○ │
//!  2 │· · · · · │
//!  3 │· · ▓ · · │
//!  4 │· · · · · │
//!  5 │○ · · · ● │
//!    └──────────┘
//! ▶ ● black  2    ○ white  2
//! status text
//! ```

use crate::core::{Board, Score};
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{Cell, Move, Position, Side};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Player names and a free-form status line shown under the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct Labels<'a> {
    pub black: &'a str,
    pub white: &'a str,
    pub status: &'a str,
}

const LABEL_W: u16 = 3;
const TOP: u16 = 1;
const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const MOVE_BG: Rgb = Rgb::new(80, 70, 30);

pub const BLACK_GLYPH: char = '●';
pub const WHITE_GLYPH: char = '○';
pub const HOLE_GLYPH: char = '▓';
pub const EMPTY_GLYPH: char = '·';

pub struct GameView {
    /// Terminal columns per board cell.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2 columns per cell keeps the grid roughly square.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Smallest viewport that fits `board` and `labels`.
    pub fn viewport_for(&self, board: &Board, labels: &Labels) -> Viewport {
        let n = board.size() as u16;
        let grid_w = LABEL_W + 1 + n * self.cell_w + 1;
        let score_w = score_line(board, labels).chars().count() as u16;
        let status_w = labels.status.chars().count() as u16;
        Viewport {
            width: grid_w.max(score_w).max(status_w),
            height: TOP + n + 2 + 2,
        }
    }

    /// Render into a freshly sized framebuffer.
    pub fn render(&self, board: &Board, last: Option<Move>, labels: &Labels) -> FrameBuffer {
        let mut fb = FrameBuffer::new(0, 0);
        self.render_into(board, last, labels, &mut fb);
        fb
    }

    /// Render into an existing framebuffer, resizing it to fit.
    pub fn render_into(
        &self,
        board: &Board,
        last: Option<Move>,
        labels: &Labels,
        fb: &mut FrameBuffer,
    ) {
        let view = self.viewport_for(board, labels);
        fb.reset(view.width, view.height);

        let n = board.size() as u16;
        let text = Style::default();
        let frame = Style::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let left = LABEL_W;
        let right = LABEL_W + 1 + n * self.cell_w;
        let bottom = TOP + n + 1;

        // Column letters.
        for x in 0..n {
            let letter = (b'a' + x as u8) as char;
            fb.put(left + 1 + x * self.cell_w, 0, letter, text);
        }

        // Border.
        fb.put(left, TOP, '┌', frame);
        fb.put(right, TOP, '┐', frame);
        fb.put(left, bottom, '└', frame);
        fb.put(right, bottom, '┘', frame);
        for x in left + 1..right {
            fb.put(x, TOP, '─', frame);
            fb.put(x, bottom, '─', frame);
        }

        for y in 0..n {
            let row = TOP + 1 + y;
            fb.put_str(0, row, &format!("{:>2}", y + 1), text);
            fb.put(left, row, '│', frame);
            fb.put(right, row, '│', frame);

            for x in 0..n {
                let pos = Position::new(x as i8, y as i8);
                let touched = last.is_some_and(|m| m.from == pos || m.to == pos);
                let bg = if touched { MOVE_BG } else { BOARD_BG };
                let (ch, style) = cell_glyph(board.get(pos).unwrap_or_default(), bg);
                let col = left + 1 + x * self.cell_w;
                fb.put(col, row, ch, style);
                for pad in 1..self.cell_w {
                    fb.put(col + pad, row, ' ', Style::new(BOARD_BG, BOARD_BG));
                }
            }
        }

        fb.put_str(0, bottom + 1, &score_line(board, labels), text.bold());
        fb.put_str(0, bottom + 2, labels.status, text);
    }
}

fn side_style(side: Side, bg: Rgb) -> Style {
    let fg = match side {
        Side::Black => Rgb::new(235, 95, 80),
        Side::White => Rgb::new(120, 180, 240),
    };
    Style::new(fg, bg).bold()
}

fn cell_glyph(cell: Cell, bg: Rgb) -> (char, Style) {
    match cell {
        Cell::Empty => (EMPTY_GLYPH, Style::new(Rgb::new(90, 90, 100), bg)),
        Cell::Hole => (HOLE_GLYPH, Style::new(Rgb::new(70, 70, 70), bg)),
        Cell::Piece(Side::Black) => (BLACK_GLYPH, side_style(Side::Black, bg)),
        Cell::Piece(Side::White) => (WHITE_GLYPH, side_style(Side::White, bg)),
    }
}

fn score_line(board: &Board, labels: &Labels) -> String {
    let score = Score::of_board(board);
    let mark = |side: Side| if board.current() == side { '▶' } else { ' ' };
    format!(
        "{} {BLACK_GLYPH} {} {:>3}   {} {WHITE_GLYPH} {} {:>3}",
        mark(Side::Black),
        labels.black,
        score.black,
        mark(Side::White),
        labels.white,
        score.white,
    )
}
