//! Board module - immutable game snapshot
//!
//! The board is an N x N grid where each cell is empty, a hole, or owned by one side.
//! Uses a flat row-major vector (`y * size + x`). A board never changes after it is
//! built: every move produces a fresh board and the previous one stays valid, which
//! lets callers keep the whole lineage around for history and animation.
//!
//! All move methods act on behalf of [`Board::current`].

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{
    Cell, Move, Position, Side, DEFAULT_BOARD_SIZE, DIRECTIONS, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
    MOVE_VECTORS,
};

/// Why a board could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board size {0} is outside {}..={}", MIN_BOARD_SIZE, MAX_BOARD_SIZE)]
    Size(usize),
    #[error("hole {0} lies outside the board")]
    HoleOffBoard(Position),
    #[error("hole {0} covers a starting corner")]
    HoleOnStart(Position),
    #[error("diagram row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unexpected diagram character {0:?}")]
    BadSymbol(char),
}

/// Which legality check a move failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    /// Source or target is off the board or a hole.
    OffBoard,
    /// Source does not hold a piece of the current player.
    NotOwnPiece,
    /// Target is not empty.
    Occupied,
    /// Displacement is not a clone step or a jump.
    BadShape,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IllegalReason::OffBoard => "cell is off the board or a hole",
            IllegalReason::NotOwnPiece => "source is not the mover's piece",
            IllegalReason::Occupied => "target is occupied",
            IllegalReason::BadShape => "displacement is not a legal move shape",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("illegal move {mv}: {reason}")]
    Illegal { mv: Move, reason: IllegalReason },
}

/// Immutable game board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    /// Row-major cells (`y * size + x`).
    cells: Vec<Cell>,
    current: Side,
}

impl Board {
    /// Build a board with the standard four-corner layout.
    ///
    /// `Side::Black` moves first and starts on `(0, 0)` and `(N-1, N-1)`;
    /// `Side::White` starts on the other two corners.
    pub fn new<I>(size: usize, holes: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = Position>,
    {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(BoardError::Size(size));
        }

        let mut board = Self {
            size,
            cells: vec![Cell::Empty; size * size],
            current: Side::Black,
        };

        let corners = Self::start_corners(size);
        for hole in holes {
            if !board.in_bounds(hole) {
                return Err(BoardError::HoleOffBoard(hole));
            }
            if corners.iter().any(|(pos, _)| *pos == hole) {
                return Err(BoardError::HoleOnStart(hole));
            }
            board.set(hole, Cell::Hole);
        }

        for (pos, side) in corners {
            board.set(pos, Cell::Piece(side));
        }

        Ok(board)
    }

    /// Default 9x9 board with a single centre hole (e5).
    pub fn standard() -> Self {
        let mid = (DEFAULT_BOARD_SIZE / 2) as i8;
        Self::standard_with_holes([Position::new(mid, mid)])
            .expect("centre of the default board is a valid hole")
    }

    /// Default 9x9 board with the given hole layout.
    pub fn standard_with_holes<I>(holes: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = Position>,
    {
        Self::new(DEFAULT_BOARD_SIZE, holes)
    }

    /// Parse a board diagram: one row per line, top row first.
    ///
    /// `x` = Black, `o` = White, `#` = hole, `.` = empty. Blank lines and surrounding
    /// whitespace are ignored.
    ///
    /// ```
    /// use ataxx_core::Board;
    /// use ataxx_types::{Cell, Position, Side};
    ///
    /// let board = Board::from_diagram("x.\n#o", Side::White).unwrap();
    /// assert_eq!(board.size(), 2);
    /// assert_eq!(board.current(), Side::White);
    /// assert_eq!(board.get(Position::new(0, 1)), Some(Cell::Hole));
    /// ```
    pub fn from_diagram(diagram: &str, current: Side) -> Result<Self, BoardError> {
        let rows: Vec<&str> = diagram
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let size = rows.len();
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(BoardError::Size(size));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in rows.iter().enumerate() {
            let before = cells.len();
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                cells.push(match ch {
                    'x' | 'X' => Cell::Piece(Side::Black),
                    'o' | 'O' => Cell::Piece(Side::White),
                    '#' => Cell::Hole,
                    '.' => Cell::Empty,
                    other => return Err(BoardError::BadSymbol(other)),
                });
            }
            let found = cells.len() - before;
            if found != size {
                return Err(BoardError::RaggedRow {
                    row,
                    found,
                    expected: size,
                });
            }
        }

        Ok(Self {
            size,
            cells,
            current,
        })
    }

    fn start_corners(size: usize) -> [(Position, Side); 4] {
        let last = (size - 1) as i8;
        [
            (Position::new(0, 0), Side::Black),
            (Position::new(last, last), Side::Black),
            (Position::new(0, last), Side::White),
            (Position::new(last, 0), Side::White),
        ]
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.size + pos.x as usize)
        } else {
            None
        }
    }

    #[inline(always)]
    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    /// Only used while building a new board.
    fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = cell;
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Side to move.
    pub fn current(&self) -> Side {
        self.current
    }

    /// Side waiting for its turn.
    pub fn opposing(&self) -> Side {
        self.current.other()
    }

    /// All cells, column by column (x outer, y inner).
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let n = self.size as i8;
        (0..n).flat_map(move |x| (0..n).map(move |y| Position::new(x, y)))
    }

    /// Cell at `pos`, or `None` when off the board.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Owner of the piece at `pos`, if any.
    pub fn owner(&self, pos: Position) -> Option<Side> {
        self.get(pos).and_then(Cell::owner)
    }

    pub fn is_hole(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Hole)
    }

    pub fn holes(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |&p| self.is_hole(p))
    }

    /// Cells owned by `side`.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |&p| self.owner(p) == Some(side))
    }

    /// True iff `pos` lies on the board and is not a hole.
    pub fn is_index_legal(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Cell::Empty | Cell::Piece(_)))
    }

    /// Reason `from -> to` is illegal for the current player, or `None` if it is legal.
    pub fn check_move(&self, from: Position, to: Position) -> Option<IllegalReason> {
        if !self.is_index_legal(from) || !self.is_index_legal(to) {
            return Some(IllegalReason::OffBoard);
        }
        if self.owner(from) != Some(self.current) {
            return Some(IllegalReason::NotOwnPiece);
        }
        if self.get(to) != Some(Cell::Empty) {
            return Some(IllegalReason::Occupied);
        }
        if !(from - to).is_move_vector() {
            return Some(IllegalReason::BadShape);
        }
        None
    }

    pub fn is_move_legal(&self, from: Position, to: Position) -> bool {
        self.check_move(from, to).is_none()
    }

    /// Legal moves starting at `pos`; empty unless `pos` holds a piece of the mover.
    pub fn moves_from(&self, pos: Position) -> ArrayVec<Move, 16> {
        let mut out = ArrayVec::new();
        if self.owner(pos) != Some(self.current) {
            return out;
        }
        for v in MOVE_VECTORS {
            let to = pos + v;
            if self.is_move_legal(pos, to) {
                out.push(Move::new(pos, to));
            }
        }
        out
    }

    /// All legal moves of the current player.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.pieces(self.current)
            .flat_map(|p| self.moves_from(p))
            .collect()
    }

    /// True iff the current player can move anywhere.
    pub fn has_legal_moves(&self) -> bool {
        self.pieces(self.current)
            .any(|p| MOVE_VECTORS.iter().any(|&v| self.is_move_legal(p, p + v)))
    }

    /// Opposing pieces that would flip if the current player landed on `to`.
    pub fn captures(&self, to: Position) -> ArrayVec<Position, 8> {
        let opposing = self.opposing();
        DIRECTIONS
            .iter()
            .map(|&d| to + d)
            .filter(|&n| self.is_index_legal(n) && self.owner(n) == Some(opposing))
            .collect()
    }

    /// Board resulting from `from -> to`.
    ///
    /// Clone steps keep the source piece, jumps empty it. Every opposing piece
    /// adjacent to `to` flips. The turn passes unless the next player would have
    /// no legal move, in which case the mover moves again.
    pub fn move_piece(&self, from: Position, to: Position) -> Result<Board, MoveError> {
        if let Some(reason) = self.check_move(from, to) {
            return Err(MoveError::Illegal {
                mv: Move::new(from, to),
                reason,
            });
        }

        let mover = self.current;
        let mut next = Board {
            size: self.size,
            cells: self.cells.clone(),
            current: self.opposing(),
        };

        let delta = from - to;
        if delta.x.unsigned_abs() == 2 || delta.y.unsigned_abs() == 2 {
            next.set(from, Cell::Empty);
        }
        next.set(to, Cell::Piece(mover));

        for flipped in self.captures(to) {
            next.set(flipped, Cell::Piece(mover));
        }

        // Forced pass: the opponent has nowhere to go.
        if !next.has_legal_moves() {
            next.current = mover;
        }

        Ok(next)
    }

    /// [`Board::move_piece`] taking a [`Move`].
    pub fn play(&self, mv: Move) -> Result<Board, MoveError> {
        self.move_piece(mv.from, mv.to)
    }

    /// True iff every non-hole cell is owned.
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    /// Number of cells owned by `side`.
    pub fn points(&self, side: Side) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == Cell::Piece(side))
            .count()
    }

    /// How far `side` is ahead of the other side (negative when behind).
    pub fn point_delta(&self, side: Side) -> i32 {
        self.points(side) as i32 - self.points(side.other()) as i32
    }
}

impl fmt::Display for Board {
    /// Same diagram format accepted by [`Board::from_diagram`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for cell in row {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Hole => '#',
                    Cell::Piece(Side::Black) => 'x',
                    Cell::Piece(Side::White) => 'o',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn index_is_row_major() {
        let board = Board::new(9, []).unwrap();
        assert_eq!(board.index(Position::new(0, 0)), Some(0));
        assert_eq!(board.index(Position::new(8, 0)), Some(8));
        assert_eq!(board.index(Position::new(0, 1)), Some(9));
        assert_eq!(board.index(Position::new(8, 8)), Some(80));
        assert_eq!(board.index(Position::new(-1, 0)), None);
        assert_eq!(board.index(Position::new(9, 0)), None);
        assert_eq!(board.index(Position::new(0, 9)), None);
    }

    #[test]
    fn standard_layout_puts_first_mover_on_main_diagonal() {
        let board = Board::new(9, []).unwrap();
        assert_eq!(board.current(), Side::Black);
        assert_eq!(board.owner(pos("a1")), Some(Side::Black));
        assert_eq!(board.owner(pos("i9")), Some(Side::Black));
        assert_eq!(board.owner(pos("a9")), Some(Side::White));
        assert_eq!(board.owner(pos("i1")), Some(Side::White));
        assert_eq!(board.points(Side::Black), 2);
        assert_eq!(board.points(Side::White), 2);
    }

    #[test]
    fn rejects_bad_construction() {
        assert_eq!(Board::new(1, []), Err(BoardError::Size(1)));
        assert_eq!(
            Board::new(5, [Position::new(5, 0)]),
            Err(BoardError::HoleOffBoard(Position::new(5, 0)))
        );
        assert_eq!(
            Board::new(5, [Position::new(4, 4)]),
            Err(BoardError::HoleOnStart(Position::new(4, 4)))
        );
    }

    #[test]
    fn standard_board_has_centre_hole() {
        let board = Board::standard();
        assert!(board.is_hole(pos("e5")));
        assert_eq!(board.holes().count(), 1);
        assert!(!board.is_index_legal(pos("e5")));
    }

    #[test]
    fn check_move_reports_first_failing_rule() {
        let board = Board::standard();
        assert_eq!(
            board.check_move(pos("a1"), Position::new(-1, 0)),
            Some(IllegalReason::OffBoard)
        );
        assert_eq!(
            board.check_move(pos("a9"), pos("a8")),
            Some(IllegalReason::NotOwnPiece)
        );
        assert_eq!(
            board.check_move(pos("a1"), pos("d1")),
            Some(IllegalReason::BadShape)
        );
        assert_eq!(
            board.check_move(pos("a1"), pos("c2")),
            Some(IllegalReason::BadShape)
        );
        assert_eq!(board.check_move(pos("a1"), pos("c3")), None);
    }

    #[test]
    fn occupied_target_is_illegal() {
        let board = Board::from_diagram("xx.\n...\n..o", Side::Black).unwrap();
        assert_eq!(
            board.check_move(pos("a1"), pos("b1")),
            Some(IllegalReason::Occupied)
        );
    }

    #[test]
    fn corner_piece_has_three_clones_and_three_jumps() {
        let board = Board::new(9, []).unwrap();
        let moves = board.moves_from(pos("a1"));
        assert_eq!(moves.len(), 6);
        assert!(board.moves_from(pos("a9")).is_empty());
    }

    #[test]
    fn captures_preview_matches_move() {
        let board = Board::from_diagram(
            "x..\n\
             .oo\n\
             ..o",
            Side::Black,
        )
        .unwrap();
        let flips = board.captures(pos("b1"));
        assert_eq!(flips.len(), 2);
        let next = board.move_piece(pos("a1"), pos("b1")).unwrap();
        for p in flips {
            assert_eq!(next.owner(p), Some(Side::Black));
        }
        assert_eq!(next.owner(pos("c3")), Some(Side::White));
    }

    #[test]
    fn diagram_roundtrip() {
        let text = "x.#\n.o.\n#.x\n";
        let board = Board::from_diagram(text, Side::Black).unwrap();
        assert_eq!(board.to_string(), text);
    }

    #[test]
    fn diagram_rejects_ragged_rows() {
        let err = Board::from_diagram("x..\n.o\n...", Side::Black).unwrap_err();
        assert_eq!(
            err,
            BoardError::RaggedRow {
                row: 1,
                found: 2,
                expected: 3
            }
        );
        assert_eq!(
            Board::from_diagram("x?\n..", Side::Black).unwrap_err(),
            BoardError::BadSymbol('?')
        );
    }

    #[test]
    fn positions_enumerate_every_cell_once() {
        let board = Board::new(4, []).unwrap();
        let all: Vec<_> = board.positions().collect();
        assert_eq!(all.len(), 16);
        assert_eq!(all[0], Position::new(0, 0));
        assert_eq!(all[1], Position::new(0, 1));
    }
}
