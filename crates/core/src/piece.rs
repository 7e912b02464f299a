//! Piece module - tetromino shapes and matrix rotation
//!
//! Every piece carries its own occupancy matrix. Rotation is a pure
//! transpose-reverse over that matrix: the caller probes the candidate
//! against the board and only commits it once it fits.

use crate::types::{PieceKind, Rotation, BOARD_WIDTH};

/// Largest side length of any canonical matrix (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Occupancy matrix of a piece, `rows` x `cols` in the top-left corner of a
/// fixed 4x4 buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from rows of 0/1 values.
    ///
    /// Rows longer than [`MAX_SHAPE_SIZE`] are truncated; all rows take the
    /// width of the first.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len().min(MAX_SHAPE_SIZE);
        let width = rows.first().map_or(0, |r| r.len()).min(MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in rows.iter().take(height).enumerate() {
            for (c, &v) in row.iter().take(width).enumerate() {
                cells[r][c] = v != 0;
            }
        }
        Self {
            rows: height as u8,
            cols: width as u8,
            cells,
        }
    }

    /// Canonical (spawn orientation) matrix for a piece kind
    pub fn canonical(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => Self::from_rows(&[
                &[0, 0, 0, 0],
                &[1, 1, 1, 1],
                &[0, 0, 0, 0],
                &[0, 0, 0, 0],
            ]),
            PieceKind::O => Self::from_rows(&[&[1, 1], &[1, 1]]),
            PieceKind::T => Self::from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]),
            PieceKind::S => Self::from_rows(&[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
            PieceKind::Z => Self::from_rows(&[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
            PieceKind::J => Self::from_rows(&[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]),
            PieceKind::L => Self::from_rows(&[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]]),
        }
    }

    pub fn width(&self) -> usize {
        self.cols as usize
    }

    pub fn height(&self) -> usize {
        self.rows as usize
    }

    /// Occupied cells as `(col, row)` offsets from the matrix origin
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height()).flat_map(move |row| {
            (0..self.width())
                .filter(move |&col| self.cells[row][col])
                .map(move |col| (col as i32, row as i32))
        })
    }

    /// The matrix rotated 90° clockwise.
    ///
    /// Column `c` of the original, read bottom-to-top, becomes row `c` of
    /// the result.
    pub fn rotated_cw(&self) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let rows = self.height();
        for col in 0..self.width() {
            for (new_col, row) in (0..rows).rev().enumerate() {
                cells[col][new_col] = self.cells[row][col];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Canonical matrix for `kind` turned to `rotation`
    pub fn oriented(kind: PieceKind, rotation: Rotation) -> Self {
        let mut shape = Self::canonical(kind);
        for _ in 0..rotation.quarter_turns() {
            shape = shape.rotated_cw();
        }
        shape
    }
}

/// A tetromino instance: kind, current matrix, and board position.
///
/// `x`/`y` are the board coordinates of the matrix's top-left corner; `y`
/// is negative while part of the matrix is above the visible board.
/// Copies are independent values, so previews never alias the live piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a piece at spawn orientation, centered over the board
    pub fn new(kind: PieceKind) -> Self {
        let shape = Shape::canonical(kind);
        Self {
            kind,
            rotation: Rotation::North,
            shape,
            x: spawn_x(&shape),
            y: 0,
        }
    }

    /// Color token of this piece
    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    /// Candidate matrix for a clockwise rotation. Does not modify the piece.
    pub fn rotate(&self) -> Shape {
        self.shape.rotated_cw()
    }

    /// Commit a clockwise rotation
    pub fn apply_rotation(&mut self) {
        self.shape = self.rotate();
        self.rotation = self.rotation.rotate_cw();
    }

    pub fn move_left(&mut self) {
        self.x -= 1;
    }

    pub fn move_right(&mut self) {
        self.x += 1;
    }

    pub fn move_down(&mut self) {
        self.y += 1;
    }

    /// Absolute board coordinates `(x, y)` of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Horizontal spawn column: `floor((BOARD_WIDTH - width) / 2)`
fn spawn_x(shape: &Shape) -> i32 {
    (BOARD_WIDTH as i32 - shape.width() as i32).div_euclid(2)
}

/// Draw a piece kind uniformly at random (unseeded).
///
/// Every call is an independent draw; see [`crate::rng::PieceGenerator`]
/// for seeded and bag-based sources.
pub fn random_piece_kind() -> PieceKind {
    PieceKind::ALL[fastrand::usize(..PieceKind::ALL.len())]
}

/// A fresh piece of a uniformly random kind
pub fn create_random_piece() -> Piece {
    Piece::new(random_piece_kind())
}
