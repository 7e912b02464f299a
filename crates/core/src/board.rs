//! Board module - manages the grid of locked cells
//!
//! The board is a fixed 10x20 grid, row-major, row 0 at the top.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom). Pieces may extend above row 0 while spawning; those
//! cells are only checked against the side walls.

use arrayvec::ArrayVec;

use crate::piece::{Piece, Shape};
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// One board row
pub type Row = [Cell; BOARD_WIDTH];

/// The full locked-cell grid, indexed `grid[y][x]`
pub type Grid = [Row; BOARD_HEIGHT];

/// Row indices of complete lines, top to bottom
pub type CompleteLines = ArrayVec<usize, BOARD_HEIGHT>;

const EMPTY_ROW: Row = [None; BOARD_WIDTH];

/// The game board - 10 columns x 20 rows
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    grid: Grid,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            grid: Self::empty_grid(),
        }
    }

    /// An all-empty grid
    pub fn empty_grid() -> Grid {
        [EMPTY_ROW; BOARD_HEIGHT]
    }

    /// Clear every cell (new session)
    pub fn reset(&mut self) {
        self.grid = Self::empty_grid();
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    /// Read-only view of the grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = Self::index(x, y)?;
        Some(self.grid[y][x])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.grid[y][x] = cell;
                true
            }
            None => false,
        }
    }

    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || x >= BOARD_WIDTH as i32 || y < 0 || y >= BOARD_HEIGHT as i32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Whether `piece`, shifted by `(offset_x, offset_y)`, fits on the board.
    ///
    /// `shape` overrides the piece's own matrix (used to probe a rotation
    /// before committing it). Every occupied cell must land in a column
    /// inside the board and above the floor; cells at `y >= 0` must also be
    /// empty. Cells above the board are allowed.
    pub fn is_valid_position(
        &self,
        piece: &Piece,
        offset_x: i32,
        offset_y: i32,
        shape: Option<&Shape>,
    ) -> bool {
        let shape = shape.unwrap_or(&piece.shape);
        let origin_x = piece.x + offset_x;
        let origin_y = piece.y + offset_y;

        shape.filled().all(|(dx, dy)| {
            let x = origin_x + dx;
            let y = origin_y + dy;
            if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
                return false;
            }
            y < 0 || self.grid[y as usize][x as usize].is_none()
        })
    }

    /// Write the piece's kind into every occupied cell on the visible board.
    ///
    /// Cells above row 0 (or otherwise off the grid) are dropped.
    pub fn lock_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            self.set(x, y, Some(piece.kind));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < BOARD_HEIGHT && self.grid[y].iter().all(|cell| cell.is_some())
    }

    /// Indices of all complete rows, top to bottom
    pub fn find_complete_lines(&self) -> CompleteLines {
        (0..BOARD_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove the given rows and shift everything above them down.
    ///
    /// Rows are compacted from the bottom up: each surviving row moves to the
    /// lowest free slot, then the vacated top rows are emptied. Surviving rows
    /// keep their relative order. Out-of-range and duplicate indices are
    /// ignored. Returns the number of rows removed.
    pub fn clear_lines(&mut self, lines: &[usize]) -> usize {
        let mut remove = [false; BOARD_HEIGHT];
        for &y in lines {
            if y < BOARD_HEIGHT {
                remove[y] = true;
            }
        }

        let mut write_y = BOARD_HEIGHT;
        for read_y in (0..BOARD_HEIGHT).rev() {
            if remove[read_y] {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                self.grid[write_y] = self.grid[read_y];
            }
        }

        // write_y now equals the number of rows removed.
        for row in &mut self.grid[..write_y] {
            *row = EMPTY_ROW;
        }
        write_y
    }

    /// Stacked to the top: any locked cell in row 0
    pub fn is_game_over(&self) -> bool {
        self.grid[0].iter().any(|cell| cell.is_some())
    }

    /// How many rows the piece can fall before it would collide.
    ///
    /// Zero if the piece is already resting (or not in a valid spot).
    pub fn ghost_position(&self, piece: &Piece) -> i32 {
        let limit = BOARD_HEIGHT as i32 - piece.y;
        let mut offset = 0;
        while offset < limit && self.is_valid_position(piece, 0, offset + 1, None) {
            offset += 1;
        }
        offset
    }

    /// Create a board from text rows for tests and fixtures.
    ///
    /// Rows are bottom-aligned; `.` is empty and any piece letter locks a
    /// cell of that kind (anything else locks an `I`).
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let skip = rows.len().saturating_sub(BOARD_HEIGHT);
        let top = BOARD_HEIGHT - (rows.len() - skip);
        for (i, line) in rows.iter().skip(skip).enumerate() {
            for (x, ch) in line.chars().take(BOARD_WIDTH).enumerate() {
                if ch == '.' {
                    continue;
                }
                let kind = crate::types::PieceKind::from_str(&ch.to_string())
                    .unwrap_or(crate::types::PieceKind::I);
                board.grid[top + i][x] = Some(kind);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn fill_row(board: &mut Board, y: usize, kind: PieceKind) {
        for x in 0..BOARD_WIDTH {
            board.set(x as i32, y as i32, Some(kind));
        }
    }

    #[test]
    fn test_board_new_empty() {
        let board = Board::new();
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        assert!(board.grid().iter().flatten().all(|c| c.is_none()));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut board = Board::new();
        assert!(board.set(5, 10, Some(PieceKind::T)));
        assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));
        assert!(!board.set(-1, 0, Some(PieceKind::T)));
        assert!(!board.set(0, 20, Some(PieceKind::T)));
        assert_eq!(board.get(10, 0), None);
    }

    #[test]
    fn test_spawn_placement_valid_for_every_kind() {
        let board = Board::new();
        for kind in PieceKind::ALL {
            assert!(board.is_valid_position(&Piece::new(kind), 0, 0, None), "{:?}", kind);
        }
    }

    #[test]
    fn test_walls_and_floor_are_invalid() {
        let board = Board::new();
        let piece = Piece::new(PieceKind::O); // x = 4, cols 4..=5
        assert!(board.is_valid_position(&piece, -4, 0, None));
        assert!(!board.is_valid_position(&piece, -5, 0, None));
        assert!(board.is_valid_position(&piece, 4, 0, None));
        assert!(!board.is_valid_position(&piece, 5, 0, None));
        assert!(board.is_valid_position(&piece, 0, 18, None));
        assert!(!board.is_valid_position(&piece, 0, 19, None));
    }

    #[test]
    fn test_overlap_is_invalid() {
        let mut board = Board::new();
        board.set(5, 1, Some(PieceKind::J));
        let piece = Piece::new(PieceKind::O);
        assert!(!board.is_valid_position(&piece, 0, 0, None));
        assert!(board.is_valid_position(&piece, -2, 0, None));
    }

    #[test]
    fn test_spawn_buffer_ignores_rows_above_board() {
        let mut board = Board::new();
        fill_row(&mut board, 0, PieceKind::Z);
        let mut piece = Piece::new(PieceKind::O);
        piece.y = -2;
        assert!(board.is_valid_position(&piece, 0, 0, None));
        assert!(!board.is_valid_position(&piece, 0, 1, None));
        // Still bounded horizontally above the board.
        assert!(!board.is_valid_position(&piece, -5, 0, None));
    }

    #[test]
    fn test_override_shape_is_used() {
        let board = Board::new();
        let mut piece = Piece::new(PieceKind::I);
        piece.x = -1;
        piece.y = 5;
        // Vertical I sits in matrix column 2, i.e. board column 1.
        let vertical = piece.rotate();
        assert!(!board.is_valid_position(&piece, 0, 0, None));
        assert!(board.is_valid_position(&piece, 0, 0, Some(&vertical)));
    }

    #[test]
    fn test_lock_piece_drops_cells_above_board() {
        let mut board = Board::new();
        let mut piece = Piece::new(PieceKind::T);
        piece.y = -1; // top row of T at y = -1
        board.lock_piece(&piece);
        let locked: usize = board.grid().iter().flatten().filter(|c| c.is_some()).count();
        assert_eq!(locked, 3);
        assert_eq!(board.get(3, 0), Some(Some(PieceKind::T)));
        assert_eq!(board.get(4, 0), Some(Some(PieceKind::T)));
        assert_eq!(board.get(5, 0), Some(Some(PieceKind::T)));
    }

    #[test]
    fn test_find_complete_lines_top_to_bottom() {
        let mut board = Board::new();
        fill_row(&mut board, 17, PieceKind::I);
        fill_row(&mut board, 4, PieceKind::I);
        board.set(0, 10, Some(PieceKind::L));
        assert_eq!(board.find_complete_lines().as_slice(), &[4, 17]);
    }

    #[test]
    fn test_clear_two_separate_lines() {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT {
            if y == 2 || y == 5 {
                fill_row(&mut board, y, PieceKind::I);
            } else {
                // Mark each row uniquely by the column of its one cell.
                board.set((y % BOARD_WIDTH) as i32, y as i32, Some(PieceKind::T));
            }
        }
        let before = *board.grid();

        assert_eq!(board.clear_lines(&[2, 5]), 2);

        let after = board.grid();
        assert_eq!(after[0], EMPTY_ROW);
        assert_eq!(after[1], EMPTY_ROW);
        let survivors: Vec<Row> = (0..BOARD_HEIGHT)
            .filter(|&y| y != 2 && y != 5)
            .map(|y| before[y])
            .collect();
        assert_eq!(&after[2..], survivors.as_slice());
    }

    #[test]
    fn test_clear_adjacent_lines_unsorted_input() {
        let mut board = Board::new();
        fill_row(&mut board, 18, PieceKind::I);
        fill_row(&mut board, 19, PieceKind::I);
        board.set(3, 17, Some(PieceKind::S));

        assert_eq!(board.clear_lines(&[18, 19]), 2);
        assert_eq!(board.get(3, 19), Some(Some(PieceKind::S)));
        assert!(!board.is_row_full(19));
    }

    #[test]
    fn test_clear_no_lines() {
        let mut board = Board::new();
        board.set(1, 19, Some(PieceKind::S));
        let before = board.clone();
        assert_eq!(board.clear_lines(&[]), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_is_game_over_checks_top_row() {
        let mut board = Board::new();
        board.set(9, 1, Some(PieceKind::L));
        assert!(!board.is_game_over());
        board.set(9, 0, Some(PieceKind::L));
        assert!(board.is_game_over());
    }

    #[test]
    fn test_ghost_position() {
        let mut board = Board::new();
        let piece = Piece::new(PieceKind::O); // rows 0..=1
        assert_eq!(board.ghost_position(&piece), 18);

        board.set(4, 10, Some(PieceKind::I));
        assert_eq!(board.ghost_position(&piece), 8);
    }

    #[test]
    fn test_reset_empties_grid() {
        let mut board = Board::from_rows(&["IIIII.IIII"]);
        assert!(board.get(0, 19).unwrap().is_some());
        board.reset();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_from_rows_is_bottom_aligned() {
        let board = Board::from_rows(&["T.........", "IIIIIIIIIO"]);
        assert_eq!(board.get(0, 18), Some(Some(PieceKind::T)));
        assert_eq!(board.get(9, 19), Some(Some(PieceKind::O)));
        assert!(board.is_row_full(19));
        assert!(!board.is_row_full(18));
    }
}
