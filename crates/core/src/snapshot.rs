//! Snapshot module - per-frame views of a game for renderers
//!
//! [`GameSnapshot`] is owned so a renderer can keep drawing it after the
//! game moves on; [`BoardState`] borrows the grid instead.

use arrayvec::ArrayVec;

use crate::board::{Board, Grid};
use crate::piece::Piece;
use crate::types::{GameState, NEXT_QUEUE_LEN};

/// Borrowed view of the locked grid plus the current ghost offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardState<'a> {
    pub grid: &'a Grid,
    /// Rows the current piece would fall on a hard drop (0 with no piece)
    pub ghost_offset: i32,
}

/// Owned copy of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub board: Grid,
    pub current: Option<Piece>,
    pub ghost_offset: i32,
    pub hold: Option<Piece>,
    pub next: ArrayVec<Piece, NEXT_QUEUE_LEN>,
    pub can_hold: bool,
    pub state: GameState,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
}

impl GameSnapshot {
    /// Row the ghost piece is drawn at, if there is a current piece
    pub fn ghost_y(&self) -> Option<i32> {
        self.current.map(|p| p.y + self.ghost_offset)
    }

    pub fn playable(&self) -> bool {
        self.state == GameState::Playing
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: Board::empty_grid(),
            current: None,
            ghost_offset: 0,
            hold: None,
            next: ArrayVec::new(),
            can_hold: true,
            state: GameState::Ready,
            score: 0,
            level: 0,
            lines: 0,
            drop_interval_ms: 0,
        }
    }
}
