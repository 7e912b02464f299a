//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the game rules and session state. It has no dependency
//! on terminals or the clock: the host injects millisecond timestamps and
//! reads state back through queries or a [`GameSnapshot`].
//!
//! # Module Structure
//!
//! - [`piece`]: tetromino matrices, spawn position, matrix rotation
//! - [`board`]: 10x20 grid with collision checks, locking and line clearing
//! - [`game`]: the session state machine, scoring, levels, hold and gravity
//! - [`rng`]: seeded piece generators (uniform by default, 7-bag opt-in)
//! - [`snapshot`]: owned per-frame copy of everything a renderer draws
//!
//! # Game Rules
//!
//! - **Rotation**: clockwise only, probing kicks of +1, -1, +2, -2 columns
//! - **Locking**: a piece locks as soon as it cannot descend; there is no
//!   lock delay
//! - **Hold**: once per piece; held pieces come back at spawn orientation
//! - **Scoring**: 40/100/300/1200 x (level + 1) for line clears, 1 per soft
//!   drop row (gravity included), 2 per hard drop row
//! - **Levels**: one per 10 lines, each shortening the drop interval
//!
//! # Example
//!
//! ```
//! use blockfall_core::{Game, PieceGenerator};
//! use blockfall_core::types::{GameAction, GameState, PieceKind};
//!
//! let mut game = Game::with_generator(PieceGenerator::sequence([PieceKind::O]));
//! assert_eq!(game.state(), GameState::Ready);
//!
//! game.start(0);
//! game.apply_action(GameAction::MoveRight, 0);
//! game.apply_action(GameAction::HardDrop, 0);
//!
//! // The O fell 18 rows at 2 points each.
//! assert_eq!(game.score(), 36);
//! ```

pub mod board;
pub mod game;
pub mod piece;
pub mod rng;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Grid};
pub use game::Game;
pub use piece::{create_random_piece, random_piece_kind, Piece, Shape};
pub use rng::{PieceGenerator, Randomizer, SimpleRng};
pub use snapshot::{BoardState, GameSnapshot};
