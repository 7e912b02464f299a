//! Game module - owns a session: board, piece slots, scoring, state machine
//!
//! All commands are total: a command that does not apply in the current
//! state (or is blocked by the board) returns `false` and changes nothing.
//! Time is never read here; the host passes a wall-clock millisecond value
//! to [`Game::start`], [`Game::toggle_pause`] and [`Game::update`].

use arrayvec::ArrayVec;
use log::{debug, info, trace};

use crate::board::Board;
use crate::piece::Piece;
use crate::rng::PieceGenerator;
use crate::snapshot::{BoardState, GameSnapshot};
use crate::types::*;

/// Complete game session state
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current: Option<Piece>,
    hold: Option<Piece>,
    /// Cleared once hold is used; re-armed by the next spawn
    can_hold: bool,
    next: ArrayVec<Piece, NEXT_QUEUE_LEN>,
    generator: PieceGenerator,
    state: GameState,
    score: u32,
    level: u32,
    lines: u32,
    drop_interval_ms: u32,
    last_drop_ms: u64,
    last_event: Option<LockEvent>,
}

impl Game {
    /// New game in `Ready`, drawing pieces uniformly from an entropy seed
    pub fn new() -> Self {
        Self::with_generator(PieceGenerator::default())
    }

    /// New game with a reproducible uniform piece stream
    pub fn with_seed(seed: u32) -> Self {
        Self::with_generator(PieceGenerator::uniform(seed))
    }

    pub fn with_generator(generator: PieceGenerator) -> Self {
        let mut game = Self {
            board: Board::new(),
            current: None,
            hold: None,
            can_hold: true,
            next: ArrayVec::new(),
            generator,
            state: GameState::Ready,
            score: 0,
            level: 0,
            lines: 0,
            drop_interval_ms: drop_interval_for_level(0),
            last_drop_ms: 0,
            last_event: None,
        };
        game.fill_next_queue();
        game
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn hold_piece(&self) -> Option<Piece> {
        self.hold
    }

    /// Copy of the upcoming pieces, head first
    pub fn next_pieces(&self) -> ArrayVec<Piece, NEXT_QUEUE_LEN> {
        self.next.clone()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Start a fresh session.
    ///
    /// Accepted from `Ready`, `Paused` and `GameOver`; ignored while playing.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.state == GameState::Playing {
            trace!("start ignored: already playing");
            return false;
        }

        // A fresh game is already reset and keeps the preview shown in Ready.
        if self.state != GameState::Ready {
            self.reset();
        }
        self.state = GameState::Playing;
        info!("game started");
        self.spawn_piece();
        self.last_drop_ms = now_ms;
        true
    }

    fn reset(&mut self) {
        self.board.reset();
        self.current = None;
        self.hold = None;
        self.can_hold = true;
        self.score = 0;
        self.level = 0;
        self.lines = 0;
        self.drop_interval_ms = drop_interval_for_level(0);
        self.last_event = None;
        self.fill_next_queue();
    }

    fn fill_next_queue(&mut self) {
        self.next.clear();
        while !self.next.is_full() {
            let piece = self.generator.next_piece();
            self.next.push(piece);
        }
    }

    /// Promote the head of the next queue to the current piece.
    ///
    /// Refills the queue tail and re-arms hold. Returns false, and ends the
    /// game, if the new piece does not fit at its spawn position.
    pub fn spawn_piece(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }

        let piece = if self.next.is_empty() {
            self.generator.next_piece()
        } else {
            self.next.remove(0)
        };
        let upcoming = self.generator.next_piece();
        self.next.push(upcoming);

        self.current = Some(piece);
        self.can_hold = true;

        if !self.board.is_valid_position(&piece, 0, 0, None) {
            info!("spawn blocked for {} piece, game over", piece.kind.as_str());
            self.state = GameState::GameOver;
            return false;
        }

        true
    }

    /// Toggle between `Playing` and `Paused`.
    ///
    /// Resuming restamps the drop clock so paused time never counts
    /// towards gravity.
    pub fn toggle_pause(&mut self, now_ms: u64) -> bool {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                info!("paused");
                true
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                self.last_drop_ms = now_ms;
                info!("resumed");
                true
            }
            GameState::Ready | GameState::GameOver => false,
        }
    }

    pub fn move_left(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        if !self.board.is_valid_position(piece, -1, 0, None) {
            return false;
        }
        piece.move_left();
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        if !self.board.is_valid_position(piece, 1, 0, None) {
            return false;
        }
        piece.move_right();
        true
    }

    /// Soft drop one row (scoring [`SOFT_DROP_POINTS`]).
    ///
    /// If the piece cannot descend it locks instead and this returns false.
    pub fn move_down(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };

        if self.board.is_valid_position(piece, 0, 1, None) {
            piece.move_down();
            self.score = self.score.saturating_add(SOFT_DROP_POINTS);
            true
        } else {
            self.lock_current_piece();
            false
        }
    }

    /// Rotate clockwise, trying [`WALL_KICKS`] in order if blocked in place.
    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };

        let rotated = piece.rotate();
        let kick = std::iter::once(0)
            .chain(WALL_KICKS)
            .find(|&dx| self.board.is_valid_position(piece, dx, 0, Some(&rotated)));

        match kick {
            Some(dx) => {
                piece.x += dx;
                piece.apply_rotation();
                if dx != 0 {
                    debug!("wall kick {:+} for {} piece", dx, piece.kind.as_str());
                }
                true
            }
            None => {
                trace!("rotation blocked for {} piece", piece.kind.as_str());
                false
            }
        }
    }

    /// Drop straight to the landing row, score [`HARD_DROP_POINTS`] per row,
    /// and lock.
    pub fn hard_drop(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };

        let mut distance: u32 = 0;
        while self.board.is_valid_position(piece, 0, 1, None) {
            piece.move_down();
            distance += 1;
        }

        self.score = self
            .score
            .saturating_add(distance.saturating_mul(HARD_DROP_POINTS));
        self.lock_current_piece();
        true
    }

    /// Bank the current piece, once per piece.
    ///
    /// The first hold stores the current kind and spawns from the queue.
    /// Later holds swap kinds with the banked piece. Either way both pieces
    /// come back at spawn orientation and position. A swap whose incoming
    /// piece does not fit at spawn is rejected and changes nothing.
    pub fn hold(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        if !self.can_hold {
            trace!("hold ignored: already used for this piece");
            return false;
        }
        let Some(current) = self.current else {
            return false;
        };

        match self.hold {
            None => {
                self.hold = Some(Piece::new(current.kind));
                self.spawn_piece();
            }
            Some(held) => {
                let swapped = Piece::new(held.kind);
                if !self.board.is_valid_position(&swapped, 0, 0, None) {
                    trace!("hold ignored: {} piece does not fit at spawn", swapped.kind.as_str());
                    return false;
                }
                self.hold = Some(Piece::new(current.kind));
                self.current = Some(swapped);
            }
        }

        self.can_hold = false;
        debug!("held {} piece", current.kind.as_str());
        true
    }

    /// Commit the current piece, clear lines, score, level up, and spawn.
    fn lock_current_piece(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        self.board.lock_piece(&piece);

        let mut event = LockEvent {
            kind: piece.kind,
            lines_cleared: 0,
            line_clear_score: 0,
            level_up: false,
        };

        let complete = self.board.find_complete_lines();
        if !complete.is_empty() {
            let cleared = self.board.clear_lines(&complete) as u32;
            let points = line_points(cleared as usize).saturating_mul(self.level + 1);
            self.score = self.score.saturating_add(points);
            self.lines += cleared;
            event.lines_cleared = cleared;
            event.line_clear_score = points;
            debug!("cleared {} line(s) for {} points", cleared, points);

            let new_level = self.lines / LINES_PER_LEVEL;
            if new_level > self.level {
                self.level = new_level;
                self.drop_interval_ms = drop_interval_for_level(new_level);
                event.level_up = true;
                info!(
                    "level {} reached, drop interval {}ms",
                    self.level, self.drop_interval_ms
                );
            }
        }

        self.last_event = Some(event);

        if self.board.is_game_over() {
            info!("stack reached the top row, game over");
            self.state = GameState::GameOver;
            return;
        }

        self.spawn_piece();
    }

    /// Gravity tick: one soft-drop step once the drop interval has elapsed.
    ///
    /// Gravity steps go through [`Game::move_down`] and so score like a
    /// manual soft drop. Returns true if a step was taken.
    pub fn update(&mut self, now_ms: u64) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        if now_ms.saturating_sub(self.last_drop_ms) < u64::from(self.drop_interval_ms) {
            return false;
        }

        self.move_down();
        self.last_drop_ms = now_ms;
        true
    }

    /// Rows the current piece can still fall (0 with no current piece)
    pub fn ghost_offset(&self) -> i32 {
        self.current
            .as_ref()
            .map_or(0, |piece| self.board.ghost_position(piece))
    }

    /// Locked grid and ghost offset for rendering
    pub fn board_state(&self) -> BoardState<'_> {
        BoardState {
            grid: self.board.grid(),
            ghost_offset: self.ghost_offset(),
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board = *self.board.grid();
        out.current = self.current;
        out.ghost_offset = self.ghost_offset();
        out.hold = self.hold;
        out.next.clone_from(&self.next);
        out.can_hold = self.can_hold;
        out.state = self.state;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.drop_interval_ms = self.drop_interval_ms;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction, now_ms: u64) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.move_down(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Rotate => self.rotate(),
            GameAction::Hold => self.hold(),
            GameAction::Pause => self.toggle_pause(now_ms),
            GameAction::Start => self.start(now_ms),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
