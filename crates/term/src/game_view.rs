//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Piece, Shape};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameState, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const FALLBACK_FG: Rgb = Rgb::new(200, 200, 200);
/// Upper bound for either cell dimension; keeps frame arithmetic in `u16`.
const MAX_CELL_SIZE: u16 = 4;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Top-left corner of the board frame in the framebuffer
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: u16,
    y: u16,
}

impl GameView {
    /// Cell dimensions are clamped to `1..=4`.
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.clamp(1, MAX_CELL_SIZE),
            cell_h: cell_h.clamp(1, MAX_CELL_SIZE),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Width and height of the bordered board in terminal cells
    pub fn frame_size(&self) -> (u16, u16) {
        (
            (BOARD_WIDTH as u16) * self.cell_w + 2,
            (BOARD_HEIGHT as u16) * self.cell_h + 2,
        )
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is only resized when
    /// the viewport changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let origin = Origin {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
        };

        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        fb.fill_rect(
            origin.x + 1,
            origin.y + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG),
        );
        draw_border(fb, origin.x, origin.y, frame_w, frame_h, border);

        // Locked cells.
        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                match cell {
                    Some(kind) => self.draw_block(fb, origin, x as i32, y as i32, *kind),
                    None => self.draw_empty(fb, origin, x as i32, y as i32),
                }
            }
        }

        if let Some(piece) = snap.current {
            if snap.ghost_offset > 0 {
                let ghost = CellStyle::new(piece_rgb(piece.kind), PLAY_BG).dim();
                for (x, y) in piece.cells() {
                    self.fill_board_cell(fb, origin, x, y + snap.ghost_offset, '░', ghost);
                }
            }
            for (x, y) in piece.cells() {
                self.draw_block(fb, origin, x, y, piece.kind);
            }
        }

        self.draw_side_panel(fb, snap, viewport, origin, frame_w);

        match snap.state {
            GameState::Ready => self.draw_overlay(fb, origin, "READY", Some("press Enter")),
            GameState::Paused => self.draw_overlay(fb, origin, "PAUSED", Some("press P")),
            GameState::GameOver => self.draw_overlay(fb, origin, "GAME OVER", Some("press R")),
            GameState::Playing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_empty(&self, fb: &mut FrameBuffer, origin: Origin, x: i32, y: i32) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
        self.fill_board_cell(fb, origin, x, y, '·', style);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, origin: Origin, x: i32, y: i32, kind: PieceKind) {
        let style = CellStyle::new(piece_rgb(kind), PLAY_BG).bold();
        self.fill_board_cell(fb, origin, x, y, '█', style);
    }

    /// Fill one board cell; cells outside the visible grid are skipped
    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        x: i32,
        y: i32,
        ch: char,
        style: CellStyle,
    ) {
        if x < 0 || x >= BOARD_WIDTH as i32 || y < 0 || y >= BOARD_HEIGHT as i32 {
            return;
        }
        let px = origin.x + 1 + (x as u16) * self.cell_w;
        let py = origin.y + 1 + (y as u16) * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        origin: Origin,
        frame_w: u16,
    ) {
        let panel_x = origin.x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = origin.y;
        for (name, number) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), number, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        match snap.hold {
            Some(piece) => draw_preview(fb, panel_x, y, &piece, !snap.can_hold),
            None => fb.put_str(panel_x, y, "-", value),
        }
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for piece in snap.next.iter() {
            if y >= viewport.height {
                break;
            }
            draw_preview(fb, panel_x, y, piece, false);
            y = y.saturating_add(3);
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, origin: Origin, title: &str, hint: Option<&str>) {
        let (frame_w, frame_h) = self.frame_size();
        let mid_y = origin.y.saturating_add(frame_h / 2);
        let title_style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        put_centered(fb, origin.x, frame_w, mid_y, title, title_style);
        if let Some(hint) = hint {
            let hint_style = CellStyle::new(Rgb::new(180, 180, 180), PANEL_BG);
            put_centered(fb, origin.x, frame_w, mid_y.saturating_add(1), hint, hint_style);
        }
    }
}

fn put_centered(fb: &mut FrameBuffer, x: u16, w: u16, y: u16, text: &str, style: CellStyle) {
    let text_w = text.chars().count() as u16;
    fb.put_str(x.saturating_add(w.saturating_sub(text_w) / 2), y, text, style);
}

/// Draw a piece's spawn matrix, two columns per cell, trimmed to its filled rows
fn draw_preview(fb: &mut FrameBuffer, x: u16, y: u16, piece: &Piece, dim: bool) {
    let shape = Shape::canonical(piece.kind);
    let top = shape.filled().map(|(_, row)| row).min().unwrap_or(0);
    let mut style = CellStyle::new(piece_rgb(piece.kind), PANEL_BG);
    if dim {
        style = style.dim();
    }
    for (col, row) in shape.filled() {
        let px = x.saturating_add((col as u16) * 2);
        let py = y.saturating_add((row - top) as u16);
        fb.fill_rect(px, py, 2, 1, '█', style);
    }
}

/// Terminal color of a piece kind, from its color token
pub fn piece_rgb(kind: PieceKind) -> Rgb {
    Rgb::from_hex(kind.color()).unwrap_or(FALLBACK_FG)
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Game, PieceGenerator};

    fn game(kinds: &[PieceKind]) -> Game {
        Game::with_generator(PieceGenerator::sequence(kinds.iter().copied()))
    }

    fn contains_text(fb: &FrameBuffer, text: &str) -> bool {
        (0..fb.height()).any(|y| fb.row_text(y).contains(text))
    }

    #[test]
    fn test_frame_size_for_default_cells() {
        assert_eq!(GameView::default().frame_size(), (22, 22));
    }

    #[test]
    fn test_border_at_top_anchor() {
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let snap = GameSnapshot::default();
        let fb = view.render(&snap, Viewport::new(22, 22));
        assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
        assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
        // Too narrow for the side panel.
        assert!(!contains_text(&fb, "SCORE"));
    }

    #[test]
    fn test_ready_overlay_and_panel() {
        let g = game(&[PieceKind::T]);
        let fb = GameView::default().render(&g.snapshot(), Viewport::new(60, 24));
        assert!(contains_text(&fb, "READY"));
        assert!(contains_text(&fb, "press Enter"));
        for label in ["SCORE", "LEVEL", "LINES", "HOLD", "NEXT"] {
            assert!(contains_text(&fb, label), "{label}");
        }
    }

    #[test]
    fn test_current_piece_and_ghost_are_drawn() {
        let mut g = game(&[PieceKind::O]);
        g.start(0);
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let fb = view.render(&g.snapshot(), Viewport::new(22, 22));

        // O at columns 4..=5, rows 0..=1; board origin is (1, 1), two columns per cell.
        let block = fb.get(1 + 4 * 2, 1).unwrap();
        assert_eq!(block.ch, '█');
        assert_eq!(block.style.fg, piece_rgb(PieceKind::O));
        // Ghost on the floor rows.
        let ghost = fb.get(1 + 5 * 2 + 1, 1 + 19).unwrap();
        assert_eq!(ghost.ch, '░');
        assert!(ghost.style.dim);
        assert!(!contains_text(&fb, "READY"));
    }

    #[test]
    fn test_locked_cells_use_piece_color() {
        let mut g = game(&[PieceKind::O, PieceKind::I]);
        g.start(0);
        g.hard_drop();
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let fb = view.render(&g.snapshot(), Viewport::new(22, 22));
        let cell = fb.get(1 + 4 * 2, 1 + 19).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, Rgb::new(0xf0, 0xf0, 0x00));
    }

    #[test]
    fn test_pause_and_game_over_overlays() {
        let mut g = game(&[PieceKind::O]);
        g.start(0);
        g.toggle_pause(0);
        let view = GameView::default();
        let fb = view.render(&g.snapshot(), Viewport::new(60, 24));
        assert!(contains_text(&fb, "PAUSED"));

        let mut snap = g.snapshot();
        snap.state = GameState::GameOver;
        let fb = view.render(&snap, Viewport::new(60, 24));
        assert!(contains_text(&fb, "GAME OVER"));
        assert!(contains_text(&fb, "press R"));
    }

    #[test]
    fn test_score_is_printed() {
        let mut g = game(&[PieceKind::O]);
        g.start(0);
        g.hard_drop();
        let fb = GameView::default().render(&g.snapshot(), Viewport::new(60, 24));
        assert!(contains_text(&fb, "36"));
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let g = game(&[PieceKind::I]);
        let fb = GameView::default().render(&g.snapshot(), Viewport::new(3, 2));
        assert_eq!(fb.width(), 3);
    }

    #[test]
    fn test_cell_size_is_clamped() {
        assert_eq!(GameView::new(0, 0).frame_size(), (12, 22));
        let view = GameView::new(u16::MAX, 1000);
        assert_eq!(view.frame_size(), (42, 82));

        let mut g = game(&[PieceKind::O]);
        g.start(0);
        let fb = view.render(&g.snapshot(), Viewport::new(30, 20));
        assert_eq!(fb.width(), 30);
    }
}
