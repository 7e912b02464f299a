use tui_blockfall::core::{Game, GameSnapshot, Piece, PieceGenerator};
use tui_blockfall::term::{piece_rgb, AnchorY, FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_blockfall::types::{GameState, PieceKind};

fn screen_text(fb: &FrameBuffer) -> String {
    (0..fb.height()).map(|y| fb.row_text(y) + "\n").collect()
}

#[test]
fn term_view_renders_border_corners() {
    let snap = Game::with_seed(1).snapshot();
    let view = GameView::default();

    // With cell_w=2 and cell_h=1:
    // board pixels = 10*2 by 20*1 => 20x20
    // plus border => 22x22
    let vp = Viewport::new(22, 22);
    let fb = view.render(&snap, vp);

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_renders_locked_cell_as_two_chars_wide() {
    let mut snap = GameSnapshot::default();
    snap.state = GameState::Playing;
    snap.board[19][0] = Some(PieceKind::I);

    let fb = GameView::default().render(&snap, Viewport::new(22, 22));

    // Inside border: (1,1) origin. Each cell is 2 chars wide.
    let x0 = 1;
    let y0 = 1 + 19;
    for x in [x0, x0 + 1] {
        let cell = fb.get(x, y0).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, piece_rgb(PieceKind::I));
    }
    assert_eq!(fb.get(x0 + 2, y0).unwrap().ch, '·');
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut snap = GameSnapshot::default();
    snap.state = GameState::Playing;
    snap.score = 1234;
    snap.level = 2;
    snap.lines = 21;
    snap.hold = Some(Piece::new(PieceKind::T));
    snap.can_hold = false;

    let view = GameView::default();
    let fb = view.render(&snap, Viewport::new(60, 22));
    let text = screen_text(&fb);

    for needle in ["SCORE", "1234", "LEVEL", "LINES", "21", "HOLD", "NEXT"] {
        assert!(text.contains(needle), "missing {needle}");
    }
}

#[test]
fn term_view_hides_side_panel_when_narrow() {
    let snap = GameSnapshot::default();
    let fb = GameView::default().render(&snap, Viewport::new(30, 22));
    assert!(!screen_text(&fb).contains("SCORE"));
}

#[test]
fn term_view_overlays_follow_game_state() {
    let mut game = Game::with_generator(PieceGenerator::sequence([PieceKind::T]));
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let vp = Viewport::new(40, 22);

    assert!(screen_text(&view.render(&game.snapshot(), vp)).contains("READY"));

    game.start(0);
    let text = screen_text(&view.render(&game.snapshot(), vp));
    assert!(!text.contains("READY"));
    assert!(!text.contains("PAUSED"));

    game.toggle_pause(10);
    assert!(screen_text(&view.render(&game.snapshot(), vp)).contains("PAUSED"));
}

#[test]
fn term_view_render_into_reuses_buffer() {
    let game = Game::with_seed(3);
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    view.render_into(&game.snapshot(), Viewport::new(50, 24), &mut fb);
    assert_eq!((fb.width(), fb.height()), (50, 24));
    view.render_into(&game.snapshot(), Viewport::new(30, 22), &mut fb);
    assert_eq!(fb.cells().len(), 30 * 22);
}

#[test]
fn terminal_renderer_constructs_without_touching_terminal() {
    let mut renderer = TerminalRenderer::default();
    renderer.invalidate();
}
