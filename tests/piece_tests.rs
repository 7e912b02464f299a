//! Piece tests - shapes, spawn placement, rotation

use tui_blockfall::core::{create_random_piece, random_piece_kind, Piece, Shape};
use tui_blockfall::types::{PieceKind, Rotation, BOARD_WIDTH};

#[test]
fn test_spawn_is_centered_for_every_kind() {
    for kind in PieceKind::ALL {
        let piece = Piece::new(kind);
        let expected = (BOARD_WIDTH as i32 - piece.shape.width() as i32).div_euclid(2);
        assert_eq!(piece.x, expected, "{:?}", kind);
        assert_eq!(piece.y, 0);
        assert_eq!(piece.color(), kind.color());
    }
}

#[test]
fn test_rotation_round_trip_every_kind() {
    for kind in PieceKind::ALL {
        let piece = Piece::new(kind);
        let mut shape = piece.shape;
        for _ in 0..4 {
            shape = shape.rotated_cw();
        }
        assert_eq!(shape, piece.shape, "{:?}", kind);
    }
}

#[test]
fn test_o_is_rotation_invariant() {
    let piece = Piece::new(PieceKind::O);
    assert_eq!(piece.rotate(), piece.shape);
}

#[test]
fn test_i_rotates_to_vertical() {
    let piece = Piece::new(PieceKind::I);
    let vertical = piece.rotate();
    let expected = Shape::from_rows(&[
        &[0, 0, 1, 0],
        &[0, 0, 1, 0],
        &[0, 0, 1, 0],
        &[0, 0, 1, 0],
    ]);
    assert_eq!(vertical, expected);
}

#[test]
fn test_s_and_z_rotations() {
    let s = Piece::new(PieceKind::S).rotate();
    assert_eq!(s, Shape::from_rows(&[&[0, 1, 0], &[0, 1, 1], &[0, 0, 1]]));
    let z = Piece::new(PieceKind::Z).rotate();
    assert_eq!(z, Shape::from_rows(&[&[0, 0, 1], &[0, 1, 1], &[0, 1, 0]]));
}

#[test]
fn test_apply_rotation_tracks_orientation() {
    let mut piece = Piece::new(PieceKind::L);
    let expected = [Rotation::East, Rotation::South, Rotation::West, Rotation::North];
    for rotation in expected {
        piece.apply_rotation();
        assert_eq!(piece.rotation, rotation);
        assert_eq!(piece.shape, Shape::oriented(PieceKind::L, rotation));
    }
}

#[test]
fn test_preview_copy_does_not_alias() {
    let mut live = Piece::new(PieceKind::T);
    let preview = live;
    live.apply_rotation();
    live.move_down();
    assert_eq!(preview, Piece::new(PieceKind::T));
}

#[test]
fn test_random_pieces_are_valid_kinds() {
    for _ in 0..50 {
        assert!(PieceKind::ALL.contains(&random_piece_kind()));
        let piece = create_random_piece();
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(piece.y, 0);
    }
}
