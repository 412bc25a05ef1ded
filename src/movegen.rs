// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move filtering. A piece's move template (`Piece::basic_moves`) is checked against the
//! occupancy of the board here; whether a move leaves the mover's own king in check is decided by `logic`.

use crate::board::Board;
use crate::core::*;

/// Returns whether the piece `id` may move to `target` given the pieces on the board, ignoring the safety of
/// its own king. `target` is expected to come from the piece's move template.
pub fn is_legal_move(board: &Board, id: PieceId, target: Coord) -> bool {
    let piece = board.piece(id);
    match piece.kind() {
        kind if kind.is_sliding() => is_ray_clear(board, piece, target),
        PieceKind::Knight => !holds_friend(board, piece, target),
        PieceKind::King if is_castling_target(piece.coord(), target) => {
            castling_allowed(board, piece, target)
        }
        PieceKind::King => !holds_friend(board, piece, target),
        PieceKind::Pawn => pawn_move_allowed(board, piece, target),
        _ => unreachable!("sliding kinds are matched above"),
    }
}

/// Returns whether a king moving from `from` to `to` is castling rather than stepping.
pub fn is_castling_target(from: Coord, to: Coord) -> bool {
    (from.col() as i8 - to.col() as i8).abs() > 1
}

fn holds_friend(board: &Board, piece: &Piece, target: Coord) -> bool {
    board
        .piece_at(target)
        .map_or(false, |occupant| !occupant.is_enemy_of(piece))
}

/// Walks from the piece towards `target`. The first occupied square ends the walk: a friendly piece blocks
/// everything from there on, and an enemy piece may be captured only if it stands on `target`.
fn is_ray_clear(board: &Board, piece: &Piece, target: Coord) -> bool {
    let dir = match Direction::between(piece.coord(), target) {
        Some(dir) => dir,
        None => return false,
    };

    let mut cursor = piece.coord();
    while let Some(next) = cursor.towards(dir) {
        if let Some(occupant) = board.piece_at(next) {
            return next == target && occupant.is_enemy_of(piece);
        }

        if next == target {
            return true;
        }

        cursor = next;
    }

    false
}

/// Decides whether `king` may castle with the rook standing on `rook_square`.
///
/// The king must not be in check, neither it nor the rook may have moved, every square between them must be
/// empty and the two squares the king crosses must not be threatened by the enemy.
pub fn castling_allowed(board: &Board, king: &Piece, rook_square: Coord) -> bool {
    if king.has_moved() || board.is_check(king.color()) {
        return false;
    }

    let rook = match board.piece_at(rook_square) {
        Some(rook) => rook,
        None => return false,
    };

    if rook.is_enemy_of(king) || rook.kind() != PieceKind::Rook || rook.has_moved() {
        return false;
    }

    let dir = match Direction::between(king.coord(), rook_square) {
        Some(dir @ (Direction::East | Direction::West)) => dir,
        _ => return false,
    };

    let mut cursor = king.coord();
    let mut steps = 0;
    while let Some(next) = cursor.towards(dir) {
        if next == rook_square {
            return true;
        }

        steps += 1;
        if board.piece_at(next).is_some() {
            return false;
        }

        if steps <= 2 && board.is_threatened_by_enemy(next, king.color()) {
            return false;
        }

        cursor = next;
    }

    false
}

fn pawn_move_allowed(board: &Board, pawn: &Piece, target: Coord) -> bool {
    let from = pawn.coord();
    if target.col() != from.col() {
        return match board.piece_at(target) {
            Some(occupant) => occupant.is_enemy_of(pawn),
            None => is_en_passant_capture(board, pawn, target),
        };
    }

    if board.piece_at(target).is_some() {
        return false;
    }

    // a double step also needs the square it passes over.
    if (target.row() as i8 - from.row() as i8).abs() == 2 {
        return from
            .offset(pawn.color().forward(), 0)
            .map_or(false, |between| board.piece_at(between).is_none());
    }

    true
}

/// Returns whether `pawn` moving diagonally onto the empty square `target` captures en passant: the last
/// recorded move must be an enemy pawn's double step that landed directly behind `target`.
pub fn is_en_passant_capture(board: &Board, pawn: &Piece, target: Coord) -> bool {
    let last = match board.last_move() {
        Some(last) if last.is_double_step() => last,
        _ => return false,
    };

    let victim = match board.piece_at(last.to) {
        Some(victim) => victim,
        None => return false,
    };

    victim.kind() == PieceKind::Pawn
        && victim.is_enemy_of(pawn)
        && target.offset(-pawn.color().forward(), 0) == Some(last.to)
        && target.col() != pawn.coord().col()
}

/// The squares a piece threatens: its pseudo-legal destinations, minus the squares straight ahead of a pawn
/// and castling targets of a king.
pub(crate) fn threat_targets(board: &Board, piece: &Piece) -> Vec<Coord> {
    let from = piece.coord();
    piece
        .basic_moves()
        .into_iter()
        .filter(|&target| match piece.kind() {
            PieceKind::Pawn => target.col() != from.col(),
            PieceKind::King => !is_castling_target(from, target),
            _ => true,
        })
        .filter(|&target| is_legal_move(board, piece.id(), target))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::board::Board;
    use crate::core::*;

    fn assert_targets(board: &Board, from: Coord, expected: &[Coord]) {
        let id = board.piece_at(from).unwrap().id();
        let generated: HashSet<_> = board.possible_moves(id).into_iter().collect();
        let expected: HashSet<_> = expected.iter().copied().collect();
        if generated != expected {
            println!("{}", board);
            println!("generated: {:?}", generated);
            println!("expected:  {:?}", expected);
            panic!()
        }
    }

    fn assert_targets_contain(board: &Board, from: Coord, moves: &[Coord]) {
        let id = board.piece_at(from).unwrap().id();
        let generated = board.possible_moves(id);
        for target in moves {
            if !generated.contains(target) {
                println!("move {}-{} was not generated", from, target);
                println!("{}", board);
                panic!()
            }
        }
    }

    fn assert_targets_do_not_contain(board: &Board, from: Coord, moves: &[Coord]) {
        let id = board.piece_at(from).unwrap().id();
        let generated = board.possible_moves(id);
        for target in moves {
            if generated.contains(target) {
                println!("banned move {}-{} was generated", from, target);
                println!("{}", board);
                panic!()
            }
        }
    }

    mod pawns {
        use super::*;

        #[test]
        fn start_position_pushes() {
            let board = Board::new();
            assert_targets(&board, E2, &[E3, E4]);
            assert_targets(&board, D7, &[D6, D5]);
        }

        #[test]
        fn single_step_after_moving() {
            let mut board = Board::new();
            board.execute_move(E2, E4, MoveKind::Normal).unwrap();
            assert_targets(&board, E4, &[E5]);
        }

        #[test]
        fn blocked() {
            let board = Board::from_diagram(
                "....k...\n........\n........\n........\n....p...\n....P...\n........\n....K...",
            )
            .unwrap();
            assert_targets(&board, E3, &[]);
        }

        #[test]
        fn double_step_blocked_in_between() {
            let board = Board::from_diagram(
                "....k...\n........\n........\n........\n........\n...n....\n...P....\n....K...",
            )
            .unwrap();
            assert_targets(&board, D2, &[]);
        }

        #[test]
        fn double_step_blocked_on_target() {
            let board = Board::from_diagram(
                "....k...\n........\n........\n........\n...n....\n........\n...P....\n....K...",
            )
            .unwrap();
            assert_targets(&board, D2, &[D3]);
        }

        #[test]
        fn captures_enemy_only() {
            let board = Board::from_diagram(
                "....k...\n........\n........\n........\n........\n..n.N...\n...P....\n....K...",
            )
            .unwrap();
            assert_targets(&board, D2, &[D3, D4, C3]);
        }

        #[test]
        fn black_captures_downwards() {
            let board = Board::from_diagram(
                "....k...\n...p....\n..P.....\n........\n........\n........\n........\n....K...",
            )
            .unwrap();
            assert_targets(&board, D7, &[D6, D5, C6]);
        }

        #[test]
        fn en_passant_after_double_step() {
            let mut board = Board::from_diagram(
                "....k...\n...p....\n........\n....P...\n........\n........\n........\n....K...",
            )
            .unwrap();
            board.execute_move(D7, D5, MoveKind::Normal).unwrap();
            assert_targets(&board, E5, &[E6, D6]);
        }

        #[test]
        fn en_passant_only_immediately() {
            let mut board = Board::from_diagram(
                "....k...\n...p....\n........\n....P...\n........\n........\n.......P\n....K...",
            )
            .unwrap();
            board.execute_move(D7, D5, MoveKind::Normal).unwrap();
            board.execute_move(H2, H3, MoveKind::Normal).unwrap();
            assert_targets_do_not_contain(&board, E5, &[D6]);
        }

        #[test]
        fn no_en_passant_after_single_steps() {
            let mut board = Board::from_diagram(
                "....k...\n........\n...p....\n....P...\n........\n........\n........\n....K...",
            )
            .unwrap();
            board.execute_move(D6, D5, MoveKind::Normal).unwrap();
            assert_targets(&board, E5, &[E6]);
        }
    }

    mod sliders {
        use super::*;

        #[test]
        fn rook_stops_at_friend() {
            let board = Board::from_diagram(
                "....k...\n........\n........\n........\n........\n........\nP.......\nR...K...",
            )
            .unwrap();
            assert_targets(&board, A1, &[B1, C1, D1]);
        }

        #[test]
        fn rook_captures_first_enemy() {
            let board = Board::from_diagram(
                "....k...\nr.......\nn.......\n........\n........\n........\n........\nR...K...",
            )
            .unwrap();
            assert_targets_contain(&board, A1, &[A2, A5, A6]);
            assert_targets_do_not_contain(&board, A1, &[A7, A8]);
        }

        #[test]
        fn bishop_in_start_position_is_boxed_in() {
            let board = Board::new();
            assert_targets(&board, C1, &[]);
            assert_targets(&board, F8, &[]);
        }

        #[test]
        fn queen_open_board() {
            let board = Board::from_diagram(
                "k.......\n........\n........\n........\n...Q....\n........\n........\n.......K",
            )
            .unwrap();
            let id = board.piece_at(D4).unwrap().id();
            assert_eq!(27, board.possible_moves(id).len());
            assert_targets_contain(&board, D4, &[A1, A7, H8, G1]);
        }
    }

    mod steppers {
        use super::*;

        #[test]
        fn knights_in_start_position() {
            let board = Board::new();
            assert_targets(&board, B1, &[A3, C3]);
            assert_targets(&board, G8, &[F6, H6]);
        }

        #[test]
        fn king_blocked_by_own_pieces() {
            let board = Board::new();
            assert_targets(&board, E1, &[]);
        }

        #[test]
        fn king_captures_adjacent_enemy() {
            let board = Board::from_diagram(
                "....k...\n........\n........\n........\n........\n........\n...pP...\n....K...",
            )
            .unwrap();
            assert_targets_contain(&board, E1, &[D2, D1, F1, F2]);
            assert_targets_do_not_contain(&board, E1, &[E2]);
        }
    }

    mod castling {
        use super::*;

        const OPEN: &str =
            "r...k..r\npppppppp\n........\n........\n........\n........\nPPPPPPPP\nR...K..R";

        #[test]
        fn both_sides_open() {
            let board = Board::from_diagram(OPEN).unwrap();
            assert_targets(&board, E1, &[D1, F1, A1, H1]);
            assert_targets(&board, E8, &[D8, F8, A8, H8]);
        }

        #[test]
        fn blocked_by_piece_between() {
            let board = Board::from_diagram(
                "r...k..r\npppppppp\n........\n........\n........\n........\nPPPPPPPP\nRN..K.NR",
            )
            .unwrap();
            assert_targets_do_not_contain(&board, E1, &[A1, H1]);
        }

        #[test]
        fn crossing_square_threatened() {
            let board = Board::from_diagram(
                "r...k..r\npppppppp\n........\n........\n........\n.....r..\nPPPPP.PP\nR...K..R",
            )
            .unwrap();
            assert!(!board.is_check(Color::White));
            assert_targets_do_not_contain(&board, E1, &[H1]);
            assert_targets_contain(&board, E1, &[A1]);
        }

        #[test]
        fn third_square_threatened_is_fine() {
            // the b1 square is crossed by the rook only.
            let board = Board::from_diagram(
                "r...k..r\npppppppp\n........\n........\n........\n.r......\nP.PPPPPP\nR...K..R",
            )
            .unwrap();
            assert!(board.is_threatened_by_enemy(B1, Color::White));
            assert_targets_contain(&board, E1, &[A1]);
        }

        #[test]
        fn not_out_of_check() {
            let board = Board::from_diagram(
                "r...k..r\npppppppp\n........\n........\n........\n....r...\nPPPP.PPP\nR...K..R",
            )
            .unwrap();
            assert!(board.is_check(Color::White));
            assert_targets_do_not_contain(&board, E1, &[A1, H1]);
        }

        #[test]
        fn rook_has_moved() {
            let mut board = Board::from_diagram(OPEN).unwrap();
            board.execute_move(H1, G1, MoveKind::Normal).unwrap();
            board.execute_move(G1, H1, MoveKind::Normal).unwrap();
            assert_targets_do_not_contain(&board, E1, &[H1]);
            assert_targets_contain(&board, E1, &[A1]);
        }

        #[test]
        fn king_has_moved() {
            let mut board = Board::from_diagram(OPEN).unwrap();
            board.execute_move(E1, F1, MoveKind::Normal).unwrap();
            board.execute_move(F1, E1, MoveKind::Normal).unwrap();
            assert_targets(&board, E1, &[D1, F1]);
        }

        #[test]
        fn black_crossing_square_threatened() {
            let board = Board::from_diagram(
                "r...k..r\nppp.pppp\n........\n........\n........\n...R....\nPPPPPPPP\n....K...",
            )
            .unwrap();
            assert!(!board.is_check(Color::Black));
            assert!(board.is_threatened_by_enemy(D8, Color::Black));
            assert_targets_do_not_contain(&board, E8, &[A8]);
            assert_targets_contain(&board, E8, &[H8, D8, D7]);
        }

        #[test]
        fn black_not_out_of_check() {
            let board = Board::from_diagram(
                "r...k..r\npppp.ppp\n........\n........\n........\n....R...\nPPPPPPPP\n....K...",
            )
            .unwrap();
            assert!(board.is_check(Color::Black));
            assert_targets_do_not_contain(&board, E8, &[A8, H8]);
        }

        #[test]
        fn black_rook_has_moved() {
            let mut board = Board::from_diagram(OPEN).unwrap();
            board.execute_move(A8, B8, MoveKind::Normal).unwrap();
            board.execute_move(B8, A8, MoveKind::Normal).unwrap();
            assert_targets_do_not_contain(&board, E8, &[A8]);
            assert_targets_contain(&board, E8, &[H8]);
        }

        #[test]
        fn black_king_has_moved() {
            let mut board = Board::from_diagram(OPEN).unwrap();
            board.execute_move(E8, D8, MoveKind::Normal).unwrap();
            board.execute_move(D8, E8, MoveKind::Normal).unwrap();
            assert_targets(&board, E8, &[D8, F8]);
        }

        #[test]
        fn castling_targets_are_not_threats() {
            let board = Board::from_diagram(OPEN).unwrap();
            let king = board.king(Color::White).id();
            assert!(!board.square(H1).threatened_by().contains(king));
            assert!(board.square(F1).threatened_by().contains(king));
        }
    }
}
