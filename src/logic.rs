// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Game logic layered over a `Board`: which moves are legal, what a requested move means, playing it and
//! deciding whether the game is over.

use tracing::{info, warn};

use crate::board::{Board, MoveError};
use crate::core::*;
use crate::movegen;

/// Produces the legal moves of the piece standing on `from`.
///
/// Each pseudo-legal candidate is played out on a copy of the board. A king may not step onto a threatened
/// square. For every other piece the enemy kinds threatening its own king are compared before and after the
/// candidate; a candidate that changes them without clearing them is rejected, and one that clears them
/// resolves a check. If any candidate resolves a check, only resolving candidates are returned. A piece
/// facing more than one threatener whose candidate changes the threat without clearing it has no moves at
/// all.
pub fn legal_moves(board: &Board, from: Coord) -> Result<Vec<Move>, MoveError> {
    let piece = board
        .piece_at(from)
        .ok_or(MoveError::NoPieceAtOrigin(from))?;
    let color = piece.color();
    let candidates = board.possible_moves(piece.id());

    if piece.kind() == PieceKind::King {
        let mut moves = Vec::with_capacity(candidates.len());
        for target in candidates {
            if movegen::is_castling_target(from, target) {
                let side = CastleSide::towards(from, target);
                moves.push(Move::new(
                    from,
                    side.king_landing(color),
                    MoveIntent::Castle(side),
                ));
                continue;
            }

            let intent = classify(board, from, target)?;
            let mut sim = board.clone();
            apply(&mut sim, from, target, intent)?;
            if !sim.is_threatened_by_enemy(target, color) {
                moves.push(Move::new(from, target, intent));
            }
        }

        return Ok(moves);
    }

    let king_at = board.king(color).coord();
    let before = board.enemy_threat_kinds(king_at, color);
    let mut safe = Vec::new();
    let mut resolving = Vec::new();
    for target in candidates {
        let intent = classify(board, from, target)?;
        let mut sim = board.clone();
        apply(&mut sim, from, target, intent)?;
        let after = sim.enemy_threat_kinds(king_at, color);
        let mov = Move::new(from, target, intent);
        if after == before {
            safe.push(mov);
        } else if after.is_empty() {
            resolving.push(mov);
        } else if before.len() > 1 {
            return Ok(vec![]);
        }
    }

    if resolving.is_empty() {
        Ok(safe)
    } else {
        Ok(resolving)
    }
}

/// Produces the legal moves of every active piece of the given color.
pub fn all_legal_moves(board: &Board, color: Color) -> Result<Vec<Move>, MoveError> {
    let mut moves = Vec::new();
    for piece in board.active_pieces(color) {
        moves.extend(legal_moves(board, piece.coord())?);
    }

    Ok(moves)
}

/// Decides what moving the piece on `from` to `to` means. A king asked to move more than one column is
/// castling, whether `to` names its landing square or its rook's square.
pub fn classify(board: &Board, from: Coord, to: Coord) -> Result<MoveIntent, MoveError> {
    let piece = board
        .piece_at(from)
        .ok_or(MoveError::NoPieceAtOrigin(from))?;
    let intent = match piece.kind() {
        PieceKind::King if movegen::is_castling_target(from, to) => {
            MoveIntent::Castle(CastleSide::towards(from, to))
        }
        PieceKind::Pawn if from.col() != to.col() && board.square(to).is_empty() => {
            MoveIntent::EnPassant
        }
        PieceKind::Pawn if to.row() == piece.color().promotion_row() => MoveIntent::Promotion,
        _ => MoveIntent::Normal,
    };

    Ok(intent)
}

/// Carries out a classified move on the board. Returns false if a castling request was refused, in which
/// case the board is left untouched.
pub(crate) fn apply(
    board: &mut Board,
    from: Coord,
    to: Coord,
    intent: MoveIntent,
) -> Result<bool, MoveError> {
    match intent {
        MoveIntent::Castle(side) => {
            let king = board
                .piece_at(from)
                .ok_or(MoveError::NoPieceAtOrigin(from))?;
            let rook_square = side.rook_home(king.color());
            if !movegen::castling_allowed(board, king, rook_square) {
                warn!(%from, ?side, "castling not allowed, ignoring move");
                return Ok(false);
            }

            board.execute_castling(from, rook_square)?;
        }
        MoveIntent::EnPassant => board.execute_en_passant(from, to)?,
        MoveIntent::Promotion => {
            board.execute_move(from, to, MoveKind::Normal)?;
            board.request_promotion(to)?;
        }
        MoveIntent::Normal => board.execute_move(from, to, MoveKind::Normal)?,
    }

    Ok(true)
}

/// Plays the piece on `from` to `to` and reports the resulting state of the game. The move is not checked
/// for legality; callers pick it from `legal_moves`. A refused castling request changes nothing.
pub fn play(board: &mut Board, from: Coord, to: Coord) -> Result<GameState, MoveError> {
    let color = board
        .piece_at(from)
        .ok_or(MoveError::NoPieceAtOrigin(from))?
        .color();
    let intent = classify(board, from, to)?;
    if !apply(board, from, to, intent)? {
        return Ok(board.game_state());
    }

    let next = color.toggle();
    board.set_side_to_move(next);
    let state = if is_checkmate(board, next)? {
        GameState::checkmated(next)
    } else {
        GameState::Continue
    };

    board.set_game_state(state);
    Ok(state)
}

/// Returns whether the given color is checkmated: its king is threatened, cannot move, and no other piece
/// has a move that lifts the threat.
pub fn is_checkmate(board: &Board, color: Color) -> Result<bool, MoveError> {
    let king = board.king(color);
    if !board.is_threatened_by_enemy(king.coord(), color) {
        return Ok(false);
    }

    if !legal_moves(board, king.coord())?.is_empty() {
        return Ok(false);
    }

    for piece in board.active_pieces(color).filter(|p| p.id() != king.id()) {
        for mov in legal_moves(board, piece.coord())? {
            let mut sim = board.clone();
            apply(&mut sim, mov.from, mov.to, mov.intent)?;
            if !sim.is_threatened_by_enemy(sim.king(color).coord(), color) {
                return Ok(false);
            }
        }
    }

    info!(%color, "checkmate");
    Ok(true)
}
