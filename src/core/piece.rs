// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::*;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, -2),
    (1, 2),
    (-1, -2),
    (-1, 2),
    (2, -1),
    (2, 1),
    (-2, -1),
    (-2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// A non-owning handle to a piece on a board. The handle packs the piece's color and its index in that
/// color's roster, so it stays valid across board clones.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(pub(in crate::core) u8);

impl PieceId {
    pub const fn new(color: Color, index: u8) -> PieceId {
        debug_assert!(index < 16);
        PieceId(color as u8 * 16 + index)
    }

    pub const fn color(self) -> Color {
        if self.0 < 16 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Index of this piece within its color's roster.
    pub const fn index(self) -> usize {
        (self.0 & 15) as usize
    }
}

impl fmt::Debug for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.color(), self.index())
    }
}

/// A single chess piece. Pieces are created when a board is set up and are never destroyed; a captured piece
/// stays in its roster with the `captured` flag set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    coord: Coord,
    /// Number of executed moves that changed this piece's position.
    move_count: u32,
    captured: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceKind, coord: Coord) -> Piece {
        Piece {
            id,
            kind,
            coord,
            move_count: 0,
            captured: false,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.id.color()
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn has_moved(&self) -> bool {
        self.move_count > 0
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.color() != other.color()
    }

    /// Moves this piece, counting the move only if the position actually changes.
    pub(crate) fn set_coord(&mut self, coord: Coord) {
        if self.coord != coord {
            self.coord = coord;
            self.move_count += 1;
        }
    }

    pub(crate) fn set_captured(&mut self) {
        self.captured = true;
    }

    pub(crate) fn set_kind(&mut self, kind: PieceKind) {
        self.kind = kind;
    }

    /// The chess glyph for this piece, as shown to players.
    pub fn glyph(&self) -> char {
        match (self.color(), self.kind) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }

    /// Produces the geometric move template for this piece: every coordinate its movement shape reaches from
    /// its current position, ignoring the occupancy of the board and whether the move exposes its king.
    ///
    /// Pawn diagonals are included as potential captures. A king standing on its home square also receives
    /// the home squares of both friendly rooks; castling is represented as the king moving onto its own rook
    /// and is translated into the final king and rook squares when executed.
    pub fn basic_moves(&self) -> Vec<Coord> {
        let mut moves = Vec::new();
        match self.kind {
            PieceKind::Pawn => self.pawn_moves(&mut moves),
            PieceKind::Knight => self.step_moves(&KNIGHT_OFFSETS, &mut moves),
            PieceKind::Bishop => self.slide_moves(&DIAGONAL_DIRECTIONS, &mut moves),
            PieceKind::Rook => self.slide_moves(&STRAIGHT_DIRECTIONS, &mut moves),
            PieceKind::Queen => {
                self.slide_moves(&STRAIGHT_DIRECTIONS, &mut moves);
                self.slide_moves(&DIAGONAL_DIRECTIONS, &mut moves);
            }
            PieceKind::King => {
                let row = self.color().back_row();
                if self.coord == Coord::new(row, KING_HOME_COL) {
                    moves.push(CastleSide::QueenSide.rook_home(self.color()));
                    moves.push(CastleSide::KingSide.rook_home(self.color()));
                }

                self.step_moves(&KING_OFFSETS, &mut moves);
            }
        }

        moves
    }

    fn pawn_moves(&self, moves: &mut Vec<Coord>) {
        let forward = self.color().forward();
        if self.coord.row() == self.color().pawn_row() {
            if let Some(double) = self.coord.offset(2 * forward, 0) {
                moves.push(double);
            }
        }

        if let Some(single) = self.coord.offset(forward, 0) {
            moves.push(single);
        }

        for dcol in [-1, 1] {
            if let Some(diagonal) = self.coord.offset(forward, dcol) {
                moves.push(diagonal);
            }
        }
    }

    fn step_moves(&self, offsets: &[(i8, i8)], moves: &mut Vec<Coord>) {
        moves.extend(
            offsets
                .iter()
                .filter_map(|&(drow, dcol)| self.coord.offset(drow, dcol)),
        );
    }

    fn slide_moves(&self, directions: &[Direction], moves: &mut Vec<Coord>) {
        for &dir in directions {
            let mut cursor = self.coord;
            while let Some(next) = cursor.towards(dir) {
                moves.push(next);
                cursor = next;
            }
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color() {
            Color::White => write!(f, "{}", self.kind.to_string().to_uppercase()),
            Color::Black => write!(f, "{}", self.kind),
        }
    }
}
