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

/// Column a king starts the game on.
pub const KING_HOME_COL: u8 = 4;

/// The tag recorded alongside each entry of a board's move history.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Normal,
    EnPassant,
    Castling,
    Promotion,
}

/// One entry of a board's move history. Castling records two entries (king, then rook) and a promotion
/// records an entry whose origin and destination are the promoted square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub from: Coord,
    pub to: Coord,
    pub kind: MoveKind,
}

impl HistoryEntry {
    /// Returns whether or not this entry moved a piece two rows.
    pub fn is_double_step(&self) -> bool {
        self.from.col() == self.to.col() && (self.from.row() as i8 - self.to.row() as i8).abs() == 2
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    /// The side a king castles towards when moving from `from` to `to`.
    pub fn towards(from: Coord, to: Coord) -> CastleSide {
        if to.col() > from.col() {
            CastleSide::KingSide
        } else {
            CastleSide::QueenSide
        }
    }

    /// Home square of the rook a king castles with on this side.
    pub const fn rook_home(self, color: Color) -> Coord {
        match self {
            CastleSide::KingSide => Coord::new(color.back_row(), 7),
            CastleSide::QueenSide => Coord::new(color.back_row(), 0),
        }
    }

    /// Square the king lands on after castling on this side.
    pub const fn king_landing(self, color: Color) -> Coord {
        match self {
            CastleSide::KingSide => Coord::new(color.back_row(), KING_HOME_COL + 2),
            CastleSide::QueenSide => Coord::new(color.back_row(), KING_HOME_COL - 2),
        }
    }

    /// Square the rook lands on after castling on this side.
    pub const fn rook_landing(self, color: Color) -> Coord {
        match self {
            CastleSide::KingSide => Coord::new(color.back_row(), KING_HOME_COL + 1),
            CastleSide::QueenSide => Coord::new(color.back_row(), KING_HOME_COL - 1),
        }
    }
}

/// What a requested move means, as decided at the boundary between callers and the board. Callers never see
/// the internal "king moves onto its rook" encoding of castling; they see `Castle` instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveIntent {
    Normal,
    Castle(CastleSide),
    EnPassant,
    Promotion,
}

/// A legal move, as produced by `logic::legal_moves`. For castling moves `to` is the square the king lands
/// on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
    pub intent: MoveIntent,
}

impl Move {
    pub fn new(from: Coord, to: Coord, intent: MoveIntent) -> Move {
        Move { from, to, intent }
    }

    pub fn is_castle(self) -> bool {
        matches!(self.intent, MoveIntent::Castle(_))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self.intent {
            MoveIntent::Normal => write!(f, "{}-{}", self.from, self.to),
            MoveIntent::Castle(CastleSide::KingSide) => write!(f, "O-O"),
            MoveIntent::Castle(CastleSide::QueenSide) => write!(f, "O-O-O"),
            MoveIntent::EnPassant => write!(f, "{}x{} e.p.", self.from, self.to),
            MoveIntent::Promotion => write!(f, "{}-{}=", self.from, self.to),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} ({:?})", self, self.intent)
    }
}

/// The state of the game after a move. `CheckmateBlack` means Black has been checkmated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    Continue,
    CheckmateBlack,
    CheckmateWhite,
    /// Never produced; draw rules are not evaluated.
    Draw,
}

impl GameState {
    /// The state reporting that `color` has been checkmated.
    pub fn checkmated(color: Color) -> GameState {
        match color {
            Color::White => GameState::CheckmateWhite,
            Color::Black => GameState::CheckmateBlack,
        }
    }

    pub fn is_over(self) -> bool {
        self != GameState::Continue
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::Continue
    }
}
