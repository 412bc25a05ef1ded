// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoordParseError {
    #[error("coordinate out of range: ({0}, {1})")]
    OutOfRange(u8, u8),
    #[error("invalid coordinate name: {0}")]
    InvalidName(String),
}

/// A coordinate on the chessboard, zero-based. Row 0 is White's back rank and row 7 is Black's; columns 0
/// through 7 correspond to the files a through h.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord(pub(in crate::core) u8);

impl Coord {
    /// Creates a new Coord from a row and a column, both of which must be less than 8.
    pub const fn new(row: u8, col: u8) -> Coord {
        debug_assert!(row < 8 && col < 8);
        Coord(row * 8 + col)
    }

    /// Returns the row of this coordinate.
    pub const fn row(self) -> u8 {
        self.0 >> 3
    }

    /// Returns the column of this coordinate.
    pub const fn col(self) -> u8 {
        self.0 & 7
    }

    /// Returns the coordinate offset by the given number of rows and columns, or None if that falls off the
    /// board.
    pub fn offset(self, drow: i8, dcol: i8) -> Option<Coord> {
        let row = self.row() as i8 + drow;
        let col = self.col() as i8 + dcol;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Coord::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Returns the closest coordinate in the given direction, or None at the edge of the board.
    pub fn towards(self, dir: Direction) -> Option<Coord> {
        let (drow, dcol) = dir.as_vector();
        self.offset(drow, dcol)
    }

    pub const fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<(u8, u8)> for Coord {
    type Error = CoordParseError;

    fn try_from((row, col): (u8, u8)) -> Result<Self, Self::Error> {
        if row >= 8 || col >= 8 {
            return Err(CoordParseError::OutOfRange(row, col));
        }

        Ok(Coord::new(row, col))
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        match bytes {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Coord::new(rank - b'1', file - b'a')),
            _ => Err(CoordParseError::InvalidName(s.to_string())),
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col()) as char, self.row() + 1)
    }
}

pub const A1: Coord = Coord(0);
pub const B1: Coord = Coord(1);
pub const C1: Coord = Coord(2);
pub const D1: Coord = Coord(3);
pub const E1: Coord = Coord(4);
pub const F1: Coord = Coord(5);
pub const G1: Coord = Coord(6);
pub const H1: Coord = Coord(7);
pub const A2: Coord = Coord(8);
pub const B2: Coord = Coord(9);
pub const C2: Coord = Coord(10);
pub const D2: Coord = Coord(11);
pub const E2: Coord = Coord(12);
pub const F2: Coord = Coord(13);
pub const G2: Coord = Coord(14);
pub const H2: Coord = Coord(15);
pub const A3: Coord = Coord(16);
pub const B3: Coord = Coord(17);
pub const C3: Coord = Coord(18);
pub const D3: Coord = Coord(19);
pub const E3: Coord = Coord(20);
pub const F3: Coord = Coord(21);
pub const G3: Coord = Coord(22);
pub const H3: Coord = Coord(23);
pub const A4: Coord = Coord(24);
pub const B4: Coord = Coord(25);
pub const C4: Coord = Coord(26);
pub const D4: Coord = Coord(27);
pub const E4: Coord = Coord(28);
pub const F4: Coord = Coord(29);
pub const G4: Coord = Coord(30);
pub const H4: Coord = Coord(31);
pub const A5: Coord = Coord(32);
pub const B5: Coord = Coord(33);
pub const C5: Coord = Coord(34);
pub const D5: Coord = Coord(35);
pub const E5: Coord = Coord(36);
pub const F5: Coord = Coord(37);
pub const G5: Coord = Coord(38);
pub const H5: Coord = Coord(39);
pub const A6: Coord = Coord(40);
pub const B6: Coord = Coord(41);
pub const C6: Coord = Coord(42);
pub const D6: Coord = Coord(43);
pub const E6: Coord = Coord(44);
pub const F6: Coord = Coord(45);
pub const G6: Coord = Coord(46);
pub const H6: Coord = Coord(47);
pub const A7: Coord = Coord(48);
pub const B7: Coord = Coord(49);
pub const C7: Coord = Coord(50);
pub const D7: Coord = Coord(51);
pub const E7: Coord = Coord(52);
pub const F7: Coord = Coord(53);
pub const G7: Coord = Coord(54);
pub const H7: Coord = Coord(55);
pub const A8: Coord = Coord(56);
pub const B8: Coord = Coord(57);
pub const C8: Coord = Coord(58);
pub const D8: Coord = Coord(59);
pub const E8: Coord = Coord(60);
pub const F8: Coord = Coord(61);
pub const G8: Coord = Coord(62);
pub const H8: Coord = Coord(63);

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The row direction this color's pawns advance in.
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The row holding this color's king and rooks at the start of the game.
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// The row holding this color's pawns at the start of the game.
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// The row on which this color's pawns promote.
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// The kinds a pawn may be promoted to, in the order they are offered.
pub const PROMOTABLE_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

impl PieceKind {
    pub fn is_sliding(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    pub fn is_promotable(self) -> bool {
        PROMOTABLE_KINDS.contains(&self)
    }

    /// Parses a piece symbol, either a letter (case-insensitive) or a chess glyph of either color.
    pub fn from_symbol(symbol: char) -> Option<PieceKind> {
        let kind = match symbol {
            'p' | 'P' | '♙' | '♟' => PieceKind::Pawn,
            'n' | 'N' | '♘' | '♞' => PieceKind::Knight,
            'b' | 'B' | '♗' | '♝' => PieceKind::Bishop,
            'r' | 'R' | '♖' | '♜' => PieceKind::Rook,
            'q' | 'Q' | '♕' | '♛' => PieceKind::Queen,
            'k' | 'K' | '♔' | '♚' => PieceKind::King,
            _ => return None,
        };

        Some(kind)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        write!(f, "{}", c)
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

/// Directions a rook slides in.
pub const STRAIGHT_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// Directions a bishop slides in.
pub const DIAGONAL_DIRECTIONS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

impl Direction {
    /// The (row, column) step of this direction. North points towards Black's back rank.
    pub const fn as_vector(self) -> (i8, i8) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }

    /// Returns the direction of travel from one coordinate to another, if they share a row, column or
    /// diagonal.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        let drow = to.row() as i8 - from.row() as i8;
        let dcol = to.col() as i8 - from.col() as i8;
        if (drow, dcol) == (0, 0) || (drow != 0 && dcol != 0 && drow.abs() != dcol.abs()) {
            return None;
        }

        let dir = match (drow.signum(), dcol.signum()) {
            (1, 0) => Direction::North,
            (1, 1) => Direction::NorthEast,
            (0, 1) => Direction::East,
            (-1, 1) => Direction::SouthEast,
            (-1, 0) => Direction::South,
            (-1, -1) => Direction::SouthWest,
            (0, -1) => Direction::West,
            (1, -1) => Direction::NorthWest,
            _ => unreachable!(),
        };

        Some(dir)
    }
}

pub struct AllCoords(u8, u8);

impl Iterator for AllCoords {
    type Item = Coord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 >= self.1 {
            None
        } else {
            let next = self.0;
            self.0 += 1;
            Some(Coord(next))
        }
    }
}

impl DoubleEndedIterator for AllCoords {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.1 <= self.0 {
            None
        } else {
            self.1 -= 1;
            Some(Coord(self.1))
        }
    }
}

pub fn coords() -> AllCoords {
    AllCoords(0, 64)
}

pub fn colors() -> ::std::array::IntoIter<Color, 2> {
    [Color::White, Color::Black].into_iter()
}
