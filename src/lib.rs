// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `tessera` is a chess rules engine built around a mailbox board.
//!
//! A `Board` owns both players' pieces and keeps, for every square, the set of pieces that could move onto it.
//! `movegen` filters each piece's move shape against the pieces on the board, and `logic` turns that into
//! legal moves, plays them (castling, en passant and promotion included) and detects checkmate.

pub mod board;
pub mod core;
pub mod logic;
pub mod movegen;

pub use board::{Board, DiagramParseError, MoveError, PromotionProvider, SquareObserver};
