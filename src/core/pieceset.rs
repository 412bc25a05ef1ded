// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::{Color, PieceId};
use std::fmt;

/// A set of pieces. Both rosters hold at most 16 pieces, so every `PieceId` maps onto one bit of a `u32`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct PieceSet(u32);

impl PieceSet {
    /// Creates a new, empty PieceSet.
    pub const fn empty() -> PieceSet {
        PieceSet(0)
    }

    /// Tests whether or not the given piece is contained within this PieceSet.
    pub const fn contains(&self, id: PieceId) -> bool {
        self.0 & (1u32 << id.0) != 0
    }

    pub fn insert(&mut self, id: PieceId) {
        self.0 |= 1u32 << id.0;
    }

    pub fn remove(&mut self, id: PieceId) {
        self.0 &= !(1u32 << id.0);
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the subset of pieces belonging to the given color.
    pub const fn of_color(self, color: Color) -> PieceSet {
        match color {
            Color::White => PieceSet(self.0 & 0x0000_FFFF),
            Color::Black => PieceSet(self.0 & 0xFFFF_0000),
        }
    }

    pub fn iter(self) -> PieceSetIterator {
        PieceSetIterator { bits: self.0 }
    }
}

impl IntoIterator for PieceSet {
    type Item = PieceId;
    type IntoIter = PieceSetIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<PieceId> for PieceSet {
    fn from_iter<I: IntoIterator<Item = PieceId>>(iter: I) -> Self {
        let mut set = PieceSet::empty();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

pub struct PieceSetIterator {
    bits: u32,
}

impl Iterator for PieceSetIterator {
    type Item = PieceId;

    fn next(&mut self) -> Option<PieceId> {
        if self.bits == 0 {
            return None;
        }

        let next = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(PieceId(next as u8))
    }
}

impl fmt::Debug for PieceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
