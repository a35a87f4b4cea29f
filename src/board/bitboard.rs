/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{BitAnd, BitOr, BitOrAssign, Not},
};

use super::Square;

/// A [`Bitboard`] is a set of [`Square`]s, stored as one bit per square.
///
/// Bit index `i` corresponds to the square with linear index `i`, so bit 0 is `a8` and bit 63 is
/// `h1`. They are primarily used to hold attack sets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY_BOARD: Self = Self(0x0000000000000000);
    pub const FULL_BOARD: Self = Self(0xFFFFFFFFFFFFFFFF);

    /// Constructs a new [`Bitboard`] with only `square` set.
    ///
    /// # Example
    /// ```
    /// # use newt::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::H1);
    /// assert_eq!(board.inner(), 1 << 63);
    /// ```
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.index())
    }

    /// Returns the inner `u64` of this [`Bitboard`].
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Returns `true` if `square` is a member of this set.
    ///
    /// # Example
    /// ```
    /// # use newt::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::E4);
    /// assert!(board.contains(Square::E4));
    /// assert!(!board.contains(Square::E5));
    /// ```
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & (1 << square.index()) != 0
    }

    /// Returns `true` if `self` and `other` share at least one square.
    #[inline(always)]
    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Adds `square` to this set.
    #[inline(always)]
    pub fn set(&mut self, square: Square) {
        self.0 |= 1 << square.index();
    }

    /// Removes `square` from this set.
    #[inline(always)]
    pub fn clear(&mut self, square: Square) {
        self.0 &= !(1 << square.index());
    }

    /// Returns `true` if no squares are set.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the number of squares in this set.
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Removes and returns the lowest-index square of this set, if there is one.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        if self.is_empty() {
            return None;
        }
        let lsb = Square::from_index_unchecked(self.0.trailing_zeros() as usize);
        self.0 &= self.0.wrapping_sub(1);
        Some(lsb)
    }

    /// Returns a [`BitboardIter`] to iterate over all of the set bits as [`Square`]s.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bitboard: *self }
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        let mut board = Self::EMPTY_BOARD;
        board.extend(iter);
        board
    }
}

impl Extend<Square> for Bitboard {
    fn extend<T: IntoIterator<Item = Square>>(&mut self, iter: T) {
        for square in iter {
            self.set(square);
        }
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(136);

        for square in Square::iter() {
            board.push(if self.contains(square) { 'X' } else { '.' });
            board.push(if square.col() == 7 { '\n' } else { ' ' });
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard({:#018X})", self.0)
    }
}

/// An iterator over the [`Square`]s of a [`Bitboard`], in ascending index order.
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
