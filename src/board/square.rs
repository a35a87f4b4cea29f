/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Represents a single square on an `8x8` chess board.
///
/// Internally encoded as a linear index `row * 8 + col`, with row `0` at the top of the board as
/// it is displayed (Black's home rank) and row `7` at the bottom (White's home rank):
/// ```text
/// 8|  0  1  2  3  4  5  6  7
/// 7|  8  9 10 11 12 13 14 15
/// 6| 16 17 18 19 20 21 22 23
/// 5| 24 25 26 27 28 29 30 31
/// 4| 32 33 34 35 36 37 38 39
/// 3| 40 41 42 43 44 45 46 47
/// 2| 48 49 50 51 52 53 54 55
/// 1| 56 57 58 59 60 61 62 63
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
///
/// A [`Square`] is always within the board. Off-board coordinates only ever exist as the `None`
/// returned by [`Square::offset`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(u8);

#[rustfmt::skip]
impl Square {
    pub const A8: Self = Self(0);  pub const B8: Self = Self(1);  pub const C8: Self = Self(2);  pub const D8: Self = Self(3);
    pub const E8: Self = Self(4);  pub const F8: Self = Self(5);  pub const G8: Self = Self(6);  pub const H8: Self = Self(7);
    pub const A7: Self = Self(8);  pub const B7: Self = Self(9);  pub const C7: Self = Self(10); pub const D7: Self = Self(11);
    pub const E7: Self = Self(12); pub const F7: Self = Self(13); pub const G7: Self = Self(14); pub const H7: Self = Self(15);
    pub const A6: Self = Self(16); pub const B6: Self = Self(17); pub const C6: Self = Self(18); pub const D6: Self = Self(19);
    pub const E6: Self = Self(20); pub const F6: Self = Self(21); pub const G6: Self = Self(22); pub const H6: Self = Self(23);
    pub const A5: Self = Self(24); pub const B5: Self = Self(25); pub const C5: Self = Self(26); pub const D5: Self = Self(27);
    pub const E5: Self = Self(28); pub const F5: Self = Self(29); pub const G5: Self = Self(30); pub const H5: Self = Self(31);
    pub const A4: Self = Self(32); pub const B4: Self = Self(33); pub const C4: Self = Self(34); pub const D4: Self = Self(35);
    pub const E4: Self = Self(36); pub const F4: Self = Self(37); pub const G4: Self = Self(38); pub const H4: Self = Self(39);
    pub const A3: Self = Self(40); pub const B3: Self = Self(41); pub const C3: Self = Self(42); pub const D3: Self = Self(43);
    pub const E3: Self = Self(44); pub const F3: Self = Self(45); pub const G3: Self = Self(46); pub const H3: Self = Self(47);
    pub const A2: Self = Self(48); pub const B2: Self = Self(49); pub const C2: Self = Self(50); pub const D2: Self = Self(51);
    pub const E2: Self = Self(52); pub const F2: Self = Self(53); pub const G2: Self = Self(54); pub const H2: Self = Self(55);
    pub const A1: Self = Self(56); pub const B1: Self = Self(57); pub const C1: Self = Self(58); pub const D1: Self = Self(59);
    pub const E1: Self = Self(60); pub const F1: Self = Self(61); pub const G1: Self = Self(62); pub const H1: Self = Self(63);
}

impl Square {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 63;
    pub const COUNT: usize = 64;

    /// Number of rows (and columns) on the board.
    pub const SIDE: u8 = 8;

    /// Returns an iterator over all available squares, in index order.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap(), Square::A8);
    /// assert_eq!(iter.last().unwrap(), Square::H1);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Creates a new [`Square`] from the provided row and column.
    ///
    /// Both must be `[0, 7]` or else an error is returned.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::new(6, 4).unwrap(), Square::E2);
    /// assert!(Square::new(8, 0).is_err());
    /// ```
    #[inline(always)]
    pub fn new(row: u8, col: u8) -> Result<Self> {
        if row >= Self::SIDE || col >= Self::SIDE {
            bail!("Invalid coordinates for Square: row and column must be between [0, 7]. Got ({row}, {col})");
        }
        Ok(Self::from_coords_unchecked(row, col))
    }

    /// Creates a new [`Square`] from the provided row and column, without error checking.
    #[inline(always)]
    pub const fn from_coords_unchecked(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8, "Row and column must be between [0,8)");
        Self(row * Self::SIDE + col)
    }

    /// Creates a new [`Square`] from the provided linear index.
    ///
    /// The provided `index` must be `[0, 63]` or else an error is returned.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// let d6 = Square::from_index(19);
    /// assert_eq!(d6.unwrap(), Square::D6);
    /// assert!(Square::from_index(64).is_err());
    /// ```
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Self> {
        if index > Self::MAX as usize {
            bail!(
                "Invalid index for Square: Must be between [{}, {}]. Got {index}",
                Self::MIN,
                Self::MAX
            );
        }
        Ok(Self(index as u8))
    }

    /// Creates a new [`Square`] from the provided linear index, without error checking.
    #[inline(always)]
    pub const fn from_index_unchecked(index: usize) -> Self {
        debug_assert!(index < 64, "Index must be between [0,64)");
        Self(index as u8)
    }

    /// Linear index of this [`Square`], `[0, 63]`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Row of this [`Square`], with `0` at the top of the board.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 / Self::SIDE
    }

    /// Column of this [`Square`], with `0` on the a-file.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.0 % Self::SIDE
    }

    /// Attempt to offset this [`Square`] by the row and column deltas.
    ///
    /// If the result would fall off the board, `None` is returned. Unlike adding to the linear
    /// index, this never wraps around an edge of the board.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::C4.offset(-1, 1), Some(Square::D5));
    /// assert_eq!(Square::C4.offset(1, -1), Some(Square::B3));
    /// assert_eq!(Square::H4.offset(0, 1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, row_delta: i8, col_delta: i8) -> Option<Self> {
        let row = self.row() as i8 + row_delta;
        let col = self.col() as i8 + col_delta;

        if row < 0 || row >= Self::SIDE as i8 || col < 0 || col >= Self::SIDE as i8 {
            return None;
        }

        Some(Self::from_coords_unchecked(row as u8, col as u8))
    }

    /// Letter of this square's file, `'a'..='h'`.
    #[inline(always)]
    pub const fn file_char(&self) -> char {
        (b'a' + self.col()) as char
    }

    /// Digit of this square's rank, `'1'..='8'`.
    #[inline(always)]
    pub const fn rank_char(&self) -> char {
        (b'8' - self.row()) as char
    }

    /// Parses a [`Square`] from a coordinate string such as `"e2"`, ignoring case and surrounding
    /// whitespace.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!(Square::from_uci("e2").unwrap(), Square::E2);
    /// assert_eq!(Square::from_uci(" H8 ").unwrap(), Square::H8);
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let square = square.trim();
        let bytes = square.as_bytes();
        if bytes.len() != 2 {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}")
        }

        let file = bytes[0].to_ascii_lowercase();
        if !(b'a'..=b'h').contains(&file) {
            bail!("Invalid file for Square: Must be between [a, h]. Got {:?}", bytes[0] as char);
        }

        let rank = bytes[1];
        if !(b'1'..=b'8').contains(&rank) {
            bail!("Invalid rank for Square: Must be between [1, 8]. Got {:?}", rank as char);
        }

        Self::new(b'8' - rank, file - b'a')
    }

    /// Converts this [`Square`] to a coordinate string, such as `"e2"`.
    ///
    /// # Example
    /// ```
    /// # use newt::Square;
    /// assert_eq!("c4", Square::C4.to_uci());
    /// ```
    #[inline(always)]
    pub fn to_uci(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl TryFrom<usize> for Square {
    type Error = anyhow::Error;
    #[inline(always)]
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::from_index(value).context("Failed to convert index to Square")
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    /// A [`Square`] can be used to index into an array of 64 elements.
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    /// A [`Square`] can be used to mutably index into an array of 64 elements.
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl Serialize for Square {
    /// Squares are written as their coordinate string, so save files stay readable.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_uci())
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_uci(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Square {
    /// Calls [`Square::to_uci`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_uci().fmt(f)
    }
}

impl fmt::Debug for Square {
    /// Calls [`Square::to_uci`] and also displays the internal decimal value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_uci(), self.0)
    }
}
