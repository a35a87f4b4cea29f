/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::Square;

/// Represents the color of a player or piece.
///
/// White traditionally moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns this [`Color`]'s opposite / enemy.
    ///
    /// # Example
    /// ```
    /// # use newt::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row delta of a single Pawn push for this color.
    ///
    /// White's home row is the bottom of the board (row 7), so White Pawns advance toward row 0.
    ///
    /// # Example
    /// ```
    /// # use newt::Color;
    /// assert_eq!(Color::White.pawn_direction(), -1);
    /// assert_eq!(Color::Black.pawn_direction(), 1);
    /// ```
    #[inline(always)]
    pub const fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Row on which this color's Pawns start the game.
    #[inline(always)]
    pub const fn pawn_row(&self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Row on which this color's Pawns promote.
    #[inline(always)]
    pub const fn promotion_row(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    ///
    /// # Example
    /// ```
    /// # use newt::Color;
    /// assert_eq!(Color::Black.name(), "black");
    /// ```
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Same as [`Color::name`], but with a leading capital, for messages that start a sentence.
    #[inline(always)]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// Kinds a Pawn may be promoted to.
    #[inline(always)]
    pub const fn promotions() -> [Self; 4] {
        use PieceKind::*;
        [Knight, Bishop, Rook, Queen]
    }

    /// Returns `true` if a Pawn may be promoted to this kind.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        !matches!(self, Self::Pawn | Self::King)
    }

    /// Returns `true` if pieces of this kind track whether they have moved.
    #[inline(always)]
    pub const fn tracks_movement(&self) -> bool {
        matches!(self, Self::Pawn | Self::Rook | Self::King)
    }

    /// Creates a [`PieceKind`] from a FEN character, ignoring case.
    ///
    /// # Example
    /// ```
    /// # use newt::PieceKind;
    /// assert_eq!(PieceKind::from_char('q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_char(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind:?}."),
        }
    }

    /// Lowercase FEN character of this kind.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl FromStr for PieceKind {
    type Err = anyhow::Error;
    /// Accepts either a single FEN character or the full (case-insensitive) name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_char(c);
        }

        let lower = s.to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| anyhow::anyhow!("Invalid PieceKind: Got {s:?}."))
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// A chess piece, as it sits on the board.
///
/// A piece's location is the board cell that holds it, so it is not stored here.
/// `has_moved` is only updated by a [`crate::Game`] for kinds where [`PieceKind::tracks_movement`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
    has_moved: bool,
}

impl Piece {
    /// Creates a new, unmoved [`Piece`].
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Piece, PieceKind};
    /// let knight = Piece::new(Color::White, PieceKind::Knight);
    /// assert_eq!(knight.color(), Color::White);
    /// assert!(!knight.has_moved());
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self {
            color,
            kind,
            has_moved: false,
        }
    }

    /// Returns a copy of this piece with its `has_moved` flag set to `moved`.
    #[inline(always)]
    pub const fn with_moved(self, moved: bool) -> Self {
        Self {
            has_moved: moved,
            ..self
        }
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline(always)]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Marks this piece as having moved at least once.
    #[inline(always)]
    pub fn set_moved(&mut self) {
        self.has_moved = true;
    }

    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// Returns `true` if this piece is a Pawn that would promote upon arriving at `square`.
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Piece, PieceKind, Square};
    /// let pawn = Piece::new(Color::White, PieceKind::Pawn);
    /// assert!(pawn.promotes_on(Square::E8));
    /// assert!(!pawn.promotes_on(Square::E1));
    /// ```
    #[inline(always)]
    pub const fn promotes_on(&self, square: Square) -> bool {
        self.is_pawn() && square.row() == self.color.promotion_row()
    }

    /// Returns a copy of this piece as `kind`, keeping its color and movement history.
    #[inline(always)]
    pub const fn promoted(self, kind: PieceKind) -> Self {
        Self { kind, ..self }
    }

    /// Creates an unmoved [`Piece`] from a FEN character, where uppercase is White.
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Piece, PieceKind};
    /// let piece = Piece::from_char('r').unwrap();
    /// assert_eq!(piece, Piece::new(Color::Black, PieceKind::Rook));
    /// ```
    #[inline(always)]
    pub fn from_char(piece: char) -> Result<Self> {
        let kind = PieceKind::from_char(piece)?;
        let color = if piece.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Self::new(color, kind))
    }

    /// FEN character of this piece: uppercase for White, lowercase for Black.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self.color {
            Color::White => self.kind.char().to_ascii_uppercase(),
            Color::Black => self.kind.char(),
        }
    }

    #[inline(always)]
    pub fn name(&self) -> String {
        format!("{} {}", self.color.name(), self.kind.name())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}
