/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::Index,
    str::FromStr,
};

use anyhow::{anyhow, bail, Result};

use super::{candidate_moves, Bitboard, Color, Piece, PieceKind, Square};

/// Piece placements of the standard starting position.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Represents all pieces and their locations on a chess board.
///
/// Each of the 64 cells holds at most one [`Piece`]. Captured pieces are simply gone.
///
/// [`Board`] is `Copy`, so speculative moves are evaluated on a copy rather than undone in place.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    mailbox: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use newt::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [None; Square::COUNT],
        }
    }

    /// Constructs a [`Board`] from the piece placement field of a FEN string.
    ///
    /// Anything after the first space is ignored. The first rank listed is row 0 (rank 8).
    /// Pawns found outside their starting row are marked as having moved.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Color, Square};
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
    /// assert_eq!(board.color_at(Square::E8), Some(Color::Black));
    /// assert_eq!(board.color_at(Square::E1), Some(Color::White));
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::new();

        let placements = fen
            .split_ascii_whitespace()
            .next()
            .ok_or_else(|| anyhow!("FEN string is empty"))?;

        // Check if the placements string is the correct length
        if placements.matches('/').count() != 7 {
            bail!("FEN must have piece placements for all 8 ranks. Got {placements:?}");
        }

        for (row, placements) in placements.split('/').enumerate() {
            let mut col = 0;
            let row = row as u8;

            for piece_char in placements.chars() {
                if let Ok(mut piece) = Piece::from_char(piece_char) {
                    let square = Square::new(row, col)?;
                    if piece.is_pawn() && row != piece.color().pawn_row() {
                        piece.set_moved();
                    }
                    board.place(piece, square);
                    col += 1;
                } else {
                    let Some(empty) = piece_char.to_digit(10) else {
                        bail!("FEN placements must contain piece chars or digits. Got {piece_char:?}");
                    };
                    col += empty as u8;
                }

                if col > Square::SIDE {
                    bail!("FEN rank {placements:?} describes more than 8 squares");
                }
            }

            if col != Square::SIDE {
                bail!("FEN rank {placements:?} must describe exactly 8 squares. Got {col}");
            }
        }

        Ok(board)
    }

    /// Returns `true` if no piece occupies `square`.
    #[inline(always)]
    pub const fn is_empty(&self, square: Square) -> bool {
        self.mailbox[square.index()].is_none()
    }

    /// Returns `true` if there is a piece at the given [`Square`], else `false`.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Square};
    /// let board = Board::default();
    /// assert_eq!(board.has(Square::B1), true);
    /// assert_eq!(board.has(Square::B3), false);
    /// ```
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        !self.is_empty(square)
    }

    /// Places the provided [`Piece`] at the supplied [`Square`], replacing any current occupant.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.mailbox[square] = Some(piece);
    }

    /// Takes the [`Piece`] from a given [`Square`], if there is one present.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Square};
    /// let mut board = Board::from_fen("k7/8/8/8/2N5/8/8/7K").unwrap();
    /// let taken = board.take(Square::C4);
    /// assert_eq!(board.to_fen(), "k7/8/8/8/8/8/8/7K");
    /// assert_eq!(taken.unwrap().char(), 'N');
    /// ```
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.mailbox[square].take()
    }

    /// Moves whatever occupies `from` onto `to`, and clears `from`.
    ///
    /// Any occupant of `to` is overwritten; this is how captures happen. The captured piece, if any,
    /// is returned. No legality checks are performed.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Square};
    /// let mut board = Board::from_fen("k7/8/8/3p4/2N5/8/8/7K").unwrap();
    /// let captured = board.relocate(Square::C4, Square::D5);
    /// assert_eq!(captured.unwrap().char(), 'p');
    /// assert_eq!(board.to_fen(), "k7/8/8/3N4/8/8/8/7K");
    /// ```
    #[inline(always)]
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.take(from);
        std::mem::replace(&mut self.mailbox[to], moving)
    }

    /// Copies `self` and returns a [`Board`] after having relocated `from` onto `to`.
    #[inline(always)]
    pub fn with_relocation(&self, from: Square, to: Square) -> Self {
        let mut copied = *self;
        copied.relocate(from, to);
        copied
    }

    /// Fetches the [`Color`] of the piece at the provided [`Square`], if there is one.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Color, Square};
    /// let board = Board::default();
    /// assert_eq!(board.color_at(Square::A2), Some(Color::White));
    /// assert_eq!(board.color_at(Square::E8), Some(Color::Black));
    /// assert!(board.color_at(Square::E4).is_none());
    /// ```
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.mailbox[square].map(|piece| piece.color())
    }

    /// Fetches the [`PieceKind`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        self.mailbox[square].map(|piece| piece.kind())
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()]
    }

    /// Mutable access to the [`Piece`] at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.mailbox[square].as_mut()
    }

    /// Locates the King of the provided [`Color`].
    ///
    /// A board without that King is corrupt: every legal game keeps both Kings on the board, so this
    /// returns an error rather than a recoverable `None`.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Color, Square};
    /// let board = Board::default();
    /// assert_eq!(board.king_square(Color::White).unwrap(), Square::E1);
    /// assert!(Board::new().king_square(Color::Black).is_err());
    /// ```
    pub fn king_square(&self, color: Color) -> Result<Square> {
        self.iter()
            .find(|(_, piece)| piece.is_king() && piece.color() == color)
            .map(|(square, _)| square)
            .ok_or_else(|| anyhow!("Invariant violated: no {color} king on the board\n{self}"))
    }

    /// Returns every square that a piece of `color` could move to, ignoring whether doing so would
    /// expose `color`'s own King.
    ///
    /// This is the attack set used for check detection.
    pub fn attacks_by(&self, color: Color) -> Bitboard {
        self.pieces_of(color)
            .flat_map(|(square, _)| candidate_moves(self, square))
            .collect()
    }

    /// Returns an iterator over all occupied squares and their pieces, in square index order.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Returns an iterator over all pieces of `color` and their squares.
    #[inline(always)]
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.color() == color)
    }

    /// Returns a [`Bitboard`] of all squares occupied by `color`.
    #[inline(always)]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.pieces_of(color).map(|(square, _)| square).collect()
    }

    /// Generates the piece placement field of a FEN string for this [`Board`].
    pub fn to_fen(&self) -> String {
        let mut placements = Vec::with_capacity(Square::SIDE as usize);

        for row in 0..Square::SIDE {
            let mut rank = String::with_capacity(Square::SIDE as usize);
            let mut empty = 0;

            for col in 0..Square::SIDE {
                match self.piece_at(Square::from_coords_unchecked(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            rank += &empty.to_string();
                            empty = 0;
                        }
                        rank.push(piece.char());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                rank += &empty.to_string();
            }
            placements.push(rank);
        }

        placements.join("/")
    }
}

impl Default for Board {
    /// The standard starting position.
    #[inline(always)]
    fn default() -> Self {
        let mut board = Self::new();
        for (square, piece) in STARTPOS {
            board.place(piece, square);
        }
        board
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.mailbox[index]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(198);

        for square in Square::iter() {
            if square.col() == 0 {
                board += &format!("{}| ", square.rank_char());
            }

            match self.piece_at(square) {
                Some(piece) => board.push(piece.char()),
                None => board.push('.'),
            }

            board.push(if square.col() == 7 { '\n' } else { ' ' });
        }
        board += " +----------------\n   a b c d e f g h";

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

/// Pieces and squares of the standard starting position.
const STARTPOS: [(Square, Piece); 32] = {
    use PieceKind::*;
    const BACK_RANK: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

    let mut pieces = [(Square::A8, Piece::new(Color::Black, Pawn)); 32];
    let mut col = 0;
    while col < 8 {
        let c = col as u8;
        pieces[col] = (
            Square::from_coords_unchecked(0, c),
            Piece::new(Color::Black, BACK_RANK[col]),
        );
        pieces[col + 8] = (
            Square::from_coords_unchecked(1, c),
            Piece::new(Color::Black, Pawn),
        );
        pieces[col + 16] = (
            Square::from_coords_unchecked(6, c),
            Piece::new(Color::White, Pawn),
        );
        pieces[col + 24] = (
            Square::from_coords_unchecked(7, c),
            Piece::new(Color::White, BACK_RANK[col]),
        );
        col += 1;
    }
    pieces
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos() {
        let board = Board::default();
        assert_eq!(board.to_fen(), FEN_STARTPOS);
        assert_eq!(Board::from_fen(FEN_STARTPOS).unwrap(), board);
        assert_eq!(board.pieces_of(Color::White).count(), 16);
        assert_eq!(board.pieces_of(Color::Black).count(), 16);
        assert_eq!(board.king_square(Color::Black).unwrap(), Square::E8);
        assert_eq!(board.kind_at(Square::D1), Some(PieceKind::Queen));
    }

    #[test]
    fn test_fen_errors() {
        assert!(Board::from_fen("").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/7").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/9").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/7x").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/PPPPPPPPP").is_err());
        assert!(Board::from_fen(&format!("{}/8/8/8/8/8/8/8", "9".repeat(30))).is_err());
    }

    #[test]
    fn test_fen_marks_advanced_pawns_as_moved() {
        let board = Board::from_fen("4k3/p7/8/8/4P3/8/3P4/4K3").unwrap();
        assert!(!board.piece_at(Square::A7).unwrap().has_moved());
        assert!(!board.piece_at(Square::D2).unwrap().has_moved());
        assert!(board.piece_at(Square::E4).unwrap().has_moved());
    }

    #[test]
    fn test_relocate_captures_and_copies_are_independent() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let after = board.with_relocation(Square::E4, Square::D5);

        // Original is untouched
        assert_eq!(board.kind_at(Square::E4), Some(PieceKind::Pawn));
        assert_eq!(board.color_at(Square::D5), Some(Color::Black));

        assert!(after.is_empty(Square::E4));
        assert_eq!(after.color_at(Square::D5), Some(Color::White));
        assert_eq!(after.pieces_of(Color::Black).count(), 1);
    }

    #[test]
    fn test_relocate_from_empty_square_clears_target() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3").unwrap();
        let captured = board.relocate(Square::E4, Square::A1);
        assert_eq!(captured.map(|p| p.kind()), Some(PieceKind::Rook));
        assert!(board.is_empty(Square::A1));
    }

    #[test]
    fn test_attacks_by() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3").unwrap();
        let attacks = board.attacks_by(Color::White);

        // The rook sweeps the a-file and the first rank up to its own king
        assert!(attacks.contains(Square::A8));
        assert!(attacks.contains(Square::D1));
        assert!(!attacks.contains(Square::A1));

        // The king covers its neighbours
        assert!(attacks.contains(Square::E2));
        assert!(attacks.contains(Square::F1));
        assert!(!attacks.contains(Square::E3));
    }

    #[test]
    fn test_display() {
        let shown = Board::default().to_string();
        let mut lines = shown.lines();
        assert_eq!(lines.next().unwrap(), "8| r n b q k b n r");
        assert_eq!(lines.last().unwrap(), "   a b c d e f g h");
    }
}
