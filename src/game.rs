/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{error::Error, fmt};

use anyhow::{bail, Context, Result};

use crate::{
    is_in_check, legal_moves, Board, Color, Move, MoveMap, Piece, PieceKind, Snapshot, Square,
};

/// A game of chess between two players sharing one terminal.
///
/// This type owns the [`Board`] and knows whose turn it is. Everything else (legal moves, check,
/// checkmate) is derived from those on demand.
///
/// The basic methods you're probably looking for are [`Game::legal_moves`],
/// [`Game::make_move_checked`], and [`Game::play`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Game {
    /// The player whose turn it is.
    side_to_move: Color,

    /// The player waiting for their turn.
    opponent: Color,

    /// All pieces currently in play.
    board: Board,
}

/// Where a [`Game`] stands before the side to move acts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// `side` must move, and may be in check.
    AwaitingMove { side: Color, in_check: bool },

    /// The side to move has no legal moves.
    ///
    /// This also covers stalemate, which is scored as a loss for the side to move.
    Checkmate { winner: Color },
}

/// How a call to [`Game::play`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    /// The loser had no legal moves.
    Checkmate { winner: Color },

    /// A player asked to save the game. The [`Game`] is left as it was before that turn.
    Saved,

    /// The side to move gave up.
    Surrendered { winner: Color },
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "Checkmate! {} wins.", winner.title()),
            Self::Saved => write!(f, "Game saved."),
            Self::Surrendered { winner } => write!(
                f,
                "{} surrenders. {} wins.",
                winner.opponent().title(),
                winner.title()
            ),
        }
    }
}

/// An action requested by the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Move the piece on `from` to `to`.
    ///
    /// If the move brings a Pawn to its last row, it becomes `promotion`, or a Queen if unset.
    Move {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },

    /// Stop playing so the game can be stored.
    Save,

    /// Give up the game.
    Surrender,
}

impl Command {
    /// Shorthand for a [`Command::Move`] without a promotion choice.
    #[inline(always)]
    pub const fn moving(from: Square, to: Square) -> Self {
        Self::Move {
            from,
            to,
            promotion: None,
        }
    }
}

/// Everything a [`MoveSource`] is shown when asked for a [`Command`].
#[derive(Clone, Copy, Debug)]
pub struct Turn<'a> {
    pub side: Color,
    pub in_check: bool,
    pub moves: &'a MoveMap,
    pub board: &'a Board,
}

/// Anything that can choose commands on behalf of the players, such as a terminal prompt or a
/// pre-written script.
///
/// The game never retries on its own: a rejected command is reported through
/// [`MoveSource::rejected`], and [`MoveSource::next_command`] is called again.
pub trait MoveSource {
    /// Blocks until a [`Command`] is available for `turn`.
    fn next_command(&mut self, turn: &Turn<'_>) -> Result<Command>;

    /// Called when the last command from [`MoveSource::next_command`] was not legal.
    fn rejected(&mut self, _turn: &Turn<'_>, _reason: &IllegalMove) {}

    /// Called after `mv` has been applied to the board, and before the next turn begins.
    fn played(&mut self, _side: Color, _mv: Move, _captured: Option<Piece>) {}
}

/// Reasons a requested move may be refused. These are always recoverable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    /// There is nothing on the origin square.
    NoPiece(Square),

    /// The origin square holds a piece of the other player.
    NotYourPiece { square: Square, side: Color },

    /// The piece cannot legally reach the destination.
    Unreachable { from: Square, to: Square },

    /// Pawns cannot promote to this kind.
    InvalidPromotion(PieceKind),

    /// The Pawn on this square has not reached its last row.
    NotOnLastRow(Square),
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPiece(square) => write!(f, "There is no piece on {square}"),
            Self::NotYourPiece { square, side } => {
                write!(f, "The piece on {square} does not belong to {side}")
            }
            Self::Unreachable { from, to } => {
                write!(f, "The piece on {from} cannot legally move to {to}")
            }
            Self::InvalidPromotion(kind) => write!(f, "Pawns cannot promote to a {kind}"),
            Self::NotOnLastRow(square) => {
                write!(f, "The pawn on {square} has not reached its last row")
            }
        }
    }
}

impl Error for IllegalMove {}

impl Game {
    /// Creates a new [`Game`] from the standard starting position, with White to move.
    #[inline(always)]
    pub fn new() -> Self {
        Self::from_board(Board::default(), Color::White)
    }

    /// Creates a new [`Game`] from an arbitrary [`Board`].
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Color, Game};
    /// let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
    /// let game = Game::from_board(board, Color::Black);
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// assert_eq!(game.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn from_board(board: Board, side_to_move: Color) -> Self {
        Self {
            side_to_move,
            opponent: side_to_move.opponent(),
            board,
        }
    }

    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub const fn opponent(&self) -> Color {
        self.opponent
    }

    /// All legal moves of the side to move.
    #[inline(always)]
    pub fn legal_moves(&self) -> Result<MoveMap> {
        legal_moves(&self.board, self.side_to_move)
    }

    /// Legal destinations of the piece on `square`.
    ///
    /// Empty if `square` is empty, holds an enemy piece, or holds a piece with no legal moves.
    ///
    /// # Example
    /// ```
    /// # use newt::{Game, Square};
    /// let game = Game::new();
    /// let mut moves = game.legal_moves_from(Square::B1).unwrap();
    /// moves.sort();
    /// assert_eq!(moves, [Square::A3, Square::C3]);
    /// assert!(game.legal_moves_from(Square::B8).unwrap().is_empty());
    /// ```
    pub fn legal_moves_from(&self, square: Square) -> Result<Vec<Square>> {
        Ok(self.legal_moves()?.get(square).to_vec())
    }

    /// Returns `true` if the side to move is in check.
    #[inline(always)]
    pub fn is_in_check(&self) -> Result<bool> {
        is_in_check(&self.board, self.side_to_move)
    }

    /// Returns `true` if the side to move has no legal moves at all.
    ///
    /// This does not distinguish stalemate from checkmate.
    #[inline(always)]
    pub fn is_checkmate(&self) -> Result<bool> {
        Ok(self.legal_moves()?.is_empty())
    }

    /// Summarises the state of the game for the side to move.
    pub fn status(&self) -> Result<GameStatus> {
        let status = if self.is_checkmate()? {
            GameStatus::Checkmate {
                winner: self.opponent,
            }
        } else {
            GameStatus::AwaitingMove {
                side: self.side_to_move,
                in_check: self.is_in_check()?,
            }
        };

        Ok(status)
    }

    /// Applies a move without checking its legality, then passes the turn.
    ///
    /// Pawns, Rooks, and Kings are marked as moved. The captured piece, if any, is returned.
    pub fn make_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let captured = self.board.relocate(from, to);

        if let Some(piece) = self.board.piece_at_mut(to) {
            if piece.kind().tracks_movement() {
                piece.set_moved();
            }
        }

        std::mem::swap(&mut self.side_to_move, &mut self.opponent);
        captured
    }

    /// Copies `self` and returns a [`Game`] after having applied `mv` with [`Game::make_move`].
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.make_move(mv.from, mv.to);
        copied
    }

    /// Applies a move after checking that it is legal for the side to move.
    ///
    /// An illegal move fails with an [`IllegalMove`] and leaves the game untouched.
    ///
    /// # Example
    /// ```
    /// # use newt::{Game, IllegalMove, Square};
    /// let mut game = Game::new();
    /// assert!(game.make_move_checked(Square::E2, Square::E4).is_ok());
    ///
    /// let err = game.make_move_checked(Square::E4, Square::E5).unwrap_err();
    /// assert!(err.downcast_ref::<IllegalMove>().is_some());
    /// ```
    pub fn make_move_checked(&mut self, from: Square, to: Square) -> Result<Option<Piece>> {
        let moves = self.legal_moves()?;
        self.validate(&moves, from, to)?;
        Ok(self.make_move(from, to))
    }

    /// Checks `from` and `to` against the legal `moves` of the side to move.
    fn validate(&self, moves: &MoveMap, from: Square, to: Square) -> Result<(), IllegalMove> {
        let Some(color) = self.board.color_at(from) else {
            return Err(IllegalMove::NoPiece(from));
        };

        if color != self.side_to_move {
            return Err(IllegalMove::NotYourPiece {
                square: from,
                side: self.side_to_move,
            });
        }

        if !moves.contains(from, to) {
            return Err(IllegalMove::Unreachable { from, to });
        }

        Ok(())
    }

    /// The square of a Pawn belonging to the player who just moved that has reached its last row.
    pub fn pending_promotion(&self) -> Option<Square> {
        self.board
            .pieces_of(self.opponent)
            .find(|(square, piece)| piece.promotes_on(*square))
            .map(|(square, _)| square)
    }

    /// Replaces the Pawn on `square` with a piece of `kind`, keeping its color.
    ///
    /// The Pawn must stand on its last row.
    ///
    /// # Example
    /// ```
    /// # use newt::{Board, Color, Game, PieceKind, Square};
    /// let board = Board::from_fen("k7/4P3/8/8/8/8/8/4K3").unwrap();
    /// let mut game = Game::from_board(board, Color::White);
    /// game.make_move_checked(Square::E7, Square::E8).unwrap();
    ///
    /// assert_eq!(game.pending_promotion(), Some(Square::E8));
    /// game.promote(Square::E8, PieceKind::Rook).unwrap();
    /// assert_eq!(game.board().kind_at(Square::E8), Some(PieceKind::Rook));
    /// assert_eq!(game.pending_promotion(), None);
    /// ```
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Result<()> {
        if !kind.is_promotion() {
            bail!(IllegalMove::InvalidPromotion(kind));
        }

        let Some(piece) = self.board.piece_at_mut(square) else {
            bail!(IllegalMove::NoPiece(square));
        };

        if !piece.is_pawn() {
            bail!("Only Pawns can be promoted. Found a {} on {square}", piece.name());
        }

        if !piece.promotes_on(square) {
            bail!(IllegalMove::NotOnLastRow(square));
        }

        *piece = piece.promoted(kind);
        Ok(())
    }

    /// Runs the turn loop until the game ends or a player asks to stop.
    ///
    /// Each turn, the side to move is checked for checkmate before `source` is asked for a
    /// [`Command`]. Illegal commands are handed back to `source` and it is asked again.
    ///
    /// Errors are only returned for corrupt positions (such as a missing King) or a failing
    /// `source`.
    pub fn play<S: MoveSource>(&mut self, source: &mut S) -> Result<GameOutcome> {
        loop {
            let moves = self.legal_moves()?;
            if moves.is_empty() {
                return Ok(GameOutcome::Checkmate {
                    winner: self.opponent,
                });
            }

            let turn = Turn {
                side: self.side_to_move,
                in_check: self.is_in_check()?,
                moves: &moves,
                board: &self.board,
            };

            let (from, to, promotion) = loop {
                let command = source
                    .next_command(&turn)
                    .with_context(|| format!("Failed to read a command for {}", turn.side))?;

                match command {
                    Command::Save => return Ok(GameOutcome::Saved),

                    Command::Surrender => {
                        return Ok(GameOutcome::Surrendered {
                            winner: self.opponent,
                        })
                    }

                    Command::Move {
                        from,
                        to,
                        promotion,
                    } => {
                        let checked = match promotion {
                            Some(kind) if !kind.is_promotion() => {
                                Err(IllegalMove::InvalidPromotion(kind))
                            }
                            _ => self.validate(&moves, from, to),
                        };

                        match checked {
                            Ok(()) => break (from, to, promotion),
                            Err(reason) => source.rejected(&turn, &reason),
                        }
                    }
                }
            };

            let side = self.side_to_move;
            let captured = self.make_move(from, to);

            if self.board.piece_at(to).is_some_and(|piece| piece.promotes_on(to)) {
                self.promote(to, promotion.unwrap_or(PieceKind::Queen))?;
            }

            source.played(side, Move::new(from, to), captured);
        }
    }

    /// Captures the state of this game for storage.
    #[inline(always)]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }

    /// Restores a game from a [`Snapshot`], failing if the snapshot is inconsistent.
    #[inline(always)]
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        Self::try_from(snapshot)
    }

    /// Creates a game from raw parts. Consistency of the players is up to the caller.
    #[inline(always)]
    pub(crate) const fn from_parts(side_to_move: Color, opponent: Color, board: Board) -> Self {
        Self {
            side_to_move,
            opponent,
            board,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{} to move", self.board, self.side_to_move.title())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("side_to_move", &self.side_to_move)
            .field("opponent", &self.opponent)
            .field("board", &self.board)
            .finish()
    }
}
