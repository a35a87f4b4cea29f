/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// A 64-bit set of squares, used for attack sets.
mod bitboard;

/// Check detection and filtering of moves that would expose a King.
mod legality;

/// The 8x8 grid of pieces.
mod mailbox;

/// Candidate move generation for each kind of piece.
mod movegen;

/// Moves and the per-piece move map.
mod moves;

/// Colors, piece kinds, and pieces.
mod piece;

/// Board coordinates.
mod square;

pub use bitboard::*;
pub use legality::*;
pub use mailbox::*;
pub use movegen::*;
pub use moves::*;
pub use piece::*;
pub use square::*;
