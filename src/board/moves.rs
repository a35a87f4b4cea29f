/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::BTreeMap, fmt};

use super::{Bitboard, Square};

/// A single piece relocation from one [`Square`] to another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    /// Displays as both coordinates back to back, such as `e2e4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Destinations available to each piece of one player, keyed by the square the piece stands on.
///
/// Every piece of the player has an entry, even if it cannot move anywhere, so an empty entry
/// means "this piece is stuck" rather than "this is not your piece".
///
/// A [`MoveMap`] describes one position only; it must be recomputed after every move.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MoveMap {
    moves: BTreeMap<Square, Vec<Square>>,
}

impl MoveMap {
    /// Creates an empty [`MoveMap`].
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the destinations of the piece on `from`, replacing any previous entry.
    #[inline(always)]
    pub fn insert(&mut self, from: Square, destinations: Vec<Square>) {
        self.moves.insert(from, destinations);
    }

    /// Destinations of the piece on `from`. Empty if it has none, or if `from` has no entry.
    #[inline(always)]
    pub fn get(&self, from: Square) -> &[Square] {
        self.moves.get(&from).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if `from` holds one of this player's pieces.
    #[inline(always)]
    pub fn contains_key(&self, from: Square) -> bool {
        self.moves.contains_key(&from)
    }

    /// Returns `true` if the piece on `from` may move to `to`.
    #[inline(always)]
    pub fn contains(&self, from: Square, to: Square) -> bool {
        self.get(from).contains(&to)
    }

    /// Returns `true` if there are no moves at all, across every piece.
    ///
    /// # Example
    /// ```
    /// # use newt::{MoveMap, Square};
    /// let mut moves = MoveMap::new();
    /// moves.insert(Square::E1, vec![]);
    /// assert!(moves.is_empty());
    /// moves.insert(Square::A1, vec![Square::A2]);
    /// assert!(!moves.is_empty());
    /// ```
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.moves.values().all(Vec::is_empty)
    }

    /// Number of pieces with an entry in this map.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Total number of moves, across every piece.
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.moves.values().map(Vec::len).sum()
    }

    /// Squares of pieces that have at least one move.
    pub fn movable(&self) -> impl Iterator<Item = Square> + '_ {
        self.moves
            .iter()
            .filter(|(_, to)| !to.is_empty())
            .map(|(&from, _)| from)
    }

    /// Iterates over every entry, in ascending order of origin square.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (Square, &[Square])> + '_ {
        self.moves.iter().map(|(&from, to)| (from, to.as_slice()))
    }

    /// Iterates over every individual [`Move`] in this map.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves
            .iter()
            .flat_map(|(&from, to)| to.iter().map(move |&to| Move::new(from, to)))
    }

    /// All destinations of all pieces, as a single set.
    pub fn destinations(&self) -> Bitboard {
        self.moves.values().flatten().copied().collect()
    }
}

impl FromIterator<(Square, Vec<Square>)> for MoveMap {
    fn from_iter<T: IntoIterator<Item = (Square, Vec<Square>)>>(iter: T) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for MoveMap {
    /// Displays one line per piece, such as `e2: e3, e4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (from, to) in self.iter() {
            let destinations = if to.is_empty() {
                String::from("(none)")
            } else {
                to.iter()
                    .map(|sq| sq.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            writeln!(f, "{from}: {destinations}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for MoveMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.moves.iter()).finish()
    }
}
