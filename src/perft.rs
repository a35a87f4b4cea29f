/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::Write;

use anyhow::Result;

use crate::Game;

/// Counts the positions reachable from `game` in exactly `depth` moves.
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them and counting each resulting position.
///
/// A Pawn reaching its last row counts as a single move, whatever it promotes to.
///
/// # Example
/// ```
/// # use newt::{perft, Game};
/// let game = Game::new();
/// assert_eq!(perft(&game, 2).unwrap(), 400);
/// ```
pub fn perft(game: &Game, depth: usize) -> Result<u64> {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return Ok(1);
    }

    let moves = game.legal_moves()?;

    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if depth == 1 {
        return Ok(moves.count() as u64);
    }

    let mut nodes = 0;
    for mv in moves.moves() {
        nodes += perft(&game.with_move_made(mv), depth - 1)?;
    }
    Ok(nodes)
}

/// Same as [`perft`], but writes the node count below each root move to `output`.
pub fn splitperft<W: Write>(game: &Game, depth: usize, output: &mut W) -> Result<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let mut nodes = 0;
    for mv in game.legal_moves()?.moves() {
        let new_nodes = perft(&game.with_move_made(mv), depth - 1)?;
        writeln!(output, "{mv}\t{new_nodes}")?;
        nodes += new_nodes;
    }

    writeln!(output, "\n{nodes}")?;
    Ok(nodes)
}
