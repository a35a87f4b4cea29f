/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Board representation, move generation, and legality checks.
mod board;

/// Command-line arguments and in-game commands.
mod cli;

/// The terminal front end: prompting players and drawing the board.
mod engine;

/// Turn order, checkmate detection, and the turn loop.
mod game;

/// Move path enumeration, for validating move generation.
mod perft;

/// Snapshots of games and the save directory they are stored in.
mod save;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use game::*;
pub use perft::*;
pub use save::*;
