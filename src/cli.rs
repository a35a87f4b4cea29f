/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{path::PathBuf, str::FromStr};

use clap::Parser;

use crate::{Board, Color, Square, DEFAULT_SAVE_DIR};

/// A two-player chess game for the terminal.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Resume the game stored in this save file.
    ///
    /// Bare file names, such as `save_2.json`, are looked up in the save directory.
    #[arg(short, long, value_name = "FILE", conflicts_with = "fen")]
    pub load: Option<PathBuf>,

    /// Directory that save files are written to and listed from.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_SAVE_DIR)]
    pub save_dir: PathBuf,

    /// Print the available save files and exit.
    #[arg(long, default_value = "false")]
    pub list_saves: bool,

    /// Start from a custom layout, given as the piece placement field of a FEN string.
    #[arg(short, long, value_name = "PLACEMENTS")]
    pub fen: Option<Board>,

    /// If set, Black moves first in the custom layout.
    #[arg(short, long, default_value = "false", requires = "fen")]
    pub black: bool,

    /// Count the positions reachable in this many moves, print them per root move, and exit.
    #[arg(long, value_name = "DEPTH")]
    pub perft: Option<usize>,
}

impl Cli {
    /// The side to move first in a custom layout.
    #[inline(always)]
    pub const fn first_player(&self) -> Color {
        if self.black {
            Color::Black
        } else {
            Color::White
        }
    }
}

/// A line of input typed while a game is being played.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    rename_all = "lower",
    override_usage("<SQUARE> | <COMMAND>")
)]
pub enum PromptCommand {
    /// Save the game and quit.
    #[command(alias = "sq")]
    Save,

    /// Give up the game.
    Surrender,

    /// Show the legal moves of every piece, or of the piece on a specific square.
    Moves { square: Option<Square> },

    /// Print the board again.
    #[command(alias = "d")]
    Display,

    /// A board coordinate, such as `e2`.
    #[command(skip)]
    Select { square: Square },
}

impl FromStr for PromptCommand {
    type Err = clap::Error;
    /// Parses a coordinate first, since that's what players type most, and falls back to commands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(square) = Square::from_uci(s) {
            return Ok(Self::Select { square });
        }

        Self::try_parse_from(s.split_ascii_whitespace())
    }
}
