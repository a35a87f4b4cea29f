/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;

use crate::{
    splitperft, Bitboard, Board, Cli, Color, Command, Game, GameOutcome, IllegalMove, Move,
    MoveSource, Piece, PieceKind, PromptCommand, SaveStore, Square, Turn,
};

/// Runs the terminal game described by `cli` on `stdin` and `stdout`.
pub fn run(cli: Cli) -> Result<()> {
    let store = SaveStore::new(&cli.save_dir);

    if cli.list_saves {
        let saves = store.list()?;
        if saves.is_empty() {
            println!("No saves found in {}", store.dir().display());
        }
        for save in saves {
            println!("{}", save.display());
        }
        return Ok(());
    }

    let mut game = if let Some(path) = &cli.load {
        store.load(path)?
    } else if let Some(board) = cli.fen {
        Game::from_board(board, cli.first_player())
    } else {
        Game::new()
    };

    if let Some(depth) = cli.perft {
        splitperft(&game, depth, &mut io::stdout().lock())?;
        return Ok(());
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut player = TerminalPlayer::new(stdin.lock(), stdout.lock());

    let outcome = game.play(&mut player)?;
    let (_, mut output) = player.into_inner();

    if outcome == GameOutcome::Saved {
        let path = store.save(&game)?;
        writeln!(output, "Game saved to {}", path.display())?;
    } else {
        writeln!(output, "{}\n\n{outcome}", game.board())?;
    }

    Ok(())
}

/// A [`MoveSource`] that asks the players for moves through a terminal.
///
/// Prompts and boards go to `output`. Mistakes are reported on stderr, and the player is asked
/// again.
pub struct TerminalPlayer<R, W> {
    input: R,
    output: W,
    buffer: String,
}

impl<R: BufRead, W: Write> TerminalPlayer<R, W> {
    /// Creates a new [`TerminalPlayer`] reading from `input` and writing to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            buffer: String::with_capacity(64),
        }
    }

    /// Consumes this player, returning its input and output.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Prints `prompt` and reads a trimmed line of input.
    ///
    /// Running out of input ends the game, since nobody is left to play it.
    fn prompt(&mut self, prompt: &str) -> Result<&str> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        self.buffer.clear();
        let bytes = self
            .input
            .read_line(&mut self.buffer)
            .context("Failed to read a line of input")?;

        // For ctrl + d
        if bytes == 0 {
            bail!("Input ended before the game was over");
        }

        Ok(self.buffer.trim())
    }

    /// Draws the board, marking `selected` and the squares it may move to.
    fn render(&mut self, turn: &Turn<'_>, selected: Option<Square>) -> Result<()> {
        let targets = selected
            .map(|square| turn.moves.get(square).iter().copied().collect())
            .unwrap_or_default();

        writeln!(self.output)?;
        writeln!(self.output, "{}", render_board(turn.board, selected, targets))?;
        if turn.in_check {
            writeln!(self.output, "{} is in check!", turn.side.title())?;
        }
        Ok(())
    }

    /// Asks which square the piece on `from` should move to.
    ///
    /// Returns `None` if the player cancels with an empty line.
    fn choose_destination(&mut self, turn: &Turn<'_>, from: Square) -> Result<Option<Square>> {
        self.render(turn, Some(from))?;

        loop {
            let line = self.prompt("Select destination (empty line to cancel): ")?;
            if line.is_empty() {
                return Ok(None);
            }

            match Square::from_uci(line) {
                Ok(to) => return Ok(Some(to)),
                Err(err) => eprintln!("{err}"),
            }
        }
    }

    /// Asks what a Pawn should become. An empty line picks a Queen.
    fn choose_promotion(&mut self) -> Result<PieceKind> {
        loop {
            let line = self.prompt("Promote to (queen, rook, bishop, knight) [queen]: ")?;
            if line.is_empty() {
                return Ok(PieceKind::Queen);
            }

            match line.parse::<PieceKind>() {
                Ok(kind) if kind.is_promotion() => return Ok(kind),
                Ok(kind) => eprintln!("{}", IllegalMove::InvalidPromotion(kind)),
                Err(err) => eprintln!("{err}"),
            }
        }
    }

    /// Checks that `square` holds a piece that the side to move may move.
    fn check_selection(turn: &Turn<'_>, square: Square) -> Result<(), String> {
        match turn.board.piece_at(square) {
            None => Err(IllegalMove::NoPiece(square).to_string()),
            Some(piece) if piece.color() != turn.side => Err(IllegalMove::NotYourPiece {
                square,
                side: turn.side,
            }
            .to_string()),
            Some(piece) if turn.moves.get(square).is_empty() => {
                Err(format!("The {} on {square} has no legal moves", piece.name()))
            }
            Some(_) => Ok(()),
        }
    }
}

impl<R: BufRead, W: Write> MoveSource for TerminalPlayer<R, W> {
    fn next_command(&mut self, turn: &Turn<'_>) -> Result<Command> {
        self.render(turn, None)?;

        loop {
            let prompt = format!(
                "{} select piece (or type 'sq' to save and quit or 'surrender' to surrender): ",
                turn.side.title()
            );
            let line = self.prompt(&prompt)?;
            if line.is_empty() {
                continue;
            }

            let command = match line.parse::<PromptCommand>() {
                Ok(command) => command,

                // Edge case: `help` is an "error" according to Clap
                Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                    writeln!(self.output, "{err}")?;
                    continue;
                }

                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };

            match command {
                PromptCommand::Save => return Ok(Command::Save),

                PromptCommand::Surrender => return Ok(Command::Surrender),

                PromptCommand::Display => self.render(turn, None)?,

                PromptCommand::Moves { square: None } => write!(self.output, "{}", turn.moves)?,

                PromptCommand::Moves {
                    square: Some(square),
                } => {
                    let moves = turn
                        .moves
                        .get(square)
                        .iter()
                        .map(|to| to.to_string())
                        .collect::<Vec<_>>();
                    writeln!(self.output, "{square}: {}", moves.join(", "))?;
                }

                PromptCommand::Select { square: from } => {
                    if let Err(msg) = Self::check_selection(turn, from) {
                        eprintln!("{msg}");
                        continue;
                    }

                    let Some(to) = self.choose_destination(turn, from)? else {
                        self.render(turn, None)?;
                        continue;
                    };

                    let promotes = turn
                        .board
                        .piece_at(from)
                        .is_some_and(|piece| piece.promotes_on(to));
                    let promotion = if promotes && turn.moves.contains(from, to) {
                        Some(self.choose_promotion()?)
                    } else {
                        None
                    };

                    return Ok(Command::Move {
                        from,
                        to,
                        promotion,
                    });
                }
            }
        }
    }

    fn rejected(&mut self, _turn: &Turn<'_>, reason: &IllegalMove) {
        eprintln!("{reason}");
    }

    fn played(&mut self, side: Color, mv: Move, captured: Option<Piece>) {
        let message = match captured {
            Some(piece) => format!("{} captured {} on {}", side.title(), piece.name(), mv.to),
            None => format!("{} moved {mv}", side.title()),
        };

        if let Err(err) = writeln!(self.output, "{message}") {
            eprintln!("Failed to write to output: {err}");
        }
    }
}

/// Draws `board` with rank and file labels.
///
/// The `selected` square is wrapped in `[ ]`. Empty `targets` are shown as `*`, and occupied ones
/// (captures) are wrapped in `( )`.
///
/// # Example
/// ```
/// # use newt::{render_board, Bitboard, Board, Square};
/// let targets = Bitboard::from_iter([Square::E3, Square::E4]);
/// let shown = render_board(&Board::default(), Some(Square::E2), targets);
/// assert!(shown.contains(" *  .  .  . "));
/// assert!(shown.contains("[P]"));
/// ```
pub fn render_board(board: &Board, selected: Option<Square>, targets: Bitboard) -> String {
    // Allocate just enough capacity
    let mut out = String::with_capacity(320);

    for square in Square::iter() {
        if square.col() == 0 {
            out += &format!("{} |", square.rank_char());
        }

        let symbol = board.piece_at(square).map_or('.', |piece| piece.char());
        let cell = if selected == Some(square) {
            format!("[{symbol}]")
        } else if targets.contains(square) {
            if board.has(square) {
                format!("({symbol})")
            } else {
                String::from(" * ")
            }
        } else {
            format!(" {symbol} ")
        };
        out += &cell;

        if square.col() == 7 {
            out.push('\n');
        }
    }

    out += "  +------------------------\n    a  b  c  d  e  f  g  h";
    out
}
