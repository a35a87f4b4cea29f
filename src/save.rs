/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fs,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{Board, Color, Game, Piece, PieceKind, Square};

/// Directory that save files are written to, unless told otherwise.
pub const DEFAULT_SAVE_DIR: &str = "savestates";

/// Prefix of every save file name. The full name is `save_<n>.json`.
const SAVE_PREFIX: &str = "save_";

/// File extension of save files.
const SAVE_EXTENSION: &str = "json";

/// A serializable record of a [`Game`]: both players and every piece on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_player: Color,
    pub other_player: Color,
    pub pieces: Vec<PieceRecord>,
}

/// A single piece within a [`Snapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub color: Color,
    pub kind: PieceKind,
    pub square: Square,
    pub has_moved: bool,
}

impl PieceRecord {
    #[inline(always)]
    fn piece(&self) -> Piece {
        Piece::new(self.color, self.kind).with_moved(self.has_moved)
    }
}

impl Snapshot {
    /// Serializes this snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize snapshot")
    }

    /// Parses a snapshot from JSON. The snapshot is not checked for consistency until it is
    /// turned into a [`Game`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse snapshot")
    }
}

impl From<&Game> for Snapshot {
    fn from(game: &Game) -> Self {
        let pieces = game
            .board()
            .iter()
            .map(|(square, piece)| PieceRecord {
                color: piece.color(),
                kind: piece.kind(),
                square,
                has_moved: piece.has_moved(),
            })
            .collect();

        Self {
            current_player: game.side_to_move(),
            other_player: game.opponent(),
            pieces,
        }
    }
}

impl TryFrom<Snapshot> for Game {
    type Error = anyhow::Error;

    /// Rebuilds a [`Game`], rejecting snapshots that no legal game could have produced.
    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        if snapshot.current_player == snapshot.other_player {
            bail!(
                "Invalid snapshot: both players are {}",
                snapshot.current_player
            );
        }

        let mut board = Board::new();
        for record in &snapshot.pieces {
            if let Some(occupant) = board.piece_at(record.square) {
                bail!(
                    "Invalid snapshot: {} and {} both occupy {}",
                    occupant.name(),
                    record.piece().name(),
                    record.square
                );
            }
            board.place(record.piece(), record.square);
        }

        for color in Color::all() {
            let kings = board
                .pieces_of(color)
                .filter(|(_, piece)| piece.is_king())
                .count();
            if kings != 1 {
                bail!("Invalid snapshot: expected exactly one {color} king, found {kings}");
            }
        }

        Ok(Game::from_parts(
            snapshot.current_player,
            snapshot.other_player,
            board,
        ))
    }
}

/// A directory of numbered JSON save files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// Creates a store over `dir`. The directory is only created once something is saved.
    #[inline(always)]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[inline(always)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lists every save file in this store, ordered by save number.
    ///
    /// A missing directory simply has no saves.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read save directory {}", self.dir.display()))?;

        let mut saves = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if let Some(number) = save_number(&path) {
                saves.push((number, path));
            }
        }

        saves.sort();
        Ok(saves.into_iter().map(|(_, path)| path).collect())
    }

    /// Writes `game` to the next free `save_<n>.json`, returning its path.
    pub fn save(&self, game: &Game) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create save directory {}", self.dir.display()))?;

        let next = self
            .list()?
            .iter()
            .filter_map(|path| save_number(path))
            .max()
            .map_or(1, |n| n + 1);
        let path = self
            .dir
            .join(format!("{SAVE_PREFIX}{next}.{SAVE_EXTENSION}"));

        let file = fs::File::create(&path)
            .with_context(|| format!("Failed to create save file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &game.snapshot())
            .with_context(|| format!("Failed to write save file {}", path.display()))?;
        writer.flush()?;

        Ok(path)
    }

    /// Loads a [`Game`] from `path`.
    ///
    /// `path` may also be the bare file name of a save inside this store, such as `save_3.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Game> {
        let path = self.resolve(path.as_ref());

        let file = fs::File::open(&path)
            .with_context(|| format!("Failed to open save file {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse save file {}", path.display()))?;

        Game::from_snapshot(snapshot)
            .with_context(|| format!("Save file {} is corrupt", path.display()))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.exists() || path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }
}

impl Default for SaveStore {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DIR)
    }
}

/// Extracts `n` from a path ending in `save_<n>.json`.
fn save_number(path: &Path) -> Option<u32> {
    if path.extension()? != SAVE_EXTENSION {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix(SAVE_PREFIX)?
        .parse()
        .ok()
}
