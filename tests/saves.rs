/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fs, io::Cursor, path::PathBuf};

use newt::{Color, Game, GameOutcome, PieceKind, SaveStore, Snapshot, Square, TerminalPlayer};

/// A fresh, empty directory under the system temp dir, removed again on drop.
struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("newt-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        Self(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn play(game: &mut Game, input: &str) -> GameOutcome {
    let mut player = TerminalPlayer::new(Cursor::new(input.to_string()), Vec::new());
    game.play(&mut player).unwrap()
}

#[test]
fn test_save_files_are_numbered() {
    let dir = TempDir::new("numbered");
    let store = SaveStore::new(&dir.0);
    assert!(store.list().unwrap().is_empty());

    let first = store.save(&Game::new()).unwrap();
    let second = store.save(&Game::new()).unwrap();
    fs::write(dir.0.join("notes.txt"), "not a save").unwrap();

    assert!(first.ends_with("save_1.json"));
    assert!(second.ends_with("save_2.json"));
    assert_eq!(store.list().unwrap(), vec![first, second]);
}

#[test]
fn test_saved_game_resumes_where_it_left_off() {
    let dir = TempDir::new("resume");
    let store = SaveStore::new(&dir.0);

    let mut game = Game::new();
    let outcome = play(&mut game, "e2\ne4\ne7\ne5\ng1\nf3\nsq\n");
    assert_eq!(outcome, GameOutcome::Saved);
    let path = store.save(&game).unwrap();

    // Loading by bare file name looks inside the store
    let mut restored = store.load("save_1.json").unwrap();
    assert_eq!(restored, game);
    assert_eq!(store.load(&path).unwrap(), game);
    assert_eq!(restored.side_to_move(), Color::Black);
    assert!(restored.board().piece_at(Square::E4).unwrap().has_moved());
    assert!(!restored.board().piece_at(Square::F3).unwrap().has_moved());

    let outcome = play(&mut restored, "surrender\n");
    assert_eq!(
        outcome,
        GameOutcome::Surrendered {
            winner: Color::White
        }
    );
}

#[test]
fn test_snapshot_preserves_occupancy_and_players() {
    let mut game = Game::new();
    for (from, to) in [
        (Square::E2, Square::E4),
        (Square::D7, Square::D5),
        (Square::E4, Square::D5),
        (Square::D8, Square::D5),
    ] {
        game.make_move_checked(from, to).unwrap();
    }

    let snapshot = game.snapshot();
    assert_eq!(snapshot.pieces.len(), 30);
    assert_eq!(snapshot.current_player, Color::White);
    assert_eq!(snapshot.other_player, Color::Black);

    let restored = Game::from_snapshot(Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap())
        .unwrap();
    for square in Square::iter() {
        assert_eq!(restored.board().piece_at(square), game.board().piece_at(square));
    }
    assert_eq!(restored.board().kind_at(Square::D5), Some(PieceKind::Queen));
}

#[test]
fn test_corrupt_save_files_are_rejected() {
    let dir = TempDir::new("corrupt");
    fs::create_dir_all(&dir.0).unwrap();
    let store = SaveStore::new(&dir.0);

    fs::write(dir.0.join("save_1.json"), "{ not json").unwrap();
    assert!(store.load("save_1.json").is_err());

    let mut snapshot = Game::new().snapshot();
    snapshot.pieces.retain(|piece| piece.kind != PieceKind::King || piece.color == Color::White);
    fs::write(dir.0.join("save_2.json"), snapshot.to_json().unwrap()).unwrap();
    assert!(store.load("save_2.json").is_err());

    assert!(store.load("save_3.json").is_err());
}
