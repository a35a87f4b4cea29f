/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use newt::{perft, Board, Color, Game};

fn test_perft_fen_nodes(depth: usize, fen: &str, side: Color, expected: u64) {
    let board = Board::from_fen(fen).unwrap();
    let game = Game::from_board(board, side);
    let res = perft(&game, depth).unwrap();
    assert_eq!(res, expected, "PERFT({depth}) failed on {fen}");
}

// Castling, en passant, and promotions cannot occur this early, so standard counts apply
#[cfg(test)]
mod startpos_perfts {
    use super::*;

    const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn test_startpos_perft_1() {
        test_perft_fen_nodes(1, STARTPOS, Color::White, 20);
    }

    #[test]
    fn test_startpos_perft_2() {
        test_perft_fen_nodes(2, STARTPOS, Color::White, 400);
    }

    #[test]
    fn test_startpos_perft_3() {
        test_perft_fen_nodes(3, STARTPOS, Color::White, 8_902);
    }

    #[test]
    fn test_startpos_perft_4() {
        test_perft_fen_nodes(4, STARTPOS, Color::White, 197_281);
    }
}

/// https://www.chessprogramming.org/Perft_Results#Position_3
#[cfg(test)]
mod endgame_perfts {
    use super::*;

    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8";

    #[test]
    fn test_endgame_perft_1() {
        test_perft_fen_nodes(1, POSITION_3, Color::White, 14);
    }

    #[test]
    fn test_endgame_perft_2() {
        test_perft_fen_nodes(2, POSITION_3, Color::White, 191);
    }
}
