/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use newt::{
    candidate_moves, is_in_check, leaves_king_attacked, legal_moves, pseudo_legal_moves, Bitboard,
    Board, Color, Game, Piece, PieceKind, Square,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SEED: u64 = 0x6E65_7774;

/// Number of random positions checked by each test.
const POSITIONS: usize = 200;

/// Builds a random position with one King per side and up to `extra` other pieces.
fn random_board(rng: &mut StdRng, extra: usize) -> Board {
    let mut board = Board::new();

    for color in Color::all() {
        let square = random_empty_square(rng, &board);
        board.place(Piece::new(color, PieceKind::King), square);
    }

    let kinds = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    for _ in 0..rng.random_range(0..=extra) {
        let color = if rng.random_bool(0.5) {
            Color::White
        } else {
            Color::Black
        };
        let kind = kinds[rng.random_range(0..kinds.len())];
        let square = random_empty_square(rng, &board);
        let piece = Piece::new(color, kind).with_moved(rng.random_bool(0.5));
        board.place(piece, square);
    }

    board
}

fn random_empty_square(rng: &mut StdRng, board: &Board) -> Square {
    loop {
        let square = Square::from_index_unchecked(rng.random_range(0..Square::COUNT));
        if board.is_empty(square) {
            return square;
        }
    }
}

#[test]
fn test_candidates_never_land_on_own_pieces() {
    let mut rng = StdRng::seed_from_u64(SEED);

    for _ in 0..POSITIONS {
        let board = random_board(&mut rng, 20);

        for (from, piece) in board.iter() {
            let own = board.occupied_by(piece.color());
            for to in candidate_moves(&board, from) {
                assert_ne!(from, to, "{board:?}: {from} moves onto itself");
                assert!(
                    !own.contains(to),
                    "{board:?}: {from} captures its own piece on {to}"
                );
            }
        }
    }
}

#[test]
fn test_attack_set_is_union_of_candidates() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 1);

    for _ in 0..POSITIONS {
        let board = random_board(&mut rng, 16);

        for color in Color::all() {
            let expected: Bitboard = pseudo_legal_moves(&board, color)
                .iter()
                .flat_map(|(_, to)| to.to_vec())
                .collect();
            assert_eq!(board.attacks_by(color), expected, "{board:?}");
        }
    }
}

#[test]
fn test_legal_moves_are_exactly_the_safe_candidates() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 2);

    for _ in 0..POSITIONS {
        let board = random_board(&mut rng, 12);

        for color in Color::all() {
            let candidates = pseudo_legal_moves(&board, color);
            let legal = legal_moves(&board, color).unwrap();
            assert_eq!(candidates.len(), legal.len());

            for (from, destinations) in candidates.iter() {
                for &to in destinations {
                    let after = board.with_relocation(from, to);
                    let exposed = is_in_check(&after, color).unwrap();

                    assert_eq!(
                        leaves_king_attacked(&board, color, from, to).unwrap(),
                        exposed
                    );
                    assert_eq!(
                        legal.contains(from, to),
                        !exposed,
                        "{board:?}: {color} {from}->{to}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_checkmate_detection_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 3);

    for _ in 0..POSITIONS {
        let board = random_board(&mut rng, 8);
        let side = if rng.random_bool(0.5) {
            Color::White
        } else {
            Color::Black
        };
        let game = Game::from_board(board, side);

        let first = game.is_checkmate().unwrap();
        let second = game.is_checkmate().unwrap();
        assert_eq!(first, second);
        assert_eq!(*game.board(), board);
        assert_eq!(first, game.legal_moves().unwrap().is_empty());
    }
}

#[test]
fn test_random_games_keep_both_kings() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 4);

    for _ in 0..20 {
        let mut game = Game::new();

        for _ in 0..80 {
            let moves = game.legal_moves().unwrap().moves().collect::<Vec<_>>();
            if moves.is_empty() {
                break;
            }

            let mover = game.side_to_move();
            let mv = moves[rng.random_range(0..moves.len())];
            game.make_move_checked(mv.from, mv.to).unwrap();
            if let Some(square) = game.pending_promotion() {
                game.promote(square, PieceKind::Queen).unwrap();
            }

            // The side that just moved can never be left in check
            assert!(!is_in_check(game.board(), mover).unwrap(), "{game:?}");
            for color in Color::all() {
                assert!(game.board().king_square(color).is_ok(), "{game:?}");
            }
        }
    }
}
