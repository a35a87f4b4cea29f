/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::Result;

use super::{pseudo_legal_moves, Board, Color, MoveMap, Square};

/// Returns `true` if the King of `color` is attacked by any piece of the opposing color.
///
/// Recomputed from scratch on every call. Fails if `color` has no King on the board.
///
/// # Example
/// ```
/// # use newt::{is_in_check, Board, Color};
/// let board = Board::from_fen("4k3/8/8/8/8/8/8/4R1K1").unwrap();
/// assert!(is_in_check(&board, Color::Black).unwrap());
/// assert!(!is_in_check(&board, Color::White).unwrap());
/// ```
pub fn is_in_check(board: &Board, color: Color) -> Result<bool> {
    let king = board.king_square(color)?;
    Ok(board.attacks_by(color.opponent()).contains(king))
}

/// Returns `true` if moving the piece on `from` to `to` would leave the King of `color` attacked.
///
/// The move is applied to a private copy of `board`.
#[inline(always)]
pub fn leaves_king_attacked(board: &Board, color: Color, from: Square, to: Square) -> Result<bool> {
    is_in_check(&board.with_relocation(from, to), color)
}

/// Removes every move from `candidates` that would leave the King of `color` attacked.
///
/// Pieces whose candidates are all rejected keep an empty entry.
pub fn filter_legal(board: &Board, color: Color, candidates: MoveMap) -> Result<MoveMap> {
    let mut legal = MoveMap::new();

    for (from, destinations) in candidates.iter() {
        let mut kept = Vec::with_capacity(destinations.len());
        for &to in destinations {
            if !leaves_king_attacked(board, color, from, to)? {
                kept.push(to);
            }
        }
        legal.insert(from, kept);
    }

    Ok(legal)
}

/// Generates all legal moves for `color` on `board`.
///
/// # Example
/// ```
/// # use newt::{legal_moves, Board, Color};
/// let moves = legal_moves(&Board::default(), Color::White).unwrap();
/// assert_eq!(moves.count(), 20);
/// ```
pub fn legal_moves(board: &Board, color: Color) -> Result<MoveMap> {
    filter_legal(board, color, pseudo_legal_moves(board, color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_detection() {
        let board = Board::default();
        assert!(!is_in_check(&board, Color::White).unwrap());
        assert!(!is_in_check(&board, Color::Black).unwrap());

        // Knight check
        let board = Board::from_fen("4k3/8/3N4/8/8/8/8/4K3").unwrap();
        assert!(is_in_check(&board, Color::Black).unwrap());

        // Blocked rook is not a check
        let board = Board::from_fen("4k3/4p3/8/8/8/8/8/4R1K1").unwrap();
        assert!(!is_in_check(&board, Color::Black).unwrap());

        // Pawns only attack diagonally
        let board = Board::from_fen("4k3/8/8/8/8/4p3/4K3/8").unwrap();
        assert!(!is_in_check(&board, Color::White).unwrap());
        let board = Board::from_fen("4k3/8/8/8/8/3p4/4K3/8").unwrap();
        assert!(is_in_check(&board, Color::White).unwrap());
    }

    #[test]
    fn test_missing_king_is_an_error() {
        let board = Board::from_fen("8/8/8/8/8/8/8/4K3").unwrap();
        assert!(is_in_check(&board, Color::Black).is_err());
        assert!(legal_moves(&board, Color::Black).is_err());
    }

    #[test]
    fn test_king_cannot_step_onto_attacked_file() {
        // The White King's only candidate is onto the d-file, which the Rook covers
        let board = Board::from_fen("3r3k/8/8/8/8/8/4PP2/4KB2").unwrap();
        let candidates = pseudo_legal_moves(&board, Color::White);
        assert!(candidates.contains(Square::E1, Square::D1));
        assert!(candidates.contains(Square::E1, Square::D2));

        let legal = legal_moves(&board, Color::White).unwrap();
        assert!(legal.get(Square::E1).is_empty());
        assert!(legal.contains_key(Square::E1));
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let board = Board::from_fen("4r2k/8/8/8/8/8/4N3/4K3").unwrap();
        assert!(leaves_king_attacked(&board, Color::White, Square::E2, Square::C3).unwrap());

        let legal = legal_moves(&board, Color::White).unwrap();
        assert!(legal.get(Square::E2).is_empty());
        assert!(legal.count() > 0);
    }

    #[test]
    fn test_check_must_be_answered() {
        // Only moves that get out of the Rook's check survive
        let board = Board::from_fen("7k/8/8/8/8/8/8/r3K3").unwrap();
        let legal = legal_moves(&board, Color::White).unwrap();
        let mut escapes = legal.get(Square::E1).to_vec();
        escapes.sort();
        assert_eq!(escapes, vec![Square::D2, Square::E2, Square::F2]);
    }

    #[test]
    fn test_king_may_capture_undefended_rook() {
        let board = Board::from_fen("7k/8/8/8/8/8/3r4/4K3").unwrap();
        let legal = legal_moves(&board, Color::White).unwrap();
        assert!(legal.contains(Square::E1, Square::D2));
        assert!(!legal.contains(Square::E1, Square::D1));
    }
}
