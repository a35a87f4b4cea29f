/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, MoveMap, Piece, PieceKind, Square};

/// Row/column deltas of a Knight's jumps.
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Row/column deltas of the four diagonal directions.
const BISHOP_DELTAS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Row/column deltas of the four orthogonal directions.
const ROOK_DELTAS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Row/column deltas of all eight directions. A King steps once along each of these.
const QUEEN_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Computes every square the piece on `square` could move to, judged by geometry, blocking, and
/// capture rules alone.
///
/// These are *candidate* moves: whether a move would leave the mover's own King in check is not
/// considered here (see [`crate::legal_moves`]). Returns an empty list if `square` is empty.
///
/// The order of the returned squares is not significant.
///
/// # Example
/// ```
/// # use newt::{candidate_moves, Board, Square};
/// let board = Board::from_fen("8/8/8/8/4N3/8/8/8").unwrap();
/// let mut moves = candidate_moves(&board, Square::E4);
/// moves.sort();
/// let indices = moves.iter().map(|sq| sq.index()).collect::<Vec<_>>();
/// assert_eq!(indices, [19, 21, 26, 30, 42, 46, 51, 53]);
/// ```
pub fn candidate_moves(board: &Board, square: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(square) else {
        return Vec::new();
    };
    let color = piece.color();

    match piece.kind() {
        PieceKind::Pawn => pawn_moves(board, square, piece),
        PieceKind::Knight => step_moves(board, square, color, &KNIGHT_DELTAS),
        PieceKind::Bishop => ray_moves(board, square, color, &BISHOP_DELTAS),
        PieceKind::Rook => ray_moves(board, square, color, &ROOK_DELTAS),
        PieceKind::Queen => ray_moves(board, square, color, &QUEEN_DELTAS),
        PieceKind::King => step_moves(board, square, color, &QUEEN_DELTAS),
    }
}

/// Computes candidate moves for every piece of `color`.
///
/// Every piece of `color` gets an entry, even if it has no moves.
pub fn pseudo_legal_moves(board: &Board, color: Color) -> MoveMap {
    board
        .pieces_of(color)
        .map(|(square, _)| (square, candidate_moves(board, square)))
        .collect()
}

/// Returns `true` if a piece of `color` may land on `square`: it is empty or holds an enemy.
#[inline(always)]
fn is_enterable(board: &Board, square: Square, color: Color) -> bool {
    board.color_at(square) != Some(color)
}

/// Pushes and diagonal captures of a Pawn. There is no en passant.
fn pawn_moves(board: &Board, square: Square, pawn: Piece) -> Vec<Square> {
    let color = pawn.color();
    let forward = color.pawn_direction();
    let mut moves = Vec::with_capacity(4);

    if let Some(one) = square.offset(forward, 0).filter(|&sq| board.is_empty(sq)) {
        moves.push(one);

        // Double pushes require both squares to be empty, and an unmoved Pawn
        if !pawn.has_moved() {
            if let Some(two) = square.offset(forward * 2, 0).filter(|&sq| board.is_empty(sq)) {
                moves.push(two);
            }
        }
    }

    // Diagonals are only available as captures
    for side in [-1, 1] {
        if let Some(diagonal) = square.offset(forward, side) {
            if board.color_at(diagonal) == Some(color.opponent()) {
                moves.push(diagonal);
            }
        }
    }

    moves
}

/// Single steps along each of `deltas`, for Knights and Kings.
fn step_moves(board: &Board, square: Square, color: Color, deltas: &[(i8, i8)]) -> Vec<Square> {
    deltas
        .iter()
        .filter_map(|&(dr, dc)| square.offset(dr, dc))
        .filter(|&to| is_enterable(board, to, color))
        .collect()
}

/// Projects rays along each of `deltas`, for sliding pieces.
///
/// A ray continues over empty squares, includes and stops on an enemy, and stops before a friendly
/// piece or the edge of the board.
fn ray_moves(board: &Board, square: Square, color: Color, deltas: &[(i8, i8)]) -> Vec<Square> {
    let mut moves = Vec::with_capacity(14);

    for &(dr, dc) in deltas {
        let mut current = square;
        while let Some(to) = current.offset(dr, dc) {
            match board.color_at(to) {
                None => moves.push(to),
                Some(occupant) => {
                    if occupant != color {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to;
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut moves: Vec<Square>) -> Vec<Square> {
        moves.sort();
        moves
    }

    #[test]
    fn test_empty_square_has_no_moves() {
        let board = Board::default();
        assert!(candidate_moves(&board, Square::E4).is_empty());
    }

    #[test]
    fn test_pawn_pushes() {
        let board = Board::from_fen("8/8/3P4/8/8/8/8/8").unwrap();
        // Placed off its home row, so it counts as moved
        assert_eq!(candidate_moves(&board, Square::D6), vec![Square::D7]);

        let board = Board::default();
        assert_eq!(
            sorted(candidate_moves(&board, Square::E2)),
            vec![Square::E4, Square::E3]
        );
        assert_eq!(
            sorted(candidate_moves(&board, Square::E7)),
            vec![Square::E6, Square::E5]
        );
    }

    #[test]
    fn test_pawn_blocked() {
        // Blocked directly in front: no pushes at all
        let board = Board::from_fen("4k3/8/8/8/8/4n3/4P3/4K3").unwrap();
        assert!(candidate_moves(&board, Square::E2).is_empty());

        // Blocked two squares ahead: only the single push
        let board = Board::from_fen("4k3/8/8/8/4n3/8/4P3/4K3").unwrap();
        assert_eq!(candidate_moves(&board, Square::E2), vec![Square::E3]);
    }

    #[test]
    fn test_pawn_captures_only_enemies() {
        let board = Board::from_fen("4k3/8/8/8/8/3n1N2/4P3/4K3").unwrap();
        assert_eq!(
            sorted(candidate_moves(&board, Square::E2)),
            vec![Square::E4, Square::D3, Square::E3]
        );
    }

    #[test]
    fn test_pawn_on_edge_does_not_wrap() {
        // An h-file pawn must not capture around the edge onto the a-file
        let board = Board::from_fen("4k3/8/8/8/8/8/n6P/4K3").unwrap();
        assert_eq!(
            sorted(candidate_moves(&board, Square::H2)),
            vec![Square::H4, Square::H3]
        );
    }

    #[test]
    fn test_black_pawn_direction() {
        let board = Board::from_fen("4k3/3p4/2N1N3/8/8/8/8/4K3").unwrap();
        assert_eq!(
            sorted(candidate_moves(&board, Square::D7)),
            vec![Square::C6, Square::D6, Square::E6, Square::D5]
        );
    }

    #[test]
    fn test_knight_in_corner() {
        let board = Board::from_fen("N7/8/8/8/8/8/8/8").unwrap();
        assert_eq!(
            sorted(candidate_moves(&board, Square::A8)),
            vec![Square::C7, Square::B6]
        );
    }

    #[test]
    fn test_knight_blocked_by_own_pieces() {
        let board = Board::default();
        assert_eq!(
            sorted(candidate_moves(&board, Square::B1)),
            vec![Square::A3, Square::C3]
        );
    }

    #[test]
    fn test_rook_rays() {
        let board = Board::from_fen("8/8/8/3p4/8/8/3R1P2/8").unwrap();
        let moves = sorted(candidate_moves(&board, Square::D2));
        assert_eq!(
            moves,
            vec![
                Square::D5, // capture, and stop
                Square::D4,
                Square::D3,
                Square::A2,
                Square::B2,
                Square::C2,
                Square::E2, // stopped by own pawn on f2
                Square::D1,
            ]
        );
    }

    #[test]
    fn test_bishop_rays() {
        let board = Board::from_fen("8/8/8/8/8/2p5/3B4/4P3").unwrap();
        let moves = sorted(candidate_moves(&board, Square::D2));
        assert_eq!(
            moves,
            vec![
                Square::H6,
                Square::G5,
                Square::F4,
                Square::C3,
                Square::E3,
                Square::C1,
            ]
        );
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        let fen = "8/1p6/8/8/4Q3/8/6P1/8";
        let board = Board::from_fen(fen).unwrap();
        let queen = sorted(candidate_moves(&board, Square::E4));

        let mut expected = Vec::new();
        for kind in ['R', 'B'] {
            let fen = fen.replace('Q', &kind.to_string());
            let board = Board::from_fen(&fen).unwrap();
            expected.extend(candidate_moves(&board, Square::E4));
        }

        assert_eq!(queen, sorted(expected));
        assert_eq!(queen.len(), 24);
    }

    #[test]
    fn test_king_steps() {
        let board = Board::from_fen("8/8/8/8/8/8/3p4/4K3").unwrap();
        assert_eq!(
            sorted(candidate_moves(&board, Square::E1)),
            vec![Square::D2, Square::E2, Square::F2, Square::D1, Square::F1]
        );
    }

    #[test]
    fn test_pseudo_legal_moves_has_entry_per_piece() {
        let board = Board::default();
        let moves = pseudo_legal_moves(&board, Color::White);
        assert_eq!(moves.len(), 16);
        assert_eq!(moves.count(), 20);
        assert!(moves.get(Square::A1).is_empty());
        assert!(moves.contains_key(Square::A1));
    }
}
