// src/attacks.rs
//! Attack map: which squares a color attacks in the current placement.
//!
//! Kept apart from move legality. A square counts as attacked when a piece
//! could capture there, so squares held by the attacker's own pieces are
//! included (they are defended). Pawns attack only their two forward
//! diagonals; en passant does not show up here.

use lazy_static::lazy_static;

use crate::board::Board;
use crate::piece::{Color, PieceKind, PieceRegistry};
use crate::position::{Position, SQUARES};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_OFFSETS: [(i8, i8); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];
const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

// --- Precomputed Target Tables ---

lazy_static! {
    static ref KNIGHT_TARGETS: Vec<Vec<Position>> = compute_targets(&KNIGHT_OFFSETS);
    static ref KING_TARGETS: Vec<Vec<Position>> = compute_targets(&KING_OFFSETS);
}

fn compute_targets(offsets: &[(i8, i8)]) -> Vec<Vec<Position>> {
    (0..SQUARES)
        .filter_map(Position::from_index)
        .map(|from| offsets.iter().filter_map(|&(df, dr)| from.offset(df, dr)).collect())
        .collect()
}

/// One flag per square, indexed like the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackMap {
    attacker: Color,
    attacked: [bool; SQUARES],
}

impl AttackMap {
    pub fn compute(board: &Board, pieces: &PieceRegistry, attacker: Color) -> Self {
        let mut map = AttackMap { attacker, attacked: [false; SQUARES] };
        for (from, id) in board.occupied() {
            let piece = pieces.get(id);
            if piece.color != attacker {
                continue;
            }
            match piece.kind {
                PieceKind::Knight => map.mark_all(&KNIGHT_TARGETS[from.index()]),
                PieceKind::King => map.mark_all(&KING_TARGETS[from.index()]),
                PieceKind::Pawn => {
                    for df in [-1, 1] {
                        if let Some(to) = from.offset(df, attacker.forward()) {
                            map.mark(to);
                        }
                    }
                }
                PieceKind::Bishop => map.mark_rays(board, from, &DIAGONALS),
                PieceKind::Rook => map.mark_rays(board, from, &ORTHOGONALS),
                PieceKind::Queen => {
                    map.mark_rays(board, from, &DIAGONALS);
                    map.mark_rays(board, from, &ORTHOGONALS);
                }
            }
        }
        map
    }

    pub fn attacker(&self) -> Color { self.attacker }

    pub fn is_attacked(&self, pos: Position) -> bool {
        self.attacked[pos.index()]
    }

    pub fn count(&self) -> usize {
        self.attacked.iter().filter(|&&a| a).count()
    }

    pub fn squares(&self) -> impl Iterator<Item = Position> + '_ {
        self.attacked
            .iter()
            .enumerate()
            .filter_map(|(index, &attacked)| if attacked { Position::from_index(index) } else { None })
    }

    fn mark(&mut self, pos: Position) {
        self.attacked[pos.index()] = true;
    }

    fn mark_all(&mut self, targets: &[Position]) {
        for &to in targets {
            self.mark(to);
        }
    }

    /// Walks each direction until the edge or the first occupied square, which is included.
    fn mark_rays(&mut self, board: &Board, from: Position, directions: &[(i8, i8)]) {
        for &(df, dr) in directions {
            let mut cursor = from;
            while let Some(next) = cursor.offset(df, dr) {
                self.mark(next);
                if !board.is_empty(next) {
                    break;
                }
                cursor = next;
            }
        }
    }
}

/// True when `color`'s king stands on a square the opponent attacks.
/// A board without that king answers `false`.
pub fn king_attacked(board: &Board, pieces: &PieceRegistry, color: Color) -> bool {
    let king = match pieces.find(color, PieceKind::King, 0) {
        Some(king) => king,
        None => return false,
    };
    match board.locate(king.id) {
        Some(square) => AttackMap::compute(board, pieces, color.opponent()).is_attacked(square),
        None => false,
    }
}
