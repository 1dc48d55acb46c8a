// src/board.rs
use serde::Serialize;

use crate::error::InvariantViolation;
use crate::piece::{Color, PieceId, PieceKind, PieceRegistry, PIECE_COUNT};
use crate::position::{Position, FILES, SQUARES};

/// Back rank from the a-file to the h-file, as (kind, nth piece of that kind).
const BACK_RANK: [(PieceKind, usize); FILES as usize] = [
    (PieceKind::Rook, 0), (PieceKind::Knight, 0), (PieceKind::Bishop, 0), (PieceKind::Queen, 0),
    (PieceKind::King, 0), (PieceKind::Bishop, 1), (PieceKind::Knight, 1), (PieceKind::Rook, 1),
];

/// 8x8 grid of piece ids, indexed by `Position::index()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    squares: Vec<Option<PieceId>>,
}

impl Board {
    pub fn empty() -> Self {
        Board { squares: vec![None; SQUARES] }
    }

    /// Officers on the back ranks, pawns in front of them, empty middle.
    pub fn standard(registry: &PieceRegistry) -> Self {
        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            for (file, &(kind, nth)) in BACK_RANK.iter().enumerate() {
                let piece = registry.find(color, kind, nth).expect("standard registry has a full roster");
                board.place(square(file as u8, color.home_rank()), piece.id);
            }
            for file in 0..FILES {
                let pawn = registry.find(color, PieceKind::Pawn, file as usize).expect("standard registry has 8 pawns");
                board.place(square(file, color.pawn_rank()), pawn.id);
            }
        }
        board
    }

    pub fn get(&self, pos: Position) -> Option<PieceId> {
        self.squares[pos.index()]
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Puts `id` on `pos`, returning whatever was there.
    pub fn place(&mut self, pos: Position, id: PieceId) -> Option<PieceId> {
        self.squares[pos.index()].replace(id)
    }

    pub fn clear(&mut self, pos: Position) -> Option<PieceId> {
        self.squares[pos.index()].take()
    }

    /// True when every square strictly between `from` and `to` is empty.
    pub fn path_clear(&self, from: Position, to: Position) -> bool {
        from.between(to).all(|pos| self.is_empty(pos))
    }

    /// Finds the square currently holding `id`.
    pub fn locate(&self, id: PieceId) -> Option<Position> {
        self.squares.iter().position(|&sq| sq == Some(id)).and_then(Position::from_index)
    }

    /// Occupied squares in index order (a8, b8, ... h1).
    pub fn occupied(&self) -> impl Iterator<Item = (Position, PieceId)> + '_ {
        self.squares.iter().enumerate().filter_map(|(index, sq)| {
            sq.and_then(|id| Position::from_index(index).map(|pos| (pos, id)))
        })
    }

    /// Checks that no piece id appears on two squares.
    pub fn check_consistency(&self) -> Result<(), InvariantViolation> {
        let mut seen = [false; PIECE_COUNT];
        for (pos, id) in self.occupied() {
            let slot = id.get() as usize - 1;
            if seen[slot] {
                return Err(InvariantViolation::DuplicateId { id, square: pos });
            }
            seen[slot] = true;
        }
        Ok(())
    }
}

fn square(file: u8, rank: u8) -> Position {
    Position::new(file, rank).expect("back rank and pawn rank are on the board")
}
