// src/piece.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::position::{RANK_1, RANK_2, RANK_7, RANK_8};

// --- Enums and Basic Structs ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    /// Rank-index step of a forward pawn move. White walks toward rank index 0.
    pub fn forward(&self) -> i8 {
        match self { Color::White => -1, Color::Black => 1 }
    }

    /// Back rank: where the king and rooks start.
    pub fn home_rank(&self) -> u8 {
        match self { Color::White => RANK_1, Color::Black => RANK_8 }
    }

    pub fn pawn_rank(&self) -> u8 {
        match self { Color::White => RANK_2, Color::Black => RANK_7 }
    }

    fn index(&self) -> usize {
        match self { Color::White => 0, Color::Black => 1 }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Color::White => write!(f, "White"), Color::Black => write!(f, "Black") }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceKind { King, Pawn, Knight, Bishop, Rook, Queen }

impl PieceKind {
    pub fn symbol(&self) -> char {
        match self {
            PieceKind::King => 'k', PieceKind::Pawn => 'p', PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b', PieceKind::Rook => 'r', PieceKind::Queen => 'q',
        }
    }
}

// --- Piece Identity ---

/// Stable handle of one of the 32 pieces. Never zero; the board uses `None` for empty.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PieceId(u8);

impl PieceId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = PIECE_COUNT as u8;

    pub fn new(raw: u8) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&raw) { Some(PieceId(raw)) } else { None }
    }

    pub fn get(&self) -> u8 { self.0 }

    fn slot(&self) -> usize { self.0 as usize - 1 }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub kind: PieceKind,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.symbol();
        let symbol = match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        };
        write!(f, "{}", symbol)
    }
}

// --- Piece Registry ---

pub const PIECE_COUNT: usize = 32;
const PIECES_PER_COLOR: usize = PIECE_COUNT / 2;

/// Per-color id order: king, 8 pawns, 2 knights, 2 bishops, 2 rooks, queen.
const ROSTER: [PieceKind; PIECES_PER_COLOR] = [
    PieceKind::King,
    PieceKind::Pawn, PieceKind::Pawn, PieceKind::Pawn, PieceKind::Pawn,
    PieceKind::Pawn, PieceKind::Pawn, PieceKind::Pawn, PieceKind::Pawn,
    PieceKind::Knight, PieceKind::Knight,
    PieceKind::Bishop, PieceKind::Bishop,
    PieceKind::Rook, PieceKind::Rook,
    PieceKind::Queen,
];

/// The fixed set of 32 pieces of one game, indexed by `id - 1`.
///
/// Captured pieces stay here; whether a piece is in play is the board's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceRegistry {
    pieces: Vec<Piece>,
}

impl PieceRegistry {
    /// White gets ids 1..=16, black 17..=32, each in roster order.
    pub fn standard() -> Self {
        let pieces = [Color::White, Color::Black]
            .iter()
            .flat_map(|&color| {
                ROSTER.iter().enumerate().map(move |(i, &kind)| {
                    let raw = (color.index() * PIECES_PER_COLOR + i + 1) as u8;
                    Piece { id: PieceId(raw), color, kind }
                })
            })
            .collect::<Vec<_>>();
        debug_assert_eq!(pieces.len(), PIECE_COUNT);
        PieceRegistry { pieces }
    }

    pub fn get(&self, id: PieceId) -> &Piece {
        &self.pieces[id.slot()]
    }

    /// Returns the `nth` (0-based) piece of the given color and kind, in id order.
    pub fn find(&self, color: Color, kind: PieceKind, nth: usize) -> Option<&Piece> {
        self.pieces.iter().filter(|p| p.color == color && p.kind == kind).nth(nth)
    }

    /// Changes the type of a piece while its id and color stay the same.
    /// Move log entries keep their own snapshot and are unaffected.
    pub fn promote(&mut self, id: PieceId, kind: PieceKind) {
        self.pieces[id.slot()].kind = kind;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }
}

impl Default for PieceRegistry {
    fn default() -> Self { Self::standard() }
}
