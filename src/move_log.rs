// src/move_log.rs
use serde::Serialize;
use std::fmt;

use crate::piece::{Piece, PieceId, PIECE_COUNT};
use crate::position::Position;

// --- Move Representation ---

/// One applied move. `piece` is a copy taken before the move, so a later type
/// change of the live piece (promotion) does not rewrite history.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct LoggedMove {
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
}

impl LoggedMove {
    /// True for a two-square straight pawn push.
    pub fn is_double_step(&self) -> bool {
        let (df, dr) = self.from.delta(self.to);
        df == 0 && dr.abs() == 2
    }
}

impl fmt::Display for LoggedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.piece, self.from, self.to)
    }
}

// --- Move Log ---

/// Chronological, append-only record of the moves of one game.
///
/// Castling and first-move rights are derived from here instead of being
/// tracked as flags, so `last_by_piece` keeps the newest entry index of each
/// piece to make those lookups constant time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveLog {
    entries: Vec<LoggedMove>,
    #[serde(skip)]
    last_by_piece: [Option<usize>; PIECE_COUNT],
}

impl MoveLog {
    pub fn new() -> Self {
        MoveLog { entries: Vec::new(), last_by_piece: [None; PIECE_COUNT] }
    }

    pub fn push(&mut self, entry: LoggedMove) {
        self.last_by_piece[entry.piece.id.get() as usize - 1] = Some(self.entries.len());
        self.entries.push(entry);
    }

    /// Most recent move of the game, if any.
    pub fn latest(&self) -> Option<&LoggedMove> {
        self.entries.last()
    }

    /// Most recent move made by the piece with the given id.
    pub fn latest_of(&self, id: PieceId) -> Option<&LoggedMove> {
        self.last_by_piece[id.get() as usize - 1].map(|index| &self.entries[index])
    }

    pub fn has_moved(&self, id: PieceId) -> bool {
        self.latest_of(id).is_some()
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, index: usize) -> Option<&LoggedMove> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoggedMove> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_by_piece = [None; PIECE_COUNT];
    }
}

impl Default for MoveLog {
    fn default() -> Self { Self::new() }
}

impl<'a> IntoIterator for &'a MoveLog {
    type Item = &'a LoggedMove;
    type IntoIter = std::slice::Iter<'a, LoggedMove>;

    fn into_iter(self) -> Self::IntoIter { self.entries.iter() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Color, PieceKind, PieceRegistry};

    fn entry(piece: Piece, from: &str, to: &str) -> LoggedMove {
        LoggedMove { piece, from: from.parse().unwrap(), to: to.parse().unwrap() }
    }

    #[test]
    fn latest_and_latest_of_piece() {
        let registry = PieceRegistry::standard();
        let knight = *registry.find(Color::White, PieceKind::Knight, 1).unwrap();
        let pawn = *registry.find(Color::Black, PieceKind::Pawn, 4).unwrap();

        let mut log = MoveLog::new();
        assert!(log.latest().is_none());
        assert!(!log.has_moved(knight.id));

        log.push(entry(knight, "g1", "f3"));
        log.push(entry(pawn, "e7", "e5"));
        log.push(entry(knight, "f3", "e5"));

        assert_eq!(log.len(), 3);
        assert_eq!(log.latest().unwrap().to.to_string(), "e5");
        assert_eq!(log.latest_of(knight.id).unwrap().from.to_string(), "f3");
        assert_eq!(log.latest_of(pawn.id).unwrap().from.to_string(), "e7");
        assert!(log.has_moved(pawn.id));
    }

    #[test]
    fn snapshot_survives_promotion_of_live_piece() {
        let mut registry = PieceRegistry::standard();
        let pawn = *registry.find(Color::White, PieceKind::Pawn, 0).unwrap();
        let mut log = MoveLog::new();
        log.push(entry(*registry.get(pawn.id), "a7", "a8"));
        registry.promote(pawn.id, PieceKind::Queen);
        assert_eq!(log.latest_of(pawn.id).unwrap().piece.kind, PieceKind::Pawn);
        assert_eq!(registry.get(pawn.id).kind, PieceKind::Queen);
    }

    #[test]
    fn clear_forgets_everything() {
        let registry = PieceRegistry::standard();
        let rook = *registry.find(Color::Black, PieceKind::Rook, 0).unwrap();
        let mut log = MoveLog::new();
        log.push(entry(rook, "a8", "a6"));
        log.clear();
        assert!(log.is_empty());
        assert!(!log.has_moved(rook.id));
    }

    #[test]
    fn double_step_detection() {
        let registry = PieceRegistry::standard();
        let pawn = *registry.find(Color::Black, PieceKind::Pawn, 3).unwrap();
        assert!(entry(pawn, "d7", "d5").is_double_step());
        assert!(!entry(pawn, "d7", "d6").is_double_step());
    }
}
