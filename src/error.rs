// src/error.rs
//! Error types for the rules engine and its I/O collaborators.
//!
//! `Rejection` is the ordinary, user-facing answer to an illegal move request.
//! `InvariantViolation` means the engine's own state is inconsistent and the
//! game cannot continue. `try_move` folds both into `MoveError`.

use std::fmt;
use std::io;
use thiserror::Error;

use crate::piece::PieceId;
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide { Kingside, Queenside }

impl fmt::Display for CastleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { CastleSide::Kingside => write!(f, "kingside"), CastleSide::Queenside => write!(f, "queenside") }
    }
}

// --- Move Rejections ---

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("The given {0}-position is invalid.")]
    InvalidPosition(&'static str),
    #[error("There is no piece at from-position.")]
    EmptyOrigin,
    #[error("It is the other player's turn.")]
    WrongTurn,
    #[error("The given from- and to-positions are equal.")]
    SameSquare,
    #[error("There is another piece belonging to the current player on the destination square.")]
    OwnPieceAtDestination,
    #[error(transparent)]
    Geometry(#[from] GeometryViolation),
    #[error(transparent)]
    PathBlocked(#[from] BlockedPath),
    #[error(transparent)]
    Pawn(#[from] PawnViolation),
    #[error(transparent)]
    Castling(#[from] CastlingViolation),
    #[error("Not implemented: {0}.")]
    NotImplemented(&'static str),
}

/// The piece cannot move in this shape at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryViolation {
    #[error("A knight cannot move this way.")]
    Knight,
    #[error("A bishop can move diagonally, only.")]
    Bishop,
    #[error("A rook can either move on a rank or a file, not both.")]
    Rook,
    /// Covers both wrong shape and blocked path; see `validate::queen`.
    #[error("Queen cannot move this way or is blocked by a piece in the way.")]
    Queen,
    #[error("A king can move at most one rank per turn.")]
    KingRanks,
    #[error("A king can move at most two files per turn.")]
    KingFiles,
    #[error("A king can never move two files and rank(-s) at once.")]
    KingDiagonalCastle,
}

/// A sliding piece has another piece strictly between origin and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockedPath {
    #[error("There is at least one piece in the bishop's path.")]
    Bishop,
    #[error("There is at least one piece blocking the rook's path on its rank.")]
    RookOnRank,
    #[error("There is at least one piece blocking the rook's path on its file.")]
    RookOnFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PawnViolation {
    #[error("Pawns cannot move to the sides.")]
    Sideways,
    #[error("Pawns cannot move backwards.")]
    Backwards,
    #[error("Pawns can move at most two squares forward.")]
    TooFar,
    #[error("Pawns cannot move two squares forward while also moving to the side.")]
    DoubleStepSideways,
    #[error("Pawns can move two forward squares at once for their first move, only.")]
    DoubleStepNotFromHome,
    #[error("A pawn cannot move two squares in straight forward direction, if there is another piece in-between.")]
    DoubleStepBlocked,
    #[error("A pawn cannot catch while moving two squares in straight forward direction.")]
    DoubleStepCapture,
    #[error("A pawn can move at most one square forward and to the side at once.")]
    TooFarSideways,
    #[error("A pawn cannot move one square diagonally as initial move.")]
    DiagonalWithoutHistory,
    #[error("A pawn can at most move one square diagonally after an opponent's pawn's move.")]
    DiagonalNotAfterPawn,
    #[error("Not an \"en passant\" move.")]
    NotEnPassant,
    #[error("A pawn cannot catch while moving one square in straight forward direction.")]
    StraightCapture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CastlingViolation {
    #[error("A king can move two files at most on the start row.")]
    NotOnHomeRank,
    #[error("This is not the king's first move, castling not possible.")]
    KingAlreadyMoved,
    #[error("Rook missing for {0} castling.")]
    RookMissing(CastleSide),
    #[error("The piece at {0} rook castling square is not a rook.")]
    NotARook(CastleSide),
    #[error("There is an opponent's rook at {0} castling square.")]
    OpponentRook(CastleSide),
    #[error("This rook was already moved, castling not possible.")]
    RookAlreadyMoved,
    #[error("Square of file {file} is not empty, {side} castling not possible.")]
    SquareOccupied { side: CastleSide, file: char },
}

// --- Invariant Violations ---

/// Engine state that must never occur. Not a user mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("Attempt to capture the king on {0}.")]
    KingCapture(Position),
    #[error("Piece {id} appears more than once on the board (again at {square}).")]
    DuplicateId { id: PieceId, square: Position },
    #[error("Move log says piece {id} stands on {square}, but the board disagrees.")]
    LogBoardMismatch { id: PieceId, square: Position },
}

/// Outcome of a failed `Session::try_move`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("Internal engine error: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl MoveError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self { MoveError::Rejected(r) => Some(r), MoveError::Invariant(_) => None }
    }
}

// --- Parsing, Saving and Configuration ---

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePositionError {
    #[error("Position must be two characters long (file and rank): '{0}'.")]
    Length(String),
    #[error("Position must begin with a letter (the file) between a and h, got '{0}'.")]
    File(char),
    #[error("Second character of position must be a number (the rank) between 1 and 8, got '{0}'.")]
    Rank(char),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error with file '{0}': {1}")]
    Io(String, #[source] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{0}': {1}")]
    Io(String, #[source] io::Error),
    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_rejections_show_their_own_message() {
        let r: Rejection = PawnViolation::Backwards.into();
        assert_eq!(r.to_string(), "Pawns cannot move backwards.");
        let r: Rejection = CastlingViolation::SquareOccupied { side: CastleSide::Queenside, file: 'B' }.into();
        assert_eq!(r.to_string(), "Square of file B is not empty, queenside castling not possible.");
        let r: Rejection = CastlingViolation::RookMissing(CastleSide::Kingside).into();
        assert_eq!(r.to_string(), "Rook missing for kingside castling.");
    }

    #[test]
    fn move_error_keeps_rejections_transparent() {
        let e: MoveError = Rejection::WrongTurn.into();
        assert_eq!(e.to_string(), "It is the other player's turn.");
        assert_eq!(e.rejection(), Some(&Rejection::WrongTurn));

        let e: MoveError = InvariantViolation::KingCapture(Position::from_chars('e', '8')).into();
        assert!(e.to_string().starts_with("Internal engine error"));
        assert!(e.rejection().is_none());
    }
}
