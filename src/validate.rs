// src/validate.rs
//! Move legality.
//!
//! `Validator` borrows the session state for the duration of one check and
//! answers with a `MovePlan`: the move plus the side effect the applier has to
//! carry out (capture, castling rook relocation, en passant removal). It never
//! mutates anything.
//!
//! Check and checkmate are not part of legality here. The attack map in
//! `attacks` is the place for that.

use log::trace;

use crate::board::Board;
use crate::error::{
    BlockedPath, CastleSide, CastlingViolation, GeometryViolation, InvariantViolation, MoveError, PawnViolation,
    Rejection,
};
use crate::move_log::MoveLog;
use crate::piece::{Color, Piece, PieceId, PieceKind, PieceRegistry};
use crate::position::{Position, FILE_A, FILE_D, FILE_F, FILE_H};

/// What to do about the "king must not pass through an attacked square"
/// castling rule, which this engine does not evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CastlingAttackRule {
    /// Castle without looking at attacked squares.
    #[default]
    Skip,
    /// Refuse every castling attempt as not implemented.
    Refuse,
}

/// Secondary effect of a legal move, for the applier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    None,
    /// Ordinary capture on the destination square.
    Capture(PieceId),
    Castle { side: CastleSide, rook: PieceId, rook_from: Position, rook_to: Position },
    /// The captured pawn stands on `square`, not on the destination.
    EnPassant { captured: PieceId, square: Position },
}

/// A move that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
    pub effect: SideEffect,
}

type Verdict = Result<SideEffect, MoveError>;

fn reject<T>(reason: impl Into<Rejection>) -> Result<T, MoveError> {
    let reason = reason.into();
    trace!("move rejected: {}", reason);
    Err(MoveError::Rejected(reason))
}

pub struct Validator<'a> {
    board: &'a Board,
    pieces: &'a PieceRegistry,
    log: &'a MoveLog,
    turn: Color,
    castling_attacks: CastlingAttackRule,
}

impl<'a> Validator<'a> {
    pub fn new(board: &'a Board, pieces: &'a PieceRegistry, log: &'a MoveLog, turn: Color) -> Self {
        Validator { board, pieces, log, turn, castling_attacks: CastlingAttackRule::default() }
    }

    pub fn with_castling_attack_rule(mut self, rule: CastlingAttackRule) -> Self {
        self.castling_attacks = rule;
        self
    }

    /// Decides whether `piece` may move from `from` to `to`.
    ///
    /// `from` must hold `piece` and both positions must be valid.
    pub fn validate(&self, piece: &Piece, from: Position, to: Position) -> Result<MovePlan, MoveError> {
        debug_assert!(from.is_valid() && to.is_valid());
        debug_assert_eq!(self.board.get(from), Some(piece.id));

        if piece.color != self.turn {
            return reject(Rejection::WrongTurn);
        }
        if from == to {
            return reject(Rejection::SameSquare);
        }

        let target = self.board.get(to).map(|id| *self.pieces.get(id));
        if let Some(target) = target {
            if target.color == self.turn {
                return reject(Rejection::OwnPieceAtDestination);
            }
            if target.kind == PieceKind::King {
                return Err(InvariantViolation::KingCapture(to).into());
            }
        }

        let effect = match piece.kind {
            PieceKind::King => self.king(piece, from, to, target)?,
            PieceKind::Pawn => self.pawn(piece, from, to, target)?,
            PieceKind::Knight => self.knight(from, to, target)?,
            PieceKind::Bishop => self.bishop(from, to, target)?,
            PieceKind::Rook => self.rook(from, to, target)?,
            PieceKind::Queen => self.queen(from, to, target)?,
        };

        // TODO: reject moves that leave the mover's king attacked once
        // `attacks::king_attacked` is wired in as a post-move filter.
        Ok(MovePlan { piece: *piece, from, to, effect })
    }

    // --- Jumping and Sliding Pieces ---

    fn knight(&self, from: Position, to: Position, target: Option<Piece>) -> Verdict {
        let (df, dr) = from.delta(to);
        match (df.abs(), dr.abs()) {
            (1, 2) | (2, 1) => Ok(capture_of(target)),
            _ => reject(GeometryViolation::Knight),
        }
    }

    fn bishop(&self, from: Position, to: Position, target: Option<Piece>) -> Verdict {
        let (df, dr) = from.delta(to);
        if df.abs() != dr.abs() {
            return reject(GeometryViolation::Bishop);
        }
        if !self.board.path_clear(from, to) {
            return reject(BlockedPath::Bishop);
        }
        Ok(capture_of(target))
    }

    fn rook(&self, from: Position, to: Position, target: Option<Piece>) -> Verdict {
        let (df, dr) = from.delta(to);
        if dr == 0 {
            if !self.board.path_clear(from, to) {
                return reject(BlockedPath::RookOnRank);
            }
        } else if df != 0 {
            return reject(GeometryViolation::Rook);
        } else if !self.board.path_clear(from, to) {
            return reject(BlockedPath::RookOnFile);
        }
        Ok(capture_of(target))
    }

    /// Rook or bishop movement. Either sub-check's own reason is replaced by a
    /// single combined one.
    fn queen(&self, from: Position, to: Position, target: Option<Piece>) -> Verdict {
        let straight = self.rook(from, to, target);
        if straight.is_ok() {
            return straight;
        }
        self.bishop(from, to, target).or_else(|_| reject(GeometryViolation::Queen))
    }

    // --- King ---

    fn king(&self, piece: &Piece, from: Position, to: Position, target: Option<Piece>) -> Verdict {
        let (df, dr) = from.delta(to);
        if dr.abs() > 1 {
            return reject(GeometryViolation::KingRanks);
        }
        if df.abs() > 2 {
            return reject(GeometryViolation::KingFiles);
        }
        if df.abs() == 2 {
            if dr != 0 {
                return reject(GeometryViolation::KingDiagonalCastle);
            }
            let side = if df > 0 { CastleSide::Kingside } else { CastleSide::Queenside };
            return self.castle(piece, from, side);
        }
        Ok(capture_of(target))
    }

    fn castle(&self, king: &Piece, from: Position, side: CastleSide) -> Verdict {
        if from.rank() != king.color.home_rank() {
            return reject(CastlingViolation::NotOnHomeRank);
        }
        if let Some(last) = self.log.latest_of(king.id) {
            if last.to != from {
                return Err(InvariantViolation::LogBoardMismatch { id: king.id, square: last.to }.into());
            }
            return reject(CastlingViolation::KingAlreadyMoved);
        }

        let (rook_file, rook_to_file) = match side {
            CastleSide::Kingside => (FILE_H, FILE_F),
            CastleSide::Queenside => (FILE_A, FILE_D),
        };
        let rook_from = Position::new(rook_file, from.rank()).expect("corner square is on the board");
        let rook_to = Position::new(rook_to_file, from.rank()).expect("rook destination is on the board");

        let rook = match self.board.get(rook_from) {
            Some(id) => *self.pieces.get(id),
            None => return reject(CastlingViolation::RookMissing(side)),
        };
        if rook.kind != PieceKind::Rook {
            return reject(CastlingViolation::NotARook(side));
        }
        if rook.color != king.color {
            return reject(CastlingViolation::OpponentRook(side));
        }
        // A rook carried along by an earlier castling has no entry of its
        // own, but then the king check above already failed.
        if self.log.has_moved(rook.id) {
            return reject(CastlingViolation::RookAlreadyMoved);
        }

        let mut path: Vec<Position> = from.between(rook_from).collect();
        path.sort_by_key(|pos| pos.file());
        if let Some(blocked) = path.into_iter().find(|&pos| !self.board.is_empty(pos)) {
            return reject(CastlingViolation::SquareOccupied { side, file: blocked.file_char().to_ascii_uppercase() });
        }

        if self.castling_attacks == CastlingAttackRule::Refuse {
            return reject(Rejection::NotImplemented("attacked-square checks for castling"));
        }
        Ok(SideEffect::Castle { side, rook: rook.id, rook_from, rook_to })
    }

    // --- Pawn ---

    fn pawn(&self, piece: &Piece, from: Position, to: Position, target: Option<Piece>) -> Verdict {
        let (df, dr) = from.delta(to);
        let forward = piece.color.forward() * dr;
        let side = df.abs();

        if forward == 0 {
            return reject(PawnViolation::Sideways);
        }
        if forward < 0 {
            return reject(PawnViolation::Backwards);
        }
        if forward > 2 {
            return reject(PawnViolation::TooFar);
        }

        if forward == 2 {
            if side != 0 {
                return reject(PawnViolation::DoubleStepSideways);
            }
            if from.rank() != piece.color.pawn_rank() {
                return reject(PawnViolation::DoubleStepNotFromHome);
            }
            let middle = from.offset(0, piece.color.forward()).expect("square before a pawn on its home rank exists");
            if !self.board.is_empty(middle) {
                return reject(PawnViolation::DoubleStepBlocked);
            }
            if target.is_some() {
                return reject(PawnViolation::DoubleStepCapture);
            }
            return Ok(SideEffect::None);
        }

        if side > 1 {
            return reject(PawnViolation::TooFarSideways);
        }
        if side == 1 {
            return match target {
                Some(target) => Ok(SideEffect::Capture(target.id)),
                None => self.en_passant(piece, from, to),
            };
        }
        if target.is_some() {
            return reject(PawnViolation::StraightCapture);
        }
        Ok(SideEffect::None)
    }

    /// Diagonal pawn step onto an empty square. Only legal right after an
    /// opponent pawn double-stepped past `to` and now stands beside `from`.
    fn en_passant(&self, piece: &Piece, from: Position, to: Position) -> Verdict {
        let latest = match self.log.latest() {
            Some(latest) => latest,
            None => return reject(PawnViolation::DiagonalWithoutHistory),
        };
        debug_assert_ne!(latest.piece.color, piece.color);
        if latest.piece.kind != PieceKind::Pawn {
            return reject(PawnViolation::DiagonalNotAfterPawn);
        }

        let opponent = piece.color.opponent();
        let square = Position::new(to.file(), from.rank()).expect("file and rank come from valid squares");
        let passed = latest.is_double_step() && latest.from.rank() == opponent.pawn_rank() && latest.to == square;
        if !passed {
            return reject(PawnViolation::NotEnPassant);
        }

        let captured = latest.piece.id;
        if self.board.get(square) != Some(captured) {
            return Err(InvariantViolation::LogBoardMismatch { id: captured, square }.into());
        }
        Ok(SideEffect::EnPassant { captured, square })
    }
}

fn capture_of(target: Option<Piece>) -> SideEffect {
    target.map_or(SideEffect::None, |t| SideEffect::Capture(t.id))
}
