// src/session.rs
use log::{debug, info};
use serde::Serialize;
use std::fs;

use crate::apply::apply;
use crate::attacks::{self, AttackMap};
use crate::board::Board;
use crate::error::{MoveError, Rejection, SaveError};
use crate::move_log::{LoggedMove, MoveLog};
use crate::piece::{Color, Piece, PieceRegistry};
use crate::position::Position;
use crate::validate::{CastlingAttackRule, SideEffect, Validator};

// --- Game State ---

/// One game: pieces, placement, history and whose turn it is.
///
/// Every independent game is its own `Session`; nothing is shared between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pieces: PieceRegistry,
    board: Board,
    log: MoveLog,
    turn: Color,
    castling_attacks: CastlingAttackRule,
}

/// Read-only view of a session, for rendering and export.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    pub pieces: &'a PieceRegistry,
    pub turn: Color,
    pub log: &'a MoveLog,
}

impl<'a> Snapshot<'a> {
    pub fn piece_at(&self, pos: Position) -> Option<&'a Piece> {
        self.board.get(pos).map(|id| self.pieces.get(id))
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    /// The entry appended to the log.
    pub mv: LoggedMove,
    pub captured: Option<Piece>,
    pub effect: SideEffect,
}

impl Session {
    /// Standard starting position, White to move.
    pub fn new() -> Self {
        let pieces = PieceRegistry::standard();
        let board = Board::standard(&pieces);
        info!("new game session");
        Session { pieces, board, log: MoveLog::new(), turn: Color::White, castling_attacks: CastlingAttackRule::default() }
    }

    pub fn with_castling_attack_rule(mut self, rule: CastlingAttackRule) -> Self {
        self.castling_attacks = rule;
        self
    }

    /// Back to the starting position with an empty log. The castling rule is kept.
    pub fn reset(&mut self) {
        self.pieces = PieceRegistry::standard();
        self.board = Board::standard(&self.pieces);
        self.log.clear();
        self.turn = Color::White;
        info!("game session reset");
    }

    /// Ends the session. Taking `self` by value rules out any later use.
    pub fn destroy(self) {
        info!("game session closed after {} moves", self.log.len());
    }

    /// Validates and, if legal, performs a move for the side to move.
    ///
    /// On any error the session is left exactly as it was. A rejection is an
    /// ordinary answer; `MoveError::Invariant` means the session can no
    /// longer be trusted.
    pub fn try_move(&mut self, from: Position, to: Position) -> Result<AppliedMove, MoveError> {
        if !from.is_valid() {
            return Err(Rejection::InvalidPosition("from").into());
        }
        if !to.is_valid() {
            return Err(Rejection::InvalidPosition("to").into());
        }
        let id = self.board.get(from).ok_or(Rejection::EmptyOrigin)?;
        let piece = *self.pieces.get(id);

        let plan = Validator::new(&self.board, &self.pieces, &self.log, self.turn)
            .with_castling_attack_rule(self.castling_attacks)
            .validate(&piece, from, to)?;

        let captured = apply(&mut self.board, &plan).map(|id| *self.pieces.get(id));
        debug_assert!(self.board.check_consistency().is_ok());

        let mv = LoggedMove { piece, from, to };
        self.log.push(mv);
        self.turn = self.turn.opponent();

        match captured {
            Some(victim) => debug!("{} {} to {} takes {}", piece.color, from, to, victim),
            None => debug!("{} {} to {}", piece.color, from, to),
        }
        Ok(AppliedMove { mv, captured, effect: plan.effect })
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { board: &self.board, pieces: &self.pieces, turn: self.turn, log: &self.log }
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.board.get(pos).map(|id| self.pieces.get(id))
    }

    pub fn turn(&self) -> Color { self.turn }

    pub fn log(&self) -> &MoveLog { &self.log }

    pub fn pieces(&self) -> &PieceRegistry { &self.pieces }

    pub fn board(&self) -> &Board { &self.board }

    pub fn attacked_squares(&self, attacker: Color) -> AttackMap {
        AttackMap::compute(&self.board, &self.pieces, attacker)
    }

    pub fn is_king_attacked(&self, color: Color) -> bool {
        attacks::king_attacked(&self.board, &self.pieces, color)
    }

    // --- Export ---

    /// Writes the move log as pretty-printed JSON.
    pub fn save_log_to_file(&self, filename: &str) -> Result<(), SaveError> {
        let json_data = serde_json::to_string_pretty(&self.log)?;

        fs::write(filename, json_data)
            .map_err(|e| SaveError::Io(filename.to_string(), e))?;

        info!("move log saved to '{}'", filename);
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PawnViolation;
    use crate::piece::PieceKind;

    fn at(s: &str) -> Position { s.parse().unwrap() }

    #[test]
    fn invalid_and_empty_origin_are_rejected_first() {
        let mut session = Session::new();
        let err = session.try_move(Position::INVALID, at("e4")).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::InvalidPosition("from")));
        let err = session.try_move(at("e2"), Position::INVALID).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::InvalidPosition("to")));
        let err = session.try_move(at("e4"), at("e5")).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::EmptyOrigin));
        assert_eq!(session, Session::new());
    }

    #[test]
    fn accepted_move_is_logged_and_flips_turn() {
        let mut session = Session::new();
        let applied = session.try_move(at("g1"), at("f3")).unwrap();
        assert_eq!(applied.mv.piece.kind, PieceKind::Knight);
        assert_eq!(applied.captured, None);
        assert_eq!(applied.effect, SideEffect::None);
        assert_eq!(session.turn(), Color::Black);
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.piece_at(at("f3")).map(|p| p.kind), Some(PieceKind::Knight));
        assert!(session.piece_at(at("g1")).is_none());
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut session = Session::new();
        session.try_move(at("e2"), at("e4")).unwrap();
        let before = session.clone();
        let err = session.try_move(at("e7"), at("e4")).unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::from(PawnViolation::TooFar)));
        assert_eq!(session, before);
    }

    #[test]
    fn capture_reports_the_victim() {
        let mut session = Session::new();
        for (from, to) in [("e2", "e4"), ("d7", "d5")] {
            session.try_move(at(from), at(to)).unwrap();
        }
        let applied = session.try_move(at("e4"), at("d5")).unwrap();
        let victim = applied.captured.unwrap();
        assert_eq!((victim.color, victim.kind), (Color::Black, PieceKind::Pawn));
        assert_eq!(session.board().locate(victim.id), None);
    }

    #[test]
    fn reset_restores_the_start() {
        let mut session = Session::new().with_castling_attack_rule(CastlingAttackRule::Refuse);
        session.try_move(at("b1"), at("c3")).unwrap();
        session.reset();
        assert_eq!(session, Session::new().with_castling_attack_rule(CastlingAttackRule::Refuse));
        session.destroy();
    }

    #[test]
    fn snapshot_mirrors_the_session() {
        let mut session = Session::new();
        session.try_move(at("a2"), at("a3")).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.turn, Color::Black);
        assert_eq!(snapshot.log.len(), 1);
        assert_eq!(snapshot.piece_at(at("a3")).map(|p| p.color), Some(Color::White));
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["turn"], "Black");
    }

    #[test]
    fn king_attack_queries() {
        let mut session = Session::new();
        assert_eq!(session.attacked_squares(Color::White).count(), 22);
        // Fool's mate placement: f3, e5, g4, Qh4.
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            session.try_move(at(from), at(to)).unwrap();
        }
        assert!(session.is_king_attacked(Color::White));
        assert!(!session.is_king_attacked(Color::Black));
    }
}
