use pretty_assertions::assert_eq;

use chess_rules::error::{BlockedPath, CastlingViolation, GeometryViolation, PawnViolation};
use chess_rules::{
    CastlingAttackRule, Color, MoveError, PieceKind, Position, Rejection, Session, SideEffect,
};

fn at(s: &str) -> Position { s.parse().unwrap() }

fn play_all(session: &mut Session, moves: &[(&str, &str)]) {
    for &(from, to) in moves {
        if let Err(e) = session.try_move(at(from), at(to)) {
            panic!("{} to {} failed: {}", from, to, e);
        }
    }
}

fn rejection(result: Result<chess_rules::AppliedMove, MoveError>) -> Rejection {
    match result {
        Err(MoveError::Rejected(r)) => r,
        other => panic!("expected a rejection, got {:?}", other),
    }
}

/// The move must be rejected and leave the session untouched.
fn assert_rejected(session: &mut Session, from: &str, to: &str, expected: Rejection) {
    let before = session.clone();
    assert_eq!(rejection(session.try_move(at(from), at(to))), expected);
    assert_eq!(*session, before);
}

#[test]
fn initial_position() {
    let session = Session::new();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.turn, Color::White);
    assert!(snapshot.log.is_empty());

    let back_rank = [
        PieceKind::Rook, PieceKind::Knight, PieceKind::Bishop, PieceKind::Queen,
        PieceKind::King, PieceKind::Bishop, PieceKind::Knight, PieceKind::Rook,
    ];
    for (file, kind) in ('a'..='h').zip(back_rank) {
        for (rank, color) in [('1', Color::White), ('8', Color::Black)] {
            let piece = session.piece_at(Position::from_chars(file, rank)).unwrap();
            assert_eq!((piece.color, piece.kind), (color, kind));
        }
        for (rank, color) in [('2', Color::White), ('7', Color::Black)] {
            let piece = session.piece_at(Position::from_chars(file, rank)).unwrap();
            assert_eq!((piece.color, piece.kind), (color, PieceKind::Pawn));
        }
        for rank in '3'..='6' {
            assert!(session.piece_at(Position::from_chars(file, rank)).is_none());
        }
    }

    let mut ids: Vec<u8> = session.board().occupied().map(|(_, id)| id.get()).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=32).collect::<Vec<u8>>());
    assert!(session.board().check_consistency().is_ok());
}

#[test]
fn sliding_pieces_are_blocked() {
    let mut session = Session::new();
    assert_rejected(&mut session, "a1", "a4", BlockedPath::RookOnFile.into());
    assert_rejected(&mut session, "c1", "e3", BlockedPath::Bishop.into());
    assert_rejected(&mut session, "d1", "d3", GeometryViolation::Queen.into());

    play_all(&mut session, &[("a2", "a4"), ("h7", "h6"), ("d2", "d3"), ("h6", "h5")]);
    play_all(&mut session, &[("a1", "a3"), ("g7", "g6"), ("c1", "e3"), ("g6", "g5"), ("d1", "d2")]);
    assert_eq!(session.piece_at(at("d2")).map(|p| p.kind), Some(PieceKind::Queen));
}

#[test]
fn knights_jump() {
    let mut session = Session::new();
    assert_rejected(&mut session, "b1", "b3", GeometryViolation::Knight.into());
    play_all(&mut session, &[("b1", "c3"), ("g8", "f6"), ("c3", "d5"), ("f6", "d5")]);
    assert_eq!(session.piece_at(at("d5")).map(|p| p.color), Some(Color::Black));
}

#[test]
fn pawn_double_step_only_from_home() {
    let mut session = Session::new();
    play_all(&mut session, &[("e2", "e4"), ("e7", "e5")]);
    assert_rejected(&mut session, "e4", "e6", PawnViolation::DoubleStepNotFromHome.into());
    assert_rejected(&mut session, "e4", "e7", PawnViolation::TooFar.into());
    play_all(&mut session, &[("d2", "d3"), ("a7", "a6")]);
    assert_rejected(&mut session, "d3", "d5", PawnViolation::DoubleStepNotFromHome.into());
    assert_rejected(&mut session, "e4", "e5", PawnViolation::StraightCapture.into());

    play_all(&mut session, &[("g1", "f3"), ("b8", "c6")]);
    assert_rejected(&mut session, "f2", "f4", PawnViolation::DoubleStepBlocked.into());
}

#[test]
fn en_passant_and_its_expiry() {
    let mut session = Session::new();
    play_all(&mut session, &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")]);

    let applied = session.try_move(at("e5"), at("d6")).unwrap();
    let captured = applied.captured.unwrap();
    assert_eq!((captured.color, captured.kind), (Color::Black, PieceKind::Pawn));
    assert_eq!(applied.effect, SideEffect::EnPassant { captured: captured.id, square: at("d5") });
    assert!(session.piece_at(at("d5")).is_none());
    assert!(session.piece_at(at("e5")).is_none());

    let mut session = Session::new();
    play_all(&mut session, &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")]);
    play_all(&mut session, &[("h2", "h3"), ("a6", "a5")]);
    assert_rejected(&mut session, "e5", "d6", PawnViolation::NotEnPassant.into());
    play_all(&mut session, &[("h3", "h4"), ("b8", "c6")]);
    assert_rejected(&mut session, "e5", "d6", PawnViolation::DiagonalNotAfterPawn.into());
}

#[test]
fn kingside_castling() {
    let mut session = Session::new();
    play_all(&mut session, &[("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")]);
    assert_rejected(
        &mut session,
        "e1",
        "g1",
        CastlingViolation::SquareOccupied { side: chess_rules::error::CastleSide::Kingside, file: 'F' }.into(),
    );
    play_all(&mut session, &[("f1", "c4"), ("g8", "f6")]);

    let applied = session.try_move(at("e1"), at("g1")).unwrap();
    assert!(matches!(applied.effect, SideEffect::Castle { .. }));
    assert_eq!(session.piece_at(at("g1")).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(session.piece_at(at("f1")).map(|p| p.kind), Some(PieceKind::Rook));
    assert!(session.piece_at(at("h1")).is_none());
    assert!(session.piece_at(at("e1")).is_none());
    assert!(session.board().check_consistency().is_ok());
}

#[test]
fn castling_rights_are_lost_after_moving() {
    let mut session = Session::new();
    play_all(&mut session, &[("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6"), ("f1", "c4"), ("g8", "f6")]);
    play_all(&mut session, &[("h1", "g1"), ("a7", "a6"), ("g1", "h1"), ("a6", "a5")]);
    assert_rejected(&mut session, "e1", "g1", CastlingViolation::RookAlreadyMoved.into());

    play_all(&mut session, &[("e1", "e2"), ("a5", "a4"), ("e2", "e1"), ("h7", "h6")]);
    assert_rejected(&mut session, "e1", "g1", CastlingViolation::KingAlreadyMoved.into());
}

#[test]
fn castling_can_be_refused_outright() {
    let mut session = Session::new().with_castling_attack_rule(CastlingAttackRule::Refuse);
    play_all(&mut session, &[("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6"), ("f1", "c4"), ("g8", "f6")]);
    assert!(matches!(
        rejection(session.try_move(at("e1"), at("g1"))),
        Rejection::NotImplemented(_)
    ));
}

#[test]
fn turn_alternates_only_on_success() {
    let mut session = Session::new();
    assert_rejected(&mut session, "e7", "e5", Rejection::WrongTurn);
    assert_eq!(session.turn(), Color::White);
    session.try_move(at("e2"), at("e4")).unwrap();
    assert_eq!(session.turn(), Color::Black);
    assert_rejected(&mut session, "d2", "d4", Rejection::WrongTurn);
    assert_rejected(&mut session, "e8", "e8", Rejection::SameSquare);
    assert_rejected(&mut session, "e8", "d8", Rejection::OwnPieceAtDestination);
    assert_eq!(session.turn(), Color::Black);
    session.try_move(at("e7"), at("e5")).unwrap();
    assert_eq!(session.turn(), Color::White);
    assert_eq!(session.log().len(), 2);
}

#[test]
fn log_records_every_accepted_move() {
    let mut session = Session::new();
    play_all(&mut session, &[("d2", "d4"), ("d7", "d5"), ("c1", "f4")]);
    let entries: Vec<String> = session.log().iter().map(|m| m.to_string()).collect();
    assert_eq!(entries, vec!["P d2d4", "p d7d5", "B c1f4"]);

    let json = serde_json::to_value(session.log()).unwrap();
    assert_eq!(json["entries"][2]["piece"]["kind"], "Bishop");
}
