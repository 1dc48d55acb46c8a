// src/apply.rs
use log::debug;

use crate::board::Board;
use crate::piece::PieceId;
use crate::position::Position;
use crate::validate::{MovePlan, SideEffect};

/// Carries out a validated move on the board and returns the captured piece, if any.
///
/// Performs no legality checks; the plan must come from `Validator::validate`
/// against this very board.
pub fn apply(board: &mut Board, plan: &MovePlan) -> Option<PieceId> {
    debug_assert_eq!(board.get(plan.from), Some(plan.piece.id));

    let mut captured = None;

    match plan.effect {
        SideEffect::None | SideEffect::Capture(_) => {}
        SideEffect::Castle { side, rook, rook_from, rook_to } => {
            debug_assert!(board.is_empty(plan.to) && board.is_empty(rook_to));
            board.clear(rook_from);
            board.place(rook_to, rook);
            debug!("castling {}: rook {} {} -> {}", side, rook, rook_from, rook_to);
        }
        SideEffect::EnPassant { captured: pawn, square } => {
            // Beside the mover: origin rank, destination file.
            debug_assert_eq!(Some(square), Position::new(plan.to.file(), plan.from.rank()));
            debug_assert!(board.is_empty(plan.to));
            captured = board.clear(square);
            debug_assert_eq!(captured, Some(pawn));
            debug!("en passant: pawn {} removed from {}", pawn, square);
        }
    }

    // --- Move the main piece ---
    board.clear(plan.from);
    let on_target = board.place(plan.to, plan.piece.id);
    if let SideEffect::Capture(id) = plan.effect {
        debug_assert_eq!(on_target, Some(id));
        captured = on_target;
    }
    captured
}
