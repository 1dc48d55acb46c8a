// src/lib.rs
//! Chess rules engine: move legality, board state and move history for a
//! two-player game. Check, checkmate and draws are outside its scope; the
//! attack map answers "is this square attacked" for callers that want it.

pub mod apply;
pub mod attacks;
pub mod board;
pub mod config;
pub mod error;
pub mod move_log;
pub mod piece;
pub mod position;
pub mod render;
pub mod session;
pub mod validate;

pub use attacks::AttackMap;
pub use board::Board;
pub use config::Config;
pub use error::{InvariantViolation, MoveError, Rejection};
pub use move_log::{LoggedMove, MoveLog};
pub use piece::{Color, Piece, PieceId, PieceKind, PieceRegistry};
pub use position::Position;
pub use render::{render, RenderStyle};
pub use session::{AppliedMove, Session, Snapshot};
pub use validate::{CastlingAttackRule, MovePlan, SideEffect};
