// src/render.rs
//! Text rendering of a board for terminals.

use std::fmt::Write;

use crate::piece::{Color, Piece, PieceKind};
use crate::position::{Position, FILES, RANKS};
use crate::session::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Unicode glyphs on ANSI-colored squares.
    #[default]
    Unicode,
    /// Plain ASCII grid, for terminals without color support.
    Ascii,
}

const FG_BLACK: &str = "\x1b[30m";
const BG_LIGHT: &str = "\x1b[47m";
const BG_DARK: &str = "\x1b[45m";
const RESET: &str = "\x1b[0m";

/// a8 is a light square.
fn is_light(pos: Position) -> bool {
    (pos.file() + pos.rank()) % 2 == 0
}

fn glyph(piece: &Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceKind::King) => '\u{2654}',
        (Color::White, PieceKind::Queen) => '\u{2655}',
        (Color::White, PieceKind::Rook) => '\u{2656}',
        (Color::White, PieceKind::Bishop) => '\u{2657}',
        (Color::White, PieceKind::Knight) => '\u{2658}',
        (Color::White, PieceKind::Pawn) => '\u{2659}',
        (Color::Black, PieceKind::King) => '\u{265A}',
        (Color::Black, PieceKind::Queen) => '\u{265B}',
        (Color::Black, PieceKind::Rook) => '\u{265C}',
        (Color::Black, PieceKind::Bishop) => '\u{265D}',
        (Color::Black, PieceKind::Knight) => '\u{265E}',
        (Color::Black, PieceKind::Pawn) => '\u{265F}',
    }
}

/// Rank 8 at the top, file labels underneath.
pub fn render(snapshot: &Snapshot<'_>, style: RenderStyle) -> String {
    match style {
        RenderStyle::Unicode => render_unicode(snapshot),
        RenderStyle::Ascii => render_ascii(snapshot),
    }
}

fn squares_of_rank(rank: u8) -> impl Iterator<Item = Position> {
    (0..FILES).filter_map(move |file| Position::new(file, rank))
}

fn render_unicode(snapshot: &Snapshot<'_>) -> String {
    let mut out = String::new();
    for rank in 0..RANKS {
        out.push((b'8' - rank) as char);
        out.push(' ');
        out.push_str(FG_BLACK);
        for pos in squares_of_rank(rank) {
            out.push_str(if is_light(pos) { BG_LIGHT } else { BG_DARK });
            out.push(snapshot.piece_at(pos).map_or(' ', glyph));
            out.push(' ');
        }
        out.push_str(RESET);
        out.push('\n');
    }
    out.push_str("  a b c d e f g h \n");
    out
}

fn render_ascii(snapshot: &Snapshot<'_>) -> String {
    let separator = format!("  {}\n", "-".repeat(49));
    let mut out = String::new();
    for rank in 0..RANKS {
        out.push_str(&separator);
        let _ = write!(out, "{} |", (b'8' - rank) as char);
        for pos in squares_of_rank(rank) {
            match snapshot.piece_at(pos) {
                Some(piece) => {
                    let color = match piece.color { Color::White => 'w', Color::Black => 'b' };
                    let _ = write!(out, " {}_{} |", color, piece.kind.symbol());
                }
                None if is_light(pos) => out.push_str("#####|"),
                None => out.push_str("     |"),
            }
        }
        out.push('\n');
    }
    out.push_str(&separator);
    out.push_str("   ");
    for file in 0..FILES {
        let _ = write!(out, "  {}   ", (b'a' + file) as char);
    }
    out.push('\n');
    out
}
