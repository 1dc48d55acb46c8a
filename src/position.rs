// src/position.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParsePositionError;

// --- Board Geometry ---
pub const FILES: u8 = 8;
pub const RANKS: u8 = 8;
pub const SQUARES: usize = (FILES as usize) * (RANKS as usize);

// Rank indices are stored inverted: index 0 is the 8th rank, index 7 the 1st.
pub const RANK_8: u8 = 0;
pub const RANK_7: u8 = 1;
pub const RANK_6: u8 = 2;
pub const RANK_5: u8 = 3;
pub const RANK_4: u8 = 4;
pub const RANK_3: u8 = 5;
pub const RANK_2: u8 = 6;
pub const RANK_1: u8 = 7;

pub const FILE_A: u8 = 0;
pub const FILE_B: u8 = 1;
pub const FILE_C: u8 = 2;
pub const FILE_D: u8 = 3;
pub const FILE_E: u8 = 4;
pub const FILE_F: u8 = 5;
pub const FILE_G: u8 = 6;
pub const FILE_H: u8 = 7;

const INVALID_COORD: u8 = u8::MAX;

/// A square on the board, or the distinguished invalid position.
///
/// `file` runs a..h as 0..7. `rank` is the inverted rank index (0 = 8th rank).
/// Both coordinates are valid or both are `INVALID_COORD`; the constructors
/// never produce anything in between.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    file: u8,
    rank: u8,
}

impl Position {
    pub const INVALID: Position = Position { file: INVALID_COORD, rank: INVALID_COORD };

    /// Builds a position from a file and an inverted rank index.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < FILES && rank < RANKS { Some(Position { file, rank }) } else { None }
    }

    /// Like `new`, but for signed coordinates produced by offset arithmetic.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        if !self.is_valid() { return None; }
        let file = i16::from(self.file) + i16::from(file_delta);
        let rank = i16::from(self.rank) + i16::from(rank_delta);
        if (0..FILES as i16).contains(&file) && (0..RANKS as i16).contains(&rank) {
            Some(Position { file: file as u8, rank: rank as u8 })
        } else {
            None
        }
    }

    /// Converts a file letter `a..h` and a rank digit `1..8` into a position.
    /// Anything else yields `Position::INVALID`.
    pub fn from_chars(file: char, rank: char) -> Self {
        let file = match file { 'a'..='h' => file as u8 - b'a', _ => return Position::INVALID };
        let rank = match rank { '1'..='8' => RANK_1 - (rank as u8 - b'1'), _ => return Position::INVALID };
        Position { file, rank }
    }

    /// Inverse of `index()`.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= SQUARES { return None; }
        Some(Position { file: (index % FILES as usize) as u8, rank: (index / FILES as usize) as u8 })
    }

    pub fn is_valid(&self) -> bool {
        debug_assert_eq!(self.file == INVALID_COORD, self.rank == INVALID_COORD);
        self.file != INVALID_COORD
    }

    pub fn invalidate(&mut self) {
        *self = Position::INVALID;
    }

    pub fn file(&self) -> u8 { self.file }

    /// Inverted rank index (0 = 8th rank).
    pub fn rank(&self) -> u8 { self.rank }

    /// Rank number as printed on the board, 1..8.
    pub fn rank_number(&self) -> u8 { RANKS - self.rank }

    pub fn file_char(&self) -> char { (b'a' + self.file) as char }

    pub fn rank_char(&self) -> char { (b'0' + self.rank_number()) as char }

    /// Board array index, `rank * 8 + file`.
    pub fn index(&self) -> usize {
        assert!(self.is_valid(), "index() called on an invalid position");
        self.rank as usize * FILES as usize + self.file as usize
    }

    /// Signed file and rank-index distance from `self` to `to`.
    pub fn delta(&self, to: Position) -> (i8, i8) {
        (to.file as i8 - self.file as i8, to.rank as i8 - self.rank as i8)
    }

    /// Squares strictly between `self` and `to` on a shared rank, file or diagonal.
    /// Returns an empty iterator for any other pair.
    pub fn between(self, to: Position) -> impl Iterator<Item = Position> {
        let (df, dr) = self.delta(to);
        let aligned = df == 0 || dr == 0 || df.abs() == dr.abs();
        let steps = if aligned { df.abs().max(dr.abs()) } else { 0 };
        let (step_f, step_r) = (df.signum(), dr.signum());
        (1..steps).filter_map(move |i| self.offset(step_f * i, step_r * i))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() { return write!(f, "??"); }
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(ParsePositionError::Length(s.to_string())),
        };
        if !('a'..='h').contains(&file) { return Err(ParsePositionError::File(file)); }
        if !('1'..='8').contains(&rank) { return Err(ParsePositionError::Rank(rank)); }
        Ok(Position::from_chars(file, rank))
    }
}
