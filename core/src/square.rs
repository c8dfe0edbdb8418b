use crate::color::Color;
use core::fmt;
use enum_map::{Enum, EnumMap};
use std::str::FromStr;
use thiserror::Error;

#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum Square {
    A1 = 0, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum, PartialOrd, Ord)]
pub enum File {
    A = 0,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum, PartialOrd, Ord)]
pub enum Rank {
    First = 0,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("invalid square notation, expected '[a-h][1-8]'.")]
pub struct SquareParseError;

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("invalid file notation, expected '[a-h]'.")]
pub struct FileParseError;

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("invalid rank notation, expected '[1-8]'.")]
pub struct RankParseError;

pub type BySquare<T> = EnumMap<Square, T>;

use Square::*;
impl Square {
    #[rustfmt::skip]
    pub const ALL: [Square; 64] = [
        A1, B1, C1, D1, E1, F1, G1, H1,
        A2, B2, C2, D2, E2, F2, G2, H2,
        A3, B3, C3, D3, E3, F3, G3, H3,
        A4, B4, C4, D4, E4, F4, G4, H4,
        A5, B5, C5, D5, E5, F5, G5, H5,
        A6, B6, C6, D6, E6, F6, G6, H6,
        A7, B7, C7, D7, E7, F7, G7, H7,
        A8, B8, C8, D8, E8, F8, G8, H8,
    ];

    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::ALL[file as usize + rank as usize * 8]
    }

    /// Square at signed board coordinates, `None` when either lies outside `0..8`.
    #[inline]
    pub const fn from_coords(file: i32, rank: i32) -> Option<Self> {
        match (File::from_coord(file), Rank::from_coord(rank)) {
            (Some(file), Some(rank)) => Some(Square::new(file, rank)),
            _ => None,
        }
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[self as usize % 8]
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[self as usize / 8]
    }

    #[inline]
    pub fn offset_by(self, file_offset: i32, rank_offset: i32) -> Option<Square> {
        Square::from_coords(
            self.file() as i32 + file_offset,
            self.rank() as i32 + rank_offset,
        )
    }

    /// Squares reached by stepping `(file_step, rank_step)` repeatedly until the edge.
    pub fn ray(self, file_step: i32, rank_step: i32) -> impl Iterator<Item = Square> {
        let mut current = self;
        std::iter::from_fn(move || {
            current = current.offset_by(file_step, rank_step)?;
            Some(current)
        })
    }
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    #[inline]
    pub const fn from_coord(coord: i32) -> Option<Self> {
        if coord < 0 || coord >= 8 {
            return None;
        }
        Some(Self::ALL[coord as usize])
    }

    #[inline]
    pub const fn from_byte(c: u8) -> Option<Self> {
        match c {
            b'a'..=b'h' => Some(Self::ALL[(c - b'a') as usize]),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::First,
        Rank::Second,
        Rank::Third,
        Rank::Fourth,
        Rank::Fifth,
        Rank::Sixth,
        Rank::Seventh,
        Rank::Eighth,
    ];

    #[inline]
    pub const fn from_coord(coord: i32) -> Option<Self> {
        if coord < 0 || coord >= 8 {
            return None;
        }
        Some(Self::ALL[coord as usize])
    }

    #[inline]
    pub const fn from_byte(c: u8) -> Option<Self> {
        match c {
            b'1'..=b'8' => Some(Self::ALL[(c - b'1') as usize]),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }

    #[inline]
    pub const fn back_rank(perspective: Color) -> Rank {
        match perspective {
            Color::White => Rank::First,
            Color::Black => Rank::Eighth,
        }
    }
}

impl TryFrom<char> for File {
    type Error = FileParseError;
    fn try_from(c: char) -> Result<Self, FileParseError> {
        u8::try_from(c)
            .ok()
            .and_then(File::from_byte)
            .ok_or(FileParseError)
    }
}

impl TryFrom<char> for Rank {
    type Error = RankParseError;
    fn try_from(c: char) -> Result<Self, RankParseError> {
        u8::try_from(c)
            .ok()
            .and_then(Rank::from_byte)
            .ok_or(RankParseError)
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, SquareParseError> {
        match s.as_bytes() {
            &[file, rank] => match (File::from_byte(file), Rank::from_byte(rank)) {
                (Some(file), Some(rank)) => Ok(Square::new(file, rank)),
                _ => Err(SquareParseError),
            },
            _ => Err(SquareParseError),
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}
