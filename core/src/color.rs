use core::fmt;
use enum_map::Enum;
use std::ops::Not;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Color of a piece letter in position notation: uppercase is White.
    #[inline]
    pub fn from_letter_case(c: char) -> Color {
        if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                Color::White => "white",
                Color::Black => "black",
            }
        )
    }
}
