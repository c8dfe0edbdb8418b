use enum_map::Enum;
use std::str::FromStr;
use thiserror::Error;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Error)]
#[error("invalid piece character, expected 'p|n|b|r|q|k|P|N|B|R|Q|K'")]
pub struct PieceParseError;

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Uppercase letter used in algebraic notation and position strings.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }

    /// Piece named by an uppercase SAN letter. Pawns have no SAN letter.
    #[inline]
    pub const fn from_san_letter(c: u8) -> Option<Piece> {
        match c {
            b'N' => Some(Piece::Knight),
            b'B' => Some(Piece::Bishop),
            b'R' => Some(Piece::Rook),
            b'Q' => Some(Piece::Queen),
            b'K' => Some(Piece::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotable(self) -> bool {
        matches!(self, Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceParseError;
    fn try_from(ch: char) -> Result<Self, PieceParseError> {
        match ch.to_ascii_uppercase() {
            'P' => Ok(Piece::Pawn),
            'N' => Ok(Piece::Knight),
            'B' => Ok(Piece::Bishop),
            'R' => Ok(Piece::Rook),
            'Q' => Ok(Piece::Queen),
            'K' => Ok(Piece::King),
            _ => Err(PieceParseError),
        }
    }
}

impl FromStr for Piece {
    type Err = PieceParseError;
    fn from_str(s: &str) -> Result<Self, PieceParseError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Piece::try_from(c),
            _ => Err(PieceParseError),
        }
    }
}
