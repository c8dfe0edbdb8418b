use crate::{
    board::{piece_char, Pieces},
    Board, Color, File, Piece, PieceParseError, Rank, Square,
};
use core::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fields of a position string this crate consumes: piece placement and
/// side to move. Castling, en passant and clock fields are accepted and ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fen {
    pub pieces: Pieces,
    pub side_to_move: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FenParseError {
    #[error("invalid number of files in a row, expected 8.")]
    InvalidFileCount,
    #[error("invalid number of rows, expected 8.")]
    InvalidRankCount,
    #[error("invalid side to move, expected 'w' or 'b'.")]
    InvalidSideToMove,
    #[error("missing piece placement.")]
    Empty,
    #[error("unexpected piece character found.")]
    UnexpectedPieceChar,
}

impl Fen {
    #[inline]
    pub fn from_board(board: &Board) -> Self {
        Self {
            pieces: *board.pieces(),
            side_to_move: board.side_to_move(),
        }
    }

    #[inline]
    pub fn into_board(self) -> Board {
        Board::from_parts(self.pieces, self.side_to_move)
    }
}

impl FromStr for Fen {
    type Err = FenParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sections = s.split_whitespace();

        let pieces = parse_pieces(sections.next().ok_or(FenParseError::Empty)?)?;
        let side_to_move = match sections.next() {
            Some(s) => parse_side_to_move(s)?,
            None => Color::White,
        };

        Ok(Fen {
            pieces,
            side_to_move,
        })
    }
}

fn parse_side_to_move(s: &str) -> Result<Color, FenParseError> {
    match s {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(FenParseError::InvalidSideToMove),
    }
}

fn parse_pieces(s: &str) -> Result<Pieces, FenParseError> {
    let mut pieces = Pieces::default();
    let mut ranks = 0;

    // Rank 8 comes first in the string.
    for (row, text) in s.split('/').enumerate() {
        let rank = Rank::ALL
            .into_iter()
            .rev()
            .nth(row)
            .ok_or(FenParseError::InvalidRankCount)?;

        for (file, piece) in File::ALL.into_iter().zip(parse_rank(text)?) {
            pieces[Square::new(file, rank)] = piece;
        }
        ranks += 1;
    }

    if ranks != 8 {
        return Err(FenParseError::InvalidRankCount);
    }

    Ok(pieces)
}

fn parse_rank(s: &str) -> Result<[Option<(Color, Piece)>; 8], FenParseError> {
    let mut rank = [None; 8];
    let mut index = 0;

    for ch in s.chars() {
        if index >= 8 {
            return Err(FenParseError::InvalidFileCount);
        }

        match ch {
            '1'..='8' => index += (ch as u8 - b'0') as usize,
            _ => {
                let piece = Piece::try_from(ch)?;
                rank[index] = Some((Color::from_letter_case(ch), piece));
                index += 1;
            }
        }
    }

    if index != 8 {
        return Err(FenParseError::InvalidFileCount);
    }

    Ok(rank)
}

impl From<PieceParseError> for FenParseError {
    fn from(_: PieceParseError) -> Self {
        FenParseError::UnexpectedPieceChar
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            self.write_rank(rank, f)?;
            if rank != Rank::First {
                write!(f, "/")?;
            }
        }

        write!(
            f,
            " {}",
            match self.side_to_move {
                Color::White => "w",
                Color::Black => "b",
            }
        )
    }
}

impl Fen {
    fn write_rank(&self, rank: Rank, f: &mut fmt::Formatter) -> fmt::Result {
        let mut empty = 0;
        for file in File::ALL {
            match self.pieces[Square::new(file, rank)] {
                Some((color, piece)) => {
                    if empty != 0 {
                        write!(f, "{}", empty)?;
                        empty = 0;
                    }
                    write!(f, "{}", piece_char(color, piece))?;
                }
                None => empty += 1,
            }
        }
        if empty != 0 {
            write!(f, "{}", empty)?;
        }
        Ok(())
    }
}
