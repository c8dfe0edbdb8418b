use crate::{BySquare, Color, Fen, FenParseError, File, Piece, Rank, Square};
use core::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type Pieces = BySquare<Option<(Color, Piece)>>;

/// An 8x8 grid of optional pieces and the side to move.
///
/// A board is scratch state for one game: build a fresh one per game with
/// [`Board::new_initial`] or [`Board::from_fen`] rather than sharing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pieces: Pieces,
    side_to_move: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("coordinate ({file}, {rank}) is outside the board.")]
pub struct OutOfRange {
    pub file: i32,
    pub rank: i32,
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Default for Board {
    #[inline]
    fn default() -> Self {
        Self::new_initial()
    }
}

impl Board {
    /// The standard starting position, White to move.
    pub fn new_initial() -> Self {
        let mut board = Self::empty();
        for (file, piece) in File::ALL.into_iter().zip(BACK_RANK) {
            board.pieces[Square::new(file, Rank::First)] = Some((Color::White, piece));
            board.pieces[Square::new(file, Rank::Second)] = Some((Color::White, Piece::Pawn));
            board.pieces[Square::new(file, Rank::Seventh)] = Some((Color::Black, Piece::Pawn));
            board.pieces[Square::new(file, Rank::Eighth)] = Some((Color::Black, piece));
        }
        board
    }

    #[inline]
    pub fn empty() -> Self {
        Self {
            pieces: Pieces::default(),
            side_to_move: Color::White,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        Ok(Fen::from_str(fen)?.into_board())
    }

    #[inline]
    pub fn from_parts(pieces: Pieces, side_to_move: Color) -> Self {
        Self {
            pieces,
            side_to_move,
        }
    }

    #[inline]
    pub fn with_piece(mut self, square: Square, color: Color, piece: Piece) -> Self {
        self.pieces[square] = Some((color, piece));
        self
    }

    #[inline]
    pub fn with_side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub fn pieces(&self) -> &Pieces {
        &self.pieces
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<(Color, Piece)> {
        self.pieces[square]
    }

    /// Looks up a cell by raw coordinates, rejecting anything outside `0..8`.
    #[inline]
    pub fn at(&self, file: i32, rank: i32) -> Result<Option<(Color, Piece)>, OutOfRange> {
        Square::from_coords(file, rank)
            .map(|square| self.pieces[square])
            .ok_or(OutOfRange { file, rank })
    }

    #[inline]
    pub fn set_piece(&mut self, square: Square, piece: Option<(Color, Piece)>) {
        self.pieces[square] = piece;
    }

    #[inline]
    pub fn fen(&self) -> Fen {
        Fen::from_board(self)
    }

    /// ASCII diagram, rank 8 at the top, `.` for empty cells.
    pub fn diagram(&self) -> String {
        let mut out = String::with_capacity(9 * 18);
        for rank in Rank::ALL.into_iter().rev() {
            out.push(rank.to_char());
            out.push(' ');
            for file in File::ALL {
                out.push(match self.pieces[Square::new(file, rank)] {
                    Some((color, piece)) => piece_char(color, piece),
                    None => '.',
                });
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("  ");
        for file in File::ALL {
            out.push(file.to_char().to_ascii_uppercase());
            out.push(' ');
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.fen())
    }
}

#[inline]
pub(crate) fn piece_char(color: Color, piece: Piece) -> char {
    match color {
        Color::White => piece.letter(),
        Color::Black => piece.letter().to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{board::OutOfRange, Board, Color, Piece, Square::*};

    #[test]
    fn initial_board() {
        let board = Board::new_initial();
        assert_eq!(board.at(0, 0), Ok(Some((Color::White, Piece::Rook))));
        assert_eq!(board.at(4, 0), Ok(Some((Color::White, Piece::King))));
        assert_eq!(board.at(3, 7), Ok(Some((Color::Black, Piece::Queen))));
        assert_eq!(board.at(6, 6), Ok(Some((Color::Black, Piece::Pawn))));
        assert_eq!(board.at(4, 4), Ok(None));
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(
            board.pieces().values().filter(|p| p.is_some()).count(),
            32
        );
        assert_eq!(board, Board::default());
    }

    #[test]
    fn at_rejects_out_of_range() {
        let board = Board::new_initial();
        for file in 0..8 {
            for rank in 0..8 {
                assert!(board.at(file, rank).is_ok());
            }
        }
        for (file, rank) in [(-1, 0), (0, -1), (8, 0), (0, 8), (8, 8), (-3, 9)] {
            assert_eq!(board.at(file, rank), Err(OutOfRange { file, rank }));
        }
    }

    #[test]
    fn builder() {
        let board = Board::empty()
            .with_piece(E1, Color::White, Piece::King)
            .with_piece(C4, Color::Black, Piece::Queen)
            .with_side_to_move(Color::Black);
        assert_eq!(board.piece_at(E1), Some((Color::White, Piece::King)));
        assert_eq!(board.piece_at(C4), Some((Color::Black, Piece::Queen)));
        assert_eq!(board.piece_at(D4), None);
        assert_eq!(board.side_to_move(), Color::Black);
    }

    #[test]
    fn diagram() {
        let diagram = Board::new_initial().diagram();
        let lines = diagram.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8 r n b q k b n r ");
        assert_eq!(lines[4], "4 . . . . . . . . ");
        assert_eq!(lines[7], "1 R N B Q K B N R ");
        assert_eq!(lines[8], "  A B C D E F G H ");
    }
}
