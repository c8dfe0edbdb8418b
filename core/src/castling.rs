use crate::{
    color::Color,
    square::{File, Rank, Square},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    King,
    Queen,
}

impl CastlingSide {
    /// File the king lands on in standard chess.
    #[inline]
    pub const fn king_destination(self) -> File {
        match self {
            CastlingSide::King => File::G,
            CastlingSide::Queen => File::C,
        }
    }

    /// Home and destination squares of the castling king.
    #[inline]
    pub fn king_squares(self, color: Color) -> (Square, Square) {
        let rank = Rank::back_rank(color);
        (
            Square::new(File::E, rank),
            Square::new(self.king_destination(), rank),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::CastlingSide;
    use crate::{color::Color, square::Square::*};

    #[test]
    fn castling_king_squares() {
        assert_eq!(CastlingSide::King.king_squares(Color::White), (E1, G1));
        assert_eq!(CastlingSide::Queen.king_squares(Color::White), (E1, C1));
        assert_eq!(CastlingSide::King.king_squares(Color::Black), (E8, G8));
        assert_eq!(CastlingSide::Queen.king_squares(Color::Black), (E8, C8));
    }
}
