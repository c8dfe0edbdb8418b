use core::fmt;

use crate::{File, Piece, Rank, Square};

/// Coordinates of a move as far as they are known.
///
/// Resolution fills all four coordinates; notation that names only some of
/// them (a file hint, a destination) leaves the rest as `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Move {
    pub from_file: Option<File>,
    pub from_rank: Option<Rank>,
    pub to_file: Option<File>,
    pub to_rank: Option<Rank>,
    pub promotion: Option<Piece>,
}

impl Move {
    #[inline]
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from_file: Some(from.file()),
            from_rank: Some(from.rank()),
            to_file: Some(to.file()),
            to_rank: Some(to.rank()),
            promotion: None,
        }
    }

    #[inline]
    pub fn with_promotion(mut self, promotion: Option<Piece>) -> Self {
        self.promotion = promotion;
        self
    }

    #[inline]
    pub fn from(&self) -> Option<Square> {
        Some(Square::new(self.from_file?, self.from_rank?))
    }

    #[inline]
    pub fn to(&self) -> Option<Square> {
        Some(Square::new(self.to_file?, self.to_rank?))
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.from().is_some() && self.to().is_some()
    }
}

impl fmt::Display for Move {
    /// Long algebraic form (`e2e4`, `g7g8q`), with `?` for unknown coordinates.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let file = |file: Option<File>| file.map_or('?', File::to_char);
        let rank = |rank: Option<Rank>| rank.map_or('?', Rank::to_char);
        write!(
            f,
            "{}{}{}{}",
            file(self.from_file),
            rank(self.from_rank),
            file(self.to_file),
            rank(self.to_rank),
        )?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{File, Move, Piece, Rank, Square::*};

    #[test]
    fn move_display() {
        assert_eq!(Move::new(E2, E4).to_string(), "e2e4");
        assert_eq!(
            Move::new(G7, G8)
                .with_promotion(Some(Piece::Queen))
                .to_string(),
            "g7g8q"
        );

        let partial = Move {
            from_file: Some(File::C),
            to_file: Some(File::D),
            to_rank: Some(Rank::Eighth),
            ..Move::default()
        };
        assert_eq!(partial.to_string(), "c?d8");
        assert!(!partial.is_resolved());
        assert_eq!(partial.to(), Some(D8));
        assert_eq!(partial.from(), None);
    }
}
