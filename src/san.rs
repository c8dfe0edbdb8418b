use arrayvec::ArrayVec;
use core::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

use crate::{Board, CastlingSide, File, Move, Piece, Rank, Square};

/// A move token in standard algebraic notation, parsed without a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct San {
    pub kind: Kind,
    pub postfix: Option<Postfix>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Simple {
        piece: Piece,
        from_file: Option<File>,
        from_rank: Option<Rank>,
        is_capture: bool,
        to: Square,
        promotion: Option<Piece>,
    },
    Castling(CastlingSide),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Postfix {
    Check,
    Checkmate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid SAN move.")]
    InvalidNotation,
    #[error("no piece on the board can make this move.")]
    ImpossibleMove,
    #[error("source square search is not supported for {piece:?} moves (partial move {partial}).")]
    Unsupported { piece: Piece, partial: Move },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid SAN move.")]
pub struct SanParseError;

/// Squares a candidate source piece is looked for on, in priority order.
pub type Candidates = ArrayVec<Square, 32>;

/// Source square search for one piece type.
///
/// The first candidate holding a piece of the moving side (and agreeing with
/// any file or rank hint) is the source. No legality or blocking checks are
/// made, so the order of the candidates is the tie-break.
pub trait SourceFinder {
    fn candidates(&self, to: Square) -> Candidates;
}

/// The 8 neighbours, rank offset -1 first, then file offset -1 first.
#[derive(Clone, Copy, Debug, Default)]
pub struct KingFinder;

/// Destination rank, then destination file, then the four diagonals.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueenFinder;

impl SourceFinder for KingFinder {
    fn candidates(&self, to: Square) -> Candidates {
        let mut candidates = Candidates::new();
        for rank_offset in [-1, 0, 1] {
            for file_offset in [-1, 0, 1] {
                if rank_offset == 0 && file_offset == 0 {
                    continue;
                }
                if let Some(square) = to.offset_by(file_offset, rank_offset) {
                    candidates.push(square);
                }
            }
        }
        candidates
    }
}

impl SourceFinder for QueenFinder {
    fn candidates(&self, to: Square) -> Candidates {
        const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

        let mut candidates = Candidates::new();
        candidates.extend(
            File::ALL
                .into_iter()
                .map(|file| Square::new(file, to.rank()))
                .filter(|&square| square != to),
        );
        candidates.extend(
            Rank::ALL
                .into_iter()
                .map(|rank| Square::new(to.file(), rank))
                .filter(|&square| square != to),
        );
        for (rank_step, file_step) in DIAGONALS {
            candidates.extend(to.ray(file_step, rank_step));
        }
        candidates
    }
}

/// The source finder for `piece`, if its search is implemented.
pub fn source_finder(piece: Piece) -> Option<&'static dyn SourceFinder> {
    match piece {
        Piece::King => Some(&KingFinder),
        Piece::Queen => Some(&QueenFinder),
        Piece::Pawn | Piece::Knight | Piece::Bishop | Piece::Rook => None,
    }
}

/// Parses `token` and resolves it against `board`.
pub fn resolve(board: &Board, token: &str) -> Result<Move, ResolveError> {
    token.parse::<San>()?.resolve(board)
}

impl San {
    #[inline]
    pub fn moved_piece(&self) -> Piece {
        match self.kind {
            Kind::Castling(_) => Piece::King,
            Kind::Simple { piece, .. } => piece,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        matches!(self.kind, Kind::Simple { is_capture: true, .. })
    }

    /// Fills in the source square from `board`, moving for its side to move.
    pub fn resolve(&self, board: &Board) -> Result<Move, ResolveError> {
        match self.kind {
            Kind::Castling(side) => {
                let (from, to) = side.king_squares(board.side_to_move());
                Ok(Move::new(from, to))
            }
            Kind::Simple {
                piece,
                from_file,
                from_rank,
                to,
                promotion,
                ..
            } => {
                let partial = Move {
                    from_file,
                    from_rank,
                    to_file: Some(to.file()),
                    to_rank: Some(to.rank()),
                    promotion,
                };
                if partial.is_resolved() {
                    return Ok(partial);
                }

                let finder =
                    source_finder(piece).ok_or(ResolveError::Unsupported { piece, partial })?;
                let color = board.side_to_move();
                let from = finder
                    .candidates(to)
                    .into_iter()
                    .filter(|square| from_file.map_or(true, |file| square.file() == file))
                    .filter(|square| from_rank.map_or(true, |rank| square.rank() == rank))
                    .find(|&square| board.piece_at(square) == Some((color, piece)))
                    .ok_or(ResolveError::ImpossibleMove)?;

                trace!(%from, %to, ?piece, "resolved source square");
                Ok(Move::new(from, to).with_promotion(promotion))
            }
        }
    }
}

impl FromStr for San {
    type Err = SanParseError;
    fn from_str(s: &str) -> Result<Self, SanParseError> {
        if s.starts_with('O') {
            return parse_castling(s);
        }

        let bytes = s.as_bytes();
        let span = bytes.iter().take_while(|&&c| is_move_byte(c)).count();
        let mut end = span;

        // `e8Q`: a piece letter right after the destination rank is a promotion.
        let mut promotion = None;
        if end > 2 && bytes[end - 2].is_ascii_digit() {
            if let Some(piece) = Piece::from_san_letter(bytes[end - 1]) {
                promotion = Some(piece);
                end -= 1;
            }
        }

        if end < 2 {
            return Err(SanParseError);
        }

        let to = match (
            File::from_byte(bytes[end - 2]),
            Rank::from_byte(bytes[end - 1]),
        ) {
            (Some(file), Some(rank)) => Square::new(file, rank),
            _ => return Err(SanParseError),
        };

        let mut piece = None;
        let mut from_file = None;
        let mut from_rank = None;
        let mut is_capture = false;
        for &c in &bytes[..end - 2] {
            match c {
                b'x' => is_capture = true,
                b'a'..=b'h' => from_file = File::from_byte(c),
                b'1'..=b'8' => from_rank = Rank::from_byte(c),
                _ => match Piece::from_san_letter(c) {
                    Some(p) if piece.is_none() => piece = Some(p),
                    _ => return Err(SanParseError),
                },
            }
        }

        let mut rest = &s[span..];
        if let Some(after) = rest.strip_prefix('=') {
            if promotion.is_some() {
                return Err(SanParseError);
            }
            let letter = after.bytes().next().ok_or(SanParseError)?;
            promotion = Some(Piece::from_san_letter(letter).ok_or(SanParseError)?);
            rest = &after[1..];
        }

        if promotion.is_some_and(|piece| !piece.is_promotable()) {
            return Err(SanParseError);
        }

        Ok(San {
            kind: Kind::Simple {
                piece: piece.unwrap_or(Piece::Pawn),
                from_file,
                from_rank,
                is_capture,
                to,
                promotion,
            },
            postfix: parse_postfix(rest)?,
        })
    }
}

fn parse_castling(s: &str) -> Result<San, SanParseError> {
    let body = s.trim_end_matches(is_suffix_char);
    let side = match body {
        "O-O" => CastlingSide::King,
        "O-O-O" => CastlingSide::Queen,
        _ => return Err(SanParseError),
    };
    Ok(San {
        kind: Kind::Castling(side),
        postfix: parse_postfix(&s[body.len()..])?,
    })
}

/// Check and mate markers plus `!`/`?` annotation glyphs; nothing else may trail a move.
fn parse_postfix(s: &str) -> Result<Option<Postfix>, SanParseError> {
    if !s.chars().all(is_suffix_char) {
        return Err(SanParseError);
    }
    Ok(if s.contains('#') {
        Some(Postfix::Checkmate)
    } else if s.contains('+') {
        Some(Postfix::Check)
    } else {
        None
    })
}

#[inline]
fn is_suffix_char(c: char) -> bool {
    matches!(c, '+' | '#' | '!' | '?')
}

/// Piece letters, files, capture marker and digits `1`-`9`. A `9` is accepted
/// here so that it is rejected as a rank instead of ending the scan early.
#[inline]
fn is_move_byte(c: u8) -> bool {
    matches!(c, b'K' | b'Q' | b'R' | b'B' | b'N' | b'x' | b'a'..=b'h' | b'1'..=b'9')
}

impl From<SanParseError> for ResolveError {
    #[inline]
    fn from(_: SanParseError) -> Self {
        ResolveError::InvalidNotation
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Postfix::Check => write!(f, "+"),
            Postfix::Checkmate => write!(f, "#"),
        }
    }
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            Kind::Simple {
                piece,
                from_file,
                from_rank,
                is_capture,
                to,
                promotion,
            } => {
                if piece != Piece::Pawn {
                    write!(f, "{}", piece.letter())?;
                }
                if let Some(file) = from_file {
                    write!(f, "{}", file)?;
                }
                if let Some(rank) = from_rank {
                    write!(f, "{}", rank)?;
                }
                if is_capture {
                    write!(f, "x")?;
                }
                write!(f, "{}", to)?;
                if let Some(promotion) = promotion {
                    write!(f, "={}", promotion.letter())?;
                }
            }
            Kind::Castling(CastlingSide::King) => write!(f, "O-O")?,
            Kind::Castling(CastlingSide::Queen) => write!(f, "O-O-O")?,
        }
        if let Some(postfix) = self.postfix {
            write!(f, "{}", postfix)?;
        }
        Ok(())
    }
}
