mod game;
mod mv;
pub mod board;
pub mod fen;
pub mod pgn;
pub mod query;
pub mod san;

pub use chessquery_core::{
    castling::CastlingSide,
    color::Color,
    piece::{Piece, PieceParseError},
    square::{BySquare, File, FileParseError, Rank, RankParseError, Square, SquareParseError},
};
pub use board::{Board, OutOfRange, Pieces};
pub use mv::Move;
pub use game::{Outcome, OutcomeParseError};
pub use fen::{Fen, FenParseError};
pub use pgn::{GameRecord, Games, Splitter};
pub use query::{Analyzer, Objective, Payload, Runner, Standing};
pub use san::{resolve, ResolveError, San, SanParseError};
