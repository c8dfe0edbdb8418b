pub mod castling;
pub mod color;
pub mod piece;
pub mod square;
