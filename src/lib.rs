pub mod board;
pub mod color;
pub mod game;
pub mod r#move;
pub mod movegen;
pub mod pgn;
pub mod pieces;
pub mod position;
pub mod san;
pub mod square;
pub mod status;

#[cfg(feature = "serde")]
pub mod serde_support;

pub use color::Color;
pub use game::{Game, GameError, Metadata};
pub use pgn::{MoveError, PgnReader, ReadError, ResolutionError};
pub use pieces::{Piece, PieceType};
pub use position::{FenError, Position};
pub use r#move::Move;
pub use san::{San, SanError};
pub use square::Square;
pub use status::{Status, Termination};
