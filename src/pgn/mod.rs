//! Reading games from PGN text.

pub mod error;
pub mod reader;
pub mod token;

pub use error::{MoveError, ReadError, ResolutionError};
pub use reader::PgnReader;
