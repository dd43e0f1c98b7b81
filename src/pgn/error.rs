use std::io;

use thiserror::Error;

use crate::color::Color;
use crate::game::{Game, GameError};
use crate::san::SanError;

/// Why a single movetext token could not be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    San(#[from] SanError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// A move token that could not be played, together with everything read
/// up to that point.
#[derive(Debug, Error)]
#[error("cannot play '{token}' after {} moves: {cause}", .game.move_count())]
pub struct ResolutionError {
    game: Game,
    moves: Vec<String>,
    token: String,
    #[source]
    cause: MoveError,
}

impl ResolutionError {
    pub fn new(game: Game, moves: Vec<String>, token: String, cause: MoveError) -> Self {
        ResolutionError {
            game,
            moves,
            token,
            cause,
        }
    }

    /// The game as it stood before the failing token: tags plus every move
    /// that was applied successfully.
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn into_game(self) -> Game {
        self.game
    }

    /// Every move token attempted in the record, the failing one last.
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn cause(&self) -> &MoveError {
        &self.cause
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("move number {found} is out of sequence, expected {expected}")]
    MoveNumber { expected: u32, found: u32 },
    #[error("move number {number} marks the wrong side, {turn} is to move")]
    MoveNumberSide { number: u32, turn: Color },
    #[error(transparent)]
    Resolution(#[from] Box<ResolutionError>),
    #[error("unrecognized game result '{0}'")]
    InvalidResult(String),
    #[error("movetext ended without a game result")]
    UnfinishedGame,
    #[error("malformed tag pair on line {line}: {text}")]
    TagPair { line: usize, text: String },
    #[error("malformed movetext on line {line}: {message}")]
    Movetext { line: usize, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ReadError {
    /// Only resolution failures carry the partially read game.
    pub fn partial_game(&self) -> Option<&Game> {
        match self {
            ReadError::Resolution(err) => Some(err.game()),
            _ => None,
        }
    }

    pub fn attempted_moves(&self) -> Option<&[String]> {
        match self {
            ReadError::Resolution(err) => Some(err.moves()),
            _ => None,
        }
    }
}

impl From<ResolutionError> for ReadError {
    fn from(err: ResolutionError) -> Self {
        ReadError::Resolution(Box::new(err))
    }
}
