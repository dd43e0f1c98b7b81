use crate::color::Color;
use std::fmt;

/// Where a game stands. `NotFinished` is the only non-terminal state; once a
/// game leaves it, it never comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    NotFinished,
    WinWhite,
    WinBlack,
    Draw,
}

impl Status {
    pub fn win_for(color: Color) -> Self {
        match color {
            Color::White => Status::WinWhite,
            Color::Black => Status::WinBlack,
        }
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            Status::WinWhite => Some(Color::White),
            Status::WinBlack => Some(Color::Black),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::NotFinished)
    }

    /// Maps one of the four game termination markers to a status.
    pub fn from_result_token(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(Status::WinWhite),
            "0-1" => Some(Status::WinBlack),
            "1/2-1/2" => Some(Status::Draw),
            "*" => Some(Status::NotFinished),
            _ => None,
        }
    }

    pub fn result_token(&self) -> &'static str {
        match self {
            Status::WinWhite => "1-0",
            Status::WinBlack => "0-1",
            Status::Draw => "1/2-1/2",
            Status::NotFinished => "*",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::NotFinished => "not_finished",
            Status::WinWhite => "white_win",
            Status::WinBlack => "black_win",
            Status::Draw => "draw",
        };
        write!(f, "{}", s)
    }
}

/// Why a game reached its terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoveRule,
    FivefoldRepetition,
    /// Recorded from outside the board: resignation, agreement, time forfeit.
    Declared,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Termination::Checkmate => "checkmate",
            Termination::Stalemate => "stalemate",
            Termination::InsufficientMaterial => "insufficient_material",
            Termination::SeventyFiveMoveRule => "seventy_five_move_rule",
            Termination::FivefoldRepetition => "fivefold_repetition",
            Termination::Declared => "declared",
        };
        write!(f, "{}", s)
    }
}
