//! Standard algebraic notation: parsing move tokens and resolving them
//! against the legal moves of a position.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::pieces::PieceType;
use crate::position::Position;
use crate::r#move::Move;
use crate::square::{Square, file_from_char, rank_from_char};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    #[error("'{0}' is not a valid SAN move")]
    Syntax(String),
    #[error("'{0}' does not match any legal move")]
    Illegal(String),
    #[error("'{san}' is ambiguous: {candidates} legal moves match")]
    Ambiguous { san: String, candidates: usize },
}

/// The information a SAN token carries about the move it denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum San {
    Normal {
        piece: PieceType,
        file: Option<u8>,
        rank: Option<u8>,
        capture: bool,
        dst: Square,
        promotion: Option<PieceType>,
    },
    CastleKingside,
    CastleQueenside,
}

impl FromStr for San {
    type Err = SanError;

    fn from_str(token: &str) -> Result<Self, SanError> {
        let syntax = || SanError::Syntax(token.to_string());

        let san = token.trim_end_matches(['+', '#', '!', '?']);
        match san {
            "O-O" | "0-0" => return Ok(San::CastleKingside),
            "O-O-O" | "0-0-0" => return Ok(San::CastleQueenside),
            _ => {}
        }

        let mut chars: Vec<char> = san.chars().collect();

        let piece = match chars.first() {
            Some(&c) if c.is_ascii_uppercase() => {
                chars.remove(0);
                PieceType::from_san_char(c).ok_or_else(syntax)?
            }
            Some(_) => PieceType::Pawn,
            None => return Err(syntax()),
        };

        // Trailing promotion piece, written `e8=Q` or `e8Q`.
        let promotion = match chars.last() {
            Some(&c) if c.is_ascii_uppercase() => {
                let promotion = PieceType::from_san_char(c)
                    .filter(|pt| *pt != PieceType::King)
                    .ok_or_else(syntax)?;
                chars.pop();
                if chars.last() == Some(&'=') {
                    chars.pop();
                }
                Some(promotion)
            }
            _ => None,
        };

        if chars.len() < 2 {
            return Err(syntax());
        }
        let dst_rank = chars.pop().and_then(rank_from_char).ok_or_else(syntax)?;
        let dst_file = chars.pop().and_then(file_from_char).ok_or_else(syntax)?;
        let dst = Square::new(dst_file, dst_rank);

        let capture = chars.last() == Some(&'x');
        if capture {
            chars.pop();
        }

        // Whatever is left is the origin hint: file, rank, or both.
        let (file, rank) = match chars.as_slice() {
            [] => (None, None),
            [c] if file_from_char(*c).is_some() => (file_from_char(*c), None),
            [c] if rank_from_char(*c).is_some() => (None, rank_from_char(*c)),
            [f, r] => (
                Some(file_from_char(*f).ok_or_else(syntax)?),
                Some(rank_from_char(*r).ok_or_else(syntax)?),
            ),
            _ => return Err(syntax()),
        };

        if piece == PieceType::Pawn {
            // Pawn captures name their origin file and nothing else; pushes name nothing.
            let well_formed = rank.is_none() && (capture == file.is_some());
            if !well_formed {
                return Err(syntax());
            }
        } else if promotion.is_some() {
            return Err(syntax());
        }

        Ok(San::Normal {
            piece,
            file,
            rank,
            capture,
            dst,
            promotion,
        })
    }
}

impl San {
    pub fn matches(&self, mv: &Move) -> bool {
        match *self {
            San::Normal {
                piece,
                file,
                rank,
                capture,
                dst,
                promotion,
            } => {
                mv.piece.piece_type == piece
                    && mv.dst == dst
                    && !mv.is_castle()
                    && file.is_none_or(|f| f == mv.src.file)
                    && rank.is_none_or(|r| r == mv.src.rank)
                    && capture == mv.is_capture()
                    && promotion == mv.promotion
            }
            San::CastleKingside => mv.is_castle_kingside(),
            San::CastleQueenside => mv.is_castle_queenside(),
        }
    }

    /// Picks the single legal move this SAN describes.
    pub fn to_move(&self, position: &Position) -> Result<Move, SanError> {
        let candidates: Vec<Move> = position
            .legal_moves()
            .into_iter()
            .filter(|mv| self.matches(mv))
            .collect();

        match candidates.as_slice() {
            [mv] => Ok(*mv),
            [] => Err(SanError::Illegal(self.to_string())),
            _ => Err(SanError::Ambiguous {
                san: self.to_string(),
                candidates: candidates.len(),
            }),
        }
    }
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            San::Normal {
                piece,
                file,
                rank,
                capture,
                dst,
                promotion,
            } => {
                if let Some(c) = piece.san_char() {
                    write!(f, "{}", c)?;
                }
                if let Some(file) = file {
                    write!(f, "{}", (b'a' + file) as char)?;
                }
                if let Some(rank) = rank {
                    write!(f, "{}", (b'1' + rank) as char)?;
                }
                if capture {
                    write!(f, "x")?;
                }
                write!(f, "{}", dst)?;
                if let Some(c) = promotion.and_then(|pt| pt.san_char()) {
                    write!(f, "={}", c)?;
                }
                Ok(())
            }
            San::CastleKingside => write!(f, "O-O"),
            San::CastleQueenside => write!(f, "O-O-O"),
        }
    }
}

/// Resolves a movetext token such as `Nbd7`, `exd5`, `e8=Q+` or `O-O` to
/// exactly one legal move of `position`.
pub fn resolve(position: &Position, token: &str) -> Result<Move, SanError> {
    let san: San = token.parse()?;
    san.to_move(position).map_err(|err| match err {
        SanError::Illegal(_) => SanError::Illegal(token.to_string()),
        SanError::Ambiguous { candidates, .. } => SanError::Ambiguous {
            san: token.to_string(),
            candidates,
        },
        other => other,
    })
}
