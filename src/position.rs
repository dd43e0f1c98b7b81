use arrayvec::ArrayVec;
use thiserror::Error;

use crate::board::Board;
use crate::color::Color;
use crate::pieces::{Piece, PieceType};
use crate::r#move::{Move, MoveFlags};
use crate::square::Square;

pub const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 6 FEN fields, got {0}")]
    FieldCount(usize),
    #[error("expected 8 ranks, got {0}")]
    RankCount(usize),
    #[error("rank {0} does not describe exactly 8 squares")]
    RankLength(u8),
    #[error("invalid piece character '{0}'")]
    PieceChar(char),
    #[error("invalid side to move '{0}'")]
    Turn(String),
    #[error("invalid castling character '{0}'")]
    Castling(char),
    #[error("invalid en passant square '{0}'")]
    EnPassant(String),
    #[error("invalid move counter '{0}'")]
    Counter(String),
    #[error("{0} must have exactly one king")]
    KingCount(Color),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    white_kingside: bool,
    white_queenside: bool,
    black_kingside: bool,
    black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::new()
    }
}

impl CastlingRights {
    pub fn new() -> Self {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> Self {
        CastlingRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn has_kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn has_queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.white_kingside || self.white_queenside || self.black_kingside || self.black_queenside)
    }

    fn revoke_all(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// Drops the right tied to a rook's home square once anything leaves or lands on it.
    fn revoke_corner(&mut self, sq: Square) {
        match (sq.file, sq.rank) {
            (0, 0) => self.white_queenside = false,
            (7, 0) => self.white_kingside = false,
            (0, 7) => self.black_queenside = false,
            (7, 7) => self.black_kingside = false,
            _ => {}
        }
    }

    fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }

        let mut s = String::new();
        for (flag, c) in [
            (self.white_kingside, 'K'),
            (self.white_queenside, 'Q'),
            (self.black_kingside, 'k'),
            (self.black_queenside, 'q'),
        ] {
            if flag {
                s.push(c);
            }
        }
        s
    }

    fn from_fen(field: &str) -> Result<Self, FenError> {
        let mut rights = CastlingRights::none();
        for c in field.chars() {
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                'q' => rights.black_queenside = true,
                '-' => {}
                _ => return Err(FenError::Castling(c)),
            }
        }
        Ok(rights)
    }
}

/// A complete chess position: placement, side to move, castling rights,
/// en passant target and move counters.
///
/// Positions have value semantics: [`Position::play`] returns the successor and
/// leaves `self` untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    turn: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    pub fn standard() -> Self {
        Position {
            board: Board::standard(),
            turn: Color::White,
            castling_rights: CastlingRights::new(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut parts: ArrayVec<&str, 6> = ArrayVec::new();
        for field in fen.split_whitespace() {
            parts
                .try_push(field)
                .map_err(|_| FenError::FieldCount(fen.split_whitespace().count()))?;
        }

        if parts.len() != 6 {
            return Err(FenError::FieldCount(parts.len()));
        }

        let board = Board::from_fen(parts[0])?;

        for color in [Color::White, Color::Black] {
            if board.count(Piece::new(PieceType::King, color)) != 1 {
                return Err(FenError::KingCount(color));
            }
        }

        let turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::Turn(other.to_string())),
        };

        let castling_rights = CastlingRights::from_fen(parts[2])?;

        let en_passant = match parts[3] {
            "-" => None,
            field => Some(
                Square::from_algebraic(field)
                    .ok_or_else(|| FenError::EnPassant(field.to_string()))?,
            ),
        };

        let halfmove_clock = parts[4]
            .parse()
            .map_err(|_| FenError::Counter(parts[4].to_string()))?;

        let fullmove_number = parts[5]
            .parse()
            .map_err(|_| FenError::Counter(parts[5].to_string()))?;

        Ok(Position {
            board,
            turn,
            castling_rights,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get_piece(sq)
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn castling_rights(&self) -> &CastlingRights {
        &self.castling_rights
    }

    /// Square a pawn skipped over on the previous ply, whether or not a capture there is legal.
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board.find_king(color)
    }

    /// Returns the position after `mv`. The move is assumed to come from
    /// [`Position::legal_moves`]; nothing is re-validated here.
    pub fn play(&self, mv: &Move) -> Position {
        let mut next = *self;
        next.apply(mv);
        next
    }

    pub(crate) fn apply(&mut self, mv: &Move) {
        let mover = mv.piece;
        self.board.set_piece(mv.src, None);

        if mv.flags.contains(MoveFlags::EN_PASSANT) {
            self.board.set_piece(mv.en_passant_victim(), None);
        }

        let placed = match mv.promotion {
            Some(promotion) => Piece::new(promotion, mover.color),
            None => mover,
        };
        self.board.set_piece(mv.dst, Some(placed));

        if let Some((rook_src, rook_dst)) = mv.castling_rook() {
            let rook = self.board.take_piece(rook_src);
            self.board.set_piece(rook_dst, rook);
        }

        if mover.piece_type == PieceType::King {
            self.castling_rights.revoke_all(mover.color);
        }
        self.castling_rights.revoke_corner(mv.src);
        self.castling_rights.revoke_corner(mv.dst);

        self.en_passant = if mv.flags.contains(MoveFlags::DOUBLE_PUSH) {
            Some(Square::new(mv.src.file, (mv.src.rank + mv.dst.rank) / 2))
        } else {
            None
        };

        if mv.is_irreversible() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if self.turn == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.turn = self.turn.opposite();
    }

    pub fn to_fen(&self) -> String {
        let en_passant = self
            .legal_en_passant_square()
            .map(|sq| sq.to_algebraic())
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {} {} {} {} {}",
            self.board.to_fen(),
            if self.turn == Color::White { 'w' } else { 'b' },
            self.castling_rights.to_fen(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Identity of a position for repetition purposes: clocks are ignored and
    /// the en passant square only counts when the capture is actually playable.
    pub fn repetition_key(&self) -> RepetitionKey {
        RepetitionKey {
            board: self.board,
            turn: self.turn,
            castling_rights: self.castling_rights,
            en_passant: self.legal_en_passant_square(),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "{} to move", self.turn)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RepetitionKey {
    board: Board,
    turn: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
}
