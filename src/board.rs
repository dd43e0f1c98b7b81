use crate::color::Color;
use crate::pieces::{Piece, PieceType};
use crate::position::FenError;
use crate::square::{BOARD_SIZE, Square};
use std::fmt;

pub const STANDARD_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

const SQUARE_COUNT: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;

/// Piece placement only. Knows nothing about whose turn it is or which moves are legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; SQUARE_COUNT],
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [None; SQUARE_COUNT],
        }
    }

    pub fn standard() -> Self {
        let mut board = Board::empty();
        for (file, piece_type) in [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ]
        .into_iter()
        .enumerate()
        {
            let file = file as u8;
            for color in [Color::White, Color::Black] {
                board.set_piece(
                    Square::new(file, color.back_rank()),
                    Some(Piece::new(piece_type, color)),
                );
                board.set_piece(
                    Square::new(file, color.pawn_start_rank()),
                    Some(Piece::new(PieceType::Pawn, color)),
                );
            }
        }
        board
    }

    pub fn get_piece(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index()] = piece;
    }

    /// Removes and returns whatever stood on `sq`.
    pub fn take_piece(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].take()
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get_piece(sq).is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, piece)| piece.map(|p| (Square::from_index(index), p)))
    }

    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        self.iter().filter(|(_, piece)| piece.color == color).collect()
    }

    pub fn count(&self, piece: Piece) -> usize {
        self.iter().filter(|(_, p)| *p == piece).count()
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = Piece::new(PieceType::King, color);
        self.iter().find(|(_, p)| *p == king).map(|(sq, _)| sq)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..BOARD_SIZE).rev() {
            let mut empty_count = 0;

            for file in 0..BOARD_SIZE {
                if let Some(piece) = self.get_piece(Square::new(file, rank)) {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }

            if rank > 0 {
                fen.push('/');
            }
        }

        fen
    }

    /// Parses the placement field of a FEN record.
    pub fn from_fen(placement: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(FenError::RankCount(rows.len()));
        }

        for (row_idx, row_str) in rows.iter().enumerate() {
            let rank = BOARD_SIZE - 1 - row_idx as u8;
            let mut file = 0u8;

            for c in row_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    let next = u32::from(file) + skip;
                    if next > u32::from(BOARD_SIZE) {
                        return Err(FenError::RankLength(rank + 1));
                    }
                    file = next as u8;
                } else if let Some(piece) = Piece::from_char(c) {
                    if file >= BOARD_SIZE {
                        return Err(FenError::RankLength(rank + 1));
                    }
                    board.set_piece(Square::new(file, rank), Some(piece));
                    file += 1;
                } else {
                    return Err(FenError::PieceChar(c));
                }
            }

            if file != BOARD_SIZE {
                return Err(FenError::RankLength(rank + 1));
            }
        }

        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..BOARD_SIZE).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..BOARD_SIZE {
                match self.get_piece(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }

        write!(f, "  a b c d e f g h")
    }
}
