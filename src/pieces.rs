use crate::color::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Piece types a pawn may promote to, in the order moves are generated.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Uppercase letter used in algebraic notation. Pawns have none.
    pub fn san_char(&self) -> Option<char> {
        match self {
            PieceType::Pawn => None,
            PieceType::Knight => Some('N'),
            PieceType::Bishop => Some('B'),
            PieceType::Rook => Some('R'),
            PieceType::Queen => Some('Q'),
            PieceType::King => Some('K'),
        }
    }

    pub fn from_san_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(PieceType::Knight),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        Piece { piece_type, color }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_char(&self) -> char {
        let c = match self.piece_type {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };

        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let piece_type = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };

        Some(Piece::new(piece_type, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_piece_creation() {
        let piece = Piece::new(PieceType::King, Color::White);
        assert_eq!(piece.piece_type, PieceType::King);
        assert_eq!(piece.color, Color::White);
    }

    #[rstest]
    #[case('K', PieceType::King, Color::White)]
    #[case('k', PieceType::King, Color::Black)]
    #[case('Q', PieceType::Queen, Color::White)]
    #[case('r', PieceType::Rook, Color::Black)]
    #[case('B', PieceType::Bishop, Color::White)]
    #[case('n', PieceType::Knight, Color::Black)]
    #[case('P', PieceType::Pawn, Color::White)]
    #[case('p', PieceType::Pawn, Color::Black)]
    fn test_piece_char_mapping(#[case] c: char, #[case] piece_type: PieceType, #[case] color: Color) {
        let piece = Piece::new(piece_type, color);
        assert_eq!(piece.to_char(), c);
        assert_eq!(Piece::from_char(c), Some(piece));
    }

    #[test]
    fn test_piece_from_invalid_char() {
        assert_eq!(Piece::from_char('x'), None);
    }

    #[test]
    fn test_san_chars() {
        assert_eq!(PieceType::Pawn.san_char(), None);
        assert_eq!(PieceType::Knight.san_char(), Some('N'));
        assert_eq!(PieceType::from_san_char('Q'), Some(PieceType::Queen));
        // lowercase letters are files, not pieces
        assert_eq!(PieceType::from_san_char('b'), None);
    }
}
