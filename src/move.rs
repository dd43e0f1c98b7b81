use crate::pieces::{Piece, PieceType};
use crate::square::Square;
use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        const CAPTURE = 0b00000001;
        const DOUBLE_PUSH = 0b00000010;
        const EN_PASSANT = 0b00000100;
        const CASTLE_KINGSIDE = 0b00001000;
        const CASTLE_QUEENSIDE = 0b00010000;
        const PROMOTION = 0b00100000;
    }
}

/// A fully described move. Produced by move generation, never mutated afterwards.
///
/// Castling is recorded as the king's move (`e1g1`, `e1c1`, ...); the rook's
/// relocation is implied by the castle flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub src: Square,
    pub dst: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceType>,
    pub flags: MoveFlags,
}

impl Move {
    pub fn new(piece: Piece, src: Square, dst: Square, captured: Option<Piece>) -> Self {
        let flags = if captured.is_some() {
            MoveFlags::CAPTURE
        } else {
            MoveFlags::empty()
        };

        Move {
            src,
            dst,
            piece,
            captured,
            promotion: None,
            flags,
        }
    }

    pub fn with_flags(mut self, flags: MoveFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_promotion(mut self, promotion: PieceType) -> Self {
        self.promotion = Some(promotion);
        self.flags |= MoveFlags::PROMOTION;
        self
    }

    pub fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    pub fn is_castle_kingside(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_KINGSIDE)
    }

    pub fn is_castle_queenside(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_QUEENSIDE)
    }

    pub fn is_castle(&self) -> bool {
        self.flags
            .intersects(MoveFlags::CASTLE_KINGSIDE | MoveFlags::CASTLE_QUEENSIDE)
    }

    /// Whether the move resets the halfmove clock.
    pub fn is_irreversible(&self) -> bool {
        self.piece.piece_type == PieceType::Pawn || self.is_capture()
    }

    /// Square of the pawn removed by an en passant capture.
    pub fn en_passant_victim(&self) -> Square {
        Square::new(self.dst.file, self.src.rank)
    }

    /// Source and destination squares of the rook that accompanies a castling move.
    pub fn castling_rook(&self) -> Option<(Square, Square)> {
        let rank = self.src.rank;
        if self.is_castle_kingside() {
            Some((Square::new(7, rank), Square::new(5, rank)))
        } else if self.is_castle_queenside() {
            Some((Square::new(0, rank), Square::new(3, rank)))
        } else {
            None
        }
    }

    pub fn to_lan(&self) -> String {
        let mut lan = format!("{}{}", self.src, self.dst);

        if let Some(promo) = self.promotion {
            let promo_char = match promo {
                PieceType::Rook => 'r',
                PieceType::Bishop => 'b',
                PieceType::Knight => 'n',
                _ => 'q',
            };
            lan.push(promo_char);
        }

        lan
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_capture_flag_follows_captured_piece() {
        let knight = Piece::new(PieceType::Knight, Color::White);
        let quiet = Move::new(knight, Square::new(6, 0), Square::new(5, 2), None);
        assert!(!quiet.is_capture());
        assert!(!quiet.is_irreversible());

        let pawn = Piece::new(PieceType::Pawn, Color::Black);
        let capture = Move::new(knight, Square::new(5, 2), Square::new(4, 4), Some(pawn));
        assert!(capture.is_capture());
        assert!(capture.is_irreversible());
    }

    #[test]
    fn test_lan_with_promotion() {
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        let mv = Move::new(pawn, Square::new(4, 6), Square::new(4, 7), None)
            .with_promotion(PieceType::Knight);
        assert!(mv.flags.contains(MoveFlags::PROMOTION));
        assert_eq!(mv.to_lan(), "e7e8n");
        assert_eq!(mv.to_string(), "e7e8n");
    }

    #[test]
    fn test_castling_rook_squares() {
        let king = Piece::new(PieceType::King, Color::Black);
        let short = Move::new(king, Square::new(4, 7), Square::new(6, 7), None)
            .with_flags(MoveFlags::CASTLE_KINGSIDE);
        assert!(short.is_castle());
        assert_eq!(
            short.castling_rook(),
            Some((Square::new(7, 7), Square::new(5, 7)))
        );

        let long = Move::new(king, Square::new(4, 7), Square::new(2, 7), None)
            .with_flags(MoveFlags::CASTLE_QUEENSIDE);
        assert_eq!(
            long.castling_rook(),
            Some((Square::new(0, 7), Square::new(3, 7)))
        );
    }

    #[test]
    fn test_en_passant_victim() {
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        let victim = Piece::new(PieceType::Pawn, Color::Black);
        let mv = Move::new(pawn, Square::new(4, 4), Square::new(3, 5), Some(victim))
            .with_flags(MoveFlags::EN_PASSANT);
        assert_eq!(mv.en_passant_victim(), Square::new(3, 4));
    }
}
