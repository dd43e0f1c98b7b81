//! Legal move generation and check detection.
//!
//! Moves are generated pseudo-legally per piece and then filtered by playing
//! each candidate on a copy of the position and rejecting those that leave the
//! mover's king attacked.

use crate::color::Color;
use crate::pieces::{Piece, PieceType};
use crate::position::Position;
use crate::r#move::{Move, MoveFlags};
use crate::square::{Square, file_from_char, rank_from_char};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

impl Position {
    pub fn legal_moves(&self) -> Vec<Move> {
        self.pseudo_legal_moves()
            .into_iter()
            .filter(|mv| self.is_legal_candidate(mv))
            .collect()
    }

    pub fn legal_moves_from(&self, src: Square) -> Vec<Move> {
        match self.piece_at(src) {
            Some(piece) if piece.color == self.turn() => self
                .pseudo_legal_moves_for_piece(src, piece)
                .into_iter()
                .filter(|mv| self.is_legal_candidate(mv))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();

        for (sq, piece) in self.board().pieces(self.turn()) {
            moves.extend(self.pseudo_legal_moves_for_piece(sq, piece));
        }

        moves
    }

    pub fn is_legal_move(&self, mv: &Move) -> bool {
        self.legal_moves_from(mv.src).contains(mv)
    }

    fn is_legal_candidate(&self, mv: &Move) -> bool {
        !self.play(mv).is_in_check(self.turn())
    }

    fn pseudo_legal_moves_for_piece(&self, src: Square, piece: Piece) -> Vec<Move> {
        match piece.piece_type {
            PieceType::Pawn => self.pawn_moves(src, piece),
            PieceType::Knight => self.step_moves(src, piece, &KNIGHT_OFFSETS),
            PieceType::Bishop => self.sliding_moves(src, piece, &BISHOP_DIRECTIONS),
            PieceType::Rook => self.sliding_moves(src, piece, &ROOK_DIRECTIONS),
            PieceType::Queen => {
                let mut moves = self.sliding_moves(src, piece, &BISHOP_DIRECTIONS);
                moves.extend(self.sliding_moves(src, piece, &ROOK_DIRECTIONS));
                moves
            }
            PieceType::King => {
                let mut moves = self.step_moves(src, piece, &KING_OFFSETS);
                moves.extend(self.castling_moves(src, piece));
                moves
            }
        }
    }

    fn push_pawn_move(&self, moves: &mut Vec<Move>, mv: Move) {
        if mv.dst.rank == mv.piece.color.promotion_rank() {
            for promotion in PieceType::PROMOTIONS {
                moves.push(mv.with_promotion(promotion));
            }
        } else {
            moves.push(mv);
        }
    }

    fn pawn_moves(&self, src: Square, piece: Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        let direction = piece.color.pawn_direction();

        // Pushes
        if let Some(one) = src.offset(0, direction) {
            if self.board().is_empty(one) {
                self.push_pawn_move(&mut moves, Move::new(piece, src, one, None));

                if src.rank == piece.color.pawn_start_rank() {
                    if let Some(two) = one.offset(0, direction) {
                        if self.board().is_empty(two) {
                            moves.push(
                                Move::new(piece, src, two, None)
                                    .with_flags(MoveFlags::DOUBLE_PUSH),
                            );
                        }
                    }
                }
            }
        }

        // Captures
        for df in [-1, 1] {
            let Some(dst) = src.offset(df, direction) else {
                continue;
            };

            match self.piece_at(dst) {
                Some(target) if target.color != piece.color => {
                    self.push_pawn_move(&mut moves, Move::new(piece, src, dst, Some(target)));
                }
                Some(_) => {}
                None if self.en_passant_square() == Some(dst) => {
                    let victim = Square::new(dst.file, src.rank);
                    if let Some(target) = self.piece_at(victim) {
                        if target == Piece::new(PieceType::Pawn, piece.color.opposite()) {
                            moves.push(
                                Move::new(piece, src, dst, Some(target))
                                    .with_flags(MoveFlags::EN_PASSANT),
                            );
                        }
                    }
                }
                None => {}
            }
        }

        moves
    }

    fn step_moves(&self, src: Square, piece: Piece, offsets: &[(i8, i8)]) -> Vec<Move> {
        let mut moves = Vec::new();

        for &(df, dr) in offsets {
            let Some(dst) = src.offset(df, dr) else {
                continue;
            };

            match self.piece_at(dst) {
                Some(target) if target.color == piece.color => {}
                target => moves.push(Move::new(piece, src, dst, target)),
            }
        }

        moves
    }

    fn sliding_moves(&self, src: Square, piece: Piece, directions: &[(i8, i8)]) -> Vec<Move> {
        let mut moves = Vec::new();

        for &(df, dr) in directions {
            let mut current = src;

            while let Some(dst) = current.offset(df, dr) {
                match self.piece_at(dst) {
                    Some(target) => {
                        if target.color != piece.color {
                            moves.push(Move::new(piece, src, dst, Some(target)));
                        }
                        break;
                    }
                    None => moves.push(Move::new(piece, src, dst, None)),
                }
                current = dst;
            }
        }

        moves
    }

    fn castling_moves(&self, src: Square, piece: Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        let color = piece.color;
        let rank = color.back_rank();

        if src != Square::new(4, rank) || self.is_in_check(color) {
            return moves;
        }

        let rights = self.castling_rights();
        let rook = Some(Piece::new(PieceType::Rook, color));
        let enemy = color.opposite();

        let empty = |files: &[u8]| files.iter().all(|&f| self.board().is_empty(Square::new(f, rank)));
        let safe = |files: &[u8]| {
            files
                .iter()
                .all(|&f| !self.is_square_attacked(Square::new(f, rank), enemy))
        };

        if rights.has_kingside(color)
            && self.piece_at(Square::new(7, rank)) == rook
            && empty(&[5, 6])
            && safe(&[5, 6])
        {
            moves.push(
                Move::new(piece, src, Square::new(6, rank), None)
                    .with_flags(MoveFlags::CASTLE_KINGSIDE),
            );
        }

        if rights.has_queenside(color)
            && self.piece_at(Square::new(0, rank)) == rook
            && empty(&[1, 2, 3])
            && safe(&[2, 3])
        {
            moves.push(
                Move::new(piece, src, Square::new(2, rank), None)
                    .with_flags(MoveFlags::CASTLE_QUEENSIDE),
            );
        }

        moves
    }

    pub fn is_square_attacked(&self, square: Square, by_color: Color) -> bool {
        self.board()
            .pieces(by_color)
            .into_iter()
            .any(|(src, piece)| self.can_piece_attack(src, piece, square))
    }

    fn can_piece_attack(&self, src: Square, piece: Piece, dst: Square) -> bool {
        let df = dst.file as i8 - src.file as i8;
        let dr = dst.rank as i8 - src.rank as i8;

        match piece.piece_type {
            PieceType::Pawn => dr == piece.color.pawn_direction() && df.abs() == 1,
            PieceType::Knight => {
                (df.abs() == 2 && dr.abs() == 1) || (df.abs() == 1 && dr.abs() == 2)
            }
            PieceType::Bishop => df.abs() == dr.abs() && self.is_path_clear(src, df, dr),
            PieceType::Rook => (df == 0 || dr == 0) && self.is_path_clear(src, df, dr),
            PieceType::Queen => {
                (df == 0 || dr == 0 || df.abs() == dr.abs()) && self.is_path_clear(src, df, dr)
            }
            PieceType::King => df.abs() <= 1 && dr.abs() <= 1 && (df, dr) != (0, 0),
        }
    }

    /// Whether every square strictly between `src` and `src + (df, dr)` is empty.
    /// The delta must describe a straight line.
    fn is_path_clear(&self, src: Square, df: i8, dr: i8) -> bool {
        let distance = df.abs().max(dr.abs());
        if distance == 0 {
            return false;
        }

        let (step_f, step_r) = (df.signum(), dr.signum());
        (1..distance).all(|i| {
            src.offset(step_f * i, step_r * i)
                .is_some_and(|sq| self.board().is_empty(sq))
        })
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.is_square_attacked(king, color.opposite()),
            None => false,
        }
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.is_in_check(self.turn())
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// The en passant target, but only when some pawn can legally capture onto it.
    pub fn legal_en_passant_square(&self) -> Option<Square> {
        let ep = self.en_passant_square()?;
        let pawn = Piece::new(PieceType::Pawn, self.turn());
        let capture_rank = ep.rank as i8 - pawn.color.pawn_direction();

        [-1, 1]
            .into_iter()
            .filter_map(|df| Square::try_new(ep.file as i8 + df, capture_rank))
            .filter(|&src| self.piece_at(src) == Some(pawn))
            .flat_map(|src| self.legal_moves_from(src))
            .any(|mv| mv.is_en_passant())
            .then_some(ep)
    }

    /// Neither side can possibly deliver mate: bare kings, a single minor
    /// piece, or bishops that all share one square color.
    pub fn is_insufficient_material(&self) -> bool {
        let mut knights = 0;
        let mut bishop_square_colors = Vec::new();

        for (sq, piece) in self.board().iter() {
            match piece.piece_type {
                PieceType::Pawn | PieceType::Rook | PieceType::Queen => return false,
                PieceType::Knight => knights += 1,
                PieceType::Bishop => bishop_square_colors.push(sq.is_light()),
                PieceType::King => {}
            }
        }

        match (knights, bishop_square_colors.len()) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (0, _) => bishop_square_colors.windows(2).all(|w| w[0] == w[1]),
            _ => false,
        }
    }

    /// Finds the legal move written in long algebraic form (`e2e4`, `e7e8q`, `e1g1`).
    pub fn parse_lan(&self, lan: &str) -> Option<Move> {
        let mut chars = lan.chars();
        let src = Square::new(
            chars.next().and_then(file_from_char)?,
            chars.next().and_then(rank_from_char)?,
        );
        let dst = Square::new(
            chars.next().and_then(file_from_char)?,
            chars.next().and_then(rank_from_char)?,
        );
        let promotion = match chars.next() {
            None => None,
            Some(c) => match PieceType::from_san_char(c.to_ascii_uppercase()) {
                Some(pt) if pt != PieceType::King => Some(pt),
                _ => return None,
            },
        };

        if chars.next().is_some() {
            return None;
        }

        self.legal_moves_from(src)
            .into_iter()
            .find(|mv| mv.dst == dst && mv.promotion == promotion)
    }
}
