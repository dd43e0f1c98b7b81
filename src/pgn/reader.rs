use std::io::BufRead;

use tracing::{debug, instrument, trace, warn};

use crate::color::Color;
use crate::game::{Game, GameError, Metadata};
use crate::pgn::error::{MoveError, ReadError, ResolutionError};
use crate::pgn::token::{RawRecord, Token, Tokenizer};
use crate::san;
use crate::status::Status;

/// Reads games one record at a time from a buffered source.
///
/// The reader owns its source; dropping the reader releases it. After any
/// error the reader is positioned at the start of the next record, so
/// reading can continue.
pub struct PgnReader<R> {
    tokenizer: Tokenizer<R>,
    records_read: usize,
}

impl<'a> PgnReader<&'a [u8]> {
    pub fn from_string(text: &'a str) -> Self {
        PgnReader::new(text.as_bytes())
    }
}

impl<R: BufRead> PgnReader<R> {
    pub fn new(reader: R) -> Self {
        PgnReader {
            tokenizer: Tokenizer::new(reader),
            records_read: 0,
        }
    }

    /// Records consumed so far, including ones that failed to read.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    pub fn into_inner(self) -> R {
        self.tokenizer.into_inner()
    }

    /// Reads the next game. `Ok(None)` means the source is exhausted, and
    /// keeps being returned on later calls.
    #[instrument(level = "debug", skip(self))]
    pub fn read_game(&mut self) -> Result<Option<Game>, ReadError> {
        let Some(record) = self.tokenizer.next_record()? else {
            return Ok(None);
        };
        self.records_read += 1;

        let (record_no, line) = (self.records_read, record.line);
        trace!(record = record_no, line, tokens = record.tokens.len(), "tokenized record");

        let game = replay(record)?;
        debug!(
            record = record_no,
            line,
            tags = game.metadata().len(),
            plies = game.move_count(),
            status = %game.status(),
            "read game"
        );
        Ok(Some(game))
    }
}

impl<R: BufRead> Iterator for PgnReader<R> {
    type Item = Result<Game, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_game().transpose()
    }
}

/// Plays a record's movetext from the starting position.
fn replay(record: RawRecord) -> Result<Game, ReadError> {
    let metadata: Metadata = record.tags.into_iter().collect();
    let mut game = Game::with_metadata(metadata);
    let mut attempted = Vec::new();

    for token in record.tokens {
        match token {
            Token::MoveNumber { number, black } => {
                let expected = game.position().fullmove_number();
                if number != expected {
                    return Err(ReadError::MoveNumber {
                        expected,
                        found: number,
                    });
                }

                let turn = game.position().turn();
                if black != (turn == Color::Black) {
                    return Err(ReadError::MoveNumberSide { number, turn });
                }
            }
            Token::San(text) => {
                attempted.push(text.clone());
                if let Err(cause) = play_token(&mut game, &text) {
                    return Err(ResolutionError::new(game, attempted, text, cause).into());
                }
                trace!(san = %text, status = %game.status(), "applied move");
            }
            Token::Result(literal) => return finish(game, &literal),
        }
    }

    Err(ReadError::UnfinishedGame)
}

fn play_token(game: &mut Game, text: &str) -> Result<(), MoveError> {
    if game.is_over() {
        return Err(GameError::Finished(game.status()).into());
    }

    let mv = san::resolve(game.position(), text)?;
    game.advance(mv)?;
    Ok(())
}

/// Reconciles the declared result with the status computed from the moves.
fn finish(mut game: Game, literal: &str) -> Result<Game, ReadError> {
    let declared = Status::from_result_token(literal)
        .ok_or_else(|| ReadError::InvalidResult(literal.to_string()))?;

    if game.is_over() {
        if declared != game.status() {
            warn!(
                declared = %declared,
                computed = %game.status(),
                "declared result disagrees with the final position, keeping the computed status"
            );
        }
        return Ok(game);
    }

    // Only "*" can be refused here, which leaves the game unfinished.
    match game.conclude(declared) {
        Ok(()) => Ok(game),
        Err(_) => Err(ReadError::UnfinishedGame),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::san::SanError;
    use rstest::rstest;
    use crate::status::Termination;

    fn read_one(text: &str) -> Result<Option<Game>, ReadError> {
        PgnReader::from_string(text).read_game()
    }

    #[test]
    fn test_declared_result_concludes_game() {
        let game = read_one("[Event \"Test\"]\n\n1.e4 d6 2.d4 Nf6 0-1\n")
            .expect("Failed to read game")
            .expect("game should exist");

        assert_eq!(game.tag("Event"), Some("Test"));
        assert_eq!(game.move_count(), 4);
        assert_eq!(game.status(), Status::WinBlack);
        assert_eq!(game.termination(), Some(Termination::Declared));
    }

    #[test]
    fn test_computed_status_wins_over_declared() {
        let game = read_one("1. f3 e5 2. g4 Qh4# 1/2-1/2")
            .expect("Failed to read game")
            .expect("game should exist");
        assert_eq!(game.status(), Status::WinBlack);
        assert_eq!(game.termination(), Some(Termination::Checkmate));
    }

    #[test]
    fn test_star_after_checkmate_keeps_result() {
        let game = read_one("1. f3 e5 2. g4 Qh4# *")
            .expect("Failed to read game")
            .expect("game should exist");
        assert_eq!(game.status(), Status::WinBlack);
    }

    #[test]
    fn test_move_after_mate_is_a_resolution_error() {
        let err = read_one("1. f3 e5 2. g4 Qh4# 3. a3 0-1").expect_err("game is over");

        let partial = err.partial_game().expect("partial game");
        assert_eq!(partial.move_count(), 4);
        assert_eq!(err.attempted_moves().map(|m| m.len()), Some(5));
        match err {
            ReadError::Resolution(inner) => assert_eq!(
                inner.cause(),
                &MoveError::Game(GameError::Finished(Status::WinBlack))
            ),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_is_resolution_error() {
        let err = read_one("1.e4 e9 1-0").expect_err("e9 is not a square");
        match err {
            ReadError::Resolution(inner) => {
                assert_eq!(inner.token(), "e9");
                assert!(matches!(inner.cause(), MoveError::San(SanError::Syntax(_))));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_black_move_number_checked() {
        let err = read_one("1.e4 2... e5 0-1").expect_err("wrong move number");
        assert!(matches!(
            err,
            ReadError::MoveNumber {
                expected: 1,
                found: 2
            }
        ));
    }

    #[rstest]
    #[case("1.e4 1.e5 0-1", 1, Color::Black)]
    #[case("1... e4 1-0", 1, Color::White)]
    #[case("1.e4 e5 2... Nf3 1-0", 2, Color::White)]
    fn test_move_number_marks_wrong_side(
        #[case] text: &str,
        #[case] number: u32,
        #[case] turn: Color,
    ) {
        match read_one(text) {
            Err(ReadError::MoveNumberSide { number: n, turn: t }) => {
                assert_eq!((n, t), (number, turn));
            }
            other => panic!("expected a move number error, got {:?}", other),
        }
    }

    #[test]
    fn test_black_continuation_numbers() {
        let game = read_one("1. e4 {king pawn} 1... e5 2. Nf3 2. ... Nc6 1-0")
            .expect("Failed to read game")
            .expect("game should exist");
        assert_eq!(game.move_count(), 4);
    }

    #[test]
    fn test_move_numbers_optional() {
        let game = read_one("e4 e5 Nf3 Nc6 1-0")
            .expect("Failed to read game")
            .expect("game should exist");
        assert_eq!(game.move_count(), 4);
        assert_eq!(game.position().fullmove_number(), 3);
    }

    #[test]
    fn test_records_read_counts_failures() {
        let mut reader = PgnReader::from_string("1.e4 1-1\n\n1.d4 *\n\n1.c4 1-0\n");
        assert!(matches!(reader.read_game(), Err(ReadError::InvalidResult(_))));
        assert!(matches!(reader.read_game(), Err(ReadError::UnfinishedGame)));
        assert!(reader.read_game().expect("Failed to read game").is_some());
        assert_eq!(reader.records_read(), 3);
        assert!(reader.read_game().expect("Failed to read").is_none());
    }
}
