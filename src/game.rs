use thiserror::Error;

use crate::position::{Position, RepetitionKey};
use crate::r#move::Move;
use crate::status::{Status, Termination};

/// Halfmoves without a capture or pawn move after which the game is drawn
/// without a claim.
pub const SEVENTY_FIVE_MOVE_LIMIT: u32 = 150;

/// Occurrences of the same position after which the game is drawn without a claim.
pub const FIVEFOLD_REPETITION: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game is already over ({0})")]
    Finished(Status),
    #[error("{0} is not a legal move in this position")]
    IllegalMove(Move),
    #[error("a game can only be concluded with a terminal status, got {0}")]
    NotTerminal(Status),
}

/// Tag pairs in the order they were first seen. Setting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Metadata::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

/// A game in progress or finished: tag pairs, the moves played from the
/// standard starting position, the resulting position and the game status.
#[derive(Debug, Clone)]
pub struct Game {
    metadata: Metadata,
    moves: Vec<Move>,
    position: Position,
    status: Status,
    termination: Option<Termination>,
    repetitions: Vec<RepetitionKey>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_metadata(Metadata::new())
    }

    pub fn with_metadata(metadata: Metadata) -> Self {
        let position = Position::standard();
        Game {
            metadata,
            moves: Vec::new(),
            position,
            status: Status::NotFinished,
            termination: None,
            repetitions: vec![position.repetition_key()],
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)
    }

    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key, value);
    }

    /// Moves applied so far, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            Vec::new()
        } else {
            self.position.legal_moves()
        }
    }

    /// Plays `mv` and recomputes the status from the resulting position.
    pub fn advance(&mut self, mv: Move) -> Result<Status, GameError> {
        if self.is_over() {
            return Err(GameError::Finished(self.status));
        }

        if !self.position.is_legal_move(&mv) {
            return Err(GameError::IllegalMove(mv));
        }

        self.position = self.position.play(&mv);
        self.moves.push(mv);
        self.repetitions.push(self.position.repetition_key());

        if let Some((status, termination)) = self.evaluate() {
            self.status = status;
            self.termination = Some(termination);
        }

        Ok(self.status)
    }

    /// Ends the game with an outcome that cannot be read off the board,
    /// such as a resignation or an agreed draw.
    pub fn conclude(&mut self, status: Status) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::Finished(self.status));
        }

        if !status.is_terminal() {
            return Err(GameError::NotTerminal(status));
        }

        self.status = status;
        self.termination = Some(Termination::Declared);
        Ok(())
    }

    fn evaluate(&self) -> Option<(Status, Termination)> {
        let pos = &self.position;

        if pos.legal_moves().is_empty() {
            return Some(if pos.is_check() {
                (Status::win_for(pos.turn().opposite()), Termination::Checkmate)
            } else {
                (Status::Draw, Termination::Stalemate)
            });
        }

        if pos.is_insufficient_material() {
            return Some((Status::Draw, Termination::InsufficientMaterial));
        }

        if pos.halfmove_clock() >= SEVENTY_FIVE_MOVE_LIMIT {
            return Some((Status::Draw, Termination::SeventyFiveMoveRule));
        }

        if self.repetition_count() >= FIVEFOLD_REPETITION {
            return Some((Status::Draw, Termination::FivefoldRepetition));
        }

        None
    }

    /// How many times the current position has occurred, including now.
    pub fn repetition_count(&self) -> usize {
        let current = self.position.repetition_key();
        self.repetitions.iter().filter(|key| **key == current).count()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Game(moves: {}, status: {}, termination: {:?})\n{}",
            self.moves.len(),
            self.status,
            self.termination,
            self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn play(game: &mut Game, lans: &[&str]) -> Status {
        let mut status = game.status();
        for lan in lans {
            let mv = game
                .position()
                .parse_lan(lan)
                .unwrap_or_else(|| panic!("{} should be legal", lan));
            status = game.advance(mv).expect("move should apply");
        }
        status
    }

    #[test]
    fn test_metadata_order_and_overwrite() {
        let mut metadata = Metadata::new();
        metadata.insert("Event", "Wch U20");
        metadata.insert("Site", "Kiljava");
        metadata.insert("Event", "Rematch");

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("Event"), Some("Rematch"));
        assert_eq!(
            metadata.iter().collect::<Vec<_>>(),
            vec![("Event", "Rematch"), ("Site", "Kiljava")]
        );
        assert!(!metadata.contains_key("Round"));
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.status(), Status::NotFinished);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.position(), &Position::standard());
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.repetition_count(), 1);
    }

    #[test]
    fn test_advance_appends_history() {
        let mut game = Game::new();
        let status = play(&mut game, &["e2e4", "d7d6", "d2d4"]);

        assert_eq!(status, Status::NotFinished);
        assert_eq!(game.move_count(), 3);
        assert_eq!(game.moves()[1].to_lan(), "d7d6");
        assert_eq!(game.position().turn(), Color::Black);
    }

    #[test]
    fn test_checkmate_finishes_game() {
        let mut game = Game::new();
        let status = play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

        assert_eq!(status, Status::WinBlack);
        assert_eq!(game.termination(), Some(Termination::Checkmate));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_finished_game_rejects_moves() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"]);
        assert_eq!(game.status(), Status::WinWhite);

        let any = Position::standard().legal_moves()[0];
        assert_eq!(game.advance(any), Err(GameError::Finished(Status::WinWhite)));
        assert_eq!(game.move_count(), 7);
        assert_eq!(
            game.conclude(Status::Draw),
            Err(GameError::Finished(Status::WinWhite))
        );
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut game = Game::new();
        play(&mut game, &["e2e4"]);

        // A white move offered while Black is to move.
        let stale = Position::standard()
            .parse_lan("d2d4")
            .expect("d2d4 is legal from the start");
        assert_eq!(game.advance(stale), Err(GameError::IllegalMove(stale)));
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn test_conclude() {
        let mut game = Game::new();
        assert_eq!(
            game.conclude(Status::NotFinished),
            Err(GameError::NotTerminal(Status::NotFinished))
        );

        game.conclude(Status::WinBlack).expect("game should accept a resignation");
        assert_eq!(game.status(), Status::WinBlack);
        assert_eq!(game.termination(), Some(Termination::Declared));
    }

    #[test]
    fn test_fivefold_repetition() {
        let mut game = Game::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

        for _ in 0..3 {
            assert_eq!(play(&mut game, &shuffle), Status::NotFinished);
        }
        assert_eq!(game.repetition_count(), 4);

        assert_eq!(play(&mut game, &shuffle), Status::Draw);
        assert_eq!(game.termination(), Some(Termination::FivefoldRepetition));
        assert_eq!(game.move_count(), 16);
    }

    #[test]
    fn test_insufficient_material_after_capture() {
        let mut game = Game::new();
        // Kxd2 leaves bare kings.
        game.position = Position::from_fen("4k3/8/8/8/8/8/3q4/4K3 w - - 0 1")
            .expect("Failed to parse FEN");
        game.repetitions = vec![game.position.repetition_key()];

        let status = play(&mut game, &["e1d2"]);
        assert_eq!(status, Status::Draw);
        assert_eq!(game.termination(), Some(Termination::InsufficientMaterial));
    }

    #[test]
    fn test_stalemate_finishes_game() {
        let mut game = Game::new();
        game.position = Position::from_fen("K7/8/8/1q6/8/8/8/2k5 b - - 0 1")
            .expect("Failed to parse FEN");
        game.repetitions = vec![game.position.repetition_key()];

        let status = play(&mut game, &["b5b6"]);
        assert_eq!(status, Status::Draw);
        assert_eq!(game.termination(), Some(Termination::Stalemate));
    }
}
