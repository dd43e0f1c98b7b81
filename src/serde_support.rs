use crate::game::{Game, Metadata};
use crate::position::Position;
use crate::r#move::Move;
use crate::status::Status;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize Position as FEN string
impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_fen())
    }
}

/// Deserialize Position from FEN string
impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fen = String::deserialize(deserializer)?;
        Position::from_fen(&fen).map_err(D::Error::custom)
    }
}

/// Serialize Move as LAN string. A move only has meaning relative to a
/// position, so there is no standalone Deserialize.
impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_lan())
    }
}

/// Serialize Status as its PGN result token
impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.result_token())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Status::from_result_token(&token)
            .ok_or_else(|| D::Error::custom(format!("unrecognized game result '{token}'")))
    }
}

#[derive(Serialize, Deserialize)]
struct GameRecord {
    tags: Vec<(String, String)>,
    moves: Vec<String>,
    result: Status,
    #[serde(default, skip_deserializing)]
    fen: String,
}

/// Serialize Game as its tags, LAN moves, result and final FEN
impl Serialize for Game {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let record = GameRecord {
            tags: self
                .metadata()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            moves: self.moves().iter().map(Move::to_lan).collect(),
            result: self.status(),
            fen: self.position().to_fen(),
        };
        record.serialize(serializer)
    }
}

/// Deserialize Game by replaying its moves from the starting position
impl<'de> Deserialize<'de> for Game {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = GameRecord::deserialize(deserializer)?;
        let mut game = Game::with_metadata(record.tags.into_iter().collect::<Metadata>());

        for lan in &record.moves {
            let mv = game
                .position()
                .parse_lan(lan)
                .ok_or_else(|| D::Error::custom(format!("illegal move '{lan}'")))?;
            game.advance(mv).map_err(D::Error::custom)?;
        }

        if !game.is_over() && record.result.is_terminal() {
            game.conclude(record.result).map_err(D::Error::custom)?;
        }

        Ok(game)
    }
}
