use crate::errors::{FatalError, GameError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Queue link value meaning "no game"
pub const NO_FIFO_INDEX: &str = "-1";

/// Textual layout of [`StoredGame::deadline`], always UTC with nanoseconds
pub const DEADLINE_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.9f +0000 UTC";

/// Accepts any fraction length, including none, so deadlines written with
/// trailing zeros trimmed still parse
const DEADLINE_PARSE_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f +0000 UTC";

/// Player colors plus the "nobody" tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    Red,
    NoPlayer,
}

impl Player {
    pub fn tag(&self) -> &'static str {
        match self {
            Player::Black => "b",
            Player::Red => "r",
            Player::NoPlayer => "*",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "b" => Some(Player::Black),
            "r" => Some(Player::Red),
            "*" => Some(Player::NoPlayer),
            _ => None,
        }
    }

    /// The other color; `None` for [`Player::NoPlayer`]
    pub fn opponent(&self) -> Option<Self> {
        match self {
            Player::Black => Some(Player::Red),
            Player::Red => Some(Player::Black),
            Player::NoPlayer => None,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Player::Black => "black",
            Player::Red => "red",
            Player::NoPlayer => "none",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Board coordinate, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An amount of a single denomination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

impl Coin {
    pub fn new(amount: u64, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Persisted game record. The `before_index`/`after_index` links are owned by
/// the deadline queue in [`crate::games::fifo`]; nothing else writes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredGame {
    pub index: String,
    pub board: String,
    pub turn: String,
    pub black: String,
    pub red: String,
    pub move_count: u64,
    pub before_index: String,
    pub after_index: String,
    pub deadline: String,
    pub winner: String,
    pub wager: u64,
    pub denom: String,
}

impl StoredGame {
    pub fn black_address(&self) -> Result<&str, GameError> {
        validate_address(&self.black).map_err(GameError::InvalidBlack)
    }

    pub fn red_address(&self) -> Result<&str, GameError> {
        validate_address(&self.red).map_err(GameError::InvalidRed)
    }

    /// Address of the player named by `winner`; `None` when there is no winner yet
    pub fn winner_address(&self) -> Result<Option<&str>, FatalError> {
        match Player::from_tag(&self.winner) {
            Some(Player::Black) => Ok(Some(self.black.as_str())),
            Some(Player::Red) => Ok(Some(self.red.as_str())),
            Some(Player::NoPlayer) => Ok(None),
            None => Err(FatalError::CannotFindWinnerByColor(self.winner.clone())),
        }
    }

    pub fn player_address(&self, player: Player) -> Option<&str> {
        match player {
            Player::Black => Some(&self.black),
            Player::Red => Some(&self.red),
            Player::NoPlayer => None,
        }
    }

    pub fn wager_coin(&self) -> Coin {
        Coin::new(self.wager, self.denom.clone())
    }

    pub fn has_winner(&self) -> bool {
        self.winner != Player::NoPlayer.tag()
    }

    pub fn deadline_as_time(&self) -> Result<DateTime<Utc>, FatalError> {
        parse_deadline(&self.deadline).ok_or_else(|| FatalError::InvalidDeadline {
            index: self.index.clone(),
            value: self.deadline.clone(),
        })
    }

    pub fn validate(&self) -> Result<(), GameError> {
        self.black_address()?;
        self.red_address()?;
        Ok(())
    }
}

/// Singleton counter: next id plus the two ends of the deadline queue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemInfo {
    pub next_id: u64,
    pub fifo_head_index: String,
    pub fifo_tail_index: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            next_id: 1,
            fifo_head_index: NO_FIFO_INDEX.to_string(),
            fifo_tail_index: NO_FIFO_INDEX.to_string(),
        }
    }
}

impl SystemInfo {
    pub fn fifo_is_empty(&self) -> bool {
        self.fifo_head_index == NO_FIFO_INDEX && self.fifo_tail_index == NO_FIFO_INDEX
    }
}

pub fn format_deadline(deadline: DateTime<Utc>) -> String {
    deadline.format(DEADLINE_LAYOUT).to_string()
}

pub fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, DEADLINE_PARSE_LAYOUT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Accounts are lowercase alphanumeric identifiers, optionally with a `1`
/// separated human readable prefix as in bech32.
fn validate_address(address: &str) -> Result<&str, String> {
    if address.is_empty() {
        return Err("empty address".to_string());
    }
    if address.len() > 90 {
        return Err(format!("{} (too long)", address));
    }
    if !address
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(address.to_string());
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_game() -> StoredGame {
        StoredGame {
            index: "1".to_string(),
            board: String::new(),
            turn: "b".to_string(),
            black: "alice".to_string(),
            red: "bob".to_string(),
            move_count: 0,
            before_index: NO_FIFO_INDEX.to_string(),
            after_index: NO_FIFO_INDEX.to_string(),
            deadline: format_deadline(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            winner: "*".to_string(),
            wager: 45,
            denom: "stake".to_string(),
        }
    }

    #[test]
    fn test_deadline_layout_round_trips() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::nanoseconds(1);
        let raw = format_deadline(time);

        assert_eq!(raw, "2024-01-02 03:04:05.000000001 +0000 UTC");
        assert_eq!(parse_deadline(&raw), Some(time));
    }

    #[test]
    fn test_deadline_with_trimmed_fraction_parses() {
        let base = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();

        assert_eq!(
            parse_deadline("2024-03-02 12:00:00.5 +0000 UTC"),
            Some(base + chrono::Duration::milliseconds(500))
        );
        assert_eq!(parse_deadline("2024-03-02 12:00:00 +0000 UTC"), Some(base));
        assert_eq!(
            parse_deadline("2024-03-02 12:00:00.000000000 +0000 UTC"),
            Some(base)
        );
    }

    #[test]
    fn test_unparseable_deadline_is_fatal() {
        let mut game = sample_game();
        game.deadline = "tomorrow".to_string();
        assert!(matches!(
            game.deadline_as_time(),
            Err(FatalError::InvalidDeadline { .. })
        ));
    }

    #[test]
    fn test_winner_address() {
        let mut game = sample_game();
        assert_eq!(game.winner_address().unwrap(), None);

        game.winner = "r".to_string();
        assert_eq!(game.winner_address().unwrap(), Some("bob"));

        game.winner = "x".to_string();
        assert_eq!(
            game.winner_address(),
            Err(FatalError::CannotFindWinnerByColor("x".to_string()))
        );
    }

    #[test]
    fn test_validate_addresses() {
        let mut game = sample_game();
        assert!(game.validate().is_ok());

        game.red = "Not Valid".to_string();
        assert_eq!(
            game.validate(),
            Err(GameError::InvalidRed("Not Valid".to_string()))
        );
    }

    #[test]
    fn test_opponents() {
        assert_eq!(Player::Black.opponent(), Some(Player::Red));
        assert_eq!(Player::Red.opponent(), Some(Player::Black));
        assert_eq!(Player::NoPlayer.opponent(), None);
        assert_eq!(Player::from_tag("r"), Some(Player::Red));
        assert_eq!(Player::from_tag("?"), None);
    }
}
