//! Game settings read from the environment.
//!
//! | variable               | default | meaning                                  |
//! |------------------------|---------|------------------------------------------|
//! | `ATAXX_BOARD_SIZE`     | 9       | board edge length                        |
//! | `ATAXX_HOLES`          | `e5`    | comma/space separated cells, or `none`   |
//! | `ATAXX_MOVE_DELAY_MS`  | 800     | minimum time between displayed moves     |
//! | `ATAXX_THINK_LIMIT_MS` | 10000   | advisory think-time budget per move      |
//! | `ATAXX_SEED`           | clock   | seed for the random bots                 |
//!
//! Unparsable numbers fall back to their defaults. A bad hole list is an error,
//! since silently dropping holes would change the game.

use std::time::Duration;

use crate::core::{Board, BoardError};
use crate::types::{
    ParsePositionError, Position, DEFAULT_BOARD_SIZE, MAX_THINKING_TIME_MS, MOVE_DELAY_MS,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ATAXX_HOLES: {0}")]
    Hole(#[from] ParsePositionError),
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub size: usize,
    pub holes: Vec<Position>,
    pub move_delay: Duration,
    pub think_limit: Duration,
    /// `None` seeds from the clock.
    pub seed: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mid = (DEFAULT_BOARD_SIZE / 2) as i8;
        Self {
            size: DEFAULT_BOARD_SIZE,
            holes: vec![Position::new(mid, mid)],
            move_delay: Duration::from_millis(MOVE_DELAY_MS),
            think_limit: Duration::from_millis(MAX_THINKING_TIME_MS),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        let size = number("ATAXX_BOARD_SIZE")
            .map(|n| n as usize)
            .unwrap_or(defaults.size);
        let holes = match lookup("ATAXX_HOLES") {
            Some(list) => parse_holes(&list)?,
            None if size == DEFAULT_BOARD_SIZE => defaults.holes,
            None => Vec::new(),
        };
        let move_delay = number("ATAXX_MOVE_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.move_delay);
        let think_limit = number("ATAXX_THINK_LIMIT_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.think_limit);
        let seed = lookup("ATAXX_SEED").and_then(|s| s.trim().parse().ok());

        Ok(Self {
            size,
            holes,
            move_delay,
            think_limit,
            seed,
        })
    }

    /// Initial board for this configuration.
    pub fn build_board(&self) -> Result<Board, ConfigError> {
        Ok(Board::new(self.size, self.holes.iter().copied())?)
    }
}

/// Parse `"e5, c3 g7"` into cells. `none` and the empty string mean no holes.
pub fn parse_holes(list: &str) -> Result<Vec<Position>, ParsePositionError> {
    let list = list.trim();
    if list.is_empty() || list.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
