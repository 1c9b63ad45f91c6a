/// Table parameters fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    /// Stack every seated player receives when the game starts.
    pub starting_chips: u64,
    /// Blind before the first doubling. The big blind doubles each time the button
    /// returns to the first seat, which includes the very first hand.
    pub initial_blind: u64,
    pub min_players: usize,
    pub max_players: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { starting_chips: 1000, initial_blind: 10, min_players: 2, max_players: 6 }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("a table needs at least two players, got min_players = {0}")]
    TooFewPlayers(usize),
    #[error("min_players ({min}) exceeds max_players ({max})")]
    PlayerRange { min: usize, max: usize },
    #[error("{players} players need {needed} cards, a deck has 52")]
    TooManyPlayers { players: usize, needed: usize },
    #[error("starting chips must be positive")]
    NoChips,
    #[error("initial blind must be positive")]
    NoBlind,
}

/// Cards one hand can use: two per player, five on the board and three burns.
pub const fn cards_needed(players: usize) -> usize {
    players * 2 + 5 + 3
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < 2 {
            return Err(ConfigError::TooFewPlayers(self.min_players));
        }
        if self.min_players > self.max_players {
            return Err(ConfigError::PlayerRange { min: self.min_players, max: self.max_players });
        }
        if cards_needed(self.max_players) > 52 {
            return Err(ConfigError::TooManyPlayers {
                players: self.max_players,
                needed: cards_needed(self.max_players),
            });
        }
        if self.starting_chips == 0 {
            return Err(ConfigError::NoChips);
        }
        if self.initial_blind == 0 {
            return Err(ConfigError::NoBlind);
        }
        Ok(())
    }
}
