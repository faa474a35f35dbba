use core::time::Duration;

use crate::core::Difficulty;

/// Knobs for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Allow ships to touch, including diagonally.
    pub allow_adjacent: bool,
    /// Shooting strategy of the computer player.
    pub difficulty: Difficulty,
    /// Pause before the computer fires, so a watcher can follow.
    pub think_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            allow_adjacent: false,
            difficulty: Difficulty::Smart,
            think_delay: Duration::from_millis(1000),
        }
    }
}

impl GameConfig {
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_adjacent(mut self, allow_adjacent: bool) -> Self {
        self.allow_adjacent = allow_adjacent;
        self
    }

    pub fn with_think_delay(mut self, think_delay: Duration) -> Self {
        self.think_delay = think_delay;
        self
    }
}
