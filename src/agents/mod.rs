use std::fmt;
use std::str::FromStr;

mod astar;
pub use astar::*;
mod random;
pub use random::*;
mod target;
pub use target::*;

use crate::env::Direction;
use crate::game::{Game, Player};

/// Controller of a snake, configurable as json (`{"AStar":{}}`, `{"Random":null}`).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Agent {
    AStar(AStarAgent),
    Random(RandomAgent),
}

impl Default for Agent {
    fn default() -> Self {
        Self::AStar(AStarAgent::default())
    }
}

impl Agent {
    /// Decides the next heading of `player`.
    /// `None` means the current heading is kept.
    pub fn step(&mut self, game: &Game, player: Player) -> Option<Direction> {
        match self {
            Agent::AStar(agent) => agent.step(game, player),
            Agent::Random(agent) => agent.step(game, player),
        }
    }
}

impl FromStr for Agent {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}
