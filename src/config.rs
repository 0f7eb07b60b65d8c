use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::{v2, Direction, Vec2D};
use crate::error::{Error, Result};
use crate::game::ItemKind;

/// Game rules and timing.
///
/// Every field has a default, so partial json like `{"win_score":5}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    /// Fruits needed to win.
    pub win_score: u32,
    /// Normal tick interval in ms.
    pub tick_ms: u64,
    /// Tick interval in ms while boosted.
    pub boosted_tick_ms: u64,
    /// How long a power-up lasts in ms.
    pub boost_ms: u64,
    pub fruits: usize,
    pub power_ups: usize,
    pub shrinks: usize,
    /// Random placement tries per item before the spawn is skipped.
    pub placement_attempts: usize,
    pub human_start: Vec2D,
    pub human_heading: Option<Direction>,
    /// Defaults to six cells away from the bottom right corner.
    pub ai_start: Option<Vec2D>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            win_score: 15,
            tick_ms: 200,
            boosted_tick_ms: 100,
            boost_ms: 5000,
            fruits: 4,
            power_ups: 2,
            shrinks: 2,
            placement_attempts: 100,
            human_start: v2(5, 5),
            human_heading: Some(Direction::Right),
            ai_start: None,
        }
    }
}

impl Config {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn boosted_tick(&self) -> Duration {
        Duration::from_millis(self.boosted_tick_ms)
    }

    pub fn boost_duration(&self) -> Duration {
        Duration::from_millis(self.boost_ms)
    }

    pub fn ai_start(&self) -> Vec2D {
        self.ai_start
            .unwrap_or_else(|| v2(self.width as i16 - 6, self.height as i16 - 6))
    }

    /// Target size of the item pool of `kind`.
    pub fn item_count(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Fruit => self.fruits,
            ItemKind::PowerUp => self.power_ups,
            ItemKind::Shrink => self.shrinks,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "grid must not be empty ({}x{})",
                self.width, self.height
            )));
        }
        if self.width > i16::MAX as usize || self.height > i16::MAX as usize {
            return Err(Error::Config(format!(
                "grid too large ({}x{})",
                self.width, self.height
            )));
        }
        if self.win_score == 0 {
            return Err(Error::Config("win score must be positive".into()));
        }
        if self.tick_ms == 0 || self.boosted_tick_ms == 0 {
            return Err(Error::Config("tick intervals must be positive".into()));
        }
        let ai_start = self.ai_start();
        for (name, p) in [("human", self.human_start), ("ai", ai_start)] {
            if !p.within(self.width, self.height) {
                return Err(Error::Config(format!(
                    "{} start {:?} is outside of the {}x{} grid",
                    name, p, self.width, self.height
                )));
            }
        }
        if self.human_start == ai_start {
            return Err(Error::Config("both snakes start on the same cell".into()));
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}
