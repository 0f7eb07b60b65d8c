use rand::{rngs::SmallRng, seq::IteratorRandom, SeedableRng};

use crate::env::Direction;
use crate::game::{Game, Player};

/// Picks any move that does not crash immediately.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RandomAgent;

impl RandomAgent {
    pub fn step(&self, game: &Game, player: Player) -> Option<Direction> {
        let mut rng = SmallRng::from_entropy();
        game.valid_moves(player).choose(&mut rng)
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn random_valid() {
        use super::*;
        use crate::config::Config;
        use Direction::*;

        let game = Game::parse(
            r#"
            . 1 .
            . > 0
            . . ."#,
            Config::default(),
        )
        .unwrap();
        for _ in 0..20 {
            let dir = RandomAgent.step(&game, Player::Human).unwrap();
            assert!(dir == Up || dir == Down, "{:?}", dir);
        }

        let game = Game::parse("1 0 <", Config::default()).unwrap();
        assert_eq!(RandomAgent.step(&game, Player::Human), None);
    }
}
