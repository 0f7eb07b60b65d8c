use log::{debug, trace};

use super::select_target;
use crate::env::Direction;
use crate::game::{Game, Grid, Player};

/// Chases the highest priority item along the shortest path.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AStarAgent {
    /// Obstacle buffer reused between ticks.
    #[serde(skip)]
    grid: Grid,
}

impl AStarAgent {
    /// Next heading of `player` or `None` to keep the current one.
    pub fn step(&mut self, game: &Game, player: Player) -> Option<Direction> {
        let you = game.snake(player);
        let head = you.head();

        let Some(target) = select_target(head, game.items.by_priority()) else {
            debug!("{}: no items left", player);
            return None;
        };

        if self.grid.width != game.config.width || self.grid.height != game.config.height {
            self.grid = Grid::new(game.config.width, game.config.height);
        } else {
            self.grid.clear();
        }
        self.grid
            .add_obstacles(game.snake(player.opponent()).body.iter().copied());
        // the own head is never an obstacle to itself
        self.grid.add_obstacles(you.body.iter().skip(1).copied());

        let path = self.grid.a_star(head, target.pos);
        trace!("{}: path to {:?} {:?}", player, target, path);

        match path.first() {
            Some(&next) => Some(Direction::from(next - head)),
            None => {
                debug!("{}: no path to {:?}", player, target.pos);
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::env::v2;
    use crate::game::ItemKind;
    use Direction::*;

    fn quiet() -> Config {
        Config {
            fruits: 0,
            power_ups: 0,
            shrinks: 0,
            ..Config::default()
        }
    }

    #[test]
    fn astar_follows_path() {
        let game = Game::parse(
            r#"
            . . . . . . .
            . 0 < . . . .
            . . . . . . .
            . . . . . . .
            . . . . . * .
            . . . . . . 1"#,
            quiet(),
        )
        .unwrap();
        let mut agent = AStarAgent::default();
        // power-up is the only item, reached through up or left
        let dir = agent.step(&game, Player::Ai).unwrap();
        assert!(dir == Up || dir == Left, "{:?}", dir);
    }

    #[test]
    fn astar_prefers_fruit() {
        let game = Game::parse(
            r#"
            o . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . 0 . . .
            . . . ^ x . .
            . . . ^ . . 1"#,
            quiet(),
        )
        .unwrap();
        let mut agent = AStarAgent::default();
        // the shrink item is much closer but the fruit wins
        let dir = agent.step(&game, Player::Human).unwrap();
        assert!(dir == Up || dir == Left, "{:?}", dir);

        let mut game = game;
        game.items.take(v2(0, 0));
        assert_eq!(agent.step(&game, Player::Human), Some(Right));
    }

    #[test]
    fn astar_avoids_bodies() {
        let game = Game::parse(
            r#"
            . . . . . . .
            . . . v . . .
            . . . v . . .
            1 . . 0 . o .
            . . . . . . ."#,
            quiet(),
        )
        .unwrap();
        // human blocks the straight way of the ai along row 3
        let mut agent = AStarAgent::default();
        let mut game = game;
        let mut steps = 0;
        while game.snakes[1].score == 0 {
            let dir = agent.step(&game, Player::Ai).unwrap();
            game.set_heading(Player::Ai, dir).unwrap();
            game.step(Player::Ai, Default::default()).unwrap();
            assert!(game.is_running());
            steps += 1;
        }
        assert_eq!(steps, 7);
    }

    #[test]
    fn astar_walks_around_own_body() {
        let game = Game::parse(
            r#"
            . . . . . .
            . v < < . .
            . v . ^ . .
            . 1 . ^ o .
            . . . . . 0"#,
            quiet(),
        )
        .unwrap();
        let mut agent = AStarAgent::default();
        let mut game = game;
        let mut steps = 0;
        while game.items.pool(ItemKind::Fruit).len() == 1 {
            let dir = agent.step(&game, Player::Ai).unwrap();
            game.set_heading(Player::Ai, dir).unwrap();
            game.step(Player::Ai, Default::default()).unwrap();
            steps += 1;
            assert!(steps < 10);
        }
        assert!(game.is_running());
        assert_eq!(game.snakes[1].score, 1);
    }

    #[test]
    fn astar_boxed_in() {
        let game = Game::parse(
            r#"
            . . . . . .
            . > > v . .
            . 0 1 v . .
            . ^ < < . .
            . . . . o ."#,
            quiet(),
        )
        .unwrap();
        let mut agent = AStarAgent::default();
        assert_eq!(agent.step(&game, Player::Ai), None);
    }

    #[test]
    fn astar_no_items() {
        let game = Game::parse(
            r#"
            . . . .
            . 0 . .
            . . . 1"#,
            quiet(),
        )
        .unwrap();
        let mut agent = AStarAgent::default();
        assert_eq!(agent.step(&game, Player::Ai), None);
    }
}
