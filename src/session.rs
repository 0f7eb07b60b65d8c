use std::time::Duration;

use log::{debug, info, warn};

use crate::agents::Agent;
use crate::env::{Direction, Snapshot};
use crate::error::Result;
use crate::game::{Game, Player, Step};
use crate::scheduler::Scheduler;

/// Owns a running game together with its controllers and clock.
///
/// The ai snake is always driven by `ai`. The human snake follows user
/// input, or `autopilot` if present.
#[derive(Debug)]
pub struct Session {
    game: Game,
    ai: Agent,
    autopilot: Option<Agent>,
    clock: Scheduler,
    now: Duration,
}

impl Session {
    /// Starts the clock at zero.
    pub fn new(game: Game, ai: Agent, autopilot: Option<Agent>) -> Session {
        let clock = Scheduler::start(Duration::ZERO, &game);
        Session {
            game,
            ai,
            autopilot,
            clock,
            now: Duration::ZERO,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Game time of the last processed tick.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// When the next tick is due, `None` once the game ended.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.game.is_running().then(|| self.clock.next().0)
    }

    /// Executes all ticks that are due until `now` in order.
    /// Returns the number of executed ticks.
    pub fn advance(&mut self, now: Duration) -> usize {
        let mut ticks = 0;
        while self.game.is_running() {
            let Some((at, player)) = self.clock.due(now) else {
                break;
            };
            self.now = at;
            match self.tick(player, at) {
                Ok(step) => debug!("{:?}ms {}: {:?}", at.as_millis(), player, step),
                Err(e) => {
                    warn!("tick of {} failed: {}", player, e);
                    break;
                }
            }
            let interval = self.game.interval(player, at);
            self.clock.reschedule(player, at, interval);
            ticks += 1;
        }
        self.now = self.now.max(now);
        ticks
    }

    fn tick(&mut self, player: Player, at: Duration) -> Result<Step> {
        let agent = match player {
            Player::Ai => Some(&mut self.ai),
            Player::Human => self.autopilot.as_mut(),
        };
        if let Some(dir) = agent.and_then(|agent| agent.step(&self.game, player)) {
            self.game.set_heading(player, dir)?;
        }
        let step = self.game.step(player, at)?;
        if let (Step::Crashed { .. }, Some(message)) = (step, self.game.message()) {
            info!("game over after {}ms: {}", at.as_millis(), message);
        }
        Ok(step)
    }

    /// Applies user input to the human snake.
    /// Returns `false` if the turn was ignored.
    pub fn input(&mut self, dir: Direction) -> Result<bool> {
        self.game.steer(Player::Human, dir)
    }

    /// Starts a new game at `now`.
    pub fn reset(&mut self, now: Duration) {
        self.game.reset();
        self.clock = Scheduler::start(now, &self.game);
        self.now = now;
        info!("new game");
    }

    pub fn snapshot(&self) -> Snapshot {
        self.game.snapshot(self.now)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::env::v2;
    use crate::error::Error;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn quiet() -> Config {
        Config {
            fruits: 0,
            power_ups: 0,
            shrinks: 0,
            ..Config::default()
        }
    }

    #[test]
    fn session_human_moves_first() {
        let game = Game::parse(
            r#"
            . . . . . .
            . . . . . .
            . > 0 o 1 .
            . . . . . .
            o . . . . ."#,
            quiet(),
        )
        .unwrap();
        let mut session = Session::new(game, Agent::default(), None);

        assert_eq!(session.advance(ms(199)), 0);
        assert_eq!(session.next_deadline(), Some(ms(200)));
        assert_eq!(session.advance(ms(200)), 2);

        let game = session.game();
        println!("{:?}", game);
        assert_eq!(game.snakes[0].score, 1);
        assert_eq!(game.snakes[0].head(), v2(3, 2));
        assert_eq!(game.snakes[1].score, 0);
        // ai goes around the human towards the remaining fruit
        assert_eq!(game.snakes[1].head(), v2(4, 3));
        assert_eq!(session.next_deadline(), Some(ms(400)));
    }

    #[test]
    fn session_boost() {
        let config = Config {
            boost_ms: 500,
            ..quiet()
        };
        let game = Game::parse(
            r#"
            . > 0 * . . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . . . . . . 1"#,
            config,
        )
        .unwrap();
        let mut session = Session::new(game, Agent::default(), None);

        // human: 200 300 400 500 600 700 900, ai: 200 400 600 800 1000
        assert_eq!(session.advance(ms(1000)), 12);
        assert_eq!(session.game().snakes[0].head(), v2(9, 0));
        assert_eq!(session.game().snakes[1].head(), v2(19, 2));
        assert_eq!(session.next_deadline(), Some(ms(1100)));
        assert!(!session.snapshot().human.boosted);
    }

    #[test]
    fn session_end_and_reset() {
        let config = Config {
            width: 8,
            height: 8,
            human_start: v2(5, 1),
            ai_start: Some(v2(0, 7)),
            ..Config::default()
        };
        let game = Game::new(config, 9).unwrap();
        let mut session = Session::new(game, Agent::default(), None);
        session.input(Direction::Up).unwrap();

        session.advance(ms(10_000));
        assert!(!session.game().is_running());
        assert_eq!(session.game().winner(), Some(Player::Ai));
        assert_eq!(session.next_deadline(), None);
        assert_eq!(session.advance(ms(20_000)), 0);
        assert_eq!(session.input(Direction::Left), Err(Error::GameOver));

        session.reset(ms(20_000));
        assert!(session.game().is_running());
        assert_eq!(session.next_deadline(), Some(ms(20_200)));
        assert_eq!(session.game().snakes[0].head(), v2(5, 1));
        assert_eq!(session.game().snakes[0].score, 0);
    }

    #[test]
    fn session_autopilot() {
        let game = Game::new(Config::default(), 21).unwrap();
        let mut session = Session::new(game, Agent::default(), Some(Agent::default()));
        let mut now = Duration::ZERO;
        while let Some(deadline) = session.next_deadline() {
            now = deadline;
            session.advance(now);
            let game = session.game();
            for snake in &game.snakes {
                assert!(snake.len() >= 1);
            }
            if now > Duration::from_secs(3600) {
                break;
            }
        }
        assert!(now > Duration::ZERO);
        println!("{:?}", session.game());
    }
}
