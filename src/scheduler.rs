use std::time::Duration;

use crate::game::{Game, Player};

/// Tick deadlines of both snakes on the game clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    next: [Duration; 2],
}

impl Scheduler {
    /// The first tick of each snake is one interval after `now`.
    pub fn start(now: Duration, game: &Game) -> Scheduler {
        Scheduler {
            next: Player::ALL.map(|p| now + game.interval(p, now)),
        }
    }

    /// The earliest deadline. The human goes first if both are due together.
    pub fn next(&self) -> (Duration, Player) {
        Player::ALL
            .into_iter()
            .map(|p| (self.next[p.index()], p))
            .min_by_key(|(at, _)| *at)
            .unwrap_or((self.next[0], Player::Human))
    }

    /// The earliest deadline if it is not after `now`.
    pub fn due(&self, now: Duration) -> Option<(Duration, Player)> {
        let (at, player) = self.next();
        (at <= now).then_some((at, player))
    }

    /// Schedules the next tick of `player` one `interval` after `at`.
    pub fn reschedule(&mut self, player: Player, at: Duration, interval: Duration) {
        self.next[player.index()] = at + interval;
    }

    pub fn deadline(&self, player: Player) -> Duration {
        self.next[player.index()]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn scheduler_order() {
        let game = Game::new(Config::default(), 0).unwrap();
        let mut clock = Scheduler::start(Duration::ZERO, &game);
        assert_eq!(clock.next(), (ms(200), Player::Human));
        assert_eq!(clock.due(ms(199)), None);
        assert_eq!(clock.due(ms(200)), Some((ms(200), Player::Human)));

        clock.reschedule(Player::Human, ms(200), ms(100));
        assert_eq!(clock.next(), (ms(200), Player::Ai));
        clock.reschedule(Player::Ai, ms(200), ms(200));
        assert_eq!(clock.next(), (ms(300), Player::Human));
        assert_eq!(clock.deadline(Player::Ai), ms(400));
    }

    #[test]
    fn scheduler_start_later() {
        let game = Game::new(Config::default(), 0).unwrap();
        let clock = Scheduler::start(ms(1000), &game);
        assert_eq!(clock.deadline(Player::Human), ms(1200));
        assert_eq!(clock.deadline(Player::Ai), ms(1200));
    }
}
