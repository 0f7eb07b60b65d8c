use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::time::Duration;

use log::info;
use owo_colors::{OwoColorize, Style};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::{occupied, ItemKind, Items};
use crate::config::Config;
use crate::env::{Board, Direction, PhaseData, SnakeData, Snapshot, Vec2D, API_VERSION};
use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Human,
    Ai,
}

impl Player {
    /// Also the order in which simultaneous ticks are executed.
    pub const ALL: [Player; 2] = [Player::Human, Player::Ai];

    pub fn opponent(self) -> Player {
        match self {
            Player::Human => Player::Ai,
            Player::Ai => Player::Human,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Label shown to the user.
    pub fn name(self) -> &'static str {
        match self {
            Player::Human => "Player",
            Player::Ai => "AI",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Normal,
    Boosted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// head to tail, never empty
    pub body: VecDeque<Vec2D>,
    /// `None` until the snake starts moving.
    pub heading: Option<Direction>,
    pub score: u32,
    /// Game time at which the current boost runs out.
    pub boost_until: Option<Duration>,
}

impl Snake {
    pub fn new(start: Vec2D, heading: Option<Direction>) -> Snake {
        Snake {
            body: VecDeque::from(vec![start]),
            heading,
            score: 0,
            boost_until: None,
        }
    }

    pub fn head(&self) -> Vec2D {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn speed(&self, now: Duration) -> Speed {
        match self.boost_until {
            Some(until) if now < until => Speed::Boosted,
            _ => Speed::Normal,
        }
    }

    /// Removes the last segment, keeping at least the head.
    pub fn shrink(&mut self) -> bool {
        if self.body.len() > 1 {
            self.body.pop_back();
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// The loser hit a wall or a body.
    Crashed,
    /// The winner collected enough fruits.
    WinScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Ended { winner: Player, cause: Cause },
}

/// Result of a single simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Snake has no heading yet and stays in place.
    Idle,
    Moved { head: Vec2D, ate: Option<ItemKind> },
    Crashed { at: Vec2D },
}

/// The complete simulation context: both snakes, items, scores and phase.
#[derive(Clone)]
pub struct Game {
    pub config: Config,
    /// Indexed by [Player::index].
    pub snakes: [Snake; 2],
    pub items: Items,
    pub phase: Phase,
    rng: SmallRng,
}

impl Game {
    /// Creates a new game with reproducible item spawns.
    pub fn new(config: Config, seed: u64) -> Result<Game> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: Config) -> Result<Game> {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    fn with_rng(config: Config, rng: SmallRng) -> Result<Game> {
        config.validate()?;
        let mut game = Game {
            snakes: Self::start_snakes(&config),
            config,
            items: Items::new(),
            phase: Phase::Running,
            rng,
        };
        game.replenish();
        Ok(game)
    }

    fn start_snakes(config: &Config) -> [Snake; 2] {
        [
            Snake::new(config.human_start, config.human_heading),
            Snake::new(config.ai_start(), None),
        ]
    }

    /// Reinitializes snakes, scores, boosts and items.
    pub fn reset(&mut self) {
        self.snakes = Self::start_snakes(&self.config);
        self.items.clear();
        self.phase = Phase::Running;
        self.replenish();
    }

    pub fn snake(&self, player: Player) -> &Snake {
        &self.snakes[player.index()]
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            Phase::Running => None,
            Phase::Ended { winner, .. } => Some(winner),
        }
    }

    /// Human readable reason for the end of the game.
    pub fn message(&self) -> Option<String> {
        match self.phase {
            Phase::Running => None,
            Phase::Ended {
                winner,
                cause: Cause::Crashed,
            } => Some(format!("{} crashed!", winner.opponent())),
            Phase::Ended {
                winner,
                cause: Cause::WinScore,
            } => Some(format!(
                "{} collected {} fruits!",
                winner, self.config.win_score
            )),
        }
    }

    /// Changes the heading from user input.
    ///
    /// Turns along the current axis of travel are ignored and `false` is
    /// returned.
    pub fn steer(&mut self, player: Player, dir: Direction) -> Result<bool> {
        self.ensure_running()?;
        let snake = &mut self.snakes[player.index()];
        match snake.heading {
            Some(current) if current.same_axis(dir) => Ok(false),
            _ => {
                snake.heading = Some(dir);
                Ok(true)
            }
        }
    }

    /// Changes the heading without the reversal check.
    pub fn set_heading(&mut self, player: Player, dir: Direction) -> Result<()> {
        self.ensure_running()?;
        self.snakes[player.index()].heading = Some(dir);
        Ok(())
    }

    /// Current tick interval of a snake.
    pub fn interval(&self, player: Player, now: Duration) -> Duration {
        match self.snake(player).speed(now) {
            Speed::Normal => self.config.tick(),
            Speed::Boosted => self.config.boosted_tick(),
        }
    }

    pub fn has(&self, p: Vec2D) -> bool {
        p.within(self.config.width, self.config.height)
    }

    /// Returns if any snake segment is on `p`.
    pub fn is_body(&self, p: Vec2D) -> bool {
        occupied(p, self.snakes.iter().flat_map(|s| s.body.iter()))
    }

    /// Moves that do not immediately crash the snake.
    pub fn valid_moves(&self, player: Player) -> impl Iterator<Item = Direction> + '_ {
        let head = self.snake(player).head();
        Direction::iter().filter(move |&d| {
            let p = head.apply(d);
            self.has(p) && !self.is_body(p)
        })
    }

    /// Moves the snake of `player` one cell and resolves collisions,
    /// item effects and the end of the game.
    ///
    /// `now` is the game time of this tick, used for the boost duration.
    pub fn step(&mut self, player: Player, now: Duration) -> Result<Step> {
        self.ensure_running()?;

        let Some(dir) = self.snakes[player.index()].heading else {
            return Ok(Step::Idle);
        };
        let head = self.snake(player).head().apply(dir);
        let inside = self.has(head);

        let (own, other) = Self::pair_mut(&mut self.snakes, player);
        if !inside
            || occupied(head, &own.body)
            || occupied(head, &other.body)
        {
            self.phase = Phase::Ended {
                winner: player.opponent(),
                cause: Cause::Crashed,
            };
            info!("{} crashed at {:?}", player, head);
            return Ok(Step::Crashed { at: head });
        }

        own.body.push_front(head);

        let ate = self.items.take(head);
        let mut won = false;
        match ate {
            Some(ItemKind::Fruit) => {
                own.score += 1;
                won = own.score >= self.config.win_score;
            }
            Some(ItemKind::PowerUp) => {
                own.boost_until = Some(now + self.config.boost_duration());
            }
            Some(ItemKind::Shrink) => {
                other.score = other.score.saturating_sub(1);
                other.shrink();
            }
            None => {}
        }
        if ate != Some(ItemKind::Fruit) {
            own.body.pop_back();
        }

        if won {
            self.phase = Phase::Ended {
                winner: player,
                cause: Cause::WinScore,
            };
            info!("{} reached {} points", player, self.config.win_score);
        }

        self.replenish();
        Ok(Step::Moved { head, ate })
    }

    /// Mutable access to the acting snake and its opponent.
    fn pair_mut(snakes: &mut [Snake; 2], player: Player) -> (&mut Snake, &mut Snake) {
        let [human, ai] = snakes;
        match player {
            Player::Human => (human, ai),
            Player::Ai => (ai, human),
        }
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(Error::GameOver)
        }
    }

    fn replenish(&mut self) {
        let snakes = &self.snakes;
        self.items.replenish(&self.config, &mut self.rng, |p| {
            occupied(p, snakes.iter().flat_map(|s| s.body.iter()))
        });
    }

    /// State for the presentation layer at game time `now`.
    pub fn snapshot(&self, now: Duration) -> Snapshot {
        let snake_data = |player: Player| {
            let snake = self.snake(player);
            SnakeData {
                name: player.name().into(),
                body: snake.body.iter().copied().collect(),
                score: snake.score,
                boosted: snake.speed(now) == Speed::Boosted,
                heading: snake.heading,
            }
        };
        Snapshot {
            apiversion: API_VERSION.into(),
            board: Board {
                width: self.config.width,
                height: self.config.height,
                fruits: self.items.pool(ItemKind::Fruit).to_vec(),
                power_ups: self.items.pool(ItemKind::PowerUp).to_vec(),
                shrinks: self.items.pool(ItemKind::Shrink).to_vec(),
            },
            human: snake_data(Player::Human),
            ai: snake_data(Player::Ai),
            win_score: self.config.win_score,
            phase: match self.phase {
                Phase::Running => PhaseData::Running,
                Phase::Ended { winner, .. } => PhaseData::Ended {
                    winner: winner.name().into(),
                    cause: self.message().unwrap_or_default(),
                },
            },
        }
    }
}

impl Game {
    /// Parses textual human readable board representation used in tests.
    ///
    /// `0` and `1` are the heads of the human and the ai, arrows are body
    /// parts pointing towards the head. `o` is a fruit, `*` a power-up and
    /// `x` a shrink item. The first line is `y = 0`.
    /// Width and height of `config` are replaced, items are not replenished
    /// until the first step.
    pub fn parse(txt: &str, mut config: Config) -> Option<Game> {
        #[derive(PartialEq)]
        enum RawCell {
            Free,
            Item(ItemKind),
            Head(usize),
            Body(Direction),
        }

        let txt = txt.trim();
        let raw_cells: Vec<RawCell> = txt
            .lines()
            .flat_map(|l| {
                l.split_whitespace().flat_map(|s| {
                    s.chars().next().map(|c| match c {
                        'o' => RawCell::Item(ItemKind::Fruit),
                        '*' => RawCell::Item(ItemKind::PowerUp),
                        'x' => RawCell::Item(ItemKind::Shrink),
                        '0' => RawCell::Head(0),
                        '1' => RawCell::Head(1),
                        '^' => RawCell::Body(Direction::Up),
                        '>' => RawCell::Body(Direction::Right),
                        'v' => RawCell::Body(Direction::Down),
                        '<' => RawCell::Body(Direction::Left),
                        _ => RawCell::Free,
                    })
                })
            })
            .collect();
        let height = txt.lines().count();

        if height == 0 || raw_cells.len() % height != 0 {
            return None;
        }
        let width = raw_cells.len() / height;
        let at = |i: usize| Vec2D::new((i % width) as _, (i / width) as _);

        let mut items = Items::new();
        for (i, cell) in raw_cells.iter().enumerate() {
            if let RawCell::Item(kind) = cell {
                items.push(*kind, at(i));
            }
        }

        let mut bodies = Vec::with_capacity(2);
        for id in 0..2 {
            let mut p = at(raw_cells.iter().position(|c| *c == RawCell::Head(id))?);
            let mut body = VecDeque::new();
            body.push_back(p);
            while let Some(next) = Direction::iter().find_map(|d| {
                let next = p.apply(d);
                if next.within(width, height)
                    && !body.contains(&next)
                    && raw_cells[next.x as usize + next.y as usize * width]
                        == RawCell::Body(d.invert())
                {
                    Some(next)
                } else {
                    None
                }
            }) {
                p = next;
                body.push_back(p);
            }
            bodies.push(body);
        }

        config.width = width;
        config.height = height;
        let mut snakes = Self::start_snakes(&config);
        for (snake, body) in snakes.iter_mut().zip(bodies) {
            if body.len() > 1 {
                snake.heading = Some(Direction::from(body[0] - body[1]));
            }
            snake.body = body;
        }

        Some(Game {
            config,
            snakes,
            items,
            phase: Phase::Running,
            rng: SmallRng::seed_from_u64(0),
        })
    }
}

impl Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum FmtCell {
            Free,
            Item(ItemKind),
            Body(Direction, Player),
            Head(Player),
        }
        fn player_color(player: Player) -> Style {
            match player {
                Player::Human => Style::new().green(),
                Player::Ai => Style::new().red(),
            }
        }
        impl Debug for FmtCell {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    FmtCell::Free => write!(f, "."),
                    FmtCell::Item(ItemKind::Fruit) => write!(f, "{}", "o".yellow()),
                    FmtCell::Item(ItemKind::PowerUp) => write!(f, "{}", "*".bright_yellow()),
                    FmtCell::Item(ItemKind::Shrink) => write!(f, "{}", "x".bright_green()),
                    FmtCell::Body(dir, player) => match dir {
                        Direction::Up => write!(f, "{}", "^".style(player_color(*player))),
                        Direction::Right => write!(f, "{}", ">".style(player_color(*player))),
                        Direction::Down => write!(f, "{}", "v".style(player_color(*player))),
                        Direction::Left => write!(f, "{}", "<".style(player_color(*player))),
                    },
                    FmtCell::Head(player) => {
                        write!(f, "{}", player.index().style(player_color(*player)))
                    }
                }
            }
        }

        let width = self.config.width;
        let mut cells = vec![FmtCell::Free; width * self.config.height];
        let offset = |p: Vec2D| p.x as usize + p.y as usize * width;

        for item in self.items.iter() {
            cells[offset(item.pos)] = FmtCell::Item(item.kind);
        }
        for player in Player::ALL {
            let body = &self.snake(player).body;
            for (next, p) in body.iter().zip(body.iter().skip(1)) {
                if next != p {
                    cells[offset(*p)] = FmtCell::Body(Direction::from(*next - *p), player);
                }
            }
            cells[offset(body[0])] = FmtCell::Head(player);
        }

        writeln!(f, "Game {{")?;
        for row in cells.chunks(width) {
            write!(f, "  ")?;
            for cell in row {
                write!(f, "{:?} ", cell)?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "  Scores: [{}: {}, {}: {}]",
            Player::Human,
            self.snakes[0].score,
            Player::Ai,
            self.snakes[1].score
        )?;
        if let Some(message) = self.message() {
            writeln!(f, "  Ended: {}", message)?;
        }
        writeln!(f, "}}")
    }
}
