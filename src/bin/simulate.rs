use std::time::{Duration, Instant};

use clap::Parser;
use owo_colors::OwoColorize;

use snakerace::agents::Agent;
use snakerace::config::Config;
use snakerace::game::{Game, Player};
use snakerace::session::Session;

#[derive(Debug, Parser)]
#[command(
    name = "snakerace simulator",
    about = "Simulate games between two agents on a virtual clock."
)]
struct Opts {
    /// Game configuration as json.
    #[arg(long, default_value_t)]
    config: Config,
    /// Controller of the ai snake.
    #[arg(long, default_value_t)]
    ai: Agent,
    /// Controller of the human snake.
    #[arg(long, default_value = r#"{"Random":null}"#)]
    human: Agent,
    #[arg(short, long, default_value = "1")]
    game_count: usize,
    /// Seed of the first game, incremented for every following game.
    #[arg(short, long, default_value = "0")]
    seed: u64,
    /// Games are aborted after this many seconds of game time.
    #[arg(long, default_value = "600")]
    max_time: u64,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    snakerace::logging();

    let Opts {
        config,
        ai,
        human,
        game_count,
        seed,
        max_time,
        verbose,
    } = Opts::parse();

    let start = Instant::now();
    let mut wins = [0; 2];

    for i in 0..game_count {
        let game = Game::new(config.clone(), seed + i as u64)?;
        let winner = play_game(
            game,
            ai.clone(),
            human.clone(),
            Duration::from_secs(max_time),
            verbose,
        );
        if let Some(winner) = winner {
            wins[winner.index()] += 1;
        }
        println!(
            "{}: {} {}ms",
            "Finish Game".bright_green(),
            i,
            start.elapsed().as_millis()
        );
    }

    println!(
        "Result: {} {} / {} {} / {} draws",
        Player::Human.green(),
        wins[0],
        Player::Ai.red(),
        wins[1],
        game_count - wins[0] - wins[1]
    );
    Ok(())
}

fn play_game(
    game: Game,
    ai: Agent,
    human: Agent,
    max_time: Duration,
    verbose: bool,
) -> Option<Player> {
    let mut session = Session::new(game, ai, Some(human));

    if verbose {
        println!("init: {:?}", session.game());
    }

    while let Some(deadline) = session.next_deadline() {
        if deadline > max_time {
            println!("game: aborted after {}s", max_time.as_secs());
            return None;
        }
        session.advance(deadline);
        if verbose {
            println!("{}ms: {:?}", deadline.as_millis(), session.game());
        }
    }

    let game = session.game();
    if let Some(message) = game.message() {
        println!("game: {} after {}ms", message, session.now().as_millis());
    }
    game.winner()
}
