use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};
use tokio::sync::{Mutex, Notify};
use tokio::time::{sleep_until, Instant};
use warp::http::StatusCode;
use warp::Filter;

use snakerace::agents::Agent;
use snakerace::config::Config;
use snakerace::env::{ErrorResponse, InputRequest, InputResponse};
use snakerace::game::Game;
use snakerace::session::Session;

/// Shared between the request handlers and the tick loop.
struct State {
    session: Mutex<Session>,
    /// Wakes the tick loop after a reset.
    reset: Notify,
    /// Origin of the game clock.
    start: Instant,
}

#[derive(Debug, Parser)]
#[command(name = "snakerace server", about = "Race an A* snake for fruits.")]
struct Opt {
    /// IP and Port of the webserver.
    #[arg(long, default_value = "127.0.0.1:5001")]
    host: SocketAddr,
    /// Game configuration as json.
    #[arg(long, default_value_t)]
    config: Config,
    /// Controller of the opponent as json.
    #[arg(long, default_value_t)]
    agent: Agent,
    /// Let an agent play the human snake.
    #[arg(long)]
    autopilot: Option<Agent>,
    /// Seed for the item placement.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    snakerace::logging();

    let Opt {
        host,
        config,
        agent,
        autopilot,
        seed,
    } = Opt::parse();

    info!("config {}", config);
    let game = match seed {
        Some(seed) => Game::new(config, seed)?,
        None => Game::from_entropy(config)?,
    };

    let state = Arc::new(State {
        session: Mutex::new(Session::new(game, agent, autopilot)),
        reset: Notify::new(),
        start: Instant::now(),
    });

    tokio::spawn(run_ticks(state.clone()));

    let index = warp::get()
        .and(warp::path::end())
        .and(with_state(state.clone()))
        .and_then(snapshot);

    let input = warp::path("input")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::body::json::<InputRequest>())
        .and_then(input);

    let reset = warp::path("reset")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(reset);

    info!("listening on {}", host);
    warp::serve(index.or(input).or(reset)).run(host).await;
    Ok(())
}

fn with_state(
    state: Arc<State>,
) -> impl Filter<Extract = (Arc<State>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Executes the ticks of both snakes at their deadlines.
async fn run_ticks(state: Arc<State>) {
    loop {
        let deadline = state.session.lock().await.next_deadline();
        match deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = sleep_until(state.start + deadline) => {}
                    _ = state.reset.notified() => continue,
                }
            }
            // wait for the next game
            None => {
                state.reset.notified().await;
                continue;
            }
        }
        let mut session = state.session.lock().await;
        session.advance(state.start.elapsed());
    }
}

async fn snapshot(state: Arc<State>) -> Result<impl warp::Reply, Infallible> {
    let session = state.session.lock().await;
    Ok(warp::reply::json(&session.snapshot()))
}

async fn input(state: Arc<State>, request: InputRequest) -> Result<impl warp::Reply, Infallible> {
    let mut session = state.session.lock().await;
    match session.input(request.direction) {
        Ok(accepted) => Ok(warp::reply::with_status(
            warp::reply::json(&InputResponse { accepted }),
            StatusCode::OK,
        )),
        Err(e) => {
            warn!("input {:?}: {}", request.direction, e);
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorResponse {
                    error: e.to_string(),
                }),
                StatusCode::CONFLICT,
            ))
        }
    }
}

async fn reset(state: Arc<State>) -> Result<impl warp::Reply, Infallible> {
    let mut session = state.session.lock().await;
    session.reset(state.start.elapsed());
    state.reset.notify_one();
    Ok(warp::reply::json(&session.snapshot()))
}
