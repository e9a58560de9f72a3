//! Ataxx runner (default binary).
//!
//! `ATAXX_MODE=local` (default) plays one game in the terminal between
//! `ATAXX_BLACK` and `ATAXX_WHITE`, each `random` or `human`. Humans type moves
//! such as `a1-b2`, or `resign`.
//!
//! `ATAXX_MODE=serve` hosts network games: every connecting peer plays a random
//! bot on its own thread.

use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ataxx::adapter::{Adapter, RemoteGame, ServerConfig};
use ataxx::core::SimpleRng;
use ataxx::engine::{
    EngineError, Game, GameConfig, GameReport, HumanPlayer, Player, Progress, RandomBot,
};
use ataxx::term::{GameView, Labels, TerminalRenderer};
use ataxx::types::{Move, Side};

fn main() -> Result<()> {
    let mode = std::env::var("ATAXX_MODE").unwrap_or_else(|_| "local".to_string());
    match mode.trim() {
        "local" => {
            // The board owns the screen; keep the log quiet unless asked.
            init_tracing("warn");
            run_local()
        }
        "serve" => {
            init_tracing("info");
            run_serve()
        }
        other => bail!("unknown ATAXX_MODE {other:?} (expected \"local\" or \"serve\")"),
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn seed_from(config: &GameConfig) -> u32 {
    config
        .seed
        .unwrap_or_else(|| SimpleRng::from_time().next_u32())
}

fn make_player(kind: &str, side: Side, seed: u32) -> Result<Box<dyn Player>> {
    match kind.trim() {
        "random" => Ok(Box::new(
            RandomBot::new(seed).into_player(format!("random-{side}")),
        )),
        "human" => Ok(Box::new(HumanPlayer::new(format!("human-{side}")))),
        other => bail!("unknown player kind {other:?} for {side} (expected \"random\" or \"human\")"),
    }
}

/// Sleep for whatever is left of `delay` after `think` was already spent.
fn pace(delay: Duration, think: Duration) {
    if let Some(rest) = delay.checked_sub(think) {
        thread::sleep(rest);
    }
}

fn run_local() -> Result<()> {
    let config = GameConfig::from_env()?;
    let seed = seed_from(&config);
    let black_kind = std::env::var("ATAXX_BLACK").unwrap_or_else(|_| "human".to_string());
    let white_kind = std::env::var("ATAXX_WHITE").unwrap_or_else(|_| "random".to_string());

    let game = Game::new(
        config.build_board()?,
        make_player(&black_kind, Side::Black, seed)?,
        make_player(&white_kind, Side::White, seed.wrapping_add(1))?,
    )
    .with_think_budget(config.think_limit);

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = play_local(game, &mut term, config.move_delay);

    // Always try to restore terminal state.
    let _ = term.exit();

    let report = result?;
    println!("{}", report.final_board);
    println!("{}", report.result);
    for overrun in &report.overruns {
        warn!(side = %overrun.side, slowest = ?overrun.slowest, "exceeded the think-time budget");
    }
    Ok(())
}

fn play_local(mut game: Game, term: &mut TerminalRenderer, delay: Duration) -> Result<GameReport> {
    let view = GameView::default();
    let names = [
        game.player(Side::Black).name().to_string(),
        game.player(Side::White).name().to_string(),
    ];
    let mut input = io::stdin().lock().lines();
    let mut status = String::from("game started");

    loop {
        let labels = Labels {
            black: &names[0],
            white: &names[1],
            status: &status,
        };
        let last = game.plies().last().map(|p| p.mv);
        term.draw(&view.render(game.board(), last, &labels))?;

        match game.wait() {
            Ok(Progress::Moved {
                side,
                mv,
                turn_passed,
            }) => {
                status = if turn_passed {
                    format!("{side} played {mv}")
                } else {
                    format!("{side} played {mv}, {} must pass", side.other())
                };
                let think = game.plies().last().map(|p| p.think_time).unwrap_or_default();
                pace(delay, think);
            }
            Ok(Progress::NeedsInput(side)) => {
                term.prompt(&format!("{side} to move (e.g. a1-b2, or resign): "))?;
                let line = match input.next() {
                    Some(line) => line.context("failed to read from stdin")?,
                    // End of input: nobody is left to play this side.
                    None => "resign".to_string(),
                };
                status = local_input(&mut game, line.trim())?;
            }
            Ok(Progress::Waiting(_)) => {}
            Ok(Progress::Finished(result)) => {
                status = result.to_string();
                let labels = Labels {
                    black: &names[0],
                    white: &names[1],
                    status: &status,
                };
                let last = game.plies().last().map(|p| p.mv);
                term.draw(&view.render(game.board(), last, &labels))?;
                pace(delay * 2, Duration::ZERO);
                return game.report().context("finished game has no report");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Apply one line typed by a human. Returns the new status line.
fn local_input(game: &mut Game, line: &str) -> Result<String> {
    if line.eq_ignore_ascii_case("resign") {
        game.resign()?;
        return Ok("resigned".to_string());
    }
    let mv: Move = match line.parse() {
        Ok(mv) => mv,
        Err(e) => return Ok(e.to_string()),
    };
    match game.submit_move(mv) {
        Ok(_) => Ok(format!("played {mv}")),
        Err(e @ EngineError::Rejected { .. }) => Ok(e.to_string()),
        Err(e) => Err(e.into()),
    }
}

fn run_serve() -> Result<()> {
    if ServerConfig::is_disabled() {
        bail!("networking is disabled via ATAXX_NET_DISABLED");
    }
    let config = ServerConfig::from_env()?;
    let think_limit = config.game.think_limit;
    let delay = config.game.move_delay;
    let mut seed = seed_from(&config.game);

    let adapter = Adapter::start(config)?;
    info!(addr = %adapter.local_addr(), "waiting for remote players");

    while let Some(remote) = adapter.next_game() {
        seed = seed.wrapping_add(1);
        let bot_seed = seed;
        let name = format!("game-{}", remote.game_id);
        thread::Builder::new()
            .name(name)
            .spawn(move || play_remote(remote, bot_seed, think_limit, delay))
            .context("failed to spawn game thread")?;
    }
    Ok(())
}

fn play_remote(remote: RemoteGame, seed: u32, think_limit: Duration, delay: Duration) {
    let game_id = remote.game_id.clone();
    let local_side = remote.remote_side.other();
    let bot = RandomBot::new(seed).into_player("ataxx");
    let mut game = remote.into_game(Box::new(bot)).with_think_budget(think_limit);

    loop {
        match game.wait() {
            Ok(Progress::Moved { side, .. }) if side == local_side => {
                let think = game.plies().last().map(|p| p.think_time).unwrap_or_default();
                pace(delay, think);
            }
            Ok(Progress::Moved { .. } | Progress::Waiting(_)) => {}
            Ok(Progress::NeedsInput(side)) => {
                warn!(%game_id, %side, "no interactive players in server mode");
                break;
            }
            Ok(Progress::Finished(result)) => {
                info!(%game_id, %result, plies = game.plies().len(), "game finished");
                if let Some(report) = game.report() {
                    for overrun in report.overruns {
                        warn!(%game_id, side = %overrun.side, slowest = ?overrun.slowest, "exceeded the think-time budget");
                    }
                }
                break;
            }
            Err(e) => {
                warn!(%game_id, error = %e, "game aborted");
                break;
            }
        }
    }
}
