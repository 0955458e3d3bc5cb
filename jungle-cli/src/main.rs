//! Jungle in the terminal.
//!
//! Two players share one keyboard. Moves are typed as `fromRow fromCol toRow toCol`.

mod command;
mod record;
mod session;
mod snapshot_file;
mod view;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use jungle_core::{Game, PlayerNames};
use log::info;

use crate::session::{Interrupt, Session};

#[derive(Parser, Debug)]
#[command(name = "jungle", version, about = "Play Jungle (Dou Shou Qi) in the terminal")]
struct Args {
    /// Name for the red side (skips the name prompt)
    #[arg(long)]
    red_name: Option<String>,

    /// Name for the blue side (skips the name prompt)
    #[arg(long)]
    blue_name: Option<String>,

    /// Start from a saved game
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,

    /// Pause between replayed moves
    #[arg(long, default_value_t = 1000)]
    replay_delay_ms: u64,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    writeln!(out, "Welcome to Jungle Game!")?;

    let mut game = match &args.load {
        Some(path) => {
            let game = snapshot_file::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            info!("resumed game from {}", path.display());
            game
        }
        None => Game::new(),
    };

    let names = if args.red_name.is_some() || args.blue_name.is_some() {
        let current = game.names();
        PlayerNames::new(
            args.red_name.clone().unwrap_or_else(|| current.red.clone()),
            args.blue_name.clone().unwrap_or_else(|| current.blue.clone()),
        )
    } else if args.load.is_some() {
        game.names().clone()
    } else {
        session::ask_names(&mut input, &mut out, game.names())?
    };
    game.set_names(names);

    // Ctrl-C stops a running replay; anywhere else it quits.
    let interrupt = Interrupt::default();
    let handler = interrupt.clone();
    ctrlc::set_handler(move || {
        if !handler.trigger() {
            std::process::exit(130);
        }
    })
    .context("failed to install Ctrl-C handler")?;

    let mut session = Session::new(game, out)
        .with_replay_delay(Duration::from_millis(args.replay_delay_ms))
        .with_interrupt(interrupt);
    session.help()?;
    session.run(input)?;
    info!("session ended after {} moves", session.game().transcript().len());
    Ok(())
}
