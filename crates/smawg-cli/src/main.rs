//! Smawg command-line client.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use smawg_core::{rules, Assets, Game, GameOptions, PlayerId};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod command;

use client::Client;

#[derive(Parser, Debug)]
#[command(name = "smawg", version, about = "Play a Small World-style game in the terminal")]
struct Cli {
    /// Path to the JSON file with assets
    assets_file: PathBuf,

    /// Ruleset to play by: basic or default
    #[arg(long, default_value = "default")]
    rules: String,

    /// Don't shuffle races and abilities from ASSETS_FILE
    #[arg(short = 's', long)]
    no_shuffle: bool,

    /// Seed for shuffling, the die and bots
    #[arg(long, env = "SMAWG_SEED")]
    seed: Option<u64>,

    /// Read dice rolls from stdin instead of rolling
    #[arg(short = 'd', long)]
    read_dice: bool,

    /// Seat played by a bot (repeatable)
    #[arg(long = "bot", value_name = "SEAT")]
    bots: Vec<PlayerId>,

    /// Print every game event as a JSON line
    #[arg(long)]
    events: bool,
}

/// Prompt on stdout until a non-negative integer is entered
fn read_dice() -> u32 {
    prompt_dice(&mut io::stdin().lock(), &mut io::stdout())
}

fn prompt_dice(input: &mut impl BufRead, out: &mut impl Write) -> u32 {
    let mut prompt = "Enter the result of the dice roll: ";
    loop {
        let shown = write!(out, "{prompt}").and_then(|()| out.flush());
        if let Err(e) = shown {
            warn!(error = %e, "failed to show the dice prompt");
        }
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                warn!("no dice roll on stdin, rolling 0");
                return 0;
            }
            Ok(_) => {}
        }
        if let Ok(value) = line.trim().parse() {
            return value;
        }
        prompt = "The result must be a non-negative integer, try again: ";
    }
}

fn stdin_lines() -> impl Iterator<Item = io::Result<String>> {
    std::iter::from_fn(|| {
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let json = std::fs::read_to_string(&cli.assets_file)
        .with_context(|| format!("failed to read {}", cli.assets_file.display()))?;
    let assets = Assets::from_json(&json)
        .with_context(|| format!("invalid assets in {}", cli.assets_file.display()))?;
    let ruleset = rules::by_name(&cli.rules)
        .ok_or_else(|| anyhow!("unknown ruleset '{}', expected basic or default", cli.rules))?;
    if let Some(seat) = cli.bots.iter().find(|&&seat| seat >= assets.n_players) {
        return Err(anyhow!("bot seat {seat} does not exist in a {}-player game", assets.n_players));
    }

    let mut options = GameOptions::default();
    if cli.no_shuffle {
        options = options.no_shuffle();
    }
    if let Some(seed) = cli.seed {
        options = options.with_seed(seed);
    }
    if cli.read_dice {
        options = options.with_dice(read_dice);
    }
    info!(assets = %assets.name, rules = %cli.rules, seed = ?cli.seed, "starting game");
    let game = Game::with_options(assets, ruleset, options)?;

    let mut client = Client::new(game);
    for &seat in &cli.bots {
        client = client.with_bot(seat, cli.seed);
    }
    if cli.events {
        client = client.with_event_log();
    }
    client.run(stdin_lines(), &mut io::stdout())
}
