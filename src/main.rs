//! Strictly Xiangqi - manual tooling
//!
//! Replays, inspects and extends Chinese chess manuals stored as JSON.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use strictly_xiangqi::{
    GameStatus, ManualEntry, PieceKind, Point, Replay, SessionConfig, in_check,
    legal_destinations, record_manual, replay_manual,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        let config = SessionConfig::from_file(path)?;
        info!(?config, "Using session config");
    }

    match cli.command {
        Command::Replay { manual } => run_replay(&manual),
        Command::Moves { manual } => run_moves(&manual),
        Command::Record { manual, from, to } => run_record(&manual, from, to),
    }
}

/// Reads a manual file.
#[instrument(fields(path = %path.display()))]
fn load_manual(path: &Path) -> Result<Vec<ManualEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manual {}", path.display()))?;
    let entries: Vec<ManualEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse manual {}", path.display()))?;
    info!(plies = entries.len(), "Manual loaded");
    Ok(entries)
}

/// Replay a manual and print the resulting position
fn run_replay(path: &Path) -> Result<()> {
    let entries = load_manual(path)?;
    let replay = replay_manual(&entries)?;

    println!("{}", replay.board);
    println!("plies: {}", entries.len());
    match replay.status {
        Some(GameStatus::Finished) => println!("finished: {} delivered checkmate", replay.current_camp),
        _ => {
            println!("to move: {}", replay.current_camp);
            if in_check(replay.current_camp, &replay.board) {
                println!("{} is in check", replay.current_camp);
            }
        }
    }
    Ok(())
}

/// List every legal move for the side to move
fn run_moves(path: &Path) -> Result<()> {
    let entries = load_manual(path)?;
    let replay = replay_manual(&entries)?;
    if replay.status.is_some() {
        println!("game over");
        return Ok(());
    }

    for entry in legal_entries(&replay) {
        println!("{}", entry.text);
    }
    Ok(())
}

/// Notation for every legal move of the side to move.
fn legal_entries(replay: &Replay) -> Vec<ManualEntry> {
    replay
        .board
        .pieces_of(replay.current_camp)
        .flat_map(|piece| {
            legal_destinations(piece, &replay.board)
                .into_iter()
                .map(|target| record_manual(piece, target, &replay.board))
        })
        .collect()
}

/// Append a move to a manual, creating the file if needed
#[instrument(fields(path = %path.display(), from = %from, to = %to))]
fn run_record(path: &Path, from: Point, to: Point) -> Result<()> {
    let mut entries = if path.exists() {
        load_manual(path)?
    } else {
        Vec::new()
    };
    let replay = replay_manual(&entries)?;
    if replay.status.is_some() {
        bail!("The game in {} is already finished", path.display());
    }

    let Some(piece) = replay.board.piece_at(from).copied() else {
        bail!("No piece at {}", from);
    };
    if piece.camp() != replay.current_camp {
        bail!("It is {}'s turn but {} is {}", replay.current_camp, from, piece.camp());
    }
    let captures_king = replay
        .board
        .piece_at(to)
        .is_some_and(|p| p.kind() == PieceKind::King);
    if captures_king || !legal_destinations(&piece, &replay.board).contains(&to) {
        bail!("{} cannot move to {}", piece, to);
    }

    let entry = record_manual(&piece, to, &replay.board);
    println!("{}", entry.text);
    entries.push(entry);

    let json = serde_json::to_string_pretty(&entries)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write manual {}", path.display()))?;
    info!(plies = entries.len(), "Manual saved");
    Ok(())
}
