//! Command-line interface for strictly_xiangqi.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_xiangqi::Point;

/// Strictly Xiangqi - Chinese chess rules, notation and manual tools
#[derive(Parser, Debug)]
#[command(name = "strictly_xiangqi")]
#[command(about = "Replay, inspect and extend Chinese chess manuals", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a session config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a manual and print the resulting position
    Replay {
        /// Manual file (JSON array of {camp, text})
        #[arg(short, long)]
        manual: PathBuf,
    },

    /// List every legal move for the side to move
    Moves {
        /// Manual file (JSON array of {camp, text})
        #[arg(short, long)]
        manual: PathBuf,
    },

    /// Append a move to a manual, creating the file if needed
    Record {
        /// Manual file (JSON array of {camp, text})
        #[arg(short, long)]
        manual: PathBuf,

        /// Origin point as "x,y"
        #[arg(long, value_parser = parse_point)]
        from: Point,

        /// Destination point as "x,y"
        #[arg(long, value_parser = parse_point)]
        to: Point,
    },
}

/// Parses "x,y" into an on-board point.
pub fn parse_point(text: &str) -> Result<Point, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", text))?;
    let x: i8 = x.trim().parse().map_err(|e| format!("bad file '{}': {}", x, e))?;
    let y: i8 = y.trim().parse().map_err(|e| format!("bad rank '{}': {}", y, e))?;
    Point::new(x, y).ok_or_else(|| format!("({}, {}) is off the board", x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("2,8"), Ok(Point::new(2, 8).unwrap()));
        assert_eq!(parse_point(" 9 , 10 "), Ok(Point::new(9, 10).unwrap()));
        assert!(parse_point("0,8").is_err());
        assert!(parse_point("2;8").is_err());
        assert!(parse_point("a,8").is_err());
    }
}
