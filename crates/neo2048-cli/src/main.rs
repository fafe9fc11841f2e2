mod config;
mod input;
mod session;
mod transcript;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use config::Config;
use session::{Session, Summary};

#[derive(Debug, Parser)]
#[command(author, version, about = "Play, script and replay 4x4 sliding-tile games")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(long, value_name = "N", global = true)]
    seed: Option<u64>,

    /// Write a JSONL move transcript to this file (overrides the config file)
    #[arg(long, value_name = "FILE", global = true)]
    transcript: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Read moves (w/a/s/d, up/left/down/right) from stdin
    Play,
    /// Apply a fixed move script such as "LLURD"
    Run {
        #[arg(long, value_name = "SCRIPT")]
        moves: String,
        /// Print the board after every move instead of only at the end
        #[arg(long)]
        verbose: bool,
    },
    /// Re-run a transcript and verify every move reproduces
    Replay {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.seed, cli.transcript);

    let summary = match cli.command {
        Cmd::Play => play(&config)?,
        Cmd::Run { moves, verbose } => {
            let directions = input::parse_script(&moves)?;
            let mut session = Session::start(&config)?;
            session::run_script(&mut session, &directions, |direction, result, engine| {
                if verbose {
                    println!("{direction} (+{})", result.score_delta);
                    println!("{}", engine.board());
                }
            })?;
            if !verbose {
                println!("{}", session.engine().board());
            }
            session.finish()?
        }
        Cmd::Replay { path } => {
            let transcript = transcript::read_transcript(&path)?;
            let summary = session::replay(&transcript)?;
            info!("{} reproduced {} move(s)", path.display(), summary.moves);
            summary
        }
    };

    print_summary(&summary);
    Ok(())
}

fn play(config: &Config) -> Result<Summary> {
    let mut session = Session::start(config)?;
    let end = session::play_lines(&mut session, io::stdin().lock(), &mut io::stdout())?;
    info!("interactive game ended: {end:?}");
    session.finish()
}

fn print_summary(summary: &Summary) {
    println!(
        "seed {} | moves {} ({} changed) | score {} | highest {}{}",
        summary.seed,
        summary.moves,
        summary.changed_moves,
        summary.score,
        summary.highest_tile,
        if summary.game_over { " | game over" } else { "" }
    );
}
