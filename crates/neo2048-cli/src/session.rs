use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use log::{info, warn};
use neo2048_core::{Direction, Engine, EngineConfig, MoveResult};
use rand::{SeedableRng, rngs::StdRng};

use crate::config::Config;
use crate::input::{Command, parse_command};
use crate::transcript::{Header, Transcript, TranscriptWriter};

/// End-of-game figures reported by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub seed: u64,
    pub moves: usize,
    pub changed_moves: usize,
    pub score: u64,
    pub highest_tile: u32,
    pub game_over: bool,
}

/// One seeded game plus its optional transcript.
pub struct Session {
    seed: u64,
    engine: Engine,
    writer: Option<TranscriptWriter>,
    moves: usize,
    changed_moves: usize,
}

impl Session {
    /// Deal a new board from `config`, drawing a seed if none is configured.
    pub fn start(config: &Config) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("starting game with seed {seed}");
        let engine = Engine::new(config.engine.clone(), StdRng::seed_from_u64(seed));

        let writer = match &config.transcript.path {
            Some(path) => {
                let header = Header {
                    seed,
                    four_probability: config.engine.four_probability_or_default(),
                    initial: engine.current_tiles(),
                };
                let writer = TranscriptWriter::create(path, &header)?;
                info!("recording transcript to {}", writer.path().display());
                Some(writer)
            }
            None => None,
        };

        Ok(Self::from_engine(seed, engine, writer))
    }

    /// Wrap an already-built engine.
    pub fn from_engine(seed: u64, engine: Engine, writer: Option<TranscriptWriter>) -> Self {
        Self {
            seed,
            engine,
            writer,
            moves: 0,
            changed_moves: 0,
        }
    }

    /// Apply one move and record it.
    pub fn step(&mut self, direction: Direction) -> Result<MoveResult> {
        let result = self.engine.apply_move(direction);
        self.moves += 1;
        if result.changed {
            self.changed_moves += 1;
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.record(direction, &result)?;
        }
        Ok(result)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn summary(&self) -> Summary {
        Summary {
            seed: self.seed,
            moves: self.moves,
            changed_moves: self.changed_moves,
            score: self.engine.score(),
            highest_tile: self.engine.highest_tile(),
            game_over: self.engine.is_game_over(),
        }
    }

    /// Flush the transcript and return the final summary.
    pub fn finish(mut self) -> Result<Summary> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        let summary = self.summary();
        info!(
            "game over={} after {} move(s): score {}, highest tile {}",
            summary.game_over, summary.moves, summary.score, summary.highest_tile
        );
        Ok(summary)
    }
}

/// Apply `directions` in order, stopping early once the board is stuck.
///
/// `on_step` sees every applied move with the engine state after it.
pub fn run_script<F>(session: &mut Session, directions: &[Direction], mut on_step: F) -> Result<()>
where
    F: FnMut(Direction, &MoveResult, &Engine),
{
    for &direction in directions {
        if session.engine().is_game_over() {
            info!("board is stuck; ignoring remaining moves");
            break;
        }
        let result = session.step(direction)?;
        on_step(direction, &result, session.engine());
    }
    Ok(())
}

/// Why an interactive game stopped reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayEnd {
    Quit,
    GameOver,
    EndOfInput,
}

/// Drive `session` from whitespace-separated commands read from `input`,
/// echoing boards and prompts to `out`. Unknown tokens are logged and skipped.
pub fn play_lines<B: BufRead, W: Write>(
    session: &mut Session,
    input: B,
    out: &mut W,
) -> Result<PlayEnd> {
    writeln!(out, "{}", session.engine().board())?;
    prompt(out)?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        for token in line.split_whitespace() {
            let direction = match parse_command(token) {
                Ok(Command::Move(direction)) => direction,
                Ok(Command::Quit) => return Ok(PlayEnd::Quit),
                Err(err) => {
                    warn!("{err}");
                    continue;
                }
            };
            let result = session.step(direction)?;
            if result.changed {
                writeln!(out, "Score: {} (+{})", result.score, result.score_delta)?;
                writeln!(out, "{}", session.engine().board())?;
            } else {
                writeln!(out, "{direction}: nothing moves")?;
            }
            if session.engine().is_game_over() {
                writeln!(out, "Game over!")?;
                return Ok(PlayEnd::GameOver);
            }
        }
        prompt(out)?;
    }
    Ok(PlayEnd::EndOfInput)
}

fn prompt<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "move> ")?;
    out.flush().context("failed to flush output")
}

/// Rebuild the recorded game and check every move reproduces exactly.
pub fn replay(transcript: &Transcript) -> Result<Summary> {
    let header = &transcript.header;
    let config = EngineConfig {
        four_probability: header.four_probability,
    };
    let mut engine = Engine::new(config, StdRng::seed_from_u64(header.seed));
    if engine.current_tiles() != header.initial {
        warn!("initial board differs for seed {}", header.seed);
        bail!("initial board does not match seed {}", header.seed);
    }

    let mut changed_moves = 0;
    for (idx, entry) in transcript.entries.iter().enumerate() {
        let result = engine.apply_move(entry.direction);
        if result != entry.result {
            warn!(
                "move {} ({}) diverged: recorded score {}, replayed score {}",
                idx + 1,
                entry.direction,
                entry.result.score,
                result.score
            );
            bail!("move {} ({}) diverged from the transcript", idx + 1, entry.direction);
        }
        if result.changed {
            changed_moves += 1;
        }
    }

    Ok(Summary {
        seed: header.seed,
        moves: transcript.entries.len(),
        changed_moves,
        score: engine.score(),
        highest_tile: engine.highest_tile(),
        game_over: engine.is_game_over(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::read_transcript;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn config(seed: u64, transcript: Option<PathBuf>) -> Config {
        Config::default().with_overrides(Some(seed), transcript)
    }

    #[test]
    fn recorded_game_replays_identically() {
        let td = tempdir().unwrap();
        let path = td.path().join("game.jsonl");
        let mut session = Session::start(&config(99, Some(path.clone()))).unwrap();
        let script = [Direction::Left, Direction::Down, Direction::Right, Direction::Down];
        run_script(&mut session, &script.repeat(10), |_, _, _| {}).unwrap();
        let played = session.finish().unwrap();

        let transcript = read_transcript(&path).unwrap();
        assert_eq!(transcript.entries.len(), played.moves);
        let replayed = replay(&transcript).expect("replay matches");
        assert_eq!(replayed, played);
    }

    #[test]
    fn tampered_transcript_is_rejected() {
        let td = tempdir().unwrap();
        let path = td.path().join("game.jsonl");
        let mut session = Session::start(&config(5, Some(path.clone()))).unwrap();
        run_script(&mut session, &[Direction::Left, Direction::Right, Direction::Up], |_, _, _| {})
            .unwrap();
        session.finish().unwrap();

        let mut transcript = read_transcript(&path).unwrap();
        transcript.entries[0].result.score += 2;
        let err = replay(&transcript).unwrap_err();
        assert!(err.to_string().contains("move 1"));

        let mut transcript = read_transcript(&path).unwrap();
        transcript.header.seed += 1;
        assert!(replay(&transcript).is_err());
    }

    const STUCK: [[u32; 4]; 4] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

    fn stuck_session() -> Session {
        let engine = Engine::from_grid(&STUCK, EngineConfig::default(), StdRng::seed_from_u64(1));
        Session::from_engine(1, engine, None)
    }

    #[test]
    fn script_reports_each_step_and_stops_when_stuck() {
        let mut session = Session::start(&config(21, None)).unwrap();
        let mut seen = Vec::new();
        run_script(&mut session, &[Direction::Up, Direction::Left], |direction, result, engine| {
            seen.push((direction, result.score, engine.score()));
        })
        .unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, Direction::Up);
        assert!(seen.iter().all(|&(_, reported, live)| reported == live));

        let mut stuck = stuck_session();
        let mut calls = 0;
        run_script(&mut stuck, &[Direction::Left, Direction::Up], |_, _, _| calls += 1).unwrap();
        assert_eq!(calls, 0);
        assert_eq!(stuck.summary().moves, 0);
    }

    #[test]
    fn interactive_skips_unknown_tokens_and_quits() {
        let mut session = Session::start(&config(8, None)).unwrap();
        let input = std::io::Cursor::new("jump a\nd q w\n");
        let mut out = Vec::new();
        let end = play_lines(&mut session, input, &mut out).unwrap();
        assert_eq!(end, PlayEnd::Quit);
        // "jump" is skipped, "w" after "q" is never applied.
        assert_eq!(session.summary().moves, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Game over!"));
        assert_eq!(text.matches("move> ").count(), 2);
    }

    #[test]
    fn interactive_runs_until_input_ends() {
        let mut session = Session::start(&config(8, None)).unwrap();
        let mut out = Vec::new();
        let end = play_lines(&mut session, std::io::Cursor::new("w\n\ns\n"), &mut out).unwrap();
        assert_eq!(end, PlayEnd::EndOfInput);
        assert_eq!(session.summary().moves, 2);
    }

    #[test]
    fn interactive_stops_on_game_over() {
        let mut session = stuck_session();
        let mut out = Vec::new();
        let end = play_lines(&mut session, std::io::Cursor::new("a w\n"), &mut out).unwrap();
        assert_eq!(end, PlayEnd::GameOver);
        assert_eq!(session.summary().moves, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("left: nothing moves"));
        assert!(text.contains("Game over!"));
    }

    #[test]
    fn summary_counts_noop_moves() {
        let mut session = Session::start(&config(3, None)).unwrap();
        for direction in [Direction::Left, Direction::Left, Direction::Left] {
            session.step(direction).unwrap();
        }
        let summary = session.finish().unwrap();
        assert_eq!(summary.seed, 3);
        assert_eq!(summary.moves, 3);
        assert!(summary.changed_moves <= 3);
        assert!(summary.highest_tile >= 2);
    }
}
