use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use neo2048_core::{Direction, MoveResult, TileSnapshot};
use serde::{Deserialize, Serialize};

/// First line of a transcript: everything needed to rebuild the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub seed: u64,
    pub four_probability: f64,
    /// Board right after the starter tiles were dealt.
    pub initial: Vec<TileSnapshot>,
}

/// One applied move and what the engine returned for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub direction: Direction,
    pub result: MoveResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub header: Header,
    pub entries: Vec<Entry>,
}

/// Append-only JSONL transcript: a header line, then one line per move.
pub struct TranscriptWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl TranscriptWriter {
    /// Create (or truncate) `path`, creating parent directories, and write the header.
    pub fn create<P: AsRef<Path>>(path: P, header: &Header) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("failed to create transcript {}", path.display()))?;
        let mut writer = Self {
            path,
            out: BufWriter::new(file),
        };
        writer.write_line(header)?;
        Ok(writer)
    }

    pub fn record(&mut self, direction: Direction, result: &MoveResult) -> Result<()> {
        self.write_line(&Entry {
            direction,
            result: result.clone(),
        })
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out
            .flush()
            .with_context(|| format!("failed to flush {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        self.out
            .write_all(b"\n")
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// Load a transcript written by [`TranscriptWriter`]. Blank lines are skipped.
pub fn read_transcript(path: &Path) -> Result<Transcript> {
    let file =
        File::open(path).with_context(|| format!("failed to open transcript {}", path.display()))?;
    let mut lines = BufReader::new(file)
        .lines()
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()));

    let (_, first) = lines
        .next()
        .ok_or_else(|| anyhow!("{}: transcript is empty", path.display()))?;
    let header: Header = serde_json::from_str(&first?)
        .with_context(|| format!("{}: bad header line", path.display()))?;

    let mut entries = Vec::new();
    for (idx, line) in lines {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let entry: Entry = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: bad move line", path.display(), idx + 1))?;
        entries.push(entry);
    }
    Ok(Transcript { header, entries })
}
