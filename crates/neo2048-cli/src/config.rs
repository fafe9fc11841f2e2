use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use neo2048_core::EngineConfig;

/// Top-level TOML config for the `neo2048` binary.
///
/// ```toml
/// seed = 42
///
/// [engine]
/// four_probability = 0.1
///
/// [transcript]
/// path = "runs/game.jsonl"
/// ```
#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
pub struct Config {
    /// Fixed RNG seed; drawn at random (and logged) when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub transcript: Transcript,
}

#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
pub struct Transcript {
    /// Where to write the JSONL move transcript. Disabled when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_toml(p),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, seed: Option<u64>, transcript: Option<PathBuf>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        if transcript.is_some() {
            self.transcript.path = transcript;
        }
        self
    }
}
