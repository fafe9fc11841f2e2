use serde::{Deserialize, Serialize};

/// Tunables for the board engine.
///
/// Deserializes from the `[engine]` table of a TOML config; every field is
/// optional and falls back to the classic 2048 rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Chance that a spawned tile is a 4 rather than a 2.
    #[serde(default = "defaults::four_probability")]
    pub four_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            four_probability: defaults::four_probability(),
        }
    }
}

impl EngineConfig {
    /// Resolve the 4-spawn probability, falling back to 0.1 if out of [0, 1].
    pub fn four_probability_or_default(&self) -> f64 {
        match self.four_probability {
            p if p.is_finite() && (0.0..=1.0).contains(&p) => p,
            _ => defaults::four_probability(),
        }
    }
}

mod defaults {
    pub fn four_probability() -> f64 { 0.1 }
}
