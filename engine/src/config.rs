use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::model::{SessionConfig, MAX_ROLLS_PER_TURN};

pub const DEFAULT_RANDOMIZE_TURN_ORDER: bool = false;

fn default_randomize_turn_order() -> bool { DEFAULT_RANDOMIZE_TURN_ORDER }
fn default_max_rolls_per_turn() -> u8 { MAX_ROLLS_PER_TURN }

/// Engine-wide settings, usually read from a YAML file:
///
/// ```yaml
/// randomize_turn_order: true
/// max_rolls_per_turn: 3
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default = "default_randomize_turn_order")]
    pub randomize_turn_order: bool,
    #[serde(default = "default_max_rolls_per_turn")]
    pub max_rolls_per_turn: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { randomize_turn_order: DEFAULT_RANDOMIZE_TURN_ORDER, max_rolls_per_turn: MAX_ROLLS_PER_TURN }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(raw: &str) -> EngineResult<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&raw)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(1..=MAX_ROLLS_PER_TURN).contains(&self.max_rolls_per_turn) {
            return Err(EngineError::Config(format!(
                "max_rolls_per_turn must be 1..={MAX_ROLLS_PER_TURN}, got {}",
                self.max_rolls_per_turn
            )));
        }
        Ok(())
    }
}

/// Whether a new round shuffles its player order: explicit per-call override,
/// then the session's setting, then the engine default.
pub fn resolve_randomize(overridden: Option<bool>, session: &SessionConfig, engine: &EngineConfig) -> bool {
    overridden.or(session.randomize_turn_order).unwrap_or(engine.randomize_turn_order)
}
