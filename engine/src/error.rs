use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Entity {
    Session(u64),
    Round(u64),
    Turn(u64),
    Participant(u64),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid dice set: {0}")]
    InvalidDiceSet(String),
    #[error("malformed player order: {0}")]
    MalformedPlayerOrder(String),
    #[error("roll out of order (expected={expected}, got={got})")]
    OutOfOrderRoll { expected: u8, got: u8 },
    #[error("turn out of order (expected={expected}, got={got})")]
    OutOfOrderTurn { expected: u32, got: u32 },
    #[error("round out of order (expected={expected}, got={got})")]
    OutOfOrderRound { expected: u32, got: u32 },
    #[error("previous round {0} is still in progress")]
    RoundInProgress(u32),
    #[error("event out of sequence (expected={expected}, got={got})")]
    EventOutOfSequence { expected: u64, got: u64 },
    #[error("{0:?} already exists")]
    Duplicate(Entity),
    #[error("roll limit of {limit} reached")]
    RollLimitExceeded { limit: u8 },
    #[error("session already completed")]
    SessionCompleted,
    #[error("{0:?} not found")]
    NotFound(Entity),
    #[error("config: {0}")]
    Config(String),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
