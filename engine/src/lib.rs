//! Derivation engine for a three-dice drinking game.
//!
//! Game state is never stored. The event log holds rolls, turns, rounds and
//! sessions; scores, safety, penalties, losers, game status and statistics are
//! recomputed from it on every read by the reducers in this crate.

pub mod config;
pub mod error;
pub mod game;
pub mod model;
pub mod order;
pub mod query;
pub mod rng;
pub mod round;
pub mod rules;
pub mod stats;
pub mod store;
pub mod turn;

pub use config::{resolve_randomize, EngineConfig};
pub use error::{EngineError, EngineResult, Entity};
pub use game::reduce_game;
pub use model::*;
pub use order::create_player_order;
pub use round::reduce_round;
pub use rules::{classify, is_safe, is_super_stairs_valid, score};
pub use stats::{session_stats, ParticipantStats, PlayerStats, PlayerTotals, SessionStats};
pub use store::{EventStore, EventWriter, MemoryStore};
pub use turn::reduce_turn;
