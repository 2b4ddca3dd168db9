use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub type SessionId = u64;
pub type RoundId = u64;
pub type TurnId = u64;
pub type ParticipantId = u64;
pub type PlayerId = u64;
/// Milliseconds since the unix epoch.
pub type Timestamp = u64;

pub const DICE_PER_ROLL: usize = 3;
pub const MAX_ROLLS_PER_TURN: u8 = 3;

/// Three faces as rolled. Construction validates cardinality and range, so every
/// `DiceSet` in the engine is well-formed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DiceSet([u8; DICE_PER_ROLL]);

impl DiceSet {
    pub fn new(faces: [u8; DICE_PER_ROLL]) -> Result<Self, EngineError> {
        match faces.iter().find(|f| !(1..=6).contains(*f)) {
            Some(&bad) => Err(EngineError::InvalidDiceSet(format!("face {bad} outside 1..=6"))),
            None => Ok(Self(faces)),
        }
    }

    /// Callers guarantee every face is in 1..=6.
    pub(crate) fn from_faces_unchecked(faces: [u8; DICE_PER_ROLL]) -> Self { Self(faces) }

    /// Faces in the order they were rolled.
    pub fn faces(&self) -> [u8; DICE_PER_ROLL] { self.0 }

    pub fn sorted(&self) -> [u8; DICE_PER_ROLL] {
        let mut f = self.0;
        f.sort_unstable();
        f
    }
}

impl TryFrom<&[u8]> for DiceSet {
    type Error = EngineError;

    fn try_from(faces: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; DICE_PER_ROLL] = faces.try_into().map_err(|_| {
            EngineError::InvalidDiceSet(format!("expected {DICE_PER_ROLL} faces, got {}", faces.len()))
        })?;
        Self::new(arr)
    }
}

impl TryFrom<Vec<u8>> for DiceSet {
    type Error = EngineError;
    fn try_from(faces: Vec<u8>) -> Result<Self, Self::Error> { Self::try_from(faces.as_slice()) }
}

impl From<DiceSet> for Vec<u8> {
    fn from(d: DiceSet) -> Self { d.0.to_vec() }
}

/// Special-roll category. Closed set; match exhaustively.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SpecialRollType {
    ThreeOfAKind,
    Stairs,
    SuperStairs,
    ShitStairs,
    None,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    /// Registered player behind this seat; `None` for guests.
    pub player_id: Option<PlayerId>,
    pub display: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    pub name: String,
    #[serde(default)]
    pub randomize_turn_order: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSession {
    pub id: SessionId,
    pub owner_id: PlayerId,
    pub config: SessionConfig,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Round {
    pub id: RoundId,
    pub session_id: SessionId,
    pub round_number: u32,
    pub player_order: Vec<ParticipantId>,
    pub started_at: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerTurn {
    pub id: TurnId,
    pub round_id: RoundId,
    pub participant_id: ParticipantId,
    /// 1-based index into the round's player order.
    pub turn_order: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roll {
    pub turn_id: TurnId,
    pub roll_number: u8,
    pub dice: DiceSet,
    pub at: Timestamp,
}

// Joined logs handed to the reducers. The store builds these once; reducers
// never look anything up.

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnLog {
    pub participant_id: ParticipantId,
    pub turn_order: u32,
    pub rolls: Vec<Roll>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundLog {
    pub round_number: u32,
    pub player_order: Vec<ParticipantId>,
    pub started_at: Timestamp,
    pub turns: Vec<TurnLog>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus { InProgress, Completed }

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus { Waiting, InProgress, Completed }

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnSummary {
    pub participant_id: ParticipantId,
    pub turn_order: u32,
    pub total_rolls_used: u8,
    pub is_safe: bool,
    pub category: SpecialRollType,
    /// Present only for unsafe turns.
    pub final_score: Option<u32>,
    pub last_dice: Option<DiceSet>,
    pub completed_at: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSummary {
    pub round_number: u32,
    pub status: RoundStatus,
    pub starting_participant: Option<ParticipantId>,
    pub next_participant: Option<ParticipantId>,
    pub max_rolls_allowed: u8,
    pub current_penalty_sips: u32,
    pub final_penalty_sips: Option<u32>,
    pub losing_participant: Option<ParticipantId>,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub turns: Vec<TurnSummary>,
}

impl RoundSummary {
    pub fn is_completed(&self) -> bool { self.status == RoundStatus::Completed }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSummary {
    pub status: GameStatus,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub round_count: usize,
    pub participant_count: usize,
}
