//! Event-store boundary.
//!
//! [`EventStore`] is the read side the reducers are fed from, [`EventWriter`]
//! the write side player actions go through. [`MemoryStore`] implements both
//! on top of a single append-only event log; every read is answered by
//! scanning that log, and every write is validated once in
//! [`MemoryStore::apply`] before it is appended.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{resolve_randomize, EngineConfig};
use crate::error::{EngineError, EngineResult, Entity};
use crate::model::*;
use crate::order::{create_player_order, validate_player_order};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    SessionCreated(GameSession),
    ParticipantJoined { session_id: SessionId, participant: Participant },
    RoundCreated(Round),
    TurnCreated(PlayerTurn),
    RollAppended(Roll),
    SessionCompleted { session_id: SessionId },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::SessionCreated(_) => "session_created",
            EventKind::ParticipantJoined { .. } => "participant_joined",
            EventKind::RoundCreated(_) => "round_created",
            EventKind::TurnCreated(_) => "turn_created",
            EventKind::RollAppended(_) => "roll_appended",
            EventKind::SessionCompleted { .. } => "session_completed",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub at: Timestamp,
    pub kind: EventKind,
}

/// Read side. Every sequence comes back in log order: rounds by round number,
/// turns by turn order, rolls by roll number. Missing entities are `None` or
/// empty, never an error.
pub trait EventStore {
    fn session(&self, id: SessionId) -> Option<GameSession>;
    fn round(&self, id: RoundId) -> Option<Round>;
    fn turn(&self, id: TurnId) -> Option<PlayerTurn>;
    fn participants_for_session(&self, id: SessionId) -> Vec<Participant>;
    fn rounds_for_session(&self, id: SessionId) -> Vec<Round>;
    fn turns_for_round(&self, id: RoundId) -> Vec<PlayerTurn>;
    fn rolls_for_turn(&self, id: TurnId) -> Vec<Roll>;
    /// Sessions a registered player sat in, oldest first.
    fn sessions_for_player(&self, player: PlayerId) -> Vec<SessionId>;
    /// Per-turn roll limit the store enforces on writes.
    fn max_rolls_per_turn(&self) -> u8 { MAX_ROLLS_PER_TURN }
}

/// Write side. Validation lives here; once an event is admitted the reducers
/// assume it is well-formed.
pub trait EventWriter {
    fn create_session(&mut self, owner_id: PlayerId, config: SessionConfig, at: Timestamp) -> EngineResult<GameSession>;
    fn add_participant(
        &mut self,
        session_id: SessionId,
        player_id: Option<PlayerId>,
        display: &str,
        at: Timestamp,
    ) -> EngineResult<Participant>;
    /// `randomize` overrides the session's setting for this round only.
    fn create_round<R: Rng + ?Sized>(
        &mut self,
        session_id: SessionId,
        starting: ParticipantId,
        all: &[ParticipantId],
        randomize: Option<bool>,
        rng: &mut R,
        at: Timestamp,
    ) -> EngineResult<Round>;
    fn create_turn(
        &mut self,
        round_id: RoundId,
        participant_id: ParticipantId,
        turn_order: u32,
        at: Timestamp,
    ) -> EngineResult<PlayerTurn>;
    fn append_roll(&mut self, turn_id: TurnId, dice: DiceSet, at: Timestamp) -> EngineResult<Roll>;
    fn complete_session(&mut self, session_id: SessionId, at: Timestamp) -> EngineResult<()>;
}

/// Joins a round with its turns and their rolls, in order. This is the only
/// place the engine walks the store's associations.
pub fn join_round<S: EventStore + ?Sized>(store: &S, round: &Round) -> RoundLog {
    let turns = store
        .turns_for_round(round.id)
        .into_iter()
        .map(|t| TurnLog { participant_id: t.participant_id, turn_order: t.turn_order, rolls: store.rolls_for_turn(t.id) })
        .collect();
    RoundLog {
        round_number: round.round_number,
        player_order: round.player_order.clone(),
        started_at: round.started_at,
        turns,
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    config: EngineConfig,
    events: Vec<Event>,
}

impl MemoryStore {
    pub fn new(config: EngineConfig) -> Self { Self { config, events: Vec::new() } }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn events(&self) -> &[Event] { &self.events }

    /// Rebuilds a store from a recorded log, re-running every write check.
    pub fn replay<I: IntoIterator<Item = Event>>(config: EngineConfig, events: I) -> EngineResult<Self> {
        let mut store = Self::new(config);
        for event in events { store.apply(event)?; }
        Ok(store)
    }

    pub fn to_json(&self) -> EngineResult<String> { Ok(serde_json::to_string(&self.events)?) }

    pub fn from_json(config: EngineConfig, raw: &str) -> EngineResult<Self> {
        let events: Vec<Event> = serde_json::from_str(raw)?;
        Self::replay(config, events)
    }

    /// Validates and appends one event.
    pub fn apply(&mut self, event: Event) -> EngineResult<()> {
        if let Err(err) = self.check(&event) {
            tracing::warn!(seq = event.seq, kind = event.kind.name(), %err, "event rejected");
            return Err(err);
        }
        tracing::info!(seq = event.seq, kind = event.kind.name(), at = event.at, "event appended");
        self.events.push(event);
        Ok(())
    }

    fn push(&mut self, kind: EventKind, at: Timestamp) -> EngineResult<()> {
        let seq = self.events.len() as u64 + 1;
        self.apply(Event { seq, at, kind })
    }

    fn kinds(&self) -> impl Iterator<Item = &EventKind> { self.events.iter().map(|e| &e.kind) }

    fn next_id(&self, pick: impl Fn(&EventKind) -> Option<u64>) -> u64 {
        self.kinds().filter_map(pick).max().unwrap_or(0) + 1
    }

    fn participant_exists(&self, id: ParticipantId) -> bool {
        self.kinds().any(|k| matches!(k, EventKind::ParticipantJoined { participant, .. } if participant.id == id))
    }

    fn open_session(&self, id: SessionId) -> EngineResult<GameSession> {
        let session = self.session(id).ok_or(EngineError::NotFound(Entity::Session(id)))?;
        if session.completed_at.is_some() { return Err(EngineError::SessionCompleted); }
        Ok(session)
    }

    /// A round is sealed once every seat has a turn and the last turn has
    /// rolled. Nothing after it may be written until then.
    fn check_round_sealed(&self, round: &Round) -> EngineResult<()> {
        let turns = self.turns_for_round(round.id);
        if turns.len() != round.player_order.len() { return Err(EngineError::RoundInProgress(round.round_number)); }
        match turns.last() {
            Some(last) if self.rolls_for_turn(last.id).is_empty() => Err(EngineError::OutOfOrderRoll { expected: 1, got: 0 }),
            _ => Ok(()),
        }
    }

    /// Round ceiling for a turn: the configured limit, lowered to what the
    /// starting player used once they have rolled.
    fn roll_limit(&self, turn: &PlayerTurn) -> u8 {
        let base = self.config.max_rolls_per_turn;
        if turn.turn_order == 1 { return base; }
        self.turns_for_round(turn.round_id)
            .first()
            .map(|first| self.rolls_for_turn(first.id).len() as u8)
            .filter(|&n| n > 0)
            .map_or(base, |n| n.min(base))
    }

    fn check(&self, event: &Event) -> EngineResult<()> {
        let expected = self.events.len() as u64 + 1;
        if event.seq != expected { return Err(EngineError::EventOutOfSequence { expected, got: event.seq }); }

        match &event.kind {
            EventKind::SessionCreated(s) => {
                if self.session(s.id).is_some() { return Err(EngineError::Duplicate(Entity::Session(s.id))); }
                if s.completed_at.is_some() { return Err(EngineError::SessionCompleted); }
            }
            EventKind::ParticipantJoined { session_id, participant } => {
                self.open_session(*session_id)?;
                if self.participant_exists(participant.id) {
                    return Err(EngineError::Duplicate(Entity::Participant(participant.id)));
                }
            }
            EventKind::RoundCreated(r) => {
                self.open_session(r.session_id)?;
                if self.round(r.id).is_some() { return Err(EngineError::Duplicate(Entity::Round(r.id))); }
                let rounds = self.rounds_for_session(r.session_id);
                let want = rounds.len() as u32 + 1;
                if r.round_number != want { return Err(EngineError::OutOfOrderRound { expected: want, got: r.round_number }); }
                if let Some(prev) = rounds.last() { self.check_round_sealed(prev)?; }
                let seated: Vec<ParticipantId> = self.participants_for_session(r.session_id).iter().map(|p| p.id).collect();
                validate_player_order(&r.player_order, &seated)?;
            }
            EventKind::TurnCreated(t) => {
                let round = self.round(t.round_id).ok_or(EngineError::NotFound(Entity::Round(t.round_id)))?;
                self.open_session(round.session_id)?;
                if self.turn(t.id).is_some() { return Err(EngineError::Duplicate(Entity::Turn(t.id))); }
                let turns = self.turns_for_round(round.id);
                let want = turns.len() as u32 + 1;
                if t.turn_order != want || want as usize > round.player_order.len() {
                    return Err(EngineError::OutOfOrderTurn { expected: want, got: t.turn_order });
                }
                let seat = round.player_order[t.turn_order as usize - 1];
                if seat != t.participant_id {
                    return Err(EngineError::MalformedPlayerOrder(format!(
                        "turn {} belongs to participant {seat}, not {}",
                        t.turn_order, t.participant_id
                    )));
                }
                if let Some(prev) = turns.last() {
                    if self.rolls_for_turn(prev.id).is_empty() { return Err(EngineError::OutOfOrderRoll { expected: 1, got: 0 }); }
                }
            }
            EventKind::RollAppended(r) => {
                let turn = self.turn(r.turn_id).ok_or(EngineError::NotFound(Entity::Turn(r.turn_id)))?;
                let round = self.round(turn.round_id).ok_or(EngineError::NotFound(Entity::Round(turn.round_id)))?;
                self.open_session(round.session_id)?;
                let current = self.rounds_for_session(round.session_id).last().map_or(0, |r| r.round_number);
                if round.round_number != current {
                    return Err(EngineError::OutOfOrderRound { expected: current, got: round.round_number });
                }
                let latest = self.turns_for_round(round.id).last().map_or(0, |t| t.turn_order);
                if turn.turn_order != latest { return Err(EngineError::OutOfOrderTurn { expected: latest, got: turn.turn_order }); }
                let want = self.rolls_for_turn(turn.id).len() as u8 + 1;
                if r.roll_number != want { return Err(EngineError::OutOfOrderRoll { expected: want, got: r.roll_number }); }
                let limit = self.roll_limit(&turn);
                if r.roll_number > limit { return Err(EngineError::RollLimitExceeded { limit }); }
            }
            EventKind::SessionCompleted { session_id } => {
                self.open_session(*session_id)?;
                // a session may end mid-round, but not on a turn that never rolled
                let last_turn = self.rounds_for_session(*session_id).last().and_then(|r| self.turns_for_round(r.id).pop());
                if let Some(turn) = last_turn {
                    if self.rolls_for_turn(turn.id).is_empty() { return Err(EngineError::OutOfOrderRoll { expected: 1, got: 0 }); }
                }
            }
        }
        Ok(())
    }
}

impl EventStore for MemoryStore {
    fn session(&self, id: SessionId) -> Option<GameSession> {
        let mut session = self.kinds().find_map(|k| match k {
            EventKind::SessionCreated(s) if s.id == id => Some(s.clone()),
            _ => None,
        })?;
        session.completed_at = self.events.iter().find_map(|e| match e.kind {
            EventKind::SessionCompleted { session_id } if session_id == id => Some(e.at),
            _ => None,
        });
        Some(session)
    }

    fn round(&self, id: RoundId) -> Option<Round> {
        self.kinds().find_map(|k| match k {
            EventKind::RoundCreated(r) if r.id == id => Some(r.clone()),
            _ => None,
        })
    }

    fn turn(&self, id: TurnId) -> Option<PlayerTurn> {
        self.kinds().find_map(|k| match k {
            EventKind::TurnCreated(t) if t.id == id => Some(t.clone()),
            _ => None,
        })
    }

    fn participants_for_session(&self, id: SessionId) -> Vec<Participant> {
        self.kinds()
            .filter_map(|k| match k {
                EventKind::ParticipantJoined { session_id, participant } if *session_id == id => Some(participant.clone()),
                _ => None,
            })
            .collect()
    }

    fn rounds_for_session(&self, id: SessionId) -> Vec<Round> {
        self.kinds()
            .filter_map(|k| match k {
                EventKind::RoundCreated(r) if r.session_id == id => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    fn turns_for_round(&self, id: RoundId) -> Vec<PlayerTurn> {
        self.kinds()
            .filter_map(|k| match k {
                EventKind::TurnCreated(t) if t.round_id == id => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    fn rolls_for_turn(&self, id: TurnId) -> Vec<Roll> {
        self.kinds()
            .filter_map(|k| match k {
                EventKind::RollAppended(r) if r.turn_id == id => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    fn max_rolls_per_turn(&self) -> u8 { self.config.max_rolls_per_turn }

    fn sessions_for_player(&self, player: PlayerId) -> Vec<SessionId> {
        let mut out: Vec<SessionId> = Vec::new();
        for k in self.kinds() {
            if let EventKind::ParticipantJoined { session_id, participant } = k {
                if participant.player_id == Some(player) && !out.contains(session_id) { out.push(*session_id); }
            }
        }
        out
    }
}

impl EventWriter for MemoryStore {
    fn create_session(&mut self, owner_id: PlayerId, config: SessionConfig, at: Timestamp) -> EngineResult<GameSession> {
        let id = self.next_id(|k| match k { EventKind::SessionCreated(s) => Some(s.id), _ => None });
        let session = GameSession { id, owner_id, config, created_at: at, completed_at: None };
        self.push(EventKind::SessionCreated(session.clone()), at)?;
        Ok(session)
    }

    fn add_participant(
        &mut self,
        session_id: SessionId,
        player_id: Option<PlayerId>,
        display: &str,
        at: Timestamp,
    ) -> EngineResult<Participant> {
        let id = self.next_id(|k| match k { EventKind::ParticipantJoined { participant, .. } => Some(participant.id), _ => None });
        let participant = Participant { id, player_id, display: display.to_string() };
        self.push(EventKind::ParticipantJoined { session_id, participant: participant.clone() }, at)?;
        Ok(participant)
    }

    fn create_round<R: Rng + ?Sized>(
        &mut self,
        session_id: SessionId,
        starting: ParticipantId,
        all: &[ParticipantId],
        randomize: Option<bool>,
        rng: &mut R,
        at: Timestamp,
    ) -> EngineResult<Round> {
        let session = self.open_session(session_id)?;
        let seated: Vec<ParticipantId> = self.participants_for_session(session_id).iter().map(|p| p.id).collect();
        validate_player_order(all, &seated)?;
        let randomize = resolve_randomize(randomize, &session.config, &self.config);
        let player_order = create_player_order(starting, all, randomize, rng)?;
        let round = Round {
            id: self.next_id(|k| match k { EventKind::RoundCreated(r) => Some(r.id), _ => None }),
            session_id,
            round_number: self.rounds_for_session(session_id).len() as u32 + 1,
            player_order,
            started_at: at,
        };
        self.push(EventKind::RoundCreated(round.clone()), at)?;
        Ok(round)
    }

    fn create_turn(
        &mut self,
        round_id: RoundId,
        participant_id: ParticipantId,
        turn_order: u32,
        at: Timestamp,
    ) -> EngineResult<PlayerTurn> {
        let id = self.next_id(|k| match k { EventKind::TurnCreated(t) => Some(t.id), _ => None });
        let turn = PlayerTurn { id, round_id, participant_id, turn_order };
        self.push(EventKind::TurnCreated(turn.clone()), at)?;
        Ok(turn)
    }

    fn append_roll(&mut self, turn_id: TurnId, dice: DiceSet, at: Timestamp) -> EngineResult<Roll> {
        let roll_number = self.rolls_for_turn(turn_id).len() as u8 + 1;
        let roll = Roll { turn_id, roll_number, dice, at };
        self.push(EventKind::RollAppended(roll.clone()), at)?;
        Ok(roll)
    }

    fn complete_session(&mut self, session_id: SessionId, at: Timestamp) -> EngineResult<()> {
        self.push(EventKind::SessionCompleted { session_id }, at)
    }
}
