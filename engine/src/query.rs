//! Read path: load joined logs from a store and run the reducers over them.

use crate::game::reduce_game;
use crate::model::{GameSummary, PlayerId, RoundId, RoundSummary, SessionId, Timestamp};
use crate::round::reduce_round;
use crate::stats::{self, ParticipantStats, PlayerStats, PlayerTotals, SessionStats};
use crate::store::{join_round, EventStore};

pub fn round_state<S: EventStore + ?Sized>(store: &S, round_id: RoundId, now: Timestamp) -> Option<RoundSummary> {
    let round = store.round(round_id)?;
    Some(reduce_round(&join_round(store, &round), store.max_rolls_per_turn(), now))
}

pub fn round_states<S: EventStore + ?Sized>(store: &S, session_id: SessionId, now: Timestamp) -> Vec<RoundSummary> {
    store
        .rounds_for_session(session_id)
        .iter()
        .map(|r| reduce_round(&join_round(store, r), store.max_rolls_per_turn(), now))
        .collect()
}

pub fn game_state<S: EventStore + ?Sized>(store: &S, session_id: SessionId, now: Timestamp) -> Option<GameSummary> {
    let session = store.session(session_id)?;
    let participants = store.participants_for_session(session_id);
    Some(reduce_game(session.completed_at, &participants, &round_states(store, session_id, now)))
}

/// Rounds are reduced and folded one at a time.
pub fn session_stats<S: EventStore + ?Sized>(store: &S, session_id: SessionId, now: Timestamp) -> Option<Vec<ParticipantStats>> {
    store.session(session_id)?;
    let participants = store.participants_for_session(session_id);
    let mut acc = SessionStats::new(&participants);
    for round in store.rounds_for_session(session_id) {
        acc.push_round(&reduce_round(&join_round(store, &round), store.max_rolls_per_turn(), now));
    }
    Some(acc.finish())
}

/// Totals for one registered player over every completed session they sat in.
/// Sessions stream through the accumulator one by one, and each session's
/// rounds are reduced once for both its status and its stats.
pub fn player_stats<S: EventStore + ?Sized>(store: &S, player: PlayerId, now: Timestamp) -> Option<PlayerStats> {
    let mut totals = PlayerTotals::new();
    for session_id in store.sessions_for_player(player) {
        let Some(session) = store.session(session_id) else { continue };
        let participants = store.participants_for_session(session_id);
        let rounds = round_states(store, session_id, now);
        let game = reduce_game(session.completed_at, &participants, &rounds);
        let stats = stats::session_stats(&participants, rounds);
        totals.push_session(&game, &participants, &stats);
    }
    totals.get(player).cloned()
}
