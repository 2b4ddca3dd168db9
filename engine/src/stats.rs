//! Statistics folded from derived rounds.
//!
//! Both accumulators take one round (or one session) at a time so a caller can
//! stream a long history through them without holding more than the current
//! session in memory.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{GameStatus, GameSummary, Participant, ParticipantId, PlayerId, RoundSummary};
use crate::rules::awarded_sips;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantStats {
    pub participant_id: ParticipantId,
    pub rounds_won: u32,
    pub rounds_lost: u32,
    pub sips_drunk: u32,
    pub sips_awarded: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub sessions_played: u32,
    pub sessions_won: u32,
    pub rounds_won: u32,
    pub rounds_lost: u32,
    pub sips_drunk: u32,
    pub sips_awarded: u32,
}

/// Per-participant totals for a single session.
#[derive(Clone, Debug)]
pub struct SessionStats {
    rows: Vec<ParticipantStats>,
    index: HashMap<ParticipantId, usize>,
}

impl SessionStats {
    pub fn new(participants: &[Participant]) -> Self {
        let rows: Vec<ParticipantStats> =
            participants.iter().map(|p| ParticipantStats { participant_id: p.id, ..Default::default() }).collect();
        let index = rows.iter().enumerate().map(|(i, r)| (r.participant_id, i)).collect();
        Self { rows, index }
    }

    /// Rounds still in progress are ignored.
    pub fn push_round(&mut self, round: &RoundSummary) {
        if !round.is_completed() { return; }
        if let Some(loser) = round.losing_participant {
            match self.index.get(&loser) {
                Some(&lost) => {
                    for (i, row) in self.rows.iter_mut().enumerate() {
                        if i == lost {
                            row.rounds_lost += 1;
                            row.sips_drunk += round.final_penalty_sips.unwrap_or(0);
                        } else {
                            row.rounds_won += 1;
                        }
                    }
                }
                None => tracing::warn!(participant = loser, round = round.round_number, "loser is not seated, round skipped"),
            }
        }
        for turn in &round.turns {
            let sips = awarded_sips(turn.category, turn.turn_order);
            if sips == 0 { continue; }
            match self.index.get(&turn.participant_id) {
                Some(&i) => self.rows[i].sips_awarded += sips,
                None => tracing::warn!(participant = turn.participant_id, "turn by unseated participant skipped"),
            }
        }
    }

    pub fn get(&self, participant: ParticipantId) -> Option<&ParticipantStats> {
        self.index.get(&participant).map(|&i| &self.rows[i])
    }

    pub fn rows(&self) -> &[ParticipantStats] { &self.rows }

    /// Rows in seating order.
    pub fn finish(self) -> Vec<ParticipantStats> { self.rows }
}

pub fn session_stats<I>(participants: &[Participant], rounds: I) -> Vec<ParticipantStats>
where
    I: IntoIterator<Item = RoundSummary>,
{
    let mut acc = SessionStats::new(participants);
    for round in rounds { acc.push_round(&round); }
    acc.finish()
}

/// Cross-session totals keyed by registered player. Guests are not tracked.
#[derive(Clone, Debug, Default)]
pub struct PlayerTotals {
    totals: BTreeMap<PlayerId, PlayerStats>,
}

impl PlayerTotals {
    pub fn new() -> Self { Self::default() }

    /// Adds one session. Sessions that are not completed are skipped. Every
    /// participant tied for the fewest sips drunk is credited with a win.
    pub fn push_session(&mut self, game: &GameSummary, participants: &[Participant], stats: &[ParticipantStats]) {
        if game.status != GameStatus::Completed { return; }
        let Some(fewest) = stats.iter().map(|s| s.sips_drunk).min() else { return };
        let by_id: HashMap<ParticipantId, &ParticipantStats> = stats.iter().map(|s| (s.participant_id, s)).collect();
        for p in participants {
            let (Some(player_id), Some(row)) = (p.player_id, by_id.get(&p.id)) else { continue };
            let t = self.totals.entry(player_id).or_insert_with(|| PlayerStats { player_id, ..Default::default() });
            t.sessions_played += 1;
            if row.sips_drunk == fewest { t.sessions_won += 1; }
            t.rounds_won += row.rounds_won;
            t.rounds_lost += row.rounds_lost;
            t.sips_drunk += row.sips_drunk;
            t.sips_awarded += row.sips_awarded;
        }
    }

    pub fn get(&self, player: PlayerId) -> Option<&PlayerStats> { self.totals.get(&player) }

    /// Totals ordered by player id.
    pub fn finish(self) -> Vec<PlayerStats> { self.totals.into_values().collect() }
}
