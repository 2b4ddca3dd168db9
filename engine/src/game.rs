use crate::model::{GameStatus, GameSummary, Participant, RoundSummary, Timestamp};

pub fn reduce_game(completed_at: Option<Timestamp>, participants: &[Participant], rounds: &[RoundSummary]) -> GameSummary {
    let status = match (completed_at, rounds.is_empty()) {
        (Some(_), _) => GameStatus::Completed,
        (None, false) => GameStatus::InProgress,
        (None, true) => GameStatus::Waiting,
    };
    GameSummary {
        status,
        started_at: rounds.first().map(|r| r.started_at),
        completed_at,
        round_count: rounds.len(),
        participant_count: participants.len(),
    }
}
