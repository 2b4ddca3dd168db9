use crate::model::{SpecialRollType, Timestamp, TurnLog, TurnSummary};
use crate::rules::{is_safe, resolve_category, score};

/// Folds a turn's rolls (ascending roll number) into its summary. Only the last
/// roll counts. `previous` is the resolved category of the turn one position
/// earlier in the same round, `None` for the round's first turn.
///
/// A turn without rolls reports `now` as its completion time, category `None`
/// and no score.
pub fn reduce_turn(turn: &TurnLog, previous: Option<SpecialRollType>, now: Timestamp) -> TurnSummary {
    let last = turn.rolls.last();
    let category = last.map_or(SpecialRollType::None, |r| resolve_category(&r.dice, previous));
    let safe = is_safe(category);
    TurnSummary {
        participant_id: turn.participant_id,
        turn_order: turn.turn_order,
        total_rolls_used: turn.rolls.len() as u8,
        is_safe: safe,
        category,
        final_score: if safe { None } else { last.map(|r| score(&r.dice)) },
        last_dice: last.map(|r| r.dice),
        completed_at: last.map_or(now, |r| r.at),
    }
}
