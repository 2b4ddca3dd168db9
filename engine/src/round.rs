use crate::model::{ParticipantId, RoundLog, RoundStatus, RoundSummary, SpecialRollType, Timestamp, TurnSummary};
use crate::rules::{three_of_a_kind_bonus, BASE_PENALTY_SIPS};
use crate::turn::reduce_turn;

/// What a single turn adds to the round penalty.
pub fn penalty_bonus(turn: &TurnSummary) -> u32 {
    match turn.category {
        SpecialRollType::ThreeOfAKind => turn.last_dice.map_or(0, |d| three_of_a_kind_bonus(d.faces()[0])),
        SpecialRollType::Stairs | SpecialRollType::SuperStairs | SpecialRollType::ShitStairs | SpecialRollType::None => 0,
    }
}

/// Folds a round's turns (ascending turn order) into its derived state.
///
/// Each turn is reduced with the resolved category of the turn before it, so a
/// [4,5,6] only keeps its super-stairs status right after a stairs turn.
///
/// `max_rolls` is the configured per-turn limit. The starting player's roll
/// count lowers it once they have rolled.
///
/// The loser is the unsafe turn with the lowest score; on a tie the earlier
/// turn order loses. A round where every turn is safe has no loser.
pub fn reduce_round(round: &RoundLog, max_rolls: u8, now: Timestamp) -> RoundSummary {
    let mut turns: Vec<TurnSummary> = Vec::with_capacity(round.turns.len());
    let mut previous: Option<SpecialRollType> = None;
    let mut penalty = BASE_PENALTY_SIPS;
    let mut lowest: Option<(u32, ParticipantId)> = None;

    for log in &round.turns {
        let turn = reduce_turn(log, previous, now);
        penalty += penalty_bonus(&turn);
        if let Some(score) = turn.final_score {
            // strict `<` keeps the earliest turn on ties
            if lowest.map_or(true, |(best, _)| score < best) { lowest = Some((score, turn.participant_id)); }
        }
        previous = Some(turn.category);
        turns.push(turn);
    }

    let completed = turns.len() == round.player_order.len();
    let max_rolls_allowed = turns
        .first()
        .map(|t| t.total_rolls_used)
        .filter(|&n| n > 0)
        .map_or(max_rolls, |n| n.min(max_rolls));
    let summary = RoundSummary {
        round_number: round.round_number,
        status: if completed { RoundStatus::Completed } else { RoundStatus::InProgress },
        starting_participant: round.player_order.first().copied(),
        next_participant: if completed { None } else { round.player_order.get(turns.len()).copied() },
        max_rolls_allowed,
        current_penalty_sips: penalty,
        final_penalty_sips: completed.then_some(penalty),
        losing_participant: if completed { lowest.map(|(_, p)| p) } else { None },
        started_at: round.started_at,
        completed_at: if completed { turns.last().map(|t| t.completed_at) } else { None },
        turns,
    };
    if completed {
        tracing::debug!(
            round_number = summary.round_number,
            penalty_sips = penalty,
            loser = ?summary.losing_participant,
            "round completed"
        );
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiceSet, Roll, TurnLog, MAX_ROLLS_PER_TURN};
    use proptest::prelude::*;
    use rstest::rstest;

    fn turn(participant_id: u64, turn_order: u32, rolls: &[[u8; 3]]) -> TurnLog {
        TurnLog {
            participant_id,
            turn_order,
            rolls: rolls
                .iter()
                .enumerate()
                .map(|(i, f)| Roll {
                    turn_id: turn_order as u64,
                    roll_number: i as u8 + 1,
                    dice: DiceSet::new(*f).unwrap(),
                    at: turn_order as u64 * 100 + i as u64,
                })
                .collect(),
        }
    }

    fn round(order: &[u64], turns: Vec<TurnLog>) -> RoundLog {
        RoundLog { round_number: 1, player_order: order.to_vec(), started_at: 10, turns }
    }

    #[test]
    fn game_example_round() {
        let r = round(
            &[1, 2, 3, 4],
            vec![
                turn(1, 1, &[[4, 4, 2], [1, 3, 1]]),
                turn(2, 2, &[[3, 3, 3]]),
                turn(3, 3, &[[5, 5, 6], [2, 1, 3]]),
                turn(4, 4, &[[6, 2, 5]]),
            ],
        );
        let s = reduce_round(&r, MAX_ROLLS_PER_TURN, 0);
        assert_eq!(s.status, RoundStatus::Completed);
        assert_eq!(s.turns[0].final_score, Some(203));
        assert_eq!(s.turns[3].final_score, Some(67));
        assert_eq!(s.current_penalty_sips, 4);
        assert_eq!(s.final_penalty_sips, Some(4));
        assert_eq!(s.losing_participant, Some(4));
        assert_eq!(s.max_rolls_allowed, 2);
        assert_eq!(s.completed_at, Some(400));
        assert_eq!(s.next_participant, None);
    }

    #[test]
    fn all_safe_round_has_no_loser() {
        let r = round(&[1, 2, 3], vec![turn(1, 1, &[[2, 2, 2]]), turn(2, 2, &[[1, 2, 3]]), turn(3, 3, &[[6, 6, 6]])]);
        let s = reduce_round(&r, MAX_ROLLS_PER_TURN, 0);
        assert!(s.is_completed());
        assert_eq!(s.losing_participant, None);
        assert_eq!(s.final_penalty_sips, Some(1 + 2 + 6));
    }

    #[test]
    fn plain_round_costs_one_sip() {
        let r = round(&[1, 2], vec![turn(1, 1, &[[1, 3, 5]]), turn(2, 2, &[[2, 4, 6]])]);
        let s = reduce_round(&r, MAX_ROLLS_PER_TURN, 0);
        assert_eq!(s.current_penalty_sips, 1);
        assert_eq!(s.losing_participant, Some(2));
    }

    #[test]
    fn triple_ones_add_seven() {
        let r = round(&[1, 2], vec![turn(1, 1, &[[1, 1, 1]])]);
        assert_eq!(reduce_round(&r, MAX_ROLLS_PER_TURN, 0).current_penalty_sips, 8);
    }

    #[test]
    fn tie_goes_to_earlier_turn() {
        let r = round(&[1, 2, 3], vec![turn(1, 1, &[[4, 4, 2]]), turn(2, 2, &[[2, 4, 4]]), turn(3, 3, &[[5, 5, 5]])]);
        assert_eq!(reduce_round(&r, MAX_ROLLS_PER_TURN, 0).losing_participant, Some(1));
    }

    #[test]
    fn in_progress_round_hides_final_fields() {
        let r = round(&[1, 2, 3], vec![turn(1, 1, &[[1, 3, 5]]), turn(2, 2, &[[4, 4, 4]])]);
        let s = reduce_round(&r, MAX_ROLLS_PER_TURN, 0);
        assert_eq!(s.status, RoundStatus::InProgress);
        assert_eq!(s.current_penalty_sips, 5);
        assert_eq!(s.final_penalty_sips, None);
        assert_eq!(s.losing_participant, None);
        assert_eq!(s.completed_at, None);
        assert_eq!(s.next_participant, Some(3));
        assert_eq!(s.starting_participant, Some(1));
    }

    #[test]
    fn empty_round_defaults() {
        let s = reduce_round(&round(&[4, 2], vec![]), MAX_ROLLS_PER_TURN, 0);
        assert_eq!(s.status, RoundStatus::InProgress);
        assert_eq!(s.max_rolls_allowed, 3);
        assert_eq!(s.current_penalty_sips, 1);
        assert_eq!(s.next_participant, Some(4));
    }

    #[test]
    fn first_turn_without_rolls_keeps_default_ceiling() {
        let s = reduce_round(&round(&[1, 2], vec![turn(1, 1, &[])]), MAX_ROLLS_PER_TURN, 0);
        assert_eq!(s.max_rolls_allowed, 3);
    }

    #[rstest]
    #[case(&[], 2)]
    #[case(&[[1, 3, 5]], 1)]
    #[case(&[[1, 3, 5], [2, 2, 4]], 2)]
    fn ceiling_follows_configured_limit(#[case] first: &[[u8; 3]], #[case] expected: u8) {
        let s = reduce_round(&round(&[1, 2], vec![turn(1, 1, first)]), 2, 0);
        assert_eq!(s.max_rolls_allowed, expected);
    }

    #[test]
    fn super_stairs_chain_resolution() {
        let r = round(
            &[1, 2, 3, 4],
            vec![
                turn(1, 1, &[[4, 5, 6]]),
                turn(2, 2, &[[1, 2, 3]]),
                turn(3, 3, &[[6, 5, 4]]),
                turn(4, 4, &[[5, 4, 6]]),
            ],
        );
        let s = reduce_round(&r, MAX_ROLLS_PER_TURN, 0);
        let cats: Vec<_> = s.turns.iter().map(|t| t.category).collect();
        assert_eq!(
            cats,
            vec![SpecialRollType::None, SpecialRollType::Stairs, SpecialRollType::SuperStairs, SpecialRollType::None]
        );
        // turns 1 and 4 both rolled 69; the earlier one loses
        assert_eq!(s.losing_participant, Some(1));
    }

    #[rstest]
    #[case(0, RoundStatus::InProgress)]
    #[case(1, RoundStatus::InProgress)]
    #[case(2, RoundStatus::InProgress)]
    #[case(3, RoundStatus::Completed)]
    fn completes_exactly_when_everyone_played(#[case] played: usize, #[case] expected: RoundStatus) {
        let turns = (0..played).map(|i| turn(i as u64 + 1, i as u32 + 1, &[[1, 3, 5]])).collect();
        assert_eq!(reduce_round(&round(&[1, 2, 3], turns), MAX_ROLLS_PER_TURN, 0).status, expected);
    }

    proptest! {
        #[test]
        fn status_and_penalty_hold(
            n in 1usize..7,
            rolls in proptest::collection::vec([1u8..=6, 1u8..=6, 1u8..=6], 0..7),
        ) {
            let order: Vec<u64> = (1..=n as u64).collect();
            let turns: Vec<TurnLog> = rolls
                .iter()
                .take(n)
                .enumerate()
                .map(|(i, f)| turn(i as u64 + 1, i as u32 + 1, &[*f]))
                .collect();
            let played = turns.len();
            let s = reduce_round(&round(&order, turns), MAX_ROLLS_PER_TURN, 0);
            prop_assert!(s.current_penalty_sips >= 1);
            prop_assert_eq!(s.is_completed(), played == n);
            if let Some(loser) = s.losing_participant {
                let loser_turn = s.turns.iter().find(|t| t.participant_id == loser).unwrap();
                let min = s.turns.iter().filter_map(|t| t.final_score).min();
                prop_assert_eq!(loser_turn.final_score, min);
            }
        }
    }
}
