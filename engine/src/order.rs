use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use crate::error::{EngineError, EngineResult};
use crate::model::ParticipantId;

/// Player order for a new round: `starting` first, everyone else after in input
/// order, shuffled when `randomize` is set.
pub fn create_player_order<R: Rng + ?Sized>(
    starting: ParticipantId,
    all: &[ParticipantId],
    randomize: bool,
    rng: &mut R,
) -> EngineResult<Vec<ParticipantId>> {
    validate_participants(all)?;
    if !all.contains(&starting) {
        return Err(EngineError::MalformedPlayerOrder(format!("starting participant {starting} is not seated")));
    }
    let mut rest: Vec<ParticipantId> = all.iter().copied().filter(|&p| p != starting).collect();
    // SliceRandom::shuffle is a Fisher-Yates pass.
    if randomize { rest.shuffle(rng); }
    let mut order = Vec::with_capacity(all.len());
    order.push(starting);
    order.extend(rest);
    Ok(order)
}

pub(crate) fn validate_participants(all: &[ParticipantId]) -> EngineResult<()> {
    if all.is_empty() {
        return Err(EngineError::MalformedPlayerOrder("no participants".into()));
    }
    let mut seen = HashSet::with_capacity(all.len());
    if let Some(dup) = all.iter().find(|p| !seen.insert(**p)) {
        return Err(EngineError::MalformedPlayerOrder(format!("participant {dup} listed twice")));
    }
    Ok(())
}

/// Checks a stored order against the session's seats: same set, no repeats.
pub fn validate_player_order(order: &[ParticipantId], seated: &[ParticipantId]) -> EngineResult<()> {
    validate_participants(order)?;
    let want: HashSet<_> = seated.iter().collect();
    let got: HashSet<_> = order.iter().collect();
    if want != got || order.len() != seated.len() {
        return Err(EngineError::MalformedPlayerOrder("order does not match seated participants".into()));
    }
    Ok(())
}
