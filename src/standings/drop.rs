use std::collections::BTreeMap;

use super::rounds::RoundAggregate;
use crate::snapshot::RoundId;

/// Pick the round to leave out of a driver's total.
///
/// Candidates exclude the competition's last round and any suspended or
/// disqualified round. The lowest `total_points` wins; on a tie the lowest
/// round id is kept because rounds are walked in ascending order and only a
/// strictly smaller total replaces the current pick.
pub fn select_dropped_round(
    rounds: &BTreeMap<RoundId, RoundAggregate>,
    last_round: Option<RoundId>,
) -> Option<RoundId> {
    let mut worst: Option<&RoundAggregate> = None;

    for round in rounds.values() {
        if Some(round.round_id) == last_round || !round.is_droppable() {
            continue;
        }
        match worst {
            Some(current) if round.total_points >= current.total_points => {}
            _ => worst = Some(round),
        }
    }

    worst.map(|r| r.round_id)
}
