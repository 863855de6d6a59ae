use std::collections::{HashMap, HashSet};

use super::types::{CompetitionId, RoundId, Snapshot};

/// Validate a snapshot's structure before computing anything from it.
/// Returns all validation errors at once (not just the first).
///
/// Position values are deliberately left alone: unknown codes score zero
/// rather than failing.
pub fn validate_snapshot(snapshot: &Snapshot) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (i, competition) in snapshot.competitions.iter().enumerate() {
        if !seen.insert(competition.id) {
            errors.push(format!(
                "competitions[{}].id: duplicate competition id {}",
                i, competition.id
            ));
        }
    }

    let mut seen = HashSet::new();
    for (i, driver) in snapshot.drivers.iter().enumerate() {
        if !seen.insert(driver.id) {
            errors.push(format!("drivers[{}].id: duplicate driver id {}", i, driver.id));
        }
    }

    let mut seen = HashSet::new();
    for (i, team) in snapshot.teams.iter().enumerate() {
        if !seen.insert(team.id) {
            errors.push(format!("teams[{}].id: duplicate team id {}", i, team.id));
        }
    }

    // A round belongs to exactly one competition
    let mut round_owner: HashMap<RoundId, CompetitionId> = HashMap::new();
    for (i, round) in snapshot.rounds.iter().enumerate() {
        match round_owner.get(&round.id) {
            Some(owner) if *owner == round.competition_id => errors.push(format!(
                "rounds[{}].id: duplicate round id {}",
                i, round.id
            )),
            Some(owner) => errors.push(format!(
                "rounds[{}].competition_id: round {} already belongs to competition {}",
                i, round.id, owner
            )),
            None => {
                round_owner.insert(round.id, round.competition_id);
            }
        }
    }

    let mut seen_entries = HashSet::new();
    for (i, result) in snapshot.results.iter().enumerate() {
        let owner = round_owner.get(&result.round_id).copied();
        match owner {
            Some(owner) if owner != result.competition_id => errors.push(format!(
                "results[{}].round_id: round {} belongs to competition {}, not {}",
                i, result.round_id, owner, result.competition_id
            )),
            Some(_) => {}
            None => {
                // Unlisted rounds are fine, but they still get a single owner
                round_owner.insert(result.round_id, result.competition_id);
            }
        }

        if !seen_entries.insert((result.race_id, result.driver_id)) {
            errors.push(format!(
                "results[{}]: driver {} has more than one row for race {}",
                i, result.driver_id, result.race_id
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
