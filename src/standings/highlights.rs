use std::collections::BTreeMap;

use serde::Serialize;

use crate::snapshot::{DriverId, RaceResult, RoundId, RoundInfo};

/// Label shown when a round has no winner or pole sitter on record
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundHighlight {
    pub round_id: RoundId,
    pub race_winner: Option<DriverId>,
    pub pole_sitter: Option<DriverId>,
}

/// Winner and pole sitter of every round in a competition.
///
/// The winner comes from the round's lead race (lowest race id): whoever
/// finished P1 there. The pole sitter is the first pole row of the round,
/// walking races in id order. Rounds listed in `rounds` but without any rows
/// still appear, with neither set. This never touches points.
pub fn round_highlights(results: &[RaceResult], rounds: &[RoundInfo]) -> Vec<RoundHighlight> {
    let mut by_round: BTreeMap<RoundId, Vec<&RaceResult>> = BTreeMap::new();
    for info in rounds {
        by_round.entry(info.id).or_default();
    }
    for row in results {
        by_round.entry(row.round_id).or_default().push(row);
    }

    by_round
        .into_iter()
        .map(|(round_id, mut rows)| {
            // Stable, so rows of the same race keep snapshot order
            rows.sort_by_key(|r| r.race_id);

            let lead_race = rows.first().map(|r| r.race_id);
            let race_winner = rows
                .iter()
                .filter(|r| Some(r.race_id) == lead_race)
                .find(|r| r.position == 1)
                .map(|r| r.driver_id);
            let pole_sitter = rows.iter().find(|r| r.is_pole).map(|r| r.driver_id);

            RoundHighlight {
                round_id,
                race_winner,
                pole_sitter,
            }
        })
        .collect()
}
