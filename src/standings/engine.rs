use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use super::drop::select_dropped_round;
use super::points::{ATTENDANCE_BONUS, ATTENDANCE_MISS_LIMIT};
use super::ranking::rank_standings;
use super::rounds::{aggregate_rounds, RoundSet};
use crate::snapshot::{DriverId, Penalty, RaceResult, RoundId};

/// How a driver's total was put together, for verbose output and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingBreakdown {
    pub rounds_counted: Vec<RoundId>,
    pub round_points: i64,      // Sum over counted rounds
    pub dropped_round: Option<RoundId>,
    pub suspended_rounds: Vec<RoundId>,
    pub missed_rounds: usize,   // Rounds where every race was missed or suspended
    pub attendance_bonus: i64,
    pub penalty_points: i64,
}

/// A driver's final result in one competition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub driver_id: DriverId,
    pub total_points: i64,
    pub pole_positions: u32,
    pub breakdown: StandingBreakdown,
}

/// Total up an already aggregated round set.
///
/// Suspended rounds and the dropped round are left out. Disqualified rounds
/// that are not suspended still count with whatever their other races earned.
/// No floor is applied after the penalty, so totals can go negative.
pub fn total_from_rounds(
    set: &RoundSet,
    dropped_round: Option<RoundId>,
    penalty_points: i64,
) -> (i64, StandingBreakdown) {
    let mut round_points = 0;
    let mut rounds_counted = Vec::new();
    let mut suspended_rounds = Vec::new();

    for (round_id, round) in &set.rounds {
        if round.is_suspended {
            suspended_rounds.push(*round_id);
            continue;
        }
        if Some(*round_id) == dropped_round {
            continue;
        }
        round_points += round.total_points;
        rounds_counted.push(*round_id);
    }

    let missed_rounds = set.rounds.values().filter(|r| r.fully_missed()).count();
    let attendance_bonus = if missed_rounds < ATTENDANCE_MISS_LIMIT {
        ATTENDANCE_BONUS
    } else {
        0
    };

    // Penalties come straight from the snapshot, so clamp instead of overflowing
    let total = (round_points + attendance_bonus).saturating_sub(penalty_points);

    (
        total,
        StandingBreakdown {
            rounds_counted,
            round_points,
            dropped_round,
            suspended_rounds,
            missed_rounds,
            attendance_bonus,
            penalty_points,
        },
    )
}

/// Compute one driver's standing from their rows in a single competition.
pub fn calculate_standing<'a, I>(
    driver_id: DriverId,
    rows: I,
    penalty_points: i64,
    last_round: Option<RoundId>,
) -> Standing
where
    I: IntoIterator<Item = &'a RaceResult>,
{
    let set = aggregate_rounds(rows);
    let dropped_round = select_dropped_round(&set.rounds, last_round);
    let (total_points, breakdown) = total_from_rounds(&set, dropped_round, penalty_points);

    tracing::trace!(
        driver_id,
        rounds = set.rounds.len(),
        ?dropped_round,
        total_points,
        "driver standing computed"
    );

    Standing {
        driver_id,
        total_points,
        pole_positions: set.pole_positions,
        breakdown,
    }
}

/// Sum penalty rows per driver, saturating at the `i64` bounds.
pub fn penalty_totals(penalties: &[Penalty]) -> BTreeMap<DriverId, i64> {
    let mut totals = BTreeMap::new();
    for penalty in penalties {
        let total = totals.entry(penalty.driver_id).or_insert(0i64);
        *total = total.saturating_add(penalty.penalty_points);
    }
    totals
}

/// Compute ranked standings for every driver of one competition.
///
/// `results` and `penalties` must already be scoped to a single competition.
/// Drivers are computed independently in parallel and joined back in
/// ascending driver id before ranking, so equal totals keep driver id order.
pub fn calculate_standings(
    results: &[RaceResult],
    penalties: &[Penalty],
    last_round: Option<RoundId>,
) -> Vec<Standing> {
    let penalties = penalty_totals(penalties);

    let mut rows_by_driver: BTreeMap<DriverId, Vec<&RaceResult>> = BTreeMap::new();
    for row in results {
        rows_by_driver.entry(row.driver_id).or_default().push(row);
    }
    // Penalised drivers without a single result still get a standing
    for driver_id in penalties.keys() {
        rows_by_driver.entry(*driver_id).or_default();
    }

    let drivers: Vec<(DriverId, Vec<&RaceResult>)> = rows_by_driver.into_iter().collect();

    tracing::debug!(
        drivers = drivers.len(),
        rows = results.len(),
        ?last_round,
        "calculating standings"
    );

    let standings: Vec<Standing> = drivers
        .par_iter()
        .map(|(driver_id, rows)| {
            let penalty = penalties.get(driver_id).copied().unwrap_or(0);
            calculate_standing(*driver_id, rows.iter().copied(), penalty, last_round)
        })
        .collect();

    rank_standings(standings)
}
