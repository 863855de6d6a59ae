use std::collections::BTreeMap;

use super::points::{points, POLE_BONUS};
use crate::snapshot::{Position, RaceId, RaceResult, RoundId};

/// One race as it counts toward a round
#[derive(Debug, Clone, PartialEq)]
pub struct RaceEntry {
    pub race_id: RaceId,
    pub position: i32,
    pub points: i64,
    pub is_pole: bool,
}

/// A driver's results within a single round, rebuilt on every computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundAggregate {
    pub round_id: RoundId,
    pub total_points: i64,
    pub is_suspended: bool,
    pub has_disqualification: bool,
    pub races: Vec<RaceEntry>,
    pub missed_race_count: usize,
}

impl RoundAggregate {
    fn new(round_id: RoundId) -> Self {
        Self {
            round_id,
            total_points: 0,
            is_suspended: false,
            has_disqualification: false,
            races: Vec::new(),
            missed_race_count: 0,
        }
    }

    /// Driver was missing (or suspended) for every race of the round
    pub fn fully_missed(&self) -> bool {
        self.missed_race_count == self.races.len()
    }

    /// Can this round be the dropped one? Void rounds never are.
    pub fn is_droppable(&self) -> bool {
        !self.is_suspended && !self.has_disqualification
    }
}

/// Per-round aggregates for one driver plus the pole count across all rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundSet {
    pub rounds: BTreeMap<RoundId, RoundAggregate>,
    pub pole_positions: u32,
}

/// Points a single race row is worth before any round-level rule applies.
pub fn race_points(row: &RaceResult) -> i64 {
    match row.outcome() {
        Position::Suspended | Position::Disqualified => 0,
        _ => {
            let bonus = if row.is_pole { POLE_BONUS } else { 0 };
            points(row.position) + bonus
        }
    }
}

/// Group one driver's rows by round in a single pass.
pub fn aggregate_rounds<'a, I>(rows: I) -> RoundSet
where
    I: IntoIterator<Item = &'a RaceResult>,
{
    let mut set = RoundSet::default();

    for row in rows {
        let outcome = row.outcome();
        let round = set
            .rounds
            .entry(row.round_id)
            .or_insert_with(|| RoundAggregate::new(row.round_id));

        round.is_suspended |= outcome == Position::Suspended;
        round.has_disqualification |= outcome == Position::Disqualified;

        let race_points = race_points(row);
        round.total_points += race_points;
        round.races.push(RaceEntry {
            race_id: row.race_id,
            position: row.position,
            points: race_points,
            is_pole: row.is_pole,
        });

        if matches!(outcome, Position::Missed | Position::Suspended) {
            round.missed_race_count += 1;
        }

        // Poles count no matter what happened in the race
        if row.is_pole {
            set.pole_positions += 1;
        }
    }

    set
}
