use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::snapshot::{RaceResult, RoundId};

/// Career counters for a driver, across whatever rows are passed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriverStats {
    pub races: u32,
    pub victories: u32,
    pub top3: u32,
    pub top5: u32,
    pub pole_positions: u32,
    /// Races entered per calendar year, for rounds with a known date
    pub races_by_year: BTreeMap<i32, u32>,
}

/// Tally finishing statistics from a driver's rows.
///
/// Only real finishing ranks count toward victories and top-N finishes;
/// sentinel codes and nonsense ranks (zero or below) never do.
pub fn driver_stats<'a, I>(rows: I, round_years: &HashMap<RoundId, i32>) -> DriverStats
where
    I: IntoIterator<Item = &'a RaceResult>,
{
    let mut stats = DriverStats::default();

    for row in rows {
        stats.races += 1;
        if row.is_pole {
            stats.pole_positions += 1;
        }
        if let Some(rank) = row.outcome().rank().filter(|r| *r >= 1) {
            if rank == 1 {
                stats.victories += 1;
            }
            if rank <= 3 {
                stats.top3 += 1;
            }
            if rank <= 5 {
                stats.top5 += 1;
            }
        }
        if let Some(year) = round_years.get(&row.round_id) {
            *stats.races_by_year.entry(*year).or_insert(0) += 1;
        }
    }

    stats
}
