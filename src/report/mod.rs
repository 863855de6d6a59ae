pub mod export;

pub use export::save_report;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::snapshot::{CompetitionId, Driver, DriverId, RoundId, Snapshot, Team, TeamId};
use crate::standings::{
    calculate_standings, driver_stats, round_highlights, DriverStats, Standing,
    StandingBreakdown, NOT_AVAILABLE,
};

/// Number of most recent races listed on a driver report
pub const RECENT_RACES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    CompetitionNotFound(CompetitionId),
    DriverNotFound(DriverId),
    TeamNotFound(TeamId),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::CompetitionNotFound(id) => write!(f, "Competition {} not found", id),
            LookupError::DriverNotFound(id) => write!(f, "Driver {} not found", id),
            LookupError::TeamNotFound(id) => write!(f, "Team {} not found", id),
        }
    }
}

impl std::error::Error for LookupError {}

/// A ranked standing with the driver's display details attached
#[derive(Debug, Clone, Serialize)]
pub struct StandingRow {
    pub rank: usize, // 1-based
    pub driver_id: DriverId,
    pub name: String,
    pub numero: Option<u32>,
    pub total_points: i64,
    pub pole_positions: u32,
    pub breakdown: StandingBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct HighlightRow {
    pub round_id: RoundId,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub race_winner: String,
    pub pole_sitter: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitionReport {
    pub competition_id: CompetitionId,
    pub name: String,
    pub last_round: Option<RoundId>,
    pub standings: Vec<StandingRow>,
    pub rounds: Vec<HighlightRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverCompetitionRow {
    pub competition_id: CompetitionId,
    pub name: String,
    pub rank: usize,
    pub total_points: i64,
    pub pole_positions: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentRace {
    pub competition: String,
    pub round: String,
    pub date: Option<NaiveDate>,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverReport {
    pub driver: Driver,
    pub team: Option<String>,
    pub stats: DriverStats,
    pub competitions: Vec<DriverCompetitionRow>,
    pub recent_races: Vec<RecentRace>,
}

/// A team member with points summed over every competition they scored in
#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberRow {
    pub driver_id: DriverId,
    pub name: String,
    pub numero: Option<u32>,
    pub competitions: usize,
    pub total_points: i64,
    pub pole_positions: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub team: Team,
    pub competitions: usize,
    pub drivers: Vec<TeamMemberRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    pub drivers: usize,
    pub competitions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverSummary {
    pub id: DriverId,
    pub name: String,
    pub numero: Option<u32>,
    pub team: Option<String>,
}

fn driver_name(snapshot: &Snapshot, id: DriverId) -> String {
    snapshot
        .driver(id)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| format!("Driver #{}", id))
}

fn round_name(snapshot: &Snapshot, id: RoundId) -> String {
    snapshot
        .round(id)
        .and_then(|r| r.name.clone())
        .unwrap_or_else(|| format!("Round {}", id))
}

fn ranked_standings(snapshot: &Snapshot, competition: CompetitionId) -> Vec<Standing> {
    let results = snapshot.results_for(competition);
    let penalties = snapshot.penalties_for(competition);
    calculate_standings(&results, &penalties, snapshot.last_round(competition))
}

/// Competitions a set of drivers has results or penalties in
fn competitions_entered(snapshot: &Snapshot, drivers: &[DriverId]) -> BTreeSet<CompetitionId> {
    let results = snapshot
        .results
        .iter()
        .filter(|r| drivers.contains(&r.driver_id))
        .map(|r| r.competition_id);
    let penalties = snapshot
        .penalties
        .iter()
        .filter(|p| drivers.contains(&p.driver_id))
        .map(|p| p.competition_id);
    results.chain(penalties).collect()
}

fn team_name(snapshot: &Snapshot, id: TeamId) -> Option<String> {
    snapshot.team(id).map(|t| t.name.clone())
}

/// Standings and round highlights for one competition.
pub fn competition_report(
    snapshot: &Snapshot,
    competition_id: CompetitionId,
) -> Result<CompetitionReport, LookupError> {
    let competition = snapshot
        .competition(competition_id)
        .ok_or(LookupError::CompetitionNotFound(competition_id))?;

    let standings = ranked_standings(snapshot, competition_id)
        .into_iter()
        .enumerate()
        .map(|(i, standing)| {
            let driver = snapshot.driver(standing.driver_id);
            StandingRow {
                rank: i + 1,
                driver_id: standing.driver_id,
                name: driver_name(snapshot, standing.driver_id),
                numero: driver.and_then(|d| d.numero),
                total_points: standing.total_points,
                pole_positions: standing.pole_positions,
                breakdown: standing.breakdown,
            }
        })
        .collect();

    let results = snapshot.results_for(competition_id);
    let listed_rounds = snapshot.rounds_for(competition_id);
    let label = |id: Option<DriverId>| {
        id.map(|id| driver_name(snapshot, id))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    let rounds = round_highlights(&results, &listed_rounds)
        .into_iter()
        .map(|h| HighlightRow {
            round_id: h.round_id,
            name: round_name(snapshot, h.round_id),
            date: snapshot.round(h.round_id).and_then(|r| r.date),
            race_winner: label(h.race_winner),
            pole_sitter: label(h.pole_sitter),
        })
        .collect();

    Ok(CompetitionReport {
        competition_id,
        name: competition.name.clone(),
        last_round: snapshot.last_round(competition_id),
        standings,
        rounds,
    })
}

/// Career statistics and per-competition results for one driver.
pub fn driver_report(
    snapshot: &Snapshot,
    driver_id: DriverId,
) -> Result<DriverReport, LookupError> {
    let driver = snapshot
        .driver(driver_id)
        .ok_or(LookupError::DriverNotFound(driver_id))?;

    let rows: Vec<_> = snapshot
        .results
        .iter()
        .filter(|r| r.driver_id == driver_id)
        .collect();

    let round_years: HashMap<RoundId, i32> = snapshot
        .rounds
        .iter()
        .filter_map(|r| r.year().map(|y| (r.id, y)))
        .collect();
    let stats = driver_stats(rows.iter().copied(), &round_years);

    let entered: BTreeSet<CompetitionId> = rows.iter().map(|r| r.competition_id).collect();
    let competitions = entered
        .into_iter()
        .filter_map(|competition_id| {
            let standings = ranked_standings(snapshot, competition_id);
            let (i, standing) = standings
                .iter()
                .enumerate()
                .find(|(_, s)| s.driver_id == driver_id)?;
            Some(DriverCompetitionRow {
                competition_id,
                name: snapshot
                    .competition(competition_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| format!("Competition {}", competition_id)),
                rank: i + 1,
                total_points: standing.total_points,
                pole_positions: standing.pole_positions,
            })
        })
        .collect();

    // Newest first; undated rounds sort last
    let mut recent = rows.clone();
    recent.sort_by(|a, b| {
        let date_a = snapshot.round(a.round_id).and_then(|r| r.date);
        let date_b = snapshot.round(b.round_id).and_then(|r| r.date);
        date_b.cmp(&date_a).then(b.race_id.cmp(&a.race_id))
    });
    let recent_races = recent
        .into_iter()
        .take(RECENT_RACES)
        .map(|r| RecentRace {
            competition: snapshot
                .competition(r.competition_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("Competition {}", r.competition_id)),
            round: round_name(snapshot, r.round_id),
            date: snapshot.round(r.round_id).and_then(|info| info.date),
            position: r.position,
        })
        .collect();

    Ok(DriverReport {
        driver: driver.clone(),
        team: driver.team_id.and_then(|id| team_name(snapshot, id)),
        stats,
        competitions,
        recent_races,
    })
}

/// A team's drivers with their standing totals, best scorer first.
///
/// Each member's points are the sum of their totals across every competition
/// they appear in. Members with equal points keep snapshot order.
pub fn team_report(snapshot: &Snapshot, team_id: TeamId) -> Result<TeamReport, LookupError> {
    let team = snapshot
        .team(team_id)
        .ok_or(LookupError::TeamNotFound(team_id))?;

    let members: Vec<&Driver> = snapshot
        .drivers
        .iter()
        .filter(|d| d.team_id == Some(team_id))
        .collect();
    let member_ids: Vec<DriverId> = members.iter().map(|d| d.id).collect();
    let entered = competitions_entered(snapshot, &member_ids);

    let standings: Vec<Vec<Standing>> = entered
        .iter()
        .map(|&competition_id| ranked_standings(snapshot, competition_id))
        .collect();

    let mut drivers: Vec<TeamMemberRow> = members
        .iter()
        .map(|driver| {
            let mut row = TeamMemberRow {
                driver_id: driver.id,
                name: driver.name.clone(),
                numero: driver.numero,
                competitions: 0,
                total_points: 0,
                pole_positions: 0,
            };
            for standing in standings.iter().flatten() {
                if standing.driver_id == driver.id {
                    row.competitions += 1;
                    row.total_points = row.total_points.saturating_add(standing.total_points);
                    row.pole_positions += standing.pole_positions;
                }
            }
            row
        })
        .collect();
    drivers.sort_by(|a, b| b.total_points.cmp(&a.total_points));

    tracing::debug!(
        team_id,
        drivers = drivers.len(),
        competitions = entered.len(),
        "team report built"
    );

    Ok(TeamReport {
        team: team.clone(),
        competitions: entered.len(),
        drivers,
    })
}

/// Every team with its driver count and the number of distinct competitions
/// its drivers entered, most active first.
pub fn team_summaries(snapshot: &Snapshot, search: Option<&str>) -> Vec<TeamSummary> {
    let mut teams: Vec<TeamSummary> = snapshot
        .teams
        .iter()
        .filter(|t| matches_search(&t.name, search))
        .map(|team| {
            let member_ids: Vec<DriverId> = snapshot
                .drivers
                .iter()
                .filter(|d| d.team_id == Some(team.id))
                .map(|d| d.id)
                .collect();
            TeamSummary {
                id: team.id,
                name: team.name.clone(),
                drivers: member_ids.len(),
                competitions: competitions_entered(snapshot, &member_ids).len(),
            }
        })
        .collect();
    teams.sort_by(|a, b| b.competitions.cmp(&a.competitions));
    teams
}

/// Drivers in snapshot order, with team names resolved.
pub fn driver_summaries(snapshot: &Snapshot, search: Option<&str>) -> Vec<DriverSummary> {
    snapshot
        .drivers
        .iter()
        .filter(|d| matches_search(&d.name, search))
        .map(|driver| DriverSummary {
            id: driver.id,
            name: driver.name.clone(),
            numero: driver.numero,
            team: driver.team_id.and_then(|id| team_name(snapshot, id)),
        })
        .collect()
}

/// Case-insensitive substring match; no search term matches everything
fn matches_search(name: &str, search: Option<&str>) -> bool {
    match search {
        Some(term) => name.to_lowercase().contains(&term.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Competition, Penalty, RaceResult, RoundInfo};

    fn row(
        round_id: u32,
        race_id: u32,
        driver_id: u32,
        position: i32,
        is_pole: bool,
    ) -> RaceResult {
        RaceResult {
            competition_id: 1,
            round_id,
            race_id,
            driver_id,
            position,
            is_pole,
        }
    }

    fn driver(id: u32, name: &str) -> Driver {
        Driver {
            id,
            name: name.to_string(),
            numero: Some(id * 11),
            team_id: Some(1),
        }
    }

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            competitions: vec![Competition {
                id: 1,
                name: "Regional Karting".to_string(),
            }],
            rounds: vec![
                RoundInfo {
                    id: 1,
                    competition_id: 1,
                    name: Some("Braga".to_string()),
                    date: NaiveDate::from_ymd_opt(2024, 4, 6),
                },
                RoundInfo {
                    id: 2,
                    competition_id: 1,
                    name: Some("Leiria".to_string()),
                    date: NaiveDate::from_ymd_opt(2024, 5, 11),
                },
                RoundInfo {
                    id: 3,
                    competition_id: 1,
                    name: None,
                    date: None,
                },
            ],
            drivers: vec![driver(1, "Ana Prost"), driver(2, "Rui Lauda")],
            teams: vec![Team {
                id: 1,
                name: "Red Kart".to_string(),
            }],
            results: vec![
                row(1, 10, 1, 1, true),
                row(1, 10, 2, 2, false),
                row(2, 20, 1, 2, false),
                row(2, 20, 2, 1, true),
                row(2, 20, 3, 3, false),
            ],
            penalties: vec![Penalty {
                competition_id: 1,
                driver_id: 2,
                penalty_points: 5,
            }],
        }
    }

    #[test]
    fn test_competition_not_found() {
        let err = competition_report(&sample_snapshot(), 42).unwrap_err();
        assert_eq!(err, LookupError::CompetitionNotFound(42));
        assert_eq!(err.to_string(), "Competition 42 not found");
    }

    #[test]
    fn test_driver_not_found() {
        let err = driver_report(&sample_snapshot(), 42).unwrap_err();
        assert_eq!(err.to_string(), "Driver 42 not found");
    }

    #[test]
    fn test_competition_report_standings() {
        let report = competition_report(&sample_snapshot(), 1).unwrap();

        assert_eq!(report.name, "Regional Karting");
        assert_eq!(report.last_round, Some(3));
        // Last round is 3 (listed, never raced) so rounds 1 and 2 are both droppable
        // Ana: 53 and 40, drop 40 -> 53 + 15 = 68
        // Rui: 40 and 53, drop 40 -> 53 + 15 - 5 = 63
        // Unknown driver 3: 35, dropped -> 15
        assert_eq!(report.standings.len(), 3);
        assert_eq!(report.standings[0].name, "Ana Prost");
        assert_eq!(report.standings[0].total_points, 68);
        assert_eq!(report.standings[0].numero, Some(11));
        assert_eq!(report.standings[1].name, "Rui Lauda");
        assert_eq!(report.standings[1].total_points, 63);
        assert_eq!(report.standings[2].name, "Driver #3");
        assert_eq!(report.standings[2].total_points, 15);
        assert_eq!(report.standings[2].rank, 3);
    }

    #[test]
    fn test_competition_report_highlights() {
        let report = competition_report(&sample_snapshot(), 1).unwrap();

        assert_eq!(report.rounds.len(), 3);
        assert_eq!(report.rounds[0].name, "Braga");
        assert_eq!(report.rounds[0].race_winner, "Ana Prost");
        assert_eq!(report.rounds[0].pole_sitter, "Ana Prost");
        assert_eq!(report.rounds[1].race_winner, "Rui Lauda");
        assert_eq!(report.rounds[2].name, "Round 3");
        assert_eq!(report.rounds[2].race_winner, "N/A");
        assert_eq!(report.rounds[2].pole_sitter, "N/A");
    }

    #[test]
    fn test_driver_report() {
        let report = driver_report(&sample_snapshot(), 2).unwrap();

        assert_eq!(report.team.as_deref(), Some("Red Kart"));
        assert_eq!(report.stats.races, 2);
        assert_eq!(report.stats.victories, 1);
        assert_eq!(report.stats.pole_positions, 1);
        assert_eq!(report.stats.races_by_year.get(&2024), Some(&2));

        assert_eq!(report.competitions.len(), 1);
        assert_eq!(report.competitions[0].rank, 2);
        assert_eq!(report.competitions[0].total_points, 63);

        assert_eq!(report.recent_races.len(), 2);
        assert_eq!(report.recent_races[0].round, "Leiria");
        assert_eq!(report.recent_races[1].round, "Braga");
    }

    #[test]
    fn test_driver_without_results() {
        let mut snapshot = sample_snapshot();
        snapshot.drivers.push(Driver {
            id: 9,
            name: "Rookie".to_string(),
            numero: None,
            team_id: None,
        });
        let report = driver_report(&snapshot, 9).unwrap();

        assert_eq!(report.stats, DriverStats::default());
        assert!(report.competitions.is_empty());
        assert!(report.recent_races.is_empty());
        assert!(report.team.is_none());
    }

    #[test]
    fn test_team_not_found() {
        let err = team_report(&sample_snapshot(), 42).unwrap_err();
        assert_eq!(err, LookupError::TeamNotFound(42));
        assert_eq!(err.to_string(), "Team 42 not found");
    }

    #[test]
    fn test_team_report() {
        let report = team_report(&sample_snapshot(), 1).unwrap();

        assert_eq!(report.team.name, "Red Kart");
        assert_eq!(report.competitions, 1);
        assert_eq!(report.drivers.len(), 2);
        assert_eq!(report.drivers[0].name, "Ana Prost");
        assert_eq!(report.drivers[0].numero, Some(11));
        assert_eq!(report.drivers[0].total_points, 68);
        assert_eq!(report.drivers[1].name, "Rui Lauda");
        assert_eq!(report.drivers[1].total_points, 63);
        assert_eq!(report.drivers[1].pole_positions, 1);
    }

    #[test]
    fn test_team_report_sums_competitions() {
        let mut snapshot = sample_snapshot();
        snapshot.competitions.push(Competition {
            id: 2,
            name: "Winter Series".to_string(),
        });
        // Single round, so it is the last round and never dropped: 50 + 15
        snapshot.results.push(RaceResult {
            competition_id: 2,
            round_id: 5,
            race_id: 50,
            driver_id: 1,
            position: 1,
            is_pole: false,
        });

        let report = team_report(&snapshot, 1).unwrap();
        assert_eq!(report.competitions, 2);
        assert_eq!(report.drivers[0].competitions, 2);
        assert_eq!(report.drivers[0].total_points, 68 + 65);
        assert_eq!(report.drivers[1].competitions, 1);
    }

    #[test]
    fn test_team_without_drivers() {
        let mut snapshot = sample_snapshot();
        snapshot.teams.push(Team {
            id: 2,
            name: "Blue Kart".to_string(),
        });

        let report = team_report(&snapshot, 2).unwrap();
        assert!(report.drivers.is_empty());
        assert_eq!(report.competitions, 0);
    }

    #[test]
    fn test_team_summaries() {
        let mut snapshot = sample_snapshot();
        snapshot.teams.insert(
            0,
            Team {
                id: 2,
                name: "Blue Kart".to_string(),
            },
        );

        // Most competitions first, even though Blue Kart is listed first
        let teams = team_summaries(&snapshot, None);
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name, "Red Kart");
        assert_eq!(teams[0].drivers, 2);
        assert_eq!(teams[0].competitions, 1);
        assert_eq!(teams[1].name, "Blue Kart");
        assert_eq!(teams[1].competitions, 0);

        let found = team_summaries(&snapshot, Some("BLUE"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
    }

    #[test]
    fn test_driver_summaries() {
        let drivers = driver_summaries(&sample_snapshot(), None);
        assert_eq!(drivers.len(), 2);
        assert_eq!(drivers[0].name, "Ana Prost");
        assert_eq!(drivers[0].team.as_deref(), Some("Red Kart"));

        let found = driver_summaries(&sample_snapshot(), Some("lauda"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);

        assert!(driver_summaries(&sample_snapshot(), Some("senna")).is_empty());
    }
}
