use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub type CompetitionId = u32;
pub type RoundId = u32;
pub type RaceId = u32;
pub type DriverId = u32;
pub type TeamId = u32;

/// Did not start / missed the race.
pub const MISSED: i32 = 8888;
/// Suspended for the round. Voids every race of that round for the driver.
pub const SUSPENDED: i32 = 2222;
/// Disqualified from this race only. The round still counts.
pub const DISQUALIFIED: i32 = 6666;

/// One driver's finishing row in one race.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RaceResult {
    pub competition_id: CompetitionId,
    pub round_id: RoundId,
    pub race_id: RaceId,
    pub driver_id: DriverId,
    /// Finishing rank (1 upward) or one of the sentinel codes
    pub position: i32,
    #[serde(default)]
    pub is_pole: bool,
}

impl RaceResult {
    pub fn outcome(&self) -> Position {
        Position::classify(self.position)
    }
}

/// Decoded meaning of a raw position value.
///
/// Anything that is not a known sentinel is treated as a rank, even when it is
/// zero, negative, or beyond the points table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Rank(i32),
    Missed,
    Suspended,
    Disqualified,
}

impl Position {
    pub fn classify(raw: i32) -> Self {
        match raw {
            MISSED => Position::Missed,
            SUSPENDED => Position::Suspended,
            DISQUALIFIED => Position::Disqualified,
            n => Position::Rank(n),
        }
    }

    /// Rank value if the driver actually finished somewhere
    pub fn rank(self) -> Option<i32> {
        match self {
            Position::Rank(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Penalty {
    pub competition_id: CompetitionId,
    pub driver_id: DriverId,
    pub penalty_points: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    #[serde(default)]
    pub numero: Option<u32>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RoundInfo {
    pub id: RoundId,
    pub competition_id: CompetitionId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl RoundInfo {
    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }
}

/// Everything the engine needs, already fetched from the results store.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub rounds: Vec<RoundInfo>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub results: Vec<RaceResult>,
    #[serde(default)]
    pub penalties: Vec<Penalty>,
}

impl Snapshot {
    /// Append every list of `other` after this snapshot's own rows.
    pub fn merge(&mut self, other: Snapshot) {
        self.competitions.extend(other.competitions);
        self.rounds.extend(other.rounds);
        self.drivers.extend(other.drivers);
        self.teams.extend(other.teams);
        self.results.extend(other.results);
        self.penalties.extend(other.penalties);
    }

    pub fn competition(&self, id: CompetitionId) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.id == id)
    }

    pub fn driver(&self, id: DriverId) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn round(&self, id: RoundId) -> Option<&RoundInfo> {
        self.rounds.iter().find(|r| r.id == id)
    }

    /// Result rows of one competition, in snapshot order
    pub fn results_for(&self, competition: CompetitionId) -> Vec<RaceResult> {
        self.results
            .iter()
            .filter(|r| r.competition_id == competition)
            .cloned()
            .collect()
    }

    pub fn penalties_for(&self, competition: CompetitionId) -> Vec<Penalty> {
        self.penalties
            .iter()
            .filter(|p| p.competition_id == competition)
            .cloned()
            .collect()
    }

    pub fn rounds_for(&self, competition: CompetitionId) -> Vec<RoundInfo> {
        self.rounds
            .iter()
            .filter(|r| r.competition_id == competition)
            .cloned()
            .collect()
    }

    /// Highest round id known for the competition, from the round list and
    /// the result rows alike.
    pub fn last_round(&self, competition: CompetitionId) -> Option<RoundId> {
        let listed = self
            .rounds
            .iter()
            .filter(|r| r.competition_id == competition)
            .map(|r| r.id);
        let raced = self
            .results
            .iter()
            .filter(|r| r.competition_id == competition)
            .map(|r| r.round_id);
        listed.chain(raced).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(competition_id: u32, round_id: u32, driver_id: u32, position: i32) -> RaceResult {
        RaceResult {
            competition_id,
            round_id,
            race_id: round_id * 10,
            driver_id,
            position,
            is_pole: false,
        }
    }

    #[test]
    fn test_classify_sentinels() {
        assert_eq!(Position::classify(8888), Position::Missed);
        assert_eq!(Position::classify(2222), Position::Suspended);
        assert_eq!(Position::classify(6666), Position::Disqualified);
        assert_eq!(Position::classify(3), Position::Rank(3));
    }

    #[test]
    fn test_unknown_codes_are_ranks() {
        assert_eq!(Position::classify(-4), Position::Rank(-4));
        assert_eq!(Position::classify(9999), Position::Rank(9999));
        assert_eq!(Position::classify(0).rank(), Some(0));
        assert_eq!(Position::Missed.rank(), None);
    }

    #[test]
    fn test_last_round_uses_listed_and_raced_rounds() {
        let mut snapshot = Snapshot::default();
        snapshot.results = vec![row(1, 2, 7, 1), row(1, 3, 7, 2), row(2, 9, 7, 1)];
        assert_eq!(snapshot.last_round(1), Some(3));

        snapshot.rounds.push(RoundInfo {
            id: 5,
            competition_id: 1,
            name: None,
            date: None,
        });
        assert_eq!(snapshot.last_round(1), Some(5));
        assert_eq!(snapshot.last_round(2), Some(9));
        assert_eq!(snapshot.last_round(3), None);
    }

    #[test]
    fn test_results_for_keeps_order() {
        let mut snapshot = Snapshot::default();
        snapshot.results = vec![row(1, 2, 7, 1), row(2, 1, 7, 1), row(1, 1, 8, 5)];
        let rows = snapshot.results_for(1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].round_id, 2);
        assert_eq!(rows[1].driver_id, 8);
    }

    #[test]
    fn test_merge_appends() {
        let mut a = Snapshot::default();
        a.competitions.push(Competition {
            id: 1,
            name: "Winter Cup".to_string(),
        });
        let mut b = Snapshot::default();
        b.competitions.push(Competition {
            id: 2,
            name: "Summer Cup".to_string(),
        });
        b.results.push(row(2, 1, 1, 1));

        a.merge(b);
        assert_eq!(a.competitions.len(), 2);
        assert_eq!(a.results.len(), 1);
        assert!(a.competition(2).is_some());
    }

    #[test]
    fn test_snapshot_yaml_parse() {
        let yaml = r#"
competitions:
  - id: 1
    name: "Endurance Series"
rounds:
  - id: 1
    competition_id: 1
    name: "Opening Round"
    date: "2024-03-02"
drivers:
  - id: 10
    name: "Rita Moss"
    numero: 44
results:
  - competition_id: 1
    round_id: 1
    race_id: 100
    driver_id: 10
    position: 1
    is_pole: true
  - competition_id: 1
    round_id: 1
    race_id: 101
    driver_id: 10
    position: 8888
"#;
        let snapshot: Snapshot = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(snapshot.results.len(), 2);
        assert!(snapshot.results[0].is_pole);
        assert!(!snapshot.results[1].is_pole);
        assert_eq!(snapshot.results[1].outcome(), Position::Missed);
        assert_eq!(snapshot.rounds[0].year(), Some(2024));
        assert_eq!(snapshot.drivers[0].team_id, None);
        assert!(snapshot.penalties.is_empty());
    }
}
