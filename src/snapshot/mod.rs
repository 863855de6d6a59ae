pub mod storage;
pub mod types;
pub mod validation;

pub use storage::load_snapshot;
pub use types::{
    Competition, CompetitionId, Driver, DriverId, Penalty, Position, RaceId, RaceResult, RoundId,
    RoundInfo, Snapshot, Team, TeamId, DISQUALIFIED, MISSED, SUSPENDED,
};
pub use validation::validate_snapshot;
