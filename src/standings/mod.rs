pub mod drop;
pub mod engine;
pub mod highlights;
pub mod points;
pub mod ranking;
pub mod rounds;
pub mod stats;

pub use drop::select_dropped_round;
pub use engine::{calculate_standing, calculate_standings, Standing, StandingBreakdown};
pub use highlights::{round_highlights, RoundHighlight, NOT_AVAILABLE};
pub use points::{points, pole_bonus, ATTENDANCE_BONUS, POLE_BONUS};
pub use ranking::rank_standings;
pub use rounds::{aggregate_rounds, RoundAggregate, RoundSet};
pub use stats::{driver_stats, DriverStats};
