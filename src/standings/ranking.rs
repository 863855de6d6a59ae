use super::engine::Standing;

/// Order standings by total points, highest first.
///
/// The sort is stable: drivers on equal points keep the order they were
/// handed in.
pub fn rank_standings(mut standings: Vec<Standing>) -> Vec<Standing> {
    standings.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    standings
}
