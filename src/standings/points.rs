/// Base points for finishing ranks 1 through 30. Index 0 is P1.
pub const POINTS_TABLE: [i64; 30] = [
    50, 40, 35, 32, 30, 28, 26, 24, 22, 20, //
    19, 18, 17, 16, 15, 14, 13, 12, 11, 10, //
    9, 8, 7, 6, 5, 4, 3, 2, 1, 1,
];

/// Bonus for starting from pole, added to the race's points.
pub const POLE_BONUS: i64 = 3;

/// Awarded once per competition to drivers who missed fewer than
/// `ATTENDANCE_MISS_LIMIT` whole rounds.
pub const ATTENDANCE_BONUS: i64 = 15;
pub const ATTENDANCE_MISS_LIMIT: usize = 2;

/// Base points for a raw position value.
///
/// Positions outside 1..=30, including every sentinel code, score 0.
pub fn points(position: i32) -> i64 {
    if position < 1 {
        return 0;
    }
    POINTS_TABLE
        .get(position as usize - 1)
        .copied()
        .unwrap_or(0)
}

pub fn pole_bonus() -> i64 {
    POLE_BONUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{DISQUALIFIED, MISSED, SUSPENDED};

    #[test]
    fn test_podium_points() {
        assert_eq!(points(1), 50);
        assert_eq!(points(2), 40);
        assert_eq!(points(3), 35);
    }

    #[test]
    fn test_tail_of_table() {
        assert_eq!(points(28), 2);
        assert_eq!(points(29), 1);
        assert_eq!(points(30), 1);
        assert_eq!(points(31), 0);
    }

    #[test]
    fn test_out_of_range_positions() {
        assert_eq!(points(0), 0);
        assert_eq!(points(-1), 0);
        assert_eq!(points(i32::MIN), 0);
        assert_eq!(points(i32::MAX), 0);
    }

    #[test]
    fn test_sentinels_score_nothing() {
        assert_eq!(points(MISSED), 0);
        assert_eq!(points(SUSPENDED), 0);
        assert_eq!(points(DISQUALIFIED), 0);
    }

    #[test]
    fn test_table_never_increases() {
        for pair in POINTS_TABLE.windows(2) {
            assert!(pair[0] >= pair[1], "{} then {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_pole_bonus() {
        assert_eq!(pole_bonus(), 3);
    }
}
