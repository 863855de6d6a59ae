use super::CompetitionReport;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::path::Path;

/// Save a competition report as pretty JSON, atomically
///
/// The target is never left half-written: either the old file or the complete
/// new one is on disk.
pub fn save_report(path: &Path, report: &CompetitionReport) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize standings")?;

    file.commit()
        .with_context(|| format!("Failed to save standings to {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        competition = report.competition_id,
        drivers = report.standings.len(),
        "standings exported"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{HighlightRow, StandingRow};
    use crate::standings::StandingBreakdown;
    use std::env;

    fn sample_report() -> CompetitionReport {
        CompetitionReport {
            competition_id: 4,
            name: "Night Series".to_string(),
            last_round: Some(2),
            standings: vec![StandingRow {
                rank: 1,
                driver_id: 8,
                name: "Tom Hill".to_string(),
                numero: Some(8),
                total_points: -3,
                pole_positions: 2,
                breakdown: StandingBreakdown {
                    rounds_counted: vec![2],
                    round_points: 0,
                    dropped_round: Some(1),
                    suspended_rounds: vec![],
                    missed_rounds: 2,
                    attendance_bonus: 0,
                    penalty_points: 3,
                },
            }],
            rounds: vec![HighlightRow {
                round_id: 1,
                name: "Round 1".to_string(),
                date: None,
                race_winner: "N/A".to_string(),
                pole_sitter: "Tom Hill".to_string(),
            }],
        }
    }

    #[test]
    fn test_save_report_writes_json() {
        let temp_path = env::temp_dir().join("paddock_test_export.json");
        let _ = std::fs::remove_file(&temp_path);

        save_report(&temp_path, &sample_report()).unwrap();

        let written = std::fs::read_to_string(&temp_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["name"], "Night Series");
        assert_eq!(value["standings"][0]["total_points"], -3);
        assert_eq!(value["standings"][0]["breakdown"]["dropped_round"], 1);
        assert_eq!(value["rounds"][0]["race_winner"], "N/A");

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_save_report_overwrites() {
        let temp_path = env::temp_dir().join("paddock_test_export_overwrite.json");
        std::fs::write(&temp_path, "stale").unwrap();

        save_report(&temp_path, &sample_report()).unwrap();

        let written = std::fs::read_to_string(&temp_path).unwrap();
        assert!(written.contains("Night Series"));
        assert!(!written.contains("stale"));

        let _ = std::fs::remove_file(&temp_path);
    }
}
