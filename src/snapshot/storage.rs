use super::types::Snapshot;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load a results snapshot from disk
///
/// Files ending in `.json` are read as JSON, everything else as YAML.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file cannot be read
/// - The content cannot be parsed
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        anyhow::bail!("Snapshot file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let snapshot: Snapshot = if is_json {
        serde_json::from_str(&content)
            .with_context(|| {
                format!("Failed to parse snapshot: invalid JSON in {}", path.display())
            })?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| {
                format!("Failed to parse snapshot: invalid YAML in {}", path.display())
            })?
    };

    tracing::debug!(
        path = %path.display(),
        competitions = snapshot.competitions.len(),
        results = snapshot.results.len(),
        penalties = snapshot.penalties.len(),
        "snapshot loaded"
    );

    Ok(snapshot)
}
