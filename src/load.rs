use anyhow::Result;
use crate::config::SnapshotSource;
use crate::snapshot::{load_snapshot, Snapshot};
use futures::stream::{FuturesUnordered, StreamExt};

/// Read every snapshot source concurrently and merge them into one snapshot.
///
/// Files are parsed on the blocking pool in parallel but merged in the order
/// they were given, so the combined row order never depends on which read
/// finished first. A failed source is logged and skipped; the call only fails
/// when every source failed.
pub async fn load_snapshots(sources: &[SnapshotSource]) -> Result<Snapshot> {
    let mut futures = FuturesUnordered::new();
    for (index, source) in sources.iter().enumerate() {
        let path = source.path.clone();
        let label = source.label();
        futures.push(async move {
            let result = tokio::task::spawn_blocking(move || load_snapshot(&path)).await;
            (index, label, result)
        });
    }

    let mut loaded: Vec<Option<Snapshot>> = vec![None; sources.len()];
    let mut any_succeeded = false;

    while let Some((index, label, result)) = futures.next().await {
        match result {
            Ok(Ok(snapshot)) => {
                tracing::debug!(
                    source = %label,
                    results = snapshot.results.len(),
                    "snapshot source loaded"
                );
                loaded[index] = Some(snapshot);
                any_succeeded = true;
            }
            Ok(Err(e)) => {
                tracing::warn!(source = %label, "snapshot load failed: {:#}", e);
            }
            Err(e) => {
                tracing::warn!(source = %label, "snapshot load task failed: {}", e);
            }
        }
    }

    if !any_succeeded && !sources.is_empty() {
        anyhow::bail!("All snapshot sources failed to load. Check the paths in your config.");
    }

    let mut merged = Snapshot::default();
    for snapshot in loaded.into_iter().flatten() {
        merged.merge(snapshot);
    }

    tracing::debug!(
        sources = sources.len(),
        competitions = merged.competitions.len(),
        results = merged.results.len(),
        "snapshots merged"
    );

    Ok(merged)
}
