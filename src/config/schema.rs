use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::snapshot::CompetitionId;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Snapshot files merged, in order, into one data set
    pub snapshots: Vec<SnapshotSource>,
    /// Competition used when a command is not given one
    #[serde(default)]
    pub default_competition: Option<CompetitionId>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SnapshotSource {
    pub name: Option<String>,
    pub path: PathBuf,
}

impl SnapshotSource {
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
