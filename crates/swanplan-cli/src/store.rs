//! On-disk state for the CLI.
//!
//! The core engine is storage-agnostic; this store owns the JSON files it
//! needs between invocations: the change log and the latest insight batch.
//! Files live under `~/.local/share/swanplan` by default and are written
//! atomically (temp file + rename) so a crash never leaves a half-written
//! log behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use swanplan_core::autopilot::ChangeLog;
use swanplan_core::models::Insight;

const CHANGES_FILE: &str = "changes.json";
const INSIGHTS_FILE: &str = "insights.json";

/// Return the swanplan data directory.
///
/// Always uses XDG layout: `$XDG_DATA_HOME/swanplan` or
/// `~/.local/share/swanplan`.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("swanplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("swanplan")
}

pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default data directory, honoring an optional
    /// CLI override.
    pub fn resolve(cli_dir: Option<&Path>) -> Self {
        match cli_dir {
            Some(dir) => Self::new(dir),
            None => Self::new(data_dir()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the change log, or an empty one if none has been written yet.
    pub fn load_changes(&self) -> Result<ChangeLog> {
        let path = self.dir.join(CHANGES_FILE);
        if !path.exists() {
            return Ok(ChangeLog::new());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save_changes(&self, log: &ChangeLog) -> Result<()> {
        self.write_atomic(CHANGES_FILE, log)
    }

    /// Load the latest insight batch, or an empty one.
    pub fn load_insights(&self) -> Result<Vec<Insight>> {
        let path = self.dir.join(INSIGHTS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Replace the stored insight batch. A pass always supersedes the
    /// previous batch wholesale.
    pub fn save_insights(&self, insights: &[Insight]) -> Result<()> {
        self.write_atomic(INSIGHTS_FILE, &insights)
    }

    fn write_atomic<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create data directory {}", self.dir.display()))?;
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));

        let contents = serde_json::to_string_pretty(value).context("failed to serialize state")?;
        std::fs::write(&tmp, &contents)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use swanplan_core::autopilot::{new_change, Disposition};
    use swanplan_core::models::{
        ChangeKind, ChangeScope, ChangeStatus, Insight, InsightCategory, Severity,
    };
    use uuid::Uuid;

    use super::*;

    fn store() -> (tempfile::TempDir, Store) {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = Store::new(tmp.path().join("swanplan"));
        (tmp, store)
    }

    #[test]
    fn missing_files_load_as_empty_state() {
        let (_tmp, store) = store();
        assert!(store.load_changes().unwrap().all().is_empty());
        assert!(store.load_insights().unwrap().is_empty());
    }

    #[test]
    fn change_log_round_trips() {
        let (_tmp, store) = store();

        let mut log = ChangeLog::new();
        let id = log
            .record(
                new_change(
                    ChangeKind::RecipeSwap,
                    ChangeScope::Household,
                    "salmon",
                    "Swap salmon for sardines",
                    "saves $18.00 per week",
                ),
                Disposition::RequireApproval,
            )
            .unwrap();
        store.save_changes(&log).unwrap();

        let loaded = store.load_changes().unwrap();
        assert_eq!(loaded, log);
        assert_eq!(loaded.get(id).unwrap().status, ChangeStatus::PendingApproval);
    }

    #[test]
    fn saving_insights_replaces_the_previous_batch() {
        let (_tmp, store) = store();

        let insight = |title: &str| Insight {
            id: Uuid::new_v4(),
            severity: Severity::Info,
            category: InsightCategory::Nutrition,
            person: None,
            title: title.to_owned(),
            message: String::new(),
            suggested_action: None,
            emitted_at: Utc::now(),
        };

        store.save_insights(&[insight("first"), insight("second")]).unwrap();
        store.save_insights(&[insight("third")]).unwrap();

        let loaded = store.load_insights().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "third");
    }

    #[test]
    fn no_temp_file_is_left_behind() {
        let (_tmp, store) = store();
        store.save_changes(&ChangeLog::new()).unwrap();
        assert!(!store.dir().join("changes.json.tmp").exists());
        assert!(store.dir().join("changes.json").exists());
    }
}
