use anyhow::{Context, Result};
use cadence_core::TaskStore;
use std::fs;
use std::path::{Path, PathBuf};

/// `$CADENCE_HOME`, or `~/.cadence`.
pub fn cadence_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CADENCE_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cadence"))
}

pub fn ensure_cadence_home() -> Result<PathBuf> {
    let dir = cadence_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn tasks_path() -> Result<PathBuf> {
    Ok(ensure_cadence_home()?.join("tasks.json"))
}

/// Load the task store; a missing file is an empty store.
pub fn load_store(path: &Path) -> Result<TaskStore> {
    if !path.exists() {
        return Ok(TaskStore::new());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Write via a sibling temp file so a failed write never truncates the store.
pub fn save_store(path: &Path, store: &TaskStore) -> Result<()> {
    let json = serde_json::to_string_pretty(store).context("serialize tasks")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{NewTask, ScoringPolicy, TaskUpdate};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(&dir.path().join("tasks.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_persists_scores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let now = Utc.with_ymd_and_hms(2026, 10, 12, 12, 0, 0).unwrap();

        let mut store = TaskStore::new();
        store
            .create(NewTask::new("Gym", now, now + chrono::Duration::hours(1)), now)
            .unwrap();
        store.update("1", TaskUpdate::complete(), &ScoringPolicy::default(), now).unwrap();
        save_store(&path, &store).unwrap();

        let loaded = load_store(&path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.get("1").unwrap().points, 20);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_store(&path).is_err());
    }
}
