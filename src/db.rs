//! Persisted application state and the service that loads and saves it.
//!
//! The state file is a single JSON document holding the selected language,
//! the completion API key, the theme flag and the board's cards grouped by
//! column index.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::{Board, PersistedColumns};
use crate::error::Result;
use crate::task::TaskRecord;

/// One task record as written to the state file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedTask {
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub reward: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl PersistedTask {
    /// A record with only a title, as found in hand-written state files.
    pub fn titled(title: &str) -> Self {
        PersistedTask {
            title: title.to_string(),
            ..PersistedTask::default()
        }
    }

    pub fn from_record(record: &TaskRecord) -> Self {
        PersistedTask {
            title: record.title.clone(),
            desc: Some(record.description.clone()),
            reward: record.reward.clone(),
            deadline: record.deadline.clone(),
            timestamp: Some(record.timestamp()),
        }
    }
}

/// The whole state document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub is_light_theme: bool,
    #[serde(default)]
    pub tasks: PersistedColumns,
}

fn default_lang() -> String {
    "en_US".to_string()
}

impl Default for AppData {
    /// First-run document: English, dark theme, one example card.
    fn default() -> Self {
        let mut tasks = PersistedColumns::new();
        tasks.insert("0".to_string(), vec![PersistedTask::titled("Example")]);
        AppData {
            lang: default_lang(),
            api_key: String::new(),
            is_light_theme: false,
            tasks,
        }
    }
}

impl AppData {
    /// Rebuild the board held by this document.
    pub fn board(&self) -> Board {
        Board::deserialize(&self.tasks)
    }

    /// Replace the stored cards with the board's current contents.
    pub fn store_board(&mut self, board: &Board) {
        self.tasks = board.serialize();
    }
}

/// Loads and saves the state document at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state document.
    ///
    /// A missing file yields the first-run document, which is written out
    /// immediately. A corrupted file is moved aside to `<name>.corrupt` and
    /// replaced by the first-run document.
    pub fn load(&self) -> Result<AppData> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "No state file, creating one");
            let data = AppData::default();
            self.save(&data)?;
            return Ok(data);
        }
        let text = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<AppData>(&text) {
            Ok(data) => Ok(data),
            Err(e) => {
                let aside = self.corrupt_path();
                warn!(error = %e, aside = %aside.display(), "State file corrupted, starting fresh");
                fs::rename(&self.path, &aside)?;
                let data = AppData::default();
                self.save(&data)?;
                Ok(data)
            }
        }
    }

    /// Save the state document using atomic write (temp file + rename).
    pub fn save(&self, data: &AppData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let json = serde_json::to_string_pretty(data)?;
        f.write_all(json.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }

    fn corrupt_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "data.json".into());
        name.push(".corrupt");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Column;

    #[test]
    fn test_load_creates_first_run_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("data.json"));
        let data = store.load().unwrap();
        assert_eq!(data.lang, "en_US");
        assert_eq!(data.tasks["0"][0].title, "Example");
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("nested").join("data.json"));
        let mut data = AppData::default();
        data.api_key = "sk-test".into();
        data.is_light_theme = true;
        let mut board = data.board();
        let mut done = TaskRecord::new("Ship", "Release 1.0", Some("Holiday"), None).unwrap();
        done.column = Column::Done;
        board.add_card(done);
        data.store_board(&board);

        store.save(&data).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, data);
        assert_eq!(loaded.board().column(Column::Done)[0].record.title, "Ship");
    }

    #[test]
    fn test_reads_legacy_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{"lang": "ru_RU", "api_key": "KEY", "is_light_theme": false,
                "tasks": {"0": [{"title": "Example"}], "2": [{"title": "Done", "desc": "d", "reward": "", "deadline": null, "timestamp": "[10:00:00] [01.02.23]"}]}}"#,
        )
        .unwrap();
        let data = StateStore::new(&path).load().unwrap();
        assert_eq!(data.lang, "ru_RU");
        let board = data.board();
        assert_eq!(board.len(), 2);
        assert_eq!(board.column(Column::Done)[0].record.reward, None);
    }

    #[test]
    fn test_corrupted_file_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{not json").unwrap();
        let data = StateStore::new(&path).load().unwrap();
        assert_eq!(data, AppData::default());
        assert!(dir.path().join("data.json.corrupt").exists());
    }
}
