use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::stages::Tunables;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub player_name: Option<String>,
    pub max_game_secs: u64,
    pub countdown_secs: u64,
    pub max_active_words: usize,
    pub stage_set: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: None,
            max_game_secs: 90,
            countdown_secs: 3,
            max_active_words: 3,
            stage_set: "standard".to_string(),
        }
    }
}

impl Config {
    pub fn tunables(&self) -> Tunables {
        Tunables {
            countdown: Duration::from_secs(self.countdown_secs),
            max_game_duration: Duration::from_secs(self.max_game_secs),
            max_active_words: self.max_active_words,
            ..Tunables::default()
        }
    }
}

const CONFIG_FILE: &str = "config.json";

pub trait ConfigStore {
    /// An unreadable or malformed file falls back to defaults; a typo in
    /// the config must never keep the game from starting.
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = ProjectDirs::from("", "", "overheat")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(cfg)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn saved_settings_load_back() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config {
            player_name: Some("ada".into()),
            max_game_secs: 45,
            countdown_secs: 1,
            max_active_words: 5,
            stage_set: "short".into(),
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn save_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("overheat").join("config.json");
        let store = FileConfigStore::with_path(&nested);
        store.save(&Config::default()).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn broken_or_absent_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();

        let absent = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(absent.load(), Config::default());

        let garbled = dir.path().join("garbled.json");
        std::fs::write(&garbled, "{\"max_game_secs\": \"ninety\"").unwrap();
        let store = FileConfigStore::with_path(&garbled);
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn config_maps_to_tunables() {
        let cfg = Config {
            max_game_secs: 45,
            countdown_secs: 1,
            max_active_words: 2,
            ..Config::default()
        };
        let t = cfg.tunables();
        assert_eq!(t.max_game_duration, Duration::from_secs(45));
        assert_eq!(t.countdown, Duration::from_secs(1));
        assert_eq!(t.max_active_words, 2);
        // Post-game duration keeps the built-in default.
        assert_eq!(t.post_game_message_duration, Duration::from_secs(10));
    }
}
