//! Local leaderboard backed by SQLite. Stands in for a remote scoring
//! service at the same interface: submit a final score, get a 1-based
//! position back, and fetch the top scores for display.

use chrono::{DateTime, Local};
use directories::ProjectDirs;
use rusqlite::{params, Connection, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub name: String,
    pub score: i64,
    pub recorded_at: DateTime<Local>,
}

#[derive(Debug)]
pub struct ScoreDb {
    conn: Connection,
}

impl ScoreDb {
    /// Opens (and migrates) the leaderboard database in the state dir.
    pub fn new() -> Result<Self> {
        let db_path = Self::db_path().unwrap_or_else(|| PathBuf::from("overheat_scores.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        Self::with_connection(Connection::open(&db_path)?)
    }

    /// Ephemeral database for tests.
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS game_scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                score INTEGER NOT NULL,
                recorded_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_game_scores_score ON game_scores(score)",
            [],
        )?;

        Ok(ScoreDb { conn })
    }

    /// Database file under $HOME/.local/state/overheat
    fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("overheat");
            Some(state_dir.join("scores.db"))
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "overheat") {
            Some(proj_dirs.data_local_dir().join("scores.db"))
        } else {
            None
        }
    }

    /// Records a finished game and returns its 1-based leaderboard
    /// position (strictly higher scores rank above it).
    pub fn submit_score(&self, name: &str, score: i64) -> Result<u32> {
        self.conn.execute(
            "INSERT INTO game_scores (name, score, recorded_at) VALUES (?1, ?2, ?3)",
            params![name, score, Local::now().to_rfc3339()],
        )?;

        let above: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM game_scores WHERE score > ?1",
            params![score],
            |row| row.get(0),
        )?;

        Ok(above + 1)
    }

    /// Best scores first; ties broken by earliest submission.
    pub fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT name, score, recorded_at
            FROM game_scores
            ORDER BY score DESC, recorded_at ASC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let recorded_str: String = row.get(2)?;
            let recorded_at = DateTime::parse_from_rfc3339(&recorded_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        2,
                        "recorded_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(ScoreRow {
                name: row.get(0)?,
                score: row.get(1)?,
                recorded_at,
            })
        })?;

        let mut scores = Vec::new();
        for row in rows {
            scores.push(row?);
        }
        Ok(scores)
    }

    pub fn total_games(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM game_scores", [], |row| row.get(0))
    }
}
