use crate::domain::model::GameRecord;
use crate::domain::ports::GameSink;
use crate::utils::error::Result;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const DEFAULT_CSV_FILE: &str = "sports_scores.csv";

/// Field order is the file's column order.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: &'a str,
    league: String,
    home: &'a str,
    away: &'a str,
    score: &'a str,
    status: String,
}

impl<'a> From<&'a GameRecord> for CsvRow<'a> {
    fn from(game: &'a GameRecord) -> Self {
        Self {
            date: &game.date,
            league: game.league.to_string(),
            home: &game.home,
            away: &game.away,
            score: &game.score,
            status: game.status.to_string(),
        }
    }
}

/// Append-only CSV file. The header is written only when the file is created;
/// rows are never rewritten or deduplicated.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GameSink for CsvStore {
    async fn append(&self, games: &[GameRecord]) -> Result<usize> {
        if games.is_empty() {
            return Ok(0);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let is_new = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        for game in games {
            writer.serialize(CsvRow::from(game))?;
        }
        writer.flush()?;

        tracing::debug!("Appended {} rows to {}", games.len(), self.path.display());
        Ok(games.len())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
