use crate::domain::model::{FetchWindow, GameRecord, League};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

/// Per-league scoreboard provider.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    async fn fetch(&self, league: League, window: FetchWindow) -> Result<Vec<GameRecord>>;
}

/// Append-only destination for fetched games.
pub trait GameSink: Send + Sync {
    fn append(
        &self,
        games: &[GameRecord],
    ) -> impl std::future::Future<Output = Result<usize>> + Send;

    /// Human-readable location, shown after a save.
    fn location(&self) -> String;
}

/// Source of "today". Parsing never reads the wall clock directly.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self, league: League) -> String;
    fn request_timeout(&self) -> Duration;
    fn match_threshold(&self) -> f64;
    fn csv_path(&self) -> &str;
}
