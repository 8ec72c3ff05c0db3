use crate::domain::model::{FetchWindow, GameRecord, League};
use crate::domain::ports::ScoreSource;
use chrono::NaiveDate;

/// Fetches leagues one at a time and concatenates the results. A league that
/// fails is logged and skipped; it never stops the others.
pub struct Aggregator<S: ScoreSource> {
    source: S,
}

impl<S: ScoreSource> Aggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn collect(
        &self,
        leagues: &[League],
        window: FetchWindow,
        today: NaiveDate,
    ) -> Vec<GameRecord> {
        let mut games = Vec::new();

        for &league in leagues {
            let league_window = match window {
                FetchWindow::Week(week) if !league.supports_weeks() => {
                    tracing::warn!(
                        "{} has no weekly schedule, fetching {} instead of week {}",
                        league,
                        today,
                        week
                    );
                    FetchWindow::Date(today)
                }
                other => other,
            };

            match self.source.fetch(league, league_window).await {
                Ok(mut fetched) => {
                    tracing::debug!("{}: {} games", league, fetched.len());
                    games.append(&mut fetched);
                }
                Err(e) => {
                    tracing::warn!("Could not fetch {} data: {}", league, e);
                }
            }
        }

        games
    }
}
