use crate::core::aggregator::Aggregator;
use crate::core::team_matcher::TeamMatcher;
use crate::domain::model::{FetchWindow, GameRecord, Intent, League};
use crate::domain::ports::{GameSink, ScoreSource};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Result of one query cycle. Persistence can fail without losing the games.
#[derive(Debug)]
pub struct QueryOutcome {
    pub games: Vec<GameRecord>,
    pub saved: Result<usize>,
}

pub struct ScoreEngine<S: ScoreSource, K: GameSink> {
    aggregator: Aggregator<S>,
    sink: K,
    matcher: TeamMatcher,
}

impl<S: ScoreSource, K: GameSink> ScoreEngine<S, K> {
    pub fn new(source: S, sink: K, matcher: TeamMatcher) -> Self {
        Self {
            aggregator: Aggregator::new(source),
            sink,
            matcher,
        }
    }

    pub fn source(&self) -> &S {
        self.aggregator.source()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Fetch, filter and persist the games an intent asks for.
    pub async fn run(&self, intent: &Intent, today: NaiveDate) -> QueryOutcome {
        let games = self.games_for(intent, today).await;
        tracing::debug!("{} games matched", games.len());

        let saved = if games.is_empty() {
            Ok(0)
        } else {
            self.sink.append(&games).await
        };

        QueryOutcome { games, saved }
    }

    pub async fn games_for(&self, intent: &Intent, today: NaiveDate) -> Vec<GameRecord> {
        match intent {
            Intent::LeagueScores { leagues, date } => {
                self.aggregator
                    .collect(leagues, FetchWindow::Date(*date), today)
                    .await
            }
            Intent::WeekScores { league, week } => {
                let leagues = league.map_or_else(League::weekly, |league| vec![league]);
                self.aggregator
                    .collect(&leagues, FetchWindow::Week(*week), today)
                    .await
            }
            Intent::TeamMatchup { team1, team2, date } => {
                let games = self
                    .aggregator
                    .collect(&League::ALL, FetchWindow::Date(*date), today)
                    .await;
                tracing::debug!("Filtering {} games for '{}'", games.len(), team1);
                self.matcher
                    .find_team_game(games, team1, team2.as_deref())
            }
        }
    }
}
