use crate::domain::model::{FetchWindow, GameRecord, GameStatus, League};
use crate::domain::ports::{ConfigProvider, ScoreSource};
use crate::utils::error::{Result, ScoreError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://site.api.espn.com/apis/site/v2/sports";

/// Regular season, used with week queries.
const REGULAR_SEASON: &str = "2";

pub fn scoreboard_url(base_url: &str, league: League) -> String {
    format!(
        "{}/{}/scoreboard",
        base_url.trim_end_matches('/'),
        league.sport_path()
    )
}

/// Events are kept raw so that one bad event cannot spoil the whole board.
#[derive(Debug, Deserialize)]
struct Scoreboard {
    #[serde(default)]
    events: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct EspnEvent {
    #[serde(default)]
    date: String,
    #[serde(default)]
    competitions: Vec<EspnCompetition>,
    #[serde(default)]
    status: Option<EspnStatus>,
}

#[derive(Debug, Deserialize)]
struct EspnCompetition {
    #[serde(default)]
    competitors: Vec<EspnCompetitor>,
}

#[derive(Debug, Deserialize)]
struct EspnCompetitor {
    #[serde(default)]
    team: Option<EspnTeam>,
    #[serde(rename = "homeAway", default)]
    home_away: Option<String>,
    #[serde(default)]
    score: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct EspnTeam {
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EspnStatus {
    #[serde(rename = "type", default)]
    status_type: Option<EspnStatusType>,
}

#[derive(Debug, Deserialize)]
struct EspnStatusType {
    #[serde(default)]
    name: Option<String>,
}

pub struct EspnSource {
    client: Client,
    endpoints: HashMap<League, String>,
}

impl EspnSource {
    pub fn new(endpoints: HashMap<League, String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let endpoints = League::ALL
            .into_iter()
            .map(|league| (league, config.endpoint(league)))
            .collect();
        Self::new(endpoints, config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let endpoints = League::ALL
            .into_iter()
            .map(|league| (league, scoreboard_url(base_url, league)))
            .collect();
        Self::new(endpoints, timeout)
    }
}

#[async_trait]
impl ScoreSource for EspnSource {
    async fn fetch(&self, league: League, window: FetchWindow) -> Result<Vec<GameRecord>> {
        let url = self
            .endpoints
            .get(&league)
            .ok_or_else(|| ScoreError::UnknownLeague(league.to_string()))?;

        let params: Vec<(&str, String)> = match window {
            FetchWindow::Date(date) => vec![("dates", date.format("%Y%m%d").to_string())],
            FetchWindow::Week(week) => vec![
                ("week", week.to_string()),
                ("seasontype", REGULAR_SEASON.to_string()),
            ],
        };

        tracing::debug!("Making API request to: {} {:?}", url, params);
        let response = self.client.get(url).query(&params).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let scoreboard: Scoreboard = response.error_for_status()?.json().await?;
        let total = scoreboard.events.len();
        let games: Vec<GameRecord> = scoreboard
            .events
            .into_iter()
            .filter_map(|event| parse_event(event, league))
            .collect();

        if games.len() < total {
            tracing::debug!("{}: dropped {} malformed events", league, total - games.len());
        }
        Ok(games)
    }
}

fn parse_event(raw: serde_json::Value, league: League) -> Option<GameRecord> {
    let event: EspnEvent = match serde_json::from_value(raw) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!("Skipping undecodable {} event: {}", league, e);
            return None;
        }
    };

    let competition = event.competitions.into_iter().next()?;
    if competition.competitors.len() != 2 {
        return None;
    }

    let mut home = None;
    let mut away = None;
    for competitor in competition.competitors {
        let name = competitor
            .team
            .and_then(|team| team.display_name.or(team.name))
            .unwrap_or_else(|| "Unknown".to_string());
        let score = score_text(competitor.score);

        if competitor.home_away.as_deref() == Some("home") {
            home = Some((name, score));
        } else {
            away = Some((name, score));
        }
    }
    let ((home, home_score), (away, away_score)) = (home?, away?);

    let status = event
        .status
        .and_then(|s| s.status_type)
        .and_then(|t| t.name)
        .map_or(GameStatus::Scheduled, |name| GameStatus::from_espn(&name));

    let score = if status.has_score() {
        format!("{}-{}", away_score, home_score)
    } else {
        "-".to_string()
    };

    Some(GameRecord {
        league,
        home,
        away,
        score,
        status,
        date: event.date.chars().take(10).collect(),
    })
}

fn score_text(raw: Option<serde_json::Value>) -> String {
    match raw {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => "0".to_string(),
    }
}
