use crate::utils::error::ScoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported competitions. Declaration order is the scan order used for
/// league detection; it has no longest-match preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    Nba,
    Nfl,
    Nhl,
    Ncaab,
    Ncaaf,
}

impl League {
    pub const ALL: [League; 5] = [
        League::Nba,
        League::Nfl,
        League::Nhl,
        League::Ncaab,
        League::Ncaaf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            League::Nba => "nba",
            League::Nfl => "nfl",
            League::Nhl => "nhl",
            League::Ncaab => "ncaab",
            League::Ncaaf => "ncaaf",
        }
    }

    /// `sport/league` path segment of the scoreboard endpoint.
    pub fn sport_path(&self) -> &'static str {
        match self {
            League::Nba => "basketball/nba",
            League::Nfl => "football/nfl",
            League::Nhl => "hockey/nhl",
            League::Ncaab => "basketball/mens-college-basketball",
            League::Ncaaf => "football/college-football",
        }
    }

    pub fn supports_weeks(&self) -> bool {
        matches!(self, League::Nfl | League::Ncaaf)
    }

    pub fn weekly() -> Vec<League> {
        League::ALL
            .into_iter()
            .filter(League::supports_weeks)
            .collect()
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.as_str().to_uppercase())
    }
}

impl FromStr for League {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        League::ALL
            .into_iter()
            .find(|league| league.as_str() == key)
            .ok_or_else(|| ScoreError::UnknownLeague(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Scheduled,
    Live,
    Final,
}

impl GameStatus {
    pub fn from_espn(name: &str) -> Self {
        match name {
            "STATUS_FINAL" => GameStatus::Final,
            "STATUS_IN_PROGRESS" => GameStatus::Live,
            _ => GameStatus::Scheduled,
        }
    }

    pub fn has_score(&self) -> bool {
        !matches!(self, GameStatus::Scheduled)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameStatus::Scheduled => "Scheduled",
            GameStatus::Live => "Live",
            GameStatus::Final => "Final",
        };
        f.pad(label)
    }
}

/// One game as reported by the score source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub league: League,
    pub home: String,
    pub away: String,
    /// `away-home` once the game has started, `-` before.
    pub score: String,
    pub status: GameStatus,
    /// ISO date, as reported upstream.
    pub date: String,
}

/// What a single fetch is scoped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchWindow {
    Date(NaiveDate),
    Week(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    LeagueScores {
        leagues: Vec<League>,
        date: NaiveDate,
    },
    WeekScores {
        league: Option<League>,
        week: u8,
    },
    TeamMatchup {
        team1: String,
        team2: Option<String>,
        date: NaiveDate,
    },
}

/// `December 06, 2025`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::LeagueScores { leagues, date } if leagues[..] == League::ALL => {
                write!(f, "Fetching: All games - {}", long_date(*date))
            }
            Intent::LeagueScores { leagues, date } => {
                let names: Vec<String> = leagues.iter().map(League::to_string).collect();
                write!(f, "Fetching: {} games - {}", names.join(", "), long_date(*date))
            }
            Intent::WeekScores { league, week } => {
                let name = league.map_or_else(|| "All".to_string(), |l| l.to_string());
                write!(f, "Fetching: {} games - Week {}", name, week)
            }
            Intent::TeamMatchup { team1, team2, date } => match team2 {
                Some(team2) => write!(
                    f,
                    "Searching: {} vs {} - {}",
                    team1,
                    team2,
                    long_date(*date)
                ),
                None => write!(f, "Searching: {} - {}", team1, long_date(*date)),
            },
        }
    }
}
