//! Free-text query classification.
//!
//! Two strategies share the same rules and differ only in their default:
//! [`classify`] (interactive) needs positive evidence of a league, a week or a
//! team pair and returns `None` otherwise, while [`parse_query`] (one-shot)
//! falls back to every league on the resolved date.

use crate::core::date_resolver;
use crate::domain::model::{Intent, League};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

const SEPARATORS: [&str; 2] = [" vs ", " v "];

static WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"week\s*([0-9]{1,2})").expect("valid week pattern"));

/// Interactive classification. `None` means the input names no league, week
/// or team pair.
pub fn classify(text: &str, today: NaiveDate) -> Option<Intent> {
    let query = text.trim().to_lowercase();

    if SEPARATORS.iter().any(|sep| query.contains(sep)) {
        return team_matchup(&query, today);
    }

    if let Some(week) = week_number(&query) {
        if let Some(ignored) = date_resolver::recognize(&query, today) {
            tracing::debug!(
                "Week {} takes precedence over date token '{}' ({})",
                week,
                ignored.token,
                ignored.date
            );
        }
        return Some(Intent::WeekScores {
            league: first_league(&query),
            week,
        });
    }

    let leagues = leagues_by_mention(&query);
    if leagues.is_empty() {
        return None;
    }
    Some(Intent::LeagueScores {
        leagues,
        date: date_resolver::resolve(&query, today),
    })
}

/// One-shot classification: like [`classify`], but input without league, week
/// or team context means every league on the resolved date.
pub fn parse_query(text: &str, today: NaiveDate) -> Intent {
    classify(text, today).unwrap_or_else(|| all_leagues(text, today))
}

/// The "all sports" shortcut: every league on the resolved date.
pub fn all_leagues(text: &str, today: NaiveDate) -> Intent {
    Intent::LeagueScores {
        leagues: League::ALL.to_vec(),
        date: date_resolver::resolve(text, today),
    }
}

/// True for the interactive "all sports" / "all score" shortcut.
pub fn is_all_sports(text: &str) -> bool {
    let query = text.to_lowercase();
    query.contains("all sports") || query.contains("all score")
}

fn team_matchup(query: &str, today: NaiveDate) -> Option<Intent> {
    let (date, stripped) = match date_resolver::recognize(query, today) {
        Some(m) => (m.date, query.replace(m.token, " ")),
        None => (today, query.to_string()),
    };
    let stripped = stripped.replace("score", " ");

    let (left, right) = SEPARATORS
        .iter()
        .find_map(|sep| stripped.split_once(sep))
        .unwrap_or((stripped.as_str(), ""));

    let mut team1 = collapse_whitespace(left);
    let mut team2 = Some(collapse_whitespace(right)).filter(|t| !t.is_empty());

    if team1.is_empty() {
        team1 = team2.take()?;
    }

    Some(Intent::TeamMatchup { team1, team2, date })
}

fn week_number(query: &str) -> Option<u8> {
    let caps = WEEK.captures(query)?;
    let week: u8 = caps[1].parse().ok()?;
    // week 0 reads as "no week"
    (week > 0).then_some(week)
}

/// First league in declaration order that appears anywhere in `query`.
fn first_league(query: &str) -> Option<League> {
    League::ALL
        .into_iter()
        .find(|league| query.contains(league.as_str()))
}

/// Every league that appears in `query`, ordered by first mention.
fn leagues_by_mention(query: &str) -> Vec<League> {
    let mut found: Vec<(usize, League)> = League::ALL
        .into_iter()
        .filter_map(|league| query.find(league.as_str()).map(|pos| (pos, league)))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, league)| league).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 10).unwrap()
    }

    fn yesterday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 9).unwrap()
    }

    #[test]
    fn test_multi_league_keeps_mention_order() {
        assert_eq!(
            classify("nba, nfl score today", today()),
            Some(Intent::LeagueScores {
                leagues: vec![League::Nba, League::Nfl],
                date: today(),
            })
        );
        assert_eq!(
            classify("nhl and nba score yesterday", today()),
            Some(Intent::LeagueScores {
                leagues: vec![League::Nhl, League::Nba],
                date: yesterday(),
            })
        );
    }

    #[test]
    fn test_league_with_compact_date() {
        assert_eq!(
            classify("NFL score 120625", today()),
            Some(Intent::LeagueScores {
                leagues: vec![League::Nfl],
                date: NaiveDate::from_ymd_opt(2025, 12, 6).unwrap(),
            })
        );
    }

    #[test]
    fn test_team_matchup() {
        assert_eq!(
            classify("lakers vs celtics score yesterday", today()),
            Some(Intent::TeamMatchup {
                team1: "lakers".to_string(),
                team2: Some("celtics".to_string()),
                date: yesterday(),
            })
        );
    }

    #[test]
    fn test_team_matchup_short_separator_and_compact_date() {
        assert_eq!(
            classify("Chiefs v Bills score 120125", today()),
            Some(Intent::TeamMatchup {
                team1: "chiefs".to_string(),
                team2: Some("bills".to_string()),
                date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            })
        );
    }

    #[test]
    fn test_team_matchup_multi_word_names() {
        assert_eq!(
            classify("golden state warriors vs los angeles lakers", today()),
            Some(Intent::TeamMatchup {
                team1: "golden state warriors".to_string(),
                team2: Some("los angeles lakers".to_string()),
                date: today(),
            })
        );
    }

    #[test]
    fn test_team_matchup_without_second_team() {
        assert_eq!(
            classify("lakers vs today", today()),
            Some(Intent::TeamMatchup {
                team1: "lakers".to_string(),
                team2: None,
                date: today(),
            })
        );
    }

    #[test]
    fn test_team_matchup_splits_on_first_separator() {
        assert_eq!(
            classify("a vs b vs c", today()),
            Some(Intent::TeamMatchup {
                team1: "a".to_string(),
                team2: Some("b vs c".to_string()),
                date: today(),
            })
        );
    }

    #[test]
    fn test_team_matchup_needs_a_team() {
        assert_eq!(classify("score vs today", today()), None);
        assert_eq!(
            classify("score vs celtics", today()),
            Some(Intent::TeamMatchup {
                team1: "celtics".to_string(),
                team2: None,
                date: today(),
            })
        );
    }

    #[test]
    fn test_separator_must_be_spaced() {
        // "vs" inside a word is not a separator
        assert_eq!(classify("canvs score today", today()), None);
    }

    #[test]
    fn test_week_query() {
        assert_eq!(
            classify("nfl score week 5", today()),
            Some(Intent::WeekScores {
                league: Some(League::Nfl),
                week: 5,
            })
        );
        assert_eq!(
            classify("week12", today()),
            Some(Intent::WeekScores {
                league: None,
                week: 12,
            })
        );
    }

    #[test]
    fn test_week_takes_precedence_over_date() {
        assert_eq!(
            classify("nfl score week 5 yesterday", today()),
            Some(Intent::WeekScores {
                league: Some(League::Nfl),
                week: 5,
            })
        );
    }

    #[test]
    fn test_week_uses_declaration_order_not_position() {
        assert_eq!(
            classify("ncaaf and nfl week 3", today()),
            Some(Intent::WeekScores {
                league: Some(League::Nfl),
                week: 3,
            })
        );
    }

    #[test]
    fn test_week_zero_is_not_a_week() {
        assert_eq!(
            classify("nfl week 0", today()),
            Some(Intent::LeagueScores {
                leagues: vec![League::Nfl],
                date: today(),
            })
        );
    }

    #[test]
    fn test_interactive_requires_context() {
        assert_eq!(classify("score today", today()), None);
        assert_eq!(classify("hello", today()), None);
    }

    #[test]
    fn test_one_shot_defaults_to_all_leagues() {
        assert_eq!(
            parse_query("score yesterday", today()),
            Intent::LeagueScores {
                leagues: League::ALL.to_vec(),
                date: yesterday(),
            }
        );
        assert_eq!(
            parse_query("nhl 2025-11-05", today()),
            Intent::LeagueScores {
                leagues: vec![League::Nhl],
                date: NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
            }
        );
    }

    #[test]
    fn test_all_sports_shortcut() {
        assert!(is_all_sports("All Sports score today"));
        assert!(is_all_sports("all score yesterday"));
        assert!(!is_all_sports("nba score"));
        assert_eq!(
            all_leagues("all sports score yesterday", today()),
            Intent::LeagueScores {
                leagues: League::ALL.to_vec(),
                date: yesterday(),
            }
        );
    }
}
