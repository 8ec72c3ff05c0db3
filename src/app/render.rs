use crate::domain::model::GameRecord;
use std::fmt::Write;

pub const RULE_WIDTH: usize = 90;

pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Fixed-width table of games, or `No games found.`
pub fn render_games(games: &[GameRecord]) -> String {
    if games.is_empty() {
        return "No games found.\n".to_string();
    }

    let mut table = String::new();
    let _ = writeln!(
        table,
        "{:<6} {:<30} {:<10} {:<30} {}",
        "League", "Away", "Score", "Home", "Status"
    );
    let _ = writeln!(table, "{}", rule());
    for game in games {
        let _ = writeln!(
            table,
            "{:<6} {:<30} {:<10} {:<30} {}",
            game.league, game.away, game.score, game.home, game.status
        );
    }
    table
}
