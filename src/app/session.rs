use crate::app::render::{render_games, rule};
use crate::core::classifier;
use crate::core::engine::ScoreEngine;
use crate::domain::model::{long_date, Intent};
use crate::domain::ports::{Clock, GameSink, ScoreSource};
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const BANNER: &str = "
======================================================================
                    SPORTS SCORE QUERY
======================================================================

  COMMANDS:
    all sports score today/yesterday/MMDDYY
    nba, nfl, nhl, ncaab, ncaaf score today/yesterday/MMDDYY
    nfl score week <n>
    <team> vs <team> score today/yesterday/MMDDYY

  EXAMPLES:
    all sports score yesterday
    nba score today
    nba, nfl, nhl score yesterday
    lakers vs celtics score today

  Type 'help' for more, 'quit' to exit
======================================================================

";

const HELP: &str = "
======================================================================
                    SPORTS SCORE QUERY
======================================================================

COMMANDS:
----------------------------------------------------------------------

  GAME SCORES:
    <leagues> score <date>

    Examples:
      nba score today
      nba, nfl, nhl score today
      nba, nfl, nhl, ncaab, ncaaf score yesterday
      nfl score 120625
      nhl score 2025-12-06

  WEEKLY SCORES (nfl, ncaaf):
    <league> score week <n>

    Examples:
      nfl score week 5
      ncaaf week 12

  TEAM VS TEAM:
    <team> vs <team> score <date>

    Examples:
      lakers vs celtics score today
      cowboys vs eagles score yesterday
      chiefs vs bills score 120125

  OTHER COMMANDS:
    all sports score <date>  - Every league at once
    help                     - Show this help message
    quit                     - Exit the program

  LEAGUES: nba, nfl, nhl, ncaab, ncaaf
  DATES:   today, yesterday, tomorrow, MMDDYY (e.g., 120625), YYYY-MM-DD
======================================================================

";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Invocation surface: the interactive loop and the one-shot query.
pub struct Session<S: ScoreSource, K: GameSink, C: Clock> {
    engine: ScoreEngine<S, K>,
    clock: C,
}

impl<S: ScoreSource, K: GameSink, C: Clock> Session<S, K, C> {
    pub fn new(engine: ScoreEngine<S, K>, clock: C) -> Self {
        Self { engine, clock }
    }

    /// One-shot mode: input without league, week or team means every league.
    pub async fn run_once<W: Write>(&self, query: &str, out: &mut W) -> Result<()> {
        let today = self.clock.today();
        let intent = classifier::parse_query(query, today);
        tracing::debug!("One-shot intent: {:?}", intent);
        self.execute(&intent, &intent.to_string(), today, out).await
    }

    /// Reads commands until `quit`, end of input or Ctrl-C.
    pub async fn run_interactive<R, W>(&self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let interrupt = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Could not listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_until(input, out, interrupt).await
    }

    /// Interactive loop that also ends as soon as `interrupt` completes, whether
    /// the session is waiting for input or in the middle of a query.
    pub async fn run_until<R, W, F>(&self, mut input: R, out: &mut W, interrupt: F) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        F: Future<Output = ()>,
    {
        write!(out, "{}", BANNER)?;
        tokio::pin!(interrupt);
        let mut buf = Vec::new();

        loop {
            write!(out, ">> ")?;
            out.flush()?;

            buf.clear();
            let read = tokio::select! {
                read = input.read_until(b'\n', &mut buf) => Some(read),
                _ = &mut interrupt => None,
            };
            match read {
                Some(Ok(0)) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("Could not read input: {}", e);
                    break;
                }
            }

            // undecodable bytes become U+FFFD and the line is handled like any other
            let line = String::from_utf8_lossy(&buf).into_owned();
            let flow = tokio::select! {
                flow = self.handle_line(&line, out) => Some(flow?),
                _ = &mut interrupt => None,
            };
            match flow {
                Some(Flow::Continue) => {}
                Some(Flow::Quit) => return Ok(()),
                None => break,
            }
        }

        writeln!(out)?;
        writeln!(out, "Goodbye!")?;
        Ok(())
    }

    pub async fn handle_line<W: Write>(&self, line: &str, out: &mut W) -> Result<Flow> {
        let input = line.trim();
        if input.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = input.to_lowercase();
        match command.as_str() {
            "quit" | "exit" | "q" => {
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Quit);
            }
            "help" => {
                write!(out, "{}", HELP)?;
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        let today = self.clock.today();
        if classifier::is_all_sports(&command) {
            let intent = classifier::all_leagues(&command, today);
            let header = match &intent {
                Intent::LeagueScores { date, .. } => {
                    format!("Fetching: ALL SPORTS - {}", long_date(*date))
                }
                other => other.to_string(),
            };
            self.execute(&intent, &header, today, out).await?;
            return Ok(Flow::Continue);
        }

        match classifier::classify(input, today) {
            Some(intent) => {
                tracing::debug!("Interactive intent: {:?}", intent);
                self.execute(&intent, &intent.to_string(), today, out).await?;
            }
            None => {
                writeln!(out, "Unknown command: {}", input)?;
                writeln!(out, "Type 'help' for available commands.")?;
                writeln!(out)?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn execute<W: Write>(
        &self,
        intent: &Intent,
        header: &str,
        today: NaiveDate,
        out: &mut W,
    ) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", header)?;
        writeln!(out, "{}", rule())?;

        let outcome = self.engine.run(intent, today).await;
        write!(out, "{}", render_games(&outcome.games))?;

        match outcome.saved {
            Ok(0) => {}
            Ok(saved) => {
                writeln!(out, "{}", rule())?;
                writeln!(
                    out,
                    "Saved {} games to {}",
                    saved,
                    self.engine.sink().location()
                )?;
            }
            Err(e) => {
                tracing::error!("Failed to save games: {}", e);
                writeln!(out, "Could not save games: {}", e.user_friendly_message())?;
                writeln!(out, "{}", e.recovery_suggestion())?;
            }
        }
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedClock;
    use crate::core::team_matcher::TeamMatcher;
    use crate::domain::model::{FetchWindow, GameRecord, GameStatus, League};
    use crate::utils::error::ScoreError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<(League, FetchWindow)>>,
    }

    #[async_trait]
    impl ScoreSource for RecordingSource {
        async fn fetch(&self, league: League, window: FetchWindow) -> Result<Vec<GameRecord>> {
            self.calls.lock().unwrap().push((league, window));
            if league != League::Nba {
                return Ok(vec![]);
            }
            Ok(vec![GameRecord {
                league,
                home: "Boston Celtics".to_string(),
                away: "Los Angeles Lakers".to_string(),
                score: "102-110".to_string(),
                status: GameStatus::Final,
                date: "2025-12-06".to_string(),
            }])
        }
    }

    #[derive(Default)]
    struct SlowSource {
        calls: Mutex<Vec<League>>,
    }

    #[async_trait]
    impl ScoreSource for SlowSource {
        async fn fetch(&self, league: League, _window: FetchWindow) -> Result<Vec<GameRecord>> {
            self.calls.lock().unwrap().push(league);
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(vec![])
        }
    }

    struct BrokenSink;

    impl GameSink for BrokenSink {
        async fn append(&self, _games: &[GameRecord]) -> Result<usize> {
            Err(ScoreError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn location(&self) -> String {
            "nowhere".to_string()
        }
    }

    struct CountingSink;

    impl GameSink for CountingSink {
        async fn append(&self, games: &[GameRecord]) -> Result<usize> {
            Ok(games.len())
        }

        fn location(&self) -> String {
            "scores.csv".to_string()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 6).unwrap()
    }

    fn session<K: GameSink>(sink: K) -> Session<RecordingSource, K, FixedClock> {
        let engine = ScoreEngine::new(RecordingSource::default(), sink, TeamMatcher::default());
        Session::new(engine, FixedClock(today()))
    }

    fn calls<K: GameSink>(session: &Session<RecordingSource, K, FixedClock>) -> Vec<League> {
        session
            .engine
            .source()
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(league, _)| *league)
            .collect()
    }

    #[tokio::test]
    async fn test_exit_commands() {
        let session = session(CountingSink);
        for command in ["quit", "EXIT", " q "] {
            let mut out = Vec::new();
            assert_eq!(session.handle_line(command, &mut out).await.unwrap(), Flow::Quit);
            assert_eq!(String::from_utf8(out).unwrap(), "Goodbye!\n");
        }
    }

    #[tokio::test]
    async fn test_blank_line_is_ignored() {
        let session = session(CountingSink);
        let mut out = Vec::new();
        assert_eq!(session.handle_line("   ", &mut out).await.unwrap(), Flow::Continue);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_help() {
        let session = session(CountingSink);
        let mut out = Vec::new();
        session.handle_line("help", &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("TEAM VS TEAM"));
        assert!(calls(&session).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_does_not_fetch() {
        let session = session(CountingSink);
        let mut out = Vec::new();
        let flow = session.handle_line("what happened today", &mut out).await.unwrap();

        assert_eq!(flow, Flow::Continue);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Unknown command: what happened today\n"));
        assert!(calls(&session).is_empty());
    }

    #[tokio::test]
    async fn test_all_sports_shortcut_fetches_every_league() {
        let session = session(CountingSink);
        let mut out = Vec::new();
        session.handle_line("all sports score today", &mut out).await.unwrap();

        assert_eq!(calls(&session), League::ALL.to_vec());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Fetching: ALL SPORTS - December 06, 2025"));
        assert!(text.contains("Saved 1 games to scores.csv"));
    }

    #[tokio::test]
    async fn test_one_shot_defaults_to_all_leagues() {
        let session = session(CountingSink);
        let mut out = Vec::new();
        session.run_once("scores please", &mut out).await.unwrap();
        assert_eq!(calls(&session), League::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_save_failure_is_reported_not_fatal() {
        let session = session(BrokenSink);
        let mut out = Vec::new();
        let flow = session.handle_line("nba score today", &mut out).await.unwrap();

        assert_eq!(flow, Flow::Continue);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Los Angeles Lakers"));
        assert!(text.contains("Could not save games"));
    }

    #[tokio::test]
    async fn test_interactive_loop_until_end_of_input() {
        let session = session(CountingSink);
        let input: &[u8] = b"nba score today\nbogus\n";
        let mut out = Vec::new();

        session.run_interactive(input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("SPORTS SCORE QUERY"));
        assert!(text.contains("Fetching: NBA games - December 06, 2025"));
        assert!(text.contains("Unknown command: bogus"));
        assert!(text.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_interactive_loop_stops_at_quit() {
        let session = session(CountingSink);
        let input: &[u8] = b"quit\nnba score today\n";
        let mut out = Vec::new();

        session.run_interactive(input, &mut out).await.unwrap();

        assert!(calls(&session).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_the_loop() {
        let session = session(CountingSink);
        let input: &[u8] = b"caf\xe9 vs x\nnba score today\nquit\n";
        let mut out = Vec::new();

        session.run_interactive(input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Searching: caf\u{fffd} vs x - December 06, 2025"));
        assert!(text.contains("Fetching: NBA games - December 06, 2025"));
        assert!(text.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_interrupt_during_query_stops_the_session() {
        let engine = ScoreEngine::new(SlowSource::default(), CountingSink, TeamMatcher::default());
        let session = Session::new(engine, FixedClock(today()));
        let input: &[u8] = b"nba score today\nnhl score today\n";
        let mut out = Vec::new();

        session
            .run_until(input, &mut out, tokio::time::sleep(Duration::from_millis(150)))
            .await
            .unwrap();

        assert_eq!(*session.engine.source().calls.lock().unwrap(), vec![League::Nba]);
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("NHL"));
        assert!(text.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_interrupt_while_waiting_for_input() {
        let session = session(CountingSink);
        let (_keyboard, stdin) = tokio::io::duplex(64);
        let mut out = Vec::new();

        session
            .run_until(
                tokio::io::BufReader::new(stdin),
                &mut out,
                tokio::time::sleep(Duration::from_millis(50)),
            )
            .await
            .unwrap();

        assert!(calls(&session).is_empty());
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with(">> \nGoodbye!\n"));
    }
}
