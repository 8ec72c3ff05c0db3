pub mod toml_config;

use crate::adapters::csv_store::DEFAULT_CSV_FILE;
use crate::adapters::espn::{scoreboard_url, DEFAULT_BASE_URL};
use crate::domain::model::League;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub use toml_config::TomlConfig;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "score-query")]
#[command(about = "Look up sports scores with free-text queries")]
pub struct CliConfig {
    /// Query words, e.g. `nba score yesterday`. Without any, an interactive prompt starts.
    #[arg(trailing_var_arg = true)]
    pub query: Vec<String>,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "CSV file that fetched games are appended to")]
    pub csv_path: Option<String>,

    #[arg(long, help = "Scoreboard API base URL")]
    pub base_url: Option<String>,

    #[arg(long, help = "HTTP request timeout in seconds")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Fuzzy team match threshold between 0 and 1")]
    pub match_threshold: Option<f64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

/// Effective settings: defaults, then the TOML file, then command-line flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub endpoints: HashMap<League, String>,
    pub timeout_seconds: u64,
    pub match_threshold: f64,
    pub csv_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: HashMap::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            match_threshold: crate::core::team_matcher::DEFAULT_THRESHOLD,
            csv_path: default_csv_path(),
        }
    }
}

/// The CSV file lives next to the executable unless configured otherwise.
fn default_csv_path() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CSV_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILE))
        .display()
        .to_string()
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let mut settings = Self::default();
        settings.merge_toml(config);
        settings
    }

    pub fn merge_toml(&mut self, config: &TomlConfig) {
        if let Some(base_url) = &config.source.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(timeout) = config.source.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        self.endpoints.extend(config.endpoint_overrides());
        if let Some(threshold) = config.matching.threshold {
            self.match_threshold = threshold;
        }
        if let Some(csv_path) = &config.output.csv_path {
            self.csv_path = csv_path.clone();
        }
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli(&mut self, cli: &CliConfig) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
            // an explicit base URL wins over per-league entries from the file
            self.endpoints.clear();
        }
        if let Some(timeout) = cli.timeout_secs {
            self.timeout_seconds = timeout;
        }
        if let Some(threshold) = cli.match_threshold {
            self.match_threshold = threshold;
        }
        if let Some(csv_path) = &cli.csv_path {
            self.csv_path = csv_path.clone();
        }
    }
}

impl ConfigProvider for Settings {
    fn endpoint(&self, league: League) -> String {
        self.endpoints
            .get(&league)
            .cloned()
            .unwrap_or_else(|| scoreboard_url(&self.base_url, league))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn match_threshold(&self) -> f64 {
        self.match_threshold
    }

    fn csv_path(&self) -> &str {
        &self.csv_path
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_endpoint("base_url", &self.base_url)?;
        for (league, url) in &self.endpoints {
            validation::validate_endpoint(&format!("endpoints.{}", league.as_str()), url)?;
        }
        validation::validate_timeout("timeout_seconds", self.timeout_seconds)?;
        validation::validate_threshold("match_threshold", self.match_threshold)?;
        validation::validate_csv_path("csv_path", &self.csv_path)?;
        Ok(())
    }
}
