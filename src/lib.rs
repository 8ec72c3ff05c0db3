pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CsvStore, EspnSource, FixedClock, SystemClock};
pub use app::Session;
pub use config::{Settings, TomlConfig};
pub use core::{engine::ScoreEngine, team_matcher::TeamMatcher};
pub use utils::error::{Result, ScoreError};
