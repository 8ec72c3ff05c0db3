pub mod aggregator;
pub mod classifier;
pub mod date_resolver;
pub mod engine;
pub mod team_matcher;

pub use crate::domain::model::{FetchWindow, GameRecord, GameStatus, Intent, League};
pub use crate::domain::ports::{Clock, ConfigProvider, GameSink, ScoreSource};
pub use crate::utils::error::Result;
