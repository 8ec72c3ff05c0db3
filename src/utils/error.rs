use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Unknown league: {0}")]
    UnknownLeague(String),
}

impl ScoreError {
    /// One-line message suitable for the terminal.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ScoreError::ApiError(e) if e.is_timeout() => {
                "The score service did not answer in time".to_string()
            }
            ScoreError::ApiError(_) => "Could not reach the score service".to_string(),
            ScoreError::CsvError(_) | ScoreError::IoError(_) => {
                format!("Could not write the scores file: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScoreError::ApiError(_) => "Check your network connection or --base-url and try again",
            ScoreError::CsvError(_) | ScoreError::IoError(_) => {
                "Check that --csv-path points to a writable location"
            }
            ScoreError::InvalidConfigValueError { .. }
            | ScoreError::ConfigValidationError { .. } => {
                "Fix the configuration file or command line flags"
            }
            ScoreError::UnknownLeague(_) => "Supported leagues are nba, nfl, nhl, ncaab, ncaaf",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
