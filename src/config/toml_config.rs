use crate::domain::model::League;
use crate::utils::error::{Result, ScoreError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

/// Optional configuration file. Every key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Per-league scoreboard URL, keyed by league id (`nba`, `nfl`, ...).
    pub endpoints: Option<HashMap<League, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub csv_path: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScoreError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn endpoint_overrides(&self) -> HashMap<League, String> {
        self.source.endpoints.clone().unwrap_or_default()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(base_url) = &self.source.base_url {
            validation::validate_endpoint("source.base_url", base_url)?;
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_timeout("source.timeout_seconds", timeout)?;
        }

        for (league, url) in self.source.endpoints.iter().flatten() {
            validation::validate_endpoint(&format!("source.endpoints.{}", league.as_str()), url)?;
        }

        if let Some(threshold) = self.matching.threshold {
            validation::validate_threshold("matching.threshold", threshold)?;
        }

        if let Some(csv_path) = &self.output.csv_path {
            validation::validate_csv_path("output.csv_path", csv_path)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
