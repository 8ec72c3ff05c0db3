use crate::utils::error::{Result, ScoreError};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ScoreError {
    ScoreError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Scoreboard endpoints must be absolute http(s) URLs with a host.
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field, endpoint, format!("Invalid URL format: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            endpoint,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field, endpoint, "URL has no host"));
    }
    Ok(())
}

pub fn validate_timeout(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(invalid(field, seconds, "Timeout must be at least 1 second"));
    }
    Ok(())
}

/// Similarity scores live in `0.0..=1.0`; NaN is rejected.
pub fn validate_threshold(field: &str, threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(invalid(field, threshold, "Threshold must be between 0 and 1"));
    }
    Ok(())
}

/// The CSV target must name a file, not an existing directory.
pub fn validate_csv_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path, "Path contains null bytes"));
    }
    if Path::new(path).is_dir() {
        return Err(invalid(field, path, "Path is a directory"));
    }
    Ok(())
}
