use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// Bearer token for the ATS backend, if the deployment requires one.
    pub api_token: Option<String>,
    pub http_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: require_env("ATS_API_URL")?,
            api_token: optional_env("ATS_API_TOKEN"),
            http_timeout: Duration::from_secs(
                std::env::var("ATS_HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse::<u64>()
                    .context("ATS_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Which section the viewer binary opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    CandidateComments,
    PositionComments,
    CandidateReviews,
}

impl FromStr for SectionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "candidate-comments" => Ok(SectionKind::CandidateComments),
            "position-comments" => Ok(SectionKind::PositionComments),
            "candidate-reviews" => Ok(SectionKind::CandidateReviews),
            other => bail!(
                "unknown section '{other}' (expected candidate-comments, position-comments or candidate-reviews)"
            ),
        }
    }
}

/// The subject and stage the viewer binary loads.
#[derive(Debug, Clone)]
pub struct ViewerTarget {
    pub kind: SectionKind,
    pub subject_id: Uuid,
    pub stage_id: Option<Uuid>,
}

impl ViewerTarget {
    pub fn from_env() -> Result<Self> {
        let kind = optional_env("ATS_SECTION")
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(SectionKind::CandidateComments);
        let subject_id = require_env("ATS_SUBJECT_ID")?
            .parse::<Uuid>()
            .context("ATS_SUBJECT_ID must be a UUID")?;
        let stage_id = optional_env("ATS_STAGE_ID")
            .map(|s| s.parse::<Uuid>())
            .transpose()
            .context("ATS_STAGE_ID must be a UUID")?;

        Ok(ViewerTarget {
            kind,
            subject_id,
            stage_id,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
