use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One portfolio case-study entry, as published in the project list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(deserialize_with = "deserialize_date")]
    pub date_completed: NaiveDate,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub case_study: CaseStudy,
    #[serde(default)]
    pub links: Links,
}

impl ProjectRecord {
    /// Alt text for the hero image, falling back to the title.
    pub fn image_alt_text(&self) -> &str {
        match self.image_alt.as_deref() {
            Some(alt) if !alt.trim().is_empty() => alt,
            _ => &self.title,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub improvement: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub scale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_download: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// Parse a completion date. Content files use plain dates, month-only dates
/// and occasionally full timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    // Month precision: "2024-06" means the first of the month
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid dateCompleted: {raw:?}")))
}

/// Where the project list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    File(PathBuf),
    Url(String),
}

impl ProjectSource {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for ProjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Errors raised while fetching or decoding the project list.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Load interrupted: {0}")]
    Interrupted(String),
}

impl LoadError {
    /// Short message for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Io(e) => format!("Could not read project list: {}", e),
            LoadError::Http(e) => format!("Network error: {}", e),
            LoadError::HttpStatus { status, .. } => {
                format!("Project list request failed (HTTP {})", status)
            }
            LoadError::Decode(e) => format!("Project list is malformed: {}", e),
            LoadError::Interrupted(msg) => format!("Loading was interrupted: {}", msg),
        }
    }
}

/// Fetch the project list once from its source.
pub async fn load_projects(source: &ProjectSource) -> Result<Vec<ProjectRecord>, LoadError> {
    let bytes = match source {
        ProjectSource::File(path) => tokio::fs::read(path).await?,
        ProjectSource::Url(url) => {
            let response = reqwest::get(url.as_str()).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::HttpStatus {
                    status: status.as_u16(),
                    url: url.clone(),
                });
            }
            response.bytes().await?.to_vec()
        }
    };
    let projects = decode_projects(&bytes)?;
    tracing::info!(source = %source, count = projects.len(), "project list loaded");
    Ok(projects)
}

/// Decode a JSON array of projects, keeping the first record for each id.
pub fn decode_projects(bytes: &[u8]) -> Result<Vec<ProjectRecord>, LoadError> {
    let records: Vec<ProjectRecord> = serde_json::from_slice(bytes)?;
    Ok(dedupe_by_id(records))
}

fn dedupe_by_id(records: Vec<ProjectRecord>) -> Vec<ProjectRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.id.clone());
            if !fresh {
                tracing::warn!(id = %record.id, "duplicate project id dropped");
            }
            fresh
        })
        .collect()
}
