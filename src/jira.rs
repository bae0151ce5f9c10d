use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::logging;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub key: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetail {
    pub lead: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum JiraError {
    #[error("jira request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("jira returned HTTP {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode jira response: {source}; body: {body}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },
    #[error("invalid jira base url '{0}'")]
    InvalidBaseUrl(String),
}

impl JiraError {
    /// True when the instance could not be reached at all, as opposed to the
    /// API rejecting or garbling a response.
    pub fn is_connection(&self) -> bool {
        match self {
            JiraError::Request(err) => !(err.is_builder() || err.is_decode() || err.is_status()),
            _ => false,
        }
    }
}

/// Read access to the projects of one Jira instance.
pub trait ProjectSource {
    fn list_projects(&self) -> Result<Vec<ProjectSummary>, JiraError>;
    fn get_project(&self, key: &str) -> Result<ProjectDetail, JiraError>;
}

pub fn instance_base_url(instance: &str) -> String {
    format!("https://{instance}.atlassian.net")
}

#[derive(Debug, Clone)]
pub struct JiraClient {
    pub base_url: String,
    pub username: String,
    pub api_token: String,
    pub http: Client,
}

impl JiraClient {
    pub fn new(base_url: String, username: String, api_token: String) -> Result<Self, JiraError> {
        let http = Client::builder().build()?;
        let normalized_base_url = normalize_base_url(&base_url)?;
        Ok(Self {
            base_url: normalized_base_url,
            username,
            api_token,
            http,
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, JiraError> {
        let invalid = || JiraError::InvalidBaseUrl(self.base_url.clone());
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, JiraError> {
        let url = self.endpoint(segments)?;
        logging::debug(format!("jira GET {}", url));
        let response = self
            .http
            .get(url.as_str())
            .basic_auth(&self.username, Some(&self.api_token))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .inspect_err(|err| {
                logging::warn(format!("jira transport error for {}: {}", url, err))
            })?;
        decode(response, url.as_str())
    }
}

impl ProjectSource for JiraClient {
    fn list_projects(&self) -> Result<Vec<ProjectSummary>, JiraError> {
        // Jira may answer `null` instead of an empty array.
        let payload: Option<Vec<ProjectInfo>> =
            self.get_json(&["rest", "api", "3", "project"])?;
        Ok(payload
            .unwrap_or_default()
            .into_iter()
            .map(|p| ProjectSummary {
                key: p.key,
                name: p.name,
            })
            .collect())
    }

    fn get_project(&self, key: &str) -> Result<ProjectDetail, JiraError> {
        let payload: ProjectInfo = self.get_json(&["rest", "api", "3", "project", key])?;
        Ok(ProjectDetail {
            lead: payload.lead.and_then(|lead| lead.display_name),
        })
    }
}

fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, JiraError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        logging::warn(format!(
            "jira request {} completed with status {}",
            url, status
        ));
        return Err(JiraError::Http { status, body });
    }

    let body = response.text()?;
    serde_json::from_str(&body).map_err(|source| JiraError::Decode {
        source,
        body: truncate_body(&body),
    })
}

fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 1000;
    match body.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

fn normalize_base_url(raw: &str) -> Result<String, JiraError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(JiraError::InvalidBaseUrl(raw.to_string()));
    }

    let parsed =
        reqwest::Url::parse(trimmed).map_err(|_| JiraError::InvalidBaseUrl(raw.to_string()))?;
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(JiraError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    #[serde(default)]
    key: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    lead: Option<UserObj>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserObj {
    display_name: Option<String>,
}
