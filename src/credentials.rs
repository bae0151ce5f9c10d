use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};

const SECTION: &str = "atlassian";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub instances: Vec<String>,
    pub username: String,
    pub api_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("Credentials file not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to resolve credentials path: HOME is not set")]
    MissingHomeDirectory,
    #[error("failed to read credentials file at {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse credentials file at {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        source: ini::ParseError,
    },
    #[error("{0}")]
    Format(String),
}

/// Loads credentials from `~/.atlassian-cloud/credentials.properties`.
pub fn load() -> Result<Credentials, CredentialsError> {
    let path = resolve_credentials_path()?;
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<Credentials, CredentialsError> {
    let path = path.to_path_buf();
    let raw = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CredentialsError::NotFound { path: path.clone() }
        } else {
            CredentialsError::ReadFailed {
                path: path.clone(),
                source,
            }
        }
    })?;

    let ini = Ini::load_from_str_opt(&raw, parse_option()).map_err(|source| {
        CredentialsError::ParseFailed {
            path: path.clone(),
            source,
        }
    })?;
    from_ini(&ini)
}

pub fn resolve_credentials_path() -> Result<PathBuf, CredentialsError> {
    resolve_credentials_path_from_env(std::env::var_os("HOME"))
}

fn resolve_credentials_path_from_env(home: Option<OsString>) -> Result<PathBuf, CredentialsError> {
    let home = home
        .filter(|value| !value.is_empty())
        .ok_or(CredentialsError::MissingHomeDirectory)?;
    Ok(PathBuf::from(home)
        .join(".atlassian-cloud")
        .join("credentials.properties"))
}

// Values are taken verbatim: API tokens may contain quotes or backslashes.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    }
}

fn from_ini(ini: &Ini) -> Result<Credentials, CredentialsError> {
    let section = ini.section(Some(SECTION)).ok_or_else(|| {
        CredentialsError::Format(format!(
            "No [{SECTION}] section found in credentials file"
        ))
    })?;

    // Option names are case-insensitive.
    let required = |key: &str| {
        section
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.to_string())
            .ok_or_else(|| {
                CredentialsError::Format(format!("missing '{key}' in [{SECTION}] section"))
            })
    };

    let instances = parse_instances(&required("instances")?);
    if instances.is_empty() {
        return Err(CredentialsError::Format(
            "instances must contain at least one instance name".into(),
        ));
    }
    for instance in &instances {
        validate_instance(instance)?;
    }

    Ok(Credentials {
        instances,
        username: required("username")?,
        api_token: required("api_token")?,
    })
}

/// Instances are bare subdomains of `atlassian.net`, e.g. `acme`.
fn validate_instance(instance: &str) -> Result<(), CredentialsError> {
    let valid = !instance.starts_with('-')
        && !instance.ends_with('-')
        && instance
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CredentialsError::Format(format!(
            "invalid instance '{instance}': expected a bare subdomain such as 'acme'"
        )))
    }
}

/// Splits a comma-separated instance list, dropping blank entries.
pub fn parse_instances(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect()
}
