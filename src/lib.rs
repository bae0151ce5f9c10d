//! `jira-projects` lists the projects and project leads of several Jira
//! Cloud instances using one set of Atlassian credentials.

/// Credentials file loading and validation.
pub mod credentials;
/// Jira API client and project data models.
pub mod jira;
/// Logging helpers used throughout the crate.
pub mod logging;
/// Per-instance project report.
pub mod report;
