use std::io::{self, Write};

use crate::credentials::Credentials;
use crate::jira::{instance_base_url, JiraError, ProjectSource, ProjectSummary};
use crate::logging;

pub const NO_PROJECTS: &str = "No projects found or no access to projects";
pub const NO_LEAD: &str = "No lead assigned";
const UNKNOWN_NAME: &str = "Unknown";

/// One printed row of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLine {
    pub name: String,
    pub lead: String,
}

impl ProjectLine {
    pub fn render(&self) -> String {
        format!("{}, project lead: {}", self.name, self.lead)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub instances: usize,
    pub failed_instances: usize,
    pub projects: usize,
}

/// Writes the per-instance project report. Report lines go to `out`;
/// warnings and instance errors go to `err`.
pub struct Reporter<O, E> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Reports every instance in order. `open` builds a session from an
    /// instance base URL; a failure there or in the project listing skips
    /// only that instance.
    pub fn report_all<S, F>(
        &mut self,
        credentials: &Credentials,
        mut open: F,
    ) -> io::Result<ReportSummary>
    where
        S: ProjectSource,
        F: FnMut(&str) -> Result<S, JiraError>,
    {
        let mut summary = ReportSummary::default();

        for instance in &credentials.instances {
            summary.instances += 1;
            let base_url = instance_base_url(instance);
            writeln!(self.out)?;
            writeln!(self.out, "{}", instance)?;
            writeln!(self.out, "{}", "-".repeat(instance.chars().count()))?;

            let (source, projects) = match open(&base_url).and_then(|source| {
                let projects = source.list_projects()?;
                Ok((source, projects))
            }) {
                Ok(found) => found,
                Err(err) => {
                    summary.failed_instances += 1;
                    self.instance_error(instance, &err)?;
                    continue;
                }
            };

            if projects.is_empty() {
                writeln!(self.out, "{}", NO_PROJECTS)?;
                continue;
            }

            let printed = self.report_projects(&source, projects)?;
            logging::debug(format!("instance {} printed {} projects", instance, printed));
            summary.projects += printed;
        }

        Ok(summary)
    }

    fn report_projects<S: ProjectSource>(
        &mut self,
        source: &S,
        mut projects: Vec<ProjectSummary>,
    ) -> io::Result<usize> {
        sort_by_name(&mut projects);

        for project in &projects {
            let line = self.resolve_line(source, project)?;
            writeln!(self.out, "{}", line.render())?;
        }
        Ok(projects.len())
    }

    fn resolve_line<S: ProjectSource>(
        &mut self,
        source: &S,
        project: &ProjectSummary,
    ) -> io::Result<ProjectLine> {
        let name = project
            .name
            .clone()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        let lead = match source.get_project(&project.key) {
            Ok(detail) => detail.lead,
            Err(err) => {
                writeln!(
                    self.err,
                    "  Warning: Could not get details for project {}: {}",
                    name, err
                )?;
                None
            }
        };

        Ok(ProjectLine {
            name,
            lead: lead.unwrap_or_else(|| NO_LEAD.to_string()),
        })
    }

    fn instance_error(&mut self, instance: &str, err: &JiraError) -> io::Result<()> {
        if err.is_connection() {
            writeln!(self.err, "Connection error with {}: {}", instance, err)
        } else {
            writeln!(self.err, "Jira API error with {}: {}", instance, err)
        }
    }
}

/// Stable ascending sort on display name; a missing name sorts as "".
pub fn sort_by_name(projects: &mut [ProjectSummary]) {
    projects.sort_by(|a, b| {
        a.name
            .as_deref()
            .unwrap_or("")
            .cmp(b.name.as_deref().unwrap_or(""))
    });
}
