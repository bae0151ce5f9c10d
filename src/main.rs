use std::io;
use std::process::ExitCode;

use jira_projects::credentials;
use jira_projects::jira::JiraClient;
use jira_projects::logging;
use jira_projects::report::Reporter;

fn main() -> ExitCode {
    println!("Retrieving Jira projects from all instances...");

    let credentials = match credentials::load() {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("Error reading credentials: {err}");
            return ExitCode::FAILURE;
        }
    };
    logging::debug(format!(
        "loaded credentials for {} instance(s): {}",
        credentials.instances.len(),
        credentials.instances.join(",")
    ));

    let mut reporter = Reporter::new(io::stdout().lock(), io::stderr().lock());
    let result = reporter.report_all(&credentials, |base_url| {
        JiraClient::new(
            base_url.to_string(),
            credentials.username.clone(),
            credentials.api_token.clone(),
        )
    });

    match result {
        Ok(summary) => {
            logging::info(format!(
                "report finished instances={} failed={} projects={}",
                summary.instances, summary.failed_instances, summary.projects
            ));
            ExitCode::SUCCESS
        }
        Err(err) => {
            logging::error(format!("failed writing report: {err}"));
            ExitCode::FAILURE
        }
    }
}
