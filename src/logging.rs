use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| {
        std::env::var("JIRA_PROJECTS_DEBUG")
            .ok()
            .map(|v| is_truthy(&v))
            .unwrap_or(false)
    })
}

fn is_truthy(raw: &str) -> bool {
    let normalized = raw.trim().to_ascii_lowercase();
    normalized == "1" || normalized == "true" || normalized == "yes"
}

fn ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn line(level: &str, message: &str) -> String {
    format!("[{}][{}] {}", ts(), level, message)
}

pub fn debug(message: impl AsRef<str>) {
    if debug_enabled() {
        eprintln!("{}", line("DEBUG", message.as_ref()));
    }
}

pub fn info(message: impl AsRef<str>) {
    eprintln!("{}", line("INFO", message.as_ref()));
}

pub fn warn(message: impl AsRef<str>) {
    eprintln!("{}", line("WARN", message.as_ref()));
}

pub fn error(message: impl AsRef<str>) {
    eprintln!("{}", line("ERROR", message.as_ref()));
}
