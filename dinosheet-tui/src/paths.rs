//! Where settings and logs live on disk.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const LATEST_LOG: &str = "latest.log";
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "dinosheet", "dinosheet")
}

/// `settings.json` in the platform config directory.
pub fn settings_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Log file of the running session, in the platform cache directory.
pub fn log_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().join(LATEST_LOG))
}

/// Archives the previous session's log under a timestamp. Call before the
/// logger opens a new one.
pub fn rotate_logs() {
    if let Some(dirs) = project_dirs() {
        rotate_logs_in(dirs.cache_dir());
    }
}

fn rotate_logs_in(dir: &Path) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, dir.join(format!("{stamp}.log")));
    }
    prune_logs(dir, MAX_OLD_LOGS);
}

/// Deletes archived logs beyond the `keep` newest.
fn prune_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut archived: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();
    archived.sort_by_key(|entry| entry.metadata().and_then(|m| m.modified()).ok());

    let excess = archived.len().saturating_sub(keep);
    for entry in &archived[..excess] {
        let _ = fs::remove_file(entry.path());
    }
}
