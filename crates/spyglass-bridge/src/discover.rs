//! Target discovery.
//!
//! Candidates come from two directions: processes whose names match the
//! configured patterns, and rendezvous sockets already present in the
//! runtime directory. Each candidate is probed with a short connect to
//! mark `inspector_available`, so callers can tell "plausible target"
//! apart from "attachable right now".

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::net::UnixStream;
use tracing::debug;

use crate::client::BridgeConfig;

/// One discovered target process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCandidate {
    pub pid: u32,
    pub name: String,
    /// Whether the rendezvous endpoint accepted a connection just now.
    pub inspector_available: bool,
}

/// True when the PID exists (signal 0 probe; `EPERM` still means alive).
pub fn process_exists(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    match kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

/// Look up a process name by PID.
pub fn process_name(pid: u32) -> Option<String> {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[sysinfo::Pid::from_u32(pid)]),
        true,
        ProcessRefreshKind::nothing(),
    );
    system
        .process(sysinfo::Pid::from_u32(pid))
        .map(|p| p.name().to_string_lossy().into_owned())
}

/// Find PIDs whose process name contains `pattern` (case-insensitive).
pub fn pids_by_name(pattern: &str) -> Vec<(u32, String)> {
    let mut system = System::new();
    system.refresh_processes_specifics(ProcessesToUpdate::All, true, ProcessRefreshKind::nothing());
    let wanted = pattern.to_lowercase();
    let mut found: Vec<(u32, String)> = system
        .processes()
        .iter()
        .filter_map(|(pid, process)| {
            let name = process.name().to_string_lossy().into_owned();
            name.to_lowercase()
                .contains(&wanted)
                .then(|| (pid.as_u32(), name))
        })
        .collect();
    found.sort_by_key(|(pid, _)| *pid);
    found
}

/// Enumerate candidate targets and probe each rendezvous endpoint.
pub async fn discover_candidates(config: &BridgeConfig) -> Vec<ProcessCandidate> {
    // pid -> name, deduplicating the two sources.
    let mut candidates: BTreeMap<u32, String> = BTreeMap::new();

    for pattern in &config.process_name_patterns {
        for (pid, name) in pids_by_name(pattern) {
            candidates.entry(pid).or_insert(name);
        }
    }

    for pid in socket_pids(&config.socket_base_dir(), &config.prefix) {
        if !process_exists(pid) {
            continue;
        }
        candidates
            .entry(pid)
            .or_insert_with(|| process_name(pid).unwrap_or_else(|| "unknown".into()));
    }

    let mut result = Vec::with_capacity(candidates.len());
    for (pid, name) in candidates {
        let inspector_available = probe_endpoint(&config.socket_path(pid)).await;
        debug!(pid, name = %name, inspector_available, "discovered candidate");
        result.push(ProcessCandidate {
            pid,
            name,
            inspector_available,
        });
    }
    result
}

/// PIDs parsed out of `<prefix>_<pid>.sock` filenames in the runtime
/// directory.
fn socket_pids(dir: &Path, prefix: &str) -> Vec<u32> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut pids = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(stem) = name
            .strip_prefix(prefix)
            .and_then(|s| s.strip_prefix('_'))
            .and_then(|s| s.strip_suffix(".sock"))
        else {
            continue;
        };
        if let Ok(pid) = stem.parse::<u32>() {
            pids.push(pid);
        }
    }
    pids
}

/// True when the endpoint accepts a connection within a short deadline.
async fn probe_endpoint(socket_path: &Path) -> bool {
    matches!(
        tokio::time::timeout(Duration::from_secs(1), UnixStream::connect(socket_path)).await,
        Ok(Ok(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_pid_exists() {
        assert!(process_exists(std::process::id()));
    }

    #[test]
    fn absurd_pid_does_not_exist() {
        // PID max on Linux is bounded well below this.
        assert!(!process_exists(3_999_999));
    }

    #[test]
    fn socket_pids_parse_prefix_and_pid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("wpf_inspector_4321.sock"), b"").unwrap();
        std::fs::write(dir.path().join("wpf_inspector_99.sock"), b"").unwrap();
        std::fs::write(dir.path().join("other_1.sock"), b"").unwrap();
        std::fs::write(dir.path().join("wpf_inspector_nan.sock"), b"").unwrap();

        let mut pids = socket_pids(dir.path(), "wpf_inspector");
        pids.sort();
        assert_eq!(pids, vec![99, 4321]);
    }

    #[tokio::test]
    async fn probe_fails_without_listener() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!probe_endpoint(&dir.path().join("missing.sock")).await);
    }
}
