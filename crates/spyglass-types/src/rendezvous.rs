//! Rendezvous-name resolution.
//!
//! Each inspector endpoint listens on a Unix domain socket whose filename
//! is derived from the target process's PID: `wpf_inspector_<pid>.sock` by
//! default. Both sides must agree on the directory, so it resolves from
//! `$XDG_RUNTIME_DIR/spyglass`, falling back to `~/.spyglass` and finally
//! `/tmp/spyglass`.

use std::path::{Path, PathBuf};

/// Default rendezvous-name prefix.
pub const DEFAULT_PREFIX: &str = "wpf_inspector";

/// Resolve the directory holding rendezvous sockets.
pub fn runtime_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir).join("spyglass");
        }
    }
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(".spyglass"),
        _ => PathBuf::from("/tmp").join("spyglass"),
    }
}

/// The socket filename for a target PID.
pub fn socket_name(prefix: &str, pid: u32) -> String {
    format!("{prefix}_{pid}.sock")
}

/// Full socket path for a target PID, under `dir` when given or the
/// default runtime directory otherwise.
pub fn socket_path(dir: Option<&Path>, prefix: &str, pid: u32) -> PathBuf {
    let base = dir.map(Path::to_path_buf).unwrap_or_else(runtime_dir);
    base.join(socket_name(prefix, pid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_name_embeds_decimal_pid() {
        assert_eq!(socket_name(DEFAULT_PREFIX, 4321), "wpf_inspector_4321.sock");
    }

    #[test]
    fn explicit_dir_wins() {
        let path = socket_path(Some(Path::new("/run/test")), "probe", 7);
        assert_eq!(path, PathBuf::from("/run/test/probe_7.sock"));
    }
}
