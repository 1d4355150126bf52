//! Endpoint configuration.

use std::path::PathBuf;
use std::time::Duration;

use spyglass_types::rendezvous;

/// Tunables for one inspector endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Directory for the rendezvous socket; the shared runtime directory
    /// when `None`.
    pub socket_dir: Option<PathBuf>,
    /// Rendezvous-name prefix (`wpf_inspector` by default).
    pub prefix: String,
    /// Deadline for any one piece of UI-thread work.
    pub ui_timeout: Duration,
    /// Binding-error FIFO capacity.
    pub error_buffer_capacity: usize,
    /// Notification queue capacity (drop-oldest beyond this).
    pub notify_capacity: usize,
    /// Job channel depth between transport and UI scheduler.
    pub job_buffer: usize,
    /// Pause after a failed accept before retrying.
    pub accept_backoff: Duration,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            socket_dir: None,
            prefix: rendezvous::DEFAULT_PREFIX.to_string(),
            ui_timeout: Duration::from_secs(10),
            error_buffer_capacity: 1000,
            notify_capacity: 256,
            job_buffer: 64,
            accept_backoff: Duration::from_millis(500),
        }
    }
}

impl EndpointConfig {
    /// Rendezvous socket path for a target PID under this configuration.
    pub fn socket_path(&self, pid: u32) -> PathBuf {
        rendezvous::socket_path(self.socket_dir.as_deref(), &self.prefix, pid)
    }
}
