//! Controller-side error taxonomy.
//!
//! Every variant's display form is a complete sentence the outer tool
//! layer can surface verbatim, including the remediation where one
//! exists: a gone process or missing endpoint is fixed by re-running
//! discovery and attaching to the new PID, not by retrying the call.

/// Errors surfaced by the controller bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No target attached yet.
    #[error("no target is attached; call attach() with a PID or process name first")]
    NotAttached,

    /// The target process does not exist (any more).
    #[error(
        "target process {target} no longer exists; re-run discovery and attach to the new PID"
    )]
    ProcessGone { target: String },

    /// The process is alive but no endpoint answers its rendezvous name.
    #[error(
        "no inspector endpoint is listening for PID {pid}; re-run discovery and re-attach once the \
         target hosts an inspector"
    )]
    InspectorUnreachable {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    /// Opening the rendezvous connection exceeded the deadline.
    #[error(
        "connecting to the inspector for PID {pid} timed out after {timeout_ms} ms; the target may \
         be starting up, retry shortly"
    )]
    ConnectionTimeout { pid: u32, timeout_ms: u64 },

    /// No reply arrived within the request deadline.
    #[error(
        "no reply from the inspector for PID {pid} within {timeout_ms} ms; the target UI thread may \
         be blocked, retry or increase the request timeout"
    )]
    RequestTimeout { pid: u32, timeout_ms: u64 },

    /// The reply was malformed, truncated, or the connection broke
    /// mid-exchange.
    #[error("protocol error talking to the inspector: {0}")]
    Protocol(String),

    /// The endpoint answered with a handler failure.
    #[error("inspector reported {code}: {message}")]
    Handler { code: String, message: String },
}

impl BridgeError {
    /// Split an endpoint error string (`Kind: detail`) into a typed
    /// handler error.
    pub(crate) fn from_endpoint(error: String) -> Self {
        match error.split_once(": ") {
            Some((code, message)) if !code.contains(' ') => BridgeError::Handler {
                code: code.to_string(),
                message: message.to_string(),
            },
            _ => BridgeError::Handler {
                code: "HandlerError".to_string(),
                message: error,
            },
        }
    }
}
