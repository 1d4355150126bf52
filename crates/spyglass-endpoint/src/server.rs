//! The endpoint's Unix-socket server.
//!
//! One endpoint per target process, one client at a time: the accept loop
//! services a connection to completion before accepting the next. The
//! reader works at the byte level (accumulate, split on `\n`, strip BOM)
//! and every write is followed by an explicit flush. Buffered text
//! wrappers over a bidirectional pipe are exactly the construction that
//! deadlocks when the peer is mid-write, so none are used here.
//!
//! Requests on a connection are serviced strictly in order; notifications
//! from the queue interleave between frames but never inside one.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{unix::OwnedWriteHalf, UnixListener, UnixStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use spyglass_types::InspectError;
use spyglass_wire::{codec, FrameBuffer, Request, Response};

use crate::adapter::ToolkitAdapter;
use crate::config::EndpointConfig;
use crate::handlers;
use crate::marshal::{self, Marshaler, UiExecutor};
use crate::notify::Notifier;

/// Maximum request frame length (1 MB). Prevents memory exhaustion from
/// a peer that never sends a newline.
const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Transport-side pieces of a spawned endpoint.
///
/// The host builds its UI-thread state as
/// `InspectorState::new(adapter, handle.notifier.clone(),
/// handle.error_buffer_capacity)`; state construction must happen on the
/// UI thread, where the adapter lives.
pub struct EndpointHandle {
    pub socket_path: PathBuf,
    /// Queue feeding unsolicited notifications to the connected client.
    pub notifier: Notifier,
    /// Capacity to pass through to the session's binding-error buffer.
    pub error_buffer_capacity: usize,
    shutdown: watch::Sender<bool>,
}

impl EndpointHandle {
    /// Stop the server; the job channel closes and the UI executor drains
    /// out.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}

/// Spawn the socket server on a dedicated thread with its own
/// current-thread runtime, and hand back the UI-side job executor.
///
/// The host creates its adapter on the UI thread, builds state via
/// [`EndpointHandle::make_state`], and drives the executor from its
/// dispatcher.
pub fn spawn_inspector<A: ToolkitAdapter + 'static>(
    config: EndpointConfig,
    pid: u32,
) -> Result<(UiExecutor<A>, EndpointHandle), String> {
    let socket_path = config.socket_path(pid);
    let (job_tx, job_rx) = marshal::job_channel::<A>(config.job_buffer);
    let marshaler = Marshaler::new(job_tx, config.ui_timeout);
    let notifier = Notifier::new(config.notify_capacity);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let serve_path = socket_path.clone();
    let serve_notifier = notifier.clone();
    let accept_backoff = config.accept_backoff;
    std::thread::Builder::new()
        .name("spyglass-endpoint".into())
        .spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime creation failed (out of memory?)");
            if let Err(e) = rt.block_on(serve(
                &serve_path,
                marshaler,
                serve_notifier,
                shutdown_rx,
                accept_backoff,
            )) {
                warn!(error = %e, "inspector endpoint server exited with error");
            }
        })
        .map_err(|e| format!("failed to spawn endpoint thread: {e}"))?;

    Ok((
        UiExecutor::new(job_rx),
        EndpointHandle {
            socket_path,
            notifier,
            error_buffer_capacity: config.error_buffer_capacity,
            shutdown: shutdown_tx,
        },
    ))
}

/// Run the rendezvous socket server until shutdown.
pub async fn serve<A: ToolkitAdapter + 'static>(
    socket_path: &Path,
    marshaler: Marshaler<A>,
    notifier: Notifier,
    mut shutdown: watch::Receiver<bool>,
    accept_backoff: Duration,
) -> Result<(), String> {
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| format!("failed to create socket dir: {e}"))?;
    }

    // Remove stale socket file (ignore NotFound to avoid TOCTOU race)
    match std::fs::remove_file(socket_path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(format!("failed to remove stale socket: {e}")),
    }

    let listener = UnixListener::bind(socket_path).map_err(|e| {
        format!(
            "failed to bind inspector socket at {}: {e}",
            socket_path.display()
        )
    })?;

    info!(path = %socket_path.display(), "inspector endpoint listening");

    loop {
        let mut conn_shutdown = shutdown.clone();
        tokio::select! {
            accept_result = listener.accept() => match accept_result {
                Ok((stream, _addr)) => {
                    debug!("inspector client connected");
                    // Single-client policy: service this connection to
                    // completion before accepting another.
                    match handle_connection(stream, &marshaler, &notifier, &mut conn_shutdown).await {
                        Ok(()) => debug!("inspector client disconnected"),
                        Err(e) => debug!(error = %e, "inspector connection ended"),
                    }
                    if *conn_shutdown.borrow() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "inspector socket accept error");
                    tokio::time::sleep(accept_backoff).await;
                }
            },
            _ = async {
                loop {
                    if *shutdown.borrow() {
                        break;
                    }
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
            } => {
                info!("inspector endpoint shutting down");
                break;
            }
        }
    }

    let _ = std::fs::remove_file(socket_path);
    Ok(())
}

/// Service one client connection: read frames, dispatch in order, write
/// replies, and interleave queued notifications.
async fn handle_connection<A: ToolkitAdapter + 'static>(
    stream: UnixStream,
    marshaler: &Marshaler<A>,
    notifier: &Notifier,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<(), String> {
    let (mut reader, mut writer) = stream.into_split();
    let mut frames = FrameBuffer::new(MAX_FRAME_LEN);
    let mut read_buf = vec![0u8; 8 * 1024];

    loop {
        tokio::select! {
            read_result = reader.read(&mut read_buf) => {
                let n = read_result.map_err(|e| format!("read failed: {e}"))?;
                if n == 0 {
                    // Peer closed; end this connection cleanly.
                    return Ok(());
                }
                if let Err(e) = frames.extend(&read_buf[..n]) {
                    let reply = Response::<serde_json::Value>::failure(
                        "",
                        InspectError::InvalidRequest(e.to_string()).to_string(),
                    );
                    if let Ok(bytes) = codec::encode(&reply) {
                        let _ = write_frame(&mut writer, &bytes).await;
                    }
                    return Err("oversized frame".into());
                }
                while let Some(frame) = frames.next_frame() {
                    let started = Instant::now();
                    let reply = process_frame(&frame, marshaler).await;
                    write_frame(&mut writer, &reply).await?;
                    debug!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "request serviced"
                    );
                }
            }
            notification = notifier.next() => {
                match codec::encode(&notification) {
                    Ok(bytes) => write_frame(&mut writer, &bytes).await?,
                    Err(e) => warn!(error = %e, "failed to encode notification"),
                }
            }
            _ = async {
                loop {
                    if *shutdown.borrow() {
                        break;
                    }
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
            } => {
                return Ok(());
            }
        }
    }
}

async fn write_frame(writer: &mut OwnedWriteHalf, bytes: &[u8]) -> Result<(), String> {
    writer
        .write_all(bytes)
        .await
        .map_err(|e| format!("write failed: {e}"))?;
    writer
        .flush()
        .await
        .map_err(|e| format!("flush failed: {e}"))
}

/// Decode and dispatch one frame. Parse errors answer with an empty
/// `requestId` instead of dropping the connection.
async fn process_frame<A: ToolkitAdapter + 'static>(
    frame: &[u8],
    marshaler: &Marshaler<A>,
) -> Vec<u8> {
    let request: Request = match codec::decode(frame) {
        Ok(request) => request,
        Err(e) => {
            let err = InspectError::InvalidRequest(e.to_string());
            return codec::encode(&Response::<serde_json::Value>::failure("", err.to_string()))
                .unwrap_or_default();
        }
    };
    handlers::dispatch(request, marshaler).await
}
