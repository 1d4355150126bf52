//! The controller: attach to a target and issue typed inspection calls.
//!
//! Each call opens a fresh connection, writes one request frame, and
//! reads until the matching reply arrives; notification frames seen on
//! the way are queued, not lost. [`Session`] is also usable directly when
//! the caller wants to hold one connection open, since property-change
//! notifications are only delivered to the currently-connected session.

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::debug;
use uuid::Uuid;

use spyglass_types::{rendezvous, Handle, ResourceScope};
use spyglass_wire::{
    codec, BasicRequest, BindingErrorsResult, BindingsResult, ElementRequest, ExportFormat,
    ExportRequest, ExportResult, FindRequest, FindResult, FrameBuffer, HighlightRequest,
    HighlightResult, LayoutResult, Notification, PropertiesResult, Request, ResourcesRequest,
    ResourcesResult, Response, StylesResult, TreeRequest, TreeResult, WatchRequest, WatchResult,
};

use crate::discover::{self, ProcessCandidate};
use crate::error::BridgeError;

/// Reply frames larger than this are treated as protocol errors.
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Controller-side configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Directory holding rendezvous sockets; the shared runtime directory
    /// when `None`.
    pub socket_dir: Option<PathBuf>,
    /// Rendezvous-name prefix (`wpf_inspector` by default).
    pub prefix: String,
    /// Deadline for opening the rendezvous connection.
    pub connect_timeout: Duration,
    /// Deadline for receiving a reply to one request.
    pub request_timeout: Duration,
    /// Case-insensitive process-name substrings considered plausible
    /// targets during discovery.
    pub process_name_patterns: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            socket_dir: None,
            prefix: rendezvous::DEFAULT_PREFIX.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            process_name_patterns: Vec::new(),
        }
    }
}

impl BridgeConfig {
    /// Rendezvous socket path for a PID.
    pub fn socket_path(&self, pid: u32) -> PathBuf {
        rendezvous::socket_path(self.socket_dir.as_deref(), &self.prefix, pid)
    }

    pub(crate) fn socket_base_dir(&self) -> PathBuf {
        self.socket_dir
            .clone()
            .unwrap_or_else(rendezvous::runtime_dir)
    }
}

#[derive(Debug, Clone)]
struct Target {
    pid: u32,
    name: Option<String>,
}

/// One open connection to an inspector endpoint.
pub struct Session {
    pid: u32,
    stream: UnixStream,
    frames: FrameBuffer,
    read_buf: Vec<u8>,
    /// Notifications that arrived while waiting for a reply.
    pending: VecDeque<Notification>,
    request_timeout: Duration,
}

impl Session {
    fn new(pid: u32, stream: UnixStream, request_timeout: Duration) -> Self {
        Self {
            pid,
            stream,
            frames: FrameBuffer::new(MAX_FRAME_LEN),
            read_buf: vec![0u8; 8 * 1024],
            pending: VecDeque::new(),
            request_timeout,
        }
    }

    /// Send one request and wait for its reply, queueing interleaved
    /// notifications.
    pub async fn request<T: DeserializeOwned>(
        &mut self,
        request: &Request,
    ) -> Result<T, BridgeError> {
        let frame =
            codec::encode(request).map_err(|e| BridgeError::Protocol(e.to_string()))?;
        self.stream
            .write_all(&frame)
            .await
            .map_err(|e| BridgeError::Protocol(format!("write failed: {e}")))?;
        self.stream
            .flush()
            .await
            .map_err(|e| BridgeError::Protocol(format!("flush failed: {e}")))?;

        let wanted = request.request_id().to_string();
        let deadline = self.request_timeout;
        match tokio::time::timeout(deadline, self.read_reply::<T>(&wanted)).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::RequestTimeout {
                pid: self.pid,
                timeout_ms: deadline.as_millis() as u64,
            }),
        }
    }

    async fn read_reply<T: DeserializeOwned>(&mut self, wanted: &str) -> Result<T, BridgeError> {
        loop {
            let frame = self.read_frame().await?;
            let value: serde_json::Value =
                codec::decode(&frame).map_err(|e| BridgeError::Protocol(e.to_string()))?;

            if value.get("notificationType").is_some() {
                match serde_json::from_value(value) {
                    Ok(notification) => self.pending.push_back(notification),
                    Err(e) => debug!(error = %e, "ignoring unparseable notification"),
                }
                continue;
            }

            match value.get("requestId").and_then(|v| v.as_str()) {
                Some(rid) if rid == wanted => {
                    let reply: Response<T> = serde_json::from_value(value)
                        .map_err(|e| BridgeError::Protocol(format!("malformed reply: {e}")))?;
                    if !reply.success {
                        let error = reply
                            .error
                            .unwrap_or_else(|| "endpoint reported failure without detail".into());
                        return Err(BridgeError::from_endpoint(error));
                    }
                    return reply.body.ok_or_else(|| {
                        BridgeError::Protocol("reply is missing its result fields".into())
                    });
                }
                // A reply for some other request (stale connection reuse)
                // or an envelope with no id at all: skip it.
                _ => continue,
            }
        }
    }

    /// Wait up to `wait` for the next unsolicited notification. `None`
    /// on timeout.
    pub async fn next_notification(
        &mut self,
        wait: Duration,
    ) -> Result<Option<Notification>, BridgeError> {
        if let Some(notification) = self.pending.pop_front() {
            return Ok(Some(notification));
        }
        let read = async {
            loop {
                let frame = self.read_frame().await?;
                let value: serde_json::Value =
                    codec::decode(&frame).map_err(|e| BridgeError::Protocol(e.to_string()))?;
                if value.get("notificationType").is_some() {
                    let notification = serde_json::from_value(value)
                        .map_err(|e| BridgeError::Protocol(e.to_string()))?;
                    return Ok(Some(notification));
                }
                // Replies without a pending request are dropped.
            }
        };
        match tokio::time::timeout(wait, read).await {
            Ok(result) => result,
            Err(_) => Ok(None),
        }
    }

    async fn read_frame(&mut self) -> Result<Vec<u8>, BridgeError> {
        loop {
            if let Some(frame) = self.frames.next_frame() {
                return Ok(frame);
            }
            let n = self
                .stream
                .read(&mut self.read_buf)
                .await
                .map_err(|e| BridgeError::Protocol(format!("read failed: {e}")))?;
            if n == 0 {
                return Err(BridgeError::Protocol(
                    "connection closed before the reply arrived".into(),
                ));
            }
            self.frames
                .extend(&self.read_buf[..n])
                .map_err(|e| BridgeError::Protocol(e.to_string()))?;
        }
    }
}

/// Search criteria for [`Controller::find_elements`].
#[derive(Debug, Clone, Default)]
pub struct FindFilter {
    pub root_handle: Option<Handle>,
    pub type_name: Option<String>,
    pub element_name: Option<String>,
    pub property_filter: BTreeMap<String, String>,
    pub max_results: Option<usize>,
}

/// The controller bridge: one attached target, transient connections.
pub struct Controller {
    config: BridgeConfig,
    target: Option<Target>,
}

impl Controller {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            target: None,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// PID of the attached target, if any.
    pub fn attached_pid(&self) -> Option<u32> {
        self.target.as_ref().map(|t| t.pid)
    }

    /// Enumerate plausible targets and probe their endpoints.
    pub async fn discover_candidates(&self) -> Vec<ProcessCandidate> {
        discover::discover_candidates(&self.config).await
    }

    /// Attach to a target by PID. Validates the process exists; the
    /// endpoint itself is contacted per request.
    pub fn attach_pid(&mut self, pid: u32) -> Result<(), BridgeError> {
        if !discover::process_exists(pid) {
            return Err(BridgeError::ProcessGone {
                target: pid.to_string(),
            });
        }
        let name = discover::process_name(pid);
        debug!(pid, name = name.as_deref().unwrap_or("unknown"), "attached to target");
        self.target = Some(Target { pid, name });
        Ok(())
    }

    /// Attach by process name (first match wins, lowest PID).
    pub fn attach_name(&mut self, name: &str) -> Result<u32, BridgeError> {
        let matches = discover::pids_by_name(name);
        let (pid, _) = matches.first().ok_or_else(|| BridgeError::ProcessGone {
            target: name.to_string(),
        })?;
        self.attach_pid(*pid)?;
        Ok(*pid)
    }

    /// Open a connection to the attached target's endpoint.
    pub async fn connect(&self) -> Result<Session, BridgeError> {
        let target = self.target.as_ref().ok_or(BridgeError::NotAttached)?;
        if !discover::process_exists(target.pid) {
            let gone = target
                .name
                .clone()
                .map(|n| format!("{} (pid {})", n, target.pid))
                .unwrap_or_else(|| target.pid.to_string());
            return Err(BridgeError::ProcessGone { target: gone });
        }

        let path = self.config.socket_path(target.pid);
        match tokio::time::timeout(self.config.connect_timeout, UnixStream::connect(&path)).await {
            Err(_) => Err(BridgeError::ConnectionTimeout {
                pid: target.pid,
                timeout_ms: self.config.connect_timeout.as_millis() as u64,
            }),
            Ok(Err(source)) => Err(BridgeError::InspectorUnreachable {
                pid: target.pid,
                source,
            }),
            Ok(Ok(stream)) => Ok(Session::new(
                target.pid,
                stream,
                self.config.request_timeout,
            )),
        }
    }

    /// One request over one transient connection.
    async fn invoke<T: DeserializeOwned>(&self, request: Request) -> Result<T, BridgeError> {
        debug!(kind = request.kind(), "invoking inspector request");
        let mut session = self.connect().await?;
        session.request(&request).await
    }

    fn request_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub async fn get_visual_tree(
        &self,
        root_handle: Option<Handle>,
        max_depth: Option<u32>,
    ) -> Result<TreeResult, BridgeError> {
        self.invoke(Request::GetVisualTree(TreeRequest {
            request_id: Self::request_id(),
            root_handle,
            max_depth: max_depth.unwrap_or(10),
        }))
        .await
    }

    pub async fn get_logical_tree(
        &self,
        root_handle: Option<Handle>,
        max_depth: Option<u32>,
    ) -> Result<TreeResult, BridgeError> {
        self.invoke(Request::GetLogicalTree(TreeRequest {
            request_id: Self::request_id(),
            root_handle,
            max_depth: max_depth.unwrap_or(10),
        }))
        .await
    }

    pub async fn get_element_properties(
        &self,
        element_handle: Handle,
    ) -> Result<PropertiesResult, BridgeError> {
        self.invoke(Request::GetElementProperties(ElementRequest {
            request_id: Self::request_id(),
            element_handle,
        }))
        .await
    }

    pub async fn find_elements(&self, filter: FindFilter) -> Result<FindResult, BridgeError> {
        self.invoke(Request::FindElements(FindRequest {
            request_id: Self::request_id(),
            root_handle: filter.root_handle,
            type_name: filter.type_name,
            element_name: filter.element_name,
            property_filter: filter.property_filter,
            max_results: filter.max_results.unwrap_or(50),
        }))
        .await
    }

    pub async fn get_bindings(&self, element_handle: Handle) -> Result<BindingsResult, BridgeError> {
        self.invoke(Request::GetBindings(ElementRequest {
            request_id: Self::request_id(),
            element_handle,
        }))
        .await
    }

    pub async fn get_binding_errors(&self) -> Result<BindingErrorsResult, BridgeError> {
        self.invoke(Request::GetBindingErrors(BasicRequest {
            request_id: Self::request_id(),
        }))
        .await
    }

    pub async fn get_resources(
        &self,
        scope: ResourceScope,
        element_handle: Option<Handle>,
    ) -> Result<ResourcesResult, BridgeError> {
        self.invoke(Request::GetResources(ResourcesRequest {
            request_id: Self::request_id(),
            scope,
            element_handle,
        }))
        .await
    }

    pub async fn get_styles(&self, element_handle: Handle) -> Result<StylesResult, BridgeError> {
        self.invoke(Request::GetStyles(ElementRequest {
            request_id: Self::request_id(),
            element_handle,
        }))
        .await
    }

    pub async fn highlight_element(
        &self,
        element_handle: Handle,
        duration_ms: Option<u64>,
    ) -> Result<HighlightResult, BridgeError> {
        self.invoke(Request::HighlightElement(HighlightRequest {
            request_id: Self::request_id(),
            element_handle,
            duration_ms: duration_ms.unwrap_or(2000),
        }))
        .await
    }

    pub async fn get_layout_info(&self, element_handle: Handle) -> Result<LayoutResult, BridgeError> {
        self.invoke(Request::GetLayoutInfo(ElementRequest {
            request_id: Self::request_id(),
            element_handle,
        }))
        .await
    }

    pub async fn watch_property(
        &self,
        element_handle: Handle,
        property_name: impl Into<String>,
    ) -> Result<WatchResult, BridgeError> {
        self.invoke(Request::WatchProperty(WatchRequest {
            request_id: Self::request_id(),
            element_handle,
            property_name: property_name.into(),
        }))
        .await
    }

    pub async fn export_tree(
        &self,
        element_handle: Option<Handle>,
        format: ExportFormat,
    ) -> Result<ExportResult, BridgeError> {
        self.invoke(Request::ExportTree(ExportRequest {
            request_id: Self::request_id(),
            element_handle,
            format,
        }))
        .await
    }
}
