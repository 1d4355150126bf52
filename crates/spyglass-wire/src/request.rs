//! Request messages sent from the controller bridge to an endpoint.
//!
//! Requests are a closed tagged sum: `{"type": "<Kind>", "data": {...}}`
//! with the per-kind payload under `data`. Every payload carries a
//! `requestId` the endpoint echoes back in its reply. Unknown input fields
//! are ignored; omitted optionals take protocol defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use spyglass_types::{Handle, ResourceScope};

/// A request envelope, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Request {
    GetVisualTree(TreeRequest),
    GetLogicalTree(TreeRequest),
    GetElementProperties(ElementRequest),
    FindElements(FindRequest),
    GetBindings(ElementRequest),
    GetBindingErrors(BasicRequest),
    GetResources(ResourcesRequest),
    GetStyles(ElementRequest),
    HighlightElement(HighlightRequest),
    GetLayoutInfo(ElementRequest),
    WatchProperty(WatchRequest),
    ExportTree(ExportRequest),
}

impl Request {
    /// The `requestId` carried by this request.
    pub fn request_id(&self) -> &str {
        match self {
            Request::GetVisualTree(r) | Request::GetLogicalTree(r) => &r.request_id,
            Request::GetElementProperties(r)
            | Request::GetBindings(r)
            | Request::GetStyles(r)
            | Request::GetLayoutInfo(r) => &r.request_id,
            Request::FindElements(r) => &r.request_id,
            Request::GetBindingErrors(r) => &r.request_id,
            Request::GetResources(r) => &r.request_id,
            Request::HighlightElement(r) => &r.request_id,
            Request::WatchProperty(r) => &r.request_id,
            Request::ExportTree(r) => &r.request_id,
        }
    }

    /// The wire tag of this request kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::GetVisualTree(_) => "GetVisualTree",
            Request::GetLogicalTree(_) => "GetLogicalTree",
            Request::GetElementProperties(_) => "GetElementProperties",
            Request::FindElements(_) => "FindElements",
            Request::GetBindings(_) => "GetBindings",
            Request::GetBindingErrors(_) => "GetBindingErrors",
            Request::GetResources(_) => "GetResources",
            Request::GetStyles(_) => "GetStyles",
            Request::HighlightElement(_) => "HighlightElement",
            Request::GetLayoutInfo(_) => "GetLayoutInfo",
            Request::WatchProperty(_) => "WatchProperty",
            Request::ExportTree(_) => "ExportTree",
        }
    }
}

/// Payload with no fields beyond the request ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicRequest {
    pub request_id: String,
}

/// `GetVisualTree` / `GetLogicalTree` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRequest {
    pub request_id: String,
    /// Walk start; the first root window when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub root_handle: Option<Handle>,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

/// Payload addressing a single element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRequest {
    pub request_id: String,
    pub element_handle: Handle,
}

/// `FindElements` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindRequest {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub root_handle: Option<Handle>,
    /// Case-insensitive substring of the fully-qualified type, or exact
    /// short type name.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_name: Option<String>,
    /// Case-insensitive substring of the element name.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub element_name: Option<String>,
    /// Property name → required stringified value (case-insensitive whole
    /// match). BTreeMap keeps serialized filters in a stable order.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub property_filter: BTreeMap<String, String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// `GetResources` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesRequest {
    pub request_id: String,
    #[serde(default)]
    pub scope: ResourceScope,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub element_handle: Option<Handle>,
}

/// `HighlightElement` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRequest {
    pub request_id: String,
    pub element_handle: Handle,
    #[serde(default = "default_highlight_ms")]
    pub duration_ms: u64,
}

/// `WatchProperty` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchRequest {
    pub request_id: String,
    pub element_handle: Handle,
    pub property_name: String,
}

/// Output form of an `ExportTree` request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Xaml,
}

/// `ExportTree` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub element_handle: Option<Handle>,
    #[serde(default)]
    pub format: ExportFormat,
}

pub(crate) fn default_max_depth() -> u32 {
    10
}

pub(crate) fn default_max_results() -> usize {
    50
}

pub(crate) fn default_highlight_ms() -> u64 {
    2000
}
