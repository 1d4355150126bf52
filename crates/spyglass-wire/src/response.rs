//! Response envelopes sent from an endpoint back to the bridge.
//!
//! Every reply shares the `{requestId, success, error?}` envelope; the
//! kind-specific body is flattened into the same JSON object, so a visual
//! tree reply reads `{"requestId":"..","success":true,"root":{...},...}`.

use serde::{Deserialize, Serialize};

use spyglass_types::{
    BindingErrorRecord, BindingRecord, ElementMatch, LayoutRecord, PropertyRecord, ResourceRecord,
    StyleRecord, VisualTreeNode,
};

use crate::request::ExportFormat;

/// The shared reply envelope with a flattened kind-specific body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    pub request_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub body: Option<T>,
}

impl<T> Response<T> {
    /// A successful reply carrying `body`.
    pub fn ok(request_id: impl Into<String>, body: T) -> Self {
        Self {
            request_id: request_id.into(),
            success: true,
            error: None,
            body: Some(body),
        }
    }

    /// A failed reply; the body is omitted.
    pub fn failure(request_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            error: Some(error.into()),
            body: None,
        }
    }
}

/// `GetVisualTree` / `GetLogicalTree` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeResult {
    pub root: VisualTreeNode,
    /// Number of nodes emitted in `root`.
    pub total_elements: usize,
    /// True when some node at the depth limit had children that were not
    /// emitted.
    pub max_depth_reached: bool,
}

/// `GetElementProperties` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesResult {
    pub properties: Vec<PropertyRecord>,
}

/// `FindElements` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindResult {
    pub matches: Vec<ElementMatch>,
    /// Total matches in the subtree; omitted when the walk stopped early
    /// at the result cap.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_matches: Option<usize>,
}

/// `GetBindings` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingsResult {
    pub bindings: Vec<BindingRecord>,
}

/// `GetBindingErrors` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingErrorsResult {
    pub errors: Vec<BindingErrorRecord>,
}

/// `GetResources` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesResult {
    pub resources: Vec<ResourceRecord>,
}

/// `GetStyles` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesResult {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub style: Option<StyleRecord>,
    /// True when a type-keyed style is reachable via resource lookup but
    /// is not the active style.
    pub has_implicit_style: bool,
}

/// `HighlightElement` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightResult {
    pub duration_ms: u64,
}

/// `GetLayoutInfo` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub layout: LayoutRecord,
}

/// `WatchProperty` reply body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchResult {
    pub watch_id: String,
    pub initial_value: String,
}

/// `ExportTree` reply body; `tree` for json exports, `content` for xaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub format: ExportFormat,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tree: Option<VisualTreeNode>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
}
