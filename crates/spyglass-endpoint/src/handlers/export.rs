//! Tree export.

use std::collections::HashSet;

use spyglass_types::InspectError;
use spyglass_wire::{ExportFormat, ExportRequest, ExportResult, TreeRequest};

use crate::adapter::ToolkitAdapter;
use crate::handlers::tree::{self, TreeKind};
use crate::state::InspectorState;

/// Depth used for exports; effectively the whole tree.
const EXPORT_DEPTH: u32 = 100;

/// Export the visual tree as deeply-walked JSON or as an indented
/// XAML-like sketch.
pub fn export_tree<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: ExportRequest,
) -> Result<ExportResult, InspectError> {
    match request.format {
        ExportFormat::Json => {
            let walked = tree::walk_tree(
                state,
                TreeRequest {
                    request_id: request.request_id,
                    root_handle: request.element_handle,
                    max_depth: EXPORT_DEPTH,
                },
                TreeKind::Visual,
            )?;
            Ok(ExportResult {
                format: ExportFormat::Json,
                tree: Some(walked.root),
                content: None,
            })
        }
        ExportFormat::Xaml => {
            let start = match &request.element_handle {
                Some(handle) => state.resolve(handle)?,
                None => state.first_root()?,
            };
            let mut content = String::new();
            let mut visited = HashSet::new();
            write_xaml(state, &start, 0, &mut content, &mut visited);
            Ok(ExportResult {
                format: ExportFormat::Xaml,
                tree: None,
                content: Some(content),
            })
        }
    }
}

fn write_xaml<A: ToolkitAdapter>(
    state: &InspectorState<A>,
    node: &A::Node,
    depth: u32,
    out: &mut String,
    visited: &mut HashSet<u64>,
) {
    if !visited.insert(state.adapter().node_key(node)) {
        return;
    }

    let indent = "  ".repeat(depth as usize);
    let tag = state.adapter().short_type_name(node);
    let name_attr = state
        .adapter()
        .name(node)
        .filter(|n| !n.is_empty())
        .map(|n| format!(" x:Name=\"{}\"", xml_escape(&n)))
        .unwrap_or_default();

    let children = if depth >= EXPORT_DEPTH {
        Vec::new()
    } else {
        state.adapter().children_visual(node)
    };

    if children.is_empty() {
        out.push_str(&format!("{indent}<{tag}{name_attr} />\n"));
        return;
    }

    out.push_str(&format!("{indent}<{tag}{name_attr}>\n"));
    for child in &children {
        write_xaml(state, child, depth + 1, out, visited);
    }
    out.push_str(&format!("{indent}</{tag}>\n"));
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
