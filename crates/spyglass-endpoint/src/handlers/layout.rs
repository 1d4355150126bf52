//! Layout measurement and element highlighting.

use std::time::Duration;

use spyglass_types::InspectError;
use spyglass_wire::{ElementRequest, HighlightRequest, HighlightResult, LayoutResult};

use crate::adapter::ToolkitAdapter;
use crate::state::InspectorState;

/// Layout measurements of a renderable element.
pub fn layout_info<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: ElementRequest,
) -> Result<LayoutResult, InspectError> {
    let node = state.resolve(&request.element_handle)?;
    match state.adapter().layout(&node) {
        Some(layout) => Ok(LayoutResult { layout }),
        None => Err(InspectError::NotRenderable(state.describe(&node))),
    }
}

/// Draw the transient overlay rectangle. The reply returns immediately;
/// the overlay is best-effort and never interactive.
pub fn highlight<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: HighlightRequest,
) -> Result<HighlightResult, InspectError> {
    let node = state.resolve(&request.element_handle)?;
    state
        .adapter()
        .highlight(&node, Duration::from_millis(request.duration_ms));
    Ok(HighlightResult {
        duration_ms: request.duration_ms,
    })
}
