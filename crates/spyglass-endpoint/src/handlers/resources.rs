//! Resource dictionary enumeration.

use spyglass_types::{InspectError, ResourceRecord, ResourceScope};
use spyglass_wire::{ResourcesRequest, ResourcesResult};

use crate::adapter::{ResourceEntry, ToolkitAdapter};
use crate::analyzer;
use crate::state::InspectorState;

/// Enumerate resources at the requested scope.
///
/// Element scope walks from the element up through its parents, labeling
/// each level's entries with the owning node, then appends
/// application-scope resources at the end, the same order the framework
/// itself resolves lookups.
pub fn resources<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: ResourcesRequest,
) -> Result<ResourcesResult, InspectError> {
    let records = match request.scope {
        ResourceScope::Application => application_records(state),
        ResourceScope::Window => {
            let node = match &request.element_handle {
                Some(handle) => state.resolve(handle)?,
                None => state.first_root()?,
            };
            let source = state.describe(&node);
            state
                .adapter()
                .resources(ResourceScope::Window, Some(&node))
                .into_iter()
                .map(|e| to_record(e, &source))
                .collect()
        }
        ResourceScope::Element => {
            let handle = request
                .element_handle
                .as_ref()
                .ok_or(InspectError::MissingField("elementHandle"))?;
            let mut node = state.resolve(handle)?;
            let mut records = Vec::new();
            loop {
                let source = state.describe(&node);
                for entry in state.adapter().resources(ResourceScope::Element, Some(&node)) {
                    records.push(to_record(entry, &source));
                }
                match state.adapter().parent(&node) {
                    Some(parent) => node = parent,
                    None => break,
                }
            }
            records.extend(application_records(state));
            records
        }
    };

    Ok(ResourcesResult { resources: records })
}

fn application_records<A: ToolkitAdapter>(state: &InspectorState<A>) -> Vec<ResourceRecord> {
    state
        .adapter()
        .resources(ResourceScope::Application, None)
        .into_iter()
        .map(|e| to_record(e, "Application"))
        .collect()
}

fn to_record(entry: ResourceEntry, source: &str) -> ResourceRecord {
    ResourceRecord {
        key: entry.key,
        type_name: entry.type_name,
        value: analyzer::format_value(&entry.value),
        source: source.to_string(),
        target_type: entry.target_type,
    }
}
