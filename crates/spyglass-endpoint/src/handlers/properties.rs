//! Element property enumeration.

use spyglass_types::{InspectError, PropertyRecord};
use spyglass_wire::{ElementRequest, PropertiesResult};

use crate::adapter::ToolkitAdapter;
use crate::analyzer;
use crate::state::InspectorState;

/// Enumerate all properties of an element, name-ascending, with value
/// sources and embedded binding details where a binding is attached.
pub fn element_properties<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: ElementRequest,
) -> Result<PropertiesResult, InspectError> {
    let node = state.resolve(&request.element_handle)?;

    let mut descriptors = state.adapter().properties(&node);
    descriptors.sort_by(|a, b| a.name.cmp(&b.name));

    let mut records = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let Some(reading) = state.adapter().read_property(&node, &descriptor.name) else {
            continue;
        };
        let value = analyzer::format_value(&reading.value);
        let binding_details = if reading.is_binding {
            state
                .adapter()
                .binding(&node, &descriptor.name)
                .map(|b| analyzer::binding_record(&descriptor.name, &b, Some(value.clone())))
        } else {
            None
        };
        records.push(PropertyRecord {
            name: descriptor.name,
            type_name: descriptor.type_name,
            value,
            source: reading.source,
            is_binding: reading.is_binding,
            binding_details,
        });
    }

    Ok(PropertiesResult {
        properties: records,
    })
}
