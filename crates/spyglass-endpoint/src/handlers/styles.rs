//! Style inspection.

use spyglass_types::{InspectError, ResourceScope, SetterRecord, StyleRecord, TriggerRecord};
use spyglass_wire::{ElementRequest, StylesResult};

use crate::adapter::{StyleDescription, ToolkitAdapter};
use crate::analyzer;
use crate::state::InspectorState;

/// The element's active style, plus whether a distinct implicit
/// (type-keyed) style is reachable via resource lookup.
pub fn styles<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: ElementRequest,
) -> Result<StylesResult, InspectError> {
    let node = state.resolve(&request.element_handle)?;

    let style = state.adapter().style(&node).map(to_style_record);
    let short = state.adapter().short_type_name(&node);
    let implicit_key = find_type_keyed_style(state, &node, &short);

    let has_implicit_style = match (&implicit_key, &style) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(key), Some(active)) => active.key.as_deref() != Some(key.as_str()),
    };

    Ok(StylesResult {
        style,
        has_implicit_style,
    })
}

/// Search the element's resource chain, then application scope, for a
/// style resource keyed by the element's short type name.
fn find_type_keyed_style<A: ToolkitAdapter>(
    state: &InspectorState<A>,
    node: &A::Node,
    short_type: &str,
) -> Option<String> {
    let is_style_entry = |entry: &crate::adapter::ResourceEntry| {
        entry.key == short_type && entry.type_name.contains("Style")
    };

    let mut current = Some(node.clone());
    while let Some(n) = current {
        if let Some(entry) = state
            .adapter()
            .resources(ResourceScope::Element, Some(&n))
            .iter()
            .find(|e| is_style_entry(e))
        {
            return Some(entry.key.clone());
        }
        current = state.adapter().parent(&n);
    }

    state
        .adapter()
        .resources(ResourceScope::Application, None)
        .iter()
        .find(|e| is_style_entry(e))
        .map(|e| e.key.clone())
}

fn to_style_record(style: StyleDescription) -> StyleRecord {
    StyleRecord {
        key: style.key,
        target_type: style.target_type,
        based_on: style.based_on,
        setters: style
            .setters
            .into_iter()
            .map(|s| SetterRecord {
                property: s.property,
                value: analyzer::format_value(&s.value),
            })
            .collect(),
        triggers: style
            .triggers
            .into_iter()
            .map(|t| TriggerRecord {
                kind: t.kind,
                property: t.property,
                value: t.value.as_ref().map(analyzer::format_value),
                setters: t
                    .setters
                    .into_iter()
                    .map(|s| SetterRecord {
                        property: s.property,
                        value: analyzer::format_value(&s.value),
                    })
                    .collect(),
            })
            .collect(),
    }
}
