//! Binding enumeration and binding-error snapshots.

use spyglass_types::InspectError;
use spyglass_wire::{BasicRequest, BindingErrorsResult, BindingsResult, ElementRequest};

use crate::adapter::ToolkitAdapter;
use crate::analyzer;
use crate::state::InspectorState;

/// All bindings on one element, property-ascending. `currentValue`
/// reflects the target property's value at read time.
pub fn element_bindings<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: ElementRequest,
) -> Result<BindingsResult, InspectError> {
    let node = state.resolve(&request.element_handle)?;

    let mut bindings = Vec::new();
    for descriptor in state.adapter().properties(&node) {
        if let Some(binding) = state.adapter().binding(&node, &descriptor.name) {
            let current = state
                .adapter()
                .read_property(&node, &descriptor.name)
                .map(|r| analyzer::format_value(&r.value));
            bindings.push(analyzer::binding_record(&descriptor.name, &binding, current));
        }
    }
    bindings.sort_by(|a, b| a.property.cmp(&b.property));

    Ok(BindingsResult { bindings })
}

/// Snapshot of the endpoint's binding-error FIFO, oldest first.
pub fn binding_errors<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    _request: BasicRequest,
) -> Result<BindingErrorsResult, InspectError> {
    Ok(BindingErrorsResult {
        errors: state.errors.borrow().snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyglass_types::{BindingErrorKind, BindingStatus};

    use crate::handlers::tree::visual_tree;
    use crate::notify::Notifier;
    use crate::testkit::MockToolkit;

    fn sample_state() -> InspectorState<MockToolkit> {
        InspectorState::new(MockToolkit::sample_window(), Notifier::new(16), 100)
    }

    fn text_block_handle(state: &mut InspectorState<MockToolkit>) -> spyglass_types::Handle {
        let tree = visual_tree(
            state,
            spyglass_wire::TreeRequest {
                request_id: "t".into(),
                root_handle: None,
                max_depth: 10,
            },
        )
        .unwrap();
        tree.root.children[0].children[1].handle.clone()
    }

    #[test]
    fn lists_bindings_with_current_value() {
        let mut state = sample_state();
        let handle = text_block_handle(&mut state);
        let result = element_bindings(
            &mut state,
            ElementRequest {
                request_id: "b".into(),
                element_handle: handle,
            },
        )
        .unwrap();

        assert_eq!(result.bindings.len(), 1);
        let binding = &result.bindings[0];
        assert_eq!(binding.property, "Text");
        assert_eq!(binding.path, "Status");
        assert_eq!(binding.status, BindingStatus::Active);
        assert_eq!(binding.current_value.as_deref(), Some("Ready"));
    }

    #[test]
    fn unbound_element_yields_empty_list() {
        let mut state = sample_state();
        let tree = visual_tree(
            &mut state,
            spyglass_wire::TreeRequest {
                request_id: "t".into(),
                root_handle: None,
                max_depth: 10,
            },
        )
        .unwrap();
        let button = tree.root.children[0].children[0].handle.clone();
        let result = element_bindings(
            &mut state,
            ElementRequest {
                request_id: "b".into(),
                element_handle: button,
            },
        )
        .unwrap();
        assert!(result.bindings.is_empty());
    }

    #[test]
    fn trace_lines_land_in_the_error_snapshot() {
        let mut state = sample_state();
        state.adapter_mut().emit_trace(
            "System.Windows.Data Error: 4 : Cannot find source for binding. \
             BindingExpression:Path=Missing; target element is 'TextBlock' (Name='StatusText'); \
             target property is 'Text' (type 'String')",
        );

        let result = binding_errors(
            &mut state,
            BasicRequest {
                request_id: "e".into(),
            },
        )
        .unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error_type, BindingErrorKind::SourceNotFound);
        assert_eq!(result.errors[0].element_name.as_deref(), Some("StatusText"));
    }
}
