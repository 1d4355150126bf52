//! Property watch subscription.

use chrono::Utc;

use spyglass_types::InspectError;
use spyglass_wire::notification::PropertyChangedNotification;
use spyglass_wire::{Notification, WatchRequest, WatchResult};

use crate::adapter::ToolkitAdapter;
use crate::analyzer;
use crate::state::InspectorState;
use crate::watch::WatchEntry;

/// Subscribe to changes of one property on one element.
///
/// Each change fires a `PropertyChanged` notification whose `oldValue` is
/// the value the previous notification reported (the initial value for
/// the first). The change callback runs on the UI thread and only touches
/// the watch table and the notification queue, so it never re-enters the
/// adapter.
pub fn watch_property<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: WatchRequest,
) -> Result<WatchResult, InspectError> {
    let node = state.resolve(&request.element_handle)?;

    let reading = state
        .adapter()
        .read_property(&node, &request.property_name)
        .ok_or_else(|| InspectError::PropertyNotFound {
            property: request.property_name.clone(),
            element: state.describe(&node),
        })?;
    let initial_value = analyzer::format_value(&reading.value);

    let watch_id = state.watches.borrow_mut().allocate_id();

    let watches = std::rc::Rc::clone(&state.watches);
    let notifier = state.notifier.clone();
    let callback_watch_id = watch_id.clone();
    let callback_property = request.property_name.clone();
    let token = state.adapter_mut().subscribe_property_change(
        &node,
        &request.property_name,
        Box::new(move |value| {
            let new_value = analyzer::format_value(&value);
            let old_value = watches
                .borrow_mut()
                .record_change(&callback_watch_id, &new_value);
            if let Some(old_value) = old_value {
                notifier.push(Notification::PropertyChanged(PropertyChangedNotification {
                    watch_id: callback_watch_id.clone(),
                    property_name: callback_property.clone(),
                    old_value,
                    new_value,
                    timestamp: Utc::now(),
                }));
            }
        }),
    );

    state.watches.borrow_mut().insert(WatchEntry {
        watch_id: watch_id.clone(),
        handle: request.element_handle.clone(),
        property_name: request.property_name.clone(),
        last_value: initial_value.clone(),
        token,
    });

    Ok(WatchResult {
        watch_id,
        initial_value,
    })
}
