//! Request handlers.
//!
//! [`dispatch`] routes a decoded request to its handler, runs the
//! UI-touching part under the marshaler, and returns the fully-encoded
//! reply frame. Handlers are synchronous functions over
//! [`InspectorState`](crate::state::InspectorState); nothing they return
//! borrows the live graph, so every reply is complete before it is
//! written.

pub mod bindings;
pub mod export;
pub mod find;
pub mod layout;
pub mod properties;
pub mod resources;
pub mod styles;
pub mod tree;
pub mod watch;

use serde::Serialize;
use tracing::debug;

use spyglass_types::InspectError;
use spyglass_wire::{codec, Request, Response};

use crate::adapter::ToolkitAdapter;
use crate::marshal::Marshaler;

/// Dispatch one request and encode its reply frame.
pub async fn dispatch<A: ToolkitAdapter + 'static>(
    request: Request,
    marshaler: &Marshaler<A>,
) -> Vec<u8> {
    let request_id = request.request_id().to_string();
    let kind = request.kind();
    debug!(kind, request_id = %request_id, "dispatching request");

    match request {
        Request::GetVisualTree(r) => {
            respond(request_id, marshaler.run(move |s| tree::visual_tree(s, r)).await)
        }
        Request::GetLogicalTree(r) => {
            respond(request_id, marshaler.run(move |s| tree::logical_tree(s, r)).await)
        }
        Request::GetElementProperties(r) => respond(
            request_id,
            marshaler.run(move |s| properties::element_properties(s, r)).await,
        ),
        Request::FindElements(r) => {
            respond(request_id, marshaler.run(move |s| find::find_elements(s, r)).await)
        }
        Request::GetBindings(r) => respond(
            request_id,
            marshaler.run(move |s| bindings::element_bindings(s, r)).await,
        ),
        Request::GetBindingErrors(r) => respond(
            request_id,
            marshaler.run(move |s| bindings::binding_errors(s, r)).await,
        ),
        Request::GetResources(r) => {
            respond(request_id, marshaler.run(move |s| resources::resources(s, r)).await)
        }
        Request::GetStyles(r) => {
            respond(request_id, marshaler.run(move |s| styles::styles(s, r)).await)
        }
        Request::HighlightElement(r) => {
            respond(request_id, marshaler.run(move |s| layout::highlight(s, r)).await)
        }
        Request::GetLayoutInfo(r) => {
            respond(request_id, marshaler.run(move |s| layout::layout_info(s, r)).await)
        }
        Request::WatchProperty(r) => {
            respond(request_id, marshaler.run(move |s| watch::watch_property(s, r)).await)
        }
        Request::ExportTree(r) => {
            respond(request_id, marshaler.run(move |s| export::export_tree(s, r)).await)
        }
    }
}

/// Wrap a handler outcome in the response envelope and encode it.
fn respond<T: Serialize>(request_id: String, result: Result<T, InspectError>) -> Vec<u8> {
    let frame = match result {
        Ok(body) => codec::encode(&Response::ok(request_id.clone(), body)),
        Err(err) => codec::encode(&Response::<T>::failure(request_id.clone(), err.to_string())),
    };
    frame.unwrap_or_else(|e| {
        // Reply serialization failing is an endpoint bug; still answer.
        codec::encode(&Response::<serde_json::Value>::failure(
            request_id,
            format!("HandlerError: failed to encode reply: {e}"),
        ))
        .unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use spyglass_wire::{BasicRequest, TreeRequest, TreeResult};

    use crate::marshal::{job_channel, UiExecutor};
    use crate::notify::Notifier;
    use crate::state::InspectorState;
    use crate::testkit::MockToolkit;

    /// Run one dispatch against the sample fixture on a throwaway UI
    /// thread.
    async fn roundtrip(request: Request) -> serde_json::Value {
        let (tx, rx) = job_channel::<MockToolkit>(8);
        let marshaler = Marshaler::new(tx, Duration::from_secs(2));
        let ui = std::thread::spawn(move || {
            let mut state =
                InspectorState::new(MockToolkit::sample_window(), Notifier::new(16), 100);
            let mut executor = UiExecutor::new(rx);
            executor.run(&mut state);
        });

        let frame = dispatch(request, &marshaler).await;
        drop(marshaler);
        ui.join().unwrap();
        serde_json::from_slice(&frame).unwrap()
    }

    #[tokio::test]
    async fn reply_echoes_request_id() {
        let reply = roundtrip(Request::GetBindingErrors(BasicRequest {
            request_id: "feed".into(),
        }))
        .await;
        assert_eq!(reply["requestId"], "feed");
        assert_eq!(reply["success"], true);
    }

    #[tokio::test]
    async fn handler_error_is_serialized_not_thrown() {
        let reply = roundtrip(Request::GetVisualTree(TreeRequest {
            request_id: "r".into(),
            root_handle: Some("elem_999".into()),
            max_depth: 3,
        }))
        .await;
        assert_eq!(reply["success"], false);
        let error = reply["error"].as_str().unwrap();
        assert!(error.starts_with("NotFound"), "unexpected error: {error}");
    }

    #[tokio::test]
    async fn visual_tree_reply_decodes_as_typed_body() {
        let reply = roundtrip(Request::GetVisualTree(TreeRequest {
            request_id: "t".into(),
            root_handle: None,
            max_depth: 5,
        }))
        .await;
        let typed: Response<TreeResult> = serde_json::from_value(reply).unwrap();
        let body = typed.body.unwrap();
        assert_eq!(body.root.type_name, "System.Windows.Window");
        assert!(body.total_elements >= 4);
    }
}
