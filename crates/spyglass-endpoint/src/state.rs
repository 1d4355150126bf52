//! Per-session endpoint state.
//!
//! [`InspectorState`] owns the toolkit adapter, the handle registry, the
//! binding-error buffer, and the watch table. It is constructed on the UI
//! thread and only ever touched there (every handler runs under the
//! marshaler), which is what lets the registry and buffers go lockless.

use std::cell::RefCell;
use std::rc::Rc;

use spyglass_types::{Handle, InspectError};
use spyglass_wire::notification::BindingErrorNotification;
use spyglass_wire::Notification;

use crate::adapter::{ToolkitAdapter, TraceToken};
use crate::notify::Notifier;
use crate::registry::HandleRegistry;
use crate::trace::{self, ErrorBuffer};
use crate::watch::WatchTable;

/// Everything one endpoint session knows about its target process.
pub struct InspectorState<A: ToolkitAdapter> {
    adapter: A,
    pub(crate) registry: HandleRegistry<A::Node>,
    pub(crate) errors: Rc<RefCell<ErrorBuffer>>,
    pub(crate) watches: Rc<RefCell<WatchTable>>,
    pub(crate) notifier: Notifier,
    trace_token: Option<TraceToken>,
}

impl<A: ToolkitAdapter> InspectorState<A> {
    /// Build session state and attach the binding-trace sink.
    ///
    /// Must be called on the UI thread: trace attachment touches the
    /// framework's diagnostic channel.
    pub fn new(mut adapter: A, notifier: Notifier, error_capacity: usize) -> Self {
        let errors = Rc::new(RefCell::new(ErrorBuffer::new(error_capacity)));

        let sink_errors = Rc::clone(&errors);
        let sink_notifier = notifier.clone();
        let trace_token = adapter.attach_binding_trace(Box::new(move |line| {
            let record = trace::parse_trace_line(line);
            sink_errors.borrow_mut().push(record.clone());
            sink_notifier.push(Notification::BindingError(BindingErrorNotification {
                error: record,
            }));
        }));

        Self {
            adapter,
            registry: HandleRegistry::new(),
            errors,
            watches: Rc::new(RefCell::new(WatchTable::new())),
            notifier,
            trace_token: Some(trace_token),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Handle for a node, assigning one on first observation.
    pub fn assign(&mut self, node: &A::Node) -> Handle {
        let key = self.adapter.node_key(node);
        self.registry.assign(key, node.clone())
    }

    /// Resolve a handle back to its live node.
    pub fn resolve(&self, handle: &Handle) -> Result<A::Node, InspectError> {
        self.registry
            .resolve(handle)
            .cloned()
            .ok_or_else(|| InspectError::NotFound(handle.to_string()))
    }

    /// The first root window, the default start for walks and searches.
    pub fn first_root(&self) -> Result<A::Node, InspectError> {
        self.adapter
            .root_nodes()
            .into_iter()
            .next()
            .ok_or_else(|| InspectError::Handler("target has no root windows".into()))
    }

    /// `ShortType[Name]` (or bare `ShortType`) description of a node, as
    /// used in search paths and resource/source labels.
    pub fn describe(&self, node: &A::Node) -> String {
        let short = self.adapter.short_type_name(node);
        match self.adapter.name(node) {
            Some(name) if !name.is_empty() => format!("{short}[{name}]"),
            _ => short,
        }
    }
}

impl<A: ToolkitAdapter> Drop for InspectorState<A> {
    fn drop(&mut self) {
        let tokens = self.watches.borrow().tokens();
        for token in tokens {
            self.adapter.unsubscribe_property_change(token);
        }
        if let Some(token) = self.trace_token.take() {
            self.adapter.detach_binding_trace(token);
        }
    }
}
