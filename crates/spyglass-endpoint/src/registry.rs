//! Handle registry: stable opaque IDs for live UI nodes.
//!
//! UI nodes are pointer identities inside the host process and cannot
//! travel on the wire; the registry bridges them to session-scoped
//! [`Handle`] tokens. Handles are assigned on first observation and stay
//! valid until the endpoint terminates; the registry keeps the node
//! reference alive for the session, so repeated walks hand back the same
//! token for the same object.

use std::collections::HashMap;

use spyglass_types::Handle;

/// Maps live nodes to handles and back, keyed by the adapter's identity
/// key.
#[derive(Debug)]
pub struct HandleRegistry<N> {
    by_key: HashMap<u64, Handle>,
    nodes: HashMap<Handle, N>,
    next_id: u64,
}

impl<N: Clone> HandleRegistry<N> {
    pub fn new() -> Self {
        Self {
            by_key: HashMap::new(),
            nodes: HashMap::new(),
            next_id: 0,
        }
    }

    /// Handle for a node, allocating on first observation.
    ///
    /// Repeated calls with the same identity key return the same handle;
    /// two keys never share one.
    pub fn assign(&mut self, key: u64, node: N) -> Handle {
        if let Some(handle) = self.by_key.get(&key) {
            return handle.clone();
        }
        self.next_id += 1;
        let handle = Handle::element(self.next_id);
        self.by_key.insert(key, handle.clone());
        self.nodes.insert(handle.clone(), node);
        handle
    }

    /// The node behind a handle, or `None` when the token was never
    /// assigned in this session.
    pub fn resolve(&self, handle: &Handle) -> Option<&N> {
        self.nodes.get(handle)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: Clone> Default for HandleRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}
