//! Core types shared across all spyglass crates.
//!
//! Defines the wire-visible records (tree nodes, properties, bindings,
//! layout, resources, styles), the opaque element handle, the endpoint
//! error taxonomy, and rendezvous-name resolution.

pub mod error;
pub mod handle;
pub mod records;
pub mod rendezvous;

pub use error::InspectError;
pub use handle::Handle;
pub use records::{
    BindingErrorKind, BindingErrorRecord, BindingMode, BindingRecord, BindingStatus, ElementMatch,
    LayoutRecord, PropertyRecord, ResourceRecord, ResourceScope, SetterRecord, Size, StyleRecord,
    Thickness, TriggerRecord, ValueSource, VisualTreeNode,
};
pub use rendezvous::{socket_name, socket_path, runtime_dir, DEFAULT_PREFIX};
