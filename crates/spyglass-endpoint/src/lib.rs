//! The in-process inspector endpoint.
//!
//! One endpoint is hosted inside each target application process. It
//! serves inspection requests over a Unix domain socket named after the
//! process PID, walking the live UI-object graph through the
//! [`ToolkitAdapter`] seam. All graph access happens on the application's
//! UI thread: the socket server marshals each handler onto that thread via
//! [`Marshaler`] and waits with a bounded deadline, so a stalled UI
//! scheduler costs one timeout instead of a wedged transport.
//!
//! Host integration is two-sided. The transport side runs on its own
//! thread ([`spawn_inspector`]); the UI side is a job queue the host
//! drains from its dispatcher ([`UiExecutor::pump`]) or a dedicated loop
//! ([`UiExecutor::run`]).

pub mod adapter;
pub mod analyzer;
pub mod config;
pub mod handlers;
pub mod marshal;
pub mod notify;
pub mod registry;
pub mod server;
pub mod state;
pub mod trace;
pub mod watch;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use adapter::{
    BindingDescription, PropertyDescriptor, PropertyReading, PropertyValue, ResourceEntry,
    SetterDescription, StyleDescription, SubscriptionToken, ToolkitAdapter, TraceToken,
    TriggerDescription,
};
pub use config::EndpointConfig;
pub use marshal::{Marshaler, UiExecutor};
pub use notify::Notifier;
pub use registry::HandleRegistry;
pub use server::{serve, spawn_inspector, EndpointHandle};
pub use state::InspectorState;
