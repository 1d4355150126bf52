//! spyglass exposes a running graphical application's live UI-object graph
//! to external automation clients.
//!
//! The workspace splits into four crates, re-exported here under short
//! names:
//!
//! - [`types`]: wire records, handles, error taxonomy, rendezvous naming
//! - [`wire`]: newline-delimited JSON codec and request/response envelopes
//! - [`endpoint`]: the in-process inspector endpoint (toolkit adapter seam,
//!   handle registry, UI-thread marshaler, socket server)
//! - [`bridge`]: the controller-side bridge (discovery, attach, typed calls)

pub use spyglass_bridge as bridge;
pub use spyglass_endpoint as endpoint;
pub use spyglass_types as types;
pub use spyglass_wire as wire;
