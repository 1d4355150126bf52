//! Wire protocol for the spyglass inspection channel.
//!
//! - [`codec`]: newline-delimited UTF-8 framing with BOM tolerance
//! - [`request`]: the closed, tagged request sum
//! - [`response`]: the shared response envelope with kind-specific bodies
//! - [`notification`]: unsolicited endpoint-to-client messages

pub mod codec;
pub mod notification;
pub mod request;
pub mod response;

pub use codec::{decode, encode, FrameBuffer, WireError};
pub use notification::{BindingErrorNotification, Notification, PropertyChangedNotification};
pub use request::{
    BasicRequest, ElementRequest, ExportFormat, ExportRequest, FindRequest, HighlightRequest,
    Request, ResourcesRequest, TreeRequest, WatchRequest,
};
pub use response::{
    BindingErrorsResult, BindingsResult, ExportResult, FindResult, HighlightResult, LayoutResult,
    PropertiesResult, Response, ResourcesResult, StylesResult, TreeResult, WatchResult,
};
