//! Unsolicited notifications streamed from an endpoint to the connected
//! client.
//!
//! Notifications share the connection with replies but carry no
//! `requestId` and no `success` flag; clients tell them apart by the
//! `notificationType` tag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spyglass_types::BindingErrorRecord;

/// An out-of-band message, tagged by `notificationType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "notificationType")]
pub enum Notification {
    PropertyChanged(PropertyChangedNotification),
    BindingError(BindingErrorNotification),
}

/// A watched property changed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChangedNotification {
    pub watch_id: String,
    pub property_name: String,
    /// The value reported by the previous notification, or the watch's
    /// initial value for the first change.
    pub old_value: String,
    pub new_value: String,
    pub timestamp: DateTime<Utc>,
}

/// A binding failure captured from the framework's diagnostic trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingErrorNotification {
    #[serde(flatten)]
    pub error: BindingErrorRecord,
}
