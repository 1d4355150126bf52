//! Endpoint-side error taxonomy.
//!
//! Every handler failure is serialized into the response envelope as
//! `success=false` with `error` set to this type's display form; the
//! leading `Kind:` prefix is stable and machine-matchable.

use std::time::Duration;

/// Errors produced inside an inspector endpoint.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// Unparseable frame or unknown request envelope.
    #[error("InvalidRequest: {0}")]
    InvalidRequest(String),

    /// A required request field was absent.
    #[error("MissingField: required field '{0}' is absent")]
    MissingField(&'static str),

    /// The handle is unknown in this session.
    #[error("NotFound: unknown element handle '{0}'")]
    NotFound(String),

    /// The handle resolves but the node has no layout.
    #[error("NotRenderable: element {0} has no layout information")]
    NotRenderable(String),

    /// The named property is not defined on the node.
    #[error("PropertyNotFound: property '{property}' is not defined on {element}")]
    PropertyNotFound { property: String, element: String },

    /// The UI scheduler did not run the work within the deadline.
    #[error("Timeout: UI thread work timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// Internal handler failure.
    #[error("HandlerError: {0}")]
    Handler(String),
}

impl InspectError {
    /// The stable kind prefix (the part before the first `:`).
    pub fn kind(&self) -> &'static str {
        match self {
            InspectError::InvalidRequest(_) => "InvalidRequest",
            InspectError::MissingField(_) => "MissingField",
            InspectError::NotFound(_) => "NotFound",
            InspectError::NotRenderable(_) => "NotRenderable",
            InspectError::PropertyNotFound { .. } => "PropertyNotFound",
            InspectError::Timeout(_) => "Timeout",
            InspectError::Handler(_) => "HandlerError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_kind_prefix() {
        let err = InspectError::NotFound("elem_99".into());
        assert_eq!(err.to_string(), "NotFound: unknown element handle 'elem_99'");
        assert!(err.to_string().starts_with(err.kind()));
    }

    #[test]
    fn timeout_message_mentions_timed_out() {
        let err = InspectError::Timeout(Duration::from_secs(10));
        assert!(err.to_string().to_lowercase().contains("timed out"));
        assert!(err.to_string().contains("10000 ms"));
    }

    #[test]
    fn property_not_found_names_both_sides() {
        let err = InspectError::PropertyNotFound {
            property: "Text".into(),
            element: "Button[Submit]".into(),
        };
        assert!(err.to_string().contains("'Text'"));
        assert!(err.to_string().contains("Button[Submit]"));
    }
}
