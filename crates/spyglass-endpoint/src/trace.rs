//! Binding-trace capture: parse the framework's diagnostic lines into
//! structured error records and buffer them for pull.
//!
//! The trace channel is the only realistic way to enumerate past binding
//! failures, so the endpoint attaches a sink at session start and keeps a
//! bounded FIFO; clients pull snapshots via `GetBindingErrors`. Extraction
//! is best-effort against the framework's stable markers; a line that
//! carries none of them still lands in the buffer as `Unknown` with the
//! raw message intact.

use std::collections::VecDeque;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use spyglass_types::{BindingErrorKind, BindingErrorRecord};

static RE_TARGET_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"target element is '([^']+)'").expect("static regex"));
static RE_ELEMENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(Name='([^']*)'\)").expect("static regex"));
static RE_TARGET_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"target property is '([^']+)'").expect("static regex"));
static RE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Path=([^;)\s]+)").expect("static regex"));

/// Classify a trace line by substring probes, first match wins.
pub fn classify(line: &str) -> BindingErrorKind {
    let lower = line.to_lowercase();
    if lower.contains("cannot find source") {
        BindingErrorKind::SourceNotFound
    } else if lower.contains("path error") {
        BindingErrorKind::PathError
    } else if lower.contains("cannot convert") {
        BindingErrorKind::ConversionError
    } else if lower.contains("validationerror") || lower.contains("validation error") {
        BindingErrorKind::ValidationError
    } else if lower.contains("updatesourceexceptionfilter") {
        BindingErrorKind::UpdateSourceError
    } else {
        BindingErrorKind::Unknown
    }
}

/// Parse one diagnostic line into an error record.
pub fn parse_trace_line(line: &str) -> BindingErrorRecord {
    let capture = |re: &Regex| {
        re.captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };

    let element_name = capture(&RE_ELEMENT_NAME).filter(|n| !n.is_empty());

    BindingErrorRecord {
        element_type: capture(&RE_TARGET_ELEMENT).unwrap_or_default(),
        element_name,
        property: capture(&RE_TARGET_PROPERTY).unwrap_or_default(),
        binding_path: capture(&RE_PATH).unwrap_or_default(),
        error_type: classify(line),
        message: line.to_string(),
        timestamp: Utc::now(),
    }
}

/// Bounded FIFO of captured binding errors; oldest dropped on overflow.
#[derive(Debug)]
pub struct ErrorBuffer {
    entries: VecDeque<BindingErrorRecord>,
    capacity: usize,
}

impl ErrorBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, record: BindingErrorRecord) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    /// Oldest-first copy of the buffer.
    pub fn snapshot(&self) -> Vec<BindingErrorRecord> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH_ERROR_LINE: &str = "System.Windows.Data Error: 40 : BindingExpression path error: \
        'MissingProp' property not found on 'object' ''UserModel' (HashCode=1234)'. \
        BindingExpression:Path=MissingProp; DataItem='UserModel' (HashCode=1234); \
        target element is 'TextBlock' (Name='title'); target property is 'Text' (type 'String')";

    const SOURCE_ERROR_LINE: &str = "System.Windows.Data Error: 4 : Cannot find source for binding \
        with reference 'ElementName=sidePanel'. \
        BindingExpression:Path=Width; DataItem=null; \
        target element is 'Border' (Name=''); target property is 'Width' (type 'Double')";

    #[test]
    fn parses_framework_markers() {
        let record = parse_trace_line(PATH_ERROR_LINE);
        assert_eq!(record.element_type, "TextBlock");
        assert_eq!(record.element_name.as_deref(), Some("title"));
        assert_eq!(record.property, "Text");
        assert_eq!(record.binding_path, "MissingProp");
        assert_eq!(record.error_type, BindingErrorKind::PathError);
        assert_eq!(record.message, PATH_ERROR_LINE);
    }

    #[test]
    fn empty_name_marker_is_absent() {
        let record = parse_trace_line(SOURCE_ERROR_LINE);
        assert_eq!(record.element_type, "Border");
        assert_eq!(record.element_name, None);
        assert_eq!(record.error_type, BindingErrorKind::SourceNotFound);
    }

    #[test]
    fn unmarked_line_classifies_unknown() {
        let record = parse_trace_line("something unexpected happened");
        assert_eq!(record.error_type, BindingErrorKind::Unknown);
        assert_eq!(record.element_type, "");
        assert_eq!(record.binding_path, "");
        assert_eq!(record.message, "something unexpected happened");
    }

    #[test]
    fn classification_probes() {
        assert_eq!(classify("x Cannot convert 'abc' to Double"), BindingErrorKind::ConversionError);
        assert_eq!(classify("ValidationError raised on field"), BindingErrorKind::ValidationError);
        assert_eq!(
            classify("UpdateSourceExceptionFilter threw"),
            BindingErrorKind::UpdateSourceError
        );
        assert_eq!(classify("no markers at all"), BindingErrorKind::Unknown);
    }

    #[test]
    fn buffer_drops_oldest_on_overflow() {
        let mut buffer = ErrorBuffer::new(3);
        for i in 0..5 {
            buffer.push(parse_trace_line(&format!("error number {i}")));
        }
        assert_eq!(buffer.len(), 3);
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot[0].message, "error number 2");
        assert_eq!(snapshot[2].message, "error number 4");
    }
}
