//! Property value normalization and binding-record derivation.
//!
//! Formatting policy: strings verbatim, booleans `true`/`false`, numbers
//! decimal, thicknesses `(l,t,r,b)`, colors `#AARRGGBB`, other complex
//! values by their canonical string form. Anything longer than 200
//! characters is cut with an ellipsis marker, and a stringification that
//! would yield only the type name is substituted with `[<TypeName>]`.

use spyglass_types::{BindingRecord, BindingStatus};

use crate::adapter::{BindingDescription, PropertyValue};

/// Truncation limit for normalized values.
pub const MAX_VALUE_LEN: usize = 200;

/// Normalize a raw property value into its wire string form.
pub fn format_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Null => "null".to_string(),
        PropertyValue::Bool(b) => b.to_string(),
        PropertyValue::Int(i) => i.to_string(),
        PropertyValue::Float(f) => f.to_string(),
        PropertyValue::Text(s) => truncate(s),
        PropertyValue::Thickness {
            left,
            top,
            right,
            bottom,
        } => format!("({left},{top},{right},{bottom})"),
        PropertyValue::Color { a, r, g, b } => format!("#{a:02X}{r:02X}{g:02X}{b:02X}"),
        PropertyValue::Size { width, height } => format!("{width},{height}"),
        PropertyValue::Complex { type_name, display } => match display {
            Some(text) if text != type_name => truncate(text),
            _ => format!("[{type_name}]"),
        },
    }
}

/// Cut a string at [`MAX_VALUE_LEN`] characters with an ellipsis marker.
pub fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_VALUE_LEN {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_VALUE_LEN).collect();
    cut.push_str("...");
    cut
}

/// Build the wire binding record for one bound property.
///
/// The source string is derived in priority order: explicit source object,
/// then `ElementName(<name>)`, then `RelativeSource(<mode>)`, defaulting
/// to `DataContext`. A binding that reports an error surfaces
/// `status = Error` regardless of the raw status.
pub fn binding_record(
    property: &str,
    binding: &BindingDescription,
    current_value: Option<String>,
) -> BindingRecord {
    let source = if let Some(explicit) = &binding.explicit_source {
        explicit.clone()
    } else if let Some(element) = &binding.element_name {
        format!("ElementName({element})")
    } else if let Some(mode) = &binding.relative_source {
        format!("RelativeSource({mode})")
    } else {
        "DataContext".to_string()
    };

    let status = if binding.has_error {
        BindingStatus::Error
    } else {
        binding.status
    };

    BindingRecord {
        property: property.to_string(),
        path: binding.path.clone(),
        source,
        mode: binding.mode,
        update_trigger: binding.update_trigger.clone(),
        converter: binding.converter.clone(),
        status,
        has_error: binding.has_error,
        error_message: binding.error_message.clone(),
        current_value,
    }
}
