//! Wire-visible record types for the inspection protocol.
//!
//! Every struct here crosses the process boundary as JSON with camelCase
//! field names; optional fields are omitted when absent. Enum variants
//! serialize under their PascalCase names, matching the protocol's closed
//! value sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::handle::Handle;

/// One node of a visual- or logical-tree reply.
///
/// `depth` is the distance from the start of the walk, not from the
/// application root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualTreeNode {
    pub handle: Handle,
    /// Fully-qualified runtime type of the node.
    pub type_name: String,
    /// The node's framework name, when one was assigned.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub depth: u32,
    #[serde(default)]
    pub children: Vec<VisualTreeNode>,
}

/// Why a property currently holds the value it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSource {
    Default,
    Inherited,
    DefaultStyle,
    DefaultStyleTrigger,
    Style,
    TemplateTrigger,
    StyleTrigger,
    ImplicitStyle,
    ParentTemplate,
    ParentTemplateTrigger,
    Local,
}

/// One property of an element, with value-source attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub name: String,
    /// Declared type of the property.
    pub type_name: String,
    /// Normalized string form, truncated to 200 characters.
    pub value: String,
    pub source: ValueSource,
    pub is_binding: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub binding_details: Option<BindingRecord>,
}

/// Direction of a data binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingMode {
    OneWay,
    TwoWay,
    OneWayToSource,
    OneTime,
}

/// Status of a binding expression as reported by the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingStatus {
    Active,
    Inactive,
    Detached,
    PathError,
    UpdateTargetError,
    UpdateSourceError,
    AsyncPending,
    Unattached,
    Error,
}

/// A data binding attached to one property of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingRecord {
    /// The bound target property.
    pub property: String,
    /// Source path expression.
    pub path: String,
    /// Where the binding resolves its source: `DataContext`,
    /// `ElementName(<name>)`, `RelativeSource(<mode>)`, or an explicit
    /// source type name.
    pub source: String,
    pub mode: BindingMode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub update_trigger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub converter: Option<String>,
    pub status: BindingStatus,
    pub has_error: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
    /// Value of the target property at read time.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current_value: Option<String>,
}

/// Classification of a captured binding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingErrorKind {
    SourceNotFound,
    PathError,
    ConversionError,
    ValidationError,
    UpdateSourceError,
    Unknown,
}

/// One entry of the endpoint's binding-error buffer.
///
/// Fields other than `message` are best-effort extractions from the
/// framework's diagnostic trace and may be empty when the trace line did
/// not carry the corresponding marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingErrorRecord {
    pub element_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub element_name: Option<String>,
    pub property: String,
    pub binding_path: String,
    pub error_type: BindingErrorKind,
    /// The raw trace line.
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Left/top/right/bottom edge measures (margins, paddings).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Layout measurements of a renderable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub actual_width: f64,
    pub actual_height: f64,
    pub desired_size: Size,
    pub render_size: Size,
    pub margin: Thickness,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub padding: Option<Thickness>,
    pub horizontal_alignment: String,
    pub vertical_alignment: String,
    pub visibility: String,
}

/// Lookup scope for resource enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceScope {
    #[default]
    Application,
    Window,
    Element,
}

/// One resource dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub key: String,
    pub type_name: String,
    pub value: String,
    /// The dictionary owner this entry was found in.
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_type: Option<String>,
}

/// A property assignment inside a style or trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetterRecord {
    pub property: String,
    pub value: String,
}

/// A style trigger; `kind` names the trigger class, the remaining fields
/// are present where the trigger class defines them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRecord {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub setters: Vec<SetterRecord>,
}

/// The style applied to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key: Option<String>,
    pub target_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub based_on: Option<String>,
    #[serde(default)]
    pub setters: Vec<SetterRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub triggers: Vec<TriggerRecord>,
}

/// One search hit from an element query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMatch {
    pub handle: Handle,
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// `" > "`-joined chain of `Type[Name]` (or bare `Type`) segments from
    /// the search root to this element, following visual parents.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_node_wire_shape() {
        let node = VisualTreeNode {
            handle: Handle::element(1),
            type_name: "System.Windows.Window".into(),
            name: None,
            depth: 0,
            children: vec![VisualTreeNode {
                handle: Handle::element(2),
                type_name: "System.Windows.Controls.Button".into(),
                name: Some("SubmitButton".into()),
                depth: 1,
                children: vec![],
            }],
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["handle"], "elem_1");
        assert_eq!(json["typeName"], "System.Windows.Window");
        // Absent name is dropped, present name survives.
        assert!(json.get("name").is_none());
        assert_eq!(json["children"][0]["name"], "SubmitButton");
        assert_eq!(json["children"][0]["depth"], 1);
    }

    #[test]
    fn value_source_uses_pascal_case_names() {
        assert_eq!(
            serde_json::to_string(&ValueSource::DefaultStyleTrigger).unwrap(),
            "\"DefaultStyleTrigger\""
        );
        assert_eq!(
            serde_json::to_string(&ValueSource::Local).unwrap(),
            "\"Local\""
        );
    }

    #[test]
    fn binding_record_roundtrip() {
        let record = BindingRecord {
            property: "Text".into(),
            path: "User.Name".into(),
            source: "DataContext".into(),
            mode: BindingMode::TwoWay,
            update_trigger: Some("PropertyChanged".into()),
            converter: None,
            status: BindingStatus::Active,
            has_error: false,
            error_message: None,
            current_value: Some("alice".into()),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("converter"));
        assert!(json.contains("\"updateTrigger\":\"PropertyChanged\""));
        let back: BindingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn layout_record_roundtrip() {
        let layout = LayoutRecord {
            actual_width: 120.0,
            actual_height: 32.5,
            desired_size: Size { width: 120.0, height: 32.5 },
            render_size: Size { width: 120.0, height: 32.5 },
            margin: Thickness { left: 4.0, top: 2.0, right: 4.0, bottom: 2.0 },
            padding: None,
            horizontal_alignment: "Stretch".into(),
            vertical_alignment: "Center".into(),
            visibility: "Visible".into(),
        };
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains("\"actualWidth\":120.0"));
        assert!(!json.contains("padding"));
        let back: LayoutRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }

    #[test]
    fn resource_scope_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&ResourceScope::Application).unwrap(),
            "\"application\""
        );
        let back: ResourceScope = serde_json::from_str("\"element\"").unwrap();
        assert_eq!(back, ResourceScope::Element);
    }

    #[test]
    fn binding_error_record_roundtrip() {
        let record = BindingErrorRecord {
            element_type: "TextBlock".into(),
            element_name: Some("title".into()),
            property: "Text".into(),
            binding_path: "Missing".into(),
            error_type: BindingErrorKind::PathError,
            message: "BindingExpression path error".into(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: BindingErrorRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
