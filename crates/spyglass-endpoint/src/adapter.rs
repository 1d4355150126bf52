//! The toolkit adapter seam.
//!
//! The endpoint never touches a UI framework's API directly; everything it
//! needs from the live object graph goes through [`ToolkitAdapter`].
//! Different targets plug in different implementations, and tests plug in
//! a mock. Adapter nodes are live, toolkit-owned references: they are
//! `Clone` but deliberately not required to be `Send`: every call happens
//! on the application's UI thread, under the marshaler.

use std::time::Duration;

use spyglass_types::{BindingMode, BindingStatus, LayoutRecord, ResourceScope, ValueSource};

/// A property's name and declared type, from enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub type_name: String,
}

/// A raw property value as surfaced by the toolkit.
///
/// The analyzer owns the normalization into wire strings; adapters report
/// the most structured shape they can so composite types (thicknesses,
/// colors) format uniformly across toolkits.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Thickness {
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
    },
    Color {
        a: u8,
        r: u8,
        g: u8,
        b: u8,
    },
    Size {
        width: f64,
        height: f64,
    },
    /// Anything else; `display` is the toolkit's canonical string form
    /// when it has one beyond the bare type name.
    Complex {
        type_name: String,
        display: Option<String>,
    },
}

/// The result of reading one property.
#[derive(Debug, Clone)]
pub struct PropertyReading {
    pub value: PropertyValue,
    pub source: ValueSource,
    pub is_binding: bool,
}

/// Raw binding facts for one bound property.
///
/// The source facets are reported separately; the analyzer derives the
/// single wire `source` string from them in priority order.
#[derive(Debug, Clone)]
pub struct BindingDescription {
    pub path: String,
    pub mode: BindingMode,
    /// Type name of an explicitly-assigned source object.
    pub explicit_source: Option<String>,
    /// `ElementName` reference target.
    pub element_name: Option<String>,
    /// `RelativeSource` mode name.
    pub relative_source: Option<String>,
    pub update_trigger: Option<String>,
    pub converter: Option<String>,
    pub status: BindingStatus,
    pub has_error: bool,
    pub error_message: Option<String>,
}

/// One resource dictionary entry, before wire formatting.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub key: String,
    pub type_name: String,
    pub value: PropertyValue,
    pub target_type: Option<String>,
}

/// A setter inside a style or trigger.
#[derive(Debug, Clone)]
pub struct SetterDescription {
    pub property: String,
    pub value: PropertyValue,
}

/// A style trigger; `kind` names the trigger class.
#[derive(Debug, Clone)]
pub struct TriggerDescription {
    pub kind: String,
    pub property: Option<String>,
    pub value: Option<PropertyValue>,
    pub setters: Vec<SetterDescription>,
}

/// A style as surfaced by the toolkit.
#[derive(Debug, Clone)]
pub struct StyleDescription {
    pub key: Option<String>,
    pub target_type: String,
    pub based_on: Option<String>,
    pub setters: Vec<SetterDescription>,
    pub triggers: Vec<TriggerDescription>,
}

/// Token for one property-change subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(pub u64);

/// Token for one binding-trace sink registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceToken(pub u64);

/// Callback invoked with the new value whenever a watched property
/// changes.
pub type ChangeCallback = Box<dyn FnMut(PropertyValue)>;

/// Sink receiving raw lines from the framework's binding diagnostic
/// trace.
pub type TraceSink = Box<dyn FnMut(&str)>;

/// Everything the endpoint needs from a UI framework.
///
/// All methods are called on the UI thread. `Node` identity is by live
/// reference: [`node_key`](Self::node_key) must return the same key for
/// the same underlying object for the lifetime of the session, and
/// distinct keys for distinct objects.
pub trait ToolkitAdapter {
    type Node: Clone;

    /// Primary windows / top-level surfaces, in z-order.
    fn root_nodes(&self) -> Vec<Self::Node>;

    /// Stable per-session identity key for a node.
    fn node_key(&self, node: &Self::Node) -> u64;

    fn children_visual(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn children_logical(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Visual parent, `None` at a root.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Fully-qualified runtime type name.
    fn type_name(&self, node: &Self::Node) -> String;

    /// Unqualified type name.
    fn short_type_name(&self, node: &Self::Node) -> String;

    /// The node's framework name, when assigned.
    fn name(&self, node: &Self::Node) -> Option<String>;

    /// Enumerate the node's properties.
    fn properties(&self, node: &Self::Node) -> Vec<PropertyDescriptor>;

    /// Read one property with value-source attribution. `None` when the
    /// property is not defined on this node.
    fn read_property(&self, node: &Self::Node, name: &str) -> Option<PropertyReading>;

    /// The binding attached to a property, if any.
    fn binding(&self, node: &Self::Node, property: &str) -> Option<BindingDescription>;

    /// Layout measurements; `None` for non-renderable nodes.
    fn layout(&self, node: &Self::Node) -> Option<LayoutRecord>;

    /// Resources owned at the given scope. `node` anchors window and
    /// element scopes.
    fn resources(&self, scope: ResourceScope, node: Option<&Self::Node>) -> Vec<ResourceEntry>;

    /// The node's active style, if any.
    fn style(&self, node: &Self::Node) -> Option<StyleDescription>;

    /// Subscribe to changes of one property. The callback fires on the UI
    /// thread with the new value.
    fn subscribe_property_change(
        &mut self,
        node: &Self::Node,
        property: &str,
        callback: ChangeCallback,
    ) -> SubscriptionToken;

    fn unsubscribe_property_change(&mut self, token: SubscriptionToken);

    /// Paint a topmost, hit-test-invisible translucent rectangle over the
    /// node's screen bounds for the duration, then remove it.
    fn highlight(&self, node: &Self::Node, duration: Duration);

    /// Attach a sink to the framework's binding diagnostic trace.
    fn attach_binding_trace(&mut self, sink: TraceSink) -> TraceToken;

    fn detach_binding_trace(&mut self, token: TraceToken);
}
