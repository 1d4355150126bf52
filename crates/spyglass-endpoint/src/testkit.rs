//! Mock toolkit adapter for tests.
//!
//! Builds an in-memory element tree with the same shape a real adapter
//! would surface: parent/child links, typed properties with value
//! sources, bindings, layout, resources, and styles. Property changes
//! fire subscriptions synchronously, and trace lines can be injected to
//! exercise the binding-error path.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use spyglass_types::{
    BindingMode, BindingStatus, LayoutRecord, ResourceScope, Size, Thickness, ValueSource,
};

use crate::adapter::{
    BindingDescription, ChangeCallback, PropertyDescriptor, PropertyReading, PropertyValue,
    ResourceEntry, SetterDescription, StyleDescription, SubscriptionToken, ToolkitAdapter,
    TraceSink, TraceToken, TriggerDescription,
};

/// One mock property slot.
#[derive(Clone)]
pub struct MockProperty {
    pub type_name: String,
    pub value: PropertyValue,
    pub source: ValueSource,
    pub binding: Option<BindingDescription>,
}

/// Backing data of one mock element.
pub struct MockElement {
    pub type_name: String,
    pub name: Option<String>,
    pub children: Vec<MockNode>,
    pub logical_children: Vec<MockNode>,
    pub parent: Option<Weak<RefCell<MockElement>>>,
    pub properties: BTreeMap<String, MockProperty>,
    pub layout: Option<LayoutRecord>,
    pub resources: Vec<ResourceEntry>,
    pub style: Option<StyleDescription>,
}

/// A live node reference in the mock tree.
#[derive(Clone)]
pub struct MockNode(Rc<RefCell<MockElement>>);

impl MockNode {
    pub fn new(type_name: &str) -> Self {
        Self(Rc::new(RefCell::new(MockElement {
            type_name: type_name.to_string(),
            name: None,
            children: Vec::new(),
            logical_children: Vec::new(),
            parent: None,
            properties: BTreeMap::new(),
            layout: None,
            resources: Vec::new(),
            style: None,
        })))
    }

    pub fn named(self, name: &str) -> Self {
        self.0.borrow_mut().name = Some(name.to_string());
        self
    }

    pub fn with_property(
        self,
        name: &str,
        type_name: &str,
        value: PropertyValue,
        source: ValueSource,
    ) -> Self {
        self.0.borrow_mut().properties.insert(
            name.to_string(),
            MockProperty {
                type_name: type_name.to_string(),
                value,
                source,
                binding: None,
            },
        );
        self
    }

    pub fn with_bound_property(
        self,
        name: &str,
        type_name: &str,
        value: PropertyValue,
        binding: BindingDescription,
    ) -> Self {
        self.0.borrow_mut().properties.insert(
            name.to_string(),
            MockProperty {
                type_name: type_name.to_string(),
                value,
                source: ValueSource::Local,
                binding: Some(binding),
            },
        );
        self
    }

    pub fn with_layout(self, layout: LayoutRecord) -> Self {
        self.0.borrow_mut().layout = Some(layout);
        self
    }

    pub fn with_resource(self, entry: ResourceEntry) -> Self {
        self.0.borrow_mut().resources.push(entry);
        self
    }

    pub fn with_style(self, style: StyleDescription) -> Self {
        self.0.borrow_mut().style = Some(style);
        self
    }

    /// Attach a child to both the visual and logical trees.
    pub fn with_child(self, child: MockNode) -> Self {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
        self.0.borrow_mut().logical_children.push(child);
        self
    }

    /// Attach a logical-only child (diverging the two trees).
    pub fn with_logical_child(self, child: MockNode) -> Self {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().logical_children.push(child);
        self
    }

    pub fn key(&self) -> u64 {
        Rc::as_ptr(&self.0) as u64
    }

    fn ptr_eq(&self, other: &MockNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

struct Subscription {
    token: SubscriptionToken,
    node: MockNode,
    property: String,
    callback: ChangeCallback,
}

/// Mock [`ToolkitAdapter`] over a [`MockNode`] tree.
pub struct MockToolkit {
    roots: Vec<MockNode>,
    pub app_resources: Vec<ResourceEntry>,
    subscriptions: Vec<Subscription>,
    next_token: u64,
    trace_sinks: Vec<(TraceToken, TraceSink)>,
    next_trace_token: u64,
    /// Highlight calls as `(type name, duration)`, for assertions.
    pub highlights: RefCell<Vec<(String, Duration)>>,
}

impl MockToolkit {
    pub fn new(roots: Vec<MockNode>) -> Self {
        Self {
            roots,
            app_resources: Vec::new(),
            subscriptions: Vec::new(),
            next_token: 0,
            trace_sinks: Vec::new(),
            next_trace_token: 0,
            highlights: RefCell::new(Vec::new()),
        }
    }

    /// Update a property value and fire matching change subscriptions.
    pub fn set_property(&mut self, node: &MockNode, property: &str, value: PropertyValue) {
        if let Some(slot) = node.0.borrow_mut().properties.get_mut(property) {
            slot.value = value.clone();
        }
        for sub in &mut self.subscriptions {
            if sub.property == property && sub.node.ptr_eq(node) {
                (sub.callback)(value.clone());
            }
        }
    }

    /// Inject one binding diagnostic line into all attached sinks.
    pub fn emit_trace(&mut self, line: &str) {
        for (_, sink) in &mut self.trace_sinks {
            sink(line);
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// The standard fixture: a window with a grid holding a button, a
    /// data-bound text block, and a non-renderable run.
    pub fn sample_window() -> MockToolkit {
        let run = MockNode::new("System.Windows.Documents.Run");

        let button = MockNode::new("System.Windows.Controls.Button")
            .named("SubmitButton")
            .with_property(
                "Content",
                "System.Object",
                PropertyValue::Text("Submit".into()),
                ValueSource::Local,
            )
            .with_property(
                "IsEnabled",
                "System.Boolean",
                PropertyValue::Bool(true),
                ValueSource::Default,
            )
            .with_property(
                "Margin",
                "System.Windows.Thickness",
                PropertyValue::Thickness {
                    left: 4.0,
                    top: 2.0,
                    right: 4.0,
                    bottom: 2.0,
                },
                ValueSource::Style,
            )
            .with_layout(simple_layout(120.0, 32.0))
            .with_style(StyleDescription {
                key: None,
                target_type: "Button".into(),
                based_on: None,
                setters: vec![SetterDescription {
                    property: "Margin".into(),
                    value: PropertyValue::Thickness {
                        left: 4.0,
                        top: 2.0,
                        right: 4.0,
                        bottom: 2.0,
                    },
                }],
                triggers: vec![TriggerDescription {
                    kind: "Trigger".into(),
                    property: Some("IsMouseOver".into()),
                    value: Some(PropertyValue::Bool(true)),
                    setters: vec![SetterDescription {
                        property: "Background".into(),
                        value: PropertyValue::Color {
                            a: 255,
                            r: 30,
                            g: 144,
                            b: 255,
                        },
                    }],
                }],
            });

        let text_block = MockNode::new("System.Windows.Controls.TextBlock")
            .named("StatusText")
            .with_bound_property(
                "Text",
                "System.String",
                PropertyValue::Text("Ready".into()),
                data_binding("Status"),
            )
            .with_layout(simple_layout(200.0, 16.0))
            .with_child(run);

        let grid = MockNode::new("System.Windows.Controls.Grid")
            .with_layout(simple_layout(800.0, 600.0))
            .with_child(button)
            .with_child(text_block);

        let window = MockNode::new("System.Windows.Window")
            .named("MainWindow")
            .with_layout(simple_layout(800.0, 600.0))
            .with_resource(ResourceEntry {
                key: "AccentBrush".into(),
                type_name: "System.Windows.Media.SolidColorBrush".into(),
                value: PropertyValue::Color {
                    a: 255,
                    r: 30,
                    g: 144,
                    b: 255,
                },
                target_type: None,
            })
            .with_child(grid);

        let mut toolkit = MockToolkit::new(vec![window]);
        toolkit.app_resources = vec![ResourceEntry {
            key: "Button".into(),
            type_name: "System.Windows.Style".into(),
            value: PropertyValue::Complex {
                type_name: "System.Windows.Style".into(),
                display: None,
            },
            target_type: Some("Button".into()),
        }];
        toolkit
    }
}

/// A minimal layout record for fixtures.
pub fn simple_layout(width: f64, height: f64) -> LayoutRecord {
    LayoutRecord {
        actual_width: width,
        actual_height: height,
        desired_size: Size { width, height },
        render_size: Size { width, height },
        margin: Thickness {
            left: 0.0,
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
        },
        padding: None,
        horizontal_alignment: "Stretch".into(),
        vertical_alignment: "Stretch".into(),
        visibility: "Visible".into(),
    }
}

/// A plain one-way DataContext binding for fixtures.
pub fn data_binding(path: &str) -> BindingDescription {
    BindingDescription {
        path: path.to_string(),
        mode: BindingMode::OneWay,
        explicit_source: None,
        element_name: None,
        relative_source: None,
        update_trigger: None,
        converter: None,
        status: BindingStatus::Active,
        has_error: false,
        error_message: None,
    }
}

impl ToolkitAdapter for MockToolkit {
    type Node = MockNode;

    fn root_nodes(&self) -> Vec<MockNode> {
        self.roots.clone()
    }

    fn node_key(&self, node: &MockNode) -> u64 {
        node.key()
    }

    fn children_visual(&self, node: &MockNode) -> Vec<MockNode> {
        node.0.borrow().children.clone()
    }

    fn children_logical(&self, node: &MockNode) -> Vec<MockNode> {
        node.0.borrow().logical_children.clone()
    }

    fn parent(&self, node: &MockNode) -> Option<MockNode> {
        node.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(MockNode)
    }

    fn type_name(&self, node: &MockNode) -> String {
        node.0.borrow().type_name.clone()
    }

    fn short_type_name(&self, node: &MockNode) -> String {
        let full = node.0.borrow().type_name.clone();
        full.rsplit('.').next().unwrap_or(&full).to_string()
    }

    fn name(&self, node: &MockNode) -> Option<String> {
        node.0.borrow().name.clone()
    }

    fn properties(&self, node: &MockNode) -> Vec<PropertyDescriptor> {
        node.0
            .borrow()
            .properties
            .iter()
            .map(|(name, slot)| PropertyDescriptor {
                name: name.clone(),
                type_name: slot.type_name.clone(),
            })
            .collect()
    }

    fn read_property(&self, node: &MockNode, name: &str) -> Option<PropertyReading> {
        let element = node.0.borrow();
        let slot = element.properties.get(name)?;
        Some(PropertyReading {
            value: slot.value.clone(),
            source: slot.source,
            is_binding: slot.binding.is_some(),
        })
    }

    fn binding(&self, node: &MockNode, property: &str) -> Option<BindingDescription> {
        node.0.borrow().properties.get(property)?.binding.clone()
    }

    fn layout(&self, node: &MockNode) -> Option<LayoutRecord> {
        node.0.borrow().layout.clone()
    }

    fn resources(&self, scope: ResourceScope, node: Option<&MockNode>) -> Vec<ResourceEntry> {
        match scope {
            ResourceScope::Application => self.app_resources.clone(),
            ResourceScope::Window | ResourceScope::Element => node
                .map(|n| n.0.borrow().resources.clone())
                .unwrap_or_default(),
        }
    }

    fn style(&self, node: &MockNode) -> Option<StyleDescription> {
        node.0.borrow().style.clone()
    }

    fn subscribe_property_change(
        &mut self,
        node: &MockNode,
        property: &str,
        callback: ChangeCallback,
    ) -> SubscriptionToken {
        self.next_token += 1;
        let token = SubscriptionToken(self.next_token);
        self.subscriptions.push(Subscription {
            token,
            node: node.clone(),
            property: property.to_string(),
            callback,
        });
        token
    }

    fn unsubscribe_property_change(&mut self, token: SubscriptionToken) {
        self.subscriptions.retain(|s| s.token != token);
    }

    fn highlight(&self, node: &MockNode, duration: Duration) {
        self.highlights
            .borrow_mut()
            .push((self.short_type_name(node), duration));
    }

    fn attach_binding_trace(&mut self, sink: TraceSink) -> TraceToken {
        self.next_trace_token += 1;
        let token = TraceToken(self.next_trace_token);
        self.trace_sinks.push((token, sink));
        token
    }

    fn detach_binding_trace(&mut self, token: TraceToken) {
        self.trace_sinks.retain(|(t, _)| *t != token);
    }
}
