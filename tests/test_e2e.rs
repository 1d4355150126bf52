//! End-to-end flows: controller bridge against a live endpoint over a
//! real Unix socket, with a mock toolkit on a dedicated UI thread.

mod common;

use spyglass_bridge::FindFilter;
use spyglass_endpoint::adapter::PropertyValue;
use spyglass_endpoint::testkit::{MockNode, MockToolkit};
use spyglass_types::{ResourceScope, ValueSource, VisualTreeNode};
use spyglass_wire::ExportFormat;

use common::{spawn_harness, spawn_with};

fn find_node<'t>(node: &'t VisualTreeNode, type_suffix: &str) -> Option<&'t VisualTreeNode> {
    if node.type_name.ends_with(type_suffix) {
        return Some(node);
    }
    node.children.iter().find_map(|c| find_node(c, type_suffix))
}

#[tokio::test]
async fn attach_tree_then_properties() {
    let harness = spawn_harness().await;
    let controller = harness.controller();

    let tree = controller.get_visual_tree(None, Some(3)).await.unwrap();
    assert_eq!(tree.root.type_name, "System.Windows.Window");
    assert!(tree.total_elements >= 3);

    let button = find_node(&tree.root, "Button").expect("button in tree");
    assert_eq!(button.name.as_deref(), Some("SubmitButton"));

    let properties = controller
        .get_element_properties(button.handle.clone())
        .await
        .unwrap();
    let content = properties
        .properties
        .iter()
        .find(|p| p.name == "Content")
        .expect("Content property");
    assert_eq!(content.value, "Submit");
    assert_eq!(content.source, ValueSource::Local);

    // The text block's Text is data-bound with a non-empty path.
    let text_block = find_node(&tree.root, "TextBlock").unwrap();
    let properties = controller
        .get_element_properties(text_block.handle.clone())
        .await
        .unwrap();
    let text = properties.properties.iter().find(|p| p.name == "Text").unwrap();
    assert!(text.is_binding);
    assert!(!text.binding_details.as_ref().unwrap().path.is_empty());

    harness.shutdown().await;
}

#[tokio::test]
async fn handles_stay_stable_across_requests() {
    let harness = spawn_harness().await;
    let controller = harness.controller();

    let first = controller.get_visual_tree(None, Some(10)).await.unwrap();
    let second = controller.get_visual_tree(None, Some(10)).await.unwrap();
    assert_eq!(first.root.handle, second.root.handle);

    let button_then = find_node(&first.root, "Button").unwrap();
    let button_now = find_node(&second.root, "Button").unwrap();
    assert_eq!(button_then.handle, button_now.handle);

    harness.shutdown().await;
}

#[tokio::test]
async fn find_elements_respects_cap() {
    let harness = spawn_with(
        || {
            let mut grid = MockNode::new("System.Windows.Controls.Grid");
            for i in 0..50 {
                grid = grid.with_child(
                    MockNode::new("System.Windows.Controls.Button").named(&format!("Btn{i}")),
                );
            }
            MockToolkit::new(vec![MockNode::new("System.Windows.Window").with_child(grid)])
        },
        std::time::Duration::from_secs(5),
    )
    .await;
    let controller = harness.controller();

    let found = controller
        .find_elements(FindFilter {
            type_name: Some("Button".into()),
            max_results: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(found.matches.len(), 2);
    for hit in &found.matches {
        let tail = hit.path.rsplit(" > ").next().unwrap();
        assert!(tail.starts_with("Button["), "path tail: {tail}");
    }

    harness.shutdown().await;
}

#[tokio::test]
async fn logical_tree_diverges_from_visual() {
    let harness = spawn_with(
        || {
            let logical_only = MockNode::new("App.DataTemplateHost");
            let window = MockNode::new("System.Windows.Window")
                .with_child(MockNode::new("System.Windows.Controls.Grid"))
                .with_logical_child(logical_only);
            MockToolkit::new(vec![window])
        },
        std::time::Duration::from_secs(5),
    )
    .await;
    let controller = harness.controller();

    let visual = controller.get_visual_tree(None, None).await.unwrap();
    let logical = controller.get_logical_tree(None, None).await.unwrap();
    assert_eq!(visual.total_elements, 2);
    assert_eq!(logical.total_elements, 3);

    harness.shutdown().await;
}

#[tokio::test]
async fn layout_styles_resources_and_highlight() {
    let harness = spawn_harness().await;
    let controller = harness.controller();

    let tree = controller.get_visual_tree(None, None).await.unwrap();
    let button = find_node(&tree.root, "Button").unwrap().handle.clone();

    let layout = controller.get_layout_info(button.clone()).await.unwrap();
    assert_eq!(layout.layout.actual_width, 120.0);
    assert_eq!(layout.layout.visibility, "Visible");

    let styles = controller.get_styles(button.clone()).await.unwrap();
    let style = styles.style.unwrap();
    assert_eq!(style.target_type, "Button");
    assert!(styles.has_implicit_style);

    let resources = controller
        .get_resources(ResourceScope::Element, Some(button.clone()))
        .await
        .unwrap();
    assert_eq!(resources.resources.last().unwrap().source, "Application");

    let highlight = controller.highlight_element(button, Some(500)).await.unwrap();
    assert_eq!(highlight.duration_ms, 500);

    harness.shutdown().await;
}

#[tokio::test]
async fn export_tree_both_formats() {
    let harness = spawn_harness().await;
    let controller = harness.controller();

    let json = controller.export_tree(None, ExportFormat::Json).await.unwrap();
    let tree = json.tree.expect("json export carries the tree");
    assert!(find_node(&tree, "Run").is_some(), "deep export reaches leaves");

    let xaml = controller.export_tree(None, ExportFormat::Xaml).await.unwrap();
    let content = xaml.content.expect("xaml export carries text");
    assert!(content.starts_with("<Window x:Name=\"MainWindow\">"));
    assert!(content.contains("    <Button x:Name=\"SubmitButton\" />"));
    assert!(content.trim_end().ends_with("</Window>"));

    harness.shutdown().await;
}

#[tokio::test]
async fn property_filter_search() {
    let harness = spawn_with(
        || {
            let grid = MockNode::new("System.Windows.Controls.Grid")
                .with_child(
                    MockNode::new("System.Windows.Controls.Button")
                        .named("On")
                        .with_property(
                            "IsEnabled",
                            "System.Boolean",
                            PropertyValue::Bool(true),
                            ValueSource::Local,
                        ),
                )
                .with_child(
                    MockNode::new("System.Windows.Controls.Button")
                        .named("Off")
                        .with_property(
                            "IsEnabled",
                            "System.Boolean",
                            PropertyValue::Bool(false),
                            ValueSource::Local,
                        ),
                );
            MockToolkit::new(vec![MockNode::new("System.Windows.Window").with_child(grid)])
        },
        std::time::Duration::from_secs(5),
    )
    .await;
    let controller = harness.controller();

    let found = controller
        .find_elements(FindFilter {
            type_name: Some("Button".into()),
            property_filter: [("IsEnabled".to_string(), "true".to_string())].into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.matches.len(), 1);
    assert_eq!(found.matches[0].name.as_deref(), Some("On"));
    assert_eq!(found.total_matches, Some(1));

    harness.shutdown().await;
}
