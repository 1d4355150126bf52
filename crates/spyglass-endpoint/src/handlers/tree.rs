//! Visual- and logical-tree walks.

use std::collections::HashSet;

use spyglass_types::{InspectError, VisualTreeNode};
use spyglass_wire::{TreeRequest, TreeResult};

use crate::adapter::ToolkitAdapter;
use crate::state::InspectorState;

/// Which child relation a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    Visual,
    Logical,
}

pub fn visual_tree<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: TreeRequest,
) -> Result<TreeResult, InspectError> {
    walk_tree(state, request, TreeKind::Visual)
}

pub fn logical_tree<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: TreeRequest,
) -> Result<TreeResult, InspectError> {
    walk_tree(state, request, TreeKind::Logical)
}

pub(crate) fn walk_tree<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: TreeRequest,
    kind: TreeKind,
) -> Result<TreeResult, InspectError> {
    let start = match &request.root_handle {
        Some(handle) => state.resolve(handle)?,
        None => state.first_root()?,
    };

    let mut walk = Walk {
        kind,
        max_depth: request.max_depth,
        total: 0,
        cut: false,
        visited: HashSet::new(),
    };
    let root = walk
        .node(state, &start, 0)
        .ok_or_else(|| InspectError::Handler("walk start node repeated itself".into()))?;

    Ok(TreeResult {
        root,
        total_elements: walk.total,
        max_depth_reached: walk.cut,
    })
}

struct Walk {
    kind: TreeKind,
    max_depth: u32,
    total: usize,
    cut: bool,
    /// Defensive only: well-formed child relations form a tree, but a
    /// misbehaving adapter must not loop the walk.
    visited: HashSet<u64>,
}

impl Walk {
    fn node<A: ToolkitAdapter>(
        &mut self,
        state: &mut InspectorState<A>,
        node: &A::Node,
        depth: u32,
    ) -> Option<VisualTreeNode> {
        let key = state.adapter().node_key(node);
        if !self.visited.insert(key) {
            return None;
        }
        self.total += 1;

        let handle = state.assign(node);
        let type_name = state.adapter().type_name(node);
        let name = state.adapter().name(node).filter(|n| !n.is_empty());

        let child_nodes = match self.kind {
            TreeKind::Visual => state.adapter().children_visual(node),
            TreeKind::Logical => state.adapter().children_logical(node),
        };

        let mut children = Vec::new();
        if depth >= self.max_depth {
            if !child_nodes.is_empty() {
                self.cut = true;
            }
        } else {
            for child in &child_nodes {
                if let Some(record) = self.node(state, child, depth + 1) {
                    children.push(record);
                }
            }
        }

        Some(VisualTreeNode {
            handle,
            type_name,
            name,
            depth,
            children,
        })
    }
}
