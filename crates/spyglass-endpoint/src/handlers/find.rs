//! Element search.

use std::collections::HashSet;

use spyglass_types::{ElementMatch, InspectError};
use spyglass_wire::{FindRequest, FindResult};

use crate::adapter::ToolkitAdapter;
use crate::analyzer;
use crate::state::InspectorState;

/// Hard ceiling on `maxResults`, whatever the client asks for.
const MAX_RESULTS_CEILING: usize = 10_000;

/// Depth-first search over visual children.
///
/// The walk terminates the moment the result cap is reached, including
/// before descending into subtrees that could only push past it.
pub fn find_elements<A: ToolkitAdapter>(
    state: &mut InspectorState<A>,
    request: FindRequest,
) -> Result<FindResult, InspectError> {
    let cap = request.max_results.clamp(1, MAX_RESULTS_CEILING);
    let start = match &request.root_handle {
        Some(handle) => state.resolve(handle)?,
        None => state.first_root()?,
    };

    let mut search = Search {
        request: &request,
        cap,
        matches: Vec::new(),
        stopped: false,
        path: Vec::new(),
        visited: HashSet::new(),
    };
    search.node(state, &start);

    let total_matches = if search.stopped {
        None
    } else {
        Some(search.matches.len())
    };
    Ok(FindResult {
        matches: search.matches,
        total_matches,
    })
}

struct Search<'r> {
    request: &'r FindRequest,
    cap: usize,
    matches: Vec<ElementMatch>,
    stopped: bool,
    /// `Type[Name]` segments from the search root to the current node.
    path: Vec<String>,
    visited: HashSet<u64>,
}

impl Search<'_> {
    fn node<A: ToolkitAdapter>(&mut self, state: &mut InspectorState<A>, node: &A::Node) {
        if self.stopped {
            return;
        }
        let key = state.adapter().node_key(node);
        if !self.visited.insert(key) {
            return;
        }

        self.path.push(state.describe(node));

        if matches_filters(state, node, self.request) {
            let handle = state.assign(node);
            self.matches.push(ElementMatch {
                handle,
                type_name: state.adapter().type_name(node),
                name: state.adapter().name(node).filter(|n| !n.is_empty()),
                path: self.path.join(" > "),
            });
            if self.matches.len() >= self.cap {
                self.stopped = true;
                self.path.pop();
                return;
            }
        }

        for child in state.adapter().children_visual(node) {
            if self.stopped {
                break;
            }
            self.node(state, &child);
        }
        self.path.pop();
    }
}

fn matches_filters<A: ToolkitAdapter>(
    state: &InspectorState<A>,
    node: &A::Node,
    request: &FindRequest,
) -> bool {
    if let Some(wanted) = &request.type_name {
        let full = state.adapter().type_name(node);
        let short = state.adapter().short_type_name(node);
        let contains = full.to_lowercase().contains(&wanted.to_lowercase());
        let short_equals = short.eq_ignore_ascii_case(wanted);
        if !contains && !short_equals {
            return false;
        }
    }

    if let Some(wanted) = &request.element_name {
        match state.adapter().name(node) {
            Some(name) if name.to_lowercase().contains(&wanted.to_lowercase()) => {}
            _ => return false,
        }
    }

    for (property, expected) in &request.property_filter {
        let Some(reading) = state.adapter().read_property(node, property) else {
            return false;
        };
        let value = analyzer::format_value(&reading.value);
        if !value.eq_ignore_ascii_case(expected) {
            return false;
        }
    }

    true
}
