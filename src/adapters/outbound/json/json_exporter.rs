use crate::adapters::outbound::tracking::MemorySeenTracker;
use crate::graph_engine::domain::{ProjectRelationship, ViewParams};
use crate::graph_engine::services::{GraphTraversal, TraversalType, TraversalVisitor};
use crate::ports::outbound::{GraphExporter, GraphStorageConnection};
use crate::shared::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// The wire form: workspace, roots and every relationship reachable
/// under the view, in visit order.
#[derive(Serialize)]
struct WireGraph {
    workspace_id: String,
    roots: Vec<String>,
    relationships: Vec<ProjectRelationship>,
}

/// Collects each reachable relationship exactly once, in deterministic
/// visit order
struct CollectRelationships {
    seen: HashSet<ProjectRelationship>,
    ordered: Vec<ProjectRelationship>,
}

impl TraversalVisitor for CollectRelationships {
    fn traversal_type(&self, _pass: u32) -> TraversalType {
        TraversalType::BreadthFirst
    }

    fn traverse_edge(
        &mut self,
        rel: &ProjectRelationship,
        _path: &[ProjectRelationship],
        _pass: u32,
    ) -> bool {
        if self.seen.insert(rel.clone()) {
            self.ordered.push(rel.clone());
        }
        true
    }
}

/// Serializes the subgraph reachable under a view to JSON, with the
/// view's selections already applied to edge targets.
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphExporter for JsonExporter {
    fn export<S: GraphStorageConnection>(
        &self,
        view: &ViewParams,
        storage: &S,
    ) -> Result<String> {
        let mut visitor = CollectRelationships {
            seen: HashSet::new(),
            ordered: Vec::new(),
        };
        for root in view.roots() {
            let tracker = Arc::new(MemorySeenTracker::new());
            let engine = GraphTraversal::new(view, storage, tracker);
            engine.traverse(&mut visitor, root)?;
        }

        let wire = WireGraph {
            workspace_id: view.workspace_id().to_string(),
            roots: view.roots().iter().map(|r| r.to_string()).collect(),
            relationships: visitor.ordered,
        };
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&wire)?
        } else {
            serde_json::to_string(&wire)?
        };
        Ok(rendered)
    }
}
