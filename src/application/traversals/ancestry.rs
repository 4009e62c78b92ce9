use crate::graph_engine::domain::{ProjectRelationship, ProjectVersionRef, RelationshipKind};
use crate::graph_engine::policies::RelationshipFilter;
use crate::graph_engine::services::{TraversalType, TraversalVisitor};

/// Walks the parent chain from a root, recording the ancestry in
/// child-to-parent order. Stops at the terminal self-parent marker.
pub struct AncestryTraversal {
    ancestry: Vec<ProjectVersionRef>,
}

impl AncestryTraversal {
    pub fn new() -> Self {
        Self {
            ancestry: Vec::new(),
        }
    }

    pub fn view_filter(&self) -> RelationshipFilter {
        RelationshipFilter::Parent {
            include_terminus: false,
        }
    }

    /// The chain of ancestor coordinates, nearest ancestor first
    pub fn ancestry(&self) -> &[ProjectVersionRef] {
        &self.ancestry
    }
}

impl Default for AncestryTraversal {
    fn default() -> Self {
        Self::new()
    }
}

impl TraversalVisitor for AncestryTraversal {
    fn traversal_type(&self, _pass: u32) -> TraversalType {
        TraversalType::DepthFirst
    }

    fn pre_check(
        &mut self,
        rel: &ProjectRelationship,
        _path: &[ProjectRelationship],
        _pass: u32,
    ) -> bool {
        rel.kind() == RelationshipKind::Parent && !rel.is_terminal_parent()
    }

    fn traverse_edge(
        &mut self,
        rel: &ProjectRelationship,
        _path: &[ProjectRelationship],
        _pass: u32,
    ) -> bool {
        self.ancestry.push(rel.target_project().clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::memory::MemoryStorage;
    use crate::adapters::outbound::tracking::MemorySeenTracker;
    use crate::graph_engine::domain::ViewParams;
    use crate::graph_engine::services::GraphTraversal;
    use crate::ports::outbound::GraphStorageConnection;
    use std::sync::Arc;

    fn pvr(artifact: &str) -> ProjectVersionRef {
        ProjectVersionRef::parse("org.test", artifact, "1").unwrap()
    }

    #[test]
    fn test_records_chain_to_terminal_marker() {
        let storage = MemoryStorage::new();
        let child = pvr("child");
        let parent = pvr("parent");
        let grandparent = pvr("grandparent");
        storage
            .add_relationships(
                "ws",
                &[
                    ProjectRelationship::parent("src", child.clone(), parent.clone(), 0, false),
                    ProjectRelationship::parent(
                        "src",
                        parent.clone(),
                        grandparent.clone(),
                        0,
                        false,
                    ),
                    ProjectRelationship::parent(
                        "src",
                        grandparent.clone(),
                        grandparent.clone(),
                        0,
                        false,
                    ),
                ],
            )
            .unwrap();

        let mut visitor = AncestryTraversal::new();
        let view = ViewParams::new("ws", [child.clone()]).with_filter(visitor.view_filter());
        let engine = GraphTraversal::new(&view, &storage, Arc::new(MemorySeenTracker::new()));
        engine.traverse(&mut visitor, &child).unwrap();

        assert_eq!(visitor.ancestry(), &[parent, grandparent]);
    }
}
