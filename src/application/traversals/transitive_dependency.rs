use crate::graph_engine::domain::{
    ArtifactRef, DependencyScope, ProjectRelationship, RelationshipTarget,
};
use crate::graph_engine::policies::RelationshipFilter;
use crate::graph_engine::services::{TraversalType, TraversalVisitor};
use std::collections::HashSet;

/// Collects the artifacts pulled in transitively at a dependency scope.
///
/// Parent edges are walked so inherited declarations are reached, but
/// only dependency targets are collected. Each artifact is collected at
/// its first (nearest) encounter, which is why this runs breadth-first.
pub struct TransitiveDependencyTraversal {
    scope: DependencyScope,
    seen: HashSet<ArtifactRef>,
    artifacts: Vec<ArtifactRef>,
}

impl TransitiveDependencyTraversal {
    pub fn new(scope: DependencyScope) -> Self {
        Self {
            scope,
            seen: HashSet::new(),
            artifacts: Vec::new(),
        }
    }

    /// The filter a view needs for this traversal to see dependency and
    /// ancestry edges.
    pub fn view_filter(&self) -> RelationshipFilter {
        RelationshipFilter::dependencies(self.scope)
    }

    /// Artifacts in nearest-first visit order
    pub fn artifacts(&self) -> &[ArtifactRef] {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<ArtifactRef> {
        self.artifacts
    }
}

impl TraversalVisitor for TransitiveDependencyTraversal {
    fn traversal_type(&self, _pass: u32) -> TraversalType {
        TraversalType::BreadthFirst
    }

    fn traverse_edge(
        &mut self,
        rel: &ProjectRelationship,
        _path: &[ProjectRelationship],
        _pass: u32,
    ) -> bool {
        if let RelationshipTarget::Artifact(artifact) = rel.target() {
            if self.seen.insert(artifact.clone()) {
                self.artifacts.push(artifact.clone());
            }
        }
        true
    }
}
