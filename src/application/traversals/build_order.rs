use crate::graph_engine::domain::{ProjectRef, ProjectRelationship, ViewParams};
use crate::graph_engine::services::{TraversalType, TraversalVisitor};
use crate::shared::Result;
use std::collections::HashSet;

/// Computes an order in which the reachable projects can be built:
/// dependencies before their dependents, cycle members in first-finished
/// order.
///
/// Runs two passes. Pass 0 walks breadth-first and gathers the set of
/// reachable projects; pass 1 walks depth-first and appends each project
/// as its subtree finishes, which yields a post-order. Roots join the
/// order last.
pub struct BuildOrderTraversal {
    reachable: HashSet<ProjectRef>,
    ordered: Vec<ProjectRef>,
    placed: HashSet<ProjectRef>,
}

impl BuildOrderTraversal {
    pub fn new() -> Self {
        Self {
            reachable: HashSet::new(),
            ordered: Vec::new(),
            placed: HashSet::new(),
        }
    }

    /// Projects in dependency-before-dependent order
    pub fn build_order(&self) -> &[ProjectRef] {
        &self.ordered
    }

    fn place(&mut self, project: &ProjectRef) {
        if self.reachable.contains(project) && self.placed.insert(project.clone()) {
            self.ordered.push(project.clone());
        }
    }
}

impl Default for BuildOrderTraversal {
    fn default() -> Self {
        Self::new()
    }
}

impl TraversalVisitor for BuildOrderTraversal {
    fn required_passes(&self) -> u32 {
        2
    }

    fn traversal_type(&self, pass: u32) -> TraversalType {
        if pass == 0 {
            TraversalType::BreadthFirst
        } else {
            TraversalType::DepthFirst
        }
    }

    fn traverse_edge(
        &mut self,
        rel: &ProjectRelationship,
        _path: &[ProjectRelationship],
        pass: u32,
    ) -> bool {
        if pass == 0 {
            self.reachable
                .insert(rel.declaring().project_ref().clone());
            self.reachable
                .insert(rel.target_project().project_ref().clone());
        }
        true
    }

    fn edge_traversed(
        &mut self,
        rel: &ProjectRelationship,
        _path: &[ProjectRelationship],
        pass: u32,
    ) {
        // depth-first completion order puts leaves before dependents
        if pass == 1 {
            let target = rel.target_project().project_ref().clone();
            self.place(&target);
        }
    }

    fn end_traverse(&mut self, pass: u32, view: &ViewParams) -> Result<()> {
        if pass == 1 {
            for root in view.roots() {
                let project = root.project_ref().clone();
                self.place(&project);
            }
        }
        Ok(())
    }
}
