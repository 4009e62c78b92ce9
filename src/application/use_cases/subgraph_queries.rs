use crate::adapters::outbound::tracking::MemorySeenTracker;
use crate::graph_engine::domain::{
    EProjectCycle, ProjectRelationship, ProjectVersionRef, ViewParams,
};
use crate::graph_engine::services::{
    CycleTracking, GraphTraversal, TraversalType, TraversalVisitor,
};
use crate::ports::outbound::GraphStorageConnection;
use crate::shared::Result;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Gathers the nodes and edges reachable under the view, with the
/// view's selections already applied to edge targets.
struct ReachableSubgraph {
    nodes: BTreeSet<ProjectVersionRef>,
    edges: HashSet<ProjectRelationship>,
}

impl TraversalVisitor for ReachableSubgraph {
    fn traversal_type(&self, _pass: u32) -> TraversalType {
        TraversalType::BreadthFirst
    }

    fn traverse_edge(
        &mut self,
        rel: &ProjectRelationship,
        _path: &[ProjectRelationship],
        _pass: u32,
    ) -> bool {
        self.nodes.insert(rel.declaring().clone());
        self.nodes.insert(rel.target_project().clone());
        self.edges.insert(rel.clone());
        true
    }
}

/// Read-side queries about the shape of the subgraph a view can see:
/// which reachable nodes still have variable versions, which have no
/// recorded relationships, and which are referenced but entirely absent
/// from storage.
pub struct SubgraphQueryUseCase<'a, S: GraphStorageConnection> {
    view: &'a ViewParams,
    storage: &'a S,
}

impl<'a, S: GraphStorageConnection> SubgraphQueryUseCase<'a, S> {
    pub fn new(view: &'a ViewParams, storage: &'a S) -> Self {
        Self { view, storage }
    }

    fn collect_reachable(&self) -> Result<ReachableSubgraph> {
        let mut visitor = ReachableSubgraph {
            nodes: self.view.roots().iter().cloned().collect(),
            edges: HashSet::new(),
        };
        for root in self.view.roots() {
            let tracker = Arc::new(MemorySeenTracker::new());
            let engine = GraphTraversal::new(self.view, self.storage, tracker);
            engine.traverse(&mut visitor, root)?;
        }
        Ok(visitor)
    }

    /// Every node reachable from the view's roots, selections applied.
    /// Roots are always members, even when they declare nothing.
    pub fn reachable_projects(&self) -> Result<BTreeSet<ProjectVersionRef>> {
        Ok(self.collect_reachable()?.nodes)
    }

    /// Reachable nodes whose version is still variable (a range or
    /// snapshot) and for which the view holds no selection.
    pub fn get_variable_subgraphs(&self) -> Result<BTreeSet<ProjectVersionRef>> {
        let reachable = self.reachable_projects()?;
        Ok(reachable
            .into_iter()
            .filter(|node| {
                node.is_variable_version()
                    && self.view.selection_for(node.project_ref()).is_none()
            })
            .collect())
    }

    /// Reachable nodes that declare no relationships: subgraphs whose
    /// contents have not been discovered yet. A freshly selected concrete
    /// version shows up here until its relationships are stored.
    pub fn get_incomplete_subgraphs(&self) -> Result<BTreeSet<ProjectVersionRef>> {
        let reachable = self.reachable_projects()?;
        let mut incomplete = BTreeSet::new();
        for node in reachable {
            if self.storage.get_out_edges(self.view, &node)?.is_empty() {
                incomplete.insert(node);
            }
        }
        Ok(incomplete)
    }

    /// Reachable nodes the workspace has never stored in any role
    pub fn get_missing_projects(&self) -> Result<BTreeSet<ProjectVersionRef>> {
        let reachable = self.reachable_projects()?;
        let mut missing = BTreeSet::new();
        for node in reachable {
            if !self.storage.contains_project(self.view, &node)? {
                missing.insert(node);
            }
        }
        Ok(missing)
    }

    /// Every node visible to this view, in deterministic order. Workspace
    /// islands the roots never reach are not part of the view; storage
    /// keeps the unfiltered enumeration.
    pub fn get_all_projects(&self) -> Result<Vec<ProjectVersionRef>> {
        Ok(self.reachable_projects()?.into_iter().collect())
    }

    /// Whether the node is visible to this view (reachable under its
    /// roots, filter and selections)
    pub fn contains_project(&self, node: &ProjectVersionRef) -> Result<bool> {
        Ok(self.reachable_projects()?.contains(node))
    }

    /// Whether the view can see this exact relationship: stored, accepted
    /// by the filter and reached from the roots. Selections substitute
    /// edge targets, so the substituted form is what matches.
    pub fn contains_relationship(&self, rel: &ProjectRelationship) -> Result<bool> {
        Ok(self.collect_reachable()?.edges.contains(rel))
    }

    /// Recorded cycles still live under this view's filter. A cycle with
    /// a member edge the filter excludes is not a cycle in the filtered
    /// subgraph.
    pub fn get_cycles(&self) -> Result<Vec<EProjectCycle>> {
        let mut cycles = self.storage.get_cycles(self.view)?;
        CycleTracking::retain_live_cycles(&mut cycles, &self.view.effective_filter());
        Ok(cycles)
    }
}
