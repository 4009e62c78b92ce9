use crate::graph_engine::domain::{
    EProjectCycle, GraphPath, ProjectRelationship, ProjectVersionRef, ViewParams,
};
use crate::graph_engine::policies::RelationshipFilter;
use crate::graph_engine::services::comparators::{
    RelationshipComparator, RelationshipPathComparator,
};
use crate::ports::outbound::{GraphStorageConnection, SeenTracker, StorageCapability};
use crate::shared::{GraphError, Result};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Expansion strategy of one traversal pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalType {
    BreadthFirst,
    DepthFirst,
}

/// Visitor callback interface driven by the traversal engine.
///
/// A traversal runs `required_passes` passes; each pass is breadth- or
/// depth-first as the visitor chooses per pass. `traverse_edge` decides
/// whether the engine descends through an accepted edge;
/// `edge_traversed` fires for every accepted edge whether or not it was
/// descended into (after the descent completes, for depth-first passes).
///
/// There is no cancellation primitive: a visitor cancels by returning
/// false from `traverse_edge` for all further edges, which starves the
/// expansion without throwing.
pub trait TraversalVisitor {
    /// Number of passes this traversal needs (default 1; build-order
    /// style traversals gather facts in pass 0 and finalize in pass 1)
    fn required_passes(&self) -> u32 {
        1
    }

    fn traversal_type(&self, pass: u32) -> TraversalType;

    /// Called before a pass begins, so per-pass state can be reset
    fn start_traverse(&mut self, _pass: u32, _view: &ViewParams) -> Result<()> {
        Ok(())
    }

    /// Called after a pass ends, so per-pass state can be finalized
    fn end_traverse(&mut self, _pass: u32, _view: &ViewParams) -> Result<()> {
        Ok(())
    }

    /// Cheap pre-filter consulted before `traverse_edge`
    fn pre_check(
        &mut self,
        _rel: &ProjectRelationship,
        _path: &[ProjectRelationship],
        _pass: u32,
    ) -> bool {
        true
    }

    /// Reports an accepted edge; the return value decides descent
    fn traverse_edge(
        &mut self,
        rel: &ProjectRelationship,
        path: &[ProjectRelationship],
        pass: u32,
    ) -> bool;

    /// Reports that an edge's handling is complete
    fn edge_traversed(
        &mut self,
        _rel: &ProjectRelationship,
        _path: &[ProjectRelationship],
        _pass: u32,
    ) {
    }
}

/// Releases the seen-tracker on every exit path, including unwinds out
/// of visitor callbacks and storage errors.
struct TrackerGuard<'a> {
    tracker: &'a dyn SeenTracker,
}

impl Drop for TrackerGuard<'_> {
    fn drop(&mut self) {
        if let Err(error) = self.tracker.on_traverse_complete() {
            warn!(token = self.tracker.token(), %error, "seen-tracker teardown failed");
        }
    }
}

/// One suspended depth-first expansion
struct DfsFrame {
    node_path: GraphPath,
    edges: Vec<ProjectRelationship>,
    cursor: usize,
    filter: RelationshipFilter,
}

/// One breadth-first frontier path
struct BfsEntry {
    node_path: GraphPath,
    edges: Vec<ProjectRelationship>,
    filter: RelationshipFilter,
}

/// The traversal engine: multi-pass, cycle-aware, deterministic walks of
/// the relationship graph under a view.
///
/// A single traversal from a single root is sequential; independent
/// views may traverse the same storage concurrently, since views never
/// mutate storage. The seen-tracker is per-invocation state and is torn
/// down when `traverse` returns, success or not.
pub struct GraphTraversal<'a, S: GraphStorageConnection> {
    view: &'a ViewParams,
    storage: &'a S,
    tracker: Arc<dyn SeenTracker>,
}

impl<'a, S: GraphStorageConnection> GraphTraversal<'a, S> {
    pub fn new(view: &'a ViewParams, storage: &'a S, tracker: Arc<dyn SeenTracker>) -> Self {
        Self {
            view,
            storage,
            tracker,
        }
    }

    /// Runs every pass the visitor requires, from `root`.
    pub fn traverse<V: TraversalVisitor>(
        &self,
        visitor: &mut V,
        root: &ProjectVersionRef,
    ) -> Result<()> {
        let _guard = TrackerGuard {
            tracker: self.tracker.as_ref(),
        };
        let passes = visitor.required_passes().max(1);
        for pass in 0..passes {
            let traversal_type = visitor.traversal_type(pass);
            debug!(
                workspace = self.view.workspace_id(),
                %root,
                pass,
                ?traversal_type,
                "starting traversal pass"
            );
            visitor.start_traverse(pass, self.view)?;
            match traversal_type {
                TraversalType::DepthFirst => self.depth_first_pass(visitor, root, pass)?,
                TraversalType::BreadthFirst => self.breadth_first_pass(visitor, root, pass)?,
            }
            visitor.end_traverse(pass, self.view)?;
            debug!(workspace = self.view.workspace_id(), pass, "traversal pass complete");
        }
        Ok(())
    }

    /// Out-edges of a node, validated and deterministically sorted.
    /// An edge whose declaring coordinate differs from the node it was
    /// fetched for is corrupt storage: fatal, never retried.
    fn sorted_out_edges(&self, node: &ProjectVersionRef) -> Result<Vec<ProjectRelationship>> {
        let mut edges = self.storage.get_out_edges(self.view, node)?;
        for edge in &edges {
            if edge.declaring() != node {
                anyhow::bail!(GraphError::driver(format!(
                    "malformed relationship from storage: declaring node {} does not match requested node {} in {}",
                    edge.declaring(),
                    node,
                    edge.render(),
                )));
            }
        }
        RelationshipComparator::sort(&mut edges);
        Ok(edges)
    }

    /// Applies the view's selection overlay to an edge target. The stored
    /// relationship is untouched; the substituted copy is what recursion,
    /// cycle keys and visitor callbacks see.
    fn resolve_edge(&self, rel: &ProjectRelationship) -> ProjectRelationship {
        let target = rel.target_project();
        if target.is_variable_version() {
            if let Some(selected) = self.view.selection_for(target.project_ref()) {
                trace!(
                    target = %target,
                    selected = %selected,
                    "substituting selected version"
                );
                return rel.with_target_version(selected.clone());
            }
        }
        rel.clone()
    }

    /// Seen-tracking context: filter identity plus the pass, so passes of
    /// a multi-pass traversal track independently.
    fn pass_key(filter: &RelationshipFilter, pass: u32) -> String {
        format!("{}@p{}", filter.identity_key(), pass)
    }

    /// Records a path-local cycle at the owning graph, when the backend
    /// supports cycle recording.
    fn record_cycle(
        &self,
        edge_path: &[ProjectRelationship],
        closing: &ProjectRelationship,
    ) -> Result<()> {
        let target = closing.target_project();
        let start = edge_path
            .iter()
            .position(|edge| edge.declaring() == target)
            .unwrap_or(edge_path.len());
        let mut members = edge_path[start..].to_vec();
        members.push(closing.clone());
        let cycle = EProjectCycle::new(members)?;
        trace!(cycle = %cycle, "cycle detected during traversal");
        if self.storage.supports(StorageCapability::CycleRecording) {
            self.storage.add_cycle(self.view.workspace_id(), &cycle)?;
        }
        Ok(())
    }

    /// Explicit-stack depth-first walk: one frame per suspended node, so
    /// arbitrarily deep dependency trees never grow the call stack.
    fn depth_first_pass<V: TraversalVisitor>(
        &self,
        visitor: &mut V,
        root: &ProjectVersionRef,
        pass: u32,
    ) -> Result<()> {
        let mut frames = vec![DfsFrame {
            node_path: GraphPath::root(root.clone()),
            edges: self.sorted_out_edges(root)?,
            cursor: 0,
            filter: self.view.effective_filter(),
        }];
        let mut edge_path: Vec<ProjectRelationship> = Vec::new();

        while !frames.is_empty() {
            let top = frames.len() - 1;
            if frames[top].cursor >= frames[top].edges.len() {
                frames.pop();
                if let Some(done) = edge_path.pop() {
                    visitor.edge_traversed(&done, &edge_path, pass);
                }
                continue;
            }

            let cursor = frames[top].cursor;
            frames[top].cursor += 1;
            let rel = self.resolve_edge(&frames[top].edges[cursor]);
            let filter = frames[top].filter.clone();

            if !filter.accept(&rel) {
                trace!(edge = %rel, "edge rejected by filter");
                continue;
            }
            if !visitor.pre_check(&rel, &edge_path, pass) {
                continue;
            }

            let follow = visitor.traverse_edge(&rel, &edge_path, pass);
            let mut descended = false;
            if follow && !rel.is_terminal_parent() {
                let target = rel.target_project().clone();
                if frames[top].node_path.contains(&target) {
                    // revisiting a declaring node already on this path
                    self.record_cycle(&edge_path, &rel)?;
                } else {
                    let candidate = frames[top].node_path.append(target.clone());
                    if !self
                        .tracker
                        .has_seen(&candidate, &Self::pass_key(&filter, pass))?
                    {
                        let child_edges = self.sorted_out_edges(&target)?;
                        let child_filter = filter.child_filter(&rel);
                        edge_path.push(rel.clone());
                        frames.push(DfsFrame {
                            node_path: candidate,
                            edges: child_edges,
                            cursor: 0,
                            filter: child_filter,
                        });
                        descended = true;
                    }
                }
            }
            if !descended {
                visitor.edge_traversed(&rel, &edge_path, pass);
            }
        }
        Ok(())
    }

    /// Layered breadth-first walk. Every next layer is fully built and
    /// then sorted with the path comparator before descent, so when two
    /// structurally different paths reach the same node, the path order
    /// (parent-derived ahead of direct, at equal depth) decides which is
    /// visited first.
    fn breadth_first_pass<V: TraversalVisitor>(
        &self,
        visitor: &mut V,
        root: &ProjectVersionRef,
        pass: u32,
    ) -> Result<()> {
        let mut layer = vec![BfsEntry {
            node_path: GraphPath::root(root.clone()),
            edges: Vec::new(),
            filter: self.view.effective_filter(),
        }];

        while !layer.is_empty() {
            let mut next: Vec<BfsEntry> = Vec::new();
            for entry in &layer {
                let frontier = entry.node_path.last().clone();
                for stored in self.sorted_out_edges(&frontier)? {
                    let rel = self.resolve_edge(&stored);
                    if !entry.filter.accept(&rel) {
                        trace!(edge = %rel, "edge rejected by filter");
                        continue;
                    }
                    if !visitor.pre_check(&rel, &entry.edges, pass) {
                        continue;
                    }
                    let follow = visitor.traverse_edge(&rel, &entry.edges, pass);
                    if follow && !rel.is_terminal_parent() {
                        let target = rel.target_project().clone();
                        if entry.node_path.contains(&target) {
                            self.record_cycle(&entry.edges, &rel)?;
                        } else {
                            let candidate = entry.node_path.append(target);
                            if !self
                                .tracker
                                .has_seen(&candidate, &Self::pass_key(&entry.filter, pass))?
                            {
                                let mut edges = entry.edges.clone();
                                edges.push(rel.clone());
                                next.push(BfsEntry {
                                    node_path: candidate,
                                    edges,
                                    filter: entry.filter.child_filter(&rel),
                                });
                            }
                        }
                    }
                    visitor.edge_traversed(&rel, &entry.edges, pass);
                }
            }
            next.sort_by(|a, b| RelationshipPathComparator::compare(&a.edges, &b.edges));
            layer = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::memory::MemoryStorage;
    use crate::adapters::outbound::tracking::MemorySeenTracker;
    use crate::graph_engine::domain::{ArtifactRef, DependencyScope, ProjectRef};
    use crate::graph_engine::policies::{DependencyFilterSpec, RelationshipFilter};
    use std::collections::BTreeSet;

    fn pvr(artifact: &str) -> ProjectVersionRef {
        ProjectVersionRef::parse("org.walk", artifact, "1.0").unwrap()
    }

    fn dep(declaring: &ProjectVersionRef, target: &ProjectVersionRef, index: u32) -> ProjectRelationship {
        ProjectRelationship::dependency(
            "src",
            None,
            declaring.clone(),
            ArtifactRef::jar(target.clone()),
            DependencyScope::Compile,
            index,
            false,
            false,
            false,
            BTreeSet::new(),
        )
    }

    /// Records the visitor call sequence for determinism checks
    struct RecordingVisitor {
        traversal_type: TraversalType,
        visited: Vec<String>,
    }

    impl RecordingVisitor {
        fn new(traversal_type: TraversalType) -> Self {
            Self {
                traversal_type,
                visited: Vec::new(),
            }
        }
    }

    impl TraversalVisitor for RecordingVisitor {
        fn traversal_type(&self, _pass: u32) -> TraversalType {
            self.traversal_type
        }

        fn traverse_edge(
            &mut self,
            rel: &ProjectRelationship,
            _path: &[ProjectRelationship],
            _pass: u32,
        ) -> bool {
            self.visited.push(rel.target_project().to_string());
            true
        }
    }

    fn diamond_storage() -> (MemoryStorage, ViewParams) {
        // root -> a, root -> b, a -> shared, b -> shared
        let storage = MemoryStorage::new();
        let root = pvr("root");
        let a = pvr("a");
        let b = pvr("b");
        let shared = pvr("shared");
        storage
            .add_relationships(
                "ws",
                &[
                    dep(&root, &a, 0),
                    dep(&root, &b, 1),
                    dep(&a, &shared, 0),
                    dep(&b, &shared, 0),
                ],
            )
            .unwrap();
        let view = ViewParams::new("ws", [root]);
        (storage, view)
    }

    fn run(
        storage: &MemoryStorage,
        view: &ViewParams,
        traversal_type: TraversalType,
    ) -> Vec<String> {
        let tracker = Arc::new(MemorySeenTracker::new());
        let engine = GraphTraversal::new(view, storage, tracker);
        let mut visitor = RecordingVisitor::new(traversal_type);
        engine.traverse(&mut visitor, &pvr("root")).unwrap();
        visitor.visited
    }

    #[test]
    fn test_bfs_layers_before_depth() {
        let (storage, view) = diamond_storage();
        let visited = run(&storage, &view, TraversalType::BreadthFirst);
        // both direct deps appear before anything at depth 2
        assert_eq!(visited[0], "org.walk:a:1.0");
        assert_eq!(visited[1], "org.walk:b:1.0");
        assert!(visited[2..].iter().all(|v| v == "org.walk:shared:1.0"));
    }

    #[test]
    fn test_dfs_descends_before_siblings() {
        let (storage, view) = diamond_storage();
        let visited = run(&storage, &view, TraversalType::DepthFirst);
        assert_eq!(visited[0], "org.walk:a:1.0");
        assert_eq!(visited[1], "org.walk:shared:1.0");
    }

    #[test]
    fn test_traversal_is_deterministic() {
        let (storage, view) = diamond_storage();
        let first = run(&storage, &view, TraversalType::BreadthFirst);
        let second = run(&storage, &view, TraversalType::BreadthFirst);
        assert_eq!(first, second);
    }

    #[test]
    fn test_dependency_cycle_terminates_and_is_recorded() {
        let storage = MemoryStorage::new();
        let a = pvr("a");
        let b = pvr("b");
        storage
            .add_relationships("ws", &[dep(&a, &b, 0), dep(&b, &a, 0)])
            .unwrap();
        let view = ViewParams::new("ws", [a.clone()]);

        let tracker = Arc::new(MemorySeenTracker::new());
        let engine = GraphTraversal::new(&view, &storage, tracker);
        let mut visitor = RecordingVisitor::new(TraversalType::DepthFirst);
        engine.traverse(&mut visitor, &a).unwrap();

        let cycles = storage.get_cycles(&view).unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 2);
        assert!(cycles[0].contains_relationship(&dep(&a, &b, 0)));
        assert!(cycles[0].contains_relationship(&dep(&b, &a, 0)));
    }

    #[test]
    fn test_visitor_false_starves_expansion() {
        let (storage, view) = diamond_storage();

        struct StopAtRoot {
            visited: Vec<String>,
        }
        impl TraversalVisitor for StopAtRoot {
            fn traversal_type(&self, _pass: u32) -> TraversalType {
                TraversalType::BreadthFirst
            }
            fn traverse_edge(
                &mut self,
                rel: &ProjectRelationship,
                _path: &[ProjectRelationship],
                _pass: u32,
            ) -> bool {
                self.visited.push(rel.target_project().to_string());
                false
            }
        }

        let tracker = Arc::new(MemorySeenTracker::new());
        let engine = GraphTraversal::new(&view, &storage, tracker);
        let mut visitor = StopAtRoot { visited: vec![] };
        engine.traverse(&mut visitor, &pvr("root")).unwrap();
        // only the root's direct edges, nothing at depth 2
        assert_eq!(visitor.visited.len(), 2);
    }

    #[test]
    fn test_filter_is_derived_per_hop() {
        let storage = MemoryStorage::new();
        let root = pvr("root");
        let provided_dep = pvr("provided-dep");
        let hidden = pvr("hidden");
        storage
            .add_relationships(
                "ws",
                &[
                    ProjectRelationship::dependency(
                        "src",
                        None,
                        root.clone(),
                        ArtifactRef::jar(provided_dep.clone()),
                        DependencyScope::Provided,
                        0,
                        false,
                        false,
                        false,
                        BTreeSet::new(),
                    ),
                    dep(&provided_dep, &hidden, 0),
                ],
            )
            .unwrap();
        let view = ViewParams::new("ws", [root.clone()]).with_filter(
            RelationshipFilter::Dependency(DependencyFilterSpec::scoped(
                DependencyScope::Provided,
            )),
        );

        let tracker = Arc::new(MemorySeenTracker::new());
        let engine = GraphTraversal::new(&view, &storage, tracker);
        let mut visitor = RecordingVisitor::new(TraversalType::BreadthFirst);
        engine.traverse(&mut visitor, &root).unwrap();

        // a provided edge is visible at the root but propagates nothing
        // under maven transitivity
        assert_eq!(visitor.visited, vec!["org.walk:provided-dep:1.0"]);
    }

    #[test]
    fn test_tracker_released_after_traverse() {
        let (storage, view) = diamond_storage();
        let tracker = Arc::new(MemorySeenTracker::new());
        let engine = GraphTraversal::new(&view, &storage, Arc::clone(&tracker) as Arc<dyn SeenTracker>);
        let mut visitor = RecordingVisitor::new(TraversalType::DepthFirst);
        engine.traverse(&mut visitor, &pvr("root")).unwrap();
        assert!(tracker.is_released());
    }

    #[test]
    fn test_malformed_storage_edge_is_fatal() {
        use crate::graph_engine::domain::EProjectCycle;
        use crate::ports::outbound::StorageCapability;

        /// A broken backend that answers with an edge declared by a
        /// different node than the one requested
        struct CorruptStorage;
        impl GraphStorageConnection for CorruptStorage {
            fn get_out_edges(
                &self,
                _view: &ViewParams,
                _node: &ProjectVersionRef,
            ) -> Result<Vec<ProjectRelationship>> {
                let other = pvr("other");
                let target = pvr("target");
                Ok(vec![dep(&other, &target, 0)])
            }
            fn get_all_projects(&self, _view: &ViewParams) -> Result<Vec<ProjectVersionRef>> {
                Ok(vec![])
            }
            fn add_relationships(
                &self,
                _workspace_id: &str,
                _relationships: &[ProjectRelationship],
            ) -> Result<Vec<ProjectRelationship>> {
                Ok(vec![])
            }
            fn add_cycle(&self, _workspace_id: &str, _cycle: &EProjectCycle) -> Result<()> {
                Ok(())
            }
            fn get_cycles(&self, _view: &ViewParams) -> Result<Vec<EProjectCycle>> {
                Ok(vec![])
            }
            fn contains_project(
                &self,
                _view: &ViewParams,
                _node: &ProjectVersionRef,
            ) -> Result<bool> {
                Ok(false)
            }
            fn contains_relationship(
                &self,
                _view: &ViewParams,
                _rel: &ProjectRelationship,
            ) -> Result<bool> {
                Ok(false)
            }
            fn mark_deselected(
                &self,
                _view: &ViewParams,
                _node: &ProjectVersionRef,
            ) -> Result<()> {
                Ok(())
            }
            fn supports(&self, _capability: StorageCapability) -> bool {
                false
            }
            fn close(&self) -> Result<()> {
                Ok(())
            }
        }

        let view = ViewParams::new("ws", [pvr("root")]);
        let storage = CorruptStorage;
        let tracker = Arc::new(MemorySeenTracker::new());
        let engine = GraphTraversal::new(&view, &storage, Arc::clone(&tracker) as Arc<dyn SeenTracker>);
        let mut visitor = RecordingVisitor::new(TraversalType::DepthFirst);
        let result = engine.traverse(&mut visitor, &pvr("root"));
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("malformed relationship"));
        // teardown still ran despite the error
        assert!(tracker.is_released());
    }
}
