use crate::graph_engine::domain::{
    EProjectCycle, ProjectRelationship, ProjectVersionRef, RelationshipKind, ViewParams,
};
use crate::ports::outbound::{GraphStorageConnection, StorageCapability};
use crate::shared::{GraphError, Result};
use dashmap::DashMap;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Per-workspace adjacency state
#[derive(Debug, Default)]
struct WorkspaceGraph {
    /// Out-edges per declaring node, in insertion order
    out_edges: std::collections::HashMap<ProjectVersionRef, Vec<ProjectRelationship>>,
    /// Every node the workspace has seen, declaring or declared
    nodes: BTreeSet<ProjectVersionRef>,
    /// Recorded cycles, deduplicated by key
    cycles: Vec<EProjectCycle>,
    /// Nodes deselected per view; keyed by the view's workspace id plus
    /// selection fingerprint so distinct views do not interfere
    deselected: HashSet<(String, ProjectVersionRef)>,
}

impl WorkspaceGraph {
    /// Walks parent edges from `start`, answering whether `needle` is an
    /// ancestor. Used to refuse parent edges that would close an
    /// ancestry loop.
    fn parent_reaches(&self, start: &ProjectVersionRef, needle: &ProjectVersionRef) -> bool {
        let mut queue = VecDeque::from([start.clone()]);
        let mut visited = HashSet::new();
        while let Some(node) = queue.pop_front() {
            if &node == needle {
                return true;
            }
            if !visited.insert(node.clone()) {
                continue;
            }
            if let Some(edges) = self.out_edges.get(&node) {
                for edge in edges {
                    if edge.kind() == RelationshipKind::Parent && !edge.is_terminal_parent() {
                        queue.push_back(edge.target_project().clone());
                    }
                }
            }
        }
        false
    }
}

/// In-memory storage backend: a concurrent map of workspace adjacency
/// structures.
///
/// Suitable for tests and small graphs; the out-edge order it reports is
/// the insertion order of `add_relationships` batches, which is stable
/// within a snapshot as the storage port requires.
pub struct MemoryStorage {
    workspaces: DashMap<String, WorkspaceGraph>,
    closed: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            workspaces: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            anyhow::bail!(GraphError::driver("memory storage used after close"));
        }
        Ok(())
    }

    /// Fingerprint distinguishing views of the same workspace for
    /// deselection bookkeeping
    fn view_key(view: &ViewParams) -> String {
        let selections: Vec<String> = view
            .selections()
            .iter()
            .map(|(project, version)| format!("{}={}", project, version))
            .collect();
        format!("{}[{}]", view.workspace_id(), selections.join(","))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStorageConnection for MemoryStorage {
    fn get_out_edges(
        &self,
        view: &ViewParams,
        node: &ProjectVersionRef,
    ) -> Result<Vec<ProjectRelationship>> {
        self.ensure_open()?;
        let Some(workspace) = self.workspaces.get(view.workspace_id()) else {
            return Ok(Vec::new());
        };
        let view_key = Self::view_key(view);
        let edges = workspace
            .out_edges
            .get(node)
            .map(|edges| {
                edges
                    .iter()
                    .filter(|edge| {
                        !workspace
                            .deselected
                            .contains(&(view_key.clone(), edge.target_project().clone()))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(edges)
    }

    fn get_all_projects(&self, view: &ViewParams) -> Result<Vec<ProjectVersionRef>> {
        self.ensure_open()?;
        Ok(self
            .workspaces
            .get(view.workspace_id())
            .map(|workspace| workspace.nodes.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn add_relationships(
        &self,
        workspace_id: &str,
        relationships: &[ProjectRelationship],
    ) -> Result<Vec<ProjectRelationship>> {
        self.ensure_open()?;
        let mut workspace = self.workspaces.entry(workspace_id.to_string()).or_default();
        let mut rejected = Vec::new();

        for rel in relationships {
            // a non-terminal parent edge whose target already reaches the
            // declaring node through parents would close an ancestry loop
            if rel.kind() == RelationshipKind::Parent
                && !rel.is_terminal_parent()
                && workspace.parent_reaches(rel.target_project(), rel.declaring())
            {
                debug!(edge = %rel, "rejecting cycle-introducing parent relationship");
                rejected.push(rel.clone());
                continue;
            }

            workspace.nodes.insert(rel.declaring().clone());
            workspace.nodes.insert(rel.target_project().clone());
            let edges = workspace
                .out_edges
                .entry(rel.declaring().clone())
                .or_default();
            if !edges.contains(rel) {
                edges.push(rel.clone());
            }
        }
        Ok(rejected)
    }

    fn add_cycle(&self, workspace_id: &str, cycle: &EProjectCycle) -> Result<()> {
        self.ensure_open()?;
        let mut workspace = self.workspaces.entry(workspace_id.to_string()).or_default();
        if !workspace.cycles.iter().any(|known| known.key() == cycle.key()) {
            workspace.cycles.push(cycle.clone());
        }
        Ok(())
    }

    fn get_cycles(&self, view: &ViewParams) -> Result<Vec<EProjectCycle>> {
        self.ensure_open()?;
        Ok(self
            .workspaces
            .get(view.workspace_id())
            .map(|workspace| workspace.cycles.clone())
            .unwrap_or_default())
    }

    fn contains_project(&self, view: &ViewParams, node: &ProjectVersionRef) -> Result<bool> {
        self.ensure_open()?;
        Ok(self
            .workspaces
            .get(view.workspace_id())
            .is_some_and(|workspace| workspace.nodes.contains(node)))
    }

    fn contains_relationship(
        &self,
        view: &ViewParams,
        rel: &ProjectRelationship,
    ) -> Result<bool> {
        self.ensure_open()?;
        Ok(self
            .workspaces
            .get(view.workspace_id())
            .is_some_and(|workspace| {
                workspace
                    .out_edges
                    .get(rel.declaring())
                    .is_some_and(|edges| edges.contains(rel))
            }))
    }

    fn mark_deselected(&self, view: &ViewParams, node: &ProjectVersionRef) -> Result<()> {
        self.ensure_open()?;
        let mut workspace = self
            .workspaces
            .entry(view.workspace_id().to_string())
            .or_default();
        workspace
            .deselected
            .insert((Self::view_key(view), node.clone()));
        Ok(())
    }

    fn supports(&self, capability: StorageCapability) -> bool {
        matches!(
            capability,
            StorageCapability::CycleRecording | StorageCapability::Deselection
        )
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_engine::domain::{ArtifactRef, DependencyScope};
    use std::collections::BTreeSet as ExcludeSet;

    fn pvr(artifact: &str) -> ProjectVersionRef {
        ProjectVersionRef::parse("org.mem", artifact, "1.0").unwrap()
    }

    fn dep(declaring: &ProjectVersionRef, target: &ProjectVersionRef) -> ProjectRelationship {
        ProjectRelationship::dependency(
            "src",
            None,
            declaring.clone(),
            ArtifactRef::jar(target.clone()),
            DependencyScope::Compile,
            0,
            false,
            false,
            false,
            ExcludeSet::new(),
        )
    }

    fn parent(declaring: &ProjectVersionRef, target: &ProjectVersionRef) -> ProjectRelationship {
        ProjectRelationship::parent("src", declaring.clone(), target.clone(), 0, false)
    }

    #[test]
    fn test_out_edges_preserve_insertion_order() {
        let storage = MemoryStorage::new();
        let root = pvr("root");
        let edges = [dep(&root, &pvr("b")), dep(&root, &pvr("a"))];
        storage.add_relationships("ws", &edges).unwrap();

        let view = ViewParams::new("ws", [root.clone()]);
        let fetched = storage.get_out_edges(&view, &root).unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].target_project(), &pvr("b"));
        assert_eq!(fetched[1].target_project(), &pvr("a"));
    }

    #[test]
    fn test_duplicate_relationships_collapse() {
        let storage = MemoryStorage::new();
        let root = pvr("root");
        let edge = dep(&root, &pvr("a"));
        storage
            .add_relationships("ws", &[edge.clone(), edge.clone()])
            .unwrap();
        let view = ViewParams::new("ws", [root.clone()]);
        assert_eq!(storage.get_out_edges(&view, &root).unwrap().len(), 1);
    }

    #[test]
    fn test_cyclic_parent_chain_is_rejected() {
        let storage = MemoryStorage::new();
        let child = pvr("child");
        let middle = pvr("parent");
        let grand = pvr("grandparent");
        storage
            .add_relationships(
                "ws",
                &[parent(&child, &middle), parent(&middle, &grand)],
            )
            .unwrap();

        // parent -> child would close the ancestry loop
        let closing = parent(&middle, &child);
        let rejected = storage.add_relationships("ws", &[closing.clone()]).unwrap();
        assert_eq!(rejected, vec![closing]);

        // and no cycle was recorded for it
        let view = ViewParams::new("ws", [child]);
        assert!(storage.get_cycles(&view).unwrap().is_empty());
    }

    #[test]
    fn test_dependency_cycles_are_accepted() {
        let storage = MemoryStorage::new();
        let a = pvr("a");
        let b = pvr("b");
        let rejected = storage
            .add_relationships("ws", &[dep(&a, &b), dep(&b, &a)])
            .unwrap();
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_terminal_parent_is_never_rejected() {
        let storage = MemoryStorage::new();
        let node = pvr("standalone");
        let rejected = storage
            .add_relationships("ws", &[parent(&node, &node)])
            .unwrap();
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_add_cycle_deduplicates_by_key() {
        let storage = MemoryStorage::new();
        let a = pvr("a");
        let b = pvr("b");
        let cycle = EProjectCycle::new(vec![dep(&a, &b), dep(&b, &a)]).unwrap();
        storage.add_cycle("ws", &cycle).unwrap();
        storage.add_cycle("ws", &cycle).unwrap();
        let view = ViewParams::new("ws", [a]);
        assert_eq!(storage.get_cycles(&view).unwrap().len(), 1);
    }

    #[test]
    fn test_workspaces_are_isolated() {
        let storage = MemoryStorage::new();
        let root = pvr("root");
        storage
            .add_relationships("ws-1", &[dep(&root, &pvr("a"))])
            .unwrap();
        let other_view = ViewParams::new("ws-2", [root.clone()]);
        assert!(storage.get_out_edges(&other_view, &root).unwrap().is_empty());
        assert!(!storage.contains_project(&other_view, &root).unwrap());
    }

    #[test]
    fn test_contains_relationship_and_project() {
        let storage = MemoryStorage::new();
        let root = pvr("root");
        let a = pvr("a");
        let edge = dep(&root, &a);
        storage.add_relationships("ws", &[edge.clone()]).unwrap();
        let view = ViewParams::new("ws", [root.clone()]);

        assert!(storage.contains_project(&view, &root).unwrap());
        assert!(storage.contains_project(&view, &a).unwrap());
        assert!(storage.contains_relationship(&view, &edge).unwrap());
        assert!(!storage
            .contains_relationship(&view, &dep(&root, &pvr("other")))
            .unwrap());
    }

    #[test]
    fn test_mark_deselected_withholds_edges_per_view() {
        let storage = MemoryStorage::new();
        let root = pvr("root");
        let a = pvr("a");
        storage.add_relationships("ws", &[dep(&root, &a)]).unwrap();

        let view = ViewParams::new("ws", [root.clone()]);
        storage.mark_deselected(&view, &a).unwrap();
        assert!(storage.get_out_edges(&view, &root).unwrap().is_empty());

        // a view with different selections still sees the edge
        let other = view
            .with_selection(
                crate::graph_engine::domain::ProjectRef::new("org.mem", "unrelated").unwrap(),
                pvr("unrelated"),
            )
            .unwrap();
        assert_eq!(storage.get_out_edges(&other, &root).unwrap().len(), 1);
    }

    #[test]
    fn test_use_after_close_is_driver_error() {
        let storage = MemoryStorage::new();
        storage.close().unwrap();
        let view = ViewParams::new("ws", [pvr("root")]);
        let result = storage.get_all_projects(&view);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("after close"));
    }

    #[test]
    fn test_supports_advertised_capabilities() {
        let storage = MemoryStorage::new();
        assert!(storage.supports(StorageCapability::CycleRecording));
        assert!(storage.supports(StorageCapability::Deselection));
    }
}
