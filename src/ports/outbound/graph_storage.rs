use crate::graph_engine::domain::{
    EProjectCycle, ProjectRelationship, ProjectVersionRef, ViewParams,
};
use crate::shared::Result;

/// Optional operations a storage backend may or may not support
/// efficiently. Backends advertise support up front instead of throwing
/// "not implemented" at call time; callers consult `supports` before
/// relying on an optional operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageCapability {
    /// Recording relationship cycles discovered during traversal
    CycleRecording,
    /// Marking nodes deselected for a specific view
    Deselection,
}

/// GraphStorageConnection port for the physical relationship store.
///
/// Any backend (embedded graph database, in-memory adjacency map, flat
/// file) implements this. Backends must guarantee that `get_out_edges`
/// ordering is stable within a single storage snapshot; the engine
/// applies its own deterministic sort on top.
///
/// Reads take the querying view for workspace scoping and deselection
/// state, but backends never apply the view's relationship filter; edge
/// filtering is the traversal engine's job.
pub trait GraphStorageConnection {
    /// All relationships declared by `node`, in stable order. A node with
    /// no recorded relationships yields an empty list, which the view
    /// overlay reports as an incomplete subgraph rather than an error.
    fn get_out_edges(
        &self,
        view: &ViewParams,
        node: &ProjectVersionRef,
    ) -> Result<Vec<ProjectRelationship>>;

    /// Every project-version node known to the workspace, declaring or
    /// declared
    fn get_all_projects(&self, view: &ViewParams) -> Result<Vec<ProjectVersionRef>>;

    /// Stores a batch of relationships and returns the subset that was
    /// rejected for introducing a cycle. Rejection is data, not an
    /// error: the caller decides whether a rejected edge is a problem.
    fn add_relationships(
        &self,
        workspace_id: &str,
        relationships: &[ProjectRelationship],
    ) -> Result<Vec<ProjectRelationship>>;

    /// Records a cycle discovered during traversal. Duplicate cycles
    /// (same key) collapse to one record.
    fn add_cycle(&self, workspace_id: &str, cycle: &EProjectCycle) -> Result<()>;

    /// Cycles currently recorded for the view's workspace
    fn get_cycles(&self, view: &ViewParams) -> Result<Vec<EProjectCycle>>;

    fn contains_project(&self, view: &ViewParams, node: &ProjectVersionRef) -> Result<bool>;

    fn contains_relationship(
        &self,
        view: &ViewParams,
        rel: &ProjectRelationship,
    ) -> Result<bool>;

    /// Marks a node deselected for the given view; its incoming edges are
    /// withheld from subsequent `get_out_edges` answers to that view.
    fn mark_deselected(&self, view: &ViewParams, node: &ProjectVersionRef) -> Result<()>;

    /// Whether this backend supports an optional operation
    fn supports(&self, capability: StorageCapability) -> bool;

    /// Releases any underlying resources. Reads after close are a driver
    /// error.
    fn close(&self) -> Result<()>;
}
