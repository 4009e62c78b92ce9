use crate::graph_engine::domain::project_ref::{ProjectRef, ProjectVersionRef};
use crate::graph_engine::policies::filter::RelationshipFilter;
use crate::shared::{GraphError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// An immutable, query-scoped overlay on shared graph storage: a root
/// set, a relationship filter and a map of variable-version selections.
///
/// Views never touch the underlying storage. Changing a selection
/// produces a new `ViewParams`; two views over the same workspace with
/// different selections traverse to different effective node sets with
/// no mutation conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
    workspace_id: String,
    roots: BTreeSet<ProjectVersionRef>,
    filter: Option<RelationshipFilter>,
    selections: BTreeMap<ProjectRef, ProjectVersionRef>,
}

impl ViewParams {
    /// Creates a view over a workspace with the given traversal roots and
    /// no filter (accept everything) and no selections.
    pub fn new(
        workspace_id: impl Into<String>,
        roots: impl IntoIterator<Item = ProjectVersionRef>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            roots: roots.into_iter().collect(),
            filter: None,
            selections: BTreeMap::new(),
        }
    }

    /// Returns a copy of this view with the given relationship filter.
    pub fn with_filter(&self, filter: RelationshipFilter) -> Self {
        let mut view = self.clone();
        view.filter = Some(filter);
        view
    }

    /// Returns a copy of this view that pins `project` to a concrete
    /// version. Fails if the supplied version is not concrete; variable
    /// versions are never silently accepted as selections.
    pub fn with_selection(
        &self,
        project: ProjectRef,
        version: ProjectVersionRef,
    ) -> Result<Self> {
        if !version.version_spec().is_concrete() {
            anyhow::bail!(GraphError::NonConcreteSelection {
                project: project.to_string(),
                version: version.version_spec().to_string(),
            });
        }
        let mut view = self.clone();
        view.selections.insert(project, version);
        Ok(view)
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn roots(&self) -> &BTreeSet<ProjectVersionRef> {
        &self.roots
    }

    pub fn filter(&self) -> Option<&RelationshipFilter> {
        self.filter.as_ref()
    }

    /// The filter actually applied at traversal roots; an unfiltered view
    /// accepts every relationship.
    pub fn effective_filter(&self) -> RelationshipFilter {
        self.filter.clone().unwrap_or(RelationshipFilter::Any)
    }

    pub fn selections(&self) -> &BTreeMap<ProjectRef, ProjectVersionRef> {
        &self.selections
    }

    /// The concrete version pinned for a project in this view, if any
    pub fn selection_for(&self, project: &ProjectRef) -> Option<&ProjectVersionRef> {
        self.selections.get(project)
    }
}
