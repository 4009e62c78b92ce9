use crate::graph_engine::domain::ViewParams;
use crate::ports::outbound::graph_storage::GraphStorageConnection;
use crate::shared::Result;

/// GraphExporter port for rendering the subgraph reachable under a view
/// into an external wire form.
///
/// Exporters are read-only collaborators: they need nothing beyond the
/// relationship/identity data model and a storage connection to walk.
pub trait GraphExporter {
    /// Serializes every relationship reachable from the view's roots
    /// under its filter and selections.
    fn export<S: GraphStorageConnection>(&self, view: &ViewParams, storage: &S)
        -> Result<String>;
}
