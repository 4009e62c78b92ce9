/// Domain layer: identity, relationship and view value types.
///
/// Everything here is immutable once constructed and carries full value
/// semantics; relationships are created by metadata parsing (out of
/// scope), added to storage in batches, and never edited.
pub mod cycle;
pub mod path;
pub mod project_ref;
pub mod relationship;
pub mod scope;
pub mod version_spec;
pub mod view;

pub use cycle::EProjectCycle;
pub use path::GraphPath;
pub use project_ref::{ArtifactRef, ProjectRef, ProjectVersionRef};
pub use relationship::{
    ProjectRelationship, RelationshipKind, RelationshipTarget, RelationshipVariant, POM_ROOT_URI,
};
pub use scope::DependencyScope;
pub use version_spec::{RangeSpec, SingleVersion, VersionSpec};
pub use view::ViewParams;
