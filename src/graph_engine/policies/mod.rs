/// Policies: pure business rules with no I/O dependencies.
///
/// The filter algebra and the scope-transitivity rules live here; both
/// operate only on domain objects.
pub mod filter;
pub mod scope;

pub use filter::{DependencyFilterSpec, RelationshipFilter};
pub use scope::ScopeTransitivity;
