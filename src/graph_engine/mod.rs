/// The relationship-graph bounded context: domain model, filter/scope
/// policies and the traversal services built on them.
pub mod domain;
pub mod policies;
pub mod services;
