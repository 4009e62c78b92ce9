mod ancestry;
mod build_order;
mod transitive_dependency;

pub use ancestry::AncestryTraversal;
pub use build_order::BuildOrderTraversal;
pub use transitive_dependency::TransitiveDependencyTraversal;
