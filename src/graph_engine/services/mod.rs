/// Services: the traversal engine and its pure supporting logic.
pub mod comparators;
pub mod cycle_tracker;
pub mod traversal;

pub use comparators::{RelationshipComparator, RelationshipPathComparator};
pub use cycle_tracker::CycleTracking;
pub use traversal::{GraphTraversal, TraversalType, TraversalVisitor};
