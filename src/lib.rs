//! mvn-graph - cycle-tolerant relationship graph engine for Maven-style artifacts
//!
//! This library models the declared relationships between build artifacts
//! (parents, dependencies, plugins, BOMs) as a directed multigraph, and
//! answers transitive questions about it through filtered, deterministic,
//! cycle-tolerant traversals. Graphs are read through immutable views
//! that scope a workspace, a root set, a relationship filter and per-view
//! version selections.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`graph_engine`): Coordinates, relationships,
//!   version specs, cycles, filters and the traversal engine
//! - **Application Layer** (`application`): Ready-made traversals and
//!   subgraph query use cases
//! - **Ports** (`ports`): Interface definitions for storage, seen
//!   tracking and export
//! - **Adapters** (`adapters`): In-memory storage, seen trackers, JSON
//!   export
//! - **Shared** (`shared`): Common error and result types
//!
//! # Example
//!
//! ```no_run
//! use mvn_graph::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let storage = MemoryStorage::new();
//! let root = ProjectVersionRef::parse("org.example", "app", "1.0")?;
//!
//! // Store discovered relationships, then query through a view
//! let rejected = storage.add_relationships("my-workspace", &[])?;
//! assert!(rejected.is_empty());
//!
//! let mut walk = TransitiveDependencyTraversal::new(DependencyScope::Runtime);
//! let view = ViewParams::new("my-workspace", [root.clone()])
//!     .with_filter(walk.view_filter());
//!
//! let engine = GraphTraversal::new(&view, &storage, Arc::new(MemorySeenTracker::new()));
//! engine.traverse(&mut walk, &root)?;
//!
//! for artifact in walk.artifacts() {
//!     println!("{}", artifact);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod graph_engine;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::json::JsonExporter;
    pub use crate::adapters::outbound::memory::MemoryStorage;
    pub use crate::adapters::outbound::tracking::{FileSeenTracker, MemorySeenTracker};
    pub use crate::application::traversals::{
        AncestryTraversal, BuildOrderTraversal, TransitiveDependencyTraversal,
    };
    pub use crate::application::use_cases::SubgraphQueryUseCase;
    pub use crate::graph_engine::domain::{
        ArtifactRef, DependencyScope, EProjectCycle, ProjectRef, ProjectRelationship,
        ProjectVersionRef, RelationshipKind, RelationshipTarget, RelationshipVariant, VersionSpec,
        ViewParams,
    };
    pub use crate::graph_engine::policies::{
        DependencyFilterSpec, RelationshipFilter, ScopeTransitivity,
    };
    pub use crate::graph_engine::services::{
        GraphTraversal, TraversalType, TraversalVisitor,
    };
    pub use crate::ports::outbound::{
        GraphExporter, GraphStorageConnection, SeenTracker, StorageCapability,
    };
    pub use crate::shared::{GraphError, Result};
}
