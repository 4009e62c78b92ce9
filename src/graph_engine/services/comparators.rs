use crate::graph_engine::domain::ProjectRelationship;
use std::cmp::Ordering;

/// Deterministic total order over relationships, used to sort the
/// out-edges of every node before expansion.
///
/// Primary key: the declaring node's natural order; secondary:
/// relationship-kind precedence (`Parent < Extension < Dependency <
/// Plugin < PluginDependency < Bom`); tertiary: declaration index.
pub struct RelationshipComparator;

impl RelationshipComparator {
    pub fn compare(a: &ProjectRelationship, b: &ProjectRelationship) -> Ordering {
        a.declaring()
            .cmp(b.declaring())
            .then_with(|| a.kind().cmp(&b.kind()))
            .then_with(|| a.index().cmp(&b.index()))
    }

    /// Sorts a batch of out-edges in place
    pub fn sort(edges: &mut [ProjectRelationship]) {
        edges.sort_by(Self::compare);
    }
}

/// Deterministic total order over relationship paths, applied to each
/// breadth-first layer before descent.
///
/// Shorter paths first; at equal length, element-wise
/// `RelationshipComparator` order decides, which makes parent-derived
/// paths sort ahead of direct paths at equal depth. This is what gives
/// "first writer wins" resolution built on BFS a stable meaning.
pub struct RelationshipPathComparator;

impl RelationshipPathComparator {
    pub fn compare(a: &[ProjectRelationship], b: &[ProjectRelationship]) -> Ordering {
        a.len().cmp(&b.len()).then_with(|| {
            for (edge_a, edge_b) in a.iter().zip(b.iter()) {
                let ordering = RelationshipComparator::compare(edge_a, edge_b);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        })
    }
}
