use crate::graph_engine::domain::{EProjectCycle, GraphPath};
use crate::graph_engine::policies::RelationshipFilter;

/// Pure key-derivation and cycle-liveness rules shared by all traversals.
///
/// No I/O here; the seen-tracker adapters store the keys this service
/// derives.
pub struct CycleTracking;

impl CycleTracking {
    /// Structural seen-key for a candidate path under an active filter.
    ///
    /// When the path itself contains a repeated node (a true cycle), the
    /// key covers only the cycle suffix, from the first repetition
    /// onward: re-entering the same cycle through a different prefix must
    /// hit the same key. The filter identity is appended because a filter
    /// change can make a previously-irrelevant cycle newly relevant; two
    /// filters traverse the same cycle independently.
    pub fn seen_key(path: &GraphPath, filter_key: &str) -> String {
        // paths grow one edge at a time, so a repeated node can only be
        // the tail re-entering its own first occurrence
        let nodes = path.to_vec();
        let suffix_start = match path.first_index_of(path.last()) {
            Some(first) if first + 1 < nodes.len() => first,
            _ => 0,
        };
        let keyed: Vec<String> = nodes[suffix_start..]
            .iter()
            .map(|n| n.to_string())
            .collect();
        format!("{}#{}", keyed.join("|"), filter_key)
    }

    /// Drops every cycle with a member edge the active filter excludes.
    /// A cycle is only real while all of its edges remain reachable in
    /// the filtered subgraph.
    pub fn retain_live_cycles(cycles: &mut Vec<EProjectCycle>, filter: &RelationshipFilter) {
        cycles.retain(|cycle| cycle.iter().all(|rel| filter.accept(rel)));
    }
}
