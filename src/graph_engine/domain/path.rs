use crate::graph_engine::domain::project_ref::ProjectVersionRef;
use std::fmt;
use std::sync::Arc;

/// One link in a shared path spine
#[derive(Debug)]
struct PathLink {
    node: ProjectVersionRef,
    prev: Option<Arc<PathLink>>,
    len: usize,
}

/// An immutable, ordered sequence of node references representing one
/// walk from a root.
///
/// Appending produces a new path sharing the entire prefix with its
/// parent (an Arc-linked spine), so forked traversal branches never copy
/// or mutate each other's history.
#[derive(Debug, Clone)]
pub struct GraphPath {
    tail: Arc<PathLink>,
}

impl GraphPath {
    /// A single-node path anchored at a traversal root
    pub fn root(node: ProjectVersionRef) -> Self {
        Self {
            tail: Arc::new(PathLink {
                node,
                prev: None,
                len: 1,
            }),
        }
    }

    /// Extends this path by one node without mutating it.
    pub fn append(&self, node: ProjectVersionRef) -> Self {
        Self {
            tail: Arc::new(PathLink {
                node,
                prev: Some(Arc::clone(&self.tail)),
                len: self.tail.len + 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.tail.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The most recently appended node
    pub fn last(&self) -> &ProjectVersionRef {
        &self.tail.node
    }

    pub fn contains(&self, node: &ProjectVersionRef) -> bool {
        self.iter_back().any(|n| n == node)
    }

    /// Index of the first (root-side) occurrence of a node, if present
    pub fn first_index_of(&self, node: &ProjectVersionRef) -> Option<usize> {
        self.to_vec()
            .iter()
            .position(|candidate| *candidate == node)
    }

    /// Nodes in root-first order
    pub fn to_vec(&self) -> Vec<&ProjectVersionRef> {
        let mut nodes: Vec<&ProjectVersionRef> = self.iter_back().collect();
        nodes.reverse();
        nodes
    }

    /// Walks the spine tail-first (cheap; no allocation)
    fn iter_back(&self) -> PathBackIter<'_> {
        PathBackIter {
            current: Some(&self.tail),
        }
    }

    /// Deterministic key over the node sequence, root-first
    pub fn key(&self) -> String {
        let rendered: Vec<String> = self.to_vec().iter().map(|n| n.to_string()).collect();
        rendered.join("|")
    }
}

struct PathBackIter<'a> {
    current: Option<&'a Arc<PathLink>>,
}

impl<'a> Iterator for PathBackIter<'a> {
    type Item = &'a ProjectVersionRef;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.current?;
        self.current = link.prev.as_ref();
        Some(&link.node)
    }
}

impl PartialEq for GraphPath {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter_back().eq(other.iter_back())
    }
}

impl Eq for GraphPath {}

impl fmt::Display for GraphPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
