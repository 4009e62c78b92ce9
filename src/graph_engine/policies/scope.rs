use crate::graph_engine::domain::DependencyScope;
use serde::{Deserialize, Serialize};

/// Policy for how a dependency scope propagates one hop down a
/// dependency edge.
///
/// This is the mechanism behind Maven's transitive scope-narrowing rule:
/// a runtime filter at the root becomes compile-or-runtime one hop in,
/// and provided/system dependencies contribute nothing transitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeTransitivity {
    /// Maven semantics: provided and system do not propagate; embedded
    /// and toolchain propagate as-is; everything else propagates as
    /// runtime.
    Maven,
    /// Scope propagates unchanged.
    All,
}

impl ScopeTransitivity {
    /// The scope visible one hop below an edge declared with `scope`,
    /// or None when nothing propagates.
    pub fn child_scope(self, scope: DependencyScope) -> Option<DependencyScope> {
        match self {
            ScopeTransitivity::All => Some(scope),
            ScopeTransitivity::Maven => match scope {
                DependencyScope::Provided | DependencyScope::System => None,
                DependencyScope::Embedded | DependencyScope::Toolchain => Some(scope),
                _ => Some(DependencyScope::Runtime),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maven_provided_and_system_do_not_propagate() {
        assert_eq!(
            ScopeTransitivity::Maven.child_scope(DependencyScope::Provided),
            None
        );
        assert_eq!(
            ScopeTransitivity::Maven.child_scope(DependencyScope::System),
            None
        );
    }

    #[test]
    fn test_maven_embedded_and_toolchain_propagate_as_is() {
        assert_eq!(
            ScopeTransitivity::Maven.child_scope(DependencyScope::Embedded),
            Some(DependencyScope::Embedded)
        );
        assert_eq!(
            ScopeTransitivity::Maven.child_scope(DependencyScope::Toolchain),
            Some(DependencyScope::Toolchain)
        );
    }

    #[test]
    fn test_maven_everything_else_becomes_runtime() {
        for scope in [
            DependencyScope::Compile,
            DependencyScope::Runtime,
            DependencyScope::Test,
            DependencyScope::Import,
        ] {
            assert_eq!(
                ScopeTransitivity::Maven.child_scope(scope),
                Some(DependencyScope::Runtime)
            );
        }
    }

    #[test]
    fn test_all_propagates_unchanged() {
        assert_eq!(
            ScopeTransitivity::All.child_scope(DependencyScope::Provided),
            Some(DependencyScope::Provided)
        );
        assert_eq!(
            ScopeTransitivity::All.child_scope(DependencyScope::Test),
            Some(DependencyScope::Test)
        );
    }
}
