use crate::graph_engine::domain::{
    DependencyScope, ProjectRef, ProjectRelationship, RelationshipKind, RelationshipVariant,
};
use crate::graph_engine::policies::scope::ScopeTransitivity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration of a dependency filter: the scope it asks for, how that
/// scope narrows while descending, the managed/concrete axes and the
/// accumulated exclusion set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyFilterSpec {
    pub scope: DependencyScope,
    pub transitivity: ScopeTransitivity,
    pub include_managed: bool,
    pub include_concrete: bool,
    pub excludes: BTreeSet<ProjectRef>,
}

impl DependencyFilterSpec {
    /// Concrete dependencies at the given scope, maven transitivity, no
    /// exclusions.
    pub fn scoped(scope: DependencyScope) -> Self {
        Self {
            scope,
            transitivity: ScopeTransitivity::Maven,
            include_managed: false,
            include_concrete: true,
            excludes: BTreeSet::new(),
        }
    }

    fn matches_axes(&self, managed: bool) -> bool {
        if managed {
            self.include_managed
        } else {
            self.include_concrete
        }
    }
}

/// Composable predicate over relationships, represented as an algebraic
/// tree rather than a virtual-dispatch hierarchy: `child_filter` is a
/// pure tree transform, and the algebra is closed under it (deriving the
/// child of an `And`/`Or` yields the same combinator over the members'
/// children).
///
/// Callers must check `accept` before descending through an edge;
/// `child_filter` on a rejected edge is defined but not meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipFilter {
    /// Accepts every relationship
    Any,
    /// Accepts nothing
    None,
    /// Accepts a single relationship kind, with managed/concrete axes
    Kind {
        kind: RelationshipKind,
        include_managed: bool,
        include_concrete: bool,
    },
    /// Accepts dependency edges whose scope is implied by the configured
    /// scope and whose target is not excluded
    Dependency(DependencyFilterSpec),
    /// Accepts extension edges; descends into runtime dependencies and
    /// parents
    Extension,
    /// Accepts plugin-dependency edges declared by one specific plugin
    PluginDependency { plugin: ProjectRef },
    /// Accepts parent edges; terminal parent edges only when asked
    Parent { include_terminus: bool },
    And(Vec<RelationshipFilter>),
    Or(Vec<RelationshipFilter>),
}

impl RelationshipFilter {
    /// Concrete runtime dependencies plus the ancestry needed to reach
    /// inherited declarations; the usual entry point for transitive
    /// dependency queries.
    pub fn dependencies(scope: DependencyScope) -> Self {
        RelationshipFilter::Or(vec![
            RelationshipFilter::Dependency(DependencyFilterSpec::scoped(scope)),
            RelationshipFilter::Parent {
                include_terminus: false,
            },
        ])
    }

    /// Whether this filter lets the relationship into the traversal.
    pub fn accept(&self, rel: &ProjectRelationship) -> bool {
        match self {
            RelationshipFilter::Any => true,
            RelationshipFilter::None => false,
            RelationshipFilter::Kind {
                kind,
                include_managed,
                include_concrete,
            } => {
                rel.kind() == *kind
                    && if rel.is_managed() {
                        *include_managed
                    } else {
                        *include_concrete
                    }
            }
            RelationshipFilter::Dependency(spec) => match rel.variant() {
                RelationshipVariant::Dependency { scope, .. } => {
                    spec.scope.implies(*scope)
                        && spec.matches_axes(rel.is_managed())
                        && !spec.excludes.contains(rel.target_project().project_ref())
                }
                _ => false,
            },
            RelationshipFilter::Extension => rel.kind() == RelationshipKind::Extension,
            RelationshipFilter::PluginDependency { plugin } => match rel.variant() {
                RelationshipVariant::PluginDependency { plugin: declared } => declared == plugin,
                _ => false,
            },
            RelationshipFilter::Parent { include_terminus } => {
                rel.kind() == RelationshipKind::Parent
                    && (*include_terminus || !rel.is_terminal_parent())
            }
            RelationshipFilter::And(members) => members.iter().all(|f| f.accept(rel)),
            RelationshipFilter::Or(members) => members.iter().any(|f| f.accept(rel)),
        }
    }

    /// The filter governing the next hop after descending through `rel`.
    ///
    /// Dependency filters narrow their scope through the configured
    /// transitivity policy and merge the traversed edge's exclusions into
    /// their own; combinators rebuild themselves over their members'
    /// derived children.
    pub fn child_filter(&self, rel: &ProjectRelationship) -> RelationshipFilter {
        match self {
            RelationshipFilter::Any => RelationshipFilter::Any,
            RelationshipFilter::None => RelationshipFilter::None,
            RelationshipFilter::Kind { .. } => self.clone(),
            RelationshipFilter::Dependency(spec) => match rel.variant() {
                RelationshipVariant::Dependency {
                    scope: edge_scope,
                    excludes: edge_excludes,
                    ..
                } => match spec.transitivity.child_scope(*edge_scope) {
                    Some(child_scope) => {
                        let mut excludes = spec.excludes.clone();
                        excludes.extend(edge_excludes.iter().cloned());
                        RelationshipFilter::Dependency(DependencyFilterSpec {
                            scope: child_scope,
                            transitivity: spec.transitivity,
                            include_managed: spec.include_managed,
                            include_concrete: spec.include_concrete,
                            excludes,
                        })
                    }
                    None => RelationshipFilter::None,
                },
                _ => self.clone(),
            },
            RelationshipFilter::Extension => RelationshipFilter::Or(vec![
                RelationshipFilter::Dependency(DependencyFilterSpec::scoped(
                    DependencyScope::Runtime,
                )),
                RelationshipFilter::Parent {
                    include_terminus: false,
                },
            ]),
            RelationshipFilter::PluginDependency { .. } => RelationshipFilter::Dependency(
                DependencyFilterSpec::scoped(DependencyScope::Runtime),
            ),
            RelationshipFilter::Parent { .. } => self.clone(),
            RelationshipFilter::And(members) => {
                RelationshipFilter::And(members.iter().map(|f| f.child_filter(rel)).collect())
            }
            RelationshipFilter::Or(members) => {
                RelationshipFilter::Or(members.iter().map(|f| f.child_filter(rel)).collect())
            }
        }
    }

    /// Deterministic human-readable form. Used for diagnostics and as the
    /// filter identity key in seen-tracking; never consulted for matching.
    pub fn render(&self) -> String {
        match self {
            RelationshipFilter::Any => "any".to_string(),
            RelationshipFilter::None => "none".to_string(),
            RelationshipFilter::Kind {
                kind,
                include_managed,
                include_concrete,
            } => format!(
                "type[kind:{},managed:{},concrete:{}]",
                kind, include_managed, include_concrete
            ),
            RelationshipFilter::Dependency(spec) => {
                let excludes: Vec<String> =
                    spec.excludes.iter().map(|p| p.to_string()).collect();
                format!(
                    "dependency[scope:{},transitivity:{},managed:{},concrete:{},excludes:{{{}}}]",
                    spec.scope,
                    match spec.transitivity {
                        ScopeTransitivity::Maven => "maven",
                        ScopeTransitivity::All => "all",
                    },
                    spec.include_managed,
                    spec.include_concrete,
                    excludes.join(",")
                )
            }
            RelationshipFilter::Extension => "extension".to_string(),
            RelationshipFilter::PluginDependency { plugin } => {
                format!("plugin-dependency[plugin:{}]", plugin)
            }
            RelationshipFilter::Parent { include_terminus } => {
                format!("parent[terminus:{}]", include_terminus)
            }
            RelationshipFilter::And(members) => {
                let rendered: Vec<String> = members.iter().map(|f| f.render()).collect();
                format!("and({})", rendered.join(","))
            }
            RelationshipFilter::Or(members) => {
                let rendered: Vec<String> = members.iter().map(|f| f.render()).collect();
                format!("or({})", rendered.join(","))
            }
        }
    }

    /// Identity key for seen-tracking: two filters with equal keys track
    /// traversal state interchangeably.
    pub fn identity_key(&self) -> String {
        self.render()
    }
}
