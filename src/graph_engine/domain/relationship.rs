use crate::graph_engine::domain::project_ref::{ArtifactRef, ProjectRef, ProjectVersionRef};
use crate::graph_engine::domain::scope::DependencyScope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Sentinel location for relationships declared at the root of a POM,
/// rather than in a profile or other nested location
pub const POM_ROOT_URI: &str = "pom:root";

/// Discriminant for the six relationship kinds.
///
/// Declaration order doubles as traversal tie-break precedence:
/// `Parent < Extension < Dependency < Plugin < PluginDependency < Bom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationshipKind {
    Parent,
    Extension,
    Dependency,
    Plugin,
    PluginDependency,
    Bom,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RelationshipKind::Parent => "parent",
            RelationshipKind::Extension => "extension",
            RelationshipKind::Dependency => "dependency",
            RelationshipKind::Plugin => "plugin",
            RelationshipKind::PluginDependency => "plugin-dependency",
            RelationshipKind::Bom => "bom",
        };
        write!(f, "{}", label)
    }
}

/// Variant-specific payload of a relationship. A closed sum, so every
/// consumer branching on relationship type is checked exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipVariant {
    Parent,
    Dependency {
        scope: DependencyScope,
        optional: bool,
        excludes: BTreeSet<ProjectRef>,
    },
    Extension,
    Plugin {
        reporting: bool,
    },
    PluginDependency {
        plugin: ProjectRef,
    },
    Bom {
        mixin: bool,
    },
}

impl RelationshipVariant {
    pub fn kind(&self) -> RelationshipKind {
        match self {
            RelationshipVariant::Parent => RelationshipKind::Parent,
            RelationshipVariant::Dependency { .. } => RelationshipKind::Dependency,
            RelationshipVariant::Extension => RelationshipKind::Extension,
            RelationshipVariant::Plugin { .. } => RelationshipKind::Plugin,
            RelationshipVariant::PluginDependency { .. } => RelationshipKind::PluginDependency,
            RelationshipVariant::Bom { .. } => RelationshipKind::Bom,
        }
    }
}

/// What a relationship points at: a bare project version (parent, BOM) or
/// a full artifact coordinate (dependency, plugin dependency).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipTarget {
    Project(ProjectVersionRef),
    Artifact(ArtifactRef),
}

impl RelationshipTarget {
    /// The project-version coordinate of the target, regardless of form
    pub fn project_version(&self) -> &ProjectVersionRef {
        match self {
            RelationshipTarget::Project(pvr) => pvr,
            RelationshipTarget::Artifact(artifact) => artifact.project_version(),
        }
    }

    /// Rewrites the target's project version, preserving artifact
    /// type/classifier where present. Used for read-time selection
    /// substitution; stored relationships are never rewritten in place.
    pub fn with_project_version(&self, pvr: ProjectVersionRef) -> Self {
        match self {
            RelationshipTarget::Project(_) => RelationshipTarget::Project(pvr),
            RelationshipTarget::Artifact(artifact) => {
                RelationshipTarget::Artifact(artifact.with_project_version(pvr))
            }
        }
    }
}

impl fmt::Display for RelationshipTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipTarget::Project(pvr) => write!(f, "{}", pvr),
            RelationshipTarget::Artifact(artifact) => write!(f, "{}", artifact),
        }
    }
}

/// A directed, typed edge from a declaring project to a target.
///
/// Identity excludes provenance: two relationships declared identically
/// from different POM sources are the same edge for graph purposes, so
/// `source` and `inherited` take no part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRelationship {
    source: String,
    pom_location: String,
    declaring: ProjectVersionRef,
    target: RelationshipTarget,
    index: u32,
    managed: bool,
    inherited: bool,
    variant: RelationshipVariant,
}

impl ProjectRelationship {
    #[allow(clippy::too_many_arguments)]
    fn build(
        source: impl Into<String>,
        pom_location: Option<&str>,
        declaring: ProjectVersionRef,
        target: RelationshipTarget,
        index: u32,
        managed: bool,
        inherited: bool,
        variant: RelationshipVariant,
    ) -> Self {
        let pom_location = match pom_location {
            Some(loc) if !loc.trim().is_empty() => loc.to_string(),
            _ => POM_ROOT_URI.to_string(),
        };
        Self {
            source: source.into(),
            pom_location,
            declaring,
            target,
            index,
            managed,
            inherited,
            variant,
        }
    }

    /// A parent edge. A parent edge targeting the declaring coordinate
    /// itself is the terminal marker: "no further ancestor".
    pub fn parent(
        source: impl Into<String>,
        declaring: ProjectVersionRef,
        target: ProjectVersionRef,
        index: u32,
        inherited: bool,
    ) -> Self {
        Self::build(
            source,
            None,
            declaring,
            RelationshipTarget::Project(target),
            index,
            false,
            inherited,
            RelationshipVariant::Parent,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn dependency(
        source: impl Into<String>,
        pom_location: Option<&str>,
        declaring: ProjectVersionRef,
        target: ArtifactRef,
        scope: DependencyScope,
        index: u32,
        managed: bool,
        inherited: bool,
        optional: bool,
        excludes: BTreeSet<ProjectRef>,
    ) -> Self {
        Self::build(
            source,
            pom_location,
            declaring,
            RelationshipTarget::Artifact(target),
            index,
            managed,
            inherited,
            RelationshipVariant::Dependency {
                scope,
                optional,
                excludes,
            },
        )
    }

    pub fn extension(
        source: impl Into<String>,
        declaring: ProjectVersionRef,
        target: ProjectVersionRef,
        index: u32,
        inherited: bool,
    ) -> Self {
        Self::build(
            source,
            None,
            declaring,
            RelationshipTarget::Project(target),
            index,
            false,
            inherited,
            RelationshipVariant::Extension,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn plugin(
        source: impl Into<String>,
        pom_location: Option<&str>,
        declaring: ProjectVersionRef,
        target: ProjectVersionRef,
        index: u32,
        managed: bool,
        inherited: bool,
        reporting: bool,
    ) -> Self {
        Self::build(
            source,
            pom_location,
            declaring,
            RelationshipTarget::Project(target),
            index,
            managed,
            inherited,
            RelationshipVariant::Plugin { reporting },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn plugin_dependency(
        source: impl Into<String>,
        pom_location: Option<&str>,
        declaring: ProjectVersionRef,
        plugin: ProjectRef,
        target: ArtifactRef,
        index: u32,
        managed: bool,
        inherited: bool,
    ) -> Self {
        Self::build(
            source,
            pom_location,
            declaring,
            RelationshipTarget::Artifact(target),
            index,
            managed,
            inherited,
            RelationshipVariant::PluginDependency { plugin },
        )
    }

    pub fn bom(
        source: impl Into<String>,
        pom_location: Option<&str>,
        declaring: ProjectVersionRef,
        target: ProjectVersionRef,
        index: u32,
        inherited: bool,
        mixin: bool,
    ) -> Self {
        Self::build(
            source,
            pom_location,
            declaring,
            RelationshipTarget::Project(target),
            index,
            false,
            inherited,
            RelationshipVariant::Bom { mixin },
        )
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pom_location(&self) -> &str {
        &self.pom_location
    }

    pub fn declaring(&self) -> &ProjectVersionRef {
        &self.declaring
    }

    pub fn target(&self) -> &RelationshipTarget {
        &self.target
    }

    /// The project-version coordinate the edge points at
    pub fn target_project(&self) -> &ProjectVersionRef {
        self.target.project_version()
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_managed(&self) -> bool {
        self.managed
    }

    pub fn is_inherited(&self) -> bool {
        self.inherited
    }

    pub fn variant(&self) -> &RelationshipVariant {
        &self.variant
    }

    pub fn kind(&self) -> RelationshipKind {
        self.variant.kind()
    }

    /// True for the self-referential parent edge that marks the end of an
    /// ancestry chain. Terminal edges are never expanded by traversal.
    pub fn is_terminal_parent(&self) -> bool {
        self.kind() == RelationshipKind::Parent && &self.declaring == self.target_project()
    }

    /// Returns a copy of this edge whose target project version has been
    /// substituted, for per-view selection resolution.
    pub fn with_target_version(&self, version_ref: ProjectVersionRef) -> Self {
        let mut resolved = self.clone();
        resolved.target = self.target.with_project_version(version_ref);
        resolved
    }

    /// Deterministic human-readable form for diagnostics and cycle keys
    pub fn render(&self) -> String {
        match &self.variant {
            RelationshipVariant::Dependency {
                scope, optional, ..
            } => format!(
                "{} --{}({}{}{},idx{})--> {}",
                self.declaring,
                self.kind(),
                scope,
                if self.managed { ",managed" } else { "" },
                if *optional { ",optional" } else { "" },
                self.index,
                self.target,
            ),
            RelationshipVariant::PluginDependency { plugin } => format!(
                "{} --{}(of:{},idx{})--> {}",
                self.declaring,
                self.kind(),
                plugin,
                self.index,
                self.target,
            ),
            _ => format!(
                "{} --{}(idx{})--> {}",
                self.declaring,
                self.kind(),
                self.index,
                self.target,
            ),
        }
    }
}

impl PartialEq for ProjectRelationship {
    fn eq(&self, other: &Self) -> bool {
        self.pom_location == other.pom_location
            && self.declaring == other.declaring
            && self.target == other.target
            && self.index == other.index
            && self.managed == other.managed
            && self.variant == other.variant
    }
}

impl Eq for ProjectRelationship {}

impl Hash for ProjectRelationship {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pom_location.hash(state);
        self.declaring.hash(state);
        self.target.hash(state);
        self.index.hash(state);
        self.managed.hash(state);
        self.variant.hash(state);
    }
}

impl fmt::Display for ProjectRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pvr(group: &str, artifact: &str, version: &str) -> ProjectVersionRef {
        ProjectVersionRef::parse(group, artifact, version).unwrap()
    }

    fn dep_rel(source: &str, declaring: &ProjectVersionRef, target: &ProjectVersionRef) -> ProjectRelationship {
        ProjectRelationship::dependency(
            source,
            None,
            declaring.clone(),
            ArtifactRef::jar(target.clone()),
            DependencyScope::Compile,
            0,
            false,
            false,
            false,
            BTreeSet::new(),
        )
    }

    #[test]
    fn test_identity_excludes_provenance() {
        let root = pvr("org.test", "root", "1.0");
        let dep = pvr("org.test", "dep-a", "1.0");
        let from_pom_a = dep_rel("http://repo/a.pom", &root, &dep);
        let from_pom_b = dep_rel("http://repo/b.pom", &root, &dep);
        assert_eq!(from_pom_a, from_pom_b);

        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(from_pom_a);
        assert!(set.contains(&from_pom_b));
    }

    #[test]
    fn test_identity_includes_index_and_managed() {
        let root = pvr("org.test", "root", "1.0");
        let dep = pvr("org.test", "dep-a", "1.0");
        let a = dep_rel("src", &root, &dep);
        let mut b = dep_rel("src", &root, &dep);
        b.index = 1;
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_precedence_order() {
        assert!(RelationshipKind::Parent < RelationshipKind::Extension);
        assert!(RelationshipKind::Extension < RelationshipKind::Dependency);
        assert!(RelationshipKind::Dependency < RelationshipKind::Plugin);
        assert!(RelationshipKind::Plugin < RelationshipKind::PluginDependency);
        assert!(RelationshipKind::PluginDependency < RelationshipKind::Bom);
    }

    #[test]
    fn test_terminal_parent_detection() {
        let node = pvr("org.test", "standalone", "1.0");
        let terminal = ProjectRelationship::parent("src", node.clone(), node.clone(), 0, false);
        assert!(terminal.is_terminal_parent());

        let parent = pvr("org.test", "parent", "2.0");
        let real = ProjectRelationship::parent("src", node, parent, 0, false);
        assert!(!real.is_terminal_parent());
    }

    #[test]
    fn test_pom_location_defaults_to_root_sentinel() {
        let root = pvr("org.test", "root", "1.0");
        let dep = pvr("org.test", "dep-a", "1.0");
        let rel = dep_rel("src", &root, &dep);
        assert_eq!(rel.pom_location(), POM_ROOT_URI);
    }

    #[test]
    fn test_target_substitution_keeps_artifact_details() {
        let root = pvr("org.test", "root", "1.0");
        let ranged = pvr("org.x", "dep", "[1.0,2.0)");
        let rel = ProjectRelationship::dependency(
            "src",
            None,
            root,
            ArtifactRef::new(ranged.clone(), Some("war"), Some("classes"), false),
            DependencyScope::Runtime,
            3,
            false,
            false,
            false,
            BTreeSet::new(),
        );
        let pinned = ranged.with_version(crate::graph_engine::domain::VersionSpec::parse("1.5").unwrap());
        let resolved = rel.with_target_version(pinned.clone());
        assert_eq!(resolved.target_project(), &pinned);
        match resolved.target() {
            RelationshipTarget::Artifact(artifact) => {
                assert_eq!(artifact.artifact_type(), "war");
                assert_eq!(artifact.classifier(), Some("classes"));
            }
            RelationshipTarget::Project(_) => panic!("expected artifact target"),
        }
        // the original edge is untouched
        assert!(rel.target_project().is_variable_version());
    }

    #[test]
    fn test_render_is_deterministic() {
        let root = pvr("org.test", "root", "1.0");
        let dep = pvr("org.test", "dep-a", "1.0");
        let rel = dep_rel("src", &root, &dep);
        assert_eq!(rel.render(), rel.render());
        assert!(rel.render().contains("org.test:root:1.0"));
        assert!(rel.render().contains("dependency"));
    }
}
