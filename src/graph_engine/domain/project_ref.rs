use crate::graph_engine::domain::version_spec::VersionSpec;
use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Maximum length for a single coordinate segment (security limit)
const MAX_COORDINATE_LENGTH: usize = 255;

/// Validates one coordinate segment (groupId, artifactId, type, classifier)
fn validate_segment(label: &str, value: &str, context: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!(crate::shared::GraphError::InvalidRef {
            reference: context.to_string(),
            reason: format!("{} cannot be empty", label),
        });
    }
    if value.len() > MAX_COORDINATE_LENGTH {
        anyhow::bail!(crate::shared::GraphError::InvalidRef {
            reference: context.to_string(),
            reason: format!(
                "{} is too long ({} bytes). Maximum allowed: {} bytes",
                label,
                value.len(),
                MAX_COORDINATE_LENGTH
            ),
        });
    }
    Ok(())
}

/// A versionless project coordinate: `groupId:artifactId`.
///
/// Value-equal, hashable and totally ordered (groupId first, then
/// artifactId) so it can key selection maps and exclusion sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectRef {
    group_id: String,
    artifact_id: String,
}

impl ProjectRef {
    /// Creates a validated project reference. Empty or oversized
    /// coordinate segments are rejected, never silently coerced.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Result<Self> {
        let group_id = group_id.into();
        let artifact_id = artifact_id.into();
        let context = format!("{}:{}", group_id, artifact_id);
        validate_segment("groupId", &group_id, &context)?;
        validate_segment("artifactId", &artifact_id, &context)?;
        Ok(Self {
            group_id,
            artifact_id,
        })
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// A project coordinate plus a version specification: `groupId:artifactId:version`.
///
/// The version spec may be variable (a range or unresolved snapshot); the
/// view overlay resolves variable versions to concrete ones at query time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectVersionRef {
    project: ProjectRef,
    version: VersionSpec,
}

impl ProjectVersionRef {
    pub fn new(project: ProjectRef, version: VersionSpec) -> Self {
        Self { project, version }
    }

    /// Parses all three coordinate segments, including the version spec.
    pub fn parse(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: &str,
    ) -> Result<Self> {
        Ok(Self {
            project: ProjectRef::new(group_id, artifact_id)?,
            version: VersionSpec::parse(version)?,
        })
    }

    pub fn project_ref(&self) -> &ProjectRef {
        &self.project
    }

    pub fn version_spec(&self) -> &VersionSpec {
        &self.version
    }

    /// True when the version spec does not pin a single concrete version.
    pub fn is_variable_version(&self) -> bool {
        !self.version.is_concrete()
    }

    /// Returns the same coordinates with a different version spec.
    pub fn with_version(&self, version: VersionSpec) -> Self {
        Self {
            project: self.project.clone(),
            version,
        }
    }
}

impl fmt::Display for ProjectVersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.version)
    }
}

impl PartialOrd for ProjectVersionRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProjectVersionRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.project
            .cmp(&other.project)
            .then_with(|| self.version.cmp(&other.version))
    }
}

/// A concrete artifact coordinate: project-version plus packaging type,
/// optional classifier and the "optional" flag from the declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRef {
    project_version: ProjectVersionRef,
    artifact_type: String,
    classifier: Option<String>,
    optional: bool,
}

impl ArtifactRef {
    /// Default packaging type when none is declared
    pub const DEFAULT_TYPE: &'static str = "jar";

    /// Creates an artifact reference. A missing or empty type defaults to
    /// "jar"; an empty classifier collapses to None.
    pub fn new(
        project_version: ProjectVersionRef,
        artifact_type: Option<&str>,
        classifier: Option<&str>,
        optional: bool,
    ) -> Self {
        let artifact_type = match artifact_type {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => Self::DEFAULT_TYPE.to_string(),
        };
        let classifier = classifier
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Self {
            project_version,
            artifact_type,
            classifier,
            optional,
        }
    }

    /// Creates a plain jar artifact with no classifier
    pub fn jar(project_version: ProjectVersionRef) -> Self {
        Self::new(project_version, None, None, false)
    }

    pub fn project_version(&self) -> &ProjectVersionRef {
        &self.project_version
    }

    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the same artifact with a different project version.
    pub fn with_project_version(&self, project_version: ProjectVersionRef) -> Self {
        Self {
            project_version,
            artifact_type: self.artifact_type.clone(),
            classifier: self.classifier.clone(),
            optional: self.optional,
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project_version, self.artifact_type)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}
