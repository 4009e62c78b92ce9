use crate::graph_engine::domain::project_ref::{ProjectRef, ProjectVersionRef};
use crate::graph_engine::domain::relationship::ProjectRelationship;
use crate::shared::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered, non-empty sequence of relationships closing back on
/// itself: the final edge's target equals the first edge's declaring
/// coordinate. Identity and the stable key derive purely from the member
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EProjectCycle {
    relationships: Vec<ProjectRelationship>,
}

impl EProjectCycle {
    /// Validates and wraps a closed relationship sequence.
    pub fn new(relationships: Vec<ProjectRelationship>) -> Result<Self> {
        let (Some(first), Some(last)) = (relationships.first(), relationships.last()) else {
            anyhow::bail!(GraphError::InvalidCycle {
                reason: "a cycle must contain at least one relationship".to_string(),
            });
        };
        if last.target_project() != first.declaring() {
            anyhow::bail!(GraphError::InvalidCycle {
                reason: format!(
                    "sequence does not close: last target {} != first declaring {}",
                    last.target_project(),
                    first.declaring()
                ),
            });
        }
        Ok(Self { relationships })
    }

    pub fn relationships(&self) -> &[ProjectRelationship] {
        &self.relationships
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn contains_relationship(&self, rel: &ProjectRelationship) -> bool {
        self.relationships.contains(rel)
    }

    /// True when the project appears as a declaring or target coordinate
    /// anywhere in the cycle
    pub fn contains_project(&self, project: &ProjectRef) -> bool {
        self.relationships.iter().any(|rel| {
            rel.declaring().project_ref() == project
                || rel.target_project().project_ref() == project
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectRelationship> {
        self.relationships.iter()
    }

    /// Stable identity key derived from the member sequence
    pub fn key(&self) -> String {
        let rendered: Vec<String> = self.relationships.iter().map(|r| r.render()).collect();
        rendered.join(";")
    }
}

impl fmt::Display for EProjectCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle[{}]", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_engine::domain::project_ref::ArtifactRef;
    use crate::graph_engine::domain::scope::DependencyScope;
    use std::collections::BTreeSet;

    fn pvr(artifact: &str) -> ProjectVersionRef {
        ProjectVersionRef::parse("org.cycle", artifact, "1.0").unwrap()
    }

    fn dep(declaring: &ProjectVersionRef, target: &ProjectVersionRef) -> ProjectRelationship {
        ProjectRelationship::dependency(
            "src",
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
    fn test_valid_two_edge_cycle() {
        let a = pvr("a");
        let b = pvr("b");
        let cycle = EProjectCycle::new(vec![dep(&a, &b), dep(&b, &a)]).unwrap();
        assert_eq!(cycle.len(), 2);
        assert!(cycle.contains_project(a.project_ref()));
        assert!(cycle.contains_relationship(&dep(&a, &b)));
    }

    #[test]
    fn test_rejects_empty_cycle() {
        assert!(EProjectCycle::new(vec![]).is_err());
    }

    #[test]
    fn test_rejects_unclosed_sequence() {
        let a = pvr("a");
        let b = pvr("b");
        let c = pvr("c");
        let result = EProjectCycle::new(vec![dep(&a, &b), dep(&b, &c)]);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("does not close"));
    }

    #[test]
    fn test_key_is_stable_and_sequence_derived() {
        let a = pvr("a");
        let b = pvr("b");
        let cycle1 = EProjectCycle::new(vec![dep(&a, &b), dep(&b, &a)]).unwrap();
        let cycle2 = EProjectCycle::new(vec![dep(&a, &b), dep(&b, &a)]).unwrap();
        assert_eq!(cycle1.key(), cycle2.key());
        assert_eq!(cycle1, cycle2);

        let rotated = EProjectCycle::new(vec![dep(&b, &a), dep(&a, &b)]).unwrap();
        assert_ne!(cycle1.key(), rotated.key());
    }
}
