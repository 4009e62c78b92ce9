/// Shared constructors for test graphs.
use mvn_graph::prelude::*;
use std::collections::BTreeSet;

pub const WORKSPACE: &str = "test-workspace";

pub fn pvr(group: &str, artifact: &str, version: &str) -> ProjectVersionRef {
    ProjectVersionRef::parse(group, artifact, version).unwrap()
}

pub fn dependency(
    declaring: &ProjectVersionRef,
    target: &ProjectVersionRef,
    scope: DependencyScope,
    index: u32,
) -> ProjectRelationship {
    ProjectRelationship::dependency(
        "test-source",
        None,
        declaring.clone(),
        ArtifactRef::jar(target.clone()),
        scope,
        index,
        false,
        false,
        false,
        BTreeSet::new(),
    )
}

pub fn parent(declaring: &ProjectVersionRef, target: &ProjectVersionRef) -> ProjectRelationship {
    ProjectRelationship::parent("test-source", declaring.clone(), target.clone(), 0, false)
}
