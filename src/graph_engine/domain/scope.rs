use serde::{Deserialize, Serialize};
use std::fmt;

/// Maven-style dependency scope.
///
/// Scope implication is a fixed partial order: `compile` is implied by
/// `runtime`, which is implied by `test`. `provided`, `embedded`,
/// `system` and `toolchain` are leaves, and `import` stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Compile,
    Runtime,
    Test,
    Provided,
    Embedded,
    System,
    Import,
    Toolchain,
}

impl DependencyScope {
    /// True when a dependency declared with scope `other` is visible to a
    /// consumer asking for scope `self`.
    pub fn implies(self, other: DependencyScope) -> bool {
        use DependencyScope::*;
        match self {
            Compile => other == Compile,
            Runtime => matches!(other, Compile | Runtime),
            Test => matches!(other, Compile | Runtime | Test),
            Provided => other == Provided,
            Embedded => other == Embedded,
            System => other == System,
            Import => other == Import,
            Toolchain => other == Toolchain,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DependencyScope::Compile => "compile",
            DependencyScope::Runtime => "runtime",
            DependencyScope::Test => "test",
            DependencyScope::Provided => "provided",
            DependencyScope::Embedded => "embedded",
            DependencyScope::System => "system",
            DependencyScope::Import => "import",
            DependencyScope::Toolchain => "toolchain",
        }
    }

    pub fn from_str_lenient(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "compile" => Some(DependencyScope::Compile),
            "runtime" => Some(DependencyScope::Runtime),
            "test" => Some(DependencyScope::Test),
            "provided" => Some(DependencyScope::Provided),
            "embedded" => Some(DependencyScope::Embedded),
            "system" => Some(DependencyScope::System),
            "import" => Some(DependencyScope::Import),
            "toolchain" => Some(DependencyScope::Toolchain),
            _ => None,
        }
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_runtime_test_chain() {
        assert!(DependencyScope::Test.implies(DependencyScope::Compile));
        assert!(DependencyScope::Test.implies(DependencyScope::Runtime));
        assert!(DependencyScope::Runtime.implies(DependencyScope::Compile));
        assert!(!DependencyScope::Compile.implies(DependencyScope::Runtime));
        assert!(!DependencyScope::Runtime.implies(DependencyScope::Test));
    }

    #[test]
    fn test_leaf_scopes_only_imply_themselves() {
        assert!(DependencyScope::Provided.implies(DependencyScope::Provided));
        assert!(!DependencyScope::Provided.implies(DependencyScope::Compile));
        assert!(!DependencyScope::Test.implies(DependencyScope::Provided));
        assert!(!DependencyScope::Test.implies(DependencyScope::Import));
    }

    #[test]
    fn test_from_str_lenient_defaults_to_compile() {
        assert_eq!(
            DependencyScope::from_str_lenient(""),
            Some(DependencyScope::Compile)
        );
        assert_eq!(
            DependencyScope::from_str_lenient("RUNTIME"),
            Some(DependencyScope::Runtime)
        );
        assert_eq!(DependencyScope::from_str_lenient("bogus"), None);
    }
}
