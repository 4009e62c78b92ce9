/// Type alias for Result with anyhow::Error as the error type.
/// This provides a consistent error handling pattern across the codebase;
/// typed [`GraphError`](crate::shared::GraphError) values travel through it
/// and remain downcastable at the call site.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
