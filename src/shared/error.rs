use thiserror::Error;

/// Typed errors raised by the relationship graph engine.
///
/// Uses thiserror to derive Display and Error traits automatically.
/// Every variant renders the offending coordinate or relationship so
/// callers never see a bare "something went wrong".
#[derive(Debug, Error)]
pub enum GraphError {
    /// Invalid project coordinates (empty groupId/artifactId, bad characters)
    #[error("Invalid project reference: {reference}\nReason: {reason}")]
    InvalidRef { reference: String, reason: String },

    /// A version specification string that could not be parsed
    #[error("Invalid version specification: {spec}\nReason: {reason}")]
    InvalidVersionSpec { spec: String, reason: String },

    /// A non-concrete version was supplied where a concrete one is required,
    /// e.g. as the pinned side of a view selection
    #[error("Version '{version}' for {project} is not concrete; selections must pin a single released version")]
    NonConcreteSelection { project: String, version: String },

    /// A cycle record that is empty or does not close back on its head
    #[error("Invalid relationship cycle: {reason}")]
    InvalidCycle { reason: String },

    /// Fatal storage/driver failure. Never retried at this layer; retry
    /// policy, if any, belongs to the storage backend itself.
    #[error("Graph driver error: {message}")]
    Driver { message: String },

    /// Seen-tracker failure (index unavailable, already torn down, I/O)
    #[error("Seen-tracker failure: {message}")]
    TrackerFailure { message: String },
}

impl GraphError {
    /// Builds a driver error with a formatted message
    pub fn driver(message: impl Into<String>) -> Self {
        GraphError::Driver {
            message: message.into(),
        }
    }

    /// Builds a tracker error with a formatted message
    pub fn tracker(message: impl Into<String>) -> Self {
        GraphError::TrackerFailure {
            message: message.into(),
        }
    }
}
