use thiserror::Error;

/// Errors raised while resolving rules, parsing tags and talking to the inspector.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("{rule} is not a valid rule")]
    RuleNotFound { rule: String },

    #[error("The {rule} rule cannot parse the version string '{version}'")]
    UnparsableVersion { rule: String, version: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid pattern for rule {rule}: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Version '{version}' does not form a semantic version: {source}")]
    InvalidComponent {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("The version label for {reference} is not set")]
    MissingVersionLabel { reference: String },

    #[error("The inspector response for {reference} is invalid: {reason}")]
    InspectorFailure { reference: String, reason: String },
}

pub type Result<T> = std::result::Result<T, VersionError>;

impl VersionError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        VersionError::InvalidArgument(msg.into())
    }

    pub fn inspector_failure(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        VersionError::InspectorFailure {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}
