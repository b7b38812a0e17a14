//! Error handling for repository scanning and uploading
//!
//! This module provides the error type shared by the scanner, the remote
//! client and the configuration loader, with recovery guidance attached to
//! every variant.

use thiserror::Error;

/// Main error type for scan and upload operations
#[derive(Error, Debug)]
pub enum UploadError {
    // Local filesystem errors
    #[error("cannot resolve repository path {path}: {message}")]
    PathResolution { path: String, message: String },

    #[error("failed to walk repository {root}: {message}")]
    Scan { root: String, message: String },

    #[error("failed to read artifact {path}: {message}")]
    ArtifactRead { path: String, message: String },

    // Remote errors
    #[error("[{operation}] transport error: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("[{operation}] remote rejected the request (code {code}): {message}")]
    Remote {
        operation: &'static str,
        code: i64,
        message: String,
    },

    #[error("[{operation}] unexpected response: {message}")]
    InvalidResponse {
        operation: &'static str,
        message: String,
    },

    #[error("package {package} was created without an id")]
    EmptyPackageId { package: String },

    #[error("repository {repo_id} is not available: {message}")]
    RepositoryUnavailable { repo_id: String, message: String },

    // Configuration errors
    #[error("invalid configuration for {field}: {message}")]
    ConfigInvalid { field: String, message: String },
}

impl UploadError {
    /// Check if this error only affects a single artifact
    ///
    /// Non-recoverable errors abort the whole run.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::PathResolution { .. }
                | Self::Scan { .. }
                | Self::RepositoryUnavailable { .. }
                | Self::ConfigInvalid { .. }
        )
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::PathResolution { .. } => vec![
                "Check that the repository path exists",
                "Set HOME when the path starts with ~",
            ],
            Self::Scan { .. } => vec!["Check read permissions on the repository tree"],
            Self::ArtifactRead { .. } => {
                vec!["Check that the artifact was not removed during the upload"]
            }
            Self::Transport { .. } => vec![
                "Check the network connection",
                "Check that the base URL points at the artifact service",
            ],
            Self::Remote { .. } => vec![
                "Check the message returned by the service",
                "Check that the token has write access to the repository",
            ],
            Self::InvalidResponse { .. } => {
                vec!["Check that the base URL points at the artifact service"]
            }
            Self::EmptyPackageId { .. } => {
                vec!["Create the package manually and run the upload again"]
            }
            Self::RepositoryUnavailable { .. } => vec![
                "Check the repository id",
                "Check the organization name for multi-tenant deployments",
            ],
            Self::ConfigInvalid { .. } => vec![
                "Pass the value on the command line",
                "Set it in .maven-repo-upload.yaml or the environment",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::PathResolution { .. } => "PATH_RESOLUTION",
            Self::Scan { .. } => "SCAN_FAILED",
            Self::ArtifactRead { .. } => "ARTIFACT_READ",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Remote { .. } => "REMOTE_ERROR",
            Self::InvalidResponse { .. } => "INVALID_RESPONSE",
            Self::EmptyPackageId { .. } => "EMPTY_PACKAGE_ID",
            Self::RepositoryUnavailable { .. } => "REPOSITORY_UNAVAILABLE",
            Self::ConfigInvalid { .. } => "CONFIG_INVALID",
        }
    }

    pub(crate) fn config(field: &str, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_resolution_is_fatal() {
        let error = UploadError::PathResolution {
            path: "~/.m2/repository".to_string(),
            message: "HOME is not set".to_string(),
        };

        assert!(!error.is_recoverable());
        assert_eq!(error.code(), "PATH_RESOLUTION");
        assert!(!error.suggested_actions().is_empty());
    }

    #[test]
    fn test_remote_error_carries_message() {
        let error = UploadError::Remote {
            operation: "find_package",
            code: 1,
            message: "denied".to_string(),
        };

        assert!(error.is_recoverable());
        assert_eq!(error.code(), "REMOTE_ERROR");
        let display = error.to_string();
        assert!(display.contains("find_package"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_transport_error_is_recoverable() {
        let error = UploadError::Transport {
            operation: "upload_artifact",
            message: "connection refused".to_string(),
        };

        assert!(error.is_recoverable());
        assert_eq!(error.code(), "TRANSPORT_ERROR");
    }

    #[test]
    fn test_config_helper() {
        let error = UploadError::config("repoId", "is required");

        assert!(!error.is_recoverable());
        assert_eq!(
            error.to_string(),
            "invalid configuration for repoId: is required"
        );
    }

    #[test]
    fn test_repository_unavailable_actions() {
        let error = UploadError::RepositoryUnavailable {
            repo_id: "R1".to_string(),
            message: "not found".to_string(),
        };

        let actions = error.suggested_actions();
        assert!(actions.iter().any(|a| a.contains("repository id")));
    }
}
