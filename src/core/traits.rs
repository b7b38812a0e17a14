//! Core traits and types for uploading
//!
//! This module defines the seam to the remote artifact service and the
//! observer that receives per-artifact progress events.

use crate::core::error::UploadError;
use crate::core::types::{ArtifactDescriptor, RepositoryInfo};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::Path;

// ============================================================================
// Upload outcomes
// ============================================================================

/// Step of the per-artifact protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    FindPackage,
    CreatePackage,
    CheckVersion,
    Upload,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStage::FindPackage => write!(f, "find package"),
            UploadStage::CreatePackage => write!(f, "create package"),
            UploadStage::CheckVersion => write!(f, "check version"),
            UploadStage::Upload => write!(f, "upload"),
        }
    }
}

/// What happened to one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Uploaded {
        package_id: String,
        created_package: bool,
    },
    SkippedExisting {
        package_id: String,
    },
    Failed {
        stage: UploadStage,
        error: String,
    },
}

/// Result of one attempted artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub descriptor: ArtifactDescriptor,
    pub status: UploadStatus,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self.status, UploadStatus::Failed { .. })
    }
}

// ============================================================================
// Remote client
// ============================================================================

/// Operations against the remote artifact service
///
/// Implementations hold only immutable connection settings and are shared
/// by every concurrent upload task.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Confirm the configured repository exists
    async fn check_repository(&self) -> Result<RepositoryInfo, UploadError>;

    /// Look up a package by its exact composite name
    ///
    /// Returns `None` when no listed package matches the name exactly.
    async fn find_package(&self, composite_name: &str) -> Result<Option<String>, UploadError>;

    /// Register a package and return the id assigned by the service
    async fn create_package(&self, group_id: &str, artifact_id: &str)
    -> Result<String, UploadError>;

    /// Check whether a version of a package is already stored
    async fn version_exists(&self, package_id: &str, version: &str) -> Result<bool, UploadError>;

    /// Upload a local file as a version of a package
    async fn upload_artifact(
        &self,
        package_id: &str,
        version: &str,
        local_path: &Path,
    ) -> Result<(), UploadError>;
}

// ============================================================================
// Observer
// ============================================================================

/// Receives progress and outcome events from the orchestrator
///
/// All methods have empty default implementations.
pub trait UploadObserver: Send + Sync {
    fn batch_started(&self, _total: usize) {}

    fn package_created(&self, _descriptor: &ArtifactDescriptor, _package_id: &str) {}

    /// Called once per attempted artifact, in completion order
    fn artifact_finished(&self, _outcome: &UploadOutcome, _completed: usize, _total: usize) {}

    fn batch_finished(&self, _attempted: usize, _failed: usize) {}
}
