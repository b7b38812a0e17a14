//! Data model shared by the scanner, the remote client and the orchestrator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One artifact discovered in the local repository
///
/// Coordinates come from the directory layout
/// `<group path>/<artifactId>/<version>/<artifactId>-<version>.pom`,
/// never from the file content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactDescriptor {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Absolute path of the payload to upload
    pub local_path: PathBuf,
}

impl ArtifactDescriptor {
    /// Remote package name, `groupId:artifactId`
    pub fn composite_name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// Target repository as reported by the remote service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    #[serde(default)]
    pub repo_id: String,
    #[serde(default)]
    pub repo_name: String,
    #[serde(default)]
    pub repo_type: String,
}

/// Package identity on the remote service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    #[serde(default)]
    pub pkg_name: String,
    #[serde(default)]
    pub pkg_id: String,
}
