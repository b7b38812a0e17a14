//! Configuration structures for maven-repo-upload
//!
//! `FileConfig` is the partial, serde-friendly shape shared by every
//! configuration source. `UploadConfig` is the validated record the scanner,
//! the client and the orchestrator are built from.

use crate::security::token::mask_token;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default local repository, relative to the home directory
pub const DEFAULT_REPO_PATH: &str = "~/.m2/repository";

/// Number of workers used when none is configured
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// One configuration layer (file, environment or command line)
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// Local repository root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_path: Option<String>,

    /// Base URL of the artifact service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Personal access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Organization name for multi-tenant deployments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Target repository id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<String>,

    /// Worker pool width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Abort when the repository check fails (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_repository_check: Option<bool>,

    /// Skip versions that already exist remotely (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_existing: Option<bool>,

    /// Per-request timeout in seconds (default: none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Overlay `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: FileConfig) -> FileConfig {
        FileConfig {
            repo_path: other.repo_path.or(self.repo_path),
            base_url: other.base_url.or(self.base_url),
            token: other.token.or(self.token),
            organization: other.organization.or(self.organization),
            repo_id: other.repo_id.or(self.repo_id),
            workers: other.workers.or(self.workers),
            strict_repository_check: other
                .strict_repository_check
                .or(self.strict_repository_check),
            skip_existing: other.skip_existing.or(self.skip_existing),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Lowest-priority layer
    pub fn defaults() -> FileConfig {
        FileConfig {
            repo_path: Some(DEFAULT_REPO_PATH.to_string()),
            workers: Some(default_workers()),
            strict_repository_check: Some(false),
            skip_existing: Some(false),
            ..FileConfig::default()
        }
    }
}

// Token is masked
impl fmt::Debug for FileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileConfig")
            .field("repo_path", &self.repo_path)
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_deref().map(mask_token))
            .field("organization", &self.organization)
            .field("repo_id", &self.repo_id)
            .field("workers", &self.workers)
            .field("strict_repository_check", &self.strict_repository_check)
            .field("skip_existing", &self.skip_existing)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Validated run configuration
#[derive(Debug)]
pub struct UploadConfig {
    pub repo_path: PathBuf,
    pub base_url: String,
    pub token: SecretString,
    /// `None` means single-tenant mode
    pub organization: Option<String>,
    pub repo_id: String,
    pub workers: usize,
    pub strict_repository_check: bool,
    pub skip_existing: bool,
    pub request_timeout: Option<Duration>,
}
