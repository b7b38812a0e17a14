//! Local repository scanner
//!
//! Walks a Maven-style repository tree and turns every descriptor file into
//! an [`ArtifactDescriptor`]. The directory walk runs on a blocking thread and
//! feeds descriptor paths into a [`WorkerPool`] that resolves payloads and
//! coordinates concurrently.

use crate::core::error::UploadError;
use crate::core::types::ArtifactDescriptor;
use crate::orchestration::worker_pool::WorkerPool;
use crate::scanner::layout;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use walkdir::WalkDir;

/// Why a descriptor file did not produce an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer path segments than group/artifact/version need
    NonStandardLayout,
    /// None of the payload candidates exists
    MissingPayload,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NonStandardLayout => write!(f, "non-standard repository layout"),
            SkipReason::MissingPayload => write!(f, "no payload file"),
        }
    }
}

/// A descriptor file left out of the scan result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Result of scanning a repository
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Absolute repository root
    pub root: PathBuf,
    /// Discovered artifacts, sorted by coordinates
    pub descriptors: Vec<ArtifactDescriptor>,
    pub skipped: Vec<SkippedEntry>,
    /// Number of descriptor files visited
    pub metadata_files: usize,
}

enum Resolution {
    Found(ArtifactDescriptor),
    Skipped(SkippedEntry),
}

/// Scanner for local Maven repositories
///
/// # Examples
///
/// ```no_run
/// use maven_repo_upload::scanner::RepositoryScanner;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), maven_repo_upload::UploadError> {
/// let scanner = RepositoryScanner::new(4);
/// let report = scanner.scan(Path::new("~/.m2/repository")).await?;
/// println!("found {} artifacts", report.descriptors.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepositoryScanner {
    pool: WorkerPool,
}

impl RepositoryScanner {
    /// Create a scanner resolving up to `workers` descriptors at a time
    pub fn new(workers: usize) -> Self {
        Self {
            pool: WorkerPool::new(workers),
        }
    }

    /// Scan a repository root
    ///
    /// Any traversal error aborts the scan; no partial result is returned.
    /// Non-standard entries are skipped and listed in the report.
    pub async fn scan(&self, root_path: &Path) -> Result<ScanReport, UploadError> {
        let root = layout::resolve_root(root_path)?;
        tracing::info!(root = %root.display(), workers = self.pool.width(), "scanning repository");

        let (sender, receiver) = self.pool.queue();
        let walk_root = root.clone();
        let walker = tokio::task::spawn_blocking(move || walk_descriptors(&walk_root, sender));

        let shared_root = Arc::new(root.clone());
        let resolutions = self
            .pool
            .run(receiver, move |descriptor: PathBuf| {
                let root = Arc::clone(&shared_root);
                async move { resolve(&root, descriptor).await }
            })
            .await;

        let metadata_files = walker.await.map_err(|e| UploadError::Scan {
            root: root.display().to_string(),
            message: e.to_string(),
        })??;

        let mut descriptors = Vec::new();
        let mut skipped = Vec::new();
        for resolution in resolutions {
            match resolution {
                Resolution::Found(descriptor) => descriptors.push(descriptor),
                Resolution::Skipped(entry) => skipped.push(entry),
            }
        }
        descriptors.sort();
        descriptors.dedup();

        tracing::info!(
            artifacts = descriptors.len(),
            skipped = skipped.len(),
            metadata_files,
            "repository scan finished"
        );

        Ok(ScanReport {
            root,
            descriptors,
            skipped,
            metadata_files,
        })
    }
}

/// Walk the tree and send every descriptor file to the queue
fn walk_descriptors(root: &Path, sender: mpsc::Sender<PathBuf>) -> Result<usize, UploadError> {
    let mut visited = 0;

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| UploadError::Scan {
            root: root.display().to_string(),
            message: e.to_string(),
        })?;

        if entry.file_type().is_dir() || !layout::is_descriptor(entry.path()) {
            continue;
        }

        visited += 1;
        if sender.blocking_send(entry.into_path()).is_err() {
            break;
        }
    }

    Ok(visited)
}

async fn resolve(root: &Path, descriptor: PathBuf) -> Resolution {
    let mut payload = None;
    for candidate in layout::payload_candidates(&descriptor) {
        if is_regular_file(&candidate).await {
            payload = Some(candidate);
            break;
        }
    }

    let Some(local_path) = payload else {
        tracing::debug!(path = %descriptor.display(), "no payload for descriptor");
        return Resolution::Skipped(SkippedEntry {
            path: descriptor,
            reason: SkipReason::MissingPayload,
        });
    };

    let relative = descriptor.strip_prefix(root).unwrap_or(&descriptor);
    match layout::coordinates_from_relative(relative) {
        Some(coordinates) => Resolution::Found(ArtifactDescriptor {
            group_id: coordinates.group_id,
            artifact_id: coordinates.artifact_id,
            version: coordinates.version,
            local_path,
        }),
        None => {
            tracing::warn!(path = %local_path.display(), "not a standard repository file");
            Resolution::Skipped(SkippedEntry {
                path: descriptor,
                reason: SkipReason::NonStandardLayout,
            })
        }
    }
}

async fn is_regular_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}
