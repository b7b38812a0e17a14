//! Upload Orchestrator - uploads discovered artifacts to the remote service
//!
//! Features:
//! - Per-artifact find / create / upload protocol
//! - Bounded parallelism through a fixed-width worker pool
//! - Failure isolation: one artifact never aborts the batch
//! - Aggregated report of every attempted artifact

use crate::core::config::default_workers;
use crate::core::error::UploadError;
use crate::core::traits::{
    RepositoryClient, UploadObserver, UploadOutcome, UploadStage, UploadStatus,
};
use crate::core::types::ArtifactDescriptor;
use crate::orchestration::progress::TracingObserver;
use crate::orchestration::worker_pool::WorkerPool;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Batch upload options
#[derive(Debug, Clone)]
pub struct BatchUploadOptions {
    /// Maximum concurrent uploads (default: available parallelism)
    pub workers: usize,

    /// Skip versions already stored remotely (default: false)
    pub skip_existing: bool,
}

impl Default for BatchUploadOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            skip_existing: false,
        }
    }
}

/// Batch upload result
#[derive(Debug, Clone)]
pub struct BatchUploadReport {
    /// Identifies this run in the logs
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// One entry per attempted artifact, in completion order
    pub outcomes: Vec<UploadOutcome>,
}

impl BatchUploadReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn uploaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, UploadStatus::Uploaded { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, UploadStatus::SkippedExisting { .. }))
            .count()
    }

    pub fn created_packages(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o.status,
                    UploadStatus::Uploaded {
                        created_package: true,
                        ..
                    }
                )
            })
            .count()
    }

    /// Failed artifacts
    pub fn failures(&self) -> Vec<&UploadOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success()).collect()
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Human-readable summary
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Attempted: {}", self.attempted()),
            format!(
                "Uploaded: {} ({} new packages)",
                self.uploaded(),
                self.created_packages()
            ),
        ];
        if self.skipped() > 0 {
            lines.push(format!("Skipped (already present): {}", self.skipped()));
        }

        let failures = self.failures();
        lines.push(format!("Failed: {}", failures.len()));
        for outcome in failures {
            if let UploadStatus::Failed { stage, error } = &outcome.status {
                lines.push(format!("   - {} [{}]: {}", outcome.descriptor, stage, error));
            }
        }
        lines.push(format!("Duration: {}ms", self.duration_ms()));
        lines
    }
}

/// UploadOrchestrator - uploads artifacts through a [`RepositoryClient`]
pub struct UploadOrchestrator {
    client: Arc<dyn RepositoryClient>,
    observer: Arc<dyn UploadObserver>,
    options: BatchUploadOptions,
}

impl UploadOrchestrator {
    /// Create an orchestrator logging through [`TracingObserver`]
    pub fn new(client: Arc<dyn RepositoryClient>, options: BatchUploadOptions) -> Self {
        Self {
            client,
            observer: Arc::new(TracingObserver),
            options,
        }
    }

    /// Replace the observer receiving progress events
    pub fn with_observer(mut self, observer: Arc<dyn UploadObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &BatchUploadOptions {
        &self.options
    }

    /// Upload a single artifact
    pub async fn upload_one(&self, descriptor: &ArtifactDescriptor) -> UploadOutcome {
        let outcome = upload_artifact(
            self.client.as_ref(),
            self.observer.as_ref(),
            descriptor.clone(),
            self.options.skip_existing,
        )
        .await;
        self.observer.artifact_finished(&outcome, 1, 1);
        outcome
    }

    /// Upload every artifact, at most `workers` at a time
    ///
    /// Each descriptor is attempted exactly once; failures are recorded in
    /// the report and never stop the batch.
    pub async fn upload_all(&self, descriptors: Vec<ArtifactDescriptor>) -> BatchUploadReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = descriptors.len();
        let pool = WorkerPool::new(self.options.workers);

        tracing::info!(%run_id, total, workers = pool.width(), "starting upload batch");
        self.observer.batch_started(total);

        let completed = Arc::new(AtomicUsize::new(0));
        let client = Arc::clone(&self.client);
        let observer = Arc::clone(&self.observer);
        let skip_existing = self.options.skip_existing;

        let outcomes = pool
            .run_all(descriptors, move |descriptor| {
                let client = Arc::clone(&client);
                let observer = Arc::clone(&observer);
                let completed = Arc::clone(&completed);
                async move {
                    let outcome =
                        upload_artifact(client.as_ref(), observer.as_ref(), descriptor, skip_existing)
                            .await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    observer.artifact_finished(&outcome, done, total);
                    outcome
                }
            })
            .await;

        let report = BatchUploadReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        self.observer
            .batch_finished(report.attempted(), report.failures().len());
        report
    }
}

/// Find or create the package, then upload the payload
async fn upload_artifact(
    client: &dyn RepositoryClient,
    observer: &dyn UploadObserver,
    descriptor: ArtifactDescriptor,
    skip_existing: bool,
) -> UploadOutcome {
    let failed = |descriptor: ArtifactDescriptor, stage: UploadStage, error: UploadError| {
        UploadOutcome {
            descriptor,
            status: UploadStatus::Failed {
                stage,
                error: error.to_string(),
            },
        }
    };

    let package = descriptor.composite_name();

    let existing = match client.find_package(&package).await {
        Ok(found) => found.filter(|id| !id.is_empty()),
        Err(e) => return failed(descriptor, UploadStage::FindPackage, e),
    };

    let (package_id, created_package) = match existing {
        Some(package_id) => {
            tracing::debug!(%package, %package_id, "package exists");
            (package_id, false)
        }
        None => {
            match client
                .create_package(&descriptor.group_id, &descriptor.artifact_id)
                .await
            {
                Ok(package_id) if !package_id.is_empty() => {
                    observer.package_created(&descriptor, &package_id);
                    (package_id, true)
                }
                Ok(_) => {
                    return failed(
                        descriptor,
                        UploadStage::CreatePackage,
                        UploadError::EmptyPackageId { package },
                    );
                }
                Err(e) => return failed(descriptor, UploadStage::CreatePackage, e),
            }
        }
    };

    if skip_existing {
        match client
            .version_exists(&package_id, &descriptor.version)
            .await
        {
            Ok(true) => {
                return UploadOutcome {
                    descriptor,
                    status: UploadStatus::SkippedExisting { package_id },
                };
            }
            Ok(false) => {}
            Err(e) => return failed(descriptor, UploadStage::CheckVersion, e),
        }
    }

    match client
        .upload_artifact(&package_id, &descriptor.version, &descriptor.local_path)
        .await
    {
        Ok(()) => UploadOutcome {
            descriptor,
            status: UploadStatus::Uploaded {
                package_id,
                created_package,
            },
        },
        Err(e) => failed(descriptor, UploadStage::Upload, e),
    }
}
