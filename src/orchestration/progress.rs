//! Default observer writing upload events to `tracing`

use crate::core::traits::{UploadObserver, UploadOutcome, UploadStatus};
use crate::core::types::ArtifactDescriptor;

/// Logs every orchestrator event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl UploadObserver for TracingObserver {
    fn batch_started(&self, total: usize) {
        tracing::info!(total, "uploading artifacts");
    }

    fn package_created(&self, descriptor: &ArtifactDescriptor, package_id: &str) {
        tracing::info!(package = %descriptor.composite_name(), package_id, "package created");
    }

    fn artifact_finished(&self, outcome: &UploadOutcome, completed: usize, total: usize) {
        let descriptor = &outcome.descriptor;
        let package = descriptor.composite_name();
        match &outcome.status {
            UploadStatus::Uploaded { package_id, .. } => tracing::info!(
                %package,
                version = %descriptor.version,
                package_id = %package_id,
                completed,
                total,
                "artifact uploaded"
            ),
            UploadStatus::SkippedExisting { package_id } => tracing::info!(
                %package,
                version = %descriptor.version,
                package_id = %package_id,
                completed,
                total,
                "version already present, skipped"
            ),
            UploadStatus::Failed { stage, error } => tracing::error!(
                %package,
                version = %descriptor.version,
                path = %descriptor.local_path.display(),
                %stage,
                %error,
                completed,
                total,
                "artifact failed"
            ),
        }
    }

    fn batch_finished(&self, attempted: usize, failed: usize) {
        tracing::info!(attempted, failed, "upload batch finished");
    }
}
