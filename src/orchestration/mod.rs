//! Orchestration layer for artifact uploads
//!
//! This module provides the worker pool shared by scanning and uploading,
//! and the orchestrator that drives a batch of uploads.

pub mod progress;
pub mod upload_orchestrator;
pub mod worker_pool;

// Re-export main types for convenience
pub use progress::TracingObserver;
pub use upload_orchestrator::{BatchUploadOptions, BatchUploadReport, UploadOrchestrator};
pub use worker_pool::WorkerPool;
