pub mod core;
pub mod orchestration;
pub mod remote;
pub mod scanner;
pub mod security;

pub use core::*;
pub use orchestration::{
    BatchUploadOptions, BatchUploadReport, TracingObserver, UploadOrchestrator, WorkerPool,
};
pub use remote::HttpRepositoryClient;
pub use scanner::{RepositoryScanner, ScanReport};
