//! Discovery of artifacts in a local Maven repository

pub mod layout;
pub mod repository_scanner;

pub use layout::{Coordinates, resolve_root};
pub use repository_scanner::{RepositoryScanner, ScanReport, SkipReason, SkippedEntry};
