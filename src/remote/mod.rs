//! Remote artifact service client

pub mod client;
pub mod endpoint;
pub mod envelope;

pub use client::HttpRepositoryClient;
pub use endpoint::Endpoints;
pub use envelope::{ApiResponse, CreatePackageRequest};
