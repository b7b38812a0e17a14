//! HTTP client for the artifact service
//!
//! Async client using `reqwest`. The token travels as a query parameter, so
//! URLs are only logged through [`redact_url`] and transport errors are
//! stripped of their URL.

use crate::core::config::UploadConfig;
use crate::core::error::UploadError;
use crate::core::traits::RepositoryClient;
use crate::core::types::{PackageInfo, RepositoryInfo};
use crate::remote::endpoint::*;
use crate::remote::envelope::{self, ApiResponse, CreatePackageRequest};
use crate::security::token::{mask_secret_in, redact_url};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::path::Path;
use std::time::Duration;

/// Client for one repository of the artifact service
#[derive(Debug)]
pub struct HttpRepositoryClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    repo_id: String,
}

impl HttpRepositoryClient {
    /// Create a client without contacting the service
    pub fn new(
        base_url: &str,
        token: SecretString,
        organization: Option<String>,
        repo_id: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("maven-repo-upload/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| UploadError::Transport {
            operation: "connect",
            message: e.to_string(),
        })?;

        Ok(Self {
            http,
            endpoints: Endpoints::new(base_url, token, organization)?,
            repo_id: repo_id.into(),
        })
    }

    /// Create a client and check that the configured repository exists
    ///
    /// A failed check is logged and ignored unless
    /// `strict_repository_check` is set.
    pub async fn connect(config: &UploadConfig) -> Result<Self, UploadError> {
        let client = Self::new(
            &config.base_url,
            SecretString::new(config.token.expose_secret().into()),
            config.organization.clone(),
            config.repo_id.clone(),
            config.request_timeout,
        )?;

        match client.check_repository().await {
            Ok(info) => {
                tracing::info!(repo_id = %client.repo_id, repo_name = %info.repo_name, "repository found");
            }
            Err(e) if config.strict_repository_check => {
                return Err(UploadError::RepositoryUnavailable {
                    repo_id: client.repo_id.clone(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                tracing::error!(repo_id = %client.repo_id, error = %e, "repository check failed, continuing");
            }
        }

        Ok(client)
    }

    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    fn transport_error(&self, operation: &'static str, error: reqwest::Error) -> UploadError {
        UploadError::Transport {
            operation,
            message: mask_secret_in(&error.without_url().to_string(), self.endpoints.token()),
        }
    }

    /// Send a request and decode the envelope
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, UploadError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let parsed: ApiResponse<T> = envelope::decode(operation, status, &body)?;
        parsed.into_data(operation)
    }

    fn url(&self, operation: &'static str, path: &str, params: &[(&str, &str)]) -> Result<Url, UploadError> {
        let url = self.endpoints.url(path, params)?;
        tracing::debug!(operation, url = %redact_url(&url), "request");
        Ok(url)
    }
}

#[async_trait]
impl RepositoryClient for HttpRepositoryClient {
    async fn check_repository(&self) -> Result<RepositoryInfo, UploadError> {
        const OP: &str = "check_repository";
        let url = self.url(OP, REPOSITORY_INFO_PATH, &[("repoId", self.repo_id.as_str())])?;

        let info = self
            .execute::<RepositoryInfo>(OP, self.http.get(url))
            .await?
            .unwrap_or_default();
        Ok(info)
    }

    async fn find_package(&self, composite_name: &str) -> Result<Option<String>, UploadError> {
        const OP: &str = "find_package";
        let url = self.url(
            OP,
            PACKAGE_LIST_PATH,
            &[
                ("repoId", self.repo_id.as_str()),
                ("pkgName", composite_name),
                ("pageSize", "0"),
            ],
        )?;

        let packages = self
            .execute::<Vec<PackageInfo>>(OP, self.http.get(url))
            .await?
            .unwrap_or_default();
        Ok(envelope::select_exact_match(&packages, composite_name))
    }

    async fn create_package(&self, group_id: &str, artifact_id: &str) -> Result<String, UploadError> {
        const OP: &str = "create_package";
        let url = self.url(OP, PACKAGE_PATH, &[])?;
        let body = CreatePackageRequest {
            repo_id: &self.repo_id,
            pkg_name: group_id,
            pkg_name_sec: artifact_id,
        };

        let created = self
            .execute::<PackageInfo>(OP, self.http.post(url).json(&body))
            .await?;
        match created {
            Some(info) if !info.pkg_id.is_empty() => Ok(info.pkg_id),
            _ => Err(UploadError::EmptyPackageId {
                package: format!("{}:{}", group_id, artifact_id),
            }),
        }
    }

    async fn version_exists(&self, package_id: &str, version: &str) -> Result<bool, UploadError> {
        const OP: &str = "version_exists";
        let url = self.url(
            OP,
            ARTIFACT_EXISTS_PATH,
            &[("pkgId", package_id), ("version", version), ("format", "maven")],
        )?;

        let exists = self.execute::<bool>(OP, self.http.get(url)).await?;
        Ok(exists.unwrap_or(false))
    }

    async fn upload_artifact(
        &self,
        package_id: &str,
        version: &str,
        local_path: &Path,
    ) -> Result<(), UploadError> {
        const OP: &str = "upload_artifact";
        let url = self.url(OP, ARTIFACT_UPLOAD_PATH, &[])?;

        let read_error = |e: std::io::Error| UploadError::ArtifactRead {
            path: local_path.display().to_string(),
            message: e.to_string(),
        };
        let file = tokio::fs::File::open(local_path).await.map_err(read_error)?;
        let length = file.metadata().await.map_err(read_error)?.len();
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let form = Form::new()
            .part(
                "file",
                Part::stream_with_length(Body::from(file), length).file_name(file_name),
            )
            .text("classifier", "")
            .text("pkgId", package_id.to_string())
            .text("version", version.to_string());

        self.execute::<IgnoredAny>(OP, self.http.post(url).multipart(form))
            .await?;
        Ok(())
    }
}
