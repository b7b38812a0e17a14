//! Request URL construction
//!
//! API paths are resolved below the configured base URL. Every request
//! carries the token as a query parameter, and with an organization
//! configured the organization becomes the second path segment
//! (`/v1/package/...` turns into `/v1/<org>/package/...`).

use crate::core::error::UploadError;
use crate::security::token::TOKEN_PARAM;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

pub const REPOSITORY_INFO_PATH: &str = "/v1/package/api/repository/simpleInfo";
pub const PACKAGE_LIST_PATH: &str = "/v1/package/api/package/simpleList";
pub const PACKAGE_PATH: &str = "/v1/package/api/package";
pub const ARTIFACT_EXISTS_PATH: &str = "/v1/package/api/artifact/isExist";
pub const ARTIFACT_UPLOAD_PATH: &str = "/v1/package/api/artifact/upload";

/// Builds authenticated request URLs
#[derive(Debug)]
pub struct Endpoints {
    base: Url,
    token: SecretString,
    organization: Option<String>,
}

impl Endpoints {
    pub fn new(
        base_url: &str,
        token: SecretString,
        organization: Option<String>,
    ) -> Result<Self, UploadError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| UploadError::config("baseUrl", format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(UploadError::config("baseUrl", "cannot be used as a base URL"));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);

        Ok(Self {
            base,
            token,
            organization: organization.filter(|o| !o.is_empty()),
        })
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Path below the base URL, with the organization injected
    fn scoped_path(&self, api_path: &str) -> String {
        let segments: Vec<&str> = api_path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match (&self.organization, segments.split_first()) {
            (Some(org), Some((first, rest))) => {
                let mut scoped = vec![*first, org.as_str()];
                scoped.extend_from_slice(rest);
                scoped.join("/")
            }
            _ => segments.join("/"),
        }
    }

    /// Full URL for an API path with the token and `params` as query
    pub fn url(&self, api_path: &str, params: &[(&str, &str)]) -> Result<Url, UploadError> {
        let path = self.scoped_path(api_path);
        let mut url = self
            .base
            .join(&path)
            .map_err(|e| UploadError::config("baseUrl", format!("cannot join {}: {}", path, e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair(TOKEN_PARAM, self.token.expose_secret());
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }
}
