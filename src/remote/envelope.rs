//! Response envelope of the artifact service
//!
//! Every response body is `{code, message, data}`. A non-zero `code` is a
//! failure whatever the HTTP status was.

use crate::core::error::UploadError;
use crate::core::types::PackageInfo;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Payload of a successful response
    pub fn into_data(self, operation: &'static str) -> Result<Option<T>, UploadError> {
        if self.code != 0 {
            return Err(UploadError::Remote {
                operation,
                code: self.code,
                message: self.message,
            });
        }
        Ok(self.data)
    }
}

/// Body of the create-package request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest<'a> {
    pub repo_id: &'a str,
    pub pkg_name: &'a str,
    pub pkg_name_sec: &'a str,
}

/// Decode a response body into its envelope
///
/// An undecodable body on a non-success HTTP status is reported as a
/// transport failure, otherwise as an invalid response.
pub fn decode<T: DeserializeOwned>(
    operation: &'static str,
    status: StatusCode,
    body: &[u8],
) -> Result<ApiResponse<T>, UploadError> {
    serde_json::from_slice::<ApiResponse<T>>(body).map_err(|e| {
        if status.is_success() {
            UploadError::InvalidResponse {
                operation,
                message: e.to_string(),
            }
        } else {
            UploadError::Transport {
                operation,
                message: format!("HTTP {}", status),
            }
        }
    })
}

/// Id of the package whose name matches exactly
pub fn select_exact_match(packages: &[PackageInfo], composite_name: &str) -> Option<String> {
    packages
        .iter()
        .find(|p| p.pkg_name == composite_name)
        .map(|p| p.pkg_id.clone())
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(name: &str, id: &str) -> PackageInfo {
        PackageInfo {
            pkg_name: name.to_string(),
            pkg_id: id.to_string(),
        }
    }

    #[test]
    fn test_success_envelope() {
        let body = br#"{"code":0,"message":"ok","data":{"pkgName":"a:b","pkgId":"P1"}}"#;

        let response: ApiResponse<PackageInfo> = decode("create_package", StatusCode::OK, body).unwrap();
        let data = response.into_data("create_package").unwrap().unwrap();

        assert_eq!(data.pkg_id, "P1");
    }

    #[test]
    fn test_non_zero_code_is_remote_error() {
        let body = br#"{"code":1,"message":"denied","data":null}"#;

        let response: ApiResponse<Vec<PackageInfo>> =
            decode("find_package", StatusCode::OK, body).unwrap();

        match response.into_data("find_package") {
            Err(UploadError::Remote { code, message, .. }) => {
                assert_eq!(code, 1);
                assert_eq!(message, "denied");
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_data_field() {
        let body = br#"{"code":0,"message":""}"#;

        let response: ApiResponse<serde::de::IgnoredAny> =
            decode("upload_artifact", StatusCode::OK, body).unwrap();

        assert!(response.into_data("upload_artifact").unwrap().is_none());
    }

    #[test]
    fn test_payload_type_needs_no_default() {
        #[derive(Debug, Deserialize)]
        struct Upload {
            id: u64,
        }

        let present: ApiResponse<Upload> =
            decode("upload_artifact", StatusCode::OK, br#"{"code":0,"data":{"id":7}}"#).unwrap();
        let absent: ApiResponse<Upload> =
            decode("upload_artifact", StatusCode::OK, br#"{"code":0}"#).unwrap();

        assert_eq!(present.into_data("upload_artifact").unwrap().unwrap().id, 7);
        assert!(absent.into_data("upload_artifact").unwrap().is_none());
    }

    #[test]
    fn test_undecodable_body() {
        let html = b"<html>bad gateway</html>";

        let on_error = decode::<bool>("version_exists", StatusCode::BAD_GATEWAY, html).unwrap_err();
        let on_success = decode::<bool>("version_exists", StatusCode::OK, html).unwrap_err();

        assert_eq!(on_error.code(), "TRANSPORT_ERROR");
        assert_eq!(on_success.code(), "INVALID_RESPONSE");
    }

    #[test]
    fn test_select_exact_match_ignores_near_matches() {
        let packages = vec![
            package("com.acme:widget-core", "P0"),
            package("com.acme:widget", "P1"),
            package("com.acme:widgets", "P2"),
        ];

        assert_eq!(
            select_exact_match(&packages, "com.acme:widget"),
            Some("P1".to_string())
        );
        assert_eq!(select_exact_match(&packages, "com.acme:gadget"), None);
        assert_eq!(select_exact_match(&[], "com.acme:widget"), None);
    }

    #[test]
    fn test_create_request_serialization() {
        let body = CreatePackageRequest {
            repo_id: "R1",
            pkg_name: "com.acme",
            pkg_name_sec: "widget",
        };

        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"repoId":"R1","pkgName":"com.acme","pkgNameSec":"widget"}"#
        );
    }
}
