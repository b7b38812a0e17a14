//! Configuration loader for maven-repo-upload
//!
//! This module merges the configuration layers, expands `${VAR}` references
//! and validates the result into an [`UploadConfig`].

use super::config::*;
use crate::core::error::UploadError;
use regex::Regex;
use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::fs;

/// Configuration file name
pub const CONFIG_FILENAME: &str = ".maven-repo-upload.yaml";

/// Environment variable pattern (${VAR_NAME})
const ENV_VAR_PATTERN: &str = r"\$\{([A-Z_][A-Z0-9_]*)\}";

static ENV_VAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ENV_VAR_PATTERN).expect("ENV_VAR_PATTERN is a valid regex"));

/// Configuration load options
#[derive(Clone, Default)]
pub struct ConfigLoadOptions {
    /// Directory searched for the project configuration file
    pub project_dir: PathBuf,

    /// Explicit configuration file (replaces the project file)
    pub config_file: Option<PathBuf>,

    /// Home directory searched for the global configuration file
    pub home_dir: Option<PathBuf>,

    /// Environment variables
    pub env: HashMap<String, String>,

    /// Command line values (highest priority)
    pub cli_args: FileConfig,
}

// Environment values may hold the token; only the count is shown
impl fmt::Debug for ConfigLoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoadOptions")
            .field("project_dir", &self.project_dir)
            .field("config_file", &self.config_file)
            .field("home_dir", &self.home_dir)
            .field("env", &format_args!("<{} variables>", self.env.len()))
            .field("cli_args", &self.cli_args)
            .finish()
    }
}

impl ConfigLoadOptions {
    /// Options reading the real process environment
    pub fn from_process(config_file: Option<PathBuf>, cli_args: FileConfig) -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file,
            home_dir: env::var_os("HOME").map(PathBuf::from),
            env: env::vars().collect(),
            cli_args,
        }
    }
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables (`MAVEN_UPLOAD_*`)
    /// 3. Project config (`--config` or ./.maven-repo-upload.yaml)
    /// 4. Global config (~/.maven-repo-upload.yaml)
    /// 5. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<UploadConfig, UploadError> {
        let mut layers = vec![FileConfig::defaults()];

        if let Some(home_dir) = &options.home_dir {
            if let Some(global) = Self::load_config_file(&home_dir.join(CONFIG_FILENAME)).await? {
                layers.push(global);
            }
        }

        match &options.config_file {
            Some(explicit) => match Self::load_config_file(explicit).await? {
                Some(project) => layers.push(project),
                None => {
                    return Err(UploadError::config(
                        "config",
                        format!("file {} does not exist", explicit.display()),
                    ));
                }
            },
            None => {
                let project_path = options.project_dir.join(CONFIG_FILENAME);
                if let Some(project) = Self::load_config_file(&project_path).await? {
                    layers.push(project);
                }
            }
        }

        layers.push(Self::load_env_config(&options.env)?);
        layers.push(options.cli_args);

        let merged = layers
            .into_iter()
            .fold(FileConfig::default(), FileConfig::merge);
        let expanded = Self::expand_env_vars(merged, &options.env);

        Self::validate(expanded)
    }

    /// Load configuration from a YAML file, `None` when it does not exist
    async fn load_config_file(file_path: &Path) -> Result<Option<FileConfig>, UploadError> {
        if !fs::try_exists(file_path).await.unwrap_or(false) {
            return Ok(None);
        }

        let content = fs::read_to_string(file_path).await.map_err(|e| {
            UploadError::config("config", format!("failed to read {}: {}", file_path.display(), e))
        })?;

        let config: FileConfig = serde_yaml::from_str(&content).map_err(|e| {
            UploadError::config("config", format!("failed to parse {}: {}", file_path.display(), e))
        })?;

        tracing::debug!(path = %file_path.display(), "loaded configuration file");
        Ok(Some(config))
    }

    /// Load configuration from environment variables
    fn load_env_config(env: &HashMap<String, String>) -> Result<FileConfig, UploadError> {
        let workers = match env.get("MAVEN_UPLOAD_WORKERS") {
            Some(raw) => Some(raw.trim().parse::<usize>().map_err(|_| {
                UploadError::config("workers", format!("MAVEN_UPLOAD_WORKERS={} is not a number", raw))
            })?),
            None => None,
        };

        Ok(FileConfig {
            repo_path: env.get("MAVEN_UPLOAD_REPO_PATH").cloned(),
            base_url: env.get("MAVEN_UPLOAD_BASE_URL").cloned(),
            token: env.get("MAVEN_UPLOAD_TOKEN").cloned(),
            organization: env.get("MAVEN_UPLOAD_ORGANIZATION").cloned(),
            repo_id: env.get("MAVEN_UPLOAD_REPO_ID").cloned(),
            workers,
            ..FileConfig::default()
        })
    }

    /// Expand `${VAR}` references in every string field
    fn expand_env_vars(config: FileConfig, env: &HashMap<String, String>) -> FileConfig {
        let expand = |value: Option<String>| value.map(|v| Self::expand_string(&v, env));

        FileConfig {
            repo_path: expand(config.repo_path),
            base_url: expand(config.base_url),
            token: expand(config.token),
            organization: expand(config.organization),
            repo_id: expand(config.repo_id),
            ..config
        }
    }

    /// Expand environment variables in a single string
    fn expand_string(input: &str, env: &HashMap<String, String>) -> String {
        let mut result = input.to_string();
        for cap in ENV_VAR_REGEX.captures_iter(input) {
            let var_name = &cap[1];
            match env.get(var_name) {
                Some(value) => result = result.replace(&format!("${{{}}}", var_name), value),
                None => tracing::warn!(variable = var_name, "environment variable not found"),
            }
        }
        result
    }

    /// Validate a merged configuration
    pub fn validate(config: FileConfig) -> Result<UploadConfig, UploadError> {
        let base_url = Self::required(config.base_url, "baseUrl")?;
        let token = Self::required(config.token, "token")?;
        let repo_id = Self::required(config.repo_id, "repoId")?;
        let repo_path = Self::required(config.repo_path, "repoPath")?;

        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| UploadError::config("baseUrl", format!("{}: {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(UploadError::config(
                "baseUrl",
                format!("unsupported scheme {}", parsed.scheme()),
            ));
        }

        let workers = config.workers.unwrap_or_else(default_workers);
        if workers == 0 {
            return Err(UploadError::config("workers", "must be at least 1"));
        }

        let organization = config
            .organization
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());

        Ok(UploadConfig {
            repo_path: PathBuf::from(repo_path),
            base_url,
            token: SecretString::new(token.into()),
            organization,
            repo_id,
            workers,
            strict_repository_check: config.strict_repository_check.unwrap_or(false),
            skip_existing: config.skip_existing.unwrap_or(false),
            request_timeout: config.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        })
    }

    fn required(value: Option<String>, field: &str) -> Result<String, UploadError> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| UploadError::config(field, "is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn complete() -> FileConfig {
        FileConfig {
            repo_path: Some("/tmp/repo".to_string()),
            base_url: Some("https://ez.example.com".to_string()),
            token: Some("tok".to_string()),
            repo_id: Some("R1".to_string()),
            ..FileConfig::default()
        }
    }

    #[test]
    fn test_load_env_config() {
        let mut env = HashMap::new();
        env.insert("MAVEN_UPLOAD_BASE_URL".to_string(), "https://ez.example.com".to_string());
        env.insert("MAVEN_UPLOAD_WORKERS".to_string(), "8".to_string());

        let config = ConfigLoader::load_env_config(&env).unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://ez.example.com"));
        assert_eq!(config.workers, Some(8));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_load_env_config_rejects_bad_workers() {
        let mut env = HashMap::new();
        env.insert("MAVEN_UPLOAD_WORKERS".to_string(), "many".to_string());

        let error = ConfigLoader::load_env_config(&env).unwrap_err();
        assert_eq!(error.code(), "CONFIG_INVALID");
    }

    #[test]
    fn test_expand_string() {
        let mut env = HashMap::new();
        env.insert("EZ_TOKEN".to_string(), "secret123".to_string());

        assert_eq!(ConfigLoader::expand_string("${EZ_TOKEN}", &env), "secret123");
        assert_eq!(
            ConfigLoader::expand_string("${MISSING}-x", &env),
            "${MISSING}-x"
        );
    }

    #[test]
    fn test_validate_requires_token() {
        let config = FileConfig {
            token: None,
            ..complete()
        };

        match ConfigLoader::validate(config) {
            Err(UploadError::ConfigInvalid { field, .. }) => assert_eq!(field, "token"),
            other => panic!("expected missing token, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_blank_repo_id() {
        let config = FileConfig {
            repo_id: Some("   ".to_string()),
            ..complete()
        };

        assert!(ConfigLoader::validate(config).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = FileConfig {
            workers: Some(0),
            ..complete()
        };

        assert!(ConfigLoader::validate(config).is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = FileConfig {
            base_url: Some("ftp://ez.example.com".to_string()),
            ..complete()
        };

        assert!(ConfigLoader::validate(config).is_err());
    }

    #[test]
    fn test_validate_blank_organization_is_single_tenant() {
        let config = FileConfig {
            organization: Some("".to_string()),
            timeout_secs: Some(30),
            ..complete()
        };

        let validated = ConfigLoader::validate(config).unwrap();
        assert!(validated.organization.is_none());
        assert_eq!(validated.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(validated.token.expose_secret(), "tok");
    }

    #[tokio::test]
    async fn test_load_priority() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        std::fs::write(
            home.path().join(CONFIG_FILENAME),
            "baseUrl: https://global.example.com\nrepoId: GLOBAL\ntoken: ${EZ_TOKEN}\n",
        )
        .unwrap();
        std::fs::write(
            project.path().join(CONFIG_FILENAME),
            "repoId: PROJECT\nworkers: 2\n",
        )
        .unwrap();

        let mut env = HashMap::new();
        env.insert("EZ_TOKEN".to_string(), "from-env".to_string());
        env.insert("MAVEN_UPLOAD_WORKERS".to_string(), "3".to_string());

        let config = ConfigLoader::load(ConfigLoadOptions {
            project_dir: project.path().to_path_buf(),
            config_file: None,
            home_dir: Some(home.path().to_path_buf()),
            env,
            cli_args: FileConfig {
                organization: Some("acme".to_string()),
                ..FileConfig::default()
            },
        })
        .await
        .unwrap();

        assert_eq!(config.base_url, "https://global.example.com");
        assert_eq!(config.repo_id, "PROJECT");
        assert_eq!(config.workers, 3);
        assert_eq!(config.organization.as_deref(), Some("acme"));
        assert_eq!(config.token.expose_secret(), "from-env");
        assert_eq!(config.repo_path, PathBuf::from(DEFAULT_REPO_PATH));
    }

    #[tokio::test]
    async fn test_missing_explicit_config_file() {
        let dir = TempDir::new().unwrap();

        let result = ConfigLoader::load(ConfigLoadOptions {
            project_dir: dir.path().to_path_buf(),
            config_file: Some(dir.path().join("absent.yaml")),
            cli_args: complete(),
            ..ConfigLoadOptions::default()
        })
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_yaml_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "workers: [not, a, number]\n").unwrap();

        let result = ConfigLoader::load_config_file(&path).await;

        assert!(matches!(result, Err(UploadError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_load_options_debug_hides_environment() {
        let mut env = HashMap::new();
        env.insert("MAVEN_UPLOAD_TOKEN".to_string(), "env-secret-0123456789".to_string());
        let options = ConfigLoadOptions {
            env,
            cli_args: FileConfig {
                token: Some("cli-secret-0123456789".to_string()),
                ..FileConfig::default()
            },
            ..ConfigLoadOptions::default()
        };

        let debug = format!("{:?}", options);

        assert!(!debug.contains("env-secret-0123456789"));
        assert!(!debug.contains("cli-secret-0123456789"));
        assert!(debug.contains("<1 variables>"));
    }
}
