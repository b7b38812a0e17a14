//! Maven repository layout rules
//!
//! A descriptor file lives at
//! `<group path>/<artifactId>/<version>/<artifactId>-<version>.pom`.
//! Everything here is derived from path segments only.

use crate::core::error::UploadError;
use std::path::{Component, Path, PathBuf};

/// Extension of the descriptor (metadata) file
pub const DESCRIPTOR_EXTENSION: &str = "pom";

/// Payload extensions in priority order
pub const PAYLOAD_EXTENSIONS: [&str; 3] = ["jar", "aar", "pom"];

/// Minimum number of relative path segments for a standard layout
pub const MIN_SEGMENTS: usize = 3;

/// Coordinates reconstructed from a descriptor path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// Resolve the repository root to an absolute, existing directory
///
/// A leading `~` is expanded from `HOME`.
pub fn resolve_root(path: &Path) -> Result<PathBuf, UploadError> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    resolve_root_with_home(path, home.as_deref())
}

pub(crate) fn resolve_root_with_home(
    path: &Path,
    home: Option<&Path>,
) -> Result<PathBuf, UploadError> {
    let expanded = expand_home(path, home)?;

    std::fs::canonicalize(&expanded).map_err(|e| UploadError::PathResolution {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn expand_home(path: &Path, home: Option<&Path>) -> Result<PathBuf, UploadError> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = home.ok_or_else(|| UploadError::PathResolution {
                path: path.display().to_string(),
                message: "HOME is not set".to_string(),
            })?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Whether a file name carries the descriptor extension
pub fn is_descriptor(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == DESCRIPTOR_EXTENSION)
}

/// Payload candidates for a descriptor, in priority order
pub fn payload_candidates(descriptor: &Path) -> Vec<PathBuf> {
    PAYLOAD_EXTENSIONS
        .iter()
        .map(|ext| descriptor.with_extension(ext))
        .collect()
}

/// Derive coordinates from a descriptor path relative to the root
///
/// Returns `None` for paths with fewer than [`MIN_SEGMENTS`] segments.
pub fn coordinates_from_relative(relative: &Path) -> Option<Coordinates> {
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.len() < MIN_SEGMENTS {
        return None;
    }

    let len = segments.len();
    Some(Coordinates {
        group_id: segments[..len - 3].join("."),
        artifact_id: segments[len - 3].clone(),
        version: segments[len - 2].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_coordinates_from_standard_path() {
        let coords =
            coordinates_from_relative(Path::new("com/acme/widget/1.0.0/widget-1.0.0.pom")).unwrap();

        assert_eq!(coords.group_id, "com.acme");
        assert_eq!(coords.artifact_id, "widget");
        assert_eq!(coords.version, "1.0.0");
    }

    #[test]
    fn test_coordinates_with_deep_group() {
        let coords = coordinates_from_relative(Path::new(
            "org/apache/commons/commons-lang3/3.12.0/commons-lang3-3.12.0.pom",
        ))
        .unwrap();

        assert_eq!(coords.group_id, "org.apache.commons");
        assert_eq!(coords.artifact_id, "commons-lang3");
        assert_eq!(coords.version, "3.12.0");
    }

    #[test]
    fn test_coordinates_with_three_segments() {
        let coords = coordinates_from_relative(Path::new("widget/1.0/widget-1.0.pom")).unwrap();

        assert_eq!(coords.group_id, "");
        assert_eq!(coords.artifact_id, "widget");
        assert_eq!(coords.version, "1.0");
    }

    #[test]
    fn test_coordinates_rejects_short_paths() {
        assert!(coordinates_from_relative(Path::new("widget-1.0.pom")).is_none());
        assert!(coordinates_from_relative(Path::new("1.0/widget-1.0.pom")).is_none());
    }

    #[test]
    fn test_payload_candidates_order() {
        let candidates = payload_candidates(Path::new("/r/a/b/1/b-1.pom"));

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/r/a/b/1/b-1.jar"),
                PathBuf::from("/r/a/b/1/b-1.aar"),
                PathBuf::from("/r/a/b/1/b-1.pom"),
            ]
        );
    }

    #[test]
    fn test_payload_candidates_keep_dotted_versions() {
        let candidates = payload_candidates(Path::new("x/1.0.0/x-1.0.0.pom"));
        assert_eq!(candidates[0], PathBuf::from("x/1.0.0/x-1.0.0.jar"));
    }

    #[test]
    fn test_is_descriptor() {
        assert!(is_descriptor(Path::new("a/b-1.pom")));
        assert!(!is_descriptor(Path::new("a/b-1.jar")));
        assert!(!is_descriptor(Path::new("a/b-1.pom.sha1")));
    }

    #[test]
    fn test_resolve_root_expands_home() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(home.path().join(".m2/repository")).unwrap();

        let resolved =
            resolve_root_with_home(Path::new("~/.m2/repository"), Some(home.path())).unwrap();

        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(".m2/repository"));
    }

    #[test]
    fn test_resolve_root_without_home() {
        let error = resolve_root_with_home(Path::new("~/.m2/repository"), None).unwrap_err();
        assert_eq!(error.code(), "PATH_RESOLUTION");
    }

    #[test]
    fn test_resolve_root_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(
            resolve_root_with_home(&missing, None),
            Err(UploadError::PathResolution { .. })
        ));
    }
}
