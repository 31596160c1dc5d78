use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("cannot determine the user home directory")]
    HomeNotFound,

    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve the service home directory.
///
/// - `None` → `<user home>/<default_subdir>`
/// - `~` or `~/rest` → expanded against the user home
/// - relative paths → joined onto the current working directory
///
/// The returned path is always absolute. With `create` set the directory
/// (and its parents) is created.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let resolved = match configured {
        None => dirs::home_dir()
            .ok_or(HomeDirError::HomeNotFound)?
            .join(default_subdir),
        Some(raw) => expand_tilde(raw.trim())?,
    };

    let resolved = if resolved.is_absolute() {
        resolved
    } else {
        std::env::current_dir()
            .map_err(|source| HomeDirError::Create {
                path: resolved.clone(),
                source,
            })?
            .join(resolved)
    };

    if create {
        std::fs::create_dir_all(&resolved).map_err(|source| HomeDirError::Create {
            path: resolved.clone(),
            source,
        })?;
    }

    Ok(resolved)
}

fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return dirs::home_dir().ok_or(HomeDirError::HomeNotFound);
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(dirs::home_dir()
            .ok_or(HomeDirError::HomeNotFound)?
            .join(rest));
    }
    Ok(PathBuf::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested").join("home");
        let out = resolve_home_dir(Some(target.to_string_lossy().to_string()), ".x", true).unwrap();
        assert_eq!(out, target);
        assert!(out.is_dir());
    }

    #[test]
    fn tilde_is_expanded() {
        let out = resolve_home_dir(Some("~/.clinic_tilde".into()), ".x", false).unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with(".clinic_tilde"));
    }

    #[test]
    fn relative_path_becomes_absolute() {
        let out = resolve_home_dir(Some("relative/dir".into()), ".x", false).unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with("relative/dir"));
    }
}
