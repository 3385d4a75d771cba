//! File discovery for config sources.
//!
//! Each [`SearchPath`] resolves to one directory; each directory is checked
//! for `{dir}/{file_name}`. Results keep the search-path order, which callers
//! treat as priority-ascending. Missing files and unresolvable directories are
//! skipped; only real I/O errors (permissions, etc.) are reported.

use std::path::PathBuf;

use crate::error::LayerfigError;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` is used by `SearchPath::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{app_name}/` on Linux).
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Read every `{dir}/{file_name}` that exists, in search-path order.
pub fn load_config_files(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
) -> Result<Vec<(PathBuf, String)>, LayerfigError> {
    let mut results = Vec::new();
    for dir in search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
    {
        let file_path = dir.join(file_name);
        match std::fs::read_to_string(&file_path) {
            Ok(content) => results.push((file_path, content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::trace!(path = %file_path.display(), "config file not present");
            }
            Err(e) => {
                return Err(LayerfigError::Io {
                    path: file_path,
                    source: e,
                });
            }
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolve_explicit_path() {
        let p = PathBuf::from("/tmp/myapp");
        let resolved = resolve_search_path(&SearchPath::Path(p.clone()), "ignored");
        assert_eq!(resolved, Some(p));
    }

    #[test]
    fn resolve_cwd() {
        let resolved = resolve_search_path(&SearchPath::Cwd, "ignored");
        assert_eq!(resolved, std::env::current_dir().ok());
    }

    #[test]
    fn load_no_files_exist() {
        let dir = TempDir::new().unwrap();
        let paths = vec![SearchPath::Path(dir.path().to_path_buf())];
        let files = load_config_files(&paths, "nonexistent.json", "test").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn load_keeps_order() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        fs::write(a.path().join("app.json"), "{\"a\": 1}").unwrap();
        fs::write(b.path().join("app.json"), "{\"b\": 2}").unwrap();

        let paths = vec![
            SearchPath::Path(b.path().to_path_buf()),
            SearchPath::Path(a.path().to_path_buf()),
        ];
        let files = load_config_files(&paths, "app.json", "test").unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].1, "{\"b\": 2}");
        assert_eq!(files[1].1, "{\"a\": 1}");
    }

    #[test]
    fn directory_in_place_of_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("app.json")).unwrap();
        let paths = vec![SearchPath::Path(dir.path().to_path_buf())];
        let result = load_config_files(&paths, "app.json", "test");
        assert!(matches!(result, Err(LayerfigError::Io { .. })));
    }
}
