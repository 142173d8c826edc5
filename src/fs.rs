//! File-system plumbing: glob resolution, concurrent reads and writes

use indexmap::IndexSet;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve `patterns` relative to `base_dir`, in glob order, without duplicates
pub fn resolve_globs(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = IndexSet::new();
    for pattern in patterns {
        let full = base_dir.join(pattern);
        for entry in glob::glob(&full.to_string_lossy())? {
            let path = entry?;
            if path.is_file() {
                paths.insert(path);
            }
        }
    }
    Ok(paths.into_iter().collect())
}

/// Directory part of a glob before its first wildcard component
pub fn glob_root(pattern: &str) -> PathBuf {
    Path::new(pattern)
        .components()
        .take_while(|c| match c {
            Component::Normal(part) => !part
                .to_str()
                .is_some_and(|s| s.contains(['*', '?', '[', '{'])),
            _ => true,
        })
        .collect()
}

/// Read every file concurrently, returning contents in input order
pub async fn read_all(paths: Vec<PathBuf>) -> Result<Vec<(PathBuf, String)>> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            tokio::spawn(async move {
                match tokio::fs::read_to_string(&path).await {
                    Ok(text) => Ok((path, text)),
                    Err(e) => Err(Error::io(path, e)),
                }
            })
        })
        .collect();

    let mut files = Vec::with_capacity(handles.len());
    for handle in handles {
        files.push(handle.await??);
    }
    Ok(files)
}

/// Write every `(path, text)` pair concurrently, creating parent directories.
///
/// Returns the paths in input order. Files written before a failure stay on disk.
pub async fn write_all(outputs: Vec<(PathBuf, String)>) -> Result<Vec<PathBuf>> {
    let handles: Vec<_> = outputs
        .into_iter()
        .map(|(path, text)| {
            tokio::spawn(async move {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| Error::io(parent, e))?;
                }
                tokio::fs::write(&path, text)
                    .await
                    .map_err(|e| Error::io(&path, e))?;
                tracing::debug!("Wrote {:?}", path);
                Ok::<_, Error>(path)
            })
        })
        .collect();

    let mut written = Vec::with_capacity(handles.len());
    for handle in handles {
        written.push(handle.await??);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_glob_root() {
        assert_eq!(glob_root("content/posts/*.md"), PathBuf::from("content/posts"));
        assert_eq!(glob_root("./src/**/*.md"), PathBuf::from("./src"));
        assert_eq!(glob_root("*.md"), PathBuf::new());
    }

    #[test]
    fn test_resolve_globs_sorted_and_deduplicated() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();

        let patterns = vec!["*.md".to_string(), "a.*".to_string()];
        let paths = resolve_globs(dir.path(), &patterns).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let err = resolve_globs(dir.path(), &["[".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[tokio::test]
    async fn test_read_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = read_all(vec![dir.path().join("missing.md")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("deep/nested/index.html");
        let written = write_all(vec![(target.clone(), "<p>hi</p>".to_string())])
            .await
            .unwrap();
        assert_eq!(written, vec![target.clone()]);

        let files = read_all(vec![target]).await.unwrap();
        assert_eq!(files[0].1, "<p>hi</p>");
    }
}
