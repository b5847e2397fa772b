//! Statically rendered file sets

use std::path::{Path, PathBuf};

use crate::core::CmdrResult;

/// Ordered set of `(relative path, contents)` produced by a static template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFileSet {
    files: Vec<(PathBuf, String)>,
}

impl StaticFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; a later file with the same path replaces the earlier one
    pub fn add(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> &mut Self {
        let path = path.into();
        let contents = contents.into();
        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = contents,
            None => self.files.push((path, contents)),
        }
        self
    }

    /// Create `root` (which must not exist) and write every file below it
    pub async fn write_to(&self, root: &Path) -> CmdrResult<()> {
        tokio::fs::create_dir(root).await?;

        for (relative, contents) in &self.files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, contents).await?;
            tracing::debug!("wrote {}", path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
impl StaticFileSet {
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        let path = path.as_ref();
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.as_str())
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|(p, _)| p.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_replaces_same_path() {
        let mut files = StaticFileSet::new();
        files.add("a.txt", "one").add("b/c.txt", "two").add("a.txt", "three");

        assert_eq!(files.paths().count(), 2);
        assert_eq!(files.get("a.txt"), Some("three"));
        let paths: Vec<_> = files.paths().collect();
        assert_eq!(paths, vec![Path::new("a.txt"), Path::new("b/c.txt")]);
    }

    #[tokio::test]
    async fn test_write_creates_nested_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("out");
        let mut files = StaticFileSet::new();
        files.add("overlays/staging/kustomization.yaml", "kind: Kustomization\n");

        files.write_to(&root).await.unwrap();

        let written = std::fs::read_to_string(root.join("overlays/staging/kustomization.yaml")).unwrap();
        assert_eq!(written, "kind: Kustomization\n");
    }

    #[tokio::test]
    async fn test_write_refuses_existing_root() {
        let dir = tempdir().unwrap();
        let files = StaticFileSet::new();
        assert!(files.write_to(dir.path()).await.is_err());
    }
}
