// src/fetch/dir.rs

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::Source;

/// Reads resources from a local directory, e.g. a checkout of the published files.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source for DirSource {
    async fn fetch(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        debug!(path = %path.display(), "reading");
        fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_existing_file() -> Result<()> {
        let tmp = tempdir()?;
        std::fs::write(tmp.path().join("shard_01.json"), r#"[{"Key": "a"}]"#)?;
        let src = DirSource::new(tmp.path());
        assert_eq!(src.fetch("shard_01.json").await?, r#"[{"Key": "a"}]"#);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let tmp = tempdir().unwrap();
        let src = DirSource::new(tmp.path());
        let err = src.fetch("shard_02.json").await.unwrap_err();
        assert!(err.to_string().contains("shard_02.json"));
    }
}
