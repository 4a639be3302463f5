#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;

use crate::domain::models::SessionStorage;

/// Stores the envelope as one JSON file. Writes go to a sibling temp file
/// that is renamed over the target.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> FileStorage {
        return FileStorage { path };
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|e| return e.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        return self.path.with_file_name(name);
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    fn describe(&self) -> String {
        return self.path.display().to_string();
    }

    async fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let blob = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        if blob.trim().is_empty() {
            return Ok(None);
        }

        return Ok(Some(blob));
    }

    async fn write(&self, blob: String) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, blob)
            .await
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;

        return Ok(());
    }
}
