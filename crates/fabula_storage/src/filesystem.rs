//! Filesystem-based story storage.

use async_trait::async_trait;
use fabula_core::{StoryGraph, StoryId, StoryRecord, StorySummary};
use fabula_error::{FabulaResult, StorageError, StorageErrorKind};
use fabula_interface::StoryRepository;
use std::path::{Path, PathBuf};

/// Filesystem repository for story records.
///
/// Stores one pretty-printed JSON file per story:
/// `{base_path}/{story_id}.json`
///
/// # Example Structure
///
/// ```text
/// ~/.local/share/fabula/stories/
/// ├── 0b7e6c1a-7d0f-4c55-9a0e-5f1f8e2d9c31.json
/// └── 9f4e2a77-3b2c-4d8e-a1f0-6c2b7d5e4a10.json
/// ```
///
/// Writes go to a temp file first and are renamed into place, so a reader never
/// sees a half-written record.
#[derive(Debug, Clone)]
pub struct FileSystemStoryRepository {
    base_path: PathBuf,
}

impl FileSystemStoryRepository {
    /// Create a new filesystem repository.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> FabulaResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %base_path.display(), "Opened filesystem story store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, id: &StoryId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    async fn read_record(&self, path: &Path, id: &str) -> FabulaResult<StoryRecord> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(id.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        serde_json::from_slice(&data).map_err(|e| {
            StorageError::new(StorageErrorKind::Corrupt(format!("{}: {}", path.display(), e)))
                .into()
        })
    }

    /// Write to temp file first, then rename for atomicity.
    async fn write_record(&self, record: &StoryRecord) -> FabulaResult<()> {
        let path = self.path_for(&record.id);
        let data = serde_json::to_vec_pretty(record).map_err(|e| {
            StorageError::new(StorageErrorKind::Corrupt(format!("{}: {}", record.id, e)))
        })?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        Ok(())
    }
}

#[async_trait]
impl StoryRepository for FileSystemStoryRepository {
    #[tracing::instrument(skip(self, record), fields(story_id = %record.id))]
    async fn insert(&self, record: &StoryRecord) -> FabulaResult<()> {
        let path = self.path_for(&record.id);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(
                StorageError::new(StorageErrorKind::AlreadyExists(record.id.to_string())).into(),
            );
        }

        self.write_record(record).await?;
        tracing::info!(path = %path.display(), "Stored story");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(story_id = %id))]
    async fn load(&self, id: &StoryId) -> FabulaResult<StoryRecord> {
        self.read_record(&self.path_for(id), &id.to_string()).await
    }

    #[tracing::instrument(skip(self, graph), fields(story_id = %id, node = %graph.current_node_id()))]
    async fn save(&self, id: &StoryId, graph: &StoryGraph, completed: bool) -> FabulaResult<()> {
        let mut record = self.load(id).await?;
        record.record_step(graph.clone(), completed);
        self.write_record(&record).await?;
        tracing::debug!(steps = graph.steps(), "Saved story progress");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(path = %self.base_path.display()))]
    async fn list(&self) -> FabulaResult<Vec<StorySummary>> {
        let mut entries = tokio::fs::read_dir(&self.base_path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.base_path.display(),
                e
            )))
        })?;

        let mut summaries = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    self.base_path.display(),
                    e
                )))
            })?;
            let Some(entry) = entry else { break };

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();
            match self.read_record(&path, &name).await {
                Ok(record) => summaries.push(record.summary()),
                Err(err) => tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable story"),
            }
        }

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}
