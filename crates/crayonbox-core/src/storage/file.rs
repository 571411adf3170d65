//! File-based storage implementation.

use super::{
    ArtworkRecord, ArtworkStore, BoxFuture, NewArtwork, RewardStore, StorageError, StorageResult,
    sort_by_creation,
};
use crate::rewards::RewardProgress;
use std::fs;
use std::path::{Path, PathBuf};

const ARTWORKS_DIR: &str = "artworks";
const REWARDS_DIR: &str = "rewards";

/// Stores each artwork and each owner's reward progress as a JSON file.
///
/// Layout: `<base>/artworks/<id>.json`, `<base>/rewards/<owner>.json`.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating directories as needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        for dir in [ARTWORKS_DIR, REWARDS_DIR] {
            let path = base_path.join(dir);
            if !path.exists() {
                fs::create_dir_all(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to create {}: {}", path.display(), e))
                })?;
            }
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the platform data directory
    /// (e.g. `~/.local/share/crayonbox/` on Linux).
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("crayonbox"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn artwork_path(&self, id: &str) -> PathBuf {
        self.base_path
            .join(ARTWORKS_DIR)
            .join(format!("{}.json", sanitize(id)))
    }

    fn progress_path(&self, owner_id: &str) -> PathBuf {
        self.base_path
            .join(REWARDS_DIR)
            .join(format!("{}.json", sanitize(owner_id)))
    }
}

/// Map an id to a safe file stem.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> StorageResult<T> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    fs::write(path, json)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

impl ArtworkStore for FileStorage {
    fn save(&self, artwork: NewArtwork) -> BoxFuture<'_, StorageResult<ArtworkRecord>> {
        Box::pin(async move {
            let record = ArtworkRecord::create(artwork);
            write_json(&self.artwork_path(&record.id), &record)?;
            log::debug!("Wrote artwork {}", record.id);
            Ok(record)
        })
    }

    fn list_by_owner(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<Vec<ArtworkRecord>>> {
        let owner_id = owner_id.to_string();
        let dir = self.base_path.join(ARTWORKS_DIR);

        Box::pin(async move {
            if !dir.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&dir)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut records = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().map(|e| e != "json").unwrap_or(true) {
                    continue;
                }
                match read_json::<ArtworkRecord>(&path) {
                    Ok(record) if record.owner_id == owner_id => records.push(record),
                    Ok(_) => {}
                    Err(e) => log::warn!("Skipping unreadable artwork: {}", e),
                }
            }
            sort_by_creation(&mut records);
            Ok(records)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ArtworkRecord>> {
        let path = self.artwork_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id_owned));
            }
            read_json(&path)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.artwork_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }
}

impl RewardStore for FileStorage {
    fn load_progress(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<RewardProgress>> {
        let path = self.progress_path(owner_id);
        let owner_id = owner_id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Ok(RewardProgress::new(&owner_id));
            }
            read_json(&path)
        })
    }

    fn save_progress(&self, progress: &RewardProgress) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.progress_path(&progress.owner_id);
        let progress = progress.clone();
        Box::pin(async move { write_json(&path, &progress) })
    }
}
