//! In-memory storage implementation.

use super::{
    ArtworkRecord, ArtworkStore, BoxFuture, NewArtwork, RewardStore, StorageError, StorageResult,
    sort_by_creation,
};
use crate::rewards::RewardProgress;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    artworks: RwLock<HashMap<String, ArtworkRecord>>,
    progress: RwLock<HashMap<String, RewardProgress>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl ArtworkStore for MemoryStorage {
    fn save(&self, artwork: NewArtwork) -> BoxFuture<'_, StorageResult<ArtworkRecord>> {
        Box::pin(async move {
            let record = ArtworkRecord::create(artwork);
            let mut artworks = self.artworks.write().map_err(lock_error)?;
            artworks.insert(record.id.clone(), record.clone());
            Ok(record)
        })
    }

    fn list_by_owner(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<Vec<ArtworkRecord>>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let artworks = self.artworks.read().map_err(lock_error)?;
            let mut records: Vec<_> = artworks
                .values()
                .filter(|a| a.owner_id == owner_id)
                .cloned()
                .collect();
            sort_by_creation(&mut records);
            Ok(records)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ArtworkRecord>> {
        let id = id.to_string();
        Box::pin(async move {
            let artworks = self.artworks.read().map_err(lock_error)?;
            artworks
                .get(&id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut artworks = self.artworks.write().map_err(lock_error)?;
            artworks.remove(&id);
            Ok(())
        })
    }
}

impl RewardStore for MemoryStorage {
    fn load_progress(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<RewardProgress>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let progress = self.progress.read().map_err(lock_error)?;
            Ok(progress
                .get(&owner_id)
                .cloned()
                .unwrap_or_else(|| RewardProgress::new(&owner_id)))
        })
    }

    fn save_progress(&self, progress: &RewardProgress) -> BoxFuture<'_, StorageResult<()>> {
        let progress = progress.clone();
        Box::pin(async move {
            let mut all = self.progress.write().map_err(lock_error)?;
            all.insert(progress.owner_id.clone(), progress);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::new_artwork;
    use pollster::block_on;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let record = block_on(storage.save(new_artwork("kid", "My Drawing 1"))).unwrap();
        let loaded = block_on(storage.load(&record.id)).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list_by_owner() {
        let storage = MemoryStorage::new();
        block_on(storage.save(new_artwork("a", "one"))).unwrap();
        block_on(storage.save(new_artwork("b", "two"))).unwrap();
        block_on(storage.save(new_artwork("a", "three"))).unwrap();

        let list = block_on(storage.list_by_owner("a")).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|r| r.owner_id == "a"));
        assert!(block_on(storage.list_by_owner("c")).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let storage = MemoryStorage::new();
        let record = block_on(storage.save(new_artwork("kid", "one"))).unwrap();
        block_on(storage.delete(&record.id)).unwrap();
        assert!(block_on(storage.load(&record.id)).is_err());
        block_on(storage.delete(&record.id)).unwrap();
    }

    #[test]
    fn test_progress_defaults_and_persists() {
        let storage = MemoryStorage::new();
        let mut progress = block_on(storage.load_progress("kid")).unwrap();
        assert_eq!(progress, RewardProgress::new("kid"));

        progress.drawings_count = 4;
        block_on(storage.save_progress(&progress)).unwrap();
        assert_eq!(block_on(storage.load_progress("kid")).unwrap().drawings_count, 4);
    }
}
