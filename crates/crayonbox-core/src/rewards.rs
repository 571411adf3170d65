//! Sticker rewards unlocked by saving drawings.

use crate::stickers::StickerCatalog;
use crate::storage::{RewardStore, StorageResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reward state of one child.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardProgress {
    pub owner_id: String,
    pub drawings_count: u32,
    /// Sticker ids unlocked so far, in unlock order.
    pub unlocked: Vec<String>,
    /// Stickers unlocked by the most recent update, not yet acknowledged.
    pub newly_unlocked: Vec<String>,
}

impl RewardProgress {
    pub fn new(owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            ..Default::default()
        }
    }

    pub fn is_unlocked(&self, sticker_id: &str) -> bool {
        self.unlocked.iter().any(|id| id == sticker_id)
    }

    /// Record a new drawing count and unlock every sticker whose threshold
    /// it meets. Returns the ids unlocked by this call.
    pub fn apply_count(&mut self, catalog: &StickerCatalog, drawings_count: u32) -> Vec<String> {
        self.drawings_count = drawings_count;
        let newly: Vec<String> = catalog
            .unlocked_at(drawings_count)
            .filter(|entry| !self.is_unlocked(entry.id))
            .map(|entry| entry.id.to_string())
            .collect();
        self.unlocked.extend(newly.iter().cloned());
        self.newly_unlocked = newly.clone();
        newly
    }
}

/// Tracks reward progress through an injected store.
pub struct RewardTracker<S: RewardStore + ?Sized> {
    store: Arc<S>,
    catalog: StickerCatalog,
}

impl<S: RewardStore + ?Sized> RewardTracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_catalog(store, StickerCatalog::default())
    }

    pub fn with_catalog(store: Arc<S>, catalog: StickerCatalog) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &StickerCatalog {
        &self.catalog
    }

    pub async fn progress(&self, owner_id: &str) -> StorageResult<RewardProgress> {
        self.store.load_progress(owner_id).await
    }

    /// Set the owner's drawing count and persist any unlocks.
    pub async fn update_progress(
        &self,
        owner_id: &str,
        drawings_count: u32,
    ) -> StorageResult<Vec<String>> {
        let mut progress = self.store.load_progress(owner_id).await?;
        let newly = progress.apply_count(&self.catalog, drawings_count);
        self.store.save_progress(&progress).await?;

        if !newly.is_empty() {
            log::info!("Unlocked stickers for {}: {}", owner_id, newly.join(", "));
        }
        Ok(newly)
    }

    /// Acknowledge the pending unlock notification.
    pub async fn clear_newly_unlocked(&self, owner_id: &str) -> StorageResult<()> {
        let mut progress = self.store.load_progress(owner_id).await?;
        if progress.newly_unlocked.is_empty() {
            return Ok(());
        }
        progress.newly_unlocked.clear();
        self.store.save_progress(&progress).await
    }
}
