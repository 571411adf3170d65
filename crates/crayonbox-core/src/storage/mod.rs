//! Storage abstraction for saved artworks and reward progress.
//!
//! Stores are injected into the drawing session; every entity is keyed by
//! the owning child's identifier.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::export::{JPEG_MIME, PNG_MIME, to_data_url};
use crate::rewards::RewardProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use uuid::Uuid;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Artwork not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// An artwork about to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtwork {
    pub owner_id: String,
    pub owner_name: String,
    pub title: String,
    /// Full-size PNG of the display layer.
    pub image_png: Vec<u8>,
    /// Small JPEG preview. Empty when the thumbnail could not be encoded.
    pub thumbnail_jpeg: Vec<u8>,
    /// Active drawing time in minutes, one decimal.
    pub duration_minutes: Option<f64>,
}

/// A saved artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    pub id: String,
    pub owner_id: String,
    pub owner_name: String,
    pub title: String,
    #[serde(with = "base64_bytes")]
    pub image_png: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub thumbnail_jpeg: Vec<u8>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
}

impl ArtworkRecord {
    /// Assign a fresh id and creation time.
    pub fn create(artwork: NewArtwork) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: artwork.owner_id,
            owner_name: artwork.owner_name,
            title: artwork.title,
            image_png: artwork.image_png,
            thumbnail_jpeg: artwork.thumbnail_jpeg,
            created_at: Utc::now(),
            duration_minutes: artwork.duration_minutes,
        }
    }

    /// The image as a `data:image/png;base64,` URL.
    pub fn image_data_url(&self) -> String {
        to_data_url(PNG_MIME, &self.image_png)
    }

    /// The thumbnail as a JPEG data URL, or an empty string if there is none.
    pub fn thumbnail_data_url(&self) -> String {
        if self.thumbnail_jpeg.is_empty() {
            return String::new();
        }
        to_data_url(JPEG_MIME, &self.thumbnail_jpeg)
    }
}

/// Image bytes are stored as base64 strings in JSON.
mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Order records oldest first, as the gallery lists them.
pub(crate) fn sort_by_creation(records: &mut [ArtworkRecord]) {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}

/// Repository of saved artworks.
pub trait ArtworkStore: Send + Sync {
    /// Persist a new artwork and return the stored record.
    fn save(&self, artwork: NewArtwork) -> BoxFuture<'_, StorageResult<ArtworkRecord>>;

    /// All artworks of one owner, oldest first.
    fn list_by_owner(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<Vec<ArtworkRecord>>>;

    /// Load one artwork.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ArtworkRecord>>;

    /// Delete an artwork. Deleting a missing id is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}

/// Repository of per-owner sticker reward progress.
pub trait RewardStore: Send + Sync {
    /// Progress for an owner; a fresh record when none was saved.
    fn load_progress(&self, owner_id: &str) -> BoxFuture<'_, StorageResult<RewardProgress>>;

    /// Replace the stored progress for `progress.owner_id`.
    fn save_progress(&self, progress: &RewardProgress) -> BoxFuture<'_, StorageResult<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn new_artwork(owner: &str, title: &str) -> NewArtwork {
        NewArtwork {
            owner_id: owner.to_string(),
            owner_name: "Mia".to_string(),
            title: title.to_string(),
            image_png: vec![0x89, b'P', b'N', b'G'],
            thumbnail_jpeg: vec![0xff, 0xd8],
            duration_minutes: Some(1.5),
        }
    }

    #[test]
    fn test_create_assigns_id() {
        let a = ArtworkRecord::create(new_artwork("kid", "one"));
        let b = ArtworkRecord::create(new_artwork("kid", "two"));
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_record_json_uses_base64() {
        let record = ArtworkRecord::create(new_artwork("kid", "one"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["image_png"], "iVBORw==");
        assert_eq!(json["duration_minutes"], 1.5);

        let back: ArtworkRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_data_urls() {
        let mut record = ArtworkRecord::create(new_artwork("kid", "one"));
        assert!(record.image_data_url().starts_with("data:image/png;base64,"));
        assert!(record.thumbnail_data_url().starts_with("data:image/jpeg;base64,"));

        record.thumbnail_jpeg.clear();
        assert_eq!(record.thumbnail_data_url(), "");
    }
}
