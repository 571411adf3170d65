//! Bounded audit trail of canvas actions.
//!
//! The log is diagnostic only: it never feeds undo.

use crate::color::Rgba;
use crate::stickers::StickerElement;
use chrono::{DateTime, Utc};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of entries kept.
pub const DEFAULT_LOG_CAPACITY: usize = 10;

/// A recorded user action with its own payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    /// A brush stroke started.
    Draw { start: Point, color: Rgba, size: f64 },
    /// An eraser stroke started.
    Erase { start: Point, size: f64 },
    /// A flood fill was requested.
    Bucket { seed: Point, color: Rgba, pixels: usize },
    /// A sticker was placed.
    Sticker(StickerElement),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Draw { .. } => "draw",
            Action::Erase { .. } => "erase",
            Action::Bucket { .. } => "bucket",
            Action::Sticker(_) => "sticker",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub action: Action,
    pub timestamp: DateTime<Utc>,
}

/// Append-only log that forgets its oldest entry once full.
#[derive(Debug, Clone)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    capacity: usize,
}

impl ActionLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, action: Action) {
        self.record_at(action, Utc::now());
    }

    pub fn record_at(&mut self, action: Action, timestamp: DateTime<Utc>) {
        log::trace!("Action: {}", action.kind());
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ActionLogEntry { action, timestamp });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn erase(n: u32) -> Action {
        Action::Erase {
            start: Point::new(n as f64, 0.0),
            size: 8.0,
        }
    }

    #[test]
    fn test_bounded_fifo() {
        let mut log = ActionLog::default();
        for n in 0..14 {
            log.record(erase(n));
        }
        assert_eq!(log.len(), DEFAULT_LOG_CAPACITY);
        assert_eq!(log.iter().next().map(|e| &e.action), Some(&erase(4)));
        assert_eq!(log.iter().last().map(|e| &e.action), Some(&erase(13)));
    }

    #[test]
    fn test_serialized_shape() {
        let entry = ActionLogEntry {
            action: Action::Draw {
                start: Point::new(1.0, 2.0),
                color: Rgba::opaque(1, 2, 3),
                size: 4.0,
            },
            timestamp: DateTime::from_timestamp(0, 0).unwrap(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"]["type"], "draw");
        assert_eq!(json["action"]["data"]["size"], 4.0);
        assert_eq!(json["timestamp"], "1970-01-01T00:00:00Z");
    }
}
