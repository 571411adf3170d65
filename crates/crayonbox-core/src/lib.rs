//! Crayonbox Core Library
//!
//! Raster drawing engine for a children's drawing app: layered canvas,
//! brush/eraser strokes, paint-bucket fill, sticker overlays, bounded undo,
//! and persistence of finished artworks with sticker rewards.

pub mod action_log;
pub mod color;
pub mod export;
pub mod fill;
pub mod history;
pub mod input;
pub mod layers;
pub mod raster;
pub mod rewards;
pub mod session;
pub mod shortcuts;
pub mod stickers;
pub mod storage;
pub mod stroke;
pub mod timer;

pub use action_log::{Action, ActionLog, ActionLogEntry};
pub use color::{PALETTE, Rgba, colors_equal, parse_hex_color};
pub use export::{ExportError, ThumbnailSpec, encode_png, encode_thumbnail};
pub use fill::{FillOutcome, flood_fill};
pub use history::{HistoryManager, UndoOutcome};
pub use input::{ClientRect, FocusTarget, Modifiers, PointerSample, RawPointer, to_raster_coords};
pub use layers::LayerStore;
pub use raster::{RasterBuffer, RasterError, Snapshot};
pub use rewards::{RewardProgress, RewardTracker};
pub use session::{DrawingSession, Owner, SaveOutcome, SessionConfig, SessionError, ToolKind};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry, resolve_shortcut};
pub use stickers::{StickerCatalog, StickerElement, StickerId, StickerOverlay};
pub use storage::{ArtworkRecord, ArtworkStore, FileStorage, MemoryStorage, RewardStore};
pub use stroke::{StrokeRenderer, Tool};
pub use timer::SessionTimer;
