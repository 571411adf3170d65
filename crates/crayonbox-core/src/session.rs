//! A child's drawing session: input dispatch over the layered canvas.
//!
//! The session owns the ink/display layers, the sticker overlay, undo
//! history, action log and timer, plus injected handles to the artwork and
//! reward stores. Every mutating call leaves `display` recomposited.

use crate::action_log::{Action, ActionLog, DEFAULT_LOG_CAPACITY};
use crate::color::{DEFAULT_BRUSH_HEX, Rgba, parse_hex_color};
use crate::export::{ExportError, ThumbnailSpec, encode_png, encode_thumbnail};
use crate::fill::{FillOutcome, flood_fill};
use crate::history::{DEFAULT_HISTORY_CAPACITY, HistoryManager, UndoOutcome};
use crate::input::{ClientRect, FocusTarget, Modifiers, PointerSample, RawPointer};
use crate::layers::LayerStore;
use crate::raster::{RasterBuffer, RasterError};
use crate::rewards::{RewardProgress, RewardTracker};
use crate::shortcuts::{ShortcutAction, resolve_shortcut};
use crate::stickers::{
    BadgePainter, HandleKind, StickerCatalog, StickerId, StickerOverlay, StickerPainter,
};
use crate::storage::{ArtworkRecord, ArtworkStore, NewArtwork, RewardStore, StorageError};
use crate::stroke::{DEFAULT_BRUSH_SIZE, StrokeMode, StrokeRenderer, Tool, clamp_brush_size};
use crate::timer::SessionTimer;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Tunables for a drawing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Background hex color of a blank canvas.
    pub background: String,
    pub history_capacity: usize,
    pub action_log_capacity: usize,
    /// Initial brush hex color.
    pub default_color: String,
    pub default_brush_size: f64,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub jpeg_quality: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            background: "#ffffff".to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            action_log_capacity: DEFAULT_LOG_CAPACITY,
            default_color: DEFAULT_BRUSH_HEX.to_string(),
            default_brush_size: DEFAULT_BRUSH_SIZE,
            thumbnail_width: 200,
            thumbnail_height: 150,
            jpeg_quality: 70,
        }
    }
}

impl SessionConfig {
    pub fn thumbnail(&self) -> ThumbnailSpec {
        ThumbnailSpec {
            width: self.thumbnail_width,
            height: self.thumbnail_height,
            quality: self.jpeg_quality,
        }
    }
}

/// The child who owns the session's artworks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub name: String,
}

impl Owner {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Which toolbar tool is active. Eraser and bucket are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Bucket,
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    Drawing,
    Resizing {
        id: StickerId,
        handle: HandleKind,
        start: Point,
        start_size: f64,
    },
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub record: ArtworkRecord,
    /// Sticker ids unlocked by this save.
    pub newly_unlocked: Vec<String>,
}

/// Drawing session state and orchestration.
pub struct DrawingSession {
    config: SessionConfig,
    owner: Owner,
    layers: LayerStore,
    stickers: StickerOverlay,
    catalog: StickerCatalog,
    painter: Box<dyn StickerPainter>,
    history: HistoryManager,
    actions: ActionLog,
    timer: SessionTimer,
    renderer: StrokeRenderer,
    tool: ToolKind,
    color: Rgba,
    brush_size: f64,
    gesture: Gesture,
    artworks: Arc<dyn ArtworkStore>,
    rewards: RewardTracker<dyn RewardStore>,
}

impl DrawingSession {
    pub fn new(
        config: SessionConfig,
        owner: Owner,
        artworks: Arc<dyn ArtworkStore>,
        rewards: Arc<dyn RewardStore>,
    ) -> Result<Self, SessionError> {
        let background = parse_hex_color(&config.background)
            .ok_or_else(|| SessionError::InvalidColor(config.background.clone()))?;
        let color = parse_hex_color(&config.default_color)
            .ok_or_else(|| SessionError::InvalidColor(config.default_color.clone()))?;
        let layers = LayerStore::new(config.canvas_width, config.canvas_height, background)?;

        log::info!(
            "Drawing session for {} ({}x{})",
            owner.id,
            config.canvas_width,
            config.canvas_height
        );

        Ok(Self {
            history: HistoryManager::new(config.history_capacity, background),
            actions: ActionLog::new(config.action_log_capacity),
            brush_size: clamp_brush_size(config.default_brush_size),
            config,
            owner,
            layers,
            stickers: StickerOverlay::new(),
            catalog: StickerCatalog::default(),
            painter: Box::new(BadgePainter),
            timer: SessionTimer::new(),
            renderer: StrokeRenderer::new(),
            tool: ToolKind::default(),
            color,
            gesture: Gesture::Idle,
            artworks,
            rewards: RewardTracker::new(rewards),
        })
    }

    /// Replace the sticker glyph painter.
    pub fn with_painter(mut self, painter: Box<dyn StickerPainter>) -> Self {
        self.painter = painter;
        self.recomposite();
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Raster dimensions.
    pub fn raster_size(&self) -> Size {
        Size::new(self.layers.width() as f64, self.layers.height() as f64)
    }

    pub fn background(&self) -> Rgba {
        self.layers.background()
    }

    pub fn display(&self) -> &RasterBuffer {
        self.layers.display()
    }

    pub fn ink(&self) -> &RasterBuffer {
        self.layers.ink()
    }

    pub fn stickers(&self) -> &StickerOverlay {
        &self.stickers
    }

    pub fn catalog(&self) -> &StickerCatalog {
        &self.catalog
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn action_log(&self) -> &ActionLog {
        &self.actions
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Whether a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.gesture == Gesture::Drawing
    }

    /// Whether a sticker handle is being dragged.
    pub fn is_resizing(&self) -> bool {
        matches!(self.gesture, Gesture::Resizing { .. })
    }

    /// Paint parameters for the next stroke.
    pub fn stroke_tool(&self) -> Tool {
        match self.tool {
            ToolKind::Eraser => Tool::eraser(self.brush_size),
            _ => Tool::brush(self.color, self.brush_size),
        }
    }

    /// Normalize a host pointer event against the canvas element's bounds.
    pub fn sample(&self, pointer: &RawPointer, bounds: ClientRect) -> Option<PointerSample> {
        pointer.to_sample(bounds, self.raster_size())
    }

    fn recomposite(&mut self) {
        self.layers
            .recomposite(&self.stickers, &self.catalog, self.painter.as_ref());
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, sample: PointerSample) {
        if self.gesture != Gesture::Idle {
            self.finish_gesture();
        }
        let point = sample.point();

        if self.tool == ToolKind::Bucket {
            self.bucket_fill(sample);
            return;
        }

        if let Some((id, handle)) = self.stickers.hit_test_handle(point) {
            let start_size = self.stickers.get(id).map(|s| s.size).unwrap_or_default();
            log::debug!("Resizing {} from {:?}", id, handle);
            self.gesture = Gesture::Resizing {
                id,
                handle,
                start: point,
                start_size,
            };
            return;
        }

        if let Some(id) = self.stickers.hit_test(point).map(|s| s.id) {
            self.stickers.toggle_selection(id);
            self.recomposite();
            return;
        }

        self.stickers.deselect();
        self.history.snapshot(self.layers.ink());
        let tool = self.stroke_tool();
        self.renderer.begin(point, tool);
        self.actions.record(match tool.mode {
            StrokeMode::Paint => Action::Draw {
                start: point,
                color: tool.color,
                size: tool.size,
            },
            StrokeMode::Erase => Action::Erase {
                start: point,
                size: tool.size,
            },
        });
        self.timer.start();
        self.gesture = Gesture::Drawing;
        self.recomposite();
    }

    pub fn pointer_move(&mut self, sample: PointerSample) {
        let point = sample.point();
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Drawing => {
                self.renderer.extend(self.layers.ink_mut(), point);
                self.recomposite();
            }
            Gesture::Resizing {
                id,
                start,
                start_size,
                ..
            } => {
                self.stickers.resize_by_drag(id, start_size, start, point);
                self.recomposite();
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.finish_gesture();
    }

    /// The pointer left the canvas; treated like a release.
    pub fn pointer_leave(&mut self) {
        self.finish_gesture();
    }

    fn finish_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Drawing => {
                self.renderer.end(self.layers.ink_mut());
                if let Some(minutes) = self.timer.stop() {
                    log::debug!("Stroke took {:.3} min", minutes);
                }
                self.recomposite();
            }
            Gesture::Resizing { id, handle, .. } => {
                log::debug!("Finished resizing {} from {:?}", id, handle);
            }
        }
    }

    fn bucket_fill(&mut self, sample: PointerSample) {
        let (x, y) = sample.pixel();
        // Only snapshot when the fill will write.
        match self.layers.ink().pixel(x, y) {
            None => {
                log::debug!("Fill seed ({}, {}) outside canvas", x, y);
                return;
            }
            Some(target) if target == self.color.with_full_alpha() => return,
            Some(_) => {}
        }

        self.history.snapshot(self.layers.ink());
        let outcome = flood_fill(self.layers.ink_mut(), x, y, self.color);
        if let FillOutcome::Filled { pixels } = outcome {
            self.actions.record(Action::Bucket {
                seed: sample.point(),
                color: self.color,
                pixels,
            });
        }
        self.recomposite();
    }

    // --- Stickers ---

    /// Place a sticker dropped onto the canvas.
    ///
    /// The payload must name a catalog entry; anything else is ignored.
    pub fn drop_sticker(&mut self, payload: &str, sample: PointerSample) -> Option<StickerId> {
        let type_id = payload.trim();
        if !self.catalog.contains(type_id) {
            log::warn!("Ignoring drop of unknown sticker '{}'", type_id);
            return None;
        }
        let element = self.stickers.place(type_id, sample.point()).clone();
        let id = element.id;
        self.actions.record(Action::Sticker(element));
        self.recomposite();
        Some(id)
    }

    pub fn delete_selected_sticker(&mut self) -> bool {
        let Some(id) = self.stickers.selected() else {
            return false;
        };
        self.stickers.remove(id);
        self.recomposite();
        true
    }

    /// Grow or shrink the selected sticker by `delta`.
    pub fn resize_selected_sticker(&mut self, delta: f64) -> Option<f64> {
        let id = self.stickers.selected()?;
        let size = self.stickers.resize_by_step(id, delta);
        self.recomposite();
        size
    }

    /// Rotate the selected sticker by `delta_degrees`.
    pub fn rotate_selected_sticker(&mut self, delta_degrees: f64) -> Option<f64> {
        let id = self.stickers.selected()?;
        let rotation = self.stickers.rotate(id, delta_degrees);
        self.recomposite();
        rotation
    }

    // --- Toolbar ---

    pub fn select_brush(&mut self) {
        self.tool = ToolKind::Brush;
    }

    pub fn toggle_eraser(&mut self) {
        self.tool = match self.tool {
            ToolKind::Eraser => ToolKind::Brush,
            _ => ToolKind::Eraser,
        };
    }

    pub fn toggle_bucket(&mut self) {
        self.tool = match self.tool {
            ToolKind::Bucket => ToolKind::Brush,
            _ => ToolKind::Bucket,
        };
        log::debug!("Tool: {:?}", self.tool);
    }

    /// Pick a palette color. Invalid hex strings are ignored.
    ///
    /// Choosing a color leaves eraser mode.
    pub fn set_color(&mut self, hex: &str) -> bool {
        let Some(color) = parse_hex_color(hex) else {
            log::warn!("Ignoring invalid color '{}'", hex);
            return false;
        };
        self.color = color;
        if self.tool == ToolKind::Eraser {
            self.tool = ToolKind::Brush;
        }
        true
    }

    pub fn set_brush_size(&mut self, size: f64) -> f64 {
        self.brush_size = clamp_brush_size(size);
        self.brush_size
    }

    /// Undo the last stroke or fill.
    ///
    /// An open stroke is committed first, so it is the one undone.
    pub fn undo(&mut self) -> Result<UndoOutcome, SessionError> {
        self.finish_gesture();
        let outcome = self.history.undo(self.layers.ink_mut())?;
        self.recomposite();
        Ok(outcome)
    }

    /// Wipe ink, stickers, history, the action log and the timer.
    pub fn clear(&mut self) {
        self.finish_gesture();
        self.layers.clear();
        self.stickers.clear();
        self.history.clear();
        self.actions.clear();
        self.timer.reset();
        self.recomposite();
        log::debug!("Canvas cleared");
    }

    // --- Keyboard ---

    /// Apply a canvas shortcut, if `key` maps to one in this context.
    pub fn handle_key(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        focus: FocusTarget,
    ) -> Result<Option<ShortcutAction>, SessionError> {
        let Some(action) = resolve_shortcut(key, modifiers, focus) else {
            return Ok(None);
        };
        match action {
            ShortcutAction::Undo => {
                self.undo()?;
            }
            ShortcutAction::ToggleBucket => self.toggle_bucket(),
        }
        Ok(Some(action))
    }

    // --- Persistence ---

    /// The image that gets saved: ink and stickers, no selection marks.
    pub fn render_image(&self) -> RasterBuffer {
        self.layers
            .flatten(&self.stickers, &self.catalog, self.painter.as_ref())
    }

    /// Save the current drawing for the owner and update their rewards.
    ///
    /// The PNG and thumbnail come from [`Self::render_image`], which is the
    /// display without the sticker selection outline and handles.
    /// The canvas is left untouched whether or not the save succeeds.
    pub async fn save(&self) -> Result<SaveOutcome, SessionError> {
        let image = self.render_image();
        let image_png = encode_png(&image)?;
        let thumbnail_jpeg =
            match encode_thumbnail(&image, self.config.thumbnail(), self.layers.background()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("Thumbnail encoding failed, saving without one: {}", e);
                    Vec::new()
                }
            };

        let existing = self
            .artworks
            .list_by_owner(&self.owner.id)
            .await
            .inspect_err(|e| log::error!("Failed to list artworks: {}", e))?;
        let count = existing.len() as u32 + 1;

        let record = self
            .artworks
            .save(NewArtwork {
                owner_id: self.owner.id.clone(),
                owner_name: self.owner.name.clone(),
                title: format!("My Drawing {}", count),
                image_png,
                thumbnail_jpeg,
                duration_minutes: Some(self.timer.rounded_minutes()),
            })
            .await
            .inspect_err(|e| log::error!("Failed to save artwork: {}", e))?;
        log::info!("Saved '{}' ({})", record.title, record.id);

        let newly_unlocked = match self.rewards.update_progress(&self.owner.id, count).await {
            Ok(newly) => newly,
            Err(e) => {
                log::warn!("Artwork saved but reward progress was not updated: {}", e);
                Vec::new()
            }
        };

        Ok(SaveOutcome {
            record,
            newly_unlocked,
        })
    }

    pub async fn reward_progress(&self) -> Result<RewardProgress, SessionError> {
        Ok(self.rewards.progress(&self.owner.id).await?)
    }

    /// Dismiss the "new stickers" notification.
    pub async fn acknowledge_unlocks(&self) -> Result<(), SessionError> {
        Ok(self.rewards.clear_newly_unlocked(&self.owner.id).await?)
    }
}
