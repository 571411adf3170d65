//! Scripted replay of pointer, keyboard and toolbar input against a session.

use crayonbox_core::export::{ExportError, encode_png, encode_thumbnail};
use crayonbox_core::input::{ClientRect, FocusTarget, Modifiers, RawPointer};
use crayonbox_core::session::{DrawingSession, SessionError};
use crayonbox_core::storage::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script or config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Step {index}: {source}")]
    Step {
        index: usize,
        #[source]
        source: SessionError,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// One recorded input event or toolbar command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    PointerDown {
        pointer: RawPointer,
    },
    PointerMove {
        pointer: RawPointer,
    },
    PointerUp,
    PointerLeave,
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        focus: FocusTarget,
    },
    /// A sticker dragged from the tray onto the canvas.
    Drop {
        sticker: String,
        pointer: RawPointer,
    },
    SelectBrush,
    ToggleEraser,
    ToggleBucket,
    Color {
        hex: String,
    },
    BrushSize {
        size: f64,
    },
    ResizeSticker {
        delta: f64,
    },
    RotateSticker {
        degrees: f64,
    },
    DeleteSticker,
    Undo,
    Clear,
    Save,
    /// Write the current display layer to `<out>/<name>.png`.
    Snapshot {
        name: String,
    },
}

/// A replay script: canvas element bounds plus the steps to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Client-space bounds of the canvas element. Defaults to 1:1 with the raster.
    #[serde(default)]
    pub bounds: Option<ClientRect>,
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_path(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ReplayError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// What a replay produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub steps: usize,
    /// Titles of the artworks saved along the way.
    pub saved: Vec<String>,
    /// Stickers unlocked by those saves.
    pub unlocked: Vec<String>,
    /// Files written to the output directory.
    pub outputs: Vec<PathBuf>,
}

/// Drives a session from script steps and writes images to `out_dir`.
pub struct Replayer {
    session: DrawingSession,
    bounds: ClientRect,
    out_dir: PathBuf,
    summary: ReplaySummary,
}

impl Replayer {
    pub fn new(session: DrawingSession, bounds: Option<ClientRect>, out_dir: PathBuf) -> Self {
        let bounds = bounds.unwrap_or_else(|| ClientRect::identity(session.raster_size()));
        Self {
            session,
            bounds,
            out_dir,
            summary: ReplaySummary::default(),
        }
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    /// Apply every step, then write the final image and thumbnail.
    pub fn run(mut self, steps: &[ScriptStep]) -> Result<ReplaySummary, ReplayError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| ReplayError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        for (index, step) in steps.iter().enumerate() {
            self.apply(step)
                .map_err(|source| ReplayError::Step { index, source })?;
            self.summary.steps += 1;
        }

        let image = self.session.render_image();
        self.write("display.png", &encode_png(&image)?)?;
        let thumbnail = encode_thumbnail(
            &image,
            self.session.config().thumbnail(),
            self.session.background(),
        )?;
        self.write("thumbnail.jpg", &thumbnail)?;

        Ok(self.summary)
    }

    fn apply(&mut self, step: &ScriptStep) -> Result<(), SessionError> {
        log::debug!("Step: {:?}", step);
        let session = &mut self.session;
        match step {
            ScriptStep::PointerDown { pointer } => {
                if let Some(sample) = session.sample(pointer, self.bounds) {
                    session.pointer_down(sample);
                }
            }
            ScriptStep::PointerMove { pointer } => {
                if let Some(sample) = session.sample(pointer, self.bounds) {
                    session.pointer_move(sample);
                }
            }
            ScriptStep::PointerUp => session.pointer_up(),
            ScriptStep::PointerLeave => session.pointer_leave(),
            ScriptStep::Key {
                key,
                modifiers,
                focus,
            } => {
                session.handle_key(key, *modifiers, *focus)?;
            }
            ScriptStep::Drop { sticker, pointer } => {
                if let Some(sample) = session.sample(pointer, self.bounds) {
                    session.drop_sticker(sticker, sample);
                }
            }
            ScriptStep::SelectBrush => session.select_brush(),
            ScriptStep::ToggleEraser => session.toggle_eraser(),
            ScriptStep::ToggleBucket => session.toggle_bucket(),
            ScriptStep::Color { hex } => {
                session.set_color(hex);
            }
            ScriptStep::BrushSize { size } => {
                session.set_brush_size(*size);
            }
            ScriptStep::ResizeSticker { delta } => {
                session.resize_selected_sticker(*delta);
            }
            ScriptStep::RotateSticker { degrees } => {
                session.rotate_selected_sticker(*degrees);
            }
            ScriptStep::DeleteSticker => {
                session.delete_selected_sticker();
            }
            ScriptStep::Undo => {
                session.undo()?;
            }
            ScriptStep::Clear => session.clear(),
            ScriptStep::Save => {
                let outcome = pollster::block_on(session.save())?;
                pollster::block_on(session.acknowledge_unlocks())?;
                self.summary.saved.push(outcome.record.title);
                self.summary.unlocked.extend(outcome.newly_unlocked);
            }
            ScriptStep::Snapshot { name } => {
                let png = encode_png(session.display())?;
                let file = format!("{}.png", name);
                if let Err(e) = self.write(&file, &png) {
                    log::warn!("Snapshot '{}' not written: {}", name, e);
                }
            }
        }
        Ok(())
    }

    fn write(&mut self, file: &str, bytes: &[u8]) -> Result<(), ReplayError> {
        let path = self.out_dir.join(file);
        fs::write(&path, bytes).map_err(|source| ReplayError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        self.summary.outputs.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crayonbox_core::export::decode_image;
    use crayonbox_core::session::{Owner, SessionConfig};
    use crayonbox_core::storage::MemoryStorage;
    use std::sync::Arc;
    use tempfile::tempdir;

    const LOOP_SCRIPT: &str = r##"{
        "bounds": { "left": 0.0, "top": 0.0, "width": 400.0, "height": 300.0 },
        "steps": [
            { "op": "brush_size", "size": 4 },
            { "op": "pointer_down", "pointer": { "kind": "mouse", "client_x": 185, "client_y": 135 } },
            { "op": "pointer_move", "pointer": { "kind": "mouse", "client_x": 215, "client_y": 135 } },
            { "op": "pointer_move", "pointer": { "kind": "mouse", "client_x": 215, "client_y": 165 } },
            { "op": "pointer_move", "pointer": { "kind": "mouse", "client_x": 185, "client_y": 165 } },
            { "op": "pointer_move", "pointer": { "kind": "mouse", "client_x": 185, "client_y": 135 } },
            { "op": "pointer_up" },
            { "op": "key", "key": "b" },
            { "op": "color", "hex": "#3b82f6" },
            { "op": "pointer_down", "pointer": { "kind": "touch", "touches": [ { "client_x": 200.25, "client_y": 150.25 } ] } },
            { "op": "pointer_up" },
            { "op": "snapshot", "name": "filled" },
            { "op": "save" }
        ]
    }"##;

    fn session() -> DrawingSession {
        let storage = Arc::new(MemoryStorage::new());
        DrawingSession::new(
            SessionConfig::default(),
            Owner::new("kid", "Mia"),
            storage.clone(),
            storage,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let script: Script = serde_json::from_str(LOOP_SCRIPT).unwrap();
        assert_eq!(script.steps.len(), 13);
        assert_eq!(
            script.steps[7],
            ScriptStep::Key {
                key: "b".to_string(),
                modifiers: Modifiers::default(),
                focus: FocusTarget::Nothing,
            }
        );
    }

    #[test]
    fn test_replay_loop_fill() {
        let out = tempdir().unwrap();
        let script: Script = serde_json::from_str(LOOP_SCRIPT).unwrap();
        let replayer = Replayer::new(session(), script.bounds, out.path().to_path_buf());

        let summary = replayer.run(&script.steps).unwrap();
        assert_eq!(summary.steps, 13);
        assert_eq!(summary.saved, vec!["My Drawing 1".to_string()]);
        assert_eq!(summary.unlocked, vec!["rainbow".to_string()]);

        let bytes = fs::read(out.path().join("display.png")).unwrap();
        let image = decode_image(&bytes).unwrap();
        assert_eq!(image.get_pixel(400, 300).0, [0x3b, 0x82, 0xf6, 0xff]);
        assert_eq!(image.get_pixel(400, 270).0, [0xef, 0x44, 0x44, 0xff]);
        assert_eq!(image.get_pixel(100, 100).0, [0xff, 0xff, 0xff, 0xff]);

        assert!(out.path().join("filled.png").exists());
        let thumb = decode_image(&fs::read(out.path().join("thumbnail.jpg")).unwrap()).unwrap();
        assert_eq!(thumb.dimensions(), (200, 150));
    }

    #[test]
    fn test_unknown_op_rejected() {
        let result: Result<Script, _> =
            serde_json::from_str(r#"{ "steps": [ { "op": "teleport" } ] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_script_file() {
        let dir = tempdir().unwrap();
        let result = Script::from_path(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ReplayError::Io { .. })));
    }
}
