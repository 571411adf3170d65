//! Keyboard shortcuts for the drawing canvas.

use crate::input::{FocusTarget, Modifiers};
use serde::{Deserialize, Serialize};

/// Command triggered by a canvas shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    Undo,
    ToggleBucket,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Key label, matched case-insensitively.
    pub key: &'static str,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, action: ShortcutAction, description: &'static str) -> Self {
        Self {
            key,
            action,
            description,
        }
    }

    /// Whether a pressed key label matches this shortcut.
    pub fn matches(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all canvas shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// All registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("U", ShortcutAction::Undo, "Undo the last stroke or fill"),
            Shortcut::new("B", ShortcutAction::ToggleBucket, "Toggle the paint bucket"),
        ]
    }

    /// Print all shortcuts to stdout.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:10} {}", shortcut.key, shortcut.description);
        }
        println!();
    }
}

/// Resolve a key press to a canvas command.
///
/// Shortcuts only fire while the canvas (or nothing) has focus, and never
/// with Ctrl/Cmd held so browser and OS bindings keep working.
pub fn resolve_shortcut(key: &str, modifiers: Modifiers, focus: FocusTarget) -> Option<ShortcutAction> {
    if modifiers.command() || !focus.accepts_canvas_shortcuts() {
        return None;
    }
    ShortcutRegistry::all()
        .into_iter()
        .find(|s| s.matches(key))
        .map(|s| s.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_case_insensitive() {
        let none = Modifiers::default();
        assert_eq!(resolve_shortcut("u", none, FocusTarget::Canvas), Some(ShortcutAction::Undo));
        assert_eq!(resolve_shortcut("U", none, FocusTarget::Nothing), Some(ShortcutAction::Undo));
        assert_eq!(
            resolve_shortcut("b", none, FocusTarget::Canvas),
            Some(ShortcutAction::ToggleBucket)
        );
        assert_eq!(resolve_shortcut("x", none, FocusTarget::Canvas), None);
    }

    #[test]
    fn test_shift_still_fires() {
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(resolve_shortcut("B", shift, FocusTarget::Canvas), Some(ShortcutAction::ToggleBucket));
    }

    #[test]
    fn test_command_modifiers_block() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        let meta = Modifiers {
            meta: true,
            ..Default::default()
        };
        assert_eq!(resolve_shortcut("u", ctrl, FocusTarget::Canvas), None);
        assert_eq!(resolve_shortcut("u", meta, FocusTarget::Canvas), None);
    }

    #[test]
    fn test_text_focus_blocks() {
        let none = Modifiers::default();
        assert_eq!(resolve_shortcut("u", none, FocusTarget::TextInput), None);
        assert_eq!(resolve_shortcut("b", none, FocusTarget::Other), None);
    }
}
