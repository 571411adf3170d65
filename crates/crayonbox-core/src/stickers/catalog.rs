//! The fixed sticker catalog earned through the reward system.

use crate::color::Rgba;

/// One sticker type in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    /// Emoji shown for the sticker.
    pub glyph: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Number of saved drawings required to unlock.
    pub unlock_threshold: u32,
    /// Badge color used when the glyph itself cannot be rasterized.
    pub tint: Rgba,
}

const fn entry(
    id: &'static str,
    glyph: &'static str,
    name: &'static str,
    description: &'static str,
    unlock_threshold: u32,
    tint: Rgba,
) -> CatalogEntry {
    CatalogEntry {
        id,
        glyph,
        name,
        description,
        unlock_threshold,
        tint,
    }
}

/// Stickers in unlock order.
pub const STICKER_CATALOG: [CatalogEntry; 12] = [
    entry("rainbow", "🌈", "Rainbow", "First masterpiece!", 1, Rgba::opaque(0xf4, 0x72, 0xb6)),
    entry("star", "⭐", "Star", "Shining bright!", 2, Rgba::opaque(0xfa, 0xcc, 0x15)),
    entry("rocket", "🚀", "Rocket", "Sky high creativity!", 3, Rgba::opaque(0x64, 0x74, 0x8b)),
    entry("heart", "❤️", "Heart", "Made with love!", 4, Rgba::opaque(0xdc, 0x26, 0x26)),
    entry("butterfly", "🦋", "Butterfly", "Beautiful transformation!", 5, Rgba::opaque(0x38, 0x8b, 0xfd)),
    entry("crown", "👑", "Crown", "Art royalty!", 7, Rgba::opaque(0xea, 0xb3, 0x08)),
    entry("diamond", "💎", "Diamond", "Precious talent!", 10, Rgba::opaque(0x22, 0xd3, 0xee)),
    entry("trophy", "🏆", "Trophy", "Champion artist!", 12, Rgba::opaque(0xf5, 0x9e, 0x0b)),
    entry("unicorn", "🦄", "Unicorn", "Magical creativity!", 15, Rgba::opaque(0xc0, 0x84, 0xfc)),
    entry("wizard", "🧙", "Wizard", "Master of art magic!", 18, Rgba::opaque(0x4f, 0x46, 0xe5)),
    entry("phoenix", "🔥", "Phoenix", "Rising artist!", 22, Rgba::opaque(0xf9, 0x73, 0x16)),
    entry("galaxy", "🌌", "Galaxy", "Out of this world!", 25, Rgba::opaque(0x1e, 0x1b, 0x4b)),
];

/// An ordered, read-only set of sticker types.
#[derive(Debug, Clone, Copy)]
pub struct StickerCatalog {
    entries: &'static [CatalogEntry],
}

impl Default for StickerCatalog {
    fn default() -> Self {
        Self::new(&STICKER_CATALOG)
    }
}

impl StickerCatalog {
    pub fn new(entries: &'static [CatalogEntry]) -> Self {
        Self { entries }
    }

    /// Resolve a sticker type id.
    pub fn lookup(&self, id: &str) -> Option<&'static CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }

    /// Entries unlocked after `drawings` saved drawings.
    pub fn unlocked_at(&self, drawings: u32) -> impl Iterator<Item = &'static CatalogEntry> + '_ {
        self.entries
            .iter()
            .filter(move |e| drawings >= e.unlock_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let catalog = StickerCatalog::default();
        assert_eq!(catalog.lookup("rocket").map(|e| e.glyph), Some("🚀"));
        assert!(catalog.lookup("dragon").is_none());
    }

    #[test]
    fn test_thresholds_ascending_and_ids_unique() {
        let entries = StickerCatalog::default().entries();
        for pair in entries.windows(2) {
            assert!(pair[0].unlock_threshold < pair[1].unlock_threshold);
        }
        let mut ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), entries.len());
    }

    #[test]
    fn test_unlocked_at() {
        let catalog = StickerCatalog::default();
        assert_eq!(catalog.unlocked_at(0).count(), 0);
        assert_eq!(catalog.unlocked_at(5).count(), 5);
        assert_eq!(catalog.unlocked_at(100).count(), 12);
    }
}
