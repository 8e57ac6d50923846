use crate::block::Block;
use crate::section::{SECTION_SIZE, Section};

/// Sections stacked in one chunk column.
pub const SECTIONS_PER_CHUNK: usize = 16;
/// World height in blocks; valid y is `0..CHUNK_HEIGHT`.
pub const CHUNK_HEIGHT: i32 = (SECTIONS_PER_CHUNK * SECTION_SIZE) as i32;

/// A 16x16 column of lazily allocated sections.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    sections: [Option<Box<Section>>; SECTIONS_PER_CHUNK],
}

impl Chunk {
    /// A chunk with no sections allocated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Section at vertical index `y` (section units).
    pub fn section(&self, y: usize) -> Option<&Section> {
        self.sections.get(y).and_then(|s| s.as_deref())
    }

    /// Section at `y`, allocating it on first use. `None` above the chunk.
    pub fn section_mut(&mut self, y: usize) -> Option<&mut Section> {
        let slot = self.sections.get_mut(y)?;
        Some(slot.get_or_insert_with(Box::default).as_mut())
    }

    /// Swap in a whole section. Returns `false` when `y` is out of range.
    pub fn replace_section(&mut self, y: usize, section: Option<Section>) -> bool {
        match self.sections.get_mut(y) {
            Some(slot) => {
                *slot = section.filter(|s| !s.is_empty()).map(Box::new);
                true
            }
            None => false,
        }
    }

    /// Block at chunk-local x/z and absolute y.
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> Option<&Block> {
        self.section(y / SECTION_SIZE)?
            .block_at(x, y % SECTION_SIZE, z)
    }

    /// Allocated sections with their vertical index, bottom to top.
    pub fn sections(&self) -> impl Iterator<Item = (usize, &Section)> {
        self.sections
            .iter()
            .enumerate()
            .filter_map(|(y, s)| s.as_deref().map(|s| (y, s)))
    }

    /// Whether no block is stored in this chunk.
    pub fn is_empty(&self) -> bool {
        self.sections().all(|(_, s)| s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_allocate_lazily() {
        let mut c = Chunk::new();
        assert_eq!(c.sections().count(), 0);
        c.section_mut(3)
            .unwrap()
            .set_block(0, 0, 0, Block::new("minecraft:stone"), None);
        assert_eq!(c.sections().count(), 1);
        assert_eq!(c.block_at(0, 48, 0), Some(&Block::new("minecraft:stone")));
    }

    #[test]
    fn out_of_range_section() {
        let mut c = Chunk::new();
        assert!(c.section_mut(SECTIONS_PER_CHUNK).is_none());
        assert!(!c.replace_section(SECTIONS_PER_CHUNK, None));
    }

    #[test]
    fn replacing_with_empty_section_frees_it() {
        let mut c = Chunk::new();
        c.section_mut(0).unwrap();
        assert!(c.replace_section(0, Some(Section::new())));
        assert_eq!(c.sections().count(), 0);
    }
}
