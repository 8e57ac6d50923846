use std::collections::{BTreeMap, BTreeSet};

use crate::block::Block;
use crate::chunk::{CHUNK_HEIGHT, Chunk};
use crate::collection::BlockCollection;
use crate::error::{NbtError, NbtResult};
use crate::math::{BlockPos, ChunkPos, RegionPos, SectionPos};
use crate::section::{SECTION_SIZE, Section};

/// How [`BlockWorld::add_block_collection`] treats cells that already hold a
/// block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Every source block replaces whatever is there.
    #[default]
    Always,
    /// Only empty cells are written.
    Never,
    /// Empty cells and air cells are written; anything else is kept.
    UnlessTargetNonAir,
}

impl OverwritePolicy {
    fn allows(self, existing: Option<&Block>) -> bool {
        match (self, existing) {
            (OverwritePolicy::Always, _) | (_, None) => true,
            (OverwritePolicy::Never, Some(_)) => false,
            (OverwritePolicy::UnlessTargetNonAir, Some(block)) => block.is_air(),
        }
    }
}

/// The block store: a sparse map of chunk columns.
///
/// No chunk exists until something is written into it. Iteration visits
/// chunks in [`ChunkPos`] order and, inside a chunk, cells in X, then Z, then
/// Y order.
#[derive(Debug, Clone, Default)]
pub struct BlockWorld {
    chunks: BTreeMap<ChunkPos, Chunk>,
}

impl BlockWorld {
    /// An empty world.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    /// Write a block, recording `owner` as the entity responsible for it.
    pub fn set_block(&mut self, pos: BlockPos, block: Block, owner: Option<&str>) -> NbtResult<()> {
        let section = self
            .section_mut(pos.section())
            .ok_or(NbtError::OutOfBounds(pos))?;
        let (x, y, z) = pos.local();
        section.set_block(x, y, z, block, owner);
        Ok(())
    }

    /// Block at a position. Positions outside the height range hold nothing.
    pub fn block_at(&self, pos: BlockPos) -> Option<&Block> {
        let (x, y, z) = pos.local();
        self.section(pos.section())?.block_at(x, y, z)
    }

    /// Name of the entity that last wrote a position.
    pub fn owner_at(&self, pos: BlockPos) -> Option<&str> {
        let (x, y, z) = pos.local();
        self.section(pos.section())?.owner_at(x, y, z)
    }

    /// Whether a block is placed at a position.
    pub fn has_block(&self, pos: BlockPos) -> bool {
        self.block_at(pos).is_some()
    }

    /// Copy every block of `source`, offset by `origin`, into the world.
    /// Returns how many blocks were written.
    ///
    /// Every target is checked first; if any lies outside the height range
    /// nothing is written.
    pub fn add_block_collection<C>(
        &mut self,
        source: &C,
        origin: BlockPos,
        policy: OverwritePolicy,
        owner: Option<&str>,
    ) -> NbtResult<usize>
    where
        C: BlockCollection + ?Sized,
    {
        let placed = source
            .blocks()
            .map(|(offset, block)| {
                let target = origin
                    .checked_add(offset)
                    .ok_or(NbtError::CoordinateOverflow { origin, offset })?;
                if section_index(target.section().y).is_none() {
                    return Err(NbtError::OutOfBounds(target));
                }
                Ok((target, block))
            })
            .collect::<NbtResult<Vec<_>>>()?;

        let mut written = 0;
        for (target, block) in placed {
            if policy.allows(self.block_at(target)) {
                self.set_block(target, block.clone(), owner)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Remove every chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Whether no block is stored anywhere.
    pub fn is_empty(&self) -> bool {
        self.chunks.values().all(Chunk::is_empty)
    }

    /// Total number of placed blocks.
    pub fn block_count(&self) -> usize {
        self.chunks
            .values()
            .flat_map(Chunk::sections)
            .map(|(_, s)| s.block_count())
            .sum()
    }

    /// Every placed block in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, &Block)> {
        self.chunks.iter().flat_map(|(cpos, chunk)| {
            let origin = cpos.origin();
            chunk.sections().flat_map(move |(sy, section)| {
                section.iter().map(move |((x, y, z), block)| {
                    let offset = BlockPos::new(
                        x as i32,
                        (sy * SECTION_SIZE + y) as i32,
                        z as i32,
                    );
                    (origin.saturating_add(offset), block)
                })
            })
        })
    }

    // -----------------------------------------------------------------------
    // Chunks and sections
    // -----------------------------------------------------------------------

    /// Chunk column at a position.
    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Positions of every allocated chunk, in order.
    pub fn chunk_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// Section at a position, if allocated.
    pub fn section(&self, pos: SectionPos) -> Option<&Section> {
        let y = section_index(pos.y)?;
        self.chunks.get(&pos.chunk())?.section(y)
    }

    fn section_mut(&mut self, pos: SectionPos) -> Option<&mut Section> {
        let y = section_index(pos.y)?;
        self.chunks.entry(pos.chunk()).or_default().section_mut(y)
    }

    /// Replace one section wholesale. Sections outside the height range are
    /// ignored and `false` is returned.
    pub fn replace_section(&mut self, pos: SectionPos, section: Option<Section>) -> bool {
        let Some(y) = section_index(pos.y) else {
            return false;
        };
        if section.is_none() && !self.chunks.contains_key(&pos.chunk()) {
            return true;
        }
        self.chunks
            .entry(pos.chunk())
            .or_default()
            .replace_section(y, section)
    }

    /// Every non-empty section position.
    pub fn section_positions(&self) -> BTreeSet<SectionPos> {
        self.chunks
            .iter()
            .flat_map(|(cpos, chunk)| {
                chunk
                    .sections()
                    .filter(|(_, s)| !s.is_empty())
                    .map(move |(y, _)| SectionPos::new(cpos.x, y as i32, cpos.z))
            })
            .collect()
    }

    /// Regions that hold at least one allocated chunk.
    pub fn regions(&self) -> BTreeSet<RegionPos> {
        self.chunks.keys().map(|c| c.region()).collect()
    }
}

fn section_index(y: i32) -> Option<usize> {
    let size = SECTION_SIZE as i32;
    (0..CHUNK_HEIGHT / size)
        .contains(&y)
        .then_some(y as usize)
}

impl BlockCollection for BlockWorld {
    fn block_at(&self, pos: BlockPos) -> Option<&Block> {
        BlockWorld::block_at(self, pos)
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = (BlockPos, &Block)> + '_> {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::GenericBlockCollection;
    use crate::math::Bounds;

    fn stone() -> Block {
        Block::new("minecraft:stone")
    }

    #[test]
    fn set_and_read_back() {
        let mut w = BlockWorld::new();
        w.set_block(BlockPos::new(-5, 70, 40), stone(), Some("wall"))
            .unwrap();
        assert_eq!(w.block_at(BlockPos::new(-5, 70, 40)), Some(&stone()));
        assert_eq!(w.owner_at(BlockPos::new(-5, 70, 40)), Some("wall"));
        assert!(!w.has_block(BlockPos::new(-5, 71, 40)));
    }

    #[test]
    fn empty_world_allocates_nothing() {
        let w = BlockWorld::new();
        assert!(w.block_at(BlockPos::new(0, 0, 0)).is_none());
        assert_eq!(w.chunk_positions().count(), 0);
    }

    #[test]
    fn reads_do_not_allocate() {
        let w = BlockWorld::new();
        let _ = w.block_at(BlockPos::new(100, 5, 100));
        assert!(w.chunk(ChunkPos::new(6, 6)).is_none());
    }

    #[test]
    fn height_limits() {
        let mut w = BlockWorld::new();
        assert!(matches!(
            w.set_block(BlockPos::new(0, -1, 0), stone(), None),
            Err(NbtError::OutOfBounds(_))
        ));
        assert!(w.set_block(BlockPos::new(0, 256, 0), stone(), None).is_err());
        assert!(w.set_block(BlockPos::new(0, 255, 0), stone(), None).is_ok());
        assert!(w.block_at(BlockPos::new(0, 300, 0)).is_none());
    }

    #[test]
    fn iteration_crosses_chunks_in_order() {
        let mut w = BlockWorld::new();
        w.set_block(BlockPos::new(0, 0, 16), Block::new("c"), None).unwrap();
        w.set_block(BlockPos::new(16, 0, 0), Block::new("b"), None).unwrap();
        w.set_block(BlockPos::new(0, 20, 0), Block::new("a2"), None).unwrap();
        w.set_block(BlockPos::new(3, 0, 0), Block::new("a1"), None).unwrap();
        let names: Vec<_> = w.iter().map(|(_, b)| b.name().to_string()).collect();
        assert_eq!(names, vec!["a1", "a2", "b", "c"]);
        let positions: Vec<_> = w.iter().map(|(p, _)| p).collect();
        assert_eq!(positions[1], BlockPos::new(0, 20, 0));
    }

    #[test]
    fn never_policy_keeps_existing_blocks() {
        let mut w = BlockWorld::new();
        w.set_block(BlockPos::new(1, 1, 1), Block::new("minecraft:gold_block"), None)
            .unwrap();
        let cube = GenericBlockCollection::filled(
            Bounds::new(BlockPos::new(0, 0, 0), BlockPos::new(2, 2, 2)),
            &stone(),
        );
        let written = w
            .add_block_collection(&cube, BlockPos::new(0, 0, 0), OverwritePolicy::Never, None)
            .unwrap();
        assert_eq!(written, 7);
        assert_eq!(
            w.block_at(BlockPos::new(1, 1, 1)),
            Some(&Block::new("minecraft:gold_block"))
        );
    }

    #[test]
    fn always_policy_writes_explicit_air() {
        let mut w = BlockWorld::new();
        w.set_block(BlockPos::new(0, 0, 0), stone(), None).unwrap();
        let mut src = GenericBlockCollection::new();
        src.set_block(BlockPos::new(0, 0, 0), Block::air());
        w.add_block_collection(&src, BlockPos::new(0, 0, 0), OverwritePolicy::Always, None)
            .unwrap();
        assert_eq!(w.block_at(BlockPos::new(0, 0, 0)), Some(&Block::air()));
    }

    #[test]
    fn unless_non_air_policy_replaces_air_only() {
        let mut w = BlockWorld::new();
        w.set_block(BlockPos::new(0, 0, 0), Block::air(), None).unwrap();
        w.set_block(BlockPos::new(1, 0, 0), Block::new("minecraft:dirt"), None)
            .unwrap();
        let src = GenericBlockCollection::filled(
            Bounds::new(BlockPos::new(0, 0, 0), BlockPos::new(3, 1, 1)),
            &stone(),
        );
        w.add_block_collection(
            &src,
            BlockPos::new(0, 0, 0),
            OverwritePolicy::UnlessTargetNonAir,
            None,
        )
        .unwrap();
        assert_eq!(w.block_at(BlockPos::new(0, 0, 0)), Some(&stone()));
        assert_eq!(
            w.block_at(BlockPos::new(1, 0, 0)),
            Some(&Block::new("minecraft:dirt"))
        );
        assert_eq!(w.block_at(BlockPos::new(2, 0, 0)), Some(&stone()));
    }

    #[test]
    fn collection_offset_by_origin() {
        let mut w = BlockWorld::new();
        let mut src = GenericBlockCollection::new();
        src.set_block(BlockPos::new(1, 0, 0), stone());
        w.add_block_collection(&src, BlockPos::new(10, 64, -3), OverwritePolicy::Always, Some("m"))
            .unwrap();
        assert_eq!(w.block_at(BlockPos::new(11, 64, -3)), Some(&stone()));
        assert_eq!(w.owner_at(BlockPos::new(11, 64, -3)), Some("m"));
    }

    #[test]
    fn collection_crossing_the_ceiling_writes_nothing() {
        let mut w = BlockWorld::new();
        let column = GenericBlockCollection::filled(
            Bounds::new(BlockPos::new(0, 0, 0), BlockPos::new(1, 4, 1)),
            &stone(),
        );
        let err = w
            .add_block_collection(&column, BlockPos::new(0, 254, 0), OverwritePolicy::Always, None)
            .unwrap_err();
        assert!(matches!(err, NbtError::OutOfBounds(pos) if pos == BlockPos::new(0, 256, 0)));
        assert_eq!(w.block_count(), 0);

        let err = w
            .add_block_collection(&column, BlockPos::new(i32::MAX, 0, 0), OverwritePolicy::Always, None)
            .unwrap_err();
        assert!(matches!(err, NbtError::OutOfBounds(_) | NbtError::CoordinateOverflow { .. }));
        assert!(w.is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let mut w = BlockWorld::new();
        w.set_block(BlockPos::new(0, 0, 0), stone(), None).unwrap();
        w.clear();
        assert!(w.is_empty());
        assert_eq!(w.block_count(), 0);
    }

    #[test]
    fn replace_section_copies_between_worlds() {
        let mut a = BlockWorld::new();
        a.set_block(BlockPos::new(1, 1, 1), stone(), None).unwrap();
        let mut b = BlockWorld::new();
        b.set_block(BlockPos::new(2, 2, 2), Block::new("x"), None).unwrap();

        let pos = SectionPos::new(0, 0, 0);
        assert!(b.replace_section(pos, a.section(pos).cloned()));
        assert_eq!(b.block_at(BlockPos::new(1, 1, 1)), Some(&stone()));
        assert!(b.block_at(BlockPos::new(2, 2, 2)).is_none());

        assert!(b.replace_section(pos, None));
        assert!(b.is_empty());
        assert!(!b.replace_section(SectionPos::new(0, 16, 0), None));
    }

    #[test]
    fn section_positions_and_regions() {
        let mut w = BlockWorld::new();
        w.set_block(BlockPos::new(0, 17, 0), stone(), None).unwrap();
        w.set_block(BlockPos::new(600, 0, 0), stone(), None).unwrap();
        let sections: Vec<_> = w.section_positions().into_iter().collect();
        assert_eq!(
            sections,
            vec![SectionPos::new(0, 1, 0), SectionPos::new(37, 0, 0)]
        );
        assert_eq!(
            w.regions().into_iter().collect::<Vec<_>>(),
            vec![RegionPos::new(0, 0), RegionPos::new(1, 0)]
        );
    }
}
