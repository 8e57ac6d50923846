use std::collections::BTreeMap;

use crate::block::Block;
use crate::math::{BlockPos, Bounds};

/// A finite set of placed blocks that can be read back by position.
pub trait BlockCollection {
    /// Block at a position, if one is placed there.
    fn block_at(&self, pos: BlockPos) -> Option<&Block>;

    /// Every placed block in the collection's own iteration order.
    fn blocks(&self) -> Box<dyn Iterator<Item = (BlockPos, &Block)> + '_>;

    /// Smallest box containing every placed block.
    fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.blocks();
        let (first, _) = iter.next()?;
        let mut bounds = Bounds::of_block(first);
        for (pos, _) in iter {
            let other = Bounds::of_block(pos);
            bounds = Bounds::new(
                BlockPos::new(
                    bounds.min.x.min(other.min.x),
                    bounds.min.y.min(other.min.y),
                    bounds.min.z.min(other.min.z),
                ),
                BlockPos::new(
                    bounds.max.x.max(other.max.x),
                    bounds.max.y.max(other.max.y),
                    bounds.max.z.max(other.max.z),
                ),
            );
        }
        Some(bounds)
    }
}

/// A sparse block collection, iterated Y, then Z, then X.
///
/// Explicitly placed air is kept: it is a real entry, not an absence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericBlockCollection {
    // Keyed (y, z, x) so map order is the iteration order.
    blocks: BTreeMap<(i32, i32, i32), Block>,
}

impl GenericBlockCollection {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a block, replacing any previous one at `pos`.
    pub fn set_block(&mut self, pos: BlockPos, block: Block) -> Option<Block> {
        self.blocks.insert((pos.y, pos.z, pos.x), block)
    }

    /// Number of placed blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Fill the half-open box `min..max` with one block.
    pub fn filled(bounds: Bounds, block: &Block) -> Self {
        let mut out = Self::new();
        for y in bounds.min.y..bounds.max.y {
            for z in bounds.min.z..bounds.max.z {
                for x in bounds.min.x..bounds.max.x {
                    out.set_block(BlockPos::new(x, y, z), block.clone());
                }
            }
        }
        out
    }
}

impl BlockCollection for GenericBlockCollection {
    fn block_at(&self, pos: BlockPos) -> Option<&Block> {
        self.blocks.get(&(pos.y, pos.z, pos.x))
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = (BlockPos, &Block)> + '_> {
        Box::new(
            self.blocks
                .iter()
                .map(|(&(y, z, x), b)| (BlockPos::new(x, y, z), b)),
        )
    }
}

impl FromIterator<(BlockPos, Block)> for GenericBlockCollection {
    fn from_iter<I: IntoIterator<Item = (BlockPos, Block)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (pos, block) in iter {
            out.set_block(pos, block);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_is_y_then_z_then_x() {
        let c: GenericBlockCollection = [
            (BlockPos::new(0, 1, 0), Block::new("top")),
            (BlockPos::new(1, 0, 0), Block::new("east")),
            (BlockPos::new(0, 0, 1), Block::new("south")),
        ]
        .into_iter()
        .collect();
        let names: Vec<_> = c.blocks().map(|(_, b)| b.name().to_string()).collect();
        assert_eq!(names, vec!["east", "south", "top"]);
    }

    #[test]
    fn bounds_cover_all_blocks() {
        let c: GenericBlockCollection = [
            (BlockPos::new(-1, 0, 2), Block::new("a")),
            (BlockPos::new(3, 5, 0), Block::new("b")),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            c.bounds(),
            Some(Bounds::new(BlockPos::new(-1, 0, 0), BlockPos::new(4, 6, 3)))
        );
        assert_eq!(GenericBlockCollection::new().bounds(), None);
    }

    #[test]
    fn filled_box() {
        let b = Bounds::new(BlockPos::new(0, 0, 0), BlockPos::new(2, 2, 2));
        let c = GenericBlockCollection::filled(b, &Block::new("minecraft:stone"));
        assert_eq!(c.len(), 8);
        assert!(c.block_at(BlockPos::new(1, 1, 1)).is_some());
        assert!(c.block_at(BlockPos::new(2, 0, 0)).is_none());
    }
}
