use std::collections::BTreeSet;
use std::fmt;

use crate::error::{NbtError, NbtResult};
use crate::section::SECTION_SIZE;

const SIZE: i32 = SECTION_SIZE as i32;

/// Chunks per region edge.
pub const REGION_CHUNKS: i32 = 32;

/// Integer world position of a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockPos {
    /// East-west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North-south axis.
    pub z: i32,
}

impl BlockPos {
    /// Construct a position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The section containing this block (floor division).
    pub fn section(self) -> SectionPos {
        SectionPos::new(
            self.x.div_euclid(SIZE),
            self.y.div_euclid(SIZE),
            self.z.div_euclid(SIZE),
        )
    }

    /// The chunk column containing this block.
    pub fn chunk(self) -> ChunkPos {
        ChunkPos::new(self.x.div_euclid(SIZE), self.z.div_euclid(SIZE))
    }

    /// Component-wise sum, `None` if any axis overflows.
    pub fn checked_add(self, rhs: BlockPos) -> Option<BlockPos> {
        Some(BlockPos::new(
            self.x.checked_add(rhs.x)?,
            self.y.checked_add(rhs.y)?,
            self.z.checked_add(rhs.z)?,
        ))
    }

    /// Component-wise sum, clamped to the `i32` range.
    pub fn saturating_add(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(
            self.x.saturating_add(rhs.x),
            self.y.saturating_add(rhs.y),
            self.z.saturating_add(rhs.z),
        )
    }

    /// Coordinates inside the containing section, each in `0..16`.
    pub fn local(self) -> (usize, usize, usize) {
        (
            self.x.rem_euclid(SIZE) as usize,
            self.y.rem_euclid(SIZE) as usize,
            self.z.rem_euclid(SIZE) as usize,
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Position of a 16x16x16 section, in section units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionPos {
    /// East-west axis.
    pub x: i32,
    /// Vertical axis; `0..16` inside a chunk.
    pub y: i32,
    /// North-south axis.
    pub z: i32,
}

impl SectionPos {
    /// Construct a section position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The chunk column this section belongs to.
    pub fn chunk(self) -> ChunkPos {
        ChunkPos::new(self.x, self.z)
    }

    /// Block-space extent of the section.
    pub fn bounds(self) -> Bounds {
        let min = BlockPos::new(self.x * SIZE, self.y * SIZE, self.z * SIZE);
        Bounds::new(min, min.saturating_add(BlockPos::new(SIZE, SIZE, SIZE)))
    }
}

impl fmt::Display for SectionPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// Position of a chunk column. Ordered by z, then x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    /// East-west axis.
    pub x: i32,
    /// North-south axis.
    pub z: i32,
}

impl ChunkPos {
    /// Construct a chunk position.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The region file this chunk is stored in.
    pub fn region(self) -> RegionPos {
        RegionPos::new(
            self.x.div_euclid(REGION_CHUNKS),
            self.z.div_euclid(REGION_CHUNKS),
        )
    }

    /// World position of the chunk's lowest corner.
    pub fn origin(self) -> BlockPos {
        BlockPos::new(self.x * SIZE, 0, self.z * SIZE)
    }
}

impl Ord for ChunkPos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.z.cmp(&other.z).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for ChunkPos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

/// Position of a 32x32-chunk region file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionPos {
    /// East-west axis.
    pub x: i32,
    /// North-south axis.
    pub z: i32,
}

impl RegionPos {
    /// Construct a region position.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// File name used by the persisted world format.
    pub fn file_name(self) -> String {
        format!("r.{}.{}.mca", self.x, self.z)
    }

    /// Whether a chunk lies inside this region.
    pub fn contains(self, chunk: ChunkPos) -> bool {
        chunk.region() == self
    }
}

impl fmt::Display for RegionPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r.{}.{}", self.x, self.z)
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Axis-aligned box of blocks. `min` is inclusive, `max` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Inclusive lower corner.
    pub min: BlockPos,
    /// Exclusive upper corner.
    pub max: BlockPos,
}

impl Bounds {
    /// Build a box from two corners in any order.
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// The single-block box at `pos`. Empty on an axis where `pos` sits at
    /// `i32::MAX`.
    pub fn of_block(pos: BlockPos) -> Self {
        Self::new(pos, pos.saturating_add(BlockPos::new(1, 1, 1)))
    }

    /// The box from `origin` spanning `extent`, which may point in any
    /// direction. Fails if the far corner does not fit in `i32`.
    pub fn spanning(origin: BlockPos, extent: BlockPos) -> NbtResult<Self> {
        let far = offset(origin, extent)?;
        Ok(Self::new(origin, far))
    }

    /// The box moved by `by`.
    pub fn translated(&self, by: BlockPos) -> NbtResult<Self> {
        Ok(Self {
            min: offset(self.min, by)?,
            max: offset(self.max, by)?,
        })
    }

    /// Whether the box contains no blocks.
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }

    /// Whether `pos` lies inside the box.
    pub fn contains(&self, pos: BlockPos) -> bool {
        (self.min.x..self.max.x).contains(&pos.x)
            && (self.min.y..self.max.y).contains(&pos.y)
            && (self.min.z..self.max.z).contains(&pos.z)
    }

    /// The overlapping box, if the two share at least one block.
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        let min = BlockPos::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.min.z.max(other.min.z),
        );
        let max = BlockPos::new(
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
            self.max.z.min(other.max.z),
        );
        let result = Bounds { min, max };
        (!result.is_empty()).then_some(result)
    }

    /// Every section the box touches. Empty boxes touch none.
    pub fn sections(&self) -> BTreeSet<SectionPos> {
        let mut out = BTreeSet::new();
        if self.is_empty() {
            return out;
        }
        let lo = self.min.section();
        let hi = self.max.saturating_add(BlockPos::new(-1, -1, -1)).section();
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    out.insert(SectionPos::new(x, y, z));
                }
            }
        }
        out
    }

    /// Whether the box touches the given section.
    pub fn touches_section(&self, section: SectionPos) -> bool {
        self.intersection(&section.bounds()).is_some()
    }
}

fn offset(origin: BlockPos, by: BlockPos) -> NbtResult<BlockPos> {
    origin
        .checked_add(by)
        .ok_or(NbtError::CoordinateOverflow { origin, offset: by })
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}
