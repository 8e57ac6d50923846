use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::error::{NbtError, NbtResult};
use crate::math::{BlockPos, RegionPos};
use crate::snbt::parse_compound;
use crate::world::BlockWorld;

/// Persists a [`BlockWorld`] one region at a time.
///
/// The binary region format is produced outside this crate; anything that can
/// move every block of a region in and out of a world implements this trait.
pub trait RegionCodec {
    /// Write every block of `region` held by `world`.
    fn write_region(&self, world: &BlockWorld, region: RegionPos) -> NbtResult<()>;

    /// Load `region` into `world`, returning how many blocks were placed.
    fn read_region(&self, region: RegionPos, world: &mut BlockWorld) -> NbtResult<usize>;

    /// Write every region that holds a chunk. Returns the number of regions.
    fn write_world(&self, world: &BlockWorld) -> NbtResult<usize> {
        let regions = world.regions();
        for region in &regions {
            self.write_region(world, *region)?;
        }
        Ok(regions.len())
    }
}

// ---------------------------------------------------------------------------
// JSON snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct RegionSnapshot {
    x: i32,
    z: i32,
    blocks: Vec<BlockRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlockRecord {
    pos: [i32; 3],
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<String>,
}

/// A [`RegionCodec`] writing `r.X.Z.json` files into a directory.
///
/// Block properties are stored as SNBT text so the files stay readable.
/// Block owners are compile-time bookkeeping and are not written; loaded
/// blocks have none.
#[derive(Debug, Clone)]
pub struct SnapshotCodec {
    dir: PathBuf,
}

impl SnapshotCodec {
    /// Codec rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the snapshots live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot for a region.
    pub fn path_for(&self, region: RegionPos) -> PathBuf {
        self.dir.join(format!("r.{}.{}.json", region.x, region.z))
    }
}

impl RegionCodec for SnapshotCodec {
    fn write_region(&self, world: &BlockWorld, region: RegionPos) -> NbtResult<()> {
        let blocks = world
            .iter()
            .filter(|(pos, _)| region.contains(pos.chunk()))
            .map(|(pos, block)| BlockRecord {
                pos: [pos.x, pos.y, pos.z],
                name: block.name().to_string(),
                properties: (!block.properties().is_empty())
                    .then(|| block.properties().to_string()),
            })
            .collect::<Vec<_>>();
        let snapshot = RegionSnapshot {
            x: region.x,
            z: region.z,
            blocks,
        };
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(region);
        log::debug!("writing {} blocks to {}", snapshot.blocks.len(), path.display());
        fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        Ok(())
    }

    fn read_region(&self, region: RegionPos, world: &mut BlockWorld) -> NbtResult<usize> {
        let path = self.path_for(region);
        if !path.exists() {
            return Err(NbtError::MissingRegion(region));
        }
        let snapshot: RegionSnapshot = serde_json::from_str(&fs::read_to_string(path)?)?;
        let count = snapshot.blocks.len();
        for record in snapshot.blocks {
            let mut block = Block::new(record.name);
            if let Some(props) = &record.properties {
                block = block.with_properties(parse_compound(props)?);
            }
            let [x, y, z] = record.pos;
            world.set_block(BlockPos::new(x, y, z), block, None)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_survives_a_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let codec = SnapshotCodec::new(dir.path());

        let mut world = BlockWorld::new();
        let lever = Block::new("minecraft:lever").with_property("powered", "true");
        world.set_block(BlockPos::new(1, 64, 1), lever.clone(), Some("door"))
            .unwrap();
        world
            .set_block(BlockPos::new(-700, 3, 0), Block::new("minecraft:stone"), None)
            .unwrap();

        assert_eq!(codec.write_world(&world).unwrap(), 2);
        assert!(dir.path().join("r.0.0.json").exists());
        assert!(dir.path().join("r.-2.0.json").exists());

        let mut loaded = BlockWorld::new();
        assert_eq!(codec.read_region(RegionPos::new(0, 0), &mut loaded).unwrap(), 1);
        assert_eq!(loaded.block_at(BlockPos::new(1, 64, 1)), Some(&lever));
        assert_eq!(loaded.owner_at(BlockPos::new(1, 64, 1)), None);
        let text = std::fs::read_to_string(dir.path().join("r.0.0.json")).unwrap();
        assert!(!text.contains("owner"));
        assert!(!text.contains("door"));
        assert!(loaded.block_at(BlockPos::new(-700, 3, 0)).is_none());
    }

    #[test]
    fn missing_region_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let codec = SnapshotCodec::new(dir.path());
        let mut world = BlockWorld::new();
        assert!(matches!(
            codec.read_region(RegionPos::new(4, 4), &mut world),
            Err(NbtError::MissingRegion(_))
        ));
    }
}
