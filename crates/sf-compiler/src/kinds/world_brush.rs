use sf_core::{BlockTexture, CoreResult, Entity, EntityKind, Models, Schema, Vec3, WorldContext};
use sf_nbt::{BlockPos, Bounds, OverwritePolicy};

use super::{BLOCK_PASS, END_POINT, box_bounds, default_end_point, known_box_bounds};

const TEXTURE: &str = "texture";
const TEXTURE_SCALE: &str = "texture_scale";
const TEXTURE_OFFSET: &str = "texture_offset";

/// `world_brush`: fills the box from the position to `end_point` with
/// `texture`.
///
/// Textures are sampled in world coordinates shifted by `texture_offset`;
/// textures that support scaling are also stretched by `texture_scale`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldBrush;

impl EntityKind for WorldBrush {
    fn type_name(&self) -> &str {
        "world_brush"
    }

    fn description(&self) -> &str {
        "fills a box with a block texture"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field(END_POINT, default_end_point())
            .field(TEXTURE, BlockTexture::default())
            .field(TEXTURE_SCALE, Vec3::new(1.0, 1.0, 1.0))
            .field(TEXTURE_OFFSET, Vec3::default())
            .field(BLOCK_PASS, 0)
    }

    fn is_spatial(&self) -> bool {
        true
    }

    fn bounds(&self, entity: &Entity, _models: Models<'_>) -> CoreResult<Option<Bounds>> {
        known_box_bounds(entity)
    }

    fn compile_world(&self, entity: &Entity, ctx: &mut WorldContext<'_>) -> CoreResult<()> {
        let fill = entity.texture(TEXTURE)?.paint(
            &box_bounds(entity)?,
            entity.vector(TEXTURE_SCALE)?,
            entity.vector(TEXTURE_OFFSET)?,
        );
        ctx.world.add_block_collection(
            &fill,
            BlockPos::default(),
            OverwritePolicy::Always,
            Some(entity.name()),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sf_core::Level;
    use sf_nbt::Block;

    use super::*;
    use crate::compiler::Compiler;

    fn brush(texture: BlockTexture) -> Entity {
        Entity::new(Arc::new(WorldBrush), "wall")
            .with_attribute(END_POINT, Vec3::new(4.0, 2.0, 1.0))
            .with_attribute(TEXTURE, texture)
    }

    #[test]
    fn single_texture_fills_the_box() {
        let mut level = Level::new("t");
        level
            .add_entity(brush(BlockTexture::Single(Block::new("minecraft:bricks"))))
            .unwrap();
        let mut compiler = Compiler::new();
        assert!(compiler.compile_world(&level, true).is_empty());
        assert_eq!(compiler.world().block_count(), 8);
        assert_eq!(
            compiler.world().block_at(BlockPos::new(3, 1, 0)).map(Block::name),
            Some("minecraft:bricks")
        );
    }

    #[test]
    fn noise_texture_follows_the_offset() {
        let texture = BlockTexture::Noise {
            seed: 3,
            scale: 0.5,
            blocks: vec![Block::new("minecraft:stone"), Block::new("minecraft:cobblestone")],
        };
        let mut level = Level::new("t");
        level.add_entity(brush(texture.clone())).unwrap();
        level
            .set_attribute("wall", TEXTURE_OFFSET, Vec3::new(10.0, 0.0, 0.0))
            .unwrap();
        let mut compiler = Compiler::new();
        compiler.compile_world(&level, true);

        let expected = texture.paint(
            &Bounds::new(BlockPos::new(10, 0, 0), BlockPos::new(14, 2, 1)),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::default(),
        );
        for (pos, block) in compiler.world().iter() {
            let sampled = BlockPos::new(pos.x + 10, pos.y, pos.z);
            assert_eq!(sf_nbt::BlockCollection::block_at(&expected, sampled), Some(block));
        }
    }

    #[test]
    fn box_past_the_height_limit_places_nothing() {
        let mut level = Level::new("t");
        level
            .add_entity(
                brush(BlockTexture::default())
                    .at(Vec3::new(0.0, 254.0, 0.0))
                    .with_attribute(END_POINT, Vec3::new(1.0, 4.0, 1.0)),
            )
            .unwrap();
        let mut compiler = Compiler::new();
        let diagnostics = compiler.compile_world(&level, true);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(compiler.world().block_count(), 0);
    }
}
