use sf_core::{CoreResult, Entity, EntityKind, Models, Schema, WorldContext};
use sf_nbt::{Block, Bounds};

use super::BLOCK_PASS;

/// `single_block`: places `block` at the entity's position.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleBlock;

impl EntityKind for SingleBlock {
    fn type_name(&self) -> &str {
        "single_block"
    }

    fn description(&self) -> &str {
        "places one block"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field("block", Block::new("minecraft:stone"))
            .field(BLOCK_PASS, 0)
    }

    fn is_spatial(&self) -> bool {
        true
    }

    fn bounds(&self, entity: &Entity, _models: Models<'_>) -> CoreResult<Option<Bounds>> {
        Ok(Some(Bounds::of_block(entity.block_pos())))
    }

    fn compile_world(&self, entity: &Entity, ctx: &mut WorldContext<'_>) -> CoreResult<()> {
        let block = entity.block("block")?.clone();
        ctx.world
            .set_block(entity.block_pos(), block, Some(entity.name()))?;
        Ok(())
    }
}
