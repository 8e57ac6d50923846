use sf_core::{CoreResult, Entity, EntityKind, Models, Schema, WorldContext};
use sf_nbt::{BlockCollection, Bounds, OverwritePolicy};

use super::BLOCK_PASS;

pub(super) const MODEL: &str = "model";

/// `world_static`: places a model from the level's assets at the position.
///
/// Models come from the level's cache, which a full compile empties; bounds
/// queries and quick recompiles reuse the cached copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldStatic;

impl EntityKind for WorldStatic {
    fn type_name(&self) -> &str {
        "world_static"
    }

    fn description(&self) -> &str {
        "places a model"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field(MODEL, "")
            .field(BLOCK_PASS, 0)
            .field("overwrite", true)
    }

    fn is_spatial(&self) -> bool {
        true
    }

    fn bounds(&self, entity: &Entity, models: Models<'_>) -> CoreResult<Option<Bounds>> {
        model_bounds(entity, models)
    }

    fn model_paths(&self, entity: &Entity) -> Vec<String> {
        model_path(entity).map(str::to_string).into_iter().collect()
    }

    fn compile_world(&self, entity: &Entity, ctx: &mut WorldContext<'_>) -> CoreResult<()> {
        let path = entity.string(MODEL)?;
        if path.is_empty() {
            return Ok(());
        }
        let model = ctx.models.load(path)?;
        let policy = if entity.bool("overwrite")? {
            OverwritePolicy::Always
        } else {
            OverwritePolicy::UnlessTargetNonAir
        };
        ctx.world
            .add_block_collection(&*model, entity.block_pos(), policy, Some(entity.name()))?;
        Ok(())
    }
}

/// The `model` attribute, when set.
pub(super) fn model_path(entity: &Entity) -> Option<&str> {
    entity.string(MODEL).ok().filter(|p| !p.is_empty())
}

/// The model's blocks at the entity's position. A missing model has no
/// bounds; one pushed past the coordinate range is an error.
pub(super) fn model_bounds(entity: &Entity, models: Models<'_>) -> CoreResult<Option<Bounds>> {
    let Some(path) = model_path(entity) else {
        return Ok(None);
    };
    let Some(local) = models.load(path).ok().and_then(|m| m.bounds()) else {
        return Ok(None);
    };
    Ok(Some(local.translated(entity.block_pos())?))
}
