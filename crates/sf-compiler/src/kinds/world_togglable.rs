use std::sync::Arc;

use sf_command::{
    Command, Coordinates, DataCommand, DataModifyOp, DataSource, DataTarget, ExecuteCommand,
    NbtPath,
};
use sf_core::{
    CoreError, CoreResult, Entity, EntityKind, InputCall, LogicContext, Models, PortDecl, Schema,
    WorldContext,
};
use sf_nbt::{
    Block, BlockCollection, BlockPos, Bounds, CompoundTag, GenericBlockCollection, OverwritePolicy,
};

use super::world_static::{MODEL, model_bounds, model_path};
use super::{BLOCK_PASS, storage_matches};

const START_ENABLED: &str = "start_enabled";
const OVERWRITE: &str = "overwrite";
const ENABLED: &str = "enabled";
const WAS_ENABLED: &str = "wasEnabled";

const ENABLE: &str = "enable";
const DISABLE: &str = "disable";
const TOGGLE: &str = "toggle";

/// `world_togglable`: a model that logic can place and take away in game.
///
/// The full world pass records what lies under the model, then places it
/// only when `start_enabled` is set. `enable_impl` sets the model's blocks
/// relative to the execution position and `disable_impl` puts the recorded
/// blocks back, or air when nothing was recorded. Inputs run both
/// positioned at the entity's block.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldTogglable;

fn relative(pos: BlockPos) -> Coordinates {
    Coordinates::relative(f64::from(pos.x), f64::from(pos.y), f64::from(pos.z))
}

impl EntityKind for WorldTogglable {
    fn type_name(&self) -> &str {
        "world_togglable"
    }

    fn description(&self) -> &str {
        "places a model that can be switched on and off"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field(MODEL, "")
            .field(BLOCK_PASS, 0)
            .field(OVERWRITE, true)
            .field(START_ENABLED, true)
    }

    fn inputs(&self) -> Vec<PortDecl> {
        vec![
            PortDecl::new(ENABLE, "place the model"),
            PortDecl::new(DISABLE, "restore what was under the model"),
            PortDecl::new(TOGGLE, "flip between the two"),
        ]
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
        let origin = entity.block_pos();
        if ctx.full {
            let mut under = GenericBlockCollection::new();
            for (local, _) in model.blocks() {
                let block = origin
                    .checked_add(local)
                    .and_then(|pos| ctx.world.block_at(pos))
                    .cloned()
                    .unwrap_or_else(Block::air);
                under.set_block(local, block);
            }
            ctx.captures.insert(entity.name().to_string(), under);
        }
        if !entity.bool(START_ENABLED)? {
            return Ok(());
        }
        let policy = if entity.bool(OVERWRITE)? {
            OverwritePolicy::Always
        } else {
            OverwritePolicy::UnlessTargetNonAir
        };
        ctx.world
            .add_block_collection(&*model, origin, policy, Some(entity.name()))?;
        Ok(())
    }

    fn compile_logic(&self, entity: &Entity, ctx: &mut LogicContext<'_>) -> CoreResult<()> {
        let key = ctx.storage_id(entity)?;
        ctx.set_default_storage(
            entity,
            &CompoundTag::new().with(ENABLED, entity.bool(START_ENABLED)?),
        )?;

        let path = entity.string(MODEL)?;
        let model: Arc<GenericBlockCollection> = if path.is_empty() {
            Arc::default()
        } else {
            ctx.level().models().load(path)?
        };
        let keep = !entity.bool(OVERWRITE)?;
        let place: Vec<Command> = model
            .blocks()
            .map(|(local, block)| Command::SetBlock {
                pos: relative(local),
                block: block.clone(),
                keep,
            })
            .collect();
        let restore: Vec<Command> = match ctx.capture(entity) {
            Some(under) => under
                .blocks()
                .map(|(local, block)| Command::set_block(relative(local), block.clone()))
                .collect(),
            None => model
                .blocks()
                .map(|(local, _)| Command::set_block(relative(local), Block::air()))
                .collect(),
        };
        let place_id = ctx.function_id(entity, "enable_impl")?;
        ctx.add_function(place_id.clone(), place)?;
        let restore_id = ctx.function_id(entity, "disable_impl")?;
        ctx.add_function(restore_id.clone(), restore)?;

        let enable_id = ctx.function_id(entity, ENABLE)?;
        ctx.add_function(
            enable_id.clone(),
            vec![
                Command::function(place_id),
                Command::merge_storage(key.clone(), CompoundTag::new().with(ENABLED, true)),
            ],
        )?;
        let disable_id = ctx.function_id(entity, DISABLE)?;
        ctx.add_function(
            disable_id.clone(),
            vec![
                Command::function(restore_id),
                Command::merge_storage(key.clone(), CompoundTag::new().with(ENABLED, false)),
            ],
        )?;

        let was_enabled = storage_matches(&key, CompoundTag::new().with(WAS_ENABLED, true));
        let toggle = vec![
            Command::Data(DataCommand::Modify {
                target: DataTarget::Storage(key.clone()),
                path: NbtPath::parse(WAS_ENABLED)?,
                op: DataModifyOp::Set,
                source: DataSource::From {
                    target: DataTarget::Storage(key),
                    path: Some(NbtPath::parse(ENABLED)?),
                },
            }),
            ExecuteCommand::builder()
                .if_(was_enabled.clone())
                .run(Command::function(disable_id))
                .into(),
            ExecuteCommand::builder()
                .unless(was_enabled)
                .run(Command::function(enable_id))
                .into(),
        ];
        let toggle_id = ctx.function_id(entity, TOGGLE)?;
        ctx.add_function(toggle_id, toggle)
    }

    fn compile_input(
        &self,
        call: &InputCall<'_>,
        ctx: &mut LogicContext<'_>,
    ) -> CoreResult<Vec<Command>> {
        if ![ENABLE, DISABLE, TOGGLE].contains(&call.input) {
            return Err(CoreError::UnknownInput {
                entity: call.entity.name().to_string(),
                input: call.input.to_string(),
            });
        }
        let id = ctx.function_id(call.entity, call.input)?;
        Ok(vec![
            ExecuteCommand::builder()
                .positioned(Coordinates::block(call.entity.block_pos()))
                .run(Command::function(id))
                .into(),
        ])
    }
}
