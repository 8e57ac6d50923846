use sf_command::{Command, ExecuteCommand, ScheduleMode};
use sf_core::{
    CoreError, CoreResult, Entity, EntityKind, InputCall, LogicContext, PortDecl, Schema,
};
use sf_nbt::CompoundTag;

use super::storage_matches;

const FIRE: &str = "fire";
const ON_FIRE: &str = "on_fire";
const ENABLED: &str = "enabled";

/// `logic_timer`: fires `on_fire` every `time` ticks while enabled.
///
/// `<entity>/fire` checks the `enabled` flag in the timer's storage, runs
/// `<entity>/on_fire` and reschedules itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicTimer;

impl LogicTimer {
    fn ticks(entity: &Entity) -> CoreResult<u32> {
        Ok(u32::try_from(entity.int("time")?.max(1)).unwrap_or(1))
    }

    /// Commands that start the timer.
    fn start(entity: &Entity, ctx: &LogicContext<'_>) -> CoreResult<Command> {
        let fire = ctx.function_id(entity, FIRE)?;
        Ok(if entity.bool("fire_on_activate")? {
            Command::function(fire)
        } else {
            Command::schedule(fire, Self::ticks(entity)?, ScheduleMode::Replace)
        })
    }
}

impl EntityKind for LogicTimer {
    fn type_name(&self) -> &str {
        "logic_timer"
    }

    fn description(&self) -> &str {
        "fires on a fixed interval"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field("time", 20)
            .field("start_active", true)
            .field("fire_on_activate", false)
    }

    fn inputs(&self) -> Vec<PortDecl> {
        vec![
            PortDecl::new("enable", "start firing"),
            PortDecl::new("disable", "stop firing"),
            PortDecl::new("reset", "restart the interval"),
        ]
    }

    fn outputs(&self) -> Vec<PortDecl> {
        vec![PortDecl::new(ON_FIRE, "fired every interval")]
    }

    fn compile_logic(&self, entity: &Entity, ctx: &mut LogicContext<'_>) -> CoreResult<()> {
        let key = ctx.storage_id(entity)?;
        let active = entity.bool("start_active")?;
        ctx.set_default_storage(entity, &CompoundTag::new().with(ENABLED, active))?;

        let on_fire = ctx.function_id(entity, ON_FIRE)?;
        let fire = ctx.function_id(entity, FIRE)?;
        let outputs = ctx.compile_output(entity, ON_FIRE, entity)?;
        ctx.add_function(on_fire.clone(), outputs)?;

        let when_enabled = || {
            ExecuteCommand::builder().if_(storage_matches(&key, CompoundTag::new().with(ENABLED, true)))
        };
        ctx.add_function(
            fire.clone(),
            vec![
                when_enabled().run(Command::function(on_fire)).into(),
                when_enabled()
                    .run(Command::schedule(fire, Self::ticks(entity)?, ScheduleMode::Replace))
                    .into(),
            ],
        )?;

        if active {
            let start = Self::start(entity, ctx)?;
            ctx.push_init([start]);
        }
        Ok(())
    }

    fn compile_input(
        &self,
        call: &InputCall<'_>,
        ctx: &mut LogicContext<'_>,
    ) -> CoreResult<Vec<Command>> {
        let entity = call.entity;
        let key = ctx.storage_id(entity)?;
        let fire = ctx.function_id(entity, FIRE)?;
        let commands = match call.input {
            "enable" => vec![
                Command::merge_storage(key, CompoundTag::new().with(ENABLED, true)),
                Self::start(entity, ctx)?,
            ],
            "disable" => vec![
                Command::merge_storage(key, CompoundTag::new().with(ENABLED, false)),
                Command::ScheduleClear(fire),
            ],
            "reset" => vec![Command::schedule(
                fire,
                Self::ticks(entity)?,
                ScheduleMode::Replace,
            )],
            other => {
                return Err(CoreError::UnknownInput {
                    entity: entity.name().to_string(),
                    input: other.to_string(),
                });
            }
        };
        Ok(commands)
    }
}
