use sf_command::{Command, ExecuteCommand};
use sf_core::{
    Attribute, CoreError, CoreResult, Entity, EntityKind, InputCall, LogicContext, PortDecl,
    Schema,
};
use sf_nbt::CompoundTag;

use super::trigger_multiple::SCOPE_ENUM;
use super::{END_POINT, default_end_point, storage_matches, volume_selector};

const ON_ENTITY_TICK: &str = "on_entity_tick";
const DISABLED: &str = "isDisabled";

/// `trigger_individual`: runs `on_entity_tick` every tick as each entity
/// inside its box, so `@s` in the outputs is that entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerIndividual;

impl EntityKind for TriggerIndividual {
    fn type_name(&self) -> &str {
        "trigger_individual"
    }

    fn description(&self) -> &str {
        "runs once per tick for each entity in a box"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field(END_POINT, default_end_point())
            .field(
                "scope",
                Attribute::Enum {
                    class: SCOPE_ENUM.to_string(),
                    value: "players".to_string(),
                },
            )
            .field("start_disabled", false)
    }

    fn inputs(&self) -> Vec<PortDecl> {
        vec![
            PortDecl::new("enable", "start watching"),
            PortDecl::new("disable", "stop watching"),
        ]
    }

    fn outputs(&self) -> Vec<PortDecl> {
        vec![PortDecl::new(ON_ENTITY_TICK, "every tick, as each entity in the box")]
    }

    fn compile_logic(&self, entity: &Entity, ctx: &mut LogicContext<'_>) -> CoreResult<()> {
        let key = ctx.storage_id(entity)?;
        ctx.set_default_storage(
            entity,
            &CompoundTag::new().with(DISABLED, entity.bool("start_disabled")?),
        )?;

        let commands = ctx.compile_output(entity, ON_ENTITY_TICK, entity)?;
        let handler = ctx.function_id(entity, ON_ENTITY_TICK)?;
        ctx.add_function(handler.clone(), commands)?;

        let tick = ExecuteCommand::builder()
            .if_(storage_matches(&key, CompoundTag::new().with(DISABLED, false)))
            .as_entity(volume_selector(entity)?)
            .run(Command::function(handler));
        let tick_id = ctx.function_id(entity, "tick")?;
        ctx.add_function(tick_id.clone(), vec![tick.into()])?;
        ctx.push_tick([Command::function(tick_id)]);
        Ok(())
    }

    fn compile_input(
        &self,
        call: &InputCall<'_>,
        ctx: &mut LogicContext<'_>,
    ) -> CoreResult<Vec<Command>> {
        let disabled = match call.input {
            "enable" => false,
            "disable" => true,
            other => {
                return Err(CoreError::UnknownInput {
                    entity: call.entity.name().to_string(),
                    input: other.to_string(),
                });
            }
        };
        let key = ctx.storage_id(call.entity)?;
        Ok(vec![Command::merge_storage(
            key,
            CompoundTag::new().with(DISABLED, disabled),
        )])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sf_core::{Level, Output, Vec3};

    use super::*;
    use crate::kinds::test_support::{fire, function_lines, lines, logic_of};
    use crate::kinds::{LogicCommand, LogicRelay};

    fn level(trigger: Entity) -> Level {
        let mut level = Level::new("t");
        level.add_entity(trigger).unwrap();
        level
            .add_entity(
                Entity::new(Arc::new(LogicCommand), "heal")
                    .with_attribute("command", "effect give @s regeneration 1"),
            )
            .unwrap();
        level
            .add_entity(Entity::new(Arc::new(LogicRelay), "switch").with_output(Output::new(
                "on_trigger",
                "pad",
                "disable",
            )))
            .unwrap();
        level
    }

    fn pad() -> Entity {
        Entity::new(Arc::new(TriggerIndividual), "pad")
            .at(Vec3::new(0.0, 64.0, 0.0))
            .with_attribute(END_POINT, Vec3::new(3.0, 1.0, 3.0))
            .with_output(Output::new(ON_ENTITY_TICK, "heal", "execute"))
    }

    #[test]
    fn tick_runs_as_each_entity_inside() {
        let pack = logic_of(&level(pad()), "pad");
        assert_eq!(
            function_lines(&pack, "pad/tick"),
            vec![
                "execute if data storage t:pad {isDisabled:0b} as @a[x=0,y=64,z=0,dx=2,dy=0,dz=2] run function t:pad/on_entity_tick"
            ]
        );
        assert_eq!(
            function_lines(&pack, "pad/on_entity_tick"),
            vec!["effect give @s regeneration 1"]
        );
        assert_eq!(function_lines(&pack, "tick"), vec!["function t:pad/tick"]);
    }

    #[test]
    fn start_disabled_seeds_storage() {
        let pack = logic_of(&level(pad().with_attribute("start_disabled", true)), "pad");
        assert_eq!(
            lines(&pack.storage_init_commands()),
            vec!["data merge storage t:pad {isDisabled:1b}"]
        );
    }

    #[test]
    fn disable_sets_the_flag() {
        let level = level(pad());
        assert_eq!(
            fire(&level, "switch", "on_trigger"),
            vec!["data merge storage t:pad {isDisabled:1b}"]
        );
    }
}
