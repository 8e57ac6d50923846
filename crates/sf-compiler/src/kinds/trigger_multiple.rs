use sf_command::{Command, Conditional, ExecuteCommand};
use sf_core::{
    Attribute, CoreError, CoreResult, Entity, EntityKind, InputCall, LogicContext, PortDecl,
    Schema,
};
use sf_nbt::CompoundTag;

use super::{END_POINT, default_end_point, storage_matches, volume_selector};

/// Enum class of the `scope` attribute.
pub const SCOPE_ENUM: &str = "trigger_scope";

const ON_START_TOUCH: &str = "on_start_touch";
const ON_END_TOUCH: &str = "on_end_touch";
const ON_TICK: &str = "on_tick";
const DISABLED: &str = "isDisabled";
const TOUCHING: &str = "isTouching";

/// `trigger_multiple`: watches a box for players (or any entity).
///
/// A tick function compares the box against the `isTouching` flag in the
/// trigger's storage and runs `handle_start_touch` or `handle_end_touch`
/// when it changes; a disabled trigger does neither. `on_tick` outputs run
/// every tick while the flag is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerMultiple;

impl EntityKind for TriggerMultiple {
    fn type_name(&self) -> &str {
        "trigger_multiple"
    }

    fn description(&self) -> &str {
        "fires when something enters or leaves a box"
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
            .field("trigger_once", false)
    }

    fn inputs(&self) -> Vec<PortDecl> {
        vec![
            PortDecl::new("enable", "start watching"),
            PortDecl::new("disable", "stop watching"),
        ]
    }

    fn outputs(&self) -> Vec<PortDecl> {
        vec![
            PortDecl::new(ON_START_TOUCH, "something entered the box"),
            PortDecl::new(ON_END_TOUCH, "the box became empty"),
            PortDecl::new(ON_TICK, "every tick while something is in the box"),
        ]
    }

    fn compile_logic(&self, entity: &Entity, ctx: &mut LogicContext<'_>) -> CoreResult<()> {
        let key = ctx.storage_id(entity)?;
        ctx.set_default_storage(
            entity,
            &CompoundTag::new()
                .with(DISABLED, entity.bool("start_disabled")?)
                .with(TOUCHING, false),
        )?;

        let selector = volume_selector(entity)?;
        let flag = |name: &str, value: bool| storage_matches(&key, CompoundTag::new().with(name, value));
        let inside = Conditional::Entity(selector);

        let mut start = vec![Command::merge_storage(key.clone(), CompoundTag::new().with(TOUCHING, true))];
        if entity.bool("trigger_once")? {
            start.push(Command::merge_storage(key.clone(), CompoundTag::new().with(DISABLED, true)));
        }
        start.extend(ctx.compile_output(entity, ON_START_TOUCH, entity)?);
        let start_id = ctx.function_id(entity, "handle_start_touch")?;
        ctx.add_function(start_id.clone(), start)?;

        let mut end = vec![Command::merge_storage(key.clone(), CompoundTag::new().with(TOUCHING, false))];
        end.extend(ctx.compile_output(entity, ON_END_TOUCH, entity)?);
        let end_id = ctx.function_id(entity, "handle_end_touch")?;
        ctx.add_function(end_id.clone(), end)?;

        let mut tick = vec![
            ExecuteCommand::builder()
                .if_(flag(DISABLED, false))
                .if_(flag(TOUCHING, false))
                .if_(inside.clone())
                .run(Command::function(start_id))
                .into(),
            ExecuteCommand::builder()
                .if_(flag(TOUCHING, true))
                .if_(flag(DISABLED, false))
                .unless(inside)
                .run(Command::function(end_id))
                .into(),
        ];
        if entity.has_output(ON_TICK) {
            let on_tick = ctx.function_id(entity, ON_TICK)?;
            let commands = ctx.compile_output(entity, ON_TICK, entity)?;
            ctx.add_function(on_tick.clone(), commands)?;
            tick.push(
                ExecuteCommand::builder()
                    .if_(flag(TOUCHING, true))
                    .run(Command::function(on_tick))
                    .into(),
            );
        }
        let tick_id = ctx.function_id(entity, "tick")?;
        ctx.add_function(tick_id.clone(), tick)?;
        ctx.push_tick([Command::function(tick_id)]);
        Ok(())
    }

    fn compile_input(
        &self,
        call: &InputCall<'_>,
        ctx: &mut LogicContext<'_>,
    ) -> CoreResult<Vec<Command>> {
        let key = ctx.storage_id(call.entity)?;
        let state = match call.input {
            "enable" => CompoundTag::new().with(DISABLED, false),
            "disable" => CompoundTag::new().with(DISABLED, true).with(TOUCHING, false),
            other => {
                return Err(CoreError::UnknownInput {
                    entity: call.entity.name().to_string(),
                    input: other.to_string(),
                });
            }
        };
        Ok(vec![Command::merge_storage(key, state)])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::kinds::LogicCommand;
    use crate::kinds::test_support::{function_lines, lines, logic_of};
    use sf_core::{Level, Output, Vec3};

    fn level(trigger: Entity) -> Level {
        let mut level = Level::new("t");
        level.add_entity(trigger).unwrap();
        level
            .add_entity(Entity::new(Arc::new(LogicCommand), "say").with_attribute("command", "say in"))
            .unwrap();
        level
    }

    fn trigger() -> Entity {
        Entity::new(Arc::new(TriggerMultiple), "door")
            .at(Vec3::new(10.0, 64.0, 10.0))
            .with_attribute(END_POINT, Vec3::new(2.0, 3.0, 2.0))
            .with_output(Output::new(ON_START_TOUCH, "say", "execute"))
    }

    #[test]
    fn tick_compares_box_with_flag() {
        let pack = logic_of(&level(trigger()), "door");
        let sel = "@a[x=10,y=64,z=10,dx=1,dy=2,dz=1]";
        assert_eq!(
            function_lines(&pack, "door/tick"),
            vec![
                format!(
                    "execute if data storage t:door {{isDisabled:0b}} if data storage t:door {{isTouching:0b}} if entity {sel} run function t:door/handle_start_touch"
                ),
                format!(
                    "execute if data storage t:door {{isTouching:1b}} if data storage t:door {{isDisabled:0b}} unless entity {sel} run function t:door/handle_end_touch"
                ),
            ]
        );
        assert_eq!(function_lines(&pack, "tick"), vec!["function t:door/tick"]);
        assert_eq!(
            function_lines(&pack, "door/handle_start_touch"),
            vec!["data merge storage t:door {isTouching:1b}", "say in"]
        );
        assert_eq!(
            lines(&pack.storage_init_commands()),
            vec!["data merge storage t:door {isDisabled:0b,isTouching:0b}"]
        );
    }

    #[test]
    fn trigger_once_disables_itself() {
        let pack = logic_of(&level(trigger().with_attribute("trigger_once", true)), "door");
        assert_eq!(
            function_lines(&pack, "door/handle_start_touch")[1],
            "data merge storage t:door {isDisabled:1b}"
        );
    }

    #[test]
    fn entity_scope_and_on_tick() {
        let entity = trigger()
            .with_attribute(
                "scope",
                Attribute::Enum {
                    class: SCOPE_ENUM.to_string(),
                    value: "entities".to_string(),
                },
            )
            .with_output(Output::new(ON_TICK, "say", "execute"));
        let pack = logic_of(&level(entity), "door");
        let tick = function_lines(&pack, "door/tick");
        assert_eq!(tick.len(), 3);
        assert_eq!(
            tick[2],
            "execute if data storage t:door {isTouching:1b} run function t:door/on_tick"
        );
        assert_eq!(function_lines(&pack, "door/on_tick"), vec!["say in"]);
        assert!(tick[0].contains("if entity @e[x=10,y=64,z=10,dx=1,dy=2,dz=1]"));
    }

    #[test]
    fn disabled_trigger_does_not_end_touch() {
        let pack = logic_of(&level(trigger().with_attribute("start_disabled", true)), "door");
        let tick = function_lines(&pack, "door/tick");
        assert!(tick.iter().all(|line| line.contains("{isDisabled:0b}")));
        assert_eq!(
            lines(&pack.storage_init_commands()),
            vec!["data merge storage t:door {isDisabled:1b,isTouching:0b}"]
        );
    }
}
