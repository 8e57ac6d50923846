use sf_command::{Command, ExecuteCommand, ScheduleMode};
use sf_core::{
    CoreError, CoreResult, Entity, EntityKind, InputCall, LogicContext, PortDecl, Schema,
};

use super::{EXECUTOR_OVERRIDE, executor};

const TRIGGER: &str = "trigger";
const ON_TRIGGER: &str = "on_trigger";

/// `logic_relay`: its `trigger` input fires `on_trigger`.
///
/// The outputs live in a `<entity>/trigger` function, so any number of
/// callers share one copy. `delay` schedules the call instead of running it
/// inline, and `executor_override` runs it as another selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicRelay;

impl EntityKind for LogicRelay {
    fn type_name(&self) -> &str {
        "logic_relay"
    }

    fn description(&self) -> &str {
        "forwards a trigger to its outputs"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field("delay", 0)
            .field(EXECUTOR_OVERRIDE, "")
    }

    fn inputs(&self) -> Vec<PortDecl> {
        vec![PortDecl::new(TRIGGER, "fire on_trigger")]
    }

    fn outputs(&self) -> Vec<PortDecl> {
        vec![PortDecl::new(ON_TRIGGER, "fired when triggered")]
    }

    fn compile_logic(&self, entity: &Entity, ctx: &mut LogicContext<'_>) -> CoreResult<()> {
        let commands = ctx.compile_output(entity, ON_TRIGGER, entity)?;
        let id = ctx.function_id(entity, TRIGGER)?;
        ctx.add_function(id, commands)
    }

    fn compile_input(
        &self,
        call: &InputCall<'_>,
        ctx: &mut LogicContext<'_>,
    ) -> CoreResult<Vec<Command>> {
        if call.input != TRIGGER {
            return Err(CoreError::UnknownInput {
                entity: call.entity.name().to_string(),
                input: call.input.to_string(),
            });
        }
        let id = ctx.function_id(call.entity, TRIGGER)?;
        let delay = call.entity.int("delay")?;
        if delay > 0 {
            let ticks = u32::try_from(delay).unwrap_or(u32::MAX);
            return Ok(vec![Command::schedule(id, ticks, ScheduleMode::Append)]);
        }
        let command = match executor(call.entity)? {
            Some(selector) => ExecuteCommand::builder()
                .as_entity(selector)
                .run(Command::function(id))
                .into(),
            None => Command::function(id),
        };
        Ok(vec![command])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::kinds::test_support::{fire, function_lines, logic_of};
    use sf_core::{Level, Output};

    fn level(relay: Entity) -> Level {
        let mut level = Level::new("lobby");
        level
            .add_entity(Entity::new(Arc::new(LogicRelay), "button").with_output(Output::new(
                "on_trigger",
                "relay",
                "trigger",
            )))
            .unwrap();
        level.add_entity(relay).unwrap();
        level
            .add_entity(Entity::new(Arc::new(LogicRelay), "sink"))
            .unwrap();
        level
    }

    fn relay() -> Entity {
        Entity::new(Arc::new(LogicRelay), "relay")
            .with_output(Output::new("on_trigger", "sink", "trigger"))
    }

    #[test]
    fn trigger_function_holds_outputs() {
        let level = level(relay());
        let pack = logic_of(&level, "relay");
        assert_eq!(
            function_lines(&pack, "relay/trigger"),
            vec!["function lobby:sink/trigger"]
        );
    }

    #[test]
    fn input_calls_the_function() {
        let level = level(relay());
        assert_eq!(fire(&level, "button", "on_trigger"), vec!["function lobby:relay/trigger"]);
    }

    #[test]
    fn delay_schedules_the_call() {
        let level = level(relay().with_attribute("delay", 40));
        assert_eq!(
            fire(&level, "button", "on_trigger"),
            vec!["schedule function lobby:relay/trigger 40t append"]
        );
    }

    #[test]
    fn executor_override_wraps_the_call() {
        let level = level(relay().with_attribute(EXECUTOR_OVERRIDE, "@a[tag=red]"));
        assert_eq!(
            fire(&level, "button", "on_trigger"),
            vec!["execute as @a[tag=red] run function lobby:relay/trigger"]
        );
    }

    #[test]
    fn bad_executor_is_an_error() {
        let level = level(relay().with_attribute(EXECUTOR_OVERRIDE, "not a selector"));
        let mut pack = sf_command::Datapack::new("lobby");
        let init = pack.id("init").unwrap();
        let tick = pack.id("tick").unwrap();
        let button = level.entity("button").unwrap();
        let mut ctx = LogicContext::new(&level, &mut pack, init, tick);
        assert!(ctx.compile_output(button, "on_trigger", button).is_err());
    }
}
