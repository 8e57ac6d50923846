use sf_command::{Command, Conditional, ExecuteCommand, TargetSelector};
use sf_core::{
    CoreError, CoreResult, EntityKind, InputCall, LogicContext, PortDecl, Schema,
};

const TRIGGER: &str = "trigger";
const ON_TRIGGER: &str = "on_trigger";

/// `logic_filter`: passes `trigger` on to `on_trigger` only while `selector`
/// matches something (or, with `invert`, matches nothing).
///
/// The outputs are inlined at every call site, each wrapped in the test.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicFilter;

impl EntityKind for LogicFilter {
    fn type_name(&self) -> &str {
        "logic_filter"
    }

    fn description(&self) -> &str {
        "forwards a trigger when a selector matches"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field("selector", "@a")
            .field("invert", false)
    }

    fn inputs(&self) -> Vec<PortDecl> {
        vec![PortDecl::new(TRIGGER, "test the selector")]
    }

    fn outputs(&self) -> Vec<PortDecl> {
        vec![PortDecl::new(ON_TRIGGER, "fired when the test passes")]
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
        let condition = Conditional::Entity(TargetSelector::parse(call.entity.string("selector")?)?);
        let invert = call.entity.bool("invert")?;

        let inner = ctx.compile_output(call.entity, ON_TRIGGER, call.instigator)?;
        Ok(inner
            .into_iter()
            .map(|command| {
                let builder = ExecuteCommand::builder();
                let builder = if invert {
                    builder.unless(condition.clone())
                } else {
                    builder.if_(condition.clone())
                };
                builder.run(command).into()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::kinds::{LogicCommand, LogicRelay};
    use crate::kinds::test_support::{fire, fire_into, function_lines};
    use sf_core::{Entity, Level, Output};

    fn level(filter: Entity) -> Level {
        let mut level = Level::new("t");
        level
            .add_entity(
                Entity::new(Arc::new(LogicRelay), "button")
                    .with_output(Output::new("on_trigger", "filter", "trigger")),
            )
            .unwrap();
        level
            .add_entity(filter.with_output(Output::new("on_trigger", "cmd", "execute")))
            .unwrap();
        level
            .add_entity(Entity::new(Arc::new(LogicCommand), "cmd").with_attribute("command", "say ok"))
            .unwrap();
        level
    }

    #[test]
    fn wraps_each_output() {
        let filter = Entity::new(Arc::new(LogicFilter), "filter").with_attribute("selector", "@p[tag=vip]");
        assert_eq!(
            fire(&level(filter), "button", "on_trigger"),
            vec!["execute if entity @p[tag=vip] run say ok"]
        );
    }

    #[test]
    fn invert_uses_unless() {
        let filter = Entity::new(Arc::new(LogicFilter), "filter").with_attribute("invert", true);
        assert_eq!(
            fire(&level(filter), "button", "on_trigger"),
            vec!["execute unless entity @a run say ok"]
        );
    }

    #[test]
    fn nested_execute_is_flattened() {
        let mut level = level(Entity::new(Arc::new(LogicFilter), "filter"));
        level.set_attribute("cmd", "executor_override", "@s").unwrap();
        assert_eq!(
            fire(&level, "button", "on_trigger"),
            vec!["execute if entity @a as @s run say ok"]
        );
    }

    #[test]
    fn delayed_loop_through_itself_compiles() {
        let filter = Entity::new(Arc::new(LogicFilter), "filter")
            .with_output(Output::new("on_trigger", "!self", "trigger").with_delay(20));
        let (lines, pack) = fire_into(&level(filter), "button", "on_trigger");
        let expected = vec![
            "execute if entity @a run schedule function t:filter/delay_on_trigger 20t append",
            "execute if entity @a run say ok",
        ];
        assert_eq!(lines, expected);
        assert_eq!(function_lines(&pack, "filter/delay_on_trigger"), expected);
    }
}
