use sf_command::Command;
use sf_core::{CoreResult, Entity, EntityKind, LogicContext, PortDecl};

const ON_LOAD: &str = "on_datapack_load";
const ON_TICK: &str = "on_tick";

/// `logic_auto`: fires `on_datapack_load` when the pack loads and `on_tick`
/// every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicAuto;

impl EntityKind for LogicAuto {
    fn type_name(&self) -> &str {
        "logic_auto"
    }

    fn description(&self) -> &str {
        "fires on load and every tick"
    }

    fn outputs(&self) -> Vec<PortDecl> {
        vec![
            PortDecl::new(ON_LOAD, "fired once when the datapack loads"),
            PortDecl::new(ON_TICK, "fired every tick"),
        ]
    }

    fn compile_logic(&self, entity: &Entity, ctx: &mut LogicContext<'_>) -> CoreResult<()> {
        if entity.has_output(ON_LOAD) {
            let id = ctx.function_id(entity, "init")?;
            let commands = ctx.compile_output(entity, ON_LOAD, entity)?;
            ctx.add_function(id.clone(), commands)?;
            ctx.push_init([Command::function(id)]);
        }
        if entity.has_output(ON_TICK) {
            let id = ctx.function_id(entity, "tick")?;
            let commands = ctx.compile_output(entity, ON_TICK, entity)?;
            ctx.add_function(id.clone(), commands)?;
            ctx.push_tick([Command::function(id)]);
        }
        Ok(())
    }
}
