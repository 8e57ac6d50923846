use sf_command::{Command, ExecuteCommand};
use sf_core::{
    CoreError, CoreResult, EntityKind, InputCall, LogicContext, PortDecl, Schema,
};

use super::{EXECUTOR_OVERRIDE, executor};

/// `logic_command`: its `execute` input runs a literal command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicCommand;

impl EntityKind for LogicCommand {
    fn type_name(&self) -> &str {
        "logic_command"
    }

    fn description(&self) -> &str {
        "runs a command"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field("command", "")
            .field(EXECUTOR_OVERRIDE, "")
    }

    fn inputs(&self) -> Vec<PortDecl> {
        vec![PortDecl::new("execute", "run the command")]
    }

    fn compile_input(
        &self,
        call: &InputCall<'_>,
        _ctx: &mut LogicContext<'_>,
    ) -> CoreResult<Vec<Command>> {
        if call.input != "execute" {
            return Err(CoreError::UnknownInput {
                entity: call.entity.name().to_string(),
                input: call.input.to_string(),
            });
        }
        let command = Command::raw(call.entity.string("command")?);
        if matches!(&command, Command::Raw(line) if line.is_empty()) {
            log::warn!("logic_command \"{}\" has no command", call.entity.name());
            return Ok(Vec::new());
        }
        Ok(vec![match executor(call.entity)? {
            Some(selector) => ExecuteCommand::builder().as_entity(selector).run(command).into(),
            None => command,
        }])
    }
}
