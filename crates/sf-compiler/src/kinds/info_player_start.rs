use sf_command::{Command, Coordinates};
use sf_core::{CoreResult, Entity, EntityKind, LogicContext, Schema};

/// `info_player_start`: sets the world spawn to its block when the pack
/// loads.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoPlayerStart;

impl EntityKind for InfoPlayerStart {
    fn type_name(&self) -> &str {
        "info_player_start"
    }

    fn description(&self) -> &str {
        "where players spawn"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
    }

    fn compile_logic(&self, entity: &Entity, ctx: &mut LogicContext<'_>) -> CoreResult<()> {
        let spawn = Coordinates::block(entity.block_pos());
        ctx.push_init([Command::raw(format!("setworldspawn {spawn}"))]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sf_core::{Level, Vec3};

    use super::*;
    use crate::kinds::test_support::{function_lines, logic_of};

    #[test]
    fn spawn_is_set_on_load() {
        let mut level = Level::new("t");
        level
            .add_entity(Entity::new(Arc::new(InfoPlayerStart), "spawn").at(Vec3::new(3.5, 64.0, -2.5)))
            .unwrap();
        let pack = logic_of(&level, "spawn");
        assert_eq!(function_lines(&pack, "init"), vec!["setworldspawn 3 64 -3"]);
    }
}
