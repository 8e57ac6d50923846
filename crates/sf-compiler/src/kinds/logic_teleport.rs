use sf_command::{Command, Coordinates, ExecuteCommand, TargetSelector};
use sf_core::{
    Attribute, CoreError, CoreResult, EntityKind, InputCall, LogicContext, PortDecl, Schema, Vec3,
    resolve_target,
};

const TELEPORT: &str = "teleport";
const TARGET: &str = "target";
const RELATIVE: &str = "relative";
const LANDMARK: &str = "landmark";

/// `logic_teleport`: its `teleport` input moves `target` to the entity's
/// position.
///
/// Connection arguments refine the call: the first string argument replaces
/// `target`, the first entity argument sends them to that entity instead.
/// With `relative` set, whoever moves keeps their offset from `landmark`
/// and is shifted by the destination minus the landmark's position.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicTeleport;

fn absolute(pos: Vec3) -> Coordinates {
    Coordinates::absolute(f64::from(pos.x), f64::from(pos.y), f64::from(pos.z))
}

impl EntityKind for LogicTeleport {
    fn type_name(&self) -> &str {
        "logic_teleport"
    }

    fn description(&self) -> &str {
        "teleports entities to a point"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
            .field(TARGET, "@s")
            .field(RELATIVE, false)
            .field(LANDMARK, Attribute::Entity(String::new()))
    }

    fn inputs(&self) -> Vec<PortDecl> {
        vec![PortDecl::new(TELEPORT, "move the target")]
    }

    fn compile_input(
        &self,
        call: &InputCall<'_>,
        ctx: &mut LogicContext<'_>,
    ) -> CoreResult<Vec<Command>> {
        if call.input != TELEPORT {
            return Err(CoreError::UnknownInput {
                entity: call.entity.name().to_string(),
                input: call.input.to_string(),
            });
        }
        let level = ctx.level();
        let target = match call.args.iter().find_map(Attribute::as_str) {
            Some(text) => TargetSelector::parse(text)?,
            None => TargetSelector::parse(call.entity.string(TARGET)?)?,
        };
        let destination = match call.args.iter().find_map(Attribute::as_entity_ref) {
            Some(name) => resolve_target(level, name, call.entity, call.instigator)
                .ok_or_else(|| CoreError::EntityNotFound(name.to_string()))?
                .position(),
            None => call.entity.position(),
        };

        if !call.entity.bool(RELATIVE)? {
            return Ok(vec![Command::teleport(target, absolute(destination))]);
        }
        let name = call.entity.entity_ref(LANDMARK)?;
        let landmark = level
            .entity(name)
            .ok_or_else(|| CoreError::EntityNotFound(name.to_string()))?
            .position();
        let shift = Coordinates::relative(
            f64::from(destination.x - landmark.x),
            f64::from(destination.y - landmark.y),
            f64::from(destination.z - landmark.z),
        );
        Ok(vec![
            ExecuteCommand::builder()
                .as_entity(target)
                .at(TargetSelector::sender())
                .run(Command::teleport(TargetSelector::sender(), shift))
                .into(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sf_core::{Entity, Level, Output};

    use super::*;
    use crate::kinds::test_support::fire;
    use crate::kinds::{InfoTarget, LogicRelay};

    fn level(teleport: Entity, output: Output) -> Level {
        let mut level = Level::new("t");
        level
            .add_entity(Entity::new(Arc::new(LogicRelay), "button").with_output(output))
            .unwrap();
        level.add_entity(teleport).unwrap();
        level
            .add_entity(Entity::new(Arc::new(InfoTarget), "spawn").at(Vec3::new(0.0, 70.0, 0.0)))
            .unwrap();
        level
            .add_entity(Entity::new(Arc::new(InfoTarget), "mark").at(Vec3::new(0.0, 60.0, 0.0)))
            .unwrap();
        level
    }

    fn teleport() -> Entity {
        Entity::new(Arc::new(LogicTeleport), "tp").at(Vec3::new(10.0, 64.5, -3.0))
    }

    fn call() -> Output {
        Output::new("on_trigger", "tp", TELEPORT)
    }

    #[test]
    fn moves_the_executor_to_the_entity() {
        let level = level(teleport(), call());
        assert_eq!(fire(&level, "button", "on_trigger"), vec!["teleport @s 10 64.5 -3"]);
    }

    #[test]
    fn arguments_pick_who_and_where() {
        let level = level(
            teleport(),
            call().with_arg("@a[tag=red]").with_arg(Attribute::Entity("spawn".into())),
        );
        assert_eq!(
            fire(&level, "button", "on_trigger"),
            vec!["teleport @a[tag=red] 0 70 0"]
        );
    }

    #[test]
    fn relative_keeps_the_offset_from_the_landmark() {
        let level = level(
            teleport()
                .with_attribute(RELATIVE, true)
                .with_attribute(LANDMARK, Attribute::Entity("mark".into())),
            call(),
        );
        assert_eq!(
            fire(&level, "button", "on_trigger"),
            vec!["execute as @s at @s run teleport @s ~10 ~4.5 ~-3"]
        );
    }

    #[test]
    fn missing_landmark_is_an_error() {
        let level = level(teleport().with_attribute(RELATIVE, true), call());
        let mut pack = sf_command::Datapack::new("t");
        let init = pack.id("init").unwrap();
        let tick = pack.id("tick").unwrap();
        let button = level.entity("button").unwrap();
        let mut ctx = LogicContext::new(&level, &mut pack, init, tick);
        assert!(matches!(
            ctx.compile_output(button, "on_trigger", button),
            Err(CoreError::EntityNotFound(_))
        ));
    }

    #[test]
    fn missing_destination_is_an_error() {
        let level = level(teleport(), call().with_arg(Attribute::Entity("nowhere".into())));
        let mut pack = sf_command::Datapack::new("t");
        let init = pack.id("init").unwrap();
        let tick = pack.id("tick").unwrap();
        let button = level.entity("button").unwrap();
        let mut ctx = LogicContext::new(&level, &mut pack, init, tick);
        assert!(ctx.compile_output(button, "on_trigger", button).is_err());
    }
}
