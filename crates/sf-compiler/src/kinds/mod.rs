//! Entity kinds that ship with the compiler.

/// Sets the world spawn.
pub mod info_player_start;
/// A named position with no behavior of its own.
pub mod info_target;
/// Fires outputs once when the pack loads and on every tick.
pub mod logic_auto;
/// Runs one literal command.
pub mod logic_command;
/// Passes a trigger on only when a selector matches.
pub mod logic_filter;
/// Forwards a trigger, optionally delayed or as another executor.
pub mod logic_relay;
/// Moves entities to a point or by an offset.
pub mod logic_teleport;
/// Fires repeatedly at a fixed interval.
pub mod logic_timer;
/// Places one block.
pub mod single_block;
/// Runs outputs as each entity inside a box.
pub mod trigger_individual;
/// Detects entities entering and leaving a box.
pub mod trigger_multiple;
/// Fills a box with a block texture.
pub mod world_brush;
/// Places a model loaded from the level's assets.
pub mod world_static;
/// A model that logic switches on and off.
pub mod world_togglable;

use std::sync::Arc;

use sf_command::{Conditional, DataTarget, Identifier, NbtPath, TargetSelector};
use sf_core::{CoreError, CoreResult, Entity, TypeRegistry, Vec3};
use sf_nbt::{BlockPos, Bounds, CompoundTag};

pub use info_player_start::InfoPlayerStart;
pub use info_target::InfoTarget;
pub use logic_auto::LogicAuto;
pub use logic_command::LogicCommand;
pub use logic_filter::LogicFilter;
pub use logic_relay::LogicRelay;
pub use logic_teleport::LogicTeleport;
pub use logic_timer::LogicTimer;
pub use single_block::SingleBlock;
pub use trigger_individual::TriggerIndividual;
pub use trigger_multiple::TriggerMultiple;
pub use world_brush::WorldBrush;
pub use world_static::WorldStatic;
pub use world_togglable::WorldTogglable;

/// Attribute naming a selector that replaces the default executor.
pub const EXECUTOR_OVERRIDE: &str = "executor_override";
/// Attribute holding the far corner of a box, relative to the position.
pub const END_POINT: &str = "end_point";
/// Attribute ordering the world pass.
pub const BLOCK_PASS: &str = "block_pass";

/// Register every built-in kind and the enums they use.
pub fn register_builtins(registry: &mut TypeRegistry) {
    registry.register_enum(trigger_multiple::SCOPE_ENUM, ["players", "entities"]);
    registry.register_entity(Arc::new(LogicRelay));
    registry.register_entity(Arc::new(LogicTimer));
    registry.register_entity(Arc::new(LogicAuto));
    registry.register_entity(Arc::new(LogicCommand));
    registry.register_entity(Arc::new(LogicFilter));
    registry.register_entity(Arc::new(LogicTeleport));
    registry.register_entity(Arc::new(TriggerMultiple));
    registry.register_entity(Arc::new(TriggerIndividual));
    registry.register_entity(Arc::new(SingleBlock));
    registry.register_entity(Arc::new(WorldBrush));
    registry.register_entity(Arc::new(WorldStatic));
    registry.register_entity(Arc::new(WorldTogglable));
    registry.register_entity(Arc::new(InfoTarget));
    registry.register_entity(Arc::new(InfoPlayerStart));
}

/// The executor override, if one is set.
fn executor(entity: &Entity) -> CoreResult<Option<TargetSelector>> {
    let text = entity.string(EXECUTOR_OVERRIDE)?.trim();
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(TargetSelector::parse(text)?))
}

/// The box from the entity's block to its end point.
fn box_bounds(entity: &Entity) -> CoreResult<Bounds> {
    let end = entity.vector(END_POINT)?.block_pos();
    Ok(Bounds::spanning(entity.block_pos(), end)?)
}

/// [`box_bounds`] for bounds queries: an ill-typed end point means unknown
/// bounds, an overflowing one is an error.
fn known_box_bounds(entity: &Entity) -> CoreResult<Option<Bounds>> {
    match box_bounds(entity) {
        Ok(bounds) => Ok(Some(bounds)),
        Err(CoreError::AttributeType { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Players (or, with `scope` set to `entities`, any entity) inside the
/// entity's box.
fn volume_selector(entity: &Entity) -> CoreResult<TargetSelector> {
    let base = match entity.enum_value("scope")? {
        "entities" => "@e",
        _ => "@a",
    };
    let volume = volume_arguments(&box_bounds(entity)?);
    Ok(TargetSelector::parse(&format!("{base}[{volume}]"))?)
}

/// Default end point of box-shaped kinds.
fn default_end_point() -> Vec3 {
    Vec3::new(4.0, 4.0, 4.0)
}

/// `data storage KEY {field:value}` as a condition.
fn storage_matches(key: &Identifier, filter: CompoundTag) -> Conditional {
    Conditional::Data {
        target: DataTarget::Storage(key.clone()),
        path: NbtPath::matching(&filter),
    }
}

/// Selector arguments covering a box, for `@a[...]` style volume checks.
fn volume_arguments(bounds: &Bounds) -> String {
    let BlockPos { x, y, z } = bounds.min;
    let size = BlockPos::new(
        bounds.max.x - x - 1,
        bounds.max.y - y - 1,
        bounds.max.z - z - 1,
    );
    format!("x={x},y={y},z={z},dx={},dy={},dz={}", size.x, size.y, size.z)
}

#[cfg(test)]
pub(crate) mod test_support {
    use sf_command::{Command, Datapack};
    use sf_core::{Level, LogicContext};

    use crate::builtin_registry;

    pub fn lines(commands: &[Command]) -> Vec<String> {
        commands.iter().map(ToString::to_string).collect()
    }

    /// Run the logic pass of one entity and return the datapack.
    pub fn logic_of(level: &Level, name: &str) -> Datapack {
        let mut pack = Datapack::new(&level.namespace());
        let init = pack.id("init").unwrap();
        let tick = pack.id("tick").unwrap();
        let entity = level.entity(name).unwrap();
        let mut ctx = LogicContext::new(level, &mut pack, init, tick);
        entity.kind().compile_logic(entity, &mut ctx).unwrap();
        pack
    }

    /// Commands produced by firing `trigger` on `source`.
    pub fn fire(level: &Level, source: &str, trigger: &str) -> Vec<String> {
        fire_into(level, source, trigger).0
    }

    /// Like [`fire`], also returning the helper functions it created.
    pub fn fire_into(level: &Level, source: &str, trigger: &str) -> (Vec<String>, Datapack) {
        let mut pack = Datapack::new(&level.namespace());
        let init = pack.id("init").unwrap();
        let tick = pack.id("tick").unwrap();
        let entity = level.entity(source).unwrap();
        let commands = {
            let mut ctx = LogicContext::new(level, &mut pack, init, tick);
            ctx.compile_output(entity, trigger, entity).unwrap()
        };
        (lines(&commands), pack)
    }

    /// A function's lines, by path inside the level's namespace.
    pub fn function_lines(pack: &Datapack, path: &str) -> Vec<String> {
        let id = pack.id(path).unwrap();
        let function = pack
            .function(&id)
            .unwrap_or_else(|| panic!("missing function {id}"));
        lines(function.commands())
    }

    pub fn registry() -> sf_core::TypeRegistry {
        builtin_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_arguments_are_inclusive_sizes() {
        let bounds = Bounds::new(BlockPos::new(1, 2, 3), BlockPos::new(5, 6, 7));
        assert_eq!(volume_arguments(&bounds), "x=1,y=2,z=3,dx=3,dy=3,dz=3");
    }

    #[test]
    fn every_builtin_is_registered() {
        let registry = crate::builtin_registry();
        for name in [
            "logic_relay",
            "logic_timer",
            "logic_auto",
            "logic_command",
            "logic_filter",
            "logic_teleport",
            "trigger_multiple",
            "trigger_individual",
            "single_block",
            "world_brush",
            "world_static",
            "world_togglable",
            "info_target",
            "info_player_start",
        ] {
            assert!(registry.has_entity(name), "{name} not registered");
        }
        assert_eq!(
            registry.enum_values(trigger_multiple::SCOPE_ENUM),
            Some(&["players".to_string(), "entities".to_string()][..])
        );
    }
}
