use std::fs;
use std::path::Path;

use sf_compiler::builtin_registry;
use sf_core::{BlockTexture, Entity, Level, Output, Vec3};
use sf_nbt::Block;

pub fn run(name: &str) -> Result<(), String> {
    let dir = Path::new(name);

    if dir.exists() {
        return Err(format!("directory '{name}' already exists"));
    }

    fs::create_dir_all(dir).map_err(|e| format!("cannot create directory: {e}"))?;

    let registry = builtin_registry();
    let mut level = Level::new(name).with_description("A new Scaffold level");
    let starter = [
        Entity::new(registry.entity_kind("world_brush"), "floor")
            .at(Vec3::new(-8.0, 63.0, -8.0))
            .with_attribute("end_point", Vec3::new(16.0, 1.0, 16.0))
            .with_attribute(
                "texture",
                BlockTexture::Single(Block::new("minecraft:smooth_stone")),
            ),
        Entity::new(registry.entity_kind("logic_auto"), "on_load")
            .with_output(Output::new("on_datapack_load", "welcome", "execute")),
        Entity::new(registry.entity_kind("logic_command"), "welcome")
            .with_attribute("command", format!("say Welcome to {name}!")),
    ];
    for entity in starter {
        level.add_entity(entity).map_err(|e| e.to_string())?;
    }
    level
        .save(&dir.join("level.json"))
        .map_err(|e| format!("cannot write level.json: {e}"))?;

    println!("Created level '{name}' in {name}/");
    println!("  level.json  — starter level: a floor and a welcome message");
    println!();
    println!("Get started:");
    println!("  cd {name}");
    println!("  sf list           # List entities");
    println!("  sf new logic_relay door");
    println!("  sf build          # Compile into build/");

    Ok(())
}
