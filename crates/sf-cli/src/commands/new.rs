use std::path::Path;

use sf_compiler::builtin_registry;

pub fn run(level_path: &Path, type_name: &str, name: &str, at: &str) -> Result<(), String> {
    let registry = builtin_registry();
    if !registry.has_entity(type_name) {
        return Err(format!(
            "unknown entity type '{type_name}' (see `sf types`)"
        ));
    }
    let position = super::parse_position(at)?;

    let mut level = super::load_level(level_path)?;
    let (name, _) = level
        .new_entity(&registry, type_name, name, position)
        .map_err(|e| e.to_string())?;
    level
        .save(level_path)
        .map_err(|e| format!("cannot write {}: {e}", level_path.display()))?;

    println!("Added {type_name} '{name}' at {position}");
    Ok(())
}
