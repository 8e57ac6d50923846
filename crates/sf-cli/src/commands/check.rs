use std::path::Path;

use sf_compiler::{CompileConfig, builtin_registry, compile_logic, validate};

pub fn run(level_path: &Path) -> Result<(), String> {
    let level = super::load_level(level_path)?;

    let mut diagnostics = validate(&level, &builtin_registry());
    let (_, logic) = compile_logic(&level, &CompileConfig::default());
    diagnostics.extend(logic);
    super::print_diagnostics(&diagnostics);

    if diagnostics.iter().any(|d| d.is_error()) {
        return Err("check failed".into());
    }
    println!(
        "  '{}' is valid ({} entit{}).",
        level.pretty_name(),
        level.len(),
        if level.len() == 1 { "y" } else { "ies" }
    );
    Ok(())
}
