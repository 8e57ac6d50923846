use std::fs;
use std::path::Path;

use sf_compiler::{CompileConfig, compile};
use sf_nbt::region::{RegionCodec, SnapshotCodec};

pub fn run(
    level_path: &Path,
    out: &Path,
    namespace: Option<String>,
    pack_format: Option<u32>,
    regions: bool,
) -> Result<(), String> {
    let level = super::load_level(level_path)?;

    let mut config = CompileConfig::default().with_description(if level.description().is_empty() {
        level.pretty_name().to_string()
    } else {
        level.description().to_string()
    });
    if let Some(namespace) = namespace {
        config = config.with_namespace(namespace);
    }
    if let Some(format) = pack_format {
        config = config.with_pack_format(format);
    }

    let result = compile(&level, &config);
    super::print_diagnostics(&result.diagnostics);
    if result.has_errors() {
        return Err("compilation failed with errors".into());
    }

    let datapack_dir = out.join("datapack");
    fs::create_dir_all(&datapack_dir).map_err(|e| format!("cannot create output directory: {e}"))?;
    let files = result
        .datapack
        .write_to(&datapack_dir)
        .map_err(|e| format!("cannot write datapack: {e}"))?;

    let region_count = if regions {
        SnapshotCodec::new(out.join("regions"))
            .write_world(&result.world)
            .map_err(|e| format!("cannot write regions: {e}"))?
    } else {
        0
    };

    let functions = result.datapack.functions().count();
    let blocks = result.world.block_count();
    println!("  Compiled '{}' successfully.", level.pretty_name());
    println!();
    println!(
        "  {} entit{}, {} block{}, {} function{}",
        level.len(),
        if level.len() == 1 { "y" } else { "ies" },
        blocks,
        super::plural(blocks),
        functions,
        super::plural(functions),
    );
    println!("  {} datapack files in {}", files, datapack_dir.display());
    if regions {
        println!(
            "  {} region snapshot{} in {}",
            region_count,
            super::plural(region_count),
            out.join("regions").display()
        );
    }

    Ok(())
}
