use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(level_path: &Path, type_name: Option<&str>) -> Result<(), String> {
    let level = super::load_level(level_path)?;

    let entities: Vec<_> = level
        .entities()
        .filter(|e| type_name.is_none_or(|t| e.type_name() == t))
        .collect();

    if entities.is_empty() {
        println!("  No entities found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Type", "Position", "Outputs"]);

    for entity in &entities {
        let index = level
            .stack_index(entity.name())
            .map(|i| i.to_string())
            .unwrap_or_default();
        let outputs = entity.outputs().len();
        table.add_row(vec![
            index,
            entity.name().to_string(),
            entity.type_name().to_string(),
            entity.position().to_string(),
            if outputs == 0 {
                "—".to_string()
            } else {
                outputs.to_string()
            },
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} entit{}",
        entities.len(),
        if entities.len() == 1 { "y" } else { "ies" }
    );

    Ok(())
}
