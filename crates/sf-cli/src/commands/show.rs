use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(level_path: &Path, name: &str) -> Result<(), String> {
    let level = super::load_level(level_path)?;

    let entity = level
        .entity(name)
        .ok_or_else(|| format!("entity not found: \"{name}\""))?;

    println!("  {} [{}]", entity.name().bold(), entity.type_name().dimmed());
    let description = entity.kind().description();
    if !description.is_empty() {
        println!("  {description}");
    }
    println!();

    let mut attributes = Table::new();
    attributes.set_content_arrangement(ContentArrangement::Dynamic);
    attributes.set_header(vec!["Attribute", "Type", "Value"]);
    for (attr_name, value) in entity.attributes() {
        attributes.add_row(vec![
            attr_name.to_string(),
            value.type_name().to_string(),
            value.to_string(),
        ]);
    }
    println!("{attributes}");

    if !entity.outputs().is_empty() {
        println!();
        println!("  {}", "Outputs".bold());
        for output in entity.outputs() {
            let delay = if output.delay > 0 {
                format!(" after {}t", output.delay)
            } else {
                String::new()
            };
            println!(
                "    {} -> {}.{}{}",
                output.trigger, output.target, output.input, delay
            );
        }
    }

    Ok(())
}
