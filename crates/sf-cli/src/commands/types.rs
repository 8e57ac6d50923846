use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use sf_compiler::builtin_registry;
use sf_core::PortDecl;

pub fn run() -> Result<(), String> {
    let registry = builtin_registry();

    let mut kinds = Table::new();
    kinds.set_content_arrangement(ContentArrangement::Dynamic);
    kinds.set_header(vec!["Entity type", "Inputs", "Outputs", "Description"]);
    for kind in registry.entity_kinds() {
        kinds.add_row(vec![
            kind.type_name().to_string(),
            ports(kind.inputs()),
            ports(kind.outputs()),
            kind.description().to_string(),
        ]);
    }
    println!("{kinds}");
    println!();

    println!("  {}", "Attribute types".bold());
    for name in registry.attribute_types() {
        println!("    {name}");
    }

    let enums: Vec<_> = registry.enums().collect();
    if !enums.is_empty() {
        println!();
        println!("  {}", "Enums".bold());
        for (class, values) in enums {
            println!("    {class}: {}", values.join(", "));
        }
    }

    Ok(())
}

fn ports(ports: Vec<PortDecl>) -> String {
    if ports.is_empty() {
        "—".to_string()
    } else {
        ports.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
    }
}
