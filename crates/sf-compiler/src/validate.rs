//! Static checks run before compiling: types, attribute shapes and wiring.

use sf_core::{Attribute, Entity, Level, TypeRegistry, WiringGraph};

use crate::diagnostics::Diagnostic;

/// Check a level without compiling it.
///
/// Errors: attributes whose type differs from the schema, enum values the
/// registry does not know, connections calling undeclared inputs.
/// Warnings: unregistered entity types, outputs the source never fires,
/// connections without a target, references to missing entities and wiring
/// cycles.
pub fn validate(level: &Level, registry: &TypeRegistry) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for entity in level.entities() {
        check_entity(level, registry, entity, &mut diagnostics);
    }
    check_wiring(level, registry, &mut diagnostics);
    log::debug!(
        "validated \"{}\": {} diagnostics",
        level.name(),
        diagnostics.len()
    );
    diagnostics
}

fn check_entity(
    level: &Level,
    registry: &TypeRegistry,
    entity: &Entity,
    out: &mut Vec<Diagnostic>,
) {
    let name = entity.name();
    if !registry.has_entity(entity.type_name()) {
        out.push(
            Diagnostic::warning(format!("unknown entity type \"{}\"", entity.type_name()))
                .for_entity(name)
                .with_label("the entity is kept but compiles to nothing"),
        );
        return;
    }

    let kind = entity.kind();
    for field in kind.schema().fields() {
        if let Some(value) = entity.attribute(&field.name)
            && value.type_name() != field.default.type_name()
        {
            out.push(
                Diagnostic::error(format!(
                    "attribute \"{}\" should be {}, found {}",
                    field.name,
                    field.default.type_name(),
                    value.type_name()
                ))
                .for_entity(name),
            );
        }
    }

    for (attr_name, value) in entity.attributes() {
        check_attribute(level, registry, name, attr_name, value, out);
    }

    let fired = kind.outputs();
    for output in entity.outputs() {
        if !fired.iter().any(|port| output.matches(port.name)) {
            out.push(
                Diagnostic::warning(format!(
                    "\"{}\" never fires on a {}",
                    output.trigger,
                    entity.type_name()
                ))
                .for_entity(name),
            );
        }
    }
}

fn check_attribute(
    level: &Level,
    registry: &TypeRegistry,
    entity: &str,
    name: &str,
    value: &Attribute,
    out: &mut Vec<Diagnostic>,
) {
    match value {
        Attribute::Enum { class, value } => {
            let known = registry
                .enum_values(class)
                .is_some_and(|values| values.iter().any(|v| v == value));
            if !known {
                out.push(
                    Diagnostic::error(format!(
                        "attribute \"{name}\": \"{value}\" is not a value of enum \"{class}\""
                    ))
                    .for_entity(entity),
                );
            }
        }
        Attribute::Entity(target) if !target.is_empty() && level.entity(target).is_none() => {
            out.push(
                Diagnostic::warning(format!(
                    "attribute \"{name}\" refers to missing entity \"{target}\""
                ))
                .for_entity(entity),
            );
        }
        Attribute::List(items) => {
            for item in items {
                check_attribute(level, registry, entity, name, item, out);
            }
        }
        _ => {}
    }
}

fn check_wiring(level: &Level, registry: &TypeRegistry, out: &mut Vec<Diagnostic>) {
    let graph = WiringGraph::build(level);
    for dangling in graph.dangling() {
        out.push(
            Diagnostic::warning(format!(
                "output \"{}\" targets missing entity \"{}\"",
                dangling.trigger, dangling.target
            ))
            .for_entity(&dangling.source)
            .with_label("the connection is skipped"),
        );
    }
    for call in graph.undeclared_inputs() {
        let target_known = level
            .entity(&call.target)
            .is_some_and(|t| registry.has_entity(t.type_name()));
        if target_known {
            out.push(
                Diagnostic::error(format!(
                    "\"{}\" has no input \"{}\"",
                    call.target, call.input
                ))
                .for_entity(&call.source),
            );
        }
    }
    for cycle in graph.cycles() {
        out.push(
            Diagnostic::warning(format!("wiring cycle: {}", cycle.join(" -> ")))
                .with_label("fails to compile if the loop runs without a delay"),
        );
    }
}
