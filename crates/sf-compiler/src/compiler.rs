use sf_command::Datapack;
use sf_core::{Captures, DirtySet, Entity, Level, LogicContext, WorldContext};
use sf_nbt::BlockWorld;

use crate::config::CompileConfig;
use crate::diagnostics::{Diagnostic, Severity};

/// Result of compiling a level.
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Every placed block.
    pub world: BlockWorld,
    /// Functions, load/tick registrations and default storage.
    pub datapack: Datapack,
    /// Errors and warnings produced during compilation.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileResult {
    /// Returns `true` if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Compile a level from scratch: a full world pass, then the logic pass.
pub fn compile(level: &Level, config: &CompileConfig) -> CompileResult {
    let mut compiler = Compiler::new();
    let mut diagnostics = compiler.compile_world(level, config.full);
    let (datapack, logic) = compiler.compile_logic(level, config);
    diagnostics.extend(logic);
    CompileResult {
        world: compiler.into_world(),
        datapack,
        diagnostics,
    }
}

// ---------------------------------------------------------------------------
// World pass
// ---------------------------------------------------------------------------

/// Owns the block store across compiles of one level, so edits can be
/// applied incrementally with [`Compiler::recompile`].
///
/// Blocks captured during the last full world pass are kept for the logic
/// pass.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    world: BlockWorld,
    captures: Captures,
}

impl Compiler {
    /// A compiler with an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current block store.
    pub fn world(&self) -> &BlockWorld {
        &self.world
    }

    /// Blocks captured by entities during the last full pass.
    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    /// Run the logic pass with this compiler's captures.
    pub fn compile_logic(&self, level: &Level, config: &CompileConfig) -> (Datapack, Vec<Diagnostic>) {
        logic_pass(level, config, &self.captures)
    }

    /// Hand the block store off.
    pub fn into_world(self) -> BlockWorld {
        self.world
    }

    /// Run the world pass over every spatial entity.
    ///
    /// A full pass starts from an empty world and reloads every model; a
    /// quick pass writes over the current world and reuses cached models.
    pub fn compile_world(&mut self, level: &Level, full: bool) -> Vec<Diagnostic> {
        if full {
            self.world.clear();
            self.captures.clear();
            level.model_cache().invalidate();
        }
        let order = world_order(level);
        log::info!(
            "world pass ({}) over {} entities",
            if full { "full" } else { "quick" },
            order.len()
        );
        let mut ctx = WorldContext {
            world: &mut self.world,
            full,
            models: level.models(),
            captures: &mut self.captures,
        };
        run_world(&order, &mut ctx)
    }

    /// Rebuild only the dirty sections.
    ///
    /// Every entity whose bounds touch a dirty section is compiled into a
    /// scratch world in pass order, and each dirty section of the real world
    /// is replaced by the scratch copy.
    pub fn recompile(&mut self, level: &Level, dirty: &DirtySet) -> Vec<Diagnostic> {
        if dirty.is_empty() {
            return Vec::new();
        }
        let affected: Vec<&Entity> = world_order(level)
            .into_iter()
            .filter(|e| {
                level
                    .entity_bounds(e)
                    .ok()
                    .flatten()
                    .is_some_and(|b| dirty.touches(&b))
            })
            .collect();

        let mut scratch = BlockWorld::new();
        let diagnostics = {
            let mut ctx = WorldContext {
                world: &mut scratch,
                full: false,
                models: level.models(),
                captures: &mut self.captures,
            };
            run_world(&affected, &mut ctx)
        };
        for section in dirty.iter() {
            self.world
                .replace_section(section, scratch.section(section).cloned());
        }
        log::info!(
            "recompiled {} sections from {} entities",
            dirty.len(),
            affected.len()
        );
        diagnostics
    }
}

/// Spatial entities by block pass, ties in stack order.
fn world_order(level: &Level) -> Vec<&Entity> {
    let mut order: Vec<&Entity> = level.entities().filter(|e| e.kind().is_spatial()).collect();
    order.sort_by_key(|e| e.kind().block_pass(e));
    order
}

fn run_world(order: &[&Entity], ctx: &mut WorldContext<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for entity in order {
        if let Err(e) = entity.kind().compile_world(entity, ctx) {
            log::error!("entity \"{}\" placed no blocks: {e}", entity.name());
            diagnostics.push(
                Diagnostic::warning(e.to_string())
                    .for_entity(entity.name())
                    .with_label("entity skipped in the world pass"),
            );
        }
    }
    diagnostics
}

// ---------------------------------------------------------------------------
// Logic pass
// ---------------------------------------------------------------------------

/// Run the logic pass: build the datapack from every entity in stack order.
///
/// An entity whose contribution fails is reported as an error and its
/// partial output is dropped; the remaining entities are still compiled.
/// Nothing is captured from a world pass; see [`Compiler::compile_logic`].
pub fn compile_logic(level: &Level, config: &CompileConfig) -> (Datapack, Vec<Diagnostic>) {
    logic_pass(level, config, &Captures::new())
}

fn logic_pass(
    level: &Level,
    config: &CompileConfig,
    captures: &Captures,
) -> (Datapack, Vec<Diagnostic>) {
    let namespace = config
        .namespace
        .clone()
        .unwrap_or_else(|| level.namespace());
    let mut datapack = Datapack::new(&namespace)
        .with_description(config.description.as_str())
        .with_pack_format(config.pack_format);
    let mut diagnostics = Vec::new();

    let (init, tick) = match (datapack.id("init"), datapack.id("tick")) {
        (Ok(init), Ok(tick)) => (init, tick),
        (Err(e), _) | (_, Err(e)) => {
            diagnostics.push(Diagnostic::error(e.to_string()));
            return (datapack, diagnostics);
        }
    };
    datapack.function_entry(&init);
    datapack.function_entry(&tick);
    datapack.register_load(init.clone());
    datapack.register_tick(tick.clone());

    for entity in level.entities() {
        let checkpoint = datapack.checkpoint();
        let result = {
            let mut ctx = LogicContext::new(level, &mut datapack, init.clone(), tick.clone())
                .with_captures(captures);
            entity.kind().compile_logic(entity, &mut ctx)
        };
        match result {
            Ok(()) => datapack.commit(checkpoint),
            Err(e) => {
                log::error!("entity \"{}\" failed to compile: {e}", entity.name());
                datapack.rollback(checkpoint);
                diagnostics.push(Diagnostic::error(e.to_string()).for_entity(entity.name()));
            }
        }
    }

    let storage = datapack.storage_init_commands();
    datapack.function_entry(&init).prepend(storage);
    log::info!(
        "logic pass produced {} functions in namespace \"{}\"",
        datapack.functions().count(),
        datapack.namespace()
    );
    (datapack, diagnostics)
}
