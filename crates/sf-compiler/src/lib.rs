//! Compiles a Scaffold level into a block world and a datapack.
//!
//! The world pass places blocks for every spatial entity in block-pass order;
//! the logic pass turns entity wiring into datapack functions.

/// World pass, logic pass and dirty-region recompiles.
pub mod compiler;
/// Options for a compile.
pub mod config;
/// Compiler diagnostics.
pub mod diagnostics;
/// Built-in entity kinds.
pub mod kinds;
/// Static checks on a level.
pub mod validate;

/// Incremental compiler and one-shot entry points.
pub use compiler::{CompileResult, Compiler, compile, compile_logic};
/// Compile options.
pub use config::CompileConfig;
/// Diagnostic types and SNBT error rendering.
pub use diagnostics::{Diagnostic, Severity, render_snbt_errors};
/// Level checker.
pub use validate::validate;

use sf_core::TypeRegistry;

/// A registry with the built-in attribute types, entity kinds and enums.
pub fn builtin_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    kinds::register_builtins(&mut registry);
    registry
}
