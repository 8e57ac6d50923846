//! The command language layer: typed command trees that render to single
//! lines of game command text, grouped into functions and datapacks.
//!
//! Nothing here evaluates a command. Structured fields (selectors,
//! identifiers, NBT paths, coordinates) are validated when they are built, so
//! rendering cannot fail.

/// Plain commands: raw lines, function calls, schedules and `data`.
pub mod command;
/// Conditions usable in `execute if` and `execute unless`.
pub mod conditional;
/// Absolute, relative and local coordinates.
pub mod coords;
/// Datapack assembly and on-disk layout.
pub mod datapack;
/// Error types used throughout the crate.
pub mod error;
/// `execute` chains.
pub mod execute;
/// Named command lists.
pub mod function;
/// Namespaced identifiers.
pub mod identifier;
/// NBT paths and integer ranges.
pub mod path;
/// Target selectors.
pub mod selector;

/// Re-export command types.
pub use command::{Command, DataCommand, DataModifyOp, DataSource, DataTarget, ScheduleMode};
/// Re-export conditional types.
pub use conditional::{BlocksMode, Conditional, Objective, ScoreOp};
/// Re-export coordinate types.
pub use coords::{Coordinate, Coordinates, Rotation};
/// Re-export datapack types.
pub use datapack::{Checkpoint, Datapack, DEFAULT_PACK_FORMAT};
/// Re-export error types.
pub use error::{CommandError, CommandResult};
/// Re-export execute types.
pub use execute::{
    Anchor, ExecuteBuilder, ExecuteCommand, NumericType, StoreKind, StoreTarget, SubCommand, Swizzle,
};
/// Re-export function types.
pub use function::Function;
/// Re-export identifier types.
pub use identifier::Identifier;
/// Re-export path types.
pub use path::{IntRange, NbtPath};
/// Re-export selector types.
pub use selector::TargetSelector;
