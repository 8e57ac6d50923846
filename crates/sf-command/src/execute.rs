use std::fmt;

use crate::command::Command;
use crate::conditional::{Conditional, Objective};
use crate::coords::{Coordinates, Rotation};
use crate::identifier::Identifier;
use crate::path::NbtPath;
use crate::selector::TargetSelector;

/// Body part used by `anchored` and `facing entity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Eye height.
    Eyes,
    /// Foot position.
    Feet,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Anchor::Eyes => "eyes",
            Anchor::Feet => "feet",
        })
    }
}

/// Axes snapped by `align`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Swizzle {
    /// Snap X.
    pub x: bool,
    /// Snap Y.
    pub y: bool,
    /// Snap Z.
    pub z: bool,
}

impl Swizzle {
    /// All three axes.
    pub fn xyz() -> Self {
        Self {
            x: true,
            y: true,
            z: true,
        }
    }
}

impl fmt::Display for Swizzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (on, axis) in [(self.x, "x"), (self.y, "y"), (self.z, "z")] {
            if on {
                f.write_str(axis)?;
            }
        }
        Ok(())
    }
}

/// `store result` or `store success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// The command's numeric result.
    Result,
    /// 1 on success, 0 otherwise.
    Success,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreKind::Result => "result",
            StoreKind::Success => "success",
        })
    }
}

/// NBT number type written by `store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NumericType::Byte => "byte",
            NumericType::Short => "short",
            NumericType::Int => "int",
            NumericType::Long => "long",
            NumericType::Float => "float",
            NumericType::Double => "double",
        })
    }
}

/// Destination of a `store` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreTarget {
    /// `block POS PATH TYPE SCALE`
    Block {
        /// Block entity position.
        pos: Coordinates,
        /// Path inside the block entity.
        path: NbtPath,
        /// Stored number type.
        ty: NumericType,
        /// Multiplier.
        scale: f64,
    },
    /// `bossbar ID value|max`
    Bossbar {
        /// Bossbar identifier.
        id: Identifier,
        /// Store into `max` instead of `value`.
        max: bool,
    },
    /// `entity SEL PATH TYPE SCALE`
    Entity {
        /// Single target entity.
        selector: TargetSelector,
        /// Path inside the entity.
        path: NbtPath,
        /// Stored number type.
        ty: NumericType,
        /// Multiplier.
        scale: f64,
    },
    /// `score SEL OBJ`
    Score {
        /// Score holder.
        selector: TargetSelector,
        /// Objective written.
        objective: Objective,
    },
    /// `storage ID PATH TYPE SCALE`
    Storage {
        /// Storage identifier.
        id: Identifier,
        /// Path inside the storage.
        path: NbtPath,
        /// Stored number type.
        ty: NumericType,
        /// Multiplier.
        scale: f64,
    },
}

impl fmt::Display for StoreTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreTarget::Block {
                pos,
                path,
                ty,
                scale,
            } => write!(f, "block {pos} {path} {ty} {scale}"),
            StoreTarget::Bossbar { id, max } => {
                write!(f, "bossbar {id} {}", if *max { "max" } else { "value" })
            }
            StoreTarget::Entity {
                selector,
                path,
                ty,
                scale,
            } => write!(f, "entity {selector} {path} {ty} {scale}"),
            StoreTarget::Score {
                selector,
                objective,
            } => write!(f, "score {selector} {objective}"),
            StoreTarget::Storage {
                id,
                path,
                ty,
                scale,
            } => write!(f, "storage {id} {path} {ty} {scale}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

/// One clause of an `execute` chain.
#[derive(Debug, Clone, PartialEq)]
pub enum SubCommand {
    /// `align AXES`
    Align(Swizzle),
    /// `anchored eyes|feet`
    Anchored(Anchor),
    /// `as SEL`
    As(TargetSelector),
    /// `at SEL`
    At(TargetSelector),
    /// `facing POS`
    Facing(Coordinates),
    /// `facing entity SEL ANCHOR`
    FacingEntity(TargetSelector, Anchor),
    /// `in DIMENSION`
    In(Identifier),
    /// `positioned POS`
    Positioned(Coordinates),
    /// `positioned as SEL`
    PositionedAs(TargetSelector),
    /// `rotated ROT`
    Rotated(Rotation),
    /// `rotated as SEL`
    RotatedAs(TargetSelector),
    /// `if COND`
    If(Conditional),
    /// `unless COND`
    Unless(Conditional),
    /// `store result|success TARGET`
    Store(StoreKind, StoreTarget),
}

impl fmt::Display for SubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubCommand::Align(axes) => write!(f, "align {axes}"),
            SubCommand::Anchored(anchor) => write!(f, "anchored {anchor}"),
            SubCommand::As(sel) => write!(f, "as {sel}"),
            SubCommand::At(sel) => write!(f, "at {sel}"),
            SubCommand::Facing(pos) => write!(f, "facing {pos}"),
            SubCommand::FacingEntity(sel, anchor) => write!(f, "facing entity {sel} {anchor}"),
            SubCommand::In(dim) => write!(f, "in {dim}"),
            SubCommand::Positioned(pos) => write!(f, "positioned {pos}"),
            SubCommand::PositionedAs(sel) => write!(f, "positioned as {sel}"),
            SubCommand::Rotated(rot) => write!(f, "rotated {rot}"),
            SubCommand::RotatedAs(sel) => write!(f, "rotated as {sel}"),
            SubCommand::If(cond) => write!(f, "if {cond}"),
            SubCommand::Unless(cond) => write!(f, "unless {cond}"),
            SubCommand::Store(kind, target) => write!(f, "store {kind} {target}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ExecuteCommand
// ---------------------------------------------------------------------------

/// `execute <clauses...> run <command>`.
///
/// Clauses render in the order they were added. Running another execute
/// chain appends its clauses instead of nesting a second `execute`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteCommand {
    clauses: Vec<SubCommand>,
    run: Box<Command>,
}

impl ExecuteCommand {
    /// Start an empty chain.
    pub fn builder() -> ExecuteBuilder {
        ExecuteBuilder::default()
    }

    /// Clauses in render order.
    pub fn clauses(&self) -> &[SubCommand] {
        &self.clauses
    }

    /// The command run at the end of the chain.
    pub fn inner(&self) -> &Command {
        &self.run
    }
}

impl fmt::Display for ExecuteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("execute")?;
        for clause in &self.clauses {
            write!(f, " {clause}")?;
        }
        write!(f, " run {}", self.run)
    }
}

/// Collects clauses for an [`ExecuteCommand`].
#[derive(Debug, Clone, Default)]
pub struct ExecuteBuilder {
    clauses: Vec<SubCommand>,
}

impl ExecuteBuilder {
    /// Append any clause.
    pub fn clause(mut self, clause: SubCommand) -> Self {
        self.clauses.push(clause);
        self
    }

    /// `as SEL`
    pub fn as_entity(self, selector: TargetSelector) -> Self {
        self.clause(SubCommand::As(selector))
    }

    /// `at SEL`
    pub fn at(self, selector: TargetSelector) -> Self {
        self.clause(SubCommand::At(selector))
    }

    /// `positioned POS`
    pub fn positioned(self, pos: Coordinates) -> Self {
        self.clause(SubCommand::Positioned(pos))
    }

    /// `if COND`
    pub fn if_(self, cond: Conditional) -> Self {
        self.clause(SubCommand::If(cond))
    }

    /// `unless COND`
    pub fn unless(self, cond: Conditional) -> Self {
        self.clause(SubCommand::Unless(cond))
    }

    /// `store KIND TARGET`
    pub fn store(self, kind: StoreKind, target: StoreTarget) -> Self {
        self.clause(SubCommand::Store(kind, target))
    }

    /// Whether no clause has been added.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Finish the chain.
    pub fn run(mut self, command: impl Into<Command>) -> ExecuteCommand {
        match command.into() {
            Command::Execute(inner) => {
                self.clauses.extend(inner.clauses);
                ExecuteCommand {
                    clauses: self.clauses,
                    run: inner.run,
                }
            }
            other => ExecuteCommand {
                clauses: self.clauses,
                run: Box::new(other),
            },
        }
    }
}
