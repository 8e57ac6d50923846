use std::fmt;

use sf_nbt::Block;

use crate::command::DataTarget;
use crate::coords::Coordinates;
use crate::error::{CommandError, CommandResult};
use crate::identifier::Identifier;
use crate::path::{IntRange, NbtPath};
use crate::selector::TargetSelector;

/// A scoreboard objective name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Objective(String);

impl Objective {
    /// Validate an objective name.
    pub fn new(name: &str) -> CommandResult<Self> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'));
        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(CommandError::InvalidObjective(name.to_string()))
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comparison used by a score-to-score condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `>=`
    Ge,
    /// `>`
    Gt,
}

impl fmt::Display for ScoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreOp::Lt => "<",
            ScoreOp::Le => "<=",
            ScoreOp::Eq => "=",
            ScoreOp::Ge => ">=",
            ScoreOp::Gt => ">",
        })
    }
}

/// Whether `if blocks` compares air cells too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlocksMode {
    /// Every cell must match.
    All,
    /// Air in the source region is ignored.
    Masked,
}

impl fmt::Display for BlocksMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlocksMode::All => "all",
            BlocksMode::Masked => "masked",
        })
    }
}

/// A condition tested by `execute if` / `execute unless`.
#[derive(Debug, Clone, PartialEq)]
pub enum Conditional {
    /// `block POS BLOCK`
    Block {
        /// Cell to test.
        pos: Coordinates,
        /// Expected block state.
        block: Block,
    },
    /// `blocks START END DEST all|masked`
    Blocks {
        /// One corner of the source region.
        start: Coordinates,
        /// Opposite corner of the source region.
        end: Coordinates,
        /// Lower corner of the compared region.
        destination: Coordinates,
        /// Comparison mode.
        mode: BlocksMode,
    },
    /// `data <target> <path>`: the path exists (or a compound filter matches).
    Data {
        /// Holder of the data.
        target: DataTarget,
        /// Path or root compound filter.
        path: NbtPath,
    },
    /// `entity SEL`: at least one entity matches.
    Entity(TargetSelector),
    /// `predicate ID`
    Predicate(Identifier),
    /// `score SEL OBJ OP SEL OBJ`
    Score {
        /// Holder being compared.
        target: TargetSelector,
        /// Its objective.
        objective: Objective,
        /// Comparison.
        op: ScoreOp,
        /// Holder compared against.
        source: TargetSelector,
        /// Its objective.
        source_objective: Objective,
    },
    /// `score SEL OBJ matches RANGE`
    ScoreMatches {
        /// Holder being tested.
        target: TargetSelector,
        /// Its objective.
        objective: Objective,
        /// Accepted values.
        range: IntRange,
    },
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conditional::Block { pos, block } => {
                write!(f, "block {pos} {}", block.state_string())
            }
            Conditional::Blocks {
                start,
                end,
                destination,
                mode,
            } => write!(f, "blocks {start} {end} {destination} {mode}"),
            Conditional::Data { target, path } => write!(f, "data {target} {path}"),
            Conditional::Entity(sel) => write!(f, "entity {sel}"),
            Conditional::Predicate(id) => write!(f, "predicate {id}"),
            Conditional::Score {
                target,
                objective,
                op,
                source,
                source_objective,
            } => write!(f, "score {target} {objective} {op} {source} {source_objective}"),
            Conditional::ScoreMatches {
                target,
                objective,
                range,
            } => write!(f, "score {target} {objective} matches {range}"),
        }
    }
}
